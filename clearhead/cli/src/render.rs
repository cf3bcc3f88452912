//! Plain-text rendering of tasks for the terminal.

use clearhead_core::catalog::category_color;
use clearhead_core::{Recommendation, Surface, Task};

pub(crate) const EMPTY_LIST: &str = "Ready to get organized? Add your first task with `clearhead add`.";

/// `<id>  [x] high    Title (Category)`
pub(crate) fn task_line(task: &Task) -> String {
    let mark = if task.is_completed() { 'x' } else { ' ' };
    let mut line = format!(
        "{}  [{}] {:<6}  {}",
        task.id(),
        mark,
        task.priority(),
        task.title()
    );
    if let Some(category) = task.category() {
        line.push_str(&format!(" ({category} {})", category_color(Some(category))));
    }
    if !task.description().is_empty() {
        line.push_str(&format!("\n      {}", task.description()));
    }
    line
}

pub(crate) fn completion(task: &Task) -> String {
    if task.is_completed() {
        format!("Task {} marked complete", task.id())
    } else {
        format!("Task {} reopened", task.id())
    }
}

pub(crate) fn recommendation(rec: &Recommendation, task: &Task) -> String {
    let mut out = format!("{}. {} (score {:.2})", rec.order, task.title(), rec.score);
    for reason in &rec.reasoning {
        out.push_str(&format!("\n   - {reason}"));
    }
    out
}

pub(crate) fn surface(surface: Option<Surface>) -> &'static str {
    match surface {
        Some(Surface::AllTasks) => "Opens all tasks",
        Some(Surface::Settings) => "Opens settings",
        Some(Surface::Recommendations) => "Opens recommendations",
        None => "No view opened",
    }
}
