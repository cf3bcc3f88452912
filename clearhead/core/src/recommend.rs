//! Rule-based "what to do next" recommendations.
//!
//! Each incomplete task starts at a base score that is nudged by the hour of day,
//! its priority, its category and how long its text is. The score is clamped and the
//! best three tasks are returned with the reasons that applied to them.

use crate::task::{Priority, Task, TaskId};
use chrono::{DateTime, TimeZone, Timelike, Utc};
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

const BASE_SCORE: f64 = 0.5;
const MIN_SCORE: f64 = 0.1;
const MAX_SCORE: f64 = 0.9;

const FOCUS_HOURS: [u32; 6] = [9, 10, 11, 20, 21, 22];
const SLUMP_HOURS: [u32; 4] = [13, 14, 15, 16];
const INTEREST_CATEGORIES: [&str; 2] = ["Personal", "Learning"];
const CHORE_CATEGORIES: [&str; 2] = ["Finance", "Errands"];
const SHORT_TASK_CHARS: usize = 50;
const LONG_TASK_CHARS: usize = 150;
const MAX_RECOMMENDATIONS: usize = 3;

const REASON_FOCUS_TIME: &str = "Good time for focus and concentration";
const REASON_INTEREST: &str = "Interest-driven category - natural motivation";
const REASON_SHORT: &str = "Short task fits ADHD attention span";
const REASON_HIGH_PRIORITY: &str = "High priority task";
const REASON_FALLBACK: &str = "Task ready for completion";

/// A scored suggestion for one task.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub task_id: TaskId,
    /// Always within `[0.1, 0.9]`.
    pub score: f64,
    pub reasoning: Vec<String>,
    /// Position in the suggested sequence, starting at 1.
    pub order: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelInfo {
    pub kind: &'static str,
    pub features: u32,
    pub trained_locally: bool,
}

pub const BUILT_IN_MODEL: ModelInfo = ModelInfo {
    kind: "Built-in ADHD Analysis",
    features: 5,
    trained_locally: true,
};

/// Result envelope of one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Analysis {
    pub message: String,
    pub recommendations: Vec<Recommendation>,
    pub timestamp: DateTime<Utc>,
    pub model: ModelInfo,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    #[error("No tasks to analyze")]
    NoTasks,
}

/// Scores one task for the given hour of day (0-23). Returns the clamped score and the
/// reasons that applied, or the fallback reason when none did.
pub fn score(task: &Task, hour: u32) -> (f64, Vec<String>) {
    let focus_time = FOCUS_HOURS.contains(&hour);
    let interesting = task
        .category()
        .is_some_and(|c| INTEREST_CATEGORIES.contains(&c));
    let chore = task.category().is_some_and(|c| CHORE_CATEGORIES.contains(&c));
    let length = text_length(task);
    let short = length < SHORT_TASK_CHARS;

    let mut score = BASE_SCORE;
    if focus_time {
        score += 0.2;
    } else if SLUMP_HOURS.contains(&hour) {
        score -= 0.2;
    }
    match task.priority() {
        Priority::High => score += 0.15,
        Priority::Medium => {}
        Priority::Low => score -= 0.1,
    }
    if interesting {
        score += 0.2;
    } else if chore {
        score -= 0.15;
    }
    if short {
        score += 0.1;
    } else if length > LONG_TASK_CHARS {
        score -= 0.2;
    }

    let mut reasoning = Vec::new();
    if focus_time {
        reasoning.push(REASON_FOCUS_TIME.to_string());
    }
    if interesting {
        reasoning.push(REASON_INTEREST.to_string());
    }
    if short {
        reasoning.push(REASON_SHORT.to_string());
    }
    if task.priority() == Priority::High {
        reasoning.push(REASON_HIGH_PRIORITY.to_string());
    }
    if reasoning.is_empty() {
        reasoning.push(REASON_FALLBACK.to_string());
    }

    (score.clamp(MIN_SCORE, MAX_SCORE), reasoning)
}

/// Up to three incomplete tasks ranked by [`score`] at the hour of `now`.
///
/// Equal scores keep the collection order.
pub fn recommend<Tz: TimeZone>(tasks: &[Task], now: &DateTime<Tz>) -> Vec<Recommendation> {
    let hour = now.hour();
    let mut scored: Vec<(&Task, f64, Vec<String>)> = tasks
        .iter()
        .filter(|task| !task.is_completed())
        .map(|task| {
            let (score, reasoning) = score(task, hour);
            (task, score, reasoning)
        })
        .collect();
    scored.sort_by(|a, b| b.1.total_cmp(&a.1));

    scored
        .into_iter()
        .take(MAX_RECOMMENDATIONS)
        .enumerate()
        .map(|(index, (task, score, reasoning))| Recommendation {
            task_id: task.id().to_string(),
            score,
            reasoning,
            order: index + 1,
        })
        .collect()
}

/// Runs [`recommend`] and wraps the result with a summary message.
pub fn analyze<Tz: TimeZone>(tasks: &[Task], now: &DateTime<Tz>) -> Result<Analysis, AnalysisError> {
    if tasks.is_empty() {
        return Err(AnalysisError::NoTasks);
    }

    let pending = tasks.iter().filter(|task| !task.is_completed()).count();
    let message = if pending == 0 {
        "No incomplete tasks to analyze".to_string()
    } else {
        format!("Analyzed {pending} tasks with built-in ADHD patterns")
    };
    let recommendations = recommend(tasks, now);
    debug!("{} ({} recommendations)", message, recommendations.len());

    Ok(Analysis {
        message,
        recommendations,
        timestamp: now.with_timezone(&Utc),
        model: BUILT_IN_MODEL,
    })
}

impl Analysis {
    /// The recommended tasks in suggested order. Tasks deleted since the analysis are
    /// skipped.
    pub fn recommended_tasks<'a>(&self, tasks: &'a [Task]) -> Vec<&'a Task> {
        self.recommendations
            .iter()
            .filter_map(|rec| tasks.iter().find(|task| task.id() == rec.task_id))
            .collect()
    }

    pub fn recommendation_for(&self, task_id: &str) -> Option<&Recommendation> {
        self.recommendations
            .iter()
            .find(|rec| rec.task_id == task_id)
    }
}

/// Characters in the title and description joined by a space.
fn text_length(task: &Task) -> usize {
    task.title().chars().count() + 1 + task.description().chars().count()
}
