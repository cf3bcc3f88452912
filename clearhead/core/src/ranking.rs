//! Selection and ordering of tasks for the home and all-tasks views.

use crate::task::Task;

/// How many tasks the home view surfaces.
pub const TOP_COUNT: usize = 3;

/// Up to three incomplete tasks, highest priority first, newest first within a priority.
pub fn top_three(tasks: &[Task]) -> Vec<&Task> {
    let mut ranked = pending(tasks);
    ranked.sort_by(|a, b| {
        b.priority()
            .rank()
            .cmp(&a.priority().rank())
            .then_with(|| b.created_at().cmp(&a.created_at()))
    });
    ranked.truncate(TOP_COUNT);
    ranked
}

/// Incomplete tasks in insertion order.
pub fn pending(tasks: &[Task]) -> Vec<&Task> {
    tasks.iter().filter(|task| !task.is_completed()).collect()
}

/// Completed tasks in insertion order.
pub fn completed(tasks: &[Task]) -> Vec<&Task> {
    tasks.iter().filter(|task| task.is_completed()).collect()
}

/// Completed tasks, most recently completed first.
pub fn completed_newest_first(tasks: &[Task]) -> Vec<&Task> {
    let mut done = completed(tasks);
    done.sort_by(|a, b| b.completed_at().cmp(&a.completed_at()));
    done
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::Priority;
    use chrono::{DateTime, TimeZone, Utc};

    fn at(millis: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(millis).unwrap()
    }

    fn task(id: &str, priority: Priority, created: i64) -> Task {
        Task::new(id, format!("task {id}"), priority, at(created))
    }

    fn ids<'a>(tasks: &[&'a Task]) -> Vec<&'a str> {
        tasks.iter().map(|task| task.id()).collect()
    }

    #[test]
    fn orders_distinct_priorities_high_medium_low() {
        let tasks = vec![
            task("low", Priority::Low, 1),
            task("high", Priority::High, 2),
            task("medium", Priority::Medium, 3),
        ];

        assert_eq!(ids(&top_three(&tasks)), vec!["high", "medium", "low"]);
    }

    #[test]
    fn breaks_priority_ties_newest_first() {
        let tasks = vec![
            task("old", Priority::High, 10),
            task("newest", Priority::High, 30),
            task("middle", Priority::High, 20),
        ];

        assert_eq!(ids(&top_three(&tasks)), vec!["newest", "middle", "old"]);
    }

    #[test]
    fn never_returns_completed_tasks() {
        let tasks = vec![
            task("done", Priority::High, 1).marked_complete(at(5)),
            task("a", Priority::Low, 2),
            task("b", Priority::Medium, 3),
            task("c", Priority::Low, 4),
            task("d", Priority::Low, 5),
        ];

        let top = top_three(&tasks);

        assert_eq!(top.len(), TOP_COUNT);
        assert!(top.iter().all(|task| !task.is_completed()));
        assert_eq!(ids(&top), vec!["b", "d", "c"]);
    }

    #[test]
    fn returns_fewer_when_few_are_pending() {
        let tasks = vec![
            task("a", Priority::Low, 1),
            task("b", Priority::High, 2).marked_complete(at(3)),
        ];

        assert_eq!(ids(&top_three(&tasks)), vec!["a"]);
        assert!(top_three(&[]).is_empty());
    }

    #[test]
    fn completed_history_is_most_recent_first() {
        let tasks = vec![
            task("first", Priority::Low, 1).marked_complete(at(100)),
            task("open", Priority::Low, 2),
            task("last", Priority::Low, 3).marked_complete(at(300)),
            task("second", Priority::Low, 4).marked_complete(at(200)),
        ];

        assert_eq!(
            ids(&completed_newest_first(&tasks)),
            vec!["last", "second", "first"]
        );
        assert_eq!(ids(&pending(&tasks)), vec!["open"]);
        assert_eq!(ids(&completed(&tasks)), vec!["first", "last", "second"]);
    }
}
