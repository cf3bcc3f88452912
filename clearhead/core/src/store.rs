//! The task store: the single owner of the in-memory task collection.
//!
//! Every mutation is applied in memory first and then the whole collection is written
//! to the key-value storage under [`TASKS_KEY`]. A failed write never undoes the
//! mutation; it raises the error banner instead, which stays up until dismissed.

use crate::clock::{Clock, SystemClock};
use crate::gesture::SwipeAction;
use crate::ranking;
use crate::storage::{KeyValueStore, StorageError, TASKS_KEY};
use crate::task::{NewTask, Task, TaskId, TaskUpdate};
use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Rejected user input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please enter a task title!")]
    EmptyTitle,
}

/// Failure to move the collection to or from storage.
#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("Malformed task data: {0}")]
    Format(#[from] serde_json::Error),
}

/// Recoverable persistence failures, shown to the user as a dismissible banner.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to load your tasks. They may not appear until the app is restarted.")]
    Load(#[source] PersistenceError),
    #[error("Failed to save your tasks. Changes may not persist.")]
    Save(#[source] PersistenceError),
    #[error("Failed to clear tasks.")]
    Clear(#[source] StorageError),
}

/// Counts over the whole collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStats {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
    /// Completed share of all tasks, as a rounded percentage.
    pub completion_rate: u8,
}

pub struct TaskStore<S: KeyValueStore, C: Clock = SystemClock> {
    tasks: Vec<Task>,
    storage: S,
    clock: C,
    error: Option<StoreError>,
}

impl<S: KeyValueStore> TaskStore<S> {
    /// Loads the collection from `storage`, stamping new tasks with wall-clock time.
    pub fn load(storage: S) -> Self {
        Self::load_with_clock(storage, SystemClock)
    }
}

impl<S: KeyValueStore, C: Clock> TaskStore<S, C> {
    /// Loads the collection from `storage`.
    ///
    /// A missing key is an empty collection. A key that cannot be read or parsed also
    /// yields an empty collection, with the load error raised on the banner.
    #[tracing::instrument(skip_all)]
    pub fn load_with_clock(storage: S, clock: C) -> Self {
        let (tasks, error) = match read_tasks(&storage) {
            Ok(tasks) => {
                info!("Loaded {} tasks", tasks.len());
                (tasks, None)
            }
            Err(e) => {
                warn!(error = %e, "Failed to load tasks");
                (Vec::new(), Some(StoreError::Load(e)))
            }
        };
        Self {
            tasks,
            storage,
            clock,
            error,
        }
    }

    /// All tasks in insertion order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id() == id)
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// The current banner error, if any.
    pub fn error(&self) -> Option<&StoreError> {
        self.error.as_ref()
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    /// Appends a new incomplete task. A blank title leaves the collection untouched.
    #[tracing::instrument(skip(self))]
    pub fn add(&mut self, new_task: NewTask) -> Result<&[Task], ValidationError> {
        if new_task.title.trim().is_empty() {
            return Err(ValidationError::EmptyTitle);
        }

        let now = self.clock.now();
        let id = self.next_id(now);
        debug!("Adding task {}", id);
        self.tasks.push(new_task.into_task(id, now));
        self.persist();
        Ok(&self.tasks)
    }

    /// Flips completion of the task, stamping or clearing its completion time.
    #[tracing::instrument(skip(self))]
    pub fn toggle(&mut self, id: &str) -> &[Task] {
        let now = self.clock.now();
        match self.tasks.iter_mut().find(|task| task.id() == id) {
            Some(task) => {
                task.toggle(now);
                debug!("Task {} completed: {}", id, task.is_completed());
            }
            None => debug!("No task {} to toggle", id),
        }
        self.persist();
        &self.tasks
    }

    /// Applies a partial update. A blank replacement title is rejected.
    #[tracing::instrument(skip(self))]
    pub fn update(&mut self, id: &str, update: TaskUpdate) -> Result<&[Task], ValidationError> {
        if update
            .title
            .as_deref()
            .is_some_and(|title| title.trim().is_empty())
        {
            return Err(ValidationError::EmptyTitle);
        }

        match self.tasks.iter_mut().find(|task| task.id() == id) {
            Some(task) => task.apply(update),
            None => debug!("No task {} to update", id),
        }
        self.persist();
        Ok(&self.tasks)
    }

    #[tracing::instrument(skip(self))]
    pub fn delete(&mut self, id: &str) -> &[Task] {
        let before = self.tasks.len();
        self.tasks.retain(|task| task.id() != id);
        debug!("Deleted {} task(s) with id {}", before - self.tasks.len(), id);
        self.persist();
        &self.tasks
    }

    /// Applies a committed row swipe: left deletes, right toggles completion.
    pub fn apply_swipe(&mut self, id: &str, action: SwipeAction) -> &[Task] {
        match action {
            SwipeAction::Delete => self.delete(id),
            SwipeAction::Complete => self.toggle(id),
        }
    }

    /// Removes every task and the persisted key.
    ///
    /// The collection is emptied even if the key cannot be removed.
    #[tracing::instrument(skip(self))]
    pub fn clear_all(&mut self) -> &[Task] {
        self.tasks.clear();
        if let Err(e) = self.storage.remove(TASKS_KEY) {
            warn!(error = %e, "Failed to clear tasks");
            self.error = Some(StoreError::Clear(e));
        }
        &self.tasks
    }

    /// The three incomplete tasks to surface on the home view.
    pub fn top_three(&self) -> Vec<&Task> {
        ranking::top_three(&self.tasks)
    }

    pub fn stats(&self) -> TaskStats {
        let total = self.tasks.len();
        let completed = self.tasks.iter().filter(|task| task.is_completed()).count();
        let completion_rate = if total > 0 {
            (completed as f64 / total as f64 * 100.0).round() as u8
        } else {
            0
        };
        TaskStats {
            total,
            completed,
            pending: total - completed,
            completion_rate,
        }
    }

    fn persist(&mut self) {
        if let Err(e) = write_tasks(&mut self.storage, &self.tasks) {
            warn!(error = %e, "Failed to save tasks");
            self.error = Some(StoreError::Save(e));
        }
    }

    /// Millisecond timestamp of `now`, bumped until it does not collide.
    fn next_id(&self, now: DateTime<Utc>) -> TaskId {
        let mut millis = now.timestamp_millis();
        loop {
            let candidate = millis.to_string();
            if self.get(&candidate).is_none() {
                return candidate;
            }
            millis += 1;
        }
    }
}

fn read_tasks<S: KeyValueStore>(storage: &S) -> Result<Vec<Task>, PersistenceError> {
    let Some(json) = storage.get(TASKS_KEY)? else {
        return Ok(Vec::new());
    };
    let tasks: Vec<Task> = serde_json::from_str(&json)?;
    Ok(tasks.into_iter().map(Task::normalized).collect())
}

fn write_tasks<S: KeyValueStore>(storage: &mut S, tasks: &[Task]) -> Result<(), PersistenceError> {
    let json = serde_json::to_string(tasks)?;
    storage.set(TASKS_KEY, &json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gesture::SwipeGesture;
    use crate::storage::{MemoryStorage, MockKeyValueStore};
    use crate::task::Priority;
    use chrono::TimeZone;
    use std::cell::Cell;
    use std::rc::Rc;

    fn at(millis: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(millis).unwrap()
    }

    /// A store over memory storage whose clock is driven by the returned handle.
    fn store_at(
        millis: i64,
    ) -> (
        TaskStore<MemoryStorage, impl Clock>,
        Rc<Cell<DateTime<Utc>>>,
    ) {
        let now = Rc::new(Cell::new(at(millis)));
        let handle = Rc::clone(&now);
        let store = TaskStore::load_with_clock(MemoryStorage::new(), move || now.get());
        (store, handle)
    }

    fn failing_writes() -> MockKeyValueStore {
        let mut storage = MockKeyValueStore::new();
        storage.expect_get().returning(|_| Ok(None));
        storage.expect_set().returning(|key, _| {
            Err(StorageError::Write {
                key: key.to_string(),
                source: std::io::Error::other("disk full"),
            })
        });
        storage.expect_remove().returning(|key| {
            Err(StorageError::Remove {
                key: key.to_string(),
                source: std::io::Error::other("disk full"),
            })
        });
        storage
    }

    #[test]
    fn load_from_empty_storage_is_empty_without_error() {
        let store = TaskStore::load(MemoryStorage::new());

        assert!(store.tasks().is_empty());
        assert!(store.error().is_none());
    }

    #[test]
    fn add_appends_trimmed_task_with_time_derived_id() {
        let (mut store, _) = store_at(1_700_000_000_123);

        let tasks = store
            .add(
                NewTask::new("  Buy milk ")
                    .with_description(" 2 liters ")
                    .with_priority(Priority::Medium)
                    .with_category("Errands"),
            )
            .unwrap();

        assert_eq!(tasks.len(), 1);
        let task = &tasks[0];
        assert_eq!(task.id(), "1700000000123");
        assert_eq!(task.title(), "Buy milk");
        assert_eq!(task.description(), "2 liters");
        assert_eq!(task.priority(), Priority::Medium);
        assert_eq!(task.category(), Some("Errands"));
        assert!(!task.is_completed());
        assert_eq!(task.created_at(), at(1_700_000_000_123));
    }

    #[test]
    fn ids_stay_unique_within_the_same_millisecond() {
        let (mut store, _) = store_at(5_000);

        store.add(NewTask::new("one")).unwrap();
        store.add(NewTask::new("two")).unwrap();
        store.add(NewTask::new("three")).unwrap();

        let ids: Vec<&str> = store.tasks().iter().map(Task::id).collect();
        assert_eq!(ids, vec!["5000", "5001", "5002"]);
    }

    #[test]
    fn add_with_blank_title_leaves_store_unchanged() {
        let (mut store, _) = store_at(1);

        let result = store.add(NewTask::new("   "));

        assert_eq!(result, Err(ValidationError::EmptyTitle));
        assert!(store.tasks().is_empty());
        assert!(store.storage().is_empty(), "nothing should be persisted");
    }

    #[test]
    fn every_mutation_persists_the_whole_collection() {
        let (mut store, now) = store_at(1_000);
        store.add(NewTask::new("first")).unwrap();
        now.set(at(2_000));
        store.add(NewTask::new("second")).unwrap();
        store.toggle("1000");

        let reloaded = TaskStore::load(store.storage().clone());

        assert_eq!(reloaded.tasks(), store.tasks());
        assert!(reloaded.get("1000").unwrap().is_completed());
    }

    #[test]
    fn toggle_sets_and_clears_completion_time() {
        let (mut store, now) = store_at(1_000);
        store.add(NewTask::new("task")).unwrap();

        now.set(at(4_000));
        store.toggle("1000");
        assert_eq!(store.get("1000").unwrap().completed_at(), Some(at(4_000)));

        now.set(at(9_000));
        store.toggle("1000");
        let task = store.get("1000").unwrap();
        assert!(!task.is_completed());
        assert_eq!(task.completed_at(), None);
    }

    #[test]
    fn update_changes_fields_but_not_identity() {
        let (mut store, _) = store_at(1_000);
        store.add(NewTask::new("draft")).unwrap();

        store
            .update(
                "1000",
                TaskUpdate {
                    title: Some("final".to_string()),
                    priority: Some(Priority::High),
                    category: Some(Some("Work".to_string())),
                    ..Default::default()
                },
            )
            .unwrap();

        let task = store.get("1000").unwrap();
        assert_eq!(task.title(), "final");
        assert_eq!(task.priority(), Priority::High);
        assert_eq!(task.category(), Some("Work"));
        assert_eq!(task.created_at(), at(1_000));
    }

    #[test]
    fn update_with_blank_title_is_rejected() {
        let (mut store, _) = store_at(1_000);
        store.add(NewTask::new("keep me")).unwrap();

        let result = store.update(
            "1000",
            TaskUpdate {
                title: Some(" ".to_string()),
                ..Default::default()
            },
        );

        assert_eq!(result, Err(ValidationError::EmptyTitle));
        assert_eq!(store.get("1000").unwrap().title(), "keep me");
    }

    #[test]
    fn mutations_on_unknown_ids_change_nothing() {
        let (mut store, _) = store_at(1_000);
        store.add(NewTask::new("only")).unwrap();
        let before = store.tasks().to_vec();

        store.toggle("404");
        store.delete("404");
        store.update("404", TaskUpdate::priority(Priority::High)).unwrap();

        assert_eq!(store.tasks(), before.as_slice());
    }

    #[test]
    fn swipe_left_past_threshold_removes_task() {
        let (mut store, _) = store_at(1_000);
        store.add(NewTask::new("swipe me")).unwrap();
        let mut swipe = SwipeGesture::default();

        swipe.begin();
        swipe.track(-70.0, 0.0);
        let action = swipe.release().unwrap();
        store.apply_swipe("1000", action);

        assert!(store.tasks().is_empty());
    }

    #[test]
    fn swipe_right_past_threshold_completes_task_now() {
        let (mut store, now) = store_at(1_000);
        store.add(NewTask::new("swipe me")).unwrap();
        let mut swipe = SwipeGesture::default();

        now.set(at(8_000));
        swipe.begin();
        swipe.track(70.0, 0.0);
        let action = swipe.release().unwrap();
        store.apply_swipe("1000", action);

        let task = store.get("1000").unwrap();
        assert!(task.is_completed());
        assert_eq!(task.completed_at(), Some(at(8_000)));
    }

    #[test]
    fn save_failure_keeps_change_in_memory_and_raises_banner() {
        let mut store = TaskStore::load_with_clock(failing_writes(), || at(1_000));

        store.add(NewTask::new("still here")).unwrap();

        assert_eq!(store.tasks().len(), 1);
        assert!(matches!(store.error(), Some(StoreError::Save(_))));
        assert_eq!(
            store.error().unwrap().to_string(),
            "Failed to save your tasks. Changes may not persist."
        );

        store.dismiss_error();
        assert!(store.error().is_none());
    }

    #[test]
    fn later_successful_save_keeps_banner_until_dismissed() {
        let mut seq = mockall::Sequence::new();
        let mut storage = MockKeyValueStore::new();
        storage.expect_get().returning(|_| Ok(None));
        storage
            .expect_set()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|key, _| {
                Err(StorageError::Write {
                    key: key.to_string(),
                    source: std::io::Error::other("disk full"),
                })
            });
        storage
            .expect_set()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(()));
        let mut store = TaskStore::load_with_clock(storage, || at(1_000));

        store.add(NewTask::new("first")).unwrap();
        store.toggle("1000");

        assert!(store.get("1000").unwrap().is_completed());
        assert!(matches!(store.error(), Some(StoreError::Save(_))));

        store.dismiss_error();
        assert!(store.error().is_none());
    }

    #[test]
    fn clear_all_empties_collection_even_when_storage_fails() {
        let mut store = TaskStore::load_with_clock(failing_writes(), || at(1_000));
        store.add(NewTask::new("a")).unwrap();
        store.dismiss_error();

        store.clear_all();

        assert!(store.tasks().is_empty());
        assert!(matches!(store.error(), Some(StoreError::Clear(_))));
    }

    #[test]
    fn clear_all_removes_persisted_key() {
        let (mut store, _) = store_at(1_000);
        store.add(NewTask::new("a")).unwrap();

        store.clear_all();

        assert_eq!(store.storage().get(TASKS_KEY).unwrap(), None);
    }

    #[test]
    fn unreadable_storage_loads_empty_with_load_error() {
        let mut storage = MockKeyValueStore::new();
        storage.expect_get().returning(|key| {
            Err(StorageError::Read {
                key: key.to_string(),
                source: std::io::Error::other("corrupted"),
            })
        });

        let store = TaskStore::load(storage);

        assert!(store.tasks().is_empty());
        assert!(matches!(
            store.error(),
            Some(StoreError::Load(PersistenceError::Storage(_)))
        ));
    }

    #[test]
    fn malformed_json_loads_empty_with_load_error() {
        let store = TaskStore::load(MemoryStorage::with_entry(TASKS_KEY, "{not json"));

        assert!(store.tasks().is_empty());
        assert!(matches!(
            store.error(),
            Some(StoreError::Load(PersistenceError::Format(_)))
        ));
    }

    #[test]
    fn stats_report_rounded_completion_rate() {
        let (mut store, now) = store_at(1_000);
        for (i, title) in ["a", "b", "c"].iter().enumerate() {
            now.set(at(1_000 + i as i64));
            store.add(NewTask::new(*title)).unwrap();
        }
        store.toggle("1000");

        let stats = store.stats();

        assert_eq!(
            stats,
            TaskStats {
                total: 3,
                completed: 1,
                pending: 2,
                completion_rate: 33,
            }
        );
    }

    #[test]
    fn stats_of_empty_store_are_zero() {
        let store = TaskStore::load(MemoryStorage::new());

        assert_eq!(store.stats().completion_rate, 0);
        assert_eq!(store.stats().total, 0);
    }
}
