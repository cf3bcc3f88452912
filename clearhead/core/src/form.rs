//! State of the add/edit task form.

use crate::clock::Clock;
use crate::storage::KeyValueStore;
use crate::store::{TaskStore, ValidationError};
use crate::task::{NewTask, Priority, Task, TaskId, TaskUpdate};
use tracing::debug;

/// Draft being typed by the user, plus the inline warning shown above it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskForm {
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub category: Option<String>,
    warning: Option<String>,
    editing: Option<TaskId>,
}

impl TaskForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// The inline validation message, if the last submit was rejected.
    pub fn warning(&self) -> Option<&str> {
        self.warning.as_deref()
    }

    /// Id of the task being edited, or `None` when composing a new one.
    pub fn editing(&self) -> Option<&str> {
        self.editing.as_deref()
    }

    /// Loads `task` into the draft and switches to edit mode.
    pub fn edit(&mut self, task: &Task) {
        self.title = task.title().to_string();
        self.description = task.description().to_string();
        self.priority = task.priority();
        self.category = task.category().map(str::to_string);
        self.warning = None;
        self.editing = Some(task.id().to_string());
    }

    /// Resets every field, leaving edit mode.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Adds the draft to `store`, or applies it to the edited task.
    ///
    /// A blank title keeps the draft and sets the warning; the store is not touched.
    /// On success the form is cleared.
    pub fn submit<S: KeyValueStore, C: Clock>(
        &mut self,
        store: &mut TaskStore<S, C>,
    ) -> Result<(), ValidationError> {
        let result = match self.editing.clone() {
            Some(id) => store
                .update(
                    &id,
                    TaskUpdate {
                        title: Some(self.title.clone()),
                        description: Some(self.description.clone()),
                        priority: Some(self.priority),
                        category: Some(self.category.clone()),
                    },
                )
                .map(|_| ()),
            None => store
                .add(NewTask {
                    title: self.title.clone(),
                    description: self.description.clone(),
                    priority: self.priority,
                    category: self.category.clone(),
                })
                .map(|_| ()),
        };

        match result {
            Ok(()) => {
                self.clear();
                Ok(())
            }
            Err(e) => {
                debug!("Rejected submit: {}", e);
                self.warning = Some(e.to_string());
                Err(e)
            }
        }
    }
}
