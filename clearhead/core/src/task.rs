//! Task records and the priority scale shared by the store, the ranking and the scorer.

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use thiserror::Error;

/// Identifier of a task: its creation time in Unix milliseconds, as a decimal string.
pub type TaskId = String;

/// Ordinal importance of a task, used for display and for ranking.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    #[default]
    Low,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown priority '{0}', expected high, medium or low")]
pub struct ParsePriorityError(String);

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::High, Priority::Medium, Priority::Low];

    /// Ranking weight: high = 3, medium = 2, low = 1.
    pub fn rank(self) -> u8 {
        match self {
            Priority::High => 3,
            Priority::Medium => 2,
            Priority::Low => 1,
        }
    }

    /// One step up, saturating at high.
    pub fn raised(self) -> Self {
        match self {
            Priority::Low => Priority::Medium,
            Priority::Medium | Priority::High => Priority::High,
        }
    }

    /// One step down, saturating at low.
    pub fn lowered(self) -> Self {
        match self {
            Priority::High => Priority::Medium,
            Priority::Medium | Priority::Low => Priority::Low,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }

    /// Dot colour shown next to a task of this priority.
    pub fn color(self) -> &'static str {
        match self {
            Priority::High => "#B85450",
            Priority::Medium => "#D4A574",
            Priority::Low => "#A8A8A8",
        }
    }
}

impl Display for Priority {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = ParsePriorityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "high" => Ok(Priority::High),
            "medium" => Ok(Priority::Medium),
            "low" => Ok(Priority::Low),
            _ => Err(ParsePriorityError(s.to_string())),
        }
    }
}

/// A single to-do entry.
///
/// `completed_at` is present exactly when the task is completed. Timestamps are kept at
/// millisecond precision because that is how they are persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    id: TaskId,
    #[serde(alias = "text")]
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    completed: bool,
    #[serde(default)]
    priority: Priority,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    category: Option<String>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    created_at: DateTime<Utc>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "chrono::serde::ts_milliseconds_option"
    )]
    completed_at: Option<DateTime<Utc>>,
}

impl Task {
    /// Creates an incomplete task with no description and no category.
    pub fn new(
        id: impl Into<TaskId>,
        title: impl Into<String>,
        priority: Priority,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            completed: false,
            priority,
            category: None,
            created_at: created_at.trunc_subsecs(3),
            completed_at: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = normalize_category(Some(category.into()));
        self
    }

    /// Returns the task marked complete at the given time.
    pub fn marked_complete(mut self, at: DateTime<Utc>) -> Self {
        self.set_completed(true, at);
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// Flips completion, stamping or clearing `completed_at`.
    pub(crate) fn toggle(&mut self, now: DateTime<Utc>) {
        self.set_completed(!self.completed, now);
    }

    fn set_completed(&mut self, completed: bool, now: DateTime<Utc>) {
        self.completed = completed;
        self.completed_at = completed.then(|| now.trunc_subsecs(3));
    }

    /// Applies the fields present in `update`. Title and description are trimmed.
    pub(crate) fn apply(&mut self, update: TaskUpdate) {
        if let Some(title) = update.title {
            self.title = title.trim().to_string();
        }
        if let Some(description) = update.description {
            self.description = description.trim().to_string();
        }
        if let Some(priority) = update.priority {
            self.priority = priority;
        }
        if let Some(category) = update.category {
            self.category = normalize_category(category);
        }
    }

    /// Restores the completion invariant on records read from storage.
    pub(crate) fn normalized(mut self) -> Self {
        match (self.completed, self.completed_at) {
            (true, None) => self.completed_at = Some(self.created_at),
            (false, Some(_)) => self.completed_at = None,
            _ => {}
        }
        self
    }
}

/// Draft of a task about to be created.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub category: Option<String>,
}

impl NewTask {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub(crate) fn into_task(self, id: TaskId, created_at: DateTime<Utc>) -> Task {
        Task {
            id,
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            completed: false,
            priority: self.priority,
            category: normalize_category(self.category),
            created_at: created_at.trunc_subsecs(3),
            completed_at: None,
        }
    }
}

/// Partial update of an existing task. `None` leaves a field untouched; for the category,
/// `Some(None)` removes it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<Priority>,
    pub category: Option<Option<String>>,
}

impl TaskUpdate {
    pub fn priority(priority: Priority) -> Self {
        Self {
            priority: Some(priority),
            ..Default::default()
        }
    }
}

fn normalize_category(category: Option<String>) -> Option<String> {
    category
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
}
