//! Core task logic for ClearHead: an owned task store with whole-collection
//! persistence, top-three ranking, rule-based recommendations and gesture
//! interpretation.
pub mod catalog;
pub mod clock;
pub mod config;
pub mod form;
pub mod gesture;
pub mod onboarding;
pub mod ranking;
pub mod recommend;
pub mod storage;
pub mod store;
pub mod task;

pub use clock::{Clock, SystemClock};
pub use self::config::Config;
pub use form::TaskForm;
pub use gesture::{GestureThresholds, Surface, SwipeAction, SwipeGesture, SwipeState};
pub use onboarding::Onboarding;
pub use recommend::{Analysis, AnalysisError, Recommendation};
pub use storage::{FileStorage, KeyValueStore, MemoryStorage, StorageError};
pub use store::{PersistenceError, StoreError, TaskStats, TaskStore, ValidationError};
pub use task::{NewTask, ParsePriorityError, Priority, Task, TaskId, TaskUpdate};
