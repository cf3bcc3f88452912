//! Interpretation of swipe, drag and fling samples as discrete actions.
//!
//! Row swipes run through [`SwipeGesture`], a small state machine fed with translation
//! samples. Vertical drags in the all-tasks view step a task's priority, and fast
//! container flings open one of the auxiliary views.

use crate::task::Priority;
use serde::{Deserialize, Serialize};

/// Distances are in layout units, velocities in units per second.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureThresholds {
    /// Horizontal row offset beyond which a release commits delete or complete.
    pub swipe_threshold: f64,
    /// Vertical drag beyond which a release changes priority by one step.
    pub priority_drag_threshold: f64,
    /// Container fling velocity that opens an auxiliary view.
    pub fling_velocity: f64,
    /// Upward list scroll velocity that opens the all-tasks view.
    pub scroll_velocity: f64,
}

impl Default for GestureThresholds {
    fn default() -> Self {
        Self {
            swipe_threshold: 60.0,
            priority_drag_threshold: 50.0,
            fling_velocity: 500.0,
            scroll_velocity: 2.0,
        }
    }
}

/// What a committed row swipe does to its task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeAction {
    /// Swiped left past the threshold.
    Delete,
    /// Swiped right past the threshold. Applied as a completion toggle.
    Complete,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SwipeState {
    Idle,
    Dragging { origin: f64, offset: f64 },
    Committed(SwipeAction),
}

/// Horizontal swipe on a task row.
///
/// `Idle -> Dragging -> Committed(..)` when released past the threshold, or back to
/// `Idle` otherwise. A committed swipe returns to `Idle` through [`SwipeGesture::settle`].
#[derive(Debug, Clone, PartialEq)]
pub struct SwipeGesture {
    state: SwipeState,
    threshold: f64,
}

impl Default for SwipeGesture {
    fn default() -> Self {
        Self::new(GestureThresholds::default().swipe_threshold)
    }
}

impl SwipeGesture {
    pub fn new(threshold: f64) -> Self {
        Self {
            state: SwipeState::Idle,
            threshold,
        }
    }

    pub fn state(&self) -> SwipeState {
        self.state
    }

    /// Current horizontal offset of the row.
    pub fn offset(&self) -> f64 {
        match self.state {
            SwipeState::Dragging { offset, .. } => offset,
            SwipeState::Idle | SwipeState::Committed(_) => 0.0,
        }
    }

    /// Starts a drag from the current offset.
    pub fn begin(&mut self) {
        let origin = self.offset();
        self.state = SwipeState::Dragging {
            origin,
            offset: origin,
        };
    }

    /// Feeds the translation accumulated since [`begin`](Self::begin). Samples that are
    /// more vertical than horizontal are ignored so that list scrolling does not move
    /// the row.
    pub fn track(&mut self, dx: f64, dy: f64) {
        if let SwipeState::Dragging { origin, offset } = &mut self.state {
            if dx.abs() > dy.abs() {
                *offset = *origin + dx;
            }
        }
    }

    /// Ends the drag. Returns the committed action, or `None` when the row springs back.
    pub fn release(&mut self) -> Option<SwipeAction> {
        let SwipeState::Dragging { offset, .. } = self.state else {
            return None;
        };
        let action = if offset < -self.threshold {
            Some(SwipeAction::Delete)
        } else if offset > self.threshold {
            Some(SwipeAction::Complete)
        } else {
            None
        };
        self.state = action.map_or(SwipeState::Idle, SwipeState::Committed);
        action
    }

    /// Returns a committed swipe to rest once its action has been applied.
    pub fn settle(&mut self) {
        self.state = SwipeState::Idle;
    }
}

/// New priority after a vertical drag of `dy` in the all-tasks view, or `None` when
/// the drag stayed within the threshold. Up raises, down lowers, one step per release.
pub fn drag_priority(current: Priority, dy: f64, threshold: f64) -> Option<Priority> {
    if dy < -threshold {
        Some(current.raised())
    } else if dy > threshold {
        Some(current.lowered())
    } else {
        None
    }
}

/// Auxiliary views reachable by container gestures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surface {
    AllTasks,
    Settings,
    Recommendations,
}

/// View opened by a container fling with the given release velocity.
pub fn route_fling(vx: f64, vy: f64, thresholds: &GestureThresholds) -> Option<Surface> {
    let limit = thresholds.fling_velocity;
    if vx > limit {
        Some(Surface::Settings)
    } else if vx < -limit {
        Some(Surface::Recommendations)
    } else if vy < -limit {
        Some(Surface::AllTasks)
    } else {
        None
    }
}

/// View opened by scrolling the home list upward fast enough.
pub fn route_scroll(vy: f64, thresholds: &GestureThresholds) -> Option<Surface> {
    (vy < -thresholds.scroll_velocity).then_some(Surface::AllTasks)
}
