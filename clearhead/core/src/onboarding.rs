use crate::storage::{KeyValueStore, StorageError, TUTORIAL_COMPLETED_KEY};
use tracing::warn;

/// Whether the first-run tutorial should be shown, persisted under its own key.
///
/// The tutorial is shown whenever the key is absent or cannot be read.
pub struct Onboarding<S: KeyValueStore> {
    storage: S,
    show_tutorial: bool,
}

impl<S: KeyValueStore> Onboarding<S> {
    pub fn load(storage: S) -> Self {
        let show_tutorial = match storage.get(TUTORIAL_COMPLETED_KEY) {
            Ok(flag) => flag.is_none(),
            Err(e) => {
                warn!(error = %e, "Failed to read tutorial status");
                true
            }
        };
        Self {
            storage,
            show_tutorial,
        }
    }

    pub fn should_show(&self) -> bool {
        self.show_tutorial
    }

    /// Marks the tutorial as seen. On failure the tutorial keeps showing.
    pub fn complete(&mut self) -> Result<(), StorageError> {
        self.storage
            .set(TUTORIAL_COMPLETED_KEY, "true")
            .inspect_err(|e| warn!(error = %e, "Failed to save tutorial completion"))?;
        self.show_tutorial = false;
        Ok(())
    }

    /// Forgets completion so the tutorial shows again.
    pub fn reset(&mut self) -> Result<(), StorageError> {
        self.storage
            .remove(TUTORIAL_COMPLETED_KEY)
            .inspect_err(|e| warn!(error = %e, "Failed to reset tutorial"))?;
        self.show_tutorial = true;
        Ok(())
    }
}
