//! Page-side update detection.
//!
//! When a new worker generation finishes installing while an older one still
//! controls the page, the user is offered an update. Confirming posts
//! `SKIP_WAITING` to the new worker; the page reloads once when control
//! changes hands.

use tracing::info;

use super::worker::{WorkerMessage, WorkerState};

/// Tracks update availability for one page.
#[derive(Debug, Clone, Default)]
pub struct UpdateWatcher {
    has_controller: bool,
    update_available: bool,
    refreshing: bool,
}

impl UpdateWatcher {
    /// Create a watcher. `has_controller` is whether a worker already
    /// controls the page.
    #[must_use]
    pub fn new(has_controller: bool) -> Self {
        Self {
            has_controller,
            ..Self::default()
        }
    }

    /// Feed a state change of the installing worker.
    ///
    /// Returns `true` when this change makes an update available. A first
    /// install with no controller is not an update.
    pub fn on_state_change(&mut self, state: WorkerState) -> bool {
        if state != WorkerState::Installed || !self.has_controller || self.update_available {
            return false;
        }
        info!("New version available");
        self.update_available = true;
        true
    }

    /// Check whether an update is waiting for confirmation.
    #[must_use]
    pub fn is_update_available(&self) -> bool {
        self.update_available
    }

    /// The user accepted the update.
    ///
    /// Returns the message to post to the waiting worker, or `None` if no
    /// update is pending.
    pub fn confirm_update(&mut self) -> Option<WorkerMessage> {
        if !self.update_available || !self.has_controller {
            return None;
        }
        self.update_available = false;
        Some(WorkerMessage::SkipWaiting)
    }

    /// A new worker took control. Returns `true` if the page should reload;
    /// only the first change reloads.
    pub fn on_controller_change(&mut self) -> bool {
        self.has_controller = true;
        if self.refreshing {
            return false;
        }
        self.refreshing = true;
        info!("Controller changed, reloading");
        true
    }
}
