//! Deferred install prompt.
//!
//! The platform offers an install prompt once; the app captures it and
//! replays it when the user asks. The captured prompt lives in a single slot
//! owned by [`InstallController`] and is consumed by the first
//! [`InstallController::prompt`] call. Dismissing the offer only hides it;
//! the captured prompt stays usable.

use std::fmt;

use async_trait::async_trait;
use tracing::info;

/// The user's answer to an install prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallOutcome {
    /// The user installed the app.
    Accepted,
    /// The user closed the prompt.
    Dismissed,
}

impl fmt::Display for InstallOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Accepted => write!(f, "accepted"),
            Self::Dismissed => write!(f, "dismissed"),
        }
    }
}

/// A captured platform install prompt.
#[async_trait]
pub trait InstallPrompt: Send {
    /// Show the prompt and wait for the user's choice.
    async fn prompt(&mut self) -> InstallOutcome;
}

/// Owns the deferred install prompt.
#[derive(Default)]
pub struct InstallController {
    deferred: Option<Box<dyn InstallPrompt>>,
    offer_visible: bool,
    installed: bool,
}

impl fmt::Debug for InstallController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InstallController")
            .field("installable", &self.deferred.is_some())
            .field("offer_visible", &self.offer_visible)
            .field("installed", &self.installed)
            .finish()
    }
}

impl InstallController {
    /// Create a controller with nothing captured.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a prompt offered by the platform, replacing any earlier one.
    pub fn capture(&mut self, prompt: Box<dyn InstallPrompt>) {
        info!("App is installable");
        self.deferred = Some(prompt);
        self.offer_visible = true;
    }

    /// Check whether an install prompt can be shown.
    #[must_use]
    pub fn is_installable(&self) -> bool {
        self.deferred.is_some()
    }

    /// Check whether the platform reported the app as installed.
    #[must_use]
    pub fn is_installed(&self) -> bool {
        self.installed
    }

    /// Check whether the install offer should be shown.
    #[must_use]
    pub fn is_offer_visible(&self) -> bool {
        self.offer_visible && self.deferred.is_some()
    }

    /// Hide the install offer. The captured prompt is kept.
    pub fn dismiss(&mut self) {
        self.offer_visible = false;
    }

    /// Show the captured prompt, consuming it.
    ///
    /// Returns `None` if nothing was captured.
    pub async fn prompt(&mut self) -> Option<InstallOutcome> {
        self.offer_visible = false;
        let Some(mut prompt) = self.deferred.take() else {
            info!("App cannot be installed at this time");
            return None;
        };

        let outcome = prompt.prompt().await;
        info!("User {outcome} the install prompt");
        Some(outcome)
    }

    /// Record that the app was installed.
    pub fn mark_installed(&mut self) {
        info!("App was installed");
        self.installed = true;
        self.offer_visible = false;
        self.deferred = None;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    use super::*;

    struct FakePrompt {
        outcome: InstallOutcome,
        shown: Arc<AtomicU32>,
    }

    #[async_trait]
    impl InstallPrompt for FakePrompt {
        async fn prompt(&mut self) -> InstallOutcome {
            self.shown.fetch_add(1, Ordering::SeqCst);
            self.outcome
        }
    }

    fn fake(outcome: InstallOutcome) -> (Box<dyn InstallPrompt>, Arc<AtomicU32>) {
        let shown = Arc::new(AtomicU32::new(0));
        (
            Box::new(FakePrompt {
                outcome,
                shown: Arc::clone(&shown),
            }),
            shown,
        )
    }

    #[tokio::test]
    async fn test_prompt_without_capture() {
        let mut controller = InstallController::new();
        assert!(!controller.is_installable());
        assert_eq!(controller.prompt().await, None);
    }

    #[tokio::test]
    async fn test_prompt_consumes_slot() {
        let mut controller = InstallController::new();
        let (prompt, shown) = fake(InstallOutcome::Accepted);
        controller.capture(prompt);
        assert!(controller.is_installable());

        assert_eq!(controller.prompt().await, Some(InstallOutcome::Accepted));
        assert_eq!(controller.prompt().await, None);
        assert_eq!(shown.load(Ordering::SeqCst), 1);
        assert!(!controller.is_installable());
    }

    #[tokio::test]
    async fn test_capture_replaces_previous() {
        let mut controller = InstallController::new();
        let (first, first_shown) = fake(InstallOutcome::Accepted);
        let (second, second_shown) = fake(InstallOutcome::Dismissed);
        controller.capture(first);
        controller.capture(second);

        assert_eq!(controller.prompt().await, Some(InstallOutcome::Dismissed));
        assert_eq!(first_shown.load(Ordering::SeqCst), 0);
        assert_eq!(second_shown.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_dismiss_hides_offer_but_keeps_prompt() {
        let mut controller = InstallController::new();
        let (prompt, shown) = fake(InstallOutcome::Accepted);
        controller.capture(prompt);
        assert!(controller.is_offer_visible());

        controller.dismiss();
        assert!(!controller.is_offer_visible());
        assert!(controller.is_installable());

        assert_eq!(controller.prompt().await, Some(InstallOutcome::Accepted));
        assert_eq!(shown.load(Ordering::SeqCst), 1);
        assert!(!controller.is_offer_visible());
    }

    #[tokio::test]
    async fn test_installed_clears_slot() {
        let mut controller = InstallController::new();
        let (prompt, _) = fake(InstallOutcome::Accepted);
        controller.capture(prompt);
        controller.mark_installed();
        assert!(controller.is_installed());
        assert!(!controller.is_installable());
    }

    #[test]
    fn test_outcome_display() {
        assert_eq!(InstallOutcome::Accepted.to_string(), "accepted");
        assert_eq!(InstallOutcome::Dismissed.to_string(), "dismissed");
    }
}
