//! Single-slot notification with timed exit staging.

use std::time::{Duration, Instant};

/// How long a toast stays fully visible before its exit starts.
pub const TOAST_VISIBLE_FOR: Duration = Duration::from_millis(3500);
/// Length of the exit transition before the toast is removed.
pub const TOAST_EXIT_FOR: Duration = Duration::from_millis(250);

/// Coarse lifecycle phase of the toast.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastPhase {
    Idle,
    Showing,
    Exiting,
}

/// Read-only snapshot handed to the renderer.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ToastState {
    pub message: Option<String>,
    pub visible: bool,
    pub exiting: bool,
}

// The deadline carried by each stage is the one outstanding delayed action.
#[derive(Clone, Debug, PartialEq, Eq)]
enum Stage {
    Idle,
    Showing { message: String, exit_at: Instant },
    Exiting { message: String, remove_at: Instant },
}

/// Drives `Idle -> Showing -> Exiting -> Idle` from explicit clock readings.
#[derive(Clone, Debug)]
pub struct ToastController {
    stage: Stage,
    visible_for: Duration,
    exit_for: Duration,
}

impl Default for ToastController {
    fn default() -> Self {
        Self::new(TOAST_VISIBLE_FOR, TOAST_EXIT_FOR)
    }
}

impl ToastController {
    pub fn new(visible_for: Duration, exit_for: Duration) -> Self {
        Self {
            stage: Stage::Idle,
            visible_for,
            exit_for,
        }
    }

    /// Show `message`, replacing whatever is on screen and restarting the timer.
    pub fn show(&mut self, message: impl Into<String>, now: Instant) {
        self.stage = Stage::Showing {
            message: message.into(),
            exit_at: now + self.visible_for,
        };
    }

    /// Apply every transition that is due at `now`.
    pub fn tick(&mut self, now: Instant) {
        loop {
            match &self.stage {
                Stage::Showing { message, exit_at } if now >= *exit_at => {
                    self.stage = Stage::Exiting {
                        message: message.clone(),
                        remove_at: *exit_at + self.exit_for,
                    };
                }
                Stage::Exiting { remove_at, .. } if now >= *remove_at => {
                    self.stage = Stage::Idle;
                }
                _ => return,
            }
        }
    }

    pub fn phase(&self) -> ToastPhase {
        match self.stage {
            Stage::Idle => ToastPhase::Idle,
            Stage::Showing { .. } => ToastPhase::Showing,
            Stage::Exiting { .. } => ToastPhase::Exiting,
        }
    }

    pub fn message(&self) -> Option<&str> {
        match &self.stage {
            Stage::Idle => None,
            Stage::Showing { message, .. } | Stage::Exiting { message, .. } => Some(message),
        }
    }

    pub fn is_visible(&self) -> bool {
        !matches!(self.stage, Stage::Idle)
    }

    pub fn is_exiting(&self) -> bool {
        matches!(self.stage, Stage::Exiting { .. })
    }

    /// When the pending transition fires, if any.
    pub fn next_deadline(&self) -> Option<Instant> {
        match &self.stage {
            Stage::Idle => None,
            Stage::Showing { exit_at, .. } => Some(*exit_at),
            Stage::Exiting { remove_at, .. } => Some(*remove_at),
        }
    }

    pub fn snapshot(&self) -> ToastState {
        ToastState {
            message: self.message().map(str::to_string),
            visible: self.is_visible(),
            exiting: self.is_exiting(),
        }
    }
}
