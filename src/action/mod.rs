//! # Action Module
//!
//! Menu actions and the runners that execute them.
//!
//! ## Actions
//!
//! | Action | Id | Runner |
//! |--------|----|--------|
//! | Install Niri | `install` | [`ActionRunner::install`] |
//! | Configure Niri | `configure` | [`ActionRunner::configure`] |
//! | Validate Config | `validate` | [`ActionRunner::validate`] |
//! | Save Logs | `save-logs` | [`ActionRunner::save_logs`] |
//! | Exit | `exit` | none, handled by the controller |
//!
//! Every runner reports back through exactly one [`ActionCompleted`] event
//! carrying an [`ActionResult`]. Runners never touch session state.

pub mod command;
pub mod runner;

pub use command::{CommandOutput, CommandRunner, SystemCommandRunner};
pub use runner::{ActionRunner, RunnerConfig};

/// A selectable menu entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Install,
    Configure,
    Validate,
    SaveLogs,
    Exit,
}

impl Action {
    /// All actions in menu display order.
    pub fn all() -> &'static [Action] {
        &[
            Action::Install,
            Action::Configure,
            Action::Validate,
            Action::SaveLogs,
            Action::Exit,
        ]
    }

    pub fn id(self) -> &'static str {
        match self {
            Action::Install => "install",
            Action::Configure => "configure",
            Action::Validate => "validate",
            Action::SaveLogs => "save-logs",
            Action::Exit => "exit",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Action::Install => "Install Niri",
            Action::Configure => "Configure Niri",
            Action::Validate => "Validate Config",
            Action::SaveLogs => "Save Logs",
            Action::Exit => "Exit",
        }
    }

    /// Install-class actions end on the Result screen instead of the menu.
    pub fn shows_result_screen(self) -> bool {
        matches!(self, Action::Install)
    }
}

/// Outcome of a single runner invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResult {
    pub message: String,
    pub succeeded: bool,
}

impl ActionResult {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            succeeded: true,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            succeeded: false,
        }
    }
}

/// Work handed from the controller to a runner.
///
/// `log_snapshot` is a copy of the session log taken at dispatch time, so the
/// save-logs runner never reads live session state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionRequest {
    pub action: Action,
    pub log_snapshot: Vec<String>,
}

/// Completion event sent back to the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionCompleted {
    pub action: Action,
    pub result: ActionResult,
}
