//! # Menu/State Controller
//!
//! [`App`] owns the session state and is the only thing that mutates it.
//!
//! ```text
//!            Confirm (not Exit)              result of install
//!   ┌──────┐ ───────────────────> ┌─────────┐ ─────────────────> ┌────────┐
//!   │ Menu │                      │ Running │                    │ Result │
//!   └──────┘ <─────────────────── └─────────┘                    └────────┘
//!      ^       result of others                                       │
//!      └──────────────────── next input or hold expiry ───────────────┘
//! ```
//!
//! The Result screen and the one-shot result message are folded away by
//! whichever comes first: the next handled event, or [`RESULT_HOLD_TICKS`]
//! idle ticks from the event loop. The input that folds them is then handled
//! as a normal menu input. Rendering never changes state.

use crate::action::{Action, ActionRequest, ActionResult};
use crate::session::SessionLog;

/// Status line appended when the UI starts.
pub const STARTUP_MESSAGE: &str = "Initializing NiriSetup...";

/// Idle ticks a result stays on screen before folding back to the menu.
pub const RESULT_HOLD_TICKS: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Menu,
    Running,
    Result,
}

/// Logical input, decoded from key events by [`crate::ui::keys`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    Up,
    Down,
    Confirm,
    Quit,
}

/// What the event loop must do after an input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    None,
    Dispatch(ActionRequest),
    Quit,
}

#[derive(Debug)]
pub struct App {
    actions: &'static [Action],
    screen: Screen,
    cursor: usize,
    selected: Option<Action>,
    log: SessionLog,
    is_processing: bool,
    last_result: Option<ActionResult>,
    should_quit: bool,
    frame: usize,
    result_ticks: usize,
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl App {
    pub fn new() -> Self {
        Self {
            actions: Action::all(),
            screen: Screen::Menu,
            cursor: 0,
            selected: None,
            log: SessionLog::new(),
            is_processing: false,
            last_result: None,
            should_quit: false,
            frame: 0,
            result_ticks: 0,
        }
    }

    pub fn actions(&self) -> &[Action] {
        self.actions
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn highlighted(&self) -> Option<Action> {
        self.actions.get(self.cursor).copied()
    }

    pub fn selected(&self) -> Option<Action> {
        self.selected
    }

    pub fn log(&self) -> &SessionLog {
        &self.log
    }

    pub fn is_processing(&self) -> bool {
        self.is_processing
    }

    pub fn last_result(&self) -> Option<&ActionResult> {
        self.last_result.as_ref()
    }

    pub fn last_result_message(&self) -> Option<&str> {
        self.last_result.as_ref().map(|r| r.message.as_str())
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Animation counter for the processing indicator.
    pub fn frame(&self) -> usize {
        self.frame
    }

    /// Advance the animation counter and expire a held result. Called on
    /// idle polls.
    pub fn tick(&mut self) {
        self.frame = self.frame.wrapping_add(1);

        if self.last_result.is_some() {
            self.result_ticks += 1;
            if self.result_ticks >= RESULT_HOLD_TICKS {
                self.end_cycle();
            }
        }
    }

    /// Append a status line outside of any action.
    pub fn note(&mut self, line: impl Into<String>) {
        self.log.push(line);
    }

    /// Handle one input and report the side effect the loop must perform.
    pub fn handle_input(&mut self, input: Input) -> Effect {
        if input == Input::Quit {
            log::info!("Quit requested");
            self.should_quit = true;
            return Effect::Quit;
        }

        self.end_cycle();

        match self.screen {
            Screen::Menu => match input {
                Input::Up => {
                    self.cursor = self.cursor.saturating_sub(1);
                    Effect::None
                }
                Input::Down => {
                    if self.cursor + 1 < self.actions.len() {
                        self.cursor += 1;
                    }
                    Effect::None
                }
                Input::Confirm => self.confirm(),
                Input::Quit => Effect::None,
            },
            Screen::Running | Screen::Result => {
                log::debug!("Discarding {:?} while an action runs", input);
                Effect::None
            }
        }
    }

    fn confirm(&mut self) -> Effect {
        if self.is_processing {
            return Effect::None;
        }
        let Some(action) = self.highlighted() else {
            return Effect::None;
        };

        if action == Action::Exit {
            log::info!("Exit selected");
            self.should_quit = true;
            return Effect::Quit;
        }

        log::info!("Dispatching '{}'", action.id());
        self.selected = Some(action);
        self.is_processing = true;
        self.screen = Screen::Running;
        self.frame = 0;

        Effect::Dispatch(ActionRequest {
            action,
            log_snapshot: self.log.snapshot(),
        })
    }

    /// Apply the completion event for `action`.
    ///
    /// Completions that do not match the running action are ignored.
    pub fn complete(&mut self, action: Action, result: ActionResult) {
        if !self.is_processing || self.selected != Some(action) {
            log::warn!("Ignoring unexpected completion of '{}'", action.id());
            return;
        }
        self.end_cycle();

        log::info!(
            "'{}' finished (succeeded: {})",
            action.id(),
            result.succeeded
        );
        self.log.push(result.message.clone());
        self.is_processing = false;
        self.screen = if action.shows_result_screen() {
            Screen::Result
        } else {
            Screen::Menu
        };
        self.last_result = Some(result);
        self.result_ticks = 0;
    }

    /// Fold the one-shot state of the previous cycle away.
    fn end_cycle(&mut self) {
        if self.screen == Screen::Result {
            self.screen = Screen::Menu;
            self.log.clear();
        }
        self.last_result = None;
        self.result_ticks = 0;
    }
}
