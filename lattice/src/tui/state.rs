//! TUI application state
//!
//! Pure data for the terminal front-end. The session flow itself lives in
//! [`SessionController`]; this adds what only the terminal needs: the text
//! being typed, scroll position, overlays and the spinner.

use crate::session::{AnalysisJob, GenerationJob, Screen, SessionController};

const SPINNER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Interaction mode (modal)
#[derive(Debug, Clone, Default)]
pub enum InteractionMode {
    /// Keys go to the current screen
    #[default]
    Normal,
    /// Help overlay
    Help,
    /// Confirmation dialog
    Confirm(ConfirmDialog),
}

/// Yes/No dialog in front of a destructive action
#[derive(Debug, Clone)]
pub struct ConfirmDialog {
    pub message: String,
    pub action: ConfirmAction,
    pub selected_button: bool, // false = No, true = Yes
}

impl ConfirmDialog {
    pub fn new(action: ConfirmAction, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            action,
            selected_button: false,
        }
    }

    pub fn forget_key() -> Self {
        Self::new(
            ConfirmAction::ForgetKey,
            "Forget the saved API key? You will be asked for a new one.",
        )
    }

    pub fn quit() -> Self {
        Self::new(ConfirmAction::Quit, "A request is still running. Quit anyway?")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmAction {
    Quit,
    ForgetKey,
}

/// External call waiting for the runner to start it
#[derive(Debug, Clone)]
pub enum PendingAction {
    Analyze(AnalysisJob),
    Generate(GenerationJob),
}

pub struct AppState {
    pub session: SessionController,
    /// Text typed on the credential or goal screen
    pub input: String,
    /// Vertical scroll of the result panes
    pub scroll: u16,
    pub interaction_mode: InteractionMode,
    pub pending_action: Option<PendingAction>,
    pub should_quit: bool,
    spinner_frame: usize,
}

impl AppState {
    pub fn new(session: SessionController) -> Self {
        Self {
            session,
            input: String::new(),
            scroll: 0,
            interaction_mode: InteractionMode::Normal,
            pending_action: None,
            should_quit: false,
            spinner_frame: 0,
        }
    }

    pub fn screen(&self) -> Screen {
        self.session.screen()
    }

    /// Advance the spinner
    pub fn tick(&mut self) {
        self.spinner_frame = (self.spinner_frame + 1) % SPINNER_FRAMES.len();
    }

    pub fn spinner(&self) -> &'static str {
        SPINNER_FRAMES[self.spinner_frame]
    }

    pub fn scroll_down(&mut self) {
        self.scroll = self.scroll.saturating_add(1);
    }

    pub fn scroll_up(&mut self) {
        self.scroll = self.scroll.saturating_sub(1);
    }

    /// Input as it should be shown; the API key is masked
    pub fn display_input(&self) -> String {
        match self.screen() {
            Screen::AwaitingCredential => "•".repeat(self.input.chars().count()),
            _ => self.input.clone(),
        }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("screen", &self.screen())
            .field("input_len", &self.input.len())
            .field("scroll", &self.scroll)
            .field("interaction_mode", &self.interaction_mode)
            .field("should_quit", &self.should_quit)
            .finish()
    }
}
