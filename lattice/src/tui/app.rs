//! TUI application - key handling
//!
//! The App owns the AppState and turns key presses into session actions.
//! It does not render and it does not talk to the network: calls are queued
//! as a [`PendingAction`] for the runner.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::debug;

use super::state::{AppState, ConfirmAction, ConfirmDialog, InteractionMode, PendingAction};
use crate::session::{Screen, SessionController};

#[derive(Debug)]
pub struct App {
    state: AppState,
}

impl App {
    pub fn new(session: SessionController) -> Self {
        Self {
            state: AppState::new(session),
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut AppState {
        &mut self.state
    }

    /// Handle a key event
    ///
    /// Returns true if the application should exit.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return true;
        }

        match &self.state.interaction_mode {
            InteractionMode::Normal => self.handle_screen_key(key),
            InteractionMode::Help => self.handle_help_key(key),
            InteractionMode::Confirm(_) => self.handle_confirm_key(key),
        }
        self.state.should_quit
    }

    fn handle_screen_key(&mut self, key: KeyEvent) {
        let screen = self.state.screen();

        if key.code == KeyCode::F(1) {
            self.state.interaction_mode = InteractionMode::Help;
            return;
        }
        if key.code == KeyCode::Char('k')
            && key.modifiers.contains(KeyModifiers::CONTROL)
            && screen != Screen::AwaitingCredential
        {
            self.state.interaction_mode = InteractionMode::Confirm(ConfirmDialog::forget_key());
            return;
        }

        if screen.takes_text() {
            self.handle_input_key(key, screen);
            return;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                if screen.is_busy() {
                    self.state.interaction_mode = InteractionMode::Confirm(ConfirmDialog::quit());
                } else {
                    self.state.should_quit = true;
                }
            }
            KeyCode::Char('?') => {
                self.state.interaction_mode = InteractionMode::Help;
            }
            KeyCode::Down | KeyCode::Char('j') => self.state.scroll_down(),
            KeyCode::Up | KeyCode::Char('k') => self.state.scroll_up(),
            KeyCode::Enter | KeyCode::Char('g') if screen == Screen::AnalysisReady => self.generate(),
            KeyCode::Char('r') if screen.accepts_reset() => self.reset(),
            _ => {}
        }
    }

    /// Keys on the credential and goal screens
    fn handle_input_key(&mut self, key: KeyEvent, screen: Screen) {
        match key.code {
            KeyCode::Enter => match screen {
                Screen::AwaitingCredential => self.submit_credential(),
                _ => self.submit_goal(),
            },
            KeyCode::Backspace => {
                self.state.input.pop();
            }
            KeyCode::Esc => {
                self.state.input.clear();
                if screen.accepts_reset() {
                    self.reset();
                }
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.state.input.push(c);
            }
            _ => {}
        }
    }

    fn submit_credential(&mut self) {
        let raw = std::mem::take(&mut self.state.input);
        if let Err(e) = self.state.session.submit_credential(&raw) {
            debug!(error = %e, "App::submit_credential: rejected");
        }
    }

    fn submit_goal(&mut self) {
        let goal = self.state.input.clone();
        match self.state.session.begin_analysis(&goal) {
            Ok(job) => {
                self.state.scroll = 0;
                self.state.pending_action = Some(PendingAction::Analyze(job));
            }
            Err(e) => debug!(error = %e, "App::submit_goal: rejected"),
        }
    }

    fn generate(&mut self) {
        match self.state.session.begin_generation() {
            Ok(job) => {
                self.state.scroll = 0;
                self.state.pending_action = Some(PendingAction::Generate(job));
            }
            Err(e) => debug!(error = %e, "App::generate: rejected"),
        }
    }

    fn reset(&mut self) {
        if self.state.session.reset().is_ok() {
            self.state.input.clear();
            self.state.scroll = 0;
        }
    }

    fn handle_confirm_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => {
                self.state.interaction_mode = InteractionMode::Normal;
            }
            KeyCode::Enter => {
                if let InteractionMode::Confirm(dialog) = &self.state.interaction_mode
                    && dialog.selected_button
                {
                    match dialog.action {
                        ConfirmAction::Quit => self.state.should_quit = true,
                        ConfirmAction::ForgetKey => {
                            if let Err(e) = self.state.session.forget_credential() {
                                debug!(error = %e, "App::handle_confirm_key: forget failed");
                            }
                            self.state.input.clear();
                            self.state.pending_action = None;
                        }
                    }
                }
                self.state.interaction_mode = InteractionMode::Normal;
            }
            KeyCode::Left | KeyCode::Right | KeyCode::Tab | KeyCode::Char('y') | KeyCode::Char('Y') => {
                if let InteractionMode::Confirm(dialog) = &mut self.state.interaction_mode {
                    if matches!(key.code, KeyCode::Char('y') | KeyCode::Char('Y')) {
                        dialog.selected_button = true;
                    } else {
                        dialog.selected_button = !dialog.selected_button;
                    }
                }
            }
            _ => {}
        }
    }

    fn handle_help_key(&mut self, key: KeyEvent) {
        if matches!(
            key.code,
            KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q') | KeyCode::F(1)
        ) {
            self.state.interaction_mode = InteractionMode::Normal;
        }
    }
}
