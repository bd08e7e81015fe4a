//! Terminal User Interface for Lattice
//!
//! Walks the user through the flow one screen at a time:
//! - API key entry (masked)
//! - Goal entry
//! - The three-column analysis
//! - The three strategies with their ethics scores

mod app;
mod events;
mod runner;
pub mod state;
mod views;

pub use app::App;
pub use events::{Event, EventHandler};
pub use runner::{JobUpdate, TuiRunner};
pub use state::{AppState, InteractionMode};

use std::io::{self, Stdout};

use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use eyre::Result;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::clients::Advisor;
use crate::session::SessionController;

/// Terminal type alias
pub type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Initialize the terminal for TUI mode
pub fn init() -> Result<Tui> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore the terminal to normal mode
pub fn restore() -> Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen)?;
    Ok(())
}

/// Restores the terminal when dropped, including on early return or panic unwind
struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = restore();
    }
}

/// Run the interactive session until the user quits
pub async fn run(advisor: Advisor, session: SessionController) -> Result<()> {
    let terminal = init()?;
    let _guard = TerminalGuard;

    let mut runner = TuiRunner::new(terminal, advisor, session);
    runner.run().await
}
