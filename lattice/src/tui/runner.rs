//! TUI Runner - main loop that owns the terminal
//!
//! The TuiRunner is responsible for:
//! - Drawing the current state every loop iteration
//! - Dispatching key events to App
//! - Starting queued model calls on background tasks
//! - Applying their results as they arrive

use std::time::Duration;

use eyre::Result;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use super::Tui;
use super::app::App;
use super::events::{Event, EventHandler};
use super::state::PendingAction;
use super::views;
use crate::clients::{Advisor, ClientError, GenerationStage};
use crate::domain::{GoalAnalysis, Strategy};
use crate::session::{SessionController, Ticket};

const TICK_RATE: Duration = Duration::from_millis(100);

/// Messages from a background call back to the loop
#[derive(Debug)]
pub enum JobUpdate {
    Analyzed(Ticket, Result<GoalAnalysis, ClientError>),
    ScoringStarted(Ticket),
    Generated(Ticket, Result<Vec<Strategy>, ClientError>),
}

pub struct TuiRunner {
    app: App,
    terminal: Tui,
    advisor: Advisor,
    event_handler: EventHandler,
    job_tx: mpsc::Sender<JobUpdate>,
    job_rx: mpsc::Receiver<JobUpdate>,
    /// The one outstanding call, if any
    job: Option<JoinHandle<()>>,
}

impl TuiRunner {
    pub fn new(terminal: Tui, advisor: Advisor, session: SessionController) -> Self {
        let (job_tx, job_rx) = mpsc::channel(8);
        Self {
            app: App::new(session),
            terminal,
            advisor,
            event_handler: EventHandler::new(TICK_RATE),
            job_tx,
            job_rx,
            job: None,
        }
    }

    /// Run the TUI main loop
    pub async fn run(&mut self) -> Result<()> {
        debug!("TuiRunner::run: entering main loop");
        loop {
            self.terminal.draw(|frame| views::render(self.app.state(), frame))?;

            tokio::select! {
                event = self.event_handler.next() => {
                    match event? {
                        Event::Tick => self.handle_tick(),
                        Event::Key(key) => {
                            if self.app.handle_key(key) {
                                break;
                            }
                            self.dispatch_pending();
                        }
                        Event::Resize(width, height) => {
                            debug!(width, height, "TuiRunner::run: resize");
                        }
                    }
                }
                Some(update) = self.job_rx.recv() => {
                    self.handle_update(update);
                }
            }

            if self.app.state().should_quit {
                break;
            }
        }

        if let Some(job) = self.job.take() {
            job.abort();
        }
        debug!("TuiRunner::run: exiting");
        Ok(())
    }

    fn handle_tick(&mut self) {
        self.app.state_mut().tick();
        self.dispatch_pending();
    }

    /// Start the queued call, if there is one
    fn dispatch_pending(&mut self) {
        let Some(action) = self.app.state_mut().pending_action.take() else {
            return;
        };

        // A new job supersedes one abandoned by forgetting the key
        if let Some(old) = self.job.take() {
            old.abort();
        }

        let advisor = self.advisor.clone();
        let tx = self.job_tx.clone();
        let handle = match action {
            PendingAction::Analyze(job) => {
                info!("Starting goal analysis");
                tokio::spawn(async move {
                    let result = advisor.analyze(&job.credential, &job.goal).await;
                    let _ = tx.send(JobUpdate::Analyzed(job.ticket, result)).await;
                })
            }
            PendingAction::Generate(job) => {
                info!("Starting strategy generation");
                tokio::spawn(async move {
                    let progress = tx.clone();
                    let ticket = job.ticket;
                    let result = advisor
                        .generate_with_progress(&job.credential, &job.goal, &job.analysis, move |stage| {
                            if stage == GenerationStage::ScoringEthics {
                                let _ = progress.try_send(JobUpdate::ScoringStarted(ticket));
                            }
                        })
                        .await;
                    let _ = tx.send(JobUpdate::Generated(ticket, result)).await;
                })
            }
        };
        self.job = Some(handle);
    }

    fn handle_update(&mut self, update: JobUpdate) {
        debug!(?update, "TuiRunner::handle_update: called");
        let state = self.app.state_mut();
        let outcome = match update {
            JobUpdate::ScoringStarted(ticket) => {
                state.session.mark_scoring(ticket);
                return;
            }
            JobUpdate::Analyzed(ticket, result) => state.session.finish_analysis(ticket, result),
            JobUpdate::Generated(ticket, result) => state.session.finish_generation(ticket, result),
        };
        state.scroll = 0;
        if let Err(e) = outcome {
            debug!(error = %e, "TuiRunner::handle_update: call failed");
        }
    }
}
