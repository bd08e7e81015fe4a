//! Session flow: credential, goal, analysis, strategies

mod controller;
mod error;
mod state;

pub use controller::{AnalysisJob, GenerationJob, SessionController, Ticket};
pub use error::{Action, SessionError};
pub use state::{ANALYZING_MESSAGE, GENERATING_MESSAGE, SCORING_MESSAGE, Screen, SessionState};
