//! Lattice - goal analysis and strategy synthesis
//!
//! A user states a goal. Lattice asks a Gemini model to break it into
//! negative shifts, positive shifts and decay factors, then to propose three
//! strategies (Alpha, Beta, Gamma), and finally to rate each strategy's
//! probability of goodness.
//!
//! Modules:
//! - `llm`: completion trait and the Gemini backend
//! - `clients`: the three structured calls and the generate pipeline
//! - `session`: the screen-by-screen flow shared by the TUI and the CLI
//! - `tui`: ratatui front-end

pub mod cli;
pub mod clients;
pub mod config;
pub mod credential;
pub mod domain;
pub mod llm;
pub mod prompts;
pub mod report;
pub mod session;
pub mod tui;

pub use clients::{Advisor, ClientError};
pub use config::Config;
pub use credential::{Credential, CredentialStore, FileCredentialStore, MemoryCredentialStore};
pub use domain::{EthicalScore, GoalAnalysis, Strategy, StrategyPath};
pub use session::{Screen, SessionController, SessionError};
