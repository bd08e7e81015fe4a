//! Client error taxonomy

use thiserror::Error;

use crate::domain::ValidationError;
use crate::llm::{LlmError, StopReason};

/// Why a single structured call failed
#[derive(Debug, Error)]
pub enum ContractError {
    #[error("goal is empty")]
    EmptyGoal,

    #[error("failed to build prompt: {0}")]
    Prompt(String),

    #[error(transparent)]
    Llm(#[from] LlmError),

    #[error("response contained no text (stop reason: {0:?})")]
    EmptyResponse(StopReason),

    #[error("response does not match the expected JSON shape: {0}")]
    Json(#[from] serde_json::Error),

    #[error("response breaks the contract: {0}")]
    Validation(#[from] ValidationError),
}

impl ContractError {
    pub(crate) fn prompt(err: eyre::Report) -> Self {
        Self::Prompt(format!("{:#}", err))
    }

    /// The API turned the key down
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, Self::Llm(e) if e.is_auth_failure())
    }

    pub fn is_rate_limit(&self) -> bool {
        matches!(self, Self::Llm(e) if e.is_rate_limit())
    }
}

/// Failures that reach the user
///
/// Display is the user-facing message; the underlying cause is kept as the
/// error source for logs.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Failed to analyze the goal. Please check your API key and try again.")]
    Analysis(#[source] ContractError),

    #[error("Failed to generate strategies. Please try again.")]
    StrategyGeneration(#[source] ContractError),
}

/// A scoring call that failed and was absorbed
#[derive(Debug, Error)]
#[error("ethics scoring failed: {0}")]
pub struct EthicsScoringFailure(#[source] pub ContractError);
