//! Session error types

use thiserror::Error;

use super::Screen;
use crate::clients::ClientError;
use crate::credential::CredentialError;

/// User actions the controller can be asked to perform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    SubmitCredential,
    SubmitGoal,
    Generate,
    Reset,
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::SubmitCredential => "Submitting an API key",
            Self::SubmitGoal => "Submitting a goal",
            Self::Generate => "Generating strategies",
            Self::Reset => "Starting over",
        };
        f.write_str(name)
    }
}

/// Why a session action did not go through
///
/// The Display text is what ends up in the session's error message.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("API Key is not set.")]
    MissingCredential,

    #[error("Missing required data to generate strategies.")]
    MissingUpstream,

    #[error("Please enter a goal.")]
    EmptyGoal,

    #[error("{action} is not possible while {screen}.")]
    NotAccepted { action: Action, screen: Screen },

    #[error("{0}")]
    Credential(#[from] CredentialError),

    #[error("{0}")]
    Client(#[from] ClientError),
}
