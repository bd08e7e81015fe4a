//! LlmClient trait definition

use async_trait::async_trait;

use super::{CompletionRequest, CompletionResponse, LlmError};
use crate::credential::Credential;

/// Stateless LLM client - each call is independent
///
/// The credential is passed on every call rather than captured at
/// construction, so one client serves whatever key the session holds.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Send a single completion request and wait for the full response
    async fn complete(&self, credential: &Credential, request: CompletionRequest)
    -> Result<CompletionResponse, LlmError>;
}
