//! LLM request/response types
//!
//! Shaped after the Gemini `generateContent` API, but kept free of wire
//! details so the clients above never see provider JSON.

use tracing::debug;

/// A completion request - everything needed for one structured call
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// The rendered prompt, sent as the single user turn
    pub prompt: String,

    /// JSON schema the response must follow
    pub response_schema: serde_json::Value,

    /// Max tokens for the response
    pub max_tokens: u32,
}

impl CompletionRequest {
    /// Build a single-turn request that asks for JSON matching `schema`
    pub fn structured(prompt: impl Into<String>, schema: serde_json::Value, max_tokens: u32) -> Self {
        debug!(%max_tokens, "CompletionRequest::structured: called");
        Self {
            prompt: prompt.into(),
            response_schema: schema,
            max_tokens,
        }
    }

    pub fn user_text(&self) -> String {
        self.prompt.clone()
    }
}

/// Response from a completion request
#[derive(Debug, Clone)]
pub struct CompletionResponse {
    /// Text content (if any)
    pub content: Option<String>,

    /// Why the model stopped
    pub stop_reason: StopReason,

    /// Token usage
    pub usage: TokenUsage,
}

impl CompletionResponse {
    /// Convenience constructor for a finished text response
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            stop_reason: StopReason::EndTurn,
            usage: TokenUsage::default(),
        }
    }
}

/// Why the model stopped generating
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopReason {
    EndTurn,
    MaxTokens,
    Safety,
    Other(String),
}

impl StopReason {
    /// Parse from a Gemini `finishReason` string
    pub fn from_gemini(s: &str) -> Self {
        debug!(%s, "StopReason::from_gemini: called");
        match s {
            "STOP" => StopReason::EndTurn,
            "MAX_TOKENS" => StopReason::MaxTokens,
            "SAFETY" | "RECITATION" | "BLOCKLIST" | "PROHIBITED_CONTENT" => StopReason::Safety,
            other => StopReason::Other(other.to_string()),
        }
    }
}

/// Token usage for a single call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenUsage {
    pub input_tokens: u64,
    pub output_tokens: u64,
}

impl TokenUsage {
    pub fn total(&self) -> u64 {
        self.input_tokens + self.output_tokens
    }
}
