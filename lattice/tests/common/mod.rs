//! Shared fixtures for integration tests

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use lattice::clients::Advisor;
use lattice::credential::{Credential, MemoryCredentialStore};
use lattice::llm::{CompletionRequest, CompletionResponse, LlmClient, LlmError};
use lattice::prompts::PromptLoader;
use lattice::session::SessionController;

pub const BAKERY_GOAL: &str = "Launch a sustainable neighborhood bakery";

pub const BAKERY_ANALYSIS: &str = r#"{
    "negativeShifts": ["High commercial rent", "Supply chain volatility", "Staff turnover"],
    "positiveShifts": ["Local sourcing partnerships", "Subscription bread boxes", "Community events"],
    "decayFactors": ["Owner burnout", "Equipment wear", "Menu fatigue"]
}"#;

pub const BAKERY_STRATEGIES: &str = r#"[
    {"path": "Gamma", "title": "Neighborhood staple", "description": "Slow, steady roots.", "steps": ["Partner with farms", "Host tastings"]},
    {"path": "Alpha", "title": "Rapid franchise", "description": "Scale quickly.", "steps": ["Raise capital", "Open three sites"]},
    {"path": "Beta", "title": "Seasonal pivots", "description": "Follow demand.", "steps": ["Track sales", "Rotate menu"]}
]"#;

pub const BAKERY_SCORES: &str = r#"[
    {"path": "Alpha", "score": 0.62, "rationale": "Growth pressure strains suppliers."},
    {"path": "Beta", "score": 0.81, "rationale": "Reasonable but profit-led."},
    {"path": "Gamma", "score": 0.97, "rationale": "Fair to staff and community."}
]"#;

pub const TEST_KEY: &str = "AIzaSyIntegrationKey42";

/// One scripted outcome
pub enum Scripted {
    Text(String),
    Status(u16, String),
}

/// LlmClient that replays a queue of outcomes and records each request
#[derive(Default)]
pub struct ScriptedLlm {
    replies: Mutex<VecDeque<Scripted>>,
    seen: Mutex<Vec<(String, CompletionRequest)>>,
}

impl ScriptedLlm {
    pub fn new(replies: Vec<Scripted>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            seen: Mutex::new(Vec::new()),
        }
    }

    /// Requests so far, each with the key it was sent with
    pub fn seen(&self) -> Vec<(String, CompletionRequest)> {
        self.seen.lock().expect("seen lock").clone()
    }

    pub fn calls(&self) -> usize {
        self.seen.lock().expect("seen lock").len()
    }
}

#[async_trait]
impl LlmClient for ScriptedLlm {
    async fn complete(
        &self,
        credential: &Credential,
        request: CompletionRequest,
    ) -> Result<CompletionResponse, LlmError> {
        self.seen
            .lock()
            .expect("seen lock")
            .push((credential.expose().to_string(), request));
        match self.replies.lock().expect("replies lock").pop_front() {
            Some(Scripted::Text(text)) => Ok(CompletionResponse::text(text)),
            Some(Scripted::Status(status, message)) => Err(LlmError::ApiError { status, message }),
            None => Err(LlmError::InvalidResponse("script exhausted".to_string())),
        }
    }
}

pub fn text(s: &str) -> Scripted {
    Scripted::Text(s.to_string())
}

/// Advisor backed by a script, with embedded prompts only
pub fn scripted_advisor(replies: Vec<Scripted>) -> (Advisor, Arc<ScriptedLlm>) {
    let llm = Arc::new(ScriptedLlm::new(replies));
    let advisor = Advisor::new(llm.clone(), Arc::new(PromptLoader::embedded_only()), 4096);
    (advisor, llm)
}

/// Session that already holds the test key
pub fn keyed_session() -> SessionController {
    let credential = Credential::new(TEST_KEY).expect("valid key");
    SessionController::start(Box::new(MemoryCredentialStore::with_credential(credential)))
}
