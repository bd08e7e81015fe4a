//! Ethics scoring call
//!
//! Scoring is best effort: a failed call leaves the strategies exactly as
//! they were and the failure only reaches the log.

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::{ContractError, EthicsScoringFailure, response};
use crate::credential::Credential;
use crate::domain::{PathScore, Strategy, merge_scores};
use crate::llm::{CompletionRequest, LlmClient};
use crate::prompts::{EthicsContext, PromptKind, PromptLoader};

/// Response schema: array of `{path, score, rationale}`
pub fn ethics_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "path": { "type": "STRING", "enum": ["Alpha", "Beta", "Gamma"] },
                "score": { "type": "NUMBER" },
                "rationale": { "type": "STRING" },
            },
            "required": ["path", "score", "rationale"],
        },
    })
}

#[derive(Clone)]
pub struct EthicsClient {
    llm: Arc<dyn LlmClient>,
    prompts: Arc<PromptLoader>,
    max_tokens: u32,
}

impl EthicsClient {
    pub fn new(llm: Arc<dyn LlmClient>, prompts: Arc<PromptLoader>, max_tokens: u32) -> Self {
        Self {
            llm,
            prompts,
            max_tokens,
        }
    }

    /// Attach an ethical score to each strategy the model rated
    ///
    /// Never fails. Only `ethical_score` is written; paths missing from the
    /// response stay unscored.
    pub async fn score(&self, credential: &Credential, strategies: Vec<Strategy>) -> Vec<Strategy> {
        debug!(count = strategies.len(), "EthicsClient::score: called");
        if strategies.is_empty() {
            return strategies;
        }

        match self.request(credential, &strategies).await {
            Ok(scores) => {
                info!(scored = scores.len(), "Ethics scoring complete");
                merge_scores(strategies, &scores)
            }
            Err(e) => {
                let failure = EthicsScoringFailure(e);
                warn!(error = %failure, "EthicsScoringFailure");
                strategies
            }
        }
    }

    async fn request(&self, credential: &Credential, strategies: &[Strategy]) -> Result<Vec<PathScore>, ContractError> {
        let ctx = EthicsContext::new(strategies).map_err(ContractError::prompt)?;
        let prompt = self
            .prompts
            .render(PromptKind::Ethics, &ctx)
            .map_err(ContractError::prompt)?;
        let request = CompletionRequest::structured(prompt, ethics_schema(), self.max_tokens);

        let response = self.llm.complete(credential, request).await?;
        let entries: Vec<serde_json::Value> = response::parse_json(response)?;
        Ok(usable_scores(entries))
    }
}

/// Keep every entry that reads as a score
///
/// One bad entry only costs its own strategy its score.
fn usable_scores(entries: Vec<serde_json::Value>) -> Vec<PathScore> {
    entries
        .into_iter()
        .enumerate()
        .filter_map(|(index, entry)| match serde_json::from_value::<PathScore>(entry) {
            Ok(score) => Some(score),
            Err(e) => {
                warn!(index, error = %e, "EthicsClient: skipping malformed score entry");
                None
            }
        })
        .collect()
}
