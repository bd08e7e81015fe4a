//! Strategy synthesis call

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::{ClientError, ContractError, response};
use crate::credential::Credential;
use crate::domain::{GoalAnalysis, Strategy, validate_batch};
use crate::llm::{CompletionRequest, LlmClient};
use crate::prompts::{PromptKind, PromptLoader, StrategiesContext};

/// Response schema: array of `{path, title, description, steps}`
pub fn strategies_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "path": { "type": "STRING", "enum": ["Alpha", "Beta", "Gamma"] },
                "title": { "type": "STRING" },
                "description": { "type": "STRING" },
                "steps": { "type": "ARRAY", "items": { "type": "STRING" } },
            },
            "required": ["path", "title", "description", "steps"],
        },
    })
}

/// Requests the Alpha, Beta and Gamma strategies for an analysed goal
#[derive(Clone)]
pub struct StrategyClient {
    llm: Arc<dyn LlmClient>,
    prompts: Arc<PromptLoader>,
    max_tokens: u32,
}

impl StrategyClient {
    pub fn new(llm: Arc<dyn LlmClient>, prompts: Arc<PromptLoader>, max_tokens: u32) -> Self {
        Self {
            llm,
            prompts,
            max_tokens,
        }
    }

    /// Generate exactly one strategy per path, ordered Alpha, Beta, Gamma
    ///
    /// All three come back or the call fails with
    /// [`ClientError::StrategyGeneration`].
    pub async fn generate(
        &self,
        credential: &Credential,
        goal: &str,
        analysis: &GoalAnalysis,
    ) -> Result<Vec<Strategy>, ClientError> {
        debug!(goal_len = goal.len(), "StrategyClient::generate: called");
        match self.request(credential, goal, analysis).await {
            Ok(strategies) => {
                info!(count = strategies.len(), "Strategies generated");
                Ok(strategies)
            }
            Err(e) => {
                warn!(error = %e, rate_limited = e.is_rate_limit(), "Strategy generation failed");
                Err(ClientError::StrategyGeneration(e))
            }
        }
    }

    async fn request(
        &self,
        credential: &Credential,
        goal: &str,
        analysis: &GoalAnalysis,
    ) -> Result<Vec<Strategy>, ContractError> {
        let goal = goal.trim();
        if goal.is_empty() {
            return Err(ContractError::EmptyGoal);
        }

        let ctx = StrategiesContext::new(goal, analysis).map_err(ContractError::prompt)?;
        let prompt = self
            .prompts
            .render(PromptKind::Strategies, &ctx)
            .map_err(ContractError::prompt)?;
        let request = CompletionRequest::structured(prompt, strategies_schema(), self.max_tokens);

        let response = self.llm.complete(credential, request).await?;
        let strategies: Vec<Strategy> = response::parse_json(response)?;
        Ok(validate_batch(strategies)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{StrategyPath, ValidationError};
    use crate::llm::client::mock::MockLlmClient;

    fn client(mock: Arc<MockLlmClient>) -> StrategyClient {
        StrategyClient::new(mock, Arc::new(PromptLoader::embedded_only()), 4096)
    }

    fn credential() -> Credential {
        Credential::new("test-key").unwrap()
    }

    fn analysis() -> GoalAnalysis {
        GoalAnalysis {
            negative_shifts: vec!["A".into(), "B".into(), "C".into()],
            positive_shifts: vec!["D".into(), "E".into(), "F".into()],
            decay_factors: vec!["G".into(), "H".into(), "I".into()],
        }
    }

    fn entry(path: &str) -> serde_json::Value {
        serde_json::json!({
            "path": path,
            "title": format!("{} title", path),
            "description": "One sentence.",
            "steps": ["step one", "step two"],
        })
    }

    fn body(paths: &[&str]) -> String {
        serde_json::Value::Array(paths.iter().map(|p| entry(p)).collect()).to_string()
    }

    #[tokio::test]
    async fn test_generate_success_sorted() {
        let mock = Arc::new(MockLlmClient::with_texts([body(&["Gamma", "Alpha", "Beta"])]));
        let strategies = client(mock.clone())
            .generate(&credential(), "Launch a bakery", &analysis())
            .await
            .unwrap();

        let paths: Vec<_> = strategies.iter().map(|s| s.path).collect();
        assert_eq!(paths, vec![StrategyPath::Alpha, StrategyPath::Beta, StrategyPath::Gamma]);
        assert_eq!(strategies[0].steps, vec!["step one", "step two"]);
        assert!(strategies.iter().all(|s| s.ethical_score.is_none()));

        let prompt = mock.requests()[0].user_text();
        assert!(prompt.contains("Launch a bakery"));
        assert!(prompt.contains("\"decayFactors\""));
    }

    #[tokio::test]
    async fn test_generate_rejects_partial_batch() {
        let mock = Arc::new(MockLlmClient::with_texts([body(&["Alpha", "Beta"])]));
        let err = client(mock)
            .generate(&credential(), "goal", &analysis())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ClientError::StrategyGeneration(ContractError::Validation(ValidationError::WrongStrategyCount { .. }))
        ));
    }

    #[tokio::test]
    async fn test_generate_rejects_duplicate_path() {
        let mock = Arc::new(MockLlmClient::with_texts([body(&["Alpha", "Beta", "Beta"])]));
        let err = client(mock)
            .generate(&credential(), "goal", &analysis())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ClientError::StrategyGeneration(ContractError::Validation(ValidationError::DuplicatePath(
                StrategyPath::Beta
            )))
        ));
    }

    #[tokio::test]
    async fn test_generate_rejects_unknown_path() {
        let mock = Arc::new(MockLlmClient::with_texts([body(&["Alpha", "Beta", "Delta"])]));
        let err = client(mock)
            .generate(&credential(), "goal", &analysis())
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::StrategyGeneration(ContractError::Json(_))));
    }

    #[tokio::test]
    async fn test_generate_transport_failure() {
        let mock = Arc::new(MockLlmClient::new(vec![]));
        let err = client(mock)
            .generate(&credential(), "goal", &analysis())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Failed to generate strategies. Please try again.");
    }
}
