//! Goal decomposition call

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::{ClientError, ContractError, response};
use crate::credential::Credential;
use crate::domain::GoalAnalysis;
use crate::llm::{CompletionRequest, LlmClient};
use crate::prompts::{AnalyzeContext, PromptKind, PromptLoader};

/// Response schema: three required string arrays
pub fn analysis_schema() -> serde_json::Value {
    let list = serde_json::json!({ "type": "ARRAY", "items": { "type": "STRING" } });
    serde_json::json!({
        "type": "OBJECT",
        "properties": {
            "negativeShifts": list,
            "positiveShifts": list,
            "decayFactors": list,
        },
        "required": ["negativeShifts", "positiveShifts", "decayFactors"],
    })
}

/// Sends a goal and returns its validated decomposition
#[derive(Clone)]
pub struct AnalysisClient {
    llm: Arc<dyn LlmClient>,
    prompts: Arc<PromptLoader>,
    max_tokens: u32,
}

impl AnalysisClient {
    pub fn new(llm: Arc<dyn LlmClient>, prompts: Arc<PromptLoader>, max_tokens: u32) -> Self {
        Self {
            llm,
            prompts,
            max_tokens,
        }
    }

    /// Decompose `goal` into negative shifts, positive shifts and decay factors
    ///
    /// Nothing partial is ever returned: any transport, parse or validation
    /// problem becomes [`ClientError::Analysis`].
    pub async fn analyze(&self, credential: &Credential, goal: &str) -> Result<GoalAnalysis, ClientError> {
        debug!(goal_len = goal.len(), "AnalysisClient::analyze: called");
        match self.request(credential, goal).await {
            Ok(analysis) => {
                info!("Goal analysis complete");
                Ok(analysis)
            }
            Err(e) => {
                warn!(
                    error = %e,
                    auth_failure = e.is_auth_failure(),
                    rate_limited = e.is_rate_limit(),
                    "Goal analysis failed"
                );
                Err(ClientError::Analysis(e))
            }
        }
    }

    async fn request(&self, credential: &Credential, goal: &str) -> Result<GoalAnalysis, ContractError> {
        let goal = goal.trim();
        if goal.is_empty() {
            return Err(ContractError::EmptyGoal);
        }

        let prompt = self
            .prompts
            .render(PromptKind::Analyze, &AnalyzeContext { goal })
            .map_err(ContractError::prompt)?;
        let request = CompletionRequest::structured(prompt, analysis_schema(), self.max_tokens);

        let response = self.llm.complete(credential, request).await?;
        let analysis: GoalAnalysis = response::parse_json(response)?;
        let analysis = analysis.trimmed();
        analysis.validate()?;
        Ok(analysis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AnalysisCategory, ValidationError};
    use crate::llm::client::mock::{MockLlmClient, MockReply};

    fn client(mock: Arc<MockLlmClient>) -> AnalysisClient {
        AnalysisClient::new(mock, Arc::new(PromptLoader::embedded_only()), 2048)
    }

    fn credential() -> Credential {
        Credential::new("test-key").unwrap()
    }

    const GOOD: &str = r#"{"negativeShifts":["A","B","C"],"positiveShifts":["D","E","F"],"decayFactors":["G","H","I"]}"#;

    #[tokio::test]
    async fn test_analyze_success() {
        let mock = Arc::new(MockLlmClient::with_texts([GOOD]));
        let analysis = client(mock.clone()).analyze(&credential(), "  Launch a bakery  ").await.unwrap();

        assert_eq!(analysis.negative_shifts, vec!["A", "B", "C"]);
        assert_eq!(analysis.positive_shifts, vec!["D", "E", "F"]);
        assert_eq!(analysis.decay_factors, vec!["G", "H", "I"]);

        let requests = mock.requests();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].user_text().contains("\"Launch a bakery\""));
        assert_eq!(requests[0].response_schema, analysis_schema());
        assert_eq!(requests[0].max_tokens, 2048);
    }

    #[tokio::test]
    async fn test_analyze_empty_goal_never_calls_api() {
        let mock = Arc::new(MockLlmClient::with_texts([GOOD]));
        let err = client(mock.clone()).analyze(&credential(), "   ").await.unwrap_err();

        assert!(matches!(err, ClientError::Analysis(ContractError::EmptyGoal)));
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn test_analyze_missing_key_fails() {
        let mock = Arc::new(MockLlmClient::with_texts([
            r#"{"negativeShifts":["A","B","C"],"positiveShifts":["D","E","F"]}"#,
        ]));
        let err = client(mock).analyze(&credential(), "goal").await.unwrap_err();
        assert!(matches!(err, ClientError::Analysis(ContractError::Json(_))));
    }

    #[tokio::test]
    async fn test_analyze_wrong_item_count_fails() {
        let mock = Arc::new(MockLlmClient::with_texts([
            r#"{"negativeShifts":["A","B"],"positiveShifts":["D","E","F"],"decayFactors":["G","H","I"]}"#,
        ]));
        let err = client(mock).analyze(&credential(), "goal").await.unwrap_err();
        assert!(matches!(
            err,
            ClientError::Analysis(ContractError::Validation(ValidationError::WrongItemCount {
                category: AnalysisCategory::NegativeShifts,
                ..
            }))
        ));
    }

    #[tokio::test]
    async fn test_analyze_transport_failure() {
        let mock = Arc::new(MockLlmClient::with_replies(vec![MockReply::ApiError {
            status: 400,
            message: "API key not valid".to_string(),
        }]));
        let err = client(mock).analyze(&credential(), "goal").await.unwrap_err();

        assert!(matches!(err, ClientError::Analysis(ContractError::Llm(_))));
        assert!(err.to_string().contains("check your API key"));
    }

    #[tokio::test]
    async fn test_analyze_non_json_text() {
        let mock = Arc::new(MockLlmClient::with_texts(["I cannot help with that."]));
        let err = client(mock).analyze(&credential(), "goal").await.unwrap_err();
        assert!(matches!(err, ClientError::Analysis(ContractError::Json(_))));
    }
}
