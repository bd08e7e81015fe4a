//! Structured calls to the model
//!
//! Each client owns one prompt and one response schema. [`Advisor`] bundles
//! the three and runs the generate pipeline: strategies first, then a
//! best-effort ethics pass.

use std::sync::Arc;

use eyre::{Context, Result};
use tracing::{debug, info};

mod analysis;
mod error;
mod ethics;
mod response;
mod strategy;

pub use analysis::{AnalysisClient, analysis_schema};
pub use error::{ClientError, ContractError, EthicsScoringFailure};
pub use ethics::{EthicsClient, ethics_schema};
pub use strategy::{StrategyClient, strategies_schema};

use crate::config::Config;
use crate::credential::Credential;
use crate::domain::{GoalAnalysis, Strategy};
use crate::llm::{self, LlmClient};
use crate::prompts::PromptLoader;

/// Progress milestones inside a generate call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationStage {
    /// Strategies are in; the ethics call is about to go out
    ScoringEthics,
}

/// The analysis, strategy and ethics clients over one shared backend
#[derive(Clone)]
pub struct Advisor {
    analysis: AnalysisClient,
    strategy: StrategyClient,
    ethics: EthicsClient,
}

impl Advisor {
    pub fn new(llm: Arc<dyn LlmClient>, prompts: Arc<PromptLoader>, max_tokens: u32) -> Self {
        debug!(%max_tokens, "Advisor::new: called");
        Self {
            analysis: AnalysisClient::new(llm.clone(), prompts.clone(), max_tokens),
            strategy: StrategyClient::new(llm.clone(), prompts.clone(), max_tokens),
            ethics: EthicsClient::new(llm, prompts, max_tokens),
        }
    }

    /// Build the Gemini backend and prompt loader described by `config`
    pub fn from_config(config: &Config) -> Result<Self> {
        let llm = llm::create_client(&config.llm).context("Failed to create LLM client")?;
        let prompts = Arc::new(PromptLoader::new(config.prompts.expanded_dir()));
        Ok(Self::new(llm, prompts, config.llm.max_tokens))
    }

    pub async fn analyze(&self, credential: &Credential, goal: &str) -> Result<GoalAnalysis, ClientError> {
        self.analysis.analyze(credential, goal).await
    }

    /// Generate strategies and score them
    pub async fn generate(
        &self,
        credential: &Credential,
        goal: &str,
        analysis: &GoalAnalysis,
    ) -> Result<Vec<Strategy>, ClientError> {
        self.generate_with_progress(credential, goal, analysis, |_| {}).await
    }

    /// Same as [`Advisor::generate`], reporting when the ethics pass starts
    ///
    /// A strategy failure aborts the call. An ethics failure does not: the
    /// strategies come back unscored.
    pub async fn generate_with_progress<F>(
        &self,
        credential: &Credential,
        goal: &str,
        analysis: &GoalAnalysis,
        mut on_stage: F,
    ) -> Result<Vec<Strategy>, ClientError>
    where
        F: FnMut(GenerationStage) + Send,
    {
        let strategies = self.strategy.generate(credential, goal, analysis).await?;
        on_stage(GenerationStage::ScoringEthics);
        let scored = self.ethics.score(credential, strategies).await;
        info!(
            scored = scored.iter().filter(|s| s.ethical_score.is_some()).count(),
            "Generate pipeline complete"
        );
        Ok(scored)
    }
}
