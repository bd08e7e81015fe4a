//! Domain model: analyses, strategies and ethical scores

mod analysis;
mod strategy;

pub use analysis::{AnalysisCategory, GoalAnalysis, ITEMS_PER_CATEGORY};
pub use strategy::{EthicalScore, PathScore, STRATEGY_COUNT, Strategy, StrategyPath, merge_scores, validate_batch};

use thiserror::Error;

/// A structurally valid response that breaks the domain contract
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{category} has {actual} items, expected {expected}")]
    WrongItemCount {
        category: AnalysisCategory,
        expected: usize,
        actual: usize,
    },

    #[error("{category} item {index} is blank")]
    BlankItem { category: AnalysisCategory, index: usize },

    #[error("got {actual} strategies, expected {expected}")]
    WrongStrategyCount { expected: usize, actual: usize },

    #[error("path {0} appears more than once")]
    DuplicatePath(StrategyPath),

    #[error("path {0} is missing")]
    MissingPath(StrategyPath),

    #[error("strategy {0} has a blank title")]
    BlankTitle(StrategyPath),

    #[error("strategy {0} has no steps")]
    NoSteps(StrategyPath),
}
