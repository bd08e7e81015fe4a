//! Strategies and their ethical scores

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::ValidationError;

/// Number of strategies in every batch (one per path)
pub const STRATEGY_COUNT: usize = 3;

/// Identity of a strategy within a batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StrategyPath {
    Alpha,
    Beta,
    Gamma,
}

impl StrategyPath {
    pub const ALL: [Self; 3] = [Self::Alpha, Self::Beta, Self::Gamma];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Alpha => "Alpha",
            Self::Beta => "Beta",
            Self::Gamma => "Gamma",
        }
    }

    /// One-line character of the path, as requested from the model
    pub fn character(&self) -> &'static str {
        match self {
            Self::Alpha => "High-growth, high-risk",
            Self::Beta => "Cyclical, adaptive",
            Self::Gamma => "Resilient, low-entropy",
        }
    }
}

impl std::fmt::Display for StrategyPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Suitability rating attached to a strategy after scoring
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EthicalScore {
    /// Probability of goodness in [0, 1]
    pub score: f64,
    pub rationale: String,
}

impl EthicalScore {
    /// Scores below this suggest dark patterns or harmful externalities
    pub const GOODNESS_THRESHOLD: f64 = 0.9;

    pub fn is_sound(&self) -> bool {
        self.score >= Self::GOODNESS_THRESHOLD
    }

    pub fn percent(&self) -> u8 {
        (self.score * 100.0).round() as u8
    }
}

/// One named action plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Strategy {
    pub path: StrategyPath,
    pub title: String,
    pub description: String,
    pub steps: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ethical_score: Option<EthicalScore>,
}

/// Check a freshly generated batch and normalize it
///
/// Requires exactly one strategy per path, a non-blank title and at least one
/// step each. The result is ordered Alpha, Beta, Gamma and carries no scores.
pub fn validate_batch(mut strategies: Vec<Strategy>) -> Result<Vec<Strategy>, ValidationError> {
    debug!(count = strategies.len(), "validate_batch: called");
    if strategies.len() != STRATEGY_COUNT {
        return Err(ValidationError::WrongStrategyCount {
            expected: STRATEGY_COUNT,
            actual: strategies.len(),
        });
    }

    let mut seen = HashSet::new();
    for strategy in &strategies {
        if !seen.insert(strategy.path) {
            return Err(ValidationError::DuplicatePath(strategy.path));
        }
        if strategy.title.trim().is_empty() {
            return Err(ValidationError::BlankTitle(strategy.path));
        }
        if strategy.steps.iter().all(|s| s.trim().is_empty()) {
            return Err(ValidationError::NoSteps(strategy.path));
        }
    }

    // Three distinct entries cannot miss a path, but keep the check explicit
    if let Some(missing) = StrategyPath::ALL.into_iter().find(|p| !seen.contains(p)) {
        return Err(ValidationError::MissingPath(missing));
    }

    strategies.sort_by_key(|s| s.path);
    for strategy in &mut strategies {
        strategy.ethical_score = None;
        strategy.steps.retain(|s| !s.trim().is_empty());
    }
    Ok(strategies)
}

/// A score as returned by the ethics call, before it is merged
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathScore {
    pub path: StrategyPath,
    pub score: f64,
    pub rationale: String,
}

/// Attach scores to strategies by matching `path`
///
/// Only `ethical_score` is ever written. The first entry for a path wins,
/// non-finite scores are ignored and out-of-range ones are clamped to [0, 1].
/// Strategies without a matching entry are left as they are.
pub fn merge_scores(strategies: Vec<Strategy>, scores: &[PathScore]) -> Vec<Strategy> {
    debug!(strategies = strategies.len(), scores = scores.len(), "merge_scores: called");
    strategies
        .into_iter()
        .map(|mut strategy| {
            let found = scores
                .iter()
                .filter(|s| s.score.is_finite())
                .find(|s| s.path == strategy.path);
            if let Some(entry) = found {
                strategy.ethical_score = Some(EthicalScore {
                    score: entry.score.clamp(0.0, 1.0),
                    rationale: entry.rationale.trim().to_string(),
                });
            }
            strategy
        })
        .collect()
}
