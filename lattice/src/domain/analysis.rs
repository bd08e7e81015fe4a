//! Goal analysis: the three-category decomposition of a goal

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::ValidationError;

/// Items requested (and required) per analysis category
pub const ITEMS_PER_CATEGORY: usize = 3;

/// One of the three lists an analysis carries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisCategory {
    /// Discrete failure points that would terminate the goal
    NegativeShifts,
    /// Unscaled opportunities that could accelerate it
    PositiveShifts,
    /// Slow risks that erode it over time
    DecayFactors,
}

impl AnalysisCategory {
    pub const ALL: [Self; 3] = [Self::NegativeShifts, Self::PositiveShifts, Self::DecayFactors];

    /// Wire name of the JSON field
    pub fn field_name(&self) -> &'static str {
        match self {
            Self::NegativeShifts => "negativeShifts",
            Self::PositiveShifts => "positiveShifts",
            Self::DecayFactors => "decayFactors",
        }
    }

    /// Heading used when displaying the category
    pub fn title(&self) -> &'static str {
        match self {
            Self::NegativeShifts => "Critical Failure Points",
            Self::PositiveShifts => "Unscaled Opportunities",
            Self::DecayFactors => "Exponential Risks",
        }
    }

    pub fn subtitle(&self) -> &'static str {
        match self {
            Self::NegativeShifts => "Negative Shifts",
            Self::PositiveShifts => "Positive Shifts",
            Self::DecayFactors => "Decay Factors",
        }
    }
}

impl std::fmt::Display for AnalysisCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.field_name())
    }
}

/// Decomposition of a goal into risks and opportunities
///
/// Built once per goal submission and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalAnalysis {
    pub negative_shifts: Vec<String>,
    pub positive_shifts: Vec<String>,
    pub decay_factors: Vec<String>,
}

impl GoalAnalysis {
    pub fn items(&self, category: AnalysisCategory) -> &[String] {
        match category {
            AnalysisCategory::NegativeShifts => &self.negative_shifts,
            AnalysisCategory::PositiveShifts => &self.positive_shifts,
            AnalysisCategory::DecayFactors => &self.decay_factors,
        }
    }

    /// Check every category holds exactly [`ITEMS_PER_CATEGORY`] non-blank items
    pub fn validate(&self) -> Result<(), ValidationError> {
        debug!("GoalAnalysis::validate: called");
        for category in AnalysisCategory::ALL {
            let items = self.items(category);
            if items.len() != ITEMS_PER_CATEGORY {
                return Err(ValidationError::WrongItemCount {
                    category,
                    expected: ITEMS_PER_CATEGORY,
                    actual: items.len(),
                });
            }
            if let Some(index) = items.iter().position(|s| s.trim().is_empty()) {
                return Err(ValidationError::BlankItem { category, index });
            }
        }
        Ok(())
    }

    /// Copy with surrounding whitespace stripped from every item
    pub fn trimmed(self) -> Self {
        let trim = |v: Vec<String>| v.into_iter().map(|s| s.trim().to_string()).collect();
        Self {
            negative_shifts: trim(self.negative_shifts),
            positive_shifts: trim(self.positive_shifts),
            decay_factors: trim(self.decay_factors),
        }
    }
}
