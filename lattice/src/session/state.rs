//! Session record and screens

use crate::credential::Credential;
use crate::domain::{GoalAnalysis, Strategy};

/// Which screen the session is on
///
/// Errors are not a screen of their own: they ride along as
/// [`SessionState::error_message`] on the screen the flow returned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Screen {
    AwaitingCredential,
    AwaitingGoal,
    Analyzing,
    AnalysisReady,
    GeneratingStrategies,
    StrategiesReady,
}

impl Screen {
    /// A call is outstanding
    pub fn is_busy(&self) -> bool {
        matches!(self, Self::Analyzing | Self::GeneratingStrategies)
    }

    /// The screen takes typed text
    pub fn takes_text(&self) -> bool {
        matches!(self, Self::AwaitingCredential | Self::AwaitingGoal)
    }

    pub fn accepts_reset(&self) -> bool {
        matches!(self, Self::AwaitingGoal | Self::AnalysisReady | Self::StrategiesReady)
    }
}

impl std::fmt::Display for Screen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::AwaitingCredential => "waiting for an API key",
            Self::AwaitingGoal => "waiting for a goal",
            Self::Analyzing => "analyzing the goal",
            Self::AnalysisReady => "showing the analysis",
            Self::GeneratingStrategies => "generating strategies",
            Self::StrategiesReady => "showing strategies",
        };
        f.write_str(name)
    }
}

pub const ANALYZING_MESSAGE: &str = "Deconstructing Goal with QKE Analysis...";
pub const GENERATING_MESSAGE: &str = "Optimizing Strategies with Cognitive Framework...";
pub const SCORING_MESSAGE: &str = "Validating Ethical Resonance...";

/// Everything the UI renders from
///
/// Owned and mutated only by the session controller.
#[derive(Debug, Clone)]
pub struct SessionState {
    pub(super) credential: Option<Credential>,
    pub(super) screen: Screen,
    pub(super) goal_text: String,
    pub(super) analysis: Option<GoalAnalysis>,
    pub(super) strategies: Vec<Strategy>,
    pub(super) error_message: Option<String>,
    pub(super) scoring: bool,
}

impl SessionState {
    pub(super) fn new(credential: Option<Credential>) -> Self {
        let screen = if credential.is_some() {
            Screen::AwaitingGoal
        } else {
            Screen::AwaitingCredential
        };
        Self {
            credential,
            screen,
            goal_text: String::new(),
            analysis: None,
            strategies: Vec::new(),
            error_message: None,
            scoring: false,
        }
    }

    /// Drop all goal-related data, keeping the credential
    pub(super) fn clear_goal_data(&mut self) {
        self.goal_text.clear();
        self.analysis = None;
        self.strategies.clear();
        self.error_message = None;
        self.scoring = false;
    }

    pub fn credential(&self) -> Option<&Credential> {
        self.credential.as_ref()
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn goal_text(&self) -> &str {
        &self.goal_text
    }

    pub fn analysis(&self) -> Option<&GoalAnalysis> {
        self.analysis.as_ref()
    }

    pub fn strategies(&self) -> &[Strategy] {
        &self.strategies
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    /// Text for the loading indicator, when a call is outstanding
    pub fn loading_message(&self) -> Option<&'static str> {
        match self.screen {
            Screen::Analyzing => Some(ANALYZING_MESSAGE),
            Screen::GeneratingStrategies if self.scoring => Some(SCORING_MESSAGE),
            Screen::GeneratingStrategies => Some(GENERATING_MESSAGE),
            _ => None,
        }
    }
}
