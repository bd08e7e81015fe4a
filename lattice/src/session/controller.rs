//! Session controller
//!
//! The only writer of [`SessionState`]. Every external call is split into a
//! `begin_*` step that validates and hands out a job, and a `finish_*` step
//! that applies the result. Between the two the session sits on a busy
//! screen and refuses further actions.

use tracing::{debug, info, warn};

use super::{Action, Screen, SessionError, SessionState};
use crate::clients::{Advisor, ClientError, GenerationStage};
use crate::credential::{Credential, CredentialStore};
use crate::domain::{GoalAnalysis, Strategy};

/// Identifies one outstanding call
///
/// A result carrying an old ticket is discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

/// Inputs for an analysis call
#[derive(Debug, Clone)]
pub struct AnalysisJob {
    pub ticket: Ticket,
    pub credential: Credential,
    pub goal: String,
}

/// Inputs for a generate call
#[derive(Debug, Clone)]
pub struct GenerationJob {
    pub ticket: Ticket,
    pub credential: Credential,
    pub goal: String,
    pub analysis: GoalAnalysis,
}

pub struct SessionController {
    state: SessionState,
    store: Box<dyn CredentialStore>,
    next_ticket: u64,
    current: Option<Ticket>,
}

impl SessionController {
    /// Load any stored credential and pick the first screen
    pub fn start(store: Box<dyn CredentialStore>) -> Self {
        let (credential, load_error) = match store.load() {
            Ok(credential) => (credential, None),
            Err(e) => {
                warn!(error = %e, "Failed to load stored credential");
                (None, Some(e.to_string()))
            }
        };
        let mut state = SessionState::new(credential);
        state.error_message = load_error;
        info!(screen = ?state.screen, "Session started");

        Self {
            state,
            store,
            next_ticket: 0,
            current: None,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn screen(&self) -> Screen {
        self.state.screen
    }

    pub fn loading_message(&self) -> Option<&'static str> {
        self.state.loading_message()
    }

    /// Record a failure on the current screen and hand it back
    fn fail(&mut self, err: SessionError) -> SessionError {
        debug!(error = %err, screen = ?self.state.screen, "SessionController::fail: called");
        self.state.error_message = Some(err.to_string());
        err
    }

    fn issue_ticket(&mut self) -> Ticket {
        self.next_ticket += 1;
        let ticket = Ticket(self.next_ticket);
        self.current = Some(ticket);
        ticket
    }

    /// Take the ticket back if `ticket` is the one outstanding
    fn redeem(&mut self, ticket: Ticket) -> bool {
        if self.current == Some(ticket) {
            self.current = None;
            true
        } else {
            debug!(?ticket, current = ?self.current, "SessionController::redeem: stale result dropped");
            false
        }
    }

    fn not_accepted(&self, action: Action) -> SessionError {
        SessionError::NotAccepted {
            action,
            screen: self.state.screen,
        }
    }

    /// Validate, persist and adopt a credential
    pub fn submit_credential(&mut self, raw: &str) -> Result<(), SessionError> {
        debug!("SessionController::submit_credential: called");
        if self.state.screen != Screen::AwaitingCredential {
            return Err(self.not_accepted(Action::SubmitCredential));
        }

        let credential = match Credential::new(raw) {
            Ok(c) => c,
            Err(e) => return Err(self.fail(e.into())),
        };
        if let Err(e) = self.store.save(&credential) {
            return Err(self.fail(e.into()));
        }

        info!(credential = %credential, "API key saved");
        self.state.credential = Some(credential);
        self.state.screen = Screen::AwaitingGoal;
        self.state.error_message = None;
        Ok(())
    }

    /// Remove the persisted credential and go back to the key prompt
    ///
    /// Allowed on every screen. An outstanding call is abandoned.
    pub fn forget_credential(&mut self) -> Result<(), SessionError> {
        debug!("SessionController::forget_credential: called");
        self.store.clear()?;
        self.current = None;
        self.state.clear_goal_data();
        self.state.credential = None;
        self.state.screen = Screen::AwaitingCredential;
        info!("API key forgotten");
        Ok(())
    }

    /// Move to `Analyzing` and hand out the analysis inputs
    pub fn begin_analysis(&mut self, goal: &str) -> Result<AnalysisJob, SessionError> {
        debug!(screen = ?self.state.screen, "SessionController::begin_analysis: called");
        if self.state.screen != Screen::AwaitingGoal {
            return Err(self.not_accepted(Action::SubmitGoal));
        }
        let Some(credential) = self.state.credential.clone() else {
            self.state.screen = Screen::AwaitingCredential;
            return Err(self.fail(SessionError::MissingCredential));
        };
        let goal = goal.trim();
        if goal.is_empty() {
            return Err(self.fail(SessionError::EmptyGoal));
        }

        self.state.clear_goal_data();
        self.state.goal_text = goal.to_string();
        self.state.screen = Screen::Analyzing;
        Ok(AnalysisJob {
            ticket: self.issue_ticket(),
            credential,
            goal: goal.to_string(),
        })
    }

    /// Apply an analysis result
    ///
    /// Failure returns the session to `AwaitingGoal` with the goal text kept.
    pub fn finish_analysis(
        &mut self,
        ticket: Ticket,
        result: Result<GoalAnalysis, ClientError>,
    ) -> Result<(), SessionError> {
        if !self.redeem(ticket) || self.state.screen != Screen::Analyzing {
            return Ok(());
        }
        match result {
            Ok(analysis) => {
                self.state.analysis = Some(analysis);
                self.state.screen = Screen::AnalysisReady;
                Ok(())
            }
            Err(e) => {
                self.state.screen = Screen::AwaitingGoal;
                Err(self.fail(e.into()))
            }
        }
    }

    /// Move to `GeneratingStrategies` and hand out the generate inputs
    pub fn begin_generation(&mut self) -> Result<GenerationJob, SessionError> {
        debug!(screen = ?self.state.screen, "SessionController::begin_generation: called");
        if self.state.screen != Screen::AnalysisReady {
            return Err(self.not_accepted(Action::Generate));
        }
        let (Some(credential), Some(analysis)) = (self.state.credential.clone(), self.state.analysis.clone()) else {
            self.state.screen = Screen::AwaitingGoal;
            return Err(self.fail(SessionError::MissingUpstream));
        };
        if self.state.goal_text.is_empty() {
            self.state.screen = Screen::AwaitingGoal;
            return Err(self.fail(SessionError::MissingUpstream));
        }

        self.state.strategies.clear();
        self.state.error_message = None;
        self.state.scoring = false;
        self.state.screen = Screen::GeneratingStrategies;
        Ok(GenerationJob {
            ticket: self.issue_ticket(),
            credential,
            goal: self.state.goal_text.clone(),
            analysis,
        })
    }

    /// Note that strategies are in and the ethics pass has started
    pub fn mark_scoring(&mut self, ticket: Ticket) {
        if self.current == Some(ticket) && self.state.screen == Screen::GeneratingStrategies {
            self.state.scoring = true;
        }
    }

    /// Apply a generate result
    ///
    /// Failure returns the session to `AnalysisReady`; the analysis stays.
    pub fn finish_generation(
        &mut self,
        ticket: Ticket,
        result: Result<Vec<Strategy>, ClientError>,
    ) -> Result<(), SessionError> {
        if !self.redeem(ticket) || self.state.screen != Screen::GeneratingStrategies {
            return Ok(());
        }
        self.state.scoring = false;
        match result {
            Ok(strategies) => {
                self.state.strategies = strategies;
                self.state.screen = Screen::StrategiesReady;
                Ok(())
            }
            Err(e) => {
                self.state.screen = Screen::AnalysisReady;
                Err(self.fail(e.into()))
            }
        }
    }

    /// Start over with a fresh goal, keeping the credential
    pub fn reset(&mut self) -> Result<(), SessionError> {
        debug!(screen = ?self.state.screen, "SessionController::reset: called");
        if !self.state.screen.accepts_reset() {
            return Err(self.not_accepted(Action::Reset));
        }
        self.state.clear_goal_data();
        self.state.screen = Screen::AwaitingGoal;
        Ok(())
    }

    /// Run a whole analysis in one call
    pub async fn submit_goal(&mut self, advisor: &Advisor, goal: &str) -> Result<(), SessionError> {
        let job = self.begin_analysis(goal)?;
        let result = advisor.analyze(&job.credential, &job.goal).await;
        self.finish_analysis(job.ticket, result)
    }

    /// Run generation and scoring in one call
    pub async fn generate_strategies(&mut self, advisor: &Advisor) -> Result<(), SessionError> {
        let job = self.begin_generation()?;
        let ticket = job.ticket;
        let result = advisor
            .generate_with_progress(&job.credential, &job.goal, &job.analysis, |stage| match stage {
                GenerationStage::ScoringEthics => self.mark_scoring(ticket),
            })
            .await;
        self.finish_generation(ticket, result)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::clients::ContractError;
    use crate::credential::{CredentialError, MemoryCredentialStore};
    use crate::domain::StrategyPath;
    use crate::llm::client::mock::{MockLlmClient, MockReply};
    use crate::prompts::PromptLoader;

    const ANALYSIS: &str = r#"{"negativeShifts":["A","B","C"],"positiveShifts":["D","E","F"],"decayFactors":["G","H","I"]}"#;
    const STRATEGIES: &str = r#"[
        {"path":"Alpha","title":"Franchise fast","description":"Scale.","steps":["open","expand"]},
        {"path":"Beta","title":"Seasonal pivots","description":"Adapt.","steps":["test","rotate"]},
        {"path":"Gamma","title":"Neighbourhood staple","description":"Endure.","steps":["source","serve"]}
    ]"#;
    const SCORES: &str = r#"[
        {"path":"Alpha","score":0.72,"rationale":"Debt-heavy growth."},
        {"path":"Gamma","score":0.96,"rationale":"Local and fair."}
    ]"#;

    fn keyed() -> SessionController {
        let cred = Credential::new("AIzaSyTestKey1234").unwrap();
        SessionController::start(Box::new(MemoryCredentialStore::with_credential(cred)))
    }

    fn advisor(mock: MockLlmClient) -> (Advisor, Arc<MockLlmClient>) {
        let mock = Arc::new(mock);
        let advisor = Advisor::new(mock.clone(), Arc::new(PromptLoader::embedded_only()), 4096);
        (advisor, mock)
    }

    fn analysis() -> GoalAnalysis {
        serde_json::from_str(ANALYSIS).unwrap()
    }

    struct BrokenStore;

    impl CredentialStore for BrokenStore {
        fn load(&self) -> Result<Option<Credential>, CredentialError> {
            Err(CredentialError::Io {
                path: "/nowhere".into(),
                source: std::io::Error::other("disk gone"),
            })
        }

        fn save(&mut self, _credential: &Credential) -> Result<(), CredentialError> {
            Err(CredentialError::Io {
                path: "/nowhere".into(),
                source: std::io::Error::other("read-only"),
            })
        }

        fn clear(&mut self) -> Result<(), CredentialError> {
            Ok(())
        }
    }

    #[test]
    fn test_start_without_credential() {
        let session = SessionController::start(Box::new(MemoryCredentialStore::new()));
        assert_eq!(session.screen(), Screen::AwaitingCredential);
        assert!(session.state().error_message().is_none());
    }

    #[test]
    fn test_start_with_unreadable_store() {
        let session = SessionController::start(Box::new(BrokenStore));
        assert_eq!(session.screen(), Screen::AwaitingCredential);
        assert!(session.state().error_message().unwrap().contains("disk gone"));
    }

    #[test]
    fn test_submit_credential() {
        let mut session = SessionController::start(Box::new(MemoryCredentialStore::new()));

        let err = session.submit_credential("   ").unwrap_err();
        assert!(matches!(err, SessionError::Credential(CredentialError::Empty)));
        assert_eq!(session.screen(), Screen::AwaitingCredential);
        assert!(session.state().error_message().is_some());

        session.submit_credential("  AIzaKey  ").unwrap();
        assert_eq!(session.screen(), Screen::AwaitingGoal);
        assert_eq!(session.state().credential().unwrap().expose(), "AIzaKey");
        assert!(session.state().error_message().is_none());
    }

    #[test]
    fn test_submit_credential_save_failure_stays_put() {
        let mut session = SessionController::start(Box::new(BrokenStore));
        assert!(session.submit_credential("key").is_err());
        assert_eq!(session.screen(), Screen::AwaitingCredential);
        assert!(session.state().credential().is_none());
    }

    #[test]
    fn test_begin_analysis_requires_goal() {
        let mut session = keyed();
        let err = session.begin_analysis("  ").unwrap_err();
        assert!(matches!(err, SessionError::EmptyGoal));
        assert_eq!(session.screen(), Screen::AwaitingGoal);
    }

    #[test]
    fn test_begin_analysis_after_forget_goes_to_key_prompt() {
        let mut session = keyed();
        session.forget_credential().unwrap();
        assert_eq!(session.screen(), Screen::AwaitingCredential);

        // The key prompt does not take goals
        assert!(matches!(
            session.begin_analysis("goal"),
            Err(SessionError::NotAccepted { .. })
        ));
    }

    #[test]
    fn test_missing_credential_message() {
        let mut session = keyed();
        session.state.credential = None;
        let err = session.begin_analysis("goal").unwrap_err();

        assert!(matches!(err, SessionError::MissingCredential));
        assert_eq!(session.screen(), Screen::AwaitingCredential);
        assert_eq!(session.state().error_message(), Some("API Key is not set."));
    }

    #[test]
    fn test_analysis_failure_returns_to_goal_screen() {
        let mut session = keyed();
        let job = session.begin_analysis("Launch a bakery").unwrap();
        assert_eq!(session.loading_message(), Some(crate::session::ANALYZING_MESSAGE));

        let err = ClientError::Analysis(ContractError::EmptyGoal);
        assert!(session.finish_analysis(job.ticket, Err(err)).is_err());

        assert_eq!(session.screen(), Screen::AwaitingGoal);
        assert_eq!(session.state().goal_text(), "Launch a bakery");
        assert_eq!(
            session.state().error_message(),
            Some("Failed to analyze the goal. Please check your API key and try again.")
        );
    }

    #[test]
    fn test_busy_screens_refuse_actions() {
        let mut session = keyed();
        let _job = session.begin_analysis("goal").unwrap();

        assert!(session.begin_analysis("other").is_err());
        assert!(session.begin_generation().is_err());
        assert!(session.reset().is_err());
        assert_eq!(session.screen(), Screen::Analyzing);
        assert!(session.state().error_message().is_none());
    }

    #[test]
    fn test_generate_requires_analysis_ready() {
        let mut session = keyed();
        let err = session.begin_generation().unwrap_err();
        assert!(matches!(
            err,
            SessionError::NotAccepted {
                action: Action::Generate,
                screen: Screen::AwaitingGoal
            }
        ));
    }

    #[test]
    fn test_generate_with_missing_analysis() {
        let mut session = keyed();
        session.state.screen = Screen::AnalysisReady;
        session.state.goal_text = "goal".to_string();

        let err = session.begin_generation().unwrap_err();
        assert!(matches!(err, SessionError::MissingUpstream));
        assert_eq!(session.screen(), Screen::AwaitingGoal);
        assert_eq!(
            session.state().error_message(),
            Some("Missing required data to generate strategies.")
        );
    }

    #[test]
    fn test_generation_failure_keeps_analysis() {
        let mut session = keyed();
        let job = session.begin_analysis("goal").unwrap();
        session.finish_analysis(job.ticket, Ok(analysis())).unwrap();

        let job = session.begin_generation().unwrap();
        let err = ClientError::StrategyGeneration(ContractError::EmptyGoal);
        assert!(session.finish_generation(job.ticket, Err(err)).is_err());

        assert_eq!(session.screen(), Screen::AnalysisReady);
        assert!(session.state().analysis().is_some());
        assert!(session.state().strategies().is_empty());
        assert_eq!(
            session.state().error_message(),
            Some("Failed to generate strategies. Please try again.")
        );
    }

    #[test]
    fn test_stale_result_is_ignored() {
        let mut session = keyed();
        let job = session.begin_analysis("goal").unwrap();
        session.forget_credential().unwrap();
        session.submit_credential("new-key").unwrap();

        session.finish_analysis(job.ticket, Ok(analysis())).unwrap();
        assert_eq!(session.screen(), Screen::AwaitingGoal);
        assert!(session.state().analysis().is_none());
    }

    #[test]
    fn test_reset_keeps_credential() {
        let mut session = keyed();
        let job = session.begin_analysis("goal").unwrap();
        session.finish_analysis(job.ticket, Ok(analysis())).unwrap();

        session.reset().unwrap();
        assert_eq!(session.screen(), Screen::AwaitingGoal);
        assert!(session.state().credential().is_some());
        assert!(session.state().analysis().is_none());
        assert!(session.state().goal_text().is_empty());
    }

    #[test]
    fn test_reset_rejected_on_key_prompt() {
        let mut session = SessionController::start(Box::new(MemoryCredentialStore::new()));
        assert!(session.reset().is_err());
    }

    #[tokio::test]
    async fn test_bakery_scenario() {
        let (advisor, mock) = advisor(MockLlmClient::with_texts([ANALYSIS, STRATEGIES, SCORES]));
        let mut session = keyed();

        session.submit_goal(&advisor, "Launch a bakery").await.unwrap();
        assert_eq!(session.screen(), Screen::AnalysisReady);
        assert_eq!(session.state().analysis().unwrap().decay_factors, vec!["G", "H", "I"]);

        session.generate_strategies(&advisor).await.unwrap();
        assert_eq!(session.screen(), Screen::StrategiesReady);
        assert_eq!(mock.call_count(), 3);

        let strategies = session.state().strategies();
        assert_eq!(strategies[0].path, StrategyPath::Alpha);
        assert_eq!(strategies[0].ethical_score.as_ref().unwrap().score, 0.72);
        assert!(strategies[1].ethical_score.is_none());
        assert!(strategies[2].ethical_score.as_ref().unwrap().is_sound());
        assert_eq!(session.loading_message(), None);
    }

    #[tokio::test]
    async fn test_ethics_failure_still_reaches_strategies() {
        let (advisor, _mock) = advisor(MockLlmClient::with_replies(vec![
            MockReply::Response(crate::llm::CompletionResponse::text(ANALYSIS)),
            MockReply::Response(crate::llm::CompletionResponse::text(STRATEGIES)),
            MockReply::ApiError {
                status: 429,
                message: "quota".to_string(),
            },
        ]));
        let mut session = keyed();

        session.submit_goal(&advisor, "Launch a bakery").await.unwrap();
        session.generate_strategies(&advisor).await.unwrap();

        assert_eq!(session.screen(), Screen::StrategiesReady);
        assert!(session.state().strategies().iter().all(|s| s.ethical_score.is_none()));
        assert!(session.state().error_message().is_none());
    }
}
