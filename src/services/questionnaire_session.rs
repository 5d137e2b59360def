use crate::models::questionnaire::{Question, QuestionnaireResult};
use crate::services::catalog::Catalog;
use crate::services::classifier::classify;
use crate::services::errors::{QuestionnaireError, StoreError};
use crate::services::scoring::score_total;
use crate::services::session_store::SessionStore;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

pub const ANSWERS_KEY: &str = "questionnaire.answers";
pub const RESULT_KEY: &str = "questionnaire.result";
pub const INDEX_KEY: &str = "questionnaire.index";

/// One slot per catalog question, holding the chosen option index.
pub type AnswerSet = Vec<Option<usize>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NavAction {
    Back,
    Next,
    Finish,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Uninitialized,
    InProgress(usize),
    Completed(QuestionnaireResult),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavOutcome {
    Moved { next_index: usize },
    Completed(QuestionnaireResult),
}

#[derive(Debug)]
pub struct QuestionView<'c> {
    pub index: usize,
    pub total: usize,
    pub question: &'c Question,
    pub selected: Option<usize>,
    pub is_last: bool,
}

/// Questionnaire walk for one session, read from and written back to the
/// session store on every call.
pub struct QuestionnaireSession<'a> {
    store: &'a dyn SessionStore,
    catalog: &'a Catalog,
    session_id: &'a str,
}

impl<'a> QuestionnaireSession<'a> {
    pub fn new(store: &'a dyn SessionStore, catalog: &'a Catalog, session_id: &'a str) -> Self {
        Self {
            store,
            catalog,
            session_id,
        }
    }

    // ====================================
    // STATE

    pub async fn state(&self) -> Result<SessionState, QuestionnaireError> {
        if self.load_answers().await?.is_none() {
            return Ok(SessionState::Uninitialized);
        }
        if let Some(result) = self.read::<QuestionnaireResult>(RESULT_KEY).await? {
            return Ok(SessionState::Completed(result));
        }
        let index = self.read::<usize>(INDEX_KEY).await?.unwrap_or(0);
        Ok(SessionState::InProgress(self.catalog.clamp_index(index)))
    }

    /// Resets the session to the first question with every slot unset.
    pub async fn start(&self) -> Result<(), QuestionnaireError> {
        let answers: AnswerSet = vec![None; self.catalog.len()];
        // result goes first so a failed write never pairs it with new answers
        self.store.remove(self.session_id, RESULT_KEY).await?;
        self.write(ANSWERS_KEY, &answers).await?;
        self.write(INDEX_KEY, &0usize).await?;

        info!(session_id = self.session_id, questions = answers.len(), "questionnaire started");
        Ok(())
    }

    pub async fn question(&self, index: usize) -> Result<QuestionView<'a>, QuestionnaireError> {
        let answers = self.require_answers().await?;
        let (index, question) = self.catalog.question(index);

        Ok(QuestionView {
            index,
            total: self.catalog.len(),
            question,
            selected: answers[index],
            is_last: index == self.catalog.last_index(),
        })
    }

    // ====================================
    // ANSWERING & NAVIGATION

    /// Records an answer (if any) and then applies the navigation action.
    /// The option is validated before anything is written.
    pub async fn respond(
        &self,
        index: usize,
        option: Option<usize>,
        action: NavAction,
    ) -> Result<NavOutcome, QuestionnaireError> {
        let mut answers = self.require_answers().await?;
        let index = self.catalog.clamp_index(index);

        if let Some(choice) = option {
            self.validate_choice(index, choice)?;
            self.store_choice(&mut answers, index, choice).await?;
        }

        self.apply(&answers, index, action).await
    }

    /// Stores `option` at `index`, overwriting any previous answer.
    ///
    /// Changing an answer on a completed session drops its result, putting the
    /// session back in progress.
    pub async fn submit_answer(
        &self,
        index: usize,
        option: Option<usize>,
    ) -> Result<usize, QuestionnaireError> {
        let mut answers = self.require_answers().await?;
        let index = self.catalog.clamp_index(index);

        if let Some(choice) = option {
            self.validate_choice(index, choice)?;
            self.store_choice(&mut answers, index, choice).await?;
        }
        Ok(index)
    }

    pub async fn navigate(
        &self,
        action: NavAction,
        index: usize,
    ) -> Result<NavOutcome, QuestionnaireError> {
        let answers = self.require_answers().await?;
        let index = self.catalog.clamp_index(index);
        self.apply(&answers, index, action).await
    }

    /// Scores and classifies the current answers and marks the session completed.
    pub async fn finish(&self) -> Result<QuestionnaireResult, QuestionnaireError> {
        let answers = self.require_answers().await?;
        self.complete(&answers).await
    }

    // ====================================
    // RESULTS

    pub async fn result(&self) -> Result<QuestionnaireResult, QuestionnaireError> {
        self.read::<QuestionnaireResult>(RESULT_KEY)
            .await?
            .ok_or(QuestionnaireError::NoResultAvailable)
    }

    /// Replaces the whole answer set in one call and classifies it straight away.
    ///
    /// Shorter inputs are padded with unset slots. Negative or unknown option
    /// indices and inputs longer than the catalog are rejected.
    pub async fn submit_all(
        &self,
        submitted: &[Option<i64>],
    ) -> Result<QuestionnaireResult, QuestionnaireError> {
        if submitted.is_empty() {
            return Err(QuestionnaireError::InvalidInput(
                "No answers provided".to_string(),
            ));
        }
        if submitted.len() > self.catalog.len() {
            return Err(QuestionnaireError::InvalidInput(format!(
                "Expected at most {} answers, got {}",
                self.catalog.len(),
                submitted.len()
            )));
        }

        let mut answers: AnswerSet = vec![None; self.catalog.len()];
        for (index, value) in submitted.iter().enumerate() {
            if let Some(raw) = *value {
                let choice = usize::try_from(raw).map_err(|_| {
                    QuestionnaireError::InvalidInput(format!(
                        "Answer {} must be a non-negative option index",
                        index
                    ))
                })?;
                self.validate_choice(index, choice)?;
                answers[index] = Some(choice);
            }
        }

        self.store.remove(self.session_id, RESULT_KEY).await?;
        self.write(ANSWERS_KEY, &answers).await?;
        self.complete(&answers).await
    }

    // ====================================
    // HELPERS

    async fn apply(
        &self,
        answers: &[Option<usize>],
        index: usize,
        action: NavAction,
    ) -> Result<NavOutcome, QuestionnaireError> {
        let target = match action {
            NavAction::Back => index.saturating_sub(1),
            NavAction::Next if index + 1 < self.catalog.len() => index + 1,
            NavAction::Next | NavAction::Finish => {
                return self.complete(answers).await.map(NavOutcome::Completed);
            }
        };

        self.write(INDEX_KEY, &target).await?;
        debug!(session_id = self.session_id, from = index, to = target, "moved");
        Ok(NavOutcome::Moved { next_index: target })
    }

    async fn complete(
        &self,
        answers: &[Option<usize>],
    ) -> Result<QuestionnaireResult, QuestionnaireError> {
        let total_score = score_total(self.catalog, answers);
        let result = QuestionnaireResult {
            band: classify(total_score, self.catalog.thresholds()),
            total_score,
        };
        self.write(RESULT_KEY, &result).await?;

        info!(
            session_id = self.session_id,
            total = total_score,
            band = %result.band,
            "questionnaire completed"
        );
        Ok(result)
    }

    async fn store_choice(
        &self,
        answers: &mut AnswerSet,
        index: usize,
        choice: usize,
    ) -> Result<(), QuestionnaireError> {
        if answers[index] == Some(choice) {
            return Ok(());
        }
        // a stored result no longer matches the answers
        self.store.remove(self.session_id, RESULT_KEY).await?;
        answers[index] = Some(choice);
        self.write(ANSWERS_KEY, &*answers).await?;
        Ok(())
    }

    fn validate_choice(&self, index: usize, choice: usize) -> Result<(), QuestionnaireError> {
        match self.catalog.get(index) {
            Some(question) if question.has_option(choice) => Ok(()),
            Some(question) => Err(QuestionnaireError::InvalidInput(format!(
                "Option {} is not valid for question {} ({} options)",
                choice,
                question.code,
                question.options.len()
            ))),
            None => Err(QuestionnaireError::InvalidInput(format!(
                "Question {} does not exist",
                index
            ))),
        }
    }

    async fn require_answers(&self) -> Result<AnswerSet, QuestionnaireError> {
        self.load_answers()
            .await?
            .ok_or(QuestionnaireError::SessionExpired)
    }

    async fn load_answers(&self) -> Result<Option<AnswerSet>, StoreError> {
        let Some(mut answers) = self.read::<AnswerSet>(ANSWERS_KEY).await? else {
            return Ok(None);
        };
        // keep one slot per question even if the stored set predates the catalog
        answers.resize(self.catalog.len(), None);
        Ok(Some(answers))
    }

    async fn read<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        match self.store.get(self.session_id, key).await? {
            Some(value) => serde_json::from_value(value)
                .map(Some)
                .map_err(|source| StoreError::Codec {
                    key: key.to_string(),
                    source,
                }),
            None => Ok(None),
        }
    }

    async fn write<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let value = serde_json::to_value(value).map_err(|source| StoreError::Codec {
            key: key.to_string(),
            source,
        })?;
        self.store.set(self.session_id, key, value).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::questionnaire::Band;
    use crate::services::classifier::BandThresholds;
    use crate::services::session_store::MemorySessionStore;
    use async_trait::async_trait;
    use serde_json::Value;
    use std::sync::atomic::{AtomicBool, Ordering};

    /// Memory store whose result writes can be switched to fail.
    #[derive(Default)]
    struct FailingResultStore {
        inner: MemorySessionStore,
        fail_results: AtomicBool,
    }

    #[async_trait]
    impl SessionStore for FailingResultStore {
        async fn get(&self, session_id: &str, key: &str) -> Result<Option<Value>, StoreError> {
            self.inner.get(session_id, key).await
        }

        async fn set(&self, session_id: &str, key: &str, value: Value) -> Result<(), StoreError> {
            if key == RESULT_KEY && self.fail_results.load(Ordering::SeqCst) {
                return Err(StoreError::Backend("result write refused".to_string()));
            }
            self.inner.set(session_id, key, value).await
        }

        async fn remove(&self, session_id: &str, key: &str) -> Result<(), StoreError> {
            self.inner.remove(session_id, key).await
        }
    }

    fn small_catalog(questions: usize) -> Catalog {
        let questions = (0..questions)
            .map(|i| {
                Question::new(format!("q{i}"), format!("Question {i}"))
                    .with_option("low", 0)
                    .with_option("mid", 1)
                    .with_option("high", 2)
            })
            .collect();
        Catalog::new(questions, BandThresholds::new(3, 5).unwrap()).unwrap()
    }

    #[tokio::test]
    async fn operations_before_start_report_expired_session() {
        let store = MemorySessionStore::new();
        let catalog = small_catalog(3);
        let session = QuestionnaireSession::new(&store, &catalog, "s1");

        assert_eq!(session.state().await.unwrap(), SessionState::Uninitialized);
        assert!(matches!(
            session.question(0).await,
            Err(QuestionnaireError::SessionExpired)
        ));
        assert!(matches!(
            session.navigate(NavAction::Next, 0).await,
            Err(QuestionnaireError::SessionExpired)
        ));
        assert!(matches!(
            session.result().await,
            Err(QuestionnaireError::NoResultAvailable)
        ));
    }

    #[tokio::test]
    async fn walk_through_and_finish_twice() {
        let store = MemorySessionStore::new();
        let catalog = small_catalog(3);
        let session = QuestionnaireSession::new(&store, &catalog, "s1");
        session.start().await.unwrap();
        assert_eq!(session.state().await.unwrap(), SessionState::InProgress(0));

        let moved = session.respond(0, Some(2), NavAction::Next).await.unwrap();
        assert_eq!(moved, NavOutcome::Moved { next_index: 1 });
        assert_eq!(session.state().await.unwrap(), SessionState::InProgress(1));

        session.respond(1, Some(1), NavAction::Next).await.unwrap();
        let first = session.respond(2, Some(0), NavAction::Finish).await.unwrap();
        let second = session.navigate(NavAction::Finish, 2).await.unwrap();

        let expected = QuestionnaireResult {
            band: Band::Borderline,
            total_score: 3,
        };
        assert_eq!(first, NavOutcome::Completed(expected));
        assert_eq!(second, NavOutcome::Completed(expected));
        assert_eq!(session.result().await.unwrap(), expected);
        assert_eq!(
            session.state().await.unwrap(),
            SessionState::Completed(expected)
        );
    }

    #[tokio::test]
    async fn back_from_first_question_stays_at_zero() {
        let store = MemorySessionStore::new();
        let catalog = small_catalog(3);
        let session = QuestionnaireSession::new(&store, &catalog, "s1");
        session.start().await.unwrap();

        assert_eq!(
            session.navigate(NavAction::Back, 0).await.unwrap(),
            NavOutcome::Moved { next_index: 0 }
        );
        assert_eq!(
            session.navigate(NavAction::Back, 2).await.unwrap(),
            NavOutcome::Moved { next_index: 1 }
        );
    }

    #[tokio::test]
    async fn next_on_last_question_matches_finish() {
        let store = MemorySessionStore::new();
        let catalog = small_catalog(3);
        let session = QuestionnaireSession::new(&store, &catalog, "s1");
        session.start().await.unwrap();
        session.submit_answer(0, Some(2)).await.unwrap();
        session.submit_answer(2, Some(2)).await.unwrap();

        let via_next = session.navigate(NavAction::Next, 2).await.unwrap();
        let via_finish = session.navigate(NavAction::Finish, 2).await.unwrap();
        assert_eq!(via_next, via_finish);
        assert!(matches!(via_next, NavOutcome::Completed(r) if r.total_score == 4));
    }

    #[tokio::test]
    async fn finish_from_middle_completes() {
        let store = MemorySessionStore::new();
        let catalog = small_catalog(3);
        let session = QuestionnaireSession::new(&store, &catalog, "s1");
        session.start().await.unwrap();

        let outcome = session.navigate(NavAction::Finish, 0).await.unwrap();
        assert_eq!(
            outcome,
            NavOutcome::Completed(QuestionnaireResult {
                band: Band::Inadequate,
                total_score: 0,
            })
        );
    }

    #[tokio::test]
    async fn question_index_is_clamped_and_shows_selection() {
        let store = MemorySessionStore::new();
        let catalog = small_catalog(5);
        let session = QuestionnaireSession::new(&store, &catalog, "s1");
        session.start().await.unwrap();
        session.submit_answer(4, Some(1)).await.unwrap();

        let view = session.question(99).await.unwrap();
        assert_eq!(view.index, 4);
        assert_eq!(view.total, 5);
        assert_eq!(view.selected, Some(1));
        assert!(view.is_last);

        let first = session.question(0).await.unwrap();
        assert_eq!(first.selected, None);
        assert!(!first.is_last);
    }

    #[tokio::test]
    async fn invalid_option_is_rejected_without_writing() {
        let store = MemorySessionStore::new();
        let catalog = small_catalog(3);
        let session = QuestionnaireSession::new(&store, &catalog, "s1");
        session.start().await.unwrap();

        let err = session.respond(0, Some(3), NavAction::Next).await;
        assert!(matches!(err, Err(QuestionnaireError::InvalidInput(_))));
        assert_eq!(session.question(0).await.unwrap().selected, None);
        assert_eq!(session.state().await.unwrap(), SessionState::InProgress(0));
    }

    #[tokio::test]
    async fn changing_an_answer_reopens_completed_session() {
        let store = MemorySessionStore::new();
        let catalog = small_catalog(3);
        let session = QuestionnaireSession::new(&store, &catalog, "s1");
        session.start().await.unwrap();
        session.submit_answer(0, Some(2)).await.unwrap();
        session.finish().await.unwrap();

        // same answer again keeps the result
        session.submit_answer(0, Some(2)).await.unwrap();
        assert!(session.result().await.is_ok());

        session.submit_answer(0, Some(0)).await.unwrap();
        assert!(matches!(
            session.result().await,
            Err(QuestionnaireError::NoResultAvailable)
        ));
        assert!(matches!(
            session.state().await.unwrap(),
            SessionState::InProgress(_)
        ));
    }

    #[tokio::test]
    async fn restart_clears_previous_result() {
        let store = MemorySessionStore::new();
        let catalog = small_catalog(3);
        let session = QuestionnaireSession::new(&store, &catalog, "s1");
        session.start().await.unwrap();
        session.finish().await.unwrap();

        session.start().await.unwrap();
        assert!(matches!(
            session.result().await,
            Err(QuestionnaireError::NoResultAvailable)
        ));
        assert_eq!(session.question(0).await.unwrap().selected, None);
    }

    #[tokio::test]
    async fn direct_submit_matches_step_by_step() {
        let store = MemorySessionStore::new();
        let catalog = small_catalog(3);

        let stepped = QuestionnaireSession::new(&store, &catalog, "stepped");
        stepped.start().await.unwrap();
        stepped.respond(0, Some(2), NavAction::Next).await.unwrap();
        stepped.respond(1, Some(1), NavAction::Next).await.unwrap();
        let NavOutcome::Completed(from_steps) =
            stepped.respond(2, Some(0), NavAction::Next).await.unwrap()
        else {
            panic!("expected completion");
        };

        let direct = QuestionnaireSession::new(&store, &catalog, "direct");
        let from_submit = direct.submit_all(&[Some(2), Some(1), Some(0)]).await.unwrap();

        assert_eq!(from_steps, from_submit);
        assert_eq!(direct.result().await.unwrap(), from_submit);
        // the submitted answers back the session afterwards
        assert_eq!(direct.question(0).await.unwrap().selected, Some(2));
    }

    #[tokio::test]
    async fn direct_submit_pads_short_input_and_rejects_bad_values() {
        let store = MemorySessionStore::new();
        let catalog = small_catalog(3);
        let session = QuestionnaireSession::new(&store, &catalog, "s1");

        let result = session.submit_all(&[Some(2), None]).await.unwrap();
        assert_eq!(result.total_score, 2);
        assert_eq!(session.question(2).await.unwrap().selected, None);

        for bad in [
            vec![],
            vec![Some(-1)],
            vec![Some(5)],
            vec![Some(0), Some(0), Some(0), Some(0)],
        ] {
            assert!(matches!(
                session.submit_all(&bad).await,
                Err(QuestionnaireError::InvalidInput(_))
            ));
        }
        // failed submissions leave the earlier result in place
        assert_eq!(session.result().await.unwrap(), result);
    }

    #[tokio::test]
    async fn failed_result_write_leaves_no_stale_result() {
        let store = FailingResultStore::default();
        let catalog = small_catalog(3);
        let session = QuestionnaireSession::new(&store, &catalog, "s1");

        let first = session.submit_all(&[Some(2), Some(2), Some(2)]).await.unwrap();
        assert_eq!(first.band, Band::Adequate);

        store.fail_results.store(true, Ordering::SeqCst);
        let err = session.submit_all(&[Some(0), Some(0), Some(0)]).await;
        assert!(matches!(err, Err(QuestionnaireError::Store(_))));

        assert!(matches!(
            session.result().await,
            Err(QuestionnaireError::NoResultAvailable)
        ));
        assert_eq!(session.question(0).await.unwrap().selected, Some(0));
    }

    #[tokio::test]
    async fn failed_finish_after_changed_answer_clears_result() {
        let store = FailingResultStore::default();
        let catalog = small_catalog(3);
        let session = QuestionnaireSession::new(&store, &catalog, "s1");
        session.start().await.unwrap();
        session.respond(0, Some(2), NavAction::Finish).await.unwrap();

        store.fail_results.store(true, Ordering::SeqCst);
        let err = session.respond(0, Some(1), NavAction::Finish).await;
        assert!(matches!(err, Err(QuestionnaireError::Store(_))));

        assert!(matches!(
            session.result().await,
            Err(QuestionnaireError::NoResultAvailable)
        ));
        assert_eq!(session.question(0).await.unwrap().selected, Some(1));
        assert!(matches!(
            session.state().await.unwrap(),
            SessionState::InProgress(_)
        ));
    }
}
