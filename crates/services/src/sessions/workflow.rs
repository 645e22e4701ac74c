use std::sync::Arc;

use quiz_core::model::{AnswerVerdict, QuestionBank, QuizId};
use storage::repository::{QuizSource, StorageError};

use super::state::QuizSession;
use crate::error::LoadError;
use crate::{Clock, FeedbackPause};

/// Result of interpreting one committed answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerOutcome {
    pub verdict: AnswerVerdict,
    pub correct_answer: String,
    pub is_complete: bool,
}

/// Orchestrates quiz loading and the answer/feedback/advance cycle.
#[derive(Clone)]
pub struct QuizLoopService {
    clock: Clock,
    pause: FeedbackPause,
    quizzes: Arc<dyn QuizSource>,
}

impl QuizLoopService {
    #[must_use]
    pub fn new(clock: Clock, quizzes: Arc<dyn QuizSource>) -> Self {
        Self {
            clock,
            pause: FeedbackPause::default(),
            quizzes,
        }
    }

    #[must_use]
    pub fn with_pause(mut self, pause: FeedbackPause) -> Self {
        self.pause = pause;
        self
    }

    #[must_use]
    pub fn pause(&self) -> FeedbackPause {
        self.pause
    }

    /// A fresh, unloaded session using this service's clock.
    #[must_use]
    pub fn new_session(&self) -> QuizSession {
        QuizSession::from_os_rng().with_clock(self.clock)
    }

    /// Fetch and decode a quiz, then present its first question.
    ///
    /// Does nothing if `session` is already loaded; the source is not queried again.
    ///
    /// # Errors
    ///
    /// Returns `LoadError::NotFound` if the source has no such quiz,
    /// `LoadError::MalformedData` if its question list cannot be decoded, and
    /// `LoadError::Storage` for other source failures. The session stays unloaded.
    pub async fn load(&self, session: &mut QuizSession, quiz_id: QuizId) -> Result<(), LoadError> {
        if session.is_loaded() {
            log::debug!("load of quiz {quiz_id} skipped: session already loaded");
            return Ok(());
        }

        let record = self
            .quizzes
            .fetch_quiz(quiz_id)
            .await
            .map_err(|err| match err {
                StorageError::NotFound => LoadError::NotFound { quiz_id },
                other => LoadError::Storage(other),
            })?;

        let bank = QuestionBank::from_json(&record.question_data_raw)
            .map_err(|source| LoadError::MalformedData { quiz_id, source })?;

        log::debug!("decoded quiz {quiz_id} ({:?})", record.title);
        session.begin(quiz_id, Arc::new(bank));
        Ok(())
    }

    /// Score the current selection, keep the feedback visible for the configured
    /// pause, then move on to the next question or complete the quiz.
    ///
    /// Returns `None` without any state change when there is nothing to commit.
    pub async fn interpret_answer(&self, session: &mut QuizSession) -> Option<AnswerOutcome> {
        let correct_answer = session.current_question()?.correct_answer().to_owned();
        let verdict = session.commit_answer()?;

        if let Some(delay) = self.pause.duration() {
            tokio::time::sleep(delay).await;
        }

        session.advance();
        Some(AnswerOutcome {
            verdict,
            correct_answer,
            is_complete: session.is_complete(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::time::fixed_clock;
    use storage::repository::{InMemoryRepository, QuizWriter, RawQuizRecord};

    const ONE_QUESTION: &str = r#"[{"category":"Geography","difficulty":"easy","question":"Capital of France?","correctAnswer":"Paris","incorrectAnswers":["Berlin","Rome"]}]"#;

    async fn service_with(raw: &str) -> QuizLoopService {
        let repo = InMemoryRepository::new();
        repo.upsert_quiz(&RawQuizRecord {
            id: QuizId::new(1),
            title: "Capitals".into(),
            question_data_raw: raw.into(),
        })
        .await
        .unwrap();
        QuizLoopService::new(fixed_clock(), Arc::new(repo)).with_pause(FeedbackPause::Skip)
    }

    #[tokio::test]
    async fn interpret_reports_verdict_and_correct_answer() {
        let svc = service_with(ONE_QUESTION).await;
        let mut session = svc.new_session();
        svc.load(&mut session, QuizId::new(1)).await.unwrap();

        session.set_selected_answer("Rome");
        let outcome = svc.interpret_answer(&mut session).await.unwrap();

        assert_eq!(outcome.verdict, AnswerVerdict::Incorrect);
        assert_eq!(outcome.correct_answer, "Paris");
        assert!(outcome.is_complete);
        assert_eq!(session.correct_count(), 0);
    }

    #[tokio::test]
    async fn interpret_without_selection_is_absorbed() {
        let svc = service_with(ONE_QUESTION).await;
        let mut session = svc.new_session();
        svc.load(&mut session, QuizId::new(1)).await.unwrap();

        assert_eq!(svc.interpret_answer(&mut session).await, None);
        assert_eq!(session.position(), 0);
        assert!(!session.is_complete());
    }

    #[tokio::test]
    async fn interpret_on_unloaded_session_is_a_no_op() {
        let svc = service_with(ONE_QUESTION).await;
        let mut session = svc.new_session();
        assert_eq!(svc.interpret_answer(&mut session).await, None);
        assert!(!session.is_loaded());
    }
}
