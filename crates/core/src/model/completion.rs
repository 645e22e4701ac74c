use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::QuizId;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CompletionError {
    #[error("completed_at is before started_at")]
    InvalidTimeRange,

    #[error("correct count ({correct}) exceeds question count ({total})")]
    CountExceedsTotal { correct: u32, total: u32 },
}

/// Payload of the one-time "quiz complete" signal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizCompletion {
    quiz_id: QuizId,
    correct_count: u32,
    total_questions: u32,
    started_at: DateTime<Utc>,
    completed_at: DateTime<Utc>,
}

impl QuizCompletion {
    /// # Errors
    ///
    /// Returns `CompletionError::InvalidTimeRange` if `completed_at` is before `started_at`.
    /// Returns `CompletionError::CountExceedsTotal` if more answers were correct than asked.
    pub fn new(
        quiz_id: QuizId,
        correct_count: u32,
        total_questions: u32,
        started_at: DateTime<Utc>,
        completed_at: DateTime<Utc>,
    ) -> Result<Self, CompletionError> {
        if completed_at < started_at {
            return Err(CompletionError::InvalidTimeRange);
        }
        if correct_count > total_questions {
            return Err(CompletionError::CountExceedsTotal {
                correct: correct_count,
                total: total_questions,
            });
        }
        Ok(Self {
            quiz_id,
            correct_count,
            total_questions,
            started_at,
            completed_at,
        })
    }

    #[must_use]
    pub fn quiz_id(&self) -> QuizId {
        self.quiz_id
    }

    #[must_use]
    pub fn correct_count(&self) -> u32 {
        self.correct_count
    }

    #[must_use]
    pub fn total_questions(&self) -> u32 {
        self.total_questions
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> DateTime<Utc> {
        self.completed_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;
    use chrono::Duration;

    #[test]
    fn rejects_reversed_time_range() {
        let now = fixed_now();
        let err = QuizCompletion::new(QuizId::new(1), 0, 3, now, now - Duration::seconds(1))
            .unwrap_err();
        assert_eq!(err, CompletionError::InvalidTimeRange);
    }

    #[test]
    fn rejects_more_correct_than_asked() {
        let now = fixed_now();
        let err = QuizCompletion::new(QuizId::new(1), 4, 3, now, now).unwrap_err();
        assert_eq!(err, CompletionError::CountExceedsTotal { correct: 4, total: 3 });
    }

    #[test]
    fn keeps_fields() {
        let now = fixed_now();
        let later = now + Duration::seconds(30);
        let done = QuizCompletion::new(QuizId::new(9), 2, 3, now, later).unwrap();
        assert_eq!(done.quiz_id(), QuizId::new(9));
        assert_eq!(done.correct_count(), 2);
        assert_eq!(done.total_questions(), 3);
        assert_eq!(done.completed_at() - done.started_at(), Duration::seconds(30));
    }

    #[test]
    fn timestamps_travel_as_rfc3339() {
        let now = fixed_now();
        let done = QuizCompletion::new(QuizId::new(4), 1, 2, now, now).unwrap();

        let json = serde_json::to_value(&done).unwrap();
        assert_eq!(json["quiz_id"], 4);
        assert_eq!(json["started_at"], "2023-11-14T22:13:20Z");

        let back: QuizCompletion = serde_json::from_value(json).unwrap();
        assert_eq!(back, done);
    }
}
