use serde::{Deserialize, Serialize};
use thiserror::Error;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question prompt cannot be empty")]
    EmptyPrompt,

    #[error("correct answer cannot be empty")]
    EmptyCorrectAnswer,

    #[error("correct answer {answer:?} is also listed as incorrect")]
    CorrectListedAsIncorrect { answer: String },
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// A single multiple-choice question as stored in a quiz definition.
///
/// Field names follow the serialized question list (`question`, `correctAnswer`,
/// `incorrectAnswers`); the snake_case spellings are accepted as well.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    category: String,
    difficulty: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    kind: Option<String>,
    #[serde(rename = "question")]
    prompt: String,
    #[serde(alias = "correct_answer")]
    correct_answer: String,
    #[serde(alias = "incorrect_answers")]
    incorrect_answers: Vec<String>,
}

impl Question {
    /// Build a validated question.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` if the prompt or correct answer is blank, or if the
    /// correct answer also appears among the incorrect answers.
    pub fn new(
        category: impl Into<String>,
        difficulty: impl Into<String>,
        prompt: impl Into<String>,
        correct_answer: impl Into<String>,
        incorrect_answers: impl IntoIterator<Item = impl Into<String>>,
    ) -> Result<Self, QuestionError> {
        let question = Self {
            category: category.into(),
            difficulty: difficulty.into(),
            kind: None,
            prompt: prompt.into(),
            correct_answer: correct_answer.into(),
            incorrect_answers: incorrect_answers.into_iter().map(Into::into).collect(),
        };
        question.validate()?;
        Ok(question)
    }

    /// Check the invariants a decoded question must satisfy.
    ///
    /// # Errors
    ///
    /// See [`Question::new`].
    pub fn validate(&self) -> Result<(), QuestionError> {
        if self.prompt.trim().is_empty() {
            return Err(QuestionError::EmptyPrompt);
        }
        if self.correct_answer.trim().is_empty() {
            return Err(QuestionError::EmptyCorrectAnswer);
        }
        if self.incorrect_answers.contains(&self.correct_answer) {
            return Err(QuestionError::CorrectListedAsIncorrect {
                answer: self.correct_answer.clone(),
            });
        }
        Ok(())
    }

    #[must_use]
    pub fn category(&self) -> &str {
        &self.category
    }

    #[must_use]
    pub fn difficulty(&self) -> &str {
        &self.difficulty
    }

    #[must_use]
    pub fn kind(&self) -> Option<&str> {
        self.kind.as_deref()
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn correct_answer(&self) -> &str {
        &self.correct_answer
    }

    #[must_use]
    pub fn incorrect_answers(&self) -> &[String] {
        &self.incorrect_answers
    }

    /// Every answer option, correct answer first, in definition order.
    #[must_use]
    pub fn answer_options(&self) -> Vec<String> {
        let mut options = Vec::with_capacity(self.incorrect_answers.len() + 1);
        options.push(self.correct_answer.clone());
        options.extend(self.incorrect_answers.iter().cloned());
        options
    }

    #[must_use]
    pub fn is_correct(&self, candidate: &str) -> bool {
        candidate == self.correct_answer
    }
}
