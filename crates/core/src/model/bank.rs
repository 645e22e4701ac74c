use thiserror::Error;

use crate::model::question::{Question, QuestionError};

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BankError {
    #[error("question data could not be decoded: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("question {index} is invalid: {source}")]
    InvalidQuestion {
        index: usize,
        #[source]
        source: QuestionError,
    },
}

/// Immutable, ordered set of questions for one quiz.
///
/// Built once when a quiz is loaded and shared read-only with the session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestionBank {
    questions: Vec<Question>,
}

impl QuestionBank {
    /// Build a bank from already constructed questions.
    ///
    /// # Errors
    ///
    /// Returns `BankError::InvalidQuestion` for the first question that fails validation.
    pub fn new(questions: Vec<Question>) -> Result<Self, BankError> {
        for (index, question) in questions.iter().enumerate() {
            question
                .validate()
                .map_err(|source| BankError::InvalidQuestion { index, source })?;
        }
        Ok(Self { questions })
    }

    /// Decode the serialized question list stored with a quiz.
    ///
    /// An empty list is a valid (empty) bank.
    ///
    /// # Errors
    ///
    /// Returns `BankError::Decode` for malformed JSON or missing fields, and
    /// `BankError::InvalidQuestion` when a decoded question breaks an invariant.
    pub fn from_json(raw: &str) -> Result<Self, BankError> {
        let questions: Vec<Question> = serde_json::from_str(raw)?;
        Self::new(questions)
    }

    /// Serialize back into the stored question list format.
    ///
    /// # Errors
    ///
    /// Returns `BankError::Decode` if serialization fails.
    pub fn to_json(&self) -> Result<String, BankError> {
        Ok(serde_json::to_string(&self.questions)?)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }
}
