//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::model::{BankError, QuizId};
use storage::repository::StorageError;

/// Errors emitted while loading a quiz into a session.
///
/// A failed load never leaves a partially loaded session behind.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LoadError {
    #[error("quiz {quiz_id} not found")]
    NotFound { quiz_id: QuizId },
    #[error("quiz {quiz_id} has malformed question data: {source}")]
    MalformedData {
        quiz_id: QuizId,
        #[source]
        source: BankError,
    },
    #[error(transparent)]
    Storage(#[from] StorageError),
}
