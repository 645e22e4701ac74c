use async_trait::async_trait;
use quiz_core::model::QuizId;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// A stored quiz definition; the question list is kept in its serialized form
/// and decoded by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawQuizRecord {
    pub id: QuizId,
    pub title: String,
    pub question_data_raw: String,
}

/// Insert shape for a quiz whose id is assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewQuizRecord {
    pub title: String,
    pub question_data_raw: String,
}

/// Lightweight row for listing quizzes without their question payloads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizListItem {
    pub id: QuizId,
    pub title: String,
}

/// Read side: where quiz definitions come from.
#[async_trait]
pub trait QuizSource: Send + Sync {
    /// Fetch a quiz definition by ID.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if missing, or other storage errors.
    async fn fetch_quiz(&self, id: QuizId) -> Result<RawQuizRecord, StorageError>;

    /// List stored quizzes ordered by ID.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the listing cannot be read.
    async fn list_quizzes(&self, limit: u32) -> Result<Vec<QuizListItem>, StorageError>;
}

/// Write side, used for seeding.
#[async_trait]
pub trait QuizWriter: Send + Sync {
    /// Insert a quiz and return its assigned ID.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the quiz cannot be stored.
    async fn insert_quiz(&self, quiz: NewQuizRecord) -> Result<QuizId, StorageError>;

    /// Persist or replace a quiz under a known ID.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the quiz cannot be stored.
    async fn upsert_quiz(&self, quiz: &RawQuizRecord) -> Result<(), StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    quizzes: Arc<Mutex<BTreeMap<QuizId, RawQuizRecord>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self {
            quizzes: Arc::new(Mutex::new(BTreeMap::new())),
        }
    }
}

#[async_trait]
impl QuizSource for InMemoryRepository {
    async fn fetch_quiz(&self, id: QuizId) -> Result<RawQuizRecord, StorageError> {
        let guard = self
            .quizzes
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.get(&id).cloned().ok_or(StorageError::NotFound)
    }

    async fn list_quizzes(&self, limit: u32) -> Result<Vec<QuizListItem>, StorageError> {
        let guard = self
            .quizzes
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let limit = usize::try_from(limit).unwrap_or(usize::MAX);
        Ok(guard
            .values()
            .take(limit)
            .map(|quiz| QuizListItem {
                id: quiz.id,
                title: quiz.title.clone(),
            })
            .collect())
    }
}

#[async_trait]
impl QuizWriter for InMemoryRepository {
    async fn insert_quiz(&self, quiz: NewQuizRecord) -> Result<QuizId, StorageError> {
        let mut guard = self
            .quizzes
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let next = guard.keys().next_back().map_or(1, |id| id.value() + 1);
        let id = QuizId::new(next);
        guard.insert(
            id,
            RawQuizRecord {
                id,
                title: quiz.title,
                question_data_raw: quiz.question_data_raw,
            },
        );
        Ok(id)
    }

    async fn upsert_quiz(&self, quiz: &RawQuizRecord) -> Result<(), StorageError> {
        let mut guard = self
            .quizzes
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(quiz.id, quiz.clone());
        Ok(())
    }
}

/// Aggregates quiz read/write repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub quizzes: Arc<dyn QuizSource>,
    pub writer: Arc<dyn QuizWriter>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let repo = InMemoryRepository::new();
        let quizzes: Arc<dyn QuizSource> = Arc::new(repo.clone());
        let writer: Arc<dyn QuizWriter> = Arc::new(repo);
        Self { quizzes, writer }
    }
}
