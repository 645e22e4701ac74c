use quiz_core::model::QuizId;

use super::SqliteRepository;
use super::mapping::{map_list_row, map_quiz_row, quiz_id_from_i64, quiz_id_to_i64};
use crate::repository::{
    NewQuizRecord, QuizListItem, QuizSource, QuizWriter, RawQuizRecord, StorageError,
};

#[async_trait::async_trait]
impl QuizSource for SqliteRepository {
    async fn fetch_quiz(&self, id: QuizId) -> Result<RawQuizRecord, StorageError> {
        let row = sqlx::query(
            r"
            SELECT id, title, question_data_raw
            FROM quizzes WHERE id = ?1
            ",
        )
        .bind(quiz_id_to_i64(id)?)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        match row {
            Some(row) => map_quiz_row(&row),
            None => Err(StorageError::NotFound),
        }
    }

    async fn list_quizzes(&self, limit: u32) -> Result<Vec<QuizListItem>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT id, title
            FROM quizzes
            ORDER BY id ASC
            LIMIT ?1
            ",
        )
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        rows.iter().map(map_list_row).collect()
    }
}

#[async_trait::async_trait]
impl QuizWriter for SqliteRepository {
    async fn insert_quiz(&self, quiz: NewQuizRecord) -> Result<QuizId, StorageError> {
        let res = sqlx::query(
            r"
            INSERT INTO quizzes (title, question_data_raw)
            VALUES (?1, ?2)
            ",
        )
        .bind(quiz.title)
        .bind(quiz.question_data_raw)
        .execute(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        quiz_id_from_i64(res.last_insert_rowid())
    }

    async fn upsert_quiz(&self, quiz: &RawQuizRecord) -> Result<(), StorageError> {
        sqlx::query(
            r"
            INSERT INTO quizzes (id, title, question_data_raw)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(id) DO UPDATE SET
                title = excluded.title,
                question_data_raw = excluded.question_data_raw
            ",
        )
        .bind(quiz_id_to_i64(quiz.id)?)
        .bind(quiz.title.clone())
        .bind(quiz.question_data_raw.clone())
        .execute(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        Ok(())
    }
}
