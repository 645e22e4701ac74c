use quiz_core::model::QuizId;
use sqlx::Row;
use sqlx::sqlite::SqliteRow;

use crate::repository::{QuizListItem, RawQuizRecord, StorageError};

pub(crate) fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

pub(crate) fn quiz_id_from_i64(v: i64) -> Result<QuizId, StorageError> {
    u64::try_from(v)
        .map(QuizId::new)
        .map_err(|_| StorageError::Serialization("quiz_id sign overflow".into()))
}

pub(crate) fn quiz_id_to_i64(id: QuizId) -> Result<i64, StorageError> {
    i64::try_from(id.value()).map_err(|_| StorageError::Serialization("quiz_id overflow".into()))
}

pub(crate) fn map_quiz_row(row: &SqliteRow) -> Result<RawQuizRecord, StorageError> {
    Ok(RawQuizRecord {
        id: quiz_id_from_i64(row.try_get("id").map_err(ser)?)?,
        title: row.try_get("title").map_err(ser)?,
        question_data_raw: row.try_get("question_data_raw").map_err(ser)?,
    })
}

pub(crate) fn map_list_row(row: &SqliteRow) -> Result<QuizListItem, StorageError> {
    Ok(QuizListItem {
        id: quiz_id_from_i64(row.try_get("id").map_err(ser)?)?,
        title: row.try_get("title").map_err(ser)?,
    })
}
