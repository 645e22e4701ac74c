use serde::Serialize;

use quiz_core::model::{FeedbackColor, QuizId};

use super::progress::SessionProgress;

/// Everything a presentation layer needs to draw the current question.
///
/// Text fields are blank whenever the session is not on a playable question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSnapshot {
    pub quiz_id: Option<QuizId>,
    pub question_info: String,
    pub question_text: String,
    pub answers: Vec<String>,
    pub selected_answer: String,
    pub feedback: FeedbackColor,
    pub correct_count: u32,
    pub progress: SessionProgress,
}
