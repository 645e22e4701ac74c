use serde::{Deserialize, Serialize};

/// Color hint shown behind the answer list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FeedbackColor {
    #[default]
    Neutral,
    Correct,
    Incorrect,
}

/// Result of comparing a committed selection against the correct answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnswerVerdict {
    Correct,
    Incorrect,
}

impl AnswerVerdict {
    #[must_use]
    pub fn is_correct(self) -> bool {
        matches!(self, Self::Correct)
    }

    #[must_use]
    pub fn feedback(self) -> FeedbackColor {
        match self {
            Self::Correct => FeedbackColor::Correct,
            Self::Incorrect => FeedbackColor::Incorrect,
        }
    }
}
