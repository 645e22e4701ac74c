use quiz_core::model::{FeedbackColor, QuizCompletion};

/// Observable properties of a quiz session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionProperty {
    QuestionInfo,
    QuestionText,
    Answers,
    SelectedAnswer,
    FeedbackColor,
    CorrectCount,
}

/// A property change together with its new value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyChange {
    QuestionInfo(String),
    QuestionText(String),
    Answers(Vec<String>),
    SelectedAnswer(String),
    FeedbackColor(FeedbackColor),
    CorrectCount(u32),
}

impl PropertyChange {
    #[must_use]
    pub fn property(&self) -> SessionProperty {
        match self {
            Self::QuestionInfo(_) => SessionProperty::QuestionInfo,
            Self::QuestionText(_) => SessionProperty::QuestionText,
            Self::Answers(_) => SessionProperty::Answers,
            Self::SelectedAnswer(_) => SessionProperty::SelectedAnswer,
            Self::FeedbackColor(_) => SessionProperty::FeedbackColor,
            Self::CorrectCount(_) => SessionProperty::CorrectCount,
        }
    }
}

/// Receives property change notifications (the presentation side).
pub trait SessionObserver: Send + Sync {
    fn property_changed(&self, change: &PropertyChange);
}

impl<F> SessionObserver for F
where
    F: Fn(&PropertyChange) + Send + Sync,
{
    fn property_changed(&self, change: &PropertyChange) {
        self(change);
    }
}

/// Receives the one-time completion signal and decides what happens next.
pub trait NavigationSink: Send + Sync {
    fn quiz_completed(&self, completion: &QuizCompletion);
}

impl<F> NavigationSink for F
where
    F: Fn(&QuizCompletion) + Send + Sync,
{
    fn quiz_completed(&self, completion: &QuizCompletion) {
        self(completion);
    }
}
