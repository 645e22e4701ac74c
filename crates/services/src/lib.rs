#![forbid(unsafe_code)]

pub mod error;
pub mod sessions;

pub use quiz_core::{Clock, FeedbackPause};
pub use sessions as session;

pub use error::LoadError;

pub use sessions::{
    AnswerOutcome, NavigationSink, PropertyChange, QuizLoopService, QuizSession, SessionObserver,
    SessionPhase, SessionProgress, SessionProperty, SessionSnapshot,
};
