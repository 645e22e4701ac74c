mod observer;
mod progress;
mod state;
mod view;
mod workflow;

// Public API of the session subsystem.
pub use crate::error::LoadError;
pub use observer::{NavigationSink, PropertyChange, SessionObserver, SessionProperty};
pub use progress::SessionProgress;
pub use state::{QuizSession, SessionPhase};
pub use view::SessionSnapshot;
pub use workflow::{AnswerOutcome, QuizLoopService};
