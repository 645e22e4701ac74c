mod bank;
mod completion;
mod feedback;
mod ids;
mod order;
mod question;

pub use bank::{BankError, QuestionBank};
pub use completion::{CompletionError, QuizCompletion};
pub use feedback::{AnswerVerdict, FeedbackColor};
pub use ids::QuizId;
pub use order::PresentationOrder;
pub use question::{Question, QuestionError};
