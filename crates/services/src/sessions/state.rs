use chrono::{DateTime, Utc};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use std::fmt;
use std::sync::Arc;

use quiz_core::Clock;
use quiz_core::model::{
    AnswerVerdict, FeedbackColor, PresentationOrder, Question, QuestionBank, QuizCompletion,
    QuizId,
};

use super::observer::{NavigationSink, PropertyChange, SessionObserver};
use super::progress::SessionProgress;
use super::view::SessionSnapshot;

//
// ─── PHASE ─────────────────────────────────────────────────────────────────────
//

/// Coarse lifecycle of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Unloaded,
    Presenting { position: usize },
    Completed,
}

struct ActiveQuiz {
    quiz_id: QuizId,
    bank: Arc<QuestionBank>,
    order: PresentationOrder,
    started_at: DateTime<Utc>,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// Single play-through of one quiz.
///
/// Questions are shown in a random order fixed at load time; each question's
/// answers are reshuffled whenever it is presented. A selection is scored at most
/// once, and the completion signal is sent exactly once when the last question
/// has been answered.
pub struct QuizSession {
    rng: StdRng,
    clock: Clock,
    quiz: Option<ActiveQuiz>,
    position: usize,
    last_presented: Option<usize>,
    correct_count: u32,
    answers: Vec<String>,
    selected: Option<String>,
    committed: bool,
    feedback: FeedbackColor,
    completion: Option<QuizCompletion>,
    observers: Vec<Arc<dyn SessionObserver>>,
    navigation: Option<Arc<dyn NavigationSink>>,
}

impl QuizSession {
    /// Create an unloaded session that draws all of its randomness from `rng`.
    #[must_use]
    pub fn new(rng: StdRng) -> Self {
        Self {
            rng,
            clock: Clock::default_clock(),
            quiz: None,
            position: 0,
            last_presented: None,
            correct_count: 0,
            answers: Vec::new(),
            selected: None,
            committed: false,
            feedback: FeedbackColor::Neutral,
            completion: None,
            observers: Vec::new(),
            navigation: None,
        }
    }

    /// Create an unloaded session seeded from the operating system.
    #[must_use]
    pub fn from_os_rng() -> Self {
        Self::new(StdRng::from_os_rng())
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    #[must_use]
    pub fn with_navigation(mut self, sink: Arc<dyn NavigationSink>) -> Self {
        self.navigation = Some(sink);
        self
    }

    pub fn set_navigation(&mut self, sink: Arc<dyn NavigationSink>) {
        self.navigation = Some(sink);
    }

    pub fn subscribe(&mut self, observer: Arc<dyn SessionObserver>) {
        self.observers.push(observer);
    }

    /// Start playing `bank` and present its first question.
    ///
    /// Returns `false` without touching any state if a quiz is already loaded.
    pub fn begin(&mut self, quiz_id: QuizId, bank: Arc<QuestionBank>) -> bool {
        if let Some(active) = &self.quiz {
            log::debug!(
                "session already loaded with quiz {}; ignoring load of {quiz_id}",
                active.quiz_id
            );
            return false;
        }

        let total = bank.len();
        let order = PresentationOrder::shuffled(total, &mut self.rng);
        self.quiz = Some(ActiveQuiz {
            quiz_id,
            bank,
            order,
            started_at: self.clock.now(),
        });
        self.position = 0;
        self.last_presented = None;
        self.answers.clear();
        self.selected = None;
        self.committed = false;
        self.completion = None;

        self.correct_count = 0;
        self.notify(PropertyChange::CorrectCount(0));
        self.feedback = FeedbackColor::Neutral;
        self.notify(PropertyChange::FeedbackColor(FeedbackColor::Neutral));

        log::info!("loaded quiz {quiz_id} with {total} questions");
        self.present_current();
        true
    }

    /// Present the question at the current position, or signal completion when
    /// every question has been answered.
    ///
    /// Presenting the same position twice is a no-op, so a selection in progress
    /// is never cleared and the answers are not reshuffled.
    pub fn present_current(&mut self) {
        let Some(active) = &self.quiz else {
            return;
        };

        if self.position >= active.order.len() {
            self.complete();
            return;
        }

        if self.last_presented == Some(self.position) {
            log::debug!("question {} already presented", self.position + 1);
            return;
        }

        let bank = Arc::clone(&active.bank);
        let Some(question) = active
            .order
            .question_index(self.position)
            .and_then(|index| bank.get(index))
        else {
            return;
        };

        let info = self.question_info();
        self.notify(PropertyChange::QuestionInfo(info));
        self.notify(PropertyChange::QuestionText(question.prompt().to_owned()));

        let mut answers = question.answer_options();
        answers.shuffle(&mut self.rng);
        self.answers = answers;
        self.notify(PropertyChange::Answers(self.answers.clone()));

        self.selected = None;
        self.committed = false;
        self.notify(PropertyChange::SelectedAnswer(String::new()));

        self.feedback = FeedbackColor::Neutral;
        self.notify(PropertyChange::FeedbackColor(FeedbackColor::Neutral));

        self.last_presented = Some(self.position);
    }

    /// Record the user's choice for the current question.
    ///
    /// An empty value clears the selection. Returns `false` when the value is
    /// ignored: no playable question, the answer was already committed, or the
    /// value is not one of the current options.
    pub fn set_selected_answer(&mut self, value: impl Into<String>) -> bool {
        let value = value.into();
        if !self.is_playable() {
            log::debug!("ignoring selection outside of a playable question");
            return false;
        }
        if self.committed {
            log::debug!("answer for question {} already committed", self.position + 1);
            return false;
        }

        if value.is_empty() {
            self.selected = None;
            self.notify(PropertyChange::SelectedAnswer(String::new()));
            return true;
        }

        if !self.answers.contains(&value) {
            log::warn!("ignoring selection {value:?}: not an answer option");
            return false;
        }

        self.selected = Some(value.clone());
        self.notify(PropertyChange::SelectedAnswer(value));
        true
    }

    /// Score the pending selection.
    ///
    /// Returns `None` (and changes nothing) when there is no uncommitted
    /// selection, which absorbs duplicate commit triggers.
    pub fn commit_answer(&mut self) -> Option<AnswerVerdict> {
        if self.committed {
            log::debug!("duplicate answer commit for question {}", self.position + 1);
            return None;
        }
        let Some(selected) = self.selected.as_deref() else {
            log::debug!("answer commit without a selection");
            return None;
        };
        let question = self.current_question()?;

        let verdict = if question.is_correct(selected) {
            AnswerVerdict::Correct
        } else {
            AnswerVerdict::Incorrect
        };

        self.committed = true;
        if verdict.is_correct() {
            self.correct_count = self.correct_count.saturating_add(1);
            self.notify(PropertyChange::CorrectCount(self.correct_count));
        }
        self.feedback = verdict.feedback();
        self.notify(PropertyChange::FeedbackColor(self.feedback));

        Some(verdict)
    }

    /// Move past a committed question and present the next one (or complete).
    pub(crate) fn advance(&mut self) {
        if !self.committed {
            log::debug!("advance requested before the answer was committed");
            return;
        }
        let Some(total) = self.quiz.as_ref().map(|active| active.order.len()) else {
            return;
        };
        if self.position < total {
            self.position += 1;
        }
        self.present_current();
    }

    fn complete(&mut self) {
        if self.completion.is_some() {
            log::debug!("quiz already complete");
            return;
        }
        let Some(active) = &self.quiz else {
            return;
        };

        let completed_at = self.clock.now().max(active.started_at);
        let total = u32::try_from(active.order.len()).unwrap_or(u32::MAX);
        match QuizCompletion::new(
            active.quiz_id,
            self.correct_count,
            total,
            active.started_at,
            completed_at,
        ) {
            Ok(completion) => {
                log::info!(
                    "quiz {} complete: {}/{} correct",
                    completion.quiz_id(),
                    completion.correct_count(),
                    completion.total_questions()
                );
                if let Some(sink) = &self.navigation {
                    sink.quiz_completed(&completion);
                }
                self.completion = Some(completion);
            }
            Err(err) => log::error!("cannot complete quiz {}: {err}", active.quiz_id),
        }
    }

    fn notify(&self, change: PropertyChange) {
        for observer in &self.observers {
            observer.property_changed(&change);
        }
    }

    fn is_playable(&self) -> bool {
        self.quiz
            .as_ref()
            .is_some_and(|active| self.position < active.order.len())
    }

    //
    // ─── ACCESSORS ─────────────────────────────────────────────────────────────
    //

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        match &self.quiz {
            None => SessionPhase::Unloaded,
            Some(active) if self.position >= active.order.len() => SessionPhase::Completed,
            Some(_) => SessionPhase::Presenting {
                position: self.position,
            },
        }
    }

    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.quiz.is_some()
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        matches!(self.phase(), SessionPhase::Completed)
    }

    #[must_use]
    pub fn quiz_id(&self) -> Option<QuizId> {
        self.quiz.as_ref().map(|active| active.quiz_id)
    }

    #[must_use]
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.quiz.as_ref().map(|active| active.started_at)
    }

    #[must_use]
    pub fn completion(&self) -> Option<&QuizCompletion> {
        self.completion.as_ref()
    }

    /// Zero-based position in the presentation order.
    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    #[must_use]
    pub fn question_count(&self) -> usize {
        self.quiz.as_ref().map_or(0, |active| active.order.len())
    }

    #[must_use]
    pub fn presentation_order(&self) -> Option<&PresentationOrder> {
        self.quiz.as_ref().map(|active| &active.order)
    }

    /// The question at the current position, if the session is playable.
    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        let active = self.quiz.as_ref()?;
        let index = active.order.question_index(self.position)?;
        active.bank.get(index)
    }

    /// Number, category and difficulty of the current question; blank when not playable.
    #[must_use]
    pub fn question_info(&self) -> String {
        match self.current_question() {
            Some(question) => format!(
                "Question number {}\nCategory: {}\nDifficulty: {}\n",
                self.position + 1,
                question.category(),
                question.difficulty()
            ),
            None => String::new(),
        }
    }

    /// Prompt of the current question; blank when not playable.
    #[must_use]
    pub fn question_text(&self) -> String {
        self.current_question()
            .map(|question| question.prompt().to_owned())
            .unwrap_or_default()
    }

    /// Shuffled answer options of the current question; empty when not playable.
    #[must_use]
    pub fn answers(&self) -> &[String] {
        if self.is_playable() {
            self.answers.as_slice()
        } else {
            &[]
        }
    }

    #[must_use]
    pub fn selected_answer(&self) -> &str {
        self.selected.as_deref().unwrap_or_default()
    }

    #[must_use]
    pub fn feedback(&self) -> FeedbackColor {
        self.feedback
    }

    #[must_use]
    pub fn correct_count(&self) -> u32 {
        self.correct_count
    }

    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        let total = self.question_count();
        let answered = self.position.min(total);
        SessionProgress {
            total,
            answered,
            remaining: total - answered,
            is_complete: self.is_complete(),
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            quiz_id: self.quiz_id(),
            question_info: self.question_info(),
            question_text: self.question_text(),
            answers: self.answers().to_vec(),
            selected_answer: self.selected_answer().to_owned(),
            feedback: self.feedback,
            correct_count: self.correct_count,
            progress: self.progress(),
        }
    }
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("quiz_id", &self.quiz_id())
            .field("question_count", &self.question_count())
            .field("position", &self.position)
            .field("last_presented", &self.last_presented)
            .field("correct_count", &self.correct_count)
            .field("selected", &self.selected)
            .field("committed", &self.committed)
            .field("feedback", &self.feedback)
            .field("completed", &self.completion.is_some())
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
