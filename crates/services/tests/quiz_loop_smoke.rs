use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use quiz_core::model::{FeedbackColor, QuizCompletion, QuizId};
use quiz_core::time::fixed_clock;
use services::{
    Clock, FeedbackPause, LoadError, PropertyChange, QuizLoopService, QuizSession, SessionPhase,
};
use tokio::time::Instant;

use storage::repository::{
    InMemoryRepository, QuizListItem, QuizSource, QuizWriter, RawQuizRecord, StorageError,
};

const THREE_QUESTIONS: &str = r#"[
    {"category":"Geography","difficulty":"easy","question":"Capital of France?","correctAnswer":"Paris","incorrectAnswers":["Berlin","Rome"]},
    {"category":"Science","difficulty":"medium","question":"Chemical symbol for gold?","correctAnswer":"Au","incorrectAnswers":["Ag","Gd","Go"]},
    {"category":"History","difficulty":"hard","question":"Year the Berlin Wall fell?","correctAnswer":"1989","incorrectAnswers":["1991","1987"]}
]"#;

async fn seeded_repo() -> InMemoryRepository {
    let repo = InMemoryRepository::new();
    repo.upsert_quiz(&RawQuizRecord {
        id: QuizId::new(1),
        title: "Mixed".into(),
        question_data_raw: THREE_QUESTIONS.into(),
    })
    .await
    .unwrap();
    repo.upsert_quiz(&RawQuizRecord {
        id: QuizId::new(2),
        title: "Broken".into(),
        question_data_raw: r#"[{"category":"Geo","question":"Missing fields"}]"#.into(),
    })
    .await
    .unwrap();
    repo
}

/// Counts fetches so tests can check that a repeated load never hits the source.
struct CountingSource {
    inner: InMemoryRepository,
    fetches: AtomicUsize,
}

#[async_trait]
impl QuizSource for CountingSource {
    async fn fetch_quiz(&self, id: QuizId) -> Result<RawQuizRecord, StorageError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.inner.fetch_quiz(id).await
    }

    async fn list_quizzes(&self, limit: u32) -> Result<Vec<QuizListItem>, StorageError> {
        self.inner.list_quizzes(limit).await
    }
}

fn skip_pause(repo: InMemoryRepository) -> QuizLoopService {
    QuizLoopService::new(fixed_clock(), Arc::new(repo)).with_pause(FeedbackPause::Skip)
}

#[tokio::test]
async fn three_question_quiz_completes_once_with_score() {
    let svc = skip_pause(seeded_repo().await);
    let completions: Arc<Mutex<Vec<QuizCompletion>>> = Arc::default();
    let sink = Arc::clone(&completions);

    let mut session = svc.new_session();
    session.set_navigation(Arc::new(move |done: &QuizCompletion| {
        sink.lock().unwrap().push(done.clone());
    }));
    svc.load(&mut session, QuizId::new(1)).await.unwrap();
    assert_eq!(session.question_count(), 3);

    let mut expected_correct = 0;
    let mut turn = 0;
    while !session.is_complete() {
        let question = session.current_question().unwrap();
        let choice = if turn % 2 == 0 {
            expected_correct += 1;
            question.correct_answer().to_owned()
        } else {
            question.incorrect_answers()[0].clone()
        };
        turn += 1;

        assert!(session.set_selected_answer(choice));
        let outcome = svc.interpret_answer(&mut session).await.unwrap();
        assert_eq!(outcome.is_complete, turn == 3);
    }

    assert_eq!(turn, 3);
    assert_eq!(session.correct_count(), expected_correct);

    // Nothing further happens once the quiz is over.
    session.present_current();
    assert_eq!(svc.interpret_answer(&mut session).await, None);

    let completions = completions.lock().unwrap();
    assert_eq!(completions.len(), 1);
    assert_eq!(completions[0].quiz_id(), QuizId::new(1));
    assert_eq!(completions[0].correct_count(), 2);
    assert_eq!(completions[0].total_questions(), 3);
}

#[tokio::test]
async fn missing_quiz_is_not_found_and_session_stays_unloaded() {
    let svc = skip_pause(seeded_repo().await);
    let mut session = svc.new_session();

    let err = svc.load(&mut session, QuizId::new(99)).await.unwrap_err();

    assert!(matches!(err, LoadError::NotFound { quiz_id } if quiz_id == QuizId::new(99)));
    assert_eq!(session.phase(), SessionPhase::Unloaded);
    assert_eq!(session.question_text(), "");
}

#[tokio::test]
async fn malformed_quiz_is_reported_and_a_later_load_still_works() {
    let svc = skip_pause(seeded_repo().await);
    let mut session = svc.new_session();

    let err = svc.load(&mut session, QuizId::new(2)).await.unwrap_err();
    assert!(matches!(err, LoadError::MalformedData { .. }));
    assert!(!session.is_loaded());

    svc.load(&mut session, QuizId::new(1)).await.unwrap();
    assert_eq!(session.phase(), SessionPhase::Presenting { position: 0 });
}

#[tokio::test]
async fn second_load_does_not_refetch_or_reset() {
    let source = Arc::new(CountingSource {
        inner: seeded_repo().await,
        fetches: AtomicUsize::new(0),
    });
    let svc = QuizLoopService::new(Clock::default_clock(), source.clone())
        .with_pause(FeedbackPause::Skip);
    let mut session = svc.new_session();

    svc.load(&mut session, QuizId::new(1)).await.unwrap();
    let choice = session.current_question().unwrap().correct_answer().to_owned();
    session.set_selected_answer(choice);
    svc.interpret_answer(&mut session).await.unwrap();
    let before = session.snapshot();

    svc.load(&mut session, QuizId::new(1)).await.unwrap();

    assert_eq!(source.fetches.load(Ordering::SeqCst), 1);
    assert_eq!(session.snapshot(), before);
    assert_eq!(session.position(), 1);
    assert_eq!(session.correct_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn feedback_stays_visible_for_the_configured_pause() {
    let svc = QuizLoopService::new(fixed_clock(), Arc::new(seeded_repo().await));
    assert_eq!(svc.pause(), FeedbackPause::Fixed(Duration::from_secs(1)));

    let mut session = svc.new_session();
    svc.load(&mut session, QuizId::new(1)).await.unwrap();
    let choice = session.current_question().unwrap().correct_answer().to_owned();
    session.set_selected_answer(choice);

    let started = Instant::now();
    let outcome = svc.interpret_answer(&mut session).await.unwrap();

    assert!(started.elapsed() >= Duration::from_secs(1));
    assert!(outcome.verdict.is_correct());
    // Feedback has been reset by the next presentation.
    assert_eq!(session.feedback(), FeedbackColor::Neutral);
    assert_eq!(session.position(), 1);
}

type ChangeLog = Arc<Mutex<Vec<(Instant, PropertyChange)>>>;

fn record_changes(session: &mut QuizSession) -> ChangeLog {
    let log: ChangeLog = Arc::default();
    let sink = Arc::clone(&log);
    session.subscribe(Arc::new(move |change: &PropertyChange| {
        sink.lock().unwrap().push((Instant::now(), change.clone()));
    }));
    log
}

#[tokio::test(start_paused = true)]
async fn next_question_appears_only_after_feedback_was_shown_for_the_pause() {
    let svc = QuizLoopService::new(fixed_clock(), Arc::new(seeded_repo().await));
    let mut session = svc.new_session();
    let changes = record_changes(&mut session);

    svc.load(&mut session, QuizId::new(1)).await.unwrap();
    changes.lock().unwrap().clear();

    let choice = session.current_question().unwrap().correct_answer().to_owned();
    session.set_selected_answer(choice);
    svc.interpret_answer(&mut session).await.unwrap();

    let changes = changes.lock().unwrap();
    let shown_at = changes
        .iter()
        .find(|(_, change)| *change == PropertyChange::FeedbackColor(FeedbackColor::Correct))
        .map(|(at, _)| *at)
        .expect("feedback was announced");
    let next_at = changes
        .iter()
        .find(|(_, change)| matches!(change, PropertyChange::QuestionText(_)))
        .map(|(at, _)| *at)
        .expect("next question was announced");

    assert!(next_at >= shown_at + Duration::from_secs(1));
    // While the pause runs only the score and the verdict colour change.
    assert!(
        changes
            .iter()
            .filter(|(at, _)| *at < shown_at + Duration::from_secs(1))
            .all(|(_, change)| matches!(
                change,
                PropertyChange::CorrectCount(1)
                    | PropertyChange::FeedbackColor(FeedbackColor::Correct)
            ))
    );
}

#[tokio::test(start_paused = true)]
async fn pauses_of_separate_sessions_overlap() {
    let svc = QuizLoopService::new(fixed_clock(), Arc::new(seeded_repo().await));
    let mut first = svc.new_session();
    let mut second = svc.new_session();
    for session in [&mut first, &mut second] {
        svc.load(session, QuizId::new(1)).await.unwrap();
        let choice = session.current_question().unwrap().correct_answer().to_owned();
        session.set_selected_answer(choice);
    }

    let started = Instant::now();
    let (a, b) = tokio::join!(
        svc.interpret_answer(&mut first),
        svc.interpret_answer(&mut second)
    );

    assert!(a.is_some() && b.is_some());
    let elapsed = started.elapsed();
    assert!(elapsed >= Duration::from_secs(1));
    assert!(elapsed < Duration::from_secs(2));
    assert_eq!(first.position(), 1);
    assert_eq!(second.position(), 1);
}

#[tokio::test]
async fn seeded_sessions_shuffle_reproducibly() {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    let svc = skip_pause(seeded_repo().await);
    let mut a = QuizSession::new(StdRng::seed_from_u64(5));
    let mut b = QuizSession::new(StdRng::seed_from_u64(5));
    svc.load(&mut a, QuizId::new(1)).await.unwrap();
    svc.load(&mut b, QuizId::new(1)).await.unwrap();

    assert_eq!(a.presentation_order(), b.presentation_order());
    assert_eq!(a.answers(), b.answers());
}
