use quiz_core::model::{AnswerVerdict, FeedbackColor, QuizCompletion};
use services::{NavigationSink, PropertyChange, QuizLoopService, QuizSession, SessionObserver};
use tokio::io::{AsyncBufReadExt, BufReader};

/// Prints the final score when the quiz signals completion.
pub struct ResultsScreen;

impl NavigationSink for ResultsScreen {
    fn quiz_completed(&self, completion: &QuizCompletion) {
        let elapsed = completion.completed_at() - completion.started_at();
        println!();
        println!(
            "Quiz {} complete: {} of {} correct in {}s.",
            completion.quiz_id(),
            completion.correct_count(),
            completion.total_questions(),
            elapsed.num_seconds()
        );
    }
}

/// Shows the answer feedback as soon as it is known, before the pause.
pub struct FeedbackLine;

impl SessionObserver for FeedbackLine {
    fn property_changed(&self, change: &PropertyChange) {
        match change {
            PropertyChange::FeedbackColor(FeedbackColor::Correct) => println!("Correct!"),
            PropertyChange::FeedbackColor(FeedbackColor::Incorrect) => println!("Wrong."),
            _ => {}
        }
    }
}

fn print_question(session: &QuizSession) {
    println!();
    print!("{}", session.question_info());
    println!("{}", session.question_text());
    for (n, answer) in session.answers().iter().enumerate() {
        println!("  {}) {answer}", n + 1);
    }
    println!("Score: {}", session.correct_count());
}

/// Map a typed choice number onto the current answer options.
fn pick<'a>(session: &'a QuizSession, line: &str) -> Option<&'a str> {
    let n: usize = line.trim().parse().ok()?;
    session
        .answers()
        .get(n.checked_sub(1)?)
        .map(String::as_str)
}

/// Drive a loaded session from stdin until it completes or input ends.
pub async fn run(quiz_loop: &QuizLoopService, session: &mut QuizSession) -> std::io::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while !session.is_complete() {
        print_question(session);
        let Some(line) = lines.next_line().await? else {
            log::info!("input closed before the quiz finished");
            return Ok(());
        };

        let Some(choice) = pick(session, &line).map(str::to_owned) else {
            println!("Pick a number between 1 and {}.", session.answers().len());
            continue;
        };
        session.set_selected_answer(choice);

        let outcome = quiz_loop.interpret_answer(session).await;
        if let Some(outcome) = outcome.filter(|o| o.verdict == AnswerVerdict::Incorrect) {
            println!("The answer was {}.", outcome.correct_answer);
        }
    }

    Ok(())
}
