use std::fmt;
use std::sync::Arc;

use quiz_core::model::{QuestionBank, QuizId};
use services::{Clock, FeedbackPause, LoadError, QuizLoopService};
use storage::repository::{NewQuizRecord, QuizSource, QuizWriter, Storage};

mod terminal;

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidQuizId { raw: String },
    InvalidFeedbackMs { raw: String },
    InvalidDbUrl { raw: String },
    MissingFile,
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidQuizId { raw } => write!(f, "invalid --quiz-id value: {raw}"),
            ArgsError::InvalidFeedbackMs { raw } => {
                write!(f, "invalid --feedback-ms value: {raw}")
            }
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::MissingFile => write!(f, "seed requires --file <questions.json>"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  quiz play [--db <sqlite_url>] [--quiz-id <id>] [--feedback-ms <ms>]");
    eprintln!("  quiz seed [--db <sqlite_url>] --file <questions.json> [--title <title>]");
    eprintln!();
    eprintln!("Defaults for play:");
    eprintln!("  --db sqlite://quiz.sqlite3");
    eprintln!("  --quiz-id 1");
    eprintln!("  --feedback-ms {}", FeedbackPause::DEFAULT_MILLIS);
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  QUIZ_DB_URL, QUIZ_ID, QUIZ_FEEDBACK_MS, RUST_LOG");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Play,
    Seed,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "play" => Some(Self::Play),
            "seed" => Some(Self::Seed),
            _ => None,
        }
    }
}

/// Values taken from the environment before flags are applied.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Defaults {
    db_url: String,
    quiz_id: QuizId,
    feedback_ms: u64,
}

impl Defaults {
    fn from_env() -> Self {
        Self {
            db_url: std::env::var("QUIZ_DB_URL")
                .unwrap_or_else(|_| "sqlite://quiz.sqlite3".into()),
            quiz_id: std::env::var("QUIZ_ID")
                .ok()
                .and_then(|value| value.parse::<QuizId>().ok())
                .unwrap_or_else(|| QuizId::new(1)),
            feedback_ms: std::env::var("QUIZ_FEEDBACK_MS")
                .ok()
                .and_then(|value| value.parse::<u64>().ok())
                .unwrap_or(FeedbackPause::DEFAULT_MILLIS),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct PlayArgs {
    db_url: String,
    quiz_id: QuizId,
    pause: FeedbackPause,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct SeedArgs {
    db_url: String,
    file: std::path::PathBuf,
    title: Option<String>,
}

fn parse_db(value: String) -> Result<String, ArgsError> {
    if value.trim().is_empty() {
        return Err(ArgsError::InvalidDbUrl { raw: value });
    }
    Ok(value)
}

impl PlayArgs {
    fn parse(
        args: &mut impl Iterator<Item = String>,
        defaults: Defaults,
    ) -> Result<Self, ArgsError> {
        let mut db_url = defaults.db_url;
        let mut quiz_id = defaults.quiz_id;
        let mut feedback_ms = defaults.feedback_ms;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => db_url = parse_db(require_value(args, "--db")?)?,
                "--quiz-id" => {
                    let value = require_value(args, "--quiz-id")?;
                    quiz_id = value
                        .parse()
                        .map_err(|_| ArgsError::InvalidQuizId { raw: value.clone() })?;
                }
                "--feedback-ms" => {
                    let value = require_value(args, "--feedback-ms")?;
                    feedback_ms = value
                        .parse()
                        .map_err(|_| ArgsError::InvalidFeedbackMs { raw: value.clone() })?;
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            db_url: normalize_sqlite_url(db_url),
            quiz_id,
            pause: FeedbackPause::from_millis(feedback_ms),
        })
    }
}

impl SeedArgs {
    fn parse(
        args: &mut impl Iterator<Item = String>,
        defaults: Defaults,
    ) -> Result<Self, ArgsError> {
        let mut db_url = defaults.db_url;
        let mut file = None;
        let mut title = None;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => db_url = parse_db(require_value(args, "--db")?)?,
                "--file" => file = Some(std::path::PathBuf::from(require_value(args, "--file")?)),
                "--title" => title = Some(require_value(args, "--title")?),
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            db_url: normalize_sqlite_url(db_url),
            file: file.ok_or(ArgsError::MissingFile)?,
            title,
        })
    }
}

const MEMORY_URL: &str = "sqlite::memory:";

/// Turn `path`, `sqlite:path` or `sqlite://path` into an absolute `sqlite://` URL.
fn normalize_sqlite_url(raw: String) -> String {
    if raw == MEMORY_URL || raw.starts_with("sqlite://") {
        return raw;
    }

    let path = std::path::PathBuf::from(raw.trim().trim_start_matches("sqlite:"));
    let absolute = if path.is_absolute() {
        path
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| ".".into())
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

/// SQLite refuses to open a missing file without `mode=rwc`, so create it up front.
fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == MEMORY_URL {
        return Ok(());
    }

    let invalid = || ArgsError::InvalidDbUrl {
        raw: db_url.to_string(),
    };
    let file = db_url
        .strip_prefix("sqlite://")
        .and_then(|rest| rest.split('?').next())
        .filter(|file| !file.is_empty())
        .ok_or_else(invalid)?;

    let file = std::path::Path::new(file);
    if let Some(dir) = file.parent() {
        std::fs::create_dir_all(dir)?;
    }
    std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(file)?;
    Ok(())
}

async fn play(args: PlayArgs) -> Result<(), Box<dyn std::error::Error>> {
    prepare_sqlite_file(&args.db_url)?;
    let storage = Storage::sqlite(&args.db_url).await?;
    let quiz_loop =
        QuizLoopService::new(Clock::default_clock(), Arc::clone(&storage.quizzes))
            .with_pause(args.pause);

    let mut session = quiz_loop.new_session();
    session.set_navigation(Arc::new(terminal::ResultsScreen));
    session.subscribe(Arc::new(terminal::FeedbackLine));

    match quiz_loop.load(&mut session, args.quiz_id).await {
        Ok(()) => {}
        Err(LoadError::NotFound { quiz_id }) => {
            eprintln!("quiz {quiz_id} does not exist.");
            let available = storage.quizzes.list_quizzes(50).await?;
            if available.is_empty() {
                eprintln!("no quizzes stored yet; add one with `quiz seed --file <questions.json>`");
            } else {
                eprintln!("available quizzes:");
                for quiz in available {
                    eprintln!("  {:>4}  {}", quiz.id, quiz.title);
                }
            }
            return Ok(());
        }
        Err(err) => return Err(err.into()),
    }

    terminal::run(&quiz_loop, &mut session).await?;
    Ok(())
}

async fn seed(args: SeedArgs) -> Result<(), Box<dyn std::error::Error>> {
    let raw = std::fs::read_to_string(&args.file)?;
    let bank = QuestionBank::from_json(&raw)?;
    let title = args.title.unwrap_or_else(|| {
        args.file
            .file_stem()
            .map_or_else(|| "Quiz".to_string(), |stem| stem.to_string_lossy().into_owned())
    });

    prepare_sqlite_file(&args.db_url)?;
    let storage = Storage::sqlite(&args.db_url).await?;
    let id = storage
        .writer
        .insert_quiz(NewQuizRecord {
            title: title.clone(),
            question_data_raw: bank.to_json()?,
        })
        .await?;

    log::info!("seeded quiz {id} from {}", args.file.display());
    println!("stored quiz {id} \"{title}\" with {} questions", bank.len());
    Ok(())
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    // Default behavior: play when no subcommand is provided.
    let cmd = match argv.first().map(String::as_str) {
        None => Command::Play,
        Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(first) if first.starts_with("--") => Command::Play,
        Some(first) => Command::from_arg(first).ok_or_else(|| {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "unknown subcommand")
        })?,
    };

    if !argv.is_empty() && !argv[0].starts_with("--") {
        argv.remove(0);
    }

    let mut iter = argv.into_iter();
    let defaults = Defaults::from_env();
    let report = |e: ArgsError| {
        eprintln!("{e}");
        print_usage();
        e
    };

    match cmd {
        Command::Play => play(PlayArgs::parse(&mut iter, defaults).map_err(report)?).await,
        Command::Seed => seed(SeedArgs::parse(&mut iter, defaults).map_err(report)?).await,
    }
}

#[tokio::main]
async fn main() {
    pretty_env_logger::init();
    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
