mod command;
mod console;

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use services::{GameConfig, GameService};
use storage::json::JsonQuizRepository;
use storage::repository::{InMemoryRepository, Storage};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{EnvFilter, fmt as log_fmt, prelude::*};

use command::{Command, HELP, parse_command};
use console::ConsolePresenter;

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidDbUrl { raw: String },
    InvalidDelay { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidDelay { raw } => {
                write!(f, "invalid --reveal-delay-ms value: {raw}")
            }
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

#[derive(Debug, Clone, PartialEq, Eq)]
struct Args {
    db_url: String,
    quiz_dir: PathBuf,
    reveal_delay: Duration,
    in_memory: bool,
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --db <sqlite_url>          Saved-game database (default: sqlite://quiz.sqlite3)");
    eprintln!("  --quizzes <path>           Quiz catalog directory (default: quizzes)");
    eprintln!("  --reveal-delay-ms <ms>     Pause before revealing an answer (default: 2500)");
    eprintln!("  --memory                   Keep the saved game in memory only");
    eprintln!("  -h, --help                 Show this help");
    eprintln!();
    eprintln!("Environment (same as flags):");
    eprintln!("  QUIZ_DB_URL, QUIZ_DIR, QUIZ_REVEAL_DELAY_MS, RUST_LOG");
}

impl Args {
    fn parse(
        args: impl IntoIterator<Item = String>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ArgsError> {
        let mut db_url = env("QUIZ_DB_URL").map_or_else(
            || "sqlite://quiz.sqlite3".to_owned(),
            normalize_sqlite_url,
        );
        let mut quiz_dir: PathBuf = env("QUIZ_DIR").unwrap_or_else(|| "quizzes".into()).into();
        let mut reveal_delay = match env("QUIZ_REVEAL_DELAY_MS") {
            Some(raw) => parse_delay(raw)?,
            None => services::DEFAULT_REVEAL_DELAY,
        };
        let mut in_memory = false;

        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(&mut args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = normalize_sqlite_url(value);
                }
                "--quizzes" => quiz_dir = require_value(&mut args, "--quizzes")?.into(),
                "--reveal-delay-ms" => {
                    reveal_delay = parse_delay(require_value(&mut args, "--reveal-delay-ms")?)?;
                }
                "--memory" => in_memory = true,
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            db_url,
            quiz_dir,
            reveal_delay,
            in_memory,
        })
    }
}

fn parse_delay(raw: String) -> Result<Duration, ArgsError> {
    raw.trim()
        .parse::<u64>()
        .map(Duration::from_millis)
        .map_err(|_| ArgsError::InvalidDelay { raw })
}

fn normalize_sqlite_url(raw: String) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") {
        return raw;
    }

    let trimmed = raw.trim().to_string();
    let path_str = trimmed
        .strip_prefix("sqlite:")
        .unwrap_or(trimmed.as_str())
        .to_string();
    let path = std::path::Path::new(&path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        }
        .into());
    }

    let path = std::path::Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }
    Ok(())
}

/// Logs go to stderr so they never interleave with the game on stdout.
fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(log_fmt::layer().with_writer(std::io::stderr))
        .with(env_filter)
        .init();
}

async fn open_storage(args: &Args) -> Result<Storage, Box<dyn std::error::Error>> {
    if args.in_memory {
        tracing::info!(quizzes = %args.quiz_dir.display(), "using in-memory saves");
        return Ok(Storage {
            quizzes: Arc::new(JsonQuizRepository::new(&args.quiz_dir)),
            snapshots: Arc::new(InMemoryRepository::new()),
        });
    }

    // Open + migrate SQLite at startup. Keep this in the binary glue so core/services stay pure.
    prepare_sqlite_file(&args.db_url)?;
    let storage = Storage::sqlite(&args.db_url, &args.quiz_dir).await?;
    tracing::info!(
        db = %args.db_url,
        quizzes = %args.quiz_dir.display(),
        "storage ready"
    );
    Ok(storage)
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse(std::env::args().skip(1), |key| std::env::var(key).ok()).map_err(
        |e| {
            eprintln!("{e}");
            print_usage();
            e
        },
    )?;
    init_tracing();

    let storage = open_storage(&args).await?;
    let config = GameConfig::new().with_reveal_delay(args.reveal_delay);
    let mut game =
        GameService::new(&storage, ConsolePresenter::new(std::io::stdout())).with_config(config);

    game.start().await;
    game.presenter_mut().prompt();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            game.presenter_mut().prompt();
            continue;
        }
        match parse_command(&line, &game.view()) {
            Ok(Command::Quit) => break,
            Ok(Command::Help) => game.presenter_mut().say(HELP),
            Ok(Command::Play(intent)) => {
                // Failures were already shown and logged by the service.
                let _ = game.handle(intent).await;
            }
            Err(err) => game.presenter_mut().say(&err.to_string()),
        }
        game.presenter_mut().prompt();
    }

    tracing::info!("bye");
    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str], env: &[(&str, &str)]) -> Result<Args, ArgsError> {
        let env: Vec<(String, String)> = env
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        Args::parse(args.iter().map(|a| (*a).to_owned()), move |key| {
            env.iter().find(|(k, _)| k == key).map(|(_, v)| v.clone())
        })
    }

    #[test]
    fn defaults_apply_without_flags_or_env() {
        let args = parse(&[], &[]).unwrap();
        assert_eq!(args.db_url, "sqlite://quiz.sqlite3");
        assert_eq!(args.quiz_dir, PathBuf::from("quizzes"));
        assert_eq!(args.reveal_delay, Duration::from_millis(2500));
        assert!(!args.in_memory);
    }

    #[test]
    fn flags_override_environment() {
        let args = parse(
            &["--reveal-delay-ms", "0", "--quizzes", "data", "--memory"],
            &[("QUIZ_REVEAL_DELAY_MS", "900"), ("QUIZ_DIR", "elsewhere")],
        )
        .unwrap();
        assert_eq!(args.reveal_delay, Duration::ZERO);
        assert_eq!(args.quiz_dir, PathBuf::from("data"));
        assert!(args.in_memory);
    }

    #[test]
    fn bad_values_are_rejected() {
        assert!(matches!(
            parse(&["--reveal-delay-ms", "soon"], &[]),
            Err(ArgsError::InvalidDelay { .. })
        ));
        assert!(matches!(
            parse(&["--db"], &[]),
            Err(ArgsError::MissingValue { flag: "--db" })
        ));
        assert!(matches!(
            parse(&["--db", "  "], &[]),
            Err(ArgsError::InvalidDbUrl { .. })
        ));
        assert!(matches!(
            parse(&["--verbose"], &[]),
            Err(ArgsError::UnknownArg(_))
        ));
    }

    #[test]
    fn relative_sqlite_paths_become_absolute() {
        let url = normalize_sqlite_url("sqlite:saves/game.db".into());
        assert!(url.starts_with("sqlite://"));
        assert!(url.ends_with("saves/game.db"));
        assert_eq!(
            normalize_sqlite_url("sqlite::memory:".into()),
            "sqlite::memory:"
        );
    }
}
