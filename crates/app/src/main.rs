use std::fmt;
use std::sync::Arc;

use services::{
    AppServices, Narrator, SessionConfig, SessionEvent, SessionRuntime, UnavailableNarrator,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

mod input;
mod render;
mod speech;

use input::HostCommand;
use speech::CommandNarrator;

#[derive(Debug, PartialEq, Eq)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidDbUrl { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
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
    eprintln!("  cargo run -p app -- [--db <sqlite_url>] [--speech-cmd <program>] [--debug]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --db sqlite:drill.sqlite3");
    eprintln!("  --speech-cmd first of espeak-ng, espeak, say, spd-say on PATH");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  DRILL_DB_URL, DRILL_SPEECH_CMD, RUST_LOG");
}

#[derive(Debug, PartialEq, Eq)]
struct Args {
    db_url: String,
    speech_cmd: Option<String>,
    debug: bool,
    help: bool,
}

impl Args {
    fn parse(
        args: &mut impl Iterator<Item = String>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ArgsError> {
        let mut db_url = env("DRILL_DB_URL")
            .map_or_else(|| "sqlite://drill.sqlite3".into(), normalize_sqlite_url);
        let mut speech_cmd = env("DRILL_SPEECH_CMD").filter(|v| !v.trim().is_empty());
        let mut debug = false;
        let mut help = false;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = normalize_sqlite_url(value);
                }
                "--speech-cmd" => speech_cmd = Some(require_value(args, "--speech-cmd")?),
                "--debug" => debug = true,
                "--help" | "-h" => help = true,
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            db_url,
            speech_cmd,
            debug,
            help,
        })
    }
}

fn normalize_sqlite_url(raw: String) -> String {
    if raw.starts_with("sqlite::memory:") || raw.starts_with("sqlite://") {
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
            .unwrap_or_else(|_| std::path::PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

/// Make sure the database file exists so the pool can open it.
fn prepare_sqlite_file(db_url: &str) -> std::io::Result<()> {
    let Some(path) = db_url.strip_prefix("sqlite://") else {
        return Ok(());
    };
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Ok(());
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

fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

enum Step {
    Line(Option<String>),
    Event(Option<SessionEvent>),
}

fn show_problem(runtime: &SessionRuntime) {
    if runtime.engine().is_active() {
        println!("{}", render::render_status(runtime.engine()));
    }
    println!("{}", render::render_problem(runtime.engine()));
}

/// Apply one learner command. Returns false when the learner quits.
async fn apply_command(runtime: &mut SessionRuntime, command: HostCommand) -> bool {
    match command {
        HostCommand::Empty => {}
        HostCommand::Quit => return false,
        HostCommand::Help => println!("{}", render::HELP),
        HostCommand::Status => println!("{}", render::render_status(runtime.engine())),
        HostCommand::Trace => println!("{}", render::render_trace(runtime.engine())),
        HostCommand::Start => {
            runtime.start().await;
            show_problem(runtime);
        }
        HostCommand::Next => {
            if runtime.next_problem().await {
                show_problem(runtime);
            } else {
                println!("A session is running; answer the current problem.");
            }
        }
        HostCommand::Speech(enabled) => {
            runtime.set_narration_enabled(enabled).await;
            if let Some(notice) = runtime.narration_notice().filter(|_| enabled) {
                println!("{notice}");
            }
            println!("Speech mode {}.", if enabled { "on" } else { "off" });
        }
        HostCommand::Answer(raw) => match runtime.submit_answer(&raw).await {
            Some(outcome) => {
                println!("{}", outcome.check.feedback());
                if !runtime.engine().is_active() {
                    println!("Type `next` for another problem.");
                }
            }
            None => println!("Hold on, the next problem is on its way."),
        },
    }
    true
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv = std::env::args().skip(1);
    let args = match Args::parse(&mut argv, |key| std::env::var(key).ok()) {
        Ok(args) => args,
        Err(err) => {
            eprintln!("{err}");
            print_usage();
            std::process::exit(2);
        }
    };
    if args.help {
        print_usage();
        return Ok(());
    }

    init_tracing(args.debug);

    if let Err(err) = prepare_sqlite_file(&args.db_url) {
        tracing::warn!(db_url = %args.db_url, error = %err, "cannot prepare database file");
    }
    let services = AppServices::open(&args.db_url).await;

    let narrator: Arc<dyn Narrator> = match CommandNarrator::detect(args.speech_cmd.as_deref()) {
        Some(narrator) => Arc::new(narrator),
        None => Arc::new(UnavailableNarrator),
    };

    let mut runtime = services
        .boot_runtime(SessionConfig::default(), narrator)
        .await;

    println!("Math Practice");
    if let Some(notice) = runtime.narration_notice() {
        println!("{notice}");
    }
    if runtime.engine().state().show_start_prompt {
        println!("Type `start` to begin a session, or `help` for commands.");
    }
    show_problem(&runtime);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let step = tokio::select! {
            line = lines.next_line() => Step::Line(line?),
            event = runtime.next_event() => Step::Event(event),
        };

        match step {
            Step::Line(None) | Step::Event(None) => break,
            Step::Line(Some(line)) => {
                if !apply_command(&mut runtime, HostCommand::parse(&line)).await {
                    break;
                }
            }
            Step::Event(Some(event)) => {
                let before = runtime.engine().problem_seq();
                if runtime.handle_event(event).await && runtime.engine().problem_seq() != before {
                    show_problem(&runtime);
                }
            }
        }
    }

    runtime.shutdown();
    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
