use clap::{error::ErrorKind, CommandFactory, Parser};
use std::{
    error::Error,
    io::{self, stdin, stdout},
    path::PathBuf,
};
use tracing::info;
use tracing_subscriber::EnvFilter;
use vocab_drill::{
    config::{Config, ConfigStore, FileConfigStore},
    console::{Console, TerminalConsole},
    menu,
    progress::ProgressStore,
    session::{self, SessionOptions},
    SessionError,
};

const LOG_ENV: &str = "VOCAB_DRILL_LOG";

/// drill vocabulary sets round by round until every entry is right
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Quizzes you on a vocabulary set, re-asking missed entries each round until all are answered correctly. Progress is saved after every round so a session can be resumed later."
)]
pub struct Cli {
    /// directory holding vocabulary sets (*.json)
    #[clap(long)]
    vocab_dir: Option<PathBuf>,

    /// directory where session progress is kept
    #[clap(long)]
    progress_dir: Option<PathBuf>,

    /// vocabulary file to practice, skipping the selection menus
    #[clap(short = 'f', long)]
    file: Option<PathBuf>,

    /// prompt direction: a category name from the set, or "random"
    #[clap(short = 'm', long)]
    mode: Option<String>,

    /// start over even if saved progress exists
    #[clap(long)]
    fresh: bool,

    /// remember the given directories for future runs
    #[clap(long)]
    save_config: bool,

    /// log debug details to stderr
    #[clap(short = 'v', long)]
    verbose: bool,
}

impl Cli {
    fn apply(&self, config: &mut Config) {
        if let Some(dir) = &self.vocab_dir {
            config.vocab_dir = dir.clone();
        }
        if let Some(dir) = &self.progress_dir {
            config.progress_dir = dir.clone();
        }
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = std::env::var(LOG_ENV)
        .ok()
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config_store = FileConfigStore::new();
    let mut config = config_store.load();
    cli.apply(&mut config);
    if cli.save_config {
        config_store.save(&config)?;
        info!(path = %config_store.path().display(), "configuration saved");
    }

    let store = ProgressStore::new(&config.vocab_dir, &config.progress_dir);
    let mut console = TerminalConsole::new(stdin().lock(), stdout());

    let outcome = run(&cli, &config, &store, &mut console);
    match outcome {
        Ok(()) => Ok(()),
        Err(SessionError::Vocab(e)) => {
            let mut cmd = Cli::command();
            cmd.error(ErrorKind::InvalidValue, e.to_string()).exit()
        }
        Err(SessionError::Input(e)) if e.kind() == io::ErrorKind::UnexpectedEof => {
            println!("\n👋 Input closed. Progress from finished rounds is saved.");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

fn run<C: Console>(
    cli: &Cli,
    config: &Config,
    store: &ProgressStore,
    console: &mut C,
) -> Result<(), SessionError> {
    let source = match &cli.file {
        Some(file) => file.clone(),
        None => {
            menu::main_menu(store, console)?;
            match menu::select_vocab_file(&config.vocab_dir, store, console)? {
                Some(file) => file,
                None => return Ok(()),
            }
        }
    };

    let options = SessionOptions {
        mode: cli.mode.clone(),
        fresh: cli.fresh,
        struggle_threshold: config.struggle_threshold,
    };
    let summary = session::run(store, &source, &options, console, rand::thread_rng())?;
    info!(
        total = summary.total,
        struggled = summary.struggled,
        "session finished"
    );
    Ok(())
}
