use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use snipgym::{
    app::{App, AppState},
    app_dirs::AppDirs,
    config::{FileSettingsStore, Settings, SettingsStore},
    export::write_history_csv,
    history_db::HistoryDb,
    logging::init_logging,
    runtime::{CrosstermEventSource, GymEvent, Runner},
    snippet::{Difficulty, FixedSource, Language, Snippet, SnippetError, SnippetLibrary, SnippetSource},
    ui::screen::draw,
};
use std::{
    error::Error,
    fs::File,
    io::{self, stdin},
    path::PathBuf,
    time::Duration,
};
use tracing::{info, warn};

const TICK_RATE_MS: u64 = 100;

/// code snippet typing practice in the terminal
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Type real code snippets against the clock, with live speed and accuracy, per-session results and a persistent history of your progress."
)]
pub struct Cli {
    /// language of the snippets to practice
    #[clap(short = 'l', long, value_enum)]
    language: Option<Language>,

    /// snippet difficulty
    #[clap(short = 'd', long, value_enum)]
    difficulty: Option<Difficulty>,

    /// custom text to type instead of the built-in snippets
    #[clap(short = 'p', long)]
    prompt: Option<String>,

    /// finish each session after this many seconds
    #[clap(short = 's', long)]
    seconds: Option<u64>,

    /// keep only the most recent N sessions in the history
    #[clap(long)]
    history_limit: Option<usize>,

    /// keep settings, history and logs in this directory
    #[clap(long)]
    data_dir: Option<PathBuf>,

    /// write the session history as CSV to this file and exit
    #[clap(long, value_name = "CSV")]
    export: Option<PathBuf>,

    /// delete all recorded sessions and exit
    #[clap(long)]
    clear_history: bool,
}

impl Cli {
    fn app_dirs(&self) -> AppDirs {
        match &self.data_dir {
            Some(dir) => AppDirs::in_dir(dir),
            None => AppDirs::resolve(),
        }
    }

    /// Command line flags take precedence over saved settings
    fn apply(&self, settings: &mut Settings) {
        if let Some(language) = self.language {
            settings.language = language;
        }
        if let Some(difficulty) = self.difficulty {
            settings.difficulty = difficulty;
        }
        if self.seconds.is_some() {
            settings.time_limit_secs = self.seconds;
        }
        if self.history_limit.is_some() {
            settings.history_limit = self.history_limit;
        }
    }

    fn snippet_source(&self) -> Result<Box<dyn SnippetSource>, SnippetError> {
        Ok(match &self.prompt {
            Some(prompt) => Box::new(FixedSource(Snippet::custom(prompt))),
            None => Box::new(SnippetLibrary::embedded()?),
        })
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    let dirs = cli.app_dirs();
    init_logging(&dirs.log_path())?;
    info!(version = env!("CARGO_PKG_VERSION"), "starting snipgym");

    if let Some(path) = &cli.export {
        let db = HistoryDb::open(dirs.history_db_path())?;
        let records = db.load_all()?;
        let written = write_history_csv(&records, File::create(path)?)?;
        info!(written, path = %path.display(), "history exported");
        println!("exported {written} sessions to {}", path.display());
        return Ok(());
    }

    if cli.clear_history {
        let db = HistoryDb::open(dirs.history_db_path())?;
        db.clear()?;
        info!("history cleared");
        println!("history cleared");
        return Ok(());
    }

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let store = FileSettingsStore::new(&dirs);
    let mut settings = store.load();
    cli.apply(&mut settings);

    let history_db = match HistoryDb::open(dirs.history_db_path()) {
        Ok(db) => Some(db),
        Err(e) => {
            warn!(error = %e, "history database unavailable, sessions will not be saved");
            None
        }
    };
    let mut app = App::new(cli.snippet_source()?, settings, history_db);

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = start_tui(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = store.save(&app.settings) {
        warn!(error = %e, path = %store.path().display(), "could not save settings");
    }
    info!(sessions = app.tracker.history().len(), "exiting");

    result
}

fn start_tui<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(
        CrosstermEventSource::new(),
        Duration::from_millis(TICK_RATE_MS),
    );

    terminal.draw(|f| draw(app, f))?;
    loop {
        match runner.step() {
            GymEvent::Key(key) => {
                if app.handle_key(key) {
                    break;
                }
            }
            GymEvent::Resize => {}
            GymEvent::Tick => {
                // live stats only move while a session is running
                let running = app.state == AppState::Typing && app.tracker.is_active();
                app.on_tick();
                if !running {
                    continue;
                }
            }
        }
        terminal.draw(|f| draw(app, f))?;
    }

    Ok(())
}
