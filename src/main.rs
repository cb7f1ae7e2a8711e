use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use intervue::{
    app::{Control, Tab},
    app_dirs::AppDirs,
    config::{ConfigStore, FileConfigStore},
    export,
    runtime::{CrosstermEventSource, FixedTicker, InterviewEvent, Runner, TickClock},
    storage::SnapshotDb,
    telemetry, App,
};
use rand::{rngs::StdRng, SeedableRng};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    path::PathBuf,
    time::Duration,
};

const TICK_RATE_MS: u64 = 100;

/// terminal interview assistant with timed questions and an interviewer dashboard
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Runs a six-question timed technical interview in the terminal. Candidates upload a resume and answer in a chat; interviewers review scores, summaries and transcripts on the dashboard."
)]
pub struct Cli {
    /// resume (.pdf, .docx, .txt, .md) to start a new interview with
    #[clap(short = 'r', long)]
    resume: Option<PathBuf>,

    /// open on the interviewer dashboard
    #[clap(short = 'd', long)]
    dashboard: bool,

    /// seed for question selection, for reproducible interviews
    #[clap(long)]
    seed: Option<u64>,

    /// state database to use instead of the default location
    #[clap(long)]
    db: Option<PathBuf>,

    /// config file to use instead of the default location
    #[clap(short = 'c', long)]
    config: Option<PathBuf>,

    /// write all candidates as CSV to this path and exit
    #[clap(long)]
    export: Option<PathBuf>,
}

impl Cli {
    fn config_store(&self) -> FileConfigStore {
        match &self.config {
            Some(path) => FileConfigStore::with_path(path),
            None => FileConfigStore::new(),
        }
    }

    fn open_db(&self) -> Result<SnapshotDb, intervue::error::StoreError> {
        match &self.db {
            Some(path) => SnapshotDb::open(path),
            None => SnapshotDb::new(),
        }
    }

    fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    let config = cli.config_store().load();

    let log_path = AppDirs::log_path().unwrap_or_else(|| PathBuf::from("intervue.log"));
    if let Err(error) = telemetry::init(&log_path, &config.log_level) {
        eprintln!("intervue: logging disabled: {error}");
    }
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "starting");

    let db = cli.open_db()?;

    if let Some(path) = &cli.export {
        let (store, _) = db.load_state()?;
        let rows = export::export_to_path(&store, path)?;
        println!("exported {rows} candidates to {}", path.display());
        return Ok(());
    }

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let mut app = App::with_db(config, cli.rng(), db)?;
    if cli.dashboard {
        app.tab = Tab::Interviewer;
    }
    if let Some(path) = &cli.resume {
        app.start_with_resume(&path.display().to_string());
    }

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = start_tui(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(error) = &result {
        tracing::error!(%error, "terminal loop failed");
    }
    tracing::info!("exiting");
    result
}

fn start_tui<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(
        CrosstermEventSource::new(),
        FixedTicker::new(Duration::from_millis(TICK_RATE_MS)),
    );
    let mut clock = TickClock::new();

    loop {
        terminal.draw(|f| f.render_widget(&*app, f.area()))?;

        let event = runner.step();
        // the countdown follows wall time whatever woke us up
        app.on_tick(clock.lap());

        match event {
            InterviewEvent::Key(key) => {
                if app.on_key(key) == Control::Quit {
                    break;
                }
            }
            InterviewEvent::Resize | InterviewEvent::Tick => {}
        }
    }

    Ok(())
}
