//! greedyviz terminal player.
//!
//! App logic lives in `greedyviz::tui::app`; drawing in
//! `greedyviz::renderers::tui`. No tracing subscriber is installed so the
//! alternate screen stays clean.

#![forbid(unsafe_code)]

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use greedyviz::config::VizConfig;
use greedyviz::demos::DatasetFile;
use greedyviz::engine::{AlgorithmKind, SystemClock};
use greedyviz::error::VizResult;
use greedyviz::renderers::tui::draw;
use greedyviz::tui::VizApp;
use ratatui::{backend::CrosstermBackend, Terminal};

/// Interactive step-through player for greedy algorithms.
#[derive(Debug, Parser)]
#[command(name = "greedyviz-tui", version, about)]
struct Cli {
    /// Algorithm to start with.
    #[arg(value_enum, default_value_t = AlgorithmKind::Activity)]
    algorithm: AlgorithmKind,

    /// Seed for the random datasets.
    #[arg(long)]
    seed: Option<u64>,

    /// Configuration YAML file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Fixed dataset YAML to start with.
    #[arg(long)]
    dataset: Option<PathBuf>,
}

fn build_app(cli: &Cli) -> VizResult<VizApp> {
    let mut config = match &cli.config {
        Some(path) => VizConfig::load(path)?,
        None => VizConfig::default(),
    };
    if let Some(seed) = cli.seed {
        config.reproducibility.seed = seed;
    }
    match &cli.dataset {
        Some(path) => VizApp::from_dataset(DatasetFile::load(path)?, config, SystemClock::new()),
        None => Ok(VizApp::new(cli.algorithm, config, SystemClock::new())),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let app = match build_app(&cli) {
        Ok(app) => app,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::from(2);
        }
    };

    match run(app) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("terminal error: {e}");
            ExitCode::from(1)
        }
    }
}

fn run(mut app: VizApp) -> io::Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, crossterm::cursor::Hide)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = run_main_loop(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        crossterm::cursor::Show
    )?;

    result
}

fn run_main_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut VizApp,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| draw(f, &app.session))?;

        // Block until the next auto-play step is due or a key arrives.
        if event::poll(app.poll_timeout())? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key.code);
                }
            }
        }
        let _ = app.update();

        if app.should_quit() {
            return Ok(());
        }
    }
}
