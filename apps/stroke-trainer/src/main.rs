//! Stroke Trainer - Practice Hanzi stroke order by drawing with the mouse.

mod app;
mod config;
mod loader;
mod ui;

use app::App;
use config::{Config, LogConfig};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use loader::DirectorySource;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::path::Path;
use std::str::FromStr;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Redraw interval while waiting for input; drives the reveal animation.
const TICK: Duration = Duration::from_millis(50);

fn main() -> anyhow::Result<()> {
    let mut config = Config::load();
    if let Some(symbol) = std::env::args().nth(1) {
        config.data.characters = vec![symbol];
    }
    if let Some(path) = Config::log_path() {
        if let Err(e) = init_logging(&config.log, &path) {
            eprintln!("Logging disabled: {}", e);
        }
    }
    tracing::info!(characters = ?config.data.characters, "starting");

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run app
    let result = run_app(&mut terminal, config);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        tracing::error!(error = %err, "exiting with error");
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }

    Ok(())
}

/// Send `tracing` output to a file; the terminal belongs to the UI.
fn init_logging(log: &LogConfig, path: &Path) -> anyhow::Result<()> {
    if !log.enabled {
        return Ok(());
    }
    let level = tracing::Level::from_str(&log.level).unwrap_or(tracing::Level::INFO);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?;
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(|e| anyhow::anyhow!("{e}"))?;
    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, config: Config) -> anyhow::Result<()> {
    let source = DirectorySource::new(config.characters_dir());
    let mut app = App::new(config, Box::new(source));

    loop {
        app.tick(Instant::now());
        terminal.draw(|f| ui::draw(f, &mut app))?;

        if !event::poll(TICK)? {
            continue;
        }
        let event = event::read()?;
        if let Event::Key(key) = &event {
            if key.code == KeyCode::Char('q') && key.modifiers.is_empty() && !app.show_help {
                break;
            }
            if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                break;
            }
        }
        app.handle_event(&event);
    }

    // Persist option toggles; the practice list may come from the command line.
    let mut saved = Config::load();
    saved.quiz = app.config.quiz.clone();
    if let Err(e) = saved.save() {
        tracing::warn!(error = %e, "could not save config");
    }
    Ok(())
}
