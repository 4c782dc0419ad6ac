// pale-grind-tui/src/main.rs
use anyhow::{Context, Result};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use pale_grind_lib::{get_config_dir_util, AppService};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    fs::OpenOptions,
    io,
    sync::Mutex,
    time::{Duration, Instant},
};
use tracing_subscriber::EnvFilter;

mod app; // Application state
mod ui; // UI rendering logic

use crate::app::App;

const LOG_FILE_NAME: &str = "pale-grind.log";

// Logs go to a file: stdout belongs to the terminal UI
fn init_logging() -> Result<()> {
    let log_path = get_config_dir_util()
        .context("Failed to determine configuration directory")?
        .join(LOG_FILE_NAME);
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("Failed to open log file {log_path:?}"))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(log_file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn main() -> Result<()> {
    init_logging()?;

    // Initialize the library service
    let app_service = AppService::initialize().context("Failed to initialize Pale Grind")?;
    let mut app = App::new(app_service)?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!("Exited with error: {:?}", err);
        eprintln!("Error: {err:?}"); // Print errors to stderr
    }

    Ok(())
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    loop {
        // Fire due clock ticks and pick up finished tip fetches before drawing
        app.on_tick(Instant::now());

        terminal.draw(|f| ui::render_ui(f, app))?;

        // Short poll keeps the clocks visibly moving without input
        if event::poll(Duration::from_millis(250))? {
            if let Event::Key(key) = event::read()? {
                // Only process key press events
                if key.kind == KeyEventKind::Press {
                    if let Err(err) = app.handle_key_event(key, Instant::now()) {
                        tracing::warn!("Key handling failed: {:?}", err);
                        app.set_error(err.to_string());
                    }
                }
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}
