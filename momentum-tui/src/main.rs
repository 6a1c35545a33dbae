//! Momentum dashboard TUI: score table with a slide-out stock chart.
//!
//! Layout:
//! - Momentum table: one row per stock, one column per trading date plus
//!   future placeholders
//! - Chart: K-line with volume/MACD/RSI panels, or the momentum trend
//! - Status bar: load state, key hints, toasts

use std::fs::File;
use std::io::{self, stdout};
use std::path::PathBuf;
use std::sync::{mpsc, Mutex};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{self, Event};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tracing_subscriber::EnvFilter;

use momentum_core::config::DashboardConfig;
use momentum_core::data::build_source;
use momentum_tui::app::AppState;
use momentum_tui::worker::{self, WorkerCommand};
use momentum_tui::{input, ui};

const LOG_FILE: &str = "momentum-tui.log";

fn main() -> Result<()> {
    init_logging()?;

    // Install a panic hook that restores the terminal before printing the panic.
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stderr(), LeaveAlternateScreen);
        default_hook(info);
    }));

    let config = load_config()?;
    let source = build_source(&config.source).context("building data source")?;
    tracing::info!(source = source.name(), "starting dashboard");

    // Worker channels
    let (cmd_tx, cmd_rx) = mpsc::channel();
    let (resp_tx, resp_rx) = mpsc::channel();
    let worker_handle = worker::spawn_worker(source, cmd_rx, resp_tx).context("spawning worker thread")?;

    let mut app = AppState::new(config, cmd_tx.clone(), resp_rx);
    app.request_load();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Run the main event loop
    let result = run_app(&mut terminal, &mut app);

    // Shutdown worker
    let _ = cmd_tx.send(WorkerCommand::Shutdown);
    let _ = worker_handle.join();

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    tracing::info!("dashboard closed");
    result
}

/// File logging; the terminal belongs to the UI.
fn init_logging() -> Result<()> {
    let file = File::create(LOG_FILE).with_context(|| format!("creating {LOG_FILE}"))?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

/// `momentum-tui [--config] [PATH]`; falls back to the user config file.
fn load_config() -> Result<DashboardConfig> {
    let mut args = std::env::args().skip(1).filter(|a| a != "--config");
    let path = match args.next() {
        Some(arg) => Some(PathBuf::from(arg)),
        None => DashboardConfig::default_path(),
    };
    match path {
        Some(path) => {
            tracing::info!(path = %path.display(), "loading config");
            DashboardConfig::load_or_default(&path).with_context(|| format!("loading config {}", path.display()))
        }
        None => Ok(DashboardConfig::default()),
    }
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut AppState,
) -> Result<()> {
    loop {
        // 1. Render
        terminal.draw(|f| ui::draw(f, app))?;

        // 2. Drain worker responses (non-blocking)
        while let Ok(resp) = app.worker_rx.try_recv() {
            app.handle_worker_response(resp);
        }

        // 3. Poll for input events (50ms timeout for ~20 FPS tick)
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                input::handle_key(app, key);
            }
        }

        // 4. Expire toasts, check quit
        app.tick(Instant::now());
        if !app.running {
            break;
        }
    }
    Ok(())
}
