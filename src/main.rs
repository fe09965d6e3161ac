//! A terminal time-deal catalog.
//!
//! Run the binary to browse the hourly time deals, today's lure deals and
//! the brand-deal catalog.  Lists load more as you scroll near the bottom.

mod api;
mod app;
mod config;
mod core;
mod ui;

use std::fs::File;
use std::io::{self, stderr};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc;

use crate::api::HttpDealSource;
use crate::app::{
    event::{spawn_event_reader, AppEvent},
    feed_runtime::{FeedRuntime, FeedUpdate},
    handler,
    state::AppState,
};
use crate::core::time_window::Clock;

// ───────────────────────────────────────── CLI ───────────────

#[derive(Parser, Debug)]
#[command(name = env!("CARGO_PKG_NAME"), about = "Terminal time-deal catalog")]
struct Cli {
    /// Root URL of the deal service (overrides the config file).
    #[arg(long)]
    base_url: Option<String>,

    /// Pretend the local hour is HOUR (0-23).  Useful to preview the
    /// closing banner or the early-morning state.
    #[arg(long, value_parser = clap::value_parser!(u32).range(0..=23))]
    hour: Option<u32>,

    /// Write logs to this file instead of stderr.
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Redraw tick in milliseconds (overrides the config file).
    #[arg(long, value_parser = clap::value_parser!(u64).range(50..=1000))]
    tick_ms: Option<u64>,

    /// Write the effective configuration to the config file and exit.
    #[arg(long)]
    write_config: bool,
}

fn init_tracing(log_file: Option<&PathBuf>) -> Result<()> {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env());
    match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("cannot open log file {}", path.display()))?;
            builder.with_writer(Mutex::new(file)).with_ansi(false).init();
        }
        // Never pollute stdout.
        None => builder.with_writer(io::stderr).init(),
    }
    Ok(())
}

// ───────────────────────────────────────── main ─────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_file.as_ref())?;

    let mut user_config = config::AppConfig::load();
    if let Some(url) = cli.base_url {
        user_config.base_url = url;
    }
    if let Some(tick_ms) = cli.tick_ms {
        user_config.tick_ms = tick_ms;
    }

    if cli.write_config {
        user_config.save()?;
        println!("{}", config::config_path().display());
        return Ok(());
    }

    let clock = cli.hour.map_or(Clock::System, Clock::PinnedHour);
    let source = HttpDealSource::new(user_config.base_url.clone());
    tracing::info!(base_url = source.base_url(), ?clock, "starting");

    // ── async channels ────────────────────────────────────────
    let (feed_tx, mut feed_rx) = mpsc::unbounded_channel::<FeedUpdate>();
    let runtime = FeedRuntime::new(Arc::new(source), feed_tx);
    let mut events = spawn_event_reader(Duration::from_millis(user_config.tick_ms));
    let mut state = AppState::new(user_config, clock, runtime);

    // ── terminal setup ────────────────────────────────────────
    enable_raw_mode()?;
    let mut stderr_handle = stderr();
    execute!(stderr_handle, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stderr());
    let mut terminal = Terminal::new(backend)?;

    // ── event loop ────────────────────────────────────────────
    let result: Result<()> = loop {
        if let Err(err) = terminal.draw(|frame| ui::screen::draw(frame, &mut state)) {
            break Err(err.into());
        }

        tokio::select! {
            biased;

            Some(event) = events.recv() => {
                match event {
                    AppEvent::Key(k) => handler::handle_key(&mut state, k),
                    AppEvent::Mouse(m) => handler::handle_mouse(&mut state, m),
                    AppEvent::Resize(_, _) => {}
                    AppEvent::Tick => state.on_tick(),
                }
            }

            Some(update) = feed_rx.recv() => {
                // Apply everything already queued before redrawing.
                state.apply_update(update);
                while let Ok(update) = feed_rx.try_recv() {
                    state.apply_update(update);
                }
            }

            else => break Ok(()),
        }

        if state.should_quit {
            break Ok(());
        }
    };

    // ── teardown ──────────────────────────────────────────────
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}
