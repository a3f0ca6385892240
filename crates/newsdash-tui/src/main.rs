use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use log::LevelFilter;
use ratatui::Terminal;
use ratatui::crossterm::event;
use ratatui::crossterm::execute;
use ratatui::crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::prelude::CrosstermBackend;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use newsdash_core::{Config, DashboardController, NewsClient};

mod action;
mod app;
mod input;
mod logging;
mod theme;
mod view;

use app::App;

/// Newsdash TUI: live dashboard for the news-analysis pipeline.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Topic to search for right away
    topic: Option<String>,

    /// Base URL of the pipeline service [env: NEWSDASH_API_URL]
    #[arg(long)]
    api_url: Option<String>,

    /// Write the log here instead of the user cache directory
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Log debug records, including dropped events
    #[arg(long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let log_path = args.log_file.unwrap_or_else(logging::default_log_path);
    let level = if args.debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    logging::initialize(&log_path, level);

    // Resolve config from CLI flags > env vars > defaults
    let mut config = Config::from_env();
    if let Some(url) = args.api_url.as_deref() {
        config = config.with_api_url(url);
    }
    log::info!("pipeline service at {}", config.api_url);

    let client = NewsClient::new(&config)?;
    let (tx, mut rx) = mpsc::unbounded_channel();
    let controller = DashboardController::new(Arc::new(client.stream_launcher()), tx);
    let mut app = App::new(controller);

    // Initialize terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    // Install panic hook that restores terminal before printing panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Drain any stray input events (e.g. Enter keypress from launching the command)
    while event::poll(Duration::from_millis(50)).unwrap_or(false) {
        let _ = event::read();
    }

    if let Some(topic) = args.topic.as_deref() {
        app.search(topic);
    }

    // Also handle Ctrl+C at the OS level for clean shutdown
    let shutdown = CancellationToken::new();
    let shutdown_for_signal = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            shutdown_for_signal.cancel();
        }
    });

    // Main event loop
    let tick_rate = Duration::from_millis(100);

    loop {
        terminal.draw(|f| app.view(f))?;

        let editing = app.editing;
        tokio::select! {
            _ = shutdown.cancelled() => {
                app.should_quit = true;
            }
            // Session events (non-blocking drain)
            Some(session_event) = rx.recv() => {
                app.handle_session_event(session_event);
                while let Ok(evt) = rx.try_recv() {
                    app.handle_session_event(evt);
                }
            }
            // Terminal input events
            _ = async {
                if event::poll(tick_rate).unwrap_or(false) {
                    if let Ok(evt) = event::read() {
                        app.update(input::map_event(&evt, editing));
                    }
                }
            } => {}
        }

        app.update(action::Action::Tick);

        if app.should_quit {
            app.controller.cancel();
            break;
        }
    }

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    log::info!("exiting");

    Ok(())
}
