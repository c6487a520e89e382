//! Event Explorer
//! Terminal search console for network flow events

mod app;
mod client;
mod config;
mod error;
mod format;
mod model;
mod notify;
mod theme;
mod ui;

use crate::app::App;
use crate::client::HttpSearchApi;
use crate::config::Config;
use crate::theme::ThemeStore;
use anyhow::{Context, Result};
use clap::{Arg, Command};
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io::{self, Stdout};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use url::Url;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let matches = Command::new("event-explorer")
        .version("1.0.0")
        .about("Terminal search console for network flow events")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file path")
                .default_value("config.toml"),
        )
        .arg(
            Arg::new("api-url")
                .long("api-url")
                .value_name("URL")
                .help("Search API base URL")
                .value_parser(clap::value_parser!(Url)),
        )
        .arg(
            Arg::new("page-size")
                .long("page-size")
                .value_name("N")
                .help("Results requested per page")
                .value_parser(clap::value_parser!(u32)),
        )
        .arg(
            Arg::new("validate-config")
                .long("validate-config")
                .help("Validate configuration and exit")
                .action(clap::ArgAction::SetTrue),
        )
        .get_matches();

    let config_path = matches.get_one::<String>("config").unwrap();

    // Load configuration; a missing file at the default path means defaults
    let mut config = if Path::new(config_path).exists() {
        Config::from_file(config_path)
            .with_context(|| format!("Failed to load configuration from {}", config_path))?
    } else {
        Config::default()
    };

    config.apply_env().context("Invalid environment override")?;

    // Override with command line arguments
    if let Some(url) = matches.get_one::<Url>("api-url") {
        config.api.base_url = url.clone();
    }

    if let Some(page_size) = matches.get_one::<u32>("page-size") {
        config.api.page_size = *page_size;
    }

    // Validate configuration
    config
        .validate()
        .context("Configuration validation failed")?;

    if matches.get_flag("validate-config") {
        println!("Configuration is valid");
        return Ok(());
    }

    let state_dir = config.resolve_state_dir();
    let _guard = init_tracing(&state_dir)?;
    info!(
        "Search endpoint: {}{}",
        config.api.base_url,
        config.api.search_path.trim_start_matches('/')
    );
    info!("State directory: {}", state_dir.display());

    let api = Arc::new(HttpSearchApi::new(&config).context("Failed to initialize search client")?);
    let theme_store = ThemeStore::new(&state_dir);
    let mut app = App::new(&config, api, theme_store);

    let mut terminal = setup_terminal().context("Failed to initialize terminal")?;
    let result = run(&mut terminal, &mut app, &config).await;
    restore_terminal(&mut terminal).context("Failed to restore terminal")?;

    info!("Shutdown complete");
    result
}

/// Draw, poll for input, pump fetch outcomes, advance timers. At most one
/// pass per tick interval; input wakes the loop early.
async fn run(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App,
    config: &Config,
) -> Result<()> {
    let tick = config.tick_interval();

    loop {
        terminal
            .draw(|frame| ui::draw(frame, app))
            .context("Failed to draw frame")?;

        if event::poll(tick).context("Failed to poll terminal events")? {
            if let Event::Key(key) = event::read().context("Failed to read terminal event")? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key, Instant::now());
                }
            }
        }

        app.pump_outcomes();
        app.tick(Instant::now());

        if app.should_quit() {
            return Ok(());
        }
    }
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    crossterm::execute!(stdout, EnterAlternateScreen)
        .context("Failed to enter alternate screen")?;
    let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
    Ok(terminal)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    crossterm::execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Log to a file under the state directory. Writing to stderr would tear
/// the alternate screen.
fn init_tracing(state_dir: &Path) -> Result<tracing_appender::non_blocking::WorkerGuard> {
    std::fs::create_dir_all(state_dir)
        .with_context(|| format!("Failed to create state directory {}", state_dir.display()))?;
    let file = tracing_appender::rolling::never(state_dir, "event-explorer.log");
    let (writer, guard) = tracing_appender::non_blocking(file);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "event_explorer=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(writer),
        )
        .init();

    Ok(guard)
}
