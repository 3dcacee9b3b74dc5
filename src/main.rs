//! labtrack - a terminal client for the Research Tracker API.
//!
//! This application provides a fast, keyboard-driven interface for managing
//! research projects, milestones, and documents against a Research Tracker
//! backend.

mod api;
mod app;
mod auth;
mod config;
mod models;
mod ui;
mod utils;

use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use api::{ApiClient, SignupRequest};
use app::{App, AppState};
use auth::{Role, SessionStore};
use config::Config;
use ui::input::handle_input;
use ui::render::render;

// ============================================================================
// Constants
// ============================================================================

/// Timeout for polling terminal events (in milliseconds)
const EVENT_POLL_TIMEOUT_MS: u64 = 100;

/// Initialize the tracing subscriber for logging.
///
/// Logs go to a file under the cache directory so they never write over the
/// TUI; the returned guard must stay alive for the process lifetime. Falls
/// back to stderr when no log directory is available.
fn init_tracing() -> Option<tracing_appender::non_blocking::WorkerGuard> {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let log_dir = Config::log_dir()
        .ok()
        .filter(|dir| std::fs::create_dir_all(dir).is_ok());

    match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::never(dir, "labtrack.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::registry()
                .with(fmt::layer().with_writer(writer).with_ansi(false))
                .with(filter)
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::registry()
                .with(fmt::layer().with_writer(io::stderr))
                .with(filter)
                .init();
            None
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    // Check for CLI commands
    let args: Vec<String> = std::env::args().collect();
    if args.len() > 1 && args[1] == "--register" {
        return register_interactive().await;
    }

    // Initialize logging
    let _guard = init_tracing();
    info!("labtrack starting");

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create app; this rehydrates any persisted session
    let mut app = App::new()?;

    if app.is_authenticated() {
        app.refresh_all();
    } else {
        app.start_login();
    }

    // Main loop
    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
    }

    info!("labtrack shutting down");
    Ok(())
}

/// Register a new account from the terminal, outside the TUI.
async fn register_interactive() -> Result<()> {
    let mut config = Config::load().unwrap_or_default();
    let data_dir = Config::data_dir().unwrap_or_else(|_| PathBuf::from("./data"));
    let session = Arc::new(SessionStore::new(data_dir));
    let api = ApiClient::new(config.api_base_url(), session.clone())?;

    println!("\n=== Research Tracker Registration ===\n");

    let full_name = prompt("Full name: ")?;
    let username = prompt("Username / email: ")?;
    let password = rpassword::prompt_password("Password: ")?;
    let role_input = prompt("Role [ADMIN/PI/MEMBER/VIEWER] (default MEMBER): ")?;

    let role = Role::ALL
        .into_iter()
        .find(|r| r.as_str() == role_input.to_uppercase())
        .unwrap_or(Role::Member);

    println!("\nRegistering...");

    let outcome = api
        .signup(&SignupRequest {
            username: username.clone(),
            password,
            full_name,
            role: role.as_str().to_string(),
        })
        .await?;

    config.last_username = Some(username.clone());
    let _ = config.save();

    match outcome.token {
        Some(token) => {
            session.login(&token)?;
            println!("Registered and logged in as {}.\n", username);
        }
        None => {
            let message = outcome
                .message
                .unwrap_or_else(|| "Registration successful! Please login.".to_string());
            println!("{}\n", message);
        }
    }

    Ok(())
}

fn prompt(label: &str) -> Result<String> {
    print!("{}", label);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    loop {
        // Draw UI
        terminal.draw(|f| render(f, app))?;

        // Poll for events with timeout to allow background updates
        if event::poll(Duration::from_millis(EVENT_POLL_TIMEOUT_MS))? {
            if let Event::Key(key) = event::read()? {
                // Ctrl+C to quit
                if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                    return Ok(());
                }

                // Handle input
                if handle_input(app, key).await? {
                    return Ok(());
                }
            }
        }

        // Fold completed background fetches into state
        app.check_background_tasks();

        // Check if we should quit
        if matches!(app.state, AppState::Quitting) {
            return Ok(());
        }
    }
}
