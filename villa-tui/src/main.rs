//! villa-tui - Terminal UI for Villastay hosts
//!
//! Host inbox with per-booking conversations, and the guest review form.

use std::path::PathBuf;
use std::time::Instant;

use clap::Parser;
use libvillastay::logging::{config_from_env, LoggingConfig};
use villa_tui::{
    app::{
        event::{EventHandler, TuiEvent},
        reduce,
        reducer::{confirmation_due, routes_to_textarea},
        Action, AppState, Screen, UiConfig,
    },
    error::Result,
    services::{status_for_event, ServiceHandle},
    terminal::{install_panic_hook, restore_terminal, setup_terminal, Tui},
    ui::{self, Editors},
};

#[derive(Parser, Debug)]
#[command(name = "villa-tui")]
#[command(version)]
#[command(about = "Terminal inbox and guest reviews for Villastay hosts")]
struct Cli {
    /// Use built-in sample data instead of the backend
    #[arg(long)]
    demo: bool,

    /// Open the review form for this booking
    #[arg(long, value_name = "BOOKING_ID")]
    review: Option<String>,

    /// Log file (default: villastay/villa-tui.log in the data directory)
    #[arg(long, value_name = "PATH", env = "VILLASTAY_TUI_LOG")]
    log_file: Option<PathBuf>,

    /// Debug-level logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = init_logging(&cli) {
        eprintln!("Warning: could not open log file: {}", e);
    }

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(e.exit_code());
    }
}

fn init_logging(cli: &Cli) -> std::io::Result<()> {
    let path = match cli.log_file.clone() {
        Some(path) => path,
        None => match libvillastay::config::resolve_data_path() {
            Ok(dir) => dir.join("villa-tui.log"),
            // No data dir: stay silent rather than draw over the screen
            Err(_) => return Ok(()),
        },
    };
    let env = config_from_env();
    LoggingConfig::new(env.format, env.level, cli.verbose)
        .with_file(path)
        .init()
}

fn run(cli: Cli) -> Result<()> {
    // Connect and sign in before touching the terminal so errors print normally
    let services = ServiceHandle::connect(cli.demo)?;
    let host = services.sign_in()?;

    install_panic_hook();
    let mut terminal = setup_terminal()?;

    let result = run_app(&mut terminal, &services, &host, cli.review);

    restore_terminal(terminal)?;
    result
}

fn run_app(terminal: &mut Tui, services: &ServiceHandle, host: &str, review: Option<String>) -> Result<()> {
    let mut state = AppState::with_config(UiConfig::from_settings(&services.service().config().ui));
    let mut editors = Editors::new();
    let events = services.subscribe();
    let event_handler = EventHandler::new(state.config.tick_rate_ms);

    let size = terminal.size()?;
    state = reduce(state, Action::Resize(size.width, size.height));
    state = reduce(state, Action::SetStatus(format!("Signed in as {}", host)));
    state = reduce(state, Action::NavigateTo(Screen::Inbox));
    if let Some(booking_id) = review {
        state = reduce(state, Action::ReviewOpen(booking_id));
    }

    loop {
        for effect in state.take_effects() {
            tracing::debug!(?effect, "Dispatching");
            services.dispatch(effect);
        }
        editors.sync(&state);

        terminal.draw(|frame| ui::render(frame, &state, &editors))?;

        let action = match event_handler.next()? {
            TuiEvent::Key(key) if routes_to_textarea(&state, &key) => match editors.input(&state, key) {
                Some(action) => action,
                None => Action::Key(key),
            },
            other => other.into(),
        };
        state = reduce(state, action);

        while let Ok(result) = services.results().try_recv() {
            state = reduce(state, result);
        }
        while let Ok(event) = events.try_recv() {
            if let Some(message) = status_for_event(&event) {
                state = reduce(state, Action::SetStatus(message));
            }
        }
        for notification in services.drain_notifications() {
            state = reduce(state, Action::Notify(notification));
        }

        state = reduce(state, Action::ExpireNotifications(chrono::Utc::now()));
        if confirmation_due(&state, Instant::now()) {
            state = reduce(state, Action::ReviewConfirmationElapsed);
        }

        if state.should_quit {
            break;
        }
    }

    tracing::info!("Exiting");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_review_flag() {
        let cli = Cli::try_parse_from(["villa-tui", "--demo", "--review", "bk-0990"]).unwrap();
        assert!(cli.demo);
        assert_eq!(cli.review.as_deref(), Some("bk-0990"));
    }

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::try_parse_from(["villa-tui"]).unwrap();
        assert!(!cli.demo);
        assert!(cli.review.is_none());
        assert!(!cli.verbose);
    }
}
