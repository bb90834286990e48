//! staffdesk - employee self-service from the terminal.
//!
//! Sign in once, then check in and out, apply for leave, read payslips,
//! memos and holidays, and raise queries or feedback. The session is kept
//! between runs and dropped automatically when the server rejects it.

mod commands;
mod utils;

use std::io;

use anyhow::Result;
use clap::Parser;
use tokio::sync::broadcast::{self, error::TryRecvError};
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use staffdesk_core::{ApiError, AppContext, AuthEvent, Config};

use commands::Cli;

/// File name prefix for the rolling log
const LOG_FILE_PREFIX: &str = "staffdesk.log";

/// Initialize the tracing subscriber for logging.
///
/// Returns the file writer guard when a log directory is configured; it
/// must stay alive until exit so buffered lines are flushed.
fn init_tracing(config: &Config) -> Option<WorkerGuard> {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let (file_layer, guard) = match config.log_dir {
        Some(ref dir) => {
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (Some(fmt::layer().with_ansi(false).with_writer(writer)), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(file_layer)
        .with(filter)
        .init();

    guard
}

#[tokio::main]
async fn main() {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    // Parse after .env so STAFFDESK_LOGIN can come from it
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        let message = match e.downcast_ref::<ApiError>() {
            Some(api_error) => api_error.user_message(),
            None => format!("{:#}", e),
        };
        eprintln!("Error: {}", message);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Warning: {:#}; using default settings", e);
            Config::default()
        }
    };

    let _guard = init_tracing(&config);
    info!("staffdesk starting");

    let ctx = AppContext::from_config(&config)?;
    let mut events = ctx.auth.events();
    let state = ctx.bootstrap();
    info!(?state, "Session restored");

    let result = commands::run(&ctx, &mut config, cli.command).await;

    // A failed command already reports the expiry through its error
    let expiry_reported = matches!(
        result.as_ref().map_err(|e| e.downcast_ref::<ApiError>()),
        Err(Some(ApiError::Unauthorized))
    );
    report_auth_events(&mut events, expiry_reported);
    result
}

/// Tell the user about session changes that happened while a command ran.
fn report_auth_events(events: &mut broadcast::Receiver<AuthEvent>, expiry_reported: bool) {
    loop {
        match events.try_recv() {
            Ok(AuthEvent::SessionExpired) if !expiry_reported => {
                eprintln!("Your session has expired. Run `staffdesk login` to sign in again.");
            }
            Ok(event) => info!(?event, "Auth event"),
            Err(TryRecvError::Lagged(skipped)) => warn!(skipped, "Missed auth events"),
            Err(_) => break,
        }
    }
}
