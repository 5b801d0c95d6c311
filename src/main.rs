//! Trello CLI application
//!
//! Runs one command and prints one JSON envelope on stdout. Logs go to stderr.
//! The exit status is 0 for `ok:true` and 1 for `ok:false`.

use std::process;

use serde_json::Value;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use trello_cli::app::{Envelope, HttpTransport};
use trello_cli::auth::{config_dir, CredentialResolver, CredentialStore};
use trello_cli::cli::{Dispatcher, Invocation};
use trello_cli::config::AppConfig;
use trello_cli::constants::{auth, APP_NAME, VERSION};
use trello_cli::errors::{AppError, Result};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Load environment variables from .env file if it exists
    dotenv::dotenv().ok();

    // Panics are reported through the log; the dispatcher still prints an envelope
    std::panic::set_hook(Box::new(|info| {
        error!("{}", info);
    }));

    let invocation = Invocation::from_env();
    let envelope: Envelope<Value> = bootstrap().await.dispatch(&invocation).await;

    envelope.print();
    if !envelope.is_ok() {
        debug!("Exiting with failure: {:?}", envelope.error_code());
        process::exit(1);
    }
}

/// Loads settings, starts logging and builds the dispatcher
///
/// Startup problems never abort the run. Settings errors fall back to
/// defaults for logging and disable only the remote commands; a missing
/// config directory disables only the commands that need credentials.
async fn bootstrap() -> Dispatcher<HttpTransport> {
    let dir = config_dir();
    let settings = match &dir {
        Ok(dir) => AppConfig::load(dir).await.map_err(AppError::from),
        Err(_) => Ok(AppConfig::default()),
    };
    let config = settings.as_ref().cloned().unwrap_or_default();

    let level = config.log_level();
    init_logging(*level.as_ref().unwrap_or(&tracing::Level::WARN));
    info!("{} v{} starting", APP_NAME, VERSION);
    if let Err(e) = &level {
        warn!("{}; logging at warn", e);
    }

    let transport = settings
        .and_then(|config| build_transport(&config))
        .map_err(|e| {
            warn!("Remote commands unavailable ({}): {}", e.category(), e);
            e.to_string()
        });

    let resolver = dir
        .map(|dir| CredentialResolver::from_env(CredentialStore::new(dir.join(auth::CREDENTIALS_FILE))))
        .map_err(|e| {
            warn!("Credential commands unavailable: {}", e);
            e.to_string()
        });

    Dispatcher::from_parts(transport, resolver)
}

fn build_transport(config: &AppConfig) -> Result<HttpTransport> {
    Ok(config.client_config()?.build_transport()?)
}

/// Initialize logging on stderr; `RUST_LOG` replaces the configured level
fn init_logging(level: tracing::Level) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("trello_cli={}", level.as_str().to_ascii_lowercase()))
    });

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
