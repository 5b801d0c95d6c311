//! Application constants for the Trello CLI
//!
//! This module centralizes all constants used throughout the application,
//! organized by functional domain.

/// Program identity reported by `version` and `help`
pub const APP_NAME: &str = "trello-cli";

/// Version string, taken from the package manifest
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Environment variable names
pub mod env {
    /// Fallback Trello API key
    pub const API_KEY: &str = "TRELLO_API_KEY";

    /// Fallback Trello token
    pub const TOKEN: &str = "TRELLO_TOKEN";

    /// Overrides the configuration directory (defaults to `~/.trello-cli`)
    pub const CONFIG_HOME: &str = "TRELLO_CLI_HOME";

    /// Overrides the API base URL from the settings file
    pub const BASE_URL: &str = "TRELLO_API_BASE_URL";
}

/// Credential storage constants
pub mod auth {
    /// Directory under the user's home holding all persisted state
    pub const CONFIG_DIR_NAME: &str = ".trello-cli";

    /// Credential file name inside the configuration directory
    pub const CREDENTIALS_FILE: &str = "config.json";

    /// File permissions for the credential file (Unix only) - owner read/write only
    #[cfg(unix)]
    pub const CREDENTIALS_FILE_PERMISSIONS: u32 = 0o600;

    /// Where API keys and tokens are issued
    pub const APP_KEY_URL: &str = "https://trello.com/app-key";
}

/// HTTP client configuration constants
pub mod http {
    use std::time::Duration;

    /// Trello REST API root
    pub const DEFAULT_BASE_URL: &str = "https://api.trello.com/1";

    /// Default user agent for all HTTP requests
    pub const USER_AGENT: &str = concat!("trello-cli/", env!("CARGO_PKG_VERSION"));

    /// Default HTTP request timeout
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

    /// Connection establishment timeout
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
}

/// Settings file constants
pub mod settings {
    /// Optional TOML settings file inside the configuration directory
    pub const SETTINGS_FILE: &str = "settings.toml";

    /// Log level used when neither the settings file nor `RUST_LOG` says otherwise
    pub const DEFAULT_LOG_LEVEL: &str = "warn";
}
