//! Credential storage and resolution for the Trello API
//!
//! Credentials come from the persisted credential file first and from the
//! `TRELLO_API_KEY` / `TRELLO_TOKEN` environment variables second. A source
//! only counts when it yields both a non-empty key and a non-empty token.

use std::env;
use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::constants::{auth, env as env_constants};
use crate::errors::{AuthError, AuthResult};

/// API key and token pair
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub token: String,
}

impl Credentials {
    pub fn new(api_key: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            token: token.into(),
        }
    }

    /// Both fields present
    pub fn is_complete(&self) -> bool {
        !self.api_key.is_empty() && !self.token.is_empty()
    }

    /// Reads the two environment variables through `lookup`
    pub fn from_env_with<F>(lookup: F) -> Option<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let credentials = Self::new(
            lookup(env_constants::API_KEY).unwrap_or_default(),
            lookup(env_constants::TOKEN).unwrap_or_default(),
        );
        credentials.is_complete().then_some(credentials)
    }

    /// Reads the two process environment variables
    pub fn from_env() -> Option<Self> {
        Self::from_env_with(|name| env::var(name).ok())
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &self.api_key)
            .field("token", &"<redacted>")
            .finish()
    }
}

/// Directory holding the credential and settings files
///
/// `TRELLO_CLI_HOME` wins; otherwise `~/.trello-cli`.
pub fn config_dir() -> AuthResult<PathBuf> {
    if let Some(dir) = env::var_os(env_constants::CONFIG_HOME).filter(|d| !d.is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    let home = dirs::home_dir().ok_or(AuthError::NoHomeDirectory)?;
    Ok(home.join(auth::CONFIG_DIR_NAME))
}

/// The persisted credential file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at `<config dir>/config.json`
    pub fn default_location() -> AuthResult<Self> {
        Ok(Self::new(config_dir()?.join(auth::CREDENTIALS_FILE)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the persisted credentials
    ///
    /// `Ok(None)` when the file does not exist or holds an incomplete pair.
    pub fn load(&self) -> AuthResult<Option<Credentials>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(AuthError::Storage {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        let credentials: Credentials = serde_json::from_str(&content)?;
        Ok(credentials.is_complete().then_some(credentials))
    }

    /// Writes the credential file, creating its directory if needed
    pub fn save(&self, credentials: &Credentials) -> AuthResult<()> {
        let storage_error = |source: io::Error| AuthError::Storage {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(storage_error)?;
        }

        let content = serde_json::to_string_pretty(credentials)?;
        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&self.path)
            .map_err(storage_error)?;
        writeln!(file, "{}", content).map_err(storage_error)?;

        // Set restrictive permissions (Unix-like systems only)
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = file.metadata().map_err(storage_error)?.permissions();
            perms.set_mode(auth::CREDENTIALS_FILE_PERMISSIONS);
            file.set_permissions(perms).map_err(storage_error)?;
        }

        tracing::info!("Credentials saved to {}", self.path.display());
        Ok(())
    }

    /// Removes the credential file; a missing file is not an error
    pub fn clear(&self) -> AuthResult<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                tracing::info!("Removed credentials at {}", self.path.display());
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!("No credentials at {}, nothing to clear", self.path.display());
                Ok(())
            }
            Err(source) => Err(AuthError::Storage {
                path: self.path.clone(),
                source,
            }),
        }
    }
}

/// Resolves credentials from the persisted file and the environment
///
/// Holds the environment snapshot taken at startup, so resolution is a pure
/// function of its inputs.
#[derive(Debug, Clone)]
pub struct CredentialResolver {
    store: CredentialStore,
    environment: Option<Credentials>,
}

impl CredentialResolver {
    pub fn new(store: CredentialStore, environment: Option<Credentials>) -> Self {
        Self { store, environment }
    }

    /// Resolver over `store` and the process environment
    pub fn from_env(store: CredentialStore) -> Self {
        Self::new(store, Credentials::from_env())
    }

    pub fn store(&self) -> &CredentialStore {
        &self.store
    }

    /// Persisted credentials if complete, else environment credentials if
    /// complete, else `None`
    pub fn resolve(&self) -> Option<Credentials> {
        let persisted = match self.store.load() {
            Ok(persisted) => persisted,
            Err(e) => {
                tracing::warn!("Ignoring unreadable credential file: {}", e);
                None
            }
        };

        if let Some(credentials) = persisted {
            tracing::debug!("Using credentials from {}", self.store.path().display());
            return Some(credentials);
        }

        let environment = self.environment.clone().filter(Credentials::is_complete);
        if environment.is_some() {
            tracing::debug!("Using credentials from environment");
        }
        environment
    }

    /// Gate run before every authenticated command; never touches the network
    pub fn validate(&self) -> AuthResult<Credentials> {
        self.resolve().ok_or(AuthError::MissingCredentials)
    }
}
