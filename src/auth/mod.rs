//! Credential management for the Trello API
//!
//! This module resolves the API key and token used by every authenticated
//! command and persists them for `set-auth` / `clear-auth`.
//!
//! # Examples
//!
//! ```rust,no_run
//! use trello_cli::auth::{CredentialResolver, CredentialStore};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let resolver = CredentialResolver::from_env(CredentialStore::default_location()?);
//! match resolver.validate() {
//!     Ok(credentials) => println!("using key {}", credentials.api_key),
//!     Err(e) => eprintln!("{}", e),
//! }
//! # Ok(())
//! # }
//! ```

pub mod credentials;

// Re-export main public API
pub use credentials::{config_dir, CredentialResolver, CredentialStore, Credentials};
