//! Core application logic for the Trello CLI
//!
//! This module contains the result envelope, the error-code taxonomy, the
//! Trello resource models and the REST client that every command delegates to.
//!
//! # Examples
//!
//! ```rust,no_run
//! use trello_cli::app::{ClientConfig, TrelloClient};
//! use trello_cli::auth::Credentials;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let transport = ClientConfig::default().build_transport()?;
//! let client = TrelloClient::new(&transport, Credentials::new("key", "token"));
//!
//! let envelope = client.get_boards().await;
//! envelope.into_value().print();
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod envelope;
pub mod error_code;
pub mod models;

// Re-export main public API
pub use client::{
    ApiRequest, CardUpdate, ClientConfig, HttpTransport, RawResponse, StubTransport, Transport,
    TrelloClient,
};
pub use envelope::Envelope;
pub use error_code::ErrorCode;
pub use models::{
    Attachment, Board, Card, CheckItemState, Checklist, ChecklistItem, Comment, Member, TrelloList,
};
