//! Trello REST client
//!
//! Every resource operation issues exactly one request through a
//! [`Transport`] and returns an [`Envelope`]. Failures are classified here,
//! at the operation boundary, so callers only ever see envelopes.
//!
//! The module is organized into:
//! - `config`: HTTP client configuration and building
//! - `http`: request description and the transport seam
//! - `stub`: in-memory transport for tests
//! - `boards`, `cards`, `checklists`, `attachments`: the operations

use serde::de::DeserializeOwned;

use crate::app::envelope::Envelope;
use crate::app::error_code::ErrorCode;
use crate::auth::Credentials;
use crate::errors::{ApiError, ApiResult};

pub mod attachments;
pub mod boards;
pub mod cards;
pub mod checklists;
pub mod config;
pub mod http;
pub mod stub;

pub use attachments::mime_type_for;
pub use cards::CardUpdate;
pub use config::ClientConfig;
pub use http::{ApiRequest, FileUpload, HttpTransport, RawResponse, RequestBody, Transport};
pub use stub::StubTransport;

/// Message used for every 401 response
const UNAUTHORIZED_MESSAGE: &str = "Invalid API key or token";

/// Authenticated view of the Trello API over some transport
#[derive(Debug)]
pub struct TrelloClient<'a, T> {
    transport: &'a T,
    credentials: Credentials,
}

impl<'a, T: Transport> TrelloClient<'a, T> {
    pub fn new(transport: &'a T, credentials: Credentials) -> Self {
        Self {
            transport,
            credentials,
        }
    }

    /// Sends `request` with credentials attached and returns the body of a
    /// 2xx response
    async fn execute(&self, request: ApiRequest) -> ApiResult<String> {
        let request = request
            .query("key", &self.credentials.api_key)
            .query("token", &self.credentials.token);

        let response = self.transport.send(request).await?;
        if !response.is_success() {
            return Err(ApiError::status(response.status, &response.body));
        }
        Ok(response.body)
    }

    /// Like [`execute`](Self::execute), decoding the body
    ///
    /// `Ok(None)` means a 2xx response without a usable object (empty body
    /// or JSON `null`).
    async fn fetch<M: DeserializeOwned>(&self, request: ApiRequest) -> ApiResult<Option<M>> {
        let body = self.execute(request).await?;
        decode(&body)
    }
}

fn decode<M: DeserializeOwned>(body: &str) -> ApiResult<Option<M>> {
    if body.trim().is_empty() {
        return Ok(None);
    }
    Ok(serde_json::from_str::<Option<M>>(body)?)
}

/// Converts a failed call into an envelope
///
/// `not_found` is the resource-specific message used for 404s.
fn failure<M>(error: ApiError, not_found: &str) -> Envelope<M> {
    let code = ErrorCode::classify(&error);
    tracing::debug!("Request failed ({}): {}", code, error);

    let message = match code {
        ErrorCode::NotFound => not_found.to_string(),
        ErrorCode::Unauthorized => UNAUTHORIZED_MESSAGE.to_string(),
        _ => error.to_string(),
    };
    Envelope::fail(message, code)
}

/// Envelope for an operation returning a single object
fn object<M>(
    result: ApiResult<Option<M>>,
    not_found: &str,
    missing: (&str, ErrorCode),
) -> Envelope<M> {
    match result {
        Ok(Some(value)) => Envelope::success(value),
        Ok(None) => Envelope::fail(missing.0, missing.1),
        Err(e) => failure(e, not_found),
    }
}

/// Envelope for an operation returning a collection; no body means empty
fn list<M>(result: ApiResult<Option<Vec<M>>>, not_found: &str) -> Envelope<Vec<M>> {
    match result {
        Ok(items) => Envelope::success(items.unwrap_or_default()),
        Err(e) => failure(e, not_found),
    }
}

/// Envelope for a delete; success carries `true`
fn deleted(result: ApiResult<String>, not_found: &str) -> Envelope<bool> {
    match result {
        Ok(_) => Envelope::success(true),
        Err(e) => failure(e, not_found),
    }
}
