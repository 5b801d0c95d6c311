//! The result envelope printed by every command
//!
//! An envelope is either `{"ok":true,"data":...}` or
//! `{"ok":false,"error":"...","errorCode":"..."}`. The fields are private and
//! the two constructors are the only way to build one, so the two shapes can
//! never be mixed.

use std::io::{self, Write};

use serde::Serialize;
use serde_json::Value;

use super::error_code::ErrorCode;

/// Uniform success/failure wrapper
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope<T> {
    ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error_code: Option<ErrorCode>,
}

impl<T> Envelope<T> {
    /// Successful result carrying `data`
    pub fn success(data: T) -> Self {
        Self {
            ok: true,
            data: Some(data),
            error: None,
            error_code: None,
        }
    }

    /// Failed result carrying a human-readable message and a stable code
    pub fn fail(message: impl Into<String>, code: ErrorCode) -> Self {
        Self {
            ok: false,
            data: None,
            error: Some(message.into()),
            error_code: Some(code),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.ok
    }

    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn error_code(&self) -> Option<ErrorCode> {
        self.error_code
    }

}

impl<T: Serialize> Envelope<T> {
    /// Erases the payload type
    ///
    /// A payload that cannot be serialized becomes an `ERROR` failure here,
    /// so printing never has to deal with it.
    pub fn into_value(self) -> Envelope<Value> {
        let Envelope {
            ok,
            data,
            error,
            error_code,
        } = self;

        match data.map(serde_json::to_value).transpose() {
            Ok(data) => Envelope {
                ok,
                data,
                error,
                error_code,
            },
            Err(e) => Envelope::fail(
                format!("Failed to serialize response: {}", e),
                ErrorCode::Error,
            ),
        }
    }
}

impl Envelope<Value> {
    /// Single-line JSON rendering
    pub fn to_json_line(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| {
            tracing::error!("Envelope serialization failed: {}", e);
            r#"{"ok":false,"error":"Failed to serialize response","errorCode":"ERROR"}"#
                .to_string()
        })
    }

    /// Writes the envelope to standard output as one line
    pub fn print(&self) {
        let line = self.to_json_line();
        let mut stdout = io::stdout().lock();
        if let Err(e) = writeln!(stdout, "{}", line).and_then(|_| stdout.flush()) {
            tracing::warn!("Could not write result to stdout: {}", e);
        }
    }
}
