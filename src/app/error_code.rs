//! Stable error codes and the transport-failure classifier
//!
//! Scripts branch on these strings rather than on human-readable messages,
//! so the serialized names must never change. New codes may be added.

use std::fmt;

use serde::Serialize;

use crate::errors::ApiError;

/// Closed set of failure classes attached to every failing envelope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Server answered 404
    NotFound,
    /// Server answered 401
    Unauthorized,
    /// Any other HTTP status or a network failure
    HttpError,
    /// A required positional argument was empty or missing
    MissingParam,
    /// An argument was outside its allowed value set
    InvalidParam,
    /// No usable credentials
    AuthError,
    /// An update request named no fields to change
    NoParams,
    /// Create returned no object despite a 2xx response
    CreateFailed,
    /// Update returned no object despite a 2xx response
    UpdateFailed,
    /// Upload returned no object despite a 2xx response
    UploadFailed,
    /// URL attachment returned no object despite a 2xx response
    AttachFailed,
    /// Local file for upload does not exist
    FileNotFound,
    /// Command name not in the command table
    UnknownCommand,
    /// Writing the credential file failed
    SaveError,
    /// Removing the credential file failed
    ClearError,
    /// Anything else
    Error,
}

impl ErrorCode {
    /// Every code, in declaration order
    pub const ALL: [ErrorCode; 16] = [
        ErrorCode::NotFound,
        ErrorCode::Unauthorized,
        ErrorCode::HttpError,
        ErrorCode::MissingParam,
        ErrorCode::InvalidParam,
        ErrorCode::AuthError,
        ErrorCode::NoParams,
        ErrorCode::CreateFailed,
        ErrorCode::UpdateFailed,
        ErrorCode::UploadFailed,
        ErrorCode::AttachFailed,
        ErrorCode::FileNotFound,
        ErrorCode::UnknownCommand,
        ErrorCode::SaveError,
        ErrorCode::ClearError,
        ErrorCode::Error,
    ];

    /// Maps a structured transport outcome to its code, most specific first
    pub fn classify(error: &ApiError) -> Self {
        match error {
            ApiError::Status { status: 404, .. } => ErrorCode::NotFound,
            ApiError::Status { status: 401, .. } => ErrorCode::Unauthorized,
            ApiError::Status { .. } | ApiError::Transport(_) => ErrorCode::HttpError,
            ApiError::Decode(_) | ApiError::Url(_) | ApiError::Io(_) => ErrorCode::Error,
        }
    }

    /// Wire representation of the code
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::Unauthorized => "UNAUTHORIZED",
            ErrorCode::HttpError => "HTTP_ERROR",
            ErrorCode::MissingParam => "MISSING_PARAM",
            ErrorCode::InvalidParam => "INVALID_PARAM",
            ErrorCode::AuthError => "AUTH_ERROR",
            ErrorCode::NoParams => "NO_PARAMS",
            ErrorCode::CreateFailed => "CREATE_FAILED",
            ErrorCode::UpdateFailed => "UPDATE_FAILED",
            ErrorCode::UploadFailed => "UPLOAD_FAILED",
            ErrorCode::AttachFailed => "ATTACH_FAILED",
            ErrorCode::FileNotFound => "FILE_NOT_FOUND",
            ErrorCode::UnknownCommand => "UNKNOWN_COMMAND",
            ErrorCode::SaveError => "SAVE_ERROR",
            ErrorCode::ClearError => "CLEAR_ERROR",
            ErrorCode::Error => "ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_status_codes() {
        assert_eq!(
            ErrorCode::classify(&ApiError::status(404, "not found")),
            ErrorCode::NotFound
        );
        assert_eq!(
            ErrorCode::classify(&ApiError::status(401, "invalid token")),
            ErrorCode::Unauthorized
        );
        for status in [400, 403, 429, 500, 503] {
            assert_eq!(
                ErrorCode::classify(&ApiError::status(status, "")),
                ErrorCode::HttpError,
                "status {status}"
            );
        }
    }

    #[test]
    fn test_classify_non_status_failures() {
        assert_eq!(
            ErrorCode::classify(&ApiError::Transport("timed out".into())),
            ErrorCode::HttpError
        );

        let decode = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert_eq!(
            ErrorCode::classify(&ApiError::Decode(decode)),
            ErrorCode::Error
        );

        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        assert_eq!(ErrorCode::classify(&ApiError::Io(io)), ErrorCode::Error);
    }

    #[test]
    fn test_serialized_names_match_as_str() {
        for code in ErrorCode::ALL {
            let json = serde_json::to_string(&code).unwrap();
            assert_eq!(json, format!("\"{}\"", code.as_str()));
            assert_eq!(code.to_string(), code.as_str());
        }
    }
}
