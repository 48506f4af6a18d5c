//! Error types for the PetFriends API client.
//!
//! # Design
//! Non-2xx responses are not errors here: every status the service returns
//! reaches the caller as an `ApiResponse`. `ApiError` only covers failures
//! that happen on this side of the wire.

use std::fmt;

/// Local failures raised by the client, session and settings.
#[derive(Debug)]
pub enum ApiError {
    /// The request never produced a response (connection, DNS, TLS, I/O).
    Transport(String),

    /// A photo file could not be read from disk.
    PhotoUnreadable { path: String, message: String },

    /// The response body could not be deserialized into the expected type.
    DeserializationError(String),

    /// A configuration value is missing or malformed.
    Configuration(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Transport(msg) => write!(f, "transport failed: {msg}"),
            ApiError::PhotoUnreadable { path, message } => {
                write!(f, "cannot read photo {path}: {message}")
            }
            ApiError::DeserializationError(msg) => {
                write!(f, "deserialization failed: {msg}")
            }
            ApiError::Configuration(msg) => write!(f, "invalid configuration: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}
