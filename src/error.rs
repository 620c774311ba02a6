//! Unified client error model shared by the transport client and the session
//! store. The transport maps HTTP and I/O failures into this taxonomy once, on
//! ingress; the session store never reinterprets kinds, it only decides
//! whether a call succeeded.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AuthError {
    /// Transport could not complete the round trip.
    #[error("network failure: {message}")]
    Network { message: String },
    /// Token missing or rejected by the server.
    #[error("unauthorized: {message}")]
    Unauthorized { message: String },
    /// Login or second-factor verification rejected.
    #[error("invalid credentials: {message}")]
    InvalidCredentials { message: String },
    /// Malformed request payload.
    #[error("validation failure: {message}")]
    Validation { message: String },
    #[error("not found: {message}")]
    NotFound { message: String },
    /// Response body did not match the expected shape.
    #[error("decode failure: {message}")]
    Decode { message: String },
    /// Persisted token storage could not be read or written.
    #[error("storage failure: {message}")]
    Storage { message: String },
    /// Misuse of the session lifecycle or the process-wide context.
    #[error("context error: {message}")]
    Context { message: String },
}

impl AuthError {
    pub fn network<S: Into<String>>(msg: S) -> Self { AuthError::Network { message: msg.into() } }
    pub fn unauthorized<S: Into<String>>(msg: S) -> Self { AuthError::Unauthorized { message: msg.into() } }
    pub fn invalid_credentials<S: Into<String>>(msg: S) -> Self { AuthError::InvalidCredentials { message: msg.into() } }
    pub fn validation<S: Into<String>>(msg: S) -> Self { AuthError::Validation { message: msg.into() } }
    pub fn not_found<S: Into<String>>(msg: S) -> Self { AuthError::NotFound { message: msg.into() } }
    pub fn decode<S: Into<String>>(msg: S) -> Self { AuthError::Decode { message: msg.into() } }
    pub fn storage<S: Into<String>>(msg: S) -> Self { AuthError::Storage { message: msg.into() } }
    pub fn context<S: Into<String>>(msg: S) -> Self { AuthError::Context { message: msg.into() } }

    /// Stable kind label for logging and UI dispatch.
    pub fn kind(&self) -> &'static str {
        match self {
            AuthError::Network { .. } => "network",
            AuthError::Unauthorized { .. } => "unauthorized",
            AuthError::InvalidCredentials { .. } => "invalid_credentials",
            AuthError::Validation { .. } => "validation",
            AuthError::NotFound { .. } => "not_found",
            AuthError::Decode { .. } => "decode",
            AuthError::Storage { .. } => "storage",
            AuthError::Context { .. } => "context",
        }
    }

    pub fn message(&self) -> &str {
        match self {
            AuthError::Network { message }
            | AuthError::Unauthorized { message }
            | AuthError::InvalidCredentials { message }
            | AuthError::Validation { message }
            | AuthError::NotFound { message }
            | AuthError::Decode { message }
            | AuthError::Storage { message }
            | AuthError::Context { message } => message.as_str(),
        }
    }

    /// Classify a non-success HTTP status. `credential_check` is true on the
    /// login/verify endpoints, where a 401 means the submitted secret was
    /// wrong rather than that a held token expired.
    pub fn from_status(status: u16, message: String, credential_check: bool) -> Self {
        match status {
            401 if credential_check => AuthError::InvalidCredentials { message },
            401 | 403 => AuthError::Unauthorized { message },
            400 | 422 => AuthError::Validation { message },
            404 => AuthError::NotFound { message },
            _ => AuthError::Network { message },
        }
    }
}

impl From<reqwest::Error> for AuthError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            AuthError::Decode { message: e.to_string() }
        } else {
            AuthError::Network { message: e.to_string() }
        }
    }
}

impl From<serde_json::Error> for AuthError {
    fn from(e: serde_json::Error) -> Self {
        AuthError::Decode { message: e.to_string() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_classification() {
        assert_eq!(
            AuthError::from_status(401, "bad password".into(), true),
            AuthError::invalid_credentials("bad password")
        );
        assert_eq!(
            AuthError::from_status(401, "token expired".into(), false),
            AuthError::unauthorized("token expired")
        );
        assert_eq!(
            AuthError::from_status(403, "forbidden".into(), true),
            AuthError::unauthorized("forbidden")
        );
        assert_eq!(
            AuthError::from_status(400, "missing email".into(), false),
            AuthError::validation("missing email")
        );
        assert_eq!(
            AuthError::from_status(404, "no such user".into(), false),
            AuthError::not_found("no such user")
        );
        assert_eq!(
            AuthError::from_status(500, "boom".into(), false),
            AuthError::network("boom")
        );
    }

    #[test]
    fn kind_labels() {
        assert_eq!(AuthError::unauthorized("x").kind(), "unauthorized");
        assert_eq!(AuthError::context("x").kind(), "context");
        assert_eq!(AuthError::storage("x").message(), "x");
    }
}
