//! Error types for webauthz.

use thiserror::Error;

/// Result type alias for webauthz operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while configuring webauthz.
///
/// Nothing on the request path returns this type: authorization outcomes are
/// captured in [`AuthorizationResult`](crate::AuthorizationResult) instead.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// `Webauthz::builder().build()` was called without a validator.
    #[error("a token validator is required")]
    MissingValidator,

    /// Settings could not be parsed.
    #[error("Configuration error: {message}")]
    Config {
        /// What configuration is problematic
        message: String,
    },

    /// Settings file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Build a [`Error::Config`] from any message.
    pub fn config(message: impl Into<String>) -> Self {
        Error::Config {
            message: message.into(),
        }
    }
}

/// Failure reported by a [`TokenValidator`](crate::TokenValidator).
///
/// Opaque to the middleware: every variant is classified as
/// [`AuthorizationKind::Invalid`](crate::AuthorizationKind::Invalid).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ValidatorError {
    /// The token is not known to the backend.
    #[error("unknown token")]
    UnknownToken,

    /// The backend recognised the token but refused it.
    #[error("token rejected: {0}")]
    Rejected(String),

    /// The backend could not be reached or failed internally.
    #[error("validator backend failure: {0}")]
    Backend(String),
}
