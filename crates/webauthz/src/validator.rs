//! The token validator seam.

use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

use crate::ValidatorError;

/// Boxed future returned by [`TokenValidator::check_token`].
pub type ValidationFuture<'a> =
    Pin<Box<dyn Future<Output = Result<TokenAttributes, ValidatorError>> + Send + 'a>>;

/// Attributes a validator knows about a token.
///
/// `scope` is the space-delimited grant string; `not_after` is an expiry in
/// milliseconds since the Unix epoch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenAttributes {
    /// Token type as reported by the issuer (e.g. `"access"`).
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
    /// Client the token was issued to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    /// Realm the token was issued for.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub realm: Option<String>,
    /// Space-delimited scope names.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    /// Expiry, epoch milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub not_after: Option<i64>,
    /// User the token acts for, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

/// Trait for validating bearer tokens.
///
/// Implement this for each token backend (in-memory, hashed store, remote
/// introspection, ...). The middleware calls `check_token()` at most once per
/// request with the trimmed token string. Any error means the token is not
/// usable; the middleware never inspects which variant was returned.
pub trait TokenValidator: Send + Sync + 'static {
    /// Resolve a token to its attributes.
    fn check_token<'a>(&'a self, token: &'a str) -> ValidationFuture<'a>;
}
