//! The per-request authorization outcome.

use std::collections::BTreeSet;
use std::fmt;

use crate::scope::parse_scope;
use crate::TokenAttributes;

/// Classification of a request's credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthorizationKind {
    /// The validator accepted the token and it has not expired.
    Valid,
    /// No `Authorization` header.
    Absent,
    /// `Authorization` header with a non-bearer scheme.
    MalformedScheme,
    /// The validator failed.
    Invalid,
    /// The validator accepted the token but its `not_after` has passed.
    Expired,
}

impl AuthorizationKind {
    /// Machine-readable tag (`"valid"`, `"absent"`, `"malformed-scheme"`, ...).
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthorizationKind::Valid => "valid",
            AuthorizationKind::Absent => "absent",
            AuthorizationKind::MalformedScheme => "malformed-scheme",
            AuthorizationKind::Invalid => "invalid",
            AuthorizationKind::Expired => "expired",
        }
    }
}

impl fmt::Display for AuthorizationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable authorization outcome for one request.
///
/// Only [`AuthorizationResult::valid`] carries scopes; every other constructor
/// yields an empty scope set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationResult {
    kind: AuthorizationKind,
    token_type: Option<String>,
    client_id: Option<String>,
    user_id: Option<String>,
    realm: Option<String>,
    scope: BTreeSet<String>,
    not_after: Option<i64>,
}

impl AuthorizationResult {
    fn denied(kind: AuthorizationKind) -> Self {
        Self {
            kind,
            token_type: None,
            client_id: None,
            user_id: None,
            realm: None,
            scope: BTreeSet::new(),
            not_after: None,
        }
    }

    /// Accepted token carrying all validator attributes.
    pub fn valid(attributes: TokenAttributes) -> Self {
        let scope = attributes
            .scope
            .as_deref()
            .map(parse_scope)
            .unwrap_or_default();

        Self {
            kind: AuthorizationKind::Valid,
            token_type: attributes.token_type,
            client_id: attributes.client_id,
            user_id: attributes.user_id,
            realm: attributes.realm,
            scope,
            not_after: attributes.not_after,
        }
    }

    /// No credential was presented.
    pub fn absent() -> Self {
        Self::denied(AuthorizationKind::Absent)
    }

    /// A credential with a non-bearer scheme was presented.
    pub fn malformed_scheme() -> Self {
        Self::denied(AuthorizationKind::MalformedScheme)
    }

    /// The validator failed.
    pub fn invalid() -> Self {
        Self::denied(AuthorizationKind::Invalid)
    }

    /// The token expired at `not_after`. Only the expiry is kept.
    pub fn expired(not_after: i64) -> Self {
        Self {
            not_after: Some(not_after),
            ..Self::denied(AuthorizationKind::Expired)
        }
    }

    /// The classification.
    pub fn kind(&self) -> AuthorizationKind {
        self.kind
    }

    /// Whether the token was accepted.
    pub fn is_valid(&self) -> bool {
        self.kind == AuthorizationKind::Valid
    }

    /// Token type reported by the validator.
    pub fn token_type(&self) -> Option<&str> {
        self.token_type.as_deref()
    }

    /// Client the token was issued to.
    pub fn client_id(&self) -> Option<&str> {
        self.client_id.as_deref()
    }

    /// User the token acts for.
    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    /// Realm the token was issued for.
    pub fn realm(&self) -> Option<&str> {
        self.realm.as_deref()
    }

    /// Granted scope names.
    pub fn scope(&self) -> &BTreeSet<String> {
        &self.scope
    }

    /// Expiry in epoch milliseconds.
    pub fn not_after(&self) -> Option<i64> {
        self.not_after
    }

    /// Error tag mirroring [`kind`](Self::kind); `None` when valid.
    pub fn error(&self) -> Option<&'static str> {
        match self.kind {
            AuthorizationKind::Valid => None,
            kind => Some(kind.as_str()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attributes() -> TokenAttributes {
        TokenAttributes {
            token_type: Some("access".into()),
            client_id: Some("client-1".into()),
            realm: Some("Webauthz".into()),
            scope: Some("calendar  contacts".into()),
            not_after: Some(1_000),
            user_id: Some("user-1".into()),
        }
    }

    #[test]
    fn test_valid_carries_attributes() {
        let result = AuthorizationResult::valid(attributes());
        assert!(result.is_valid());
        assert_eq!(result.token_type(), Some("access"));
        assert_eq!(result.client_id(), Some("client-1"));
        assert_eq!(result.user_id(), Some("user-1"));
        assert_eq!(result.realm(), Some("Webauthz"));
        assert_eq!(result.not_after(), Some(1_000));
        assert_eq!(result.scope().len(), 2);
        assert!(result.scope().contains("calendar"));
        assert!(result.error().is_none());
    }

    #[test]
    fn test_valid_without_scope_is_empty() {
        let result = AuthorizationResult::valid(TokenAttributes::default());
        assert!(result.is_valid());
        assert!(result.scope().is_empty());
    }

    #[test]
    fn test_denied_results_have_no_scope() {
        for result in [
            AuthorizationResult::absent(),
            AuthorizationResult::malformed_scheme(),
            AuthorizationResult::invalid(),
            AuthorizationResult::expired(5),
        ] {
            assert!(!result.is_valid());
            assert!(result.scope().is_empty());
            assert!(result.client_id().is_none());
            assert_eq!(result.error(), Some(result.kind().as_str()));
        }
    }

    #[test]
    fn test_expired_keeps_not_after_only() {
        let result = AuthorizationResult::expired(99);
        assert_eq!(result.kind(), AuthorizationKind::Expired);
        assert_eq!(result.not_after(), Some(99));
        assert!(result.user_id().is_none());
    }

    #[test]
    fn test_kind_tags() {
        assert_eq!(AuthorizationKind::MalformedScheme.to_string(), "malformed-scheme");
        assert_eq!(AuthorizationKind::Expired.as_str(), "expired");
    }
}
