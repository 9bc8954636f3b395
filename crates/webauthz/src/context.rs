//! The per-request decision handed to handlers.

use std::collections::BTreeSet;
use std::sync::Arc;

use axum::body::Body;
use axum::response::{IntoResponse, Response};
use http::header::{CONTENT_TYPE, WWW_AUTHENTICATE};
use http::{HeaderValue, StatusCode};
use serde::Serialize;

use crate::challenge::challenge_header;
use crate::scope;
use crate::{AuthorizationKind, AuthorizationResult, Webauthz};

/// Immutable authorization decision for one request.
///
/// Built by [`AuthzService`](crate::AuthzService) and placed in request
/// extensions; extract it in a handler with `ctx: AuthzContext`. Clones share
/// the same result.
///
/// The finishers ([`empty`](Self::empty), [`json`](Self::json),
/// [`html`](Self::html)) each produce a complete 401 response; return at most
/// one of them from a handler.
#[derive(Clone, Debug)]
pub struct AuthzContext {
    result: Arc<AuthorizationResult>,
    required: Arc<[String]>,
    authz: Webauthz,
}

impl AuthzContext {
    /// Wrap a result together with the route's required scopes.
    pub fn new(authz: Webauthz, result: AuthorizationResult, required: Arc<[String]>) -> Self {
        Self {
            result: Arc::new(result),
            required,
            authz,
        }
    }

    /// The underlying result.
    pub fn result(&self) -> &AuthorizationResult {
        &self.result
    }

    /// Scopes the route was bound to.
    pub fn required_scopes(&self) -> &[String] {
        &self.required
    }

    /// Classification of the credential.
    pub fn kind(&self) -> AuthorizationKind {
        self.result.kind()
    }

    /// Token type reported by the validator.
    pub fn token_type(&self) -> Option<&str> {
        self.result.token_type()
    }

    /// Client the token was issued to.
    pub fn client_id(&self) -> Option<&str> {
        self.result.client_id()
    }

    /// Realm the token was issued for.
    pub fn realm(&self) -> Option<&str> {
        self.result.realm()
    }

    /// Granted scopes; empty unless the token is valid.
    pub fn scope(&self) -> &BTreeSet<String> {
        self.result.scope()
    }

    /// Expiry in epoch milliseconds.
    pub fn not_after(&self) -> Option<i64> {
        self.result.not_after()
    }

    /// User the token acts for.
    pub fn user_id(&self) -> Option<&str> {
        self.result.user_id()
    }

    /// Error tag (`"absent"`, `"malformed-scheme"`, `"invalid"`, `"expired"`).
    pub fn error(&self) -> Option<&'static str> {
        self.result.error()
    }

    /// Whether every scope in `scopes` is granted.
    ///
    /// With an empty slice the route's required scopes are checked instead.
    /// If those are empty too the check passes, even without a valid token.
    pub fn is_permitted(&self, scopes: &[&str]) -> bool {
        scope::is_permitted(&self.result, &self.required, scopes)
    }

    /// The `WWW-Authenticate` value for this route, if a discovery URI is configured.
    pub fn challenge(&self) -> Option<HeaderValue> {
        challenge_header(self.authz.settings(), &self.required)
    }

    /// A 401 response builder carrying the challenge header when configured.
    ///
    /// Use it to attach a custom body:
    ///
    /// ```ignore
    /// ctx.header().header(CONTENT_TYPE, "text/plain").body(Body::from("denied"))
    /// ```
    pub fn header(&self) -> http::response::Builder {
        let builder = http::Response::builder().status(StatusCode::UNAUTHORIZED);
        match self.challenge() {
            Some(value) => builder.header(WWW_AUTHENTICATE, value),
            None => builder,
        }
    }

    /// 401 with an empty body.
    pub fn empty(&self) -> Response {
        self.finish(self.header().body(Body::empty()))
    }

    /// 401 with a JSON body.
    pub fn json<T: Serialize + ?Sized>(&self, payload: &T) -> Response {
        match serde_json::to_vec(payload) {
            Ok(bytes) => self.finish(
                self.header()
                    .header(CONTENT_TYPE, "application/json")
                    .body(Body::from(bytes)),
            ),
            Err(e) => {
                self.authz
                    .logger()
                    .error(&format!("failed to serialize 401 body: {e}"));
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }

    /// 401 with an HTML body.
    pub fn html(&self, markup: impl Into<String>) -> Response {
        self.finish(
            self.header()
                .header(CONTENT_TYPE, "text/html; charset=utf-8")
                .body(Body::from(markup.into())),
        )
    }

    fn finish(&self, built: http::Result<Response>) -> Response {
        built.unwrap_or_else(|e| {
            self.authz
                .logger()
                .error(&format!("failed to build 401 response: {e}"));
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::{NoopLogger, TokenAttributes, TokenValidator, ValidationFuture, ValidatorError};
    use std::collections::BTreeMap;

    struct RejectAll;

    impl TokenValidator for RejectAll {
        fn check_token<'a>(&'a self, _token: &'a str) -> ValidationFuture<'a> {
            Box::pin(async { Err(ValidatorError::UnknownToken) })
        }
    }

    fn authz(discovery_uri: Option<&str>) -> Webauthz {
        let builder = Webauthz::builder()
            .validator(Arc::new(RejectAll))
            .logger(Arc::new(NoopLogger))
            .path("/api");
        let builder = match discovery_uri {
            Some(uri) => builder.discovery_uri(uri),
            None => builder,
        };
        builder.build().unwrap()
    }

    fn required(names: &[&str]) -> Arc<[String]> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn granted(scope: &str) -> AuthorizationResult {
        AuthorizationResult::valid(TokenAttributes {
            token_type: Some("access".into()),
            client_id: Some("client-1".into()),
            user_id: Some("user-1".into()),
            realm: Some("Webauthz".into()),
            scope: Some(scope.into()),
            not_after: Some(i64::MAX),
        })
    }

    async fn body_string(resp: Response) -> String {
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[test]
    fn test_fields_mirror_result() {
        let ctx = AuthzContext::new(authz(None), granted("calendar"), required(&[]));
        assert_eq!(ctx.kind(), AuthorizationKind::Valid);
        assert_eq!(ctx.token_type(), Some("access"));
        assert_eq!(ctx.client_id(), Some("client-1"));
        assert_eq!(ctx.user_id(), Some("user-1"));
        assert_eq!(ctx.realm(), Some("Webauthz"));
        assert_eq!(ctx.not_after(), Some(i64::MAX));
        assert!(ctx.scope().contains("calendar"));
        assert!(ctx.error().is_none());
    }

    #[test]
    fn test_is_permitted_with_bound_scopes() {
        let ctx = AuthzContext::new(
            authz(None),
            granted("calendar contacts"),
            required(&["calendar"]),
        );
        assert!(ctx.is_permitted(&["calendar", "contacts"]));
        assert!(!ctx.is_permitted(&["calendar", "admin"]));
        assert!(ctx.is_permitted(&[]));
    }

    #[test]
    fn test_absent_denies_non_empty_checks() {
        let ctx = AuthzContext::new(
            authz(None),
            AuthorizationResult::absent(),
            required(&["calendar"]),
        );
        assert!(!ctx.is_permitted(&[]));
        assert!(!ctx.is_permitted(&["anything"]));
        assert_eq!(ctx.error(), Some("absent"));
    }

    #[test]
    fn test_header_without_discovery_uri() {
        let ctx = AuthzContext::new(authz(None), AuthorizationResult::absent(), required(&["a"]));
        let resp = ctx.empty();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert!(resp.headers().get(WWW_AUTHENTICATE).is_none());
        assert!(ctx.challenge().is_none());
    }

    #[test]
    fn test_header_with_discovery_uri() {
        let ctx = AuthzContext::new(
            authz(Some("https://x/d.json")),
            AuthorizationResult::absent(),
            required(&["a", "b"]),
        );
        let resp = ctx.header().body(Body::empty()).unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            resp.headers().get(WWW_AUTHENTICATE).unwrap(),
            "Bearer realm=Webauthz, scope=a%20b, \
             webauthz_discovery_uri=https%3A%2F%2Fx%2Fd.json, path=%2Fapi"
        );
    }

    #[tokio::test]
    async fn test_empty_body() {
        let ctx = AuthzContext::new(authz(None), AuthorizationResult::invalid(), required(&[]));
        let resp = ctx.empty();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert!(body_string(resp).await.is_empty());
    }

    #[tokio::test]
    async fn test_json_body() {
        let ctx = AuthzContext::new(
            authz(Some("https://x/d.json")),
            AuthorizationResult::expired(1),
            required(&["calendar"]),
        );
        let resp = ctx.json(&serde_json::json!({ "error": ctx.error() }));
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(resp.headers().get(CONTENT_TYPE).unwrap(), "application/json");
        assert!(resp.headers().get(WWW_AUTHENTICATE).is_some());
        assert_eq!(body_string(resp).await, r#"{"error":"expired"}"#);
    }

    #[tokio::test]
    async fn test_json_serialization_failure_is_500() {
        let ctx = AuthzContext::new(authz(None), AuthorizationResult::invalid(), required(&[]));
        // Non-string map keys cannot be encoded as JSON object keys.
        let mut payload = BTreeMap::new();
        payload.insert(vec![1u8], "x");
        let resp = ctx.json(&payload);
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_html_body() {
        let ctx = AuthzContext::new(authz(None), AuthorizationResult::absent(), required(&[]));
        let resp = ctx.html("<p>sign in</p>");
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            resp.headers().get(CONTENT_TYPE).unwrap(),
            "text/html; charset=utf-8"
        );
        assert_eq!(body_string(resp).await, "<p>sign in</p>");
    }
}
