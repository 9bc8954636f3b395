//! Tower authorization middleware.
//!
//! `AuthzLayer` and `AuthzService` attach an [`AuthzContext`] to every request
//! and always forward to the inner service. Denial is the handler's decision.

use std::convert::Infallible;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::body::Body;
use axum::extract::FromRequestParts;
use axum::response::IntoResponse;
use http::request::Parts;
use http::{Request, StatusCode};
use tower::{Layer, Service};

use crate::orchestrator;
use crate::{AuthzContext, Credential, Webauthz};

/// Tower `Layer` that authorizes requests against a required-scope list.
///
/// Create one with [`Webauthz::layer`] or [`Webauthz::scope`].
#[derive(Clone, Debug)]
pub struct AuthzLayer {
    authz: Webauthz,
    required: Arc<[String]>,
}

impl AuthzLayer {
    /// Create a new layer bound to `required`.
    pub fn new(authz: Webauthz, required: Vec<String>) -> Self {
        Self {
            authz,
            required: required.into(),
        }
    }

    /// The bound required scopes.
    pub fn required_scopes(&self) -> &[String] {
        &self.required
    }
}

impl<S> Layer<S> for AuthzLayer {
    type Service = AuthzService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        AuthzService {
            inner,
            authz: self.authz.clone(),
            required: self.required.clone(),
        }
    }
}

/// Tower `Service` that authorizes a request before forwarding it.
///
/// Inserts [`AuthzContext`] into request extensions where it's available to
/// downstream handlers. If the request future is dropped while the validator
/// call is outstanding, nothing has been written and the context is discarded.
#[derive(Clone, Debug)]
pub struct AuthzService<S> {
    inner: S,
    authz: Webauthz,
    required: Arc<[String]>,
}

impl<S> Service<Request<Body>> for AuthzService<S>
where
    S: Service<Request<Body>, Error = Infallible> + Clone + Send + 'static,
    S::Response: IntoResponse,
    S::Future: Send,
{
    type Response = axum::response::Response;
    type Error = Infallible;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<Body>) -> Self::Future {
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);

        let authz = self.authz.clone();
        let required = self.required.clone();

        let credential = Credential::from_headers(req.headers());

        Box::pin(async move {
            let result = orchestrator::authorize(&authz, credential).await;
            authz.logger().trace(&format!(
                "{} {} authorized as {}",
                req.method(),
                req.uri().path(),
                result.kind()
            ));

            req.extensions_mut()
                .insert(AuthzContext::new(authz, result, required));

            let resp = inner
                .call(req)
                .await
                .unwrap_or_else(|infallible| match infallible {});
            Ok(resp.into_response())
        })
    }
}

/// Extract the `AuthzContext` from HTTP request `Parts`, if present.
pub fn context_from_parts(parts: &Parts) -> Option<&AuthzContext> {
    parts.extensions.get::<AuthzContext>()
}

impl<S> FromRequestParts<S> for AuthzContext
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        context_from_parts(parts).cloned().ok_or((
            StatusCode::INTERNAL_SERVER_ERROR,
            "authorization middleware is not installed on this route",
        ))
    }
}
