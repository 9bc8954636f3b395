//! Bearer-token authorization for HTTP services.
//!
//! Provides:
//! - [`TokenValidator`] — Trait for async token validation (implement per backend)
//! - [`Webauthz`] — Immutable configuration handle and middleware factory
//! - [`AuthzLayer`] / [`AuthzService`] — Tower middleware that attaches an [`AuthzContext`]
//! - [`AuthzContext`] — Per-request decision: token attributes, scope checks, 401 finishers
//! - [`Settings`] — Serde-loadable realm / path / discovery URI
//!
//! The middleware never rejects a request by itself. Every request reaches the
//! handler with an [`AuthzContext`], and the handler decides what to do:
//!
//! ```ignore
//! async fn calendar(ctx: AuthzContext) -> Response {
//!     if !ctx.is_permitted(&[]) {
//!         return ctx.json(&serde_json::json!({ "error": "unauthorized" }));
//!     }
//!     Json(load_calendar()).into_response()
//! }
//!
//! let authz = Webauthz::builder().validator(validator).build()?;
//! let app = Router::new()
//!     .route("/calendar", get(calendar).layer(authz.scope(["calendar"])));
//! ```
//!
//! An empty required-scope list combined with an empty `is_permitted` call is
//! vacuously permitted, even for requests without a valid token. Routes that need
//! real protection must bind scopes with [`Webauthz::scope`] or name them at check time.

#![forbid(unsafe_code)]

pub mod challenge;
pub mod config;
pub mod context;
pub mod credential;
pub mod error;
pub mod logger;
pub mod middleware;
pub mod orchestrator;
pub mod result;
pub mod scope;
pub mod validator;

#[cfg(test)]
mod proptests;

pub use config::{Settings, Webauthz, WebauthzBuilder, DEFAULT_PATH, DEFAULT_REALM};
pub use context::AuthzContext;
pub use credential::Credential;
pub use error::{Error, Result, ValidatorError};
pub use logger::{LogLogger, Logger, NoopLogger};
pub use middleware::{context_from_parts, AuthzLayer, AuthzService};
pub use result::{AuthorizationKind, AuthorizationResult};
pub use validator::{TokenAttributes, TokenValidator, ValidationFuture};
