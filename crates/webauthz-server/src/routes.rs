//! HTTP routes for the example resource server.

use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;
use webauthz::{AuthzContext, Webauthz};

/// Build the router: `/health` is open, everything else sits behind webauthz.
pub fn router(authz: &Webauthz) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/calendar", get(calendar).layer(authz.scope(["calendar"])))
        .route("/contacts", get(contacts).layer(authz.scope(["contacts"])))
        .route("/whoami", get(whoami).layer(authz.layer()))
}

async fn health() -> &'static str {
    "ok"
}

async fn calendar(ctx: AuthzContext) -> Response {
    if !ctx.is_permitted(&[]) {
        tracing::debug!(error = ?ctx.error(), "calendar access denied");
        return ctx.json(&json!({
            "error": ctx.error().unwrap_or("insufficient_scope"),
            "required": ctx.required_scopes(),
        }));
    }

    Json(json!({
        "events": [],
        "client_id": ctx.client_id(),
    }))
    .into_response()
}

async fn contacts(ctx: AuthzContext) -> Response {
    if !ctx.is_permitted(&[]) {
        tracing::debug!(error = ?ctx.error(), "contacts access denied");
        return ctx.html("<!doctype html><title>Sign in</title><p>Access to contacts requires authorization.</p>");
    }

    Json(json!({ "contacts": [] })).into_response()
}

async fn whoami(ctx: AuthzContext) -> Response {
    if !ctx.result().is_valid() {
        return ctx.empty();
    }

    Json(json!({
        "type": ctx.token_type(),
        "client_id": ctx.client_id(),
        "user_id": ctx.user_id(),
        "realm": ctx.realm(),
        "scope": ctx.scope(),
        "not_after": ctx.not_after(),
    }))
    .into_response()
}
