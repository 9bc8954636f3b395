//! Validator invocation and expiry policy.
//!
//! Turns a classified [`Credential`] into an [`AuthorizationResult`]. The
//! validator is called at most once and its failures, including a panic while
//! it is called or polled, never escape: they become [`AuthorizationKind::Invalid`].
//!
//! [`AuthorizationKind::Invalid`]: crate::AuthorizationKind::Invalid

use std::panic::AssertUnwindSafe;

use futures::FutureExt;

use crate::{AuthorizationResult, Credential, Webauthz};

/// Current time in epoch milliseconds.
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Authorize a credential against the configured validator, using the wall clock.
pub async fn authorize(authz: &Webauthz, credential: Credential) -> AuthorizationResult {
    authorize_at(authz, credential, now_millis()).await
}

/// Authorize a credential, treating `now` (epoch ms) as the current time.
pub async fn authorize_at(authz: &Webauthz, credential: Credential, now: i64) -> AuthorizationResult {
    let logger = authz.logger();

    let token = match credential {
        Credential::Absent => {
            logger.trace("no authorization header");
            return AuthorizationResult::absent();
        }
        Credential::MalformedScheme => {
            logger.trace("authorization header does not use the bearer scheme");
            return AuthorizationResult::malformed_scheme();
        }
        Credential::Bearer(token) => token,
    };

    // The call itself sits inside the guarded future so a panic raised before
    // the validator hands back its future is caught too.
    let validator = authz.validator();
    let checked = AssertUnwindSafe(async { validator.check_token(&token).await })
        .catch_unwind()
        .await;

    let attributes = match checked {
        Ok(Ok(attributes)) => attributes,
        Ok(Err(err)) => {
            logger.warn(&format!("token validation failed: {err}"));
            return AuthorizationResult::invalid();
        }
        Err(_) => {
            logger.error("token validator panicked");
            return AuthorizationResult::invalid();
        }
    };

    if let Some(not_after) = attributes.not_after
        && not_after < now
    {
        logger.info(&format!("token expired at {not_after}"));
        return AuthorizationResult::expired(not_after);
    }

    logger.trace("token accepted");
    AuthorizationResult::valid(attributes)
}
