//! `WWW-Authenticate` challenge construction.

use http::HeaderValue;

use crate::Settings;

/// Build the challenge value for the given required scopes.
///
/// Returns `None` when no discovery URI is configured. Each parameter value is
/// percent-encoded on its own, so the result is always a valid header value:
///
/// ```text
/// Bearer realm=Webauthz, scope=a%20b, webauthz_discovery_uri=https%3A%2F%2Fx%2Fd.json, path=%2Fapi
/// ```
pub fn challenge(settings: &Settings, required: &[String]) -> Option<String> {
    let discovery_uri = settings.discovery_uri.as_deref()?;
    let scope = required.join(" ");

    Some(format!(
        "Bearer realm={}, scope={}, webauthz_discovery_uri={}, path={}",
        urlencoding::encode(&settings.realm),
        urlencoding::encode(&scope),
        urlencoding::encode(discovery_uri),
        urlencoding::encode(&settings.path),
    ))
}

/// [`challenge`] as a ready-to-insert header value.
pub fn challenge_header(settings: &Settings, required: &[String]) -> Option<HeaderValue> {
    challenge(settings, required).and_then(|value| HeaderValue::from_str(&value).ok())
}
