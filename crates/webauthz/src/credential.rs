//! Authorization header classification.

use http::header::AUTHORIZATION;
use http::HeaderMap;

const BEARER_PREFIX: &str = "bearer ";

/// What the `Authorization` header holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credential {
    /// No header.
    Absent,
    /// A header using some scheme other than `Bearer`, or one carrying
    /// bytes outside visible ASCII.
    MalformedScheme,
    /// A bearer token, trimmed of surrounding whitespace.
    Bearer(String),
}

impl Credential {
    /// Classify the request's `Authorization` header.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        match headers.get(AUTHORIZATION) {
            None => Credential::Absent,
            Some(value) => match value.to_str() {
                Ok(text) => Self::classify(Some(text)),
                // obs-text never forms a bearer token.
                Err(_) => Credential::MalformedScheme,
            },
        }
    }

    /// Classify a raw header value.
    ///
    /// The scheme match is case-insensitive and requires the single space
    /// after `bearer`.
    pub fn classify(header: Option<&str>) -> Self {
        let Some(value) = header else {
            return Credential::Absent;
        };

        match value.get(..BEARER_PREFIX.len()) {
            Some(scheme) if scheme.eq_ignore_ascii_case(BEARER_PREFIX) => {
                Credential::Bearer(value[BEARER_PREFIX.len()..].trim().to_string())
            }
            _ => Credential::MalformedScheme,
        }
    }
}
