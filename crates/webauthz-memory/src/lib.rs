//! In-memory token store for webauthz.
//!
//! Implements [`webauthz::TokenValidator`] over a process-local map:
//! - Tokens are keyed by their BLAKE3 digest, never held in clear text
//! - [`MemoryValidator::issue`] mints random tokens for tests and small deployments
//! - [`MemoryValidator::revoke`] removes a token immediately
//!
//! A poisoned lock is recovered. Every write is a single `insert` or `remove`,
//! so the map is never left half-updated.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use webauthz::{TokenAttributes, TokenValidator, ValidationFuture, ValidatorError};

/// Hex-encoded BLAKE3 digest of a token, used as the store key.
pub fn token_digest(token: &str) -> String {
    blake3::hash(token.as_bytes()).to_hex().to_string()
}

type TokenMap = HashMap<String, TokenAttributes>;

/// Token validator backed by an in-process map.
#[derive(Default)]
pub struct MemoryValidator {
    tokens: RwLock<TokenMap>,
}

impl MemoryValidator {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `token` with its attributes, replacing any previous entry.
    pub fn insert(&self, token: &str, attributes: TokenAttributes) {
        self.write().insert(token_digest(token), attributes);
    }

    /// Mint a random token, register it, and return it.
    pub fn issue(&self, attributes: TokenAttributes) -> String {
        let token = uuid::Uuid::new_v4().simple().to_string();
        self.insert(&token, attributes);
        token
    }

    /// Forget `token`. Returns whether it was present.
    pub fn revoke(&self, token: &str) -> bool {
        self.write().remove(&token_digest(token)).is_some()
    }

    /// Number of stored tokens.
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Whether no tokens are stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn read(&self) -> RwLockReadGuard<'_, TokenMap> {
        self.tokens.read().unwrap_or_else(|poisoned| {
            log::warn!("token store lock poisoned, recovering");
            poisoned.into_inner()
        })
    }

    fn write(&self) -> RwLockWriteGuard<'_, TokenMap> {
        self.tokens.write().unwrap_or_else(|poisoned| {
            log::warn!("token store lock poisoned, recovering");
            poisoned.into_inner()
        })
    }

    fn lookup(&self, token: &str) -> Result<TokenAttributes, ValidatorError> {
        self.read()
            .get(&token_digest(token))
            .cloned()
            .ok_or(ValidatorError::UnknownToken)
    }
}

impl TokenValidator for MemoryValidator {
    fn check_token<'a>(&'a self, token: &'a str) -> ValidationFuture<'a> {
        Box::pin(async move { self.lookup(token) })
    }
}
