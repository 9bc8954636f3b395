//! Server configuration file.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use webauthz::orchestrator::now_millis;
use webauthz::{Settings, TokenAttributes};
use webauthz_memory::MemoryValidator;

/// Default listen address.
pub const DEFAULT_BIND: &str = "127.0.0.1:8080";

/// Top-level TOML document.
#[derive(Debug, Default, Deserialize)]
pub struct ServerConfig {
    /// Listen address, overridden by `--bind`.
    pub bind: Option<String>,
    /// Challenge settings.
    #[serde(default)]
    pub webauthz: Settings,
    /// Tokens preloaded into the memory store.
    #[serde(default)]
    pub tokens: Vec<SeedToken>,
}

/// A token entry in the `[[tokens]]` array.
#[derive(Debug, Deserialize)]
pub struct SeedToken {
    pub token: String,
    #[serde(default)]
    pub scope: String,
    pub client_id: Option<String>,
    pub user_id: Option<String>,
    /// Lifetime from server start; no expiry when omitted.
    pub ttl_seconds: Option<u64>,
}

impl SeedToken {
    fn attributes(&self, now: i64) -> TokenAttributes {
        let not_after = self.ttl_seconds.map(|ttl| {
            let ttl_ms = i64::try_from(ttl.saturating_mul(1000)).unwrap_or(i64::MAX);
            now.saturating_add(ttl_ms)
        });

        TokenAttributes {
            token_type: Some("access".to_string()),
            client_id: self.client_id.clone(),
            realm: None,
            scope: Some(self.scope.clone()),
            not_after,
            user_id: self.user_id.clone(),
        }
    }
}

impl ServerConfig {
    /// Parse a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("invalid server configuration")
    }

    /// Read the config file, or fall back to defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                let content = std::fs::read_to_string(path)
                    .with_context(|| format!("failed to read {}", path.display()))?;
                Self::from_toml_str(&content)
                    .with_context(|| format!("failed to parse {}", path.display()))
            }
            None => Ok(Self::default()),
        }
    }

    /// Load every seed token into `store`, with expiries relative to now.
    pub fn seed(&self, store: &MemoryValidator) {
        let now = now_millis();
        for seed in &self.tokens {
            store.insert(&seed.token, seed.attributes(now));
        }
        tracing::info!(count = self.tokens.len(), "seeded token store");
    }
}
