//! Configuration: serde-loadable [`Settings`] and the runtime [`Webauthz`] handle.

use std::path::Path;
use std::sync::Arc;

use http::HeaderMap;
use serde::{Deserialize, Serialize};

use crate::middleware::AuthzLayer;
use crate::orchestrator;
use crate::{AuthorizationResult, Credential, Error, LogLogger, Logger, Result, TokenValidator};

/// Realm used when none is configured.
pub const DEFAULT_REALM: &str = "Webauthz";

/// Path used when none is configured.
pub const DEFAULT_PATH: &str = "/";

fn default_realm() -> String {
    DEFAULT_REALM.to_string()
}

fn default_path() -> String {
    DEFAULT_PATH.to_string()
}

/// Static settings for the challenge header.
///
/// Loadable from a TOML table:
///
/// ```toml
/// realm = "Webauthz"
/// path = "/api"
/// discovery_uri = "https://auth.example.com/webauthz.json"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Protection-space label.
    #[serde(default = "default_realm")]
    pub realm: String,
    /// Path prefix clients may attach the credential to.
    #[serde(default = "default_path")]
    pub path: String,
    /// Where clients learn how to obtain a token. No challenge header is
    /// emitted without it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discovery_uri: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            realm: default_realm(),
            path: default_path(),
            discovery_uri: None,
        }
    }
}

impl Settings {
    /// Parse settings from a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::config(format!("invalid settings: {e}")))
    }

    /// Read and parse a TOML settings file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| Error::config(format!("Failed to parse {}: {e}", path.display())))
    }
}

struct Shared {
    validator: Arc<dyn TokenValidator>,
    settings: Settings,
    logger: Arc<dyn Logger>,
}

/// Configured authorization handle, created once at startup.
///
/// Cloning is cheap; all clones share the same immutable configuration.
#[derive(Clone)]
pub struct Webauthz {
    shared: Arc<Shared>,
}

impl std::fmt::Debug for Webauthz {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Webauthz")
            .field("settings", &self.shared.settings)
            .finish_non_exhaustive()
    }
}

impl Webauthz {
    /// Start building a configuration.
    pub fn builder() -> WebauthzBuilder {
        WebauthzBuilder::default()
    }

    /// Default settings and logger around `validator`.
    pub fn new(validator: Arc<dyn TokenValidator>) -> Self {
        Self::from_parts(validator, Settings::default(), Arc::new(LogLogger))
    }

    fn from_parts(
        validator: Arc<dyn TokenValidator>,
        settings: Settings,
        logger: Arc<dyn Logger>,
    ) -> Self {
        Self {
            shared: Arc::new(Shared {
                validator,
                settings,
                logger,
            }),
        }
    }

    /// The challenge settings.
    pub fn settings(&self) -> &Settings {
        &self.shared.settings
    }

    /// The injected logger.
    pub fn logger(&self) -> &dyn Logger {
        self.shared.logger.as_ref()
    }

    /// The token validator.
    pub fn validator(&self) -> &dyn TokenValidator {
        self.shared.validator.as_ref()
    }

    /// Base middleware with no pre-required scopes.
    pub fn layer(&self) -> AuthzLayer {
        AuthzLayer::new(self.clone(), Vec::new())
    }

    /// Middleware bound to `names` as the route's required scopes.
    ///
    /// Order only affects how scopes are rendered in the challenge header.
    pub fn scope<I, S>(&self, names: I) -> AuthzLayer
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        AuthzLayer::new(self.clone(), names.into_iter().map(Into::into).collect())
    }

    /// Run the authorization pipeline against a request's headers.
    pub async fn authorize(&self, headers: &HeaderMap) -> AuthorizationResult {
        orchestrator::authorize(self, Credential::from_headers(headers)).await
    }
}

/// Builder for [`Webauthz`].
#[derive(Default)]
pub struct WebauthzBuilder {
    validator: Option<Arc<dyn TokenValidator>>,
    settings: Settings,
    logger: Option<Arc<dyn Logger>>,
}

impl WebauthzBuilder {
    /// Token validator (required).
    pub fn validator(mut self, validator: Arc<dyn TokenValidator>) -> Self {
        self.validator = Some(validator);
        self
    }

    /// Replace all settings at once, e.g. from [`Settings::load`].
    pub fn settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    /// Protection-space label (default `"Webauthz"`).
    pub fn realm(mut self, realm: impl Into<String>) -> Self {
        self.settings.realm = realm.into();
        self
    }

    /// Credential path prefix (default `"/"`).
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.settings.path = path.into();
        self
    }

    /// Discovery URI advertised in challenges.
    pub fn discovery_uri(mut self, uri: impl Into<String>) -> Self {
        self.settings.discovery_uri = Some(uri.into());
        self
    }

    /// Logger (default [`LogLogger`]).
    pub fn logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Finish; fails with [`Error::MissingValidator`] if no validator was set.
    pub fn build(self) -> Result<Webauthz> {
        let validator = self.validator.ok_or(Error::MissingValidator)?;
        let logger = self.logger.unwrap_or_else(|| Arc::new(LogLogger));
        Ok(Webauthz::from_parts(validator, self.settings, logger))
    }
}
