//! Client configuration
//!
//! Loaded from TOML, then overridden by environment variables.

use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Backend base URL override
pub const ENV_BACKEND_URL: &str = "ECAMPUS_BACKEND_URL";
/// Bearer credential
pub const ENV_TOKEN: &str = "ECAMPUS_TOKEN";
/// Student id of the logged-in applicant
pub const ENV_STUDENT_ID: &str = "ECAMPUS_STUDENT_ID";

/// What to do when the course schema cannot be fetched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SchemaFallback {
    /// Continue with the default postgraduate schema
    #[default]
    FailOpen,
    /// Refuse to open the application
    FailClosed,
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("failed to read config {path}: {source}")]
    Io {
        /// Config file path
        path: PathBuf,
        /// The underlying error
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Backend URL is not an absolute HTTP URL
    #[error("backend URL must start with http:// or https://, got '{0}'")]
    InvalidUrl(String),
}

/// Backend client configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    base_url: String,
    timeout_secs: Option<u64>,
    schema_fallback: SchemaFallback,
    user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:3001".to_string(),
            timeout_secs: None,
            schema_fallback: SchemaFallback::default(),
            user_agent: format!("ecampus-client/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ClientConfig {
    /// Parse a TOML document
    ///
    /// # Errors
    /// `ConfigError::Parse` or `ConfigError::InvalidUrl`.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a TOML file
    ///
    /// # Errors
    /// `ConfigError::Io` if the file cannot be read, otherwise as [`ClientConfig::from_toml_str`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        self.base().map(|_| ())
    }

    fn base(&self) -> Result<Url, ConfigError> {
        let invalid = || ConfigError::InvalidUrl(self.base_url.clone());
        let url = Url::parse(&self.base_url).map_err(|_| invalid())?;
        if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
            return Err(invalid());
        }
        Ok(url)
    }

    /// Set the backend base URL
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the request timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_secs = Some(timeout.as_secs());
        self
    }

    /// Set the schema fetch failure policy
    #[must_use]
    pub fn with_schema_fallback(mut self, policy: SchemaFallback) -> Self {
        self.schema_fallback = policy;
        self
    }

    /// Set the `User-Agent` header
    #[must_use]
    pub fn with_user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = agent.into();
        self
    }

    /// Backend base URL
    #[inline]
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Request timeout, if any
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Policy when the schema fetch fails
    #[inline]
    #[must_use]
    pub fn schema_fallback(&self) -> SchemaFallback {
        self.schema_fallback
    }

    /// `User-Agent` header value
    #[inline]
    #[must_use]
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Absolute URL of an API path given as segments
    ///
    /// Each segment is percent-encoded, so ids containing `/`, `?` or `#`
    /// stay inside their own segment. A path prefix on the base URL is kept.
    ///
    /// # Errors
    /// `ConfigError::InvalidUrl` if the base URL is not an HTTP URL.
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url, ConfigError> {
        let mut url = self.base()?;
        url.path_segments_mut()
            .map_err(|()| ConfigError::InvalidUrl(self.base_url.clone()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

/// Values taken from the environment
#[derive(Clone, Default, PartialEq, Eq)]
pub struct EnvOverrides {
    /// `ECAMPUS_BACKEND_URL`
    pub backend_url: Option<String>,
    /// `ECAMPUS_TOKEN`
    pub token: Option<String>,
    /// `ECAMPUS_STUDENT_ID`
    pub student_id: Option<String>,
}

impl std::fmt::Debug for EnvOverrides {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnvOverrides")
            .field("backend_url", &self.backend_url)
            .field("token", &self.token.as_deref().map(crate::session::redact))
            .field("student_id", &self.student_id)
            .finish()
    }
}

impl EnvOverrides {
    /// Read the process environment
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read through a lookup function; blank values count as unset
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        Self {
            backend_url: get(ENV_BACKEND_URL),
            token: get(ENV_TOKEN),
            student_id: get(ENV_STUDENT_ID),
        }
    }

    /// Apply the backend URL override
    ///
    /// # Errors
    /// `ConfigError::InvalidUrl` if the override is not an HTTP URL.
    pub fn apply(&self, config: ClientConfig) -> Result<ClientConfig, ConfigError> {
        let config = match &self.backend_url {
            Some(url) => config.with_base_url(url.clone()),
            None => config,
        };
        config.validate()?;
        Ok(config)
    }
}
