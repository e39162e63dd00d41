//! Process-wide configuration.
//!
//! Values are resolved with the precedence call site > [`Config`] >
//! built-in default. A `Config` is handed to the engine when it is built;
//! nothing here is global state.

use std::path::Path;
use std::time::Duration;

use figment::Figment;
use figment::providers::{Env, Format, Toml};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Per-attempt timeout used when neither the request nor the config sets one.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(5000);

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Figment(#[from] figment::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Timeout per attempt in milliseconds. Only armed while further sources remain.
    pub timeout_ms:  Option<u64>,
    /// Interpreter used to execute delivered content when a consumer names none.
    pub interpreter: Option<String>,
}

impl Config {
    /// Prefix of the environment variables read by [`Config::load`] and
    /// [`Config::from_env`], e.g. `VOUCH_TIMEOUT_MS`.
    pub const ENV_PREFIX: &'static str = "VOUCH_";

    /// Read a TOML file, then let `VOUCH_*` environment variables override it.
    /// A missing file is treated as empty.
    ///
    /// # Errors
    ///
    /// Fails on malformed TOML or values of the wrong type.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Ok(Figment::new()
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed(Self::ENV_PREFIX))
            .extract()?)
    }

    /// # Errors
    ///
    /// Fails on values of the wrong type.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Figment::new().merge(Env::prefixed(Self::ENV_PREFIX)).extract()?)
    }

    /// # Errors
    ///
    /// Fails on malformed TOML or values of the wrong type.
    pub fn from_toml_str(toml: &str) -> Result<Self, ConfigError> {
        Ok(Figment::new().merge(Toml::string(toml)).extract()?)
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = Some(u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX));
        self
    }

    #[must_use]
    pub fn with_interpreter(mut self, interpreter: impl Into<String>) -> Self {
        self.interpreter = Some(interpreter.into());
        self
    }

    /// The configured timeout, or [`DEFAULT_TIMEOUT`].
    pub fn timeout(&self) -> Duration {
        self.timeout_ms.map_or(DEFAULT_TIMEOUT, Duration::from_millis)
    }

    /// Apply the precedence call site > config > built-in default.
    pub fn resolve_timeout(&self, call_site: Option<Duration>) -> Duration {
        call_site.unwrap_or_else(|| self.timeout())
    }
}
