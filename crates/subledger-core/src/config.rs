//! Client configuration.
//!
//! Stored as JSON under the platform config directory
//! (`~/.config/subledger/config.json` on Linux). A missing file means
//! defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::status::DEFAULT_TIMEOUT;
use crate::store::DEFAULT_BASE_URL;
use crate::subscription::{ExpiryHorizon, KnownService, ServiceRegistry, UserContext};
use crate::{Error, Result};

/// Largest accepted `expiring_horizon_days`.
pub const MAX_HORIZON_DAYS: u32 = 3650;

/// Settings that shape the controller's behaviour.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreSettings {
    /// Expiring-soon horizon.
    pub horizon: ExpiryHorizon,
    /// Status message auto-dismiss timeout.
    pub status_timeout: Duration,
    /// Known services offered by the picker.
    pub registry: ServiceRegistry,
}

impl Default for CoreSettings {
    fn default() -> Self {
        Self {
            horizon: ExpiryHorizon::DEFAULT,
            status_timeout: DEFAULT_TIMEOUT,
            registry: ServiceRegistry::default(),
        }
    }
}

/// Persisted client configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Root of the subscriptions API.
    pub api_base_url: String,
    /// Signed-in user, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    /// Days ahead that count as "expiring soon".
    pub expiring_horizon_days: u32,
    /// Seconds a status message stays visible.
    pub status_timeout_secs: u64,
    /// Per-request timeout; unset waits as long as the transport does.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,
    /// Mirror expiring-soon warnings as desktop notifications.
    pub desktop_notifications: bool,
    /// Replaces the built-in service list when set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub services: Option<Vec<KnownService>>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_BASE_URL.to_string(),
            user_id: None,
            expiring_horizon_days: ExpiryHorizon::DEFAULT.in_days(),
            status_timeout_secs: DEFAULT_TIMEOUT.as_secs(),
            request_timeout_secs: None,
            desktop_notifications: false,
            services: None,
        }
    }
}

impl ClientConfig {
    /// Default location of the config file.
    #[must_use]
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("subledger")
            .join("config.json")
    }

    /// Loads the config from the default location.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub async fn load() -> Result<Self> {
        Self::load_from(&Self::default_path()).await
    }

    /// Loads the config from `path`, falling back to defaults if it is absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub async fn load_from(path: &Path) -> Result<Self> {
        if !tokio::fs::try_exists(path).await? {
            tracing::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let contents = tokio::fs::read_to_string(path).await?;
        let config: Self = serde_json::from_str(&contents)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))?;
        config.validate()?;
        Ok(config)
    }

    /// Saves the config to the default location.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or file cannot be written.
    pub async fn save(&self) -> Result<()> {
        self.save_to(&Self::default_path()).await
    }

    /// Saves the config to `path`, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or file cannot be written.
    pub async fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        tokio::fs::write(path, contents).await?;

        tracing::info!("Config saved to {}", path.display());
        Ok(())
    }

    /// Checks values that would make the client unusable.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` describing the first invalid value.
    pub fn validate(&self) -> Result<()> {
        if self.api_base_url.trim().is_empty() {
            return Err(Error::Config("api_base_url must not be empty".into()));
        }
        if self.expiring_horizon_days > MAX_HORIZON_DAYS {
            return Err(Error::Config(format!(
                "expiring_horizon_days must be at most {MAX_HORIZON_DAYS}"
            )));
        }
        if self.status_timeout_secs == 0 {
            return Err(Error::Config(
                "status_timeout_secs must be at least 1".into(),
            ));
        }
        if self.request_timeout_secs == Some(0) {
            return Err(Error::Config(
                "request_timeout_secs must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// User scoping derived from `user_id`.
    #[must_use]
    pub fn user(&self) -> UserContext {
        self.user_id
            .as_deref()
            .map_or_else(UserContext::anonymous, |id| UserContext::new(id))
    }

    /// Per-request timeout, if configured.
    #[must_use]
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    /// Controller settings derived from this config.
    #[must_use]
    pub fn settings(&self) -> CoreSettings {
        CoreSettings {
            horizon: ExpiryHorizon::days(self.expiring_horizon_days),
            status_timeout: Duration::from_secs(self.status_timeout_secs),
            registry: self
                .services
                .clone()
                .map_or_else(ServiceRegistry::default, |services| ServiceRegistry::new(services)),
        }
    }
}
