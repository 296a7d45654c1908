use std::{env, fs, path::Path, time::Duration};

use serde::Deserialize;

use crate::error::{MonitorError, Result};

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 5111;
const DEFAULT_TIMEOUT_MS: u64 = 5000;
const DEFAULT_PULSE_MS: u64 = 1000;

/// Where the training process lives and how hard we poll it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorConfig {
    pub host: String,
    pub port: u16,
    /// Pause between a failed poll and the next attempt. Zero retries immediately.
    pub retry_delay: Duration,
    /// Upper bound for a single request. `None` waits forever.
    pub request_timeout: Option<Duration>,
    /// Period of the connection pulse.
    pub pulse_interval: Duration,
}

/// On-disk shape of the configuration, every field optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    host: Option<String>,
    port: Option<u16>,
    retry_delay_ms: Option<u64>,
    request_timeout_ms: Option<u64>,
    pulse_interval_ms: Option<u64>,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            retry_delay: Duration::ZERO,
            request_timeout: Some(Duration::from_millis(DEFAULT_TIMEOUT_MS)),
            pulse_interval: Duration::from_millis(DEFAULT_PULSE_MS),
        }
    }
}

impl MonitorConfig {
    /// Parses a configuration from a JSON document, filling the gaps with defaults.
    ///
    /// A `request_timeout_ms` of `0` disables the timeout.
    ///
    /// # Errors
    /// Returns `InvalidConfig` if the document is not valid JSON, has unknown keys
    /// or describes an unusable configuration.
    pub fn from_json(content: &str) -> Result<Self> {
        let file: ConfigFile = serde_json::from_str(content)
            .map_err(|e| MonitorError::InvalidConfig(format!("invalid JSON: {e}")))?;

        let mut cfg = Self::default();
        if let Some(host) = file.host {
            cfg.host = host;
        }
        if let Some(port) = file.port {
            cfg.port = port;
        }
        if let Some(ms) = file.retry_delay_ms {
            cfg.retry_delay = Duration::from_millis(ms);
        }
        if let Some(ms) = file.request_timeout_ms {
            cfg.request_timeout = (ms > 0).then(|| Duration::from_millis(ms));
        }
        if let Some(ms) = file.pulse_interval_ms {
            cfg.pulse_interval = Duration::from_millis(ms);
        }

        cfg.validate()?;
        Ok(cfg)
    }

    /// Loads the configuration from a JSON file.
    ///
    /// # Errors
    /// Returns `Io` if the file cannot be read, otherwise see [`MonitorConfig::from_json`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Applies the `HOST` and `PORT` environment variables on top of this configuration.
    ///
    /// # Errors
    /// Returns `InvalidConfig` if `PORT` is not a valid port number.
    pub fn with_env(mut self) -> Result<Self> {
        if let Ok(host) = env::var("HOST") {
            self.host = host;
        }
        if let Ok(port) = env::var("PORT") {
            self.port = port
                .parse()
                .map_err(|e| MonitorError::InvalidConfig(format!("PORT={port}: {e}")))?;
        }

        self.validate()?;
        Ok(self)
    }

    /// Checks the configuration is usable.
    ///
    /// # Errors
    /// Returns `InvalidConfig` naming the offending field.
    pub fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            return Err(MonitorError::InvalidConfig("host must not be empty".into()));
        }
        if self.port == 0 {
            return Err(MonitorError::InvalidConfig("port must not be 0".into()));
        }
        if self.pulse_interval.is_zero() {
            return Err(MonitorError::InvalidConfig(
                "pulse_interval_ms must be positive".into(),
            ));
        }
        Ok(())
    }

    /// Base URL of the training process, without a trailing slash.
    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}
