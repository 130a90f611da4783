//! Client configuration
//!
//! Loads session settings from environment variables (and a `.env` file if present).

use serde::Deserialize;
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Session configuration for a chat client
#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    #[serde(default = "default_api_url")]
    pub api_url: String,
    pub access_token: String,
    pub refresh_token: String,
    /// Room id to rejoin on authentication
    #[serde(default)]
    pub room: Option<String>,
    #[serde(default)]
    pub muted: bool,
    #[serde(default)]
    pub reconnect_voice: bool,
    #[serde(default = "default_prefixes")]
    pub prefixes: Vec<String>,
    #[serde(default = "default_heartbeat_interval_secs")]
    pub heartbeat_interval_secs: u64,
    #[serde(default = "default_rooms_refresh_interval_secs")]
    pub rooms_refresh_interval_secs: u64,
    #[serde(default = "default_wait_timeout_secs")]
    pub wait_timeout_secs: u64,
    #[serde(default = "default_platform")]
    pub platform: String,
}

/// Shortest heartbeat or refresh period
const MIN_INTERVAL_SECS: u64 = 1;

// Default value functions
fn default_api_url() -> String {
    "wss://api.dogehouse.tv/socket".to_string()
}

fn default_prefixes() -> Vec<String> {
    vec!["!".to_string()]
}

fn default_heartbeat_interval_secs() -> u64 {
    8
}

fn default_rooms_refresh_interval_secs() -> u64 {
    15
}

fn default_wait_timeout_secs() -> u64 {
    60
}

fn default_platform() -> String {
    "doge-client".to_string()
}

impl ClientConfig {
    /// Create a configuration with the given tokens and defaults for everything else
    pub fn new(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self {
            api_url: default_api_url(),
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
            room: None,
            muted: false,
            reconnect_voice: false,
            prefixes: default_prefixes(),
            heartbeat_interval_secs: default_heartbeat_interval_secs(),
            rooms_refresh_interval_secs: default_rooms_refresh_interval_secs(),
            wait_timeout_secs: default_wait_timeout_secs(),
            platform: default_platform(),
        }
    }

    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if a token is missing or a value cannot be parsed
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| {
            lookup(key)
                .filter(|value| !value.is_empty())
                .ok_or(ConfigError::MissingVar(key))
        };

        Ok(Self {
            api_url: lookup("DOGE_API_URL").unwrap_or_else(default_api_url),
            access_token: required("DOGE_ACCESS_TOKEN")?,
            refresh_token: required("DOGE_REFRESH_TOKEN")?,
            room: lookup("DOGE_ROOM").filter(|room| !room.is_empty()),
            muted: parse_bool(&lookup, "DOGE_MUTED")?.unwrap_or(false),
            reconnect_voice: parse_bool(&lookup, "DOGE_RECONNECT_VOICE")?.unwrap_or(false),
            prefixes: lookup("DOGE_PREFIXES")
                .map(|s| {
                    s.split(',')
                        .map(str::trim)
                        .filter(|p| !p.is_empty())
                        .map(String::from)
                        .collect::<Vec<_>>()
                })
                .filter(|prefixes| !prefixes.is_empty())
                .unwrap_or_else(default_prefixes),
            heartbeat_interval_secs: parse_interval(&lookup, "DOGE_HEARTBEAT_INTERVAL_SECS")?
                .unwrap_or_else(default_heartbeat_interval_secs),
            rooms_refresh_interval_secs: parse_interval(&lookup, "DOGE_ROOMS_REFRESH_INTERVAL_SECS")?
                .unwrap_or_else(default_rooms_refresh_interval_secs),
            wait_timeout_secs: parse_var(&lookup, "DOGE_WAIT_TIMEOUT_SECS")?
                .unwrap_or_else(default_wait_timeout_secs),
            platform: lookup("DOGE_PLATFORM").unwrap_or_else(default_platform),
        })
    }

    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    pub fn with_room(mut self, room: impl Into<String>) -> Self {
        self.room = Some(room.into());
        self
    }

    pub fn with_muted(mut self, muted: bool) -> Self {
        self.muted = muted;
        self
    }

    pub fn with_reconnect_voice(mut self, reconnect_voice: bool) -> Self {
        self.reconnect_voice = reconnect_voice;
        self
    }

    pub fn with_prefixes<I, S>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.prefixes = prefixes.into_iter().map(Into::into).collect();
        self
    }

    /// Intervals are kept in whole seconds: sub-second parts round up and
    /// the result is at least one second.
    pub fn with_heartbeat_interval(mut self, interval: Duration) -> Self {
        self.heartbeat_interval_secs = whole_secs(interval).max(MIN_INTERVAL_SECS);
        self
    }

    /// Rounded like [`Self::with_heartbeat_interval`]
    pub fn with_rooms_refresh_interval(mut self, interval: Duration) -> Self {
        self.rooms_refresh_interval_secs = whole_secs(interval).max(MIN_INTERVAL_SECS);
        self
    }

    /// Rounded up to whole seconds
    pub fn with_wait_timeout(mut self, timeout: Duration) -> Self {
        self.wait_timeout_secs = whole_secs(timeout);
        self
    }

    pub fn with_platform(mut self, platform: impl Into<String>) -> Self {
        self.platform = platform.into();
        self
    }

    #[must_use]
    pub fn heartbeat_interval(&self) -> Duration {
        Duration::from_secs(self.heartbeat_interval_secs.max(MIN_INTERVAL_SECS))
    }

    #[must_use]
    pub fn rooms_refresh_interval(&self) -> Duration {
        Duration::from_secs(self.rooms_refresh_interval_secs.max(MIN_INTERVAL_SECS))
    }

    #[must_use]
    pub fn wait_timeout(&self) -> Duration {
        Duration::from_secs(self.wait_timeout_secs)
    }
}

fn parse_var<F, T>(lookup: &F, key: &'static str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    lookup(key)
        .map(|raw| {
            raw.trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue(key, raw.clone()))
        })
        .transpose()
}

/// A period in seconds; zero is rejected
fn parse_interval<F>(lookup: &F, key: &'static str) -> Result<Option<u64>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match parse_var::<F, u64>(lookup, key)? {
        Some(secs) if secs < MIN_INTERVAL_SECS => {
            Err(ConfigError::InvalidValue(key, secs.to_string()))
        }
        secs => Ok(secs),
    }
}

fn whole_secs(duration: Duration) -> u64 {
    duration.as_secs() + u64::from(duration.subsec_nanos() > 0)
}

fn parse_bool<F>(lookup: &F, key: &'static str) -> Result<Option<bool>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|raw| match raw.trim().to_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(ConfigError::InvalidValue(key, raw.clone())),
        })
        .transpose()
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
