//! Storefront configuration.
//!
//! Loaded in three layers, later layers winning:
//!
//! ```text
//! defaults ──► TOML file ──► VITRINE_* environment variables ──► validate()
//!              ($VITRINE_CONFIG or ./vitrine.toml, optional)
//! ```
//!
//! Every field of the file is optional, so a file only needs the values it
//! changes:
//!
//! ```toml
//! port = 9000
//! dev_mode = true
//! session_ttl_secs = 600
//!
//! [delays]
//! checkout_ms = 0
//! ```

use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use vitrine_core::checkout::CheckoutPolicy;
use vitrine_core::{Money, TaxRate};
use vitrine_session::{SessionConfig, SimulatedDelays};

/// Config file read when `VITRINE_CONFIG` is not set.
pub const DEFAULT_CONFIG_FILE: &str = "vitrine.toml";

/// Simulated backend latency, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DelayConfig {
    pub login_ms: u64,
    pub register_ms: u64,
    pub checkout_ms: u64,
    pub ar_init_ms: u64,
    pub chat_delivery_ms: u64,
    pub chat_reply_min_ms: u64,
    pub chat_reply_max_ms: u64,
}

impl Default for DelayConfig {
    fn default() -> Self {
        Self {
            login_ms: 1500,
            register_ms: 2000,
            checkout_ms: 2000,
            ar_init_ms: 2000,
            chat_delivery_ms: 1000,
            chat_reply_min_ms: 2000,
            chat_reply_max_ms: 4000,
        }
    }
}

impl DelayConfig {
    pub fn to_delays(&self) -> SimulatedDelays {
        SimulatedDelays {
            login: Duration::from_millis(self.login_ms),
            register: Duration::from_millis(self.register_ms),
            checkout: Duration::from_millis(self.checkout_ms),
            ar_init: Duration::from_millis(self.ar_init_ms),
            chat_delivery: Duration::from_millis(self.chat_delivery_ms),
            chat_reply_min: Duration::from_millis(self.chat_reply_min_ms),
            chat_reply_max: Duration::from_millis(self.chat_reply_max_ms),
        }
    }
}

/// Storefront configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StorefrontConfig {
    /// Interface to bind
    pub host: IpAddr,

    /// HTTP port
    pub port: u16,

    /// Mounts the development metrics route
    pub dev_mode: bool,

    /// Sales tax in basis points (800 = 8%)
    pub tax_rate_bps: u32,

    /// Express shipping price in cents
    pub express_shipping_cents: i64,

    /// Per-subscriber buffer of each cart's event channel
    pub broadcast_capacity: usize,

    /// A session untouched for this long is dropped
    pub session_ttl_secs: u64,

    /// How often idle sessions are swept
    pub session_sweep_secs: u64,

    pub delays: DelayConfig,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 8080,
            dev_mode: false,
            tax_rate_bps: 800,
            express_shipping_cents: 2900,
            broadcast_capacity: vitrine_session::config::DEFAULT_BROADCAST_CAPACITY,
            session_ttl_secs: 30 * 60,
            session_sweep_secs: 60,
            delays: DelayConfig::default(),
        }
    }
}

impl StorefrontConfig {
    /// Loads configuration from the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        let env: HashMap<String, String> = std::env::vars().collect();
        Self::load_from(&env)
    }

    /// Loads configuration from the given environment map.
    pub fn load_from(env: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let (path, explicit) = match env.get("VITRINE_CONFIG") {
            Some(path) => (PathBuf::from(path), true),
            None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
        };

        let mut config = if path.exists() {
            Self::from_file(&path)?
        } else if explicit {
            return Err(ConfigError::FileNotFound(path));
        } else {
            Self::default()
        };

        config.apply_env(env)?;
        config.validate()?;
        Ok(config)
    }

    /// Parses a TOML config file. Missing keys keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Self::from_toml(&raw)
    }

    pub fn from_toml(raw: &str) -> Result<Self, ConfigError> {
        toml::from_str(raw).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Applies `VITRINE_*` overrides.
    pub fn apply_env(&mut self, env: &HashMap<String, String>) -> Result<(), ConfigError> {
        fn parse<T: std::str::FromStr>(
            env: &HashMap<String, String>,
            key: &str,
            target: &mut T,
        ) -> Result<(), ConfigError> {
            if let Some(raw) = env.get(key) {
                *target = raw
                    .trim()
                    .parse()
                    .map_err(|_| ConfigError::InvalidValue(key.to_string()))?;
            }
            Ok(())
        }

        parse(env, "VITRINE_HOST", &mut self.host)?;
        parse(env, "VITRINE_PORT", &mut self.port)?;
        parse(env, "VITRINE_DEV_MODE", &mut self.dev_mode)?;
        parse(env, "VITRINE_TAX_RATE_BPS", &mut self.tax_rate_bps)?;
        parse(env, "VITRINE_EXPRESS_SHIPPING_CENTS", &mut self.express_shipping_cents)?;
        parse(env, "VITRINE_BROADCAST_CAPACITY", &mut self.broadcast_capacity)?;
        parse(env, "VITRINE_SESSION_TTL_SECS", &mut self.session_ttl_secs)?;
        parse(env, "VITRINE_SESSION_SWEEP_SECS", &mut self.session_sweep_secs)?;
        parse(env, "VITRINE_LOGIN_DELAY_MS", &mut self.delays.login_ms)?;
        parse(env, "VITRINE_REGISTER_DELAY_MS", &mut self.delays.register_ms)?;
        parse(env, "VITRINE_CHECKOUT_DELAY_MS", &mut self.delays.checkout_ms)?;
        parse(env, "VITRINE_AR_INIT_DELAY_MS", &mut self.delays.ar_init_ms)?;
        parse(env, "VITRINE_CHAT_DELIVERY_MS", &mut self.delays.chat_delivery_ms)?;
        parse(env, "VITRINE_CHAT_REPLY_MIN_MS", &mut self.delays.chat_reply_min_ms)?;
        parse(env, "VITRINE_CHAT_REPLY_MAX_MS", &mut self.delays.chat_reply_max_ms)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tax_rate_bps > 10_000 {
            return Err(ConfigError::InvalidValue("tax_rate_bps".to_string()));
        }
        if self.express_shipping_cents < 0 {
            return Err(ConfigError::InvalidValue("express_shipping_cents".to_string()));
        }
        if self.broadcast_capacity == 0 {
            return Err(ConfigError::InvalidValue("broadcast_capacity".to_string()));
        }
        if self.session_ttl_secs == 0 {
            return Err(ConfigError::InvalidValue("session_ttl_secs".to_string()));
        }
        if self.session_sweep_secs == 0 {
            return Err(ConfigError::InvalidValue("session_sweep_secs".to_string()));
        }
        if self.delays.chat_reply_min_ms > self.delays.chat_reply_max_ms {
            return Err(ConfigError::InvalidDelayRange {
                min: self.delays.chat_reply_min_ms,
                max: self.delays.chat_reply_max_ms,
            });
        }
        Ok(())
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_secs)
    }

    pub fn session_sweep_interval(&self) -> Duration {
        Duration::from_secs(self.session_sweep_secs)
    }

    pub fn checkout_policy(&self) -> CheckoutPolicy {
        CheckoutPolicy {
            tax_rate: TaxRate::from_bps(self.tax_rate_bps),
            express_shipping: Money::from_cents(self.express_shipping_cents),
        }
    }

    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            delays: self.delays.to_delays(),
            broadcast_capacity: self.broadcast_capacity,
            checkout: self.checkout_policy(),
        }
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Config file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("Failed to read {}: {reason}", .path.display())]
    Read { path: PathBuf, reason: String },

    #[error("Failed to parse config: {0}")]
    Parse(String),

    #[error("Chat reply delay range is inverted: {min}ms > {max}ms")]
    InvalidDelayRange { min: u64, max: u64 },
}
