use std::env;
use thiserror::Error;

pub const LOG_LEVEL_VAR: &str = "PAYMENT_CHECKS_LOG_LEVEL";
pub const AUDIT_VAR: &str = "PAYMENT_CHECKS_AUDIT";

/// Runtime settings read from the environment (and a `.env` file if present).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Fallback `EnvFilter` directive when `RUST_LOG` is unset.
    pub log_level: String,
    /// Wrap every rule with the tracing audit hooks.
    pub audit: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
            audit: false,
        }
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} must be a boolean (true/false/1/0), got '{value}'")]
    InvalidBool { var: &'static str, value: String },
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|var| env::var(var).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let log_level = lookup(LOG_LEVEL_VAR).unwrap_or(defaults.log_level);
        let audit = match lookup(AUDIT_VAR) {
            Some(value) => parse_bool(AUDIT_VAR, &value)?,
            None => defaults.audit,
        };

        Ok(Self { log_level, audit })
    }
}

fn parse_bool(var: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" | "" => Ok(false),
        _ => Err(ConfigError::InvalidBool {
            var,
            value: value.to_string(),
        }),
    }
}
