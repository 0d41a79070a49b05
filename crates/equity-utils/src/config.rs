//! Process settings read from the environment

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// Default chat model
pub const DEFAULT_MODEL_NAME: &str = "llama-3.3-70b-versatile";

/// Errors in environment-provided settings
#[derive(Debug, Error, PartialEq)]
pub enum SettingsError {
    /// A variable is set but cannot be parsed
    #[error("Invalid value for {var}: '{value}' ({reason})")]
    InvalidValue {
        var: String,
        value: String,
        reason: String,
    },
}

/// Settings shared by every entry point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Chat model (`MODEL_NAME`)
    pub model_name: String,

    /// Model turns before giving up (`REACT_MAX_ITERATIONS`)
    pub max_iterations: usize,

    /// Sampling temperature (`REACT_TEMPERATURE`)
    pub temperature: f32,

    /// Default tracing filter when `RUST_LOG` is unset (`EQUITY_LOG`)
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            model_name: DEFAULT_MODEL_NAME.to_string(),
            max_iterations: 5,
            temperature: 0.2,
            log_filter: "info".to_string(),
        }
    }
}

impl Settings {
    /// Load settings from process environment variables
    pub fn from_env() -> Result<Self, SettingsError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load settings through an arbitrary variable lookup
    ///
    /// Unset or empty variables keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, SettingsError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let defaults = Self::default();

        let max_iterations = match get("REACT_MAX_ITERATIONS") {
            Some(raw) => parse("REACT_MAX_ITERATIONS", &raw)?,
            None => defaults.max_iterations,
        };
        if max_iterations == 0 {
            return Err(invalid("REACT_MAX_ITERATIONS", "0", "must be at least 1"));
        }

        let temperature = match get("REACT_TEMPERATURE") {
            Some(raw) => parse("REACT_TEMPERATURE", &raw)?,
            None => defaults.temperature,
        };
        if !(0.0..=2.0).contains(&temperature) {
            return Err(invalid(
                "REACT_TEMPERATURE",
                &temperature.to_string(),
                "must be between 0 and 2",
            ));
        }

        Ok(Self {
            model_name: get("MODEL_NAME").unwrap_or(defaults.model_name),
            max_iterations,
            temperature,
            log_filter: get("EQUITY_LOG").unwrap_or(defaults.log_filter),
        })
    }
}

fn parse<T>(var: &str, raw: &str) -> Result<T, SettingsError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|e: T::Err| invalid(var, raw, &e.to_string()))
}

fn invalid(var: &str, value: &str, reason: &str) -> SettingsError {
    SettingsError::InvalidValue {
        var: var.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}
