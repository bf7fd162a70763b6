//! Server configuration from environment variables
//!
//! - `RUST_LOG`: log filter, defaults to `info`
//! - `ENGCONV_LEGACY_KELVIN`: `1`/`true`/`yes`/`on` selects the legacy
//!   Kelvin to Fahrenheit formula

use std::env;
use engconv_units::Registry;

pub const LOG_ENV: &str = "RUST_LOG";
pub const LEGACY_KELVIN_ENV: &str = "ENGCONV_LEGACY_KELVIN";

const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub log_filter: String,
    pub legacy_kelvin: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            legacy_kelvin: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup (tests pass a closure over a map)
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();
        Config {
            log_filter: lookup(LOG_ENV)
                .filter(|s| !s.trim().is_empty())
                .unwrap_or(defaults.log_filter),
            legacy_kelvin: lookup(LEGACY_KELVIN_ENV)
                .map(|s| parse_flag(&s))
                .unwrap_or(defaults.legacy_kelvin),
        }
    }

    /// Registry matching the configured temperature formulas
    pub fn registry(&self) -> Registry {
        if self.legacy_kelvin {
            Registry::legacy()
        } else {
            Registry::standard()
        }
    }
}

fn parse_flag(s: &str) -> bool {
    matches!(s.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}
