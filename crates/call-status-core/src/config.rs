//! Resolver configuration
//!
//! Only the duration formatting is configurable; the status mapping itself
//! is fixed. Configuration can be built in code with the `with_*` methods or
//! loaded from TOML:
//!
//! ```rust
//! use rvoip_call_status_core::config::{DurationStyle, DurationUnit, ResolverConfig};
//!
//! let config = ResolverConfig::from_toml_str(r#"
//!     [duration]
//!     style = "short"
//!     units = ["minutes", "seconds"]
//! "#).unwrap();
//!
//! assert_eq!(config.duration.style, DurationStyle::Short);
//! assert_eq!(config.duration.units, vec![DurationUnit::Minutes, DurationUnit::Seconds]);
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{CallStatusError, Result};

/// How unit names are spelled in a formatted duration
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DurationStyle {
    /// "1h 2m 5s"
    Abbreviated,
    /// "1 hr 2 min 5 sec"
    Short,
    /// "1 hour 2 minutes 5 seconds"
    Full,
}

/// A unit a formatted duration may use
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DurationUnit {
    Hours,
    Minutes,
    Seconds,
}

impl DurationUnit {
    pub fn seconds(&self) -> u64 {
        match self {
            DurationUnit::Hours => 3600,
            DurationUnit::Minutes => 60,
            DurationUnit::Seconds => 1,
        }
    }
}

/// Duration formatting settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DurationFormatConfig {
    pub style: DurationStyle,
    /// Allowed units; the largest absorbs overflow, the smallest the remainder
    pub units: Vec<DurationUnit>,
}

impl Default for DurationFormatConfig {
    fn default() -> Self {
        Self {
            style: DurationStyle::Abbreviated,
            units: vec![DurationUnit::Hours, DurationUnit::Minutes, DurationUnit::Seconds],
        }
    }
}

/// Top-level resolver configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    pub duration: DurationFormatConfig,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            duration: DurationFormatConfig::default(),
        }
    }
}

impl ResolverConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_duration_style(mut self, style: DurationStyle) -> Self {
        self.duration.style = style;
        self
    }

    pub fn with_duration_units(mut self, units: Vec<DurationUnit>) -> Self {
        self.duration.units = units;
        self
    }

    /// Parse and validate a TOML document
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: ResolverConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            CallStatusError::config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<()> {
        if self.duration.units.is_empty() {
            return Err(CallStatusError::config("duration.units must name at least one unit"));
        }
        let mut seen = self.duration.units.clone();
        seen.sort();
        seen.dedup();
        if seen.len() != self.duration.units.len() {
            return Err(CallStatusError::config("duration.units contains duplicates"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ResolverConfig::default();
        assert_eq!(config.duration.style, DurationStyle::Abbreviated);
        assert_eq!(config.duration.units.len(), 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = ResolverConfig::from_toml_str("").unwrap();
        assert_eq!(config, ResolverConfig::default());
    }

    #[test]
    fn test_rejects_empty_units() {
        let err = ResolverConfig::from_toml_str("[duration]\nunits = []\n").unwrap_err();
        assert!(matches!(err, CallStatusError::Config { .. }));
    }

    #[test]
    fn test_rejects_duplicate_units() {
        let config = ResolverConfig::new()
            .with_duration_units(vec![DurationUnit::Seconds, DurationUnit::Seconds]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_unknown_style() {
        let err = ResolverConfig::from_toml_str("[duration]\nstyle = \"roman\"\n").unwrap_err();
        assert!(matches!(err, CallStatusError::Config { .. }));
    }
}
