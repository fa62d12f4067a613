//! Canvas configuration.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Tunables for interaction behavior.
///
/// Every field has a default, so a partial JSON object is a valid config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    /// Scale multiplier applied per wheel tick. Must be > 1.
    pub zoom_factor: f64,
    /// Smallest allowed viewport scale.
    pub min_scale: f64,
    /// Largest allowed viewport scale.
    pub max_scale: f64,
    /// Width and height of newly placed shapes, in world units.
    pub default_shape_size: f64,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            zoom_factor: 1.1,
            min_scale: 0.01,
            max_scale: 100.0,
            default_shape_size: 100.0,
        }
    }
}

impl CanvasConfig {
    /// Parse and validate a config from JSON.
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a config file.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded canvas config from {}", path.as_ref().display());
        Ok(config)
    }

    /// Check the invariants the viewport relies on.
    pub fn validate(&self) -> ConfigResult<()> {
        if !(self.zoom_factor.is_finite() && self.zoom_factor > 1.0) {
            return Err(invalid("zoom_factor", format!("{} is not > 1", self.zoom_factor)));
        }
        if !(self.min_scale.is_finite() && self.min_scale > 0.0 && self.min_scale <= 1.0) {
            return Err(invalid(
                "min_scale",
                format!("{} is not in (0, 1]", self.min_scale),
            ));
        }
        if !(self.max_scale.is_finite() && self.max_scale >= 1.0) {
            return Err(invalid("max_scale", format!("{} is not >= 1", self.max_scale)));
        }
        if !(self.default_shape_size.is_finite() && self.default_shape_size > 0.0) {
            return Err(invalid(
                "default_shape_size",
                format!("{} is not a positive size", self.default_shape_size),
            ));
        }
        Ok(())
    }

    /// Return `self` if it is valid, otherwise the defaults.
    pub fn validated_or_default(self) -> Self {
        match self.validate() {
            Ok(()) => self,
            Err(e) => {
                log::warn!("Ignoring canvas config ({}), using defaults", e);
                Self::default()
            }
        }
    }
}

fn invalid(field: &'static str, reason: String) -> ConfigError {
    ConfigError::Invalid { field, reason }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_is_valid() {
        assert!(CanvasConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = CanvasConfig::from_json(r#"{ "zoom_factor": 1.25 }"#).unwrap();
        assert!((config.zoom_factor - 1.25).abs() < f64::EPSILON);
        assert!((config.default_shape_size - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_rejects_zoom_factor_at_one() {
        let err = CanvasConfig::from_json(r#"{ "zoom_factor": 1.0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "zoom_factor", .. }));
    }

    #[test]
    fn test_rejects_non_positive_min_scale() {
        let err = CanvasConfig::from_json(r#"{ "min_scale": 0.0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "min_scale", .. }));
    }

    #[test]
    fn test_rejects_inverted_scale_range() {
        let config = CanvasConfig {
            min_scale: 0.5,
            max_scale: 0.25,
            ..CanvasConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_config_falls_back_to_defaults() {
        let config = CanvasConfig {
            zoom_factor: 0.5,
            ..CanvasConfig::default()
        };
        assert_eq!(config.validated_or_default(), CanvasConfig::default());

        let valid = CanvasConfig {
            zoom_factor: 1.5,
            ..CanvasConfig::default()
        };
        assert_eq!(valid.clone().validated_or_default(), valid);
    }

    #[test]
    fn test_rejects_bad_json() {
        let err = CanvasConfig::from_json("{ zoom_factor: ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "default_shape_size": 64.0, "max_scale": 8.0 }}"#).unwrap();

        let config = CanvasConfig::load(file.path()).unwrap();
        assert!((config.default_shape_size - 64.0).abs() < f64::EPSILON);
        assert!((config.max_scale - 8.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = CanvasConfig::load(dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
