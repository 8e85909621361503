//! Configuration for the menu ordering engine

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::{DomainError, DomainResult};

/// Numeric policy of the ordering engine
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderingConfig {
    /// First value assigned by a refresh; siblings get base, base + 1, ...
    pub refresh_base: i64,
    /// Sentinel below the first sibling when moving before it
    pub lower_bound: f64,
    /// Distance above the last sibling when moving after it
    pub append_gap: f64,
    /// A move leaving a gap narrower than this logs a refresh hint
    pub refresh_hint_gap: f64,
}

impl Default for OrderingConfig {
    fn default() -> Self {
        Self {
            refresh_base: 1,
            lower_bound: 0.0,
            append_gap: 1.0,
            refresh_hint_gap: 1e-9,
        }
    }
}

/// Largest magnitude for `refresh_base`; integers up to 2^53 are exact in f64
pub const MAX_REFRESH_BASE: i64 = 1 << 53;

impl OrderingConfig {
    pub fn validate(&self) -> DomainResult<()> {
        if self.refresh_base.unsigned_abs() > MAX_REFRESH_BASE.unsigned_abs() {
            return Err(DomainError::InvalidInput(format!(
                "refresh_base must be within +/-{}, got {}",
                MAX_REFRESH_BASE, self.refresh_base
            )));
        }
        if !self.lower_bound.is_finite() {
            return Err(DomainError::InvalidInput(
                "lower_bound must be finite".to_string(),
            ));
        }
        if !self.append_gap.is_finite() || self.append_gap <= 0.0 {
            return Err(DomainError::InvalidInput(format!(
                "append_gap must be a positive number, got {}",
                self.append_gap
            )));
        }
        if !self.refresh_hint_gap.is_finite() || self.refresh_hint_gap < 0.0 {
            return Err(DomainError::InvalidInput(format!(
                "refresh_hint_gap must be a non-negative number, got {}",
                self.refresh_hint_gap
            )));
        }
        Ok(())
    }
}

/// Engine configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// SQLite database file (":memory:" for a throwaway database)
    pub database_path: PathBuf,
    pub ordering: OrderingConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from("fusion_menus.db"),
            ordering: OrderingConfig::default(),
        }
    }
}

impl EngineConfig {
    /// In-memory database with default ordering policy
    pub fn in_memory() -> Self {
        Self {
            database_path: PathBuf::from(":memory:"),
            ..Self::default()
        }
    }

    pub fn from_json_str(json: &str) -> DomainResult<Self> {
        let config: EngineConfig = serde_json::from_str(json)
            .map_err(|e| DomainError::InvalidInput(format!("Invalid config: {}", e)))?;
        config.ordering.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> DomainResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            DomainError::InvalidInput(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_json_str(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = OrderingConfig::default();
        assert_eq!(config.refresh_base, 1);
        assert_eq!(config.lower_bound, 0.0);
        assert_eq!(config.append_gap, 1.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = EngineConfig::from_json_str(r#"{"ordering": {"append_gap": 10.0}}"#).unwrap();
        assert_eq!(config.ordering.append_gap, 10.0);
        assert_eq!(config.ordering.refresh_base, 1);
        assert_eq!(config.database_path, PathBuf::from("fusion_menus.db"));
    }

    #[test]
    fn test_rejects_non_positive_gap() {
        let err = EngineConfig::from_json_str(r#"{"ordering": {"append_gap": 0.0}}"#).unwrap_err();
        assert!(matches!(err, DomainError::InvalidInput(_)));
    }

    #[test]
    fn test_rejects_huge_refresh_base() {
        let json = format!(r#"{{"ordering": {{"refresh_base": {}}}}}"#, i64::MAX);
        let err = EngineConfig::from_json_str(&json).unwrap_err();
        assert!(matches!(err, DomainError::InvalidInput(_)));

        let config = OrderingConfig {
            refresh_base: -MAX_REFRESH_BASE,
            ..OrderingConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("menus.json");
        std::fs::write(&path, r#"{"database_path": ":memory:"}"#).unwrap();

        let config = EngineConfig::load(&path).unwrap();
        assert_eq!(config, EngineConfig::in_memory());
    }
}
