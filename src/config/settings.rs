//! `config.json`: currency symbol, default owner and report horizons
//!
//! Every field has a default, so older or hand-edited files with missing keys
//! still load.

use serde::{Deserialize, Serialize};

use super::paths::ParcelaPaths;
use crate::error::ParcelaError;
use crate::models::OwnerId;

const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub schema_version: u32,
    pub currency_symbol: String,
    /// strftime pattern for dates in listings
    pub date_format: String,
    /// Used when neither `--owner` nor `PARCELA_OWNER` is given
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_owner: Option<OwnerId>,
    pub projection_months: u32,
    /// Rows in the dashboard's recent-activity list
    pub recent_transactions: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            currency_symbol: "R$".to_string(),
            date_format: "%Y-%m-%d".to_string(),
            default_owner: None,
            projection_months: 12,
            recent_transactions: 10,
        }
    }
}

impl Settings {
    /// Read `config.json`, or fall back to defaults without writing anything
    pub fn load_or_create(paths: &ParcelaPaths) -> Result<Self, ParcelaError> {
        let path = paths.settings_file();
        if !path.is_file() {
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(&path)
            .map_err(|e| ParcelaError::Io(format!("cannot read {}: {}", path.display(), e)))?;
        serde_json::from_str(&raw)
            .map_err(|e| ParcelaError::Config(format!("{} is not valid settings: {}", path.display(), e)))
    }

    pub fn save(&self, paths: &ParcelaPaths) -> Result<(), ParcelaError> {
        paths.ensure_directories()?;
        let path = paths.settings_file();
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, json)
            .map_err(|e| ParcelaError::Io(format!("cannot write {}: {}", path.display(), e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.currency_symbol, "R$");
        assert_eq!(settings.projection_months, 12);
        assert_eq!(settings.recent_transactions, 10);
        assert!(settings.default_owner.is_none());
    }

    #[test]
    fn test_missing_file_is_not_created() {
        let temp_dir = TempDir::new().unwrap();
        let paths = ParcelaPaths::with_base_dir(temp_dir.path().to_path_buf());

        Settings::load_or_create(&paths).unwrap();
        assert!(!paths.settings_file().exists());
    }

    #[test]
    fn test_saved_owner_is_reloaded() {
        let temp_dir = TempDir::new().unwrap();
        let paths = ParcelaPaths::with_base_dir(temp_dir.path().to_path_buf());

        let owner = OwnerId::new();
        Settings {
            default_owner: Some(owner),
            projection_months: 6,
            ..Settings::default()
        }
        .save(&paths)
        .unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded.default_owner, Some(owner));
        assert_eq!(loaded.projection_months, 6);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"currency_symbol": "$"}"#).unwrap();
        assert_eq!(settings.currency_symbol, "$");
        assert_eq!(settings.date_format, "%Y-%m-%d");
        assert_eq!(settings.recent_transactions, 10);
    }

    #[test]
    fn test_corrupt_file_is_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let paths = ParcelaPaths::with_base_dir(temp_dir.path().to_path_buf());
        std::fs::write(paths.settings_file(), "{ nope").unwrap();

        let err = Settings::load_or_create(&paths).unwrap_err();
        assert!(matches!(err, ParcelaError::Config(_)));
    }
}
