//! On-disk layout
//!
//! ```text
//! <base>/config.json
//! <base>/audit.log
//! <base>/data/{accounts,credit_cards,categories,transactions}.json
//! ```
//!
//! `<base>` is `PARCELA_DATA_DIR` when set. Otherwise it is
//! `$XDG_CONFIG_HOME/parcela` (falling back to `~/.config/parcela`) on Unix
//! and `%APPDATA%\parcela` on Windows.

use std::path::{Path, PathBuf};

use crate::error::ParcelaError;

const APP_DIR: &str = "parcela";
const DATA_DIR: &str = "data";

#[derive(Debug, Clone)]
pub struct ParcelaPaths {
    base_dir: PathBuf,
}

impl ParcelaPaths {
    /// Resolve the base directory from the environment
    pub fn new() -> Result<Self, ParcelaError> {
        let base_dir = match std::env::var_os("PARCELA_DATA_DIR") {
            Some(dir) if !dir.is_empty() => PathBuf::from(dir),
            _ => platform_base_dir()?,
        };
        Ok(Self { base_dir })
    }

    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join(DATA_DIR)
    }

    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Append-only JSONL history of every mutation
    pub fn audit_log(&self) -> PathBuf {
        self.base_dir.join("audit.log")
    }

    pub fn accounts_file(&self) -> PathBuf {
        self.data_file("accounts")
    }

    pub fn credit_cards_file(&self) -> PathBuf {
        self.data_file("credit_cards")
    }

    pub fn categories_file(&self) -> PathBuf {
        self.data_file("categories")
    }

    pub fn transactions_file(&self) -> PathBuf {
        self.data_file("transactions")
    }

    fn data_file(&self, stem: &str) -> PathBuf {
        self.data_dir().join(format!("{stem}.json"))
    }

    /// Create the base and data directories if they are missing
    pub fn ensure_directories(&self) -> Result<(), ParcelaError> {
        let data_dir = self.data_dir();
        std::fs::create_dir_all(&data_dir).map_err(|e| {
            ParcelaError::Io(format!("cannot create {}: {}", data_dir.display(), e))
        })
    }

    /// `parcela init` has run once the settings file exists
    pub fn is_initialized(&self) -> bool {
        self.settings_file().is_file()
    }
}

#[cfg(not(windows))]
fn platform_base_dir() -> Result<PathBuf, ParcelaError> {
    if let Some(config_home) = std::env::var_os("XDG_CONFIG_HOME").filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(config_home).join(APP_DIR));
    }
    std::env::var_os("HOME")
        .map(|home| PathBuf::from(home).join(".config").join(APP_DIR))
        .ok_or_else(|| ParcelaError::Config("HOME is not set; use PARCELA_DATA_DIR".into()))
}

#[cfg(windows)]
fn platform_base_dir() -> Result<PathBuf, ParcelaError> {
    std::env::var_os("APPDATA")
        .map(|appdata| PathBuf::from(appdata).join(APP_DIR))
        .ok_or_else(|| ParcelaError::Config("APPDATA is not set; use PARCELA_DATA_DIR".into()))
}
