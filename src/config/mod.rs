//! Configuration module for Parcela
//!
//! This module provides configuration management including:
//! - XDG-compliant path resolution
//! - User settings persistence

pub mod paths;
pub mod settings;

pub use paths::ParcelaPaths;
pub use settings::Settings;
