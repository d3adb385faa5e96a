//! Error type shared by storage, services and the CLI
//!
//! Services return `ParcelaResult`; `main` wraps it in `anyhow` for printing.
//! `status_code` maps each kind onto an HTTP status so the same core can sit
//! behind a web handler.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ParcelaError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("JSON error: {0}")]
    Json(String),

    /// Bad input; `field` names the offending parameter
    #[error("Validation error on '{field}': {message}")]
    Validation { field: String, message: String },

    /// Also returned for records that exist but belong to another owner
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    #[error("{entity_type} already exists: {identifier}")]
    Duplicate {
        entity_type: &'static str,
        identifier: String,
    },

    /// The request is well formed but the stored data forbids it
    #[error("Conflict: {0}")]
    Conflict(String),

    /// A write failed and the unit of work was rolled back
    #[error("Storage error: {0}")]
    Storage(String),
}

impl ParcelaError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    fn missing(entity_type: &'static str, identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            identifier: identifier.into(),
        }
    }

    pub fn account_not_found(identifier: impl Into<String>) -> Self {
        Self::missing("Account", identifier)
    }

    pub fn credit_card_not_found(identifier: impl Into<String>) -> Self {
        Self::missing("Credit card", identifier)
    }

    pub fn category_not_found(identifier: impl Into<String>) -> Self {
        Self::missing("Category", identifier)
    }

    pub fn transaction_not_found(identifier: impl Into<String>) -> Self {
        Self::missing("Transaction", identifier)
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict(_))
    }

    pub fn status_code(&self) -> u16 {
        match self {
            Self::NotFound { .. } => 404,
            Self::Validation { .. } | Self::Duplicate { .. } | Self::Conflict(_) => 400,
            Self::Config(_) | Self::Io(_) | Self::Json(_) | Self::Storage(_) => 500,
        }
    }
}

impl From<std::io::Error> for ParcelaError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for ParcelaError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

pub type ParcelaResult<T> = Result<T, ParcelaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_message_names_field() {
        let err = ParcelaError::validation("installments", "Maximum of 24 installments");
        assert_eq!(
            err.to_string(),
            "Validation error on 'installments': Maximum of 24 installments"
        );
        assert!(err.is_validation());
        assert_eq!(err.status_code(), 400);
    }

    #[test]
    fn test_not_found_maps_to_404() {
        let err = ParcelaError::credit_card_not_found("Nubank");
        assert_eq!(err.to_string(), "Credit card not found: Nubank");
        assert!(err.is_not_found());
        assert_eq!(err.status_code(), 404);
    }

    #[test]
    fn test_conflict_and_storage_codes() {
        let conflict = ParcelaError::Conflict("child row".into());
        assert!(conflict.is_conflict());
        assert_eq!(conflict.status_code(), 400);
        assert_eq!(ParcelaError::Storage("disk full".into()).status_code(), 500);
    }

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: ParcelaError = io.into();
        assert!(matches!(err, ParcelaError::Io(_)));
        assert_eq!(err.status_code(), 500);
    }
}
