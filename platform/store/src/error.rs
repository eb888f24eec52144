use thiserror::Error;

use crate::ValidationErrors;

/// Message shown when a backend failure carries no usable text.
pub const FALLBACK_MESSAGE: &str = "An unexpected error occurred";

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,
    #[error("{0}")]
    InvalidInput(String),
    /// A stored row violates a closed enumeration or a reference rule.
    #[error("data integrity error: {0}")]
    Integrity(String),
    #[error("{0}")]
    Backend(String),
}

impl StoreError {
    pub fn backend(err: impl std::fmt::Display) -> Self {
        Self::Backend(err.to_string())
    }

    pub fn integrity(message: impl Into<String>) -> Self {
        Self::Integrity(message.into())
    }

    /// Human-readable text for inline error states.
    pub fn message(&self) -> String {
        let text = self.to_string();
        if text.trim().is_empty() {
            FALLBACK_MESSAGE.to_string()
        } else {
            text
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }
}

impl From<ValidationErrors> for StoreError {
    fn from(value: ValidationErrors) -> Self {
        Self::InvalidInput(value.to_string())
    }
}
