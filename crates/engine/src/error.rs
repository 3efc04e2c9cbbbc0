//! The module contains the errors the engine can return.
//!
//! Absence of data is never an error: a year without budget rows yields an
//! empty result. Malformed ledger rows are skipped where they are read.
//! What remains are validation failures on writes and storage failures.
//!
//! - [`InvalidMonth`] returned when a month is outside `1..=12`.
//! - [`KeyNotFound`] returned when a row to update does not exist.
//! - [`Database`] returned when the storage layer fails; a failed batch
//!   leaves no partial state behind.
//!
//!  [`InvalidMonth`]: EngineError::InvalidMonth
//!  [`KeyNotFound`]: EngineError::KeyNotFound
//!  [`Database`]: EngineError::Database
use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Invalid month: {0}")]
    InvalidMonth(u32),
    #[error("Invalid status: {0}")]
    InvalidStatus(String),
    #[error("Invalid transaction kind: {0}")]
    InvalidKind(String),
    #[error("Invalid comparison mode: {0}")]
    InvalidMode(String),
    #[error("\"{0}\" key not found!")]
    KeyNotFound(String),
    #[error("\"{0}\" already present!")]
    ExistingKey(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::InvalidAmount(a), Self::InvalidAmount(b)) => a == b,
            (Self::InvalidMonth(a), Self::InvalidMonth(b)) => a == b,
            (Self::InvalidStatus(a), Self::InvalidStatus(b)) => a == b,
            (Self::InvalidKind(a), Self::InvalidKind(b)) => a == b,
            (Self::InvalidMode(a), Self::InvalidMode(b)) => a == b,
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::ExistingKey(a), Self::ExistingKey(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
