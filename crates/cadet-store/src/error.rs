use cadet_shared::{Id, ValidationError};
use thiserror::Error;

/// Errors produced by the store layer.
#[derive(Error, Debug)]
pub enum StoreError {
    /// No record with this id exists.
    #[error("{entity} not found")]
    NotFound { entity: &'static str, id: Id },

    #[error("Username already exists")]
    DuplicateUsername,

    #[error("Email already exists")]
    DuplicateEmail,

    #[error("Tail number already exists")]
    DuplicateTailNumber,

    /// A foreign key points at a missing record or at a user with the wrong role.
    #[error("Invalid reference: {field} {id}")]
    InvalidReference { field: &'static str, id: Id },

    /// Strict mode refused a status change.
    #[error("Invalid status transition from {from} to {to}")]
    InvalidTransition { from: &'static str, to: &'static str },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Password hashing failed: {0}")]
    PasswordHash(String),
}

impl StoreError {
    pub(crate) fn not_found(entity: &'static str, id: Id) -> Self {
        Self::NotFound { entity, id }
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, StoreError>;
