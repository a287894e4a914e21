//! Domain error type shared across crates.

use crate::types::DbId;

/// Domain-level error taxonomy.
///
/// The API layer maps each variant to an HTTP status: `NotFound` -> 404,
/// `Validation` -> 400, `Conflict` -> 409, `Internal` -> 500 (sanitized).
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// A referenced entity does not exist.
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: DbId },

    /// Malformed or out-of-range input, rejected before any mutation.
    #[error("{0}")]
    Validation(String),

    /// A uniqueness or state conflict (e.g. duplicate project name).
    #[error("{0}")]
    Conflict(String),

    /// An unexpected failure (filesystem, archive, decode). Logged
    /// server-side; callers see a generic message.
    #[error("{0}")]
    Internal(String),
}
