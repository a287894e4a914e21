//! Image entity model and DTOs.

use boxlab_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// An image row from the `images` table.
///
/// `filename` is the opaque on-disk name; `original_name` is the
/// client-supplied name preserved for display and export.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Image {
    pub id: DbId,
    pub project_id: DbId,
    pub filename: String,
    pub original_name: String,
    pub width: i32,
    pub height: i32,
    pub uploaded_at: Timestamp,
}

/// DTO for recording a stored image file.
#[derive(Debug, Clone)]
pub struct CreateImage {
    pub project_id: DbId,
    pub filename: String,
    pub original_name: String,
    pub width: i32,
    pub height: i32,
}
