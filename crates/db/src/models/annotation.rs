//! Annotation entity model and DTOs.

use boxlab_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// An annotation row from the `annotations` table.
///
/// The box is stored in normalized image-relative coordinates, all four
/// fields in `[0.0, 1.0]`. `class_id` is a position into the owning
/// project's class list at the time of writing and is not re-checked
/// against later class edits.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Annotation {
    pub id: DbId,
    pub image_id: DbId,
    pub class_id: DbId,
    pub x_center: f64,
    pub y_center: f64,
    pub width: f64,
    pub height: f64,
    pub created_at: Timestamp,
}

/// DTO for creating a new annotation.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateAnnotation {
    pub class_id: DbId,
    pub x_center: f64,
    pub y_center: f64,
    pub width: f64,
    pub height: f64,
}

/// DTO for updating an annotation. A full replacement of all fields.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateAnnotation {
    pub class_id: DbId,
    pub x_center: f64,
    pub y_center: f64,
    pub width: f64,
    pub height: f64,
}
