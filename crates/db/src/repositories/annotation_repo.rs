//! Repository for the `annotations` table.

use boxlab_core::types::DbId;
use sqlx::PgPool;

use crate::models::annotation::{Annotation, CreateAnnotation, UpdateAnnotation};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, image_id, class_id, x_center, y_center, width, height, created_at";

/// Provides CRUD operations for annotations.
pub struct AnnotationRepo;

impl AnnotationRepo {
    /// Insert a new annotation, returning the created row.
    pub async fn create(
        pool: &PgPool,
        image_id: DbId,
        input: &CreateAnnotation,
    ) -> Result<Annotation, sqlx::Error> {
        let query = format!(
            "INSERT INTO annotations (image_id, class_id, x_center, y_center, width, height)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Annotation>(&query)
            .bind(image_id)
            .bind(input.class_id)
            .bind(input.x_center)
            .bind(input.y_center)
            .bind(input.width)
            .bind(input.height)
            .fetch_one(pool)
            .await
    }

    /// Find an annotation by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Annotation>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM annotations WHERE id = $1");
        sqlx::query_as::<_, Annotation>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List an image's annotations in creation order.
    pub async fn list_by_image(
        pool: &PgPool,
        image_id: DbId,
    ) -> Result<Vec<Annotation>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM annotations WHERE image_id = $1 ORDER BY id ASC");
        sqlx::query_as::<_, Annotation>(&query)
            .bind(image_id)
            .fetch_all(pool)
            .await
    }

    /// Replace all fields of an annotation.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateAnnotation,
    ) -> Result<Option<Annotation>, sqlx::Error> {
        let query = format!(
            "UPDATE annotations SET
                class_id = $2, x_center = $3, y_center = $4, width = $5, height = $6
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Annotation>(&query)
            .bind(id)
            .bind(input.class_id)
            .bind(input.x_center)
            .bind(input.y_center)
            .bind(input.width)
            .bind(input.height)
            .fetch_optional(pool)
            .await
    }

    /// Delete an annotation by ID. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM annotations WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete all annotations for an image. Returns the number removed.
    pub async fn delete_by_image(pool: &PgPool, image_id: DbId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM annotations WHERE image_id = $1")
            .bind(image_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
