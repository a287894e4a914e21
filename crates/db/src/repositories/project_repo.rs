//! Repository for the `projects` table.

use boxlab_core::classes::build_class_definitions;
use boxlab_core::types::DbId;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::project::{CreateProject, Project};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, class_definitions, created_at";

/// Provides CRUD operations for projects.
pub struct ProjectRepo;

impl ProjectRepo {
    /// Insert a new project with its derived class list, returning the
    /// created row. A duplicate name violates `uq_projects_name`.
    pub async fn create(pool: &PgPool, input: &CreateProject) -> Result<Project, sqlx::Error> {
        let definitions = build_class_definitions(&input.classes);
        let query = format!(
            "INSERT INTO projects (name, class_definitions)
             VALUES ($1, $2)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(&input.name)
            .bind(Json(definitions))
            .fetch_one(pool)
            .await
    }

    /// Find a project by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE id = $1");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all projects ordered by most recently created first.
    pub async fn list(pool: &PgPool) -> Result<Vec<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects ORDER BY created_at DESC");
        sqlx::query_as::<_, Project>(&query).fetch_all(pool).await
    }

    /// Replace a project's class list wholesale with definitions derived
    /// from the given names. Existing annotations are not reconciled.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update_classes(
        pool: &PgPool,
        id: DbId,
        class_names: &[String],
    ) -> Result<Option<Project>, sqlx::Error> {
        let definitions = build_class_definitions(class_names);
        let query = format!(
            "UPDATE projects SET class_definitions = $2
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(Json(definitions))
            .fetch_optional(pool)
            .await
    }

    /// Delete a project by ID. Images and annotations cascade.
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
