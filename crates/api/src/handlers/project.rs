//! Handlers for the `/projects` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use boxlab_core::classes::validate_class_names;
use boxlab_core::error::CoreError;
use boxlab_core::storage::project_dir;
use boxlab_core::types::DbId;
use boxlab_db::models::project::{CreateProject, Project};
use boxlab_db::repositories::ProjectRepo;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// POST /api/v1/projects
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateProject>,
) -> AppResult<(StatusCode, Json<Project>)> {
    if input.name.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Project name must not be empty".to_string(),
        )));
    }
    validate_class_names(&input.classes)?;

    let project = ProjectRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(project)))
}

/// GET /api/v1/projects
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<Project>>> {
    let projects = ProjectRepo::list(&state.pool).await?;
    Ok(Json(projects))
}

/// GET /api/v1/projects/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Project>> {
    let project = ProjectRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }))?;
    Ok(Json(project))
}

/// Body for the class list replacement endpoint.
#[derive(Debug, Deserialize)]
pub struct UpdateClasses {
    pub classes: Vec<String>,
}

/// PUT /api/v1/projects/{id}/classes
///
/// Replaces the class list wholesale; ids and colors are re-derived from
/// the new positions. Annotations referencing old positions keep their
/// stored `class_id` unchanged.
pub async fn update_classes(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateClasses>,
) -> AppResult<Json<Project>> {
    validate_class_names(&input.classes)?;

    let project = ProjectRepo::update_classes(&state.pool, id, &input.classes)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }))?;
    Ok(Json(project))
}

/// DELETE /api/v1/projects/{id}
///
/// Images and annotations cascade in the database; the project's upload
/// directory is removed best-effort.
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    let deleted = ProjectRepo::delete(&state.pool, id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }));
    }

    let dir = project_dir(&state.config.upload_dir, id);
    if let Err(e) = tokio::fs::remove_dir_all(&dir).await {
        if e.kind() != std::io::ErrorKind::NotFound {
            tracing::warn!(error = %e, dir = %dir.display(), "Failed to remove project upload directory");
        }
    }

    Ok(StatusCode::NO_CONTENT)
}
