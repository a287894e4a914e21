//! Handlers for the `/annotations` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use boxlab_core::annotation::validate_normalized_box;
use boxlab_core::error::CoreError;
use boxlab_core::geometry::NormBox;
use boxlab_core::types::DbId;
use boxlab_db::models::annotation::{Annotation, CreateAnnotation, UpdateAnnotation};
use boxlab_db::repositories::AnnotationRepo;

use crate::error::{AppError, AppResult};
use crate::handlers::image::find_image;
use crate::state::AppState;

/// POST /api/v1/images/{image_id}/annotations
pub async fn create(
    State(state): State<AppState>,
    Path(image_id): Path<DbId>,
    Json(input): Json<CreateAnnotation>,
) -> AppResult<(StatusCode, Json<Annotation>)> {
    find_image(&state, image_id).await?;
    validate_normalized_box(
        input.class_id,
        &NormBox {
            x_center: input.x_center,
            y_center: input.y_center,
            width: input.width,
            height: input.height,
        },
    )?;

    let annotation = AnnotationRepo::create(&state.pool, image_id, &input).await?;
    Ok((StatusCode::CREATED, Json(annotation)))
}

/// GET /api/v1/images/{image_id}/annotations
pub async fn list_by_image(
    State(state): State<AppState>,
    Path(image_id): Path<DbId>,
) -> AppResult<Json<Vec<Annotation>>> {
    find_image(&state, image_id).await?;
    let annotations = AnnotationRepo::list_by_image(&state.pool, image_id).await?;
    Ok(Json(annotations))
}

/// GET /api/v1/annotations/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Annotation>> {
    let annotation = AnnotationRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Annotation",
            id,
        }))?;
    Ok(Json(annotation))
}

/// PUT /api/v1/annotations/{id}
///
/// Full replacement of all fields, re-validated like a create.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateAnnotation>,
) -> AppResult<Json<Annotation>> {
    validate_normalized_box(
        input.class_id,
        &NormBox {
            x_center: input.x_center,
            y_center: input.y_center,
            width: input.width,
            height: input.height,
        },
    )?;

    let annotation = AnnotationRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Annotation",
            id,
        }))?;
    Ok(Json(annotation))
}

/// DELETE /api/v1/annotations/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    let deleted = AnnotationRepo::delete(&state.pool, id).await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Annotation",
            id,
        }))
    }
}
