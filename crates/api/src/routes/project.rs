//! Route definitions for the `/projects` resource.
//!
//! Also mounts project-scoped image upload and the dataset
//! export/import endpoints.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::{dataset, image, project};
use crate::state::AppState;

/// Multipart cap for image uploads and dataset archives. Per-file image
/// size is enforced separately in the upload handler.
const MULTIPART_BODY_LIMIT: usize = 256 * 1024 * 1024;

/// Routes mounted at `/projects`.
///
/// ```text
/// GET    /                -> list
/// POST   /                -> create
/// GET    /{id}            -> get_by_id
/// DELETE /{id}            -> delete
/// PUT    /{id}/classes    -> update_classes
///
/// GET    /{id}/images     -> list_by_project
/// POST   /{id}/images     -> upload (multipart)
/// GET    /{id}/export     -> export (zip download)
/// POST   /{id}/import     -> import (multipart zip)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(project::list).post(project::create))
        .route("/{id}", get(project::get_by_id).delete(project::delete))
        .route("/{id}/classes", put(project::update_classes))
        .route(
            "/{id}/images",
            get(image::list_by_project)
                .post(image::upload)
                .route_layer(DefaultBodyLimit::max(MULTIPART_BODY_LIMIT)),
        )
        .route("/{id}/export", get(dataset::export))
        .route(
            "/{id}/import",
            post(dataset::import).route_layer(DefaultBodyLimit::max(MULTIPART_BODY_LIMIT)),
        )
}
