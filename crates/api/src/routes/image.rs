//! Route definitions for the `/images` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::{annotation, image, thumbnail};
use crate::state::AppState;

/// Routes mounted at `/images`.
///
/// ```text
/// GET    /{id}                    -> get_by_id
/// DELETE /{id}                    -> delete
/// GET    /{id}/file               -> serve_file
/// GET    /{id}/thumbnail/{size}   -> thumbnail::get
/// GET    /{id}/annotations        -> list_by_image
/// POST   /{id}/annotations        -> create
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{id}", get(image::get_by_id).delete(image::delete))
        .route("/{id}/file", get(image::serve_file))
        .route("/{id}/thumbnail/{size}", get(thumbnail::get))
        .route(
            "/{id}/annotations",
            get(annotation::list_by_image).post(annotation::create),
        )
}
