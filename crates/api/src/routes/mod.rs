pub mod annotation;
pub mod health;
pub mod image;
pub mod project;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /projects                          list, create
/// /projects/{id}                     get, delete
/// /projects/{id}/classes             replace class list (PUT)
/// /projects/{id}/images              list, upload (multipart)
/// /projects/{id}/export              download YOLO dataset zip (GET)
/// /projects/{id}/import              upload YOLO dataset zip (POST, multipart)
///
/// /images/{id}                       get, delete
/// /images/{id}/file                  stored pixel file (GET)
/// /images/{id}/thumbnail/{size}      cached thumbnail (GET)
/// /images/{id}/annotations           list, create
///
/// /annotations/{id}                  get, update, delete
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/projects", project::router())
        .nest("/images", image::router())
        .nest("/annotations", annotation::router())
}
