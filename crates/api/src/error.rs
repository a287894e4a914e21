//! Error surface for the HTTP layer.
//!
//! Every handler returns [`AppResult`]; failures render as a JSON body of
//! the form `{"error": <message>, "code": <machine code>}`. Domain errors
//! from `boxlab_core` keep their message, database errors are classified
//! (missing row, duplicate project name, everything else), and unexpected
//! failures reach the client only as a sanitized 500.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use boxlab_core::error::CoreError;
use serde::Serialize;

/// Failures a handler can surface.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Domain failure: validation, lookup miss, or conflict from core logic.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A query or pool error from sqlx, classified at response time.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The request itself was unusable: missing multipart field, no valid
    /// image files, malformed archive.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Filesystem, decoding, or task failures the client cannot act on.
    #[error("Internal error: {0}")]
    InternalError(String),
}

pub type AppResult<T> = Result<T, AppError>;

/// Wire shape of every error response.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
    code: &'static str,
}

impl AppError {
    fn to_parts(&self) -> (StatusCode, ErrorBody) {
        let (status, code, error) = match self {
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} with id {id} not found"),
                ),
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    internal_parts()
                }
            },
            AppError::Database(err) => classify(err),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                internal_parts()
            }
        };
        (status, ErrorBody { error, code })
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = self.to_parts();
        (status, axum::Json(body)).into_response()
    }
}

/// Map a sqlx error onto the response taxonomy.
///
/// A `RowNotFound` from a repository lookup is a 404. A Postgres unique
/// violation (code 23505) on one of the schema's `uq_` constraints is a
/// 409, which is how a duplicate project name surfaces. Anything else is
/// logged server-side and returned as a sanitized 500.
fn classify(err: &sqlx::Error) -> (StatusCode, &'static str, String) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        ),
        sqlx::Error::Database(db_err) => {
            if db_err.code().as_deref() == Some("23505") {
                let constraint = db_err.constraint().unwrap_or("unknown");
                if constraint.starts_with("uq_") {
                    return (
                        StatusCode::CONFLICT,
                        "CONFLICT",
                        format!("Duplicate value violates unique constraint: {constraint}"),
                    );
                }
            }
            tracing::error!(error = %db_err, "Database error");
            internal_parts()
        }
        other => {
            tracing::error!(error = %other, "Database error");
            internal_parts()
        }
    }
}

fn internal_parts() -> (StatusCode, &'static str, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "An internal error occurred".to_string(),
    )
}
