pub mod agents;
pub mod deployments;
pub mod openapi;
pub mod releases;
pub mod settings;

use crate::dal::DAL;
use crate::error::Error;
use axum::http::StatusCode;
use axum::{Json, Router};

pub fn routes() -> Router<DAL> {
    Router::new()
        .merge(agents::routes())
        .merge(deployments::routes())
        .merge(releases::routes())
        .merge(settings::routes())
}

/// Maps a domain error to the standard `{"error": ...}` response body.
pub(crate) fn error_response(err: Error) -> (StatusCode, Json<serde_json::Value>) {
    (
        err.status_code(),
        Json(serde_json::json!({"error": err.to_string()})),
    )
}
