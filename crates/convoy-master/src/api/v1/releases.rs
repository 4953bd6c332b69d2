/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

//! Handles API routes and logic for the release catalog.
//!
//! ## Endpoints
//!
//! - `POST /api/v1/releases` - Add a release from a repository URL
//! - `GET /api/v1/releases` - List catalog entries
//! - `GET /api/v1/releases/:id` - Get release by ID
//! - `DELETE /api/v1/releases/:id` - Remove a catalog entry

use crate::api::v1::error_response;
use crate::dal::DAL;
use crate::error::Error;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use convoy_models::models::releases::{NewRelease, Release};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};
use utoipa::ToSchema;

/// Creates and returns a router for release-related endpoints.
pub fn routes() -> Router<DAL> {
    Router::new()
        .route("/releases", get(list_releases).post(create_release))
        .route("/releases/:id", get(get_release).delete(delete_release))
}

/// Request body for adding a release to the catalog.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreateReleaseRequest {
    /// Repository URL, e.g. `https://github.com/acme/widget-service`.
    pub source_url: String,
}

/// Adds a release to the catalog from its repository URL.
#[utoipa::path(
    post,
    path = "/api/v1/releases",
    tag = "releases",
    request_body = CreateReleaseRequest,
    responses(
        (status = 200, description = "Release created", body = Release),
        (status = 400, description = "Source URL could not be parsed"),
        (status = 409, description = "Release already exists"),
    )
)]
pub(crate) async fn create_release(
    State(dal): State<DAL>,
    Json(payload): Json<CreateReleaseRequest>,
) -> Result<Json<Release>, (StatusCode, Json<serde_json::Value>)> {
    info!("Adding release from source URL '{}'", payload.source_url);

    let new_release = NewRelease::from_source_url(&payload.source_url)
        .map_err(|e| error_response(Error::InvalidArgument(e)))?;

    match dal.releases().create(&new_release) {
        Ok(release) => {
            info!("Created release '{}'", release.id);
            Ok(Json(release))
        }
        Err(e @ Error::Conflict(_)) => {
            warn!("Duplicate release rejected: {}", e);
            Err(error_response(e))
        }
        Err(e) => {
            error!("Failed to create release: {:?}", e);
            Err(error_response(e))
        }
    }
}

/// Lists all catalog entries.
#[utoipa::path(
    get,
    path = "/api/v1/releases",
    tag = "releases",
    responses(
        (status = 200, description = "List of releases", body = Vec<Release>),
    )
)]
pub(crate) async fn list_releases(
    State(dal): State<DAL>,
) -> Result<Json<Vec<Release>>, (StatusCode, Json<serde_json::Value>)> {
    match dal.releases().list() {
        Ok(releases) => Ok(Json(releases)),
        Err(e) => {
            error!("Failed to list releases: {:?}", e);
            Err(error_response(e))
        }
    }
}

/// Gets a release by ID.
#[utoipa::path(
    get,
    path = "/api/v1/releases/{id}",
    tag = "releases",
    params(("id" = String, Path, description = "Release ID")),
    responses(
        (status = 200, description = "Release found", body = Release),
        (status = 404, description = "Release not found"),
    )
)]
pub(crate) async fn get_release(
    State(dal): State<DAL>,
    Path(id): Path<String>,
) -> Result<Json<Release>, (StatusCode, Json<serde_json::Value>)> {
    match dal.releases().get(&id) {
        Ok(Some(release)) => Ok(Json(release)),
        Ok(None) => Err(error_response(Error::NotFound("release", id))),
        Err(e) => {
            error!("Failed to fetch release {}: {:?}", id, e);
            Err(error_response(e))
        }
    }
}

/// Removes a release from the catalog.
///
/// Queued and historical deployments keep their denormalized tags.
#[utoipa::path(
    delete,
    path = "/api/v1/releases/{id}",
    tag = "releases",
    params(("id" = String, Path, description = "Release ID")),
    responses(
        (status = 204, description = "Release deleted"),
        (status = 404, description = "Release not found"),
    )
)]
pub(crate) async fn delete_release(
    State(dal): State<DAL>,
    Path(id): Path<String>,
) -> Result<StatusCode, (StatusCode, Json<serde_json::Value>)> {
    match dal.releases().delete(&id) {
        Ok(()) => {
            info!("Deleted release '{}'", id);
            Ok(StatusCode::NO_CONTENT)
        }
        Err(e) => Err(error_response(e)),
    }
}
