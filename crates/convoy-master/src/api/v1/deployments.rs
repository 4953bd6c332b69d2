/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

//! Handles API routes and logic for deployments.
//!
//! ## Endpoints
//!
//! ### Operator Operations
//! - `POST /api/v1/deployments` - Queue a deployment for an agent
//! - `GET /api/v1/deployments` - List all deployments
//! - `GET /api/v1/deployments/history` - List recent deployments (capped)
//! - `GET /api/v1/deployments/:id` - Get deployment by ID
//!
//! ### Agent Operations
//! - `GET /api/v1/deployments/pending/:agent_id` - Claim the next pending deployment
//! - `POST /api/v1/deployments/:id/complete` - Report a terminal outcome

use crate::api::v1::error_response;
use crate::dal::DAL;
use crate::error::Error;
use crate::metrics::DEPLOYMENTS_COMPLETED_TOTAL;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use convoy_models::models::deployments::{Deployment, DeploymentStatus};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};
use utoipa::ToSchema;
use uuid::Uuid;

const HISTORY_DEFAULT_LIMIT: i64 = 50;

/// Creates and returns a router for deployment-related endpoints.
pub fn routes() -> Router<DAL> {
    Router::new()
        .route("/deployments", get(list_deployments).post(create_deployment))
        .route("/deployments/history", get(deployment_history))
        .route("/deployments/pending/:agent_id", get(next_pending))
        .route("/deployments/:id", get(get_deployment))
        .route("/deployments/:id/complete", post(complete_deployment))
}

/// Request body for queueing a deployment.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreateDeploymentRequest {
    /// ID of the agent that will execute the deployment.
    pub agent_id: Uuid,
    /// Catalog ids of the releases to deploy, in order.
    pub release_ids: Vec<String>,
}

/// Request body for reporting a deployment outcome.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CompleteDeploymentRequest {
    /// Terminal status: SUCCESS or FAILED.
    pub status: DeploymentStatus,
    /// Error details when the deployment failed.
    #[serde(default)]
    pub error_message: Option<String>,
}

/// Query parameters for the history endpoint.
#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    /// Maximum number of rows to return.
    pub limit: Option<i64>,
}

/// Queues a deployment for an agent.
#[utoipa::path(
    post,
    path = "/api/v1/deployments",
    tag = "deployments",
    request_body = CreateDeploymentRequest,
    responses(
        (status = 200, description = "Deployment queued", body = Deployment),
        (status = 400, description = "Invalid deployment request"),
        (status = 404, description = "Agent or release not found"),
    )
)]
pub(crate) async fn create_deployment(
    State(dal): State<DAL>,
    Json(payload): Json<CreateDeploymentRequest>,
) -> Result<Json<Deployment>, (StatusCode, Json<serde_json::Value>)> {
    info!(
        "Queueing deployment of {} release(s) for agent {}",
        payload.release_ids.len(),
        payload.agent_id
    );

    match dal
        .deployments()
        .create(payload.agent_id, payload.release_ids)
    {
        Ok(deployment) => {
            info!("Queued deployment '{}'", deployment.id);
            Ok(Json(deployment))
        }
        Err(e @ Error::Database(_)) => {
            error!("Failed to queue deployment: {:?}", e);
            Err(error_response(e))
        }
        Err(e) => {
            warn!("Rejected deployment request: {}", e);
            Err(error_response(e))
        }
    }
}

/// Lists all deployments.
#[utoipa::path(
    get,
    path = "/api/v1/deployments",
    tag = "deployments",
    responses(
        (status = 200, description = "List of deployments", body = Vec<Deployment>),
    )
)]
pub(crate) async fn list_deployments(
    State(dal): State<DAL>,
) -> Result<Json<Vec<Deployment>>, (StatusCode, Json<serde_json::Value>)> {
    match dal.deployments().list() {
        Ok(deployments) => Ok(Json(deployments)),
        Err(e) => {
            error!("Failed to list deployments: {:?}", e);
            Err(error_response(e))
        }
    }
}

/// Gets a deployment by ID.
#[utoipa::path(
    get,
    path = "/api/v1/deployments/{id}",
    tag = "deployments",
    params(("id" = String, Path, description = "Deployment ID")),
    responses(
        (status = 200, description = "Deployment found", body = Deployment),
        (status = 404, description = "Deployment not found"),
    )
)]
pub(crate) async fn get_deployment(
    State(dal): State<DAL>,
    Path(id): Path<String>,
) -> Result<Json<Deployment>, (StatusCode, Json<serde_json::Value>)> {
    match dal.deployments().get(&id) {
        Ok(Some(deployment)) => Ok(Json(deployment)),
        Ok(None) => Err(error_response(Error::NotFound("deployment", id))),
        Err(e) => {
            error!("Failed to fetch deployment {}: {:?}", id, e);
            Err(error_response(e))
        }
    }
}

/// Claims the next pending deployment for an agent.
///
/// Responds 204 when the agent has nothing to do, which is the common case
/// for a polling loop.
#[utoipa::path(
    get,
    path = "/api/v1/deployments/pending/{agent_id}",
    tag = "deployments",
    params(("agent_id" = Uuid, Path, description = "Agent ID")),
    responses(
        (status = 200, description = "Deployment claimed", body = Deployment),
        (status = 204, description = "No pending deployments"),
        (status = 404, description = "Agent not found"),
    )
)]
pub(crate) async fn next_pending(
    State(dal): State<DAL>,
    Path(agent_id): Path<Uuid>,
) -> Result<Response, (StatusCode, Json<serde_json::Value>)> {
    match dal.deployments().next_pending(agent_id) {
        Ok(Some(deployment)) => {
            info!(
                "Dispatched deployment '{}' to agent {}",
                deployment.id, agent_id
            );
            Ok(Json(deployment).into_response())
        }
        Ok(None) => Ok(StatusCode::NO_CONTENT.into_response()),
        Err(e @ Error::NotFound(_, _)) => Err(error_response(e)),
        Err(e) => {
            error!(
                "Failed to claim pending deployment for agent {}: {:?}",
                agent_id, e
            );
            Err(error_response(e))
        }
    }
}

/// Reports the outcome of a deployment.
#[utoipa::path(
    post,
    path = "/api/v1/deployments/{id}/complete",
    tag = "deployments",
    params(("id" = String, Path, description = "Deployment ID")),
    request_body = CompleteDeploymentRequest,
    responses(
        (status = 200, description = "Outcome recorded", body = Deployment),
        (status = 400, description = "Status is not terminal"),
        (status = 404, description = "Deployment not found"),
        (status = 409, description = "Deployment already completed with a different status"),
    )
)]
pub(crate) async fn complete_deployment(
    State(dal): State<DAL>,
    Path(id): Path<String>,
    Json(payload): Json<CompleteDeploymentRequest>,
) -> Result<Json<Deployment>, (StatusCode, Json<serde_json::Value>)> {
    match dal
        .deployments()
        .complete(&id, payload.status, payload.error_message)
    {
        Ok(deployment) => {
            let outcome = match deployment.status {
                DeploymentStatus::Success => "success",
                _ => "failed",
            };
            DEPLOYMENTS_COMPLETED_TOTAL
                .with_label_values(&[outcome])
                .inc();
            info!(
                "Deployment '{}' completed with status {:?}",
                deployment.id, deployment.status
            );
            Ok(Json(deployment))
        }
        Err(e @ Error::Database(_)) => {
            error!("Failed to complete deployment {}: {:?}", id, e);
            Err(error_response(e))
        }
        Err(e) => {
            warn!("Rejected completion report for '{}': {}", id, e);
            Err(error_response(e))
        }
    }
}

/// Lists recent deployments, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/deployments/history",
    tag = "deployments",
    params(("limit" = Option<i64>, Query, description = "Maximum number of rows")),
    responses(
        (status = 200, description = "Recent deployments", body = Vec<Deployment>),
        (status = 400, description = "Invalid limit"),
    )
)]
pub(crate) async fn deployment_history(
    State(dal): State<DAL>,
    Query(params): Query<HistoryQuery>,
) -> Result<Json<Vec<Deployment>>, (StatusCode, Json<serde_json::Value>)> {
    let limit = params.limit.unwrap_or(HISTORY_DEFAULT_LIMIT);
    if limit <= 0 {
        return Err(error_response(Error::InvalidArgument(
            "limit must be positive".to_string(),
        )));
    }

    match dal.deployments().history(limit) {
        Ok(deployments) => Ok(Json(deployments)),
        Err(e) => {
            error!("Failed to fetch deployment history: {:?}", e);
            Err(error_response(e))
        }
    }
}
