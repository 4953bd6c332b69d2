/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

//! Handles API routes and logic for agents.
//!
//! ## Endpoints
//!
//! - `POST /api/v1/agents/register` - Register or heartbeat an agent
//! - `GET /api/v1/agents` - List all agents
//! - `GET /api/v1/agents/:id` - Get agent by ID
//! - `DELETE /api/v1/agents/:id` - Remove an agent (deployment history is kept)

use crate::api::v1::error_response;
use crate::dal::DAL;
use crate::error::Error;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use convoy_models::models::agents::{Agent, NewAgent};
use serde::{Deserialize, Serialize};
use tracing::{error, info};
use utoipa::ToSchema;
use uuid::Uuid;

/// Creates and returns a router for agent-related endpoints.
pub fn routes() -> Router<DAL> {
    Router::new()
        .route("/agents/register", post(register_agent))
        .route("/agents", get(list_agents))
        .route("/agents/:id", get(get_agent).delete(delete_agent))
}

/// Request body for registering an agent.
///
/// Sent on agent startup and reused as the heartbeat payload.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct RegisterAgentRequest {
    /// Unique agent name (e.g., hostname).
    pub name: String,
    /// Platform identifier (e.g., "linux-x64").
    pub platform: String,
    /// Agent software version.
    pub version: String,
    /// Source IP as observed by the agent, if known.
    #[serde(default)]
    pub ip_address: Option<String>,
}

/// Registers an agent, or refreshes an existing registration by name.
#[utoipa::path(
    post,
    path = "/api/v1/agents/register",
    tag = "agents",
    request_body = RegisterAgentRequest,
    responses(
        (status = 200, description = "Agent registered", body = Agent),
        (status = 400, description = "Invalid registration payload"),
    )
)]
pub(crate) async fn register_agent(
    State(dal): State<DAL>,
    Json(payload): Json<RegisterAgentRequest>,
) -> Result<Json<Agent>, (StatusCode, Json<serde_json::Value>)> {
    info!("Handling agent registration for '{}'", payload.name);

    let new_agent = NewAgent::new(
        payload.name,
        payload.platform,
        payload.version,
        payload.ip_address,
    )
    .map_err(|e| error_response(Error::InvalidArgument(e)))?;

    match dal.agents().register(&new_agent) {
        Ok(agent) => {
            info!("Agent '{}' registered with id {}", agent.name, agent.id);
            Ok(Json(agent))
        }
        Err(e) => {
            error!("Failed to register agent: {:?}", e);
            Err(error_response(e))
        }
    }
}

/// Lists all registered agents.
#[utoipa::path(
    get,
    path = "/api/v1/agents",
    tag = "agents",
    responses(
        (status = 200, description = "List of agents", body = Vec<Agent>),
    )
)]
pub(crate) async fn list_agents(
    State(dal): State<DAL>,
) -> Result<Json<Vec<Agent>>, (StatusCode, Json<serde_json::Value>)> {
    match dal.agents().list() {
        Ok(agents) => Ok(Json(agents)),
        Err(e) => {
            error!("Failed to list agents: {:?}", e);
            Err(error_response(e))
        }
    }
}

/// Gets an agent by ID.
#[utoipa::path(
    get,
    path = "/api/v1/agents/{id}",
    tag = "agents",
    params(("id" = Uuid, Path, description = "Agent ID")),
    responses(
        (status = 200, description = "Agent found", body = Agent),
        (status = 404, description = "Agent not found"),
    )
)]
pub(crate) async fn get_agent(
    State(dal): State<DAL>,
    Path(id): Path<Uuid>,
) -> Result<Json<Agent>, (StatusCode, Json<serde_json::Value>)> {
    match dal.agents().get(id) {
        Ok(Some(agent)) => Ok(Json(agent)),
        Ok(None) => Err(error_response(Error::NotFound("agent", id.to_string()))),
        Err(e) => {
            error!("Failed to fetch agent {}: {:?}", id, e);
            Err(error_response(e))
        }
    }
}

/// Deletes an agent by ID.
///
/// Deployments referencing the agent are not touched.
#[utoipa::path(
    delete,
    path = "/api/v1/agents/{id}",
    tag = "agents",
    params(("id" = Uuid, Path, description = "Agent ID")),
    responses(
        (status = 204, description = "Agent deleted"),
        (status = 404, description = "Agent not found"),
    )
)]
pub(crate) async fn delete_agent(
    State(dal): State<DAL>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, (StatusCode, Json<serde_json::Value>)> {
    match dal.agents().delete(id) {
        Ok(()) => {
            info!("Deleted agent {}", id);
            Ok(StatusCode::NO_CONTENT)
        }
        Err(e) => Err(error_response(e)),
    }
}
