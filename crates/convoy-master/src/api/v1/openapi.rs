/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

use crate::api::v1::agents::RegisterAgentRequest;
use crate::api::v1::deployments::{CompleteDeploymentRequest, CreateDeploymentRequest};
use crate::api::v1::releases::CreateReleaseRequest;
use crate::api::v1::settings::UpsertSettingRequest;
use crate::api::v1::{agents, deployments, releases, settings};
use crate::dal::DAL;
use axum::{response::Json, routing::get, Router};
use convoy_models::models::{
    agents::{Agent, AgentStatus, NewAgent},
    deployments::{Deployment, DeploymentStatus, NewDeployment},
    releases::{NewRelease, Release},
    settings::{NewSetting, Setting},
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        agents::register_agent,
        agents::list_agents,
        agents::get_agent,
        agents::delete_agent,
        deployments::create_deployment,
        deployments::list_deployments,
        deployments::get_deployment,
        deployments::next_pending,
        deployments::complete_deployment,
        deployments::deployment_history,
        releases::create_release,
        releases::list_releases,
        releases::get_release,
        releases::delete_release,
        settings::list_settings,
        settings::get_setting,
        settings::upsert_setting,
    ),
    components(
        schemas(
            Agent,
            NewAgent,
            AgentStatus,
            Deployment,
            NewDeployment,
            DeploymentStatus,
            Release,
            NewRelease,
            Setting,
            NewSetting,
            RegisterAgentRequest,
            CreateDeploymentRequest,
            CompleteDeploymentRequest,
            CreateReleaseRequest,
            UpsertSettingRequest,
        )
    ),
    tags(
        (name = "agents", description = "Agent registry API"),
        (name = "deployments", description = "Deployment lifecycle API"),
        (name = "releases", description = "Release catalog API"),
        (name = "settings", description = "Key/value settings API")
    )
)]
pub struct ApiDoc;

pub fn configure_openapi() -> Router<DAL> {
    Router::new()
        .route("/docs/openapi.json", get(serve_openapi))
        .merge(SwaggerUi::new("/swagger-ui"))
}

async fn serve_openapi() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
