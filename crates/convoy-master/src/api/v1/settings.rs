/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

//! Handles API routes and logic for key/value settings.

use crate::api::v1::error_response;
use crate::dal::DAL;
use crate::error::Error;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use convoy_models::models::settings::{NewSetting, Setting};
use serde::{Deserialize, Serialize};
use tracing::{error, info};
use utoipa::ToSchema;

/// Creates and returns a router for settings endpoints.
pub fn routes() -> Router<DAL> {
    Router::new()
        .route("/settings", get(list_settings))
        .route("/settings/:key", get(get_setting).put(upsert_setting))
}

/// Request body for setting a value.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct UpsertSettingRequest {
    pub value: String,
}

/// Lists all settings.
#[utoipa::path(
    get,
    path = "/api/v1/settings",
    tag = "settings",
    responses(
        (status = 200, description = "List of settings", body = Vec<Setting>),
    )
)]
pub(crate) async fn list_settings(
    State(dal): State<DAL>,
) -> Result<Json<Vec<Setting>>, (StatusCode, Json<serde_json::Value>)> {
    match dal.settings().list() {
        Ok(settings) => Ok(Json(settings)),
        Err(e) => {
            error!("Failed to list settings: {:?}", e);
            Err(error_response(e))
        }
    }
}

/// Gets a setting by key.
#[utoipa::path(
    get,
    path = "/api/v1/settings/{key}",
    tag = "settings",
    params(("key" = String, Path, description = "Setting key")),
    responses(
        (status = 200, description = "Setting found", body = Setting),
        (status = 404, description = "Setting not found"),
    )
)]
pub(crate) async fn get_setting(
    State(dal): State<DAL>,
    Path(key): Path<String>,
) -> Result<Json<Setting>, (StatusCode, Json<serde_json::Value>)> {
    match dal.settings().get(&key) {
        Ok(Some(setting)) => Ok(Json(setting)),
        Ok(None) => Err(error_response(Error::NotFound("setting", key))),
        Err(e) => {
            error!("Failed to fetch setting '{}': {:?}", key, e);
            Err(error_response(e))
        }
    }
}

/// Creates or overwrites a setting.
#[utoipa::path(
    put,
    path = "/api/v1/settings/{key}",
    tag = "settings",
    params(("key" = String, Path, description = "Setting key")),
    request_body = UpsertSettingRequest,
    responses(
        (status = 200, description = "Setting stored", body = Setting),
        (status = 400, description = "Invalid key"),
    )
)]
pub(crate) async fn upsert_setting(
    State(dal): State<DAL>,
    Path(key): Path<String>,
    Json(payload): Json<UpsertSettingRequest>,
) -> Result<Json<Setting>, (StatusCode, Json<serde_json::Value>)> {
    let new_setting = NewSetting::new(key, payload.value)
        .map_err(|e| error_response(Error::InvalidArgument(e)))?;

    match dal.settings().upsert(&new_setting) {
        Ok(setting) => {
            info!("Stored setting '{}'", setting.key);
            Ok(Json(setting))
        }
        Err(e) => {
            error!("Failed to store setting: {:?}", e);
            Err(error_response(e))
        }
    }
}
