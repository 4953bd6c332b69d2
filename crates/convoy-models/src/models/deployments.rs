// src/models/deployments.rs

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_derive_enum::DbEnum;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Lifecycle state of a deployment.
///
/// Transitions only move forward: PENDING -> IN_PROGRESS -> SUCCESS or
/// FAILED. Terminal states never change again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, DbEnum, ToSchema)]
#[ExistingTypePath = "crate::schema::sql_types::DeploymentStatus"]
#[DbValueStyle = "SCREAMING_SNAKE_CASE"]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeploymentStatus {
    Pending,
    InProgress,
    Success,
    Failed,
}

impl DeploymentStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, DeploymentStatus::Success | DeploymentStatus::Failed)
    }
}

#[derive(Queryable, Selectable, Identifiable, Debug, Clone, Serialize, Deserialize, ToSchema)]
#[diesel(table_name = crate::schema::deployments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Deployment {
    pub id: String,
    pub sequence_id: i64,
    pub agent_id: Uuid,
    pub agent_name: String,
    #[schema(value_type = Vec<String>)]
    pub release_ids: serde_json::Value,
    #[schema(value_type = Vec<String>)]
    pub release_tags: serde_json::Value,
    pub status: DeploymentStatus,
    pub created_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub error_message: Option<String>,
}

#[derive(Insertable, Debug, Clone, Serialize, Deserialize, ToSchema)]
#[diesel(table_name = crate::schema::deployments)]
pub struct NewDeployment {
    pub id: String,
    pub agent_id: Uuid,
    pub agent_name: String,
    #[schema(value_type = Vec<String>)]
    pub release_ids: serde_json::Value,
    #[schema(value_type = Vec<String>)]
    pub release_tags: serde_json::Value,
}

impl NewDeployment {
    /// Builds a pending deployment for `agent_name`.
    ///
    /// `release_ids` and `release_tags` are index-aligned. The generated id
    /// carries a UUID fragment so two deployments created within the same
    /// millisecond still get distinct ids.
    pub fn new(
        agent_id: Uuid,
        agent_name: String,
        release_ids: Vec<String>,
        release_tags: Vec<String>,
    ) -> Result<Self, String> {
        if agent_name.trim().is_empty() {
            return Err("Agent name cannot be empty".to_string());
        }
        if release_ids.is_empty() {
            return Err("Deployment must reference at least one release".to_string());
        }
        if release_ids.len() != release_tags.len() {
            return Err("Release ids and tags must have the same length".to_string());
        }
        if release_ids.iter().any(|id| id.trim().is_empty()) {
            return Err("Release ids cannot contain empty strings".to_string());
        }

        let id = format!(
            "deploy-{}-{}-{}",
            agent_name,
            Utc::now().timestamp_millis(),
            &Uuid::new_v4().simple().to_string()[..8]
        );

        Ok(NewDeployment {
            id,
            agent_id,
            agent_name,
            release_ids: string_vec_to_json(&release_ids),
            release_tags: string_vec_to_json(&release_tags),
        })
    }
}

// Helper function to convert Vec<String> to serde_json::Value
pub fn string_vec_to_json(values: &[String]) -> serde_json::Value {
    serde_json::to_value(values).unwrap()
}

// Helper function to read a jsonb array column back into Vec<String>
pub fn json_to_string_vec(value: &serde_json::Value) -> Vec<String> {
    serde_json::from_value(value.clone()).unwrap_or_default()
}
