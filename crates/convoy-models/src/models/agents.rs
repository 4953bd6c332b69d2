// src/models/agents.rs

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_derive_enum::DbEnum;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Connectivity status of a registered agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, DbEnum, ToSchema)]
#[ExistingTypePath = "crate::schema::sql_types::AgentStatus"]
#[DbValueStyle = "SCREAMING_SNAKE_CASE"]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AgentStatus {
    Online,
    Offline,
    Error,
}

#[derive(
    Queryable, Selectable, Identifiable, AsChangeset, Debug, Clone, Serialize, Deserialize, ToSchema,
)]
#[diesel(table_name = crate::schema::agents)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Agent {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub name: String,
    pub platform: String,
    pub version: String,
    pub status: AgentStatus,
    pub last_seen: DateTime<Utc>,
    pub ip_address: Option<String>,
}

#[derive(Insertable, Debug, Clone, Serialize, Deserialize, ToSchema)]
#[diesel(table_name = crate::schema::agents)]
pub struct NewAgent {
    pub name: String,
    pub platform: String,
    pub version: String,
    pub ip_address: Option<String>,
}

impl NewAgent {
    pub fn new(
        name: String,
        platform: String,
        version: String,
        ip_address: Option<String>,
    ) -> Result<Self, String> {
        // Check for empty strings
        if name.trim().is_empty() {
            return Err("Name cannot be empty".to_string());
        }
        if platform.trim().is_empty() {
            return Err("Platform cannot be empty".to_string());
        }
        if version.trim().is_empty() {
            return Err("Version cannot be empty".to_string());
        }
        if let Some(ref ip) = ip_address {
            if ip.trim().is_empty() {
                return Err("IP address cannot be an empty string".to_string());
            }
        }

        Ok(NewAgent {
            name,
            platform,
            version,
            ip_address,
        })
    }
}
