// src/models/settings.rs

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(
    Queryable, Selectable, Identifiable, AsChangeset, Debug, Clone, Serialize, Deserialize, ToSchema,
)]
#[diesel(table_name = crate::schema::settings)]
#[diesel(primary_key(key))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Setting {
    pub key: String,
    pub value: String,
    pub updated_at: DateTime<Utc>,
}

#[derive(Insertable, Debug, Clone, Serialize, Deserialize, ToSchema)]
#[diesel(table_name = crate::schema::settings)]
pub struct NewSetting {
    pub key: String,
    pub value: String,
}

impl NewSetting {
    pub fn new(key: String, value: String) -> Result<Self, String> {
        if key.trim().is_empty() {
            return Err("Setting key cannot be empty".to_string());
        }

        Ok(NewSetting { key, value })
    }
}
