// src/models/releases.rs

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use url::Url;
use utoipa::ToSchema;

/// A software release tracked by the catalog.
///
/// The `id` is the repository segment of the source URL, so two releases
/// from the same repository collide on insert by design.
#[derive(
    Queryable, Selectable, Identifiable, AsChangeset, Debug, Clone, Serialize, Deserialize, ToSchema,
)]
#[diesel(table_name = crate::schema::releases)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Release {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub tag_name: String,
    pub name: String,
    pub version: String,
    pub release_date: String,
    pub download_url: String,
    pub description: String,
    pub source_url: String,
    #[schema(value_type = Object)]
    pub assets: serde_json::Value,
}

#[derive(Insertable, Debug, Clone, Serialize, Deserialize, ToSchema)]
#[diesel(table_name = crate::schema::releases)]
pub struct NewRelease {
    pub id: String,
    pub tag_name: String,
    pub name: String,
    pub version: String,
    pub release_date: String,
    pub download_url: String,
    pub description: String,
    pub source_url: String,
    #[schema(value_type = Object)]
    pub assets: serde_json::Value,
}

impl NewRelease {
    /// Builds a catalog entry from a repository URL such as
    /// `https://github.com/acme/widget-service`.
    ///
    /// The first two non-empty path segments are taken as owner and
    /// repository; the repository segment becomes the release id. Metadata
    /// fields start empty and are filled in later by ingestion.
    pub fn from_source_url(source_url: &str) -> Result<Self, String> {
        let parsed = Url::parse(source_url.trim())
            .map_err(|e| format!("Invalid source URL '{}': {}", source_url, e))?;

        if parsed.host_str().is_none() {
            return Err(format!("Source URL '{}' has no host", source_url));
        }

        let segments: Vec<&str> = parsed
            .path_segments()
            .map(|s| s.filter(|seg| !seg.is_empty()).collect())
            .unwrap_or_default();

        let (owner, repo) = match segments.as_slice() {
            [owner, repo, ..] => (*owner, *repo),
            _ => {
                return Err(format!(
                    "Source URL '{}' must contain an owner and repository path",
                    source_url
                ))
            }
        };

        let repo = repo.trim_end_matches(".git");
        if repo.is_empty() {
            return Err(format!(
                "Source URL '{}' has an empty repository segment",
                source_url
            ));
        }

        Ok(NewRelease {
            id: repo.to_string(),
            tag_name: String::new(),
            name: repo.to_string(),
            version: String::new(),
            release_date: String::new(),
            download_url: String::new(),
            description: format!("{}/{}", owner, repo),
            source_url: source_url.trim().to_string(),
            assets: serde_json::json!([]),
        })
    }
}
