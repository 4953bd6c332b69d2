//! This module provides a test fixture for the convoy master.
//!
//! It sets up a test database connection, runs migrations, and provides
//! helpers to insert test agents, releases and deployments. Entity names are
//! suffixed with a UUID fragment so tests can run against a shared database
//! in parallel.

use axum::Router;
use convoy_master::api;
use convoy_master::dal::DAL;
use convoy_master::db::create_shared_connection_pool;
use convoy_models::models::agents::{Agent, NewAgent};
use convoy_models::models::deployments::Deployment;
use convoy_models::models::releases::{NewRelease, Release};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use dotenv::dotenv;
use std::env;
use uuid::Uuid;

/// Embedded migrations for the test database.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("../convoy-models/migrations");

/// Represents a test fixture for the convoy master.
#[derive(Clone)]
pub struct TestFixture {
    /// The Data Access Layer (DAL) instance for database operations.
    pub dal: DAL,
}

impl TestFixture {
    /// Creates a new TestFixture instance.
    ///
    /// Migrations are committed rather than run inside a test transaction so
    /// that claim tests can exercise real row locking across multiple pooled
    /// connections.
    ///
    /// # Panics
    ///
    /// This method will panic if:
    /// * The DATABASE_URL environment variable is not set
    /// * It fails to create a database connection
    /// * It fails to run migrations
    pub fn new() -> Self {
        dotenv().ok();
        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");

        // Reuse the database named in DATABASE_URL, falling back to convoy_test.
        let database_name = url::Url::parse(&database_url)
            .ok()
            .map(|u| u.path().trim_start_matches('/').to_string())
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| "convoy_test".to_string());

        let connection_pool = create_shared_connection_pool(&database_url, &database_name, 5);
        let dal = DAL::new(connection_pool.pool.clone());

        let mut conn = connection_pool
            .pool
            .get()
            .expect("Failed to get DB connection");
        conn.run_pending_migrations(MIGRATIONS)
            .expect("Failed to run migrations");

        TestFixture { dal }
    }

    /// Returns a name that is unique across concurrently running tests.
    pub fn unique_name(&self, prefix: &str) -> String {
        format!("{}-{}", prefix, &Uuid::new_v4().simple().to_string()[..8])
    }

    /// Registers a test agent with a unique name.
    pub fn create_test_agent(&self, name_prefix: &str) -> Agent {
        let new_agent = NewAgent::new(
            self.unique_name(name_prefix),
            "linux-x64".to_string(),
            "1.0.0".to_string(),
            Some("127.0.0.1".to_string()),
        )
        .expect("Failed to create NewAgent");

        self.dal
            .agents()
            .register(&new_agent)
            .expect("Failed to register test agent")
    }

    /// Inserts a catalog entry with a unique repository name and the given tag.
    pub fn create_test_release(&self, repo_prefix: &str, tag: &str) -> Release {
        let repo = self.unique_name(repo_prefix);
        let new_release =
            NewRelease::from_source_url(&format!("https://github.com/acme/{}", repo))
                .expect("Failed to build NewRelease");

        let created = self
            .dal
            .releases()
            .create(&new_release)
            .expect("Failed to create test release");

        let mut with_tag = created.clone();
        with_tag.tag_name = tag.to_string();
        self.dal
            .releases()
            .update(&created.id, &with_tag)
            .expect("Failed to set test release tag")
    }

    /// Queues a deployment of the given releases for the agent.
    pub fn create_test_deployment(&self, agent: &Agent, release_ids: Vec<String>) -> Deployment {
        self.dal
            .deployments()
            .create(agent.id, release_ids)
            .expect("Failed to create test deployment")
    }

    /// Creates and returns an Axum Router with configured API routes.
    pub fn create_test_router(&self) -> Router {
        api::configure_api_routes().with_state(self.dal.clone())
    }
}
