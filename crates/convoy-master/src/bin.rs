//! Convoy Master CLI application
//!
//! This module provides the command-line interface for the Convoy Master.
//! It includes functionality for serving the API and for fleet housekeeping.

use clap::{Parser, Subcommand};
use convoy_master::api;
use convoy_master::dal::DAL;
use convoy_master::db::create_shared_connection_pool;
use convoy_master::utils;
use convoy_utils::config::Settings;
use convoy_utils::logging::prelude::*;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use tokio::signal;

/// Embedded migrations for the database
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("../convoy-models/migrations");

/// Command-line interface structure
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to an optional configuration file
    #[arg(short, long, env = "CONVOY_CONFIG")]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

/// Subcommands for the CLI
#[derive(Subcommand)]
enum Commands {
    /// Start the Convoy Master server
    Serve,
    /// Mark agents OFFLINE when their last_seen is older than the threshold
    MarkStaleAgents {
        /// Staleness threshold in seconds
        #[arg(long, default_value_t = 300)]
        threshold_seconds: i64,
    },
}

/// Main function to run the Convoy Master application
///
/// This function initializes the application, parses command-line arguments,
/// and executes the appropriate command based on user input.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Load configuration
    let config = Settings::new(cli.config.clone()).expect("Failed to load configuration");

    // Initialize logger
    convoy_utils::logging::init_with_format(&config.log.level, &config.log.format)
        .expect("Failed to initialize logger");

    // Execute the appropriate command
    match cli.command {
        Commands::Serve => serve(&config).await?,
        Commands::MarkStaleAgents { threshold_seconds } => {
            mark_stale_agents(&config, threshold_seconds)?
        }
    }
    Ok(())
}

/// Function to start the Convoy Master server
///
/// This function initializes the database, runs migrations, configures API
/// routes, and starts the server with graceful shutdown support.
async fn serve(config: &Settings) -> Result<(), Box<dyn std::error::Error>> {
    info!("Starting Convoy Master application");

    // Create database connection pool
    info!("Creating database connection pool");
    let connection_pool = create_shared_connection_pool(
        &config.database.url,
        "convoy",
        config.database.max_connections,
    );
    info!("Database connection pool created successfully");

    // Run pending migrations
    info!("Running pending database migrations");
    let mut conn = connection_pool
        .pool
        .get()
        .expect("Failed to get DB connection");
    conn.run_pending_migrations(MIGRATIONS)
        .expect("Failed to run migrations");
    info!("Database migrations completed successfully");
    drop(conn);

    // Initialize Data Access Layer
    info!("Initializing Data Access Layer");
    let dal = DAL::new(connection_pool.pool.clone());

    // Configure API routes
    info!("Configuring API routes");
    let app = api::configure_api_routes()
        .with_state(dal)
        .layer(api::cors_layer(&config.cors));

    // Set up the server address
    let addr = config.master.bind_address.clone();
    info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    // Set up shutdown signal handler
    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();
    tokio::spawn(async move {
        signal::ctrl_c().await.expect("Failed to listen for ctrl+c");
        shutdown_tx.send(()).ok();
    });

    // Start the server with graceful shutdown
    info!("Convoy Master is now running");
    axum::serve(listener, app)
        .with_graceful_shutdown(utils::shutdown(shutdown_rx))
        .await?;

    Ok(())
}

/// Marks ONLINE agents that have not been seen within the threshold as OFFLINE.
fn mark_stale_agents(
    config: &Settings,
    threshold_seconds: i64,
) -> Result<(), Box<dyn std::error::Error>> {
    info!(
        "Marking agents stale after {} seconds of silence",
        threshold_seconds
    );

    let pool = create_shared_connection_pool(&config.database.url, "convoy", 1);
    let dal = DAL::new(pool.pool.clone());

    let affected = dal.agents().mark_offline_stale(threshold_seconds)?;
    info!("Marked {} agent(s) OFFLINE", affected);

    Ok(())
}
