/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

use convoy_utils::logging::prelude::*;
use tokio::sync::oneshot;

/// Waits for the shutdown signal and logs when it arrives.
///
/// Passed to `axum::serve(...).with_graceful_shutdown` so in-flight requests
/// finish before the process exits.
pub async fn shutdown(shutdown_rx: oneshot::Receiver<()>) {
    shutdown_rx.await.ok();
    info!("Shutdown signal received, stopping server");
}
