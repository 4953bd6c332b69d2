/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

//! # Convoy Master
//!
//! Coordination service for fleet deployments. Agents register themselves,
//! poll for pending deployments, and report completion; operators manage the
//! release catalog and queue deployments over the HTTP API.

pub mod api;
pub mod dal;
pub mod db;
pub mod error;
pub mod metrics;
pub mod utils;
