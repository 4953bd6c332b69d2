/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

//! Data Access Layer for Deployment operations.
//!
//! ## Deployment Lifecycle
//!
//! 1. Create: deployment is queued with status PENDING
//! 2. Dispatch: the target agent polls and atomically claims the oldest
//!    PENDING deployment, status changes to IN_PROGRESS
//! 3. Complete: the agent reports SUCCESS or FAILED
//!
//! Transitions only move forward. A terminal deployment accepts a repeated
//! report of the same status (agents retry over flaky networks) but rejects
//! a different terminal status with a conflict. Claiming is the normal exit
//! from PENDING, but `complete` also accepts a PENDING row: an operator can
//! resolve a deployment that will never be polled (its agent is gone) without
//! routing it through a claim first.
//!
//! ## Dispatch Ordering
//!
//! Claims are FIFO per agent: ordered by created_at with sequence_id as the
//! tiebreaker for rows created within the same timestamp. The claim runs
//! inside a transaction with FOR UPDATE SKIP LOCKED so concurrent polls from
//! the same agent each receive a different deployment, or none.

use crate::dal::DAL;
use crate::error::Error;
use convoy_models::models::deployments::{Deployment, DeploymentStatus, NewDeployment};
use convoy_models::models::releases::Release;
use convoy_models::schema::{agents, deployments, releases};
use diesel::prelude::*;
use uuid::Uuid;

/// Data Access Layer for Deployment operations.
pub struct DeploymentsDAL<'a> {
    /// Reference to the main DAL instance.
    pub dal: &'a DAL,
}

impl DeploymentsDAL<'_> {
    /// Queues a new deployment for an agent.
    ///
    /// Validates the agent and every referenced release inside a single
    /// transaction; if any lookup fails nothing is written. Release tags are
    /// denormalized onto the row, index-aligned with `release_ids`, so the
    /// deployment record survives later catalog deletions.
    pub fn create(&self, agent_id: Uuid, release_ids: Vec<String>) -> Result<Deployment, Error> {
        let conn = &mut self.dal.pool.get().expect("Failed to get DB connection");

        conn.transaction::<_, Error, _>(|conn| {
            let agent_name: String = agents::table
                .filter(agents::id.eq(agent_id))
                .select(agents::name)
                .first(conn)
                .optional()?
                .ok_or_else(|| Error::NotFound("agent", agent_id.to_string()))?;

            let mut release_tags = Vec::with_capacity(release_ids.len());
            for release_id in &release_ids {
                let release: Release = releases::table
                    .filter(releases::id.eq(release_id))
                    .first(conn)
                    .optional()?
                    .ok_or_else(|| Error::NotFound("release", release_id.clone()))?;
                release_tags.push(release.tag_name);
            }

            let new_deployment =
                NewDeployment::new(agent_id, agent_name, release_ids, release_tags)
                    .map_err(Error::InvalidArgument)?;

            let deployment = diesel::insert_into(deployments::table)
                .values(&new_deployment)
                .get_result(conn)?;
            Ok(deployment)
        })
    }

    /// Retrieves a deployment by its id.
    pub fn get(&self, deployment_id: &str) -> Result<Option<Deployment>, Error> {
        let conn = &mut self.dal.pool.get().expect("Failed to get DB connection");
        let deployment = deployments::table
            .filter(deployments::id.eq(deployment_id))
            .first(conn)
            .optional()?;
        Ok(deployment)
    }

    /// Lists all deployments, newest first.
    pub fn list(&self) -> Result<Vec<Deployment>, Error> {
        let conn = &mut self.dal.pool.get().expect("Failed to get DB connection");
        let deployments = deployments::table
            .order((
                deployments::created_at.desc(),
                deployments::sequence_id.desc(),
            ))
            .load::<Deployment>(conn)?;
        Ok(deployments)
    }

    /// Lists all deployments targeting a specific agent, newest first.
    pub fn list_for_agent(&self, agent_id: Uuid) -> Result<Vec<Deployment>, Error> {
        let conn = &mut self.dal.pool.get().expect("Failed to get DB connection");
        let deployments = deployments::table
            .filter(deployments::agent_id.eq(agent_id))
            .order((
                deployments::created_at.desc(),
                deployments::sequence_id.desc(),
            ))
            .load::<Deployment>(conn)?;
        Ok(deployments)
    }

    /// Atomically claims the oldest PENDING deployment for an agent.
    ///
    /// The selected row is locked with FOR UPDATE SKIP LOCKED and moved to
    /// IN_PROGRESS with started_at stamped, all in one transaction. Under
    /// concurrent polls each deployment is handed out at most once.
    ///
    /// # Returns
    ///
    /// Returns `Ok(Some(deployment))` with the claimed row, or `Ok(None)`
    /// when the agent has no pending work.
    pub fn next_pending(&self, agent_id: Uuid) -> Result<Option<Deployment>, Error> {
        let conn = &mut self.dal.pool.get().expect("Failed to get DB connection");

        conn.transaction::<_, Error, _>(|conn| {
            let exists: bool = agents::table
                .filter(agents::id.eq(agent_id))
                .select(diesel::dsl::count_star().gt(0))
                .first(conn)?;
            if !exists {
                return Err(Error::NotFound("agent", agent_id.to_string()));
            }

            let candidate: Option<Deployment> = deployments::table
                .filter(deployments::agent_id.eq(agent_id))
                .filter(deployments::status.eq(DeploymentStatus::Pending))
                .order((
                    deployments::created_at.asc(),
                    deployments::sequence_id.asc(),
                ))
                .for_update()
                .skip_locked()
                .first(conn)
                .optional()?;

            let Some(candidate) = candidate else {
                return Ok(None);
            };

            let claimed = diesel::update(
                deployments::table
                    .filter(deployments::id.eq(&candidate.id))
                    .filter(deployments::status.eq(DeploymentStatus::Pending)),
            )
            .set((
                deployments::status.eq(DeploymentStatus::InProgress),
                deployments::started_at.eq(diesel::dsl::now),
            ))
            .get_result(conn)?;

            Ok(Some(claimed))
        })
    }

    /// Records the outcome of a deployment.
    ///
    /// Only terminal statuses are accepted. Re-reporting the same terminal
    /// status returns the stored row unchanged; reporting a different
    /// terminal status is a conflict.
    pub fn complete(
        &self,
        deployment_id: &str,
        status: DeploymentStatus,
        error_message: Option<String>,
    ) -> Result<Deployment, Error> {
        if !status.is_terminal() {
            return Err(Error::InvalidArgument(format!(
                "completion status must be SUCCESS or FAILED, got {:?}",
                status
            )));
        }

        let conn = &mut self.dal.pool.get().expect("Failed to get DB connection");

        conn.transaction::<_, Error, _>(|conn| {
            let current: Deployment = deployments::table
                .filter(deployments::id.eq(deployment_id))
                .for_update()
                .first(conn)
                .optional()?
                .ok_or_else(|| Error::NotFound("deployment", deployment_id.to_string()))?;

            if current.status.is_terminal() {
                if current.status == status {
                    return Ok(current);
                }
                return Err(Error::Conflict(format!(
                    "deployment '{}' already completed with status {:?}",
                    deployment_id, current.status
                )));
            }

            let completed = diesel::update(
                deployments::table.filter(deployments::id.eq(deployment_id)),
            )
            .set((
                deployments::status.eq(status),
                deployments::completed_at.eq(diesel::dsl::now),
                deployments::error_message.eq(error_message),
            ))
            .get_result(conn)?;

            Ok(completed)
        })
    }

    /// Lists the most recent deployments, capped at `limit` rows.
    pub fn history(&self, limit: i64) -> Result<Vec<Deployment>, Error> {
        let conn = &mut self.dal.pool.get().expect("Failed to get DB connection");
        let deployments = deployments::table
            .order((
                deployments::created_at.desc(),
                deployments::sequence_id.desc(),
            ))
            .limit(limit)
            .load::<Deployment>(conn)?;
        Ok(deployments)
    }

    /// Counts deployments in PENDING status. Used by the metrics endpoint.
    pub fn count_pending(&self) -> Result<i64, Error> {
        let conn = &mut self.dal.pool.get().expect("Failed to get DB connection");
        let count = deployments::table
            .filter(deployments::status.eq(DeploymentStatus::Pending))
            .count()
            .get_result(conn)?;
        Ok(count)
    }
}
