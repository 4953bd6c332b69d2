/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

//! Data Access Layer for Agent operations.
//!
//! Agents are upserted by name: the first registration creates the row and
//! every subsequent registration (or heartbeat) refreshes it in place, so an
//! agent's id is stable across restarts and version upgrades.

use crate::dal::DAL;
use crate::error::Error;
use chrono::{Duration, Utc};
use convoy_models::models::agents::{Agent, AgentStatus, NewAgent};
use convoy_models::schema::agents;
use diesel::prelude::*;
use uuid::Uuid;

/// Data Access Layer for Agent operations.
pub struct AgentsDAL<'a> {
    /// Reference to the main DAL instance.
    pub dal: &'a DAL,
}

impl AgentsDAL<'_> {
    /// Registers an agent, or refreshes it if the name is already known.
    ///
    /// Acts as both registration and heartbeat: platform, version and
    /// ip_address are overwritten, status is forced back to ONLINE and
    /// last_seen is stamped. The row id never changes.
    pub fn register(&self, new_agent: &NewAgent) -> Result<Agent, Error> {
        let conn = &mut self.dal.pool.get().expect("Failed to get DB connection");
        let agent = diesel::insert_into(agents::table)
            .values(new_agent)
            .on_conflict(agents::name)
            .do_update()
            .set((
                agents::platform.eq(new_agent.platform.clone()),
                agents::version.eq(new_agent.version.clone()),
                agents::ip_address.eq(new_agent.ip_address.clone()),
                agents::status.eq(AgentStatus::Online),
                agents::last_seen.eq(diesel::dsl::now),
                agents::updated_at.eq(diesel::dsl::now),
            ))
            .get_result(conn)?;
        Ok(agent)
    }

    /// Retrieves an agent by its UUID.
    pub fn get(&self, agent_id: Uuid) -> Result<Option<Agent>, Error> {
        let conn = &mut self.dal.pool.get().expect("Failed to get DB connection");
        let agent = agents::table
            .filter(agents::id.eq(agent_id))
            .first(conn)
            .optional()?;
        Ok(agent)
    }

    /// Retrieves an agent by its unique name.
    pub fn get_by_name(&self, name: &str) -> Result<Option<Agent>, Error> {
        let conn = &mut self.dal.pool.get().expect("Failed to get DB connection");
        let agent = agents::table
            .filter(agents::name.eq(name))
            .first(conn)
            .optional()?;
        Ok(agent)
    }

    /// Lists all registered agents, most recently seen first.
    pub fn list(&self) -> Result<Vec<Agent>, Error> {
        let conn = &mut self.dal.pool.get().expect("Failed to get DB connection");
        let agents = agents::table
            .order(agents::last_seen.desc())
            .load::<Agent>(conn)?;
        Ok(agents)
    }

    /// Deletes an agent by its UUID.
    ///
    /// Deployment rows referencing the agent are left untouched.
    pub fn delete(&self, agent_id: Uuid) -> Result<(), Error> {
        let conn = &mut self.dal.pool.get().expect("Failed to get DB connection");
        let affected =
            diesel::delete(agents::table.filter(agents::id.eq(agent_id))).execute(conn)?;
        if affected == 0 {
            return Err(Error::NotFound("agent", agent_id.to_string()));
        }
        Ok(())
    }

    /// Marks ONLINE agents whose last_seen is older than the threshold as OFFLINE.
    ///
    /// Intended to be run periodically from the CLI or a cron job.
    ///
    /// # Returns
    ///
    /// Returns the number of agents transitioned to OFFLINE.
    pub fn mark_offline_stale(&self, threshold_seconds: i64) -> Result<usize, Error> {
        let conn = &mut self.dal.pool.get().expect("Failed to get DB connection");
        let cutoff = Utc::now() - Duration::seconds(threshold_seconds);
        let affected = diesel::update(
            agents::table
                .filter(agents::status.eq(AgentStatus::Online))
                .filter(agents::last_seen.lt(cutoff)),
        )
        .set((
            agents::status.eq(AgentStatus::Offline),
            agents::updated_at.eq(diesel::dsl::now),
        ))
        .execute(conn)?;
        Ok(affected)
    }

    /// Counts agents currently marked ONLINE. Used by the metrics endpoint.
    pub fn count_online(&self) -> Result<i64, Error> {
        let conn = &mut self.dal.pool.get().expect("Failed to get DB connection");
        let count = agents::table
            .filter(agents::status.eq(AgentStatus::Online))
            .count()
            .get_result(conn)?;
        Ok(count)
    }
}
