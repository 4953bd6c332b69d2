/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

//! Data Access Layer for the convoy master.
//!
//! `DAL` wraps the shared connection pool and hands out per-entity accessors.

use diesel::r2d2::{ConnectionManager, Pool};
use diesel::PgConnection;

mod agents;
mod deployments;
mod releases;
mod settings;

pub use agents::AgentsDAL;
pub use deployments::DeploymentsDAL;
pub use releases::ReleasesDAL;
pub use settings::SettingsDAL;

#[derive(Clone)]
pub struct DAL {
    pub pool: Pool<ConnectionManager<PgConnection>>,
}

impl DAL {
    pub fn new(pool: Pool<ConnectionManager<PgConnection>>) -> Self {
        DAL { pool }
    }

    pub fn agents(&self) -> AgentsDAL {
        AgentsDAL { dal: self }
    }

    pub fn deployments(&self) -> DeploymentsDAL {
        DeploymentsDAL { dal: self }
    }

    pub fn releases(&self) -> ReleasesDAL {
        ReleasesDAL { dal: self }
    }

    pub fn settings(&self) -> SettingsDAL {
        SettingsDAL { dal: self }
    }
}
