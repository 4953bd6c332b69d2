/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

//! Data Access Layer for Settings operations.

use crate::dal::DAL;
use crate::error::Error;
use convoy_models::models::settings::{NewSetting, Setting};
use convoy_models::schema::settings;
use diesel::prelude::*;

/// Data Access Layer for Settings operations.
pub struct SettingsDAL<'a> {
    /// Reference to the main DAL instance.
    pub dal: &'a DAL,
}

impl SettingsDAL<'_> {
    /// Inserts or overwrites a key/value setting.
    pub fn upsert(&self, new_setting: &NewSetting) -> Result<Setting, Error> {
        let conn = &mut self.dal.pool.get().expect("Failed to get DB connection");
        let setting = diesel::insert_into(settings::table)
            .values(new_setting)
            .on_conflict(settings::key)
            .do_update()
            .set((
                settings::value.eq(new_setting.value.clone()),
                settings::updated_at.eq(diesel::dsl::now),
            ))
            .get_result(conn)?;
        Ok(setting)
    }

    /// Retrieves a setting by key.
    pub fn get(&self, key: &str) -> Result<Option<Setting>, Error> {
        let conn = &mut self.dal.pool.get().expect("Failed to get DB connection");
        let setting = settings::table
            .filter(settings::key.eq(key))
            .first(conn)
            .optional()?;
        Ok(setting)
    }

    /// Lists all settings ordered by key.
    pub fn list(&self) -> Result<Vec<Setting>, Error> {
        let conn = &mut self.dal.pool.get().expect("Failed to get DB connection");
        let settings = settings::table
            .order(settings::key.asc())
            .load::<Setting>(conn)?;
        Ok(settings)
    }

    /// Deletes a setting by key.
    pub fn delete(&self, key: &str) -> Result<(), Error> {
        let conn = &mut self.dal.pool.get().expect("Failed to get DB connection");
        let affected =
            diesel::delete(settings::table.filter(settings::key.eq(key))).execute(conn)?;
        if affected == 0 {
            return Err(Error::NotFound("setting", key.to_string()));
        }
        Ok(())
    }
}
