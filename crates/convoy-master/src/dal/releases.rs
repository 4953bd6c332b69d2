/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

//! Data Access Layer for Release catalog operations.

use crate::dal::DAL;
use crate::error::Error;
use convoy_models::models::releases::{NewRelease, Release};
use convoy_models::schema::releases;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// Data Access Layer for Release operations.
pub struct ReleasesDAL<'a> {
    /// Reference to the main DAL instance.
    pub dal: &'a DAL,
}

impl ReleasesDAL<'_> {
    /// Inserts a new release into the catalog.
    ///
    /// The release id doubles as the uniqueness key, so registering the same
    /// repository twice is a conflict rather than a silent overwrite.
    pub fn create(&self, new_release: &NewRelease) -> Result<Release, Error> {
        let conn = &mut self.dal.pool.get().expect("Failed to get DB connection");
        diesel::insert_into(releases::table)
            .values(new_release)
            .get_result(conn)
            .map_err(|e| match e {
                DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                    Error::Conflict(format!("release '{}' already exists", new_release.id))
                }
                other => Error::Database(other),
            })
    }

    /// Retrieves a release by its id.
    pub fn get(&self, release_id: &str) -> Result<Option<Release>, Error> {
        let conn = &mut self.dal.pool.get().expect("Failed to get DB connection");
        let release = releases::table
            .filter(releases::id.eq(release_id))
            .first(conn)
            .optional()?;
        Ok(release)
    }

    /// Lists all catalog entries, newest first.
    pub fn list(&self) -> Result<Vec<Release>, Error> {
        let conn = &mut self.dal.pool.get().expect("Failed to get DB connection");
        let releases = releases::table
            .order(releases::created_at.desc())
            .load::<Release>(conn)?;
        Ok(releases)
    }

    /// Deletes a release from the catalog.
    ///
    /// Existing deployments keep their denormalized release ids and tags, so
    /// history stays readable after the catalog entry is gone.
    pub fn delete(&self, release_id: &str) -> Result<(), Error> {
        let conn = &mut self.dal.pool.get().expect("Failed to get DB connection");
        let affected =
            diesel::delete(releases::table.filter(releases::id.eq(release_id))).execute(conn)?;
        if affected == 0 {
            return Err(Error::NotFound("release", release_id.to_string()));
        }
        Ok(())
    }

    /// Overwrites the metadata fields of an existing release.
    ///
    /// This is the seam for ingestion jobs that resolve tag, version and
    /// download information after the catalog entry is created.
    pub fn update(&self, release_id: &str, release: &Release) -> Result<Release, Error> {
        let conn = &mut self.dal.pool.get().expect("Failed to get DB connection");
        diesel::update(releases::table.filter(releases::id.eq(release_id)))
            .set((
                releases::tag_name.eq(release.tag_name.clone()),
                releases::name.eq(release.name.clone()),
                releases::version.eq(release.version.clone()),
                releases::release_date.eq(release.release_date.clone()),
                releases::download_url.eq(release.download_url.clone()),
                releases::description.eq(release.description.clone()),
                releases::assets.eq(release.assets.clone()),
            ))
            .get_result(conn)
            .map_err(|e| match e {
                DieselError::NotFound => Error::NotFound("release", release_id.to_string()),
                other => Error::Database(other),
            })
    }
}
