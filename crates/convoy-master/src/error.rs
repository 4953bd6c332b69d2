/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

//! Domain error type shared by the DAL and the HTTP API.
//!
//! Callers match on the variant to decide behavior; the HTTP layer maps each
//! variant to a status code via [`Error::status_code`].

use axum::http::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// A referenced entity does not exist, e.g. `NotFound("agent", id)`.
    #[error("{0} '{1}' not found")]
    NotFound(&'static str, String),

    /// The request was well-formed but semantically invalid.
    #[error("{0}")]
    InvalidArgument(String),

    /// The request conflicts with existing state.
    #[error("{0}")]
    Conflict(String),

    /// An underlying database failure.
    #[error("database error: {0}")]
    Database(#[from] diesel::result::Error),
}

impl Error {
    /// HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::NotFound(_, _) => StatusCode::NOT_FOUND,
            Error::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            Error::Conflict(_) => StatusCode::CONFLICT,
            Error::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
