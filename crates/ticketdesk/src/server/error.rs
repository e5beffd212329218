//! HTTP error responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::error::Error;

/// Failures reported to HTTP clients.
///
/// Store failures are logged with their cause and answered with a fixed
/// message so storage details don't leak to the browser.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Records could not be loaded.
    #[error("Error reading data")]
    ReadRecords,

    /// Devices could not be loaded.
    #[error("Error reading devices")]
    ReadDevices,

    /// Records could not be written.
    #[error("Error saving data")]
    SaveRecords,

    /// The uploaded collection was rejected.
    #[error("{0}")]
    Invalid(#[source] Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            ApiError::Invalid { .. } => StatusCode::BAD_REQUEST,
            ApiError::ReadRecords | ApiError::ReadDevices | ApiError::SaveRecords => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        (status, self.to_string()).into_response()
    }
}
