//! Error types for the dashboard crate.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use classdeck_core::CourseEditError;
use thiserror::Error;

/// Errors that can occur in the dashboard.
#[derive(Debug, Error)]
pub enum DashboardError {
    /// Failed to start the server.
    #[error("failed to start dashboard: {0}")]
    StartupFailed(String),

    /// Resource not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// Invalid request.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The loaded roles break permission parity.
    #[error(transparent)]
    Permissions(#[from] classdeck_core::PermissionError),

    /// A course could not be created or updated.
    #[error(transparent)]
    CourseEdit(#[from] CourseEditError),

    /// A table definition is invalid.
    #[error(transparent)]
    Grid(#[from] classdeck_grid::GridError),

    /// Toast delivery could not be set up.
    #[error(transparent)]
    Notify(#[from] classdeck_notify::NotifyError),

    /// Internal error.
    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for DashboardError {
    fn into_response(self) -> Response {
        let status = match &self {
            DashboardError::NotFound(_) => StatusCode::NOT_FOUND,
            DashboardError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            DashboardError::CourseEdit(CourseEditError::NotFound(_)) => StatusCode::NOT_FOUND,
            DashboardError::CourseEdit(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        (status, self.to_string()).into_response()
    }
}
