// API error type and its HTTP mapping
use crate::application::workspace::WorkspaceError;
use crate::domain::range::AxisErrors;
use crate::domain::wizard::WizardError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("unknown collection: {0}")]
    UnknownCollection(String),
    #[error(transparent)]
    Workspace(#[from] WorkspaceError),
    #[error("saved graph {0} not found")]
    GraphNotFound(i64),
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    axes: Option<&'a AxisErrors>,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::UnknownCollection(_) | ApiError::GraphNotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Workspace(WorkspaceError::NotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Workspace(WorkspaceError::Closed(_)) => StatusCode::GONE,
            ApiError::Workspace(WorkspaceError::Wizard(_)) => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let axes = match &self {
            ApiError::Workspace(WorkspaceError::Wizard(WizardError::InvalidRanges(errors))) => Some(errors),
            _ => None,
        };
        let body = ErrorBody {
            error: self.to_string(),
            axes,
        };
        (status, Json(body)).into_response()
    }
}
