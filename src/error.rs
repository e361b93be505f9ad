use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use log::error;
use serde_json::json;
use thiserror::Error;

use crate::db::DbError;
use crate::voting::validate::ValidationError;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("This contact number has already been used to vote")]
    DuplicateSubmission,

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("An error occurred while submitting the vote")]
    SubmissionFailed(#[source] BoxError),

    #[error("Internal server error")]
    Internal(#[source] BoxError),
}

impl AppError {
    /// Collapses unexpected failures into the opaque submission error, leaving client errors as is.
    pub fn during_submission(self) -> Self {
        match self {
            AppError::Internal(source) => AppError::SubmissionFailed(source),
            other => other,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::DuplicateSubmission => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::SubmissionFailed(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<DbError> for AppError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::DuplicateContact => AppError::DuplicateSubmission,
            other => AppError::Internal(Box::new(other)),
        }
    }
}

impl From<ValidationError> for AppError {
    fn from(e: ValidationError) -> Self {
        AppError::Validation(e.0)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let AppError::SubmissionFailed(source) | AppError::Internal(source) = &self {
            error!("Request failed: {}", source);
        }

        let body = Json(json!({ "detail": self.to_string() }));
        (self.status(), body).into_response()
    }
}
