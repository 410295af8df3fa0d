//! HTTP mapping for operation failures.

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;
use todo_core::TodoError;

use crate::views;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Todo(#[from] TodoError),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Todo(TodoError::NotFound(_)) => StatusCode::NOT_FOUND,
            AppError::Todo(TodoError::InvalidLength(_) | TodoError::DuplicateName) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        tracing::debug!(%status, error = %self, "request failed");
        let title = status.canonical_reason().unwrap_or("Error");
        (status, Html(views::error_page(title, &self.to_string()))).into_response()
    }
}
