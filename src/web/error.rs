use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tokio::task::JoinError;
use tracing::{debug, error};

use crate::icons::IconError;
use crate::render::RenderError;

#[derive(Debug, Error)]
pub enum WebError {
    #[error("{0}")]
    Render(#[from] RenderError),
    #[error("{0}")]
    Icon(#[from] IconError),
    #[error("Background task failed {0}")]
    Join(#[from] JoinError),
}

impl WebError {
    pub fn as_status_code(&self) -> StatusCode {
        match self {
            WebError::Render(RenderError::NotFound(_))
            | WebError::Icon(IconError::NotFound(_)) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let status = self.as_status_code();
        if status.is_server_error() {
            error!("Error returned {self:?}");
        } else {
            debug!("{status} {self}");
        }
        (status, format!("{self}")).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_files_are_not_found() {
        let err = WebError::from(RenderError::NotFound("a.md".to_string()));
        assert_eq!(err.as_status_code(), StatusCode::NOT_FOUND);
        let err = WebError::from(IconError::NotFound("a.png".to_string()));
        assert_eq!(err.as_status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn decode_failures_are_server_errors() {
        let err = WebError::from(RenderError::InvalidUtf8("a.md".to_string()));
        assert_eq!(err.as_status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
