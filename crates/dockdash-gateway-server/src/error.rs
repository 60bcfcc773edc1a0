use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use dockdash_common::ErrorBody;
use dockdash_engine::EngineError;
use thiserror::Error;
use tracing::error;

/// Whole-request failure. The engine error is logged; clients only see the
/// operation that failed.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Failed to {action}")]
    Engine {
        action: &'static str,
        #[source]
        source: EngineError,
    },
}

impl ApiError {
    pub fn engine(action: &'static str) -> impl FnOnce(EngineError) -> Self {
        move |source| ApiError::Engine { action, source }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::Engine { source, .. } => error!(error = %source, "{}", self),
        }
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorBody {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}
