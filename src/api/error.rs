use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// Rejections raised while turning user-supplied numbers into a scenario.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InputError {
    #[error("{field} must be a finite number")]
    NotFinite { field: &'static str },

    #[error("{field} must be > 0")]
    NotPositive { field: &'static str },

    #[error("{field} must be >= 0")]
    Negative { field: &'static str },

    #[error("{field} must be between {min} and {max}")]
    OutOfRange {
        field: &'static str,
        min: f64,
        max: f64,
    },

    #[error("{field} must be between 1 and {max} years")]
    YearsOutOfRange { field: &'static str, max: u32 },

    #[error("{field} must be >= 1")]
    MonthOutOfRange { field: &'static str },

    #[error("--local-appreciation and --local-rent-growth must be given together")]
    IncompleteLocalMarket,
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Input(_) => StatusCode::BAD_REQUEST,
            ApiError::Json(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        tracing::warn!(%status, error = %self, "request rejected");

        let mut response = (status, Json(json!({ "error": self.to_string() }))).into_response();
        response.headers_mut().insert(
            axum::http::header::CACHE_CONTROL,
            axum::http::HeaderValue::from_static("no-store"),
        );
        response
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
