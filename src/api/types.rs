//! API response types.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

/// Error envelope returned by every JSON endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub error: ApiErrorBody,
}

/// Error details.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorBody {
    pub message: String,
    pub code: String,
}

impl ApiError {
    /// Unknown channel (404).
    pub fn channel_not_found(name: &str) -> Self {
        Self {
            error: ApiErrorBody {
                message: format!("Channel '{}' not found", name),
                code: "channel_not_found".to_string(),
            },
        }
    }

    /// Known channel that has not fetched successfully yet (404).
    pub fn no_data(name: &str) -> Self {
        Self {
            error: ApiErrorBody {
                message: format!("Channel '{}' has no data yet", name),
                code: "no_data".to_string(),
            },
        }
    }

    fn status_code(&self) -> StatusCode {
        match self.error.code.as_str() {
            "channel_not_found" | "no_data" => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self)).into_response()
    }
}
