use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use sales_dashboard::DashboardError;
use serde_json::json;

/// Unified error type that renders as a JSON `{"error": "..."}` response
/// with an appropriate HTTP status code.
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: msg.into(),
        }
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.into(),
        }
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: msg.into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            log::error!("{}", self.message);
        }
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

impl From<DashboardError> for AppError {
    fn from(e: DashboardError) -> Self {
        match &e {
            DashboardError::NotFound(msg) => AppError::not_found(msg.clone()),
            DashboardError::EmptyDataset => AppError::not_found(e.to_string()),
            DashboardError::InvalidArgument(msg) => AppError::bad_request(msg.clone()),
            DashboardError::MissingColumns(_) => AppError::bad_request(e.to_string()),
            _ => AppError::internal(e.to_string()),
        }
    }
}
