use crate::adapters::auction::AuctionError;
use crate::adapters::tracking::TrackingError;
use crate::adapters::wix::WixError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid request: {0}")]
    BadRequest(String),
    #[error("Authentication failed")]
    Unauthorized,
    #[error("Login requires further action: {0}")]
    LoginPending(String),
    #[error("Not found")]
    NotFound,
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Upstream error: {message}")]
    Upstream { status: Option<u16>, message: String },
    #[error("Service unavailable: {0}")]
    Unavailable(String),
    #[error("{0}")]
    MissingConfig(String),
    #[error("Internal server error")]
    Internal,
}

pub type Result<T> = std::result::Result<T, AppError>;

impl From<WixError> for AppError {
    fn from(err: WixError) -> Self {
        match err {
            WixError::MissingClientId | WixError::MissingApiKey => Self::MissingConfig(err.to_string()),
            WixError::Api { status: 401 | 403, .. } => Self::Unauthorized,
            WixError::Api { status: 404, .. } => Self::NotFound,
            WixError::Api { status: 409, message } => Self::Conflict(message),
            WixError::Api { status: 400, message } => Self::BadRequest(message),
            WixError::Api { status, message } => Self::Upstream { status: Some(status), message },
            WixError::Http(e) => Self::Upstream { status: e.status().map(|s| s.as_u16()), message: e.to_string() },
            WixError::InvalidResponse(message) => Self::Upstream { status: None, message },
        }
    }
}

impl From<AuctionError> for AppError {
    fn from(err: AuctionError) -> Self {
        match err {
            AuctionError::Status(status) => Self::Upstream { status: Some(status), message: err.to_string() },
            AuctionError::Http(e) => Self::Upstream { status: None, message: e.to_string() },
        }
    }
}

impl From<TrackingError> for AppError {
    fn from(err: TrackingError) -> Self {
        match err {
            TrackingError::NotFound => Self::NotFound,
            TrackingError::Rejected(message) => Self::BadRequest(message),
            TrackingError::Service(message) => Self::Upstream { status: None, message },
            TrackingError::Http(e) => Self::Upstream { status: None, message: e.to_string() },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message, details) = match self {
            Self::BadRequest(msg) => {
                tracing::debug!(message = %msg, "Bad request");
                (StatusCode::BAD_REQUEST, msg, None)
            }
            Self::Unauthorized => {
                tracing::debug!("Authentication failed");
                (StatusCode::UNAUTHORIZED, "Unauthorized".to_string(), None)
            }
            Self::LoginPending(state) => {
                tracing::debug!(state = %state, "Login not completed");
                (StatusCode::UNAUTHORIZED, "Login requires further action".to_string(), Some(state))
            }
            Self::NotFound => {
                tracing::debug!("Resource not found");
                (StatusCode::NOT_FOUND, "Not found".to_string(), None)
            }
            Self::Conflict(msg) => {
                tracing::debug!(message = %msg, "Conflict");
                (StatusCode::CONFLICT, msg, None)
            }
            Self::Upstream { status, message } => {
                tracing::error!(upstream_status = ?status, message = %message, "Upstream error");
                (StatusCode::BAD_GATEWAY, "Upstream service error".to_string(), Some(message))
            }
            Self::Unavailable(msg) => {
                tracing::warn!(message = %msg, "Service unavailable");
                (StatusCode::SERVICE_UNAVAILABLE, msg, None)
            }
            Self::MissingConfig(msg) => {
                tracing::error!(message = %msg, "Missing configuration");
                (StatusCode::INTERNAL_SERVER_ERROR, msg, None)
            }
            Self::Internal => {
                tracing::error!("Internal server error occurred");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string(), None)
            }
        };

        let body = details.map_or_else(
            || json!({ "error": message }),
            |details| json!({ "error": message, "details": details }),
        );

        (status, Json(body)).into_response()
    }
}
