use axum::response::IntoResponse;
use axum::Json;
use http::StatusCode;
use serde::Serialize;
use thiserror::Error;

pub const INVALID_API_KEY: &str = "Invalid API key";
pub const UNEXPECTED_ERROR: &str = "Unexpected error";
pub const COUNTRY_AGGREGATION_FAILED: &str = "error occurred while fetching country data";

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid API key")]
    Unauthorized,
    #[error("{0}")]
    NotFound(String),
    #[error("{message} (upstream status {status})")]
    Upstream { status: StatusCode, message: String },
    #[error("error occurred while fetching country data")]
    Aggregation,
    #[error("Database error: {0}")]
    Db(sqlx::Error),
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    kind: &'a str,
    detail: String,
}

impl AppError {
    /// Failure reported by an upstream provider, carrying its status.
    pub fn upstream(status: StatusCode) -> Self {
        AppError::Upstream {
            status,
            message: UNEXPECTED_ERROR.to_string(),
        }
    }

    /// Failure that never produced an upstream status (transport, malformed body).
    pub fn bad_gateway() -> Self {
        Self::upstream(StatusCode::BAD_GATEWAY)
    }

    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Unauthorized => "unauthorized",
            AppError::NotFound(_) => "not_found",
            AppError::Upstream { .. } => "upstream_error",
            AppError::Aggregation => "internal_aggregation_error",
            AppError::Db(_) => "database_error",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            // Only error statuses are passed through; anything else an upstream
            // returned instead of 200 is reported as a gateway failure.
            AppError::Upstream { status, .. } => {
                if status.is_client_error() || status.is_server_error() {
                    *status
                } else {
                    StatusCode::BAD_GATEWAY
                }
            }
            AppError::Aggregation | AppError::Db(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn detail(&self) -> String {
        match self {
            AppError::Unauthorized => INVALID_API_KEY.to_string(),
            AppError::NotFound(msg) => msg.clone(),
            AppError::Upstream { message, .. } => message.clone(),
            AppError::Aggregation => COUNTRY_AGGREGATION_FAILED.to_string(),
            AppError::Db(_) => "Internal server error".to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let body = ErrorBody {
            kind: self.kind(),
            detail: self.detail(),
        };
        (self.status_code(), Json(body)).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(value: sqlx::Error) -> Self {
        AppError::Db(value)
    }
}
