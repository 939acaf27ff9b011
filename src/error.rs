use axum::{Json, http::StatusCode, response::IntoResponse, response::Response};
use serde_json::json;
use thiserror::Error;

/// ApiError
///
/// The single error taxonomy for the HTTP surface. Every failure a guard or
/// handler can produce maps to one variant, and every variant renders as a
/// `{"message": ...}` JSON body with its status code, so clients see a uniform
/// error shape across the API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// No `Authorization` header was supplied on a guarded route.
    #[error("Unauthorized")]
    Unauthenticated,

    /// A bearer token was supplied but failed verification (malformed,
    /// expired, or bad signature).
    #[error("Forbidden")]
    InvalidCredential,

    /// The caller is authenticated but lacks the admin role.
    #[error("Forbidden Access")]
    Forbidden,

    /// The authenticated identity does not match the `:email` path scope.
    #[error("Unauthorized Request")]
    UnauthorizedRequest,

    /// The requested document does not exist.
    #[error("Not Found")]
    NotFound,

    /// A persistence operation failed. Surfaced as a 500 rather than being
    /// swallowed into a 200 body.
    #[error("Internal Server Error")]
    Database(#[from] sqlx::Error),

    /// The payment collaborator rejected or failed the intent creation.
    #[error("Payment provider error")]
    Payment(String),

    /// Any other failure inside a handler (e.g. token signing).
    #[error("Internal Server Error")]
    Internal(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthenticated | ApiError::UnauthorizedRequest => StatusCode::UNAUTHORIZED,
            ApiError::InvalidCredential | ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Database(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Payment(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Database(ref e) = self {
            tracing::error!("database error: {:?}", e);
        }
        if let ApiError::Payment(ref e) = self {
            tracing::error!("payment error: {}", e);
        }
        if let ApiError::Internal(ref e) = self {
            tracing::error!("internal error: {}", e);
        }
        let body = Json(json!({ "message": self.to_string() }));
        (self.status(), body).into_response()
    }
}
