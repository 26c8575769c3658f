//! API error type and its JSON response mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::auth::AuthError;
use crate::models::ValidationError;


/// Every failure a handler can return. The display text is what the
/// client sees in `{"error": ...}`.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(&'static str),

    #[error("Editor role required")]
    Forbidden,

    #[error("{0}")]
    NotFound(String),

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Internal error")]
    Internal(#[from] anyhow::Error),
}


impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}


impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingToken => ApiError::Unauthorized("Missing Bearer token"),
            _ => ApiError::Unauthorized("Invalid or expired token"),
        }
    }
}


impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if let ApiError::Internal(err) = &self {
            error!("Request failed: {err:#}");
        }

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (ApiError::BadRequest("bad".into()), StatusCode::BAD_REQUEST),
            (ApiError::Unauthorized("no"), StatusCode::UNAUTHORIZED),
            (ApiError::Forbidden, StatusCode::FORBIDDEN),
            (ApiError::NotFound("gone".into()), StatusCode::NOT_FOUND),
            (ApiError::Internal(anyhow::anyhow!("disk on fire")), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }

    #[test]
    fn test_internal_detail_is_hidden() {
        let err = ApiError::Internal(anyhow::anyhow!("secret path /var/db"));
        assert_eq!(err.to_string(), "Internal error");
    }

    #[test]
    fn test_auth_error_messages() {
        assert_eq!(ApiError::from(AuthError::MissingToken).to_string(), "Missing Bearer token");
        assert_eq!(ApiError::from(AuthError::Expired).to_string(), "Invalid or expired token");
        assert_eq!(ApiError::from(AuthError::BadSignature).to_string(), "Invalid or expired token");
    }
}
