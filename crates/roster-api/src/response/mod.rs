//! Response types and error handling for the web surface
//!
//! Errors render as JSON `{error:{code,message}}`, except the two session
//! outcomes: a missing session redirects to `/login`, and a revoked one
//! clears the cookie and answers 403.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use axum_extra::extract::CookieJar;
use roster_common::AppError;
use roster_service::ServiceError;
use serde::Serialize;
use thiserror::Error;
use tracing::error;
use validator::ValidationErrors;

use crate::extractors::removal_cookie;

/// Where unauthenticated visitors are sent
pub const LOGIN_PATH: &str = "/login";

/// Shown when an identity may not use the dashboard
pub const ACCESS_DENIED_MESSAGE: &str =
    "You are not allowed to use this dashboard. Ask an administrator for a login role.";

/// API error type for consistent error responses
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    App(#[from] AppError),

    #[error("{0}")]
    Service(#[from] ServiceError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    /// No usable session on a gated route
    #[error("Login required")]
    LoginRequired,

    /// The session's identity may no longer enter; the cookie is cleared
    #[error("Access revoked")]
    AccessRevoked,

    #[error("Login provider error: {0}")]
    OAuth(String),

    #[error("Internal server error")]
    Internal(#[source] anyhow::Error),
}

impl ApiError {
    /// Get HTTP status code for this error
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::App(e) => {
                StatusCode::from_u16(e.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            }
            Self::Service(e) => {
                StatusCode::from_u16(e.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            }
            Self::Validation(_) | Self::InvalidBody(_) => StatusCode::BAD_REQUEST,
            Self::LoginRequired => StatusCode::SEE_OTHER,
            Self::AccessRevoked => StatusCode::FORBIDDEN,
            Self::OAuth(_) => StatusCode::BAD_GATEWAY,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get error code for API responses
    #[must_use]
    pub fn error_code(&self) -> &str {
        match self {
            Self::App(e) => e.error_code(),
            Self::Service(e) => e.error_code(),
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::InvalidBody(_) => "INVALID_BODY",
            Self::LoginRequired => "LOGIN_REQUIRED",
            Self::AccessRevoked => "ACCESS_REVOKED",
            Self::OAuth(_) => "OAUTH_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Create an internal error from any error
    pub fn internal(err: impl Into<anyhow::Error>) -> Self {
        Self::Internal(err.into())
    }

    fn message(&self) -> String {
        match self {
            // Denials carry the service's user-facing wording
            Self::Service(e) if e.status_code() < 500 => e.user_message(),
            Self::AccessRevoked => ACCESS_DENIED_MESSAGE.to_string(),
            _ => self.to_string(),
        }
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

/// Error detail for API responses
#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if matches!(self, Self::LoginRequired) {
            return Redirect::to(LOGIN_PATH).into_response();
        }

        let status = self.status_code();

        if status.is_server_error() {
            error!(error = ?self, "Server error occurred");
        }

        let details = if let Self::Validation(errors) = &self {
            Some(serde_json::to_value(errors).unwrap_or_default())
        } else {
            None
        };

        let body = Json(ErrorBody {
            error: ErrorDetail {
                code: self.error_code().to_string(),
                message: self.message(),
                details,
            },
        });

        if matches!(self, Self::AccessRevoked) {
            let jar = CookieJar::new().add(removal_cookie());
            return (status, jar, body).into_response();
        }

        (status, body).into_response()
    }
}

/// Type alias for API results
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header;

    #[test]
    fn test_api_error_status_codes() {
        assert_eq!(ApiError::AccessRevoked.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(
            ApiError::Service(ServiceError::permission_denied("ADMINISTRATOR")).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ApiError::InvalidBody("x".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_login_required_redirects() {
        let response = ApiError::LoginRequired.into_response();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], LOGIN_PATH);
    }

    #[test]
    fn test_access_revoked_clears_cookie() {
        let response = ApiError::AccessRevoked.into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        let cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
        assert!(cookie.starts_with("roster_session="));
        assert!(cookie.contains("Max-Age=0"));
    }

    #[test]
    fn test_permission_denied_message() {
        let err = ApiError::Service(ServiceError::permission_denied("ADMINISTRATOR"));
        assert_eq!(err.message(), "You do not have permission to do that.");
        assert_eq!(err.error_code(), "MISSING_PERMISSIONS");
    }
}
