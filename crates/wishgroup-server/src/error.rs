//! The error responder: the single place internal failures become
//! client-visible bodies.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use tracing::error;
use wishgroup_auth::AuthError;
use wishgroup_core::error::{FieldError, WishgroupError};

/// The fixed client-visible error shape.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub message: String,
    pub name: &'static str,
    pub status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FieldError>>,
}

/// Newtype so handlers can `?` any [`WishgroupError`] straight into a
/// response.
#[derive(Debug)]
pub struct ApiError(pub WishgroupError);

impl From<WishgroupError> for ApiError {
    fn from(err: WishgroupError) -> Self {
        Self(err)
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let err = self.0;

        // Full detail for operators; the client body never carries
        // internals such as query text or seed-data specifics.
        let (message, errors) = match &err {
            WishgroupError::Application { message } => {
                error!(detail = %message, "internal error");
                ("Something went wrong. Please try again".to_string(), None)
            }
            WishgroupError::Database(detail) | WishgroupError::Configuration(detail) => {
                error!(detail = %detail, "internal error");
                ("Something went wrong. Please try again".to_string(), None)
            }
            WishgroupError::BadRequest { message, errors } => {
                (message.clone(), Some(errors.clone()))
            }
            other => (other.to_string(), None),
        };

        let status = err.status();
        let body = ErrorBody {
            message,
            name: err.name(),
            status,
            errors,
        };

        (
            StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            Json(body),
        )
            .into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
