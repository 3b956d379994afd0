//! Error types for the wishgroup system.
//!
//! The first group of variants is the fixed client-visible taxonomy; every
//! failure a handler can produce is funneled into one of them. `Database`
//! and `Configuration` are internal: the HTTP responder logs them in full
//! and presents a generic `ApplicationError` body instead.

use serde::Serialize;
use thiserror::Error;

/// A single field-level problem inside a [`WishgroupError::BadRequest`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub message: String,
    pub property: String,
}

impl FieldError {
    pub fn new(property: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            property: property.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum WishgroupError {
    /// Missing, malformed or expired credential — or a denied mutation on a
    /// resource the caller already knows exists.
    #[error("{message}")]
    Unauthorized { message: String },

    /// Authenticated, valid credential, but the permission set does not
    /// cover the route.
    #[error("{message}")]
    Forbidden { message: String },

    /// Structurally invalid input; carries one entry per offending field.
    #[error("{message}")]
    BadRequest {
        message: String,
        errors: Vec<FieldError>,
    },

    /// Nonexistent id, malformed id, or existence deliberately hidden.
    #[error("{message}")]
    NotFound { message: String },

    /// No route matched the request path.
    #[error("Endpoint not found")]
    EndpointNotFound,

    /// Internal invariant violated (e.g. expected seed data missing).
    #[error("{message}")]
    Application { message: String },

    #[error("Database error: {0}")]
    Database(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl WishgroupError {
    /// 401 with the default message.
    pub fn unauthorized() -> Self {
        Self::Unauthorized {
            message: "Unauthorized".into(),
        }
    }

    pub fn unauthorized_with(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    /// 403 with the default message.
    pub fn forbidden() -> Self {
        Self::Forbidden {
            message: "Forbidden".into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
            errors: Vec::new(),
        }
    }

    /// 400 "Validation error" carrying per-field problems.
    pub fn validation(errors: Vec<FieldError>) -> Self {
        Self::BadRequest {
            message: "Validation error".into(),
            errors,
        }
    }

    /// 400 for a PUT body that omits mandatory fields.
    pub fn missing_properties(errors: Vec<FieldError>) -> Self {
        Self::BadRequest {
            message: "Missing properties in request".into(),
            errors,
        }
    }

    /// 404 for an id that resolves to nothing — or that the caller is not
    /// allowed to know resolves to something.
    pub fn resource_not_found(uuid: impl std::fmt::Display) -> Self {
        Self::NotFound {
            message: format!("Resource not found with UUID: {uuid}"),
        }
    }

    /// 404 for a path id that is not a well-formed UUID. Deliberately the
    /// same class as [`resource_not_found`](Self::resource_not_found) so the
    /// two are indistinguishable to callers.
    pub fn invalid_uuid(raw: &str) -> Self {
        Self::NotFound {
            message: format!("Invalid format UUID: {raw}"),
        }
    }

    pub fn application(message: impl Into<String>) -> Self {
        Self::Application {
            message: message.into(),
        }
    }

    /// Client-visible error name, mirrored in the response body.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Unauthorized { .. } => "UnauthorizedError",
            Self::Forbidden { .. } => "ForbiddenError",
            Self::BadRequest { .. } => "BadRequestError",
            Self::NotFound { .. } => "ResourceNotFoundError",
            Self::EndpointNotFound => "EndpointNotFoundError",
            Self::Application { .. } | Self::Database(_) | Self::Configuration(_) => {
                "ApplicationError"
            }
        }
    }

    /// HTTP status code for the client-visible error.
    pub fn status(&self) -> u16 {
        match self {
            Self::Unauthorized { .. } => 401,
            Self::Forbidden { .. } => 403,
            Self::BadRequest { .. } => 400,
            Self::NotFound { .. } | Self::EndpointNotFound => 404,
            Self::Application { .. } | Self::Database(_) | Self::Configuration(_) => 500,
        }
    }
}

pub type WishgroupResult<T> = Result<T, WishgroupError>;
