//! Authentication and authorization error types.

use thiserror::Error;
use wishgroup_core::error::WishgroupError;

#[derive(Debug, Error)]
pub enum AuthError {
    /// Authorization header absent, not bearer-shaped, or empty.
    #[error("No auth token")]
    NoAuthToken,

    #[error("jwt expired")]
    TokenExpired,

    #[error("jwt malformed")]
    TokenMalformed,

    #[error("invalid signature")]
    InvalidSignature,

    /// The uuid embedded in a verified token no longer resolves to a live
    /// user (deleted after issuance).
    #[error("Could not find user in token")]
    UnknownUser,

    /// Authenticated, but the token's permission set does not intersect
    /// the route's required list.
    #[error("Forbidden")]
    InsufficientPermissions,

    #[error("cryptography error: {0}")]
    Crypto(String),
}

impl From<AuthError> for WishgroupError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::NoAuthToken
            | AuthError::TokenExpired
            | AuthError::TokenMalformed
            | AuthError::InvalidSignature
            | AuthError::UnknownUser => WishgroupError::unauthorized_with(err.to_string()),
            AuthError::InsufficientPermissions => WishgroupError::forbidden(),
            AuthError::Crypto(msg) => WishgroupError::application(msg),
        }
    }
}
