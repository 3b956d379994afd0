//! Capability-token issuance/verification and bearer-header extraction.
//!
//! Tokens are stateless: the embedded identity snapshot and permission
//! list let the capability gate decide without touching the identity
//! store. The snapshot may go stale relative to the live role until the
//! token expires; resource-scope checks re-query membership live.

use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use wishgroup_core::models::role::Role;
use wishgroup_core::models::user::User;

use crate::config::AuthConfig;
use crate::error::AuthError;

/// The identity snapshot embedded in every token, mirroring the user's
/// public wire representation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenIdentity {
    pub uuid: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub display_name: String,
    pub email: String,
    pub role_uuid: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&User> for TokenIdentity {
    fn from(user: &User) -> Self {
        Self {
            uuid: user.id,
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            display_name: user.display_name.clone(),
            email: user.email.clone(),
            role_uuid: user.role_id,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// JWT claims: identity snapshot, resolved permission list and role
/// name(s), issued-at and expiry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    pub data: TokenIdentity,
    pub permissions: Vec<String>,
    pub roles: Vec<String>,
    pub iat: i64,
    pub exp: i64,
}

/// Issue a signed HS256 token for a user with its resolved role.
///
/// The caller passes a role it already fetched; a user whose role cannot
/// be resolved is a seed-data bug surfaced upstream.
pub fn issue(user: &User, role: &Role, config: &AuthConfig) -> Result<String, AuthError> {
    let now = Utc::now().timestamp();
    let claims = TokenClaims {
        data: TokenIdentity::from(user),
        permissions: role.permissions.clone(),
        roles: vec![role.name.clone()],
        iat: now,
        exp: now + config.token_lifetime_secs as i64,
    };

    let key = EncodingKey::from_secret(config.jwt_secret.as_bytes());
    jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &key)
        .map_err(|e| AuthError::Crypto(format!("JWT encode: {e}")))
}

/// Decode and verify a token's signature and expiry.
///
/// The failure reason distinguishes expired from malformed from
/// bad-signature; the signing secret never appears in errors.
pub fn verify(raw: &str, config: &AuthConfig) -> Result<TokenClaims, AuthError> {
    let key = DecodingKey::from_secret(config.jwt_secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;
    validation.set_required_spec_claims(&["exp"]);

    jsonwebtoken::decode::<TokenClaims>(raw, &key, &validation)
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            jsonwebtoken::errors::ErrorKind::InvalidSignature => AuthError::InvalidSignature,
            _ => AuthError::TokenMalformed,
        })
}

/// Extract the raw token from an `Authorization: Bearer <token>` header
/// value. The scheme is matched case-insensitively.
pub fn extract_bearer(header_value: &str) -> Result<&str, AuthError> {
    let (scheme, token) = header_value
        .split_once(' ')
        .ok_or(AuthError::NoAuthToken)?;

    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
        return Err(AuthError::NoAuthToken);
    }

    Ok(token)
}

/// Generate an invitation token: 48 random bytes, hex-encoded.
pub fn generate_invitation_token() -> String {
    let mut bytes = [0u8; 48];
    rand::rng().fill(&mut bytes[..]);
    hex::encode(bytes)
}
