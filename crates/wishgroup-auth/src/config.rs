//! Authentication configuration.

use wishgroup_core::error::{WishgroupError, WishgroupResult};

/// Development-only signing secret. Refused in production.
const DEV_SECRET: &str = "wishgroup-dev-secret-do-not-deploy";

/// Token lifetime: 4 weeks.
const TOKEN_LIFETIME_SECS: u64 = 4 * 7 * 24 * 60 * 60;

/// Deployment environment, read from `WISHGROUP_ENV`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Test,
    Production,
}

impl Environment {
    fn parse(raw: &str) -> Self {
        match raw {
            "production" => Self::Production,
            "test" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Configuration for token issuance and verification.
///
/// The secret is resolved once at startup and is immutable for the process
/// lifetime.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// HMAC secret for JWT signing/verification.
    pub jwt_secret: String,
    /// Access token lifetime in seconds (default: 4 weeks).
    pub token_lifetime_secs: u64,
    pub environment: Environment,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: DEV_SECRET.into(),
            token_lifetime_secs: TOKEN_LIFETIME_SECS,
            environment: Environment::Development,
        }
    }
}

impl AuthConfig {
    /// Resolve configuration from the environment.
    ///
    /// Outside production a missing `JWT_SECRET` falls back to the fixed
    /// development secret, which is easier for debugging. In production an
    /// explicit secret is mandatory; refusing to start beats silently
    /// signing tokens with a guessable value.
    pub fn from_env() -> WishgroupResult<Self> {
        let environment = std::env::var("WISHGROUP_ENV")
            .map(|v| Environment::parse(&v))
            .unwrap_or_default();

        let jwt_secret = match std::env::var("JWT_SECRET") {
            Ok(secret) if !secret.is_empty() => secret,
            _ if environment == Environment::Production => {
                return Err(WishgroupError::Configuration(
                    "JWT_SECRET must be set when WISHGROUP_ENV=production".into(),
                ));
            }
            _ => DEV_SECRET.into(),
        };

        Ok(Self {
            jwt_secret,
            token_lifetime_secs: TOKEN_LIFETIME_SECS,
            environment,
        })
    }
}
