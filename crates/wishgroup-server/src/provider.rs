//! Federated identity provider backed by an HTTP userinfo endpoint.
//!
//! The OAuth handshake itself happens between the client and the social
//! provider; this side only exchanges the resulting access token for a
//! verified profile.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::warn;
use wishgroup_auth::{ExternalIdentityProvider, ExternalProfile};
use wishgroup_core::error::{WishgroupError, WishgroupResult};

/// Calls a configured userinfo endpoint with the caller-supplied access
/// token and maps the response to an [`ExternalProfile`].
pub struct HttpIdentityProvider {
    endpoint: String,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserInfoResponse {
    email: String,
    first_name: String,
    last_name: String,
    display_name: String,
}

impl HttpIdentityProvider {
    pub fn new(endpoint: String) -> Self {
        Self {
            endpoint,
            client: reqwest::Client::new(),
        }
    }

    /// Endpoint from `WISHGROUP_IDENTITY_ENDPOINT`, if configured.
    pub fn from_env() -> Option<Self> {
        std::env::var("WISHGROUP_IDENTITY_ENDPOINT")
            .ok()
            .filter(|v| !v.is_empty())
            .map(Self::new)
    }
}

#[async_trait]
impl ExternalIdentityProvider for HttpIdentityProvider {
    async fn verify(&self, access_token: &str) -> WishgroupResult<ExternalProfile> {
        let response = self
            .client
            .get(&self.endpoint)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "identity provider unreachable");
                WishgroupError::bad_request("Could not verify access token")
            })?;

        if !response.status().is_success() {
            return Err(WishgroupError::bad_request("Invalid access token"));
        }

        let info: UserInfoResponse = response
            .json()
            .await
            .map_err(|_| WishgroupError::bad_request("Invalid access token"))?;

        Ok(ExternalProfile {
            email: info.email,
            first_name: info.first_name,
            last_name: info.last_name,
            display_name: info.display_name,
        })
    }
}

/// Provider used when no endpoint is configured: every login attempt is
/// rejected instead of silently accepting unverified identities.
pub struct DisabledIdentityProvider;

#[async_trait]
impl ExternalIdentityProvider for DisabledIdentityProvider {
    async fn verify(&self, _access_token: &str) -> WishgroupResult<ExternalProfile> {
        Err(WishgroupError::bad_request(
            "Federated login is not configured",
        ))
    }
}
