//! Wishgroup Auth — capability-token issuance/verification, identity
//! resolution, the coarse permission gate and the per-resource scope
//! policy.
//!
//! Everything here is either pure computation over a verified token or
//! generic over the repository traits in `wishgroup-core`; this crate has
//! no database or HTTP dependency.

pub mod capability;
pub mod config;
pub mod error;
pub mod identity;
pub mod policy;
pub mod token;

pub use capability::check_permissions;
pub use config::{AuthConfig, Environment};
pub use error::AuthError;
pub use identity::{ExternalIdentityProvider, ExternalProfile, IdentityResolver};
pub use policy::{Decision, Denial, GroupScope};
pub use token::{TokenClaims, TokenIdentity};
