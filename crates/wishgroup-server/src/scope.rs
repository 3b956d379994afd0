//! Glue between loaded resources, live scope facts and the pure policy.

use std::fmt::Display;

use uuid::Uuid;
use wishgroup_auth::policy::{Decision, Denial};
use wishgroup_core::error::WishgroupError;

use crate::error::ApiError;

/// Validate a caller-supplied resource id before it reaches a query.
///
/// A malformed id gets the same 404 class as a nonexistent one, so the
/// two cases are indistinguishable to the caller.
pub fn parse_resource_uuid(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| WishgroupError::invalid_uuid(raw).into())
}

/// Map a policy decision onto the error taxonomy, echoing the id the
/// hidden-not-found answer must carry.
pub fn ensure_allowed(decision: Decision, uuid: impl Display) -> Result<(), ApiError> {
    match decision {
        Decision::Allow => Ok(()),
        Decision::Deny(Denial::HiddenNotFound) => {
            Err(WishgroupError::resource_not_found(uuid).into())
        }
        Decision::Deny(Denial::Unauthorized) => Err(WishgroupError::unauthorized().into()),
        Decision::Deny(Denial::BadRequest) => {
            Err(WishgroupError::bad_request("Bad request").into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wishgroup_auth::policy;
    use wishgroup_core::repository::GroupScope;

    #[test]
    fn malformed_uuid_is_a_not_found() {
        let err = parse_resource_uuid("aabbcc").unwrap_err();
        assert_eq!(err.0.status(), 404);
        assert_eq!(err.0.to_string(), "Invalid format UUID: aabbcc");
    }

    #[test]
    fn hidden_denial_echoes_the_requested_id() {
        let scope = GroupScope {
            exists: true,
            is_member: false,
            is_admin: false,
        };
        let id = "43bbb558-8fce-43d7-9e88-faa1581fd3ee";
        let err = ensure_allowed(policy::read_group_resource(scope), id).unwrap_err();
        assert_eq!(
            err.0.to_string(),
            format!("Resource not found with UUID: {id}")
        );
    }
}
