//! Resource-scope policy evaluation.
//!
//! Pure decision functions over pre-loaded facts: the caller's identity
//! and a [`GroupScope`] queried live for the request. No database access
//! happens during evaluation, which keeps every rule trivially testable.
//!
//! The central disclosure rule: a caller without membership must receive
//! the same not-found answer a nonexistent id produces, because a 401 on
//! a valid id would confirm the resource exists. A caller who is a member
//! but lacks the admin/creator requirement for a mutation gets a plain
//! 401 — membership already confirms existence to them.

use uuid::Uuid;

pub use wishgroup_core::repository::GroupScope;

/// Why a request was denied. The HTTP layer maps this to the error
/// taxonomy together with the id it may need to echo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Denial {
    /// Serialize as the not-found answer a nonexistent id produces.
    HiddenNotFound,
    /// Plain 401: the caller already knows the resource exists.
    Unauthorized,
    /// Structural rejection of the supplied group reference.
    BadRequest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny(Denial),
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow)
    }
}

/// Read access to a group or one of its scoped resources: members and the
/// group admin may read; everyone else learns nothing.
pub fn read_group_resource(scope: GroupScope) -> Decision {
    if !scope.exists {
        return Decision::Deny(Denial::HiddenNotFound);
    }
    if scope.is_member || scope.is_admin {
        Decision::Allow
    } else {
        Decision::Deny(Denial::HiddenNotFound)
    }
}

/// Management access (group update/delete, invitation mutations): admin
/// only. A member without admin gets 401; a non-member gets the hidden
/// not-found.
pub fn manage_group_resource(scope: GroupScope) -> Decision {
    if !scope.exists {
        return Decision::Deny(Denial::HiddenNotFound);
    }
    if scope.is_admin {
        Decision::Allow
    } else if scope.is_member {
        Decision::Deny(Denial::Unauthorized)
    } else {
        Decision::Deny(Denial::HiddenNotFound)
    }
}

/// Creator-only mutation (wishlist update/delete). Strictly narrower than
/// membership: any member may read, only the creator may mutate.
pub fn mutate_as_creator(scope: GroupScope, creator_id: Uuid, caller_id: Uuid) -> Decision {
    if !scope.exists {
        return Decision::Deny(Denial::HiddenNotFound);
    }
    if caller_id == creator_id {
        Decision::Allow
    } else if scope.is_member || scope.is_admin {
        Decision::Deny(Denial::Unauthorized)
    } else {
        Decision::Deny(Denial::HiddenNotFound)
    }
}

/// Creating a resource inside a group (wishlist items): the caller must be
/// a member of the target group. The group id arrives in the request body,
/// so the rejection is a structural 400 on that field rather than a 404 —
/// which still confirms nothing about the group's existence.
pub fn create_in_group(scope: GroupScope) -> Decision {
    if scope.exists && scope.is_member {
        Decision::Allow
    } else {
        Decision::Deny(Denial::BadRequest)
    }
}
