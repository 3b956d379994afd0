//! The coarse capability gate.
//!
//! First line of defense on every protected route: does the caller's
//! token-carried permission set intersect the route's required list? This
//! runs before any resource is loaded, so it can never disclose whether a
//! specific resource exists.

use crate::error::AuthError;

/// Check a required permission list against a granted set.
///
/// OR semantics: any single match allows the request. An authenticated
/// caller whose set does not intersect fails with
/// [`AuthError::InsufficientPermissions`] — a different failure class from
/// a missing or invalid credential.
pub fn check_permissions(required: &[&str], granted: &[String]) -> Result<(), AuthError> {
    if required.is_empty() {
        return Ok(());
    }

    let allowed = required.iter().any(|p| granted.iter().any(|g| g == p));
    if allowed {
        Ok(())
    } else {
        Err(AuthError::InsufficientPermissions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn granted(perms: &[&str]) -> Vec<String> {
        perms.iter().map(|p| p.to_string()).collect()
    }

    #[test]
    fn any_single_match_allows() {
        let set = granted(&["group:read", "wishlist:read"]);
        assert!(check_permissions(&["group:write", "group:read"], &set).is_ok());
    }

    #[test]
    fn empty_granted_set_denies() {
        // The guest role carries no permissions at all.
        assert!(matches!(
            check_permissions(&["group:read"], &[]),
            Err(AuthError::InsufficientPermissions)
        ));
    }

    #[test]
    fn disjoint_sets_deny() {
        let set = granted(&["user:read"]);
        assert!(matches!(
            check_permissions(&["group:write"], &set),
            Err(AuthError::InsufficientPermissions)
        ));
    }

    #[test]
    fn empty_required_list_allows() {
        assert!(check_permissions(&[], &[]).is_ok());
    }
}
