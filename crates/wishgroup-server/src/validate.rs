//! Thin field-shape validation and the mandatory-field check for
//! full-replace updates.
//!
//! The interesting authorization work lives in the policy layer; this
//! module only guards lengths, ranges, email shape and presence, and
//! produces the fixed `{property, message}` entries.

use wishgroup_core::error::{FieldError, WishgroupError};

use crate::error::ApiError;

/// Accumulates field-level problems so one response can report them all.
#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<FieldError>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Character-length bounds, inclusive.
    pub fn len(&mut self, property: &str, value: &str, min: usize, max: usize) -> &mut Self {
        let count = value.chars().count();
        if count < min || count > max {
            self.errors.push(FieldError::new(
                property,
                format!("Validation len on {property} failed"),
            ));
        }
        self
    }

    /// Minimal email shape: one `@` with a non-empty local part and a
    /// domain containing a dot.
    pub fn email(&mut self, property: &str, value: &str) -> &mut Self {
        let shaped = match value.split_once('@') {
            Some((local, domain)) => {
                !local.is_empty() && domain.contains('.') && !domain.starts_with('.')
            }
            None => false,
        };
        if !shaped || value.chars().count() > 255 {
            self.errors.push(FieldError::new(
                property,
                format!("Validation isEmail on {property} failed"),
            ));
        }
        self
    }

    /// Integer bounds, inclusive.
    pub fn int_range(&mut self, property: &str, value: i64, min: i64, max: i64) -> &mut Self {
        if value < min {
            self.errors.push(FieldError::new(
                property,
                format!("Validation min on {property} failed"),
            ));
        } else if value > max {
            self.errors.push(FieldError::new(
                property,
                format!("Validation max on {property} failed"),
            ));
        }
        self
    }

    /// Record an arbitrary field problem (e.g. an unknown foreign key).
    pub fn problem(&mut self, property: &str, message: &str) -> &mut Self {
        self.errors.push(FieldError::new(property, message));
        self
    }

    pub fn finish(self) -> Result<(), ApiError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(WishgroupError::validation(self.errors).into())
        }
    }
}

/// Presence check for creation: absent mandatory fields come back as
/// `<Entity>.<field> cannot be null` under a "Validation error" body.
pub fn require_for_create(
    entity: &str,
    fields: &[(&str, bool)],
) -> Result<(), ApiError> {
    let errors = null_errors(entity, fields);
    if errors.is_empty() {
        Ok(())
    } else {
        Err(WishgroupError::validation(errors).into())
    }
}

/// Presence check for full replace (PUT): every non-excluded mandatory
/// field must be present. PATCH never runs this check.
pub fn require_for_replace(
    entity: &str,
    fields: &[(&str, bool)],
) -> Result<(), ApiError> {
    let errors = null_errors(entity, fields);
    if errors.is_empty() {
        Ok(())
    } else {
        Err(WishgroupError::missing_properties(errors).into())
    }
}

fn null_errors(entity: &str, fields: &[(&str, bool)]) -> Vec<FieldError> {
    fields
        .iter()
        .filter(|(_, present)| !present)
        .map(|(name, _)| FieldError::new(*name, format!("{entity}.{name} cannot be null")))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use wishgroup_core::error::WishgroupError;

    #[test]
    fn length_violations_accumulate() {
        let mut v = Validator::new();
        v.len("icon", &"x".repeat(300), 1, 255);
        v.len("name", &"y".repeat(50), 1, 48);
        let err = v.finish().unwrap_err();
        match err.0 {
            WishgroupError::BadRequest { message, errors } => {
                assert_eq!(message, "Validation error");
                assert_eq!(errors[0].message, "Validation len on icon failed");
                assert_eq!(errors[1].property, "name");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn email_shape_is_checked() {
        let mut ok = Validator::new();
        ok.email("email", "someone@example.com");
        assert!(ok.finish().is_ok());

        let mut bad = Validator::new();
        bad.email("email", "not-an-email");
        assert!(bad.finish().is_err());
    }

    #[test]
    fn rank_bounds_name_the_violated_rule() {
        let mut low = Validator::new();
        low.int_range("rank", 0, 1, 255);
        match low.finish().unwrap_err().0 {
            WishgroupError::BadRequest { errors, .. } => {
                assert_eq!(errors[0].message, "Validation min on rank failed");
            }
            other => panic!("unexpected: {other:?}"),
        }

        let mut high = Validator::new();
        high.int_range("rank", 300, 1, 255);
        match high.finish().unwrap_err().0 {
            WishgroupError::BadRequest { errors, .. } => {
                assert_eq!(errors[0].message, "Validation max on rank failed");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn replace_check_lists_each_missing_field() {
        let err = require_for_replace("Group", &[("name", false), ("icon", true)]).unwrap_err();
        match err.0 {
            WishgroupError::BadRequest { message, errors } => {
                assert_eq!(message, "Missing properties in request");
                assert_eq!(errors.len(), 1);
                assert_eq!(errors[0].message, "Group.name cannot be null");
                assert_eq!(errors[0].property, "name");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }
}
