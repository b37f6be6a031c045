//! Field-presence checks shared by every record type.
//!
//! A required field is valid when it is present and, for text, non-empty
//! after trimming.

use crate::error::{DomainError, DomainResult};

/// Require a non-empty text field, returning it trimmed.
pub fn required_text(field: &str, value: Option<String>) -> DomainResult<String> {
    match value.map(|v| v.trim().to_string()) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(DomainError::validation(format!("{field} is required"))),
    }
}

/// Require an integer field.
pub fn required_int(field: &str, value: Option<i32>) -> DomainResult<i32> {
    value.ok_or_else(|| DomainError::validation(format!("{field} is required")))
}

/// Collect every missing field into one message, e.g.
/// `"title, year are required"`.
pub(crate) fn collect_missing(checks: &[(&str, bool)]) -> DomainResult<()> {
    let missing: Vec<&str> = checks
        .iter()
        .filter_map(|(name, present)| (!present).then_some(*name))
        .collect();

    match missing.as_slice() {
        [] => Ok(()),
        [one] => Err(DomainError::validation(format!("{one} is required"))),
        many => Err(DomainError::validation(format!("{} are required", many.join(", ")))),
    }
}

pub(crate) fn has_text(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.trim().is_empty())
}
