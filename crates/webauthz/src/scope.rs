//! Scope parsing and subset checks.

use std::collections::BTreeSet;

use crate::AuthorizationResult;

/// Split a space-delimited scope string into a set, ignoring empty names.
pub fn parse_scope(scope: &str) -> BTreeSet<String> {
    scope.split_whitespace().map(str::to_string).collect()
}

/// Whether every scope in the check list is granted.
///
/// The check list is `requested` when non-empty, otherwise `required` (the
/// list bound to the route). An empty check list is vacuously permitted,
/// whatever the result's kind. Non-valid results grant nothing, so any
/// non-empty check list fails for them.
///
/// Use `||` across several calls to express alternatives.
pub fn is_permitted(result: &AuthorizationResult, required: &[String], requested: &[&str]) -> bool {
    let granted = result.scope();
    if requested.is_empty() {
        required.iter().all(|name| granted.contains(name.as_str()))
    } else {
        requested.iter().all(|name| granted.contains(*name))
    }
}
