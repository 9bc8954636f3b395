//! Property-based tests for scope checks and header classification.

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use crate::scope::is_permitted;
    use crate::{AuthorizationResult, Credential, TokenAttributes};
    use proptest::prelude::*;

    fn granted(names: &[String]) -> AuthorizationResult {
        AuthorizationResult::valid(TokenAttributes {
            scope: Some(names.join(" ")),
            ..Default::default()
        })
    }

    proptest! {
        #[test]
        fn test_any_subset_of_granted_is_permitted(
            names in proptest::collection::vec("[a-z]{1,8}", 1..6),
            take in 0usize..6,
        ) {
            let result = granted(&names);
            let subset: Vec<&str> = names.iter().take(take).map(String::as_str).collect();
            prop_assert!(is_permitted(&result, &[], &subset));
        }

        #[test]
        fn test_ungranted_scope_is_never_permitted(
            names in proptest::collection::vec("[a-z]{1,8}", 0..6),
        ) {
            let result = granted(&names);
            // Upper-case names are never produced by the strategy above.
            prop_assert!(!is_permitted(&result, &[], &["ADMIN"]));
        }

        #[test]
        fn test_denied_results_never_permit_non_empty(
            name in "[a-z]{1,8}",
            which in 0u8..4,
        ) {
            let result = match which {
                0 => AuthorizationResult::absent(),
                1 => AuthorizationResult::malformed_scheme(),
                2 => AuthorizationResult::invalid(),
                _ => AuthorizationResult::expired(0),
            };
            prop_assert!(!is_permitted(&result, &[name.clone()], &[]));
            prop_assert!(!is_permitted(&result, &[], &[name.as_str()]));
        }

        #[test]
        fn test_bearer_token_is_trimmed(
            token in "[A-Za-z0-9._~+/-]{1,32}",
            lead in " {0,4}",
            trail in " {0,4}",
        ) {
            let header = format!("Bearer {lead}{token}{trail}");
            prop_assert_eq!(Credential::classify(Some(&header)), Credential::Bearer(token));
        }

        #[test]
        fn test_non_bearer_schemes_are_malformed(scheme in "(Basic|Digest|DPoP|Negotiate) [a-z]{0,8}") {
            prop_assert_eq!(Credential::classify(Some(&scheme)), Credential::MalformedScheme);
        }
    }
}
