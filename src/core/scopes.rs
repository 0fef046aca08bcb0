const PLACEHOLDER: &str = "{accountID}";

/// Organization-level permissions; enough to create new accounts and read
/// facilitator-level data.
const ORGANIZATION_SCOPES: [&str; 6] = [
    "/accounts.read",
    "/accounts.write",
    "/accounts/{accountID}/profile.read",
    "/fed.read",
    "/ping.read",
    "/profile-enrichment.read",
];

/// Entity-level permissions for operating on one account's sub-resources.
const ENTITY_SCOPES: [&str; 14] = [
    "/accounts.read",
    "/accounts.write",
    "/fed.read",
    "/profile-enrichment.read",
    "/accounts/{accountID}/bank-accounts.read",
    "/accounts/{accountID}/bank-accounts.write",
    "/accounts/{accountID}/capabilities.read",
    "/accounts/{accountID}/capabilities.write",
    "/accounts/{accountID}/cards.read",
    "/accounts/{accountID}/cards.write",
    "/accounts/{accountID}/profile.read",
    "/accounts/{accountID}/profile.write",
    "/accounts/{accountID}/representatives.read",
    "/accounts/{accountID}/representatives.write",
];

/// Builds the space-separated OAuth scope string. An absent id templates to
/// an empty segment; the provider rejects such a token request, so this is
/// not validated here.
pub fn resolve_scopes(account_id: Option<&str>, full: bool) -> String {
    let id = account_id.unwrap_or("");
    let table: &[&str] = if full {
        tracing::debug!("Resolving entity scopes for account {}", id);
        &ENTITY_SCOPES
    } else {
        tracing::debug!("Resolving organization scopes");
        &ORGANIZATION_SCOPES
    };

    table.join(" ").replace(PLACEHOLDER, id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_scope_counts_differ_between_modes() {
        let basic = resolve_scopes(None, false);
        let full = resolve_scopes(None, true);

        let basic: HashSet<&str> = basic.split(' ').collect();
        let full: HashSet<&str> = full.split(' ').collect();

        assert_eq!(basic.len(), 6);
        assert_eq!(full.len(), 14);
    }

    #[test]
    fn test_no_unresolved_placeholder_with_id() {
        for full in [false, true] {
            let scopes = resolve_scopes(Some("acct-123"), full);
            assert!(!scopes.contains(PLACEHOLDER), "scopes: {scopes}");
        }
    }

    #[test]
    fn test_id_is_templated_into_entity_scopes() {
        let scopes = resolve_scopes(Some("acct-123"), true);
        assert!(scopes.contains("/accounts/acct-123/bank-accounts.write"));
        assert!(scopes.contains("/accounts/acct-123/representatives.read"));
    }

    #[test]
    fn test_missing_id_yields_empty_segment() {
        // Accepted edge case: the malformed scope is sent as-is.
        let scopes = resolve_scopes(None, false);
        assert!(scopes.contains("/accounts//profile.read"));
    }
}
