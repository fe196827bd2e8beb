//! Allow-list guard applied before any command is executed.

/// Parses the comma-separated `ALLOWED_USERS` value. Entries that are not
/// valid user ids are skipped.
pub fn parse_allowed_users(raw: &str) -> Vec<i64> {
    raw.split(',')
        .filter_map(|entry| entry.trim().parse().ok())
        .collect()
}

/// An empty allow-list admits everyone.
pub fn is_allowed(user_id: i64, allowed: &[i64]) -> bool {
    allowed.is_empty() || allowed.contains(&user_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_list_admits_everyone() {
        assert!(is_allowed(42, &[]));
    }

    #[test]
    fn non_empty_list_admits_only_listed_ids() {
        let allowed = vec![1, 2];
        assert!(is_allowed(1, &allowed));
        assert!(!is_allowed(3, &allowed));
    }

    #[test]
    fn parses_comma_separated_ids_with_whitespace() {
        assert_eq!(parse_allowed_users(" 10, 20 ,abc,30"), vec![10, 20, 30]);
    }

    #[test]
    fn empty_value_parses_to_empty_list() {
        assert!(parse_allowed_users("").is_empty());
    }
}
