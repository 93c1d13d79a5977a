/// Last non-empty segment of a page path, which is the auction id on detail
/// pages (`/auction/42` -> `42`). Tolerates a trailing slash.
pub fn auction_id_from_path(path: &str) -> Option<&str> {
    path.trim_end_matches('/')
        .rsplit('/')
        .find(|segment| !segment.is_empty())
}

/// Whether a path is an auction-detail view, the first half of the
/// auto-refresh activation condition.
pub fn is_auction_detail_path(path: &str) -> bool {
    path.contains("/auction/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_last_segment() {
        assert_eq!(auction_id_from_path("/auction/42"), Some("42"));
        assert_eq!(auction_id_from_path("/auction/42/"), Some("42"));
        assert_eq!(auction_id_from_path("/auction/abc-123"), Some("abc-123"));
        assert_eq!(auction_id_from_path("/"), None);
        assert_eq!(auction_id_from_path(""), None);
    }

    #[test]
    fn detail_path_detection() {
        assert!(is_auction_detail_path("/auction/42"));
        assert!(!is_auction_detail_path("/auctions"));
        assert!(!is_auction_detail_path("/"));
        assert!(!is_auction_detail_path("/auction"));
    }
}
