//! Client-side ticket-URL gate.
//!
//! A submit control must stay disabled while the input fails this
//! pattern; nothing that fails it may reach the network.

use std::sync::OnceLock;

use regex::Regex;

/// Anchored: a Trello card URL whose path is exactly
/// `/c/<8 alphanumerics>/<single segment>`. The segment admits no
/// whitespace, so "a URL followed by more text" never slips through.
const TICKET_URL_PATTERN: &str = r"^https?://trello\.com/c/([0-9A-Za-z]{8})/([^/\s]+)$";

pub fn ticket_url_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(TICKET_URL_PATTERN).expect("ticket URL pattern is valid"))
}

pub fn is_valid_ticket_url(url: &str) -> bool {
    ticket_url_regex().is_match(url)
}

/// The 8-character card id, if the URL passes the gate.
pub fn extract_card_id(url: &str) -> Option<&str> {
    ticket_url_regex()
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_canonical_card_urls() {
        assert!(is_valid_ticket_url("https://trello.com/c/aBcD1234/my-card"));
        assert!(is_valid_ticket_url("http://trello.com/c/00000000/x"));
    }

    #[test]
    fn rejects_wrong_id_lengths() {
        assert!(!is_valid_ticket_url("https://trello.com/c/aBcD123/title"));
        assert!(!is_valid_ticket_url("https://trello.com/c/aBcD12345/title"));
    }

    #[test]
    fn rejects_extra_path_segments() {
        assert!(!is_valid_ticket_url(
            "https://trello.com/c/aBcD1234/title/extra"
        ));
        assert!(!is_valid_ticket_url("https://trello.com/c/aBcD1234/"));
        assert!(!is_valid_ticket_url("https://trello.com/c/aBcD1234"));
    }

    #[test]
    fn pattern_is_anchored_both_ends() {
        assert!(!is_valid_ticket_url(
            "see https://trello.com/c/aBcD1234/title"
        ));
        assert!(!is_valid_ticket_url(
            "https://trello.com/c/aBcD1234/title and more"
        ));
    }

    #[test]
    fn rejects_whitespace_inside_the_title_segment() {
        assert!(!is_valid_ticket_url("https://trello.com/c/aBcD1234/my card"));
        assert!(!is_valid_ticket_url(
            "https://trello.com/c/aBcD1234/title\tmore"
        ));
    }

    #[test]
    fn rejects_other_hosts_and_schemes() {
        assert!(!is_valid_ticket_url("https://example.com/c/aBcD1234/title"));
        assert!(!is_valid_ticket_url("ftp://trello.com/c/aBcD1234/title"));
        assert!(!is_valid_ticket_url("trello.com/c/aBcD1234/title"));
    }

    #[test]
    fn rejects_non_alphanumeric_ids() {
        assert!(!is_valid_ticket_url("https://trello.com/c/aBcD-234/title"));
    }

    #[test]
    fn card_id_is_extracted_from_valid_urls_only() {
        assert_eq!(
            extract_card_id("https://trello.com/c/aBcD1234/my-card"),
            Some("aBcD1234")
        );
        assert_eq!(extract_card_id("https://trello.com/b/aBcD1234/board"), None);
    }
}
