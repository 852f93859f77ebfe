//! Input validation helpers.

use std::sync::OnceLock;

use regex::Regex;

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

/// Basic address-syntax check: one `@`, no whitespace, a dot in the domain.
/// Deliberately loose; the SMTP server is the final authority.
pub fn is_valid_email(address: &str) -> bool {
    let re = EMAIL_RE
        .get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("static email regex"));
    re.is_match(address.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_addresses() {
        assert!(is_valid_email("buyer@example.com"));
        assert!(is_valid_email("  padded@example.org  "));
        assert!(is_valid_email("first.last+tag@sub.example.mx"));
    }

    #[test]
    fn rejects_malformed_addresses() {
        assert!(!is_valid_email(""));
        assert!(!is_valid_email("no-at-sign"));
        assert!(!is_valid_email("spaces in@example.com"));
        assert!(!is_valid_email("missing@dot"));
        assert!(!is_valid_email("two@@example.com"));
    }
}
