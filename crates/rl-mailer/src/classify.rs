//! Failure classification for delivery attempts.
//!
//! An error is transient when its text matches the connection/timeout/auth/
//! DNS-class allowlist below; transient failures are the only ones retried.

/// Markers matched case-insensitively against the error text. The upper
/// block lists wire-level error codes as relays and proxies report them;
/// the lower block covers how the SMTP stack spells the same conditions.
const TRANSIENT_MARKERS: &[&str] = &[
    "ETIMEDOUT",
    "ECONNRESET",
    "ECONNECTION",
    "EHOSTUNREACH",
    "ESOCKET",
    "EAI_AGAIN",
    "ETIMEOUT",
    "EAUTH",
    "ENOTFOUND",
    "TIMEOUT",
    "TIMED OUT",
    "CONNECTION",
    "RESET",
    "UNREACHABLE",
    "AUTH",
    "DNS",
    "NETWORK",
];

/// Whether an error message describes a transient, retryable condition.
pub fn is_transient(message: &str) -> bool {
    let upper = message.to_uppercase();
    TRANSIENT_MARKERS.iter().any(|marker| upper.contains(marker))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_level_codes_are_transient() {
        assert!(is_transient("connect ETIMEDOUT 64.233.184.109:587"));
        assert!(is_transient("read ECONNRESET"));
        assert!(is_transient("getaddrinfo EAI_AGAIN smtp.gmail.com"));
        assert!(is_transient("Invalid login: 535 EAUTH"));
    }

    #[test]
    fn smtp_stack_spellings_are_transient() {
        assert!(is_transient("Connection refused (os error 111)"));
        assert!(is_transient("operation timed out"));
        assert!(is_transient("error resolving DNS name"));
        assert!(is_transient("authentication mechanism rejected"));
    }

    #[test]
    fn content_rejections_are_permanent() {
        assert!(!is_transient("550 5.1.1 mailbox unavailable"));
        assert!(!is_transient("552 message size exceeds limit"));
    }
}
