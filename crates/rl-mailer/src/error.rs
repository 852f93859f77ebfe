//! Mailer error types.

use thiserror::Error;

/// Delivery failure taxonomy. `Transient` and `Timeout` are retryable;
/// everything else ends the attempt loop immediately.
#[derive(Error, Debug, Clone)]
pub enum MailerError {
    #[error("Invalid recipient address: {0}")]
    InvalidRecipient(String),

    #[error("SMTP credentials are not configured")]
    CredentialsMissing,

    #[error("Send attempt timed out")]
    Timeout,

    #[error("Transient send failure: {0}")]
    Transient(String),

    #[error("Permanent send failure: {0}")]
    Permanent(String),
}

impl MailerError {
    /// Whether a retry could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, MailerError::Transient(_) | MailerError::Timeout)
    }
}

pub type Result<T> = std::result::Result<T, MailerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retryable_classification() {
        assert!(MailerError::Timeout.is_retryable());
        assert!(MailerError::Transient("ECONNRESET".into()).is_retryable());
        assert!(!MailerError::Permanent("550 mailbox unavailable".into()).is_retryable());
        assert!(!MailerError::InvalidRecipient("nope".into()).is_retryable());
        assert!(!MailerError::CredentialsMissing.is_retryable());
    }
}
