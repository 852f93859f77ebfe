//! SMTP transport behind a swappable handle.
//!
//! The dispatcher talks to a [`MailTransport`] trait object so the retry
//! loop can be exercised without a live SMTP server. The production
//! implementation wraps a pooled lettre transport that is rebuilt in place
//! when a retry is about to happen.

use std::time::Duration;

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::transport::smtp::PoolConfig;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tokio::sync::RwLock;
use tracing::warn;

use crate::classify;
use crate::config::MailerConfig;
use crate::error::MailerError;

/// One message ready for the wire.
#[derive(Debug, Clone)]
pub struct OutboundEmail {
    pub from: String,
    pub to: String,
    pub cc: Option<String>,
    pub subject: String,
    pub body: String,
}

/// What the provider told us about an accepted message.
#[derive(Debug, Clone, Default)]
pub struct SendReceipt {
    pub message_id: Option<String>,
}

/// Transport seam between the dispatcher and the SMTP stack.
#[async_trait]
pub trait MailTransport: Send + Sync {
    /// Perform one send attempt.
    async fn send(&self, email: &OutboundEmail) -> Result<SendReceipt, MailerError>;

    /// Tear down and rebuild the underlying connection pool. Called before
    /// each retry; a failed rebuild keeps the previous pool.
    async fn rebuild(&self);

    /// Opportunistic connectivity check after a rebuild. A `false` here is
    /// logged by the caller but never aborts the retry.
    async fn verify(&self) -> bool;
}

/// Production transport: a pooled async SMTP connection shared process-wide,
/// owned explicitly by whoever constructs the dispatcher.
pub struct SmtpTransportHandle {
    config: MailerConfig,
    inner: RwLock<AsyncSmtpTransport<Tokio1Executor>>,
}

impl SmtpTransportHandle {
    pub fn new(config: MailerConfig) -> Result<Self, MailerError> {
        let transport = Self::build(&config)?;
        Ok(Self {
            config,
            inner: RwLock::new(transport),
        })
    }

    fn build(config: &MailerConfig) -> Result<AsyncSmtpTransport<Tokio1Executor>, MailerError> {
        let builder = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)
            .map_err(|e| MailerError::Permanent(format!("SMTP relay setup: {e}")))?;

        Ok(builder
            .port(config.smtp_port)
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
            .timeout(Some(Duration::from_secs(7)))
            .pool_config(PoolConfig::new().max_size(3))
            .build())
    }

    fn build_message(email: &OutboundEmail) -> Result<Message, MailerError> {
        let from: Mailbox = email
            .from
            .parse()
            .map_err(|e| MailerError::Permanent(format!("Invalid from address: {e}")))?;
        let to: Mailbox = email
            .to
            .parse()
            .map_err(|_| MailerError::InvalidRecipient(email.to.clone()))?;

        let mut builder = Message::builder().from(from).to(to);
        if let Some(ref cc) = email.cc {
            let cc: Mailbox = cc
                .parse()
                .map_err(|e| MailerError::Permanent(format!("Invalid cc address: {e}")))?;
            builder = builder.cc(cc);
        }

        builder
            .subject(&email.subject)
            .header(ContentType::TEXT_PLAIN)
            .body(email.body.clone())
            .map_err(|e| MailerError::Permanent(format!("Failed to build message: {e}")))
    }
}

#[async_trait]
impl MailTransport for SmtpTransportHandle {
    async fn send(&self, email: &OutboundEmail) -> Result<SendReceipt, MailerError> {
        let message = Self::build_message(email)?;

        let transport = self.inner.read().await;
        match transport.send(message).await {
            Ok(response) => {
                let detail = response.message().collect::<Vec<_>>().join(" ");
                Ok(SendReceipt {
                    message_id: (!detail.is_empty()).then_some(detail),
                })
            }
            Err(e) => {
                let text = e.to_string();
                if classify::is_transient(&text) || e.is_transient() {
                    Err(MailerError::Transient(text))
                } else {
                    Err(MailerError::Permanent(text))
                }
            }
        }
    }

    async fn rebuild(&self) {
        match Self::build(&self.config) {
            Ok(fresh) => *self.inner.write().await = fresh,
            Err(e) => warn!(error = %e, "SMTP transport rebuild failed, keeping previous pool"),
        }
    }

    async fn verify(&self) -> bool {
        self.inner
            .read()
            .await
            .test_connection()
            .await
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn email() -> OutboundEmail {
        OutboundEmail {
            from: "\"Raffleline\" <raffles@example.com>".to_string(),
            to: "buyer@example.com".to_string(),
            cc: Some("audit@example.com".to_string()),
            subject: "Test".to_string(),
            body: "body".to_string(),
        }
    }

    #[test]
    fn builds_message_with_cc() {
        let message = SmtpTransportHandle::build_message(&email()).unwrap();
        let rendered = String::from_utf8(message.formatted()).unwrap();
        assert!(rendered.contains("To: buyer@example.com"));
        assert!(rendered.contains("Cc: audit@example.com"));
        assert!(rendered.contains("Subject: Test"));
    }

    #[test]
    fn builds_message_without_cc() {
        let message = SmtpTransportHandle::build_message(&OutboundEmail {
            cc: None,
            ..email()
        })
        .unwrap();
        let rendered = String::from_utf8(message.formatted()).unwrap();
        assert!(!rendered.contains("Cc:"));
    }

    #[test]
    fn bad_recipient_is_invalid_recipient() {
        let result = SmtpTransportHandle::build_message(&OutboundEmail {
            to: "not an address".to_string(),
            ..email()
        });
        assert!(matches!(result, Err(MailerError::InvalidRecipient(_))));
    }
}
