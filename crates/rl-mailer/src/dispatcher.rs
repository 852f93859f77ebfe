//! Background delivery loop.
//!
//! `enqueue` hands the message to a spawned task and returns immediately;
//! the caller never observes the delivery outcome. The task validates the
//! recipient and credentials, then races each send attempt against the
//! configured timeout, retrying transient failures with exponential backoff
//! and a transport rebuild between attempts.

use std::sync::Arc;

use tokio::time::{sleep, timeout};
use tracing::{debug, error, info, warn};

use crate::config::MailerConfig;
use crate::error::MailerError;
use crate::transport::{MailTransport, OutboundEmail};

/// A send request as the inventory side hands it over.
#[derive(Debug, Clone)]
pub struct SendRequest {
    pub to: String,
    pub subject: String,
    pub body: String,
    /// `None` copies the configured audit recipient; `Some("")` suppresses
    /// the copy; any other value overrides it.
    pub cc: Option<String>,
}

/// Immediate acknowledgment returned to the caller regardless of what the
/// background delivery later does.
#[derive(Debug, Clone, Copy)]
pub struct QueuedAck {
    pub queued: bool,
}

/// Terminal state of one delivery, for logging and tests.
#[derive(Debug, Clone)]
pub struct DeliveryOutcome {
    pub attempts: u32,
    pub message_id: Option<String>,
}

pub struct EmailDispatcher {
    config: MailerConfig,
    transport: Arc<dyn MailTransport>,
}

impl EmailDispatcher {
    pub fn new(config: MailerConfig, transport: Arc<dyn MailTransport>) -> Self {
        Self { config, transport }
    }

    /// Build a dispatcher over a fresh SMTP connection pool.
    pub fn smtp(config: MailerConfig) -> Result<Arc<Self>, MailerError> {
        let transport = Arc::new(crate::transport::SmtpTransportHandle::new(config.clone())?);
        Ok(Arc::new(Self::new(config, transport)))
    }

    /// Probe the underlying transport. Startup uses this for an early
    /// signal; a failure here never blocks enqueuing.
    pub async fn verify_transport(&self) -> bool {
        self.transport.verify().await
    }

    /// Queue a message for background delivery and return at once.
    pub fn enqueue(self: &Arc<Self>, request: SendRequest) -> QueuedAck {
        let dispatcher = Arc::clone(self);
        tokio::spawn(async move {
            match dispatcher.try_deliver(&request).await {
                Ok(outcome) => info!(
                    to = %request.to,
                    attempts = outcome.attempts,
                    message_id = outcome.message_id.as_deref().unwrap_or("n/a"),
                    "email delivered"
                ),
                Err(e) => error!(to = %request.to, error = %e, "email delivery failed"),
            }
        });
        QueuedAck { queued: true }
    }

    /// The attempt loop. Public within the crate so tests can drive it
    /// directly instead of observing logs.
    pub async fn try_deliver(&self, request: &SendRequest) -> Result<DeliveryOutcome, MailerError> {
        if !rl_common::validate::is_valid_email(&request.to) {
            return Err(MailerError::InvalidRecipient(request.to.clone()));
        }
        if !self.config.has_credentials() {
            return Err(MailerError::CredentialsMissing);
        }

        let email = OutboundEmail {
            from: self.config.from.clone(),
            to: request.to.clone(),
            cc: self.resolve_cc(request.cc.as_deref()),
            subject: request.subject.clone(),
            body: request.body.clone(),
        };

        let mut attempt: u32 = 0;
        loop {
            attempt += 1;

            let result = match timeout(self.config.send_timeout, self.transport.send(&email)).await
            {
                Ok(result) => result,
                Err(_) => Err(MailerError::Timeout),
            };

            let err = match result {
                Ok(receipt) => {
                    return Ok(DeliveryOutcome {
                        attempts: attempt,
                        message_id: receipt.message_id,
                    })
                }
                Err(err) => err,
            };

            let will_retry = err.is_retryable() && attempt <= self.config.max_retries;
            warn!(
                to = %email.to,
                attempt,
                error = %err,
                retry = will_retry,
                "send attempt failed"
            );
            if !will_retry {
                return Err(err);
            }

            let delay = self.config.backoff_base * 2u32.pow(attempt - 1);
            sleep(delay).await;

            self.transport.rebuild().await;
            if !self.transport.verify().await {
                debug!("transport verification failed after rebuild, retrying anyway");
            }
        }
    }

    fn resolve_cc(&self, requested: Option<&str>) -> Option<String> {
        match requested {
            Some("") => None,
            Some(cc) => Some(cc.to_string()),
            None if self.config.audit_cc.is_empty() => None,
            None => Some(self.config.audit_cc.clone()),
        }
    }
}
