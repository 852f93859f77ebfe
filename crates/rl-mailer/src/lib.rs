//! Raffleline Notification Dispatcher
//!
//! Fire-and-forget email delivery: callers enqueue a message and get an
//! immediate acknowledgment; a background task owns the actual send with
//! per-attempt timeouts, transient-failure classification and exponential
//! backoff. Outcomes are observable only through logs.

pub mod classify;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod transport;

pub use config::MailerConfig;
pub use dispatcher::{DeliveryOutcome, EmailDispatcher, QueuedAck, SendRequest};
pub use error::MailerError;
pub use transport::{MailTransport, OutboundEmail, SendReceipt, SmtpTransportHandle};
