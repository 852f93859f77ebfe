//! Shared helpers for the Raffleline services.
//!
//! Ticket-number formatting and sorting rules, plus the address validation
//! used by the mailer before it attempts a send.

pub mod tickets;
pub mod validate;
