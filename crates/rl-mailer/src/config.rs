//! Mailer configuration.
//!
//! Read from the environment at startup and handed to the dispatcher at
//! construction; nothing here is module-level state.

use std::time::Duration;

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_or_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// SMTP transport and retry-policy settings.
#[derive(Debug, Clone)]
pub struct MailerConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub username: String,
    pub password: String,
    /// From header, e.g. `"Raffleline" <raffles@example.com>`.
    pub from: String,
    /// Fixed secondary recipient copied on every message for audit purposes.
    /// Empty string disables the copy.
    pub audit_cc: String,
    /// Upper bound on a single send attempt.
    pub send_timeout: Duration,
    /// Retries after the first attempt; total attempts = max_retries + 1.
    pub max_retries: u32,
    /// First retry delay; doubles on each subsequent retry.
    pub backoff_base: Duration,
}

impl Default for MailerConfig {
    fn default() -> Self {
        Self {
            smtp_host: "smtp.gmail.com".to_string(),
            smtp_port: 587,
            username: String::new(),
            password: String::new(),
            from: String::new(),
            audit_cc: String::new(),
            send_timeout: Duration::from_millis(8000),
            max_retries: 3,
            backoff_base: Duration::from_millis(600),
        }
    }
}

impl MailerConfig {
    /// Load configuration from `SMTP_*` / `EMAIL_*` environment variables,
    /// falling back to defaults for anything unset.
    pub fn from_env() -> Self {
        let username = env_or("SMTP_USER", "");
        let from_default = if username.is_empty() {
            String::new()
        } else {
            format!("\"Raffleline\" <{username}>")
        };

        Self {
            smtp_host: env_or("SMTP_HOST", "smtp.gmail.com"),
            smtp_port: env_or_parse("SMTP_PORT", 587),
            password: env_or("SMTP_PASS", ""),
            from: std::env::var("EMAIL_FROM").unwrap_or(from_default),
            audit_cc: env_or("EMAIL_CC", &username),
            send_timeout: Duration::from_millis(env_or_parse("EMAIL_SEND_TIMEOUT_MS", 8000)),
            max_retries: env_or_parse("EMAIL_MAX_RETRIES", 3),
            backoff_base: Duration::from_millis(env_or_parse("EMAIL_BACKOFF_BASE_MS", 600)),
            username,
        }
    }

    /// Whether transport credentials are present. Checked at the start of
    /// every background delivery, not at enqueue time.
    pub fn has_credentials(&self) -> bool {
        !self.username.is_empty() && !self.password.is_empty()
    }
}
