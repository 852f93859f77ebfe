//! Inventory Error Types

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum InventoryError {
    #[error("Pool size must be a positive integer, got {total}")]
    InvalidPoolSize { total: i64 },

    #[error("No lottery exists")]
    NoLotteryExists,

    #[error("Lottery not found: {lottery_no}")]
    LotteryNotFound { lottery_no: u32 },

    #[error("Ticket {ticket} is not in the booked state")]
    TicketNotBooked { ticket: String },

    #[error("Ticket {ticket} is not sold")]
    TicketNotSold { ticket: String },

    #[error("Concurrent update conflict on lottery {lottery_no}")]
    ConcurrencyConflict { lottery_no: u32 },

    #[error("Database error: {0}")]
    Database(#[from] mongodb::error::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] bson::ser::Error),

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl InventoryError {
    /// Stable machine-readable code for the API error body.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidPoolSize { .. } => "INVALID_POOL_SIZE",
            Self::NoLotteryExists => "NO_LOTTERY_EXISTS",
            Self::LotteryNotFound { .. } => "LOTTERY_NOT_FOUND",
            Self::TicketNotBooked { .. } => "TICKET_NOT_BOOKED",
            Self::TicketNotSold { .. } => "TICKET_NOT_SOLD",
            Self::ConcurrencyConflict { .. } => "CONCURRENCY_CONFLICT",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Serialization(_) => "SERIALIZATION_ERROR",
            Self::Internal { .. } => "INTERNAL_ERROR",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            Self::InvalidPoolSize { .. } => StatusCode::BAD_REQUEST,
            Self::NoLotteryExists
            | Self::LotteryNotFound { .. }
            | Self::TicketNotBooked { .. }
            | Self::TicketNotSold { .. } => StatusCode::NOT_FOUND,
            Self::ConcurrencyConflict { .. } => StatusCode::CONFLICT,
            Self::Database(_) | Self::Serialization(_) | Self::Internal { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for InventoryError {
    fn into_response(self) -> Response {
        let body = Json(serde_json::json!({
            "error": self.code(),
            "message": self.to_string(),
        }));
        (self.status(), body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, InventoryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        assert_eq!(
            InventoryError::InvalidPoolSize { total: 0 }.status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            InventoryError::NoLotteryExists.status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            InventoryError::TicketNotBooked { ticket: "005".into() }.status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            InventoryError::ConcurrencyConflict { lottery_no: 1 }.status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            InventoryError::Internal { message: "x".into() }.status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
