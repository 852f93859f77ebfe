//! API Layer
//!
//! REST endpoints over the inventory service. All routes mount under
//! `/api/raffle`; errors serialize as `{ "error": CODE, "message": ... }`
//! with the status the error maps to.

pub mod raffle;

use axum::Json;

use crate::error::InventoryError;

pub type ApiResult<T> = Result<Json<T>, InventoryError>;

pub use raffle::{raffle_router, RaffleState};
