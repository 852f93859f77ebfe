//! Raffleline Inventory Engine
//!
//! Owns the per-lottery partition of ticket numbers into available, booked
//! and sold, the booking/sale records attached to each lottery, and the
//! operations that move tickets between states. Paid reservations hand a
//! confirmation message to the notification dispatcher; nothing flows back.

pub mod api;
pub mod domain;
pub mod error;
pub mod repository;
pub mod service;

pub use error::InventoryError;
