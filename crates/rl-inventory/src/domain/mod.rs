//! Domain Models
//!
//! The lottery document with its three-way ticket partition, and the user
//! record keyed by email.

pub mod lottery;
pub mod user;

pub use lottery::*;
pub use user::*;
