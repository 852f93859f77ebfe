//! MongoDB Repositories
//!
//! Typed collections over the `lotteries` and `users` collections. Each
//! call is atomic on its own; the version-guarded partition write is the
//! only cross-field mutation and carries its own compare-and-swap filter.
//! The store traits are the seam the service is exercised through in
//! tests, with the Mongo repositories behind them in production.

pub mod lottery;
pub mod user;

use async_trait::async_trait;

use crate::domain::{Lottery, User, UserInfo};
use crate::error::Result;

/// Persistence seam for lottery documents.
#[async_trait]
pub trait LotteryStore: Send + Sync {
    async fn insert(&self, lottery: &Lottery) -> Result<()>;

    /// The most recent round, by lottery number.
    async fn find_latest(&self) -> Result<Option<Lottery>>;

    async fn find_by_no(&self, lottery_no: u32) -> Result<Option<Lottery>>;

    /// Write back all three partition fields, guarded by the document
    /// version read alongside them. Returns `false` on a version miss,
    /// i.e. a concurrent writer got there first; the caller re-reads and
    /// reapplies its mutation.
    async fn replace_partitions(&self, lottery: &Lottery, expected_version: i64) -> Result<bool>;
}

/// Persistence seam for user records.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Create-or-overwrite by email. Every submitted field replaces the
    /// stored one (last write wins, no merge).
    async fn upsert(&self, info: &UserInfo) -> Result<()>;

    /// Batch lookup for owner display in ticket listings.
    async fn find_by_emails(&self, emails: &[String]) -> Result<Vec<User>>;
}

pub use lottery::LotteryRepository;
pub use user::UserRepository;
