//! Inventory Service
//!
//! Orchestrates the inventory operations: load the lottery, apply one of
//! the pure partition transitions, write the partitions back under the
//! version guard, and only then enqueue any notification. A version miss
//! means another writer landed first; the whole read-apply-write cycle is
//! retried on a fresh snapshot, so no transition is ever computed against
//! stale partitions.

pub mod notify;

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use rl_mailer::{EmailDispatcher, SendRequest};

use crate::domain::{Lottery, TicketGroup, UserInfo};
use crate::error::{InventoryError, Result};
use crate::repository::{LotteryStore, UserStore};

/// Upper bound on read-apply-write cycles before giving up with a
/// conflict error. Contention on a single raffle document is human-scale,
/// so hitting this bound means something is genuinely wrong.
const CAS_MAX_ATTEMPTS: u32 = 5;

/// Unsold listing: what a buyer picks from.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnsoldTickets {
    pub lottery_no: u32,
    pub available_tickets: Vec<String>,
}

/// One row of the admin board: a ticket, its two state flags, and who
/// holds it. A booked row is `availability: false, sold: false`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketRow {
    pub lottery_no: u32,
    pub ticket_number: String,
    /// `Full Name (email)` for an owned booking/sale; absent for available
    /// tickets and anonymous holds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    pub availability: bool,
    pub sold: bool,
}

/// Full board for the current round, booked first, then available, then
/// sold, each block in numeric order. Counts are per-ticket, not
/// per-record.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketBoard {
    pub lottery_no: u32,
    pub tickets: Vec<TicketRow>,
    pub booked_count: usize,
    pub sold_count: usize,
}

pub struct InventoryService {
    lotteries: Arc<dyn LotteryStore>,
    users: Arc<dyn UserStore>,
    mailer: Arc<EmailDispatcher>,
}

impl InventoryService {
    pub fn new(
        lotteries: Arc<dyn LotteryStore>,
        users: Arc<dyn UserStore>,
        mailer: Arc<EmailDispatcher>,
    ) -> Self {
        Self {
            lotteries,
            users,
            mailer,
        }
    }

    /// Start a new round with `total_tickets` numbers, all available. The
    /// round number continues from the latest round, starting at 1.
    pub async fn create_lottery(&self, total_tickets: i64) -> Result<Lottery> {
        // Pool sizes beyond u32 would truncate in the cast below.
        if total_tickets <= 0 || total_tickets > i64::from(u32::MAX) {
            return Err(InventoryError::InvalidPoolSize {
                total: total_tickets,
            });
        }

        let next_no = match self.lotteries.find_latest().await? {
            Some(latest) => latest.lottery_no + 1,
            None => 1,
        };

        let lottery = Lottery::new(next_no, total_tickets as u32);
        self.lotteries.insert(&lottery).await?;
        info!(
            lottery_no = lottery.lottery_no,
            total = total_tickets,
            "created lottery"
        );
        Ok(lottery)
    }

    /// Available tickets of the current round, in numeric order.
    pub async fn unsold_snapshot(&self) -> Result<UnsoldTickets> {
        let lottery = self
            .lotteries
            .find_latest()
            .await?
            .ok_or(InventoryError::NoLotteryExists)?;

        let mut available = lottery.available_tickets;
        rl_common::tickets::sort_numeric(&mut available);

        Ok(UnsoldTickets {
            lottery_no: lottery.lottery_no,
            available_tickets: available,
        })
    }

    /// Every ticket of the current round with its state and owner display.
    pub async fn full_snapshot(&self) -> Result<TicketBoard> {
        let lottery = self
            .lotteries
            .find_latest()
            .await?
            .ok_or(InventoryError::NoLotteryExists)?;

        let emails: Vec<String> = lottery
            .booked_tickets
            .iter()
            .chain(lottery.sold_tickets.iter())
            .filter_map(|g| g.user.clone())
            .collect();
        let display_by_email: HashMap<String, String> = self
            .users
            .find_by_emails(&emails)
            .await?
            .into_iter()
            .map(|u| (u.email.clone(), u.display()))
            .collect();

        Ok(build_board(&lottery, &display_by_email))
    }

    /// Book tickets for a buyer: record the contact details, move the
    /// tickets from available into the buyer's booking, then queue the
    /// confirmation message. Delivery is best-effort and never fails the
    /// reservation. Returns the available tickets left after the booking.
    pub async fn reserve(
        &self,
        lottery_no: u32,
        info: UserInfo,
        ticket_numbers: Vec<String>,
    ) -> Result<Vec<String>> {
        self.users.upsert(&info).await?;

        let lottery = self
            .mutate(lottery_no, |lottery| {
                lottery.reserve(Some(&info.email), &ticket_numbers);
                Ok(())
            })
            .await?
            .0;

        let (subject, body) =
            notify::build_confirmation(&info, &ticket_numbers, chrono::Utc::now());
        let ack = self.mailer.enqueue(SendRequest {
            to: info.email.clone(),
            subject,
            body,
            cc: None,
        });
        if !ack.queued {
            warn!(to = %info.email, "confirmation not queued");
        }

        let mut available = lottery.available_tickets;
        rl_common::tickets::sort_numeric(&mut available);
        Ok(available)
    }

    /// Claim toggle. `true` places an anonymous hold on an available
    /// ticket; `false` releases a booked ticket back to available and
    /// returns the booking it came out of.
    pub async fn set_claimed(
        &self,
        lottery_no: u32,
        ticket_no: &str,
        claimed: bool,
    ) -> Result<Option<TicketGroup>> {
        let batch = vec![ticket_no.to_string()];
        let (_, group) = self
            .mutate(lottery_no, |lottery| {
                if claimed {
                    lottery.reserve(None, &batch);
                    Ok(None)
                } else {
                    lottery.release(ticket_no).map(Some)
                }
            })
            .await?;
        Ok(group)
    }

    /// Sale toggle. `true` settles a booked ticket as sold under the
    /// booking's owner; `false` returns a sold ticket straight to
    /// available, dropping the attribution, and reports the sale record
    /// it came out of.
    pub async fn set_sold(
        &self,
        lottery_no: u32,
        ticket_no: &str,
        sold: bool,
    ) -> Result<Option<TicketGroup>> {
        let (_, group) = self
            .mutate(lottery_no, |lottery| {
                if sold {
                    lottery.mark_sold(ticket_no);
                    Ok(None)
                } else {
                    lottery.unmark_sold(ticket_no).map(Some)
                }
            })
            .await?;
        Ok(group)
    }

    /// Read-apply-write under the version guard. The closure runs against
    /// a fresh snapshot each cycle, so its effect is recomputed rather
    /// than replayed when a concurrent writer wins the race.
    async fn mutate<T>(
        &self,
        lottery_no: u32,
        apply: impl Fn(&mut Lottery) -> Result<T>,
    ) -> Result<(Lottery, T)> {
        for attempt in 1..=CAS_MAX_ATTEMPTS {
            let mut lottery = self
                .lotteries
                .find_by_no(lottery_no)
                .await?
                .ok_or(InventoryError::LotteryNotFound { lottery_no })?;
            let expected_version = lottery.version;

            let value = apply(&mut lottery)?;

            if self
                .lotteries
                .replace_partitions(&lottery, expected_version)
                .await?
            {
                lottery.version = expected_version + 1;
                return Ok((lottery, value));
            }

            warn!(lottery_no, attempt, "version conflict, retrying");
        }

        Err(InventoryError::ConcurrencyConflict { lottery_no })
    }
}

/// Assemble the board rows from a lottery snapshot and a map of email to
/// display name. Owners missing from the map fall back to the bare email.
fn build_board(lottery: &Lottery, display_by_email: &HashMap<String, String>) -> TicketBoard {
    let owner_display = |group: &TicketGroup| -> Option<String> {
        group.user.as_ref().map(|email| {
            display_by_email
                .get(email)
                .cloned()
                .unwrap_or_else(|| email.clone())
        })
    };

    let mut booked: Vec<TicketRow> = lottery
        .booked_tickets
        .iter()
        .flat_map(|group| {
            let user = owner_display(group);
            group.ticket_numbers.iter().map(move |t| TicketRow {
                lottery_no: lottery.lottery_no,
                ticket_number: t.clone(),
                user: user.clone(),
                availability: false,
                sold: false,
            })
        })
        .collect();

    let mut available: Vec<TicketRow> = lottery
        .available_tickets
        .iter()
        .map(|t| TicketRow {
            lottery_no: lottery.lottery_no,
            ticket_number: t.clone(),
            user: None,
            availability: true,
            sold: false,
        })
        .collect();

    let mut sold: Vec<TicketRow> = lottery
        .sold_tickets
        .iter()
        .flat_map(|group| {
            let user = owner_display(group);
            group.ticket_numbers.iter().map(move |t| TicketRow {
                lottery_no: lottery.lottery_no,
                ticket_number: t.clone(),
                user: user.clone(),
                availability: false,
                sold: true,
            })
        })
        .collect();

    sort_rows(&mut booked);
    sort_rows(&mut available);
    sort_rows(&mut sold);

    let (booked_count, sold_count) = (booked.len(), sold.len());

    let mut tickets = booked;
    tickets.append(&mut available);
    tickets.append(&mut sold);

    TicketBoard {
        lottery_no: lottery.lottery_no,
        tickets,
        booked_count,
        sold_count,
    }
}

fn sort_rows(rows: &mut [TicketRow]) {
    rows.sort_by_key(|r| r.ticket_number.parse::<i64>().unwrap_or(i64::MAX));
}
