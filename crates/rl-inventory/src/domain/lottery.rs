//! Lottery Entity
//!
//! One document per raffle round. Every ticket number generated at creation
//! sits in exactly one of three partitions: `available_tickets`, a group in
//! `booked_tickets`, or a group in `sold_tickets`. The transition methods
//! here are pure; persistence and concurrency control live in the
//! repository/service layers.

use bson::serde_helpers::chrono_datetime_as_bson_datetime;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::InventoryError;

/// A booking or sale record: ticket numbers grouped by owner within one
/// lottery. `user` is the owner's email, or `None` for an anonymous
/// admin-side hold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketGroup {
    pub user: Option<String>,
    pub ticket_numbers: Vec<String>,
    pub lottery_no: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lottery {
    #[serde(rename = "_id")]
    pub id: String,

    /// Strictly increasing round number, immutable once created.
    pub lottery_no: u32,

    /// Ticket numbers currently unclaimed, zero-padded to pool width.
    pub available_tickets: Vec<String>,

    /// Reserved-but-unpaid records.
    pub booked_tickets: Vec<TicketGroup>,

    /// Paid records.
    pub sold_tickets: Vec<TicketGroup>,

    /// Optimistic-concurrency counter, bumped on every partition write.
    pub version: i64,

    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

impl Lottery {
    /// New round with the full pool available and no records.
    pub fn new(lottery_no: u32, total_tickets: u32) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            lottery_no,
            available_tickets: rl_common::tickets::generate_pool(total_tickets),
            booked_tickets: Vec::new(),
            sold_tickets: Vec::new(),
            version: 0,
            created_at: Utc::now(),
        }
    }

    /// Available → Booked for a batch of tickets.
    ///
    /// Removal from `available_tickets` is unconditional: callers are
    /// trusted to apply this against a fresh snapshot. An existing group
    /// for this owner absorbs the new numbers; otherwise a new group is
    /// appended. `owner = None` is the anonymous claim path.
    pub fn reserve(&mut self, owner: Option<&str>, ticket_numbers: &[String]) {
        self.available_tickets
            .retain(|t| !ticket_numbers.contains(t));

        match Self::group_for_owner(&mut self.booked_tickets, owner) {
            Some(group) => group.ticket_numbers.extend_from_slice(ticket_numbers),
            None => self.booked_tickets.push(TicketGroup {
                user: owner.map(str::to_string),
                ticket_numbers: ticket_numbers.to_vec(),
                lottery_no: self.lottery_no,
            }),
        }
    }

    /// Booked → Available. Fails when no booking holds the ticket; a sold
    /// ticket is explicitly not revertible through this path. Returns the
    /// affected booking (post-removal) for the API response.
    pub fn release(&mut self, ticket_no: &str) -> Result<TicketGroup, InventoryError> {
        let index = self
            .booked_tickets
            .iter()
            .position(|g| g.ticket_numbers.iter().any(|t| t == ticket_no))
            .ok_or_else(|| InventoryError::TicketNotBooked {
                ticket: ticket_no.to_string(),
            })?;

        let group = Self::remove_from_group(&mut self.booked_tickets, index, ticket_no);
        self.available_tickets.push(ticket_no.to_string());
        Ok(group)
    }

    /// Booked → Sold. The owner is inherited from the booking that holds
    /// the ticket; when none does, the sale is recorded without an owner
    /// rather than rejected, which is how offline sales get entered. The
    /// pull from `available_tickets` handles exactly that never-booked
    /// case.
    pub fn mark_sold(&mut self, ticket_no: &str) {
        let owner = match self
            .booked_tickets
            .iter()
            .position(|g| g.ticket_numbers.iter().any(|t| t == ticket_no))
        {
            Some(index) => {
                let group = Self::remove_from_group(&mut self.booked_tickets, index, ticket_no);
                group.user
            }
            None => None,
        };

        self.available_tickets.retain(|t| t != ticket_no);

        match Self::group_for_owner(&mut self.sold_tickets, owner.as_deref()) {
            Some(group) => group.ticket_numbers.push(ticket_no.to_string()),
            None => self.sold_tickets.push(TicketGroup {
                user: owner,
                ticket_numbers: vec![ticket_no.to_string()],
                lottery_no: self.lottery_no,
            }),
        }
    }

    /// Sold → Available, skipping the booked state entirely; owner
    /// attribution is lost. Fails when no sale holds the ticket.
    pub fn unmark_sold(&mut self, ticket_no: &str) -> Result<TicketGroup, InventoryError> {
        let index = self
            .sold_tickets
            .iter()
            .position(|g| g.ticket_numbers.iter().any(|t| t == ticket_no))
            .ok_or_else(|| InventoryError::TicketNotSold {
                ticket: ticket_no.to_string(),
            })?;

        let group = Self::remove_from_group(&mut self.sold_tickets, index, ticket_no);
        self.available_tickets.push(ticket_no.to_string());
        Ok(group)
    }

    /// Every ticket number currently booked, across all bookings.
    pub fn booked_ticket_count(&self) -> usize {
        self.booked_tickets
            .iter()
            .map(|g| g.ticket_numbers.len())
            .sum()
    }

    /// Every ticket number currently sold, across all sales.
    pub fn sold_ticket_count(&self) -> usize {
        self.sold_tickets.iter().map(|g| g.ticket_numbers.len()).sum()
    }

    fn group_for_owner<'a>(
        groups: &'a mut [TicketGroup],
        owner: Option<&str>,
    ) -> Option<&'a mut TicketGroup> {
        groups.iter_mut().find(|g| g.user.as_deref() == owner)
    }

    /// Remove one ticket number from the group at `index`, dropping the
    /// group when it empties. Returns the group as it stands after removal.
    fn remove_from_group(
        groups: &mut Vec<TicketGroup>,
        index: usize,
        ticket_no: &str,
    ) -> TicketGroup {
        groups[index].ticket_numbers.retain(|t| t != ticket_no);
        if groups[index].ticket_numbers.is_empty() {
            groups.remove(index)
        } else {
            groups[index].clone()
        }
    }
}
