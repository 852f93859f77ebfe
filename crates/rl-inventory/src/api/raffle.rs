//! Raffle API
//!
//! REST endpoints for round creation, ticket listings, buyer reservations
//! and the two admin toggles (claim and sale).

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, patch, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::api::ApiResult;
use crate::domain::{TicketGroup, UserInfo};
use crate::service::{InventoryService, TicketBoard, UnsoldTickets};

/// Shared handler state.
#[derive(Clone)]
pub struct RaffleState {
    pub service: Arc<InventoryService>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLotteryRequest {
    pub total_tickets: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLotteryResponse {
    pub message: String,
    pub lottery_no: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SellTicketsRequest {
    pub user_information: UserInfo,
    pub ticket_numbers: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SellTicketsResponse {
    pub message: String,
    pub updated_available_tickets: Vec<String>,
}

/// Outcome of a claim or sale toggle. `booked_ticket` is the booking or
/// sale record the ticket left, when the transition removed it from one.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub booked_ticket: Option<TicketGroup>,
}

/// Create lottery
pub async fn create_lottery(
    State(state): State<RaffleState>,
    Json(request): Json<CreateLotteryRequest>,
) -> Result<(StatusCode, Json<CreateLotteryResponse>), crate::InventoryError> {
    let lottery = state.service.create_lottery(request.total_tickets).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateLotteryResponse {
            message: format!("Lottery {} created successfully", lottery.lottery_no),
            lottery_no: lottery.lottery_no,
        }),
    ))
}

/// List available tickets of the current round
pub async fn get_unsold_tickets(
    State(state): State<RaffleState>,
) -> ApiResult<UnsoldTickets> {
    Ok(Json(state.service.unsold_snapshot().await?))
}

/// List every ticket of the current round with state and owner
pub async fn get_tickets(State(state): State<RaffleState>) -> ApiResult<TicketBoard> {
    Ok(Json(state.service.full_snapshot().await?))
}

/// Reserve tickets for a buyer
pub async fn sell_tickets(
    State(state): State<RaffleState>,
    Path(lottery_no): Path<u32>,
    Json(request): Json<SellTicketsRequest>,
) -> ApiResult<SellTicketsResponse> {
    let buyer = request.user_information.email.clone();
    let count = request.ticket_numbers.len();
    let available = state
        .service
        .reserve(lottery_no, request.user_information, request.ticket_numbers)
        .await?;

    info!(lottery_no, buyer = %buyer, count, "tickets reserved");

    Ok(Json(SellTicketsResponse {
        message: "Tickets have been booked successfully".to_string(),
        updated_available_tickets: available,
    }))
}

/// Toggle the claim state of one ticket
pub async fn claim_ticket(
    State(state): State<RaffleState>,
    Path((lottery_no, ticket_no, value)): Path<(u32, String, bool)>,
) -> ApiResult<ToggleResponse> {
    let booked_ticket = state.service.set_claimed(lottery_no, &ticket_no, value).await?;

    let message = if value {
        format!("Ticket {ticket_no} has been claimed")
    } else {
        format!("Ticket {ticket_no} has been released back to available")
    };

    Ok(Json(ToggleResponse {
        message,
        booked_ticket,
    }))
}

/// Toggle the sold state of one ticket
pub async fn sold_ticket(
    State(state): State<RaffleState>,
    Path((lottery_no, ticket_no, value)): Path<(u32, String, bool)>,
) -> ApiResult<ToggleResponse> {
    let booked_ticket = state.service.set_sold(lottery_no, &ticket_no, value).await?;

    let message = if value {
        format!("Ticket {ticket_no} has been marked as sold")
    } else {
        format!("Ticket {ticket_no} has been returned to available")
    };

    Ok(Json(ToggleResponse {
        message,
        booked_ticket,
    }))
}

/// Create raffle router
pub fn raffle_router(state: RaffleState) -> Router {
    Router::new()
        .route("/create-lottery", post(create_lottery))
        .route("/unsold-tickets", get(get_unsold_tickets))
        .route("/tickets", get(get_tickets))
        .route("/sell-tickets/:lottery_no", patch(sell_tickets))
        .route("/claim-ticket/:lottery_no/:ticket_no/:value", post(claim_ticket))
        .route("/sold-ticket/:lottery_no/:ticket_no/:value", post(sold_ticket))
        .with_state(state)
}
