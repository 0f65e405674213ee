//! Handlers for the `/tickets` resource: the reservation hot path, the
//! payment webhook, and the my-bookings list.

use std::collections::HashSet;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use hive_core::booking::{self, MAX_REFERENCE_ATTEMPTS, TICKET_CONFIRMED, TICKET_PENDING};
use hive_core::error::CoreError;
use hive_core::pricing;
use hive_core::seating::{Seat, SeatGrid};
use hive_core::types::{Id, Timestamp};
use hive_db::models::outbox::NewOutboxMessage;
use hive_db::models::ticket::{CreateTicket, ReserveTicketRequest, Ticket, TicketWithDetails};
use hive_db::repositories::{ShowtimeRepo, TicketRepo};
use hive_outbox::events::{EmailNotification, EVENT_EMAIL_NOTIFICATION};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Response body for a successful reservation.
#[derive(Debug, Serialize)]
pub struct ReserveResponse {
    pub ticket_id: Id,
    pub booking_reference: String,
    pub total_amount: Decimal,
    pub status: String,
    pub created_at: Timestamp,
}

/// POST /api/tickets/reserve
///
/// Atomically holds a group of seats for the caller: verifies and flips
/// the cells in an engine over a copy of the buffer, prices the group,
/// then persists the buffer and the Pending ticket under the showtime's
/// version token. A lost token race is a 409 and is never retried here;
/// the client re-reads the seat map.
pub async fn reserve(
    AuthUser(principal): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<ReserveTicketRequest>,
) -> AppResult<(StatusCode, Json<ReserveResponse>)> {
    if input.seats.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "at least one seat is required".into(),
        )));
    }
    // Duplicate coordinates are tolerated but collapse to one seat, so the
    // ticket and the total never double-count a cell.
    let mut seen = HashSet::new();
    let seats: Vec<Seat> = input
        .seats
        .iter()
        .copied()
        .filter(|seat| seen.insert(*seat))
        .collect();

    let showtime = ShowtimeRepo::find_with_auditorium(&state.pool, input.showtime_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Showtime",
            id: input.showtime_id.to_string(),
        }))?;

    let layout = &showtime.layout.0;
    for &seat in &seats {
        if layout.is_disabled(seat) {
            return Err(AppError::Core(CoreError::Validation(format!(
                "seat {seat} is disabled in this auditorium"
            ))));
        }
    }

    let mut buffer = showtime.seat_state.clone();
    {
        let mut grid = SeatGrid::new(&mut buffer, showtime.max_rows, showtime.max_columns)?;
        if !grid.try_reserve_batch(&seats)? {
            return Err(AppError::Core(CoreError::SeatsUnavailable(
                "at least one requested seat is no longer available".into(),
            )));
        }
    }

    let total_amount = pricing::total_amount(showtime.base_price, &seats, &layout.surcharge_map());

    // The unique index is the arbiter of reference collisions; on the
    // astronomically rare hit, regenerate and try again.
    for attempt in 1..=MAX_REFERENCE_ATTEMPTS {
        let create = CreateTicket {
            user_id: principal.id.clone(),
            user_email: principal.email.clone(),
            showtime_id: showtime.id,
            booking_reference: booking::new_reference(),
            reserved_seats: seats.clone(),
            total_amount,
        };
        match TicketRepo::create_pending(
            &state.pool,
            showtime.id,
            showtime.version,
            &buffer,
            &create,
        )
        .await
        {
            Ok(Some(ticket)) => {
                state.seat_maps.invalidate(&showtime.id);
                tracing::info!(
                    ticket_id = %ticket.id,
                    showtime_id = %showtime.id,
                    user_id = %principal.id,
                    booking_reference = %ticket.booking_reference,
                    seats = seats.len(),
                    "Seats reserved"
                );
                return Ok((
                    StatusCode::CREATED,
                    Json(ReserveResponse {
                        ticket_id: ticket.id,
                        booking_reference: ticket.booking_reference,
                        total_amount: ticket.total_amount,
                        status: ticket.status,
                        created_at: ticket.created_at,
                    }),
                ));
            }
            Ok(None) => {
                return Err(AppError::Core(CoreError::Concurrency(
                    "the seat map changed underneath this request; re-read and retry".into(),
                )));
            }
            Err(e) => {
                let error = AppError::from(e);
                if error.is_unique_violation("uq_tickets_booking_reference")
                    && attempt < MAX_REFERENCE_ATTEMPTS
                {
                    continue;
                }
                return Err(error);
            }
        }
    }

    Err(AppError::InternalError(
        "could not allocate a unique booking reference".into(),
    ))
}

/// Payment webhook body. Only the booking reference drives the state
/// machine; the rest is recorded for the log.
#[derive(Debug, Deserialize)]
pub struct PaymentWebhook {
    pub booking_reference: String,
    pub transaction_id: Option<String>,
    pub status: Option<String>,
}

/// POST /api/tickets/payment/success
///
/// Confirms a paid ticket: cells flip Reserved to Sold, the ticket goes
/// Confirmed, and the notification event lands in the outbox, all in one
/// transaction. Repeating the webhook for an already-confirmed ticket is
/// a success no-op; a ticket in any other non-pending state (an expired
/// hold in particular) is never revived.
pub async fn payment_success(
    State(state): State<AppState>,
    Json(input): Json<PaymentWebhook>,
) -> AppResult<Json<Ticket>> {
    let ticket = TicketRepo::find_by_reference(&state.pool, &input.booking_reference)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Ticket",
            id: input.booking_reference.clone(),
        }))?;

    if ticket.status == TICKET_CONFIRMED {
        tracing::info!(
            booking_reference = %ticket.booking_reference,
            transaction_id = ?input.transaction_id,
            "Repeated payment webhook for confirmed ticket"
        );
        return Ok(Json(ticket));
    }
    if ticket.status != TICKET_PENDING {
        return Err(AppError::Core(CoreError::InvalidState(format!(
            "ticket {} is {} and cannot be confirmed",
            ticket.booking_reference, ticket.status
        ))));
    }

    let showtime = ShowtimeRepo::find_with_auditorium(&state.pool, ticket.showtime_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Showtime",
            id: ticket.showtime_id.to_string(),
        }))?;

    let mut buffer = showtime.seat_state.clone();
    {
        let mut grid = SeatGrid::new(&mut buffer, showtime.max_rows, showtime.max_columns)?;
        for &seat in ticket.reserved_seats.0.iter() {
            // A pending ticket owns its cells as Reserved; anything else
            // here is corruption, not a race.
            grid.mark_sold(seat).map_err(|e| {
                CoreError::Internal(format!(
                    "seat state corruption confirming {}: {e}",
                    ticket.booking_reference
                ))
            })?;
        }
    }

    let notification = EmailNotification::booking_confirmed(
        &ticket.user_email,
        &ticket.booking_reference,
        ticket.total_amount,
    );
    let event = NewOutboxMessage {
        event_type: EVENT_EMAIL_NOTIFICATION.to_string(),
        payload: serde_json::to_value(&notification)
            .map_err(|e| AppError::InternalError(format!("event serialization failed: {e}")))?,
    };

    let confirmed = TicketRepo::confirm(
        &state.pool,
        ticket.id,
        showtime.id,
        showtime.version,
        &buffer,
        &event,
    )
    .await?
    .ok_or(AppError::Core(CoreError::Concurrency(
        "ticket state changed underneath this confirmation; retry the webhook".into(),
    )))?;

    state.seat_maps.invalidate(&showtime.id);
    tracing::info!(
        booking_reference = %confirmed.booking_reference,
        transaction_id = ?input.transaction_id,
        status = ?input.status,
        "Payment confirmed"
    );
    Ok(Json(confirmed))
}

/// GET /api/tickets/my-bookings
///
/// Always a list, never an error for unknown users.
pub async fn my_bookings(
    AuthUser(principal): AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<TicketWithDetails>>> {
    let tickets = TicketRepo::list_for_user(&state.pool, &principal.id).await?;
    Ok(Json(tickets))
}
