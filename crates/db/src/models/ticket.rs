//! Ticket entity model, DTOs, and the my-bookings read shape.

use hive_core::seating::Seat;
use hive_core::types::{Id, Timestamp};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;

/// A row from the `tickets` table.
///
/// Status values are the constants in `hive_core::booking`. A `pending`
/// ticket holds its seats `Reserved`; a `confirmed` ticket holds them
/// `Sold`; `expired` and `cancelled` tickets no longer own any cells.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Ticket {
    pub id: Id,
    pub user_id: String,
    pub user_email: String,
    pub showtime_id: Id,
    pub booking_reference: String,
    pub reserved_seats: Json<Vec<Seat>>,
    pub total_amount: Decimal,
    pub status: String,
    pub paid_at: Option<Timestamp>,
    pub deleted_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Insert shape for a pending ticket, built by the reservation path.
#[derive(Debug, Clone)]
pub struct CreateTicket {
    pub user_id: String,
    pub user_email: String,
    pub showtime_id: Id,
    pub booking_reference: String,
    pub reserved_seats: Vec<Seat>,
    pub total_amount: Decimal,
}

/// A ticket joined to denormalized read fields for the my-bookings list.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TicketWithDetails {
    pub id: Id,
    pub showtime_id: Id,
    pub booking_reference: String,
    pub reserved_seats: Json<Vec<Seat>>,
    pub total_amount: Decimal,
    pub status: String,
    pub paid_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub movie_title: String,
    pub cinema_name: String,
    pub auditorium_name: String,
    pub start_time: Timestamp,
}

/// Request body for the reserve endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ReserveTicketRequest {
    pub showtime_id: Id,
    pub seats: Vec<Seat>,
}
