//! Showtime entity model, DTOs, and denormalized read shapes.

use hive_core::layout::AuditoriumLayout;
use hive_core::types::{Id, Timestamp};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;

/// A row from the `showtimes` table.
///
/// `seat_state` is one byte per seat in row-major order; its length always
/// equals `max_rows * max_columns` of the owning auditorium. `version` is
/// the optimistic concurrency token, incremented by every persisted
/// mutation.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Showtime {
    pub id: Id,
    pub movie_id: Id,
    pub auditorium_id: Id,
    pub start_time: Timestamp,
    pub base_price: Decimal,
    #[serde(skip_serializing)]
    pub seat_state: Vec<u8>,
    pub version: i64,
    pub created_by: String,
    pub updated_by: Option<String>,
    pub deleted_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A showtime joined to its auditorium (dimensions + layout) and the
/// owning cinema's policy fields. This is the single-query load used by
/// the reservation, confirmation, and expiry paths.
#[derive(Debug, Clone, FromRow)]
pub struct ShowtimeWithAuditorium {
    pub id: Id,
    pub movie_id: Id,
    pub auditorium_id: Id,
    pub start_time: Timestamp,
    pub base_price: Decimal,
    pub seat_state: Vec<u8>,
    pub version: i64,
    pub max_rows: i32,
    pub max_columns: i32,
    pub layout: Json<AuditoriumLayout>,
    pub cinema_id: Id,
    pub organizer_id: String,
    pub approval_status: String,
}

/// Denormalized source row for rendering a seat map.
#[derive(Debug, Clone, FromRow)]
pub struct SeatMapSource {
    pub id: Id,
    pub start_time: Timestamp,
    pub base_price: Decimal,
    pub seat_state: Vec<u8>,
    pub max_rows: i32,
    pub max_columns: i32,
    pub movie_title: String,
    pub cinema_name: String,
    pub auditorium_name: String,
}

/// DTO for creating a new showtime. The seat buffer is initialized to
/// all-available by the repository.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateShowtime {
    pub movie_id: Id,
    pub auditorium_id: Id,
    pub start_time: Timestamp,
    pub base_price: Decimal,
}

/// DTO for updating an existing showtime. The seat buffer and auditorium
/// binding are not updatable through this path.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateShowtime {
    pub movie_id: Option<Id>,
    pub start_time: Option<Timestamp>,
    pub base_price: Option<Decimal>,
}
