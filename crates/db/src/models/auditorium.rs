//! Auditorium entity model and DTOs.

use hive_core::layout::AuditoriumLayout;
use hive_core::types::{Id, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;

/// A row from the `auditoriums` table. The layout is an embedded JSON
/// document read together with its auditorium.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Auditorium {
    pub id: Id,
    pub cinema_id: Id,
    pub name: String,
    pub max_rows: i32,
    pub max_columns: i32,
    pub layout: Json<AuditoriumLayout>,
    pub created_by: String,
    pub updated_by: Option<String>,
    pub deleted_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// An auditorium joined to its parent cinema's ownership and approval
/// fields, for policy checks on mutating operations.
#[derive(Debug, Clone, FromRow)]
pub struct AuditoriumWithCinema {
    pub id: Id,
    pub cinema_id: Id,
    pub name: String,
    pub max_rows: i32,
    pub max_columns: i32,
    pub layout: Json<AuditoriumLayout>,
    pub organizer_id: String,
    pub approval_status: String,
}

/// DTO for creating a new auditorium.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateAuditorium {
    pub cinema_id: Id,
    pub name: String,
    pub max_rows: i32,
    pub max_columns: i32,
    /// Defaults to an empty layout if omitted.
    pub layout: Option<AuditoriumLayout>,
}

/// DTO for updating an existing auditorium. Dimensions are immutable after
/// creation: resizing would invalidate every existing showtime buffer.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateAuditorium {
    pub name: Option<String>,
    pub layout: Option<AuditoriumLayout>,
}
