//! Cinema entity model and DTOs.

use hive_core::types::{Id, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `cinemas` table.
///
/// `organizer_id` is the opaque principal id of the creator and is never
/// rewritten after the insert.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Cinema {
    pub id: Id,
    pub organizer_id: String,
    pub name: String,
    pub location: String,
    pub contact_email: String,
    pub approval_status: String,
    pub created_by: String,
    pub updated_by: Option<String>,
    pub deleted_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new cinema. The organizer id comes from the
/// authenticated principal, not the body.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCinema {
    pub name: String,
    pub location: String,
    pub contact_email: String,
}

/// DTO for updating an existing cinema. All fields are optional.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateCinema {
    pub name: Option<String>,
    pub location: Option<String>,
    pub contact_email: Option<String>,
}
