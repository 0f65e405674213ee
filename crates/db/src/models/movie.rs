//! Movie entity model and DTOs.

use chrono::NaiveDate;
use hive_core::types::{Id, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `movies` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Movie {
    pub id: Id,
    pub title: String,
    pub description: String,
    pub duration_minutes: i32,
    pub release_date: NaiveDate,
    pub poster_url: Option<String>,
    pub created_by: String,
    pub updated_by: Option<String>,
    pub deleted_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new movie.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateMovie {
    pub title: String,
    pub description: String,
    pub duration_minutes: i32,
    pub release_date: NaiveDate,
    pub poster_url: Option<String>,
}

/// DTO for updating an existing movie. All fields are optional.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateMovie {
    pub title: Option<String>,
    pub description: Option<String>,
    pub duration_minutes: Option<i32>,
    pub release_date: Option<NaiveDate>,
    pub poster_url: Option<String>,
}
