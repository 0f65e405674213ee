//! Repository for the `showtimes` table.
//!
//! Every update increments the `version` token; seat-state writes are
//! compare-and-swap on it. Last-writer-wins is never used here.

use hive_core::types::{new_id, Id};
use sqlx::{PgConnection, PgPool};

use crate::models::showtime::{
    CreateShowtime, SeatMapSource, Showtime, ShowtimeWithAuditorium, UpdateShowtime,
};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, movie_id, auditorium_id, start_time, base_price, seat_state, \
    version, created_by, updated_by, deleted_at, created_at, updated_at";

/// Columns for the auditorium-joined load used by the reservation paths.
const JOINED_COLUMNS: &str = "s.id, s.movie_id, s.auditorium_id, s.start_time, s.base_price, \
    s.seat_state, s.version, a.max_rows, a.max_columns, a.layout, \
    c.id AS cinema_id, c.organizer_id, c.approval_status";

/// Provides CRUD and seat-state operations for showtimes.
pub struct ShowtimeRepo;

impl ShowtimeRepo {
    /// Insert a new showtime with an all-available seat buffer sized to the
    /// auditorium grid.
    pub async fn create(
        pool: &PgPool,
        created_by: &str,
        input: &CreateShowtime,
        max_rows: i32,
        max_columns: i32,
    ) -> Result<Showtime, sqlx::Error> {
        let seat_state = vec![0u8; max_rows as usize * max_columns as usize];
        let query = format!(
            "INSERT INTO showtimes
                (id, movie_id, auditorium_id, start_time, base_price, seat_state, created_by)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Showtime>(&query)
            .bind(new_id())
            .bind(input.movie_id)
            .bind(input.auditorium_id)
            .bind(input.start_time)
            .bind(input.base_price)
            .bind(seat_state)
            .bind(created_by)
            .fetch_one(pool)
            .await
    }

    /// Find a showtime by id. Excludes soft-deleted rows.
    pub async fn find_by_id(pool: &PgPool, id: Id) -> Result<Option<Showtime>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM showtimes WHERE id = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, Showtime>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Load a showtime together with its auditorium layout and the owning
    /// cinema's policy fields in one query. This is the entry point of the
    /// reservation, confirmation, and expiry paths.
    pub async fn find_with_auditorium(
        pool: &PgPool,
        id: Id,
    ) -> Result<Option<ShowtimeWithAuditorium>, sqlx::Error> {
        let query = format!(
            "SELECT {JOINED_COLUMNS}
             FROM showtimes s
             JOIN auditoriums a ON a.id = s.auditorium_id AND a.deleted_at IS NULL
             JOIN cinemas c ON c.id = a.cinema_id AND c.deleted_at IS NULL
             WHERE s.id = $1 AND s.deleted_at IS NULL"
        );
        sqlx::query_as::<_, ShowtimeWithAuditorium>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Load the denormalized source row for rendering a seat map.
    pub async fn seat_map_source(
        pool: &PgPool,
        id: Id,
    ) -> Result<Option<SeatMapSource>, sqlx::Error> {
        sqlx::query_as::<_, SeatMapSource>(
            "SELECT s.id, s.start_time, s.base_price, s.seat_state,
                    a.max_rows, a.max_columns,
                    m.title AS movie_title, c.name AS cinema_name,
                    a.name AS auditorium_name
             FROM showtimes s
             JOIN movies m ON m.id = s.movie_id AND m.deleted_at IS NULL
             JOIN auditoriums a ON a.id = s.auditorium_id AND a.deleted_at IS NULL
             JOIN cinemas c ON c.id = a.cinema_id AND c.deleted_at IS NULL
             WHERE s.id = $1 AND s.deleted_at IS NULL",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Update showtime metadata. Only non-`None` fields are applied; the
    /// version token advances like on any other persisted mutation.
    pub async fn update(
        pool: &PgPool,
        id: Id,
        updated_by: &str,
        input: &UpdateShowtime,
    ) -> Result<Option<Showtime>, sqlx::Error> {
        let query = format!(
            "UPDATE showtimes SET
                movie_id = COALESCE($2, movie_id),
                start_time = COALESCE($3, start_time),
                base_price = COALESCE($4, base_price),
                version = version + 1,
                updated_by = $5
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Showtime>(&query)
            .bind(id)
            .bind(input.movie_id)
            .bind(input.start_time)
            .bind(input.base_price)
            .bind(updated_by)
            .fetch_optional(pool)
            .await
    }

    /// Compare-and-swap the seat buffer: the write only lands if `version`
    /// still matches `expected_version`. Returns `false` on a token
    /// mismatch, in which case the caller's transaction must roll back.
    pub async fn update_seat_state(
        conn: &mut PgConnection,
        id: Id,
        seat_state: &[u8],
        expected_version: i64,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE showtimes SET seat_state = $2, version = version + 1
             WHERE id = $1 AND version = $3 AND deleted_at IS NULL",
        )
        .bind(id)
        .bind(seat_state)
        .bind(expected_version)
        .execute(conn)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Soft-delete a showtime. Returns `true` if a row was marked deleted.
    pub async fn soft_delete(pool: &PgPool, id: Id, deleted_by: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE showtimes SET deleted_at = NOW(), version = version + 1, updated_by = $2
             WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .bind(deleted_by)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Current version token, for tests asserting the CAS behaviour.
    /// Includes soft-deleted rows.
    pub async fn current_version(pool: &PgPool, id: Id) -> Result<Option<i64>, sqlx::Error> {
        let row: Option<(i64,)> = sqlx::query_as("SELECT version FROM showtimes WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(row.map(|r| r.0))
    }

    /// Raw seat buffer, for tests asserting cell transitions. Includes
    /// soft-deleted rows.
    pub async fn current_seat_state(
        pool: &PgPool,
        id: Id,
    ) -> Result<Option<Vec<u8>>, sqlx::Error> {
        let row: Option<(Vec<u8>,)> =
            sqlx::query_as("SELECT seat_state FROM showtimes WHERE id = $1")
                .bind(id)
                .fetch_optional(pool)
                .await?;
        Ok(row.map(|r| r.0))
    }
}
