//! Repository for the `auditoriums` table.

use hive_core::types::{new_id, Id};
use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::auditorium::{
    Auditorium, AuditoriumWithCinema, CreateAuditorium, UpdateAuditorium,
};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, cinema_id, name, max_rows, max_columns, layout, \
    created_by, updated_by, deleted_at, created_at, updated_at";

/// Columns for the cinema-joined policy view (prefixed with the table alias).
const JOINED_COLUMNS: &str = "a.id, a.cinema_id, a.name, a.max_rows, a.max_columns, a.layout, \
    c.organizer_id, c.approval_status";

/// Provides CRUD operations for auditoriums.
pub struct AuditoriumRepo;

impl AuditoriumRepo {
    /// Insert a new auditorium, returning the created row. The layout must
    /// already be validated against the dimensions.
    pub async fn create(
        pool: &PgPool,
        created_by: &str,
        input: &CreateAuditorium,
    ) -> Result<Auditorium, sqlx::Error> {
        let layout = input.layout.clone().unwrap_or_default();
        let query = format!(
            "INSERT INTO auditoriums
                (id, cinema_id, name, max_rows, max_columns, layout, created_by)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Auditorium>(&query)
            .bind(new_id())
            .bind(input.cinema_id)
            .bind(&input.name)
            .bind(input.max_rows)
            .bind(input.max_columns)
            .bind(Json(layout))
            .bind(created_by)
            .fetch_one(pool)
            .await
    }

    /// List all auditoriums, newest first. Excludes soft-deleted rows.
    pub async fn list(pool: &PgPool) -> Result<Vec<Auditorium>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM auditoriums WHERE deleted_at IS NULL ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Auditorium>(&query).fetch_all(pool).await
    }

    /// List all auditoriums of a cinema. Excludes soft-deleted rows.
    pub async fn list_by_cinema(
        pool: &PgPool,
        cinema_id: Id,
    ) -> Result<Vec<Auditorium>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM auditoriums
             WHERE cinema_id = $1 AND deleted_at IS NULL
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Auditorium>(&query)
            .bind(cinema_id)
            .fetch_all(pool)
            .await
    }

    /// Find an auditorium by id. Excludes soft-deleted rows.
    pub async fn find_by_id(pool: &PgPool, id: Id) -> Result<Option<Auditorium>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM auditoriums WHERE id = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, Auditorium>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find an auditorium joined to its cinema's ownership and approval
    /// fields, for policy checks before mutating operations.
    pub async fn find_with_cinema(
        pool: &PgPool,
        id: Id,
    ) -> Result<Option<AuditoriumWithCinema>, sqlx::Error> {
        let query = format!(
            "SELECT {JOINED_COLUMNS}
             FROM auditoriums a
             JOIN cinemas c ON c.id = a.cinema_id AND c.deleted_at IS NULL
             WHERE a.id = $1 AND a.deleted_at IS NULL"
        );
        sqlx::query_as::<_, AuditoriumWithCinema>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Update an auditorium's name and/or layout. Dimensions are immutable.
    pub async fn update(
        pool: &PgPool,
        id: Id,
        updated_by: &str,
        input: &UpdateAuditorium,
    ) -> Result<Option<Auditorium>, sqlx::Error> {
        let layout = input.layout.clone().map(Json);
        let query = format!(
            "UPDATE auditoriums SET
                name = COALESCE($2, name),
                layout = COALESCE($3, layout),
                updated_by = $4
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Auditorium>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(layout)
            .bind(updated_by)
            .fetch_optional(pool)
            .await
    }

    /// Soft-delete an auditorium. Returns `true` if a row was marked deleted.
    pub async fn soft_delete(pool: &PgPool, id: Id, deleted_by: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE auditoriums SET deleted_at = NOW(), updated_by = $2
             WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .bind(deleted_by)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
