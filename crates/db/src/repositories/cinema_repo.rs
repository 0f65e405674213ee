//! Repository for the `cinemas` table.

use hive_core::types::{new_id, Id};
use sqlx::PgPool;

use crate::models::cinema::{Cinema, CreateCinema, UpdateCinema};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, organizer_id, name, location, contact_email, approval_status, \
    created_by, updated_by, deleted_at, created_at, updated_at";

/// Provides CRUD operations for cinemas.
pub struct CinemaRepo;

impl CinemaRepo {
    /// Insert a new cinema owned by `organizer_id`, starting in `pending`
    /// approval.
    pub async fn create(
        pool: &PgPool,
        organizer_id: &str,
        input: &CreateCinema,
    ) -> Result<Cinema, sqlx::Error> {
        let query = format!(
            "INSERT INTO cinemas
                (id, organizer_id, name, location, contact_email, created_by)
             VALUES ($1, $2, $3, $4, $5, $2)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Cinema>(&query)
            .bind(new_id())
            .bind(organizer_id)
            .bind(&input.name)
            .bind(&input.location)
            .bind(&input.contact_email)
            .fetch_one(pool)
            .await
    }

    /// List all cinemas, newest first. Excludes soft-deleted rows.
    pub async fn list(pool: &PgPool) -> Result<Vec<Cinema>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM cinemas WHERE deleted_at IS NULL ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Cinema>(&query).fetch_all(pool).await
    }

    /// Find a cinema by id. Excludes soft-deleted rows.
    pub async fn find_by_id(pool: &PgPool, id: Id) -> Result<Option<Cinema>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM cinemas WHERE id = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, Cinema>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Update a cinema's metadata. `organizer_id` and `approval_status` are
    /// not touched by this path.
    pub async fn update(
        pool: &PgPool,
        id: Id,
        updated_by: &str,
        input: &UpdateCinema,
    ) -> Result<Option<Cinema>, sqlx::Error> {
        let query = format!(
            "UPDATE cinemas SET
                name = COALESCE($2, name),
                location = COALESCE($3, location),
                contact_email = COALESCE($4, contact_email),
                updated_by = $5
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Cinema>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.location)
            .bind(&input.contact_email)
            .bind(updated_by)
            .fetch_optional(pool)
            .await
    }

    /// Set the approval status. Transition validity is checked by the
    /// caller against the current row.
    pub async fn set_approval_status(
        pool: &PgPool,
        id: Id,
        status: &str,
        updated_by: &str,
    ) -> Result<Option<Cinema>, sqlx::Error> {
        let query = format!(
            "UPDATE cinemas SET approval_status = $2, updated_by = $3
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Cinema>(&query)
            .bind(id)
            .bind(status)
            .bind(updated_by)
            .fetch_optional(pool)
            .await
    }

    /// Soft-delete a cinema. Returns `true` if a row was marked deleted.
    pub async fn soft_delete(pool: &PgPool, id: Id, deleted_by: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE cinemas SET deleted_at = NOW(), updated_by = $2
             WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .bind(deleted_by)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
