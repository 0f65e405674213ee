//! Repository for the `movies` table.

use hive_core::types::{new_id, Id};
use sqlx::PgPool;

use crate::models::movie::{CreateMovie, Movie, UpdateMovie};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, title, description, duration_minutes, release_date, poster_url, \
    created_by, updated_by, deleted_at, created_at, updated_at";

/// Provides CRUD operations for movies.
pub struct MovieRepo;

impl MovieRepo {
    /// Insert a new movie, returning the created row.
    pub async fn create(
        pool: &PgPool,
        created_by: &str,
        input: &CreateMovie,
    ) -> Result<Movie, sqlx::Error> {
        let query = format!(
            "INSERT INTO movies
                (id, title, description, duration_minutes, release_date, poster_url, created_by)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Movie>(&query)
            .bind(new_id())
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.duration_minutes)
            .bind(input.release_date)
            .bind(&input.poster_url)
            .bind(created_by)
            .fetch_one(pool)
            .await
    }

    /// List all movies, newest first. Excludes soft-deleted rows.
    pub async fn list(pool: &PgPool) -> Result<Vec<Movie>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM movies WHERE deleted_at IS NULL ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Movie>(&query).fetch_all(pool).await
    }

    /// Find a movie by id. Excludes soft-deleted rows.
    pub async fn find_by_id(pool: &PgPool, id: Id) -> Result<Option<Movie>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM movies WHERE id = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, Movie>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Update a movie. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no live row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: Id,
        updated_by: &str,
        input: &UpdateMovie,
    ) -> Result<Option<Movie>, sqlx::Error> {
        let query = format!(
            "UPDATE movies SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                duration_minutes = COALESCE($4, duration_minutes),
                release_date = COALESCE($5, release_date),
                poster_url = COALESCE($6, poster_url),
                updated_by = $7
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Movie>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.duration_minutes)
            .bind(input.release_date)
            .bind(&input.poster_url)
            .bind(updated_by)
            .fetch_optional(pool)
            .await
    }

    /// Soft-delete a movie. Returns `true` if a row was marked deleted.
    pub async fn soft_delete(pool: &PgPool, id: Id, deleted_by: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE movies SET deleted_at = NOW(), updated_by = $2
             WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .bind(deleted_by)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
