//! Repository for the `outbox_messages` table.
//!
//! Writers insert rows inside the transaction that commits the business
//! change; the dispatcher claims rows with a skip-locked select so two
//! dispatcher instances never process the same row. The `processing_at`
//! sentinel plus the stuck-reset pass stands in for a lease.

use hive_core::types::{new_id, Id, Timestamp};
use sqlx::{PgConnection, PgPool};

use crate::models::outbox::{NewOutboxMessage, OutboxMessage};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, event_type, payload, created_at, processing_at, processed_at, \
    retry_count, error_message";

/// Provides staging and claiming operations for outbox messages.
pub struct OutboxRepo;

impl OutboxRepo {
    /// Stage a new event. Must be called on the same connection as the
    /// business transaction so both commit or neither does.
    pub async fn enqueue(
        conn: &mut PgConnection,
        input: &NewOutboxMessage,
    ) -> Result<OutboxMessage, sqlx::Error> {
        let query = format!(
            "INSERT INTO outbox_messages (id, event_type, payload)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, OutboxMessage>(&query)
            .bind(new_id())
            .bind(&input.event_type)
            .bind(&input.payload)
            .fetch_one(conn)
            .await
    }

    /// Clear claims whose `processing_at` is older than `older_than` and
    /// never completed. Those rows become claimable again on the next pass.
    pub async fn reset_stuck(pool: &PgPool, older_than: Timestamp) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE outbox_messages SET processing_at = NULL
             WHERE processing_at IS NOT NULL
               AND processed_at IS NULL
               AND processing_at < $1",
        )
        .bind(older_than)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Claim up to `limit` unprocessed rows oldest-first, marking them
    /// `processing_at = NOW()` in the same statement. `FOR UPDATE SKIP
    /// LOCKED` keeps concurrent dispatchers off each other's rows.
    pub async fn claim_batch(
        pool: &PgPool,
        limit: i64,
        max_retries: i32,
    ) -> Result<Vec<OutboxMessage>, sqlx::Error> {
        let query = format!(
            "UPDATE outbox_messages SET processing_at = NOW()
             WHERE id IN (
                 SELECT id FROM outbox_messages
                 WHERE processed_at IS NULL
                   AND processing_at IS NULL
                   AND retry_count < $2
                 ORDER BY created_at ASC, id ASC
                 LIMIT $1
                 FOR UPDATE SKIP LOCKED
             )
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, OutboxMessage>(&query)
            .bind(limit)
            .bind(max_retries)
            .fetch_all(pool)
            .await
    }

    /// Record a successful publish.
    pub async fn mark_processed(pool: &PgPool, id: Id) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE outbox_messages
             SET processed_at = NOW(), error_message = NULL
             WHERE id = $1",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Record a failed publish: bump the retry counter, keep the error for
    /// the audit trail, and release the claim. Once the counter reaches
    /// `max_retries` the row is poisoned by setting `processed_at` so it is
    /// never claimed again.
    pub async fn record_failure(
        pool: &PgPool,
        id: Id,
        error_message: &str,
        max_retries: i32,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE outbox_messages
             SET retry_count = retry_count + 1,
                 error_message = $2,
                 processing_at = NULL,
                 processed_at = CASE WHEN retry_count + 1 >= $3 THEN NOW() ELSE processed_at END
             WHERE id = $1",
        )
        .bind(id)
        .bind(error_message)
        .bind(max_retries)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Fetch a row by id regardless of state, for tests and audit tooling.
    pub async fn find_by_id(pool: &PgPool, id: Id) -> Result<Option<OutboxMessage>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM outbox_messages WHERE id = $1");
        sqlx::query_as::<_, OutboxMessage>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// All rows for a given event type, newest first. Used by tests
    /// asserting that a confirmation staged exactly one event.
    pub async fn list_by_event_type(
        pool: &PgPool,
        event_type: &str,
    ) -> Result<Vec<OutboxMessage>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM outbox_messages
             WHERE event_type = $1
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, OutboxMessage>(&query)
            .bind(event_type)
            .fetch_all(pool)
            .await
    }
}
