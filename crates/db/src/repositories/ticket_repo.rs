//! Repository for the `tickets` table.
//!
//! The lifecycle transitions (Pending -> Confirmed / Expired) are each a
//! single transaction combining the ticket write with the showtime buffer
//! compare-and-swap, so a ticket can never disagree with the cells it
//! owns. Methods returning `Ok(None)` signal a lost CAS race; the caller
//! decides whether that is a 409 (confirm) or a skip-until-next-tick
//! (expiry sweep).

use hive_core::booking::{TICKET_CONFIRMED, TICKET_EXPIRED, TICKET_PENDING};
use hive_core::types::{Id, new_id, Timestamp};
use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::outbox::NewOutboxMessage;
use crate::models::ticket::{CreateTicket, Ticket, TicketWithDetails};
use crate::repositories::{OutboxRepo, ShowtimeRepo};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, user_email, showtime_id, booking_reference, \
    reserved_seats, total_amount, status, paid_at, deleted_at, created_at, updated_at";

/// Provides lifecycle operations for tickets.
pub struct TicketRepo;

impl TicketRepo {
    /// Atomically persist a reservation: the mutated seat buffer under the
    /// showtime's version token plus the new Pending ticket.
    ///
    /// Returns `Ok(None)` when the version token no longer matches (a
    /// concurrent writer got there first); nothing is written in that case.
    /// A `booking_reference` collision surfaces as a unique-violation
    /// database error and rolls the transaction back.
    pub async fn create_pending(
        pool: &PgPool,
        showtime_id: Id,
        expected_version: i64,
        seat_state: &[u8],
        input: &CreateTicket,
    ) -> Result<Option<Ticket>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let swapped =
            ShowtimeRepo::update_seat_state(&mut *tx, showtime_id, seat_state, expected_version)
                .await?;
        if !swapped {
            return Ok(None);
        }

        let query = format!(
            "INSERT INTO tickets
                (id, user_id, user_email, showtime_id, booking_reference,
                 reserved_seats, total_amount, status)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        let ticket = sqlx::query_as::<_, Ticket>(&query)
            .bind(new_id())
            .bind(&input.user_id)
            .bind(&input.user_email)
            .bind(input.showtime_id)
            .bind(&input.booking_reference)
            .bind(Json(&input.reserved_seats))
            .bind(input.total_amount)
            .bind(TICKET_PENDING)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(ticket))
    }

    /// Find a ticket by its booking reference. Excludes soft-deleted rows.
    pub async fn find_by_reference(
        pool: &PgPool,
        booking_reference: &str,
    ) -> Result<Option<Ticket>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM tickets
             WHERE booking_reference = $1 AND deleted_at IS NULL"
        );
        sqlx::query_as::<_, Ticket>(&query)
            .bind(booking_reference)
            .fetch_optional(pool)
            .await
    }

    /// Atomically confirm a paid ticket: flip the buffer cells to sold
    /// under the version token, mark the ticket Confirmed, and stage the
    /// notification event in the outbox, all in one transaction.
    ///
    /// Returns `Ok(None)` when either the version token or the ticket's
    /// Pending status was lost to a concurrent writer.
    pub async fn confirm(
        pool: &PgPool,
        ticket_id: Id,
        showtime_id: Id,
        expected_version: i64,
        seat_state: &[u8],
        event: &NewOutboxMessage,
    ) -> Result<Option<Ticket>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let swapped =
            ShowtimeRepo::update_seat_state(&mut *tx, showtime_id, seat_state, expected_version)
                .await?;
        if !swapped {
            return Ok(None);
        }

        let query = format!(
            "UPDATE tickets SET status = $2, paid_at = NOW()
             WHERE id = $1 AND status = $3 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        let Some(ticket) = sqlx::query_as::<_, Ticket>(&query)
            .bind(ticket_id)
            .bind(TICKET_CONFIRMED)
            .bind(TICKET_PENDING)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(None);
        };

        OutboxRepo::enqueue(&mut *tx, event).await?;

        tx.commit().await?;
        Ok(Some(ticket))
    }

    /// Atomically expire an overdue hold: write the released buffer under
    /// the version token and mark the ticket Expired.
    ///
    /// Returns `Ok(None)` on a lost race (buffer changed, or the ticket was
    /// confirmed concurrently); the sweep retries on its next tick.
    pub async fn expire(
        pool: &PgPool,
        ticket_id: Id,
        showtime_id: Id,
        expected_version: i64,
        seat_state: &[u8],
    ) -> Result<Option<Ticket>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let swapped =
            ShowtimeRepo::update_seat_state(&mut *tx, showtime_id, seat_state, expected_version)
                .await?;
        if !swapped {
            return Ok(None);
        }

        let query = format!(
            "UPDATE tickets SET status = $2
             WHERE id = $1 AND status = $3 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        let Some(ticket) = sqlx::query_as::<_, Ticket>(&query)
            .bind(ticket_id)
            .bind(TICKET_EXPIRED)
            .bind(TICKET_PENDING)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(None);
        };

        tx.commit().await?;
        Ok(Some(ticket))
    }

    /// Pending tickets created before `cutoff`, oldest first. The expiry
    /// sweep's work list.
    pub async fn list_overdue_pending(
        pool: &PgPool,
        cutoff: Timestamp,
    ) -> Result<Vec<Ticket>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM tickets
             WHERE status = $1 AND created_at < $2 AND deleted_at IS NULL
             ORDER BY created_at ASC"
        );
        sqlx::query_as::<_, Ticket>(&query)
            .bind(TICKET_PENDING)
            .bind(cutoff)
            .fetch_all(pool)
            .await
    }

    /// All tickets of a user joined to denormalized read fields, newest
    /// first. Unknown users simply yield an empty list.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: &str,
    ) -> Result<Vec<TicketWithDetails>, sqlx::Error> {
        sqlx::query_as::<_, TicketWithDetails>(
            "SELECT t.id, t.showtime_id, t.booking_reference, t.reserved_seats,
                    t.total_amount, t.status, t.paid_at, t.created_at,
                    m.title AS movie_title, c.name AS cinema_name,
                    a.name AS auditorium_name, s.start_time
             FROM tickets t
             JOIN showtimes s ON s.id = t.showtime_id
             JOIN movies m ON m.id = s.movie_id
             JOIN auditoriums a ON a.id = s.auditorium_id
             JOIN cinemas c ON c.id = a.cinema_id
             WHERE t.user_id = $1 AND t.deleted_at IS NULL
             ORDER BY t.created_at DESC",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    /// Number of live tickets for a showtime, for tests asserting that a
    /// failed reservation left nothing behind.
    pub async fn count_for_showtime(pool: &PgPool, showtime_id: Id) -> Result<i64, sqlx::Error> {
        let row: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM tickets WHERE showtime_id = $1 AND deleted_at IS NULL",
        )
        .bind(showtime_id)
        .fetch_one(pool)
        .await?;
        Ok(row.0)
    }
}
