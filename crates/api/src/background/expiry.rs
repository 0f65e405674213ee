//! Periodic reclaim of unpaid seat holds.
//!
//! Every tick the sweep selects Pending tickets older than the hold
//! window, releases their cells, and marks them Expired. Each ticket is a
//! self-contained unit: one showtime's version conflict or error never
//! aborts the rest of the sweep, it just waits for the next tick.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use hive_core::seating::{SeatGrid, SeatStatus};
use hive_core::types::Id;
use hive_db::models::ticket::Ticket;
use hive_db::repositories::{ShowtimeRepo, TicketRepo};
use hive_db::DbPool;
use tokio_util::sync::CancellationToken;

use crate::cache::TtlCache;
use crate::handlers::showtime::SeatMapView;

/// Outcome of one sweep, for logging and tests.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SweepStats {
    pub expired: u64,
    pub skipped: u64,
}

/// Run the expiry loop until `cancel` is triggered. The current tick is
/// always finished before shutdown.
pub async fn run(
    pool: DbPool,
    seat_maps: Arc<TtlCache<Id, SeatMapView>>,
    hold_window: Duration,
    tick_interval: Duration,
    cancel: CancellationToken,
) {
    tracing::info!(
        hold_window_secs = hold_window.as_secs(),
        tick_secs = tick_interval.as_secs(),
        "Expiry worker started"
    );

    let mut interval = tokio::time::interval(tick_interval);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Expiry worker stopping");
                break;
            }
            _ = interval.tick() => {
                match run_sweep(&pool, &seat_maps, hold_window).await {
                    Ok(stats) if stats.expired > 0 || stats.skipped > 0 => {
                        tracing::info!(
                            expired = stats.expired,
                            skipped = stats.skipped,
                            "Expiry sweep complete"
                        );
                    }
                    Ok(_) => {}
                    Err(e) => {
                        tracing::error!(error = %e, "Expiry sweep failed");
                    }
                }
            }
        }
    }
}

/// One sweep over all overdue holds.
pub async fn run_sweep(
    pool: &DbPool,
    seat_maps: &TtlCache<Id, SeatMapView>,
    hold_window: Duration,
) -> Result<SweepStats, sqlx::Error> {
    let cutoff = Utc::now()
        - chrono::Duration::from_std(hold_window).unwrap_or_else(|_| chrono::Duration::minutes(10));
    let overdue = TicketRepo::list_overdue_pending(pool, cutoff).await?;

    let mut stats = SweepStats::default();
    for ticket in overdue {
        match expire_one(pool, &ticket).await {
            Ok(true) => {
                seat_maps.invalidate(&ticket.showtime_id);
                stats.expired += 1;
            }
            Ok(false) => {
                // Lost a race with a confirmation or another writer; the
                // ticket is picked up again next tick if still pending.
                tracing::info!(
                    booking_reference = %ticket.booking_reference,
                    showtime_id = %ticket.showtime_id,
                    "Expiry skipped on version conflict"
                );
                stats.skipped += 1;
            }
            Err(e) => {
                tracing::error!(
                    booking_reference = %ticket.booking_reference,
                    error = %e,
                    "Expiry failed for ticket"
                );
                stats.skipped += 1;
            }
        }
    }
    Ok(stats)
}

/// Release one overdue hold under its showtime's version token.
async fn expire_one(pool: &DbPool, ticket: &Ticket) -> Result<bool, sqlx::Error> {
    let Some(showtime) = ShowtimeRepo::find_with_auditorium(pool, ticket.showtime_id).await? else {
        // The showtime is gone (soft-deleted); there are no cells left to
        // release, so just retire the hold.
        let expired = sqlx::query(
            "UPDATE tickets SET status = 'expired'
             WHERE id = $1 AND status = 'pending' AND deleted_at IS NULL",
        )
        .bind(ticket.id)
        .execute(pool)
        .await?;
        return Ok(expired.rows_affected() > 0);
    };

    let mut buffer = showtime.seat_state.clone();
    {
        let mut grid = match SeatGrid::new(&mut buffer, showtime.max_rows, showtime.max_columns) {
            Ok(grid) => grid,
            Err(e) => {
                tracing::error!(
                    showtime_id = %showtime.id,
                    error = %e,
                    "Expiry found a malformed seat buffer"
                );
                return Ok(false);
            }
        };
        for &seat in ticket.reserved_seats.0.iter() {
            // Cells that are no longer Reserved (already released, or sold
            // by a racing confirmation) are skipped silently; the version
            // token below arbitrates who wins.
            match grid.status(seat) {
                Ok(SeatStatus::Reserved) => {
                    if let Err(e) = grid.release(seat) {
                        tracing::error!(seat = %seat, error = %e, "Expiry release failed");
                    }
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::error!(seat = %seat, error = %e, "Expiry found a corrupt cell");
                }
            }
        }
    }

    let expired = TicketRepo::expire(
        pool,
        ticket.id,
        showtime.id,
        showtime.version,
        &buffer,
    )
    .await?;
    Ok(expired.is_some())
}
