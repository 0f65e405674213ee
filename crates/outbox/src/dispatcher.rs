//! Outbox dispatcher: claims staged events and publishes them to the
//! broker with bounded retries.
//!
//! Coordination between replicas happens entirely in storage: the claim is
//! a skip-locked update, the `processing_at` sentinel is the lease, and a
//! stuck-reset pass reclaims leases from dispatchers that died mid-batch.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use hive_db::models::outbox::OutboxMessage;
use hive_db::repositories::OutboxRepo;
use hive_db::DbPool;
use tokio_util::sync::CancellationToken;

use crate::broker::EventPublisher;
use crate::events::{EmailNotification, EMAIL_ROUTING_KEY, EVENT_EMAIL_NOTIFICATION};

/// Tuning for the dispatch loop. The API layer builds this from its
/// environment configuration.
#[derive(Debug, Clone)]
pub struct DispatcherConfig {
    /// How often the loop wakes up.
    pub tick_interval: Duration,
    /// Maximum rows claimed per tick.
    pub batch_size: i64,
    /// Age after which a live claim is considered abandoned.
    pub stuck_timeout: Duration,
    /// Failed attempts before a row is poisoned.
    pub max_retries: i32,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_secs(10),
            batch_size: 50,
            stuck_timeout: Duration::from_secs(300),
            max_retries: 5,
        }
    }
}

/// Outcome of a single dispatch pass, for logging and tests.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct DispatchStats {
    pub reclaimed: u64,
    pub published: u64,
    pub failed: u64,
}

/// Run the dispatch loop until `cancel` is triggered. The current pass is
/// always finished before shutdown.
pub async fn run(
    pool: DbPool,
    publisher: Arc<dyn EventPublisher>,
    config: DispatcherConfig,
    cancel: CancellationToken,
) {
    tracing::info!(
        tick_secs = config.tick_interval.as_secs(),
        batch_size = config.batch_size,
        max_retries = config.max_retries,
        "Outbox dispatcher started"
    );

    let mut interval = tokio::time::interval(config.tick_interval);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Outbox dispatcher stopping");
                break;
            }
            _ = interval.tick() => {
                match run_once(&pool, publisher.as_ref(), &config).await {
                    Ok(stats) if stats.published > 0 || stats.failed > 0 || stats.reclaimed > 0 => {
                        tracing::info!(
                            published = stats.published,
                            failed = stats.failed,
                            reclaimed = stats.reclaimed,
                            "Outbox dispatch pass complete"
                        );
                    }
                    Ok(_) => {}
                    Err(e) => {
                        tracing::error!(error = %e, "Outbox dispatch pass failed");
                    }
                }
            }
        }
    }
}

/// One dispatch pass: reset stuck claims, claim a batch, publish each row.
///
/// Publish failures are recorded per row and never abort the pass; storage
/// errors do, and the affected claims are recovered by the stuck-reset on
/// a later pass.
pub async fn run_once(
    pool: &DbPool,
    publisher: &dyn EventPublisher,
    config: &DispatcherConfig,
) -> Result<DispatchStats, sqlx::Error> {
    let mut stats = DispatchStats::default();

    let stuck_cutoff = Utc::now()
        - chrono::Duration::from_std(config.stuck_timeout)
            .unwrap_or_else(|_| chrono::Duration::seconds(300));
    stats.reclaimed = OutboxRepo::reset_stuck(pool, stuck_cutoff).await?;
    if stats.reclaimed > 0 {
        tracing::warn!(reclaimed = stats.reclaimed, "Reclaimed stuck outbox messages");
    }

    let batch = OutboxRepo::claim_batch(pool, config.batch_size, config.max_retries).await?;
    for message in batch {
        match dispatch_one(publisher, &message).await {
            Ok(()) => {
                OutboxRepo::mark_processed(pool, message.id).await?;
                stats.published += 1;
            }
            Err(error) => {
                tracing::warn!(
                    message_id = %message.id,
                    event_type = %message.event_type,
                    retry_count = message.retry_count,
                    error = %error,
                    "Outbox publish failed"
                );
                OutboxRepo::record_failure(pool, message.id, &error, config.max_retries).await?;
                stats.failed += 1;
            }
        }
    }

    Ok(stats)
}

/// Validate and publish a single claimed row. The payload is deserialized
/// before publishing so a malformed row burns retries instead of looping
/// forever.
async fn dispatch_one(
    publisher: &dyn EventPublisher,
    message: &OutboxMessage,
) -> Result<(), String> {
    if message.event_type != EVENT_EMAIL_NOTIFICATION {
        return Err(format!("unknown event type '{}'", message.event_type));
    }
    let event: EmailNotification = serde_json::from_value(message.payload.clone())
        .map_err(|e| format!("malformed payload: {e}"))?;

    let payload =
        serde_json::to_vec(&event).map_err(|e| format!("payload serialization failed: {e}"))?;
    publisher
        .publish(EMAIL_ROUTING_KEY, message.id, &payload)
        .await
        .map_err(|e| e.to_string())
}
