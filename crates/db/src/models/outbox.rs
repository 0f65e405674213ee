//! Outbox message model.

use hive_core::types::{Id, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `outbox_messages` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct OutboxMessage {
    pub id: Id,
    pub event_type: String,
    pub payload: serde_json::Value,
    pub created_at: Timestamp,
    pub processing_at: Option<Timestamp>,
    pub processed_at: Option<Timestamp>,
    pub retry_count: i32,
    pub error_message: Option<String>,
}

/// Insert shape for staging a new event. Always written inside the same
/// transaction as the business change it describes.
#[derive(Debug, Clone)]
pub struct NewOutboxMessage {
    pub event_type: String,
    pub payload: serde_json::Value,
}
