//! Long-lived background tasks spawned by the server after migrations
//! complete: the seat-hold expiry sweep here, and the outbox dispatcher
//! from `hive_outbox`.

pub mod expiry;
