//! Transactional-outbox dispatch.
//!
//! Producers stage domain events in the `outbox_messages` table inside the
//! transaction that commits the business change; the dispatcher in this
//! crate claims staged rows and publishes them to the AMQP broker with
//! bounded retries, giving at-least-once delivery without a distributed
//! transaction.

pub mod broker;
pub mod dispatcher;
pub mod events;
