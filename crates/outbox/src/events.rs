//! Domain event payloads carried through the outbox.
//!
//! Payload field names are stable: downstream consumers (the identity
//! service's email worker) deserialize by name.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Event type stored on the outbox row for email notifications.
pub const EVENT_EMAIL_NOTIFICATION: &str = "EmailNotification";

/// Routing key for email notifications on the notifications exchange.
pub const EMAIL_ROUTING_KEY: &str = "identity.email";

/// An email to be rendered and sent by the identity service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailNotification {
    pub recipient_email: String,
    pub subject: String,
    pub template_code: String,
    pub variables: HashMap<String, String>,
}

impl EmailNotification {
    /// The booking-confirmed email staged when a payment succeeds.
    pub fn booking_confirmed(
        recipient_email: &str,
        booking_reference: &str,
        total_amount: Decimal,
    ) -> Self {
        let mut variables = HashMap::new();
        variables.insert("booking_reference".to_string(), booking_reference.to_string());
        variables.insert("total_amount".to_string(), total_amount.to_string());
        Self {
            recipient_email: recipient_email.to_string(),
            subject: format!("Your booking {booking_reference} is confirmed"),
            template_code: "booking-confirmed".to_string(),
            variables,
        }
    }
}
