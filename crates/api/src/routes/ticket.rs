//! Route definitions for reservations and the payment webhook.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::ticket;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/reserve", post(ticket::reserve))
        .route("/my-bookings", get(ticket::my_bookings))
        .route("/payment/success", post(ticket::payment_success))
}
