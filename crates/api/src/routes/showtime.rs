//! Route definitions for showtimes and the public seat map.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::showtime;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(showtime::create))
        .route("/{id}", put(showtime::update).delete(showtime::delete))
        .route("/{id}/seatmap", get(showtime::seat_map))
}
