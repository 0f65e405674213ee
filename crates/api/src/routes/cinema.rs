//! Route definitions for cinemas, including the admin approval endpoint.

use axum::routing::{get, patch};
use axum::Router;

use crate::handlers::cinema;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(cinema::list).post(cinema::create))
        .route(
            "/{id}",
            get(cinema::get_by_id)
                .put(cinema::update)
                .delete(cinema::delete),
        )
        .route("/{id}/status", patch(cinema::set_status))
}
