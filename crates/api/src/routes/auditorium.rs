//! Route definitions for auditoriums.

use axum::routing::get;
use axum::Router;

use crate::handlers::auditorium;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(auditorium::list).post(auditorium::create))
        .route(
            "/{id}",
            get(auditorium::get_by_id)
                .put(auditorium::update)
                .delete(auditorium::delete),
        )
        .route("/cinema/{cinema_id}", get(auditorium::list_by_cinema))
}
