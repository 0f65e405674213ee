//! Route definitions for the movie catalog.

use axum::routing::get;
use axum::Router;

use crate::handlers::movie;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(movie::list).post(movie::create))
        .route(
            "/{id}",
            get(movie::get_by_id).put(movie::update).delete(movie::delete),
        )
}
