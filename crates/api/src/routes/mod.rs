pub mod auditorium;
pub mod cinema;
pub mod health;
pub mod movie;
pub mod showtime;
pub mod ticket;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /movies                          list (GET), create (POST)
/// /movies/{id}                     get (GET), update (PUT), delete (DELETE)
/// /cinemas                         list (GET), create (POST)
/// /cinemas/{id}                    get (GET), update (PUT), delete (DELETE)
/// /cinemas/{id}/status             set_status (PATCH, admin)
/// /auditoriums                     list (GET), create (POST)
/// /auditoriums/{id}                get (GET), update (PUT), delete (DELETE)
/// /auditoriums/cinema/{cinema_id}  list_by_cinema (GET)
/// /showtimes                       create (POST)
/// /showtimes/{id}                  update (PUT), delete (DELETE)
/// /showtimes/{id}/seatmap          seat_map (GET)
/// /tickets/reserve                 reserve (POST)
/// /tickets/my-bookings             my_bookings (GET)
/// /tickets/payment/success         payment_success (POST, webhook)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/movies", movie::router())
        .nest("/cinemas", cinema::router())
        .nest("/auditoriums", auditorium::router())
        .nest("/showtimes", showtime::router())
        .nest("/tickets", ticket::router())
}
