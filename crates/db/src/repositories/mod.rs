//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument. Methods that take part in
//! a multi-statement transaction accept `&mut PgConnection` instead.

pub mod auditorium_repo;
pub mod cinema_repo;
pub mod movie_repo;
pub mod outbox_repo;
pub mod showtime_repo;
pub mod ticket_repo;

pub use auditorium_repo::AuditoriumRepo;
pub use cinema_repo::CinemaRepo;
pub use movie_repo::MovieRepo;
pub use outbox_repo::OutboxRepo;
pub use showtime_repo::ShowtimeRepo;
pub use ticket_repo::TicketRepo;
