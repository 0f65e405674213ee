pub mod auditorium;
pub mod cinema;
pub mod health;
pub mod movie;
pub mod showtime;
pub mod ticket;
