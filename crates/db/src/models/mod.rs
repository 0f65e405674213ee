//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) for patches

pub mod auditorium;
pub mod cinema;
pub mod movie;
pub mod outbox;
pub mod showtime;
pub mod ticket;
