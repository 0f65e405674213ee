//! Per-showtime seat availability engine.
//!
//! [`SeatGrid`] interprets a showtime's raw availability buffer as a
//! row-major byte grid of [`SeatStatus`] cells and performs the per-cell
//! state transitions. It borrows the buffer, owns no memory, and never
//! resizes. It is not safe for concurrent mutation: callers serialize
//! access through the showtime's optimistic version token in storage.
//!
//! Cell state machine:
//!
//! ```text
//! Available --try_reserve--> Reserved --mark_sold--> Sold
//!                                 \---release------> Available
//! ```

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// State of a single seat cell. The byte values are the persisted encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum SeatStatus {
    Available = 0,
    Reserved = 1,
    Sold = 2,
}

impl SeatStatus {
    /// Decode a persisted byte. Returns `None` for corrupt values.
    pub fn from_byte(byte: u8) -> Option<SeatStatus> {
        match byte {
            0 => Some(SeatStatus::Available),
            1 => Some(SeatStatus::Reserved),
            2 => Some(SeatStatus::Sold),
            _ => None,
        }
    }

    pub fn as_byte(self) -> u8 {
        self as u8
    }
}

/// A (row, column) coordinate into an auditorium grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Seat {
    pub row: i32,
    pub col: i32,
}

impl Seat {
    pub fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }
}

impl std::fmt::Display for Seat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Seat-state engine over an externally-owned buffer.
#[derive(Debug)]
pub struct SeatGrid<'a> {
    cells: &'a mut [u8],
    max_rows: i32,
    max_columns: i32,
}

impl<'a> SeatGrid<'a> {
    /// Construct an engine over `cells` with the given grid dimensions.
    ///
    /// Fails if the dimensions are non-positive or the buffer length does
    /// not equal `max_rows * max_columns`.
    pub fn new(cells: &'a mut [u8], max_rows: i32, max_columns: i32) -> Result<Self, CoreError> {
        if max_rows <= 0 || max_columns <= 0 {
            return Err(CoreError::Validation(format!(
                "invalid grid dimensions {max_rows}x{max_columns}"
            )));
        }
        let expected = max_rows as usize * max_columns as usize;
        if cells.len() != expected {
            return Err(CoreError::Internal(format!(
                "seat buffer length {} does not match {max_rows}x{max_columns} grid",
                cells.len()
            )));
        }
        Ok(Self {
            cells,
            max_rows,
            max_columns,
        })
    }

    /// Row-major index of `seat`, bounds-checked before any memory access.
    fn index(&self, seat: Seat) -> Result<usize, CoreError> {
        if seat.row < 0 || seat.row >= self.max_rows || seat.col < 0 || seat.col >= self.max_columns
        {
            return Err(CoreError::Validation(format!(
                "seat {seat} out of range for {}x{} grid",
                self.max_rows, self.max_columns
            )));
        }
        Ok(seat.row as usize * self.max_columns as usize + seat.col as usize)
    }

    /// Decode the status of `seat`. A byte outside the known encoding is
    /// corrupt state and is rejected.
    pub fn status(&self, seat: Seat) -> Result<SeatStatus, CoreError> {
        let idx = self.index(seat)?;
        SeatStatus::from_byte(self.cells[idx]).ok_or_else(|| {
            CoreError::Internal(format!(
                "corrupt seat state {} at {seat}",
                self.cells[idx]
            ))
        })
    }

    /// Reserve `seat` if it is available. Returns `false` (cell untouched)
    /// when the seat is already reserved or sold.
    pub fn try_reserve(&mut self, seat: Seat) -> Result<bool, CoreError> {
        let idx = self.index(seat)?;
        if self.status(seat)? != SeatStatus::Available {
            return Ok(false);
        }
        self.cells[idx] = SeatStatus::Reserved.as_byte();
        Ok(true)
    }

    /// Atomically reserve a group of seats.
    ///
    /// Two-phase: first every coordinate is verified (out-of-range fails
    /// with no writes; any non-available cell returns `false` with no
    /// writes), then every cell is committed to `Reserved`. Duplicate
    /// coordinates in the input are permitted and idempotent. An empty
    /// input returns `false`.
    pub fn try_reserve_batch(&mut self, seats: &[Seat]) -> Result<bool, CoreError> {
        if seats.is_empty() {
            return Ok(false);
        }
        for &seat in seats {
            if self.status(seat)? != SeatStatus::Available {
                return Ok(false);
            }
        }
        for &seat in seats {
            let idx = self.index(seat)?;
            self.cells[idx] = SeatStatus::Reserved.as_byte();
        }
        Ok(true)
    }

    /// Transition `seat` from `Reserved` to `Sold`.
    pub fn mark_sold(&mut self, seat: Seat) -> Result<(), CoreError> {
        let idx = self.index(seat)?;
        let status = self.status(seat)?;
        if status != SeatStatus::Reserved {
            return Err(CoreError::InvalidState(format!(
                "seat {seat} is {status:?}, expected Reserved"
            )));
        }
        self.cells[idx] = SeatStatus::Sold.as_byte();
        Ok(())
    }

    /// Transition `seat` from `Reserved` back to `Available`.
    pub fn release(&mut self, seat: Seat) -> Result<(), CoreError> {
        let idx = self.index(seat)?;
        let status = self.status(seat)?;
        if status != SeatStatus::Reserved {
            return Err(CoreError::InvalidState(format!(
                "seat {seat} is {status:?}, expected Reserved"
            )));
        }
        self.cells[idx] = SeatStatus::Available.as_byte();
        Ok(())
    }

    pub fn max_rows(&self) -> i32 {
        self.max_rows
    }

    pub fn max_columns(&self) -> i32 {
        self.max_columns
    }
}
