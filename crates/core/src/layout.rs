//! Auditorium layout document.
//!
//! The layout is stored as an embedded JSON document on the auditorium row:
//! disabled seats (holes in the grid), wheelchair spots (informational), and
//! pricing tiers. It is validated at write time so the reservation hot path
//! can trust it.

use std::collections::{HashMap, HashSet};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::seating::Seat;

/// A named set of seats sharing a single non-negative price surcharge added
/// to the showtime base price.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingTier {
    pub tier_name: String,
    pub price_surcharge: Decimal,
    pub seats: Vec<Seat>,
}

/// The embedded layout document of an auditorium.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuditoriumLayout {
    #[serde(default)]
    pub disabled_seats: Vec<Seat>,
    #[serde(default)]
    pub wheelchair_spots: Vec<Seat>,
    #[serde(default)]
    pub tiers: Vec<PricingTier>,
}

impl AuditoriumLayout {
    /// Validate the layout against the auditorium dimensions.
    ///
    /// Rejects out-of-bounds coordinates, negative surcharges, empty tier
    /// names, duplicate seats across tiers (which would make pricing
    /// undefined), and tiers that price a disabled seat.
    pub fn validate(&self, max_rows: i32, max_columns: i32) -> Result<(), CoreError> {
        let in_bounds = |seat: &Seat| {
            seat.row >= 0 && seat.row < max_rows && seat.col >= 0 && seat.col < max_columns
        };

        for seat in self.disabled_seats.iter().chain(&self.wheelchair_spots) {
            if !in_bounds(seat) {
                return Err(CoreError::Validation(format!(
                    "layout seat {seat} out of range for {max_rows}x{max_columns} grid"
                )));
            }
        }

        let disabled: HashSet<Seat> = self.disabled_seats.iter().copied().collect();
        let mut tiered: HashSet<Seat> = HashSet::new();
        for tier in &self.tiers {
            if tier.tier_name.trim().is_empty() {
                return Err(CoreError::Validation("tier name must not be empty".into()));
            }
            if tier.price_surcharge < Decimal::ZERO {
                return Err(CoreError::Validation(format!(
                    "tier '{}' has a negative surcharge",
                    tier.tier_name
                )));
            }
            for seat in &tier.seats {
                if !in_bounds(seat) {
                    return Err(CoreError::Validation(format!(
                        "tier '{}' seat {seat} out of range for {max_rows}x{max_columns} grid",
                        tier.tier_name
                    )));
                }
                if disabled.contains(seat) {
                    return Err(CoreError::Validation(format!(
                        "tier '{}' prices disabled seat {seat}",
                        tier.tier_name
                    )));
                }
                if !tiered.insert(*seat) {
                    return Err(CoreError::Validation(format!(
                        "seat {seat} appears in more than one tier"
                    )));
                }
            }
        }
        Ok(())
    }

    /// Build the `(row, col) -> surcharge` lookup used when pricing a
    /// reservation. Assumes the layout already passed [`validate`].
    ///
    /// [`validate`]: AuditoriumLayout::validate
    pub fn surcharge_map(&self) -> HashMap<Seat, Decimal> {
        let mut map = HashMap::new();
        for tier in &self.tiers {
            for seat in &tier.seats {
                map.insert(*seat, tier.price_surcharge);
            }
        }
        map
    }

    pub fn is_disabled(&self, seat: Seat) -> bool {
        self.disabled_seats.contains(&seat)
    }
}
