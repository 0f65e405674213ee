//! Ticket price computation.
//!
//! Money is fixed-point with two decimal places; totals are plain decimal
//! addition of two-decimal values, no rounding mode in play.

use std::collections::HashMap;

use rust_decimal::Decimal;

use crate::seating::Seat;

/// Total for a reservation: base price per seat plus any tier surcharge.
/// Seats without a tier entry carry a surcharge of zero.
pub fn total_amount(
    base_price: Decimal,
    seats: &[Seat],
    surcharges: &HashMap<Seat, Decimal>,
) -> Decimal {
    seats
        .iter()
        .map(|seat| base_price + surcharges.get(seat).copied().unwrap_or(Decimal::ZERO))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_price_only_when_no_tiers() {
        let total = total_amount(
            Decimal::new(1000, 2),
            &[Seat::new(0, 0), Seat::new(1, 1)],
            &HashMap::new(),
        );
        assert_eq!(total, Decimal::new(2000, 2));
    }

    #[test]
    fn surcharge_applies_per_tiered_seat() {
        let mut surcharges = HashMap::new();
        surcharges.insert(Seat::new(5, 5), Decimal::new(500, 2));
        // 10.00 + (10.00 + 5.00) = 25.00
        let total = total_amount(
            Decimal::new(1000, 2),
            &[Seat::new(0, 0), Seat::new(5, 5)],
            &surcharges,
        );
        assert_eq!(total, Decimal::new(2500, 2));
    }

    #[test]
    fn empty_seat_list_totals_zero() {
        assert_eq!(
            total_amount(Decimal::new(1000, 2), &[], &HashMap::new()),
            Decimal::ZERO
        );
    }
}
