use std::collections::{BTreeSet, HashMap};

use chrono::NaiveTime;

use crate::engine::EngineError;

/// Upper bound on rows * cols; a layout request past this is a typo, not a
/// venue.
const MAX_TOTAL_SEATS: u32 = 1_000_000;

/// In-memory seating configuration: seat count, per-seat prices, admin lock
/// set and advisory operating hours.
///
/// Seat indices are a flat 0-based space in `[0, total_seats)`. Locking a
/// seat only blocks future availability checks; it never evicts an existing
/// reservation. All mutation happens through the engine's write lock.
#[derive(Debug, Clone)]
pub struct SeatInventory {
    total_seats: u32,
    default_price: f64,
    prices: HashMap<u32, f64>,
    locked: BTreeSet<u32>,
    opening: NaiveTime,
    closing: NaiveTime,
}

impl SeatInventory {
    pub fn new(
        rows: u32,
        cols: u32,
        default_price: f64,
        opening: NaiveTime,
        closing: NaiveTime,
    ) -> Result<Self, EngineError> {
        let mut inventory = Self {
            total_seats: 0,
            default_price,
            prices: HashMap::new(),
            locked: BTreeSet::new(),
            opening,
            closing,
        };
        inventory.configure(rows, cols, default_price)?;
        Ok(inventory)
    }

    /// Replace the seat layout. Prices already assigned to indices below the
    /// new bound are kept, every other in-range index gets `default_price`.
    /// Price and lock entries at or beyond the new bound are dropped.
    pub fn configure(&mut self, rows: u32, cols: u32, default_price: f64) -> Result<(), EngineError> {
        if rows == 0 || cols == 0 {
            return Err(EngineError::invalid("rows and cols must be positive"));
        }
        if !default_price.is_finite() || default_price < 0.0 {
            return Err(EngineError::invalid("default price must be non-negative"));
        }
        let total = rows
            .checked_mul(cols)
            .filter(|&n| n <= MAX_TOTAL_SEATS)
            .ok_or_else(|| EngineError::invalid("seating layout too large"))?;

        self.total_seats = total;
        self.default_price = default_price;
        self.prices.retain(|&seat, _| seat < total);
        for seat in 0..total {
            self.prices.entry(seat).or_insert(default_price);
        }
        self.locked.retain(|&seat| seat < total);
        Ok(())
    }

    /// Assign a price to one seat. Indices beyond the current bound are
    /// accepted: pre-pricing for a future expansion.
    pub fn set_price(&mut self, seat: u32, price: f64) -> Result<(), EngineError> {
        if !price.is_finite() || price < 0.0 {
            return Err(EngineError::invalid("price must be non-negative"));
        }
        self.prices.insert(seat, price);
        Ok(())
    }

    pub fn price_of(&self, seat: u32) -> f64 {
        self.prices.get(&seat).copied().unwrap_or(self.default_price)
    }

    /// Sum of current per-seat prices. Does not validate availability.
    pub fn total_price(&self, seats: &[u32]) -> f64 {
        seats.iter().map(|&s| self.price_of(s)).sum()
    }

    pub fn lock(&mut self, seats: &[u32]) {
        self.locked.extend(seats.iter().copied());
    }

    pub fn unlock(&mut self, seats: &[u32]) {
        for seat in seats {
            self.locked.remove(seat);
        }
    }

    pub fn is_locked(&self, seat: u32) -> bool {
        self.locked.contains(&seat)
    }

    pub fn total_seats(&self) -> u32 {
        self.total_seats
    }

    pub fn in_range(&self, seat: u32) -> bool {
        seat < self.total_seats
    }

    pub fn set_hours(&mut self, opening: NaiveTime, closing: NaiveTime) {
        self.opening = opening;
        self.closing = closing;
    }

    /// Advisory operating hours; not enforced as a booking constraint.
    pub fn hours(&self) -> (NaiveTime, NaiveTime) {
        (self.opening, self.closing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn inventory(rows: u32, cols: u32) -> SeatInventory {
        SeatInventory::new(
            rows,
            cols,
            10.0,
            NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
            NaiveTime::from_hms_opt(22, 0, 0).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn rejects_degenerate_layouts() {
        assert!(matches!(
            inventory(5, 10).configure(0, 10, 10.0),
            Err(EngineError::InvalidArgument(_))
        ));
        assert!(matches!(
            inventory(5, 10).configure(5, 0, 10.0),
            Err(EngineError::InvalidArgument(_))
        ));
    }

    #[test]
    fn reconfigure_keeps_prices_and_drops_out_of_range_entries() {
        let mut inv = inventory(5, 10);
        inv.set_price(3, 25.0).unwrap();
        inv.set_price(45, 40.0).unwrap();
        inv.lock(&[2, 45]);

        inv.configure(2, 10, 7.5).unwrap();
        assert_eq!(inv.total_seats(), 20);
        assert_eq!(inv.price_of(3), 25.0);
        // seat 45 fell out of range: price and lock entries dropped
        assert!(!inv.is_locked(45));
        assert!(inv.is_locked(2));

        // growing back re-seeds the gap with the new default
        inv.configure(5, 10, 7.5).unwrap();
        assert_eq!(inv.price_of(45), 7.5);
        assert_eq!(inv.price_of(3), 25.0);
    }

    #[test]
    fn pre_pricing_beyond_bound_survives_expansion() {
        let mut inv = inventory(2, 2);
        inv.set_price(30, 99.0).unwrap();
        assert_eq!(inv.price_of(30), 99.0);
        inv.configure(6, 6, 5.0).unwrap();
        assert_eq!(inv.price_of(30), 99.0);
    }

    #[test]
    fn lock_and_unlock_are_idempotent() {
        let mut inv = inventory(5, 10);
        inv.lock(&[1, 2]);
        inv.lock(&[2, 3]);
        assert!(inv.is_locked(1) && inv.is_locked(2) && inv.is_locked(3));
        inv.unlock(&[2]);
        inv.unlock(&[2, 7]);
        assert!(!inv.is_locked(2));
        assert!(inv.is_locked(1) && inv.is_locked(3));
    }

    proptest! {
        #[test]
        fn total_price_is_sum_of_unit_prices(seats in proptest::collection::vec(0u32..200, 0..12)) {
            let inv = inventory(10, 10);
            let expected: f64 = seats.iter().map(|&s| inv.price_of(s)).sum();
            prop_assert_eq!(inv.total_price(&seats), expected);
        }

        #[test]
        fn reconfigure_retains_only_in_range_explicit_prices(
            rows in 1u32..20,
            cols in 1u32..20,
            seat in 0u32..100,
            price in 0.0f64..500.0,
        ) {
            let mut inv = inventory(10, 10);
            inv.set_price(seat, price).unwrap();
            inv.configure(rows, cols, 99.0).unwrap();
            if seat < rows * cols {
                prop_assert_eq!(inv.price_of(seat), price);
            } else {
                prop_assert_eq!(inv.price_of(seat), 99.0);
            }
        }
    }
}
