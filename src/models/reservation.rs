use serde::{Deserialize, Serialize};

use super::Slot;

/// A granted seat reservation. Immutable once created: cancellation removes
/// the record, it is never edited in place.
///
/// Identity for cancellation matching is (username, slot, exact seat set).
/// `total_price` is the price charged at booking time and is excluded from
/// identity; later price changes never touch existing reservations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reservation {
    pub username: String,
    pub slot: Slot,
    /// Seat indices, sorted and distinct.
    pub seats: Vec<u32>,
    pub total_price: f64,
}

impl Reservation {
    pub fn new(username: impl Into<String>, slot: Slot, mut seats: Vec<u32>, total_price: f64) -> Self {
        seats.sort_unstable();
        seats.dedup();
        Self {
            username: username.into(),
            slot,
            seats,
            total_price,
        }
    }

    pub fn holds_seat(&self, seat: u32) -> bool {
        self.seats.binary_search(&seat).is_ok()
    }

    /// Exact identity match. `seats` must already be sorted and distinct.
    pub fn same_identity(&self, username: &str, slot: Slot, seats: &[u32]) -> bool {
        self.username == username && self.slot == slot && self.seats == seats
    }

    pub fn matches(&self, other: &Reservation) -> bool {
        self.same_identity(&other.username, other.slot, &other.seats)
    }
}
