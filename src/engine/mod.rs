//! The reservation engine: the one component with real invariants.
//!
//! All shared state (seat inventory, reservation ledger, user directory)
//! lives behind a single `tokio::sync::RwLock`, so the check-then-record
//! sequence of a booking can never interleave with another booking,
//! cancellation or admin mutation. Pure reads share the lock. Lock hold time
//! is bounded by in-memory work plus one durable write.

mod error;
mod policy;

pub use error::EngineError;
pub use policy::{AdminPolicy, SharedKeyPolicy};

use chrono::NaiveTime;
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::directory::UserDirectory;
use crate::inventory::SeatInventory;
use crate::ledger::ReservationLedger;
use crate::models::{Reservation, Slot};
use crate::store::JsonStore;

/// Initial engine configuration; everything here is later mutable through
/// admin operations except the bcrypt cost.
#[derive(Debug, Clone)]
pub struct EngineSettings {
    pub rows: u32,
    pub cols: u32,
    pub default_price: f64,
    pub opening_time: NaiveTime,
    pub closing_time: NaiveTime,
    pub bcrypt_cost: u32,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            rows: 5,
            cols: 10,
            default_price: 10.0,
            opening_time: NaiveTime::from_hms_opt(18, 0, 0).expect("valid literal time"),
            closing_time: NaiveTime::from_hms_opt(22, 0, 0).expect("valid literal time"),
            bcrypt_cost: bcrypt::DEFAULT_COST,
        }
    }
}

struct EngineState {
    inventory: SeatInventory,
    ledger: ReservationLedger,
    directory: UserDirectory,
}

impl EngineState {
    /// Reservable check: in range, not admin-locked, not held by any
    /// reservation in that slot.
    fn reservable(&self, slot: Slot, seat: u32) -> bool {
        self.inventory.in_range(seat)
            && !self.inventory.is_locked(seat)
            && !self.ledger.seat_held(slot, seat)
    }
}

pub struct ReservationEngine {
    state: RwLock<EngineState>,
    admin: Box<dyn AdminPolicy>,
}

impl ReservationEngine {
    pub async fn open(
        store: JsonStore,
        settings: EngineSettings,
        admin: Box<dyn AdminPolicy>,
    ) -> Result<Self, EngineError> {
        let inventory = SeatInventory::new(
            settings.rows,
            settings.cols,
            settings.default_price,
            settings.opening_time,
            settings.closing_time,
        )?;
        let ledger = ReservationLedger::open(store.clone()).await?;
        let directory = UserDirectory::open(store, settings.bcrypt_cost).await?;
        info!(
            total_seats = inventory.total_seats(),
            reservations = ledger.len(),
            "reservation engine ready"
        );
        Ok(Self {
            state: RwLock::new(EngineState {
                inventory,
                ledger,
                directory,
            }),
            admin,
        })
    }

    // ---- booking ----

    /// Atomically grant `seats` in `slot` to `username`, all-or-nothing.
    pub async fn book(
        &self,
        username: &str,
        slot: Slot,
        seats: &[u32],
    ) -> Result<Reservation, EngineError> {
        let seats = normalize_seats(seats)?;
        let mut state = self.state.write().await;
        if !state.directory.exists(username) {
            return Err(EngineError::UnknownUser(username.to_string()));
        }
        let unavailable: Vec<u32> = seats
            .iter()
            .copied()
            .filter(|&seat| !state.reservable(slot, seat))
            .collect();
        if !unavailable.is_empty() {
            return Err(EngineError::SeatsUnavailable(unavailable));
        }
        let total_price = state.inventory.total_price(&seats);
        let reservation = Reservation::new(username, slot, seats, total_price);
        state.ledger.append(reservation.clone()).await?;
        info!(%username, %slot, seats = ?reservation.seats, total_price, "reservation booked");
        Ok(reservation)
    }

    /// Remove the reservation with exactly this identity; `Ok(false)` when no
    /// exact match exists. Partial-seat cancellation is not a thing: the
    /// caller must name the original seat set.
    pub async fn cancel(
        &self,
        username: &str,
        slot: Slot,
        seats: &[u32],
    ) -> Result<bool, EngineError> {
        let seats = normalize_seats(seats)?;
        let mut state = self.state.write().await;
        if !state.directory.exists(username) {
            return Err(EngineError::UnknownUser(username.to_string()));
        }
        let removed = state.ledger.remove_matching(username, slot, &seats).await?;
        if removed {
            info!(%username, %slot, ?seats, "reservation cancelled");
        }
        Ok(removed)
    }

    /// Admin: wipe every reservation in a slot.
    pub async fn cancel_all_in_slot(&self, slot: Slot) -> Result<usize, EngineError> {
        let mut state = self.state.write().await;
        let removed = state.ledger.remove_slot(slot).await?;
        if removed > 0 {
            info!(%slot, removed, "slot reservations wiped");
        }
        Ok(removed)
    }

    /// Admin: remove by full identity regardless of owner.
    pub async fn admin_cancel(&self, reservation: &Reservation) -> Result<bool, EngineError> {
        let mut state = self.state.write().await;
        let removed = state.ledger.remove_exact(reservation).await?;
        if removed {
            info!(username = %reservation.username, slot = %reservation.slot, "reservation removed by admin");
        }
        Ok(removed)
    }

    pub async fn is_available(&self, slot: Slot, seat: u32) -> bool {
        self.state.read().await.reservable(slot, seat)
    }

    pub async fn reservations_for_slot(&self, slot: Slot) -> Vec<Reservation> {
        self.state.read().await.ledger.query_by_slot(slot)
    }

    /// Current price total for a seat list; no availability validation.
    pub async fn price_of(&self, seats: &[u32]) -> f64 {
        self.state.read().await.inventory.total_price(seats)
    }

    // ---- admin configuration ----

    /// Replace the seat layout. Reservations referencing seats beyond the new
    /// bound are left in place (documented inconsistency, logged).
    pub async fn reconfigure(
        &self,
        rows: u32,
        cols: u32,
        default_price: f64,
    ) -> Result<(), EngineError> {
        let mut state = self.state.write().await;
        state.inventory.configure(rows, cols, default_price)?;
        let total = state.inventory.total_seats();
        let stale = state
            .ledger
            .iter()
            .filter(|r| r.seats.iter().any(|&s| s >= total))
            .count();
        if stale > 0 {
            warn!(
                stale,
                total_seats = total,
                "reconfiguration left reservations referencing out-of-range seats"
            );
        }
        info!(rows, cols, default_price, "seating reconfigured");
        Ok(())
    }

    pub async fn set_price(&self, seat: u32, price: f64) -> Result<(), EngineError> {
        self.state.write().await.inventory.set_price(seat, price)
    }

    pub async fn lock_seats(&self, seats: &[u32]) {
        let mut state = self.state.write().await;
        state.inventory.lock(seats);
        info!(?seats, "seats locked");
    }

    pub async fn unlock_seats(&self, seats: &[u32]) {
        let mut state = self.state.write().await;
        state.inventory.unlock(seats);
        info!(?seats, "seats unlocked");
    }

    pub async fn set_hours(&self, opening: NaiveTime, closing: NaiveTime) {
        self.state.write().await.inventory.set_hours(opening, closing);
    }

    pub async fn hours(&self) -> (NaiveTime, NaiveTime) {
        self.state.read().await.inventory.hours()
    }

    pub fn validate_admin(&self, key: &str) -> bool {
        self.admin.authorize(key)
    }

    // ---- accounts ----

    /// `Ok(false)` when the username is taken.
    pub async fn create_account(&self, username: &str, password: &str) -> Result<bool, EngineError> {
        let created = self
            .state
            .write()
            .await
            .directory
            .create(username, password)
            .await?;
        if created {
            info!(%username, "account created");
        }
        Ok(created)
    }

    pub async fn login(&self, username: &str, password: &str) -> bool {
        self.state
            .read()
            .await
            .directory
            .validate_credentials(username, password)
    }

    pub async fn user_exists(&self, username: &str) -> bool {
        self.state.read().await.directory.exists(username)
    }

    /// Delete an account and cascade away its reservations. Credential
    /// verification is the dispatcher's responsibility.
    pub async fn delete_account(&self, username: &str) -> Result<bool, EngineError> {
        let mut state = self.state.write().await;
        if !state.directory.delete(username).await? {
            return Ok(false);
        }
        let dropped = state.ledger.remove_user(username).await?;
        info!(%username, dropped, "account deleted");
        Ok(true)
    }
}

/// Sorted, distinct seat list; empty lists and duplicates are caller errors.
fn normalize_seats(seats: &[u32]) -> Result<Vec<u32>, EngineError> {
    if seats.is_empty() {
        return Err(EngineError::invalid("seat list must be non-empty"));
    }
    let mut sorted = seats.to_vec();
    sorted.sort_unstable();
    if sorted.windows(2).any(|pair| pair[0] == pair[1]) {
        return Err(EngineError::invalid("seat list contains duplicates"));
    }
    Ok(sorted)
}
