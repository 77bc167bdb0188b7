use crate::models::{Reservation, Slot};
use crate::store::{JsonStore, StoreError};

/// Durable record of who holds which seats.
///
/// Every mutation persists the full reservation list before returning
/// (durability before acknowledgment); on a failed write the in-memory change
/// is rolled back so memory never drifts ahead of disk.
#[derive(Debug)]
pub struct ReservationLedger {
    reservations: Vec<Reservation>,
    store: JsonStore,
}

impl ReservationLedger {
    pub async fn open(store: JsonStore) -> Result<Self, StoreError> {
        let reservations = store.load_reservations().await?;
        Ok(Self { reservations, store })
    }

    pub async fn append(&mut self, reservation: Reservation) -> Result<(), StoreError> {
        self.reservations.push(reservation);
        if let Err(e) = self.store.save_reservations(&self.reservations).await {
            self.reservations.pop();
            return Err(e);
        }
        Ok(())
    }

    /// Remove at most one reservation whose identity tuple matches exactly.
    /// `seats` must be sorted and distinct.
    pub async fn remove_matching(
        &mut self,
        username: &str,
        slot: Slot,
        seats: &[u32],
    ) -> Result<bool, StoreError> {
        let Some(pos) = self
            .reservations
            .iter()
            .position(|r| r.same_identity(username, slot, seats))
        else {
            return Ok(false);
        };
        let removed = self.reservations.remove(pos);
        if let Err(e) = self.store.save_reservations(&self.reservations).await {
            self.reservations.insert(pos, removed);
            return Err(e);
        }
        Ok(true)
    }

    pub async fn remove_exact(&mut self, reservation: &Reservation) -> Result<bool, StoreError> {
        self.remove_matching(&reservation.username, reservation.slot, &reservation.seats)
            .await
    }

    /// Remove every reservation for one slot; returns how many went away.
    pub async fn remove_slot(&mut self, slot: Slot) -> Result<usize, StoreError> {
        self.remove_where(|r| r.slot == slot).await
    }

    /// Remove every reservation owned by `username` (account-deletion cascade).
    pub async fn remove_user(&mut self, username: &str) -> Result<usize, StoreError> {
        self.remove_where(|r| r.username == username).await
    }

    async fn remove_where<F>(&mut self, keep_out: F) -> Result<usize, StoreError>
    where
        F: Fn(&Reservation) -> bool,
    {
        let kept: Vec<Reservation> = self
            .reservations
            .iter()
            .filter(|r| !keep_out(r))
            .cloned()
            .collect();
        let removed = self.reservations.len() - kept.len();
        if removed == 0 {
            return Ok(0);
        }
        let previous = std::mem::replace(&mut self.reservations, kept);
        if let Err(e) = self.store.save_reservations(&self.reservations).await {
            self.reservations = previous;
            return Err(e);
        }
        Ok(removed)
    }

    /// All reservations for a slot, in stable insertion order.
    pub fn query_by_slot(&self, slot: Slot) -> Vec<Reservation> {
        self.reservations
            .iter()
            .filter(|r| r.slot == slot)
            .cloned()
            .collect()
    }

    pub fn seat_held(&self, slot: Slot, seat: u32) -> bool {
        self.reservations
            .iter()
            .any(|r| r.slot == slot && r.holds_seat(seat))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Reservation> {
        self.reservations.iter()
    }

    pub fn len(&self) -> usize {
        self.reservations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reservations.is_empty()
    }
}
