pub mod reservation;
pub mod slot;
pub mod user;

pub use reservation::Reservation;
pub use slot::Slot;
pub use user::User;
