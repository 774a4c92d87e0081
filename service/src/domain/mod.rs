//! Domain definitions.

pub mod apartment;
pub mod catalog;
pub mod reservation;
pub mod session;
pub mod wallet;

pub use self::{
    apartment::Apartment, catalog::Snapshot, session::Session, wallet::Wallet,
};
