//! [`Query`] definition.

pub mod catalog;
pub mod price_reservation;

/// [`Query`] of the [`Service`].
///
/// [`Service`]: crate::Service
pub use common::Handler as Query;

pub use self::{catalog::CachedSnapshot, price_reservation::PriceReservation};
