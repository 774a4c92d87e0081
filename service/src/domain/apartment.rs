//! [`Apartment`] definitions.

use alloy_primitives::U256;
use common::{Ether, FixedText};
use derive_more::{Display, Into};

/// Apartment listed in the rental contract.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Apartment {
    /// [`Number`] of this [`Apartment`].
    pub number: Number,

    /// Longitude of this [`Apartment`].
    pub longitude: Coordinate,

    /// Latitude of this [`Apartment`].
    pub latitude: Coordinate,

    /// Price of a single night in this [`Apartment`].
    pub price_per_night: Ether,
}

/// Geographic coordinate of an [`Apartment`], stored as `bytes32` text.
pub type Coordinate = FixedText;

/// Number of an [`Apartment`] in the catalog, starting from `1`.
#[derive(
    Clone, Copy, Debug, Display, Eq, Hash, Into, Ord, PartialEq, PartialOrd,
)]
pub struct Number(u64);

impl Number {
    /// Creates a new [`Number`] if the provided one is positive.
    #[must_use]
    pub const fn new(num: u64) -> Option<Self> {
        if num == 0 {
            None
        } else {
            Some(Self(num))
        }
    }

    /// Returns the [`Index`] of the [`Apartment`] with this [`Number`].
    #[must_use]
    pub const fn index(self) -> Index {
        Index(self.0 - 1)
    }
}

impl From<Index> for Number {
    fn from(index: Index) -> Self {
        Self(index.0.saturating_add(1))
    }
}

/// Index of an [`Apartment`] in the contract storage, starting from `0`.
#[derive(
    Clone, Copy, Debug, Display, Eq, Hash, Into, Ord, PartialEq, PartialOrd,
)]
pub struct Index(u64);

impl Index {
    /// Returns all the [`Index`]es of a catalog having `count` apartments.
    pub fn all(count: u64) -> impl Iterator<Item = Self> {
        (0..count).map(Self)
    }
}

impl From<Index> for U256 {
    fn from(index: Index) -> Self {
        Self::from(index.0)
    }
}

#[cfg(test)]
mod spec {
    use super::{Index, Number};

    #[test]
    fn numbers_from_one() {
        assert!(Number::new(0).is_none());

        let first = Number::new(1).unwrap();
        assert_eq!(u64::from(first.index()), 0);
        assert_eq!(Number::from(first.index()), first);

        let numbers = Index::all(3).map(Number::from).collect::<Vec<_>>();
        assert_eq!(numbers, [1, 2, 3].map(|n| Number::new(n).unwrap()));
        assert_eq!(Index::all(0).count(), 0);
    }
}
