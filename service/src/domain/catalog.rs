//! Catalog [`Snapshot`] definitions.

use alloy_primitives::Address;
#[cfg(doc)]
use common::DateTime;
use common::{unit, DateTimeOf, Ether};

use crate::domain::{apartment, Apartment};

/// Consistent view of the rental contract state for a single wallet.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Snapshot {
    /// All the listed [`Apartment`]s, in the catalog order.
    pub apartments: Vec<Apartment>,

    /// [`Earnings`] of the wallet.
    pub earnings: Earnings,

    /// Native account balance of the wallet.
    pub balance: Ether,

    /// [`DateTime`] when reading of this [`Snapshot`] has started.
    pub refreshed_at: RefreshDateTime,
}

impl Snapshot {
    /// Returns the [`Apartment`] with the provided [`apartment::Number`], if
    /// it's present in this [`Snapshot`].
    #[must_use]
    pub fn apartment(&self, num: apartment::Number) -> Option<&Apartment> {
        let index = usize::try_from(u64::from(num.index())).ok()?;
        self.apartments.get(index)
    }
}

/// Rental income accrued to an owner, but not withdrawn yet.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Earnings {
    /// [`Address`] of the owner.
    pub owner: Address,

    /// Amount that is not withdrawn yet.
    pub unclaimed: Ether,
}

impl Earnings {
    /// Indicates whether there is anything to withdraw.
    #[must_use]
    pub fn is_claimable(&self) -> bool {
        self.unclaimed.is_positive()
    }
}

/// [`DateTime`] of a [`Snapshot`] refresh.
pub type RefreshDateTime = DateTimeOf<(Snapshot, unit::Refresh)>;

#[cfg(test)]
mod spec {
    use alloy_primitives::Address;

    use super::Earnings;

    #[test]
    fn claimable_only_when_positive() {
        let earnings = |amount: &str| Earnings {
            owner: Address::ZERO,
            unclaimed: amount.parse().unwrap(),
        };

        assert!(!earnings("0").is_claimable());
        assert!(!earnings("0.000").is_claimable());
        assert!(earnings("0.000000000000000001").is_claimable());
        assert!(earnings("3").is_claimable());
    }
}
