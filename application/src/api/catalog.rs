//! [`Catalog`]-related definitions.

use common::{DateTime, Ether};
use juniper::GraphQLObject;
use service::{command::refresh_catalog, domain};
use tracerr::Traced;

use crate::{
    api::{self, session::Address},
    AsError as _, Context,
};

/// Catalog of the rental contract, as seen by the wallet of the live
/// `Session`.
#[derive(Clone, Debug, GraphQLObject)]
#[graphql(context = Context)]
pub struct Catalog {
    /// All the listed apartments, in the catalog order.
    pub apartments: Vec<api::Apartment>,

    /// Rental income of the wallet.
    pub earnings: Earnings,

    /// Native account balance of the wallet.
    pub balance: Ether,

    /// `DateTime` when reading of this `Catalog` has started.
    pub refreshed_at: DateTime,
}

impl From<domain::Snapshot> for Catalog {
    fn from(snapshot: domain::Snapshot) -> Self {
        let domain::Snapshot {
            apartments,
            earnings,
            balance,
            refreshed_at,
        } = snapshot;
        Self {
            apartments: apartments.into_iter().map(Into::into).collect(),
            earnings: earnings.into(),
            balance,
            refreshed_at: refreshed_at.coerce(),
        }
    }
}

/// Rental income accrued to an apartments owner.
#[derive(Clone, Copy, Debug, GraphQLObject)]
#[graphql(context = Context)]
pub struct Earnings {
    /// Address of the owner.
    pub owner: Address,

    /// Amount not withdrawn yet.
    pub amount: Ether,

    /// Indicator whether there is anything to withdraw.
    pub claimable: bool,
}

impl From<domain::catalog::Earnings> for Earnings {
    fn from(earnings: domain::catalog::Earnings) -> Self {
        Self {
            owner: earnings.owner.into(),
            amount: earnings.unclaimed,
            claimable: earnings.is_claimable(),
        }
    }
}

/// Failure of a catalog refresh following an operation.
///
/// The previously cached `Catalog` is kept.
#[derive(Clone, Debug, GraphQLObject)]
#[graphql(context = Context)]
pub struct RefreshFailure {
    /// Error code.
    pub code: String,

    /// Error message.
    pub message: String,
}

impl From<Traced<refresh_catalog::ExecutionError>> for RefreshFailure {
    fn from(err: Traced<refresh_catalog::ExecutionError>) -> Self {
        let err = err.as_error();
        Self {
            code: err.code.to_owned(),
            message: err.message,
        }
    }
}
