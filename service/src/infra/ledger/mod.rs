//! [`Ledger`]-related implementations.

pub mod ethereum;
#[cfg(any(test, feature = "memory"))]
pub mod memory;

use alloy_primitives::{Address, Bytes, TxHash};
use common::{
    operations::{By, Call, Confirm, Request, Select, Submit},
    Wei,
};
use derive_more::{Display, Error as StdError};
use tracerr::Traced;

use crate::domain::wallet::Signer;
#[cfg(doc)]
use crate::Service;

#[cfg(any(test, feature = "memory"))]
pub use self::memory::Memory;
pub use self::ethereum::Ethereum;

/// Ledger operation.
pub use common::Handler as Ledger;

/// Read-only call of a contract.
#[derive(Clone, Debug)]
pub struct ViewCall {
    /// [`Address`] of the called contract.
    pub to: Address,

    /// ABI-encoded call data.
    pub data: Bytes,
}

/// Transaction to be signed and submitted to a [`Ledger`].
#[derive(Clone, Debug)]
pub struct Transaction {
    /// [`Signer`] of this [`Transaction`].
    pub signer: Signer,

    /// [`Address`] of the called contract.
    pub to: Address,

    /// ABI-encoded call data.
    pub data: Bytes,

    /// Amount paid along with this [`Transaction`].
    pub value: Wei,
}

/// Submitted [`Transaction`] awaiting its confirmation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Pending {
    /// Hash of the submitted [`Transaction`].
    pub tx_hash: TxHash,

    /// Indicator whether the [`Transaction`] was submitted via an external
    /// signer.
    pub external: bool,
}

/// Receipt of a mined [`Transaction`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Receipt {
    /// Hash of the mined [`Transaction`].
    pub tx_hash: TxHash,

    /// Number of the block containing the [`Transaction`], if reported.
    pub block_number: Option<u64>,
}

/// Accounts exposed by an external signer.
#[derive(Clone, Copy, Debug)]
pub struct Accounts;

/// [`Ledger`] providing all the operations the [`Service`] relies on.
pub trait Backend:
    Ledger<Call<ViewCall>, Ok = Bytes, Err = Traced<Error>>
    + Ledger<Submit<Transaction>, Ok = Pending, Err = Traced<Error>>
    + Ledger<Confirm<Pending>, Ok = Receipt, Err = Traced<Error>>
    + Ledger<Select<By<Wei, Address>>, Ok = Wei, Err = Traced<Error>>
    + Ledger<Request<Accounts>, Ok = Vec<Address>, Err = Traced<Error>>
{
}

impl<T> Backend for T where
    T: Ledger<Call<ViewCall>, Ok = Bytes, Err = Traced<Error>>
        + Ledger<Submit<Transaction>, Ok = Pending, Err = Traced<Error>>
        + Ledger<Confirm<Pending>, Ok = Receipt, Err = Traced<Error>>
        + Ledger<Select<By<Wei, Address>>, Ok = Wei, Err = Traced<Error>>
        + Ledger<Request<Accounts>, Ok = Vec<Address>, Err = Traced<Error>>
{
}

/// [`Ledger`] error.
#[derive(Clone, Debug, Display, Eq, PartialEq, StdError)]
pub enum Error {
    /// Ledger endpoint cannot be reached.
    #[display("Ledger endpoint is unavailable: {_0}")]
    Unavailable(#[error(not(source))] String),

    /// No external signer is configured.
    #[display("No external signer is configured")]
    NoExternalSigner,

    /// Request was declined by the user.
    #[display("Request is rejected by the user")]
    UserRejected,

    /// [`Transaction`] was not accepted for execution.
    #[display("Transaction is rejected: {_0}")]
    Rejected(#[error(not(source))] String),

    /// [`Transaction`] execution was reverted.
    #[display(
        "Transaction is reverted: {}",
        _0.as_deref().unwrap_or("no reason given"),
    )]
    Reverted(#[error(not(source))] Option<String>),

    /// Read-only call was reverted by the contract.
    #[display(
        "Read-only call is reverted: {}",
        _0.as_deref().unwrap_or("no reason given"),
    )]
    CallReverted(#[error(not(source))] Option<String>),

    /// Ledger responded with something unexpected.
    #[display("Malformed ledger response: {_0}")]
    Malformed(#[error(not(source))] String),
}

impl Error {
    /// Creates an [`Error::Reverted`] from the provided error `message` of a
    /// node, extracting the revert reason from it.
    #[must_use]
    pub fn reverted(message: &str) -> Self {
        let reason = message
            .split_once("revert")
            .map(|(_, rest)| {
                rest.trim_start_matches("ed").trim_start_matches(':').trim()
            })
            .filter(|r| !r.is_empty())
            .map(ToOwned::to_owned);
        Self::Reverted(reason)
    }

    /// Reclassifies this [`Error`] as the one of a read-only call, which
    /// never mines a transaction.
    #[must_use]
    pub fn into_call_error(self) -> Self {
        match self {
            Self::Reverted(reason) => Self::CallReverted(reason),
            e @ (Self::Unavailable(_)
            | Self::NoExternalSigner
            | Self::UserRejected
            | Self::Rejected(_)
            | Self::CallReverted(_)
            | Self::Malformed(_)) => e,
        }
    }
}

#[cfg(test)]
mod spec {
    use alloy_primitives::U256;
    use alloy_sol_types::SolCall as _;
    use common::operations::Call;

    use crate::gateway::{abi::Welcomy, CONTRACT_ADDRESS};

    use super::{Error, Ledger as _, Memory, ViewCall};

    #[tokio::test]
    async fn reverted_read_is_not_a_transaction() {
        let memory = Memory::default();

        let err = memory
            .execute(Call(ViewCall {
                to: CONTRACT_ADDRESS,
                data: Welcomy::getCoordinatesCall { index: U256::from(5) }
                    .abi_encode()
                    .into(),
            }))
            .await
            .unwrap_err();

        assert_eq!(
            err.as_ref(),
            &Error::CallReverted(Some("Apartment does not exist".into())),
        );
    }

    #[test]
    fn reclassifies_only_reverts() {
        assert_eq!(
            Error::reverted("execution reverted: nope").into_call_error(),
            Error::CallReverted(Some("nope".into())),
        );
        assert_eq!(
            Error::Unavailable("down".into()).into_call_error(),
            Error::Unavailable("down".into()),
        );
    }

    #[test]
    fn extracts_revert_reason() {
        for (msg, reason) in [
            ("execution reverted: Not enough funds", Some("Not enough funds")),
            (
                "VM Exception while processing transaction: revert No such \
                 apartment",
                Some("No such apartment"),
            ),
            ("execution reverted", None),
            ("execution reverted: ", None),
        ] {
            assert_eq!(
                Error::reverted(msg),
                Error::Reverted(reason.map(ToOwned::to_owned)),
                "{msg}",
            );
        }
    }

    #[test]
    fn displays_revert_reason() {
        assert_eq!(
            Error::Reverted(Some("Not enough funds".into())).to_string(),
            "Transaction is reverted: Not enough funds",
        );
        assert_eq!(
            Error::Reverted(None).to_string(),
            "Transaction is reverted: no reason given",
        );
    }
}
