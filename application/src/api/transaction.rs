//! Confirmed transaction definitions.

use alloy_primitives::B256;
use derive_more::{AsRef, Display, From, Into};
use juniper::{GraphQLObject, GraphQLScalar};
use service::{command::Refreshed, infra::ledger::Receipt};

use crate::{
    api::{catalog::RefreshFailure, scalar},
    Context,
};

/// Transaction confirmed by the ledger.
#[derive(Clone, Debug, GraphQLObject)]
#[graphql(context = Context, name = "ConfirmedTransaction")]
pub struct Confirmed {
    /// Hash of the transaction.
    pub hash: Hash,

    /// Number of the block the transaction is included in, if reported.
    pub block_number: Option<BlockNumber>,

    /// Failure of the catalog refresh following the transaction, if any.
    ///
    /// The transaction is confirmed regardless.
    pub refresh_error: Option<RefreshFailure>,
}

impl From<Refreshed<Receipt>> for Confirmed {
    fn from(output: Refreshed<Receipt>) -> Self {
        let Refreshed { value, refresh } = output;
        Self {
            hash: value.tx_hash.into(),
            block_number: value.block_number.map(Into::into),
            refresh_error: refresh.err().map(Into::into),
        }
    }
}

/// Hash of a transaction.
#[derive(AsRef, Clone, Copy, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(name = "TransactionHash", with = scalar::Via::<B256>)]
pub struct Hash(B256);

/// Number of a block.
#[derive(AsRef, Clone, Copy, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(with = scalar::Via::<u64>)]
pub struct BlockNumber(u64);
