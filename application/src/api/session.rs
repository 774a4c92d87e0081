//! [`Session`]-related definitions.

use common::DateTime;
use derive_more::{AsRef, Display, From, Into};
use juniper::{graphql_object, GraphQLEnum, GraphQLObject, GraphQLScalar};
use service::{command::Refreshed, domain};
use uuid::Uuid;

use crate::{
    api::{self, catalog::RefreshFailure, scalar},
    Context,
};

/// Live wallet session with the rental contract.
#[derive(Clone, Debug, From)]
pub struct Session(domain::Session);

/// Live wallet session with the rental contract.
#[graphql_object(context = Context)]
impl Session {
    /// Unique identifier of this `Session`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Session.id",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn id(&self) -> Id {
        self.0.id.into()
    }

    /// Public address of the wallet of this `Session`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Session.address",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn address(&self) -> Address {
        self.0.wallet.address().into()
    }

    /// Kind of the wallet of this `Session`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Session.kind",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn kind(&self) -> WalletKind {
        self.0.wallet.kind.into()
    }

    /// `DateTime` when this `Session` was established.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Session.createdAt",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn created_at(&self) -> DateTime {
        self.0.created_at.coerce()
    }
}

/// Unique identifier of a `Session`.
#[derive(Clone, Copy, Debug, Display, From, GraphQLScalar, Into)]
#[from(domain::session::Id)]
#[into(domain::session::Id)]
#[graphql(name = "SessionId", transparent)]
pub struct Id(Uuid);

/// Public address of an account.
#[derive(AsRef, Clone, Copy, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(name = "Address", with = scalar::Via::<alloy_primitives::Address>)]
pub struct Address(alloy_primitives::Address);

/// Kind of a wallet.
#[derive(Clone, Copy, Debug, GraphQLEnum)]
pub enum WalletKind {
    /// Randomly generated wallet, lost once replaced.
    Ephemeral,

    /// Wallet imported from a secret key.
    Imported,

    /// Account managed by an external signer.
    External,
}

impl From<domain::wallet::Kind> for WalletKind {
    fn from(kind: domain::wallet::Kind) -> Self {
        use domain::wallet::Kind as K;

        match kind {
            K::Ephemeral => Self::Ephemeral,
            K::Imported => Self::Imported,
            K::External => Self::External,
        }
    }
}

/// Result of establishing a new `Session`.
#[derive(Clone, Debug, GraphQLObject)]
#[graphql(context = Context, name = "EstablishSessionResult")]
pub struct EstablishResult {
    /// Established `Session`.
    pub session: Session,

    /// Failure of the initial catalog refresh, if any.
    ///
    /// The `Session` is established regardless.
    pub refresh_error: Option<RefreshFailure>,
}

impl From<Refreshed<domain::Session>> for EstablishResult {
    fn from(output: Refreshed<domain::Session>) -> Self {
        let Refreshed { value, refresh } = output;
        Self {
            session: value.into(),
            refresh_error: refresh.err().map(Into::into),
        }
    }
}
