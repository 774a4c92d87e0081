//! [`Command`] for creating a [`Session`] of an external signer account.

use common::operations::Request;
use derive_more::{Display, Error};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{Session, Wallet},
    infra::ledger::{self, Accounts, Backend},
    Service,
};

use super::{Command, Refreshed};

/// [`Command`] for creating a [`Session`] of the first account exposed by an
/// external signer.
#[derive(Clone, Copy, Debug)]
pub struct ConnectWallet;

impl<L> Command<ConnectWallet> for Service<L>
where
    L: Backend,
{
    type Ok = Refreshed<Session>;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, _: ConnectWallet) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let account = self
            .ledger()
            .execute(Request(Accounts))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .into_iter()
            .next()
            .ok_or_else(|| {
                tracerr::new!(E::SignerUnavailable(
                    "external signer exposes no accounts".into(),
                ))
            })?;

        let session = Session::new(Wallet::external(account));
        log::info!(
            "created `Session({})` of `{}` wallet `{}`",
            session.id,
            session.wallet.kind,
            session.wallet.address(),
        );

        Ok(self.refreshed(&session, session.clone()).await)
    }
}

/// Error of [`ConnectWallet`] [`Command`] execution.
#[derive(Debug, Display, Error)]
pub enum ExecutionError {
    /// External signer cannot provide an account.
    #[display("External signer is unavailable: {_0}")]
    SignerUnavailable(#[error(not(source))] String),

    /// Account access is declined by the user.
    #[display("Account access is rejected by the user")]
    UserRejected,

    /// [`Ledger`] error.
    ///
    /// [`Ledger`]: crate::infra::Ledger
    #[display("`Ledger` operation failed: {_0}")]
    Ledger(ledger::Error),
}

impl From<ledger::Error> for ExecutionError {
    fn from(err: ledger::Error) -> Self {
        use ledger::Error as E;

        match err {
            E::NoExternalSigner => Self::SignerUnavailable(err.to_string()),
            E::Unavailable(msg) => Self::SignerUnavailable(msg),
            E::UserRejected => Self::UserRejected,
            E::Rejected(_)
            | E::Reverted(_)
            | E::CallReverted(_)
            | E::Malformed(_) => {
                Self::Ledger(err)
            }
        }
    }
}
