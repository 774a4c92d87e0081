//! [`Command`] for creating a [`Session`] of an imported [`Wallet`].

use derive_more::{Display, Error};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{wallet, Session, Wallet},
    infra::ledger::Backend,
    Service,
};

use super::{Command, Refreshed};

/// [`Command`] for creating a [`Session`] of a [`Wallet`] imported from a
/// [`wallet::SecretKey`].
#[derive(Debug)]
pub struct ImportWallet {
    /// [`wallet::SecretKey`] to import the [`Wallet`] from.
    pub secret_key: wallet::SecretKey,
}

impl<L> Command<ImportWallet> for Service<L>
where
    L: Backend,
{
    type Ok = Refreshed<Session>;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: ImportWallet) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let wallet = Wallet::import(&cmd.secret_key).map_err(|e| match e {
            wallet::ImportError::Empty => tracerr::new!(E::EmptySecretKey),
            wallet::ImportError::Malformed => {
                tracerr::new!(E::InvalidSecretKey)
            }
        })?;

        let session = Session::new(wallet);
        log::info!(
            "created `Session({})` of `{}` wallet `{}`",
            session.id,
            session.wallet.kind,
            session.wallet.address(),
        );

        Ok(self.refreshed(&session, session.clone()).await)
    }
}

/// Error of [`ImportWallet`] [`Command`] execution.
#[derive(Clone, Copy, Debug, Display, Error)]
pub enum ExecutionError {
    /// Provided [`wallet::SecretKey`] is empty.
    #[display("Secret key is empty")]
    EmptySecretKey,

    /// Provided [`wallet::SecretKey`] is not a valid private key.
    #[display("Secret key is not a valid private key")]
    InvalidSecretKey,
}
