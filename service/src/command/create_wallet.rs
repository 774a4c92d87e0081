//! [`Command`] for creating a [`Session`] of a newly generated [`Wallet`].

use std::convert::Infallible;

use tracing as log;

use crate::{
    domain::{Session, Wallet},
    infra::ledger::Backend,
    Service,
};

use super::{Command, Refreshed};

/// [`Command`] for creating a [`Session`] of a newly generated [`Wallet`].
#[derive(Clone, Copy, Debug)]
pub struct CreateWallet;

impl<L> Command<CreateWallet> for Service<L>
where
    L: Backend,
{
    type Ok = Refreshed<Session>;
    type Err = Infallible;

    async fn execute(&self, _: CreateWallet) -> Result<Self::Ok, Self::Err> {
        let session = Session::new(Wallet::generate());
        log::info!(
            "created `Session({})` of `{}` wallet `{}`",
            session.id,
            session.wallet.kind,
            session.wallet.address(),
        );

        Ok(self.refreshed(&session, session.clone()).await)
    }
}
