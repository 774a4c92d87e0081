//! [`Command`] for withdrawing rental income.

use common::Ether;
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::Session,
    gateway::{self, Gateway},
    infra::ledger::{Backend, Receipt},
    Service,
};

use super::{Command, Refreshed};

/// [`Command`] for withdrawing rental income of the [`Session`] wallet.
#[derive(Clone, Debug)]
pub struct WithdrawMoney {
    /// [`Session`] to withdraw the income in.
    pub session: Session,

    /// Amount to withdraw.
    pub amount: Ether,
}

impl<L> Command<WithdrawMoney> for Service<L>
where
    L: Backend,
{
    type Ok = Refreshed<Receipt>;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        WithdrawMoney { session, amount }: WithdrawMoney,
    ) -> Result<Self::Ok, Self::Err> {
        let receipt = {
            let _write = session.lock_writes().await;
            Gateway::new(self.ledger(), &session.wallet)
                .withdraw_money(amount.to_wei())
                .await
                .map_err(tracerr::map_from_and_wrap!(=> ExecutionError))?
        };

        Ok(self.refreshed(&session, receipt).await)
    }
}

/// Error of [`WithdrawMoney`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Gateway`] error.
    #[display("`Gateway` operation failed: {_0}")]
    Gateway(gateway::Error),
}
