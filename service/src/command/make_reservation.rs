//! [`Command`] for reserving an apartment.

use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{apartment, reservation::Stay, Session},
    gateway::{self, Gateway},
    infra::ledger::{Backend, Receipt},
    query,
    Service,
};

use super::{Command, Refreshed};

/// [`Command`] for reserving an apartment for a [`Stay`], paying its total
/// price.
#[derive(Clone, Debug)]
pub struct MakeReservation {
    /// [`Session`] to make the reservation in.
    pub session: Session,

    /// [`apartment::Number`] of the apartment to reserve.
    pub apartment: apartment::Number,

    /// [`Stay`] to reserve.
    pub stay: Stay,
}

impl<L> Command<MakeReservation> for Service<L>
where
    L: Backend,
{
    type Ok = Refreshed<Receipt>;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: MakeReservation,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let MakeReservation {
            session,
            apartment,
            stay,
        } = cmd;

        let receipt = {
            let _write = session.lock_writes().await;
            let quote = self
                .execute(query::PriceReservation {
                    session: session.clone(),
                    apartment,
                    stay,
                })
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?;
            Gateway::new(self.ledger(), &session.wallet)
                .make_reservation(&quote)
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?
        };

        Ok(self.refreshed(&session, receipt).await)
    }
}

/// Error of [`MakeReservation`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// Failed to price the reservation.
    #[display("Failed to price reservation: {_0}")]
    Pricing(query::price_reservation::ExecutionError),

    /// [`Gateway`] error.
    #[display("`Gateway` operation failed: {_0}")]
    Gateway(gateway::Error),
}
