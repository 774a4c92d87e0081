//! [`Command`] for listing a new apartment.

use common::Ether;
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{apartment::Coordinate, Session},
    gateway::{self, Gateway},
    infra::ledger::{Backend, Receipt},
    Service,
};

use super::{Command, Refreshed};

/// [`Command`] for listing a new apartment owned by the [`Session`] wallet.
#[derive(Clone, Debug)]
pub struct ListApartment {
    /// [`Session`] to list the apartment in.
    pub session: Session,

    /// Longitude of the apartment.
    pub longitude: Coordinate,

    /// Latitude of the apartment.
    pub latitude: Coordinate,

    /// Price of a night in the apartment.
    pub price_per_night: Ether,
}

impl<L> Command<ListApartment> for Service<L>
where
    L: Backend,
{
    type Ok = Refreshed<Receipt>;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: ListApartment,
    ) -> Result<Self::Ok, Self::Err> {
        let ListApartment {
            session,
            longitude,
            latitude,
            price_per_night,
        } = cmd;

        let receipt = {
            let _write = session.lock_writes().await;
            Gateway::new(self.ledger(), &session.wallet)
                .list_apartment(&longitude, &latitude, price_per_night.to_wei())
                .await
                .map_err(tracerr::map_from_and_wrap!(=> ExecutionError))?
        };

        Ok(self.refreshed(&session, receipt).await)
    }
}

/// Error of [`ListApartment`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Gateway`] error.
    #[display("`Gateway` operation failed: {_0}")]
    Gateway(gateway::Error),
}
