//! [`Command`] for refreshing the [`Snapshot`] of a [`Session`].

use common::{ether, DateTimeOf};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{apartment, catalog::Earnings, Apartment, Session, Snapshot},
    gateway::{self, Gateway},
    infra::ledger::Backend,
    Service,
};

use super::Command;

/// [`Command`] for refreshing the [`Snapshot`] of a [`Session`].
///
/// Cached [`Snapshot`] is replaced only if all the reads succeed.
#[derive(Clone, Debug)]
pub struct RefreshCatalog {
    /// [`Session`] to refresh the [`Snapshot`] of.
    pub session: Session,
}

impl<L> Command<RefreshCatalog> for Service<L>
where
    L: Backend,
{
    type Ok = Snapshot;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        RefreshCatalog { session }: RefreshCatalog,
    ) -> Result<Self::Ok, Self::Err> {
        self.refresh(&session).await
    }
}

impl<L> Service<L>
where
    L: Backend,
{
    /// Reads a new [`Snapshot`] for the provided [`Session`] and caches it.
    ///
    /// # Errors
    ///
    /// If any of the reads fails, in which case the cached [`Snapshot`] stays
    /// untouched.
    pub(crate) async fn refresh(
        &self,
        session: &Session,
    ) -> Result<Snapshot, Traced<ExecutionError>> {
        match self.read_snapshot(session).await {
            Ok(snapshot) => {
                log::debug!(
                    "refreshed `Session({})` with {} apartments",
                    session.id,
                    snapshot.apartments.len(),
                );
                session.update_snapshot(snapshot.clone()).await;
                Ok(snapshot)
            }
            Err(e) => {
                log::warn!("failed to refresh `Session({})`: {e}", session.id);
                Err(e)
            }
        }
    }

    /// Reads a new [`Snapshot`] for the provided [`Session`].
    async fn read_snapshot(
        &self,
        session: &Session,
    ) -> Result<Snapshot, Traced<ExecutionError>> {
        use ExecutionError as E;

        let refreshed_at = DateTimeOf::now();
        let gateway = Gateway::new(self.ledger(), &session.wallet);

        let balance = gateway
            .balance()
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .to_ether()
            .map_err(tracerr::from_and_wrap!(=> E))?;

        let count = gateway
            .apartments_count()
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        let mut apartments = Vec::new();
        for index in apartment::Index::all(count) {
            let (longitude, latitude) = gateway
                .coordinates(index)
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?;
            let price_per_night = gateway
                .price_per_night(index)
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?
                .to_ether()
                .map_err(tracerr::from_and_wrap!(=> E))?;
            log::debug!(
                "read apartment at index {index}: ({longitude}, {latitude}) \
                 for {price_per_night} per night",
            );
            apartments.push(Apartment {
                number: index.into(),
                longitude,
                latitude,
                price_per_night,
            });
        }

        let unclaimed = gateway
            .unclaimed()
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .to_ether()
            .map_err(tracerr::from_and_wrap!(=> E))?;

        Ok(Snapshot {
            apartments,
            earnings: Earnings {
                owner: session.wallet.address(),
                unclaimed,
            },
            balance,
            refreshed_at,
        })
    }
}

/// Error of [`RefreshCatalog`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Gateway`] error.
    #[display("`Gateway` operation failed: {_0}")]
    Gateway(gateway::Error),

    /// Read amount cannot be displayed.
    #[display("Failed to convert amount: {_0}")]
    Amount(ether::Error),
}
