//! [`Query`] for pricing a reservation.

use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{
        apartment,
        reservation::{Quote, Stay},
        Session,
    },
    gateway::{self, Gateway},
    infra::ledger::Backend,
    Service,
};

use super::Query;

/// [`Query`] pricing a [`Stay`] in an apartment of the cached catalog.
///
/// The nightly price is re-read from the contract, so the [`Quote`] never
/// relies on a stale [`Snapshot`] price.
///
/// [`Snapshot`]: crate::domain::Snapshot
#[derive(Clone, Debug)]
pub struct PriceReservation {
    /// [`Session`] to price the reservation in.
    pub session: Session,

    /// [`apartment::Number`] of the apartment to price.
    pub apartment: apartment::Number,

    /// [`Stay`] to price.
    pub stay: Stay,
}

impl<L> Query<PriceReservation> for Service<L>
where
    L: Backend,
{
    type Ok = Quote;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        query: PriceReservation,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let PriceReservation {
            session,
            apartment,
            stay,
        } = query;

        let listed = session
            .snapshot()
            .await
            .is_some_and(|s| s.apartment(apartment).is_some());
        if !listed {
            return Err(tracerr::new!(E::ApartmentNotFound(apartment)));
        }

        let price_per_night = Gateway::new(self.ledger(), &session.wallet)
            .price_per_night(apartment.index())
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        Quote::new(apartment, stay, price_per_night)
            .ok_or_else(|| tracerr::new!(E::TotalOverflow))
    }
}

/// Error of [`PriceReservation`] [`Query`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// Apartment is not present in the cached catalog.
    #[display("Apartment #{_0} is not found")]
    #[from(ignore)]
    ApartmentNotFound(#[error(not(source))] apartment::Number),

    /// [`Gateway`] error.
    #[display("`Gateway` operation failed: {_0}")]
    Gateway(gateway::Error),

    /// Total price of the stay overflows.
    #[display("Total price overflows")]
    TotalOverflow,
}

#[cfg(test)]
mod spec {
    use common::{DateTime, Ether};

    use crate::{
        command::{Command as _, CreateWallet, ListApartment},
        domain::{
            apartment::{self, Coordinate},
            reservation::Stay,
        },
        infra::Memory,
        Service,
    };

    use super::{ExecutionError, PriceReservation};

    #[tokio::test]
    async fn rejects_unlisted_apartments() {
        let service = Service::new(Memory::default());
        let session = service.execute(CreateWallet).await.unwrap().value;
        let stay = Stay::new(
            DateTime::parse("2023-03-01").unwrap(),
            DateTime::parse("2023-03-02").unwrap(),
        )
        .unwrap();

        let err = service
            .execute(PriceReservation {
                session: session.clone(),
                apartment: apartment::Number::new(1).unwrap(),
                stay,
            })
            .await
            .unwrap_err();
        assert!(matches!(err.as_ref(), ExecutionError::ApartmentNotFound(_)));

        _ = service
            .execute(ListApartment {
                session: session.clone(),
                longitude: Coordinate::new("52.37").unwrap(),
                latitude: Coordinate::new("4.89").unwrap(),
                price_per_night: "0.1".parse().unwrap(),
            })
            .await
            .unwrap();

        let quote = service
            .execute(PriceReservation {
                session: session.clone(),
                apartment: apartment::Number::new(1).unwrap(),
                stay,
            })
            .await
            .unwrap();
        assert_eq!(quote.total, "0.1".parse::<Ether>().unwrap().to_wei());

        let err = service
            .execute(PriceReservation {
                session,
                apartment: apartment::Number::new(2).unwrap(),
                stay,
            })
            .await
            .unwrap_err();
        assert!(matches!(err.as_ref(), ExecutionError::ApartmentNotFound(_)));
    }
}
