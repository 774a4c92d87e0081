//! [`Command`] definition.

pub mod connect_wallet;
pub mod create_wallet;
pub mod import_wallet;
pub mod list_apartment;
pub mod make_reservation;
pub mod refresh_catalog;
pub mod withdraw_money;

use tracerr::Traced;

use crate::{
    domain::{Session, Snapshot},
    infra::ledger::Backend,
    Service,
};

/// [`Command`] of the [`Service`].
pub use common::Handler as Command;

pub use self::{
    connect_wallet::ConnectWallet, create_wallet::CreateWallet,
    import_wallet::ImportWallet, list_apartment::ListApartment,
    make_reservation::MakeReservation, refresh_catalog::RefreshCatalog,
    withdraw_money::WithdrawMoney,
};

/// Output of a [`Command`] followed by a refresh of the [`Session`]
/// [`Snapshot`].
///
/// Failed refresh doesn't fail the [`Command`] itself, so its result is
/// reported alongside.
#[derive(Debug)]
pub struct Refreshed<T> {
    /// Output of the [`Command`].
    pub value: T,

    /// Result of refreshing the [`Snapshot`].
    pub refresh: Result<Snapshot, Traced<refresh_catalog::ExecutionError>>,
}

impl<L> Service<L>
where
    L: Backend,
{
    /// Refreshes the [`Snapshot`] of the provided [`Session`] after a
    /// [`Command`] has produced the provided `value`.
    async fn refreshed<T>(&self, session: &Session, value: T) -> Refreshed<T> {
        Refreshed {
            value,
            refresh: self.refresh(session).await,
        }
    }
}

#[cfg(test)]
mod spec {
    use common::{DateTime, Ether};

    use crate::{
        domain::{
            apartment::{self, Coordinate},
            reservation::Stay,
            wallet, Session,
        },
        gateway,
        infra::{
            ledger::{self, memory::ExternalSigner},
            Memory,
        },
        query,
        Service,
    };

    use super::{
        connect_wallet, import_wallet, list_apartment, withdraw_money,
        Command as _, ConnectWallet, CreateWallet, ImportWallet,
        ListApartment, MakeReservation, RefreshCatalog, WithdrawMoney,
    };

    fn ether(s: &str) -> Ether {
        s.parse().unwrap()
    }

    fn stay(check_in: &str, check_out: &str) -> Stay {
        Stay::new(
            DateTime::parse(check_in).unwrap(),
            DateTime::parse(check_out).unwrap(),
        )
        .unwrap()
    }

    async fn new_session(service: &Service<Memory>) -> Session {
        let created = service.execute(CreateWallet).await.unwrap();
        _ = created.refresh.unwrap();
        created.value
    }

    async fn list(
        service: &Service<Memory>,
        session: &Session,
        coords: (&str, &str),
        price: &str,
    ) -> Result<(), list_apartment::ExecutionError> {
        let listed = service
            .execute(ListApartment {
                session: session.clone(),
                longitude: Coordinate::new(coords.0).unwrap(),
                latitude: Coordinate::new(coords.1).unwrap(),
                price_per_night: ether(price),
            })
            .await
            .map_err(tracerr::Traced::into_inner)?;
        _ = listed.refresh.unwrap();
        Ok(())
    }

    #[tokio::test]
    async fn lists_apartments() {
        let service = Service::new(Memory::default());
        let owner = new_session(&service).await;
        assert!(owner.snapshot().await.unwrap().apartments.is_empty());

        list(&service, &owner, ("52.37", "4.89"), "0.1")
            .await
            .unwrap();
        let snapshot = owner.snapshot().await.unwrap();
        assert_eq!(snapshot.apartments.len(), 1);

        list(&service, &owner, ("48.85", "2.35"), "0.2")
            .await
            .unwrap();
        let snapshot = owner.snapshot().await.unwrap();
        assert_eq!(snapshot.apartments.len(), 2);

        let second = snapshot
            .apartment(apartment::Number::new(2).unwrap())
            .unwrap();
        assert_eq!(second.longitude.to_string(), "48.85");
        assert_eq!(second.latitude.to_string(), "2.35");
        assert_eq!(second.price_per_night, ether("0.2"));
    }

    #[tokio::test]
    async fn reserves_and_withdraws() {
        let memory = Memory::default();
        let service = Service::new(memory.clone());

        let owner = new_session(&service).await;
        list(&service, &owner, ("52.37", "4.89"), "0.1")
            .await
            .unwrap();
        list(&service, &owner, ("48.85", "2.35"), "0.2")
            .await
            .unwrap();
        let earnings = owner.snapshot().await.unwrap().earnings;
        assert_eq!(earnings.owner, owner.wallet.address());
        assert!(!earnings.is_claimable());

        let renter = new_session(&service).await;
        memory.fund(renter.wallet.address(), ether("1").to_wei());

        let quote = service
            .execute(query::PriceReservation {
                session: renter.clone(),
                apartment: apartment::Number::new(2).unwrap(),
                stay: stay("2023-03-01", "2023-03-04"),
            })
            .await
            .unwrap();
        assert_eq!(
            quote.total,
            ether("0.2").to_wei().checked_mul(3).unwrap(),
        );

        let reserved = service
            .execute(MakeReservation {
                session: renter.clone(),
                apartment: apartment::Number::new(2).unwrap(),
                stay: stay("2023-03-01", "2023-03-04"),
            })
            .await
            .unwrap();
        assert!(reserved.value.block_number.is_some());
        assert_eq!(reserved.refresh.unwrap().balance, ether("0.4"));

        let refreshed = service
            .execute(RefreshCatalog {
                session: owner.clone(),
            })
            .await
            .unwrap();
        assert_eq!(refreshed.earnings.unclaimed, ether("0.6"));
        assert!(refreshed.earnings.is_claimable());

        let withdrawn = service
            .execute(WithdrawMoney {
                session: owner.clone(),
                amount: ether("0.6"),
            })
            .await
            .unwrap();
        let snapshot = withdrawn.refresh.unwrap();
        assert_eq!(snapshot.balance, ether("0.6"));
        assert!(!snapshot.earnings.is_claimable());
    }

    #[tokio::test]
    async fn refresh_is_idempotent() {
        let service = Service::new(Memory::default());
        let session = new_session(&service).await;
        list(&service, &session, ("52.37", "4.89"), "0.1")
            .await
            .unwrap();

        let first = service
            .execute(RefreshCatalog {
                session: session.clone(),
            })
            .await
            .unwrap();
        let second = service
            .execute(RefreshCatalog {
                session: session.clone(),
            })
            .await
            .unwrap();

        assert_eq!(first.apartments, second.apartments);
        assert_eq!(first.earnings, second.earnings);
        assert_eq!(first.balance, second.balance);
    }

    #[tokio::test]
    async fn skips_rows_of_empty_catalog() {
        let memory = Memory::default();
        let service = Service::new(memory.clone());
        let session = new_session(&service).await;

        let before = memory.view_calls();
        _ = service
            .execute(RefreshCatalog {
                session: session.clone(),
            })
            .await
            .unwrap();

        // Only the counter and the unclaimed earnings are read.
        assert_eq!(memory.view_calls() - before, 2);
    }

    #[tokio::test]
    async fn failed_write_keeps_snapshot() {
        let memory = Memory::default();
        let service = Service::new(memory.clone());
        let session = new_session(&service).await;
        list(&service, &session, ("52.37", "4.89"), "0.1")
            .await
            .unwrap();
        let before = session.snapshot().await.unwrap();

        memory.fail_next_transaction();
        let err = list(&service, &session, ("48.85", "2.35"), "0.2")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            list_apartment::ExecutionError::Gateway(gateway::Error::Ledger(
                ledger::Error::Reverted(None),
            )),
        ));
        assert_eq!(session.snapshot().await.unwrap(), before);

        let err = service
            .execute(WithdrawMoney {
                session: session.clone(),
                amount: ether("0.1"),
            })
            .await
            .unwrap_err();
        assert!(matches!(
            err.as_ref(),
            withdraw_money::ExecutionError::Gateway(gateway::Error::Ledger(
                ledger::Error::Reverted(Some(reason)),
            )) if reason == "Not enough funds",
        ));
        assert_eq!(session.snapshot().await.unwrap(), before);

        let renter = new_session(&service).await;
        let err = service
            .execute(MakeReservation {
                session: renter.clone(),
                apartment: apartment::Number::new(1).unwrap(),
                stay: stay("2023-03-01", "2023-03-02"),
            })
            .await
            .unwrap_err();
        assert!(matches!(
            err.as_ref(),
            super::make_reservation::ExecutionError::Gateway(
                gateway::Error::Ledger(ledger::Error::Rejected(_)),
            ),
        ));
    }

    #[tokio::test]
    async fn unavailable_ledger_keeps_snapshot() {
        let memory = Memory::default();
        let service = Service::new(memory.clone());
        let session = new_session(&service).await;
        let before = session.snapshot().await.unwrap();

        memory.set_unavailable(true);
        let err = service
            .execute(RefreshCatalog {
                session: session.clone(),
            })
            .await
            .unwrap_err();
        assert!(err.as_ref().to_string().contains("connection refused"));
        assert_eq!(session.snapshot().await.unwrap(), before);

        let created = service.execute(CreateWallet).await.unwrap();
        assert!(created.refresh.is_err());
        assert!(created.value.snapshot().await.is_none());
    }

    #[tokio::test]
    async fn confirmed_write_survives_failed_refresh() {
        let memory = Memory::default();
        let service = Service::new(memory.clone());
        let owner = new_session(&service).await;
        let before = owner.snapshot().await.unwrap();

        memory.disconnect_after_next_confirm();
        let listed = service
            .execute(ListApartment {
                session: owner.clone(),
                longitude: Coordinate::new("52.37").unwrap(),
                latitude: Coordinate::new("4.89").unwrap(),
                price_per_night: ether("0.1"),
            })
            .await
            .unwrap();

        assert!(listed.value.block_number.is_some());
        let err = listed.refresh.unwrap_err();
        assert!(err.as_ref().to_string().contains("connection refused"));
        assert_eq!(owner.snapshot().await.unwrap(), before);

        memory.set_unavailable(false);
        let refreshed = service
            .execute(RefreshCatalog {
                session: owner.clone(),
            })
            .await
            .unwrap();
        assert_eq!(refreshed.apartments.len(), 1);
    }

    #[tokio::test]
    async fn imports_wallet() {
        let service = Service::new(Memory::default());

        let err = service
            .execute(ImportWallet {
                secret_key: String::new().into(),
            })
            .await
            .unwrap_err();
        assert!(matches!(
            err.as_ref(),
            import_wallet::ExecutionError::EmptySecretKey,
        ));

        let err = service
            .execute(ImportWallet {
                secret_key: "0xnothex".to_owned().into(),
            })
            .await
            .unwrap_err();
        assert!(matches!(
            err.as_ref(),
            import_wallet::ExecutionError::InvalidSecretKey,
        ));

        let imported = service
            .execute(ImportWallet {
                secret_key: "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae\
                             784d7bf4f2ff80"
                    .to_owned()
                    .into(),
            })
            .await
            .unwrap();
        assert_eq!(imported.value.wallet.kind, wallet::Kind::Imported);
        assert_eq!(
            imported.value.wallet.address().to_string(),
            "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266",
        );
    }

    #[tokio::test]
    async fn connects_external_wallet() {
        let memory = Memory::default();
        let service = Service::new(memory.clone());

        let err = service.execute(ConnectWallet).await.unwrap_err();
        assert!(matches!(
            err.as_ref(),
            connect_wallet::ExecutionError::SignerUnavailable(_),
        ));

        memory.set_external_signer(ExternalSigner::Accounts(vec![]));
        let err = service.execute(ConnectWallet).await.unwrap_err();
        assert!(matches!(
            err.as_ref(),
            connect_wallet::ExecutionError::SignerUnavailable(_),
        ));

        memory.set_external_signer(ExternalSigner::Rejecting);
        let err = service.execute(ConnectWallet).await.unwrap_err();
        assert!(matches!(
            err.as_ref(),
            connect_wallet::ExecutionError::UserRejected,
        ));

        let owner = new_session(&service).await;
        memory.set_external_signer(ExternalSigner::Accounts(vec![
            owner.wallet.address(),
        ]));
        let connected = service.execute(ConnectWallet).await.unwrap();
        assert_eq!(connected.value.wallet.kind, wallet::Kind::External);
        assert_eq!(connected.value.wallet.address(), owner.wallet.address());

        // External wallet signs through the emulated signer.
        list(&service, &connected.value, ("52.37", "4.89"), "0.1")
            .await
            .unwrap();
        assert_eq!(
            connected.value.snapshot().await.unwrap().apartments.len(),
            1,
        );
    }
}
