//! [`Session`] definitions.

use std::sync::Arc;

#[cfg(doc)]
use common::DateTime;
use common::{unit, DateTimeOf};
use derive_more::{Debug, Display, Error, From, Into};
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};
use uuid::Uuid;

use crate::domain::{catalog::Snapshot, Wallet};

/// Live session of a [`Wallet`] with the rental contract.
///
/// Clones share the same [`Snapshot`] cache and write lock.
#[derive(Clone, Debug)]
pub struct Session {
    /// ID of this [`Session`].
    pub id: Id,

    /// [`Wallet`] of this [`Session`].
    pub wallet: Wallet,

    /// [`DateTime`] when this [`Session`] was created.
    pub created_at: CreationDateTime,

    /// Last successfully refreshed [`Snapshot`].
    #[debug(skip)]
    catalog: Arc<RwLock<Option<Snapshot>>>,

    /// Lock serializing transactions of this [`Session`].
    #[debug(skip)]
    writes: Arc<Mutex<()>>,
}

impl Session {
    /// Creates a new [`Session`] of the provided [`Wallet`] with an empty
    /// cache.
    #[must_use]
    pub fn new(wallet: Wallet) -> Self {
        Self {
            id: Id::new(),
            wallet,
            created_at: DateTimeOf::now(),
            catalog: Arc::default(),
            writes: Arc::default(),
        }
    }

    /// Returns the cached [`Snapshot`], if any refresh has succeeded yet.
    pub async fn snapshot(&self) -> Option<Snapshot> {
        self.catalog.read().await.clone()
    }

    /// Caches the provided [`Snapshot`].
    ///
    /// A [`Snapshot`] taken before the cached one is discarded.
    pub async fn update_snapshot(&self, snapshot: Snapshot) {
        let mut cached = self.catalog.write().await;
        if cached
            .as_ref()
            .map_or(true, |c| c.refreshed_at <= snapshot.refreshed_at)
        {
            *cached = Some(snapshot);
        }
    }

    /// Waits until no other transaction of this [`Session`] is in flight and
    /// locks it for a new one.
    pub async fn lock_writes(&self) -> WriteGuard {
        WriteGuard(Arc::clone(&self.writes).lock_owned().await)
    }

    /// Indicates whether a transaction of this [`Session`] is in flight.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.writes.try_lock().is_err()
    }
}

/// Guard of an in-flight transaction of a [`Session`].
#[derive(Debug)]
pub struct WriteGuard(
    #[debug(skip)]
    #[expect(dead_code, reason = "held for its `Drop`")]
    OwnedMutexGuard<()>,
);

/// ID of a [`Session`].
#[derive(
    Clone, Copy, Debug, Default, Display, Eq, From, Hash, Into, PartialEq,
)]
pub struct Id(Uuid);

impl Id {
    /// Creates a new random [`Id`].
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

/// [`DateTime`] of a [`Session`] creation.
pub type CreationDateTime = DateTimeOf<(Session, unit::Creation)>;

/// Holder of the single live [`Session`].
#[derive(Debug, Default)]
pub struct Slot(RwLock<Option<Session>>);

impl Slot {
    /// Returns the live [`Session`], if any.
    pub async fn current(&self) -> Option<Session> {
        self.0.read().await.clone()
    }

    /// Checks whether the live [`Session`] can be replaced right now.
    ///
    /// # Errors
    ///
    /// With [`Busy`] if the live [`Session`] has a transaction in flight.
    pub async fn ensure_idle(&self) -> Result<(), Busy> {
        self.0
            .read()
            .await
            .as_ref()
            .filter(|s| s.is_busy())
            .map_or(Ok(()), |s| Err(Busy(s.id)))
    }

    /// Replaces the live [`Session`] with the provided one, returning the
    /// replaced one.
    ///
    /// # Errors
    ///
    /// With [`Busy`] if the live [`Session`] has a transaction in flight, in
    /// which case it stays live.
    pub async fn replace(
        &self,
        session: Session,
    ) -> Result<Option<Session>, Busy> {
        let mut live = self.0.write().await;
        if let Some(s) = live.as_ref().filter(|s| s.is_busy()) {
            return Err(Busy(s.id));
        }
        Ok(live.replace(session))
    }
}

/// Error of replacing a [`Session`] having a transaction in flight.
#[derive(Clone, Copy, Debug, Display, Error)]
#[display("`Session({_0})` has a transaction in flight")]
pub struct Busy(#[error(not(source))] pub Id);

#[cfg(test)]
mod spec {
    use common::DateTime;

    use crate::domain::{
        catalog::{Earnings, Snapshot},
        Wallet,
    };

    use super::{Session, Slot};

    fn snapshot(at: &str, owner: &Wallet) -> Snapshot {
        Snapshot {
            apartments: Vec::new(),
            earnings: Earnings {
                owner: owner.address(),
                unclaimed: "0.5".parse().unwrap(),
            },
            balance: "1".parse().unwrap(),
            refreshed_at: DateTime::parse(at).unwrap().coerce(),
        }
    }

    #[tokio::test]
    async fn keeps_latest_snapshot() {
        let session = Session::new(Wallet::generate());
        assert!(session.snapshot().await.is_none());

        let late = snapshot("2023-03-02", &session.wallet);
        let early = snapshot("2023-03-01", &session.wallet);

        session.update_snapshot(late.clone()).await;
        session.update_snapshot(early).await;

        assert_eq!(session.snapshot().await, Some(late));
    }

    #[tokio::test]
    async fn shares_cache_between_clones() {
        let session = Session::new(Wallet::generate());
        let clone = session.clone();

        clone
            .update_snapshot(snapshot("2023-03-01", &session.wallet))
            .await;

        assert!(session.snapshot().await.is_some());
    }

    #[tokio::test]
    async fn refuses_replacing_busy_session() {
        let slot = Slot::default();
        let first = Session::new(Wallet::generate());
        assert!(slot.replace(first.clone()).await.unwrap().is_none());

        let guard = first.lock_writes().await;
        assert!(first.is_busy());
        assert!(slot.ensure_idle().await.is_err());
        let busy = slot
            .replace(Session::new(Wallet::generate()))
            .await
            .unwrap_err();
        assert_eq!(busy.0, first.id);
        assert_eq!(slot.current().await.unwrap().id, first.id);

        drop(guard);
        assert!(slot.ensure_idle().await.is_ok());
        let second = Session::new(Wallet::generate());
        let replaced = slot.replace(second.clone()).await.unwrap();
        assert_eq!(replaced.unwrap().id, first.id);
        assert_eq!(slot.current().await.unwrap().id, second.id);
    }
}
