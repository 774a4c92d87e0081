//! [`Query`] collection related to the cached catalog [`Snapshot`].

use std::convert::Infallible;

use crate::{
    domain::{Session, Snapshot},
    infra::ledger::Backend,
    Service,
};

use super::Query;

/// Queries the [`Snapshot`] cached in a [`Session`], without touching the
/// ledger.
///
/// [`None`] until the first successful refresh of the [`Session`].
#[derive(Clone, Debug)]
pub struct CachedSnapshot {
    /// [`Session`] to query the [`Snapshot`] of.
    pub session: Session,
}

impl<L> Query<CachedSnapshot> for Service<L>
where
    L: Backend,
{
    type Ok = Option<Snapshot>;
    type Err = Infallible;

    async fn execute(
        &self,
        CachedSnapshot { session }: CachedSnapshot,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(session.snapshot().await)
    }
}
