//! Service contains the session management logic of the rental contract
//! client.
//!
//! List of available Cargo features:
#![doc = document_features::document_features!()]
#![deny(
    nonstandard_style,
    rust_2018_idioms,
    rustdoc::all,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code
)]
#![forbid(non_ascii_idents)]
#![warn(
    clippy::allow_attributes,
    clippy::allow_attributes_without_reason,
    clippy::pedantic,
    clippy::wildcard_enum_match_arm,
    deprecated_in_future,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unreachable_pub,
    unused_crate_dependencies,
    unused_import_braces,
    unused_labels,
    unused_lifetimes,
    unused_qualifications,
    unused_results
)]

pub mod command;
pub mod domain;
pub mod gateway;
pub mod infra;
pub mod query;

#[cfg(doc)]
use infra::Ledger;

pub use self::{command::Command, gateway::Gateway, query::Query};

/// Domain service.
#[derive(Clone, Debug)]
pub struct Service<L> {
    /// [`Ledger`] of this [`Service`].
    ledger: L,
}

impl<L> Service<L> {
    /// Creates a new [`Service`] on top of the provided [`Ledger`].
    #[must_use]
    pub const fn new(ledger: L) -> Self {
        Self { ledger }
    }

    /// Returns [`Ledger`] of this [`Service`].
    #[must_use]
    pub const fn ledger(&self) -> &L {
        &self.ledger
    }
}
