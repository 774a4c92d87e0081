//! GraphQL API definitions.

pub mod apartment;
pub mod catalog;
mod mutation;
mod query;
pub mod reservation;
pub mod scalar;
pub mod session;
pub mod transaction;

use juniper::EmptySubscription;

use crate::Context;

pub use self::{
    apartment::Apartment, catalog::Catalog, mutation::Mutation, query::Query,
    session::Session,
};

/// GraphQL schema.
pub type Schema =
    juniper::RootNode<'static, Query, Mutation, EmptySubscription<Context>>;
