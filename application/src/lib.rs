//! Application provides GraphQL API for interacting with the [`Service`].

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

pub mod api;
pub mod args;
pub mod config;
mod context;
pub mod error;

use std::sync::Arc;

use axum::{
    response::{IntoResponse, Response},
    Extension, Json,
};
use derive_more::Debug;
use juniper::{http::GraphQLBatchResponse, DefaultScalarValue, ScalarValue};
use juniper_axum::extract::JuniperRequest;
use tracing as log;
// Used in binary.
use axum_client_ip as _;
use tokio as _;
use tower_http as _;
use tracing_subscriber as _;

pub use self::{
    args::Args,
    config::Config,
    context::Context,
    error::{AsError, Error},
};

/// [`Service`] with filled infrastructure dependencies.
///
/// [`Service`]: service::Service
pub type Service = service::Service<service::infra::Ethereum>;

/// Response of the GraphQL API.
///
/// Carries the status code set by a failed resolver, so that HTTP-level
/// clients see a failure without parsing the body.
#[derive(Debug)]
pub struct GraphQLResponse<S = DefaultScalarValue>
where
    S: ScalarValue,
{
    /// Status code to respond with if the `body` contains errors.
    pub error_status_code: http::StatusCode,

    /// Executed GraphQL response.
    #[debug(skip)]
    pub body: GraphQLBatchResponse<S>,
}

impl<S> IntoResponse for GraphQLResponse<S>
where
    S: ScalarValue,
{
    fn into_response(self) -> Response {
        let Self {
            error_status_code,
            body,
        } = self;

        let status_code = if body.is_ok() {
            http::StatusCode::OK
        } else {
            log::debug!("GraphQL request failed with `{error_status_code}`");
            error_status_code
        };
        (status_code, Json(body)).into_response()
    }
}

/// GraphQL API handler.
pub async fn graphql(
    Extension(schema): Extension<Arc<api::Schema>>,
    context: Context,
    JuniperRequest(request): JuniperRequest,
) -> GraphQLResponse {
    let body = request.execute(&*schema, &context).await;
    GraphQLResponse {
        error_status_code: context.error_status_code(),
        body,
    }
}
