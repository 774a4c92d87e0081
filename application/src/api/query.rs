//! GraphQL [`Query`]s definitions.

use common::Ether;
use juniper::graphql_object;
use service::{
    domain::Snapshot,
    query::{self, price_reservation},
    Query as _,
};

use crate::{api, define_error, AsError, Context, Error};

/// Root of all GraphQL queries.
#[derive(Clone, Copy, Debug)]
pub struct Query;

impl Query {
    /// Name of the [`tracing::Span`] for the queries.
    pub(crate) const SPAN_NAME: &'static str = "GraphQL query";

    /// Returns the cached [`Snapshot`] of the live `Session`.
    ///
    /// # Errors
    ///
    /// Errors if no `Session` is established.
    async fn snapshot(ctx: &Context) -> Result<Option<Snapshot>, Error> {
        let session = ctx.current_session().await?;
        ctx.service()
            .execute(query::CachedSnapshot { session })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
    }
}

#[graphql_object(context = Context)]
impl Query {
    /// Returns the live `Session`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `NO_SESSION` - no `Session` is established.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "wallet",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn wallet(ctx: &Context) -> Result<api::Session, Error> {
        ctx.current_session().await.map(Into::into)
    }

    /// Returns the last refreshed `Catalog` of the live `Session`.
    ///
    /// `null` until the first successful refresh.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `NO_SESSION` - no `Session` is established.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "catalog",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn catalog(ctx: &Context) -> Result<Option<api::Catalog>, Error> {
        Ok(Self::snapshot(ctx).await?.map(Into::into))
    }

    /// Returns the listed apartments, as of the last refresh of the live
    /// `Session`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `NO_SESSION` - no `Session` is established.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "apartments",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn apartments(
        ctx: &Context,
    ) -> Result<Vec<api::Apartment>, Error> {
        Ok(Self::snapshot(ctx)
            .await?
            .map(|s| s.apartments.into_iter().map(Into::into).collect())
            .unwrap_or_default())
    }

    /// Returns the rental income of the live `Session` wallet, as of the last
    /// refresh.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `NO_SESSION` - no `Session` is established.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "earnings",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn earnings(
        ctx: &Context,
    ) -> Result<Option<api::catalog::Earnings>, Error> {
        Ok(Self::snapshot(ctx).await?.map(|s| s.earnings.into()))
    }

    /// Returns the native account balance of the live `Session` wallet, as
    /// of the last refresh.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `NO_SESSION` - no `Session` is established.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "balance",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn balance(ctx: &Context) -> Result<Option<Ether>, Error> {
        Ok(Self::snapshot(ctx).await?.map(|s| s.balance))
    }

    /// Prices a reservation of the apartment with the provided ID between the
    /// provided dates, using its current nightly price.
    ///
    /// Dates are accepted either in `YYYY-MM-DD` format (meaning the
    /// midnight in UTC) or in RFC 3339 format.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `NO_SESSION` - no `Session` is established;
    /// - `INVALID_DATE_RANGE` - dates are malformed, or the check-out is not
    ///                          a whole number of nights after the check-in;
    /// - `APARTMENT_NOT_FOUND` - apartment is not in the cached catalog;
    /// - `NETWORK_UNAVAILABLE` - ledger endpoint cannot be reached.
    #[tracing::instrument(
        skip_all,
        fields(
            apartment_id = %apartment_id,
            check_in = %check_in,
            check_out = %check_out,
            gql.name = "reservationQuote",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn reservation_quote(
        apartment_id: i32,
        check_in: String,
        check_out: String,
        ctx: &Context,
    ) -> Result<api::reservation::Quote, Error> {
        let stay = api::reservation::stay(&check_in, &check_out)
            .map_err(ctx.error())?;
        let apartment =
            api::apartment::number(apartment_id).map_err(ctx.error())?;
        let session = ctx.current_session().await?;

        ctx.service()
            .execute(query::PriceReservation {
                session,
                apartment,
                stay,
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .try_into()
            .map_err(ctx.error())
    }
}

impl AsError for price_reservation::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "INVALID_AMOUNT"]
                #[status = BAD_REQUEST]
                #[message = "Total price of the reservation is too large"]
                TotalOverflow,
            }
        }

        match self {
            Self::ApartmentNotFound(_) => {
                Some(api::apartment::ApartmentError::NotFound.into())
            }
            Self::Gateway(e) => e.try_as_error(),
            Self::TotalOverflow => Some(Error::TotalOverflow.into()),
        }
    }
}
