//! [`Apartment`]-related definitions.

use common::Ether;
use derive_more::From;
use juniper::graphql_object;
use service::domain::{self, apartment};

use crate::{api, define_error, AsError, Context, Error};

/// Apartment listed in the rental contract.
#[derive(Clone, Debug, From)]
pub struct Apartment(domain::Apartment);

/// Apartment listed in the rental contract.
#[graphql_object(context = Context)]
impl Apartment {
    /// Number of this `Apartment` in the catalog, starting from `1`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Apartment.id",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn id(&self, ctx: &Context) -> Result<i32, Error> {
        i32::try_from(u64::from(self.0.number))
            .map_err(AsError::into_error)
            .map_err(ctx.error())
    }

    /// Longitude of this `Apartment`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Apartment.longitude",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn longitude(&self) -> &str {
        self.0.longitude.as_ref()
    }

    /// Latitude of this `Apartment`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Apartment.latitude",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn latitude(&self) -> &str {
        self.0.latitude.as_ref()
    }

    /// Price of a single night in this `Apartment`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Apartment.pricePerNight",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn price_per_night(&self) -> Ether {
        self.0.price_per_night
    }
}

/// Converts the provided GraphQL `id` into an [`apartment::Number`].
///
/// # Errors
///
/// Errors if the `id` cannot number any apartment.
pub(crate) fn number(id: i32) -> Result<apartment::Number, Error> {
    u64::try_from(id)
        .ok()
        .and_then(apartment::Number::new)
        .ok_or_else(|| ApartmentError::NotFound.into())
}

define_error! {
    enum ApartmentError {
        #[code = "APARTMENT_NOT_FOUND"]
        #[status = NOT_FOUND]
        #[message = "Apartment with the provided ID is not listed"]
        NotFound,
    }
}

#[cfg(test)]
mod spec {
    use super::number;

    #[test]
    fn numbers_from_one() {
        assert_eq!(u64::from(number(1).unwrap()), 1);
        assert_eq!(number(0).unwrap_err().code, "APARTMENT_NOT_FOUND");
        assert_eq!(number(-3).unwrap_err().code, "APARTMENT_NOT_FOUND");
    }
}
