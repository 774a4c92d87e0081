//! Reservation-related definitions.

use common::{DateTime, Ether};
use juniper::GraphQLObject;
use service::domain::reservation;

use crate::{AsError, Context, Error};

/// Priced reservation of an apartment.
#[derive(Clone, Debug, GraphQLObject)]
#[graphql(context = Context, name = "ReservationQuote")]
pub struct Quote {
    /// ID of the apartment to reserve.
    pub apartment_id: i32,

    /// Check-in date, in `YYYY-MM-DD` format.
    pub check_in: String,

    /// Check-out date, in `YYYY-MM-DD` format.
    pub check_out: String,

    /// Number of nights to stay.
    pub nights: i32,

    /// Current price of a single night in the apartment.
    pub price_per_night: Ether,

    /// Total price to pay for the reservation.
    pub total: Ether,
}

impl TryFrom<reservation::Quote> for Quote {
    type Error = Error;

    fn try_from(quote: reservation::Quote) -> Result<Self, Self::Error> {
        let reservation::Quote {
            apartment,
            stay,
            price_per_night,
            total,
        } = quote;

        Ok(Self {
            apartment_id: i32::try_from(u64::from(apartment))
                .map_err(AsError::into_error)?,
            check_in: stay.check_in().to_string(),
            check_out: stay.check_out().to_string(),
            nights: i32::try_from(stay.nights())
                .map_err(AsError::into_error)?,
            price_per_night: price_per_night
                .to_ether()
                .map_err(AsError::into_error)?,
            total: total.to_ether().map_err(AsError::into_error)?,
        })
    }
}

/// Parses a [`reservation::Stay`] from the provided `check_in` and
/// `check_out` dates.
///
/// Dates are accepted either in `YYYY-MM-DD` format (meaning the midnight in
/// UTC) or in [RFC 3339] format.
///
/// # Errors
///
/// Errors if any of the dates cannot be parsed, or they don't form a valid
/// stay.
///
/// [RFC 3339]: https://tools.ietf.org/html/rfc3339
pub(crate) fn stay(
    check_in: &str,
    check_out: &str,
) -> Result<reservation::Stay, Error> {
    reservation::Stay::new(
        DateTime::parse(check_in).map_err(AsError::into_error)?,
        DateTime::parse(check_out).map_err(AsError::into_error)?,
    )
    .map_err(AsError::into_error)
}
