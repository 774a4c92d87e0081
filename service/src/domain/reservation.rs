//! Reservation definitions.

use common::{CalendarDate, DateTime, Wei};
use derive_more::{Display, Error};

use crate::domain::apartment;

/// Number of seconds in a single night of a [`Stay`].
const SECS_PER_NIGHT: u64 = 24 * 60 * 60;

/// Stay in an apartment between check-in and check-out dates.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Stay {
    /// [`DateTime`] of the check-in.
    check_in: DateTime,

    /// [`DateTime`] of the check-out.
    check_out: DateTime,

    /// Number of nights between the check-in and the check-out.
    nights: u64,
}

impl Stay {
    /// Creates a new [`Stay`] between the provided check-in and check-out.
    ///
    /// # Errors
    ///
    /// - [`RangeError::NotAfter`] if the check-out is not after the check-in;
    /// - [`RangeError::PartialNight`] if the stay is not a whole number of
    ///   nights;
    /// - [`RangeError::NegativeYear`] if the check-in precedes the year `0`.
    pub fn new(
        check_in: DateTime,
        check_out: DateTime,
    ) -> Result<Self, RangeError> {
        let duration = check_out
            .checked_duration_since(&check_in)
            .filter(|d| !d.is_zero())
            .ok_or(RangeError::NotAfter)?;
        if check_in.calendar_date().year < 0 {
            return Err(RangeError::NegativeYear);
        }
        if duration.subsec_nanos() != 0
            || duration.as_secs() % SECS_PER_NIGHT != 0
        {
            return Err(RangeError::PartialNight);
        }
        Ok(Self {
            check_in,
            check_out,
            nights: duration.as_secs() / SECS_PER_NIGHT,
        })
    }

    /// Returns the [`CalendarDate`] of the check-in, as it was provided.
    #[must_use]
    pub fn check_in(&self) -> CalendarDate {
        self.check_in.calendar_date()
    }

    /// Returns the [`CalendarDate`] of the check-out.
    #[must_use]
    pub fn check_out(&self) -> CalendarDate {
        self.check_out.calendar_date()
    }

    /// Returns the number of nights of this [`Stay`].
    #[must_use]
    pub const fn nights(&self) -> u64 {
        self.nights
    }
}

/// Error of a [`Stay`] date range.
#[derive(Clone, Copy, Debug, Display, Eq, Error, PartialEq)]
pub enum RangeError {
    /// Check-out is not after the check-in.
    #[display("check-out must be after check-in")]
    NotAfter,

    /// Stay doesn't consist of whole nights.
    #[display("stay must be a whole number of nights")]
    PartialNight,

    /// Dates before the year `0` cannot be reserved.
    #[display("dates before the year 0 are not supported")]
    NegativeYear,
}

/// Priced reservation of an apartment.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Quote {
    /// [`apartment::Number`] of the reserved apartment.
    pub apartment: apartment::Number,

    /// Reserved [`Stay`].
    pub stay: Stay,

    /// Price of a single night, as stored in the contract.
    pub price_per_night: Wei,

    /// Total price of the [`Stay`].
    pub total: Wei,
}

impl Quote {
    /// Prices the provided [`Stay`] in the apartment with the provided
    /// `price_per_night`.
    ///
    /// [`None`] is returned if the total price overflows.
    #[must_use]
    pub fn new(
        apartment: apartment::Number,
        stay: Stay,
        price_per_night: Wei,
    ) -> Option<Self> {
        Some(Self {
            apartment,
            stay,
            price_per_night,
            total: price_per_night.checked_mul(stay.nights())?,
        })
    }
}

#[cfg(test)]
mod spec {
    use alloy_primitives::U256;
    use common::{CalendarDate, DateTime, Ether, Wei};

    use crate::domain::apartment;

    use super::{Quote, RangeError, Stay};

    fn stay(check_in: &str, check_out: &str) -> Result<Stay, RangeError> {
        Stay::new(
            DateTime::parse(check_in).unwrap(),
            DateTime::parse(check_out).unwrap(),
        )
    }

    #[test]
    fn counts_nights() {
        assert_eq!(stay("2023-03-01", "2023-03-04").unwrap().nights(), 3);
        assert_eq!(stay("2023-02-28", "2023-03-01").unwrap().nights(), 1);
        assert_eq!(stay("2024-02-28", "2024-03-01").unwrap().nights(), 2);
        assert_eq!(stay("2023-12-31", "2024-01-01").unwrap().nights(), 1);
        assert_eq!(
            stay("2023-03-01T14:00:00Z", "2023-03-03T14:00:00Z")
                .unwrap()
                .nights(),
            2,
        );
    }

    #[test]
    fn decomposes_dates() {
        let stay = stay("2023-12-30", "2024-01-02").unwrap();

        assert_eq!(
            stay.check_in(),
            CalendarDate {
                day: 30,
                month: 12,
                year: 2023,
            },
        );
        assert_eq!(
            stay.check_out(),
            CalendarDate {
                day: 2,
                month: 1,
                year: 2024,
            },
        );
    }

    #[test]
    fn books_dates_in_provided_offset() {
        let stay =
            stay("2023-03-01T00:00:00+03:00", "2023-03-04T00:00:00+03:00")
                .unwrap();

        assert_eq!(stay.nights(), 3);
        assert_eq!(stay.check_in().to_string(), "2023-03-01");
        assert_eq!(stay.check_out().to_string(), "2023-03-04");
    }

    #[test]
    fn rejects_invalid_ranges() {
        assert_eq!(
            stay("2023-03-01", "2023-03-01"),
            Err(RangeError::NotAfter),
        );
        assert_eq!(
            stay("2023-03-04", "2023-03-01"),
            Err(RangeError::NotAfter),
        );
        assert_eq!(
            stay("2023-03-01", "2023-03-02T12:00:00Z"),
            Err(RangeError::PartialNight),
        );
    }

    #[test]
    fn prices_whole_stay() {
        let nightly = "0.2".parse::<Ether>().unwrap().to_wei();
        let quote = Quote::new(
            apartment::Number::new(2).unwrap(),
            stay("2023-03-01", "2023-03-04").unwrap(),
            nightly,
        )
        .unwrap();

        assert_eq!(quote.total, nightly.checked_mul(3).unwrap());
        assert_eq!(quote.total.to_ether().unwrap().to_string(), "0.6");

        assert!(Quote::new(
            apartment::Number::new(1).unwrap(),
            stay("2023-03-01", "2023-03-03").unwrap(),
            Wei::from(U256::MAX),
        )
        .is_none());
    }
}
