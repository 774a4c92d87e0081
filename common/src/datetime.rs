//! Date and time utilities.

use std::{cmp::Ordering, marker::PhantomData, time::Duration};

use derive_more::{Debug, Display, Error};
use time::{
    format_description::well_known::Rfc3339, macros::format_description,
    UtcOffset,
};

/// Untyped date and time.
pub type DateTime = DateTimeOf;

/// Date and time, normalized to UTC.
///
/// The calendar date is kept as it was provided, in its original offset.
#[derive(Debug)]
pub struct DateTimeOf<Of: ?Sized = ()> {
    /// Inner representation of the date and time, in UTC.
    inner: time::OffsetDateTime,

    /// Calendar date in the offset this [`DateTime`] was provided with.
    date: time::Date,

    /// Type parameter describing the kind of date and time.
    #[debug(skip)]
    _of: PhantomData<Of>,
}

impl<Of: ?Sized> DateTimeOf<Of> {
    /// Creates a new [`DateTime`] representing the current date and time.
    #[expect(clippy::missing_panics_doc, reason = "infallible")]
    #[must_use]
    pub fn now() -> Self {
        let inner = time::OffsetDateTime::now_utc();
        Self {
            _of: PhantomData,
            date: inner.date(),
            inner: inner
                .replace_microsecond(inner.microsecond())
                .expect("infallible"),
        }
    }

    /// Creates a new [`DateTime`] from the provided [RFC 3339] string.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not a valid [RFC 3339] date and time.
    ///
    /// [RFC 3339]: https://tools.ietf.org/html/rfc3339
    pub fn from_rfc3339(input: &str) -> Result<Self, ParseError> {
        use ParseError as E;

        time::OffsetDateTime::parse(input, &Rfc3339)
            .map_err(E::Parse)?
            .try_into()
            .map_err(E::ComponentRange)
    }

    /// Creates a new [`DateTime`] pointing to the midnight (UTC) of the
    /// provided `YYYY-MM-DD` calendar date.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not a valid calendar date.
    pub fn from_calendar_date(input: &str) -> Result<Self, ParseError> {
        let date = time::Date::parse(
            input,
            format_description!("[year]-[month]-[day]"),
        )
        .map_err(ParseError::Parse)?;
        Ok(Self {
            inner: date.midnight().assume_utc(),
            date,
            _of: PhantomData,
        })
    }

    /// Parses a [`DateTime`] either from a `YYYY-MM-DD` calendar date or from
    /// an [RFC 3339] date and time.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is neither of the supported formats.
    ///
    /// [RFC 3339]: https://tools.ietf.org/html/rfc3339
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        let input = input.trim();
        Self::from_calendar_date(input).or_else(|_| Self::from_rfc3339(input))
    }

    /// Returns the [`DateTime`] as an [RFC 3339] string.
    ///
    /// [RFC 3339]: https://tools.ietf.org/html/rfc3339
    #[expect(clippy::missing_panics_doc, reason = "infallible")]
    #[must_use]
    pub fn to_rfc3339(&self) -> String {
        self.inner.format(&Rfc3339).unwrap_or_else(|e| {
            panic!("cannot format `DateTime` as RFC 3339: {e}")
        })
    }

    /// Returns the [`CalendarDate`] of this [`DateTime`], as seen in the
    /// offset it was provided with.
    #[must_use]
    pub fn calendar_date(&self) -> CalendarDate {
        CalendarDate {
            day: self.date.day(),
            month: u8::from(self.date.month()),
            year: self.date.year(),
        }
    }

    /// Returns the [`Duration`] elapsed from the `earlier` [`DateTime`] to
    /// this one.
    ///
    /// [`None`] is returned if the `earlier` one is actually later.
    #[must_use]
    pub fn checked_duration_since(&self, earlier: &Self) -> Option<Duration> {
        (self.inner - earlier.inner).try_into().ok()
    }

    /// Coerces one kind of [`DateTime`] into another.
    #[must_use]
    pub fn coerce<NewOf: ?Sized>(self) -> DateTimeOf<NewOf> {
        DateTimeOf {
            inner: self.inner,
            date: self.date,
            _of: PhantomData,
        }
    }
}

/// Day, month and year of a date.
#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
#[display("{year:04}-{month:02}-{day:02}")]
pub struct CalendarDate {
    /// Day of the month, starting from `1`.
    pub day: u8,

    /// Month of the year, starting from `1`.
    pub month: u8,

    /// Year.
    pub year: i32,
}

/// Error of parsing [`DateTime`] from a string.
#[derive(Clone, Copy, Debug, Display, Error)]
pub enum ParseError {
    /// Failed to parse the string into an [`DateTime`].
    Parse(time::error::Parse),

    /// Parsed [`DateTime`] has an out of range component.
    ComponentRange(time::error::ComponentRange),
}

impl<Of: ?Sized> Copy for DateTimeOf<Of> {}
impl<Of: ?Sized> Clone for DateTimeOf<Of> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<Of: ?Sized> Eq for DateTimeOf<Of> {}
impl<Of: ?Sized> PartialEq for DateTimeOf<Of> {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl<Of: ?Sized> Ord for DateTimeOf<Of> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.inner.cmp(&other.inner)
    }
}
impl<Of: ?Sized> PartialOrd for DateTimeOf<Of> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<Of: ?Sized> TryFrom<time::OffsetDateTime> for DateTimeOf<Of> {
    type Error = time::error::ComponentRange;

    fn try_from(dt: time::OffsetDateTime) -> Result<Self, Self::Error> {
        dt.to_offset(UtcOffset::UTC)
            .replace_microsecond(dt.microsecond())
            .map(|inner| Self {
                inner,
                date: dt.date(),
                _of: PhantomData,
            })
    }
}

#[cfg(feature = "juniper")]
mod juniper {
    //! Module providing integration with [`juniper`] crate.

    use juniper::{graphql_scalar, InputValue, ScalarValue, Value};

    /// Date and time in a [RFC 3339] format with a microsecond precision.
    ///
    /// A plain `YYYY-MM-DD` date is accepted as an input too, meaning the
    /// midnight (UTC) of that date.
    ///
    /// [RFC 3339]: https://tools.ietf.org/html/rfc3339
    #[graphql_scalar(with = Self, parse_token(String))]
    type DateTime = crate::DateTime;

    impl DateTime {
        fn to_output<S: ScalarValue>(dt: &DateTime) -> Value<S> {
            Value::scalar(dt.to_rfc3339())
        }

        fn from_input<S: ScalarValue>(
            input: &InputValue<S>,
        ) -> Result<Self, String> {
            input
                .as_string_value()
                .ok_or_else(|| {
                    format!(
                        "Cannot parse `DateTime` input scalar from \
                         non-string value: {input}",
                    )
                })
                .and_then(|s| {
                    Self::parse(s).map_err(|e| {
                        format!("Cannot parse `DateTime` input scalar: {e}")
                    })
                })
        }
    }
}

#[cfg(test)]
mod spec {
    use std::time::Duration;

    use super::{CalendarDate, DateTime};

    const DAY: Duration = Duration::from_secs(24 * 60 * 60);

    #[test]
    fn parses_calendar_dates() {
        let dt = DateTime::parse("2023-02-28").unwrap();

        assert_eq!(dt.to_rfc3339(), "2023-02-28T00:00:00Z");
        assert_eq!(
            dt.calendar_date(),
            CalendarDate {
                day: 28,
                month: 2,
                year: 2023,
            },
        );
        assert_eq!(dt.calendar_date().to_string(), "2023-02-28");

        assert!(DateTime::parse("2023-02-30").is_err());
        assert!(DateTime::parse("28.02.2023").is_err());
        assert!(DateTime::parse("").is_err());
    }

    #[test]
    fn parses_rfc3339() {
        let dt = DateTime::parse("2023-03-01T12:30:00+03:00").unwrap();

        assert_eq!(dt.to_rfc3339(), "2023-03-01T09:30:00Z");
        assert_eq!(dt.calendar_date().day, 1);
    }

    #[test]
    fn keeps_calendar_date_of_provided_offset() {
        let east = DateTime::parse("2023-03-01T00:30:00+03:00").unwrap();
        let west = DateTime::parse("2023-02-28T23:30:00-05:00").unwrap();

        assert_eq!(east.to_rfc3339(), "2023-02-28T21:30:00Z");
        assert_eq!(east.calendar_date().to_string(), "2023-03-01");
        assert_eq!(west.to_rfc3339(), "2023-03-01T04:30:00Z");
        assert_eq!(west.calendar_date().to_string(), "2023-02-28");

        assert_eq!(east.coerce::<()>().calendar_date(), east.calendar_date());
    }

    #[test]
    fn measures_durations() {
        let check_in = DateTime::parse("2023-02-27").unwrap();
        let check_out = DateTime::parse("2023-03-02").unwrap();

        assert_eq!(check_out.checked_duration_since(&check_in), Some(DAY * 3));
        assert_eq!(
            check_in.checked_duration_since(&check_in),
            Some(Duration::ZERO),
        );
        assert_eq!(check_in.checked_duration_since(&check_out), None);

        let noon = DateTime::parse("2023-03-02T12:00:00Z").unwrap();
        assert_eq!(
            noon.checked_duration_since(&check_in),
            Some(DAY * 3 + DAY / 2),
        );
    }
}
