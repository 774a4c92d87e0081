//! [`Ether`] and [`Wei`] amounts.

use std::str::FromStr;

use alloy_primitives::U256;
use derive_more::{Display, Error as StdError, From, Into};
use rust_decimal::Decimal;

/// Number of fractional digits an [`Ether`] amount may have.
pub const DECIMALS: u32 = 18;

/// Amount in the base denomination the contract operates with.
///
/// `1` ether is `10^18` wei.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Display,
    Eq,
    From,
    Hash,
    Into,
    Ord,
    PartialEq,
    PartialOrd,
)]
pub struct Wei(U256);

impl Wei {
    /// Zero [`Wei`].
    pub const ZERO: Self = Self(U256::ZERO);

    /// Indicates whether this amount is zero.
    #[must_use]
    pub fn is_zero(self) -> bool {
        self.0.is_zero()
    }

    /// Multiplies this amount by the provided `factor`.
    ///
    /// [`None`] is returned on overflow.
    #[must_use]
    pub fn checked_mul(self, factor: u64) -> Option<Self> {
        self.0.checked_mul(U256::from(factor)).map(Self)
    }

    /// Converts this amount into displayable [`Ether`].
    ///
    /// # Errors
    ///
    /// Errors with [`Error::Overflow`] if the amount doesn't fit into the
    /// [`Decimal`] representation of [`Ether`].
    pub fn to_ether(self) -> Result<Ether, Error> {
        let mantissa = u128::try_from(self.0)
            .ok()
            .and_then(|m| i128::try_from(m).ok())
            .ok_or(Error::Overflow)?;
        Decimal::try_from_i128_with_scale(mantissa, DECIMALS)
            .map(|d| Ether(d.normalize()))
            .map_err(|_| Error::Overflow)
    }
}

/// Human-readable decimal amount of ether.
///
/// Always non-negative and having at most [`DECIMALS`] fractional digits, so
/// it's exactly representable in [`Wei`].
#[derive(Clone, Copy, Debug, Display, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Ether(Decimal);

impl Ether {
    /// Zero [`Ether`].
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Creates a new [`Ether`] amount, checking it to be non-negative and
    /// representable in [`Wei`].
    ///
    /// # Errors
    ///
    /// - [`Error::Negative`] if the amount is below zero;
    /// - [`Error::TooPrecise`] if the amount has more than [`DECIMALS`]
    ///   fractional digits.
    pub fn new(amount: Decimal) -> Result<Self, Error> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(Error::Negative);
        }
        let amount = amount.normalize();
        if amount.scale() > DECIMALS {
            return Err(Error::TooPrecise);
        }
        Ok(Self(amount))
    }

    /// Indicates whether this amount is greater than zero.
    #[must_use]
    pub fn is_positive(self) -> bool {
        !self.0.is_zero()
    }

    /// Returns the underlying [`Decimal`] value.
    #[must_use]
    pub const fn amount(self) -> Decimal {
        self.0
    }

    /// Converts this amount into [`Wei`].
    #[must_use]
    pub fn to_wei(self) -> Wei {
        // Non-negativity and scale are checked on construction.
        let mantissa = self.0.mantissa().unsigned_abs();
        let exp = U256::from(DECIMALS - self.0.scale());
        Wei(U256::from(mantissa) * U256::from(10_u8).pow(exp))
    }
}

impl FromStr for Ether {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let amount = Decimal::from_str_exact(s.trim())
            .map_err(|_| Error::NotNumeric)?;
        Self::new(amount)
    }
}

impl From<Ether> for Wei {
    fn from(ether: Ether) -> Self {
        ether.to_wei()
    }
}

/// Error of converting an amount between [`Ether`] and [`Wei`].
#[derive(Clone, Copy, Debug, Display, Eq, PartialEq, StdError)]
pub enum Error {
    /// Input is not a decimal number.
    #[display("amount is not a decimal number")]
    NotNumeric,

    /// Amount is negative.
    #[display("amount cannot be negative")]
    Negative,

    /// Amount has more fractional digits than the base denomination allows.
    #[display("amount cannot have more than 18 fractional digits")]
    TooPrecise,

    /// Amount is too large to be represented.
    #[display("amount is too large")]
    Overflow,
}

#[cfg(feature = "juniper")]
mod juniper {
    //! Module providing integration with [`juniper`] crate.

    use std::str::FromStr as _;

    use juniper::{graphql_scalar, InputValue, ScalarValue, Value};

    /// Decimal amount of ether, e.g. `0.25`.
    #[graphql_scalar(with = Self, parse_token(String))]
    type Ether = super::Ether;

    impl Ether {
        fn to_output<S: ScalarValue>(e: &Ether) -> Value<S> {
            Value::scalar(e.to_string())
        }

        fn from_input<S: ScalarValue>(
            input: &InputValue<S>,
        ) -> Result<Self, String> {
            input
                .as_string_value()
                .ok_or_else(|| {
                    format!(
                        "Cannot parse `Ether` input scalar from \
                         non-string value: {input}",
                    )
                })
                .and_then(|s| {
                    Self::from_str(s).map_err(|e| {
                        format!("Cannot parse `Ether` input scalar: {e}")
                    })
                })
        }
    }
}

#[cfg(test)]
mod spec {
    use std::str::FromStr as _;

    use alloy_primitives::U256;

    use super::{Error, Ether, Wei};

    fn ether(s: &str) -> Ether {
        s.parse().unwrap()
    }

    fn wei(n: u128) -> Wei {
        Wei::from(U256::from(n))
    }

    #[test]
    fn from_str() {
        assert_eq!(ether("0.1").to_string(), "0.1");
        assert_eq!(ether("1.500").to_string(), "1.5");
        assert_eq!(ether("42").to_string(), "42");
        assert_eq!(ether(" 2 ").to_string(), "2");
        assert_eq!(ether("0").to_string(), "0");
        assert_eq!(ether("-0").to_string(), "0");

        assert_eq!(Ether::from_str("abc"), Err(Error::NotNumeric));
        assert_eq!(Ether::from_str(""), Err(Error::NotNumeric));
        assert_eq!(Ether::from_str("-0.1"), Err(Error::Negative));
        assert_eq!(
            Ether::from_str("0.0000000000000000001"),
            Err(Error::TooPrecise),
        );
        assert!(Ether::from_str("0.000000000000000001").is_ok());
        assert!(Ether::from_str("0.1000000000000000000").is_ok());
    }

    #[test]
    fn to_wei() {
        assert_eq!(ether("1").to_wei(), wei(1_000_000_000_000_000_000));
        assert_eq!(ether("0.1").to_wei(), wei(100_000_000_000_000_000));
        assert_eq!(ether("0.2").to_wei(), wei(200_000_000_000_000_000));
        assert_eq!(ether("0.000000000000000001").to_wei(), wei(1));
        assert_eq!(ether("0").to_wei(), Wei::ZERO);
        assert_eq!(
            ether("123.456").to_wei(),
            wei(123_456_000_000_000_000_000),
        );
    }

    #[test]
    fn to_ether() {
        assert_eq!(wei(100_000_000_000_000_000).to_ether(), Ok(ether("0.1")));
        assert_eq!(wei(1).to_ether(), Ok(ether("0.000000000000000001")));
        assert_eq!(Wei::ZERO.to_ether(), Ok(Ether::ZERO));
        assert_eq!(
            wei(5_000_000_000_000_000_000).to_ether().unwrap().to_string(),
            "5",
        );
        assert_eq!(Wei::from(U256::MAX).to_ether(), Err(Error::Overflow));
    }

    #[test]
    fn round_trips_exact_amounts() {
        for s in [
            "0",
            "0.1",
            "0.2",
            "1",
            "3.14159",
            "0.000000000000000001",
            "1000000.123456789012345678",
        ] {
            let amount = ether(s);
            assert_eq!(amount.to_wei().to_ether(), Ok(amount), "{s}");
        }
    }

    #[test]
    fn multiplies_wei() {
        assert_eq!(
            ether("0.2").to_wei().checked_mul(3),
            Some(wei(600_000_000_000_000_000)),
        );
        assert_eq!(Wei::from(U256::MAX).checked_mul(2), None);
        assert!(wei(7).checked_mul(0).unwrap().is_zero());
    }
}
