//! GraphQL scalars represented as strings.

use std::{borrow::Cow, fmt, marker::PhantomData, str::FromStr};

use juniper::{
    GraphQLType, InputValue, ParseScalarResult, ParseScalarValue, ScalarToken,
    ScalarValue, Value,
};

/// Helper for `#[graphql(with = ..)]` attribute, representing the target type
/// as a string through the `As` type.
///
/// Addresses and hashes are rendered in their canonical hex form, and block
/// numbers as decimals, so no precision is lost on the client side.
#[derive(Debug)]
pub struct Via<As>(PhantomData<As>);

impl<As> Via<As> {
    /// Renders the target type with the [`Display`] impl of `As`.
    ///
    /// [`Display`]: fmt::Display
    pub fn to_output<T, S>(value: &T) -> Value<S>
    where
        As: fmt::Display,
        T: AsRef<As>,
        S: ScalarValue,
    {
        Value::from(value.as_ref().to_string())
    }

    /// Parses the target type with the [`FromStr`] impl of `As`.
    ///
    /// # Errors
    ///
    /// If the `input` is not a string, or doesn't parse as `As`, or `As`
    /// isn't convertible into the target type.
    pub fn from_input<T, S>(input: &InputValue<S>) -> Result<T, String>
    where
        As: FromStr,
        As::Err: fmt::Display,
        T: TryFrom<As> + GraphQLType<S, TypeInfo = ()>,
        T::Error: fmt::Display,
        S: ScalarValue,
    {
        let name = type_name::<T, S>();
        let s = input.as_string_value().ok_or_else(|| {
            format!("`{name}` expects a string, found: {input}")
        })?;
        let parsed = s
            .parse::<As>()
            .map_err(|e| format!("`{name}` cannot be parsed from \"{s}\": {e}"))?;
        T::try_from(parsed).map_err(|e| format!("`{name}` is invalid: {e}"))
    }

    /// Parses the provided [`ScalarToken`] as a [`String`].
    ///
    /// # Errors
    ///
    /// If the token is not a string literal.
    pub fn parse_token<S: ScalarValue>(
        value: ScalarToken<'_>,
    ) -> ParseScalarResult<S> {
        <String as ParseScalarValue<S>>::from_str(value)
    }
}

/// Returns the GraphQL name of the `T` scalar.
fn type_name<T, S>() -> Cow<'static, str>
where
    T: GraphQLType<S, TypeInfo = ()>,
    S: ScalarValue,
{
    T::name(&()).map_or(Cow::Borrowed("scalar"), |n| Cow::Owned(n.to_owned()))
}
