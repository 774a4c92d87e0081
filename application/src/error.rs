//! [`Error`]-related definitions.

use std::{convert::Infallible, fmt, num::TryFromIntError};

use common::{bytes32, datetime, ether};
use derive_more::Error as StdError;
use itertools::Itertools as _;
use juniper::IntoFieldError;
use service::{command, domain::reservation, gateway, infra::ledger};
use tracerr::{Trace, Traced};

/// Defines a new error type.
#[expect(clippy::module_name_repetitions, reason = "more readable")]
#[macro_export]
macro_rules! define_error {
    (
        enum $name:ident {
            $(
                #[code = $code:literal]
                #[status = $status_code:ident]
                #[message = $message:literal]
                $variant:ident
            ),* $(,)?
        }
    ) => {
        /// Error type.
        #[derive(
            Clone,
            Copy,
            Debug,
            ::derive_more::Display,
            ::derive_more::Error
        )]
        #[repr(u16)]
        pub enum $name {
            $(
                #[display($message)]
                #[doc = $message]
                $variant,
            )*
        }

        impl From<$name> for $crate::Error {
            fn from(err: $name) -> Self {
                match err {
                    $(
                        $name::$variant => Self {
                            code: $code,
                            status_code: ::http::StatusCode::$status_code,
                            message: $message.to_string(),
                            backtrace: None,
                        },
                    )*
                }
            }
        }
    };
}

/// GraphQL API [`Error`].
#[derive(Clone, Debug, StdError)]
pub struct Error {
    /// [`Error`] code.
    pub code: Code,

    /// [`http::StatusCode`] of this [`Error`].
    pub status_code: http::StatusCode,

    /// Backtrace of this [`Error`].
    #[error(not(backtrace))]
    pub backtrace: Option<Trace>,

    /// [`Error`] message.
    pub message: String,
}

impl Error {
    /// Create a new [`Error`] representing an internal server error.
    #[must_use]
    pub fn internal(msg: &impl ToString) -> Self {
        Self {
            code: "INTERNAL_SERVER_ERROR",
            status_code: http::StatusCode::INTERNAL_SERVER_ERROR,
            message: msg.to_string(),
            backtrace: None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self {
            code,
            status_code: _,
            backtrace,
            message,
        } = self;

        write!(
            f,
            "[{code}]: {message}{}",
            backtrace
                .iter()
                .format_with("\n", |trace, f| f(&format_args!("{trace}"))),
        )
    }
}

impl<S> IntoFieldError<S> for Error
where
    S: From<String>,
{
    fn into_field_error(self) -> juniper::FieldError<S> {
        let mut ext = juniper::Object::with_capacity(1);
        drop(
            ext.add_field("code", juniper::Value::scalar(self.code.to_owned())),
        );
        drop(
            ext.add_field(
                "backtrace",
                juniper::Value::list(
                    self.backtrace
                        .iter()
                        .flat_map(|trace| trace.iter())
                        .map(|frame| juniper::Value::scalar(frame.to_string()))
                        .collect(),
                ),
            ),
        );
        juniper::FieldError::new(self.message, juniper::Value::object(ext))
    }
}

/// [`Error`] code.
pub type Code = &'static str;

/// Helper trait for converting types into [`Error`]s.
pub trait AsError {
    /// Tries to convert the type into an [`Error`].
    ///
    /// [`None`] is returned if the type cannot be converted into an [`Error`].
    fn try_as_error(&self) -> Option<Error>;

    /// Converts the type into an [`Error`].
    fn as_error(&self) -> Error
    where
        Self: fmt::Display,
    {
        self.try_as_error()
            .unwrap_or_else(|| Error::internal(&self))
    }

    /// Converts the type into an [`Error`] by consuming it.
    fn into_error(self) -> Error
    where
        Self: fmt::Display + Sized,
    {
        self.as_error()
    }
}

impl<E: AsError> AsError for Traced<E> {
    fn try_as_error(&self) -> Option<Error> {
        let mut error = self.as_ref().try_as_error()?;
        error.backtrace = Some(self.trace().clone());
        Some(error)
    }
}

impl AsError for Infallible {
    fn try_as_error(&self) -> Option<Error> {
        match *self {}
    }
}

impl AsError for TryFromIntError {
    fn try_as_error(&self) -> Option<Error> {
        None
    }
}

impl AsError for ether::Error {
    fn try_as_error(&self) -> Option<Error> {
        Some(Error {
            code: "INVALID_AMOUNT",
            status_code: http::StatusCode::BAD_REQUEST,
            message: format!("Invalid amount: {self}"),
            backtrace: None,
        })
    }
}

impl AsError for bytes32::EncodeError {
    fn try_as_error(&self) -> Option<Error> {
        Some(Error {
            code: "TOO_LONG",
            status_code: http::StatusCode::BAD_REQUEST,
            message: format!("Invalid coordinate: {self}"),
            backtrace: None,
        })
    }
}

impl AsError for datetime::ParseError {
    fn try_as_error(&self) -> Option<Error> {
        Some(Error {
            code: "INVALID_DATE_RANGE",
            status_code: http::StatusCode::BAD_REQUEST,
            message: format!("Invalid date: {self}"),
            backtrace: None,
        })
    }
}

impl AsError for reservation::RangeError {
    fn try_as_error(&self) -> Option<Error> {
        Some(Error {
            code: "INVALID_DATE_RANGE",
            status_code: http::StatusCode::BAD_REQUEST,
            message: format!("Invalid date range: {self}"),
            backtrace: None,
        })
    }
}

impl AsError for ledger::Error {
    fn try_as_error(&self) -> Option<Error> {
        use http::StatusCode as S;

        let (code, status_code) = match self {
            Self::Unavailable(_) => ("NETWORK_UNAVAILABLE", S::BAD_GATEWAY),
            Self::NoExternalSigner => {
                ("EXTERNAL_SIGNER_UNAVAILABLE", S::SERVICE_UNAVAILABLE)
            }
            Self::UserRejected => ("USER_REJECTED", S::FORBIDDEN),
            Self::Rejected(_) => {
                ("SUBMISSION_REJECTED", S::UNPROCESSABLE_ENTITY)
            }
            Self::Reverted(_) => ("TRANSACTION_REVERTED", S::CONFLICT),
            Self::CallReverted(_) => ("CALL_REVERTED", S::BAD_GATEWAY),
            Self::Malformed(_) => return None,
        };
        Some(Error {
            code,
            status_code,
            message: self.to_string(),
            backtrace: None,
        })
    }
}

impl AsError for gateway::Error {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Ledger(e) => e.try_as_error(),
            Self::Abi(_) | Self::Coordinate(_) | Self::CounterOverflow => None,
        }
    }
}

impl AsError for command::refresh_catalog::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Gateway(e) => e.try_as_error(),
            Self::Amount(_) => None,
        }
    }
}

#[cfg(test)]
mod spec {
    use common::{bytes32, FixedText};
    use service::{gateway, infra::ledger};

    use super::AsError as _;

    #[test]
    fn maps_ledger_errors_to_codes() {
        for (err, code, status) in [
            (
                ledger::Error::Unavailable("connection refused".into()),
                "NETWORK_UNAVAILABLE",
                http::StatusCode::BAD_GATEWAY,
            ),
            (
                ledger::Error::NoExternalSigner,
                "EXTERNAL_SIGNER_UNAVAILABLE",
                http::StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                ledger::Error::UserRejected,
                "USER_REJECTED",
                http::StatusCode::FORBIDDEN,
            ),
            (
                ledger::Error::Rejected("insufficient funds".into()),
                "SUBMISSION_REJECTED",
                http::StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                ledger::Error::Reverted(Some("Not enough funds".into())),
                "TRANSACTION_REVERTED",
                http::StatusCode::CONFLICT,
            ),
            (
                ledger::Error::CallReverted(None),
                "CALL_REVERTED",
                http::StatusCode::BAD_GATEWAY,
            ),
        ] {
            let error = gateway::Error::Ledger(err.clone()).as_error();

            assert_eq!(error.code, code, "{err}");
            assert_eq!(error.status_code, status, "{err}");
            assert_eq!(error.message, err.to_string());
        }
    }

    #[test]
    fn keeps_revert_reason() {
        let error =
            ledger::Error::Reverted(Some("Not enough funds".into())).as_error();

        assert!(error.message.contains("Not enough funds"), "{error}");
    }

    #[test]
    fn hides_malformed_responses() {
        let error = ledger::Error::Malformed("garbage".into()).as_error();

        assert_eq!(error.code, "INTERNAL_SERVER_ERROR");
    }

    #[test]
    fn maps_input_errors_to_codes() {
        assert_eq!(
            "0.1.2".parse::<common::Ether>().unwrap_err().as_error().code,
            "INVALID_AMOUNT",
        );
        assert_eq!(
            FixedText::new("x".repeat(bytes32::MAX_LEN + 1))
                .unwrap_err()
                .as_error()
                .code,
            "TOO_LONG",
        );
    }
}
