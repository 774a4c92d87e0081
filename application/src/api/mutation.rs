//! GraphQL [`Mutation`]s definitions.

use common::{Ether, FixedText};
use juniper::graphql_object;
use service::{command, Command as _};

use crate::{api, define_error, AsError, Context, Error};

/// Root of all GraphQL mutations.
#[derive(Clone, Copy, Debug)]
pub struct Mutation;

impl Mutation {
    /// Name of the [`tracing::Span`] for the mutations.
    const SPAN_NAME: &'static str = "GraphQL mutation";
}

#[graphql_object(context = Context)]
impl Mutation {
    /// Establishes a new `Session` of a randomly generated wallet, replacing
    /// the live one.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `SESSION_BUSY` - live `Session` has a transaction in flight.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "createWallet",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn create_wallet(
        ctx: &Context,
    ) -> Result<api::session::EstablishResult, Error> {
        ctx.ensure_session_replaceable().await?;

        let output = ctx
            .service()
            .execute(command::CreateWallet)
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?;
        ctx.set_current_session(output.value.clone()).await?;

        Ok(output.into())
    }

    /// Establishes a new `Session` of the wallet with the provided
    /// hex-encoded private key, replacing the live one.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `EMPTY_SECRET_KEY` - provided secret key is empty, the live
    ///                        `Session` is left untouched;
    /// - `INVALID_SECRET_KEY` - provided secret key is not a private key;
    /// - `SESSION_BUSY` - live `Session` has a transaction in flight.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "importWallet",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn import_wallet(
        secret_key: String,
        ctx: &Context,
    ) -> Result<api::session::EstablishResult, Error> {
        ctx.ensure_session_replaceable().await?;

        let output = ctx
            .service()
            .execute(command::ImportWallet {
                secret_key: secret_key.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?;
        ctx.set_current_session(output.value.clone()).await?;

        Ok(output.into())
    }

    /// Establishes a new `Session` of the first account exposed by the
    /// configured external signer, replacing the live one.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `EXTERNAL_SIGNER_UNAVAILABLE` - external signer is not configured,
    ///                                   unreachable or exposes no accounts;
    /// - `USER_REJECTED` - account access is declined by the user;
    /// - `SESSION_BUSY` - live `Session` has a transaction in flight.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "connectWallet",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn connect_wallet(
        ctx: &Context,
    ) -> Result<api::session::EstablishResult, Error> {
        ctx.ensure_session_replaceable().await?;

        let output = ctx
            .service()
            .execute(command::ConnectWallet)
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?;
        ctx.set_current_session(output.value.clone()).await?;

        Ok(output.into())
    }

    /// Re-reads the whole `Catalog` of the live `Session` from the ledger.
    ///
    /// The cached `Catalog` is replaced only if all the reads succeed.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `NO_SESSION` - no `Session` is established;
    /// - `CALL_REVERTED` - contract reverted one of the reads;
    /// - `NETWORK_UNAVAILABLE` - ledger endpoint cannot be reached.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "refreshCatalog",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn refresh_catalog(
        ctx: &Context,
    ) -> Result<api::Catalog, Error> {
        let session = ctx.current_session().await?;

        ctx.service()
            .execute(command::RefreshCatalog { session })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Lists a new apartment owned by the live `Session` wallet.
    ///
    /// Returns once the transaction is confirmed.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `NO_SESSION` - no `Session` is established;
    /// - `TOO_LONG` - a coordinate doesn't fit into 31 bytes;
    /// - `INVALID_AMOUNT` - price is not a non-negative decimal with at most
    ///                      18 fractional digits;
    /// - `SUBMISSION_REJECTED` - transaction is not accepted by the ledger;
    /// - `USER_REJECTED` - transaction is declined by the external signer;
    /// - `TRANSACTION_REVERTED` - transaction is reverted;
    /// - `NETWORK_UNAVAILABLE` - ledger endpoint cannot be reached.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "listApartment",
            latitude = %latitude,
            longitude = %longitude,
            otel.name = Self::SPAN_NAME,
            price_per_night = %price_per_night,
        ),
    )]
    pub async fn list_apartment(
        longitude: String,
        latitude: String,
        price_per_night: String,
        ctx: &Context,
    ) -> Result<api::transaction::Confirmed, Error> {
        let longitude = FixedText::new(longitude)
            .map_err(AsError::into_error)
            .map_err(ctx.error())?;
        let latitude = FixedText::new(latitude)
            .map_err(AsError::into_error)
            .map_err(ctx.error())?;
        let price_per_night = price_per_night
            .parse::<Ether>()
            .map_err(AsError::into_error)
            .map_err(ctx.error())?;
        let session = ctx.current_session().await?;

        ctx.service()
            .execute(command::ListApartment {
                session,
                longitude,
                latitude,
                price_per_night,
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Reserves the apartment with the provided ID between the provided
    /// dates, paying the current nightly price for each night.
    ///
    /// Dates are accepted either in `YYYY-MM-DD` format (meaning the
    /// midnight in UTC) or in RFC 3339 format. Returns once the transaction
    /// is confirmed.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `NO_SESSION` - no `Session` is established;
    /// - `INVALID_DATE_RANGE` - dates are malformed, or the check-out is not
    ///                          a whole number of nights after the check-in;
    /// - `APARTMENT_NOT_FOUND` - apartment is not in the cached catalog;
    /// - `SUBMISSION_REJECTED` - transaction is not accepted by the ledger;
    /// - `USER_REJECTED` - transaction is declined by the external signer;
    /// - `TRANSACTION_REVERTED` - transaction is reverted;
    /// - `NETWORK_UNAVAILABLE` - ledger endpoint cannot be reached.
    #[tracing::instrument(
        skip_all,
        fields(
            apartment_id = %apartment_id,
            check_in = %check_in,
            check_out = %check_out,
            gql.name = "makeReservation",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn make_reservation(
        apartment_id: i32,
        check_in: String,
        check_out: String,
        ctx: &Context,
    ) -> Result<api::transaction::Confirmed, Error> {
        let stay = api::reservation::stay(&check_in, &check_out)
            .map_err(ctx.error())?;
        let apartment =
            api::apartment::number(apartment_id).map_err(ctx.error())?;
        let session = ctx.current_session().await?;

        ctx.service()
            .execute(command::MakeReservation {
                session,
                apartment,
                stay,
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Withdraws the provided amount of rental income to the live `Session`
    /// wallet.
    ///
    /// Returns once the transaction is confirmed.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `NO_SESSION` - no `Session` is established;
    /// - `INVALID_AMOUNT` - amount is not a non-negative decimal with at most
    ///                      18 fractional digits;
    /// - `SUBMISSION_REJECTED` - transaction is not accepted by the ledger;
    /// - `USER_REJECTED` - transaction is declined by the external signer;
    /// - `TRANSACTION_REVERTED` - transaction is reverted, e.g. when
    ///                            withdrawing more than accrued;
    /// - `NETWORK_UNAVAILABLE` - ledger endpoint cannot be reached.
    #[tracing::instrument(
        skip_all,
        fields(
            amount = %amount,
            gql.name = "withdrawMoney",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn withdraw_money(
        amount: String,
        ctx: &Context,
    ) -> Result<api::transaction::Confirmed, Error> {
        let amount = amount
            .parse::<Ether>()
            .map_err(AsError::into_error)
            .map_err(ctx.error())?;
        let session = ctx.current_session().await?;

        ctx.service()
            .execute(command::WithdrawMoney { session, amount })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }
}

impl AsError for command::import_wallet::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "EMPTY_SECRET_KEY"]
                #[status = BAD_REQUEST]
                #[message = "Secret key is empty"]
                EmptySecretKey,

                #[code = "INVALID_SECRET_KEY"]
                #[status = BAD_REQUEST]
                #[message = "Secret key is not a valid hex-encoded private \
                             key"]
                InvalidSecretKey,
            }
        }

        Some(match self {
            Self::EmptySecretKey => Error::EmptySecretKey.into(),
            Self::InvalidSecretKey => Error::InvalidSecretKey.into(),
        })
    }
}

impl AsError for command::connect_wallet::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::SignerUnavailable(_) => Some(Error {
                code: "EXTERNAL_SIGNER_UNAVAILABLE",
                status_code: http::StatusCode::SERVICE_UNAVAILABLE,
                message: self.to_string(),
                backtrace: None,
            }),
            Self::UserRejected => Some(Error {
                code: "USER_REJECTED",
                status_code: http::StatusCode::FORBIDDEN,
                message: self.to_string(),
                backtrace: None,
            }),
            Self::Ledger(e) => e.try_as_error(),
        }
    }
}

impl AsError for command::list_apartment::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Gateway(e) => e.try_as_error(),
        }
    }
}

impl AsError for command::make_reservation::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Pricing(e) => e.try_as_error(),
            Self::Gateway(e) => e.try_as_error(),
        }
    }
}

impl AsError for command::withdraw_money::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Gateway(e) => e.try_as_error(),
        }
    }
}

#[cfg(test)]
mod spec {
    use std::{sync::Arc, time::Duration};

    use service::{
        command::{connect_wallet, import_wallet},
        domain::{session, Session, Wallet},
        infra::{ledger::ethereum, Ethereum},
    };

    use crate::{AsError as _, Context, Service};

    use super::Mutation;

    /// Creates a [`Context`] over a ledger which is never reached by the
    /// tested flows, with the provided live [`Session`].
    async fn context_with(live: Session) -> (Context, Arc<session::Slot>) {
        let ledger = Ethereum::new(ethereum::Config {
            rpc_url: "http://127.0.0.1:9".parse().unwrap(),
            external_signer_url: None,
            confirmation_poll_interval: Duration::from_millis(10),
        });
        let slot = Arc::new(session::Slot::default());
        assert!(slot.replace(live).await.unwrap().is_none());

        (Context::new(Service::new(ledger), Arc::clone(&slot)), slot)
    }

    #[tokio::test]
    async fn empty_secret_key_keeps_live_session() {
        let live = Session::new(Wallet::generate());
        let (id, address) = (live.id, live.wallet.address());
        let (ctx, slot) = context_with(live).await;

        for key in ["", "  "] {
            let err = Mutation::import_wallet(key.to_owned(), &ctx)
                .await
                .unwrap_err();

            assert_eq!(err.code, "EMPTY_SECRET_KEY");
            let current = slot.current().await.unwrap();
            assert_eq!(current.id, id);
            assert_eq!(current.wallet.address(), address);
        }
        assert_eq!(ctx.error_status_code(), http::StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn busy_session_is_not_replaced() {
        let live = Session::new(Wallet::generate());
        let id = live.id;
        let _guard = live.lock_writes().await;
        let (ctx, slot) = context_with(live).await;

        let err = Mutation::create_wallet(&ctx).await.unwrap_err();

        assert_eq!(err.code, "SESSION_BUSY");
        assert_eq!(slot.current().await.unwrap().id, id);
    }

    #[test]
    fn maps_wallet_errors_to_codes() {
        assert_eq!(
            import_wallet::ExecutionError::EmptySecretKey.as_error().code,
            "EMPTY_SECRET_KEY",
        );
        assert_eq!(
            import_wallet::ExecutionError::InvalidSecretKey.as_error().code,
            "INVALID_SECRET_KEY",
        );

        let err = connect_wallet::ExecutionError::SignerUnavailable(
            "connection refused".into(),
        )
        .as_error();
        assert_eq!(err.code, "EXTERNAL_SIGNER_UNAVAILABLE");
        assert!(err.message.contains("connection refused"));

        assert_eq!(
            connect_wallet::ExecutionError::UserRejected.as_error().code,
            "USER_REJECTED",
        );
    }
}
