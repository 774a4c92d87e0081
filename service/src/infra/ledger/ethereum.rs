//! [`Ethereum`] JSON-RPC [`Ledger`] implementation.

use std::time::Duration;

use alloy_network::{EthereumWallet, ReceiptResponse as _};
use alloy_primitives::{Address, Bytes, TxKind};
use alloy_provider::{Provider as _, ProviderBuilder};
use alloy_rpc_types::eth::{TransactionInput, TransactionRequest};
use alloy_transport::{RpcError, TransportError};
use common::{
    operations::{By, Call, Confirm, Request, Select, Submit},
    Wei,
};
use reqwest::Url;
use tokio::time;
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::wallet::Signer,
    infra::{
        ledger::{
            Accounts, Error, Pending, Receipt, Transaction, ViewCall,
        },
        Ledger,
    },
};

/// JSON-RPC error code of a request declined by the user, as defined in
/// [EIP-1193].
///
/// [EIP-1193]: https://eips.ethereum.org/EIPS/eip-1193#provider-errors
const USER_REJECTED_CODE: i64 = 4001;

/// [`Ledger`] talking to Ethereum nodes over JSON-RPC.
#[derive(Clone, Debug)]
pub struct Ethereum {
    /// Configuration of this [`Ethereum`] ledger.
    config: Config,
}

/// [`Ethereum`] configuration.
#[derive(Clone, Debug)]
pub struct Config {
    /// JSON-RPC endpoint serving reads and locally signed transactions.
    pub rpc_url: Url,

    /// JSON-RPC endpoint of an external signer, if any.
    pub external_signer_url: Option<Url>,

    /// Interval between polls of a submitted transaction receipt.
    pub confirmation_poll_interval: Duration,
}

impl Ethereum {
    /// Creates a new [`Ethereum`] ledger with the provided [`Config`].
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Returns the [`Url`] of the configured external signer.
    fn external_signer_url(&self) -> Result<Url, Traced<Error>> {
        self.config
            .external_signer_url
            .clone()
            .ok_or_else(|| tracerr::new!(Error::NoExternalSigner))
    }
}

impl Ledger<Call<ViewCall>> for Ethereum {
    type Ok = Bytes;
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Call(call): Call<ViewCall>,
    ) -> Result<Self::Ok, Self::Err> {
        let ViewCall { to, data } = call;

        let mut req =
            TransactionRequest::default().input(TransactionInput::from(data));
        req.to = Some(TxKind::Call(to));

        ProviderBuilder::new()
            .on_http(self.config.rpc_url.clone())
            .call(&req)
            .await
            .map_err(|e| Error::from(e).into_call_error())
            .map_err(tracerr::wrap!())
    }
}

impl Ledger<Submit<Transaction>> for Ethereum {
    type Ok = Pending;
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Submit(tx): Submit<Transaction>,
    ) -> Result<Self::Ok, Self::Err> {
        let Transaction {
            signer,
            to,
            data,
            value,
        } = tx;

        let mut req = TransactionRequest::default()
            .from(signer.address())
            .input(TransactionInput::from(data))
            .value(value.into());
        req.to = Some(TxKind::Call(to));

        let (tx_hash, external) = match signer {
            Signer::Local(key) => (
                ProviderBuilder::new()
                    .with_recommended_fillers()
                    .wallet(EthereumWallet::new(key))
                    .on_http(self.config.rpc_url.clone())
                    .send_transaction(req)
                    .await
                    .map(|p| *p.tx_hash())
                    .map_err(tracerr::from_and_wrap!())?,
                false,
            ),
            // External signer fills in and signs the transaction on its own.
            Signer::External(_) => (
                ProviderBuilder::new()
                    .on_http(self.external_signer_url()?)
                    .send_transaction(req)
                    .await
                    .map(|p| *p.tx_hash())
                    .map_err(tracerr::from_and_wrap!())?,
                true,
            ),
        };
        log::debug!("submitted transaction `{tx_hash}`");

        Ok(Pending { tx_hash, external })
    }
}

impl Ledger<Confirm<Pending>> for Ethereum {
    type Ok = Receipt;
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Confirm(pending): Confirm<Pending>,
    ) -> Result<Self::Ok, Self::Err> {
        let Pending { tx_hash, external } = pending;

        let url = if external {
            self.external_signer_url()?
        } else {
            self.config.rpc_url.clone()
        };
        let provider = ProviderBuilder::new().on_http(url);

        let receipt = loop {
            if let Some(r) = provider
                .get_transaction_receipt(tx_hash)
                .await
                .map_err(tracerr::from_and_wrap!())?
            {
                break r;
            }
            log::trace!("transaction `{tx_hash}` is not mined yet");
            time::sleep(self.config.confirmation_poll_interval).await;
        };

        if !receipt.status() {
            return Err(tracerr::new!(Error::Reverted(None)));
        }
        Ok(Receipt {
            tx_hash,
            block_number: receipt.block_number(),
        })
    }
}

impl Ledger<Select<By<Wei, Address>>> for Ethereum {
    type Ok = Wei;
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Wei, Address>>,
    ) -> Result<Self::Ok, Self::Err> {
        ProviderBuilder::new()
            .on_http(self.config.rpc_url.clone())
            .get_balance(by.into_inner())
            .await
            .map(Wei::from)
            .map_err(tracerr::from_and_wrap!())
    }
}

impl Ledger<Request<Accounts>> for Ethereum {
    type Ok = Vec<Address>;
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Request(Accounts): Request<Accounts>,
    ) -> Result<Self::Ok, Self::Err> {
        ProviderBuilder::new()
            .on_http(self.external_signer_url()?)
            .raw_request::<_, Vec<Address>>("eth_requestAccounts".into(), ())
            .await
            .map_err(tracerr::from_and_wrap!())
    }
}

impl From<TransportError> for Error {
    fn from(err: TransportError) -> Self {
        if let Some(payload) = err.as_error_resp() {
            if payload.code == USER_REJECTED_CODE {
                return Self::UserRejected;
            }
            let message = payload.message.to_string();
            return if message.contains("revert") {
                Self::reverted(&message)
            } else {
                Self::Rejected(message)
            };
        }

        if err.is_transport_error() {
            Self::Unavailable(err.to_string())
        } else if matches!(err, RpcError::LocalUsageError(_)) {
            Self::Rejected(err.to_string())
        } else {
            Self::Malformed(err.to_string())
        }
    }
}
