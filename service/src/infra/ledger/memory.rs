//! In-memory [`Ledger`] emulating the rental contract.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use alloy_primitives::{keccak256, Address, Bytes, B256, U256};
use alloy_sol_types::{SolCall as _, SolInterface as _};
use common::{
    operations::{By, Call, Confirm, Request, Select, Submit},
    DateTime, Wei,
};
use tracerr::Traced;

use crate::{
    domain::{reservation::Stay, wallet::Signer},
    gateway::{abi::Welcomy, CONTRACT_ADDRESS},
    infra::{
        ledger::{
            Accounts, Error, Pending, Receipt, Transaction, ViewCall,
        },
        Ledger,
    },
};

/// [`Ledger`] keeping the state of the rental contract in memory.
///
/// Clones share the same state.
#[derive(Clone, Debug, Default)]
pub struct Memory(Arc<Mutex<State>>);

/// External signer emulated by a [`Memory`] ledger.
#[derive(Clone, Debug, Default)]
pub enum ExternalSigner {
    /// No external signer is configured.
    #[default]
    Absent,

    /// External signer exposing the provided accounts.
    Accounts(Vec<Address>),

    /// External signer whose user declines every request.
    Rejecting,
}

/// State of a [`Memory`] ledger.
#[derive(Debug, Default)]
struct State {
    /// Listed apartments, in the catalog order.
    apartments: Vec<Listing>,

    /// Rental income not withdrawn yet, by owners.
    unclaimed: HashMap<Address, U256>,

    /// Native account balances.
    balances: HashMap<Address, U256>,

    /// Emulated [`ExternalSigner`].
    external_signer: ExternalSigner,

    /// Submitted transactions awaiting confirmation.
    pending: HashMap<B256, Outcome>,

    /// Number of submitted transactions.
    nonce: u64,

    /// Number of performed read-only calls.
    view_calls: usize,

    /// Indicator whether the ledger endpoint is unreachable.
    unavailable: bool,

    /// Indicator whether the next submitted transaction fails when mined.
    fail_next_transaction: bool,

    /// Indicator whether the ledger endpoint becomes unreachable right after
    /// the next transaction is confirmed.
    disconnect_after_confirm: bool,
}

/// Apartment listed in a [`Memory`] ledger.
#[derive(Clone, Copy, Debug)]
struct Listing {
    /// Owner of the apartment.
    owner: Address,

    /// Encoded longitude.
    longitude: B256,

    /// Encoded latitude.
    latitude: B256,

    /// Price of a night in wei.
    price_per_night: U256,
}

/// Outcome of mining a submitted transaction.
#[derive(Clone, Copy, Debug)]
enum Outcome {
    /// Transaction is mined in the block with the provided number.
    Mined(u64),

    /// Transaction is mined with a failed status.
    Failed,
}

impl Memory {
    /// Credits the provided `amount` to the native balance of the provided
    /// `account`.
    pub fn fund(&self, account: Address, amount: Wei) {
        let amount: U256 = amount.into();
        *self.state().balances.entry(account).or_default() += amount;
    }

    /// Replaces the emulated [`ExternalSigner`].
    pub fn set_external_signer(&self, signer: ExternalSigner) {
        self.state().external_signer = signer;
    }

    /// Makes the ledger endpoint (un)reachable.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.state().unavailable = unavailable;
    }

    /// Makes the next submitted transaction fail once mined, without
    /// affecting the state.
    pub fn fail_next_transaction(&self) {
        self.state().fail_next_transaction = true;
    }

    /// Makes the ledger endpoint unreachable right after the next
    /// transaction is confirmed as mined.
    pub fn disconnect_after_next_confirm(&self) {
        self.state().disconnect_after_confirm = true;
    }

    /// Returns the number of read-only calls performed so far.
    #[must_use]
    pub fn view_calls(&self) -> usize {
        self.state().view_calls
    }

    /// Locks the [`State`] of this [`Memory`] ledger.
    fn state(&self) -> MutexGuard<'_, State> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Locks the [`State`] of this [`Memory`] ledger, checking it to be
    /// reachable.
    fn reachable_state(&self) -> Result<MutexGuard<'_, State>, Error> {
        let state = self.state();
        if state.unavailable {
            return Err(Error::Unavailable("connection refused".into()));
        }
        Ok(state)
    }
}

impl State {
    /// Returns the [`Listing`] at the provided `index`, reverting if there is
    /// none.
    fn listing(&self, index: U256) -> Result<Listing, Error> {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.apartments.get(i))
            .copied()
            .ok_or_else(|| revert("Apartment does not exist"))
    }

    /// Performs a read-only call with the provided ABI-encoded `data`.
    fn view(&mut self, data: &[u8]) -> Result<Vec<u8>, Error> {
        use Welcomy::WelcomyCalls as C;

        self.view_calls += 1;
        Ok(match decode(data)? {
            C::getNumberOfApartments(_) => {
                Welcomy::getNumberOfApartmentsCall::abi_encode_returns(&(
                    U256::from(self.apartments.len()),
                ))
            }
            C::getCoordinates(c) => {
                let l = self.listing(c.index)?;
                Welcomy::getCoordinatesCall::abi_encode_returns(&(
                    l.longitude,
                    l.latitude,
                ))
            }
            C::apartments(c) => {
                let l = self.listing(c.index)?;
                Welcomy::apartmentsCall::abi_encode_returns(&(
                    l.price_per_night,
                ))
            }
            C::unclaimedEth(c) => Welcomy::unclaimedEthCall::abi_encode_returns(
                &(self.unclaimed.get(&c.owner).copied().unwrap_or_default(),),
            ),
            C::listApartment(_)
            | C::makeReservation(_)
            | C::withdrawMoney(_) => {
                return Err(Error::Malformed(
                    "state-changing function cannot be called read-only"
                        .into(),
                ));
            }
        })
    }

    /// Executes a transaction of the provided `from` account with the
    /// provided ABI-encoded `data`, paying the provided `value`.
    fn transact(
        &mut self,
        from: Address,
        data: &[u8],
        value: U256,
    ) -> Result<(), Error> {
        use Welcomy::WelcomyCalls as C;

        let balance = self.balances.get(&from).copied().unwrap_or_default();
        if balance < value {
            return Err(Error::Rejected(
                "insufficient funds for gas * price + value".into(),
            ));
        }

        match decode(data)? {
            C::listApartment(c) => {
                if !value.is_zero() {
                    return Err(revert("Function is not payable"));
                }
                self.apartments.push(Listing {
                    owner: from,
                    longitude: c.longitude,
                    latitude: c.latitude,
                    price_per_night: c.pricePerNight,
                });
            }
            C::makeReservation(c) => {
                let listing = self.listing(c.apartmentId)?;
                let nights = nights(
                    [c.dayStart, c.monthStart, c.yearStart],
                    [c.dayEnd, c.monthEnd, c.yearEnd],
                )
                .ok_or_else(|| revert("Invalid reservation dates"))?;
                if listing.price_per_night.checked_mul(U256::from(nights))
                    != Some(value)
                {
                    return Err(revert("Wrong payment amount"));
                }
                *self.balances.entry(from).or_default() -= value;
                *self.unclaimed.entry(listing.owner).or_default() += value;
            }
            C::withdrawMoney(c) => {
                if !value.is_zero() {
                    return Err(revert("Function is not payable"));
                }
                let unclaimed = self.unclaimed.entry(from).or_default();
                if *unclaimed < c.amount {
                    return Err(revert("Not enough funds"));
                }
                *unclaimed -= c.amount;
                *self.balances.entry(from).or_default() += c.amount;
            }
            C::getNumberOfApartments(_)
            | C::getCoordinates(_)
            | C::apartments(_)
            | C::unclaimedEth(_) => {}
        }
        Ok(())
    }
}

/// Decodes a call of the rental contract from the provided ABI-encoded
/// `data`.
fn decode(data: &[u8]) -> Result<Welcomy::WelcomyCalls, Error> {
    Welcomy::WelcomyCalls::abi_decode(data, true)
        .map_err(|e| Error::Rejected(format!("malformed call data: {e}")))
}

/// Creates an [`Error::Reverted`] with the provided `reason`.
fn revert(reason: &str) -> Error {
    Error::Reverted(Some(reason.into()))
}

/// Counts the nights between the provided `[day, month, year]` dates.
fn nights(check_in: [U256; 3], check_out: [U256; 3]) -> Option<u64> {
    let date = |[day, month, year]: [U256; 3]| {
        let [day, month, year] = [day, month, year]
            .map(|n| u32::try_from(n).ok());
        DateTime::from_calendar_date(&format!(
            "{:04}-{:02}-{:02}",
            year?, month?, day?,
        ))
        .ok()
    };
    Stay::new(date(check_in)?, date(check_out)?)
        .ok()
        .map(|s| s.nights())
}

impl Ledger<Call<ViewCall>> for Memory {
    type Ok = Bytes;
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Call(call): Call<ViewCall>,
    ) -> Result<Self::Ok, Self::Err> {
        let mut state = self.reachable_state().map_err(tracerr::wrap!())?;
        if call.to != CONTRACT_ADDRESS {
            return Ok(Bytes::new());
        }
        state
            .view(&call.data)
            .map(Bytes::from)
            .map_err(Error::into_call_error)
            .map_err(tracerr::wrap!())
    }
}

impl Ledger<Submit<Transaction>> for Memory {
    type Ok = Pending;
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Submit(tx): Submit<Transaction>,
    ) -> Result<Self::Ok, Self::Err> {
        let mut state = self.reachable_state().map_err(tracerr::wrap!())?;

        let external = match &tx.signer {
            Signer::Local(_) => false,
            Signer::External(account) => match &state.external_signer {
                ExternalSigner::Accounts(accounts)
                    if accounts.contains(account) =>
                {
                    true
                }
                ExternalSigner::Rejecting => {
                    return Err(tracerr::new!(Error::UserRejected));
                }
                ExternalSigner::Absent | ExternalSigner::Accounts(_) => {
                    return Err(tracerr::new!(Error::NoExternalSigner));
                }
            },
        };
        if tx.to != CONTRACT_ADDRESS {
            return Err(tracerr::new!(Error::Rejected(
                "unknown contract".into(),
            )));
        }

        state.nonce += 1;
        let tx_hash = keccak256(state.nonce.to_be_bytes());
        let outcome = if state.fail_next_transaction {
            state.fail_next_transaction = false;
            Outcome::Failed
        } else {
            state
                .transact(tx.signer.address(), &tx.data, tx.value.into())
                .map_err(tracerr::wrap!())?;
            Outcome::Mined(state.nonce)
        };
        drop(state.pending.insert(tx_hash, outcome));

        Ok(Pending { tx_hash, external })
    }
}

impl Ledger<Confirm<Pending>> for Memory {
    type Ok = Receipt;
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Confirm(pending): Confirm<Pending>,
    ) -> Result<Self::Ok, Self::Err> {
        let mut state = self.reachable_state().map_err(tracerr::wrap!())?;
        match state.pending.remove(&pending.tx_hash) {
            Some(Outcome::Mined(block)) => {
                if state.disconnect_after_confirm {
                    state.disconnect_after_confirm = false;
                    state.unavailable = true;
                }
                Ok(Receipt {
                    tx_hash: pending.tx_hash,
                    block_number: Some(block),
                })
            }
            Some(Outcome::Failed) => Err(tracerr::new!(Error::Reverted(None))),
            None => Err(tracerr::new!(Error::Malformed(format!(
                "unknown transaction `{}`",
                pending.tx_hash,
            )))),
        }
    }
}

impl Ledger<Select<By<Wei, Address>>> for Memory {
    type Ok = Wei;
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Wei, Address>>,
    ) -> Result<Self::Ok, Self::Err> {
        let state = self.reachable_state().map_err(tracerr::wrap!())?;
        Ok(state
            .balances
            .get(&by.into_inner())
            .copied()
            .unwrap_or_default()
            .into())
    }
}

impl Ledger<Request<Accounts>> for Memory {
    type Ok = Vec<Address>;
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Request(Accounts): Request<Accounts>,
    ) -> Result<Self::Ok, Self::Err> {
        match &self.state().external_signer {
            ExternalSigner::Absent => {
                Err(tracerr::new!(Error::NoExternalSigner))
            }
            ExternalSigner::Accounts(accounts) => Ok(accounts.clone()),
            ExternalSigner::Rejecting => {
                Err(tracerr::new!(Error::UserRejected))
            }
        }
    }
}
