//! [`Gateway`] to the rental contract.

use alloy_primitives::{address, Address, U256};
use alloy_sol_types::SolCall;
use common::{
    bytes32,
    operations::{By, Call, Confirm, Select, Submit},
    Wei,
};
use derive_more::{Display, Error as StdError, From};
use tracerr::Traced;
use tracing as log;

use self::abi::Welcomy;
use crate::{
    domain::{
        apartment::{self, Coordinate},
        reservation::Quote,
        Wallet,
    },
    infra::ledger::{self, Backend, Receipt, Transaction, ViewCall},
};

/// [`Address`] of the rental contract deployed to the Goerli network.
pub const CONTRACT_ADDRESS: Address =
    address!("d7A28bb3cDB9eaB90c1c5Ac21Cec439b4fdf5b8E");

pub(crate) mod abi {
    //! ABI of the rental contract.

    alloy_sol_types::sol! {
        contract Welcomy {
            function getNumberOfApartments()
                external view returns (uint256 count);

            function getCoordinates(uint256 index)
                external view returns (bytes32 longitude, bytes32 latitude);

            function apartments(uint256 index)
                external view returns (uint256 pricePerNight);

            function unclaimedEth(address owner)
                external view returns (uint256 amount);

            function listApartment(
                bytes32 longitude,
                bytes32 latitude,
                uint256 pricePerNight
            ) external;

            function makeReservation(
                uint256 apartmentId,
                uint256 dayStart,
                uint256 monthStart,
                uint256 yearStart,
                uint256 dayEnd,
                uint256 monthEnd,
                uint256 yearEnd
            ) external payable;

            function withdrawMoney(uint256 amount) external;
        }
    }
}

/// Handle to the rental contract on behalf of a [`Wallet`].
///
/// Write calls await the confirmation of their transactions.
#[derive(Debug)]
pub struct Gateway<'a, L> {
    /// [`Ledger`] to issue calls to.
    ///
    /// [`Ledger`]: crate::infra::Ledger
    ledger: &'a L,

    /// [`Wallet`] to issue calls on behalf of.
    wallet: &'a Wallet,
}

impl<'a, L> Gateway<'a, L>
where
    L: Backend,
{
    /// Binds the rental contract to the provided [`Wallet`].
    #[must_use]
    pub const fn new(ledger: &'a L, wallet: &'a Wallet) -> Self {
        Self { ledger, wallet }
    }

    /// Reads the number of listed apartments.
    ///
    /// # Errors
    ///
    /// If the [`Ledger`] call fails, or the number doesn't fit into [`u64`].
    ///
    /// [`Ledger`]: crate::infra::Ledger
    pub async fn apartments_count(&self) -> Result<u64, Traced<Error>> {
        let count = self.view(Welcomy::getNumberOfApartmentsCall {}).await?;
        u64::try_from(count.count)
            .map_err(|_| tracerr::new!(Error::CounterOverflow))
    }

    /// Reads the longitude and latitude of the apartment with the provided
    /// [`apartment::Index`].
    ///
    /// # Errors
    ///
    /// If the [`Ledger`] call fails, or the coordinates are malformed.
    ///
    /// [`Ledger`]: crate::infra::Ledger
    pub async fn coordinates(
        &self,
        index: apartment::Index,
    ) -> Result<(Coordinate, Coordinate), Traced<Error>> {
        let coords = self
            .view(Welcomy::getCoordinatesCall {
                index: index.into(),
            })
            .await?;
        Ok((
            Coordinate::decode(coords.longitude)
                .map_err(tracerr::from_and_wrap!(=> Error))?,
            Coordinate::decode(coords.latitude)
                .map_err(tracerr::from_and_wrap!(=> Error))?,
        ))
    }

    /// Reads the price of a night in the apartment with the provided
    /// [`apartment::Index`].
    ///
    /// # Errors
    ///
    /// If the [`Ledger`] call fails.
    ///
    /// [`Ledger`]: crate::infra::Ledger
    pub async fn price_per_night(
        &self,
        index: apartment::Index,
    ) -> Result<Wei, Traced<Error>> {
        self.view(Welcomy::apartmentsCall {
            index: index.into(),
        })
        .await
        .map(|r| r.pricePerNight.into())
    }

    /// Reads the rental income of the [`Wallet`] not withdrawn yet.
    ///
    /// # Errors
    ///
    /// If the [`Ledger`] call fails.
    ///
    /// [`Ledger`]: crate::infra::Ledger
    pub async fn unclaimed(&self) -> Result<Wei, Traced<Error>> {
        self.view(Welcomy::unclaimedEthCall {
            owner: self.wallet.address(),
        })
        .await
        .map(|r| r.amount.into())
    }

    /// Reads the native account balance of the [`Wallet`].
    ///
    /// # Errors
    ///
    /// If the [`Ledger`] call fails.
    ///
    /// [`Ledger`]: crate::infra::Ledger
    pub async fn balance(&self) -> Result<Wei, Traced<Error>> {
        self.ledger
            .execute(Select(By::new(self.wallet.address())))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> Error))
    }

    /// Lists a new apartment with the provided coordinates and price.
    ///
    /// # Errors
    ///
    /// If the transaction is not submitted or not confirmed.
    pub async fn list_apartment(
        &self,
        longitude: &Coordinate,
        latitude: &Coordinate,
        price_per_night: Wei,
    ) -> Result<Receipt, Traced<Error>> {
        self.transact(
            Welcomy::listApartmentCall {
                longitude: longitude.encode(),
                latitude: latitude.encode(),
                pricePerNight: price_per_night.into(),
            },
            Wei::ZERO,
        )
        .await
    }

    /// Reserves the apartment as priced by the provided [`Quote`], paying
    /// its total.
    ///
    /// # Errors
    ///
    /// If the transaction is not submitted or not confirmed.
    pub async fn make_reservation(
        &self,
        quote: &Quote,
    ) -> Result<Receipt, Traced<Error>> {
        let check_in = quote.stay.check_in();
        let check_out = quote.stay.check_out();
        self.transact(
            Welcomy::makeReservationCall {
                apartmentId: quote.apartment.index().into(),
                dayStart: U256::from(check_in.day),
                monthStart: U256::from(check_in.month),
                // Years of a `Stay` are never negative.
                yearStart: U256::from(check_in.year.unsigned_abs()),
                dayEnd: U256::from(check_out.day),
                monthEnd: U256::from(check_out.month),
                yearEnd: U256::from(check_out.year.unsigned_abs()),
            },
            quote.total,
        )
        .await
    }

    /// Withdraws the provided `amount` of rental income to the [`Wallet`].
    ///
    /// # Errors
    ///
    /// If the transaction is not submitted or not confirmed.
    pub async fn withdraw_money(
        &self,
        amount: Wei,
    ) -> Result<Receipt, Traced<Error>> {
        self.transact(
            Welcomy::withdrawMoneyCall {
                amount: amount.into(),
            },
            Wei::ZERO,
        )
        .await
    }

    /// Performs a read-only `call` of the contract.
    async fn view<C: SolCall>(
        &self,
        call: C,
    ) -> Result<C::Return, Traced<Error>> {
        let raw = self
            .ledger
            .execute(Call(ViewCall {
                to: CONTRACT_ADDRESS,
                data: call.abi_encode().into(),
            }))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> Error))?;
        // Getters of structs may return more fields than declared.
        C::abi_decode_returns(&raw, false)
            .map_err(tracerr::from_and_wrap!(=> Error))
    }

    /// Submits the provided `call` of the contract paying the provided
    /// `value`, and awaits its confirmation.
    async fn transact<C: SolCall>(
        &self,
        call: C,
        value: Wei,
    ) -> Result<Receipt, Traced<Error>> {
        let pending = self
            .ledger
            .execute(Submit(Transaction {
                signer: self.wallet.signer.clone(),
                to: CONTRACT_ADDRESS,
                data: call.abi_encode().into(),
                value,
            }))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> Error))?;
        log::debug!(
            "`{}` transaction `{}` is submitted",
            C::SIGNATURE,
            pending.tx_hash,
        );

        let receipt = self
            .ledger
            .execute(Confirm(pending))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> Error))?;
        log::info!(
            "`{}` transaction `{}` is confirmed in block {:?}",
            C::SIGNATURE,
            receipt.tx_hash,
            receipt.block_number,
        );

        Ok(receipt)
    }
}

/// [`Gateway`] error.
#[derive(Debug, Display, From, StdError)]
pub enum Error {
    /// [`Ledger`] error.
    ///
    /// [`Ledger`]: crate::infra::Ledger
    #[display("`Ledger` operation failed: {_0}")]
    #[from]
    Ledger(ledger::Error),

    /// Contract response cannot be decoded.
    #[display("Failed to decode contract response: {_0}")]
    #[from]
    Abi(alloy_sol_types::Error),

    /// Stored coordinate cannot be decoded.
    #[display("Failed to decode coordinate: {_0}")]
    #[from]
    Coordinate(bytes32::DecodeError),

    /// Apartments counter doesn't fit into [`u64`].
    #[display("Apartments counter overflows")]
    CounterOverflow,
}
