//! [`Wallet`] definitions.

use std::str::FromStr as _;

use alloy_primitives::Address;
use alloy_signer_local::PrivateKeySigner;
use common::define_kind;
use derive_more::{Debug, Display, Error};
use secrecy::{ExposeSecret as _, SecretString};

#[cfg(doc)]
use crate::domain::Session;

/// Signing identity of a [`Session`].
#[derive(Clone, Debug)]
pub struct Wallet {
    /// [`Signer`] of this [`Wallet`].
    pub signer: Signer,

    /// [`Kind`] of this [`Wallet`].
    pub kind: Kind,
}

impl Wallet {
    /// Generates a new [`Wallet`] with a random private key.
    #[must_use]
    pub fn generate() -> Self {
        Self {
            signer: Signer::Local(PrivateKeySigner::random()),
            kind: Kind::Ephemeral,
        }
    }

    /// Imports a [`Wallet`] from the provided [`SecretKey`].
    ///
    /// # Errors
    ///
    /// - [`ImportError::Empty`] if the [`SecretKey`] is empty;
    /// - [`ImportError::Malformed`] if the [`SecretKey`] is not a valid
    ///   hex-encoded private key.
    pub fn import(key: &SecretKey) -> Result<Self, ImportError> {
        let key = key.0.expose_secret().trim();
        if key.is_empty() {
            return Err(ImportError::Empty);
        }
        let signer = PrivateKeySigner::from_str(key)
            .map_err(|_| ImportError::Malformed)?;
        Ok(Self {
            signer: Signer::Local(signer),
            kind: Kind::Imported,
        })
    }

    /// Creates a [`Wallet`] of the provided account managed by an external
    /// signer.
    #[must_use]
    pub fn external(account: Address) -> Self {
        Self {
            signer: Signer::External(account),
            kind: Kind::External,
        }
    }

    /// Returns the public [`Address`] of this [`Wallet`].
    #[must_use]
    pub fn address(&self) -> Address {
        self.signer.address()
    }
}

/// Signer of transactions.
#[derive(Clone, Debug)]
pub enum Signer {
    /// Private key held locally.
    Local(#[debug(skip)] PrivateKeySigner),

    /// Account held by an external signer, which signs transactions on its
    /// own side.
    External(Address),
}

impl Signer {
    /// Returns the [`Address`] transactions are signed on behalf of.
    #[must_use]
    pub fn address(&self) -> Address {
        match self {
            Self::Local(key) => key.address(),
            Self::External(account) => *account,
        }
    }
}

define_kind! {
    #[doc = "Kind of a `Wallet`, describing how it has been obtained."]
    enum Kind {
        #[doc = "Generated from a random private key."]
        Ephemeral,

        #[doc = "Imported from a provided private key."]
        Imported,

        #[doc = "Account of an external signer."]
        External,
    }
}

/// Hex-encoded private key of a [`Wallet`], with or without `0x` prefix.
#[derive(Debug)]
pub struct SecretKey(SecretString);

impl From<String> for SecretKey {
    fn from(key: String) -> Self {
        Self(SecretString::from(key))
    }
}

/// Error of importing a [`Wallet`] from a [`SecretKey`].
#[derive(Clone, Copy, Debug, Display, Eq, Error, PartialEq)]
pub enum ImportError {
    /// [`SecretKey`] is empty.
    #[display("secret key is empty")]
    Empty,

    /// [`SecretKey`] is not a valid private key.
    #[display("secret key is not a valid hex-encoded private key")]
    Malformed,
}

#[cfg(test)]
mod spec {
    use super::{ImportError, Kind, SecretKey, Wallet};

    const KEY: &str =
        "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    #[test]
    fn imports_with_and_without_prefix() {
        let plain =
            Wallet::import(&SecretKey::from(KEY.to_owned())).unwrap();
        let prefixed =
            Wallet::import(&SecretKey::from(format!("0x{KEY}"))).unwrap();

        assert_eq!(plain.kind, Kind::Imported);
        assert_eq!(plain.address(), prefixed.address());
        assert_eq!(
            plain.address().to_string(),
            "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266",
        );
    }

    #[test]
    fn rejects_empty_key() {
        for key in ["", "   "] {
            assert_eq!(
                Wallet::import(&SecretKey::from(key.to_owned())).unwrap_err(),
                ImportError::Empty,
            );
        }
    }

    #[test]
    fn rejects_malformed_key() {
        let too_long = format!("{KEY}00");
        for key in ["0x", "not a key", &KEY[..10], too_long.as_str()] {
            assert_eq!(
                Wallet::import(&SecretKey::from(key.to_owned())).unwrap_err(),
                ImportError::Malformed,
                "{key}",
            );
        }
    }

    #[test]
    fn generates_distinct_wallets() {
        let a = Wallet::generate();
        let b = Wallet::generate();

        assert_eq!(a.kind, Kind::Ephemeral);
        assert_ne!(a.address(), b.address());
    }
}
