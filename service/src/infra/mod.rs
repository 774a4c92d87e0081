//! Infrastructure layer.

pub mod ledger;

#[cfg(any(test, feature = "memory"))]
pub use self::ledger::Memory;
pub use self::ledger::{Ethereum, Ledger};
