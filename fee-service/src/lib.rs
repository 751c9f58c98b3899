//! Fee Service Contract
//!
//! Quotes the flat fee a sender pays for relaying a generic message to a
//! target chain. The fee reimburses destination-chain execution gas and is
//! independent of the token registry's bridge fee.
//!
//! ```text
//! fee = (base_gas[chain] + gas_limit) * gas_price[chain][fee_token]
//! ```
//!
//! Gas prices are quoted with 18 decimals of precision and rescaled to the
//! fee token's decimals. A chain whose base gas is zero is not supported.

pub mod contract;
pub mod error;
pub mod msg;
pub mod state;

pub use crate::error::ContractError;
