//! Protocol Fee Distributor
//!
//! Splits fee inflows between the four protocol fee types. Each type owns a
//! basis-point share and a payout address:
//!
//! | Fee type | Typical receiver        |
//! |----------|-------------------------|
//! | Dev      | development multisig    |
//! | Buyback  | buyback executor        |
//! | Reserve  | reserve treasury        |
//! | Stake    | staking rewards pool    |
//!
//! An inflow of `amount` pays `amount * share / total_share` to each type with
//! a receiver. Truncation dust and the parts of types without a receiver go
//! to the fee treasury. Only the configured swap contract and the fee
//! treasury may report inflows, and only for eligible tokens.

pub mod contract;
pub mod error;
pub mod msg;
pub mod state;

pub use crate::error::ContractError;
