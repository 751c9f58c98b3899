//! Vault Token Contract
//!
//! Share token backing one relay token. The vault does not hold the underlying
//! asset itself: the relay keeps custody and drives this ledger through the
//! manager-gated `Deposit`, `Withdraw` and `TransferToken` messages.
//!
//! ## Ledger
//!
//! - `net_flow[chain]` is signed. Deposits and inbound transfers increase it,
//!   withdrawals and outbound transfers decrease it, and it may go negative.
//! - `total_vault` always equals the sum of every chain's `net_flow`.
//! - Shares float against `total_vault`; the first depositor mints 1:1.

pub mod contract;
pub mod error;
pub mod msg;
pub mod state;

pub use crate::error::ContractError;
