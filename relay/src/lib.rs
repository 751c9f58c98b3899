//! Omnirelay Hub Contract - Cross-Chain Token and Message Relay
//!
//! This contract is the hub of a hub-and-spoke bridge. Spoke chains emit
//! `MessageOut` logs; relayers prove them here and the hub settles, delivers
//! or relays them onward.
//!
//! # Outbound Flow (SwapOutToken)
//! 1. User sends native funds or cw20 tokens with a target chain and receiver
//! 2. Fees are taken and the movement is booked on the token's vault ledger
//! 3. A `message_out` event carries the encoded wire message to relayers
//!
//! # Inbound Flow (MessageIn)
//! 1. Relayer submits a receipt proof for a spoke chain `MessageOut` log
//! 2. The chain's light client verifies the proof
//! 3. The hub delivers to a local receiver or relays onward to the target chain
//!
//! # Registry
//! - Chains with explicit address kinds (EVM, Tron, TON, Solana, Bitcoin)
//! - Relay tokens bound one-to-one to vault ledgers
//! - Per-chain token mappings with decimals and bridgeable flags
//! - Fee schedules, base fees and caller whitelists
//! - Deposit whitelist and per-token deposit limits
//!
//! # Security
//! - Role-based authority policy for every admin operation
//! - Order ids are processed once
//! - Failed deliveries are isolated and retryable
//! - Emergency pause functionality

pub mod authority;
pub mod contract;
pub mod error;
mod execute;
pub mod fee_math;
pub mod hash;
pub mod msg;
mod query;
pub mod registry;
pub mod state;
pub mod vault;

pub use crate::error::ContractError;
pub use crate::fee_math::{convert_decimals, FeeQuote};
pub use crate::hash::{compute_order_id, keccak256};
