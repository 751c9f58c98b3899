//! State definitions for the Omnirelay hub contract
//!
//! Storage is grouped by concern: core config, the chain directory, the token
//! registry with its fee schedules, relay-side fee accounting, order tracking
//! and the authority policy.

use common::{AssetInfo, ChainKind, MessageType};
use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Binary, Uint128};
use cw_storage_plus::{Item, Map};

// ============================================================================
// Constants
// ============================================================================

/// Contract name for cw2 migration info
pub const CONTRACT_NAME: &str = "crates.io:omnirelay";

/// Contract version for cw2 migration info
pub const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Fee rates are expressed in millionths
pub const MAX_RATE: u32 = 1_000_000;

/// Decimals assumed for bank denoms
pub const NATIVE_DECIMALS: u8 = 6;

/// Reply id of the isolated delivery submessage
pub const REPLY_DELIVERY: u64 = 1;

// ============================================================================
// Core Configuration
// ============================================================================

/// Contract configuration
#[cw_serde]
pub struct Config {
    /// Admin address, always allowed through the authority policy
    pub admin: Addr,
    /// Whether the relay is currently paused
    pub paused: bool,
    /// Id of the relay chain itself
    pub chain_id: u64,
    /// Bank denom used to pay message fees
    pub native_denom: String,
    /// Receiver credited with base fees
    pub base_fee_receiver: Addr,
}

pub const CONFIG: Item<Config> = Item::new("config");

/// Outbound message counter, mixed into every order id
pub const NONCE: Item<u64> = Item::new("nonce");

// ============================================================================
// Chain Directory
// ============================================================================

/// A chain known to the relay
#[cw_serde]
pub struct Chain {
    pub chain_id: u64,
    pub name: String,
    /// Address encoding family
    pub kind: ChainKind,
    /// Bridge contract on that chain, expected emitter of inbound logs
    pub mos: Binary,
    pub wrapped_native_token: Binary,
    /// Proof verifier for logs of this chain
    pub light_client: Option<Addr>,
    /// Message fee quoter for messages leaving this chain
    pub fee_service: Option<Addr>,
}

/// Key: chain id
pub const CHAINS: Map<u64, Chain> = Map::new("chains");

/// Key: chain name, Value: chain id
pub const CHAIN_NAMES: Map<&str, u64> = Map::new("chain_names");

// ============================================================================
// Token Registry
// ============================================================================

/// A token registered on the relay chain
#[cw_serde]
pub struct RelayToken {
    pub asset: AssetInfo,
    /// Whether the relay may mint and burn the token
    pub mintable: bool,
    /// Vault ledger backing the token, bound once
    pub vault_token: Addr,
}

/// Key: relay token key
pub const RELAY_TOKENS: Map<&str, RelayToken> = Map::new("relay_tokens");

/// Reverse vault binding. Key: vault address, Value: relay token key
pub const VAULT_BINDINGS: Map<&Addr, String> = Map::new("vault_bindings");

/// How a relay token is represented on another chain
#[cw_serde]
pub struct TokenMapping {
    pub target_token: Binary,
    pub decimals: u8,
    /// Whether the bridge on that chain mints the token
    pub mintable: bool,
}

/// Key: (relay token key, chain id)
pub const TOKEN_MAPPINGS: Map<(&str, u64), TokenMapping> = Map::new("token_mappings");

/// Key: (chain id, target token bytes), Value: relay token key
pub const TARGET_TOKENS: Map<(u64, &[u8]), String> = Map::new("target_tokens");

/// Key: (relay token key, chain id)
pub const BRIDGEABLE: Map<(&str, u64), bool> = Map::new("bridgeable");

// ============================================================================
// Deposit Whitelist
// ============================================================================

/// When set, only whitelisted senders may deposit into vaults
pub const DEPOSIT_WHITELIST_ENABLED: Item<bool> = Item::new("deposit_whitelist_enabled");

pub const DEPOSIT_WHITELIST: Map<&Addr, bool> = Map::new("deposit_whitelist");

/// Largest single deposit per relay token key; absent means no cap
pub const DEPOSIT_LIMITS: Map<&str, Uint128> = Map::new("deposit_limits");

// ============================================================================
// Fee Schedules
// ============================================================================

/// Clamped percentage fee for one leg of a route
#[cw_serde]
#[derive(Default)]
pub struct FeeSchedule {
    pub lowest: Uint128,
    pub highest: Uint128,
    /// Millionths of the amount
    pub rate: u32,
}

/// Flat fee charged per transfer towards a chain
#[cw_serde]
#[derive(Default)]
pub struct BaseFee {
    pub with_swap: Uint128,
    pub no_swap: Uint128,
}

/// Key: (relay token key, to chain)
pub const TO_CHAIN_FEES: Map<(&str, u64), FeeSchedule> = Map::new("to_chain_fees");

/// Key: (relay token key, from chain)
pub const FROM_CHAIN_FEES: Map<(&str, u64), FeeSchedule> = Map::new("from_chain_fees");

/// Key: (relay token key, to chain)
pub const BASE_FEES: Map<(&str, u64), BaseFee> = Map::new("base_fees");

/// Key: (relay token key, route key of from chain, to chain and caller)
pub const TO_CHAIN_WHITELIST: Map<(&str, &[u8]), u32> = Map::new("to_chain_whitelist");

/// Key: (relay token key, route key of from chain and caller)
pub const FROM_CHAIN_WHITELIST: Map<(&str, &[u8]), u32> = Map::new("from_chain_whitelist");

/// Whitelist key for a (from, to, caller) route
pub fn to_chain_route_key(from_chain: u64, to_chain: u64, caller: &[u8]) -> Vec<u8> {
    let mut key = Vec::with_capacity(16 + caller.len());
    key.extend_from_slice(&from_chain.to_be_bytes());
    key.extend_from_slice(&to_chain.to_be_bytes());
    key.extend_from_slice(caller);
    key
}

/// Whitelist key for a (from, caller) route
pub fn from_chain_route_key(from_chain: u64, caller: &[u8]) -> Vec<u8> {
    let mut key = Vec::with_capacity(8 + caller.len());
    key.extend_from_slice(&from_chain.to_be_bytes());
    key.extend_from_slice(caller);
    key
}

// ============================================================================
// Relay Fee Distribution
// ============================================================================

/// Share of the bridge fee
#[cw_serde]
#[derive(Copy, Eq)]
pub enum DistributeKind {
    /// Reserved floor kept by the vault
    Vault,
    /// Paid to whoever carries the message
    Relayer,
    Protocol,
}

impl DistributeKind {
    pub fn key(self) -> u8 {
        match self {
            DistributeKind::Vault => 0,
            DistributeKind::Relayer => 1,
            DistributeKind::Protocol => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DistributeKind::Vault => "vault",
            DistributeKind::Relayer => "relayer",
            DistributeKind::Protocol => "protocol",
        }
    }

    pub const ALL: [DistributeKind; 3] = [
        DistributeKind::Vault,
        DistributeKind::Relayer,
        DistributeKind::Protocol,
    ];
}

#[cw_serde]
#[derive(Default)]
pub struct DistributeRate {
    pub receiver: Option<Addr>,
    /// Millionths of the bridge fee
    pub rate: u32,
}

/// Key: distribute kind
pub const DISTRIBUTE_RATES: Map<u8, DistributeRate> = Map::new("distribute_rates");

/// Accrued withdrawable fees. Key: (receiver, token key)
pub const FEE_LIST: Map<(&Addr, &str), Uint128> = Map::new("fee_list");

// ============================================================================
// Orders
// ============================================================================

/// A cross-chain message seen by the relay
#[cw_serde]
pub struct Order {
    pub order_id: Binary,
    pub from_chain: u64,
    pub to_chain: u64,
    pub message_type: MessageType,
    pub token: Binary,
    pub amount: Uint128,
    pub from: Binary,
    pub to: Binary,
    pub payload: Binary,
    /// Inbound orders are terminal once processed
    pub processed: bool,
    /// False when delivery failed and a retry is pending
    pub result: bool,
    pub reason: Option<String>,
}

/// Key: order id
pub const OUT_ORDERS: Map<&[u8], Order> = Map::new("out_orders");

/// Key: order id
pub const IN_ORDERS: Map<&[u8], Order> = Map::new("in_orders");

/// A delivery to a receiver on the relay chain
#[cw_serde]
pub struct Delivery {
    pub order_id: Binary,
    pub from_chain: u64,
    /// Relay token moved with the message, if any
    pub asset: Option<AssetInfo>,
    pub mintable: bool,
    pub amount: Uint128,
    /// Receiver address text
    pub receiver: String,
    pub from: Binary,
    pub payload: Binary,
}

/// Deliveries not yet completed. Key: order id
pub const DELIVERIES: Map<&[u8], Delivery> = Map::new("deliveries");

/// Order id of the delivery submessage in flight
pub const PENDING_DELIVERY: Item<Binary> = Item::new("pending_delivery");

// ============================================================================
// Authority Policy
// ============================================================================

/// Key: (role key, member)
pub const ROLE_MEMBERS: Map<(u8, &Addr), bool> = Map::new("role_members");

/// Key: function selector
pub const FUNCTION_ACCESS: Map<&str, crate::authority::Access> = Map::new("function_access");
