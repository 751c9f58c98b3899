use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Int128, Uint128};
use cw_storage_plus::{Item, Map};

pub const CONTRACT_NAME: &str = "crates.io:omnirelay-vault-token";
pub const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

#[cw_serde]
pub struct Config {
    /// Grants and revokes managers
    pub admin: Addr,
    /// Key of the relay token this vault backs
    pub underlying: String,
}

#[cw_serde]
pub struct TokenInfo {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

/// Aggregates updated together on every ledger mutation
#[cw_serde]
pub struct VaultState {
    /// Sum of `NET_FLOW` over all chains
    pub total_vault: Int128,
    /// Outstanding shares
    pub total_supply: Uint128,
}

pub const CONFIG: Item<Config> = Item::new("config");
pub const TOKEN_INFO: Item<TokenInfo> = Item::new("token_info");
pub const VAULT_STATE: Item<VaultState> = Item::new("vault_state");

/// Share balances
pub const BALANCES: Map<&Addr, Uint128> = Map::new("balances");

/// Signed net flow per chain id
pub const NET_FLOW: Map<u64, Int128> = Map::new("net_flow");

pub const MANAGERS: Map<&Addr, bool> = Map::new("managers");
