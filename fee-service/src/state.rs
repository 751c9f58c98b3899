use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Uint128};
use cw_storage_plus::{Item, Map};

pub const CONTRACT_NAME: &str = "crates.io:omnirelay-fee-service";
pub const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Decimals assumed for fee tokens without an explicit entry
pub const DEFAULT_TOKEN_DECIMALS: u8 = 18;

/// Precision of stored gas prices
pub const PRICE_DECIMALS: u8 = 18;

#[cw_serde]
pub struct Config {
    pub admin: Addr,
    /// Where relayers expect message fees to be paid; may be unset
    pub fee_receiver: Option<Addr>,
}

pub const CONFIG: Item<Config> = Item::new("config");
pub const MANAGERS: Map<&Addr, bool> = Map::new("managers");

/// Base gas per target chain; zero means unsupported
pub const BASE_GAS: Map<u64, Uint128> = Map::new("base_gas");

/// Gas price keyed by (target chain, fee token)
pub const CHAIN_GAS_PRICE: Map<(u64, &str), Uint128> = Map::new("chain_gas_price");

pub const TOKEN_DECIMALS: Map<&str, u8> = Map::new("token_decimals");
