use cosmwasm_schema::cw_serde;
use cosmwasm_std::Addr;
use cw_storage_plus::{Item, Map};

pub const CONTRACT_NAME: &str = "crates.io:omnirelay-protocol-fee";
pub const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// 100% in basis points
pub const MAX_TOTAL_SHARE: u16 = 10_000;

#[cw_serde]
#[derive(Copy, Eq)]
pub enum FeeType {
    Dev,
    Buyback,
    Reserve,
    Stake,
}

impl FeeType {
    pub const ALL: [FeeType; 4] = [
        FeeType::Dev,
        FeeType::Buyback,
        FeeType::Reserve,
        FeeType::Stake,
    ];

    pub fn key(self) -> u8 {
        match self {
            FeeType::Dev => 0,
            FeeType::Buyback => 1,
            FeeType::Reserve => 2,
            FeeType::Stake => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FeeType::Dev => "dev",
            FeeType::Buyback => "buyback",
            FeeType::Reserve => "reserve",
            FeeType::Stake => "stake",
        }
    }
}

#[cw_serde]
pub struct Config {
    pub admin: Addr,
    /// Upstream swap contract allowed to report fees
    pub swap: Option<Addr>,
    /// Fallback receiver, also allowed to report fees
    pub fee_treasury: Option<Addr>,
}

pub const CONFIG: Item<Config> = Item::new("config");

/// Tokens eligible for distribution
pub const TOKENS: Map<&str, bool> = Map::new("tokens");

/// Basis-point share per fee type key
pub const SHARES: Map<u8, u16> = Map::new("shares");

/// Sum of `SHARES`
pub const TOTAL_SHARE: Item<u16> = Item::new("total_share");

pub const RECEIVERS: Map<u8, Addr> = Map::new("receivers");
