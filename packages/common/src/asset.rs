//! Relay-chain assets.
//!
//! Tokens on the relay chain are either bank denoms or cw20 contracts. The
//! registry keys both by a single string ([`AssetInfo::key`]).

use cosmwasm_schema::cw_serde;
use cosmwasm_std::{
    to_json_binary, Addr, Api, BankMsg, Coin, CosmosMsg, MessageInfo, StdError, StdResult,
    Uint128, WasmMsg,
};
use cw20::Cw20ExecuteMsg;

/// Asset identifier on the relay chain
#[cw_serde]
pub enum AssetInfo {
    /// Bank module denom (e.g. "uluna")
    Native { denom: String },
    /// cw20 token contract
    Cw20 { contract_addr: Addr },
}

impl AssetInfo {
    /// Registry key: the denom or the contract address.
    pub fn key(&self) -> String {
        match self {
            AssetInfo::Native { denom } => denom.clone(),
            AssetInfo::Cw20 { contract_addr } => contract_addr.to_string(),
        }
    }

    pub fn is_native(&self) -> bool {
        matches!(self, AssetInfo::Native { .. })
    }

    /// Validate user input, normalizing cw20 addresses.
    pub fn validate(&self, api: &dyn Api) -> StdResult<AssetInfo> {
        match self {
            AssetInfo::Native { denom } => {
                if denom.is_empty() {
                    return Err(StdError::generic_err("empty denom"));
                }
                Ok(self.clone())
            }
            AssetInfo::Cw20 { contract_addr } => Ok(AssetInfo::Cw20 {
                contract_addr: api.addr_validate(contract_addr.as_str())?,
            }),
        }
    }

    /// Message moving `amount` of this asset from the contract to `recipient`.
    pub fn transfer_msg(&self, recipient: &Addr, amount: Uint128) -> StdResult<CosmosMsg> {
        Ok(match self {
            AssetInfo::Native { denom } => CosmosMsg::Bank(BankMsg::Send {
                to_address: recipient.to_string(),
                amount: vec![Coin {
                    denom: denom.clone(),
                    amount,
                }],
            }),
            AssetInfo::Cw20 { contract_addr } => CosmosMsg::Wasm(WasmMsg::Execute {
                contract_addr: contract_addr.to_string(),
                msg: to_json_binary(&Cw20ExecuteMsg::Transfer {
                    recipient: recipient.to_string(),
                    amount,
                })?,
                funds: vec![],
            }),
        })
    }

    /// Amount of this (native) asset attached to the call; zero for cw20.
    pub fn sent_amount(&self, info: &MessageInfo) -> Uint128 {
        match self {
            AssetInfo::Native { denom } => info
                .funds
                .iter()
                .filter(|c| &c.denom == denom)
                .map(|c| c.amount)
                .sum(),
            AssetInfo::Cw20 { .. } => Uint128::zero(),
        }
    }
}

impl std::fmt::Display for AssetInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// An amount of a specific asset
#[cw_serde]
pub struct Asset {
    pub info: AssetInfo,
    pub amount: Uint128,
}

impl Asset {
    pub fn transfer_msg(&self, recipient: &Addr) -> StdResult<CosmosMsg> {
        self.info.transfer_msg(recipient, self.amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cosmwasm_std::testing::mock_info;
    use cosmwasm_std::coins;

    #[test]
    fn test_key_for_both_kinds() {
        let native = AssetInfo::Native {
            denom: "uluna".to_string(),
        };
        let cw20 = AssetInfo::Cw20 {
            contract_addr: Addr::unchecked("contract1"),
        };
        assert_eq!(native.key(), "uluna");
        assert_eq!(cw20.key(), "contract1");
        assert!(native.is_native());
        assert!(!cw20.is_native());
    }

    #[test]
    fn test_sent_amount_sums_matching_denom_only() {
        let native = AssetInfo::Native {
            denom: "uluna".to_string(),
        };
        let mut funds = coins(100, "uluna");
        funds.push(Coin::new(50, "uusd"));
        let info = mock_info("sender", &funds);
        assert_eq!(native.sent_amount(&info), Uint128::new(100));
    }
}
