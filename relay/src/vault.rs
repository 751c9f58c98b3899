//! Messages and queries towards vault ledgers and mintable cw20 tokens.

use cosmwasm_std::{
    to_json_binary, Addr, CosmosMsg, Int128, QuerierWrapper, StdResult, Uint128, WasmMsg,
};
use cw20::Cw20ExecuteMsg;
use vault_token::msg::{
    AmountResponse, ExecuteMsg as VaultExecuteMsg, NetFlowResponse, QueryMsg as VaultQueryMsg,
};

fn execute_msg<T: serde::Serialize>(contract: &Addr, msg: &T) -> StdResult<CosmosMsg> {
    Ok(CosmosMsg::Wasm(WasmMsg::Execute {
        contract_addr: contract.to_string(),
        msg: to_json_binary(msg)?,
        funds: vec![],
    }))
}

/// Book a cross-chain movement on the vault ledger
pub fn transfer_token_msg(
    vault: &Addr,
    from_chain: u64,
    from_amount: Uint128,
    to_chain: u64,
    to_amount: Uint128,
    relay_chain: u64,
    fee: Uint128,
) -> StdResult<CosmosMsg> {
    execute_msg(
        vault,
        &VaultExecuteMsg::TransferToken {
            from_chain,
            from_amount,
            to_chain,
            to_amount,
            relay_chain,
            fee,
        },
    )
}

pub fn deposit_msg(
    vault: &Addr,
    from_chain: u64,
    amount: Uint128,
    receiver: &Addr,
) -> StdResult<CosmosMsg> {
    execute_msg(
        vault,
        &VaultExecuteMsg::Deposit {
            from_chain,
            amount,
            receiver: receiver.to_string(),
        },
    )
}

pub fn withdraw_msg(
    vault: &Addr,
    to_chain: u64,
    vault_amount: Uint128,
    owner: &Addr,
) -> StdResult<CosmosMsg> {
    execute_msg(
        vault,
        &VaultExecuteMsg::Withdraw {
            to_chain,
            vault_amount,
            owner: owner.to_string(),
        },
    )
}

pub fn query_net_flow(querier: &QuerierWrapper, vault: &Addr, chain_id: u64) -> StdResult<Int128> {
    let res: NetFlowResponse =
        querier.query_wasm_smart(vault, &VaultQueryMsg::NetFlow { chain_id })?;
    Ok(res.net_flow)
}

/// Underlying released for burning `vault_amount` shares
pub fn query_token_amount(
    querier: &QuerierWrapper,
    vault: &Addr,
    vault_amount: Uint128,
) -> StdResult<Uint128> {
    let res: AmountResponse =
        querier.query_wasm_smart(vault, &VaultQueryMsg::TokenAmount { vault_amount })?;
    Ok(res.amount)
}

pub fn mint_msg(token: &Addr, recipient: &Addr, amount: Uint128) -> StdResult<CosmosMsg> {
    execute_msg(
        token,
        &Cw20ExecuteMsg::Mint {
            recipient: recipient.to_string(),
            amount,
        },
    )
}

pub fn burn_msg(token: &Addr, amount: Uint128) -> StdResult<CosmosMsg> {
    execute_msg(token, &Cw20ExecuteMsg::Burn { amount })
}

/// Whether `net_flow` covers `amount`
pub fn covers(net_flow: Int128, amount: Uint128) -> bool {
    match i128::try_from(amount.u128()) {
        Ok(amount) => net_flow.i128() >= amount,
        Err(_) => false,
    }
}
