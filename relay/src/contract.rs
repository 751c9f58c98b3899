//! Omnirelay hub contract - Entry Points
//!
//! The implementation is modularized into:
//! - `execute/` - relay state machine and fee distribution
//! - `registry/` - chain directory, token registry and fee configuration
//! - `query` - query handlers

use common::ChainKind;
use cosmwasm_std::{
    entry_point, to_json_binary, Binary, Deps, DepsMut, Env, MessageInfo, Reply, Response,
    StdError, StdResult,
};
use cw2::set_contract_version;

use crate::authority::{
    execute_grant_role, execute_revoke_role, execute_set_function_access, Access,
    UPDATE_DEPOSIT_LIMITS, UPDATE_DEPOSIT_WHITELIST,
};
use crate::error::ContractError;
use crate::execute::{
    execute_delivery, execute_deposit_native, execute_message_in, execute_pause,
    execute_receive, execute_retry_message_in, execute_set_distribute_rate,
    execute_swap_out_native, execute_transfer_out, execute_unpause, execute_withdraw,
    execute_withdraw_fee, reply_delivery,
};
use crate::msg::{ExecuteMsg, InstantiateMsg, MigrateMsg, QueryMsg};
use crate::query;
use crate::registry::chain::{execute_register_chain, insert_chain};
use crate::registry::deposit::{
    deposit_limit, deposit_whitelist_enabled, execute_set_deposit_whitelist,
    execute_update_deposit_limits, execute_update_deposit_whitelist,
};
use crate::registry::token::{
    execute_map_token, execute_register_token, execute_register_token_chains,
    execute_set_base_fee, execute_set_base_fee_receiver, execute_set_from_chain_fee,
    execute_set_from_chain_whitelist_fee_rate, execute_set_to_chain_token_fee,
    execute_set_to_chain_whitelist_fee_rate, execute_unmap_token,
};
use crate::state::{
    Chain, Config, FeeSchedule, CONFIG, CONTRACT_NAME, CONTRACT_VERSION, FUNCTION_ACCESS, NONCE,
    REPLY_DELIVERY,
};

// ============================================================================
// Instantiate
// ============================================================================

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn instantiate(
    deps: DepsMut,
    env: Env,
    _info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    let admin = deps.api.addr_validate(&msg.admin)?;
    if msg.native_denom.trim().is_empty() {
        return Err(ContractError::ZeroAddress);
    }
    let base_fee_receiver = match msg.base_fee_receiver {
        Some(receiver) => deps.api.addr_validate(&receiver)?,
        None => admin.clone(),
    };
    let fee_service = msg
        .fee_service
        .map(|addr| deps.api.addr_validate(&addr))
        .transpose()?;

    let config = Config {
        admin,
        paused: false,
        chain_id: msg.chain_id,
        native_denom: msg.native_denom,
        base_fee_receiver,
    };
    CONFIG.save(deps.storage, &config)?;
    NONCE.save(deps.storage, &0u64)?;
    for selector in [UPDATE_DEPOSIT_WHITELIST, UPDATE_DEPOSIT_LIMITS] {
        FUNCTION_ACCESS.save(deps.storage, selector, &Access::Manager)?;
    }

    // The relay chain is a chain like any other; its mos is this contract
    insert_chain(
        deps.storage,
        &Chain {
            chain_id: msg.chain_id,
            name: msg.chain_name.trim().to_string(),
            kind: ChainKind::Other,
            mos: Binary::from(env.contract.address.as_bytes()),
            wrapped_native_token: Binary::from(config.native_denom.as_bytes()),
            light_client: None,
            fee_service,
        },
    )?;

    Ok(Response::new()
        .add_attribute("method", "instantiate")
        .add_attribute("admin", config.admin)
        .add_attribute("chain_id", msg.chain_id.to_string())
        .add_attribute("chain_name", msg.chain_name)
        .add_attribute("native_denom", config.native_denom))
}

// ============================================================================
// Execute
// ============================================================================

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn execute(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    let toggles_pause = matches!(msg, ExecuteMsg::Pause {} | ExecuteMsg::Unpause {});
    if !toggles_pause && CONFIG.load(deps.storage)?.paused {
        return Err(ContractError::Paused);
    }

    match msg {
        // Outbound
        ExecuteMsg::SwapOutToken {
            token,
            amount,
            to_chain,
            receiver,
            payload,
        } => execute_swap_out_native(
            deps, env, info, token, amount, to_chain, receiver, payload,
        ),
        ExecuteMsg::TransferOut {
            to_chain,
            target,
            payload,
            gas_limit,
        } => execute_transfer_out(deps, env, info, to_chain, target, payload, gas_limit),
        ExecuteMsg::DepositToken {
            token,
            amount,
            receiver,
        } => execute_deposit_native(deps, info, token, amount, receiver),
        ExecuteMsg::Withdraw {
            token,
            vault_amount,
        } => execute_withdraw(deps, info, token, vault_amount),
        ExecuteMsg::Receive(cw20_msg) => execute_receive(deps, env, info, cw20_msg),

        // Inbound
        ExecuteMsg::MessageIn {
            chain_id,
            log_index,
            order_id,
            receipt_proof,
        } => execute_message_in(deps, env, info, chain_id, log_index, order_id, receipt_proof),
        ExecuteMsg::RetryMessageIn { order_id, payload } => {
            execute_retry_message_in(deps, info, order_id, payload)
        }
        ExecuteMsg::ExecuteDelivery { order_id } => execute_delivery(deps, env, info, order_id),

        // Chain & token registry
        ExecuteMsg::RegisterChain {
            chain_id,
            name,
            kind,
            mos,
            wrapped_native_token,
            light_client,
            fee_service,
        } => execute_register_chain(
            deps,
            info,
            chain_id,
            name,
            kind,
            mos,
            wrapped_native_token,
            light_client,
            fee_service,
        ),
        ExecuteMsg::RegisterToken {
            token,
            vault,
            mintable,
        } => execute_register_token(deps, info, token, vault, mintable),
        ExecuteMsg::MapToken {
            token,
            chain_id,
            target_token,
            decimals,
            mintable,
        } => execute_map_token(deps, info, token, chain_id, target_token, decimals, mintable),
        ExecuteMsg::UnmapToken {
            chain_id,
            target_token,
        } => execute_unmap_token(deps, info, chain_id, target_token),
        ExecuteMsg::RegisterTokenChains {
            token,
            chain_ids,
            enable,
        } => execute_register_token_chains(deps, info, token, chain_ids, enable),

        // Fee configuration
        ExecuteMsg::SetFromChainFee {
            token,
            from_chain,
            lowest,
            highest,
            rate,
        } => execute_set_from_chain_fee(
            deps,
            info,
            token,
            from_chain,
            FeeSchedule {
                lowest,
                highest,
                rate,
            },
        ),
        ExecuteMsg::SetToChainTokenFee {
            token,
            to_chain,
            lowest,
            highest,
            rate,
        } => execute_set_to_chain_token_fee(
            deps,
            info,
            token,
            to_chain,
            FeeSchedule {
                lowest,
                highest,
                rate,
            },
        ),
        ExecuteMsg::SetBaseFee {
            token,
            to_chain,
            with_swap,
            no_swap,
        } => execute_set_base_fee(deps, info, token, to_chain, with_swap, no_swap),
        ExecuteMsg::SetToChainWhitelistFeeRate {
            token,
            from_chain,
            to_chain,
            caller,
            rate,
            enable,
        } => execute_set_to_chain_whitelist_fee_rate(
            deps, info, token, from_chain, to_chain, caller, rate, enable,
        ),
        ExecuteMsg::SetFromChainWhitelistFeeRate {
            token,
            from_chain,
            caller,
            rate,
            enable,
        } => execute_set_from_chain_whitelist_fee_rate(
            deps, info, token, from_chain, caller, rate, enable,
        ),
        ExecuteMsg::SetBaseFeeReceiver { receiver } => {
            execute_set_base_fee_receiver(deps, info, receiver)
        }
        ExecuteMsg::SetDistributeRate {
            kind,
            receiver,
            rate,
        } => execute_set_distribute_rate(deps, info, kind, receiver, rate),
        ExecuteMsg::WithdrawFee { receiver, token } => execute_withdraw_fee(deps, receiver, token),

        // Deposit whitelist
        ExecuteMsg::SetDepositWhitelist { enabled } => {
            execute_set_deposit_whitelist(deps, info, enabled)
        }
        ExecuteMsg::UpdateDepositWhitelist { accounts, enable } => {
            execute_update_deposit_whitelist(deps, info, accounts, enable)
        }
        ExecuteMsg::UpdateDepositLimits { tokens, limits } => {
            execute_update_deposit_limits(deps, info, tokens, limits)
        }

        // Authority
        ExecuteMsg::GrantRole { role, account } => execute_grant_role(deps, info, role, account),
        ExecuteMsg::RevokeRole { role, account } => execute_revoke_role(deps, info, role, account),
        ExecuteMsg::SetFunctionAccess { selector, access } => {
            execute_set_function_access(deps, info, selector, access)
        }

        // Circuit breaker
        ExecuteMsg::Pause {} => execute_pause(deps, info),
        ExecuteMsg::Unpause {} => execute_unpause(deps, info),
    }
}

// ============================================================================
// Reply
// ============================================================================

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn reply(deps: DepsMut, _env: Env, msg: Reply) -> Result<Response, ContractError> {
    match msg.id {
        REPLY_DELIVERY => reply_delivery(deps, msg),
        id => Err(ContractError::Std(StdError::generic_err(format!(
            "unknown reply id: {}",
            id
        )))),
    }
}

// ============================================================================
// Query
// ============================================================================

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn query(deps: Deps, _env: Env, msg: QueryMsg) -> StdResult<Binary> {
    query_inner(deps, msg).map_err(|err| match err {
        ContractError::Std(err) => err,
        err => StdError::generic_err(err.to_string()),
    })
}

fn query_inner(deps: Deps, msg: QueryMsg) -> Result<Binary, ContractError> {
    let res = match msg {
        QueryMsg::Config {} => to_json_binary(&query::query_config(deps)?),

        // Chain directory
        QueryMsg::Chain { chain } => to_json_binary(&query::query_chain(deps, chain)?),
        QueryMsg::Chains { start_after, limit } => {
            to_json_binary(&query::query_chains(deps, start_after, limit)?)
        }

        // Token registry
        QueryMsg::RelayToken { token } => to_json_binary(&query::query_relay_token(deps, token)?),
        QueryMsg::TokenMapping { token, chain_id } => {
            to_json_binary(&query::query_token_mapping(deps, token, chain_id)?)
        }
        QueryMsg::IsBridgeable { token, chain_id } => {
            to_json_binary(&query::query_is_bridgeable(deps, token, chain_id)?)
        }
        QueryMsg::CheckMintable { token } => {
            to_json_binary(&query::query_check_mintable(deps, token)?)
        }
        QueryMsg::VaultToken { token } => to_json_binary(&query::query_vault_token(deps, token)?),
        QueryMsg::VaultBalance { token, chain_id } => {
            to_json_binary(&query::query_vault_balance(deps, token, chain_id)?)
        }
        QueryMsg::ToChainAmount {
            token,
            amount,
            from_chain,
            to_chain,
        } => to_json_binary(&query::query_to_chain_amount(
            deps, token, amount, from_chain, to_chain,
        )?),
        QueryMsg::TargetAmount {
            from_chain,
            from_token,
            to_chain,
            amount,
        } => to_json_binary(&query::query_target_amount(
            deps, from_chain, from_token, to_chain, amount,
        )?),
        QueryMsg::TargetToken {
            from_chain,
            from_token,
            to_chain,
        } => to_json_binary(&query::query_target_token(
            deps, from_chain, from_token, to_chain,
        )?),
        QueryMsg::RelayChainToken {
            chain_id,
            target_token,
        } => to_json_binary(&query::query_relay_chain_token(
            deps,
            chain_id,
            target_token,
        )?),

        // Fees
        QueryMsg::TransferFee {
            caller,
            token,
            amount,
            from_chain,
            to_chain,
            with_swap,
        } => to_json_binary(&query::query_transfer_fee(
            deps, caller, token, amount, from_chain, to_chain, with_swap,
        )?),
        QueryMsg::TransferInFee {
            caller,
            token,
            amount,
            from_chain,
        } => to_json_binary(&query::query_transfer_in_fee(
            deps, caller, token, amount, from_chain,
        )?),
        QueryMsg::TransferOutFee {
            caller,
            token,
            amount,
            from_chain,
            to_chain,
            with_swap,
        } => to_json_binary(&query::query_transfer_out_fee(
            deps, caller, token, amount, from_chain, to_chain, with_swap,
        )?),
        QueryMsg::CallerFeeRate {
            token,
            from_chain,
            to_chain,
            caller,
        } => to_json_binary(&query::query_caller_fee_rate(
            deps, token, from_chain, to_chain, caller,
        )?),
        QueryMsg::ToChainCallerFeeRate {
            token,
            from_chain,
            to_chain,
            caller,
        } => to_json_binary(&query::query_to_chain_caller_fee_rate(
            deps, token, from_chain, to_chain, caller,
        )?),
        QueryMsg::FromChainCallerFeeRate {
            token,
            from_chain,
            caller,
        } => to_json_binary(&query::query_from_chain_caller_fee_rate(
            deps, token, from_chain, caller,
        )?),
        QueryMsg::FromChainFee { token, chain_id } => {
            to_json_binary(&query::query_from_chain_fee(deps, token, chain_id)?)
        }
        QueryMsg::ToChainTokenFee { token, chain_id } => {
            to_json_binary(&query::query_to_chain_token_fee(deps, token, chain_id)?)
        }
        QueryMsg::BaseFee { token, chain_id } => {
            to_json_binary(&query::query_base_fee(deps, token, chain_id)?)
        }
        QueryMsg::DistributeRate { kind } => {
            to_json_binary(&query::query_distribute_rate(deps, kind)?)
        }
        QueryMsg::FeeBalance { receiver, token } => {
            to_json_binary(&query::query_fee_balance(deps, receiver, token)?)
        }

        // Deposit whitelist
        QueryMsg::DepositWhitelistEnabled {} => {
            to_json_binary(&deposit_whitelist_enabled(deps.storage)?)
        }
        QueryMsg::InDepositWhitelist { account } => {
            to_json_binary(&query::query_in_deposit_whitelist(deps, account)?)
        }
        QueryMsg::DepositLimit { token } => {
            to_json_binary(&deposit_limit(deps.storage, &token)?)
        }

        // Orders
        QueryMsg::OutOrder { order_id } => to_json_binary(&query::query_out_order(deps, order_id)?),
        QueryMsg::InOrder { order_id } => to_json_binary(&query::query_in_order(deps, order_id)?),
        QueryMsg::Delivery { order_id } => to_json_binary(&query::query_delivery(deps, order_id)?),

        // Authority
        QueryMsg::CanCall { caller, selector } => {
            to_json_binary(&query::query_can_call(deps, caller, selector)?)
        }
        QueryMsg::HasRole { role, account } => {
            to_json_binary(&query::query_has_role(deps, role, account)?)
        }
        QueryMsg::FunctionAccess { selector } => {
            to_json_binary(&query::query_function_access(deps, selector)?)
        }
    }?;
    Ok(res)
}

// ============================================================================
// Migrate
// ============================================================================

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn migrate(deps: DepsMut, _env: Env, _msg: MigrateMsg) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    Ok(Response::new()
        .add_attribute("action", "migrate")
        .add_attribute("version", CONTRACT_VERSION))
}
