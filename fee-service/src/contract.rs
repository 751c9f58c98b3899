//! Fee Service Contract - Entry Points

use cosmwasm_std::{
    entry_point, to_json_binary, Addr, Binary, Deps, DepsMut, Env, MessageInfo, Response,
    StdError, StdResult, Uint128,
};
use cw2::set_contract_version;

use crate::error::ContractError;
use crate::msg::{
    ConfigResponse, ExecuteMsg, InstantiateMsg, MigrateMsg, QueryMsg, ServiceMessageFeeResponse,
};
use crate::state::{
    Config, BASE_GAS, CHAIN_GAS_PRICE, CONFIG, CONTRACT_NAME, CONTRACT_VERSION,
    DEFAULT_TOKEN_DECIMALS, MANAGERS, PRICE_DECIMALS, TOKEN_DECIMALS,
};

/// Largest decimals whose scale factor fits a Uint128
const MAX_TOKEN_DECIMALS: u8 = 36;

// ============================================================================
// Instantiate
// ============================================================================

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn instantiate(
    deps: DepsMut,
    _env: Env,
    _info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    let admin = deps.api.addr_validate(&msg.admin)?;
    let fee_receiver = msg
        .fee_receiver
        .map(|r| deps.api.addr_validate(&r))
        .transpose()?;

    CONFIG.save(
        deps.storage,
        &Config {
            admin: admin.clone(),
            fee_receiver,
        },
    )?;

    Ok(Response::new()
        .add_attribute("method", "instantiate")
        .add_attribute("admin", admin))
}

// ============================================================================
// Execute
// ============================================================================

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn execute(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    match msg {
        ExecuteMsg::UpdateManager { manager, enable } => {
            execute_update_manager(deps, info, manager, enable)
        }
        ExecuteMsg::SetBaseGas { chain_id, gas } => {
            ensure_manager(deps.as_ref(), &info.sender)?;
            BASE_GAS.save(deps.storage, chain_id, &gas)?;
            Ok(Response::new()
                .add_attribute("method", "set_base_gas")
                .add_attribute("chain_id", chain_id.to_string())
                .add_attribute("gas", gas))
        }
        ExecuteMsg::SetChainGasPrice {
            chain_id,
            fee_token,
            price,
        } => {
            ensure_manager(deps.as_ref(), &info.sender)?;
            CHAIN_GAS_PRICE.save(deps.storage, (chain_id, &fee_token), &price)?;
            Ok(Response::new()
                .add_attribute("method", "set_chain_gas_price")
                .add_attribute("chain_id", chain_id.to_string())
                .add_attribute("fee_token", fee_token)
                .add_attribute("price", price))
        }
        ExecuteMsg::SetTokenDecimals {
            fee_token,
            decimals,
        } => {
            ensure_manager(deps.as_ref(), &info.sender)?;
            if decimals > MAX_TOKEN_DECIMALS {
                return Err(ContractError::InvalidDecimals { decimals });
            }
            TOKEN_DECIMALS.save(deps.storage, &fee_token, &decimals)?;
            Ok(Response::new()
                .add_attribute("method", "set_token_decimals")
                .add_attribute("fee_token", fee_token)
                .add_attribute("decimals", decimals.to_string()))
        }
        ExecuteMsg::SetFeeReceiver { receiver } => {
            ensure_manager(deps.as_ref(), &info.sender)?;
            let receiver = deps.api.addr_validate(&receiver)?;
            CONFIG.update(deps.storage, |mut config| -> StdResult<_> {
                config.fee_receiver = Some(receiver.clone());
                Ok(config)
            })?;
            Ok(Response::new()
                .add_attribute("method", "set_fee_receiver")
                .add_attribute("receiver", receiver))
        }
    }
}

fn execute_update_manager(
    deps: DepsMut,
    info: MessageInfo,
    manager: String,
    enable: bool,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    if info.sender != config.admin {
        return Err(ContractError::Unauthorized);
    }
    let manager = deps.api.addr_validate(&manager)?;
    if enable {
        MANAGERS.save(deps.storage, &manager, &true)?;
    } else {
        MANAGERS.remove(deps.storage, &manager);
    }
    Ok(Response::new()
        .add_attribute("method", "update_manager")
        .add_attribute("manager", manager)
        .add_attribute("enable", enable.to_string()))
}

/// The admin always counts as a manager.
fn ensure_manager(deps: Deps, sender: &Addr) -> Result<(), ContractError> {
    let config = CONFIG.load(deps.storage)?;
    if *sender == config.admin || MANAGERS.may_load(deps.storage, sender)?.unwrap_or(false) {
        Ok(())
    } else {
        Err(ContractError::NotManager)
    }
}

/// Quote the message fee for `gas_limit` on `chain_id`, paid in `fee_token`.
pub fn service_message_fee(
    deps: Deps,
    chain_id: u64,
    fee_token: &str,
    gas_limit: Uint128,
) -> Result<ServiceMessageFeeResponse, ContractError> {
    let base_gas = BASE_GAS
        .may_load(deps.storage, chain_id)?
        .unwrap_or_default();
    if base_gas.is_zero() {
        return Err(ContractError::UnsupportedChain { chain_id });
    }
    let price = CHAIN_GAS_PRICE
        .may_load(deps.storage, (chain_id, fee_token))?
        .unwrap_or_default();
    let decimals = TOKEN_DECIMALS
        .may_load(deps.storage, fee_token)?
        .unwrap_or(DEFAULT_TOKEN_DECIMALS);

    let raw = base_gas.checked_add(gas_limit)?.checked_mul(price)?;
    let fee = scale_decimals(raw, PRICE_DECIMALS, decimals)?;

    Ok(ServiceMessageFeeResponse {
        fee,
        receiver: CONFIG.load(deps.storage)?.fee_receiver,
    })
}

fn scale_decimals(amount: Uint128, from: u8, to: u8) -> Result<Uint128, ContractError> {
    if from == to {
        return Ok(amount);
    }
    if from > to {
        let factor = Uint128::new(10u128.pow((from - to) as u32));
        Ok(amount.checked_div(factor).map_err(StdError::divide_by_zero)?)
    } else {
        let factor = Uint128::new(10u128.pow((to - from) as u32));
        Ok(amount.checked_mul(factor)?)
    }
}

// ============================================================================
// Query
// ============================================================================

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn query(deps: Deps, _env: Env, msg: QueryMsg) -> StdResult<Binary> {
    match msg {
        QueryMsg::Config {} => {
            let config = CONFIG.load(deps.storage)?;
            to_json_binary(&ConfigResponse {
                admin: config.admin,
                fee_receiver: config.fee_receiver,
            })
        }
        QueryMsg::BaseGas { chain_id } => to_json_binary(
            &BASE_GAS
                .may_load(deps.storage, chain_id)?
                .unwrap_or_default(),
        ),
        QueryMsg::ChainGasPrice {
            chain_id,
            fee_token,
        } => to_json_binary(
            &CHAIN_GAS_PRICE
                .may_load(deps.storage, (chain_id, &fee_token))?
                .unwrap_or_default(),
        ),
        QueryMsg::TokenDecimals { fee_token } => to_json_binary(
            &TOKEN_DECIMALS
                .may_load(deps.storage, &fee_token)?
                .unwrap_or(DEFAULT_TOKEN_DECIMALS),
        ),
        QueryMsg::ServiceMessageFee {
            chain_id,
            fee_token,
            gas_limit,
        } => {
            let quote = service_message_fee(deps, chain_id, &fee_token, gas_limit)
                .map_err(|e| StdError::generic_err(e.to_string()))?;
            to_json_binary(&quote)
        }
    }
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
