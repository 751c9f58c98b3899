//! Protocol Fee Distributor - Entry Points

use common::AssetInfo;
use cosmwasm_std::{
    entry_point, to_json_binary, Addr, Binary, Deps, DepsMut, Env, MessageInfo, Response,
    StdResult, Storage, Uint128,
};
use cw2::set_contract_version;
use cw20::Cw20ReceiveMsg;

use crate::error::ContractError;
use crate::msg::{
    ConfigResponse, DistributionResponse, ExecuteMsg, FeePart, InstantiateMsg, MigrateMsg,
    QueryMsg,
};
use crate::state::{
    Config, FeeType, CONFIG, CONTRACT_NAME, CONTRACT_VERSION, MAX_TOTAL_SHARE, RECEIVERS, SHARES,
    TOKENS, TOTAL_SHARE,
};

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
    CONFIG.save(
        deps.storage,
        &Config {
            admin: admin.clone(),
            swap: None,
            fee_treasury: None,
        },
    )?;
    TOTAL_SHARE.save(deps.storage, &0)?;

    Ok(Response::new()
        .add_attribute("action", "instantiate")
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
        ExecuteMsg::UpdateTokens { tokens, add } => execute_update_tokens(deps, info, tokens, add),
        ExecuteMsg::UpdateShares { fee_types, shares } => {
            execute_update_shares(deps, info, fee_types, shares)
        }
        ExecuteMsg::UpdateReceivers {
            fee_types,
            receivers,
        } => execute_update_receivers(deps, info, fee_types, receivers),
        ExecuteMsg::Set { swap, fee_treasury } => execute_set(deps, info, swap, fee_treasury),
        ExecuteMsg::CollectFee {} => execute_collect_native(deps, info),
        ExecuteMsg::Receive(cw20_msg) => execute_receive(deps, info, cw20_msg),
    }
}

fn ensure_admin(storage: &dyn Storage, sender: &Addr) -> Result<Config, ContractError> {
    let config = CONFIG.load(storage)?;
    if *sender != config.admin {
        return Err(ContractError::Unauthorized);
    }
    Ok(config)
}

fn execute_update_tokens(
    deps: DepsMut,
    info: MessageInfo,
    tokens: Vec<String>,
    add: bool,
) -> Result<Response, ContractError> {
    ensure_admin(deps.storage, &info.sender)?;

    for token in &tokens {
        if add {
            TOKENS.save(deps.storage, token, &true)?;
        } else {
            TOKENS.remove(deps.storage, token);
        }
    }

    Ok(Response::new()
        .add_attribute("action", "update_tokens")
        .add_attribute("tokens", tokens.join(","))
        .add_attribute("add", add.to_string()))
}

fn execute_update_shares(
    deps: DepsMut,
    info: MessageInfo,
    fee_types: Vec<FeeType>,
    shares: Vec<u16>,
) -> Result<Response, ContractError> {
    ensure_admin(deps.storage, &info.sender)?;
    if fee_types.len() != shares.len() {
        return Err(ContractError::LengthMismatch {
            left: fee_types.len(),
            right: shares.len(),
        });
    }

    for (fee_type, share) in fee_types.iter().zip(shares.iter()) {
        if *share > MAX_TOTAL_SHARE {
            return Err(ContractError::InvalidShare {
                share: *share as u32,
            });
        }
        SHARES.save(deps.storage, fee_type.key(), share)?;
    }

    let mut total: u32 = 0;
    for fee_type in FeeType::ALL {
        total += SHARES
            .may_load(deps.storage, fee_type.key())?
            .unwrap_or_default() as u32;
    }
    if total > MAX_TOTAL_SHARE as u32 {
        return Err(ContractError::InvalidShare { share: total });
    }
    TOTAL_SHARE.save(deps.storage, &(total as u16))?;

    Ok(Response::new()
        .add_attribute("action", "update_shares")
        .add_attribute("total_share", total.to_string()))
}

fn execute_update_receivers(
    deps: DepsMut,
    info: MessageInfo,
    fee_types: Vec<FeeType>,
    receivers: Vec<String>,
) -> Result<Response, ContractError> {
    ensure_admin(deps.storage, &info.sender)?;
    if fee_types.len() != receivers.len() {
        return Err(ContractError::LengthMismatch {
            left: fee_types.len(),
            right: receivers.len(),
        });
    }

    let mut response = Response::new().add_attribute("action", "update_receivers");
    for (fee_type, receiver) in fee_types.iter().zip(receivers.iter()) {
        let receiver = deps.api.addr_validate(receiver)?;
        RECEIVERS.save(deps.storage, fee_type.key(), &receiver)?;
        response = response.add_attribute(fee_type.as_str(), receiver);
    }
    Ok(response)
}

fn execute_set(
    deps: DepsMut,
    info: MessageInfo,
    swap: String,
    fee_treasury: String,
) -> Result<Response, ContractError> {
    let mut config = ensure_admin(deps.storage, &info.sender)?;
    config.swap = Some(deps.api.addr_validate(&swap)?);
    config.fee_treasury = Some(deps.api.addr_validate(&fee_treasury)?);
    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new()
        .add_attribute("action", "set")
        .add_attribute("swap", swap)
        .add_attribute("fee_treasury", fee_treasury))
}

fn execute_collect_native(deps: DepsMut, info: MessageInfo) -> Result<Response, ContractError> {
    if info.funds.is_empty() {
        return Err(ContractError::NoFundsSent);
    }

    let mut response = Response::new().add_attribute("action", "collect_fee");
    for coin in &info.funds {
        let asset = AssetInfo::Native {
            denom: coin.denom.clone(),
        };
        response = distribute(deps.storage, &info.sender, asset, coin.amount, response)?;
    }
    Ok(response)
}

fn execute_receive(
    deps: DepsMut,
    info: MessageInfo,
    cw20_msg: Cw20ReceiveMsg,
) -> Result<Response, ContractError> {
    let reporter = deps.api.addr_validate(&cw20_msg.sender)?;
    let asset = AssetInfo::Cw20 {
        contract_addr: info.sender,
    };
    let response = Response::new().add_attribute("action", "collect_fee");
    distribute(deps.storage, &reporter, asset, cw20_msg.amount, response)
}

fn distribute(
    storage: &dyn Storage,
    reporter: &Addr,
    asset: AssetInfo,
    amount: Uint128,
    mut response: Response,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(storage)?;
    let authorized = config.swap.as_ref() == Some(reporter)
        || config.fee_treasury.as_ref() == Some(reporter);
    if !authorized {
        return Err(ContractError::UnauthorizedReporter);
    }
    let token = asset.key();
    if !TOKENS.may_load(storage, &token)?.unwrap_or(false) {
        return Err(ContractError::TokenNotSupported { token });
    }
    let treasury = config.fee_treasury.ok_or(ContractError::TreasuryNotSet)?;

    let split = split_amount(storage, amount)?;
    for part in &split.parts {
        if let (Some(receiver), false) = (&part.receiver, part.amount.is_zero()) {
            response = response
                .add_message(asset.transfer_msg(receiver, part.amount)?)
                .add_attribute(part.fee_type.as_str(), part.amount);
        }
    }
    if !split.remainder.is_zero() {
        response = response.add_message(asset.transfer_msg(&treasury, split.remainder)?);
    }

    Ok(response
        .add_attribute("token", token)
        .add_attribute("amount", amount)
        .add_attribute("treasury_amount", split.remainder))
}

/// Split `amount` by the configured shares. Parts of types without a receiver
/// fold into the remainder.
pub fn split_amount(storage: &dyn Storage, amount: Uint128) -> StdResult<DistributionResponse> {
    let total_share = TOTAL_SHARE.may_load(storage)?.unwrap_or_default();
    let mut parts = Vec::with_capacity(FeeType::ALL.len());
    let mut paid = Uint128::zero();

    for fee_type in FeeType::ALL {
        let share = SHARES.may_load(storage, fee_type.key())?.unwrap_or_default();
        let receiver = RECEIVERS.may_load(storage, fee_type.key())?;
        let part = if total_share == 0 || receiver.is_none() {
            Uint128::zero()
        } else {
            amount.multiply_ratio(share as u128, total_share as u128)
        };
        paid += part;
        parts.push(FeePart {
            fee_type,
            receiver,
            amount: part,
        });
    }

    Ok(DistributionResponse {
        parts,
        remainder: amount - paid,
    })
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
                swap: config.swap,
                fee_treasury: config.fee_treasury,
                total_share: TOTAL_SHARE.may_load(deps.storage)?.unwrap_or_default(),
            })
        }
        QueryMsg::FeeShare { fee_type } => to_json_binary(
            &SHARES
                .may_load(deps.storage, fee_type.key())?
                .unwrap_or_default(),
        ),
        QueryMsg::TotalShare {} => {
            to_json_binary(&TOTAL_SHARE.may_load(deps.storage)?.unwrap_or_default())
        }
        QueryMsg::FeeReceiver { fee_type } => {
            to_json_binary(&RECEIVERS.may_load(deps.storage, fee_type.key())?)
        }
        QueryMsg::IsToken { token } => {
            to_json_binary(&TOKENS.may_load(deps.storage, &token)?.unwrap_or(false))
        }
        QueryMsg::Distribution { amount } => to_json_binary(&split_amount(deps.storage, amount)?),
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
