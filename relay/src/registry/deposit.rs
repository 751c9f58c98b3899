//! Deposit whitelist.
//!
//! Local vault deposits can be restricted to whitelisted senders and capped
//! per relay token. Whitelist membership and limits are maintained by
//! managers; switching the whitelist on or off stays with the admin.
//! Inbound `DEPOSIT` messages are gated on their source chain and are not
//! checked here.

use cosmwasm_std::{Addr, Deps, DepsMut, MessageInfo, Response, Storage, Uint128};

use crate::authority::{
    ensure_can_call, SET_DEPOSIT_WHITELIST, UPDATE_DEPOSIT_LIMITS, UPDATE_DEPOSIT_WHITELIST,
};
use crate::error::ContractError;
use crate::registry::load_relay_token;
use crate::state::{DEPOSIT_LIMITS, DEPOSIT_WHITELIST, DEPOSIT_WHITELIST_ENABLED};

pub fn execute_set_deposit_whitelist(
    deps: DepsMut,
    info: MessageInfo,
    enabled: bool,
) -> Result<Response, ContractError> {
    ensure_can_call(deps.as_ref(), &info.sender, SET_DEPOSIT_WHITELIST)?;
    DEPOSIT_WHITELIST_ENABLED.save(deps.storage, &enabled)?;

    Ok(Response::new()
        .add_attribute("method", "set_deposit_whitelist")
        .add_attribute("enabled", enabled.to_string()))
}

pub fn execute_update_deposit_whitelist(
    deps: DepsMut,
    info: MessageInfo,
    accounts: Vec<String>,
    enable: bool,
) -> Result<Response, ContractError> {
    ensure_can_call(deps.as_ref(), &info.sender, UPDATE_DEPOSIT_WHITELIST)?;

    let mut updated = Vec::with_capacity(accounts.len());
    for account in &accounts {
        let account = deps.api.addr_validate(account)?;
        if enable {
            DEPOSIT_WHITELIST.save(deps.storage, &account, &true)?;
        } else {
            DEPOSIT_WHITELIST.remove(deps.storage, &account);
        }
        updated.push(account.to_string());
    }

    Ok(Response::new()
        .add_attribute("method", "update_deposit_whitelist")
        .add_attribute("accounts", updated.join(","))
        .add_attribute("enable", enable.to_string()))
}

/// A zero limit removes the token's cap.
pub fn execute_update_deposit_limits(
    deps: DepsMut,
    info: MessageInfo,
    tokens: Vec<String>,
    limits: Vec<Uint128>,
) -> Result<Response, ContractError> {
    ensure_can_call(deps.as_ref(), &info.sender, UPDATE_DEPOSIT_LIMITS)?;
    if tokens.len() != limits.len() {
        return Err(ContractError::LengthMismatch {
            left: tokens.len(),
            right: limits.len(),
        });
    }

    let mut response = Response::new().add_attribute("method", "update_deposit_limits");
    for (token, limit) in tokens.iter().zip(limits) {
        load_relay_token(deps.storage, token)?;
        if limit.is_zero() {
            DEPOSIT_LIMITS.remove(deps.storage, token);
        } else {
            DEPOSIT_LIMITS.save(deps.storage, token, &limit)?;
        }
        response = response.add_attribute(format!("limit_{}", token), limit);
    }
    Ok(response)
}

pub fn is_deposit_whitelisted(storage: &dyn Storage, account: &Addr) -> Result<bool, ContractError> {
    Ok(DEPOSIT_WHITELIST.may_load(storage, account)?.unwrap_or(false))
}

pub fn deposit_limit(storage: &dyn Storage, token: &str) -> Result<Option<Uint128>, ContractError> {
    Ok(DEPOSIT_LIMITS.may_load(storage, token)?)
}

pub fn deposit_whitelist_enabled(storage: &dyn Storage) -> Result<bool, ContractError> {
    Ok(DEPOSIT_WHITELIST_ENABLED
        .may_load(storage)?
        .unwrap_or(false))
}

/// Reject a local deposit of `amount` of `token` by `depositor` when the
/// whitelist or the token's limit forbids it.
pub fn check_deposit(
    deps: Deps,
    depositor: &Addr,
    token: &str,
    amount: Uint128,
) -> Result<(), ContractError> {
    if deposit_whitelist_enabled(deps.storage)?
        && !is_deposit_whitelisted(deps.storage, depositor)?
    {
        return Err(ContractError::DepositorNotWhitelisted {
            depositor: depositor.to_string(),
        });
    }
    if let Some(limit) = deposit_limit(deps.storage, token)? {
        if amount > limit {
            return Err(ContractError::DepositLimitExceeded { amount, limit });
        }
    }
    Ok(())
}
