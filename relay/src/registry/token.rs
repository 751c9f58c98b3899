//! Token registry handlers.
//!
//! This module handles:
//! - Relay token registration and vault binding
//! - Per-chain target token mappings and the bridgeable flag
//! - Fee schedules, base fees and caller whitelists

use common::AssetInfo;
use cosmwasm_std::{Binary, DepsMut, Event, MessageInfo, Response, Storage, Uint128};
use cw20::{Cw20QueryMsg, TokenInfoResponse};
use vault_token::msg::{QueryMsg as VaultQueryMsg, UnderlyingResponse};

use crate::authority::{
    ensure_can_call, MAP_TOKEN, REGISTER_TOKEN, REGISTER_TOKEN_CHAINS, SET_BASE_FEE,
    SET_BASE_FEE_RECEIVER, SET_FROM_CHAIN_FEE, SET_FROM_CHAIN_WHITELIST_FEE_RATE,
    SET_TO_CHAIN_TOKEN_FEE, SET_TO_CHAIN_WHITELIST_FEE_RATE, UNMAP_TOKEN,
};
use crate::error::ContractError;
use crate::fee_math::{validate_rate, validate_schedule};
use crate::registry::chain::{load_chain, parse_chain_address};
use crate::state::{
    from_chain_route_key, to_chain_route_key, BaseFee, FeeSchedule, RelayToken, TokenMapping,
    BASE_FEES, BRIDGEABLE, CONFIG, FROM_CHAIN_FEES, FROM_CHAIN_WHITELIST, NATIVE_DECIMALS,
    RELAY_TOKENS, TARGET_TOKENS, TOKEN_MAPPINGS, TO_CHAIN_FEES, TO_CHAIN_WHITELIST,
    VAULT_BINDINGS,
};

// ============================================================================
// Lookups
// ============================================================================

/// Load a registered relay token
pub fn load_relay_token(storage: &dyn Storage, token: &str) -> Result<RelayToken, ContractError> {
    RELAY_TOKENS
        .may_load(storage, token)?
        .ok_or(ContractError::InvalidRelayToken {
            token: token.to_string(),
        })
}

/// Decimals of a relay token on the relay chain (its self mapping)
pub fn relay_decimals(storage: &dyn Storage, token: &str) -> Result<u8, ContractError> {
    let config = CONFIG.load(storage)?;
    TOKEN_MAPPINGS
        .may_load(storage, (token, config.chain_id))?
        .map(|mapping| mapping.decimals)
        .ok_or(ContractError::InvalidRelayToken {
            token: token.to_string(),
        })
}

pub fn is_bridgeable(
    storage: &dyn Storage,
    token: &str,
    chain_id: u64,
) -> Result<bool, ContractError> {
    Ok(BRIDGEABLE
        .may_load(storage, (token, chain_id))?
        .unwrap_or(false))
}

// ============================================================================
// Registration
// ============================================================================

/// Register a relay token backed by `vault`, or update its mintable flag.
pub fn execute_register_token(
    deps: DepsMut,
    info: MessageInfo,
    token: AssetInfo,
    vault: String,
    mintable: bool,
) -> Result<Response, ContractError> {
    ensure_can_call(deps.as_ref(), &info.sender, REGISTER_TOKEN)?;

    if token.key().trim().is_empty() || vault.trim().is_empty() {
        return Err(ContractError::ZeroAddress);
    }
    let asset = token.validate(deps.api)?;
    let vault = deps.api.addr_validate(&vault)?;
    if asset.is_native() && mintable {
        return Err(ContractError::InvalidMintable);
    }
    let key = asset.key();

    // The vault must back exactly this token, in both directions
    let underlying: UnderlyingResponse = deps
        .querier
        .query_wasm_smart(&vault, &VaultQueryMsg::Underlying {})
        .map_err(|_| ContractError::InvalidVault)?;
    if underlying.underlying != key {
        return Err(ContractError::InvalidVault);
    }
    if let Some(existing) = RELAY_TOKENS.may_load(deps.storage, &key)? {
        if existing.vault_token != vault {
            return Err(ContractError::InvalidVault);
        }
    }
    if let Some(bound) = VAULT_BINDINGS.may_load(deps.storage, &vault)? {
        if bound != key {
            return Err(ContractError::InvalidVault);
        }
    }

    let decimals = match &asset {
        AssetInfo::Native { .. } => NATIVE_DECIMALS,
        AssetInfo::Cw20 { contract_addr } => {
            let info: TokenInfoResponse = deps
                .querier
                .query_wasm_smart(contract_addr, &Cw20QueryMsg::TokenInfo {})?;
            info.decimals
        }
    };

    RELAY_TOKENS.save(
        deps.storage,
        &key,
        &RelayToken {
            asset,
            mintable,
            vault_token: vault.clone(),
        },
    )?;
    VAULT_BINDINGS.save(deps.storage, &vault, &key)?;

    let config = CONFIG.load(deps.storage)?;
    TOKEN_MAPPINGS.save(
        deps.storage,
        (key.as_str(), config.chain_id),
        &TokenMapping {
            target_token: Binary::from(key.as_bytes()),
            decimals,
            mintable,
        },
    )?;
    TARGET_TOKENS.save(deps.storage, (config.chain_id, key.as_bytes()), &key)?;

    Ok(Response::new()
        .add_attribute("method", "register_token")
        .add_attribute("token", key)
        .add_attribute("vault", vault)
        .add_attribute("decimals", decimals.to_string())
        .add_attribute("mintable", mintable.to_string()))
}

/// Map a relay token to its representation on `chain_id`.
pub fn execute_map_token(
    deps: DepsMut,
    info: MessageInfo,
    token: String,
    chain_id: u64,
    target_token: String,
    decimals: u8,
    mintable: bool,
) -> Result<Response, ContractError> {
    ensure_can_call(deps.as_ref(), &info.sender, MAP_TOKEN)?;

    load_relay_token(deps.storage, &token)?;
    let chain = load_chain(deps.storage, chain_id)?;
    let config = CONFIG.load(deps.storage)?;
    if chain_id == config.chain_id {
        return Err(ContractError::RelayChainForbidden);
    }
    if target_token.trim().is_empty() {
        return Err(ContractError::EmptyTargetToken);
    }
    let target = parse_chain_address(chain.kind, &target_token)?;

    let mapping = TokenMapping {
        target_token: Binary::from(target.clone()),
        decimals,
        mintable,
    };
    let existing = TOKEN_MAPPINGS.may_load(deps.storage, (token.as_str(), chain_id))?;
    if existing.as_ref() == Some(&mapping) {
        return Ok(Response::new()
            .add_attribute("method", "map_token")
            .add_attribute("token", token)
            .add_attribute("chain_id", chain_id.to_string())
            .add_attribute("updated", "false"));
    }

    if let Some(owner) = TARGET_TOKENS.may_load(deps.storage, (chain_id, target.as_slice()))? {
        if owner != token {
            return Err(ContractError::TargetTokenTaken { token: owner });
        }
    }
    if let Some(old) = existing {
        TARGET_TOKENS.remove(deps.storage, (chain_id, old.target_token.as_slice()));
    }
    TOKEN_MAPPINGS.save(deps.storage, (token.as_str(), chain_id), &mapping)?;
    TARGET_TOKENS.save(deps.storage, (chain_id, target.as_slice()), &token)?;

    Ok(Response::new()
        .add_attribute("method", "map_token")
        .add_attribute("token", token)
        .add_attribute("chain_id", chain_id.to_string())
        .add_attribute("target_token", chain.kind.format_address(&target))
        .add_attribute("decimals", decimals.to_string())
        .add_attribute("mintable", mintable.to_string())
        .add_attribute("updated", "true"))
}

/// Remove the mapping of a target token.
pub fn execute_unmap_token(
    deps: DepsMut,
    info: MessageInfo,
    chain_id: u64,
    target_token: String,
) -> Result<Response, ContractError> {
    ensure_can_call(deps.as_ref(), &info.sender, UNMAP_TOKEN)?;

    let config = CONFIG.load(deps.storage)?;
    if chain_id == config.chain_id {
        return Err(ContractError::RelayChainForbidden);
    }
    let chain = load_chain(deps.storage, chain_id)?;
    let target = parse_chain_address(chain.kind, &target_token)?;
    let token = TARGET_TOKENS
        .may_load(deps.storage, (chain_id, target.as_slice()))?
        .ok_or(ContractError::TokenNotMapped)?;

    TARGET_TOKENS.remove(deps.storage, (chain_id, target.as_slice()));
    TOKEN_MAPPINGS.remove(deps.storage, (token.as_str(), chain_id));
    BRIDGEABLE.remove(deps.storage, (token.as_str(), chain_id));

    Ok(Response::new()
        .add_attribute("method", "unmap_token")
        .add_attribute("token", token)
        .add_attribute("chain_id", chain_id.to_string()))
}

/// Toggle the bridgeable flag of a token for each chain.
pub fn execute_register_token_chains(
    deps: DepsMut,
    info: MessageInfo,
    token: String,
    chain_ids: Vec<u64>,
    enable: bool,
) -> Result<Response, ContractError> {
    ensure_can_call(deps.as_ref(), &info.sender, REGISTER_TOKEN_CHAINS)?;
    load_relay_token(deps.storage, &token)?;

    let mut events = Vec::with_capacity(chain_ids.len());
    for chain_id in chain_ids {
        load_chain(deps.storage, chain_id)?;
        BRIDGEABLE.save(deps.storage, (token.as_str(), chain_id), &enable)?;
        events.push(
            Event::new("register_token_chain")
                .add_attribute("token", &token)
                .add_attribute("chain_id", chain_id.to_string())
                .add_attribute("enable", enable.to_string()),
        );
    }

    Ok(Response::new()
        .add_attribute("method", "register_token_chains")
        .add_attribute("token", token)
        .add_events(events))
}

// ============================================================================
// Fees
// ============================================================================

pub fn execute_set_from_chain_fee(
    deps: DepsMut,
    info: MessageInfo,
    token: String,
    from_chain: u64,
    schedule: FeeSchedule,
) -> Result<Response, ContractError> {
    ensure_can_call(deps.as_ref(), &info.sender, SET_FROM_CHAIN_FEE)?;
    validate_schedule(&schedule)?;
    load_relay_token(deps.storage, &token)?;

    FROM_CHAIN_FEES.save(deps.storage, (token.as_str(), from_chain), &schedule)?;

    Ok(Response::new()
        .add_attribute("method", "set_from_chain_fee")
        .add_attribute("token", token)
        .add_attribute("from_chain", from_chain.to_string())
        .add_attribute("lowest", schedule.lowest)
        .add_attribute("highest", schedule.highest)
        .add_attribute("rate", schedule.rate.to_string()))
}

pub fn execute_set_to_chain_token_fee(
    deps: DepsMut,
    info: MessageInfo,
    token: String,
    to_chain: u64,
    schedule: FeeSchedule,
) -> Result<Response, ContractError> {
    ensure_can_call(deps.as_ref(), &info.sender, SET_TO_CHAIN_TOKEN_FEE)?;
    validate_schedule(&schedule)?;
    load_relay_token(deps.storage, &token)?;

    TO_CHAIN_FEES.save(deps.storage, (token.as_str(), to_chain), &schedule)?;

    Ok(Response::new()
        .add_attribute("method", "set_to_chain_token_fee")
        .add_attribute("token", token)
        .add_attribute("to_chain", to_chain.to_string())
        .add_attribute("lowest", schedule.lowest)
        .add_attribute("highest", schedule.highest)
        .add_attribute("rate", schedule.rate.to_string()))
}

pub fn execute_set_base_fee(
    deps: DepsMut,
    info: MessageInfo,
    token: String,
    to_chain: u64,
    with_swap: Uint128,
    no_swap: Uint128,
) -> Result<Response, ContractError> {
    ensure_can_call(deps.as_ref(), &info.sender, SET_BASE_FEE)?;
    load_relay_token(deps.storage, &token)?;

    BASE_FEES.save(
        deps.storage,
        (token.as_str(), to_chain),
        &BaseFee { with_swap, no_swap },
    )?;

    Ok(Response::new()
        .add_attribute("method", "set_base_fee")
        .add_attribute("token", token)
        .add_attribute("to_chain", to_chain.to_string())
        .add_attribute("with_swap", with_swap)
        .add_attribute("no_swap", no_swap))
}

#[allow(clippy::too_many_arguments)]
pub fn execute_set_to_chain_whitelist_fee_rate(
    deps: DepsMut,
    info: MessageInfo,
    token: String,
    from_chain: u64,
    to_chain: u64,
    caller: String,
    rate: u32,
    enable: bool,
) -> Result<Response, ContractError> {
    ensure_can_call(deps.as_ref(), &info.sender, SET_TO_CHAIN_WHITELIST_FEE_RATE)?;
    validate_rate(rate)?;
    load_relay_token(deps.storage, &token)?;
    let from = load_chain(deps.storage, from_chain)?;
    let caller_bytes = parse_chain_address(from.kind, &caller)?;

    let key = to_chain_route_key(from_chain, to_chain, &caller_bytes);
    if enable {
        TO_CHAIN_WHITELIST.save(deps.storage, (token.as_str(), key.as_slice()), &rate)?;
    } else {
        TO_CHAIN_WHITELIST.remove(deps.storage, (token.as_str(), key.as_slice()));
    }

    Ok(Response::new()
        .add_attribute("method", "set_to_chain_whitelist_fee_rate")
        .add_attribute("token", token)
        .add_attribute("from_chain", from_chain.to_string())
        .add_attribute("to_chain", to_chain.to_string())
        .add_attribute("caller", caller)
        .add_attribute("rate", rate.to_string())
        .add_attribute("enable", enable.to_string()))
}

pub fn execute_set_from_chain_whitelist_fee_rate(
    deps: DepsMut,
    info: MessageInfo,
    token: String,
    from_chain: u64,
    caller: String,
    rate: u32,
    enable: bool,
) -> Result<Response, ContractError> {
    ensure_can_call(deps.as_ref(), &info.sender, SET_FROM_CHAIN_WHITELIST_FEE_RATE)?;
    validate_rate(rate)?;
    load_relay_token(deps.storage, &token)?;
    let from = load_chain(deps.storage, from_chain)?;
    let caller_bytes = parse_chain_address(from.kind, &caller)?;

    let key = from_chain_route_key(from_chain, &caller_bytes);
    if enable {
        FROM_CHAIN_WHITELIST.save(deps.storage, (token.as_str(), key.as_slice()), &rate)?;
    } else {
        FROM_CHAIN_WHITELIST.remove(deps.storage, (token.as_str(), key.as_slice()));
    }

    Ok(Response::new()
        .add_attribute("method", "set_from_chain_whitelist_fee_rate")
        .add_attribute("token", token)
        .add_attribute("from_chain", from_chain.to_string())
        .add_attribute("caller", caller)
        .add_attribute("rate", rate.to_string())
        .add_attribute("enable", enable.to_string()))
}

pub fn execute_set_base_fee_receiver(
    deps: DepsMut,
    info: MessageInfo,
    receiver: String,
) -> Result<Response, ContractError> {
    ensure_can_call(deps.as_ref(), &info.sender, SET_BASE_FEE_RECEIVER)?;
    if receiver.trim().is_empty() {
        return Err(ContractError::ZeroAddress);
    }
    let receiver = deps.api.addr_validate(&receiver)?;

    let mut config = CONFIG.load(deps.storage)?;
    config.base_fee_receiver = receiver.clone();
    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new()
        .add_attribute("method", "set_base_fee_receiver")
        .add_attribute("receiver", receiver))
}
