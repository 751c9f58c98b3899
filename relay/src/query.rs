//! Query handlers for the Omnirelay hub contract.
//!
//! Handlers return `ContractError` so registry lookups share their error
//! messages with the execute path; the entry point flattens them into
//! `StdError`.

use cosmwasm_std::{Addr, Binary, Deps, Int128, Order as StorageOrder, StdResult, Uint128};
use cw_storage_plus::Bound;

use crate::authority::{can_call, function_access, has_role, Access, Role};
use crate::error::ContractError;
use crate::execute::load_distribute_rate;
use crate::fee_math::{
    caller_fee_rate, convert_decimals, from_chain_caller_fee_rate, to_chain_caller_fee_rate,
    transfer_fee, transfer_in_fee,
};
use crate::msg::{
    AmountResponse, CallerFeeRateResponse, ChainRef, ChainResponse, ChainsResponse,
    ConfigResponse, DistributeRateResponse, RelayTokenResponse, TargetTokenResponse,
    TokenMappingResponse, TransferFeeResponse, TransferOutFeeResponse,
};
use crate::registry::chain::parse_chain_address;
use crate::registry::deposit::is_deposit_whitelisted;
use crate::registry::token::is_bridgeable;
use crate::registry::{load_chain, load_relay_token, resolve_chain};
use crate::state::{
    BaseFee, Chain, Delivery, DistributeKind, FeeSchedule, Order, TokenMapping, BASE_FEES, CHAINS,
    CONFIG, DELIVERIES, FEE_LIST, FROM_CHAIN_FEES, IN_ORDERS, NONCE, OUT_ORDERS, RELAY_TOKENS,
    TARGET_TOKENS, TOKEN_MAPPINGS, TO_CHAIN_FEES,
};
use crate::vault::query_net_flow;

// ============================================================================
// Core Queries
// ============================================================================

pub fn query_config(deps: Deps) -> Result<ConfigResponse, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    Ok(ConfigResponse {
        admin: config.admin,
        paused: config.paused,
        chain_id: config.chain_id,
        native_denom: config.native_denom,
        base_fee_receiver: config.base_fee_receiver,
        nonce: NONCE.may_load(deps.storage)?.unwrap_or_default(),
    })
}

// ============================================================================
// Chain Queries
// ============================================================================

fn chain_response(chain: Chain) -> ChainResponse {
    ChainResponse {
        chain_id: chain.chain_id,
        mos_text: chain.kind.format_address(&chain.mos),
        name: chain.name,
        kind: chain.kind,
        mos: chain.mos,
        wrapped_native_token: chain.wrapped_native_token,
        light_client: chain.light_client,
        fee_service: chain.fee_service,
    }
}

pub fn query_chain(deps: Deps, chain: ChainRef) -> Result<ChainResponse, ContractError> {
    Ok(chain_response(resolve_chain(deps.storage, chain)?))
}

/// Query paginated list of chains.
pub fn query_chains(
    deps: Deps,
    start_after: Option<u64>,
    limit: Option<u32>,
) -> Result<ChainsResponse, ContractError> {
    let limit = limit.unwrap_or(10).min(50) as usize;
    let start = start_after.map(Bound::exclusive);

    let chains = CHAINS
        .range(deps.storage, start, None, StorageOrder::Ascending)
        .take(limit)
        .map(|item| item.map(|(_, chain)| chain_response(chain)))
        .collect::<StdResult<Vec<_>>>()?;

    Ok(ChainsResponse { chains })
}

// ============================================================================
// Token Queries
// ============================================================================

pub fn query_relay_token(deps: Deps, token: String) -> Result<RelayTokenResponse, ContractError> {
    let relay_token = load_relay_token(deps.storage, &token)?;
    Ok(RelayTokenResponse {
        token,
        asset: relay_token.asset,
        mintable: relay_token.mintable,
        vault_token: relay_token.vault_token,
    })
}

fn load_mapping(
    deps: Deps,
    token: &str,
    chain_id: u64,
) -> Result<TokenMapping, ContractError> {
    TOKEN_MAPPINGS
        .may_load(deps.storage, (token, chain_id))?
        .ok_or(ContractError::TokenNotMapped)
}

pub fn query_token_mapping(
    deps: Deps,
    token: String,
    chain_id: u64,
) -> Result<TokenMappingResponse, ContractError> {
    let chain = load_chain(deps.storage, chain_id)?;
    let mapping = load_mapping(deps, &token, chain_id)?;
    Ok(TokenMappingResponse {
        bridgeable: is_bridgeable(deps.storage, &token, chain_id)?,
        token,
        chain_id,
        target_token_text: chain.kind.format_address(&mapping.target_token),
        target_token: mapping.target_token,
        decimals: mapping.decimals,
        mintable: mapping.mintable,
    })
}

pub fn query_is_bridgeable(
    deps: Deps,
    token: String,
    chain_id: u64,
) -> Result<bool, ContractError> {
    is_bridgeable(deps.storage, &token, chain_id)
}

pub fn query_check_mintable(deps: Deps, token: String) -> Result<bool, ContractError> {
    Ok(load_relay_token(deps.storage, &token)?.mintable)
}

pub fn query_vault_token(deps: Deps, token: String) -> Result<Addr, ContractError> {
    Ok(load_relay_token(deps.storage, &token)?.vault_token)
}

/// Amount of `token` the relay can still release towards `chain_id`.
/// Unlimited for mintable mappings, zero for unknown tokens.
pub fn query_vault_balance(
    deps: Deps,
    token: String,
    chain_id: u64,
) -> Result<Int128, ContractError> {
    let Some(relay_token) = RELAY_TOKENS.may_load(deps.storage, &token)? else {
        return Ok(Int128::zero());
    };
    let mintable = TOKEN_MAPPINGS
        .may_load(deps.storage, (token.as_str(), chain_id))?
        .map(|mapping| mapping.mintable)
        .unwrap_or(false);
    if mintable {
        return Ok(Int128::MAX);
    }
    Ok(query_net_flow(&deps.querier, &relay_token.vault_token, chain_id)?)
}

/// `amount` of a relay token expressed in `from_chain` decimals, converted
/// to `to_chain` decimals.
pub fn query_to_chain_amount(
    deps: Deps,
    token: String,
    amount: Uint128,
    from_chain: u64,
    to_chain: u64,
) -> Result<AmountResponse, ContractError> {
    let source = load_mapping(deps, &token, from_chain)?;
    let target = load_mapping(deps, &token, to_chain)?;
    Ok(AmountResponse {
        amount: convert_decimals(amount, source.decimals, target.decimals)?,
    })
}

/// Relay token bound to `from_token` on `from_chain`
fn source_relay_token(
    deps: Deps,
    from_chain: u64,
    from_token: &str,
) -> Result<String, ContractError> {
    let chain = load_chain(deps.storage, from_chain)?;
    let source = parse_chain_address(chain.kind, from_token)?;
    TARGET_TOKENS
        .may_load(deps.storage, (from_chain, source.as_slice()))?
        .ok_or(ContractError::TokenNotRegistered {
            token: from_token.to_string(),
        })
}

/// `amount` of `from_token` on `from_chain` converted to the decimals of the
/// same relay token on `to_chain`.
pub fn query_target_amount(
    deps: Deps,
    from_chain: u64,
    from_token: String,
    to_chain: u64,
    amount: Uint128,
) -> Result<AmountResponse, ContractError> {
    let token = source_relay_token(deps, from_chain, &from_token)?;
    let source = load_mapping(deps, &token, from_chain)?;
    let target = load_mapping(deps, &token, to_chain)?;
    Ok(AmountResponse {
        amount: convert_decimals(amount, source.decimals, target.decimals)?,
    })
}

pub fn query_target_token(
    deps: Deps,
    from_chain: u64,
    from_token: String,
    to_chain: u64,
) -> Result<TargetTokenResponse, ContractError> {
    let token = source_relay_token(deps, from_chain, &from_token)?;
    let chain = load_chain(deps.storage, to_chain)?;
    let mapping = load_mapping(deps, &token, to_chain)?;
    Ok(TargetTokenResponse {
        target_token_text: chain.kind.format_address(&mapping.target_token),
        target_token: mapping.target_token,
        decimals: mapping.decimals,
    })
}

pub fn query_relay_chain_token(
    deps: Deps,
    chain_id: u64,
    target_token: String,
) -> Result<String, ContractError> {
    source_relay_token(deps, chain_id, &target_token)
}

// ============================================================================
// Fee Queries
// ============================================================================

/// Caller bytes in `chain_id`'s address format
fn caller_bytes(deps: Deps, chain_id: u64, caller: &str) -> Result<Vec<u8>, ContractError> {
    let chain = load_chain(deps.storage, chain_id)?;
    parse_chain_address(chain.kind, caller)
}

#[allow(clippy::too_many_arguments)]
pub fn query_transfer_fee(
    deps: Deps,
    caller: String,
    token: String,
    amount: Uint128,
    from_chain: u64,
    to_chain: u64,
    with_swap: bool,
) -> Result<TransferFeeResponse, ContractError> {
    let caller = caller_bytes(deps, from_chain, &caller)?;
    let quote = transfer_fee(
        deps.storage,
        &caller,
        &token,
        amount,
        from_chain,
        to_chain,
        with_swap,
    )?;
    Ok(TransferFeeResponse {
        total_fee: quote.total_fee,
        base_fee: quote.base_fee,
        bridge_fee: quote.bridge_fee,
    })
}

pub fn query_transfer_in_fee(
    deps: Deps,
    caller: String,
    token: String,
    amount: Uint128,
    from_chain: u64,
) -> Result<AmountResponse, ContractError> {
    let caller = caller_bytes(deps, from_chain, &caller)?;
    Ok(AmountResponse {
        amount: transfer_in_fee(deps.storage, &caller, &token, amount, from_chain)?,
    })
}

#[allow(clippy::too_many_arguments)]
pub fn query_transfer_out_fee(
    deps: Deps,
    caller: String,
    token: String,
    amount: Uint128,
    from_chain: u64,
    to_chain: u64,
    with_swap: bool,
) -> Result<TransferOutFeeResponse, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    let caller = caller_bytes(deps, from_chain, &caller)?;
    let quote = transfer_fee(
        deps.storage,
        &caller,
        &token,
        amount,
        from_chain,
        to_chain,
        with_swap,
    )?;
    Ok(TransferOutFeeResponse {
        base_receiver: config.base_fee_receiver,
        base_fee: quote.base_fee,
        bridge_fee: quote.bridge_fee,
    })
}

fn caller_rate_response(rate: Option<u32>) -> CallerFeeRateResponse {
    CallerFeeRateResponse {
        whitelisted: rate.is_some(),
        rate: rate.unwrap_or_default(),
    }
}

pub fn query_caller_fee_rate(
    deps: Deps,
    token: String,
    from_chain: u64,
    to_chain: u64,
    caller: String,
) -> Result<CallerFeeRateResponse, ContractError> {
    let caller = caller_bytes(deps, from_chain, &caller)?;
    Ok(caller_rate_response(caller_fee_rate(
        deps.storage,
        &token,
        from_chain,
        to_chain,
        &caller,
    )?))
}

pub fn query_to_chain_caller_fee_rate(
    deps: Deps,
    token: String,
    from_chain: u64,
    to_chain: u64,
    caller: String,
) -> Result<CallerFeeRateResponse, ContractError> {
    let caller = caller_bytes(deps, from_chain, &caller)?;
    Ok(caller_rate_response(to_chain_caller_fee_rate(
        deps.storage,
        &token,
        from_chain,
        to_chain,
        &caller,
    )?))
}

pub fn query_from_chain_caller_fee_rate(
    deps: Deps,
    token: String,
    from_chain: u64,
    caller: String,
) -> Result<CallerFeeRateResponse, ContractError> {
    let caller = caller_bytes(deps, from_chain, &caller)?;
    Ok(caller_rate_response(from_chain_caller_fee_rate(
        deps.storage,
        &token,
        from_chain,
        &caller,
    )?))
}

pub fn query_from_chain_fee(
    deps: Deps,
    token: String,
    chain_id: u64,
) -> Result<Option<FeeSchedule>, ContractError> {
    Ok(FROM_CHAIN_FEES.may_load(deps.storage, (token.as_str(), chain_id))?)
}

pub fn query_to_chain_token_fee(
    deps: Deps,
    token: String,
    chain_id: u64,
) -> Result<Option<FeeSchedule>, ContractError> {
    Ok(TO_CHAIN_FEES.may_load(deps.storage, (token.as_str(), chain_id))?)
}

pub fn query_base_fee(deps: Deps, token: String, chain_id: u64) -> Result<BaseFee, ContractError> {
    Ok(BASE_FEES
        .may_load(deps.storage, (token.as_str(), chain_id))?
        .unwrap_or_default())
}

pub fn query_distribute_rate(
    deps: Deps,
    kind: DistributeKind,
) -> Result<DistributeRateResponse, ContractError> {
    let rate = load_distribute_rate(deps.storage, kind)?;
    Ok(DistributeRateResponse {
        kind,
        receiver: rate.receiver,
        rate: rate.rate,
    })
}

pub fn query_fee_balance(
    deps: Deps,
    receiver: String,
    token: String,
) -> Result<AmountResponse, ContractError> {
    let receiver = deps.api.addr_validate(&receiver)?;
    Ok(AmountResponse {
        amount: FEE_LIST
            .may_load(deps.storage, (&receiver, token.as_str()))?
            .unwrap_or_default(),
    })
}

// ============================================================================
// Order Queries
// ============================================================================

pub fn query_out_order(deps: Deps, order_id: Binary) -> Result<Option<Order>, ContractError> {
    Ok(OUT_ORDERS.may_load(deps.storage, order_id.as_slice())?)
}

pub fn query_in_order(deps: Deps, order_id: Binary) -> Result<Option<Order>, ContractError> {
    Ok(IN_ORDERS.may_load(deps.storage, order_id.as_slice())?)
}

pub fn query_delivery(deps: Deps, order_id: Binary) -> Result<Option<Delivery>, ContractError> {
    Ok(DELIVERIES.may_load(deps.storage, order_id.as_slice())?)
}

// ============================================================================
// Authority Queries
// ============================================================================

pub fn query_can_call(deps: Deps, caller: String, selector: String) -> Result<bool, ContractError> {
    let caller = deps.api.addr_validate(&caller)?;
    Ok(can_call(deps.storage, &caller, &selector)?)
}

pub fn query_in_deposit_whitelist(deps: Deps, account: String) -> Result<bool, ContractError> {
    let account = deps.api.addr_validate(&account)?;
    is_deposit_whitelisted(deps.storage, &account)
}

pub fn query_has_role(deps: Deps, role: Role, account: String) -> Result<bool, ContractError> {
    let account = deps.api.addr_validate(&account)?;
    Ok(has_role(deps.storage, role, &account)?)
}

pub fn query_function_access(deps: Deps, selector: String) -> Result<Access, ContractError> {
    Ok(function_access(deps.storage, &selector)?)
}
