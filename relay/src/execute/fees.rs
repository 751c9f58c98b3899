//! Relay fee distribution.
//!
//! Base fees are credited to the base-fee receiver. The bridge fee is split
//! between the relayer, the protocol and the vault: relayer and protocol
//! take their rates when they have a receiver, the vault keeps the rest.
//! Credited amounts accrue in `FEE_LIST` until withdrawn.

use common::AssetInfo;
use cosmwasm_std::{Addr, DepsMut, Event, MessageInfo, Response, Storage, Uint128};

use crate::authority::{ensure_can_call, SET_DISTRIBUTE_RATE};
use crate::error::ContractError;
use crate::fee_math::{calc_rate_fee, validate_rate, FeeQuote};
use crate::state::{
    Config, DistributeKind, DistributeRate, DISTRIBUTE_RATES, FEE_LIST, MAX_RATE, RELAY_TOKENS,
};

/// How a fee quote was paid out
#[derive(Debug, Default, PartialEq)]
pub struct FeeSplit {
    pub relayer_fee: Uint128,
    pub protocol_fee: Uint128,
    /// Stays in the vault
    pub vault_fee: Uint128,
    /// Everything that leaves the vault: base, relayer and protocol fees
    pub fee_out: Uint128,
}

pub fn load_distribute_rate(
    storage: &dyn Storage,
    kind: DistributeKind,
) -> Result<DistributeRate, ContractError> {
    Ok(DISTRIBUTE_RATES
        .may_load(storage, kind.key())?
        .unwrap_or_default())
}

pub(crate) fn credit_fee(
    storage: &mut dyn Storage,
    receiver: &Addr,
    token: &str,
    amount: Uint128,
) -> Result<(), ContractError> {
    if amount.is_zero() {
        return Ok(());
    }
    FEE_LIST.update(storage, (receiver, token), |balance| -> Result<_, ContractError> {
        Ok(balance.unwrap_or_default() + amount)
    })?;
    Ok(())
}

/// Credit a quote's fees. `relayer` overrides the configured relayer receiver.
pub fn collect_fees(
    storage: &mut dyn Storage,
    config: &Config,
    token: &str,
    quote: &FeeQuote,
    relayer: Option<&Addr>,
) -> Result<FeeSplit, ContractError> {
    credit_fee(storage, &config.base_fee_receiver, token, quote.base_fee)?;

    let relayer_rate = load_distribute_rate(storage, DistributeKind::Relayer)?;
    let relayer_fee = match relayer.or(relayer_rate.receiver.as_ref()) {
        Some(receiver) => {
            let fee = calc_rate_fee(quote.bridge_fee, relayer_rate.rate);
            credit_fee(storage, receiver, token, fee)?;
            fee
        }
        None => Uint128::zero(),
    };

    let protocol_rate = load_distribute_rate(storage, DistributeKind::Protocol)?;
    let protocol_fee = match &protocol_rate.receiver {
        Some(receiver) => {
            let fee = calc_rate_fee(quote.bridge_fee, protocol_rate.rate);
            credit_fee(storage, receiver, token, fee)?;
            fee
        }
        None => Uint128::zero(),
    };

    let vault_fee = quote.bridge_fee - relayer_fee - protocol_fee;
    Ok(FeeSplit {
        relayer_fee,
        protocol_fee,
        vault_fee,
        fee_out: quote.base_fee + relayer_fee + protocol_fee,
    })
}

/// Set the share of one distribution kind. The three rates may not exceed
/// 100% together.
pub fn execute_set_distribute_rate(
    deps: DepsMut,
    info: MessageInfo,
    kind: DistributeKind,
    receiver: Option<String>,
    rate: u32,
) -> Result<Response, ContractError> {
    ensure_can_call(deps.as_ref(), &info.sender, SET_DISTRIBUTE_RATE)?;
    validate_rate(rate)?;

    let mut total = rate as u64;
    for other in DistributeKind::ALL.into_iter().filter(|k| *k != kind) {
        total += load_distribute_rate(deps.storage, other)?.rate as u64;
    }
    if total > MAX_RATE as u64 {
        return Err(ContractError::InvalidRate { rate: total });
    }

    let receiver = receiver
        .map(|addr| deps.api.addr_validate(&addr))
        .transpose()?;
    DISTRIBUTE_RATES.save(
        deps.storage,
        kind.key(),
        &DistributeRate {
            receiver: receiver.clone(),
            rate,
        },
    )?;

    Ok(Response::new()
        .add_attribute("method", "set_distribute_rate")
        .add_attribute("kind", kind.as_str())
        .add_attribute(
            "receiver",
            receiver.map(|r| r.to_string()).unwrap_or_default(),
        )
        .add_attribute("rate", rate.to_string()))
}

/// Pay out everything accrued for `receiver` in `token`.
pub fn execute_withdraw_fee(
    deps: DepsMut,
    receiver: String,
    token: String,
) -> Result<Response, ContractError> {
    let receiver = deps.api.addr_validate(&receiver)?;
    let amount = FEE_LIST
        .may_load(deps.storage, (&receiver, token.as_str()))?
        .unwrap_or_default();
    FEE_LIST.remove(deps.storage, (&receiver, token.as_str()));

    // Message fees accrue in the native denom, which need not be registered
    let asset = RELAY_TOKENS
        .may_load(deps.storage, &token)?
        .map(|t| t.asset)
        .unwrap_or(AssetInfo::Native {
            denom: token.clone(),
        });

    let mut response = Response::new().add_attribute("method", "withdraw_fee");
    if !amount.is_zero() {
        response = response.add_message(asset.transfer_msg(&receiver, amount)?);
    }

    Ok(response.add_event(
        Event::new("withdraw_fee")
            .add_attribute("receiver", receiver)
            .add_attribute("token", token)
            .add_attribute("amount", amount),
    ))
}
