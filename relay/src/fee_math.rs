//! Fee Math Module
//!
//! Fee quotes for cross-chain transfers of relay tokens.
//!
//! ## Fee Structure
//!
//! | Component   | Source                               | Clamped |
//! |-------------|--------------------------------------|---------|
//! | Base fee    | `BASE_FEES[token, to]`, swap/no-swap | no      |
//! | From leg    | `FROM_CHAIN_FEES[token, from]`       | yes     |
//! | To leg      | `TO_CHAIN_FEES[token, to]`           | yes     |
//! | Whitelisted | caller rate replaces both legs       | no      |
//!
//! ## Rate Priority (highest to lowest)
//!
//! 1. To-chain whitelist `(token, from, to, caller)`
//! 2. From-chain whitelist `(token, from, caller)`
//! 3. Standard route fee (from leg + to leg)

use cosmwasm_schema::cw_serde;
use cosmwasm_std::{StdResult, Storage, Uint128};

use crate::error::ContractError;
use crate::state::{
    from_chain_route_key, to_chain_route_key, FeeSchedule, BASE_FEES, FROM_CHAIN_FEES,
    FROM_CHAIN_WHITELIST, MAX_RATE, TO_CHAIN_FEES, TO_CHAIN_WHITELIST,
};

/// Largest power of ten that fits in a u128
const MAX_DECIMAL_SHIFT: u8 = 38;

// ============================================================================
// Data Structures
// ============================================================================

#[cw_serde]
#[derive(Default)]
pub struct FeeQuote {
    pub total_fee: Uint128,
    pub base_fee: Uint128,
    pub bridge_fee: Uint128,
}

impl FeeQuote {
    /// Limit the quote to `amount`, base fee first. Inbound transfers are
    /// already final on the source chain and cannot be rejected for low value.
    pub fn capped(self, amount: Uint128) -> Self {
        let base_fee = self.base_fee.min(amount);
        let bridge_fee = self.bridge_fee.min(amount - base_fee);
        FeeQuote {
            total_fee: base_fee + bridge_fee,
            base_fee,
            bridge_fee,
        }
    }
}

// ============================================================================
// Pure Calculations
// ============================================================================

/// `amount * rate / 1e6`, truncated
pub fn calc_rate_fee(amount: Uint128, rate: u32) -> Uint128 {
    amount.multiply_ratio(rate as u128, MAX_RATE as u128)
}

/// Rate fee clamped into `[lowest, highest]`
pub fn clamp_fee(schedule: &FeeSchedule, amount: Uint128) -> Uint128 {
    let fee = calc_rate_fee(amount, schedule.rate);
    if fee < schedule.lowest {
        schedule.lowest
    } else if fee > schedule.highest {
        schedule.highest
    } else {
        fee
    }
}

/// Range is checked before rate.
pub fn validate_schedule(schedule: &FeeSchedule) -> Result<(), ContractError> {
    if schedule.lowest > schedule.highest {
        return Err(ContractError::InvalidRange);
    }
    validate_rate(schedule.rate)
}

pub fn validate_rate(rate: u32) -> Result<(), ContractError> {
    if rate > MAX_RATE {
        return Err(ContractError::InvalidRate { rate: rate as u64 });
    }
    Ok(())
}

/// `amount * 10^to / 10^from` with integer truncation
pub fn convert_decimals(
    amount: Uint128,
    from_decimals: u8,
    to_decimals: u8,
) -> Result<Uint128, ContractError> {
    if from_decimals == to_decimals {
        return Ok(amount);
    }
    if to_decimals > from_decimals {
        let factor = pow10(to_decimals - from_decimals)?;
        amount
            .checked_mul(factor)
            .map_err(|_| ContractError::DecimalsOverflow)
    } else {
        let shift = from_decimals - to_decimals;
        if shift > MAX_DECIMAL_SHIFT {
            return Ok(Uint128::zero());
        }
        Ok(amount / pow10(shift)?)
    }
}

fn pow10(exp: u8) -> Result<Uint128, ContractError> {
    10u128
        .checked_pow(exp as u32)
        .map(Uint128::new)
        .ok_or(ContractError::DecimalsOverflow)
}

// ============================================================================
// Registry Lookups
// ============================================================================

pub fn to_chain_caller_fee_rate(
    storage: &dyn Storage,
    token: &str,
    from_chain: u64,
    to_chain: u64,
    caller: &[u8],
) -> StdResult<Option<u32>> {
    let key = to_chain_route_key(from_chain, to_chain, caller);
    TO_CHAIN_WHITELIST.may_load(storage, (token, key.as_slice()))
}

pub fn from_chain_caller_fee_rate(
    storage: &dyn Storage,
    token: &str,
    from_chain: u64,
    caller: &[u8],
) -> StdResult<Option<u32>> {
    let key = from_chain_route_key(from_chain, caller);
    FROM_CHAIN_WHITELIST.may_load(storage, (token, key.as_slice()))
}

/// Effective whitelist rate of a caller on a route, if any
pub fn caller_fee_rate(
    storage: &dyn Storage,
    token: &str,
    from_chain: u64,
    to_chain: u64,
    caller: &[u8],
) -> StdResult<Option<u32>> {
    if let Some(rate) = to_chain_caller_fee_rate(storage, token, from_chain, to_chain, caller)? {
        return Ok(Some(rate));
    }
    from_chain_caller_fee_rate(storage, token, from_chain, caller)
}

/// Base fee towards `to_chain`
pub fn base_fee(
    storage: &dyn Storage,
    token: &str,
    to_chain: u64,
    with_swap: bool,
) -> StdResult<Uint128> {
    let fee = BASE_FEES
        .may_load(storage, (token, to_chain))?
        .unwrap_or_default();
    Ok(if with_swap { fee.with_swap } else { fee.no_swap })
}

/// Clamped fee of the from leg alone
pub fn from_chain_fee(
    storage: &dyn Storage,
    token: &str,
    from_chain: u64,
    amount: Uint128,
) -> StdResult<Uint128> {
    Ok(FROM_CHAIN_FEES
        .may_load(storage, (token, from_chain))?
        .map(|schedule| clamp_fee(&schedule, amount))
        .unwrap_or_default())
}

/// Clamped fee of the to leg alone
pub fn to_chain_fee(
    storage: &dyn Storage,
    token: &str,
    to_chain: u64,
    amount: Uint128,
) -> StdResult<Uint128> {
    Ok(TO_CHAIN_FEES
        .may_load(storage, (token, to_chain))?
        .map(|schedule| clamp_fee(&schedule, amount))
        .unwrap_or_default())
}

/// Full quote for moving `amount` of `token` from `from_chain` to `to_chain`
pub fn transfer_fee(
    storage: &dyn Storage,
    caller: &[u8],
    token: &str,
    amount: Uint128,
    from_chain: u64,
    to_chain: u64,
    with_swap: bool,
) -> StdResult<FeeQuote> {
    let base_fee = base_fee(storage, token, to_chain, with_swap)?;
    let bridge_fee = match caller_fee_rate(storage, token, from_chain, to_chain, caller)? {
        Some(rate) => calc_rate_fee(amount, rate),
        None => {
            from_chain_fee(storage, token, from_chain, amount)?
                + to_chain_fee(storage, token, to_chain, amount)?
        }
    };
    Ok(FeeQuote {
        total_fee: base_fee + bridge_fee,
        base_fee,
        bridge_fee,
    })
}

/// Fee of the inbound leg only
pub fn transfer_in_fee(
    storage: &dyn Storage,
    caller: &[u8],
    token: &str,
    amount: Uint128,
    from_chain: u64,
) -> StdResult<Uint128> {
    match from_chain_caller_fee_rate(storage, token, from_chain, caller)? {
        Some(rate) => Ok(calc_rate_fee(amount, rate)),
        None => from_chain_fee(storage, token, from_chain, amount),
    }
}
