//! Circuit breaker.
//!
//! While paused every entry point except `Pause` and `Unpause` rejects with
//! `Paused`.

use cosmwasm_std::{DepsMut, MessageInfo, Response};

use crate::authority::{ensure_can_call, PAUSE, UNPAUSE};
use crate::error::ContractError;
use crate::state::CONFIG;

/// Pause the contract (stops all relay traffic and registry changes).
pub fn execute_pause(deps: DepsMut, info: MessageInfo) -> Result<Response, ContractError> {
    ensure_can_call(deps.as_ref(), &info.sender, PAUSE)?;

    let mut config = CONFIG.load(deps.storage)?;
    config.paused = true;
    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new()
        .add_attribute("method", "pause")
        .add_attribute("sender", info.sender))
}

/// Unpause the contract.
pub fn execute_unpause(deps: DepsMut, info: MessageInfo) -> Result<Response, ContractError> {
    ensure_can_call(deps.as_ref(), &info.sender, UNPAUSE)?;

    let mut config = CONFIG.load(deps.storage)?;
    config.paused = false;
    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new()
        .add_attribute("method", "unpause")
        .add_attribute("sender", info.sender))
}
