//! Chain directory.
//!
//! Chains are registered once and never edited. The relay chain itself is
//! registered at instantiation.

use cosmwasm_std::{Binary, DepsMut, MessageInfo, Response, Storage};

use crate::authority::{ensure_can_call, REGISTER_CHAIN};
use crate::error::ContractError;
use crate::msg::ChainRef;
use crate::state::{Chain, CHAINS, CHAIN_NAMES};
use common::ChainKind;

/// Look up a chain by id
pub fn load_chain(storage: &dyn Storage, chain_id: u64) -> Result<Chain, ContractError> {
    CHAINS
        .may_load(storage, chain_id)?
        .ok_or(ContractError::UnknownChain { chain_id })
}

/// Look up a chain by id or name
pub fn resolve_chain(storage: &dyn Storage, chain: ChainRef) -> Result<Chain, ContractError> {
    match chain {
        ChainRef::Id(chain_id) => load_chain(storage, chain_id),
        ChainRef::Name(name) => {
            let chain_id = CHAIN_NAMES
                .may_load(storage, &name)?
                .ok_or(ContractError::UnknownChainName { name })?;
            load_chain(storage, chain_id)
        }
    }
}

/// Insert a new chain, rejecting duplicate ids and names
pub(crate) fn insert_chain(storage: &mut dyn Storage, chain: &Chain) -> Result<(), ContractError> {
    if chain.chain_id == 0 {
        return Err(ContractError::InvalidChain {
            reason: "chain id 0 is reserved".to_string(),
        });
    }
    if chain.name.trim().is_empty() {
        return Err(ContractError::InvalidChain {
            reason: "name is empty".to_string(),
        });
    }
    if CHAINS.has(storage, chain.chain_id) {
        return Err(ContractError::ChainAlreadyRegistered {
            chain_id: chain.chain_id,
        });
    }
    if CHAIN_NAMES.has(storage, &chain.name) {
        return Err(ContractError::InvalidChain {
            reason: format!("name already taken: {}", chain.name),
        });
    }
    CHAINS.save(storage, chain.chain_id, chain)?;
    CHAIN_NAMES.save(storage, &chain.name, &chain.chain_id)?;
    Ok(())
}

/// Parse an address given in `kind`'s text format
pub(crate) fn parse_chain_address(kind: ChainKind, text: &str) -> Result<Vec<u8>, ContractError> {
    kind.parse_address(text)
        .map_err(|e| ContractError::InvalidAddress {
            reason: e.to_string(),
        })
}

#[allow(clippy::too_many_arguments)]
pub fn execute_register_chain(
    deps: DepsMut,
    info: MessageInfo,
    chain_id: u64,
    name: String,
    kind: ChainKind,
    mos: String,
    wrapped_native_token: String,
    light_client: Option<String>,
    fee_service: Option<String>,
) -> Result<Response, ContractError> {
    ensure_can_call(deps.as_ref(), &info.sender, REGISTER_CHAIN)?;

    let mos = parse_chain_address(kind, &mos)?;
    // Chains without a wrapped native token leave it empty
    let wrapped_native_token = if wrapped_native_token.trim().is_empty() {
        vec![]
    } else {
        parse_chain_address(kind, &wrapped_native_token)?
    };
    let light_client = light_client
        .map(|addr| deps.api.addr_validate(&addr))
        .transpose()?;
    let fee_service = fee_service
        .map(|addr| deps.api.addr_validate(&addr))
        .transpose()?;

    let chain = Chain {
        chain_id,
        name: name.trim().to_string(),
        kind,
        mos: Binary::from(mos),
        wrapped_native_token: Binary::from(wrapped_native_token),
        light_client,
        fee_service,
    };
    insert_chain(deps.storage, &chain)?;

    Ok(Response::new()
        .add_attribute("method", "register_chain")
        .add_attribute("chain_id", chain_id.to_string())
        .add_attribute("name", chain.name)
        .add_attribute("kind", kind.as_str())
        .add_attribute("mos", kind.format_address(&chain.mos)))
}
