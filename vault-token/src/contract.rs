//! Vault Token Contract - Entry Points

use cosmwasm_std::{
    entry_point, to_json_binary, Addr, Binary, Deps, DepsMut, Env, Event, Int128, MessageInfo,
    Order, Response, StdError, StdResult, Storage, Uint128,
};
use cw2::set_contract_version;
use cw20::{BalanceResponse, TokenInfoResponse};
use cw_storage_plus::Bound;

use crate::error::ContractError;
use crate::msg::{
    AmountResponse, ConfigResponse, ExecuteMsg, InstantiateMsg, IsManagerResponse, MigrateMsg,
    NetFlowResponse, NetFlowsResponse, QueryMsg, UnderlyingResponse, VaultStateResponse,
};
use crate::state::{
    Config, TokenInfo, VaultState, BALANCES, CONFIG, CONTRACT_NAME, CONTRACT_VERSION, MANAGERS,
    NET_FLOW, TOKEN_INFO, VAULT_STATE,
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
    if msg.underlying.is_empty() {
        return Err(StdError::generic_err("underlying address is zero").into());
    }

    CONFIG.save(
        deps.storage,
        &Config {
            admin: admin.clone(),
            underlying: msg.underlying.clone(),
        },
    )?;
    TOKEN_INFO.save(
        deps.storage,
        &TokenInfo {
            name: msg.name,
            symbol: msg.symbol,
            decimals: msg.decimals,
        },
    )?;
    VAULT_STATE.save(
        deps.storage,
        &VaultState {
            total_vault: Int128::zero(),
            total_supply: Uint128::zero(),
        },
    )?;

    for manager in &msg.managers {
        let manager = deps.api.addr_validate(manager)?;
        MANAGERS.save(deps.storage, &manager, &true)?;
    }

    Ok(Response::new()
        .add_attribute("method", "instantiate")
        .add_attribute("admin", admin)
        .add_attribute("underlying", msg.underlying)
        .add_attribute("manager_count", msg.managers.len().to_string()))
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
        ExecuteMsg::AddManager { manager } => execute_set_manager(deps, info, manager, true),
        ExecuteMsg::RemoveManager { manager } => execute_set_manager(deps, info, manager, false),
        ExecuteMsg::Deposit {
            from_chain,
            amount,
            receiver,
        } => execute_deposit(deps, info, from_chain, amount, receiver),
        ExecuteMsg::Withdraw {
            to_chain,
            vault_amount,
            owner,
        } => execute_withdraw(deps, info, to_chain, vault_amount, owner),
        ExecuteMsg::TransferToken {
            from_chain,
            from_amount,
            to_chain,
            to_amount,
            relay_chain,
            fee,
        } => execute_transfer_token(
            deps,
            info,
            from_chain,
            from_amount,
            to_chain,
            to_amount,
            relay_chain,
            fee,
        ),
        ExecuteMsg::Transfer { recipient, amount } => {
            execute_transfer(deps, info, recipient, amount)
        }
    }
}

fn execute_set_manager(
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
        .add_attribute("method", if enable { "add_manager" } else { "remove_manager" })
        .add_attribute("manager", manager))
}

fn execute_deposit(
    deps: DepsMut,
    info: MessageInfo,
    from_chain: u64,
    amount: Uint128,
    receiver: String,
) -> Result<Response, ContractError> {
    ensure_manager(deps.storage, &info.sender)?;
    if amount.is_zero() {
        return Err(ContractError::ZeroAmount);
    }
    let receiver = deps.api.addr_validate(&receiver)?;

    let mut state = VAULT_STATE.load(deps.storage)?;
    let shares = vault_token_amount(&state, amount)?;

    let delta = to_signed(amount)?;
    add_net_flow(deps.storage, from_chain, delta)?;
    state.total_vault = state.total_vault.checked_add(delta)?;
    state.total_supply = state.total_supply.checked_add(shares)?;
    VAULT_STATE.save(deps.storage, &state)?;

    BALANCES.update(deps.storage, &receiver, |bal| -> StdResult<_> {
        Ok(bal.unwrap_or_default().checked_add(shares)?)
    })?;

    let config = CONFIG.load(deps.storage)?;
    Ok(Response::new()
        .add_attribute("method", "deposit")
        .add_event(
            Event::new("deposit_vault")
                .add_attribute("token", config.underlying)
                .add_attribute("to", receiver)
                .add_attribute("from_chain", from_chain.to_string())
                .add_attribute("vault_amount", shares)
                .add_attribute("amount", amount),
        ))
}

fn execute_withdraw(
    deps: DepsMut,
    info: MessageInfo,
    to_chain: u64,
    vault_amount: Uint128,
    owner: String,
) -> Result<Response, ContractError> {
    ensure_manager(deps.storage, &info.sender)?;
    if vault_amount.is_zero() {
        return Err(ContractError::ZeroAmount);
    }
    let owner = deps.api.addr_validate(&owner)?;

    let balance = BALANCES
        .may_load(deps.storage, &owner)?
        .unwrap_or_default();
    if balance < vault_amount {
        return Err(ContractError::InsufficientBalance {
            balance,
            required: vault_amount,
        });
    }

    let mut state = VAULT_STATE.load(deps.storage)?;
    let amount = token_amount(&state, vault_amount);

    let delta = to_signed(amount)?;
    add_net_flow(deps.storage, to_chain, Int128::zero().checked_sub(delta)?)?;
    state.total_vault = state.total_vault.checked_sub(delta)?;
    state.total_supply = state.total_supply.checked_sub(vault_amount)?;
    VAULT_STATE.save(deps.storage, &state)?;
    BALANCES.save(deps.storage, &owner, &(balance - vault_amount))?;

    let config = CONFIG.load(deps.storage)?;
    Ok(Response::new()
        .add_attribute("method", "withdraw")
        .add_attribute("amount", amount)
        .add_event(
            Event::new("withdraw_vault")
                .add_attribute("token", config.underlying)
                .add_attribute("owner", owner)
                .add_attribute("to_chain", to_chain.to_string())
                .add_attribute("vault_amount", vault_amount)
                .add_attribute("amount", amount),
        ))
}

#[allow(clippy::too_many_arguments)]
fn execute_transfer_token(
    deps: DepsMut,
    info: MessageInfo,
    from_chain: u64,
    from_amount: Uint128,
    to_chain: u64,
    to_amount: Uint128,
    relay_chain: u64,
    fee: Uint128,
) -> Result<Response, ContractError> {
    ensure_manager(deps.storage, &info.sender)?;

    let inflow = to_signed(from_amount)?;
    let outflow = to_signed(to_amount)?;
    let fee_out = to_signed(fee)?;

    add_net_flow(deps.storage, from_chain, inflow)?;
    add_net_flow(deps.storage, to_chain, Int128::zero().checked_sub(outflow)?)?;
    if !fee.is_zero() {
        add_net_flow(deps.storage, relay_chain, Int128::zero().checked_sub(fee_out)?)?;
    }

    let mut state = VAULT_STATE.load(deps.storage)?;
    state.total_vault = state
        .total_vault
        .checked_add(inflow)?
        .checked_sub(outflow)?
        .checked_sub(fee_out)?;
    VAULT_STATE.save(deps.storage, &state)?;

    Ok(Response::new()
        .add_attribute("method", "transfer_token")
        .add_event(
            Event::new("transfer_token")
                .add_attribute("from_chain", from_chain.to_string())
                .add_attribute("from_amount", from_amount)
                .add_attribute("to_chain", to_chain.to_string())
                .add_attribute("to_amount", to_amount)
                .add_attribute("relay_chain", relay_chain.to_string())
                .add_attribute("fee", fee)
                .add_attribute("total_vault", state.total_vault.to_string()),
        ))
}

fn execute_transfer(
    deps: DepsMut,
    info: MessageInfo,
    recipient: String,
    amount: Uint128,
) -> Result<Response, ContractError> {
    if amount.is_zero() {
        return Err(ContractError::ZeroAmount);
    }
    let recipient = deps.api.addr_validate(&recipient)?;

    let balance = BALANCES
        .may_load(deps.storage, &info.sender)?
        .unwrap_or_default();
    if balance < amount {
        return Err(ContractError::InsufficientBalance {
            balance,
            required: amount,
        });
    }
    BALANCES.save(deps.storage, &info.sender, &(balance - amount))?;
    BALANCES.update(deps.storage, &recipient, |bal| -> StdResult<_> {
        Ok(bal.unwrap_or_default().checked_add(amount)?)
    })?;

    Ok(Response::new()
        .add_attribute("method", "transfer")
        .add_attribute("from", info.sender)
        .add_attribute("to", recipient)
        .add_attribute("amount", amount))
}

// ============================================================================
// Ledger helpers
// ============================================================================

fn ensure_manager(storage: &dyn Storage, sender: &Addr) -> Result<(), ContractError> {
    if MANAGERS.may_load(storage, sender)?.unwrap_or(false) {
        Ok(())
    } else {
        Err(ContractError::NotManager)
    }
}

fn add_net_flow(storage: &mut dyn Storage, chain_id: u64, delta: Int128) -> StdResult<Int128> {
    let current = NET_FLOW
        .may_load(storage, chain_id)?
        .unwrap_or_else(Int128::zero);
    let updated = current.checked_add(delta)?;
    NET_FLOW.save(storage, chain_id, &updated)?;
    Ok(updated)
}

fn to_signed(amount: Uint128) -> StdResult<Int128> {
    i128::try_from(amount.u128())
        .map(Int128::new)
        .map_err(|_| StdError::generic_err("amount exceeds signed range"))
}

/// Shares for a deposit of `amount`; 1:1 while no shares exist.
pub fn vault_token_amount(state: &VaultState, amount: Uint128) -> Result<Uint128, ContractError> {
    if state.total_supply.is_zero() {
        return Ok(amount);
    }
    let backing = state.total_vault.i128();
    if backing <= 0 {
        return Err(ContractError::NoBacking);
    }
    Ok(amount.multiply_ratio(state.total_supply, backing as u128))
}

/// Underlying released for `vault_amount` shares.
pub fn token_amount(state: &VaultState, vault_amount: Uint128) -> Uint128 {
    let backing = state.total_vault.i128();
    if state.total_supply.is_zero() || backing <= 0 {
        return Uint128::zero();
    }
    vault_amount.multiply_ratio(backing as u128, state.total_supply)
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
                underlying: config.underlying,
            })
        }
        QueryMsg::TokenInfo {} => {
            let info = TOKEN_INFO.load(deps.storage)?;
            let state = VAULT_STATE.load(deps.storage)?;
            to_json_binary(&TokenInfoResponse {
                name: info.name,
                symbol: info.symbol,
                decimals: info.decimals,
                total_supply: state.total_supply,
            })
        }
        QueryMsg::Balance { address } => {
            let address = deps.api.addr_validate(&address)?;
            let balance = BALANCES
                .may_load(deps.storage, &address)?
                .unwrap_or_default();
            to_json_binary(&BalanceResponse { balance })
        }
        QueryMsg::Underlying {} => to_json_binary(&UnderlyingResponse {
            underlying: CONFIG.load(deps.storage)?.underlying,
        }),
        QueryMsg::VaultState {} => {
            let state = VAULT_STATE.load(deps.storage)?;
            to_json_binary(&VaultStateResponse {
                total_vault: state.total_vault,
                total_supply: state.total_supply,
            })
        }
        QueryMsg::NetFlow { chain_id } => to_json_binary(&NetFlowResponse {
            chain_id,
            net_flow: NET_FLOW
                .may_load(deps.storage, chain_id)?
                .unwrap_or_else(Int128::zero),
        }),
        QueryMsg::NetFlows { start_after, limit } => {
            to_json_binary(&query_net_flows(deps, start_after, limit)?)
        }
        QueryMsg::VaultTokenAmount { amount } => {
            let state = VAULT_STATE.load(deps.storage)?;
            let amount = vault_token_amount(&state, amount)
                .map_err(|e| StdError::generic_err(e.to_string()))?;
            to_json_binary(&AmountResponse { amount })
        }
        QueryMsg::TokenAmount { vault_amount } => {
            let state = VAULT_STATE.load(deps.storage)?;
            to_json_binary(&AmountResponse {
                amount: token_amount(&state, vault_amount),
            })
        }
        QueryMsg::IsManager { address } => {
            let address = deps.api.addr_validate(&address)?;
            to_json_binary(&IsManagerResponse {
                is_manager: MANAGERS.may_load(deps.storage, &address)?.unwrap_or(false),
            })
        }
    }
}

fn query_net_flows(
    deps: Deps,
    start_after: Option<u64>,
    limit: Option<u32>,
) -> StdResult<NetFlowsResponse> {
    let limit = limit.unwrap_or(10).min(50) as usize;
    let start = start_after.map(Bound::exclusive);

    let flows = NET_FLOW
        .range(deps.storage, start, None, Order::Ascending)
        .take(limit)
        .map(|item| {
            let (chain_id, net_flow) = item?;
            Ok(NetFlowResponse { chain_id, net_flow })
        })
        .collect::<StdResult<Vec<_>>>()?;

    Ok(NetFlowsResponse { flows })
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
