//! Authority policy
//!
//! Every privileged relay operation is identified by a selector. A selector's
//! access defaults to `Admin`; the admin may relax it to `Manager` or close
//! it entirely. The configured admin passes every open selector.

use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Deps, DepsMut, MessageInfo, Response, StdResult, Storage};

use crate::error::ContractError;
use crate::state::{CONFIG, FUNCTION_ACCESS, ROLE_MEMBERS};

// ============================================================================
// Selectors
// ============================================================================

pub const REGISTER_CHAIN: &str = "register_chain";
pub const REGISTER_TOKEN: &str = "register_token";
pub const MAP_TOKEN: &str = "map_token";
pub const UNMAP_TOKEN: &str = "unmap_token";
pub const REGISTER_TOKEN_CHAINS: &str = "register_token_chains";
pub const SET_FROM_CHAIN_FEE: &str = "set_from_chain_fee";
pub const SET_TO_CHAIN_TOKEN_FEE: &str = "set_to_chain_token_fee";
pub const SET_BASE_FEE: &str = "set_base_fee";
pub const SET_TO_CHAIN_WHITELIST_FEE_RATE: &str = "set_to_chain_whitelist_fee_rate";
pub const SET_FROM_CHAIN_WHITELIST_FEE_RATE: &str = "set_from_chain_whitelist_fee_rate";
pub const SET_BASE_FEE_RECEIVER: &str = "set_base_fee_receiver";
pub const SET_DISTRIBUTE_RATE: &str = "set_distribute_rate";
pub const SET_DEPOSIT_WHITELIST: &str = "set_deposit_whitelist";
pub const UPDATE_DEPOSIT_WHITELIST: &str = "update_deposit_whitelist";
pub const UPDATE_DEPOSIT_LIMITS: &str = "update_deposit_limits";
pub const PAUSE: &str = "pause";
pub const UNPAUSE: &str = "unpause";

pub const SELECTORS: [&str; 17] = [
    REGISTER_CHAIN,
    REGISTER_TOKEN,
    MAP_TOKEN,
    UNMAP_TOKEN,
    REGISTER_TOKEN_CHAINS,
    SET_FROM_CHAIN_FEE,
    SET_TO_CHAIN_TOKEN_FEE,
    SET_BASE_FEE,
    SET_TO_CHAIN_WHITELIST_FEE_RATE,
    SET_FROM_CHAIN_WHITELIST_FEE_RATE,
    SET_BASE_FEE_RECEIVER,
    SET_DISTRIBUTE_RATE,
    SET_DEPOSIT_WHITELIST,
    UPDATE_DEPOSIT_WHITELIST,
    UPDATE_DEPOSIT_LIMITS,
    PAUSE,
    UNPAUSE,
];

// ============================================================================
// Roles
// ============================================================================

#[cw_serde]
#[derive(Copy, Eq)]
pub enum Role {
    Admin,
    Manager,
}

impl Role {
    pub fn key(self) -> u8 {
        match self {
            Role::Admin => 0,
            Role::Manager => 1,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Manager => "manager",
        }
    }
}

/// Who may call a selector
#[cw_serde]
#[derive(Copy, Eq)]
pub enum Access {
    Admin,
    Manager,
    Closed,
}

impl Access {
    pub fn as_str(self) -> &'static str {
        match self {
            Access::Admin => "admin",
            Access::Manager => "manager",
            Access::Closed => "closed",
        }
    }
}

pub fn has_role(storage: &dyn Storage, role: Role, addr: &Addr) -> StdResult<bool> {
    Ok(ROLE_MEMBERS
        .may_load(storage, (role.key(), addr))?
        .unwrap_or(false))
}

pub fn function_access(storage: &dyn Storage, selector: &str) -> StdResult<Access> {
    Ok(FUNCTION_ACCESS
        .may_load(storage, selector)?
        .unwrap_or(Access::Admin))
}

/// Whether `caller` may invoke `selector`
pub fn can_call(storage: &dyn Storage, caller: &Addr, selector: &str) -> StdResult<bool> {
    let access = function_access(storage, selector)?;
    if access == Access::Closed {
        return Ok(false);
    }
    let config = CONFIG.load(storage)?;
    if *caller == config.admin || has_role(storage, Role::Admin, caller)? {
        return Ok(true);
    }
    match access {
        Access::Manager => has_role(storage, Role::Manager, caller),
        _ => Ok(false),
    }
}

pub fn ensure_can_call(deps: Deps, caller: &Addr, selector: &str) -> Result<(), ContractError> {
    if !can_call(deps.storage, caller, selector)? {
        return Err(ContractError::Unauthorized);
    }
    Ok(())
}

fn ensure_admin(storage: &dyn Storage, sender: &Addr) -> Result<(), ContractError> {
    let config = CONFIG.load(storage)?;
    if *sender != config.admin {
        return Err(ContractError::Unauthorized);
    }
    Ok(())
}

// ============================================================================
// Handlers
// ============================================================================

/// Grant a role. Authorization: Admin only
pub fn execute_grant_role(
    deps: DepsMut,
    info: MessageInfo,
    role: Role,
    account: String,
) -> Result<Response, ContractError> {
    ensure_admin(deps.storage, &info.sender)?;
    let account = deps.api.addr_validate(&account)?;
    ROLE_MEMBERS.save(deps.storage, (role.key(), &account), &true)?;

    Ok(Response::new()
        .add_attribute("method", "grant_role")
        .add_attribute("role", role.as_str())
        .add_attribute("account", account))
}

/// Revoke a role. Authorization: Admin only
pub fn execute_revoke_role(
    deps: DepsMut,
    info: MessageInfo,
    role: Role,
    account: String,
) -> Result<Response, ContractError> {
    ensure_admin(deps.storage, &info.sender)?;
    let account = deps.api.addr_validate(&account)?;
    ROLE_MEMBERS.remove(deps.storage, (role.key(), &account));

    Ok(Response::new()
        .add_attribute("method", "revoke_role")
        .add_attribute("role", role.as_str())
        .add_attribute("account", account))
}

/// Set the access of a selector. Authorization: Admin only
pub fn execute_set_function_access(
    deps: DepsMut,
    info: MessageInfo,
    selector: String,
    access: Access,
) -> Result<Response, ContractError> {
    ensure_admin(deps.storage, &info.sender)?;
    if !SELECTORS.contains(&selector.as_str()) {
        return Err(ContractError::UnknownSelector { selector });
    }
    FUNCTION_ACCESS.save(deps.storage, &selector, &access)?;

    Ok(Response::new()
        .add_attribute("method", "set_function_access")
        .add_attribute("selector", selector)
        .add_attribute("access", access.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Config;
    use cosmwasm_std::testing::{mock_dependencies, mock_info};

    fn setup(storage: &mut dyn Storage) {
        CONFIG
            .save(
                storage,
                &Config {
                    admin: Addr::unchecked("admin"),
                    paused: false,
                    chain_id: 22776,
                    native_denom: "uluna".to_string(),
                    base_fee_receiver: Addr::unchecked("admin"),
                },
            )
            .unwrap();
    }

    #[test]
    fn test_defaults_to_admin_only() {
        let mut deps = mock_dependencies();
        setup(deps.as_mut().storage);

        let admin = Addr::unchecked("admin");
        let manager = Addr::unchecked("manager");
        assert!(can_call(deps.as_ref().storage, &admin, MAP_TOKEN).unwrap());
        assert!(!can_call(deps.as_ref().storage, &manager, MAP_TOKEN).unwrap());
    }

    #[test]
    fn test_relaxed_selector_admits_managers() {
        let mut deps = mock_dependencies();
        setup(deps.as_mut().storage);

        execute_grant_role(
            deps.as_mut(),
            mock_info("admin", &[]),
            Role::Manager,
            "manager".to_string(),
        )
        .unwrap();
        execute_set_function_access(
            deps.as_mut(),
            mock_info("admin", &[]),
            SET_BASE_FEE.to_string(),
            Access::Manager,
        )
        .unwrap();

        let manager = Addr::unchecked("manager");
        assert!(can_call(deps.as_ref().storage, &manager, SET_BASE_FEE).unwrap());
        assert!(!can_call(deps.as_ref().storage, &manager, MAP_TOKEN).unwrap());

        execute_revoke_role(
            deps.as_mut(),
            mock_info("admin", &[]),
            Role::Manager,
            "manager".to_string(),
        )
        .unwrap();
        assert!(!can_call(deps.as_ref().storage, &manager, SET_BASE_FEE).unwrap());
    }

    #[test]
    fn test_closed_selector_rejects_admin() {
        let mut deps = mock_dependencies();
        setup(deps.as_mut().storage);

        execute_set_function_access(
            deps.as_mut(),
            mock_info("admin", &[]),
            PAUSE.to_string(),
            Access::Closed,
        )
        .unwrap();
        let admin = Addr::unchecked("admin");
        assert!(!can_call(deps.as_ref().storage, &admin, PAUSE).unwrap());
    }

    #[test]
    fn test_only_admin_manages_policy() {
        let mut deps = mock_dependencies();
        setup(deps.as_mut().storage);

        let err = execute_grant_role(
            deps.as_mut(),
            mock_info("intruder", &[]),
            Role::Admin,
            "intruder".to_string(),
        )
        .unwrap_err();
        assert_eq!(err, ContractError::Unauthorized);

        let err = execute_set_function_access(
            deps.as_mut(),
            mock_info("admin", &[]),
            "mint_everything".to_string(),
            Access::Manager,
        )
        .unwrap_err();
        assert!(matches!(err, ContractError::UnknownSelector { .. }));
    }
}
