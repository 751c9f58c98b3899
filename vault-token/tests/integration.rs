//! Vault ledger driven by a relay manager through cw-multi-test

use cosmwasm_std::{Addr, Int128, Uint128};
use cw20::BalanceResponse;
use cw_multi_test::{App, ContractWrapper, Executor};

use vault_token::msg::{
    AmountResponse, ExecuteMsg, InstantiateMsg, IsManagerResponse, NetFlowResponse,
    NetFlowsResponse, QueryMsg, VaultStateResponse,
};

const RELAY_CHAIN: u64 = 212;
const BSC_TESTNET: u64 = 97;
const BSC: u64 = 56;

struct Setup {
    app: App,
    vault: Addr,
    admin: Addr,
    relay: Addr,
}

fn setup() -> Setup {
    let mut app = App::default();
    let admin = Addr::unchecked("admin");
    let relay = Addr::unchecked("relay");

    let code_id = app.store_code(Box::new(ContractWrapper::new(
        vault_token::contract::execute,
        vault_token::contract::instantiate,
        vault_token::contract::query,
    )));
    let vault = app
        .instantiate_contract(
            code_id,
            admin.clone(),
            &InstantiateMsg {
                admin: admin.to_string(),
                underlying: "uluna".to_string(),
                name: "Vault Luna".to_string(),
                symbol: "vLUNA".to_string(),
                decimals: 6,
                managers: vec![relay.to_string()],
            },
            &[],
            "vault-luna",
            None,
        )
        .unwrap();

    Setup {
        app,
        vault,
        admin,
        relay,
    }
}

impl Setup {
    fn shares(&self, owner: &str) -> Uint128 {
        let res: BalanceResponse = self
            .app
            .wrap()
            .query_wasm_smart(
                &self.vault,
                &QueryMsg::Balance {
                    address: owner.to_string(),
                },
            )
            .unwrap();
        res.balance
    }

    fn net_flow(&self, chain_id: u64) -> i128 {
        let res: NetFlowResponse = self
            .app
            .wrap()
            .query_wasm_smart(&self.vault, &QueryMsg::NetFlow { chain_id })
            .unwrap();
        res.net_flow.i128()
    }

    fn state(&self) -> VaultStateResponse {
        self.app
            .wrap()
            .query_wasm_smart(&self.vault, &QueryMsg::VaultState {})
            .unwrap()
    }
}

#[test]
fn test_ledger_tracks_relay_flows() {
    let mut s = setup();

    s.app
        .execute_contract(
            s.relay.clone(),
            s.vault.clone(),
            &ExecuteMsg::Deposit {
                from_chain: BSC_TESTNET,
                amount: Uint128::new(1_000),
                receiver: "alice".to_string(),
            },
            &[],
        )
        .unwrap();
    assert_eq!(s.shares("alice"), Uint128::new(1_000));

    // 1000 in from BSC, 900 out to BSC testnet, 50 paid out as relay fee
    s.app
        .execute_contract(
            s.relay.clone(),
            s.vault.clone(),
            &ExecuteMsg::TransferToken {
                from_chain: BSC,
                from_amount: Uint128::new(1_000),
                to_chain: BSC_TESTNET,
                to_amount: Uint128::new(900),
                relay_chain: RELAY_CHAIN,
                fee: Uint128::new(50),
            },
            &[],
        )
        .unwrap();
    assert_eq!(s.state().total_vault, Int128::new(1_050));

    let quote: AmountResponse = s
        .app
        .wrap()
        .query_wasm_smart(
            &s.vault,
            &QueryMsg::TokenAmount {
                vault_amount: Uint128::new(400),
            },
        )
        .unwrap();
    assert_eq!(quote.amount, Uint128::new(420));

    s.app
        .execute_contract(
            Addr::unchecked("alice"),
            s.vault.clone(),
            &ExecuteMsg::Transfer {
                recipient: "bob".to_string(),
                amount: Uint128::new(400),
            },
            &[],
        )
        .unwrap();
    s.app
        .execute_contract(
            s.relay.clone(),
            s.vault.clone(),
            &ExecuteMsg::Withdraw {
                to_chain: BSC_TESTNET,
                vault_amount: Uint128::new(400),
                owner: "bob".to_string(),
            },
            &[],
        )
        .unwrap();

    assert_eq!(s.shares("alice"), Uint128::new(600));
    assert_eq!(s.shares("bob"), Uint128::zero());
    assert_eq!(s.net_flow(BSC_TESTNET), 1_000 - 900 - 420);
    assert_eq!(s.net_flow(BSC), 1_000);
    assert_eq!(s.net_flow(RELAY_CHAIN), -50);

    let state = s.state();
    assert_eq!(state.total_vault, Int128::new(630));
    assert_eq!(state.total_supply, Uint128::new(600));

    let flows: NetFlowsResponse = s
        .app
        .wrap()
        .query_wasm_smart(
            &s.vault,
            &QueryMsg::NetFlows {
                start_after: None,
                limit: None,
            },
        )
        .unwrap();
    let sum: i128 = flows.flows.iter().map(|f| f.net_flow.i128()).sum();
    assert_eq!(sum, state.total_vault.i128());
}

#[test]
fn test_only_managers_drive_the_ledger() {
    let mut s = setup();
    let deposit = ExecuteMsg::Deposit {
        from_chain: BSC_TESTNET,
        amount: Uint128::new(1_000),
        receiver: "alice".to_string(),
    };

    let err = s
        .app
        .execute_contract(s.admin.clone(), s.vault.clone(), &deposit, &[])
        .unwrap_err();
    assert_eq!(err.root_cause().to_string(), "Caller is not a manager");

    let err = s
        .app
        .execute_contract(
            Addr::unchecked("alice"),
            s.vault.clone(),
            &ExecuteMsg::AddManager {
                manager: "alice".to_string(),
            },
            &[],
        )
        .unwrap_err();
    assert_eq!(
        err.root_cause().to_string(),
        "Unauthorized: only admin can perform this action"
    );

    s.app
        .execute_contract(
            s.admin.clone(),
            s.vault.clone(),
            &ExecuteMsg::RemoveManager {
                manager: s.relay.to_string(),
            },
            &[],
        )
        .unwrap();
    let res: IsManagerResponse = s
        .app
        .wrap()
        .query_wasm_smart(
            &s.vault,
            &QueryMsg::IsManager {
                address: s.relay.to_string(),
            },
        )
        .unwrap();
    assert!(!res.is_manager);

    let err = s
        .app
        .execute_contract(s.relay.clone(), s.vault.clone(), &deposit, &[])
        .unwrap_err();
    assert_eq!(err.root_cause().to_string(), "Caller is not a manager");
}

#[test]
fn test_withdraw_beyond_shares_fails() {
    let mut s = setup();
    s.app
        .execute_contract(
            s.relay.clone(),
            s.vault.clone(),
            &ExecuteMsg::Deposit {
                from_chain: BSC_TESTNET,
                amount: Uint128::new(100),
                receiver: "alice".to_string(),
            },
            &[],
        )
        .unwrap();

    let err = s
        .app
        .execute_contract(
            s.relay.clone(),
            s.vault.clone(),
            &ExecuteMsg::Withdraw {
                to_chain: BSC_TESTNET,
                vault_amount: Uint128::new(101),
                owner: "alice".to_string(),
            },
            &[],
        )
        .unwrap_err();
    assert_eq!(
        err.root_cause().to_string(),
        "Insufficient balance: have 100, need 101"
    );

    let err = s
        .app
        .execute_contract(
            Addr::unchecked("alice"),
            s.vault.clone(),
            &ExecuteMsg::Transfer {
                recipient: "bob".to_string(),
                amount: Uint128::zero(),
            },
            &[],
        )
        .unwrap_err();
    assert_eq!(err.root_cause().to_string(), "Invalid amount: zero");
}
