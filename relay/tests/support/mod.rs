//! Shared cw-multi-test fixture for the relay integration tests.
//!
//! The fixture deploys a relay on chain 212 with two spoke chains (97 and 56),
//! a mock light client that "verifies" any JSON-encoded list of logs, a
//! mintable cw20 (wBNB) and native uluna, each backed by a vault ledger.

#![allow(dead_code)]

use anyhow::Result as AnyResult;
use common::{
    AssetInfo, ChainKind, LightClientQueryMsg, MessageType, NormalizedLog, ReceiverExecuteMsg,
    VerifyProofDataResponse, WireMessage, MESSAGE_VERSION,
};
use cosmwasm_schema::cw_serde;
use cosmwasm_std::{
    coins, from_json, to_json_binary, Addr, Binary, Deps, DepsMut, Empty, Env, Event,
    MessageInfo, Response, StdError, StdResult, Uint128,
};
use cw_multi_test::{App, AppResponse, ContractWrapper, Executor};
use cw_storage_plus::Item;

use relay::hash::{compute_order_id, pack_chain_and_gas_limit, MESSAGE_OUT_TOPIC};
use relay::msg::{ExecuteMsg, InstantiateMsg, QueryMsg};

pub const RELAY_CHAIN: u64 = 212;
pub const BSC_TESTNET: u64 = 97;
pub const BSC: u64 = 56;

pub const ETHER: u128 = 1_000_000_000_000_000_000;

/// EVM address made of one repeated byte
pub fn evm(byte: u8) -> String {
    format!("0x{}", hex::encode([byte; 20]))
}

pub fn evm_bytes(byte: u8) -> Binary {
    Binary::from([byte; 20].to_vec())
}

pub fn bsc_testnet_mos() -> Binary {
    evm_bytes(0xaa)
}

pub fn bsc_mos() -> Binary {
    evm_bytes(0xbb)
}

/// wBNB on chain 97 (locked there)
pub fn wbnb_97() -> Binary {
    evm_bytes(0x11)
}

/// wBNB on chain 56 (minted there)
pub fn wbnb_56() -> Binary {
    evm_bytes(0x22)
}

/// uluna on chain 97 (minted there)
pub fn luna_97() -> Binary {
    evm_bytes(0x33)
}

// ============================================================================
// Mock light client
// ============================================================================

pub mod light_client {
    use super::*;

    pub fn instantiate(
        _deps: DepsMut,
        _env: Env,
        _info: MessageInfo,
        _msg: Empty,
    ) -> StdResult<Response> {
        Ok(Response::new())
    }

    pub fn execute(
        _deps: DepsMut,
        _env: Env,
        _info: MessageInfo,
        _msg: Empty,
    ) -> StdResult<Response> {
        Ok(Response::new())
    }

    /// A proof is the JSON list of logs it proves
    pub fn query(_deps: Deps, _env: Env, msg: LightClientQueryMsg) -> StdResult<Binary> {
        match msg {
            LightClientQueryMsg::VerifyProofData { receipt_proof } => {
                let res = match from_json::<Vec<NormalizedLog>>(&receipt_proof) {
                    Ok(logs) => VerifyProofDataResponse {
                        success: true,
                        message: String::new(),
                        logs,
                    },
                    Err(err) => VerifyProofDataResponse {
                        success: false,
                        message: format!("bad receipt: {}", err),
                        logs: vec![],
                    },
                };
                to_json_binary(&res)
            }
        }
    }
}

// ============================================================================
// Mock receiver
// ============================================================================

pub mod receiver {
    use super::*;

    /// Payload that a failing receiver accepts
    pub const ACCEPTED_PAYLOAD: &[u8] = b"accepted";

    #[cw_serde]
    pub struct InstantiateMsg {
        pub fail: bool,
    }

    #[cw_serde]
    pub struct Received {
        pub order_id: Binary,
        pub from_chain: u64,
        pub token: Option<String>,
        pub amount: Uint128,
        pub payload: Binary,
        pub funds: Uint128,
    }

    const FAIL: Item<bool> = Item::new("fail");
    const RECEIVED: Item<Vec<Received>> = Item::new("received");

    pub fn instantiate(
        deps: DepsMut,
        _env: Env,
        _info: MessageInfo,
        msg: InstantiateMsg,
    ) -> StdResult<Response> {
        FAIL.save(deps.storage, &msg.fail)?;
        Ok(Response::new())
    }

    pub fn execute(
        deps: DepsMut,
        _env: Env,
        info: MessageInfo,
        msg: ReceiverExecuteMsg,
    ) -> StdResult<Response> {
        match msg {
            ReceiverExecuteMsg::OnMessageReceived {
                order_id,
                from_chain,
                token,
                amount,
                payload,
                ..
            } => {
                if FAIL.load(deps.storage)? && payload.as_slice() != ACCEPTED_PAYLOAD {
                    return Err(StdError::generic_err("receiver rejected payload"));
                }
                let funds = info
                    .funds
                    .iter()
                    .map(|coin| coin.amount)
                    .fold(Uint128::zero(), |acc, amount| acc + amount);
                let mut received = RECEIVED.may_load(deps.storage)?.unwrap_or_default();
                received.push(Received {
                    order_id,
                    from_chain,
                    token,
                    amount,
                    payload,
                    funds,
                });
                RECEIVED.save(deps.storage, &received)?;
                Ok(Response::new().add_attribute("method", "on_message_received"))
            }
        }
    }

    pub fn query(deps: Deps, _env: Env, _msg: Empty) -> StdResult<Binary> {
        to_json_binary(&RECEIVED.may_load(deps.storage)?.unwrap_or_default())
    }
}

// ============================================================================
// Suite
// ============================================================================

pub struct Suite {
    pub app: App,
    pub relay: Addr,
    pub light_client: Addr,
    pub fee_service: Addr,
    pub wbnb: Addr,
    pub wbnb_vault: Addr,
    pub luna_vault: Addr,
    pub admin: Addr,
    pub user: Addr,
    pub relayer: Addr,
    pub treasury: Addr,
    pub fee_collector: Addr,
    receiver_code: u64,
}

impl Suite {
    pub fn new() -> Self {
        let mut app = App::default();
        let admin = Addr::unchecked("admin");
        let user = Addr::unchecked("user");
        let relayer = Addr::unchecked("relayer");
        let treasury = Addr::unchecked("treasury");
        let fee_collector = Addr::unchecked("feecollector");

        app.init_modules(|router, _, storage| {
            for account in [&admin, &user, &relayer] {
                router
                    .bank
                    .init_balance(storage, account, coins(10_000_000_000, "uluna"))
                    .unwrap();
            }
        });

        let relay_code = app.store_code(Box::new(
            ContractWrapper::new(
                relay::contract::execute,
                relay::contract::instantiate,
                relay::contract::query,
            )
            .with_reply(relay::contract::reply),
        ));
        let cw20_code = app.store_code(Box::new(ContractWrapper::new(
            cw20_base::contract::execute,
            cw20_base::contract::instantiate,
            cw20_base::contract::query,
        )));
        let vault_code = app.store_code(Box::new(ContractWrapper::new(
            vault_token::contract::execute,
            vault_token::contract::instantiate,
            vault_token::contract::query,
        )));
        let fee_service_code = app.store_code(Box::new(ContractWrapper::new(
            fee_service::contract::execute,
            fee_service::contract::instantiate,
            fee_service::contract::query,
        )));
        let light_client_code = app.store_code(Box::new(ContractWrapper::new(
            light_client::execute,
            light_client::instantiate,
            light_client::query,
        )));
        let receiver_code = app.store_code(Box::new(ContractWrapper::new(
            receiver::execute,
            receiver::instantiate,
            receiver::query,
        )));

        let fee_service = app
            .instantiate_contract(
                fee_service_code,
                admin.clone(),
                &fee_service::msg::InstantiateMsg {
                    admin: admin.to_string(),
                    fee_receiver: Some(fee_collector.to_string()),
                },
                &[],
                "fee-service",
                None,
            )
            .unwrap();

        let relay = app
            .instantiate_contract(
                relay_code,
                admin.clone(),
                &InstantiateMsg {
                    admin: admin.to_string(),
                    chain_id: RELAY_CHAIN,
                    chain_name: "relay".to_string(),
                    native_denom: "uluna".to_string(),
                    fee_service: Some(fee_service.to_string()),
                    base_fee_receiver: Some(treasury.to_string()),
                },
                &[],
                "relay",
                None,
            )
            .unwrap();

        let wbnb = app
            .instantiate_contract(
                cw20_code,
                admin.clone(),
                &cw20_base::msg::InstantiateMsg {
                    name: "Wrapped BNB".to_string(),
                    symbol: "WBNB".to_string(),
                    decimals: 18,
                    initial_balances: vec![],
                    mint: Some(cw20::MinterResponse {
                        minter: relay.to_string(),
                        cap: None,
                    }),
                    marketing: None,
                },
                &[],
                "wbnb",
                None,
            )
            .unwrap();

        let vault = |app: &mut App, underlying: &str, symbol: &str, decimals: u8| {
            app.instantiate_contract(
                vault_code,
                admin.clone(),
                &vault_token::msg::InstantiateMsg {
                    admin: admin.to_string(),
                    underlying: underlying.to_string(),
                    name: format!("Vault {}", symbol),
                    symbol: format!("v{}", symbol),
                    decimals,
                    managers: vec![relay.to_string()],
                },
                &[],
                "vault",
                None,
            )
            .unwrap()
        };
        let wbnb_vault = vault(&mut app, wbnb.as_str(), "WBNB", 18);
        let luna_vault = vault(&mut app, "uluna", "LUNA", 6);

        let light_client = app
            .instantiate_contract(
                light_client_code,
                admin.clone(),
                &Empty {},
                &[],
                "light-client",
                None,
            )
            .unwrap();

        let mut suite = Suite {
            app,
            relay,
            light_client,
            fee_service,
            wbnb,
            wbnb_vault,
            luna_vault,
            admin,
            user,
            relayer,
            treasury,
            fee_collector,
            receiver_code,
        };
        suite.register_spokes();
        suite
    }

    fn register_spokes(&mut self) {
        let light_client = self.light_client.to_string();
        for (chain_id, name, mos) in [
            (BSC_TESTNET, "bsc-testnet", evm(0xaa)),
            (BSC, "bsc", evm(0xbb)),
        ] {
            self.admin_exec(ExecuteMsg::RegisterChain {
                chain_id,
                name: name.to_string(),
                kind: ChainKind::Evm,
                mos,
                wrapped_native_token: String::new(),
                light_client: Some(light_client.clone()),
                fee_service: None,
            })
            .unwrap();
        }

        self.admin_exec(ExecuteMsg::RegisterToken {
            token: AssetInfo::Cw20 {
                contract_addr: self.wbnb.clone(),
            },
            vault: self.wbnb_vault.to_string(),
            mintable: true,
        })
        .unwrap();
        self.admin_exec(ExecuteMsg::RegisterToken {
            token: AssetInfo::Native {
                denom: "uluna".to_string(),
            },
            vault: self.luna_vault.to_string(),
            mintable: false,
        })
        .unwrap();

        let wbnb = self.wbnb.to_string();
        for (token, chain_id, target, decimals, mintable) in [
            (wbnb.clone(), BSC_TESTNET, evm(0x11), 18, false),
            (wbnb.clone(), BSC, evm(0x22), 18, true),
            ("uluna".to_string(), BSC_TESTNET, evm(0x33), 18, true),
        ] {
            self.admin_exec(ExecuteMsg::MapToken {
                token,
                chain_id,
                target_token: target,
                decimals,
                mintable,
            })
            .unwrap();
        }

        self.admin_exec(ExecuteMsg::RegisterTokenChains {
            token: wbnb,
            chain_ids: vec![BSC_TESTNET, BSC],
            enable: true,
        })
        .unwrap();
        self.admin_exec(ExecuteMsg::RegisterTokenChains {
            token: "uluna".to_string(),
            chain_ids: vec![BSC_TESTNET],
            enable: true,
        })
        .unwrap();
    }

    pub fn admin_exec(&mut self, msg: ExecuteMsg) -> AnyResult<AppResponse> {
        let admin = self.admin.clone();
        self.exec(&admin, msg)
    }

    pub fn exec(&mut self, sender: &Addr, msg: ExecuteMsg) -> AnyResult<AppResponse> {
        self.app
            .execute_contract(sender.clone(), self.relay.clone(), &msg, &[])
    }

    pub fn query<T: serde::de::DeserializeOwned>(&self, msg: QueryMsg) -> StdResult<T> {
        self.app.wrap().query_wasm_smart(&self.relay, &msg)
    }

    pub fn new_receiver(&mut self, fail: bool) -> Addr {
        self.app
            .instantiate_contract(
                self.receiver_code,
                self.admin.clone(),
                &receiver::InstantiateMsg { fail },
                &[],
                "receiver",
                None,
            )
            .unwrap()
    }

    pub fn received(&self, receiver: &Addr) -> Vec<receiver::Received> {
        self.app
            .wrap()
            .query_wasm_smart(receiver, &Empty {})
            .unwrap()
    }

    pub fn cw20_balance(&self, token: &Addr, owner: &Addr) -> Uint128 {
        let res: cw20::BalanceResponse = self
            .app
            .wrap()
            .query_wasm_smart(
                token,
                &cw20::Cw20QueryMsg::Balance {
                    address: owner.to_string(),
                },
            )
            .unwrap();
        res.balance
    }

    pub fn native_balance(&self, owner: &Addr) -> Uint128 {
        self.app.wrap().query_balance(owner, "uluna").unwrap().amount
    }

    pub fn net_flow(&self, vault: &Addr, chain_id: u64) -> i128 {
        let res: vault_token::msg::NetFlowResponse = self
            .app
            .wrap()
            .query_wasm_smart(vault, &vault_token::msg::QueryMsg::NetFlow { chain_id })
            .unwrap();
        res.net_flow.i128()
    }

    /// Wire message from a spoke chain to `to` on the relay chain
    pub fn message_to_relay(
        &self,
        message_type: MessageType,
        token: Binary,
        amount: Uint128,
        to: &str,
        payload: &[u8],
    ) -> WireMessage {
        WireMessage {
            version: MESSAGE_VERSION,
            message_type,
            token,
            mos: Binary::from(self.relay.as_bytes()),
            from: evm_bytes(0x99),
            to: Binary::from(to.as_bytes()),
            payload: Binary::from(payload),
            amount,
        }
    }

    /// Order id and receipt proof of a `MessageOut` log emitted by `from_chain`
    pub fn prove(
        &self,
        from_chain: u64,
        to_chain: u64,
        nonce: u64,
        message: &WireMessage,
    ) -> (Binary, Binary) {
        let mos = match from_chain {
            BSC_TESTNET => bsc_testnet_mos(),
            _ => bsc_mos(),
        };
        let order_id = compute_order_id(
            &mos,
            nonce,
            from_chain,
            to_chain,
            &message.from,
            &message.to,
        );
        let log = NormalizedLog {
            log_address: mos,
            topics: vec![
                Binary::from(MESSAGE_OUT_TOPIC.to_vec()),
                Binary::from(order_id.to_vec()),
                Binary::from(pack_chain_and_gas_limit(from_chain, to_chain, 0).to_vec()),
            ],
            data: Binary::from(message.encode().unwrap()),
        };
        (
            Binary::from(order_id.to_vec()),
            to_json_binary(&vec![log]).unwrap(),
        )
    }

    pub fn message_in(
        &mut self,
        chain_id: u64,
        order_id: Binary,
        receipt_proof: Binary,
    ) -> AnyResult<AppResponse> {
        let relayer = self.relayer.clone();
        self.exec(
            &relayer,
            ExecuteMsg::MessageIn {
                chain_id,
                log_index: 0,
                order_id,
                receipt_proof,
            },
        )
    }
}

/// First wasm event of `ty` emitted by the relay
pub fn find_event<'a>(res: &'a AppResponse, ty: &str) -> Option<&'a Event> {
    let wasm_ty = format!("wasm-{}", ty);
    res.events.iter().find(|e| e.ty == wasm_ty)
}

pub fn event_attr(event: &Event, key: &str) -> String {
    event
        .attributes
        .iter()
        .find(|a| a.key == key)
        .map(|a| a.value.clone())
        .unwrap_or_else(|| panic!("attribute {} missing on {}", key, event.ty))
}
