//! Inbound handlers (MessageIn, ExecuteDelivery, RetryMessageIn).
//!
//! A relayer submits a receipt proof for a `MessageOut` log emitted on a
//! spoke chain. The chain's light client verifies the proof, the log is
//! checked against the chain record and the order is routed:
//!
//! - BRIDGE: fees are taken, the vault ledger is booked and the tokens are
//!   delivered on the relay chain or relayed onward.
//! - DEPOSIT: the amount is deposited into the token's vault.
//! - MESSAGE / CALLDATA / GENERAL: delivered to a receiver or relayed onward.
//!
//! Deliveries run in a self-dispatched submessage. A failing receiver only
//! marks the order as failed, the delivery stays available for retry.

use common::{
    AssetInfo, LightClientQueryMsg, MessageType, ReceiverExecuteMsg, VerifyProofDataResponse,
    WireMessage,
};
use cosmwasm_std::{
    coins, to_json_binary, Addr, Api, Binary, CosmosMsg, Deps, DepsMut, Env, Event, MessageInfo,
    QuerierWrapper, Reply, Response, Storage, SubMsg, SubMsgResult, Uint128, WasmMsg,
};

use crate::error::ContractError;
use crate::execute::fees::collect_fees;
use crate::execute::outbound::message_out;
use crate::fee_math::{convert_decimals, transfer_fee};
use crate::hash::{bytes32_to_hex, unpack_chain_and_gas_limit, MESSAGE_OUT_TOPIC};
use crate::msg::ExecuteMsg;
use crate::registry::token::is_bridgeable;
use crate::registry::{load_chain, load_relay_token, relay_decimals};
use crate::state::{
    Config, Delivery, Order, RelayToken, CHAINS, CONFIG, DELIVERIES, IN_ORDERS, PENDING_DELIVERY,
    REPLY_DELIVERY, TARGET_TOKENS, TOKEN_MAPPINGS,
};
use crate::vault::{covers, deposit_msg, mint_msg, query_net_flow, transfer_token_msg};

/// A verified `MessageOut` log
struct VerifiedMessage {
    message: WireMessage,
    to_chain: u64,
    gas_limit: u64,
}

/// Result of routing one inbound order
#[derive(Default)]
struct Routed {
    messages: Vec<CosmosMsg>,
    delivery: Option<Delivery>,
    events: Vec<Event>,
    token: Option<String>,
    amount: Uint128,
}

fn invalid_log(reason: impl Into<String>) -> ContractError {
    ContractError::InvalidBridgeLog {
        reason: reason.into(),
    }
}

/// Relay-chain address carried in a wire message's `to` field
fn receiver_address(api: &dyn Api, to: &[u8]) -> Result<Addr, ContractError> {
    let text = std::str::from_utf8(to).map_err(|_| ContractError::InvalidAddress {
        reason: "receiver is not utf-8".to_string(),
    })?;
    api.addr_validate(text)
        .map_err(|e| ContractError::InvalidAddress {
            reason: format!("receiver {}: {}", text, e),
        })
}

// ============================================================================
// Verification
// ============================================================================

fn verify_message_log(
    deps: Deps,
    env: &Env,
    config: &Config,
    chain_id: u64,
    log_index: u32,
    order_id: &Binary,
    receipt_proof: Binary,
) -> Result<VerifiedMessage, ContractError> {
    let chain = CHAINS
        .may_load(deps.storage, chain_id)?
        .filter(|chain| chain.chain_id != config.chain_id)
        .ok_or(ContractError::InvalidRelayChain { chain_id })?;
    let light_client = chain
        .light_client
        .ok_or(ContractError::InvalidRelayChain { chain_id })?;

    let proof: VerifyProofDataResponse = deps
        .querier
        .query_wasm_smart(
            &light_client,
            &LightClientQueryMsg::VerifyProofData { receipt_proof },
        )
        .map_err(|e| ContractError::ProofVerificationFailed {
            reason: e.to_string(),
        })?;
    if !proof.success {
        return Err(ContractError::ProofVerificationFailed {
            reason: proof.message,
        });
    }

    let log = proof
        .logs
        .get(log_index as usize)
        .ok_or_else(|| invalid_log(format!("no log at index {}", log_index)))?;
    if log.log_address != chain.mos {
        return Err(invalid_log("log not emitted by the chain's mos"));
    }
    if log.topics.len() < 3 {
        return Err(invalid_log(format!("expected 3 topics, got {}", log.topics.len())));
    }
    if log.topics[0].as_slice() != MESSAGE_OUT_TOPIC.as_slice() {
        return Err(invalid_log("not a MessageOut log"));
    }
    if &log.topics[1] != order_id {
        return Err(invalid_log("order id mismatch"));
    }
    let (from_chain, to_chain, gas_limit) = unpack_chain_and_gas_limit(&log.topics[2])
        .ok_or_else(|| invalid_log("malformed chain and gas limit topic"))?;
    if from_chain != chain_id {
        return Err(invalid_log(format!(
            "source chain mismatch: log says {}, submitted {}",
            from_chain, chain_id
        )));
    }

    let message = WireMessage::decode(&log.data).map_err(|e| invalid_log(e.to_string()))?;
    if to_chain == config.chain_id && message.mos.as_slice() != env.contract.address.as_bytes() {
        return Err(invalid_log("message not addressed to this relay"));
    }

    Ok(VerifiedMessage {
        message,
        to_chain,
        gas_limit,
    })
}

// ============================================================================
// Message in
// ============================================================================

pub fn execute_message_in(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    chain_id: u64,
    log_index: u32,
    order_id: Binary,
    receipt_proof: Binary,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    let VerifiedMessage {
        message,
        to_chain,
        gas_limit,
    } = verify_message_log(
        deps.as_ref(),
        &env,
        &config,
        chain_id,
        log_index,
        &order_id,
        receipt_proof,
    )?;
    if IN_ORDERS.has(deps.storage, order_id.as_slice()) {
        return Err(ContractError::AlreadyProcessed);
    }

    let route = Route {
        config: &config,
        env: &env,
        relayer: &info.sender,
        order_id: &order_id,
        from_chain: chain_id,
        to_chain,
        gas_limit,
    };
    let routed = match message.message_type {
        MessageType::Bridge => route.bridge(deps.api, deps.storage, &deps.querier, &message)?,
        MessageType::Deposit => route.deposit(deps.api, deps.storage, &message)?,
        MessageType::Message | MessageType::Calldata | MessageType::General => {
            route.message(deps.api, deps.storage, &message)?
        }
    };

    let delivered_here = routed.delivery.is_some();
    IN_ORDERS.save(
        deps.storage,
        order_id.as_slice(),
        &Order {
            order_id: order_id.clone(),
            from_chain: chain_id,
            to_chain,
            message_type: message.message_type,
            token: message.token.clone(),
            amount: message.amount,
            from: message.from.clone(),
            to: message.to.clone(),
            payload: message.payload.clone(),
            processed: true,
            // Settled by the delivery submessage
            result: !delivered_here,
            reason: None,
        },
    )?;

    let mut response = Response::new()
        .add_messages(routed.messages)
        .add_events(routed.events);
    if let Some(delivery) = routed.delivery {
        response = response.add_submessage(schedule_delivery(deps.storage, &env, delivery)?);
    }

    Ok(response
        .add_event(
            Event::new("message_in")
                .add_attribute("order_id", bytes32_to_hex(&order_id))
                .add_attribute("from_chain", chain_id.to_string())
                .add_attribute("to_chain", to_chain.to_string())
                .add_attribute("message_type", message.message_type.as_str())
                .add_attribute("token", routed.token.unwrap_or_default())
                .add_attribute("amount", routed.amount)
                .add_attribute("relay", (to_chain != config.chain_id).to_string()),
        )
        .add_attribute("method", "message_in")
        .add_attribute("relayer", info.sender)
        .add_attribute("order_id", bytes32_to_hex(&order_id)))
}

/// Routing context of one verified order
struct Route<'a> {
    config: &'a Config,
    env: &'a Env,
    relayer: &'a Addr,
    order_id: &'a Binary,
    from_chain: u64,
    to_chain: u64,
    gas_limit: u64,
}

impl Route<'_> {
    fn is_local(&self) -> bool {
        self.to_chain == self.config.chain_id
    }

    /// Relay token bound to the message's source-chain token, and the
    /// amount in relay-chain decimals
    fn source_token(
        &self,
        storage: &dyn Storage,
        message: &WireMessage,
    ) -> Result<(String, RelayToken, Uint128), ContractError> {
        let token = TARGET_TOKENS
            .may_load(storage, (self.from_chain, message.token.as_slice()))?
            .ok_or_else(|| ContractError::TokenNotRegistered {
                token: hex::encode(message.token.as_slice()),
            })?;
        let relay_token = load_relay_token(storage, &token)?;
        let source = TOKEN_MAPPINGS
            .may_load(storage, (token.as_str(), self.from_chain))?
            .ok_or(ContractError::TokenNotMapped)?;
        let amount = convert_decimals(
            message.amount,
            source.decimals,
            relay_decimals(storage, &token)?,
        )?;
        Ok((token, relay_token, amount))
    }

    /// A receiver that cannot be addressed here rejects the order, since a
    /// retry could never reach it either.
    fn delivery(
        &self,
        api: &dyn Api,
        message: &WireMessage,
        asset: Option<AssetInfo>,
        mintable: bool,
        amount: Uint128,
    ) -> Result<Delivery, ContractError> {
        let receiver = receiver_address(api, &message.to)?;
        Ok(Delivery {
            order_id: self.order_id.clone(),
            from_chain: self.from_chain,
            asset,
            mintable,
            amount,
            receiver: receiver.into_string(),
            from: message.from.clone(),
            payload: message.payload.clone(),
        })
    }

    fn bridge(
        &self,
        api: &dyn Api,
        storage: &mut dyn Storage,
        querier: &QuerierWrapper,
        message: &WireMessage,
    ) -> Result<Routed, ContractError> {
        let (token, relay_token, amount) = self.source_token(storage, message)?;

        // Inbound value is already locked at the source, so the fee never
        // exceeds the amount
        let quote = transfer_fee(
            storage,
            &message.from,
            &token,
            amount,
            self.from_chain,
            self.to_chain,
            !message.payload.is_empty(),
        )?
        .capped(amount);
        let split = collect_fees(storage, self.config, &token, &quote, Some(self.relayer))?;
        let out_amount = amount - quote.total_fee;

        let mut routed = Routed {
            token: Some(token.clone()),
            amount,
            ..Routed::default()
        };
        if relay_token.mintable && !quote.total_fee.is_zero() {
            if let AssetInfo::Cw20 { contract_addr } = &relay_token.asset {
                routed.messages.push(mint_msg(
                    contract_addr,
                    &self.env.contract.address,
                    quote.total_fee,
                )?);
            }
        }

        if self.is_local() {
            routed.messages.push(transfer_token_msg(
                &relay_token.vault_token,
                self.from_chain,
                amount,
                self.config.chain_id,
                out_amount,
                self.config.chain_id,
                split.fee_out,
            )?);
            routed.delivery = Some(self.delivery(
                api,
                message,
                Some(relay_token.asset.clone()),
                relay_token.mintable,
                out_amount,
            )?);
            return Ok(routed);
        }

        // Onward relay to another spoke chain
        let target_chain = load_chain(storage, self.to_chain)?;
        let not_registered = || ContractError::TokenNotRegistered {
            token: token.clone(),
        };
        let mapping = TOKEN_MAPPINGS
            .may_load(storage, (token.as_str(), self.to_chain))?
            .ok_or_else(not_registered)?;
        if !is_bridgeable(storage, &token, self.to_chain)? {
            return Err(not_registered());
        }
        if !mapping.mintable {
            let available = query_net_flow(querier, &relay_token.vault_token, self.to_chain)?;
            if !covers(available, out_amount) {
                return Err(ContractError::InsufficientVaultBalance {
                    chain_id: self.to_chain,
                    available: available.to_string(),
                    required: out_amount,
                });
            }
        }
        routed.messages.push(transfer_token_msg(
            &relay_token.vault_token,
            self.from_chain,
            amount,
            self.to_chain,
            out_amount,
            self.config.chain_id,
            split.fee_out,
        )?);

        let onward = WireMessage {
            token: mapping.target_token.clone(),
            mos: target_chain.mos.clone(),
            amount: convert_decimals(
                out_amount,
                relay_decimals(storage, &token)?,
                mapping.decimals,
            )?,
            ..message.clone()
        };
        routed.events.push(message_out(
            storage,
            self.order_id.clone(),
            self.from_chain,
            self.to_chain,
            self.gas_limit,
            &onward,
            true,
        )?);
        Ok(routed)
    }

    fn deposit(
        &self,
        api: &dyn Api,
        storage: &mut dyn Storage,
        message: &WireMessage,
    ) -> Result<Routed, ContractError> {
        if !self.is_local() {
            return Err(invalid_log("deposits must target the relay chain"));
        }
        let (token, relay_token, amount) = self.source_token(storage, message)?;
        if amount.is_zero() {
            return Err(ContractError::ZeroAmount);
        }
        let receiver = receiver_address(api, &message.to)?;

        let mut messages = vec![deposit_msg(
            &relay_token.vault_token,
            self.from_chain,
            amount,
            &receiver,
        )?];
        // Backing for the shares, redeemable through Withdraw
        if relay_token.mintable {
            if let AssetInfo::Cw20 { contract_addr } = &relay_token.asset {
                messages.push(mint_msg(contract_addr, &self.env.contract.address, amount)?);
            }
        }

        Ok(Routed {
            messages,
            token: Some(token),
            amount,
            ..Routed::default()
        })
    }

    fn message(
        &self,
        api: &dyn Api,
        storage: &mut dyn Storage,
        message: &WireMessage,
    ) -> Result<Routed, ContractError> {
        if self.is_local() {
            return Ok(Routed {
                delivery: Some(self.delivery(api, message, None, false, Uint128::zero())?),
                ..Routed::default()
            });
        }

        let target_chain = load_chain(storage, self.to_chain)?;
        let onward = WireMessage {
            mos: target_chain.mos,
            ..message.clone()
        };
        let event = message_out(
            storage,
            self.order_id.clone(),
            self.from_chain,
            self.to_chain,
            self.gas_limit,
            &onward,
            true,
        )?;
        Ok(Routed {
            events: vec![event],
            ..Routed::default()
        })
    }
}

// ============================================================================
// Delivery
// ============================================================================

fn schedule_delivery(
    storage: &mut dyn Storage,
    env: &Env,
    delivery: Delivery,
) -> Result<SubMsg, ContractError> {
    DELIVERIES.save(storage, delivery.order_id.as_slice(), &delivery)?;
    PENDING_DELIVERY.save(storage, &delivery.order_id)?;
    let msg = WasmMsg::Execute {
        contract_addr: env.contract.address.to_string(),
        msg: to_json_binary(&ExecuteMsg::ExecuteDelivery {
            order_id: delivery.order_id,
        })?,
        funds: vec![],
    };
    Ok(SubMsg::reply_on_error(msg, REPLY_DELIVERY))
}

/// Transfers and the receiver callback of a delivery
fn delivery_messages(api: &dyn Api, delivery: &Delivery) -> Result<Vec<CosmosMsg>, ContractError> {
    let receiver = api.addr_validate(&delivery.receiver)?;
    let mut messages = vec![];
    let mut funds = vec![];

    if let Some(asset) = &delivery.asset {
        if !delivery.amount.is_zero() {
            match asset {
                AssetInfo::Cw20 { contract_addr } if delivery.mintable => {
                    messages.push(mint_msg(contract_addr, &receiver, delivery.amount)?);
                }
                // Native tokens ride along with the callback
                AssetInfo::Native { denom } if !delivery.payload.is_empty() => {
                    funds = coins(delivery.amount.u128(), denom);
                }
                _ => messages.push(asset.transfer_msg(&receiver, delivery.amount)?),
            }
        }
    }

    if delivery.asset.is_none() || !delivery.payload.is_empty() {
        messages.push(CosmosMsg::Wasm(WasmMsg::Execute {
            contract_addr: receiver.to_string(),
            msg: to_json_binary(&ReceiverExecuteMsg::OnMessageReceived {
                order_id: delivery.order_id.clone(),
                from_chain: delivery.from_chain,
                token: delivery.asset.as_ref().map(AssetInfo::key),
                amount: delivery.amount,
                from: delivery.from.clone(),
                payload: delivery.payload.clone(),
            })?,
            funds,
        }));
    }
    Ok(messages)
}

fn finish_delivery(storage: &mut dyn Storage, order_id: &Binary) -> Result<(), ContractError> {
    DELIVERIES.remove(storage, order_id.as_slice());
    PENDING_DELIVERY.remove(storage);
    IN_ORDERS.update(storage, order_id.as_slice(), |order| -> Result<_, ContractError> {
        let mut order = order.ok_or(ContractError::OrderNotFound)?;
        order.result = true;
        order.reason = None;
        Ok(order)
    })?;
    Ok(())
}

/// Self-dispatched delivery. Runs as a submessage of `MessageIn`.
pub fn execute_delivery(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    order_id: Binary,
) -> Result<Response, ContractError> {
    if info.sender != env.contract.address {
        return Err(ContractError::Unauthorized);
    }
    let delivery = DELIVERIES
        .may_load(deps.storage, order_id.as_slice())?
        .ok_or(ContractError::OrderNotFound)?;
    let messages = delivery_messages(deps.api, &delivery)?;
    finish_delivery(deps.storage, &order_id)?;

    Ok(Response::new()
        .add_messages(messages)
        .add_attribute("method", "execute_delivery")
        .add_attribute("order_id", bytes32_to_hex(&order_id))
        .add_attribute("receiver", delivery.receiver))
}

/// Record a failed delivery. The delivery is kept for retry.
pub fn reply_delivery(deps: DepsMut, msg: Reply) -> Result<Response, ContractError> {
    let order_id = PENDING_DELIVERY.load(deps.storage)?;
    PENDING_DELIVERY.remove(deps.storage);

    let error = match msg.result {
        SubMsgResult::Err(error) => error,
        SubMsgResult::Ok(_) => return Ok(Response::new()),
    };
    let reason = ContractError::ReceiverCallFailed { reason: error }.to_string();
    IN_ORDERS.update(
        deps.storage,
        order_id.as_slice(),
        |order| -> Result<_, ContractError> {
            let mut order = order.ok_or(ContractError::OrderNotFound)?;
            order.result = false;
            order.reason = Some(reason.clone());
            Ok(order)
        },
    )?;

    Ok(Response::new()
        .add_attribute("method", "reply_delivery")
        .add_event(
            Event::new("message_delivery_failed")
                .add_attribute("order_id", bytes32_to_hex(&order_id))
                .add_attribute("reason", reason),
        ))
}

/// Re-run a failed delivery inline; any failure reverts the whole call and
/// the order stays retryable.
pub fn execute_retry_message_in(
    deps: DepsMut,
    info: MessageInfo,
    order_id: Binary,
    payload: Option<Binary>,
) -> Result<Response, ContractError> {
    let order = IN_ORDERS
        .may_load(deps.storage, order_id.as_slice())?
        .ok_or(ContractError::OrderNotFound)?;
    if order.result {
        return Err(ContractError::RetryNotAllowed);
    }
    let mut delivery = DELIVERIES
        .may_load(deps.storage, order_id.as_slice())?
        .ok_or(ContractError::RetryNotAllowed)?;
    if let Some(payload) = payload {
        if info.sender.as_str() != delivery.receiver {
            return Err(ContractError::Unauthorized);
        }
        delivery.payload = payload;
    }

    let messages = delivery_messages(deps.api, &delivery)?;
    finish_delivery(deps.storage, &order_id)?;

    Ok(Response::new()
        .add_messages(messages)
        .add_attribute("method", "retry_message_in")
        .add_attribute("order_id", bytes32_to_hex(&order_id))
        .add_attribute("sender", info.sender)
        .add_attribute("receiver", delivery.receiver))
}
