//! Outbound handlers (SwapOutToken, TransferOut, DepositToken, Withdraw).
//!
//! Tokens leaving the relay chain are booked on the vault ledger and
//! announced in a `message_out` event carrying the encoded wire message.

use common::{AssetInfo, MessageType, WireMessage, MESSAGE_VERSION};
use cosmwasm_std::{
    coins, from_json, Addr, BankMsg, Binary, CosmosMsg, DepsMut, Env, Event, MessageInfo,
    Response, Storage, Uint128,
};
use cw20::Cw20ReceiveMsg;
use fee_service::msg::{QueryMsg as FeeServiceQueryMsg, ServiceMessageFeeResponse};

use crate::error::ContractError;
use crate::execute::fees::{collect_fees, credit_fee};
use crate::fee_math::{convert_decimals, transfer_fee};
use crate::hash::{bytes32_to_hex, compute_order_id, pack_chain_and_gas_limit, MESSAGE_OUT_TOPIC};
use crate::msg::ReceiveMsg;
use crate::registry::chain::parse_chain_address;
use crate::registry::deposit::check_deposit;
use crate::registry::token::is_bridgeable;
use crate::registry::{load_chain, relay_decimals};
use crate::state::{Order, CONFIG, NONCE, OUT_ORDERS, RELAY_TOKENS, TOKEN_MAPPINGS};
use crate::vault::{
    burn_msg, covers, deposit_msg, query_net_flow, query_token_amount, transfer_token_msg,
    withdraw_msg,
};

// ============================================================================
// Message out
// ============================================================================

/// Allocate the next order id for a message leaving the relay
pub(crate) fn next_order_id(
    storage: &mut dyn Storage,
    env: &Env,
    from_chain: u64,
    to_chain: u64,
    from: &[u8],
    to: &[u8],
) -> Result<Binary, ContractError> {
    let nonce = NONCE.may_load(storage)?.unwrap_or_default();
    NONCE.save(storage, &(nonce + 1))?;
    let order_id = compute_order_id(
        env.contract.address.as_bytes(),
        nonce,
        from_chain,
        to_chain,
        from,
        to,
    );
    Ok(Binary::from(order_id.to_vec()))
}

/// Record an outbound order and build its `message_out` event
pub(crate) fn message_out(
    storage: &mut dyn Storage,
    order_id: Binary,
    from_chain: u64,
    to_chain: u64,
    gas_limit: u64,
    message: &WireMessage,
    relay: bool,
) -> Result<Event, ContractError> {
    let data = message.encode()?;
    let order = Order {
        order_id: order_id.clone(),
        from_chain,
        to_chain,
        message_type: message.message_type,
        token: message.token.clone(),
        amount: message.amount,
        from: message.from.clone(),
        to: message.to.clone(),
        payload: message.payload.clone(),
        processed: false,
        result: false,
        reason: None,
    };
    OUT_ORDERS.save(storage, order_id.as_slice(), &order)?;

    let chain_and_gas_limit = pack_chain_and_gas_limit(from_chain, to_chain, gas_limit);
    Ok(Event::new("message_out")
        .add_attribute("topic", bytes32_to_hex(&MESSAGE_OUT_TOPIC))
        .add_attribute("order_id", bytes32_to_hex(&order_id))
        .add_attribute("chain_and_gas_limit", bytes32_to_hex(&chain_and_gas_limit))
        .add_attribute("from_chain", from_chain.to_string())
        .add_attribute("to_chain", to_chain.to_string())
        .add_attribute("message_type", message.message_type.as_str())
        .add_attribute("relay", relay.to_string())
        .add_attribute("data", hex::encode(data)))
}

/// Refund of native funds sent above `amount`
fn refund_excess(
    recipient: &Addr,
    denom: &str,
    sent: Uint128,
    amount: Uint128,
) -> Option<CosmosMsg> {
    if sent > amount {
        Some(CosmosMsg::Bank(BankMsg::Send {
            to_address: recipient.to_string(),
            amount: coins((sent - amount).u128(), denom),
        }))
    } else {
        None
    }
}

// ============================================================================
// Swap out
// ============================================================================

/// Bridge native funds
pub fn execute_swap_out_native(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    token: String,
    amount: Uint128,
    to_chain: u64,
    receiver: String,
    payload: Binary,
) -> Result<Response, ContractError> {
    let asset = AssetInfo::Native { denom: token };
    let sent = asset.sent_amount(&info);
    if !amount.is_zero() && sent < amount {
        return Err(ContractError::InAmountLow {
            amount: sent,
            required: amount,
        });
    }

    let response = swap_out(
        deps,
        &env,
        &info.sender,
        asset.clone(),
        amount,
        to_chain,
        receiver,
        payload,
    )?;
    Ok(response.add_messages(refund_excess(&info.sender, &asset.key(), sent, amount)))
}

/// Dispatch cw20 hooks
pub fn execute_receive(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    cw20_msg: Cw20ReceiveMsg,
) -> Result<Response, ContractError> {
    let sender = deps.api.addr_validate(&cw20_msg.sender)?;
    let asset = AssetInfo::Cw20 {
        contract_addr: info.sender,
    };

    match from_json(&cw20_msg.msg)? {
        ReceiveMsg::SwapOutToken {
            to_chain,
            receiver,
            payload,
        } => swap_out(
            deps,
            &env,
            &sender,
            asset,
            cw20_msg.amount,
            to_chain,
            receiver,
            payload,
        ),
        ReceiveMsg::DepositToken { receiver } => {
            deposit(deps, &sender, asset, cw20_msg.amount, receiver)
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn swap_out(
    deps: DepsMut,
    env: &Env,
    sender: &Addr,
    asset: AssetInfo,
    amount: Uint128,
    to_chain: u64,
    receiver: String,
    payload: Binary,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    if to_chain == config.chain_id {
        return Err(ContractError::SameChain);
    }
    let chain = load_chain(deps.storage, to_chain)?;

    let token = asset.key();
    let not_registered = || ContractError::TokenNotRegistered {
        token: token.clone(),
    };
    let relay_token = RELAY_TOKENS
        .may_load(deps.storage, &token)?
        .filter(|t| t.asset == asset)
        .ok_or_else(not_registered)?;
    let mapping = TOKEN_MAPPINGS
        .may_load(deps.storage, (token.as_str(), to_chain))?
        .ok_or_else(not_registered)?;
    if !is_bridgeable(deps.storage, &token, to_chain)? {
        return Err(not_registered());
    }
    if amount.is_zero() {
        return Err(ContractError::ZeroAmount);
    }

    let to = parse_chain_address(chain.kind, &receiver)?;
    let from = sender.as_bytes();
    let quote = transfer_fee(
        deps.storage,
        from,
        &token,
        amount,
        config.chain_id,
        to_chain,
        !payload.is_empty(),
    )?;
    if amount <= quote.total_fee {
        return Err(ContractError::InAmountLow {
            amount,
            required: quote.total_fee,
        });
    }
    let out_amount = amount - quote.total_fee;

    if !mapping.mintable {
        let available = query_net_flow(&deps.querier, &relay_token.vault_token, to_chain)?;
        if !covers(available, out_amount) {
            return Err(ContractError::InsufficientVaultBalance {
                chain_id: to_chain,
                available: available.to_string(),
                required: out_amount,
            });
        }
    }

    let split = collect_fees(deps.storage, &config, &token, &quote, None)?;
    let target_amount = convert_decimals(
        out_amount,
        relay_decimals(deps.storage, &token)?,
        mapping.decimals,
    )?;

    let mut messages = vec![transfer_token_msg(
        &relay_token.vault_token,
        config.chain_id,
        amount,
        to_chain,
        out_amount,
        config.chain_id,
        split.fee_out,
    )?];
    if relay_token.mintable {
        if let AssetInfo::Cw20 { contract_addr } = &relay_token.asset {
            messages.push(burn_msg(contract_addr, out_amount)?);
        }
    }

    let order_id = next_order_id(deps.storage, env, config.chain_id, to_chain, from, &to)?;
    let message = WireMessage {
        version: MESSAGE_VERSION,
        message_type: MessageType::Bridge,
        token: mapping.target_token.clone(),
        mos: chain.mos.clone(),
        from: Binary::from(from),
        to: Binary::from(to),
        payload,
        amount: target_amount,
    };
    let event = message_out(
        deps.storage,
        order_id.clone(),
        config.chain_id,
        to_chain,
        0,
        &message,
        false,
    )?;

    Ok(Response::new()
        .add_messages(messages)
        .add_event(event)
        .add_attribute("method", "swap_out_token")
        .add_attribute("order_id", bytes32_to_hex(&order_id))
        .add_attribute("sender", sender)
        .add_attribute("token", token)
        .add_attribute("amount", amount)
        .add_attribute("fee", quote.total_fee)
        .add_attribute("to_chain", to_chain.to_string())
        .add_attribute("receiver", receiver)
        .add_attribute("target_amount", target_amount))
}

// ============================================================================
// Transfer out (pure messages)
// ============================================================================

pub fn execute_transfer_out(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    to_chain: u64,
    target: String,
    payload: Binary,
    gas_limit: u64,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    if to_chain == config.chain_id {
        return Err(ContractError::SameChain);
    }
    let chain = load_chain(deps.storage, to_chain)?;
    let to = parse_chain_address(chain.kind, &target)?;

    let relay_chain = load_chain(deps.storage, config.chain_id)?;
    let fee_service = relay_chain
        .fee_service
        .ok_or(ContractError::UnsupportedChain { chain_id: to_chain })?;
    let quote: ServiceMessageFeeResponse = deps
        .querier
        .query_wasm_smart(
            &fee_service,
            &FeeServiceQueryMsg::ServiceMessageFee {
                chain_id: to_chain,
                fee_token: config.native_denom.clone(),
                gas_limit: Uint128::from(gas_limit),
            },
        )
        .map_err(|_| ContractError::UnsupportedChain { chain_id: to_chain })?;

    let sent = AssetInfo::Native {
        denom: config.native_denom.clone(),
    }
    .sent_amount(&info);
    if sent < quote.fee {
        return Err(ContractError::InsufficientFee {
            expected: quote.fee,
            got: sent,
        });
    }

    let mut messages: Vec<CosmosMsg> = vec![];
    if !quote.fee.is_zero() {
        match &quote.receiver {
            Some(receiver) => messages.push(CosmosMsg::Bank(BankMsg::Send {
                to_address: receiver.to_string(),
                amount: coins(quote.fee.u128(), &config.native_denom),
            })),
            None => credit_fee(
                deps.storage,
                &config.base_fee_receiver,
                &config.native_denom,
                quote.fee,
            )?,
        }
    }
    messages.extend(refund_excess(
        &info.sender,
        &config.native_denom,
        sent,
        quote.fee,
    ));

    let from = info.sender.as_bytes();
    let order_id = next_order_id(deps.storage, &env, config.chain_id, to_chain, from, &to)?;
    let message = WireMessage {
        version: MESSAGE_VERSION,
        message_type: MessageType::Message,
        token: Binary::default(),
        mos: chain.mos.clone(),
        from: Binary::from(from),
        to: Binary::from(to),
        payload,
        amount: Uint128::zero(),
    };
    let event = message_out(
        deps.storage,
        order_id.clone(),
        config.chain_id,
        to_chain,
        gas_limit,
        &message,
        false,
    )?;

    Ok(Response::new()
        .add_messages(messages)
        .add_event(event)
        .add_attribute("method", "transfer_out")
        .add_attribute("order_id", bytes32_to_hex(&order_id))
        .add_attribute("sender", info.sender)
        .add_attribute("to_chain", to_chain.to_string())
        .add_attribute("target", target)
        .add_attribute("fee", quote.fee))
}

// ============================================================================
// Local vault deposits
// ============================================================================

pub fn execute_deposit_native(
    deps: DepsMut,
    info: MessageInfo,
    token: String,
    amount: Uint128,
    receiver: String,
) -> Result<Response, ContractError> {
    let asset = AssetInfo::Native { denom: token };
    let sent = asset.sent_amount(&info);
    if !amount.is_zero() && sent < amount {
        return Err(ContractError::InAmountLow {
            amount: sent,
            required: amount,
        });
    }

    let response = deposit(deps, &info.sender, asset.clone(), amount, receiver)?;
    Ok(response.add_messages(refund_excess(&info.sender, &asset.key(), sent, amount)))
}

fn deposit(
    deps: DepsMut,
    sender: &Addr,
    asset: AssetInfo,
    amount: Uint128,
    receiver: String,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    let token = asset.key();
    let relay_token = RELAY_TOKENS
        .may_load(deps.storage, &token)?
        .filter(|t| t.asset == asset)
        .ok_or(ContractError::TokenNotRegistered {
            token: token.clone(),
        })?;
    if amount.is_zero() {
        return Err(ContractError::ZeroAmount);
    }
    check_deposit(deps.as_ref(), sender, &token, amount)?;
    let receiver = deps.api.addr_validate(&receiver)?;

    Ok(Response::new()
        .add_message(deposit_msg(
            &relay_token.vault_token,
            config.chain_id,
            amount,
            &receiver,
        )?)
        .add_attribute("method", "deposit_token")
        .add_attribute("sender", sender)
        .add_attribute("token", token)
        .add_attribute("amount", amount)
        .add_attribute("receiver", receiver))
}

/// Burn vault shares of the sender and release the underlying
pub fn execute_withdraw(
    deps: DepsMut,
    info: MessageInfo,
    token: String,
    vault_amount: Uint128,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    let relay_token = RELAY_TOKENS
        .may_load(deps.storage, &token)?
        .ok_or(ContractError::TokenNotRegistered {
            token: token.clone(),
        })?;
    if vault_amount.is_zero() {
        return Err(ContractError::ZeroAmount);
    }

    let amount = query_token_amount(&deps.querier, &relay_token.vault_token, vault_amount)?;
    let mut messages = vec![withdraw_msg(
        &relay_token.vault_token,
        config.chain_id,
        vault_amount,
        &info.sender,
    )?];
    if !amount.is_zero() {
        messages.push(relay_token.asset.transfer_msg(&info.sender, amount)?);
    }

    Ok(Response::new()
        .add_messages(messages)
        .add_attribute("method", "withdraw")
        .add_attribute("sender", info.sender)
        .add_attribute("token", token)
        .add_attribute("vault_amount", vault_amount)
        .add_attribute("amount", amount))
}
