//! Inbound flows: proven spoke logs settled, delivered or relayed onward

mod support;

use common::{MessageType, WireMessage};
use cosmwasm_std::{coins, to_json_binary, Binary, Uint128};
use cw20::Cw20ExecuteMsg;
use cw_multi_test::Executor;

use relay::msg::{AmountResponse, ExecuteMsg, QueryMsg, ReceiveMsg};
use relay::state::{DistributeKind, Order};
use support::*;

fn wbnb_in(suite: &Suite, to: &str, amount: u128, payload: &[u8]) -> WireMessage {
    suite.message_to_relay(
        MessageType::Bridge,
        wbnb_97(),
        Uint128::new(amount),
        to,
        payload,
    )
}

/// Lock uluna on the relay by bridging it out to chain 97
fn lock_luna(suite: &mut Suite, amount: u128) {
    let user = suite.user.clone();
    let relay = suite.relay.clone();
    suite
        .app
        .execute_contract(
            user,
            relay,
            &ExecuteMsg::SwapOutToken {
                token: "uluna".to_string(),
                amount: Uint128::new(amount),
                to_chain: BSC_TESTNET,
                receiver: evm(0x55),
                payload: Binary::default(),
            },
            &coins(amount, "uluna"),
        )
        .unwrap();
}

fn luna_in(suite: &Suite, to: &str, amount_18: u128, payload: &[u8]) -> WireMessage {
    suite.message_to_relay(
        MessageType::Bridge,
        luna_97(),
        Uint128::new(amount_18),
        to,
        payload,
    )
}

// ============================================================================
// Bridge & deposit
// ============================================================================

#[test]
fn test_bridge_in_mints_to_receiver() {
    let mut suite = Suite::new();
    let user = suite.user.clone();
    let message = wbnb_in(&suite, user.as_str(), 50 * ETHER, b"");
    let (order_id, proof) = suite.prove(BSC_TESTNET, RELAY_CHAIN, 0, &message);

    let res = suite
        .message_in(BSC_TESTNET, order_id.clone(), proof)
        .unwrap();

    let event = find_event(&res, "message_in").unwrap();
    assert_eq!(event_attr(event, "message_type"), "bridge");
    assert_eq!(event_attr(event, "relay"), "false");
    assert_eq!(event_attr(event, "amount"), (50 * ETHER).to_string());

    let wbnb = suite.wbnb.clone();
    assert_eq!(suite.cw20_balance(&wbnb, &user), Uint128::new(50 * ETHER));

    let order: Option<Order> = suite
        .query(QueryMsg::InOrder {
            order_id: order_id.clone(),
        })
        .unwrap();
    let order = order.unwrap();
    assert!(order.processed);
    assert!(order.result);

    // The locked side of the ledger grows, the relay side pays out
    let vault = suite.wbnb_vault.clone();
    assert_eq!(suite.net_flow(&vault, BSC_TESTNET), (50 * ETHER) as i128);
    assert_eq!(suite.net_flow(&vault, RELAY_CHAIN), -((50 * ETHER) as i128));
}

#[test]
fn test_replayed_order_is_rejected() {
    let mut suite = Suite::new();
    let user = suite.user.clone();
    let message = wbnb_in(&suite, user.as_str(), ETHER, b"");
    let (order_id, proof) = suite.prove(BSC_TESTNET, RELAY_CHAIN, 7, &message);

    suite
        .message_in(BSC_TESTNET, order_id.clone(), proof.clone())
        .unwrap();
    let err = suite.message_in(BSC_TESTNET, order_id, proof).unwrap_err();
    assert_eq!(err.root_cause().to_string(), "Order already processed");

    let wbnb = suite.wbnb.clone();
    assert_eq!(suite.cw20_balance(&wbnb, &user), Uint128::new(ETHER));
}

#[test]
fn test_deposit_withdraw_and_swap_back() {
    let mut suite = Suite::new();
    let user = suite.user.clone();
    let message = suite.message_to_relay(
        MessageType::Deposit,
        wbnb_97(),
        Uint128::new(50 * ETHER),
        user.as_str(),
        b"",
    );
    let (order_id, proof) = suite.prove(BSC_TESTNET, RELAY_CHAIN, 0, &message);
    suite.message_in(BSC_TESTNET, order_id, proof).unwrap();

    // Shares minted 1:1 on the first deposit
    let vault = suite.wbnb_vault.clone();
    let shares = suite.cw20_balance(&vault, &user);
    assert_eq!(shares, Uint128::new(50 * ETHER));
    assert_eq!(suite.net_flow(&vault, BSC_TESTNET), (50 * ETHER) as i128);

    suite
        .exec(
            &user,
            ExecuteMsg::Withdraw {
                token: suite.wbnb.to_string(),
                vault_amount: shares,
            },
        )
        .unwrap();
    let wbnb = suite.wbnb.clone();
    assert_eq!(suite.cw20_balance(&wbnb, &user), Uint128::new(50 * ETHER));
    assert_eq!(suite.cw20_balance(&vault, &user), Uint128::zero());

    // Locked liquidity on 97 backs the way home
    let relay = suite.relay.clone();
    let res = suite
        .app
        .execute_contract(
            user.clone(),
            wbnb.clone(),
            &Cw20ExecuteMsg::Send {
                contract: relay.to_string(),
                amount: Uint128::new(20 * ETHER),
                msg: to_json_binary(&ReceiveMsg::SwapOutToken {
                    to_chain: BSC_TESTNET,
                    receiver: evm(0x44),
                    payload: Binary::default(),
                })
                .unwrap(),
            },
            &[],
        )
        .unwrap();
    let event = find_event(&res, "message_out").unwrap();
    assert_eq!(event_attr(event, "to_chain"), BSC_TESTNET.to_string());
    assert_eq!(suite.net_flow(&vault, BSC_TESTNET), (30 * ETHER) as i128);
    assert_eq!(suite.cw20_balance(&wbnb, &user), Uint128::new(30 * ETHER));
}

#[test]
fn test_deposit_must_target_relay_chain() {
    let mut suite = Suite::new();
    let message = suite.message_to_relay(
        MessageType::Deposit,
        wbnb_97(),
        Uint128::new(ETHER),
        "user",
        b"",
    );
    let (order_id, proof) = suite.prove(BSC_TESTNET, BSC, 0, &message);
    let err = suite.message_in(BSC_TESTNET, order_id, proof).unwrap_err();
    assert_eq!(
        err.root_cause().to_string(),
        "Invalid bridge log: deposits must target the relay chain"
    );
}

#[test]
fn test_unknown_source_token_is_rejected() {
    let mut suite = Suite::new();
    let message = suite.message_to_relay(
        MessageType::Bridge,
        evm_bytes(0xee),
        Uint128::new(ETHER),
        "user",
        b"",
    );
    let (order_id, proof) = suite.prove(BSC_TESTNET, RELAY_CHAIN, 0, &message);
    let err = suite.message_in(BSC_TESTNET, order_id, proof).unwrap_err();
    assert!(err
        .root_cause()
        .to_string()
        .starts_with("Token not registered"));
}

// ============================================================================
// Proof & log validation
// ============================================================================

#[test]
fn test_rejects_unknown_and_self_chain() {
    let mut suite = Suite::new();
    let message = wbnb_in(&suite, "user", ETHER, b"");
    let (order_id, proof) = suite.prove(BSC_TESTNET, RELAY_CHAIN, 0, &message);

    let err = suite
        .message_in(999, order_id.clone(), proof.clone())
        .unwrap_err();
    assert_eq!(err.root_cause().to_string(), "Invalid relay chain: 999");

    let err = suite.message_in(RELAY_CHAIN, order_id, proof).unwrap_err();
    assert_eq!(err.root_cause().to_string(), "Invalid relay chain: 212");
}

#[test]
fn test_rejects_unverifiable_proof() {
    let mut suite = Suite::new();
    let message = wbnb_in(&suite, "user", ETHER, b"");
    let (order_id, _) = suite.prove(BSC_TESTNET, RELAY_CHAIN, 0, &message);

    let err = suite
        .message_in(BSC_TESTNET, order_id, Binary::from(b"garbage".to_vec()))
        .unwrap_err();
    assert!(err
        .root_cause()
        .to_string()
        .starts_with("Proof verification failed"));
}

#[test]
fn test_rejects_mismatched_logs() {
    let mut suite = Suite::new();
    let message = wbnb_in(&suite, "user", ETHER, b"");
    let (order_id, proof) = suite.prove(BSC_TESTNET, RELAY_CHAIN, 0, &message);

    // Order id not in the log
    let err = suite
        .message_in(
            BSC_TESTNET,
            Binary::from([0x01; 32].to_vec()),
            proof.clone(),
        )
        .unwrap_err();
    assert_eq!(
        err.root_cause().to_string(),
        "Invalid bridge log: order id mismatch"
    );

    // Log emitted on 97 submitted for 56: wrong emitter
    let err = suite
        .message_in(BSC, order_id.clone(), proof.clone())
        .unwrap_err();
    assert_eq!(
        err.root_cause().to_string(),
        "Invalid bridge log: log not emitted by the chain's mos"
    );

    // Missing log index
    let relayer = suite.relayer.clone();
    let err = suite
        .exec(
            &relayer,
            ExecuteMsg::MessageIn {
                chain_id: BSC_TESTNET,
                log_index: 3,
                order_id,
                receipt_proof: proof,
            },
        )
        .unwrap_err();
    assert_eq!(
        err.root_cause().to_string(),
        "Invalid bridge log: no log at index 3"
    );
}

#[test]
fn test_rejects_message_for_another_relay() {
    let mut suite = Suite::new();
    let mut message = wbnb_in(&suite, "user", ETHER, b"");
    message.mos = Binary::from(b"someone-else".to_vec());
    let (order_id, proof) = suite.prove(BSC_TESTNET, RELAY_CHAIN, 0, &message);

    let err = suite.message_in(BSC_TESTNET, order_id, proof).unwrap_err();
    assert_eq!(
        err.root_cause().to_string(),
        "Invalid bridge log: message not addressed to this relay"
    );
}

// ============================================================================
// Onward relay
// ============================================================================

#[test]
fn test_relay_onward_keeps_order_id() {
    let mut suite = Suite::new();
    let mut message = wbnb_in(&suite, "", 3 * ETHER, b"");
    message.to = evm_bytes(0x77);
    message.mos = bsc_mos();
    let (order_id, proof) = suite.prove(BSC_TESTNET, BSC, 0, &message);

    let res = suite
        .message_in(BSC_TESTNET, order_id.clone(), proof)
        .unwrap();

    let event = find_event(&res, "message_out").unwrap();
    assert_eq!(event_attr(event, "relay"), "true");
    assert_eq!(
        event_attr(event, "order_id"),
        format!("0x{}", hex::encode(order_id.as_slice()))
    );
    assert_eq!(event_attr(event, "from_chain"), BSC_TESTNET.to_string());
    assert_eq!(event_attr(event, "to_chain"), BSC.to_string());

    let data = hex::decode(event_attr(event, "data")).unwrap();
    let onward = WireMessage::decode(&data).unwrap();
    assert_eq!(onward.token, wbnb_56());
    assert_eq!(onward.mos, bsc_mos());
    assert_eq!(onward.to, evm_bytes(0x77));
    assert_eq!(onward.amount, Uint128::new(3 * ETHER));

    let in_order: Option<Order> = suite
        .query(QueryMsg::InOrder {
            order_id: order_id.clone(),
        })
        .unwrap();
    assert!(in_order.unwrap().result);
    let out_order: Option<Order> = suite.query(QueryMsg::OutOrder { order_id }).unwrap();
    assert_eq!(out_order.unwrap().to_chain, BSC);

    let vault = suite.wbnb_vault.clone();
    assert_eq!(suite.net_flow(&vault, BSC_TESTNET), (3 * ETHER) as i128);
    assert_eq!(suite.net_flow(&vault, BSC), -((3 * ETHER) as i128));
}

#[test]
fn test_relay_onward_requires_bridgeable_target() {
    let mut suite = Suite::new();
    suite
        .admin_exec(ExecuteMsg::RegisterTokenChains {
            token: suite.wbnb.to_string(),
            chain_ids: vec![BSC],
            enable: false,
        })
        .unwrap();

    let mut message = wbnb_in(&suite, "", ETHER, b"");
    message.to = evm_bytes(0x77);
    let (order_id, proof) = suite.prove(BSC_TESTNET, BSC, 0, &message);
    let err = suite.message_in(BSC_TESTNET, order_id, proof).unwrap_err();
    assert!(err
        .root_cause()
        .to_string()
        .starts_with("Token not registered"));
}

#[test]
fn test_relay_onward_pure_message() {
    let mut suite = Suite::new();
    let mut message = suite.message_to_relay(
        MessageType::Message,
        Binary::default(),
        Uint128::zero(),
        "",
        b"ping",
    );
    message.to = evm_bytes(0x78);
    let (order_id, proof) = suite.prove(BSC_TESTNET, BSC, 4, &message);

    let res = suite.message_in(BSC_TESTNET, order_id, proof).unwrap();
    let event = find_event(&res, "message_out").unwrap();
    assert_eq!(event_attr(event, "message_type"), "message");
    let onward = WireMessage::decode(&hex::decode(event_attr(event, "data")).unwrap()).unwrap();
    assert_eq!(onward.mos, bsc_mos());
    assert_eq!(onward.payload, Binary::from(b"ping".to_vec()));
}

// ============================================================================
// Receiver callbacks
// ============================================================================

#[test]
fn test_message_delivered_to_receiver() {
    let mut suite = Suite::new();
    let receiver = suite.new_receiver(false);
    let message = suite.message_to_relay(
        MessageType::Message,
        Binary::default(),
        Uint128::zero(),
        receiver.as_str(),
        b"hello",
    );
    let (order_id, proof) = suite.prove(BSC_TESTNET, RELAY_CHAIN, 0, &message);
    suite
        .message_in(BSC_TESTNET, order_id.clone(), proof)
        .unwrap();

    let received = suite.received(&receiver);
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].order_id, order_id);
    assert_eq!(received[0].from_chain, BSC_TESTNET);
    assert_eq!(received[0].token, None);
    assert_eq!(received[0].payload, Binary::from(b"hello".to_vec()));
}

#[test]
fn test_undeliverable_receiver_is_rejected_on_arrival() {
    let mut suite = Suite::new();

    // Not a valid address on this chain
    let message = wbnb_in(&suite, "NotAnAddress", ETHER, b"");
    let (order_id, proof) = suite.prove(BSC_TESTNET, RELAY_CHAIN, 0, &message);
    let err = suite
        .message_in(BSC_TESTNET, order_id.clone(), proof)
        .unwrap_err();
    assert!(err
        .root_cause()
        .to_string()
        .starts_with("Invalid address: receiver NotAnAddress"));
    let order: Option<Order> = suite.query(QueryMsg::InOrder { order_id }).unwrap();
    assert!(order.is_none());
    let vault = suite.wbnb_vault.clone();
    assert_eq!(suite.net_flow(&vault, BSC_TESTNET), 0);

    // Raw EVM bytes are not a relay-chain address either
    let mut message = suite.message_to_relay(
        MessageType::Message,
        Binary::default(),
        Uint128::zero(),
        "",
        b"ping",
    );
    message.to = Binary::from(vec![0xff; 20]);
    let (order_id, proof) = suite.prove(BSC_TESTNET, RELAY_CHAIN, 1, &message);
    let err = suite.message_in(BSC_TESTNET, order_id, proof).unwrap_err();
    assert_eq!(
        err.root_cause().to_string(),
        "Invalid address: receiver is not utf-8"
    );
}

#[test]
fn test_native_bridge_with_payload_funds_callback() {
    let mut suite = Suite::new();
    lock_luna(&mut suite, 1_000_000);
    let receiver = suite.new_receiver(false);

    // 0.5 LUNA in the 18 decimals used on chain 97
    let message = luna_in(&suite, receiver.as_str(), 500_000_000_000_000_000, b"swap");
    let (order_id, proof) = suite.prove(BSC_TESTNET, RELAY_CHAIN, 0, &message);
    suite.message_in(BSC_TESTNET, order_id, proof).unwrap();

    let received = suite.received(&receiver);
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].token, Some("uluna".to_string()));
    assert_eq!(received[0].amount, Uint128::new(500_000));
    assert_eq!(received[0].funds, Uint128::new(500_000));
    assert_eq!(suite.native_balance(&receiver), Uint128::new(500_000));
}

#[test]
fn test_failed_receiver_is_isolated_and_retryable() {
    let mut suite = Suite::new();
    lock_luna(&mut suite, 1_000_000);
    let receiver = suite.new_receiver(true);

    let message = luna_in(&suite, receiver.as_str(), 500_000_000_000_000_000, b"swap");
    let (order_id, proof) = suite.prove(BSC_TESTNET, RELAY_CHAIN, 0, &message);
    let res = suite
        .message_in(BSC_TESTNET, order_id.clone(), proof)
        .unwrap();

    // Settlement stands, the delivery is parked
    let failed = find_event(&res, "message_delivery_failed").unwrap();
    assert!(event_attr(failed, "reason").contains("Receiver call failed"));
    let order: Option<Order> = suite
        .query(QueryMsg::InOrder {
            order_id: order_id.clone(),
        })
        .unwrap();
    let order = order.unwrap();
    assert!(order.processed);
    assert!(!order.result);
    assert!(order.reason.is_some());
    assert!(suite.received(&receiver).is_empty());
    let relay = suite.relay.clone();
    assert_eq!(suite.native_balance(&relay), Uint128::new(1_000_000));

    // Retrying unchanged fails again and leaves the order retryable
    let user = suite.user.clone();
    let err = suite
        .exec(
            &user,
            ExecuteMsg::RetryMessageIn {
                order_id: order_id.clone(),
                payload: None,
            },
        )
        .unwrap_err();
    assert!(err.root_cause().to_string().contains("receiver rejected payload"));

    // Only the receiver may replace the payload
    let err = suite
        .exec(
            &user,
            ExecuteMsg::RetryMessageIn {
                order_id: order_id.clone(),
                payload: Some(Binary::from(support::receiver::ACCEPTED_PAYLOAD.to_vec())),
            },
        )
        .unwrap_err();
    assert_eq!(
        err.root_cause().to_string(),
        "Unauthorized: caller may not perform this action"
    );

    suite
        .exec(
            &receiver,
            ExecuteMsg::RetryMessageIn {
                order_id: order_id.clone(),
                payload: Some(Binary::from(support::receiver::ACCEPTED_PAYLOAD.to_vec())),
            },
        )
        .unwrap();
    let received = suite.received(&receiver);
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].funds, Uint128::new(500_000));

    let order: Option<Order> = suite
        .query(QueryMsg::InOrder {
            order_id: order_id.clone(),
        })
        .unwrap();
    assert!(order.unwrap().result);

    let err = suite
        .exec(
            &receiver,
            ExecuteMsg::RetryMessageIn {
                order_id,
                payload: None,
            },
        )
        .unwrap_err();
    assert_eq!(err.root_cause().to_string(), "Order is not retryable");
}

#[test]
fn test_retry_unknown_order() {
    let mut suite = Suite::new();
    let user = suite.user.clone();
    let err = suite
        .exec(
            &user,
            ExecuteMsg::RetryMessageIn {
                order_id: Binary::from([0x42; 32].to_vec()),
                payload: None,
            },
        )
        .unwrap_err();
    assert_eq!(err.root_cause().to_string(), "Order not found");
}

#[test]
fn test_execute_delivery_is_internal() {
    let mut suite = Suite::new();
    let user = suite.user.clone();
    let err = suite
        .exec(
            &user,
            ExecuteMsg::ExecuteDelivery {
                order_id: Binary::from([0x42; 32].to_vec()),
            },
        )
        .unwrap_err();
    assert_eq!(
        err.root_cause().to_string(),
        "Unauthorized: caller may not perform this action"
    );
}

// ============================================================================
// Fees
// ============================================================================

#[test]
fn test_inbound_fee_split_and_conservation() {
    let mut suite = Suite::new();
    lock_luna(&mut suite, 1_000_000);

    // 1% on the leg from 97, half of it to whoever relays
    suite
        .admin_exec(ExecuteMsg::SetFromChainFee {
            token: "uluna".to_string(),
            from_chain: BSC_TESTNET,
            lowest: Uint128::zero(),
            highest: Uint128::new(1_000_000),
            rate: 10_000,
        })
        .unwrap();
    suite
        .admin_exec(ExecuteMsg::SetDistributeRate {
            kind: DistributeKind::Relayer,
            receiver: None,
            rate: 500_000,
        })
        .unwrap();

    let user = suite.user.clone();
    let user_before = suite.native_balance(&user);
    let message = luna_in(&suite, user.as_str(), 500_000_000_000_000_000, b"");
    let (order_id, proof) = suite.prove(BSC_TESTNET, RELAY_CHAIN, 0, &message);
    suite.message_in(BSC_TESTNET, order_id, proof).unwrap();

    assert_eq!(
        suite.native_balance(&user),
        user_before + Uint128::new(495_000)
    );
    let relayer_fee: AmountResponse = suite
        .query(QueryMsg::FeeBalance {
            receiver: suite.relayer.to_string(),
            token: "uluna".to_string(),
        })
        .unwrap();
    assert_eq!(relayer_fee.amount, Uint128::new(2_500));

    let relayer = suite.relayer.clone();
    let relayer_before = suite.native_balance(&relayer);
    suite
        .exec(
            &relayer,
            ExecuteMsg::WithdrawFee {
                receiver: relayer.to_string(),
                token: "uluna".to_string(),
            },
        )
        .unwrap();
    assert_eq!(
        suite.native_balance(&relayer),
        relayer_before + Uint128::new(2_500)
    );

    // What the relay still holds is exactly what the ledger books on it
    let relay = suite.relay.clone();
    let vault = suite.luna_vault.clone();
    assert_eq!(suite.native_balance(&relay), Uint128::new(502_500));
    assert_eq!(suite.net_flow(&vault, RELAY_CHAIN), 502_500);
    assert_eq!(suite.net_flow(&vault, BSC_TESTNET), -500_000);
}

#[test]
fn test_inbound_fee_capped_at_amount() {
    let mut suite = Suite::new();
    lock_luna(&mut suite, 1_000_000);
    suite
        .admin_exec(ExecuteMsg::SetFromChainFee {
            token: "uluna".to_string(),
            from_chain: BSC_TESTNET,
            lowest: Uint128::new(10_000),
            highest: Uint128::new(20_000),
            rate: 0,
        })
        .unwrap();

    let user = suite.user.clone();
    let user_before = suite.native_balance(&user);
    // 0.005 LUNA, below the lowest fee
    let message = luna_in(&suite, user.as_str(), 5_000_000_000_000_000, b"");
    let (order_id, proof) = suite.prove(BSC_TESTNET, RELAY_CHAIN, 0, &message);
    suite
        .message_in(BSC_TESTNET, order_id.clone(), proof)
        .unwrap();

    assert_eq!(suite.native_balance(&user), user_before);
    let order: Option<Order> = suite.query(QueryMsg::InOrder { order_id }).unwrap();
    assert!(order.unwrap().processed);
}
