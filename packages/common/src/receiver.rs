//! Callback implemented by contracts that receive cross-chain messages.

use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Binary, Uint128};

#[cw_serde]
pub enum ReceiverExecuteMsg {
    /// Delivered after the relay has transferred `amount` of `token` (if any)
    /// to the receiver. Native tokens arrive as funds on this call.
    OnMessageReceived {
        order_id: Binary,
        from_chain: u64,
        /// Relay-chain token key, `None` for pure messages
        token: Option<String>,
        amount: Uint128,
        /// Sender on the source chain
        from: Binary,
        payload: Binary,
    },
}
