//! Hash computation for outbound message logs
//!
//! Every outbound message is published as a `message_out` event shaped like
//! the EVM log the spoke bridges emit:
//!
//! ```solidity
//! event MessageOut(bytes32 indexed orderId, uint256 indexed chainAndGasLimit, bytes payload);
//! ```
//!
//! # chainAndGasLimit layout (32 bytes)
//! - Bytes 0-7:   zero
//! - Bytes 8-15:  from chain id (u64, big-endian)
//! - Bytes 16-23: to chain id (u64, big-endian)
//! - Bytes 24-31: gas limit (u64, big-endian)
//!
//! # Order id preimage
//! `mos ‖ nonce ‖ from_chain ‖ to_chain ‖ from ‖ to` with the three integers as
//! 8-byte big-endian values.

use tiny_keccak::{Hasher, Keccak};

/// keccak256("MessageOut(bytes32,uint256,bytes)")
pub const MESSAGE_OUT_TOPIC: [u8; 32] = [
    0x46, 0x90, 0x59, 0xa9, 0xfd, 0x18, 0x2a, 0xd3, 0x74, 0x1b, 0xdd, 0x67, 0xb9, 0x25, 0xe1, 0x50,
    0x56, 0xd3, 0x52, 0x62, 0x60, 0x9e, 0xa8, 0x33, 0x93, 0xdb, 0x7e, 0x8f, 0xb5, 0xa0, 0x5a, 0xb1,
];

pub const MESSAGE_OUT_SIGNATURE: &str = "MessageOut(bytes32,uint256,bytes)";

/// Compute keccak256 hash of arbitrary data
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak::v256();
    hasher.update(data);
    let mut output = [0u8; 32];
    hasher.finalize(&mut output);
    output
}

/// Unique id of an outbound message
pub fn compute_order_id(
    mos: &[u8],
    nonce: u64,
    from_chain: u64,
    to_chain: u64,
    from: &[u8],
    to: &[u8],
) -> [u8; 32] {
    let mut data = Vec::with_capacity(mos.len() + 24 + from.len() + to.len());
    data.extend_from_slice(mos);
    data.extend_from_slice(&nonce.to_be_bytes());
    data.extend_from_slice(&from_chain.to_be_bytes());
    data.extend_from_slice(&to_chain.to_be_bytes());
    data.extend_from_slice(from);
    data.extend_from_slice(to);
    keccak256(&data)
}

/// Pack the route and gas limit into the second indexed topic
pub fn pack_chain_and_gas_limit(from_chain: u64, to_chain: u64, gas_limit: u64) -> [u8; 32] {
    let mut out = [0u8; 32];
    out[8..16].copy_from_slice(&from_chain.to_be_bytes());
    out[16..24].copy_from_slice(&to_chain.to_be_bytes());
    out[24..32].copy_from_slice(&gas_limit.to_be_bytes());
    out
}

/// Inverse of [`pack_chain_and_gas_limit`]; `None` unless exactly 32 bytes
pub fn unpack_chain_and_gas_limit(topic: &[u8]) -> Option<(u64, u64, u64)> {
    if topic.len() != 32 {
        return None;
    }
    let word = |start: usize| {
        let mut buf = [0u8; 8];
        buf.copy_from_slice(&topic[start..start + 8]);
        u64::from_be_bytes(buf)
    };
    Some((word(8), word(16), word(24)))
}

/// Convert 32-byte hash to hex string (for attributes/logging)
pub fn bytes32_to_hex(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}
