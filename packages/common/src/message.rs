//! Chain-agnostic wire message codec.
//!
//! # Layout
//!
//! ```text
//! | version (1) | type (1) | tokenLen (1) | mosLen (1) | fromLen (1) | toLen (1) |
//! | payloadLen (2, BE) | reserved (8) | amount (16, BE) |
//! | token | mos | from | to | payload |
//! ```
//!
//! The 32-byte header is followed by the variable-length fields in that order.
//! Address fields hold the raw bytes of the address on its own chain, so the
//! same envelope carries 20-byte EVM addresses, 32-byte Solana keys and
//! textual TON or Bitcoin addresses.

use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Binary, StdError, StdResult, Uint128};

/// Current envelope version
pub const MESSAGE_VERSION: u8 = 1;

/// Fixed header size in bytes
pub const HEADER_LEN: usize = 32;

#[cw_serde]
#[derive(Copy, Eq)]
pub enum MessageType {
    Calldata,
    Message,
    General,
    Bridge,
    Deposit,
}

impl MessageType {
    pub fn to_u8(self) -> u8 {
        match self {
            MessageType::Calldata => 0,
            MessageType::Message => 1,
            MessageType::General => 2,
            MessageType::Bridge => 3,
            MessageType::Deposit => 4,
        }
    }

    /// Whether the message moves tokens through the vault ledger.
    pub fn carries_token(self) -> bool {
        matches!(self, MessageType::Bridge | MessageType::Deposit)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MessageType::Calldata => "calldata",
            MessageType::Message => "message",
            MessageType::General => "general",
            MessageType::Bridge => "bridge",
            MessageType::Deposit => "deposit",
        }
    }
}

impl TryFrom<u8> for MessageType {
    type Error = StdError;

    fn try_from(value: u8) -> StdResult<Self> {
        match value {
            0 => Ok(MessageType::Calldata),
            1 => Ok(MessageType::Message),
            2 => Ok(MessageType::General),
            3 => Ok(MessageType::Bridge),
            4 => Ok(MessageType::Deposit),
            other => Err(StdError::generic_err(format!(
                "unknown message type: {}",
                other
            ))),
        }
    }
}

/// Decoded wire message
#[cw_serde]
pub struct WireMessage {
    pub version: u8,
    pub message_type: MessageType,
    /// Token address on the chain that will act on the message
    pub token: Binary,
    /// Bridge contract on the destination chain
    pub mos: Binary,
    /// Sender on the source chain
    pub from: Binary,
    /// Receiver on the destination chain
    pub to: Binary,
    pub payload: Binary,
    pub amount: Uint128,
}

impl WireMessage {
    /// Pack into the binary envelope.
    pub fn encode(&self) -> StdResult<Vec<u8>> {
        let token_len = field_len_u8("token", &self.token)?;
        let mos_len = field_len_u8("mos", &self.mos)?;
        let from_len = field_len_u8("from", &self.from)?;
        let to_len = field_len_u8("to", &self.to)?;
        let payload_len: u16 = self.payload.len().try_into().map_err(|_| {
            StdError::generic_err(format!("payload too long: {} bytes", self.payload.len()))
        })?;

        let mut out = Vec::with_capacity(
            HEADER_LEN
                + self.token.len()
                + self.mos.len()
                + self.from.len()
                + self.to.len()
                + self.payload.len(),
        );
        out.push(self.version);
        out.push(self.message_type.to_u8());
        out.push(token_len);
        out.push(mos_len);
        out.push(from_len);
        out.push(to_len);
        out.extend_from_slice(&payload_len.to_be_bytes());
        out.extend_from_slice(&[0u8; 8]);
        out.extend_from_slice(&self.amount.u128().to_be_bytes());
        out.extend_from_slice(&self.token);
        out.extend_from_slice(&self.mos);
        out.extend_from_slice(&self.from);
        out.extend_from_slice(&self.to);
        out.extend_from_slice(&self.payload);
        Ok(out)
    }

    /// Unpack a binary envelope. The buffer must be consumed exactly.
    pub fn decode(data: &[u8]) -> StdResult<Self> {
        if data.len() < HEADER_LEN {
            return Err(StdError::generic_err(format!(
                "message too short: {} bytes",
                data.len()
            )));
        }
        let version = data[0];
        if version != MESSAGE_VERSION {
            return Err(StdError::generic_err(format!(
                "unsupported message version: {}",
                version
            )));
        }
        let message_type = MessageType::try_from(data[1])?;
        let token_len = data[2] as usize;
        let mos_len = data[3] as usize;
        let from_len = data[4] as usize;
        let to_len = data[5] as usize;
        let payload_len = u16::from_be_bytes([data[6], data[7]]) as usize;

        let mut amount_bytes = [0u8; 16];
        amount_bytes.copy_from_slice(&data[16..32]);
        let amount = Uint128::new(u128::from_be_bytes(amount_bytes));

        let expected = HEADER_LEN + token_len + mos_len + from_len + to_len + payload_len;
        if data.len() != expected {
            return Err(StdError::generic_err(format!(
                "message length mismatch: expected {}, got {}",
                expected,
                data.len()
            )));
        }

        let mut offset = HEADER_LEN;
        let mut take = |len: usize| {
            let field = Binary::from(&data[offset..offset + len]);
            offset += len;
            field
        };
        let token = take(token_len);
        let mos = take(mos_len);
        let from = take(from_len);
        let to = take(to_len);
        let payload = take(payload_len);

        Ok(WireMessage {
            version,
            message_type,
            token,
            mos,
            from,
            to,
            payload,
            amount,
        })
    }
}

fn field_len_u8(name: &str, field: &Binary) -> StdResult<u8> {
    field
        .len()
        .try_into()
        .map_err(|_| StdError::generic_err(format!("{} too long: {} bytes", name, field.len())))
}
