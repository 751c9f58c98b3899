//! Common - Shared Types and Utilities for the Omnirelay Contracts
//!
//! This package provides the pieces every contract in the workspace agrees on:
//!
//! - [`asset`] - relay-chain assets (native denoms and cw20 contracts)
//! - [`chain`] - chain kinds and their address encoding rules
//! - [`message`] - the chain-agnostic wire message codec
//! - [`light_client`] - proof verifier interface and the normalized log shape
//! - [`receiver`] - callback interface implemented by message receivers

pub mod asset;
pub mod chain;
pub mod light_client;
pub mod message;
pub mod receiver;

pub use asset::{Asset, AssetInfo};
pub use chain::ChainKind;
pub use light_client::{LightClientQueryMsg, NormalizedLog, VerifyProofDataResponse};
pub use message::{MessageType, WireMessage, MESSAGE_VERSION};
pub use receiver::ReceiverExecuteMsg;
