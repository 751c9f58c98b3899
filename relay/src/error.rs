//! Error types for the Omnirelay hub contract

use cosmwasm_std::{StdError, Uint128};
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    // ========================================================================
    // Authorization Errors
    // ========================================================================

    #[error("Unauthorized: caller may not perform this action")]
    Unauthorized,

    #[error("Unknown function selector: {selector}")]
    UnknownSelector { selector: String },

    #[error("Relay is paused")]
    Paused,

    // ========================================================================
    // Chain Directory Errors
    // ========================================================================

    #[error("Unknown chain: {chain_id}")]
    UnknownChain { chain_id: u64 },

    #[error("Unknown chain name: {name}")]
    UnknownChainName { name: String },

    #[error("Chain already registered: {chain_id}")]
    ChainAlreadyRegistered { chain_id: u64 },

    #[error("Invalid chain: {reason}")]
    InvalidChain { reason: String },

    #[error("Invalid relay chain: {chain_id}")]
    InvalidRelayChain { chain_id: u64 },

    #[error("Unsupported chain: {chain_id}")]
    UnsupportedChain { chain_id: u64 },

    #[error("Source and destination chain are the same")]
    SameChain,

    // ========================================================================
    // Token Registry Errors
    // ========================================================================

    #[error("Token not registered: {token}")]
    TokenNotRegistered { token: String },

    #[error("Invalid relay token: {token}")]
    InvalidRelayToken { token: String },

    #[error("Invalid vault token")]
    InvalidVault,

    #[error("Native denoms cannot be mintable")]
    InvalidMintable,

    #[error("Zero address")]
    ZeroAddress,

    #[error("Empty target token")]
    EmptyTargetToken,

    #[error("Target token already mapped to {token}")]
    TargetTokenTaken { token: String },

    #[error("Relay chain mapping cannot be changed")]
    RelayChainForbidden,

    #[error("Token not mapped")]
    TokenNotMapped,

    #[error("Invalid address: {reason}")]
    InvalidAddress { reason: String },

    // ========================================================================
    // Fee Errors
    // ========================================================================

    #[error("invalid highest and lowest")]
    InvalidRange,

    #[error("Invalid rate: {rate} exceeds 1000000")]
    InvalidRate { rate: u64 },

    #[error("Insufficient fee: expected {expected}, got {got}")]
    InsufficientFee { expected: Uint128, got: Uint128 },

    // ========================================================================
    // Amount Errors
    // ========================================================================

    #[error("Zero amount")]
    ZeroAmount,

    #[error("Amount too low: {amount} does not cover {required}")]
    InAmountLow { amount: Uint128, required: Uint128 },

    #[error("Insufficient vault balance on chain {chain_id}: {available} < {required}")]
    InsufficientVaultBalance {
        chain_id: u64,
        available: String,
        required: Uint128,
    },

    #[error("Decimal conversion overflow")]
    DecimalsOverflow,

    #[error("Length mismatch: {left} vs {right}")]
    LengthMismatch { left: usize, right: usize },

    // ========================================================================
    // Deposit Whitelist Errors
    // ========================================================================

    #[error("Depositor not whitelisted: {depositor}")]
    DepositorNotWhitelisted { depositor: String },

    #[error("Deposit limit exceeded: {amount} > {limit}")]
    DepositLimitExceeded { amount: Uint128, limit: Uint128 },

    // ========================================================================
    // Inbound Errors
    // ========================================================================

    #[error("Proof verification failed: {reason}")]
    ProofVerificationFailed { reason: String },

    #[error("Invalid bridge log: {reason}")]
    InvalidBridgeLog { reason: String },

    #[error("Order already processed")]
    AlreadyProcessed,

    #[error("Order not found")]
    OrderNotFound,

    #[error("Order is not retryable")]
    RetryNotAllowed,

    #[error("Receiver call failed: {reason}")]
    ReceiverCallFailed { reason: String },
}
