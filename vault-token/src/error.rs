use cosmwasm_std::{OverflowError, StdError, Uint128};
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("{0}")]
    Overflow(#[from] OverflowError),

    #[error("Unauthorized: only admin can perform this action")]
    Unauthorized,

    #[error("Caller is not a manager")]
    NotManager,

    #[error("Invalid amount: zero")]
    ZeroAmount,

    #[error("Insufficient balance: have {balance}, need {required}")]
    InsufficientBalance { balance: Uint128, required: Uint128 },

    #[error("Vault has no backing for outstanding shares")]
    NoBacking,
}
