use cosmwasm_std::{OverflowError, StdError};
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

    #[error("Unsupported chain: {chain_id}")]
    UnsupportedChain { chain_id: u64 },

    #[error("Invalid token decimals: {decimals}")]
    InvalidDecimals { decimals: u8 },
}
