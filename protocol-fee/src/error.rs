use cosmwasm_std::StdError;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("Unauthorized: only admin can perform this action")]
    Unauthorized,

    #[error("Unauthorized: only swap or fee treasury can report fees")]
    UnauthorizedReporter,

    #[error("Length mismatch: {left} vs {right}")]
    LengthMismatch { left: usize, right: usize },

    #[error("Invalid share: {share} exceeds 10000 basis points")]
    InvalidShare { share: u32 },

    #[error("Token not supported: {token}")]
    TokenNotSupported { token: String },

    #[error("No funds sent")]
    NoFundsSent,

    #[error("Fee treasury not set")]
    TreasuryNotSet,
}
