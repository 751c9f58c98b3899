//! Light-client verifier interface.
//!
//! Each spoke chain registered on the relay points at a verifier contract. The
//! verifier checks a chain-native receipt proof and returns the logs it proves
//! in a normalized EVM-log shape, whatever the source chain kind.

use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::Binary;

/// Normalized event log
#[cw_serde]
pub struct NormalizedLog {
    /// Emitting contract on the source chain
    pub log_address: Binary,
    /// 32-byte topics
    pub topics: Vec<Binary>,
    pub data: Binary,
}

#[cw_serde]
#[derive(QueryResponses)]
pub enum LightClientQueryMsg {
    #[returns(VerifyProofDataResponse)]
    VerifyProofData { receipt_proof: Binary },
}

#[cw_serde]
pub struct VerifyProofDataResponse {
    pub success: bool,
    pub message: String,
    pub logs: Vec<NormalizedLog>,
}
