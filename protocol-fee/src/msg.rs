use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::{Addr, Uint128};

use crate::state::FeeType;

#[cw_serde]
pub struct MigrateMsg {}

#[cw_serde]
pub struct InstantiateMsg {
    pub admin: String,
}

#[cw_serde]
pub enum ExecuteMsg {
    /// Authorization: Admin only
    UpdateTokens { tokens: Vec<String>, add: bool },

    /// Authorization: Admin only
    UpdateShares {
        fee_types: Vec<FeeType>,
        shares: Vec<u16>,
    },

    /// Authorization: Admin only
    UpdateReceivers {
        fee_types: Vec<FeeType>,
        receivers: Vec<String>,
    },

    /// Bind the two addresses allowed to report fees.
    ///
    /// Authorization: Admin only
    Set { swap: String, fee_treasury: String },

    /// Report and distribute native fees sent as funds.
    ///
    /// Authorization: swap or fee treasury
    CollectFee {},

    /// Report and distribute cw20 fees (cw20 `Send`).
    ///
    /// Authorization: swap or fee treasury (the cw20 sender)
    Receive(cw20::Cw20ReceiveMsg),
}

#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    #[returns(ConfigResponse)]
    Config {},

    #[returns(u16)]
    FeeShare { fee_type: FeeType },

    #[returns(u16)]
    TotalShare {},

    #[returns(Option<Addr>)]
    FeeReceiver { fee_type: FeeType },

    #[returns(bool)]
    IsToken { token: String },

    /// Preview how `amount` would be split
    #[returns(DistributionResponse)]
    Distribution { amount: Uint128 },
}

#[cw_serde]
pub struct ConfigResponse {
    pub admin: Addr,
    pub swap: Option<Addr>,
    pub fee_treasury: Option<Addr>,
    pub total_share: u16,
}

#[cw_serde]
pub struct FeePart {
    pub fee_type: FeeType,
    pub receiver: Option<Addr>,
    pub amount: Uint128,
}

#[cw_serde]
pub struct DistributionResponse {
    pub parts: Vec<FeePart>,
    /// Paid to the fee treasury
    pub remainder: Uint128,
}
