use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::{Addr, Uint128};

#[cw_serde]
pub struct MigrateMsg {}

#[cw_serde]
pub struct InstantiateMsg {
    pub admin: String,
    pub fee_receiver: Option<String>,
}

#[cw_serde]
pub enum ExecuteMsg {
    /// Authorization: Admin only
    UpdateManager { manager: String, enable: bool },

    /// Authorization: Manager
    SetBaseGas { chain_id: u64, gas: Uint128 },

    /// Price per gas unit, 18 decimals of precision.
    ///
    /// Authorization: Manager
    SetChainGasPrice {
        chain_id: u64,
        fee_token: String,
        price: Uint128,
    },

    /// Authorization: Manager
    SetTokenDecimals { fee_token: String, decimals: u8 },

    /// Authorization: Manager
    SetFeeReceiver { receiver: String },
}

#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    #[returns(ConfigResponse)]
    Config {},

    #[returns(Uint128)]
    BaseGas { chain_id: u64 },

    #[returns(Uint128)]
    ChainGasPrice { chain_id: u64, fee_token: String },

    #[returns(u8)]
    TokenDecimals { fee_token: String },

    /// Fails for chains without base gas
    #[returns(ServiceMessageFeeResponse)]
    ServiceMessageFee {
        chain_id: u64,
        fee_token: String,
        gas_limit: Uint128,
    },
}

#[cw_serde]
pub struct ConfigResponse {
    pub admin: Addr,
    pub fee_receiver: Option<Addr>,
}

#[cw_serde]
pub struct ServiceMessageFeeResponse {
    pub fee: Uint128,
    pub receiver: Option<Addr>,
}
