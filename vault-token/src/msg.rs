use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::{Addr, Int128, Uint128};

#[cw_serde]
pub struct MigrateMsg {}

#[cw_serde]
pub struct InstantiateMsg {
    pub admin: String,
    /// Relay token key (denom or cw20 address) backing this vault
    pub underlying: String,
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
    /// Initial managers, normally the relay contract
    pub managers: Vec<String>,
}

#[cw_serde]
pub enum ExecuteMsg {
    /// Authorization: Admin only
    AddManager { manager: String },

    /// Authorization: Admin only
    RemoveManager { manager: String },

    /// Mint shares for `amount` of underlying arriving from `from_chain`.
    ///
    /// Authorization: Manager only
    Deposit {
        from_chain: u64,
        amount: Uint128,
        receiver: String,
    },

    /// Burn `vault_amount` shares of `owner` and book the underlying as
    /// leaving through `to_chain`.
    ///
    /// Authorization: Manager only
    Withdraw {
        to_chain: u64,
        vault_amount: Uint128,
        owner: String,
    },

    /// Book a cross-chain movement: `from_amount` arrives on `from_chain`,
    /// `to_amount` leaves on `to_chain`, `fee` leaves on `relay_chain`.
    ///
    /// Authorization: Manager only
    TransferToken {
        from_chain: u64,
        from_amount: Uint128,
        to_chain: u64,
        to_amount: Uint128,
        relay_chain: u64,
        fee: Uint128,
    },

    /// Move shares between holders
    ///
    /// Authorization: Anyone (own balance)
    Transfer { recipient: String, amount: Uint128 },
}

#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    #[returns(ConfigResponse)]
    Config {},

    /// cw20-compatible token info
    #[returns(cw20::TokenInfoResponse)]
    TokenInfo {},

    /// cw20-compatible share balance
    #[returns(cw20::BalanceResponse)]
    Balance { address: String },

    #[returns(UnderlyingResponse)]
    Underlying {},

    #[returns(VaultStateResponse)]
    VaultState {},

    #[returns(NetFlowResponse)]
    NetFlow { chain_id: u64 },

    #[returns(NetFlowsResponse)]
    NetFlows {
        start_after: Option<u64>,
        limit: Option<u32>,
    },

    /// Shares minted for depositing `amount` of underlying
    #[returns(AmountResponse)]
    VaultTokenAmount { amount: Uint128 },

    /// Underlying released for burning `vault_amount` shares
    #[returns(AmountResponse)]
    TokenAmount { vault_amount: Uint128 },

    #[returns(IsManagerResponse)]
    IsManager { address: String },
}

#[cw_serde]
pub struct ConfigResponse {
    pub admin: Addr,
    pub underlying: String,
}

#[cw_serde]
pub struct UnderlyingResponse {
    pub underlying: String,
}

#[cw_serde]
pub struct VaultStateResponse {
    pub total_vault: Int128,
    pub total_supply: Uint128,
}

#[cw_serde]
pub struct NetFlowResponse {
    pub chain_id: u64,
    pub net_flow: Int128,
}

#[cw_serde]
pub struct NetFlowsResponse {
    pub flows: Vec<NetFlowResponse>,
}

#[cw_serde]
pub struct AmountResponse {
    pub amount: Uint128,
}

#[cw_serde]
pub struct IsManagerResponse {
    pub is_manager: bool,
}
