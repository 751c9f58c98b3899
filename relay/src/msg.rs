//! Message types for the Omnirelay hub contract

use common::{AssetInfo, ChainKind};
use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::{Addr, Binary, Int128, Uint128};
use cw20::Cw20ReceiveMsg;

use crate::authority::{Access, Role};
use crate::state::{BaseFee, Delivery, DistributeKind, FeeSchedule, Order};

// ============================================================================
// Instantiate
// ============================================================================

#[cw_serde]
pub struct InstantiateMsg {
    pub admin: String,
    /// Id of the relay chain in the cross-chain directory
    pub chain_id: u64,
    pub chain_name: String,
    /// Bank denom used for message fees
    pub native_denom: String,
    /// Fee service quoting messages leaving the relay chain
    pub fee_service: Option<String>,
    /// Receiver of base fees, defaults to the admin
    pub base_fee_receiver: Option<String>,
}

#[cw_serde]
pub struct MigrateMsg {}

// ============================================================================
// Execute
// ============================================================================

#[cw_serde]
pub enum ExecuteMsg {
    // ------------------------------------------------------------------------
    // Outbound
    // ------------------------------------------------------------------------
    /// Bridge native funds to another chain. Excess funds are refunded.
    SwapOutToken {
        token: String,
        amount: Uint128,
        to_chain: u64,
        /// Receiver in the destination chain's address format
        receiver: String,
        #[serde(default)]
        payload: Binary,
    },

    /// Send a message to a contract on another chain, paying the message
    /// fee in the native denom
    TransferOut {
        to_chain: u64,
        /// Target in the destination chain's address format
        target: String,
        payload: Binary,
        gas_limit: u64,
    },

    /// Deposit native funds into the token's vault and mint shares
    DepositToken {
        token: String,
        amount: Uint128,
        receiver: String,
    },

    /// Burn vault shares and withdraw the underlying
    Withdraw { token: String, vault_amount: Uint128 },

    /// cw20 hook, see [`ReceiveMsg`]
    Receive(Cw20ReceiveMsg),

    // ------------------------------------------------------------------------
    // Inbound
    // ------------------------------------------------------------------------
    /// Process a proven `MessageOut` log of another chain
    MessageIn {
        chain_id: u64,
        log_index: u32,
        order_id: Binary,
        receipt_proof: Binary,
    },

    /// Retry a failed delivery. Only the receiver may replace the payload.
    RetryMessageIn {
        order_id: Binary,
        payload: Option<Binary>,
    },

    /// Run a delivery in isolation.
    ///
    /// Authorization: the contract itself
    ExecuteDelivery { order_id: Binary },

    // ------------------------------------------------------------------------
    // Chain & token registry
    // ------------------------------------------------------------------------
    RegisterChain {
        chain_id: u64,
        name: String,
        kind: ChainKind,
        mos: String,
        wrapped_native_token: String,
        light_client: Option<String>,
        fee_service: Option<String>,
    },

    RegisterToken {
        token: AssetInfo,
        vault: String,
        mintable: bool,
    },

    MapToken {
        token: String,
        chain_id: u64,
        target_token: String,
        decimals: u8,
        mintable: bool,
    },

    UnmapToken { chain_id: u64, target_token: String },

    RegisterTokenChains {
        token: String,
        chain_ids: Vec<u64>,
        enable: bool,
    },

    // ------------------------------------------------------------------------
    // Fee configuration
    // ------------------------------------------------------------------------
    SetFromChainFee {
        token: String,
        from_chain: u64,
        lowest: Uint128,
        highest: Uint128,
        rate: u32,
    },

    SetToChainTokenFee {
        token: String,
        to_chain: u64,
        lowest: Uint128,
        highest: Uint128,
        rate: u32,
    },

    SetBaseFee {
        token: String,
        to_chain: u64,
        with_swap: Uint128,
        no_swap: Uint128,
    },

    SetToChainWhitelistFeeRate {
        token: String,
        from_chain: u64,
        to_chain: u64,
        /// Caller in the from chain's address format
        caller: String,
        rate: u32,
        enable: bool,
    },

    SetFromChainWhitelistFeeRate {
        token: String,
        from_chain: u64,
        caller: String,
        rate: u32,
        enable: bool,
    },

    SetBaseFeeReceiver { receiver: String },

    SetDistributeRate {
        kind: DistributeKind,
        receiver: Option<String>,
        rate: u32,
    },

    /// Pay out accrued fees of `receiver` in `token`
    ///
    /// Authorization: Anyone
    WithdrawFee { receiver: String, token: String },

    // ------------------------------------------------------------------------
    // Deposit whitelist
    // ------------------------------------------------------------------------
    /// Require depositors to be whitelisted
    SetDepositWhitelist { enabled: bool },

    /// Authorization: Manager
    UpdateDepositWhitelist { accounts: Vec<String>, enable: bool },

    /// Cap a single deposit per token; zero removes the cap
    ///
    /// Authorization: Manager
    UpdateDepositLimits {
        tokens: Vec<String>,
        limits: Vec<Uint128>,
    },

    // ------------------------------------------------------------------------
    // Authority & circuit breaker
    // ------------------------------------------------------------------------
    /// Authorization: Admin only
    GrantRole { role: Role, account: String },

    /// Authorization: Admin only
    RevokeRole { role: Role, account: String },

    /// Authorization: Admin only
    SetFunctionAccess { selector: String, access: Access },

    Pause {},

    Unpause {},
}

/// Messages embedded in a cw20 `Send`
#[cw_serde]
pub enum ReceiveMsg {
    SwapOutToken {
        to_chain: u64,
        receiver: String,
        #[serde(default)]
        payload: Binary,
    },
    DepositToken { receiver: String },
}

// ============================================================================
// Query
// ============================================================================

/// Chain lookup key
#[cw_serde]
pub enum ChainRef {
    Id(u64),
    Name(String),
}

#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    #[returns(ConfigResponse)]
    Config {},

    // Chain directory
    #[returns(ChainResponse)]
    Chain { chain: ChainRef },

    #[returns(ChainsResponse)]
    Chains {
        start_after: Option<u64>,
        limit: Option<u32>,
    },

    // Token registry
    #[returns(RelayTokenResponse)]
    RelayToken { token: String },

    #[returns(TokenMappingResponse)]
    TokenMapping { token: String, chain_id: u64 },

    #[returns(bool)]
    IsBridgeable { token: String, chain_id: u64 },

    #[returns(bool)]
    CheckMintable { token: String },

    #[returns(Addr)]
    VaultToken { token: String },

    /// `Int128::MAX` when the chain's mapping is mintable
    #[returns(Int128)]
    VaultBalance { token: String, chain_id: u64 },

    #[returns(AmountResponse)]
    ToChainAmount {
        token: String,
        amount: Uint128,
        from_chain: u64,
        to_chain: u64,
    },

    #[returns(AmountResponse)]
    TargetAmount {
        from_chain: u64,
        from_token: String,
        to_chain: u64,
        amount: Uint128,
    },

    #[returns(TargetTokenResponse)]
    TargetToken {
        from_chain: u64,
        from_token: String,
        to_chain: u64,
    },

    #[returns(String)]
    RelayChainToken { chain_id: u64, target_token: String },

    // Fees
    #[returns(TransferFeeResponse)]
    TransferFee {
        caller: String,
        token: String,
        amount: Uint128,
        from_chain: u64,
        to_chain: u64,
        with_swap: bool,
    },

    #[returns(AmountResponse)]
    TransferInFee {
        caller: String,
        token: String,
        amount: Uint128,
        from_chain: u64,
    },

    #[returns(TransferOutFeeResponse)]
    TransferOutFee {
        caller: String,
        token: String,
        amount: Uint128,
        from_chain: u64,
        to_chain: u64,
        with_swap: bool,
    },

    #[returns(CallerFeeRateResponse)]
    CallerFeeRate {
        token: String,
        from_chain: u64,
        to_chain: u64,
        caller: String,
    },

    #[returns(CallerFeeRateResponse)]
    ToChainCallerFeeRate {
        token: String,
        from_chain: u64,
        to_chain: u64,
        caller: String,
    },

    #[returns(CallerFeeRateResponse)]
    FromChainCallerFeeRate {
        token: String,
        from_chain: u64,
        caller: String,
    },

    #[returns(Option<FeeSchedule>)]
    FromChainFee { token: String, chain_id: u64 },

    #[returns(Option<FeeSchedule>)]
    ToChainTokenFee { token: String, chain_id: u64 },

    #[returns(BaseFee)]
    BaseFee { token: String, chain_id: u64 },

    #[returns(DistributeRateResponse)]
    DistributeRate { kind: DistributeKind },

    #[returns(AmountResponse)]
    FeeBalance { receiver: String, token: String },

    // Deposit whitelist
    #[returns(bool)]
    DepositWhitelistEnabled {},

    #[returns(bool)]
    InDepositWhitelist { account: String },

    #[returns(Option<Uint128>)]
    DepositLimit { token: String },

    // Orders
    #[returns(Option<Order>)]
    OutOrder { order_id: Binary },

    #[returns(Option<Order>)]
    InOrder { order_id: Binary },

    #[returns(Option<Delivery>)]
    Delivery { order_id: Binary },

    // Authority
    #[returns(bool)]
    CanCall { caller: String, selector: String },

    #[returns(bool)]
    HasRole { role: Role, account: String },

    #[returns(Access)]
    FunctionAccess { selector: String },
}

// ============================================================================
// Responses
// ============================================================================

#[cw_serde]
pub struct ConfigResponse {
    pub admin: Addr,
    pub paused: bool,
    pub chain_id: u64,
    pub native_denom: String,
    pub base_fee_receiver: Addr,
    pub nonce: u64,
}

#[cw_serde]
pub struct ChainResponse {
    pub chain_id: u64,
    pub name: String,
    pub kind: ChainKind,
    pub mos: Binary,
    /// `mos` in the chain's text format
    pub mos_text: String,
    pub wrapped_native_token: Binary,
    pub light_client: Option<Addr>,
    pub fee_service: Option<Addr>,
}

#[cw_serde]
pub struct ChainsResponse {
    pub chains: Vec<ChainResponse>,
}

#[cw_serde]
pub struct RelayTokenResponse {
    pub token: String,
    pub asset: AssetInfo,
    pub mintable: bool,
    pub vault_token: Addr,
}

#[cw_serde]
pub struct TokenMappingResponse {
    pub token: String,
    pub chain_id: u64,
    pub target_token: Binary,
    pub target_token_text: String,
    pub decimals: u8,
    pub mintable: bool,
    pub bridgeable: bool,
}

#[cw_serde]
pub struct TargetTokenResponse {
    pub target_token: Binary,
    pub target_token_text: String,
    pub decimals: u8,
}

#[cw_serde]
pub struct AmountResponse {
    pub amount: Uint128,
}

#[cw_serde]
pub struct TransferFeeResponse {
    pub total_fee: Uint128,
    pub base_fee: Uint128,
    pub bridge_fee: Uint128,
}

#[cw_serde]
pub struct TransferOutFeeResponse {
    pub base_receiver: Addr,
    pub base_fee: Uint128,
    pub bridge_fee: Uint128,
}

#[cw_serde]
pub struct CallerFeeRateResponse {
    pub whitelisted: bool,
    pub rate: u32,
}

#[cw_serde]
pub struct DistributeRateResponse {
    pub kind: DistributeKind,
    pub receiver: Option<Addr>,
    pub rate: u32,
}
