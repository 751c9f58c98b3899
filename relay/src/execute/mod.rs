//! Execute handlers for the Omnirelay hub contract.
//!
//! This module contains the relay state machine, organized by direction:
//! - `outbound` - SwapOutToken, TransferOut, DepositToken, Withdraw and the cw20 hook
//! - `inbound` - MessageIn, delivery and RetryMessageIn
//! - `fees` - relay fee distribution and fee withdrawal
//! - `admin` - pause and unpause
//!
//! Registry and fee configuration handlers live in [`crate::registry`].

mod admin;
pub(crate) mod fees;
mod inbound;
pub(crate) mod outbound;

pub use admin::*;
pub use fees::{execute_set_distribute_rate, execute_withdraw_fee, load_distribute_rate};
pub use inbound::*;
pub use outbound::{
    execute_deposit_native, execute_receive, execute_swap_out_native, execute_transfer_out,
    execute_withdraw,
};
