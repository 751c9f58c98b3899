//! Chain directory, token registry and deposit whitelist.

pub mod chain;
pub mod deposit;
pub mod token;

pub use chain::{load_chain, resolve_chain};
pub use token::{load_relay_token, relay_decimals};
