//! Vault transaction guard for the timelock gateway.
//!
//! Installed on the vault, it restricts execution to transactions routed through the gateway,
//! except for emergency transactions that carry an explicit signature quorum.
#![cfg_attr(not(any(test, feature = "export-abi")), no_main)]
extern crate alloc;

pub mod errors;
pub mod gateway_guard;
pub mod vault;

pub use gateway_guard::GatewayGuard;
