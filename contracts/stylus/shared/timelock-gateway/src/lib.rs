//! Timelocked batch-authorization gateway.
//!
//! The gateway sits in front of a multi-signer vault and decides which batches of calls the vault
//! may execute, after which delay, and with which approvals:
//! - batches planned by vault-approved builders wait the short delay,
//! - arbitrary batches wait the long delay,
//! - execution gathers owner approvals from the vault's approved-hash registry (minus
//!   disapprovals) and forwards the batch to the multi-call relay through the vault.

pub mod builder;
pub mod builders;
pub mod config;
pub mod context;
pub mod error;
pub mod gateway;
pub mod hash;
pub mod registry;
pub mod transaction;
pub mod vault;

mod collect;

#[cfg(test)]
mod testing;

pub use builder::{ActionBuilder, BuilderError};
pub use config::{ConfigError, DelayClass, GatewayConfig};
pub use context::{CallContext, PlanContext};
pub use error::{GatewayError, Role};
pub use gateway::{ExecutionReceipt, TimelockGateway};
pub use registry::{BuilderInfo, BuilderRegistry};
pub use transaction::{QueuedBuilder, TransactionId, TransactionInfo, TransactionStatus};
pub use vault::{Vault, VaultCall, VaultError};

pub use timelock_gateway_types::{Action, Operation};
