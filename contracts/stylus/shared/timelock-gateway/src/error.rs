//! Gateway error taxonomy.
//!
//! Every operation either applies completely or fails with one of these errors and leaves the
//! gateway untouched. [`GatewayError::revert_data`] renders the error as ABI-encoded custom-error
//! bytes, the same shape a reverting contract call returns.

use std::fmt;

use alloy_primitives::{Address, B256, U256};
use alloy_sol_types::SolError;
use thiserror::Error;

use crate::{builder::BuilderError, config::ConfigError, transaction::TransactionId, vault::VaultError};

/// Privilege an operation requires.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    /// The vault itself, acting on its own threshold.
    Vault,
    /// Any current vault owner.
    Owner,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Vault => f.write_str("vault"),
            Role::Owner => f.write_str("vault owner"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    #[error("{caller} is not authorized, requires {role}")]
    Unauthorized { caller: Address, role: Role },
    #[error("builder {0} is not approved")]
    BuilderNotApproved(Address),
    #[error("builder {builder} is already queued in transaction {transaction}")]
    BuilderAlreadyQueued {
        builder: Address,
        transaction: TransactionId,
    },
    #[error("a builder is already installed at {0}")]
    BuilderAddressTaken(Address),
    #[error("batch is empty")]
    EmptyBatch,
    #[error("transaction {id} is executable from {executable_at}, now is {now}")]
    NotYetExecutable {
        id: TransactionId,
        executable_at: u64,
        now: u64,
    },
    #[error("transaction {id} expired at {expires_at}, now is {now}")]
    Expired {
        id: TransactionId,
        expires_at: u64,
        now: u64,
    },
    #[error("transaction {0} was already executed")]
    AlreadyExecuted(TransactionId),
    #[error("transaction {0} is not queued")]
    NotQueued(TransactionId),
    #[error("builder {builder} failed to plan: {reason}")]
    BuilderProbeFailed {
        builder: Address,
        reason: BuilderError,
    },
    #[error("signer {signer} does not stand behind {hash}")]
    InvalidSigner { signer: Address, hash: B256 },
    #[error("{signer} never approved {hash}")]
    HashNotApproved { signer: Address, hash: B256 },
    #[error("timestamp overflow")]
    TimestampOverflow,
    #[error(transparent)]
    Vault(#[from] VaultError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// ABI custom errors mirrored by [`GatewayError`].
pub mod abi {
    use alloy_sol_types::sol;

    sol! {
        error Unauthorized(address caller);
        error BuilderNotApproved(address builder);
        error BuilderAlreadyQueued(address builder, uint256 transactionId);
        error BuilderAddressTaken(address builder);
        error EmptyBatch();
        error NotYetExecutable(uint256 transactionId, uint256 executableAt);
        error TransactionExpired(uint256 transactionId, uint256 expiresAt);
        error AlreadyExecuted(uint256 transactionId);
        error NotQueued(uint256 transactionId);
        error BuilderProbeFailed(address builder, string reason);
        error InvalidSigner(address signer, bytes32 safeTxHash);
        error HashNotApproved(address signer, bytes32 safeTxHash);
        error TimestampOverflow();
        error VaultExecutionFailed(string reason);
        error InvalidConfiguration(string reason);
    }
}

fn id_word(id: TransactionId) -> U256 {
    U256::from(id.get())
}

impl GatewayError {
    pub fn revert_data(&self) -> Vec<u8> {
        match self {
            Self::Unauthorized { caller, .. } => abi::Unauthorized { caller: *caller }.abi_encode(),
            Self::BuilderNotApproved(builder) => {
                abi::BuilderNotApproved { builder: *builder }.abi_encode()
            }
            Self::BuilderAlreadyQueued {
                builder,
                transaction,
            } => abi::BuilderAlreadyQueued {
                builder: *builder,
                transactionId: id_word(*transaction),
            }
            .abi_encode(),
            Self::BuilderAddressTaken(builder) => {
                abi::BuilderAddressTaken { builder: *builder }.abi_encode()
            }
            Self::EmptyBatch => abi::EmptyBatch {}.abi_encode(),
            Self::NotYetExecutable {
                id, executable_at, ..
            } => abi::NotYetExecutable {
                transactionId: id_word(*id),
                executableAt: U256::from(*executable_at),
            }
            .abi_encode(),
            Self::Expired { id, expires_at, .. } => abi::TransactionExpired {
                transactionId: id_word(*id),
                expiresAt: U256::from(*expires_at),
            }
            .abi_encode(),
            Self::AlreadyExecuted(id) => abi::AlreadyExecuted {
                transactionId: id_word(*id),
            }
            .abi_encode(),
            Self::NotQueued(id) => abi::NotQueued {
                transactionId: id_word(*id),
            }
            .abi_encode(),
            Self::BuilderProbeFailed { builder, reason } => abi::BuilderProbeFailed {
                builder: *builder,
                reason: reason.to_string(),
            }
            .abi_encode(),
            Self::InvalidSigner { signer, hash } => abi::InvalidSigner {
                signer: *signer,
                safeTxHash: *hash,
            }
            .abi_encode(),
            Self::HashNotApproved { signer, hash } => abi::HashNotApproved {
                signer: *signer,
                safeTxHash: *hash,
            }
            .abi_encode(),
            Self::TimestampOverflow => abi::TimestampOverflow {}.abi_encode(),
            Self::Vault(err) => abi::VaultExecutionFailed {
                reason: err.to_string(),
            }
            .abi_encode(),
            Self::Config(err) => abi::InvalidConfiguration {
                reason: err.to_string(),
            }
            .abi_encode(),
        }
    }
}
