//! The vault the gateway fronts, seen from the gateway's side.

use alloy_primitives::{Address, Bytes, B256, U256};
use thiserror::Error;
use timelock_gateway_types::Operation;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VaultError {
    #[error("{provided} approvals provided, threshold is {threshold}")]
    ThresholdNotMet { provided: usize, threshold: usize },
    #[error("invalid signatures: {0}")]
    InvalidSignatures(String),
    #[error("execution reverted: {0}")]
    Reverted(String),
}

/// A call the vault executes on its own authority.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VaultCall {
    pub to: Address,
    pub value: U256,
    pub data: Bytes,
    pub operation: Operation,
}

/// Multi-signer vault abstraction.
///
/// The vault owns its nonce, its owner set and its approved-hash registry, and enforces its own
/// signature threshold in [`Vault::exec_transaction`].
pub trait Vault {
    fn address(&self) -> Address;

    fn nonce(&self) -> U256;

    fn owners(&self) -> Vec<Address>;

    fn is_owner(&self, account: Address) -> bool {
        self.owners().contains(&account)
    }

    /// Canonical transaction hash for `call` at `nonce`.
    fn transaction_hash(&self, call: &VaultCall, nonce: U256) -> B256;

    /// Whether `owner` recorded an approval of `hash` in the vault's registry.
    fn is_hash_approved(&self, owner: Address, hash: B256) -> bool;

    /// Execute `call` at the current nonce, authorized by `signatures`.
    fn exec_transaction(&mut self, call: &VaultCall, signatures: &[u8]) -> Result<(), VaultError>;
}
