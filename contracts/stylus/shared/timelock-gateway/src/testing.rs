//! In-memory vault used by the gateway tests.

use std::collections::{BTreeMap, BTreeSet};

use alloy_primitives::{Address, B256, U256};
use timelock_gateway_types::{decode_batch, signatures::ApprovalSignature, Action, Operation};

use crate::{
    builder::{ActionBuilder, BuilderError},
    context::PlanContext,
    hash::safe_transaction_hash,
    vault::{Vault, VaultCall, VaultError},
};

pub(crate) const CHAIN_ID: u64 = 1;
pub(crate) const VAULT: Address = Address::repeat_byte(0x5a);
pub(crate) const RELAY: Address = Address::repeat_byte(0xaa);

/// Threshold-checking vault that verifies approved-hash signatures and applies native transfers.
#[derive(Clone, Debug)]
pub(crate) struct MemoryVault {
    owners: Vec<Address>,
    threshold: usize,
    nonce: U256,
    approved: BTreeSet<(Address, B256)>,
    balances: BTreeMap<Address, U256>,
    pub executed: Vec<Vec<Action>>,
}

impl MemoryVault {
    pub fn new(owners: &[Address], threshold: usize) -> Self {
        Self {
            owners: owners.to_vec(),
            threshold,
            nonce: U256::ZERO,
            approved: BTreeSet::new(),
            balances: BTreeMap::new(),
            executed: Vec::new(),
        }
    }

    pub fn with_balance(mut self, balance: U256) -> Self {
        self.balances.insert(VAULT, balance);
        self
    }

    pub fn approve_hash(&mut self, owner: Address, hash: B256) {
        self.approved.insert((owner, hash));
    }

    /// Simulates an unrelated vault transaction consuming the current nonce.
    pub fn bump_nonce(&mut self) {
        self.nonce += U256::from(1u64);
    }

    pub fn balance_of(&self, account: Address) -> U256 {
        self.balances.get(&account).copied().unwrap_or_default()
    }

    fn verify(&self, hash: B256, signatures: &[u8]) -> Result<(), VaultError> {
        let records = ApprovalSignature::decode_all(signatures)
            .map_err(|err| VaultError::InvalidSignatures(format!("{err:?}")))?;
        if records.len() < self.threshold {
            return Err(VaultError::ThresholdNotMet {
                provided: records.len(),
                threshold: self.threshold,
            });
        }
        if records.windows(2).any(|pair| pair[0].signer >= pair[1].signer) {
            return Err(VaultError::InvalidSignatures("signers not strictly ascending".into()));
        }
        for record in &records {
            if !self.is_owner(record.signer) {
                return Err(VaultError::InvalidSignatures(format!("{} is not an owner", record.signer)));
            }
            if !self.is_hash_approved(record.signer, hash) {
                return Err(VaultError::InvalidSignatures(format!("{} did not approve", record.signer)));
            }
        }
        Ok(())
    }
}

impl Vault for MemoryVault {
    fn address(&self) -> Address {
        VAULT
    }

    fn nonce(&self) -> U256 {
        self.nonce
    }

    fn owners(&self) -> Vec<Address> {
        self.owners.clone()
    }

    fn transaction_hash(&self, call: &VaultCall, nonce: U256) -> B256 {
        safe_transaction_hash(CHAIN_ID, VAULT, call, nonce)
    }

    fn is_hash_approved(&self, owner: Address, hash: B256) -> bool {
        self.approved.contains(&(owner, hash))
    }

    fn exec_transaction(&mut self, call: &VaultCall, signatures: &[u8]) -> Result<(), VaultError> {
        let hash = self.transaction_hash(call, self.nonce);
        self.verify(hash, signatures)?;
        if call.operation != Operation::DelegateCall || call.to != RELAY || !call.value.is_zero() {
            return Err(VaultError::Reverted("unsupported call".into()));
        }
        let actions = decode_batch(&call.data).map_err(|err| VaultError::Reverted(format!("{err:?}")))?;

        let mut balances = self.balances.clone();
        for action in &actions {
            if action.value.is_zero() {
                continue;
            }
            let vault_balance = balances.entry(VAULT).or_default();
            *vault_balance = vault_balance
                .checked_sub(action.value)
                .ok_or_else(|| VaultError::Reverted("insufficient balance".into()))?;
            *balances.entry(action.target).or_default() += action.value;
        }

        self.balances = balances;
        self.nonce += U256::from(1u64);
        self.executed.push(actions);
        Ok(())
    }
}

/// Builder whose planning always reverts.
pub(crate) struct RevertingBuilder;

impl ActionBuilder for RevertingBuilder {
    fn plan_actions(&self, _ctx: &PlanContext) -> Result<Vec<Action>, BuilderError> {
        Err(BuilderError::Reverted("out of budget".into()))
    }
}
