//! Builder approval and queue bookkeeping.

use std::collections::BTreeMap;

use alloy_primitives::Address;

use crate::transaction::TransactionId;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BuilderInfo {
    /// Approved while `approval_expiry > now`; `None` once revoked or never approved.
    pub approval_expiry: Option<u64>,
    /// Live transaction referencing this builder, if any.
    pub queued_transaction: Option<TransactionId>,
}

impl BuilderInfo {
    pub fn is_approved(&self, now: u64) -> bool {
        self.approval_expiry.is_some_and(|expiry| expiry > now)
    }
}

#[derive(Clone, Debug, Default)]
pub struct BuilderRegistry {
    entries: BTreeMap<Address, BuilderInfo>,
}

impl BuilderRegistry {
    pub fn get(&self, builder: Address) -> Option<&BuilderInfo> {
        self.entries.get(&builder)
    }

    pub fn is_approved(&self, builder: Address, now: u64) -> bool {
        self.entries
            .get(&builder)
            .is_some_and(|info| info.is_approved(now))
    }

    pub fn queued_in(&self, builder: Address) -> Option<TransactionId> {
        self.entries
            .get(&builder)
            .and_then(|info| info.queued_transaction)
    }

    pub(crate) fn approve(&mut self, builder: Address, expiry: u64) {
        self.entries.entry(builder).or_default().approval_expiry = Some(expiry);
    }

    pub(crate) fn revoke(&mut self, builder: Address) {
        if let Some(info) = self.entries.get_mut(&builder) {
            info.approval_expiry = None;
        }
    }

    pub(crate) fn mark_queued(&mut self, builders: impl IntoIterator<Item = Address>, id: TransactionId) {
        for builder in builders {
            self.entries.entry(builder).or_default().queued_transaction = Some(id);
        }
    }

    /// Clear the queued flag of `builders`, but only where it still points at `id`.
    pub(crate) fn release(&mut self, builders: impl IntoIterator<Item = Address>, id: TransactionId) {
        for builder in builders {
            if let Some(info) = self.entries.get_mut(&builder) {
                if info.queued_transaction == Some(id) {
                    info.queued_transaction = None;
                }
            }
        }
    }
}
