//! Queued transactions.

use std::fmt;

use alloy_primitives::{Address, Bytes};
use timelock_gateway_types::Action;

use crate::error::GatewayError;

/// Identifier of a queued transaction, allocated from a monotonic counter starting at 1.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TransactionId(u64);

impl TransactionId {
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A builder's share of a queued batch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct QueuedBuilder {
    pub builder: Address,
    /// Number of consecutive actions this builder contributed, in batch order.
    pub action_count: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransactionStatus {
    /// Waiting for its delay to elapse.
    Pending,
    Executable,
    /// The execution window closed without execution.
    Expired,
    Executed,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransactionInfo {
    /// Empty for arbitrary batches.
    pub builders: Vec<QueuedBuilder>,
    pub actions: Vec<Action>,
    /// Relay payload, fixed at queue time.
    pub encoded_actions: Bytes,
    pub executable_at: u64,
    pub expires_at: Option<u64>,
    pub is_executed: bool,
}

impl TransactionInfo {
    pub fn is_arbitrary(&self) -> bool {
        self.builders.is_empty()
    }

    pub fn builder_addresses(&self) -> impl Iterator<Item = Address> + '_ {
        self.builders.iter().map(|queued| queued.builder)
    }

    /// Each builder paired with the slice of actions it contributed.
    pub fn builder_actions(&self) -> impl Iterator<Item = (Address, &[Action])> + '_ {
        let mut offset = 0usize;
        self.builders.iter().map(move |queued| {
            let start = offset.min(self.actions.len());
            let end = offset.saturating_add(queued.action_count).min(self.actions.len());
            offset = end;
            (queued.builder, &self.actions[start..end])
        })
    }

    pub fn status(&self, now: u64) -> TransactionStatus {
        if self.is_executed {
            TransactionStatus::Executed
        } else if now < self.executable_at {
            TransactionStatus::Pending
        } else if self.expires_at.is_some_and(|expires_at| now >= expires_at) {
            TransactionStatus::Expired
        } else {
            TransactionStatus::Executable
        }
    }

    /// Fails unless the transaction can execute at `now`.
    pub(crate) fn ensure_executable(&self, id: TransactionId, now: u64) -> Result<(), GatewayError> {
        if self.is_executed {
            return Err(GatewayError::AlreadyExecuted(id));
        }
        if now < self.executable_at {
            return Err(GatewayError::NotYetExecutable {
                id,
                executable_at: self.executable_at,
                now,
            });
        }
        if let Some(expires_at) = self.expires_at {
            if now >= expires_at {
                return Err(GatewayError::Expired { id, expires_at, now });
            }
        }
        Ok(())
    }
}
