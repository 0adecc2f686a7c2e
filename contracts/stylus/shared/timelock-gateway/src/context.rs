use alloy_primitives::Address;

/// Caller and clock of one gateway operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CallContext {
    pub sender: Address,
    /// Shared external clock (block timestamp), in seconds.
    pub timestamp: u64,
}

impl CallContext {
    pub const fn new(sender: Address, timestamp: u64) -> Self {
        Self { sender, timestamp }
    }
}

/// What a builder sees when planning or committing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlanContext {
    pub vault: Address,
    pub timestamp: u64,
}
