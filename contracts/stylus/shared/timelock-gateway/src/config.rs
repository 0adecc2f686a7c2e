//! Gateway configuration, fixed at construction.

use alloy_primitives::Address;
use thiserror::Error;

pub const DEFAULT_SHORT_DELAY: u64 = 24 * 60 * 60;
pub const DEFAULT_LONG_DELAY: u64 = 7 * 24 * 60 * 60;
pub const DEFAULT_EXPIRY: u64 = 7 * 24 * 60 * 60;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("relay address must not be zero")]
    ZeroRelay,
    #[error("long delay ({long}s) must exceed short delay ({short}s)")]
    DelayOrdering { short: u64, long: u64 },
}

/// Which timelock a batch is subject to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DelayClass {
    /// Every action came from a currently approved builder.
    PreApproved,
    /// The batch contains caller-supplied actions.
    Arbitrary,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GatewayConfig {
    /// Multi-call relay the vault delegate-calls into.
    pub relay: Address,
    pub short_delay: u64,
    pub long_delay: u64,
    /// Execution window used when a queue call passes a zero expiry delay; `0` means no expiry.
    pub default_expiry: u64,
}

impl GatewayConfig {
    pub const fn new(relay: Address) -> Self {
        Self {
            relay,
            short_delay: DEFAULT_SHORT_DELAY,
            long_delay: DEFAULT_LONG_DELAY,
            default_expiry: DEFAULT_EXPIRY,
        }
    }

    pub const fn with_delays(mut self, short_delay: u64, long_delay: u64) -> Self {
        self.short_delay = short_delay;
        self.long_delay = long_delay;
        self
    }

    pub const fn with_default_expiry(mut self, default_expiry: u64) -> Self {
        self.default_expiry = default_expiry;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.relay == Address::ZERO {
            return Err(ConfigError::ZeroRelay);
        }
        if self.long_delay <= self.short_delay {
            return Err(ConfigError::DelayOrdering {
                short: self.short_delay,
                long: self.long_delay,
            });
        }
        Ok(())
    }

    pub const fn delay_for(&self, class: DelayClass) -> u64 {
        match class {
            DelayClass::PreApproved => self.short_delay,
            DelayClass::Arbitrary => self.long_delay,
        }
    }

    /// Length of the execution window for a requested expiry delay.
    pub const fn expiry_window(&self, expiry_delay: u64) -> Option<u64> {
        let window = if expiry_delay != 0 {
            expiry_delay
        } else {
            self.default_expiry
        };
        if window == 0 {
            None
        } else {
            Some(window)
        }
    }
}
