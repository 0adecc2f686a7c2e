use alloy_primitives::{Address, U256};
use timelock_gateway_types::Action;

use crate::{
    builder::{ActionBuilder, BuilderError},
    context::PlanContext,
};

/// Sends a fixed native amount to one recipient, at most once per cooldown.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NativeTransferBuilder {
    recipient: Address,
    amount: U256,
    cooldown: u64,
    last_sent: Option<u64>,
}

impl NativeTransferBuilder {
    pub fn new(recipient: Address, amount: U256, cooldown: u64) -> Self {
        Self {
            recipient,
            amount,
            cooldown,
            last_sent: None,
        }
    }

    pub fn last_sent(&self) -> Option<u64> {
        self.last_sent
    }
}

impl ActionBuilder for NativeTransferBuilder {
    fn plan_actions(&self, ctx: &PlanContext) -> Result<Vec<Action>, BuilderError> {
        if let Some(last_sent) = self.last_sent {
            let ready_at = last_sent.saturating_add(self.cooldown);
            if ctx.timestamp < ready_at {
                return Err(BuilderError::CooldownActive { ready_at });
            }
        }
        if self.amount.is_zero() {
            return Err(BuilderError::NoActions);
        }
        Ok(vec![Action::transfer(self.recipient, self.amount)])
    }

    fn commit_actions(&mut self, ctx: &PlanContext, actions: &[Action]) {
        if !actions.is_empty() {
            self.last_sent = Some(ctx.timestamp);
        }
    }
}
