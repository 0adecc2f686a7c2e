use alloy_primitives::{Address, U256};
use alloy_sol_types::{sol, SolCall};
use timelock_gateway_types::Action;

use crate::{
    builder::{ActionBuilder, BuilderError},
    context::PlanContext,
};

sol! {
    interface IERC20 {
        function transfer(address to, uint256 amount) external returns (bool);
    }
}

/// Pays a fixed ERC-20 amount to one recipient, bounded by a per-period spending cap.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TokenTransferBuilder {
    token: Address,
    recipient: Address,
    amount: U256,
    period: u64,
    period_cap: U256,
    /// (period index, amount spent in it)
    spent: (u64, U256),
}

impl TokenTransferBuilder {
    pub fn new(token: Address, recipient: Address, amount: U256, period: u64, period_cap: U256) -> Self {
        Self {
            token,
            recipient,
            amount,
            period: period.max(1),
            period_cap,
            spent: (0, U256::ZERO),
        }
    }

    fn period_index(&self, timestamp: u64) -> u64 {
        timestamp / self.period
    }

    /// Amount already spent in the period containing `timestamp`.
    pub fn spent_at(&self, timestamp: u64) -> U256 {
        let (index, spent) = self.spent;
        if index == self.period_index(timestamp) {
            spent
        } else {
            U256::ZERO
        }
    }
}

impl ActionBuilder for TokenTransferBuilder {
    fn plan_actions(&self, ctx: &PlanContext) -> Result<Vec<Action>, BuilderError> {
        if self.amount.is_zero() {
            return Err(BuilderError::NoActions);
        }
        let remaining = self.period_cap.saturating_sub(self.spent_at(ctx.timestamp));
        if self.amount > remaining {
            return Err(BuilderError::PeriodCapExceeded { remaining });
        }
        let data = IERC20::transferCall {
            to: self.recipient,
            amount: self.amount,
        }
        .abi_encode();
        Ok(vec![Action::new(self.token, U256::ZERO, data)])
    }

    fn commit_actions(&mut self, ctx: &PlanContext, actions: &[Action]) {
        let executed = actions
            .iter()
            .filter(|action| action.target == self.token)
            .filter_map(|action| IERC20::transferCall::abi_decode(&action.data, true).ok())
            .fold(U256::ZERO, |acc, call| acc.saturating_add(call.amount));
        let spent = self.spent_at(ctx.timestamp).saturating_add(executed);
        self.spent = (self.period_index(ctx.timestamp), spent);
    }
}
