//! Action builder capability.

use alloy_primitives::U256;
use thiserror::Error;
use timelock_gateway_types::Action;

use crate::context::PlanContext;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuilderError {
    #[error("no builder is installed at this address")]
    NotInstalled,
    #[error("builder produced no actions")]
    NoActions,
    #[error("cooldown active until {ready_at}")]
    CooldownActive { ready_at: u64 },
    #[error("period cap exceeded ({remaining} remaining)")]
    PeriodCapExceeded { remaining: U256 },
    #[error("{0}")]
    Reverted(String),
}

/// A pluggable producer of planned calls.
///
/// Planning is side-effect-free (`&self`) so the gateway can plan for queueing and for hash
/// previews as often as it likes. Bookkeeping happens in [`ActionBuilder::commit_actions`], which
/// the gateway calls exactly once, after the vault executed the batch, with the actions this
/// builder contributed to it.
pub trait ActionBuilder: Send {
    fn plan_actions(&self, ctx: &PlanContext) -> Result<Vec<Action>, BuilderError>;

    fn commit_actions(&mut self, _ctx: &PlanContext, _actions: &[Action]) {}
}
