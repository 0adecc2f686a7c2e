use timelock_gateway_types::Action;

use crate::{
    builder::{ActionBuilder, BuilderError},
    context::PlanContext,
};

/// A fixed list of actions.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StaticBatch {
    actions: Vec<Action>,
}

impl StaticBatch {
    pub fn new(actions: Vec<Action>) -> Self {
        Self { actions }
    }
}

impl ActionBuilder for StaticBatch {
    fn plan_actions(&self, _ctx: &PlanContext) -> Result<Vec<Action>, BuilderError> {
        if self.actions.is_empty() {
            return Err(BuilderError::NoActions);
        }
        Ok(self.actions.clone())
    }
}
