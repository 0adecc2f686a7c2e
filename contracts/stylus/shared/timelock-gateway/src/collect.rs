//! Action collection across builders.

use std::collections::BTreeMap;

use alloy_primitives::Address;
use timelock_gateway_types::Action;

use crate::{
    builder::{ActionBuilder, BuilderError},
    context::PlanContext,
    error::GatewayError,
    transaction::QueuedBuilder,
};

pub(crate) type BuilderDirectory = BTreeMap<Address, Box<dyn ActionBuilder>>;

/// Plan every builder in order and concatenate the results.
///
/// Fails closed: a builder that is missing, errors, or plans nothing aborts the whole batch.
pub(crate) fn collect_actions(
    directory: &BuilderDirectory,
    builders: &[Address],
    ctx: &PlanContext,
) -> Result<(Vec<Action>, Vec<QueuedBuilder>), GatewayError> {
    let mut actions = Vec::new();
    let mut shares = Vec::with_capacity(builders.len());
    for &builder in builders {
        let probe_failed = |reason: BuilderError| GatewayError::BuilderProbeFailed { builder, reason };
        let planned = directory
            .get(&builder)
            .ok_or_else(|| probe_failed(BuilderError::NotInstalled))?
            .plan_actions(ctx)
            .map_err(probe_failed)?;
        if planned.is_empty() {
            return Err(probe_failed(BuilderError::NoActions));
        }
        shares.push(QueuedBuilder {
            builder,
            action_count: planned.len(),
        });
        actions.extend(planned);
    }
    Ok((actions, shares))
}
