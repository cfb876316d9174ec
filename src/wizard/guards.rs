//! Forward guards, one per step.
//!
//! A guard failing means "do not advance"; callers turn it into a disabled
//! Next affordance. Required-block checks defer to [`value::is_empty`].
use super::state::{Step, WizardState};
use crate::blocks::{value, Block, BlockValue};
use crate::error::ValidationError;
use crate::service::ServiceConfig;
use std::collections::BTreeMap;

/// Check whether the customer may leave `step` going forward.
pub fn check(step: Step, state: &WizardState) -> Result<(), ValidationError> {
    match step {
        Step::Service => state
            .selected_service
            .as_ref()
            .map(|_| ())
            .ok_or(ValidationError::NoServiceSelected),
        Step::Details => {
            let service = state
                .selected_service
                .as_ref()
                .ok_or(ValidationError::NoServiceSelected)?;
            let missing = missing_required(service, &state.details.block_values);
            if missing.is_empty() {
                Ok(())
            } else {
                Err(ValidationError::MissingRequired {
                    labels: missing.iter().map(|(_, block)| block.display_label()).collect(),
                })
            }
        }
        Step::Schedule if state.details.schedule.is_complete() => Ok(()),
        Step::Schedule => Err(ValidationError::IncompleteSchedule),
        Step::Address if state.details.address.is_complete() => Ok(()),
        Step::Address => Err(ValidationError::IncompleteAddress),
        Step::Review | Step::Payment => Ok(()),
    }
}

/// Required blocks of `service` without a value, in block order.
pub fn missing_required<'a>(
    service: &'a ServiceConfig,
    values: &BTreeMap<usize, BlockValue>,
) -> Vec<(usize, &'a Block)> {
    service
        .indexed_blocks()
        .filter(|(_, block)| block.is_required())
        .filter(|(index, block)| {
            block
                .block_type()
                .map(|block_type| value::is_empty(block_type, values.get(index)))
                .unwrap_or(false)
        })
        .collect()
}
