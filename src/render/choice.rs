//! Single-choice pickers: sub-service, frequency, home size, laundry units,
//! handyman job type, vehicle type.
use super::{choice_options, ignored_input, BlockInput, BlockRenderer, BlockView, ValueChange};
use crate::blocks::{Block, BlockType, BlockValue};

pub(super) struct ChoiceRenderer;

impl BlockRenderer for ChoiceRenderer {
    fn view(&self, block: &Block, block_type: BlockType, current: Option<&BlockValue>) -> BlockView {
        let selected = match current {
            Some(BlockValue::Choice(choice)) => Some(choice.as_str()),
            _ => None,
        };
        BlockView::Choice {
            block_type,
            label: block.display_label(),
            required: block.is_required(),
            options: choice_options(&block.effective_options(), selected),
        }
    }

    fn apply(
        &self,
        block: &Block,
        block_type: BlockType,
        current: Option<&BlockValue>,
        input: BlockInput,
    ) -> Option<ValueChange> {
        match input {
            BlockInput::Select(choice) => {
                let offered = block.effective_options();
                if choice.trim().is_empty()
                    || (!offered.is_empty() && !offered.contains(&choice.as_str()))
                {
                    tracing::warn!(
                        block_type = block_type.as_str(),
                        choice = %choice,
                        "choice is not offered; ignoring"
                    );
                    return None;
                }
                if current == Some(&BlockValue::Choice(choice.clone())) {
                    return None;
                }
                Some(ValueChange::Set(BlockValue::Choice(choice)))
            }
            BlockInput::Clear => current.map(|_| ValueChange::Clear),
            other => {
                ignored_input(block_type, &other);
                None
            }
        }
    }
}
