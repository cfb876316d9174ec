//! Snow removal composite: property type plus walkways add-on.
//!
//! Partial inputs merge into the existing composite so choosing a property type
//! never resets an already-chosen walkways flag, and vice versa.
use super::{choice_options, ignored_input, BlockInput, BlockRenderer, BlockView, ValueChange};
use crate::blocks::{Block, BlockType, BlockValue, SnowOptions, SnowPatch};

pub(super) struct SnowRenderer;

fn current_options(current: Option<&BlockValue>) -> SnowOptions {
    match current {
        Some(BlockValue::Snow(options)) => options.clone(),
        _ => SnowOptions::default(),
    }
}

impl BlockRenderer for SnowRenderer {
    fn view(&self, block: &Block, _block_type: BlockType, current: Option<&BlockValue>) -> BlockView {
        let options = current_options(current);
        let selected = Some(options.property_type.as_str()).filter(|value| !value.is_empty());
        BlockView::Snow {
            label: block.display_label(),
            required: block.is_required(),
            property_types: choice_options(&block.effective_options(), selected),
            include_walkways: options.include_walkways,
        }
    }

    fn apply(
        &self,
        block: &Block,
        block_type: BlockType,
        current: Option<&BlockValue>,
        input: BlockInput,
    ) -> Option<ValueChange> {
        let patch = match input {
            BlockInput::PropertyType(property_type) => {
                let offered = block.effective_options();
                if !offered.is_empty() && !offered.contains(&property_type.as_str()) {
                    tracing::warn!(property_type = %property_type, "property type is not offered; ignoring");
                    return None;
                }
                SnowPatch {
                    property_type: Some(property_type),
                    ..Default::default()
                }
            }
            BlockInput::IncludeWalkways(include_walkways) => SnowPatch {
                include_walkways: Some(include_walkways),
                ..Default::default()
            },
            BlockInput::Clear => return current.map(|_| ValueChange::Clear),
            other => {
                ignored_input(block_type, &other);
                return None;
            }
        };
        let merged = current_options(current).merge(patch);
        Some(ValueChange::Set(BlockValue::Snow(merged)))
    }
}
