//! Free-text blocks: job description and notes.
use super::{ignored_input, BlockInput, BlockRenderer, BlockView, ValueChange};
use crate::blocks::{Block, BlockType, BlockValue};

pub(super) struct TextRenderer;

impl BlockRenderer for TextRenderer {
    fn view(&self, block: &Block, block_type: BlockType, current: Option<&BlockValue>) -> BlockView {
        let value = match current {
            Some(BlockValue::Text(text)) => text.clone(),
            _ => String::new(),
        };
        BlockView::Text {
            block_type,
            label: block.display_label(),
            required: block.is_required(),
            placeholder: block.placeholder.clone().or_else(|| {
                crate::blocks::registry::spec(block_type)
                    .placeholder
                    .map(str::to_string)
            }),
            value,
            multiline: true,
        }
    }

    fn apply(
        &self,
        _block: &Block,
        block_type: BlockType,
        current: Option<&BlockValue>,
        input: BlockInput,
    ) -> Option<ValueChange> {
        match input {
            // Whitespace-only text is "no value".
            BlockInput::Text(text) if text.trim().is_empty() => current.map(|_| ValueChange::Clear),
            BlockInput::Text(text) => Some(ValueChange::Set(BlockValue::Text(text))),
            BlockInput::Clear => current.map(|_| ValueChange::Clear),
            other => {
                ignored_input(block_type, &other);
                None
            }
        }
    }
}
