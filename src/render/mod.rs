//! Block renderer dispatcher.
//!
//! [`present`] picks the renderer for a block's type and hands back a
//! [`BlockControl`]: a headless view of the block plus an input handler that
//! emits [`ValueChange`]s through the caller's `on_change`. Presentation is left
//! to whatever front end consumes [`BlockView`].
use crate::blocks::{Attachment, Block, BlockType, BlockValue};
use serde::Serialize;

mod choice;
mod photos;
mod snow;
mod text;

use choice::ChoiceRenderer;
use photos::PhotoRenderer;
use snow::SnowRenderer;
use text::TextRenderer;

/// Interaction a customer performs on a block control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockInput {
    /// Pick one of the block's options.
    Select(String),
    /// Replace the free text.
    Text(String),
    /// Snow options: set the property type, keeping the walkways flag.
    PropertyType(String),
    /// Snow options: toggle walkways, keeping the property type.
    IncludeWalkways(bool),
    /// Append files to the photo list.
    AddPhotos(Vec<Attachment>),
    /// Remove the photo at an index.
    RemovePhoto(usize),
    Clear,
}

impl BlockInput {
    pub fn name(&self) -> &'static str {
        match self {
            BlockInput::Select(_) => "select",
            BlockInput::Text(_) => "text",
            BlockInput::PropertyType(_) => "property_type",
            BlockInput::IncludeWalkways(_) => "include_walkways",
            BlockInput::AddPhotos(_) => "add_photos",
            BlockInput::RemovePhoto(_) => "remove_photo",
            BlockInput::Clear => "clear",
        }
    }
}

/// Value-change event emitted by a control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueChange {
    Set(BlockValue),
    /// The block now holds no value.
    Clear,
}

/// One selectable option with its selection state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChoiceOption {
    pub label: String,
    pub selected: bool,
}

/// Photo entry shown in an upload control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoEntry {
    pub index: usize,
    pub name: String,
    pub size: u64,
    pub mime_type: String,
}

/// Headless description of a rendered block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "control", rename_all = "snake_case")]
pub enum BlockView {
    Choice {
        block_type: BlockType,
        label: String,
        required: bool,
        options: Vec<ChoiceOption>,
    },
    Text {
        block_type: BlockType,
        label: String,
        required: bool,
        placeholder: Option<String>,
        value: String,
        multiline: bool,
    },
    Snow {
        label: String,
        required: bool,
        property_types: Vec<ChoiceOption>,
        include_walkways: bool,
    },
    Photos {
        label: String,
        required: bool,
        placeholder: Option<String>,
        accept: &'static str,
        photos: Vec<PhotoEntry>,
    },
}

/// Presentation and interaction logic for one family of block types.
pub trait BlockRenderer: Sync {
    fn view(&self, block: &Block, block_type: BlockType, current: Option<&BlockValue>) -> BlockView;

    /// Apply `input` to `current`; `None` means the input changed nothing.
    fn apply(
        &self,
        block: &Block,
        block_type: BlockType,
        current: Option<&BlockValue>,
        input: BlockInput,
    ) -> Option<ValueChange>;
}

/// Renderer for a block type; adding a [`BlockType`] fails to compile until it is mapped here.
pub fn renderer_for(block_type: BlockType) -> &'static dyn BlockRenderer {
    match block_type {
        BlockType::SubService
        | BlockType::Frequency
        | BlockType::HomeSize
        | BlockType::LaundryUnits
        | BlockType::HandymanJobType
        | BlockType::VehicleType => &ChoiceRenderer,
        BlockType::JobDescription | BlockType::SimpleNote => &TextRenderer,
        BlockType::SnowOptions => &SnowRenderer,
        BlockType::PhotoUpload => &PhotoRenderer,
    }
}

/// A presented block: its current view plus an input handler.
pub struct BlockControl<'a, F>
where
    F: FnMut(ValueChange),
{
    block: &'a Block,
    block_type: BlockType,
    renderer: &'static dyn BlockRenderer,
    current: Option<BlockValue>,
    view: BlockView,
    on_change: F,
}

impl<'a, F> BlockControl<'a, F>
where
    F: FnMut(ValueChange),
{
    pub fn view(&self) -> &BlockView {
        &self.view
    }

    pub fn value(&self) -> Option<&BlockValue> {
        self.current.as_ref()
    }

    pub fn block(&self) -> &'a Block {
        self.block
    }

    /// Apply an interaction; returns whether a change was emitted.
    pub fn input(&mut self, input: BlockInput) -> bool {
        let Some(change) =
            self.renderer
                .apply(self.block, self.block_type, self.current.as_ref(), input)
        else {
            return false;
        };
        self.current = match &change {
            ValueChange::Set(value) => Some(value.clone()),
            ValueChange::Clear => None,
        };
        self.view = self
            .renderer
            .view(self.block, self.block_type, self.current.as_ref());
        (self.on_change)(change);
        true
    }
}

/// Present `block` with its current value.
///
/// Blocks whose tag is not a known [`BlockType`] produce no control and a
/// diagnostic; the rest of the form is unaffected.
pub fn present<'a, F>(
    block: &'a Block,
    current: Option<&BlockValue>,
    on_change: F,
) -> Option<BlockControl<'a, F>>
where
    F: FnMut(ValueChange),
{
    let Some(block_type) = block.block_type() else {
        tracing::warn!(tag = block.kind.as_str(), "no renderer for block type; skipping");
        return None;
    };
    let renderer = renderer_for(block_type);
    let current = current
        .filter(|value| value.shape() == block_type.value_shape())
        .cloned();
    let view = renderer.view(block, block_type, current.as_ref());
    Some(BlockControl {
        block,
        block_type,
        renderer,
        current,
        view,
        on_change,
    })
}

/// Diagnostic for an input that does not apply to a block type.
pub(crate) fn ignored_input(block_type: BlockType, input: &BlockInput) {
    tracing::warn!(
        block_type = block_type.as_str(),
        input = input.name(),
        "input does not apply to block; ignoring"
    );
}

pub(crate) fn choice_options(offered: &[&str], selected: Option<&str>) -> Vec<ChoiceOption> {
    offered
        .iter()
        .map(|label| ChoiceOption {
            label: label.to_string(),
            selected: selected == Some(*label),
        })
        .collect()
}

#[cfg(test)]
#[path = "render_tests.rs"]
mod tests;
