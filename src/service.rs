//! Canonical service description consumed by the wizard.
use crate::blocks::{Block, BlockType};
use serde::{Deserialize, Serialize};

/// Normalized, immutable description of a bookable service.
///
/// `booking_blocks` order is the presentation order; nothing downstream reorders it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceConfig {
    pub slug: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_price: Option<f64>,
    #[serde(default)]
    pub booking_blocks: Vec<Block>,
}

impl ServiceConfig {
    pub fn block(&self, index: usize) -> Option<&Block> {
        self.booking_blocks.get(index)
    }

    /// Blocks with their indices, in presentation order.
    pub fn indexed_blocks(&self) -> impl Iterator<Item = (usize, &Block)> {
        self.booking_blocks.iter().enumerate()
    }

    /// Index of the first block of `block_type`.
    pub fn position_of(&self, block_type: BlockType) -> Option<usize> {
        self.booking_blocks
            .iter()
            .position(|block| block.block_type() == Some(block_type))
    }

    pub fn block_types(&self) -> Vec<Option<BlockType>> {
        self.booking_blocks.iter().map(Block::block_type).collect()
    }
}
