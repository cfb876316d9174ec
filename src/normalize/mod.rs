//! Service config normalizer.
//!
//! Converts whatever the catalog currently emits into a canonical
//! [`ServiceConfig`]. Precedence, first match wins:
//!
//! 1. explicit admin-authored `bookingBlocks`, with empty sub-service pickers
//!    enriched from the service's sub-service list;
//! 2. blocks inferred from the slug (see [`infer`]);
//! 3. on any normalization error, an empty block list.
use crate::blocks::{Block, BlockType};
use crate::error::NormalizationError;
use crate::service::ServiceConfig;
use serde_json::Value;

pub mod infer;
mod raw;

pub use infer::infer_blocks;

/// Normalize a raw service record, absorbing errors into an empty block list.
pub fn normalize(raw: &Value) -> ServiceConfig {
    match try_normalize(raw) {
        Ok(config) => config,
        Err(err) => {
            let (slug, title) = raw::loose_identity(raw);
            tracing::warn!(error = %err, slug, "service normalization failed; using empty blocks");
            ServiceConfig {
                slug,
                title,
                icon: None,
                base_price: None,
                booking_blocks: Vec::new(),
            }
        }
    }
}

/// Normalize a raw service record, reporting why it could not be normalized.
pub fn try_normalize(raw: &Value) -> Result<ServiceConfig, NormalizationError> {
    let record = raw::as_record(raw)?;
    let (slug, title) = raw::identity(record)?;
    let sub_services = raw::sub_services(record);

    let booking_blocks = match raw::explicit_blocks(record)? {
        Some(blocks) => enrich_explicit(&slug, blocks, &sub_services),
        None => infer::infer_blocks(&slug, &sub_services),
    };

    Ok(ServiceConfig {
        slug,
        title,
        icon: raw::icon(record),
        base_price: raw::base_price(record),
        booking_blocks,
    })
}

/// Fill empty sub-service options and uphold the block-list invariants.
///
/// Explicit non-empty options always win over the extracted list.
fn enrich_explicit(slug: &str, blocks: Vec<Block>, sub_services: &[String]) -> Vec<Block> {
    let mut seen_sub_service = false;
    let mut out = Vec::with_capacity(blocks.len());
    for mut block in blocks {
        match block.block_type() {
            Some(BlockType::SubService) if seen_sub_service => {
                tracing::warn!(slug, "dropping duplicate SUB_SERVICE block");
                continue;
            }
            Some(BlockType::SubService) => {
                seen_sub_service = true;
                if block.options.is_empty() && !sub_services.is_empty() {
                    tracing::debug!(slug, count = sub_services.len(), "filled sub-service options");
                    block.options = sub_services.to_vec();
                }
            }
            Some(BlockType::SimpleNote) => block.required = false,
            None => tracing::debug!(slug, tag = block.kind.as_str(), "keeping unrecognized block"),
            Some(_) => {}
        }
        out.push(block);
    }
    debug_assert!(out.iter().filter(|block| raw::is_sub_service(block)).count() <= 1);
    out
}

#[cfg(test)]
#[path = "normalize_tests.rs"]
mod tests;
