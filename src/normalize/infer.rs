//! Block inference for services without an explicit block configuration.
//!
//! Matching is a case-insensitive substring test on the slug. A slug containing
//! "move" gets a home-size picker even when the service has nothing to do with
//! moving homes; that coupling is kept as-is until product says otherwise.
use crate::blocks::{Block, BlockType};
use regex::Regex;
use std::sync::OnceLock;

/// Slug keywords that make a service recurring, and so worth a frequency picker.
pub const FREQUENCY_KEYWORDS: &[&str] = &["snow", "cleaning", "airbnb", "laundry", "lawn", "maid"];

/// Service-specific blocks and the slug keywords that select them, in emit order.
pub const SERVICE_RULES: &[(BlockType, &[&str])] = &[
    (
        BlockType::HomeSize,
        &["cleaning", "maid", "lawn", "airbnb", "move"],
    ),
    (BlockType::LaundryUnits, &["laundry"]),
    (BlockType::HandymanJobType, &["handyman"]),
    (BlockType::SnowOptions, &["snow"]),
    (BlockType::VehicleType, &["auto", "automotive"]),
    (
        BlockType::JobDescription,
        &["handyman", "pest", "reno", "renovation"],
    ),
];

fn keyword_matcher(keywords: &[&str]) -> Regex {
    let alternation = keywords
        .iter()
        .map(|keyword| regex::escape(keyword))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!("(?i)(?:{alternation})")).expect("keyword alternation is a valid regex")
}

fn frequency_matcher() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| keyword_matcher(FREQUENCY_KEYWORDS))
}

fn service_matchers() -> &'static [(BlockType, Regex)] {
    static MATCHERS: OnceLock<Vec<(BlockType, Regex)>> = OnceLock::new();
    MATCHERS.get_or_init(|| {
        SERVICE_RULES
            .iter()
            .map(|(block_type, keywords)| (*block_type, keyword_matcher(keywords)))
            .collect()
    })
}

/// Infer the block list for `slug`.
///
/// Order: sub-service picker (when sub-services exist), frequency, service-specific
/// blocks in rule order, then a trailing optional note.
pub fn infer_blocks(slug: &str, sub_services: &[String]) -> Vec<Block> {
    let mut blocks = Vec::new();

    if !sub_services.is_empty() {
        let mut picker = Block::from_registry(BlockType::SubService);
        picker.required = true;
        picker.options = sub_services.to_vec();
        blocks.push(picker);
    }

    if frequency_matcher().is_match(slug) {
        blocks.push(Block::from_registry(BlockType::Frequency));
    }

    for (block_type, matcher) in service_matchers() {
        if matcher.is_match(slug) {
            blocks.push(Block::from_registry(*block_type));
        }
    }

    let mut note = Block::from_registry(BlockType::SimpleNote);
    note.required = false;
    blocks.push(note);

    tracing::debug!(
        slug,
        blocks = ?blocks.iter().map(|block| block.kind.as_str()).collect::<Vec<_>>(),
        "inferred booking blocks"
    );
    blocks
}

#[cfg(test)]
mod tests {
    use super::*;

    fn types(blocks: &[Block]) -> Vec<BlockType> {
        blocks.iter().filter_map(Block::block_type).collect()
    }

    #[test]
    fn matching_is_case_insensitive_substring() {
        let blocks = infer_blocks("Deep-CLEANING-pro", &[]);
        assert_eq!(
            types(&blocks),
            vec![BlockType::Frequency, BlockType::HomeSize, BlockType::SimpleNote]
        );
    }

    #[test]
    fn move_keyword_triggers_home_size_without_frequency() {
        let blocks = infer_blocks("junk-remove", &[]);
        assert_eq!(types(&blocks), vec![BlockType::HomeSize, BlockType::SimpleNote]);
    }

    #[test]
    fn snow_gets_frequency_and_snow_options() {
        let blocks = infer_blocks("snow-removal", &[]);
        assert_eq!(
            types(&blocks),
            vec![BlockType::Frequency, BlockType::SnowOptions, BlockType::SimpleNote]
        );
    }

    #[test]
    fn automotive_matches_vehicle_type_once() {
        let blocks = infer_blocks("automotive-detailing", &[]);
        assert_eq!(types(&blocks), vec![BlockType::VehicleType, BlockType::SimpleNote]);
    }

    #[test]
    fn renovation_asks_for_job_description() {
        let blocks = infer_blocks("kitchen-renovation", &[]);
        assert_eq!(
            types(&blocks),
            vec![BlockType::JobDescription, BlockType::SimpleNote]
        );
    }

    #[test]
    fn unmatched_slug_is_notes_only() {
        let blocks = infer_blocks("tutoring", &[]);
        assert_eq!(types(&blocks), vec![BlockType::SimpleNote]);
        assert!(!blocks[0].required);
    }
}
