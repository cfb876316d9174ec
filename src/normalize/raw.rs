//! Raw-to-canonical boundary for backend service records.
//!
//! Every shape the catalog has emitted over time is sniffed here and nowhere
//! else: block lists as arrays or JSON-encoded strings, option lists as arrays of
//! strings or objects, sub-services under `bullets`, `options`, or `subServices`.
use crate::blocks::{registry, Block, BlockKind, BlockType};
use crate::error::NormalizationError;
use serde_json::{Map, Value};

const SUB_SERVICE_KEYS: &[&str] = &["bullets", "options", "subServices", "sub_services"];
const BLOCK_LIST_KEYS: &[&str] = &["bookingBlocks", "booking_blocks"];
const BLOCK_TYPE_KEYS: &[&str] = &["type", "blockType", "block_type", "kind"];
const PRICE_KEYS: &[&str] = &["basePrice", "base_price", "price"];
const OPTION_LABEL_KEYS: &[&str] = &["label", "title", "name", "value"];

pub(super) type Record = Map<String, Value>;

pub(super) fn as_record(raw: &Value) -> Result<&Record, NormalizationError> {
    raw.as_object().ok_or(NormalizationError::NotAnObject)
}

/// Resolve `(slug, title)` from `slug`, `id`, or a slugified `title`.
pub(super) fn identity(record: &Record) -> Result<(String, String), NormalizationError> {
    let title = non_blank_str(record, "title").or_else(|| non_blank_str(record, "name"));
    let slug = non_blank_str(record, "slug")
        .or_else(|| match record.get("id") {
            Some(Value::String(id)) if !id.trim().is_empty() => Some(id.trim().to_string()),
            Some(Value::Number(id)) => Some(id.to_string()),
            _ => None,
        })
        .or_else(|| title.as_deref().map(slugify).filter(|slug| !slug.is_empty()))
        .ok_or(NormalizationError::MissingIdentity)?;
    let title = title.unwrap_or_else(|| slug.clone());
    Ok((slug, title))
}

/// Best-effort identity used by the fail-soft path; never errors.
pub(super) fn loose_identity(raw: &Value) -> (String, String) {
    match raw.as_object().map(identity) {
        Some(Ok(identity)) => identity,
        _ => (String::new(), String::new()),
    }
}

pub(super) fn icon(record: &Record) -> Option<String> {
    non_blank_str(record, "icon")
}

pub(super) fn base_price(record: &Record) -> Option<f64> {
    PRICE_KEYS.iter().find_map(|key| match record.get(*key)? {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().trim_start_matches('$').parse::<f64>().ok(),
        _ => None,
    })
}

/// First non-empty sub-service list among the tolerated keys.
pub(super) fn sub_services(record: &Record) -> Vec<String> {
    SUB_SERVICE_KEYS
        .iter()
        .filter_map(|key| record.get(*key))
        .map(string_list)
        .find(|list| !list.is_empty())
        .unwrap_or_default()
}

/// Explicit admin-authored blocks, if the record carries a non-empty list.
///
/// Absent, null, empty, or unparseable block lists yield `Ok(None)` so the caller
/// falls through to inference.
pub(super) fn explicit_blocks(record: &Record) -> Result<Option<Vec<Block>>, NormalizationError> {
    let Some(raw_blocks) = BLOCK_LIST_KEYS.iter().find_map(|key| record.get(*key)) else {
        return Ok(None);
    };
    let entries = match raw_blocks {
        Value::Array(entries) => entries.clone(),
        Value::String(text) => match serde_json::from_str::<Value>(text) {
            Ok(Value::Array(entries)) => entries,
            Ok(Value::Object(wrapper)) => block_array(&wrapper),
            Ok(_) => Vec::new(),
            Err(err) => {
                tracing::debug!(error = %err, "bookingBlocks string is not JSON; inferring blocks");
                Vec::new()
            }
        },
        Value::Object(wrapper) => block_array(&wrapper),
        _ => Vec::new(),
    };
    if entries.is_empty() {
        return Ok(None);
    }
    let blocks = entries
        .iter()
        .enumerate()
        .map(|(index, entry)| raw_block(index, entry))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Some(blocks))
}

fn block_array(wrapper: &Record) -> Vec<Value> {
    match wrapper.get("blocks") {
        Some(Value::Array(entries)) => entries.clone(),
        _ => Vec::new(),
    }
}

fn raw_block(index: usize, entry: &Value) -> Result<Block, NormalizationError> {
    let fields = match entry {
        Value::String(tag) if !tag.trim().is_empty() => {
            let kind = BlockKind::from(tag.trim().to_string());
            return Ok(match kind.block_type() {
                Some(block_type) => Block::from_registry(block_type),
                None => bare_block(kind),
            });
        }
        Value::Object(fields) => fields,
        _ => return Err(NormalizationError::MalformedBlock { index }),
    };
    let tag = BLOCK_TYPE_KEYS
        .iter()
        .find_map(|key| non_blank_str(fields, key))
        .ok_or(NormalizationError::MalformedBlock { index })?;
    let kind = BlockKind::from(tag);
    let default_required = kind
        .block_type()
        .map(|block_type| registry::spec(block_type).required)
        .unwrap_or(false);
    let required = match fields.get("required") {
        Some(Value::Bool(flag)) => *flag,
        Some(Value::String(flag)) => flag.trim().eq_ignore_ascii_case("true"),
        _ => default_required,
    };
    Ok(Block {
        kind,
        required,
        label: non_blank_str(fields, "label"),
        placeholder: non_blank_str(fields, "placeholder"),
        options: fields.get("options").map(string_list).unwrap_or_default(),
    })
}

fn bare_block(kind: BlockKind) -> Block {
    Block {
        kind,
        required: false,
        label: None,
        placeholder: None,
        options: Vec::new(),
    }
}

/// Read a list of display strings from any tolerated list shape.
pub(super) fn string_list(value: &Value) -> Vec<String> {
    let items: Vec<String> = match value {
        Value::Array(entries) => entries.iter().filter_map(option_label).collect(),
        Value::String(text) => {
            let trimmed = text.trim();
            match serde_json::from_str::<Value>(trimmed) {
                Ok(Value::Array(entries)) if trimmed.starts_with('[') => {
                    entries.iter().filter_map(option_label).collect()
                }
                _ => trimmed
                    .split(['\n', ','])
                    .map(str::to_string)
                    .collect(),
            }
        }
        _ => Vec::new(),
    };
    dedupe(items)
}

fn option_label(entry: &Value) -> Option<String> {
    match entry {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Object(fields) => OPTION_LABEL_KEYS
            .iter()
            .find_map(|key| non_blank_str(fields, key)),
        _ => None,
    }
}

fn dedupe(items: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for item in items {
        let item = item.trim();
        if item.is_empty() || out.iter().any(|seen| seen == item) {
            continue;
        }
        out.push(item.to_string());
    }
    out
}

fn non_blank_str(record: &Record, key: &str) -> Option<String> {
    record
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

fn slugify(title: &str) -> String {
    let mut slug = String::new();
    for ch in title.trim().chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch.to_ascii_lowercase());
        } else if !slug.ends_with('-') && !slug.is_empty() {
            slug.push('-');
        }
    }
    slug.trim_end_matches('-').to_string()
}

/// Whether `block` is the sub-service picker.
pub(super) fn is_sub_service(block: &Block) -> bool {
    block.block_type() == Some(BlockType::SubService)
}
