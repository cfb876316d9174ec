//! Per-block value model and the single emptiness predicate.
//!
//! Guards, the renderer, and the assembler all ask [`is_empty`] whether a block
//! holds a value; none of them re-derive emptiness from the value shape.
use super::{Block, BlockType};
use crate::error::ValidationError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Which [`BlockValue`] variant a block type stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueShape {
    Choice,
    Text,
    Composite,
    Attachments,
}

impl ValueShape {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueShape::Choice => "choice",
            ValueShape::Text => "text",
            ValueShape::Composite => "composite",
            ValueShape::Attachments => "attachments",
        }
    }
}

impl fmt::Display for ValueShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Composite value of a `SNOW_OPTIONS` block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnowOptions {
    #[serde(default)]
    pub property_type: String,
    #[serde(default)]
    pub include_walkways: bool,
}

/// Partial update to [`SnowOptions`]; absent fields keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnowPatch {
    #[serde(default)]
    pub property_type: Option<String>,
    #[serde(default)]
    pub include_walkways: Option<bool>,
}

impl SnowOptions {
    pub fn merge(mut self, patch: SnowPatch) -> SnowOptions {
        if let Some(property_type) = patch.property_type {
            self.property_type = property_type;
        }
        if let Some(include_walkways) = patch.include_walkways {
            self.include_walkways = include_walkways;
        }
        self
    }
}

/// Uploaded file descriptor carried by a `PHOTO_UPLOAD` block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    pub name: String,
    #[serde(default)]
    pub size: u64,
    pub mime_type: String,
    /// Base64 payload as handed over by the upload control.
    #[serde(default)]
    pub content: String,
}

/// A block's current value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum BlockValue {
    Choice(String),
    Text(String),
    Snow(SnowOptions),
    Photos(Vec<Attachment>),
}

impl BlockValue {
    pub fn shape(&self) -> ValueShape {
        match self {
            BlockValue::Choice(_) => ValueShape::Choice,
            BlockValue::Text(_) => ValueShape::Text,
            BlockValue::Snow(_) => ValueShape::Composite,
            BlockValue::Photos(_) => ValueShape::Attachments,
        }
    }

    /// Interpret loose JSON as a value for `block_type`.
    ///
    /// Used by scripted sessions; strings become choices or text depending on the
    /// block, objects become snow options, and arrays become attachment lists.
    pub fn from_json(block_type: BlockType, raw: &Value) -> Result<BlockValue, ValidationError> {
        let mismatch = || ValidationError::IncompatibleValue {
            block: block_type.as_str().to_string(),
            expected: block_type.value_shape(),
        };
        match block_type.value_shape() {
            ValueShape::Choice => raw
                .as_str()
                .map(|value| BlockValue::Choice(value.to_string()))
                .ok_or_else(mismatch),
            ValueShape::Text => raw
                .as_str()
                .map(|value| BlockValue::Text(value.to_string()))
                .ok_or_else(mismatch),
            ValueShape::Composite => serde_json::from_value::<SnowOptions>(raw.clone())
                .map(BlockValue::Snow)
                .map_err(|_| mismatch()),
            ValueShape::Attachments => serde_json::from_value::<Vec<Attachment>>(raw.clone())
                .map(BlockValue::Photos)
                .map_err(|_| mismatch()),
        }
    }
}

/// Whether `value` counts as "no value" for a block of `block_type`.
///
/// Missing values, blank strings, snow options without a property type, empty
/// attachment lists, and values of the wrong shape are all empty.
pub fn is_empty(block_type: BlockType, value: Option<&BlockValue>) -> bool {
    let Some(value) = value else {
        return true;
    };
    if value.shape() != block_type.value_shape() {
        return true;
    }
    match value {
        BlockValue::Choice(choice) => choice.trim().is_empty(),
        BlockValue::Text(text) => text.trim().is_empty(),
        BlockValue::Snow(options) => options.property_type.trim().is_empty(),
        BlockValue::Photos(photos) => photos.is_empty(),
    }
}

/// Check that `value` has the right shape for `block` and, for choices, is offered.
pub fn check_compatible(block: &Block, value: &BlockValue) -> Result<(), ValidationError> {
    let Some(block_type) = block.block_type() else {
        return Err(ValidationError::IncompatibleValue {
            block: block.kind.as_str().to_string(),
            expected: ValueShape::Text,
        });
    };
    if value.shape() != block_type.value_shape() {
        return Err(ValidationError::IncompatibleValue {
            block: block_type.as_str().to_string(),
            expected: block_type.value_shape(),
        });
    }
    let offered = block.effective_options();
    let chosen = match value {
        BlockValue::Choice(choice) => Some(choice.as_str()),
        BlockValue::Snow(options) if !options.property_type.is_empty() => {
            Some(options.property_type.as_str())
        }
        _ => None,
    };
    match chosen {
        Some(choice) if !offered.is_empty() && !offered.contains(&choice) => {
            Err(ValidationError::OptionNotOffered {
                block: block_type.as_str().to_string(),
                value: choice.to_string(),
            })
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn photo(name: &str) -> Attachment {
        Attachment {
            name: name.to_string(),
            size: 1024,
            mime_type: "image/jpeg".to_string(),
            content: String::new(),
        }
    }

    #[test]
    fn emptiness_follows_value_shape() {
        assert!(is_empty(BlockType::Frequency, None));
        assert!(is_empty(
            BlockType::Frequency,
            Some(&BlockValue::Choice("  ".to_string()))
        ));
        assert!(!is_empty(
            BlockType::Frequency,
            Some(&BlockValue::Choice("Weekly".to_string()))
        ));
        assert!(is_empty(
            BlockType::JobDescription,
            Some(&BlockValue::Text("\n".to_string()))
        ));
        assert!(is_empty(
            BlockType::SnowOptions,
            Some(&BlockValue::Snow(SnowOptions::default()))
        ));
        assert!(is_empty(
            BlockType::SnowOptions,
            Some(&BlockValue::Snow(SnowOptions {
                property_type: String::new(),
                include_walkways: true,
            }))
        ));
        assert!(is_empty(BlockType::PhotoUpload, Some(&BlockValue::Photos(Vec::new()))));
        assert!(!is_empty(
            BlockType::PhotoUpload,
            Some(&BlockValue::Photos(vec![photo("a.jpg")]))
        ));
    }

    #[test]
    fn wrong_shape_counts_as_empty() {
        assert!(is_empty(
            BlockType::PhotoUpload,
            Some(&BlockValue::Text("photo.jpg".to_string()))
        ));
    }

    #[test]
    fn snow_patch_merges_instead_of_replacing() {
        let current = SnowOptions {
            property_type: "House driveway".to_string(),
            include_walkways: false,
        };
        let merged = current.merge(SnowPatch {
            include_walkways: Some(true),
            ..Default::default()
        });
        assert_eq!(merged.property_type, "House driveway");
        assert!(merged.include_walkways);
    }

    #[test]
    fn compatibility_rejects_unoffered_choice() {
        let block = Block::from_registry(BlockType::Frequency);
        check_compatible(&block, &BlockValue::Choice("Weekly".to_string())).expect("offered");
        let err = check_compatible(&block, &BlockValue::Choice("Daily".to_string()))
            .expect_err("not offered");
        assert!(matches!(err, ValidationError::OptionNotOffered { .. }));
        let err = check_compatible(&block, &BlockValue::Text("Weekly".to_string()))
            .expect_err("wrong shape");
        assert!(matches!(
            err,
            ValidationError::IncompatibleValue {
                expected: ValueShape::Choice,
                ..
            }
        ));
    }

    #[test]
    fn from_json_reads_each_shape() {
        assert_eq!(
            BlockValue::from_json(BlockType::SimpleNote, &json!("gate code 1234")).expect("text"),
            BlockValue::Text("gate code 1234".to_string())
        );
        assert_eq!(
            BlockValue::from_json(
                BlockType::SnowOptions,
                &json!({"propertyType": "House driveway", "includeWalkways": true})
            )
            .expect("snow"),
            BlockValue::Snow(SnowOptions {
                property_type: "House driveway".to_string(),
                include_walkways: true,
            })
        );
        let photos = BlockValue::from_json(
            BlockType::PhotoUpload,
            &json!([{"name": "wall.png", "size": 10, "mimeType": "image/png", "content": ""}]),
        )
        .expect("photos");
        assert_eq!(photos.shape(), ValueShape::Attachments);
        assert!(BlockValue::from_json(BlockType::Frequency, &json!(3)).is_err());
    }
}
