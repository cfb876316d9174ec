//! Block type system for the service details step.
//!
//! A service declares an ordered list of [`Block`]s. Each block is tagged with a
//! [`BlockKind`]; recognized kinds carry a [`BlockType`] from the closed set below,
//! while tags this build does not know are preserved verbatim so admin-authored
//! block order survives normalization.
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

pub mod registry;
pub mod value;

pub use registry::BlockSpec;
pub use value::{Attachment, BlockValue, SnowOptions, SnowPatch, ValueShape};

/// Closed set of block kinds understood by the registry, value store, and renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BlockType {
    SubService,
    Frequency,
    HomeSize,
    JobDescription,
    PhotoUpload,
    SimpleNote,
    VehicleType,
    SnowOptions,
    LaundryUnits,
    HandymanJobType,
}

impl BlockType {
    pub const ALL: [BlockType; 10] = [
        BlockType::SubService,
        BlockType::Frequency,
        BlockType::HomeSize,
        BlockType::JobDescription,
        BlockType::PhotoUpload,
        BlockType::SimpleNote,
        BlockType::VehicleType,
        BlockType::SnowOptions,
        BlockType::LaundryUnits,
        BlockType::HandymanJobType,
    ];

    /// Return the stable tag used in service records and payloads.
    pub fn as_str(&self) -> &'static str {
        match self {
            BlockType::SubService => "SUB_SERVICE",
            BlockType::Frequency => "FREQUENCY",
            BlockType::HomeSize => "HOME_SIZE",
            BlockType::JobDescription => "JOB_DESCRIPTION",
            BlockType::PhotoUpload => "PHOTO_UPLOAD",
            BlockType::SimpleNote => "SIMPLE_NOTE",
            BlockType::VehicleType => "VEHICLE_TYPE",
            BlockType::SnowOptions => "SNOW_OPTIONS",
            BlockType::LaundryUnits => "LAUNDRY_UNITS",
            BlockType::HandymanJobType => "HANDYMAN_JOB_TYPE",
        }
    }

    /// Resolve a tag in any of the spellings backends emit.
    ///
    /// `SUB_SERVICE`, `sub_service`, `subService`, `sub-service` and `sub service`
    /// all resolve to [`BlockType::SubService`].
    pub fn from_tag(raw: &str) -> Option<BlockType> {
        let canonical = canonical_tag(raw);
        BlockType::ALL
            .into_iter()
            .find(|block_type| block_type.as_str() == canonical)
    }

    /// The value variant this block type stores.
    pub fn value_shape(&self) -> ValueShape {
        match self {
            BlockType::SubService
            | BlockType::Frequency
            | BlockType::HomeSize
            | BlockType::LaundryUnits
            | BlockType::HandymanJobType
            | BlockType::VehicleType => ValueShape::Choice,
            BlockType::JobDescription | BlockType::SimpleNote => ValueShape::Text,
            BlockType::SnowOptions => ValueShape::Composite,
            BlockType::PhotoUpload => ValueShape::Attachments,
        }
    }
}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn camel_boundary() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"([a-z0-9])([A-Z])").expect("valid camel boundary regex"))
}

fn separator_run() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[\s\-_]+").expect("valid separator regex"))
}

/// Canonicalize a raw block tag to SCREAMING_SNAKE_CASE.
pub fn canonical_tag(raw: &str) -> String {
    let split = camel_boundary().replace_all(raw.trim(), "${1}_${2}");
    separator_run()
        .replace_all(&split, "_")
        .trim_matches('_')
        .to_ascii_uppercase()
}

/// Tag carried by a configured block.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BlockKind {
    Typed(BlockType),
    /// A tag this build does not recognize; never rendered, never required.
    Unrecognized(String),
}

impl BlockKind {
    pub fn block_type(&self) -> Option<BlockType> {
        match self {
            BlockKind::Typed(block_type) => Some(*block_type),
            BlockKind::Unrecognized(_) => None,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            BlockKind::Typed(block_type) => block_type.as_str(),
            BlockKind::Unrecognized(tag) => tag.as_str(),
        }
    }
}

impl From<BlockType> for BlockKind {
    fn from(block_type: BlockType) -> Self {
        BlockKind::Typed(block_type)
    }
}

impl From<String> for BlockKind {
    fn from(raw: String) -> Self {
        match BlockType::from_tag(&raw) {
            Some(block_type) => BlockKind::Typed(block_type),
            None => BlockKind::Unrecognized(raw),
        }
    }
}

impl From<BlockKind> for String {
    fn from(kind: BlockKind) -> Self {
        kind.as_str().to_string()
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One configured input field within a service's details step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    #[serde(rename = "type")]
    pub kind: BlockKind,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    /// Explicit options; empty means "use the registry list".
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
}

impl Block {
    /// Build a block with the registry defaults for its type.
    pub fn from_registry(block_type: BlockType) -> Self {
        let spec = registry::spec(block_type);
        Block {
            kind: BlockKind::Typed(block_type),
            required: spec.required,
            label: Some(spec.label.to_string()),
            placeholder: spec.placeholder.map(str::to_string),
            options: Vec::new(),
        }
    }

    pub fn block_type(&self) -> Option<BlockType> {
        self.kind.block_type()
    }

    /// Options a choice value must come from: the block's own list, else the registry's.
    pub fn effective_options(&self) -> Vec<&str> {
        if !self.options.is_empty() {
            return self.options.iter().map(String::as_str).collect();
        }
        match self.block_type() {
            Some(block_type) => registry::spec(block_type).options.to_vec(),
            None => Vec::new(),
        }
    }

    /// Label shown to the customer, falling back to the registry label.
    pub fn display_label(&self) -> String {
        if let Some(label) = self.label.as_deref().map(str::trim).filter(|l| !l.is_empty()) {
            return label.to_string();
        }
        match self.block_type() {
            Some(block_type) => registry::spec(block_type).label.to_string(),
            None => self.kind.as_str().to_string(),
        }
    }

    /// Whether guards must see a value for this block.
    ///
    /// Unrecognized blocks cannot be rendered, so they never hold up a step.
    pub fn is_required(&self) -> bool {
        self.required && self.block_type().is_some()
    }
}
