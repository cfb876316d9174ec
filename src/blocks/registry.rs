//! Static registry of block defaults and option lists.
//!
//! Pure data: labels, placeholders, required flags, and the fixed choice lists
//! each block type offers when a service does not supply its own.
use super::BlockType;

/// Registry entry for one block type.
#[derive(Debug)]
pub struct BlockSpec {
    pub label: &'static str,
    pub placeholder: Option<&'static str>,
    pub required: bool,
    pub options: &'static [&'static str],
}

pub const FREQUENCY_OPTIONS: &[&str] = &["One-time", "Weekly", "Every 2 weeks", "Monthly"];

pub const HOME_SIZE_OPTIONS: &[&str] = &[
    "Studio",
    "1 bedroom",
    "2 bedrooms",
    "3 bedrooms",
    "4+ bedrooms",
];

pub const VEHICLE_TYPE_OPTIONS: &[&str] = &["Sedan", "SUV", "Truck", "Van", "Motorcycle"];

pub const SNOW_PROPERTY_TYPES: &[&str] = &[
    "House driveway",
    "Townhouse driveway",
    "Shared driveway",
    "Commercial lot",
];

pub const LAUNDRY_UNIT_OPTIONS: &[&str] = &["1 bag", "2 bags", "3 bags", "4+ bags"];

pub const HANDYMAN_JOB_TYPE_OPTIONS: &[&str] = &[
    "Mounting",
    "Furniture assembly",
    "Repairs",
    "Painting",
    "Plumbing fixtures",
    "Other",
];

const SUB_SERVICE: BlockSpec = BlockSpec {
    label: "Choose a service",
    placeholder: None,
    required: true,
    options: &[],
};

const FREQUENCY: BlockSpec = BlockSpec {
    label: "How often?",
    placeholder: None,
    required: true,
    options: FREQUENCY_OPTIONS,
};

const HOME_SIZE: BlockSpec = BlockSpec {
    label: "Home size",
    placeholder: None,
    required: true,
    options: HOME_SIZE_OPTIONS,
};

const JOB_DESCRIPTION: BlockSpec = BlockSpec {
    label: "Describe the job",
    placeholder: Some("What needs doing? Include sizes, materials, and access notes."),
    required: true,
    options: &[],
};

const PHOTO_UPLOAD: BlockSpec = BlockSpec {
    label: "Photos",
    placeholder: Some("Add photos of the area or item"),
    required: false,
    options: &[],
};

const SIMPLE_NOTE: BlockSpec = BlockSpec {
    label: "Notes",
    placeholder: Some("Anything else we should know?"),
    required: false,
    options: &[],
};

const VEHICLE_TYPE: BlockSpec = BlockSpec {
    label: "Vehicle type",
    placeholder: None,
    required: true,
    options: VEHICLE_TYPE_OPTIONS,
};

const SNOW_OPTIONS: BlockSpec = BlockSpec {
    label: "Property",
    placeholder: None,
    required: true,
    options: SNOW_PROPERTY_TYPES,
};

const LAUNDRY_UNITS: BlockSpec = BlockSpec {
    label: "How much laundry?",
    placeholder: None,
    required: true,
    options: LAUNDRY_UNIT_OPTIONS,
};

const HANDYMAN_JOB_TYPE: BlockSpec = BlockSpec {
    label: "Type of job",
    placeholder: None,
    required: true,
    options: HANDYMAN_JOB_TYPE_OPTIONS,
};

/// Look up the registry entry for a block type.
pub fn spec(block_type: BlockType) -> &'static BlockSpec {
    match block_type {
        BlockType::SubService => &SUB_SERVICE,
        BlockType::Frequency => &FREQUENCY,
        BlockType::HomeSize => &HOME_SIZE,
        BlockType::JobDescription => &JOB_DESCRIPTION,
        BlockType::PhotoUpload => &PHOTO_UPLOAD,
        BlockType::SimpleNote => &SIMPLE_NOTE,
        BlockType::VehicleType => &VEHICLE_TYPE,
        BlockType::SnowOptions => &SNOW_OPTIONS,
        BlockType::LaundryUnits => &LAUNDRY_UNITS,
        BlockType::HandymanJobType => &HANDYMAN_JOB_TYPE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blocks::ValueShape;

    #[test]
    fn choice_types_other_than_sub_service_ship_options() {
        for block_type in BlockType::ALL {
            let entry = spec(block_type);
            match block_type.value_shape() {
                ValueShape::Choice if block_type != BlockType::SubService => {
                    assert!(!entry.options.is_empty(), "{block_type} has no options")
                }
                ValueShape::Text | ValueShape::Attachments => {
                    assert!(entry.options.is_empty(), "{block_type} should not list options")
                }
                _ => {}
            }
        }
    }

    #[test]
    fn notes_and_photos_default_optional() {
        assert!(!spec(BlockType::SimpleNote).required);
        assert!(!spec(BlockType::PhotoUpload).required);
        assert!(spec(BlockType::SubService).required);
    }
}
