use booking_blocks::{normalize, try_normalize, BlockKind, BlockType, NormalizationError};
use serde_json::json;

fn types(raw: serde_json::Value) -> Vec<Option<BlockType>> {
    normalize(&raw).block_types()
}

#[test]
fn cleaning_record_infers_picker_frequency_home_size_and_note() {
    let service = normalize(&json!({"slug": "cleaning", "bullets": ["Home clean", "Deep clean"]}));
    assert_eq!(
        service.block_types(),
        [
            Some(BlockType::SubService),
            Some(BlockType::Frequency),
            Some(BlockType::HomeSize),
            Some(BlockType::SimpleNote),
        ]
    );
    let picker = &service.booking_blocks[0];
    assert!(picker.required);
    assert_eq!(picker.options, ["Home clean", "Deep clean"]);
    assert!(!service.booking_blocks[3].required);
}

#[test]
fn handyman_record_gets_job_blocks_without_frequency() {
    let found = types(json!({"slug": "handyman-repairs", "bullets": ["Mounting"]}));
    assert_eq!(
        found,
        [
            Some(BlockType::SubService),
            Some(BlockType::HandymanJobType),
            Some(BlockType::JobDescription),
            Some(BlockType::SimpleNote),
        ]
    );
}

#[test]
fn record_without_sub_services_still_gets_a_note() {
    assert_eq!(
        types(json!({"slug": "pest-control"})),
        [Some(BlockType::JobDescription), Some(BlockType::SimpleNote)]
    );
}

#[test]
fn admin_blocks_are_kept_in_order_with_unknown_tags() {
    let service = normalize(&json!({
        "slug": "auto-detailing",
        "bullets": "Interior, Exterior",
        "bookingBlocks": "[{\"type\":\"vehicleType\"},{\"type\":\"GIFT_WRAP\"},\"SUB_SERVICE\",{\"type\":\"simple-note\",\"required\":true}]"
    }));
    assert_eq!(
        service.block_types(),
        [
            Some(BlockType::VehicleType),
            None,
            Some(BlockType::SubService),
            Some(BlockType::SimpleNote),
        ]
    );
    assert_eq!(
        service.booking_blocks[1].kind,
        BlockKind::Unrecognized("GIFT_WRAP".to_string())
    );
    assert_eq!(service.booking_blocks[2].options, ["Interior", "Exterior"]);
    assert!(!service.booking_blocks[3].required);
}

#[test]
fn canonical_output_uses_camel_case_and_screaming_tags() {
    let service = normalize(&json!({"slug": "lawn-care", "title": "Lawn Care", "price": "$40"}));
    let value = serde_json::to_value(&service).expect("serialize");
    assert_eq!(value["slug"], "lawn-care");
    assert_eq!(value["basePrice"], 40.0);
    assert_eq!(value["bookingBlocks"][0]["type"], "FREQUENCY");
    assert_eq!(value["bookingBlocks"][1]["type"], "HOME_SIZE");

    assert_eq!(normalize(&json!({"id": 7, "name": "Gutters"})).slug, "7");
}

#[test]
fn strict_normalization_reports_what_fail_soft_absorbs() {
    assert_eq!(
        try_normalize(&json!(["not", "a", "record"])),
        Err(NormalizationError::NotAnObject)
    );
    assert_eq!(
        try_normalize(&json!({"slug": "x", "bookingBlocks": [42]})),
        Err(NormalizationError::MalformedBlock { index: 0 })
    );
    let fallback = normalize(&json!({"slug": "x", "bookingBlocks": [42]}));
    assert_eq!(fallback.slug, "x");
    assert!(fallback.booking_blocks.is_empty());
}
