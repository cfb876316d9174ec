//! Submission assembler.
//!
//! Flattens block values into the named fields the booking API expects and
//! re-checks required blocks, schedule, and address before anything leaves the
//! process.
use crate::blocks::{BlockType, BlockValue};
use crate::error::ValidationError;
use crate::service::ServiceConfig;
use crate::wizard::guards::missing_required;
use crate::wizard::{AddressRecord, BookingDetails, Schedule};
use serde::Serialize;
use serde_json::{json, Map, Value};

/// Booking payload handed to the booking API.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionPayload {
    pub service_slug: String,
    pub service_title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_service: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Remaining typed values keyed by field name (`homeSize`, `snowOptions`, ...).
    pub extras: Map<String, Value>,
    pub schedule: Schedule,
    pub address: AddressRecord,
}

/// Payload field an extras-bound block type is stored under.
fn extras_key(block_type: BlockType) -> Option<&'static str> {
    match block_type {
        BlockType::HomeSize => Some("homeSize"),
        BlockType::LaundryUnits => Some("laundryUnits"),
        BlockType::HandymanJobType => Some("handymanJobType"),
        BlockType::VehicleType => Some("vehicleType"),
        BlockType::SnowOptions => Some("snowOptions"),
        BlockType::JobDescription => Some("jobDescription"),
        BlockType::PhotoUpload => Some("photos"),
        BlockType::SubService | BlockType::Frequency | BlockType::SimpleNote => None,
    }
}

fn value_json(value: &BlockValue) -> Value {
    match value {
        BlockValue::Choice(choice) => Value::String(choice.clone()),
        BlockValue::Text(text) => Value::String(text.trim().to_string()),
        BlockValue::Snow(options) => json!({
            "propertyType": options.property_type,
            "includeWalkways": options.include_walkways,
        }),
        BlockValue::Photos(photos) => serde_json::to_value(photos).unwrap_or(Value::Array(Vec::new())),
    }
}

fn text_of(value: &BlockValue) -> Option<String> {
    match value {
        BlockValue::Choice(text) | BlockValue::Text(text) => {
            Some(text.trim().to_string()).filter(|text| !text.is_empty())
        }
        _ => None,
    }
}

/// Build the booking payload, refusing incomplete details.
pub fn assemble(
    details: &BookingDetails,
    service: &ServiceConfig,
) -> Result<SubmissionPayload, ValidationError> {
    if details.service_slug != service.slug {
        return Err(ValidationError::ServiceMismatch {
            expected: service.slug.clone(),
            found: details.service_slug.clone(),
        });
    }
    let missing = missing_required(service, &details.block_values);
    if !missing.is_empty() {
        return Err(ValidationError::MissingRequired {
            labels: missing.iter().map(|(_, block)| block.display_label()).collect(),
        });
    }
    if !details.schedule.is_complete() {
        return Err(ValidationError::IncompleteSchedule);
    }
    if !details.address.is_complete() {
        return Err(ValidationError::IncompleteAddress);
    }

    let mut sub_service = None;
    let mut frequency = None;
    let mut notes = None;
    let mut extras = Map::new();

    for (index, block) in service.indexed_blocks() {
        let (Some(block_type), Some(value)) = (block.block_type(), details.value(index)) else {
            continue;
        };
        if crate::blocks::value::is_empty(block_type, Some(value)) {
            continue;
        }
        match block_type {
            BlockType::SubService if sub_service.is_none() => sub_service = text_of(value),
            BlockType::Frequency if frequency.is_none() => frequency = text_of(value),
            BlockType::SimpleNote if notes.is_none() => notes = text_of(value),
            BlockType::SubService | BlockType::Frequency | BlockType::SimpleNote => {
                tracing::debug!(index, block_type = block_type.as_str(), "repeated block value not submitted");
            }
            _ => {
                if let Some(key) = extras_key(block_type) {
                    let key = if extras.contains_key(key) {
                        format!("{key}_{index}")
                    } else {
                        key.to_string()
                    };
                    extras.insert(key, value_json(value));
                }
            }
        }
    }

    Ok(SubmissionPayload {
        service_slug: service.slug.clone(),
        service_title: service.title.clone(),
        base_price: service.base_price,
        sub_service,
        frequency,
        notes,
        extras,
        schedule: details.schedule.clone(),
        address: details.address.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blocks::{Attachment, Block, SnowOptions};
    use chrono::{NaiveDate, NaiveTime};

    fn service(types: &[BlockType]) -> ServiceConfig {
        ServiceConfig {
            slug: "snow-removal".to_string(),
            title: "Snow removal".to_string(),
            icon: None,
            base_price: Some(60.0),
            booking_blocks: types.iter().copied().map(Block::from_registry).collect(),
        }
    }

    fn complete_details(slug: &str) -> BookingDetails {
        let mut details = BookingDetails::for_service(
            slug,
            AddressRecord {
                line1: "9 Pine Rd".to_string(),
                city: "Calgary".to_string(),
                postal_code: "T2P 1J9".to_string(),
                ..Default::default()
            },
        );
        details.schedule = Schedule {
            date: NaiveDate::from_ymd_opt(2026, 12, 1),
            time_from: NaiveTime::from_hms_opt(6, 0, 0),
            time_to: NaiveTime::from_hms_opt(8, 0, 0),
        };
        details
    }

    #[test]
    fn flattens_named_fields_and_extras() {
        let service = service(&[
            BlockType::Frequency,
            BlockType::SnowOptions,
            BlockType::PhotoUpload,
            BlockType::SimpleNote,
        ]);
        let mut details = complete_details("snow-removal");
        details
            .block_values
            .insert(0, BlockValue::Choice("Weekly".to_string()));
        details.block_values.insert(
            1,
            BlockValue::Snow(SnowOptions {
                property_type: "House driveway".to_string(),
                include_walkways: true,
            }),
        );
        details.block_values.insert(
            2,
            BlockValue::Photos(vec![Attachment {
                name: "drive.jpg".to_string(),
                size: 3,
                mime_type: "image/jpeg".to_string(),
                content: "AAA".to_string(),
            }]),
        );
        details
            .block_values
            .insert(3, BlockValue::Text("  Side gate  ".to_string()));

        let payload = assemble(&details, &service).expect("assemble");
        assert_eq!(payload.frequency.as_deref(), Some("Weekly"));
        assert_eq!(payload.notes.as_deref(), Some("Side gate"));
        assert_eq!(payload.sub_service, None);
        assert_eq!(
            payload.extras["snowOptions"],
            json!({"propertyType": "House driveway", "includeWalkways": true})
        );
        assert_eq!(payload.extras["photos"][0]["mimeType"], "image/jpeg");

        let wire = serde_json::to_value(&payload).expect("serialize payload");
        assert_eq!(wire["serviceSlug"], "snow-removal");
        assert_eq!(wire["schedule"]["timeFrom"], "06:00");
        assert_eq!(wire["address"]["postalCode"], "T2P 1J9");
        assert!(wire.get("subService").is_none());
    }

    #[test]
    fn missing_required_block_fails_assembly() {
        let service = service(&[BlockType::Frequency, BlockType::SnowOptions]);
        let mut details = complete_details("snow-removal");
        details
            .block_values
            .insert(0, BlockValue::Choice("Weekly".to_string()));
        let err = assemble(&details, &service).expect_err("snow options missing");
        assert_eq!(
            err,
            ValidationError::MissingRequired {
                labels: vec!["Property".to_string()]
            }
        );
    }

    #[test]
    fn schedule_and_address_are_rechecked() {
        let service = service(&[BlockType::SimpleNote]);
        let mut details = complete_details("snow-removal");
        details.schedule.time_to = None;
        assert_eq!(
            assemble(&details, &service),
            Err(ValidationError::IncompleteSchedule)
        );
        let mut details = complete_details("snow-removal");
        details.address.city.clear();
        assert_eq!(
            assemble(&details, &service),
            Err(ValidationError::IncompleteAddress)
        );
    }

    #[test]
    fn details_from_another_service_are_refused() {
        let service = service(&[BlockType::SimpleNote]);
        let details = complete_details("cleaning");
        assert!(matches!(
            assemble(&details, &service),
            Err(ValidationError::ServiceMismatch { .. })
        ));
    }

    #[test]
    fn repeated_extras_types_get_index_suffix() {
        let service = service(&[BlockType::JobDescription, BlockType::JobDescription]);
        let mut details = complete_details("snow-removal");
        details
            .block_values
            .insert(0, BlockValue::Text("Fix door".to_string()));
        details
            .block_values
            .insert(1, BlockValue::Text("Patch wall".to_string()));
        let payload = assemble(&details, &service).expect("assemble");
        assert_eq!(payload.extras["jobDescription"], "Fix door");
        assert_eq!(payload.extras["jobDescription_1"], "Patch wall");
    }
}
