//! Read-only review of everything entered so far.
use super::state::{AddressRecord, Step, WizardState};
use crate::blocks::{value, BlockValue};
use serde::Serialize;

const NOT_PROVIDED: &str = "(not provided)";

/// One labelled line in the service section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewLine {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceSection {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_price: Option<f64>,
    pub lines: Vec<ReviewLine>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduleSection {
    pub date: String,
    pub window: String,
}

/// Aggregated review with the steps each section's edit shortcut jumps to.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewSummary {
    pub service: ServiceSection,
    pub schedule: ScheduleSection,
    pub address: String,
    pub edit_targets: Vec<Step>,
}

/// Steps reachable from the review's per-section edit shortcuts.
pub const EDIT_TARGETS: [Step; 3] = [Step::Service, Step::Schedule, Step::Address];

/// Build the review from state; `None` before a service is selected.
pub fn summarize(state: &WizardState) -> Option<ReviewSummary> {
    let service = state.selected_service.as_ref()?;
    let lines = service
        .indexed_blocks()
        .filter_map(|(index, block)| {
            block
                .block_type()
                .map(|block_type| (index, block, block_type))
        })
        .map(|(index, block, block_type)| ReviewLine {
            label: block.display_label(),
            value: state
                .details
                .value(index)
                .filter(|entry| !value::is_empty(block_type, Some(*entry)))
                .map(display_value)
                .unwrap_or_else(|| NOT_PROVIDED.to_string()),
        })
        .collect();

    let schedule = &state.details.schedule;
    let date = schedule
        .date
        .map(|date| date.format("%A, %B %-d, %Y").to_string())
        .unwrap_or_else(|| NOT_PROVIDED.to_string());
    let window = match (schedule.time_from, schedule.time_to) {
        (Some(from), Some(to)) => format!("{}-{}", from.format("%H:%M"), to.format("%H:%M")),
        _ => NOT_PROVIDED.to_string(),
    };

    Some(ReviewSummary {
        service: ServiceSection {
            title: service.title.clone(),
            base_price: service.base_price,
            lines,
        },
        schedule: ScheduleSection { date, window },
        address: display_address(&state.details.address),
        edit_targets: EDIT_TARGETS.to_vec(),
    })
}

/// Human-readable rendering of a block value.
pub fn display_value(value: &BlockValue) -> String {
    match value {
        BlockValue::Choice(choice) => choice.clone(),
        BlockValue::Text(text) => text.trim().to_string(),
        BlockValue::Snow(options) if options.include_walkways => {
            format!("{} + walkways", options.property_type)
        }
        BlockValue::Snow(options) => options.property_type.clone(),
        BlockValue::Photos(photos) if photos.len() == 1 => "1 photo".to_string(),
        BlockValue::Photos(photos) => format!("{} photos", photos.len()),
    }
}

fn display_address(address: &AddressRecord) -> String {
    let parts: Vec<&str> = [
        Some(address.line1.as_str()),
        address.line2.as_deref(),
        Some(address.city.as_str()),
        address.region.as_deref(),
        Some(address.postal_code.as_str()),
        address.country.as_deref(),
    ]
    .into_iter()
    .flatten()
    .map(str::trim)
    .filter(|part| !part.is_empty())
    .collect();
    if parts.is_empty() {
        NOT_PROVIDED.to_string()
    } else {
        parts.join(", ")
    }
}
