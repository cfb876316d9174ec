//! Wizard state and its reducer.
//!
//! [`WizardState`] is the single owned value behind the booking flow. Every
//! mutation goes through [`WizardState::apply`] with a named [`WizardAction`].
use super::guards;
use crate::blocks::{value, BlockValue, ValueShape};
use crate::client::BookingReceipt;
use crate::error::ValidationError;
use crate::service::ServiceConfig;
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Wizard steps in their fixed order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Step {
    Service,
    Details,
    Schedule,
    Address,
    Review,
    Payment,
}

impl Step {
    pub const ALL: [Step; 6] = [
        Step::Service,
        Step::Details,
        Step::Schedule,
        Step::Address,
        Step::Review,
        Step::Payment,
    ];

    /// 1-indexed position shown in the progress tracker.
    pub fn position(&self) -> usize {
        match self {
            Step::Service => 1,
            Step::Details => 2,
            Step::Schedule => 3,
            Step::Address => 4,
            Step::Review => 5,
            Step::Payment => 6,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Step::Service => "Service",
            Step::Details => "Details",
            Step::Schedule => "Schedule",
            Step::Address => "Address",
            Step::Review => "Review",
            Step::Payment => "Payment",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Step::Service => "SERVICE",
            Step::Details => "DETAILS",
            Step::Schedule => "SCHEDULE",
            Step::Address => "ADDRESS",
            Step::Review => "REVIEW",
            Step::Payment => "PAYMENT",
        }
    }

    pub fn next(&self) -> Option<Step> {
        Step::ALL.get(self.position()).copied()
    }

    pub fn previous(&self) -> Option<Step> {
        self.position()
            .checked_sub(2)
            .and_then(|index| Step::ALL.get(index).copied())
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%H:%M";

    pub fn serialize<S: Serializer>(time: &Option<NaiveTime>, serializer: S) -> Result<S::Ok, S::Error> {
        match time {
            Some(time) => serializer.serialize_str(&time.format(FORMAT).to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<NaiveTime>, D::Error> {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw.as_deref().map(str::trim).filter(|value| !value.is_empty()) {
            None => Ok(None),
            Some(value) => NaiveTime::parse_from_str(value, FORMAT)
                .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
                .map(Some)
                .map_err(serde::de::Error::custom),
        }
    }
}

/// Requested service window.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schedule {
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default, with = "hhmm")]
    pub time_from: Option<NaiveTime>,
    #[serde(default, with = "hhmm")]
    pub time_to: Option<NaiveTime>,
}

impl Schedule {
    pub fn is_complete(&self) -> bool {
        self.date.is_some() && self.time_from.is_some() && self.time_to.is_some()
    }

    /// A window is ordered when it ends after it starts (or is not fully set yet).
    pub fn is_ordered(&self) -> bool {
        match (self.time_from, self.time_to) {
            (Some(from), Some(to)) => to > from,
            _ => true,
        }
    }
}

/// Service address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressRecord {
    #[serde(default)]
    pub line1: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line2: Option<String>,
    #[serde(default)]
    pub city: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default)]
    pub postal_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

impl AddressRecord {
    pub fn is_complete(&self) -> bool {
        [&self.line1, &self.city, &self.postal_code]
            .iter()
            .all(|field| !field.trim().is_empty())
    }
}

/// Cross-step accumulator: block values keyed by block index, schedule, address.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingDetails {
    pub service_slug: String,
    pub block_values: BTreeMap<usize, BlockValue>,
    pub schedule: Schedule,
    pub address: AddressRecord,
}

impl BookingDetails {
    pub fn for_service(service_slug: &str, address: AddressRecord) -> Self {
        BookingDetails {
            service_slug: service_slug.to_string(),
            block_values: BTreeMap::new(),
            schedule: Schedule::default(),
            address,
        }
    }

    pub fn value(&self, index: usize) -> Option<&BlockValue> {
        self.block_values.get(&index)
    }
}

/// Named state transitions.
#[derive(Debug, Clone, PartialEq)]
pub enum WizardAction {
    SelectService(ServiceConfig),
    SetBlockValue { index: usize, value: BlockValue },
    ClearBlockValue { index: usize },
    SetSchedule(Schedule),
    SetAddress(AddressRecord),
    Advance,
    Retreat,
    JumpTo(Step),
    SubmissionSucceeded(BookingReceipt),
    SubmissionFailed(String),
}

impl WizardAction {
    pub fn name(&self) -> &'static str {
        match self {
            WizardAction::SelectService(_) => "select_service",
            WizardAction::SetBlockValue { .. } => "set_block_value",
            WizardAction::ClearBlockValue { .. } => "clear_block_value",
            WizardAction::SetSchedule(_) => "set_schedule",
            WizardAction::SetAddress(_) => "set_address",
            WizardAction::Advance => "advance",
            WizardAction::Retreat => "retreat",
            WizardAction::JumpTo(_) => "jump_to",
            WizardAction::SubmissionSucceeded(_) => "submission_succeeded",
            WizardAction::SubmissionFailed(_) => "submission_failed",
        }
    }
}

/// What an action did to the state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// Data changed; the step pointer did not move.
    Updated,
    Moved { from: Step, to: Step },
    /// A forward guard failed; nothing changed.
    Blocked { at: Step, reason: ValidationError },
    /// The value was not acceptable; nothing changed.
    Rejected(ValidationError),
    /// The action does not apply in the current state; nothing changed.
    Ignored,
}

impl Transition {
    pub fn moved(&self) -> bool {
        matches!(self, Transition::Moved { .. })
    }
}

/// Complete wizard state.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WizardState {
    pub current_step: Step,
    pub selected_service: Option<ServiceConfig>,
    pub details: BookingDetails,
    /// Server message from the last failed submission.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
    /// Set once the booking is confirmed; the wizard accepts no further actions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receipt: Option<BookingReceipt>,
    /// Saved address re-applied whenever the accumulator resets.
    #[serde(skip)]
    pub prefill_address: Option<AddressRecord>,
}

impl Default for WizardState {
    fn default() -> Self {
        WizardState::new(None)
    }
}

impl WizardState {
    pub fn new(prefill_address: Option<AddressRecord>) -> Self {
        WizardState {
            current_step: Step::Service,
            selected_service: None,
            details: BookingDetails {
                address: prefill_address.clone().unwrap_or_default(),
                ..Default::default()
            },
            last_error: None,
            receipt: None,
            prefill_address,
        }
    }

    pub fn is_confirmed(&self) -> bool {
        self.receipt.is_some()
    }

    /// Whether the forward guard of the current step passes.
    pub fn can_advance(&self) -> bool {
        self.current_step.next().is_some() && guards::check(self.current_step, self).is_ok()
    }

    /// Apply one action.
    pub fn apply(&mut self, action: WizardAction) -> Transition {
        if self.is_confirmed() {
            tracing::debug!(action = action.name(), "booking confirmed; ignoring action");
            return Transition::Ignored;
        }
        let transition = match action {
            WizardAction::SelectService(config) => self.select_service(config),
            WizardAction::SetBlockValue { index, value } => self.set_block_value(index, value),
            WizardAction::ClearBlockValue { index } => match self.details.block_values.remove(&index) {
                Some(_) => Transition::Updated,
                None => Transition::Ignored,
            },
            WizardAction::SetSchedule(schedule) => {
                if !schedule.is_ordered() {
                    Transition::Rejected(ValidationError::InvalidTimeWindow)
                } else {
                    self.details.schedule = schedule;
                    Transition::Updated
                }
            }
            WizardAction::SetAddress(address) => {
                self.details.address = address;
                Transition::Updated
            }
            WizardAction::Advance => self.advance(),
            WizardAction::Retreat => match self.current_step.previous() {
                Some(previous) => self.move_to(previous),
                None => Transition::Ignored,
            },
            WizardAction::JumpTo(target) => self.jump_to(target),
            WizardAction::SubmissionSucceeded(receipt) if self.current_step == Step::Payment => {
                self.last_error = None;
                self.receipt = Some(receipt);
                Transition::Updated
            }
            WizardAction::SubmissionFailed(message) if self.current_step == Step::Payment => {
                self.last_error = Some(message);
                Transition::Updated
            }
            WizardAction::SubmissionSucceeded(_) | WizardAction::SubmissionFailed(_) => {
                Transition::Ignored
            }
        };
        if let Transition::Blocked { at, reason } = &transition {
            tracing::debug!(step = %at, reason = %reason, "transition blocked");
        }
        transition
    }

    fn select_service(&mut self, config: ServiceConfig) -> Transition {
        if self.current_step != Step::Service {
            tracing::debug!(step = %self.current_step, "services can only be chosen on the service step");
            return Transition::Ignored;
        }
        self.details = BookingDetails::for_service(
            &config.slug,
            self.prefill_address.clone().unwrap_or_default(),
        );
        self.selected_service = Some(config);
        self.last_error = None;
        Transition::Updated
    }

    fn set_block_value(&mut self, index: usize, value: BlockValue) -> Transition {
        let Some(service) = self.selected_service.as_ref() else {
            return Transition::Rejected(ValidationError::NoServiceSelected);
        };
        let Some((block, block_type)) = service
            .block(index)
            .and_then(|block| block.block_type().map(|block_type| (block, block_type)))
        else {
            return Transition::Rejected(ValidationError::UnknownBlock { index });
        };
        if let Err(err) = value::check_compatible(block, &value) {
            return Transition::Rejected(err);
        }
        // Partial composites stay stored so later inputs merge into them.
        if value.shape() != ValueShape::Composite && value::is_empty(block_type, Some(&value)) {
            self.details.block_values.remove(&index);
        } else {
            self.details.block_values.insert(index, value);
        }
        Transition::Updated
    }

    fn advance(&mut self) -> Transition {
        let Some(next) = self.current_step.next() else {
            return Transition::Ignored;
        };
        match guards::check(self.current_step, self) {
            Ok(()) => self.move_to(next),
            Err(reason) => Transition::Blocked {
                at: self.current_step,
                reason,
            },
        }
    }

    fn jump_to(&mut self, target: Step) -> Transition {
        if target == self.current_step {
            return Transition::Ignored;
        }
        if target < self.current_step {
            return self.move_to(target);
        }
        for step in Step::ALL
            .into_iter()
            .filter(|step| *step >= self.current_step && *step < target)
        {
            if let Err(reason) = guards::check(step, self) {
                return Transition::Blocked { at: step, reason };
            }
        }
        self.move_to(target)
    }

    fn move_to(&mut self, to: Step) -> Transition {
        let from = self.current_step;
        self.current_step = to;
        Transition::Moved { from, to }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steps_are_linear_and_one_indexed() {
        assert_eq!(Step::Service.position(), 1);
        assert_eq!(Step::Payment.position(), 6);
        assert_eq!(Step::Service.previous(), None);
        assert_eq!(Step::Service.next(), Some(Step::Details));
        assert_eq!(Step::Review.next(), Some(Step::Payment));
        assert_eq!(Step::Payment.next(), None);
        assert_eq!(Step::Details.previous(), Some(Step::Service));
    }

    #[test]
    fn schedule_times_use_hour_minute_format() {
        let schedule: Schedule = serde_json::from_value(serde_json::json!({
            "date": "2026-11-02",
            "timeFrom": "09:00",
            "timeTo": "11:30:00"
        }))
        .expect("parse schedule");
        assert!(schedule.is_complete());
        let value = serde_json::to_value(&schedule).expect("serialize schedule");
        assert_eq!(value["timeFrom"], "09:00");
        assert_eq!(value["timeTo"], "11:30");
        assert_eq!(value["date"], "2026-11-02");
    }

    #[test]
    fn reversed_window_is_rejected() {
        let mut state = WizardState::default();
        let schedule = Schedule {
            date: NaiveDate::from_ymd_opt(2026, 11, 2),
            time_from: NaiveTime::from_hms_opt(12, 0, 0),
            time_to: NaiveTime::from_hms_opt(9, 0, 0),
        };
        assert_eq!(
            state.apply(WizardAction::SetSchedule(schedule)),
            Transition::Rejected(ValidationError::InvalidTimeWindow)
        );
        assert_eq!(state.details.schedule, Schedule::default());
    }

    #[test]
    fn address_requires_line1_city_postal_code() {
        let mut address = AddressRecord {
            line1: "12 Elm St".to_string(),
            city: "Ottawa".to_string(),
            postal_code: " ".to_string(),
            ..Default::default()
        };
        assert!(!address.is_complete());
        address.postal_code = "K1A 0B1".to_string();
        assert!(address.is_complete());
    }

    #[test]
    fn prefilled_address_seeds_details() {
        let saved = AddressRecord {
            line1: "1 Main".to_string(),
            city: "Halifax".to_string(),
            postal_code: "B3H".to_string(),
            ..Default::default()
        };
        let state = WizardState::new(Some(saved.clone()));
        assert_eq!(state.details.address, saved);
    }
}
