//! Step flow controller for the booking wizard.
//!
//! `SERVICE → DETAILS → SCHEDULE → ADDRESS → REVIEW → PAYMENT`, strictly linear.
//! Forward moves are guarded; backward moves always succeed and never clear
//! data. Disallowed moves are no-ops reported as `false`.
use crate::blocks::BlockValue;
use crate::client::{AddressSource, BookingApi, BookingReceipt, ServiceCatalog};
use crate::error::{CatalogError, SubmissionError, ValidationError};
use crate::normalize;
use crate::render::{self, BlockInput, BlockView, ValueChange};
use crate::service::ServiceConfig;
use crate::submission;
use serde_json::Value;

mod fetch;
pub mod guards;
pub mod review;
mod state;

pub use fetch::FetchTicket;
pub use review::{ReviewSummary, EDIT_TARGETS};
pub use state::{
    AddressRecord, BookingDetails, Schedule, Step, Transition, WizardAction, WizardState,
};

/// Owner of the wizard state; the only way to mutate it.
#[derive(Debug, Default)]
pub struct BookingWizard {
    state: WizardState,
    fetches: fetch::FetchGuard,
}

impl BookingWizard {
    pub fn new() -> Self {
        BookingWizard::default()
    }

    /// Start a wizard with the address step pre-filled from `source`.
    pub fn with_address_source(source: &dyn AddressSource) -> Self {
        BookingWizard {
            state: WizardState::new(source.saved_address()),
            fetches: fetch::FetchGuard::default(),
        }
    }

    pub fn state(&self) -> &WizardState {
        &self.state
    }

    pub fn current_step(&self) -> Step {
        self.state.current_step
    }

    /// Tracker position as `(current, total)`, 1-indexed.
    pub fn progress(&self) -> (usize, usize) {
        (self.state.current_step.position(), Step::ALL.len())
    }

    pub fn selected_service(&self) -> Option<&ServiceConfig> {
        self.state.selected_service.as_ref()
    }

    pub fn details(&self) -> &BookingDetails {
        &self.state.details
    }

    /// Apply a raw action to the state.
    pub fn dispatch(&mut self, action: WizardAction) -> Transition {
        if matches!(action, WizardAction::SelectService(_)) {
            self.fetches.invalidate();
        }
        self.state.apply(action)
    }

    /// Choose a service, resetting every previously entered detail.
    pub fn select_service(&mut self, config: ServiceConfig) -> bool {
        self.dispatch(WizardAction::SelectService(config)) == Transition::Updated
    }

    /// Store a value for the block at `index`.
    pub fn set_block_value(&mut self, index: usize, value: BlockValue) -> Result<(), ValidationError> {
        match self.dispatch(WizardAction::SetBlockValue { index, value }) {
            Transition::Rejected(err) => Err(err),
            _ => Ok(()),
        }
    }

    pub fn clear_block_value(&mut self, index: usize) -> bool {
        self.dispatch(WizardAction::ClearBlockValue { index }) == Transition::Updated
    }

    /// Route a customer interaction through the block's renderer.
    ///
    /// Returns whether the stored value for the block changed.
    pub fn interact(&mut self, index: usize, input: BlockInput) -> bool {
        let Some(block) = self.state.selected_service.as_ref().and_then(|s| s.block(index)) else {
            tracing::debug!(index, "no block at index");
            return false;
        };
        let mut emitted = None;
        if let Some(mut control) =
            render::present(block, self.state.details.value(index), |change| emitted = Some(change))
        {
            control.input(input);
        }
        let action = match emitted {
            Some(ValueChange::Set(value)) => WizardAction::SetBlockValue { index, value },
            Some(ValueChange::Clear) => WizardAction::ClearBlockValue { index },
            None => return false,
        };
        let before = self.state.details.value(index).cloned();
        self.dispatch(action);
        self.state.details.value(index) != before.as_ref()
    }

    /// Views of every renderable block, in presentation order.
    pub fn details_view(&self) -> Vec<(usize, BlockView)> {
        let Some(service) = self.state.selected_service.as_ref() else {
            return Vec::new();
        };
        service
            .indexed_blocks()
            .filter_map(|(index, block)| {
                render::present(block, self.state.details.value(index), |_| {})
                    .map(|control| (index, control.view().clone()))
            })
            .collect()
    }

    pub fn set_schedule(&mut self, schedule: Schedule) -> Result<(), ValidationError> {
        match self.dispatch(WizardAction::SetSchedule(schedule)) {
            Transition::Rejected(err) => Err(err),
            _ => Ok(()),
        }
    }

    pub fn set_address(&mut self, address: AddressRecord) {
        self.dispatch(WizardAction::SetAddress(address));
    }

    pub fn can_advance(&self) -> bool {
        self.state.can_advance()
    }

    pub fn advance(&mut self) -> bool {
        self.dispatch(WizardAction::Advance).moved()
    }

    pub fn retreat(&mut self) -> bool {
        self.dispatch(WizardAction::Retreat).moved()
    }

    /// Jump to `step`; forward jumps must pass every guard in between.
    pub fn jump_to(&mut self, step: Step) -> bool {
        self.dispatch(WizardAction::JumpTo(step)).moved()
    }

    pub fn review(&self) -> Option<ReviewSummary> {
        review::summarize(&self.state)
    }

    /// Start fetching a service; only the latest ticket will be honored.
    pub fn begin_service_fetch(&mut self, service_id: &str) -> FetchTicket {
        self.fetches.begin(service_id)
    }

    /// Normalize and select a fetched service unless the response is stale.
    pub fn complete_service_fetch(&mut self, ticket: &FetchTicket, raw: &Value) -> bool {
        if !self.fetches.is_current(ticket) {
            tracing::info!(
                service_id = %ticket.service_id,
                generation = ticket.generation,
                "discarding stale service response"
            );
            return false;
        }
        let config = normalize::normalize(raw);
        self.select_service(config)
    }

    /// Fetch, normalize, and select a service from the catalog.
    pub fn load_service(
        &mut self,
        catalog: &dyn ServiceCatalog,
        service_id: &str,
    ) -> Result<bool, CatalogError> {
        let ticket = self.begin_service_fetch(service_id);
        let raw = catalog.fetch_service(service_id)?;
        Ok(self.complete_service_fetch(&ticket, &raw))
    }

    /// Submit the booking from the payment step.
    ///
    /// On failure the wizard stays on `PAYMENT` with the message recorded in
    /// [`WizardState::last_error`] so the customer can retry.
    pub fn submit(&mut self, api: &dyn BookingApi) -> Result<BookingReceipt, SubmissionError> {
        if let Some(receipt) = &self.state.receipt {
            return Err(SubmissionError::AlreadyConfirmed(receipt.booking_id.clone()));
        }
        if self.state.current_step != Step::Payment {
            return Err(SubmissionError::NotAtPayment(self.state.current_step));
        }
        let result = self
            .state
            .selected_service
            .as_ref()
            .ok_or(ValidationError::NoServiceSelected)
            .and_then(|service| submission::assemble(&self.state.details, service))
            .map_err(SubmissionError::from)
            .and_then(|payload| api.submit(&payload));
        match result {
            Ok(receipt) => {
                tracing::info!(booking_id = %receipt.booking_id, status = %receipt.status, "booking confirmed");
                self.dispatch(WizardAction::SubmissionSucceeded(receipt.clone()));
                Ok(receipt)
            }
            Err(err) => {
                tracing::warn!(error = %err, "booking submission failed");
                self.dispatch(WizardAction::SubmissionFailed(err.to_string()));
                Err(err)
            }
        }
    }
}

#[cfg(test)]
#[path = "wizard_tests.rs"]
mod tests;
