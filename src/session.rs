//! Headless wizard sessions driven by a scripted answers file.
//!
//! A session walks the wizard from SERVICE to PAYMENT exactly as a customer
//! would, stopping at the first step whose forward guard fails.
use crate::blocks::{BlockType, BlockValue};
use crate::client::{BookingApi, BookingReceipt};
use crate::error::{SubmissionError, ValidationError};
use crate::service::ServiceConfig;
use crate::submission::{self, SubmissionPayload};
use crate::wizard::{
    AddressRecord, BookingWizard, ReviewSummary, Schedule, Step, Transition, WizardAction,
};
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Scripted customer answers.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SessionAnswers {
    /// Values keyed by block index (`"0"`) or block type tag (`"HOME_SIZE"`, `"homeSize"`).
    #[serde(default)]
    pub blocks: BTreeMap<String, Value>,
    #[serde(default)]
    pub schedule: Schedule,
    /// Falls back to the saved address when absent.
    #[serde(default)]
    pub address: Option<AddressRecord>,
}

pub fn load_answers(path: &Path) -> Result<SessionAnswers> {
    let bytes = fs::read(path).with_context(|| format!("read answers {}", path.display()))?;
    serde_json::from_slice(&bytes).with_context(|| format!("parse answers JSON {}", path.display()))
}

/// The wizard could not leave `step`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("blocked at {step}: {reason}")]
pub struct StepBlocked {
    pub step: Step,
    pub reason: ValidationError,
}

/// A session parked on PAYMENT with everything ready to submit.
#[derive(Debug)]
pub struct SessionOutcome {
    wizard: BookingWizard,
    pub review: ReviewSummary,
    pub payload: SubmissionPayload,
}

#[derive(Serialize)]
struct SessionReport<'a> {
    review: &'a ReviewSummary,
    payload: &'a SubmissionPayload,
    #[serde(skip_serializing_if = "Option::is_none")]
    receipt: Option<&'a BookingReceipt>,
}

impl SessionOutcome {
    pub fn wizard(&self) -> &BookingWizard {
        &self.wizard
    }

    pub fn submit(&mut self, api: &dyn BookingApi) -> Result<BookingReceipt, SubmissionError> {
        self.wizard.submit(api)
    }

    /// Review, payload, and receipt (once confirmed) as one JSON document.
    pub fn report(&self) -> Result<Value> {
        serde_json::to_value(SessionReport {
            review: &self.review,
            payload: &self.payload,
            receipt: self.wizard.state().receipt.as_ref(),
        })
        .context("serialize session report")
    }
}

/// Resolve an answer key to a block index.
fn resolve_key(service: &ServiceConfig, key: &str) -> Result<usize> {
    if let Ok(index) = key.trim().parse::<usize>() {
        return service
            .block(index)
            .map(|_| index)
            .ok_or_else(|| anyhow!("answer {key:?} names block {index}, which does not exist"));
    }
    let block_type =
        BlockType::from_tag(key).ok_or_else(|| anyhow!("answer {key:?} is not a known block type"))?;
    service
        .position_of(block_type)
        .ok_or_else(|| anyhow!("service {} has no {block_type} block", service.slug))
}

fn advance(wizard: &mut BookingWizard) -> Result<()> {
    match wizard.dispatch(WizardAction::Advance) {
        Transition::Moved { .. } => Ok(()),
        Transition::Blocked { at, reason } => Err(StepBlocked { step: at, reason }.into()),
        other => Err(anyhow!(
            "wizard did not advance from {} ({other:?})",
            wizard.current_step()
        )),
    }
}

/// Drive a wizard for `service` through every step using `answers`.
pub fn run(
    service: ServiceConfig,
    answers: &SessionAnswers,
    saved: Option<AddressRecord>,
) -> Result<SessionOutcome> {
    let mut wizard = match saved {
        Some(address) => BookingWizard::with_address_source(&address),
        None => BookingWizard::new(),
    };
    let slug = service.slug.clone();
    if !wizard.select_service(service.clone()) {
        return Err(anyhow!("could not select service {slug}"));
    }
    advance(&mut wizard)?;

    for (key, raw) in &answers.blocks {
        let index = resolve_key(&service, key)?;
        let block_type = service
            .block(index)
            .and_then(|block| block.block_type())
            .ok_or_else(|| anyhow!("answer {key:?} targets an unrecognized block"))?;
        let value = BlockValue::from_json(block_type, raw)
            .with_context(|| format!("answer {key:?}"))?;
        wizard
            .set_block_value(index, value)
            .with_context(|| format!("answer {key:?}"))?;
    }
    advance(&mut wizard)?;

    wizard
        .set_schedule(answers.schedule.clone())
        .context("schedule answer")?;
    advance(&mut wizard)?;

    if let Some(address) = &answers.address {
        wizard.set_address(address.clone());
    }
    advance(&mut wizard)?;

    let review = wizard
        .review()
        .ok_or_else(|| anyhow!("review unavailable without a service"))?;
    advance(&mut wizard)?;

    let payload = submission::assemble(wizard.details(), &service).context("assemble booking")?;
    tracing::info!(service = %slug, step = %wizard.current_step(), "session ready to submit");
    Ok(SessionOutcome {
        wizard,
        review,
        payload,
    })
}
