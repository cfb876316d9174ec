//! Collaborators the booking engine consumes.
//!
//! The engine only sees these traits; [`http`] provides blocking HTTP
//! implementations for the catalog and booking endpoints.
use crate::error::{CatalogError, SubmissionError};
use crate::submission::SubmissionPayload;
use crate::wizard::AddressRecord;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub mod http;

pub use http::{HttpBookingApi, HttpServiceCatalog};

/// Confirmation returned by the booking API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingReceipt {
    pub booking_id: String,
    pub status: String,
}

/// Source of raw service records in whatever shape the backend emits.
pub trait ServiceCatalog {
    fn fetch_service(&self, id_or_slug: &str) -> Result<Value, CatalogError>;
}

/// Accepts assembled bookings.
pub trait BookingApi {
    fn submit(&self, payload: &SubmissionPayload) -> Result<BookingReceipt, SubmissionError>;
}

/// Previously saved address used to pre-fill the address step.
pub trait AddressSource {
    fn saved_address(&self) -> Option<AddressRecord>;
}

/// Address source for customers without a profile.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoSavedAddress;

impl AddressSource for NoSavedAddress {
    fn saved_address(&self) -> Option<AddressRecord> {
        None
    }
}

impl AddressSource for AddressRecord {
    fn saved_address(&self) -> Option<AddressRecord> {
        Some(self.clone())
    }
}
