//! Error taxonomy for the booking engine.
//!
//! Normalization errors are absorbed by [`crate::normalize::normalize`]; guard
//! failures surface as booleans. Only these typed errors cross module seams.
use crate::blocks::ValueShape;
use crate::wizard::Step;

/// A raw service record could not be converted into a canonical config.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NormalizationError {
    #[error("raw service record is not a JSON object")]
    NotAnObject,

    #[error("raw service record has no slug, id, or title")]
    MissingIdentity,

    #[error("booking block {index} is neither an object nor a type string")]
    MalformedBlock { index: usize },
}

/// A required value is missing or a supplied value does not fit its block.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("required blocks missing a value: {}", labels.join(", "))]
    MissingRequired { labels: Vec<String> },

    #[error("block {block} expects a {expected} value")]
    IncompatibleValue { block: String, expected: ValueShape },

    #[error("{value:?} is not an option of block {block}")]
    OptionNotOffered { block: String, value: String },

    #[error("no block at index {index} can take a value")]
    UnknownBlock { index: usize },

    #[error("no service selected")]
    NoServiceSelected,

    #[error("time window must end after it starts")]
    InvalidTimeWindow,

    #[error("schedule needs a date, start time, and end time")]
    IncompleteSchedule,

    #[error("address needs line 1, city, and postal code")]
    IncompleteAddress,

    #[error("details belong to service {found:?}, not {expected:?}")]
    ServiceMismatch { expected: String, found: String },
}

/// The booking could not be submitted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmissionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("submission is only possible from the payment step (currently at {0})")]
    NotAtPayment(Step),

    #[error("booking already confirmed as {0}")]
    AlreadyConfirmed(String),

    #[error("{message}")]
    Rejected { status: u16, message: String },

    #[error("booking request failed: {0}")]
    Transport(String),
}

/// The service catalog could not provide a raw record.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("service {0} not found")]
    NotFound(String),

    #[error("catalog returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("catalog request failed: {0}")]
    Transport(String),

    #[error("catalog response is not JSON: {0}")]
    Decode(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_required_lists_labels() {
        let err = ValidationError::MissingRequired {
            labels: vec!["Home size".to_string(), "How often?".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "required blocks missing a value: Home size, How often?"
        );
    }

    #[test]
    fn rejected_submission_shows_server_message_only() {
        let err = SubmissionError::Rejected {
            status: 422,
            message: "Postal code outside service area".to_string(),
        };
        assert_eq!(err.to_string(), "Postal code outside service area");
    }
}
