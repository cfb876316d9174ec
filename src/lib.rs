//! Booking blocks: per-service booking forms normalized from loosely shaped
//! service records, rendered through typed block controls, and collected by a
//! linear booking wizard.
pub mod blocks;
pub mod client;
pub mod config;
pub mod error;
pub mod normalize;
pub mod render;
pub mod service;
pub mod session;
pub mod submission;
pub mod wizard;

pub use blocks::{Block, BlockKind, BlockType, BlockValue};
pub use error::{CatalogError, NormalizationError, SubmissionError, ValidationError};
pub use normalize::{normalize, try_normalize};
pub use service::ServiceConfig;
pub use submission::{assemble, SubmissionPayload};
pub use wizard::{BookingWizard, Step};
