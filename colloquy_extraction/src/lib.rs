#![warn(
    clippy::all,
    clippy::nursery,
    clippy::pedantic,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::correctness,
    clippy::suspicious,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(
    clippy::similar_names,
    clippy::missing_safety_doc,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc,
    clippy::cast_precision_loss
)]

//! Structured information extraction.
//!
//! An [`InformationExtractor`] asks a completion service for a fixed set of
//! fields as JSON, then scores and validates the answer. Validation problems
//! are returned as data on the [`ExtractionResult`], never as errors.

mod error;
mod extractor;
mod parse;
mod result;
pub mod schema;

pub use error::{ExtractionError, Result};
pub use extractor::{ExtractionConfig, InformationExtractor};
pub use result::{DEFAULT_CONFIDENCE_FLOOR, ExtractionResult};
pub use schema::{FieldError, FieldKind, FieldSchema, FieldSpec};
