//! Validation functionality
//!
//! Provides validation logic for:
//! - Input validation of names given to ingest mode builders
//! - Staging validation (fields an ingest mode reads from the staging dataset)

pub mod input;
pub mod staging;

pub use input::{ValidationError, validate_field_name, validate_udf_name};
pub use staging::{StagingValidationResult, StagingValidator};
