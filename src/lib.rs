//! Ingest Mode SDK - Shared library for planning warehouse loads
//!
//! Provides unified interfaces for:
//! - Validated ingest modes and their strategy unions
//! - Main schema derivation from a staging dataset
//! - Optimization column derivation for delta loads
//! - Case conversion of every referenced name
//! - Temp dataset enrichment for bitemporal delta loads
//! - Staging validation and a planner running the whole pipeline

pub mod config;
pub mod ingest;
pub mod models;
pub mod planner;
pub mod validation;

// Re-export commonly used types
pub use config::PlannerConfig;
pub use ingest::{
    ConstructionError, IngestError, IngestMode, IngestModeVisitor, OptimizationFilter,
    SchemaMismatchError, apply_case_conversion, derive_main_schema, derive_optimization_filters,
    enrich_temp_datasets,
};
pub use planner::{IngestPlan, IngestPlanner};
pub use validation::{StagingValidationResult, StagingValidator, ValidationError};

// Re-export models
pub use models::enums::*;
pub use models::{Dataset, DatasetReference, Datasets, Field, SchemaDefinition};
