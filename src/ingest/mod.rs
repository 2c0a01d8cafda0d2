//! Ingest mode engine
//!
//! Provides:
//! - The nine validated ingest modes and their strategy unions
//! - A visitor trait dispatching over the modes
//! - Schema derivation for the main dataset
//! - Optimization column derivation for delta loads
//! - Case conversion of every referenced column name
//! - Temp dataset enrichment for bitemporal delta loads

pub mod audit;
pub mod case_conversion;
pub mod digest;
pub mod error;
pub mod merge;
pub mod milestoning;
pub mod mode;
pub mod optimization;
pub mod schema;
pub mod temp_datasets;
pub mod versioning;
pub mod visitor;

pub use audit::Auditing;
pub use case_conversion::{CaseConverter, apply_case_conversion};
pub use digest::DigestGenStrategy;
pub use error::{ConstructionError, IngestError, SchemaMismatchError};
pub(crate) use error::ensure_valid;
pub use merge::MergeStrategy;
pub use milestoning::{TransactionMilestoning, ValidityDerivation, ValidityMilestoning};
pub use mode::{
    AppendOnly, AppendOnlyBuilder, BitemporalDelta, BitemporalDeltaBuilder, BitemporalSnapshot,
    BitemporalSnapshotBuilder, BulkLoad, BulkLoadBuilder, DEFAULT_BATCH_ID_FIELD, IngestMode,
    NoOp, NoOpBuilder, NontemporalDelta, NontemporalDeltaBuilder, NontemporalSnapshot,
    NontemporalSnapshotBuilder, PartitionSpec, PartitionValues, UnitemporalDelta, UnitemporalDeltaBuilder,
    UnitemporalSnapshot, UnitemporalSnapshotBuilder,
};
pub use optimization::{OptimizationColumnHandler, OptimizationFilter, common_primary_keys};
pub use schema::{BATCH_ID_TYPE, DATE_TIME_TYPE, DIGEST_TYPE, SchemaDeriver, derive_main_schema};
pub use temp_datasets::{
    TEMP_DATASET_ALIAS, TEMP_DATASET_WITH_DELETE_INDICATOR_ALIAS, TempDatasetEnricher,
    enrich_temp_datasets,
};
pub use versioning::{DEFAULT_DATA_SPLIT_FIELD, MergeDataVersionResolver, VersioningStrategy};
pub use visitor::IngestModeVisitor;

use crate::models::Dataset;

/// Derive the optimization filters a load of `staging` into `main` can use.
///
/// Only `UnitemporalDelta` yields filters: its explicit filters when it declares
/// any, otherwise one per primary key common to both datasets whose type
/// supports range filtering.
///
/// # Example
///
/// ```rust
/// use ingest_mode_sdk::ingest::{derive_optimization_filters, OptimizationFilter, TransactionMilestoning, UnitemporalDelta};
/// use ingest_mode_sdk::models::{DataType, Dataset, Field, SchemaDefinition};
///
/// let schema = SchemaDefinition::new(vec![Field::new("id", DataType::Int).with_primary_key(true)]).unwrap();
/// let main = Dataset::new("main", schema.clone());
/// let staging = Dataset::new("staging", schema);
/// let mode = UnitemporalDelta::builder()
///     .digest_field("digest")
///     .transaction_milestoning(TransactionMilestoning::batch_id("batch_id_in", "batch_id_out"))
///     .build()
///     .unwrap()
///     .into();
///
/// let filters = derive_optimization_filters(&mode, &main, &staging);
/// assert_eq!(filters, vec![OptimizationFilter::new("id", "ID_LOWER", "ID_UPPER")]);
/// ```
pub fn derive_optimization_filters(
    mode: &IngestMode,
    main: &Dataset,
    staging: &Dataset,
) -> Vec<OptimizationFilter> {
    mode.accept(&OptimizationColumnHandler::new(main, staging))
}
