//! Ingest planning
//!
//! Runs the derivation pipeline for one load: case conversion, main schema
//! derivation, staging validation, optimization columns and temp datasets.

use crate::config::PlannerConfig;
use crate::ingest::{
    IngestError, IngestMode, OptimizationFilter, apply_case_conversion, derive_main_schema,
    derive_optimization_filters, enrich_temp_datasets,
};
use crate::models::{CaseConversion, Datasets};
use crate::validation::StagingValidator;
use serde::{Deserialize, Serialize};
#[cfg(feature = "config")]
use std::path::Path;
use tracing::{debug, info};

/// A validated ingest mode together with the datasets it loads
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[must_use]
pub struct IngestPlan {
    pub ingest_mode: IngestMode,
    pub datasets: Datasets,
}

impl IngestPlan {
    /// Optimization filters attached to the planned mode
    pub fn optimization_filters(&self) -> &[OptimizationFilter] {
        match &self.ingest_mode {
            IngestMode::UnitemporalDelta(delta) => delta.optimization_filters(),
            _ => &[],
        }
    }
}

/// Ingest planner
#[derive(Debug, Clone, Default)]
pub struct IngestPlanner {
    config: PlannerConfig,
}

impl IngestPlanner {
    /// Create a planner with the given configuration
    pub fn new(config: PlannerConfig) -> Self {
        Self { config }
    }

    /// Create a planner from the `.ingest-mode.toml` in a workspace directory
    #[cfg(feature = "config")]
    pub fn from_workspace(workspace_path: &Path) -> Result<Self, IngestError> {
        Ok(Self::new(PlannerConfig::load(workspace_path)?))
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Plan a load of `datasets.staging_dataset` into `datasets.main_dataset`
    ///
    /// # Example
    ///
    /// ```rust
    /// use ingest_mode_sdk::ingest::{TransactionMilestoning, UnitemporalDelta};
    /// use ingest_mode_sdk::models::{DataType, Dataset, Datasets, Field, SchemaDefinition};
    /// use ingest_mode_sdk::planner::IngestPlanner;
    ///
    /// let staging = Dataset::new(
    ///     "staging",
    ///     SchemaDefinition::new(vec![
    ///         Field::new("id", DataType::Int).with_primary_key(true),
    ///         Field::new("digest", DataType::String),
    ///     ])
    ///     .unwrap(),
    /// );
    /// let mode = UnitemporalDelta::builder()
    ///     .digest_field("digest")
    ///     .transaction_milestoning(TransactionMilestoning::batch_id("batch_id_in", "batch_id_out"))
    ///     .build()
    ///     .unwrap()
    ///     .into();
    ///
    /// let plan = IngestPlanner::default()
    ///     .plan(&Datasets::of(Dataset::named("main"), staging), &mode)
    ///     .unwrap();
    /// assert!(plan.datasets.main_dataset.schema.contains("batch_id_out"));
    /// assert_eq!(plan.optimization_filters().len(), 1);
    /// ```
    pub fn plan(&self, datasets: &Datasets, mode: &IngestMode) -> Result<IngestPlan, IngestError> {
        let settings = &self.config.planner;

        let (mut mode, mut datasets) = match settings.case_conversion {
            CaseConversion::None => (mode.clone(), datasets.clone()),
            case => {
                debug!("Applying {} case conversion", case);
                let convert = |name: &str| case.apply(name);
                (
                    apply_case_conversion(mode, convert),
                    datasets.apply_case(convert),
                )
            }
        };

        StagingValidator::new()
            .validate(&datasets.main_dataset, &datasets.staging_dataset, &mode)
            .into_result()
            .map_err(IngestError::SchemaMismatch)?;

        if settings.derive_main_schema && datasets.main_dataset.schema.is_empty() {
            let main = derive_main_schema(&datasets.main_dataset, &datasets.staging_dataset, &mode)?;
            datasets = datasets.with_main_dataset(main);
        }

        if settings.optimization_columns {
            let filters =
                derive_optimization_filters(&mode, &datasets.main_dataset, &datasets.staging_dataset);
            if let IngestMode::UnitemporalDelta(delta) = &mut mode {
                debug!("Attaching {} optimization filter(s)", filters.len());
                delta.optimization_filters = filters;
            }
        }

        if settings.temp_datasets {
            datasets = enrich_temp_datasets(&datasets, &mode);
        }

        info!(
            "Planned {} load of '{}' into '{}' ({} main field(s))",
            mode.name(),
            datasets.staging_dataset.name(),
            datasets.main_dataset.name(),
            datasets.main_dataset.schema.fields().len()
        );

        Ok(IngestPlan {
            ingest_mode: mode,
            datasets,
        })
    }
}
