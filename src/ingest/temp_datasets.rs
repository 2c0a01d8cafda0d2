//! Auxiliary datasets for bitemporal delta loads
//!
//! A bitemporal delta whose source specifies only the validity start needs a
//! temp copy of main to recompute validity ranges. With a delete indicator it
//! also needs a second temp table carrying the indicator column.

use super::mode::{
    AppendOnly, BitemporalDelta, BitemporalSnapshot, BulkLoad, IngestMode, NoOp,
    NontemporalDelta, NontemporalSnapshot, UnitemporalDelta, UnitemporalSnapshot,
};
use super::merge::MergeStrategy;
use super::visitor::IngestModeVisitor;
use crate::models::{DataType, Dataset, DatasetReference, Datasets, Field};
use tracing::debug;

/// Alias of the temp dataset
pub const TEMP_DATASET_ALIAS: &str = "legend_persistence_temp";
/// Alias of the temp dataset carrying the delete indicator
pub const TEMP_DATASET_WITH_DELETE_INDICATOR_ALIAS: &str = "legend_persistence_tempWithDeleteIndicator";

/// Temp Dataset Enricher: only `BitemporalDelta` sourcing validity start alone adds datasets
pub struct TempDatasetEnricher<'a> {
    datasets: &'a Datasets,
}

impl<'a> TempDatasetEnricher<'a> {
    pub fn new(datasets: &'a Datasets) -> Self {
        Self { datasets }
    }

    fn unchanged(&self) -> Datasets {
        self.datasets.clone()
    }

    /// Dataset alongside main sharing its database and group
    fn sibling_of_main(&self, alias: &str) -> DatasetReference {
        let main = &self.datasets.main_dataset.reference;
        DatasetReference {
            database: main.database.clone(),
            group: main.group.clone(),
            name: format!("{}_{}", main.name, alias),
            alias: Some(alias.to_string()),
        }
    }

    fn temp_dataset(&self) -> Dataset {
        Dataset {
            reference: self.sibling_of_main(TEMP_DATASET_ALIAS),
            schema: self.datasets.main_dataset.schema.clone(),
        }
    }

    fn temp_dataset_with_delete_indicator(&self, delete_field: &str) -> Dataset {
        let schema = self
            .datasets
            .main_dataset
            .schema
            .clone()
            .with_field_if_absent(Field::new(delete_field, DataType::Boolean));
        Dataset {
            reference: self.sibling_of_main(TEMP_DATASET_WITH_DELETE_INDICATOR_ALIAS),
            schema,
        }
    }
}

impl IngestModeVisitor<Datasets> for TempDatasetEnricher<'_> {
    fn visit_append_only(&self, _: &AppendOnly) -> Datasets {
        self.unchanged()
    }

    fn visit_nontemporal_snapshot(&self, _: &NontemporalSnapshot) -> Datasets {
        self.unchanged()
    }

    fn visit_nontemporal_delta(&self, _: &NontemporalDelta) -> Datasets {
        self.unchanged()
    }

    fn visit_unitemporal_snapshot(&self, _: &UnitemporalSnapshot) -> Datasets {
        self.unchanged()
    }

    fn visit_unitemporal_delta(&self, _: &UnitemporalDelta) -> Datasets {
        self.unchanged()
    }

    fn visit_bitemporal_snapshot(&self, _: &BitemporalSnapshot) -> Datasets {
        self.unchanged()
    }

    fn visit_bitemporal_delta(&self, mode: &BitemporalDelta) -> Datasets {
        if !mode
            .validity_milestoning
            .validity_derivation()
            .is_source_specifies_from_only()
        {
            return self.unchanged();
        }

        let mut enriched = self.datasets.clone();
        if enriched.temp_dataset.is_none() {
            let temp = self.temp_dataset();
            debug!("Derived temp dataset '{}'", temp.name());
            enriched.temp_dataset = Some(temp);
        }
        if let MergeStrategy::DeleteIndicator { delete_field, .. } = &mode.merge_strategy
            && enriched.temp_dataset_with_delete_indicator.is_none()
        {
            let temp = self.temp_dataset_with_delete_indicator(delete_field);
            debug!("Derived temp dataset '{}'", temp.name());
            enriched.temp_dataset_with_delete_indicator = Some(temp);
        }
        enriched
    }

    fn visit_bulk_load(&self, _: &BulkLoad) -> Datasets {
        self.unchanged()
    }

    fn visit_no_op(&self, _: &NoOp) -> Datasets {
        self.unchanged()
    }
}

/// Add the temp datasets `mode` needs, keeping any the caller already supplied.
pub fn enrich_temp_datasets(datasets: &Datasets, mode: &IngestMode) -> Datasets {
    mode.accept(&TempDatasetEnricher::new(datasets))
}
