//! Applies a naming convention to every column name an ingest mode references

use super::audit::Auditing;
use super::digest::DigestGenStrategy;
use super::merge::MergeStrategy;
use super::milestoning::{TransactionMilestoning, ValidityDerivation, ValidityMilestoning};
use super::mode::{
    AppendOnly, BitemporalDelta, BitemporalSnapshot, BulkLoad, IngestMode, NoOp,
    NontemporalDelta, NontemporalSnapshot, PartitionSpec, PartitionValues, UnitemporalDelta,
    UnitemporalSnapshot,
};
use super::optimization::OptimizationFilter;
use super::versioning::VersioningStrategy;
use super::visitor::IngestModeVisitor;

/// Case Converter: rebuilds a mode with every column name passed through `convert`
///
/// Names that collide after conversion are merged: partition fields keep their
/// first occurrence and partition value filters are unioned.
pub struct CaseConverter<F> {
    convert: F,
}

impl<F: Fn(&str) -> String> CaseConverter<F> {
    pub fn new(convert: F) -> Self {
        Self { convert }
    }

    fn name(&self, name: &str) -> String {
        (self.convert)(name)
    }

    fn auditing(&self, auditing: &Auditing) -> Auditing {
        match auditing {
            Auditing::NoAuditing => Auditing::NoAuditing,
            Auditing::DateTimeAuditing { date_time_field } => Auditing::DateTimeAuditing {
                date_time_field: self.name(date_time_field),
            },
        }
    }

    fn digest_gen_strategy(&self, strategy: &DigestGenStrategy) -> DigestGenStrategy {
        match strategy {
            DigestGenStrategy::NoDigestGen => DigestGenStrategy::NoDigestGen,
            DigestGenStrategy::UserProvided { digest_field } => DigestGenStrategy::UserProvided {
                digest_field: self.name(digest_field),
            },
            DigestGenStrategy::UdfBased {
                digest_udf_name,
                digest_field,
                fields_to_exclude_from_digest,
                type_conversion_udf_names,
                column_name_value_concat_udf_name,
            } => DigestGenStrategy::UdfBased {
                digest_udf_name: digest_udf_name.clone(),
                digest_field: self.name(digest_field),
                fields_to_exclude_from_digest: fields_to_exclude_from_digest
                    .iter()
                    .map(|f| self.name(f))
                    .collect(),
                type_conversion_udf_names: type_conversion_udf_names.clone(),
                column_name_value_concat_udf_name: column_name_value_concat_udf_name.clone(),
            },
        }
    }

    fn merge_strategy(&self, strategy: &MergeStrategy) -> MergeStrategy {
        match strategy {
            MergeStrategy::NoDeletes => MergeStrategy::NoDeletes,
            MergeStrategy::DeleteIndicator {
                delete_field,
                delete_values,
            } => MergeStrategy::DeleteIndicator {
                delete_field: self.name(delete_field),
                delete_values: delete_values.clone(),
            },
        }
    }

    fn versioning_strategy(&self, strategy: &VersioningStrategy) -> VersioningStrategy {
        match strategy {
            VersioningStrategy::NoVersioning => VersioningStrategy::NoVersioning,
            VersioningStrategy::MaxVersion {
                versioning_field,
                merge_data_version_resolver,
                perform_stage_versioning,
            } => VersioningStrategy::MaxVersion {
                versioning_field: self.name(versioning_field),
                merge_data_version_resolver: *merge_data_version_resolver,
                perform_stage_versioning: *perform_stage_versioning,
            },
            VersioningStrategy::AllVersions {
                versioning_field,
                merge_data_version_resolver,
                versioning_order,
                data_split_field,
                perform_stage_versioning,
            } => VersioningStrategy::AllVersions {
                versioning_field: self.name(versioning_field),
                merge_data_version_resolver: *merge_data_version_resolver,
                versioning_order: *versioning_order,
                data_split_field: self.name(data_split_field),
                perform_stage_versioning: *perform_stage_versioning,
            },
        }
    }

    fn transaction_milestoning(&self, milestoning: &TransactionMilestoning) -> TransactionMilestoning {
        match milestoning {
            TransactionMilestoning::BatchId {
                batch_id_in_name,
                batch_id_out_name,
            } => TransactionMilestoning::BatchId {
                batch_id_in_name: self.name(batch_id_in_name),
                batch_id_out_name: self.name(batch_id_out_name),
            },
            TransactionMilestoning::DateTime {
                date_time_in_name,
                date_time_out_name,
            } => TransactionMilestoning::DateTime {
                date_time_in_name: self.name(date_time_in_name),
                date_time_out_name: self.name(date_time_out_name),
            },
            TransactionMilestoning::BatchIdAndDateTime {
                batch_id_in_name,
                batch_id_out_name,
                date_time_in_name,
                date_time_out_name,
            } => TransactionMilestoning::BatchIdAndDateTime {
                batch_id_in_name: self.name(batch_id_in_name),
                batch_id_out_name: self.name(batch_id_out_name),
                date_time_in_name: self.name(date_time_in_name),
                date_time_out_name: self.name(date_time_out_name),
            },
        }
    }

    fn validity_milestoning(&self, milestoning: &ValidityMilestoning) -> ValidityMilestoning {
        let derivation = match milestoning.validity_derivation() {
            ValidityDerivation::SourceSpecifiesFromDateTime {
                source_date_time_from_field,
                preserve_source_fields,
            } => ValidityDerivation::SourceSpecifiesFromDateTime {
                source_date_time_from_field: self.name(source_date_time_from_field),
                preserve_source_fields: *preserve_source_fields,
            },
            ValidityDerivation::SourceSpecifiesFromAndThruDateTime {
                source_date_time_from_field,
                source_date_time_thru_field,
                preserve_source_fields,
            } => ValidityDerivation::SourceSpecifiesFromAndThruDateTime {
                source_date_time_from_field: self.name(source_date_time_from_field),
                source_date_time_thru_field: self.name(source_date_time_thru_field),
                preserve_source_fields: *preserve_source_fields,
            },
        };
        ValidityMilestoning::date_time(
            self.name(milestoning.date_time_from_name()),
            self.name(milestoning.date_time_thru_name()),
            derivation,
        )
    }

    fn optimization_filters(&self, filters: &[OptimizationFilter]) -> Vec<OptimizationFilter> {
        filters
            .iter()
            .map(|filter| OptimizationFilter {
                field_name: self.name(&filter.field_name),
                ..filter.clone()
            })
            .collect()
    }

    fn partition_fields(&self, fields: &[String]) -> Vec<String> {
        let mut converted: Vec<String> = Vec::with_capacity(fields.len());
        for field in fields {
            let name = self.name(field);
            if !converted.contains(&name) {
                converted.push(name);
            }
        }
        converted
    }

    fn partition_values(&self, values: &PartitionValues) -> PartitionValues {
        let mut converted = PartitionValues::new();
        for (field, field_values) in values {
            converted
                .entry(self.name(field))
                .or_default()
                .extend(field_values.iter().cloned());
        }
        converted
    }

    fn partition_spec_list(&self, specs: &[PartitionSpec]) -> Vec<PartitionSpec> {
        specs
            .iter()
            .map(|spec| {
                spec.iter()
                    .map(|(field, value)| (self.name(field), value.clone()))
                    .collect()
            })
            .collect()
    }
}

impl<F: Fn(&str) -> String> IngestModeVisitor<IngestMode> for CaseConverter<F> {
    fn visit_append_only(&self, mode: &AppendOnly) -> IngestMode {
        IngestMode::AppendOnly(AppendOnly {
            digest_gen_strategy: self.digest_gen_strategy(&mode.digest_gen_strategy),
            auditing: self.auditing(&mode.auditing),
            filter_existing_records: mode.filter_existing_records,
            batch_id_field: self.name(&mode.batch_id_field),
            deduplication_strategy: mode.deduplication_strategy,
            versioning_strategy: self.versioning_strategy(&mode.versioning_strategy),
        })
    }

    fn visit_nontemporal_snapshot(&self, mode: &NontemporalSnapshot) -> IngestMode {
        IngestMode::NontemporalSnapshot(NontemporalSnapshot {
            auditing: self.auditing(&mode.auditing),
            batch_id_field: self.name(&mode.batch_id_field),
            deduplication_strategy: mode.deduplication_strategy,
            versioning_strategy: self.versioning_strategy(&mode.versioning_strategy),
        })
    }

    fn visit_nontemporal_delta(&self, mode: &NontemporalDelta) -> IngestMode {
        IngestMode::NontemporalDelta(NontemporalDelta {
            digest_field: self.name(&mode.digest_field),
            auditing: self.auditing(&mode.auditing),
            merge_strategy: self.merge_strategy(&mode.merge_strategy),
            batch_id_field: self.name(&mode.batch_id_field),
            deduplication_strategy: mode.deduplication_strategy,
            versioning_strategy: self.versioning_strategy(&mode.versioning_strategy),
        })
    }

    fn visit_unitemporal_snapshot(&self, mode: &UnitemporalSnapshot) -> IngestMode {
        IngestMode::UnitemporalSnapshot(UnitemporalSnapshot {
            digest_field: self.name(&mode.digest_field),
            transaction_milestoning: self.transaction_milestoning(&mode.transaction_milestoning),
            partition_fields: self.partition_fields(&mode.partition_fields),
            partition_values_by_field: self.partition_values(&mode.partition_values_by_field),
            partition_spec_list: self.partition_spec_list(&mode.partition_spec_list),
            derive_partition_spec: mode.derive_partition_spec,
            max_partition_spec_filters: mode.max_partition_spec_filters,
            empty_dataset_handling: mode.empty_dataset_handling,
            deduplication_strategy: mode.deduplication_strategy,
            versioning_strategy: self.versioning_strategy(&mode.versioning_strategy),
        })
    }

    fn visit_unitemporal_delta(&self, mode: &UnitemporalDelta) -> IngestMode {
        IngestMode::UnitemporalDelta(UnitemporalDelta {
            digest_field: mode.digest_field.as_deref().map(|f| self.name(f)),
            transaction_milestoning: self.transaction_milestoning(&mode.transaction_milestoning),
            merge_strategy: self.merge_strategy(&mode.merge_strategy),
            optimization_filters: self.optimization_filters(&mode.optimization_filters),
            deduplication_strategy: mode.deduplication_strategy,
            versioning_strategy: self.versioning_strategy(&mode.versioning_strategy),
        })
    }

    fn visit_bitemporal_snapshot(&self, mode: &BitemporalSnapshot) -> IngestMode {
        IngestMode::BitemporalSnapshot(BitemporalSnapshot {
            digest_field: mode.digest_field.as_deref().map(|f| self.name(f)),
            transaction_milestoning: self.transaction_milestoning(&mode.transaction_milestoning),
            validity_milestoning: self.validity_milestoning(&mode.validity_milestoning),
            partition_fields: self.partition_fields(&mode.partition_fields),
            partition_values_by_field: self.partition_values(&mode.partition_values_by_field),
            deduplication_strategy: mode.deduplication_strategy,
            versioning_strategy: self.versioning_strategy(&mode.versioning_strategy),
        })
    }

    fn visit_bitemporal_delta(&self, mode: &BitemporalDelta) -> IngestMode {
        IngestMode::BitemporalDelta(BitemporalDelta {
            digest_field: mode.digest_field.as_deref().map(|f| self.name(f)),
            transaction_milestoning: self.transaction_milestoning(&mode.transaction_milestoning),
            validity_milestoning: self.validity_milestoning(&mode.validity_milestoning),
            merge_strategy: self.merge_strategy(&mode.merge_strategy),
            filter_existing_records: mode.filter_existing_records,
            deduplication_strategy: mode.deduplication_strategy,
            versioning_strategy: self.versioning_strategy(&mode.versioning_strategy),
        })
    }

    fn visit_bulk_load(&self, mode: &BulkLoad) -> IngestMode {
        IngestMode::BulkLoad(BulkLoad {
            batch_id_field: self.name(&mode.batch_id_field),
            digest_gen_strategy: self.digest_gen_strategy(&mode.digest_gen_strategy),
            auditing: self.auditing(&mode.auditing),
            deduplication_strategy: mode.deduplication_strategy,
            versioning_strategy: self.versioning_strategy(&mode.versioning_strategy),
        })
    }

    fn visit_no_op(&self, mode: &NoOp) -> IngestMode {
        IngestMode::NoOp(mode.clone())
    }
}

/// Apply `convert` to every column name referenced by `mode`.
///
/// Non-name attributes (UDF names, delete values, flags) are left untouched.
///
/// # Example
///
/// ```rust
/// use ingest_mode_sdk::ingest::{apply_case_conversion, Auditing, IngestMode, NontemporalSnapshot};
///
/// let mode: IngestMode = NontemporalSnapshot::builder()
///     .auditing(Auditing::date_time("ingest_ts"))
///     .build()
///     .unwrap()
///     .into();
/// let upper = apply_case_conversion(&mode, |name| name.to_uppercase());
/// match &upper {
///     IngestMode::NontemporalSnapshot(mode) => {
///         assert_eq!(mode.batch_id_field(), "BATCH_ID");
///         assert_eq!(mode.auditing().date_time_field(), Some("INGEST_TS"));
///     }
///     _ => unreachable!(),
/// }
/// ```
pub fn apply_case_conversion<F>(mode: &IngestMode, convert: F) -> IngestMode
where
    F: Fn(&str) -> String,
{
    mode.accept(&CaseConverter::new(convert))
}
