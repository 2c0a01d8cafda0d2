//! The nine ingest modes and their validating builders
//!
//! Every variant is an immutable value whose fields can only be set through
//! its builder (or through deserialization, which runs the same builder).
//! A builder reports every missing attribute and violated rule in a single
//! [`ConstructionError`].

use super::audit::Auditing;
use super::digest::DigestGenStrategy;
use super::error::ConstructionError;
use super::merge::MergeStrategy;
use super::milestoning::{TransactionMilestoning, ValidityMilestoning};
use super::optimization::OptimizationFilter;
use super::versioning::{MergeDataVersionResolver, VersioningStrategy};
use crate::models::{DeduplicationStrategy, EmptyDatasetHandling};
use crate::validation::input::validate_field_name;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Batch id column used when a mode does not name one
pub const DEFAULT_BATCH_ID_FIELD: &str = "batch_id";

/// Partition values keyed by partition field
pub type PartitionValues = BTreeMap<String, BTreeSet<String>>;

/// One partition to replace: a value for some or all partition fields
pub type PartitionSpec = BTreeMap<String, serde_json::Value>;

macro_rules! setters {
    ($($field:ident: $ty:ty),* $(,)?) => {
        $(
            pub fn $field(mut self, $field: impl Into<$ty>) -> Self {
                self.$field = Some($field.into());
                self
            }
        )*
    };
}

#[derive(Default)]
struct Violations {
    missing: Vec<&'static str>,
    messages: Vec<String>,
}

impl Violations {
    fn required<T>(&mut self, attribute: &'static str, value: Option<T>) -> Option<T> {
        if value.is_none() {
            self.missing.push(attribute);
        }
        value
    }

    fn extend(&mut self, messages: Vec<String>) {
        self.messages.extend(messages);
    }

    fn push(&mut self, message: String) {
        self.messages.push(message);
    }

    fn check_name(&mut self, role: &str, name: &str) {
        if let Err(e) = validate_field_name(role, name) {
            self.messages.push(e.to_string());
        }
    }

    fn is_empty(&self) -> bool {
        self.missing.is_empty() && self.messages.is_empty()
    }

    fn into_error(self, ingest_mode: &str) -> ConstructionError {
        let mut violations = Vec::with_capacity(self.messages.len() + 1);
        if !self.missing.is_empty() {
            violations.push(format!(
                "some of required attributes are not set [{}]",
                self.missing.join(", ")
            ));
        }
        violations.extend(self.messages);
        ConstructionError::new(ingest_mode, violations)
    }

    /// Only the default deduplication and versioning are accepted.
    fn only_defaults(
        &mut self,
        ingest_mode: &str,
        deduplication: DeduplicationStrategy,
        versioning: &VersioningStrategy,
    ) {
        if deduplication != DeduplicationStrategy::AllowDuplicates {
            self.push(format!(
                "Only AllowDuplicates deduplication strategy is supported for {}, got {:?}",
                ingest_mode, deduplication
            ));
        }
        if !versioning.is_no_versioning() {
            self.push(format!(
                "Only NoVersioning versioning strategy is supported for {}, got {}",
                ingest_mode,
                versioning.name()
            ));
        }
    }

    fn no_all_versions(&mut self, ingest_mode: &str, versioning: &VersioningStrategy) {
        if matches!(versioning, VersioningStrategy::AllVersions { .. }) {
            self.push(format!(
                "AllVersions versioning strategy is not supported for {}",
                ingest_mode
            ));
        }
    }

    /// Delta loads compare staged and main versions through a resolver.
    fn resolver(&mut self, versioning: &VersioningStrategy, digest_field: Option<&str>) {
        if versioning.is_no_versioning() {
            return;
        }
        match versioning.merge_data_version_resolver() {
            None => self.push(format!(
                "merge data version resolver is mandatory for {} versioning strategy",
                versioning.name()
            )),
            Some(MergeDataVersionResolver::DigestBased) if digest_field.is_none() => {
                self.push("digest based merge data version resolver requires a digest field".to_string())
            }
            Some(_) => {}
        }
    }

    fn partitions(&mut self, partition_fields: &[String], partition_values_by_field: &PartitionValues) {
        for (i, field) in partition_fields.iter().enumerate() {
            self.check_name("partition field", field);
            if partition_fields[..i].contains(field) {
                self.push(format!("partition field [{}] is listed more than once", field));
            }
        }
        if partition_values_by_field.is_empty() {
            return;
        }
        if partition_values_by_field.len() != partition_fields.len() {
            self.push(
                "partition values by field must have the same size as partition fields".to_string(),
            );
        }
        for key in partition_values_by_field.keys() {
            if !partition_fields.contains(key) {
                self.push(format!("partition key [{}] not specified in partition fields", key));
            }
        }
    }

    fn partition_specs(
        &mut self,
        partition_fields: &[String],
        partition_values_by_field: &PartitionValues,
        partition_spec_list: &[PartitionSpec],
        derive_partition_spec: bool,
        max_partition_spec_filters: Option<u64>,
    ) {
        if !partition_spec_list.is_empty() && !partition_values_by_field.is_empty() {
            self.push(
                "partition values by field and partition spec list cannot both be set".to_string(),
            );
        }
        for key in partition_spec_list.iter().flat_map(|spec| spec.keys()) {
            if !partition_fields.contains(key) {
                self.push(format!(
                    "partition spec key [{}] not specified in partition fields",
                    key
                ));
            }
        }
        if derive_partition_spec && partition_fields.is_empty() {
            self.push("derive partition spec requires partition fields".to_string());
        }
        if max_partition_spec_filters == Some(0) {
            self.push("max partition spec filters must be greater than 0".to_string());
        }
    }
}

/// Append staged rows to main, optionally skipping rows already present
///
/// # Example
///
/// ```rust
/// use ingest_mode_sdk::ingest::{AppendOnly, Auditing, DigestGenStrategy};
///
/// let mode = AppendOnly::builder()
///     .digest_gen_strategy(DigestGenStrategy::user_provided("digest"))
///     .auditing(Auditing::date_time("ingest_ts"))
///     .build()
///     .unwrap();
/// assert_eq!(mode.batch_id_field(), "batch_id");
///
/// let err = AppendOnly::builder().build().unwrap_err();
/// assert!(err.to_string().contains("auditing"));
/// assert!(err.to_string().contains("digest_gen_strategy"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "AppendOnlyBuilder")]
pub struct AppendOnly {
    pub(crate) digest_gen_strategy: DigestGenStrategy,
    pub(crate) auditing: Auditing,
    pub(crate) filter_existing_records: bool,
    pub(crate) batch_id_field: String,
    pub(crate) deduplication_strategy: DeduplicationStrategy,
    pub(crate) versioning_strategy: VersioningStrategy,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppendOnlyBuilder {
    digest_gen_strategy: Option<DigestGenStrategy>,
    auditing: Option<Auditing>,
    filter_existing_records: Option<bool>,
    batch_id_field: Option<String>,
    deduplication_strategy: Option<DeduplicationStrategy>,
    versioning_strategy: Option<VersioningStrategy>,
}

impl AppendOnlyBuilder {
    setters! {
        digest_gen_strategy: DigestGenStrategy,
        auditing: Auditing,
        filter_existing_records: bool,
        batch_id_field: String,
        deduplication_strategy: DeduplicationStrategy,
        versioning_strategy: VersioningStrategy,
    }

    pub fn build(self) -> Result<AppendOnly, ConstructionError> {
        let mut v = Violations::default();
        let digest_gen_strategy = v.required("digest_gen_strategy", self.digest_gen_strategy);
        let auditing = v.required("auditing", self.auditing);
        let filter_existing_records = self.filter_existing_records.unwrap_or(false);
        let batch_id_field = self
            .batch_id_field
            .unwrap_or_else(|| DEFAULT_BATCH_ID_FIELD.to_string());
        let versioning_strategy = self.versioning_strategy.unwrap_or_default();

        v.check_name("batch id field", &batch_id_field);
        v.extend(versioning_strategy.violations());
        if let Some(auditing) = &auditing {
            v.extend(auditing.violations());
        }
        if let Some(digest) = &digest_gen_strategy {
            v.extend(digest.violations());
            if filter_existing_records && digest.digest_field().is_none() {
                v.push("filter existing records requires a digest".to_string());
            }
        }

        match (digest_gen_strategy, auditing) {
            (Some(digest_gen_strategy), Some(auditing)) if v.is_empty() => Ok(AppendOnly {
                digest_gen_strategy,
                auditing,
                filter_existing_records,
                batch_id_field,
                deduplication_strategy: self.deduplication_strategy.unwrap_or_default(),
                versioning_strategy,
            }),
            _ => Err(v.into_error("AppendOnly")),
        }
    }
}

impl TryFrom<AppendOnlyBuilder> for AppendOnly {
    type Error = ConstructionError;

    fn try_from(builder: AppendOnlyBuilder) -> Result<Self, Self::Error> {
        builder.build()
    }
}

impl AppendOnly {
    pub fn builder() -> AppendOnlyBuilder {
        AppendOnlyBuilder::default()
    }

    pub fn digest_gen_strategy(&self) -> &DigestGenStrategy {
        &self.digest_gen_strategy
    }

    pub fn auditing(&self) -> &Auditing {
        &self.auditing
    }

    pub fn filter_existing_records(&self) -> bool {
        self.filter_existing_records
    }

    pub fn batch_id_field(&self) -> &str {
        &self.batch_id_field
    }
}

/// Replace the whole content of main with the staged snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "NontemporalSnapshotBuilder")]
pub struct NontemporalSnapshot {
    pub(crate) auditing: Auditing,
    pub(crate) batch_id_field: String,
    pub(crate) deduplication_strategy: DeduplicationStrategy,
    pub(crate) versioning_strategy: VersioningStrategy,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NontemporalSnapshotBuilder {
    auditing: Option<Auditing>,
    batch_id_field: Option<String>,
    deduplication_strategy: Option<DeduplicationStrategy>,
    versioning_strategy: Option<VersioningStrategy>,
}

impl NontemporalSnapshotBuilder {
    setters! {
        auditing: Auditing,
        batch_id_field: String,
        deduplication_strategy: DeduplicationStrategy,
        versioning_strategy: VersioningStrategy,
    }

    pub fn build(self) -> Result<NontemporalSnapshot, ConstructionError> {
        let mut v = Violations::default();
        let auditing = v.required("auditing", self.auditing);
        let batch_id_field = self
            .batch_id_field
            .unwrap_or_else(|| DEFAULT_BATCH_ID_FIELD.to_string());
        let versioning_strategy = self.versioning_strategy.unwrap_or_default();

        v.check_name("batch id field", &batch_id_field);
        v.no_all_versions("NontemporalSnapshot", &versioning_strategy);
        v.extend(versioning_strategy.violations());
        if let Some(auditing) = &auditing {
            v.extend(auditing.violations());
        }

        match auditing {
            Some(auditing) if v.is_empty() => Ok(NontemporalSnapshot {
                auditing,
                batch_id_field,
                deduplication_strategy: self.deduplication_strategy.unwrap_or_default(),
                versioning_strategy,
            }),
            _ => Err(v.into_error("NontemporalSnapshot")),
        }
    }
}

impl TryFrom<NontemporalSnapshotBuilder> for NontemporalSnapshot {
    type Error = ConstructionError;

    fn try_from(builder: NontemporalSnapshotBuilder) -> Result<Self, Self::Error> {
        builder.build()
    }
}

impl NontemporalSnapshot {
    pub fn builder() -> NontemporalSnapshotBuilder {
        NontemporalSnapshotBuilder::default()
    }

    pub fn auditing(&self) -> &Auditing {
        &self.auditing
    }

    pub fn batch_id_field(&self) -> &str {
        &self.batch_id_field
    }
}

/// Upsert staged rows into main by primary key, without history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "NontemporalDeltaBuilder")]
pub struct NontemporalDelta {
    pub(crate) digest_field: String,
    pub(crate) auditing: Auditing,
    pub(crate) merge_strategy: MergeStrategy,
    pub(crate) batch_id_field: String,
    pub(crate) deduplication_strategy: DeduplicationStrategy,
    pub(crate) versioning_strategy: VersioningStrategy,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NontemporalDeltaBuilder {
    digest_field: Option<String>,
    auditing: Option<Auditing>,
    merge_strategy: Option<MergeStrategy>,
    batch_id_field: Option<String>,
    deduplication_strategy: Option<DeduplicationStrategy>,
    versioning_strategy: Option<VersioningStrategy>,
}

impl NontemporalDeltaBuilder {
    setters! {
        digest_field: String,
        auditing: Auditing,
        merge_strategy: MergeStrategy,
        batch_id_field: String,
        deduplication_strategy: DeduplicationStrategy,
        versioning_strategy: VersioningStrategy,
    }

    pub fn build(self) -> Result<NontemporalDelta, ConstructionError> {
        let mut v = Violations::default();
        let digest_field = v.required("digest_field", self.digest_field);
        let auditing = v.required("auditing", self.auditing);
        let merge_strategy = self.merge_strategy.unwrap_or_default();
        let batch_id_field = self
            .batch_id_field
            .unwrap_or_else(|| DEFAULT_BATCH_ID_FIELD.to_string());
        let versioning_strategy = self.versioning_strategy.unwrap_or_default();

        if let Some(digest_field) = &digest_field {
            v.check_name("digest field", digest_field);
        }
        v.check_name("batch id field", &batch_id_field);
        v.extend(merge_strategy.violations());
        v.extend(versioning_strategy.violations());
        v.resolver(&versioning_strategy, digest_field.as_deref());
        if let Some(auditing) = &auditing {
            v.extend(auditing.violations());
        }

        match (digest_field, auditing) {
            (Some(digest_field), Some(auditing)) if v.is_empty() => Ok(NontemporalDelta {
                digest_field,
                auditing,
                merge_strategy,
                batch_id_field,
                deduplication_strategy: self.deduplication_strategy.unwrap_or_default(),
                versioning_strategy,
            }),
            _ => Err(v.into_error("NontemporalDelta")),
        }
    }
}

impl TryFrom<NontemporalDeltaBuilder> for NontemporalDelta {
    type Error = ConstructionError;

    fn try_from(builder: NontemporalDeltaBuilder) -> Result<Self, Self::Error> {
        builder.build()
    }
}

impl NontemporalDelta {
    pub fn builder() -> NontemporalDeltaBuilder {
        NontemporalDeltaBuilder::default()
    }

    pub fn digest_field(&self) -> &str {
        &self.digest_field
    }

    pub fn auditing(&self) -> &Auditing {
        &self.auditing
    }

    pub fn merge_strategy(&self) -> &MergeStrategy {
        &self.merge_strategy
    }

    pub fn batch_id_field(&self) -> &str {
        &self.batch_id_field
    }
}

/// Milestone main against the staged snapshot, optionally per partition
///
/// # Example
///
/// ```rust
/// use ingest_mode_sdk::ingest::{TransactionMilestoning, UnitemporalSnapshot};
///
/// let err = UnitemporalSnapshot::builder()
///     .digest_field("digest")
///     .transaction_milestoning(TransactionMilestoning::batch_id("batch_id_in", "batch_id_out"))
///     .partition_fields(vec!["business_date".to_string()])
///     .partition_value("biz_date", "2024-01-01")
///     .build()
///     .unwrap_err();
/// assert!(err.to_string().contains("partition key [biz_date] not specified in partition fields"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "UnitemporalSnapshotBuilder")]
pub struct UnitemporalSnapshot {
    pub(crate) digest_field: String,
    pub(crate) transaction_milestoning: TransactionMilestoning,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub(crate) partition_fields: Vec<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub(crate) partition_values_by_field: PartitionValues,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub(crate) partition_spec_list: Vec<PartitionSpec>,
    pub(crate) derive_partition_spec: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) max_partition_spec_filters: Option<u64>,
    pub(crate) empty_dataset_handling: EmptyDatasetHandling,
    pub(crate) deduplication_strategy: DeduplicationStrategy,
    pub(crate) versioning_strategy: VersioningStrategy,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UnitemporalSnapshotBuilder {
    digest_field: Option<String>,
    transaction_milestoning: Option<TransactionMilestoning>,
    partition_fields: Option<Vec<String>>,
    partition_values_by_field: Option<PartitionValues>,
    partition_spec_list: Option<Vec<PartitionSpec>>,
    derive_partition_spec: Option<bool>,
    max_partition_spec_filters: Option<u64>,
    empty_dataset_handling: Option<EmptyDatasetHandling>,
    deduplication_strategy: Option<DeduplicationStrategy>,
    versioning_strategy: Option<VersioningStrategy>,
}

impl UnitemporalSnapshotBuilder {
    setters! {
        digest_field: String,
        transaction_milestoning: TransactionMilestoning,
        partition_fields: Vec<String>,
        partition_values_by_field: PartitionValues,
        partition_spec_list: Vec<PartitionSpec>,
        derive_partition_spec: bool,
        max_partition_spec_filters: u64,
        empty_dataset_handling: EmptyDatasetHandling,
        deduplication_strategy: DeduplicationStrategy,
        versioning_strategy: VersioningStrategy,
    }

    /// Add one value to the filter of a partition field
    pub fn partition_value(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.partition_values_by_field
            .get_or_insert_with(BTreeMap::new)
            .entry(field.into())
            .or_default()
            .insert(value.into());
        self
    }

    /// Add one partition to the spec list
    pub fn partition_spec(mut self, spec: PartitionSpec) -> Self {
        self.partition_spec_list.get_or_insert_with(Vec::new).push(spec);
        self
    }

    pub fn build(self) -> Result<UnitemporalSnapshot, ConstructionError> {
        let mut v = Violations::default();
        let digest_field = v.required("digest_field", self.digest_field);
        let transaction_milestoning =
            v.required("transaction_milestoning", self.transaction_milestoning);
        let partition_fields = self.partition_fields.unwrap_or_default();
        let partition_values_by_field = self.partition_values_by_field.unwrap_or_default();
        let partition_spec_list = self.partition_spec_list.unwrap_or_default();
        let derive_partition_spec = self.derive_partition_spec.unwrap_or(false);
        let versioning_strategy = self.versioning_strategy.unwrap_or_default();

        if let Some(digest_field) = &digest_field {
            v.check_name("digest field", digest_field);
        }
        if let Some(milestoning) = &transaction_milestoning {
            v.extend(milestoning.violations());
        }
        v.partitions(&partition_fields, &partition_values_by_field);
        v.partition_specs(
            &partition_fields,
            &partition_values_by_field,
            &partition_spec_list,
            derive_partition_spec,
            self.max_partition_spec_filters,
        );
        v.no_all_versions("UnitemporalSnapshot", &versioning_strategy);
        v.extend(versioning_strategy.violations());

        match (digest_field, transaction_milestoning) {
            (Some(digest_field), Some(transaction_milestoning)) if v.is_empty() => {
                Ok(UnitemporalSnapshot {
                    digest_field,
                    transaction_milestoning,
                    partition_fields,
                    partition_values_by_field,
                    partition_spec_list,
                    derive_partition_spec,
                    max_partition_spec_filters: self.max_partition_spec_filters,
                    empty_dataset_handling: self.empty_dataset_handling.unwrap_or_default(),
                    deduplication_strategy: self.deduplication_strategy.unwrap_or_default(),
                    versioning_strategy,
                })
            }
            _ => Err(v.into_error("UnitemporalSnapshot")),
        }
    }
}

impl TryFrom<UnitemporalSnapshotBuilder> for UnitemporalSnapshot {
    type Error = ConstructionError;

    fn try_from(builder: UnitemporalSnapshotBuilder) -> Result<Self, Self::Error> {
        builder.build()
    }
}

impl UnitemporalSnapshot {
    pub fn builder() -> UnitemporalSnapshotBuilder {
        UnitemporalSnapshotBuilder::default()
    }

    pub fn digest_field(&self) -> &str {
        &self.digest_field
    }

    pub fn transaction_milestoning(&self) -> &TransactionMilestoning {
        &self.transaction_milestoning
    }

    pub fn partition_fields(&self) -> &[String] {
        &self.partition_fields
    }

    pub fn partition_values_by_field(&self) -> &PartitionValues {
        &self.partition_values_by_field
    }

    pub fn partition_spec_list(&self) -> &[PartitionSpec] {
        &self.partition_spec_list
    }

    /// Whether the partitions to replace are derived from the staged batch
    pub fn derive_partition_spec(&self) -> bool {
        self.derive_partition_spec
    }

    /// Upper bound on derived partition filters before falling back to a full replace
    pub fn max_partition_spec_filters(&self) -> Option<u64> {
        self.max_partition_spec_filters
    }

    pub fn empty_dataset_handling(&self) -> EmptyDatasetHandling {
        self.empty_dataset_handling
    }
}

/// Milestone main against staged changes, keeping transaction history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "UnitemporalDeltaBuilder")]
pub struct UnitemporalDelta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) digest_field: Option<String>,
    pub(crate) transaction_milestoning: TransactionMilestoning,
    pub(crate) merge_strategy: MergeStrategy,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub(crate) optimization_filters: Vec<OptimizationFilter>,
    pub(crate) deduplication_strategy: DeduplicationStrategy,
    pub(crate) versioning_strategy: VersioningStrategy,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UnitemporalDeltaBuilder {
    digest_field: Option<String>,
    transaction_milestoning: Option<TransactionMilestoning>,
    merge_strategy: Option<MergeStrategy>,
    optimization_filters: Option<Vec<OptimizationFilter>>,
    deduplication_strategy: Option<DeduplicationStrategy>,
    versioning_strategy: Option<VersioningStrategy>,
}

impl UnitemporalDeltaBuilder {
    setters! {
        digest_field: String,
        transaction_milestoning: TransactionMilestoning,
        merge_strategy: MergeStrategy,
        optimization_filters: Vec<OptimizationFilter>,
        deduplication_strategy: DeduplicationStrategy,
        versioning_strategy: VersioningStrategy,
    }

    pub fn build(self) -> Result<UnitemporalDelta, ConstructionError> {
        let mut v = Violations::default();
        let transaction_milestoning =
            v.required("transaction_milestoning", self.transaction_milestoning);
        let merge_strategy = self.merge_strategy.unwrap_or_default();
        let optimization_filters = self.optimization_filters.unwrap_or_default();
        let versioning_strategy = self.versioning_strategy.unwrap_or_default();

        match &self.digest_field {
            Some(digest_field) => v.check_name("digest field", digest_field),
            None if versioning_strategy.is_no_versioning() => {
                v.push("digest field is mandatory for UnitemporalDelta with NoVersioning".to_string())
            }
            None => {}
        }
        if let Some(milestoning) = &transaction_milestoning {
            v.extend(milestoning.violations());
        }
        v.extend(merge_strategy.violations());
        v.extend(versioning_strategy.violations());
        v.resolver(&versioning_strategy, self.digest_field.as_deref());
        for (i, filter) in optimization_filters.iter().enumerate() {
            v.extend(filter.violations());
            if optimization_filters[..i]
                .iter()
                .any(|f| f.field_name == filter.field_name)
            {
                v.push(format!(
                    "optimization filter field [{}] is listed more than once",
                    filter.field_name
                ));
            }
        }

        match transaction_milestoning {
            Some(transaction_milestoning) if v.is_empty() => Ok(UnitemporalDelta {
                digest_field: self.digest_field,
                transaction_milestoning,
                merge_strategy,
                optimization_filters,
                deduplication_strategy: self.deduplication_strategy.unwrap_or_default(),
                versioning_strategy,
            }),
            _ => Err(v.into_error("UnitemporalDelta")),
        }
    }
}

impl TryFrom<UnitemporalDeltaBuilder> for UnitemporalDelta {
    type Error = ConstructionError;

    fn try_from(builder: UnitemporalDeltaBuilder) -> Result<Self, Self::Error> {
        builder.build()
    }
}

impl UnitemporalDelta {
    pub fn builder() -> UnitemporalDeltaBuilder {
        UnitemporalDeltaBuilder::default()
    }

    pub fn digest_field(&self) -> Option<&str> {
        self.digest_field.as_deref()
    }

    pub fn transaction_milestoning(&self) -> &TransactionMilestoning {
        &self.transaction_milestoning
    }

    pub fn merge_strategy(&self) -> &MergeStrategy {
        &self.merge_strategy
    }

    /// Filters declared explicitly on the mode; may be empty
    pub fn optimization_filters(&self) -> &[OptimizationFilter] {
        &self.optimization_filters
    }
}

/// Milestone main on both transaction and validity time against a snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BitemporalSnapshotBuilder")]
pub struct BitemporalSnapshot {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) digest_field: Option<String>,
    pub(crate) transaction_milestoning: TransactionMilestoning,
    pub(crate) validity_milestoning: ValidityMilestoning,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub(crate) partition_fields: Vec<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub(crate) partition_values_by_field: PartitionValues,
    pub(crate) deduplication_strategy: DeduplicationStrategy,
    pub(crate) versioning_strategy: VersioningStrategy,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BitemporalSnapshotBuilder {
    digest_field: Option<String>,
    transaction_milestoning: Option<TransactionMilestoning>,
    validity_milestoning: Option<ValidityMilestoning>,
    partition_fields: Option<Vec<String>>,
    partition_values_by_field: Option<PartitionValues>,
    deduplication_strategy: Option<DeduplicationStrategy>,
    versioning_strategy: Option<VersioningStrategy>,
}

impl BitemporalSnapshotBuilder {
    setters! {
        digest_field: String,
        transaction_milestoning: TransactionMilestoning,
        validity_milestoning: ValidityMilestoning,
        partition_fields: Vec<String>,
        partition_values_by_field: PartitionValues,
        deduplication_strategy: DeduplicationStrategy,
        versioning_strategy: VersioningStrategy,
    }

    pub fn partition_value(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.partition_values_by_field
            .get_or_insert_with(BTreeMap::new)
            .entry(field.into())
            .or_default()
            .insert(value.into());
        self
    }

    pub fn build(self) -> Result<BitemporalSnapshot, ConstructionError> {
        let mut v = Violations::default();
        let transaction_milestoning =
            v.required("transaction_milestoning", self.transaction_milestoning);
        let validity_milestoning = v.required("validity_milestoning", self.validity_milestoning);
        let partition_fields = self.partition_fields.unwrap_or_default();
        let partition_values_by_field = self.partition_values_by_field.unwrap_or_default();
        let versioning_strategy = self.versioning_strategy.unwrap_or_default();

        if let Some(digest_field) = &self.digest_field {
            v.check_name("digest field", digest_field);
        }
        if let Some(milestoning) = &transaction_milestoning {
            v.extend(milestoning.violations());
        }
        if let Some(milestoning) = &validity_milestoning {
            v.extend(milestoning.violations());
        }
        v.partitions(&partition_fields, &partition_values_by_field);
        v.no_all_versions("BitemporalSnapshot", &versioning_strategy);
        v.extend(versioning_strategy.violations());

        match (transaction_milestoning, validity_milestoning) {
            (Some(transaction_milestoning), Some(validity_milestoning)) if v.is_empty() => {
                Ok(BitemporalSnapshot {
                    digest_field: self.digest_field,
                    transaction_milestoning,
                    validity_milestoning,
                    partition_fields,
                    partition_values_by_field,
                    deduplication_strategy: self.deduplication_strategy.unwrap_or_default(),
                    versioning_strategy,
                })
            }
            _ => Err(v.into_error("BitemporalSnapshot")),
        }
    }
}

impl TryFrom<BitemporalSnapshotBuilder> for BitemporalSnapshot {
    type Error = ConstructionError;

    fn try_from(builder: BitemporalSnapshotBuilder) -> Result<Self, Self::Error> {
        builder.build()
    }
}

impl BitemporalSnapshot {
    pub fn builder() -> BitemporalSnapshotBuilder {
        BitemporalSnapshotBuilder::default()
    }

    pub fn digest_field(&self) -> Option<&str> {
        self.digest_field.as_deref()
    }

    pub fn transaction_milestoning(&self) -> &TransactionMilestoning {
        &self.transaction_milestoning
    }

    pub fn validity_milestoning(&self) -> &ValidityMilestoning {
        &self.validity_milestoning
    }

    pub fn partition_fields(&self) -> &[String] {
        &self.partition_fields
    }

    pub fn partition_values_by_field(&self) -> &PartitionValues {
        &self.partition_values_by_field
    }
}

/// Milestone main on both transaction and validity time against staged changes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BitemporalDeltaBuilder")]
pub struct BitemporalDelta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) digest_field: Option<String>,
    pub(crate) transaction_milestoning: TransactionMilestoning,
    pub(crate) validity_milestoning: ValidityMilestoning,
    pub(crate) merge_strategy: MergeStrategy,
    pub(crate) filter_existing_records: bool,
    pub(crate) deduplication_strategy: DeduplicationStrategy,
    pub(crate) versioning_strategy: VersioningStrategy,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BitemporalDeltaBuilder {
    digest_field: Option<String>,
    transaction_milestoning: Option<TransactionMilestoning>,
    validity_milestoning: Option<ValidityMilestoning>,
    merge_strategy: Option<MergeStrategy>,
    filter_existing_records: Option<bool>,
    deduplication_strategy: Option<DeduplicationStrategy>,
    versioning_strategy: Option<VersioningStrategy>,
}

impl BitemporalDeltaBuilder {
    setters! {
        digest_field: String,
        transaction_milestoning: TransactionMilestoning,
        validity_milestoning: ValidityMilestoning,
        merge_strategy: MergeStrategy,
        filter_existing_records: bool,
        deduplication_strategy: DeduplicationStrategy,
        versioning_strategy: VersioningStrategy,
    }

    pub fn build(self) -> Result<BitemporalDelta, ConstructionError> {
        let mut v = Violations::default();
        let transaction_milestoning =
            v.required("transaction_milestoning", self.transaction_milestoning);
        let validity_milestoning = v.required("validity_milestoning", self.validity_milestoning);
        let merge_strategy = self.merge_strategy.unwrap_or_default();
        let filter_existing_records = self.filter_existing_records.unwrap_or(false);
        let versioning_strategy = self.versioning_strategy.unwrap_or_default();

        if let Some(digest_field) = &self.digest_field {
            v.check_name("digest field", digest_field);
        }
        if filter_existing_records && self.digest_field.is_none() {
            v.push("filter existing records requires a digest field".to_string());
        }
        if let Some(milestoning) = &transaction_milestoning {
            v.extend(milestoning.violations());
        }
        if let Some(milestoning) = &validity_milestoning {
            v.extend(milestoning.violations());
        }
        v.extend(merge_strategy.violations());
        v.extend(versioning_strategy.violations());

        match (transaction_milestoning, validity_milestoning) {
            (Some(transaction_milestoning), Some(validity_milestoning)) if v.is_empty() => {
                Ok(BitemporalDelta {
                    digest_field: self.digest_field,
                    transaction_milestoning,
                    validity_milestoning,
                    merge_strategy,
                    filter_existing_records,
                    deduplication_strategy: self.deduplication_strategy.unwrap_or_default(),
                    versioning_strategy,
                })
            }
            _ => Err(v.into_error("BitemporalDelta")),
        }
    }
}

impl TryFrom<BitemporalDeltaBuilder> for BitemporalDelta {
    type Error = ConstructionError;

    fn try_from(builder: BitemporalDeltaBuilder) -> Result<Self, Self::Error> {
        builder.build()
    }
}

impl BitemporalDelta {
    pub fn builder() -> BitemporalDeltaBuilder {
        BitemporalDeltaBuilder::default()
    }

    pub fn digest_field(&self) -> Option<&str> {
        self.digest_field.as_deref()
    }

    pub fn transaction_milestoning(&self) -> &TransactionMilestoning {
        &self.transaction_milestoning
    }

    pub fn validity_milestoning(&self) -> &ValidityMilestoning {
        &self.validity_milestoning
    }

    pub fn merge_strategy(&self) -> &MergeStrategy {
        &self.merge_strategy
    }

    pub fn filter_existing_records(&self) -> bool {
        self.filter_existing_records
    }
}

/// Load files straight into main, stamping each row with batch and audit columns
///
/// # Example
///
/// ```rust
/// use ingest_mode_sdk::ingest::{Auditing, BulkLoad, DigestGenStrategy, VersioningStrategy};
/// use ingest_mode_sdk::models::DeduplicationStrategy;
///
/// let err = BulkLoad::builder()
///     .batch_id_field("batch_id")
///     .digest_gen_strategy(DigestGenStrategy::udf_based("LAKEHOUSE_MD5", "digest"))
///     .auditing(Auditing::date_time("ingest_ts"))
///     .deduplication_strategy(DeduplicationStrategy::FilterDuplicates)
///     .versioning_strategy(VersioningStrategy::max_version("version"))
///     .build()
///     .unwrap_err();
/// assert_eq!(err.violations.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BulkLoadBuilder")]
pub struct BulkLoad {
    pub(crate) batch_id_field: String,
    pub(crate) digest_gen_strategy: DigestGenStrategy,
    pub(crate) auditing: Auditing,
    pub(crate) deduplication_strategy: DeduplicationStrategy,
    pub(crate) versioning_strategy: VersioningStrategy,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BulkLoadBuilder {
    batch_id_field: Option<String>,
    digest_gen_strategy: Option<DigestGenStrategy>,
    auditing: Option<Auditing>,
    deduplication_strategy: Option<DeduplicationStrategy>,
    versioning_strategy: Option<VersioningStrategy>,
}

impl BulkLoadBuilder {
    setters! {
        batch_id_field: String,
        digest_gen_strategy: DigestGenStrategy,
        auditing: Auditing,
        deduplication_strategy: DeduplicationStrategy,
        versioning_strategy: VersioningStrategy,
    }

    pub fn build(self) -> Result<BulkLoad, ConstructionError> {
        let mut v = Violations::default();
        let batch_id_field = v.required("batch_id_field", self.batch_id_field);
        let digest_gen_strategy = v.required("digest_gen_strategy", self.digest_gen_strategy);
        let auditing = v.required("auditing", self.auditing);
        let deduplication_strategy = self.deduplication_strategy.unwrap_or_default();
        let versioning_strategy = self.versioning_strategy.unwrap_or_default();

        if let Some(batch_id_field) = &batch_id_field {
            v.check_name("batch id field", batch_id_field);
        }
        if let Some(digest) = &digest_gen_strategy {
            v.extend(digest.violations());
        }
        if let Some(auditing) = &auditing {
            v.extend(auditing.violations());
        }
        v.only_defaults("BulkLoad", deduplication_strategy, &versioning_strategy);

        match (batch_id_field, digest_gen_strategy, auditing) {
            (Some(batch_id_field), Some(digest_gen_strategy), Some(auditing)) if v.is_empty() => {
                Ok(BulkLoad {
                    batch_id_field,
                    digest_gen_strategy,
                    auditing,
                    deduplication_strategy,
                    versioning_strategy,
                })
            }
            _ => Err(v.into_error("BulkLoad")),
        }
    }
}

impl TryFrom<BulkLoadBuilder> for BulkLoad {
    type Error = ConstructionError;

    fn try_from(builder: BulkLoadBuilder) -> Result<Self, Self::Error> {
        builder.build()
    }
}

impl BulkLoad {
    pub fn builder() -> BulkLoadBuilder {
        BulkLoadBuilder::default()
    }

    pub fn batch_id_field(&self) -> &str {
        &self.batch_id_field
    }

    pub fn digest_gen_strategy(&self) -> &DigestGenStrategy {
        &self.digest_gen_strategy
    }

    pub fn auditing(&self) -> &Auditing {
        &self.auditing
    }
}

/// Leave main untouched
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "NoOpBuilder")]
pub struct NoOp {
    pub(crate) deduplication_strategy: DeduplicationStrategy,
    pub(crate) versioning_strategy: VersioningStrategy,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NoOpBuilder {
    deduplication_strategy: Option<DeduplicationStrategy>,
    versioning_strategy: Option<VersioningStrategy>,
}

impl NoOpBuilder {
    setters! {
        deduplication_strategy: DeduplicationStrategy,
        versioning_strategy: VersioningStrategy,
    }

    pub fn build(self) -> Result<NoOp, ConstructionError> {
        let mut v = Violations::default();
        let deduplication_strategy = self.deduplication_strategy.unwrap_or_default();
        let versioning_strategy = self.versioning_strategy.unwrap_or_default();
        v.only_defaults("NoOp", deduplication_strategy, &versioning_strategy);
        if v.is_empty() {
            Ok(NoOp {
                deduplication_strategy,
                versioning_strategy,
            })
        } else {
            Err(v.into_error("NoOp"))
        }
    }
}

impl TryFrom<NoOpBuilder> for NoOp {
    type Error = ConstructionError;

    fn try_from(builder: NoOpBuilder) -> Result<Self, Self::Error> {
        builder.build()
    }
}

impl NoOp {
    pub fn builder() -> NoOpBuilder {
        NoOpBuilder::default()
    }
}

impl Default for NoOp {
    fn default() -> Self {
        NoOp {
            deduplication_strategy: DeduplicationStrategy::AllowDuplicates,
            versioning_strategy: VersioningStrategy::NoVersioning,
        }
    }
}

/// A declared loading strategy: exactly one of the nine ingest modes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum IngestMode {
    AppendOnly(AppendOnly),
    NontemporalSnapshot(NontemporalSnapshot),
    NontemporalDelta(NontemporalDelta),
    UnitemporalSnapshot(UnitemporalSnapshot),
    UnitemporalDelta(UnitemporalDelta),
    BitemporalSnapshot(BitemporalSnapshot),
    BitemporalDelta(BitemporalDelta),
    BulkLoad(BulkLoad),
    NoOp(NoOp),
}

macro_rules! common_accessors {
    ($self:ident, $mode:ident => $body:expr) => {
        match $self {
            IngestMode::AppendOnly($mode) => $body,
            IngestMode::NontemporalSnapshot($mode) => $body,
            IngestMode::NontemporalDelta($mode) => $body,
            IngestMode::UnitemporalSnapshot($mode) => $body,
            IngestMode::UnitemporalDelta($mode) => $body,
            IngestMode::BitemporalSnapshot($mode) => $body,
            IngestMode::BitemporalDelta($mode) => $body,
            IngestMode::BulkLoad($mode) => $body,
            IngestMode::NoOp($mode) => $body,
        }
    };
}

impl IngestMode {
    pub fn name(&self) -> &'static str {
        match self {
            IngestMode::AppendOnly(_) => "AppendOnly",
            IngestMode::NontemporalSnapshot(_) => "NontemporalSnapshot",
            IngestMode::NontemporalDelta(_) => "NontemporalDelta",
            IngestMode::UnitemporalSnapshot(_) => "UnitemporalSnapshot",
            IngestMode::UnitemporalDelta(_) => "UnitemporalDelta",
            IngestMode::BitemporalSnapshot(_) => "BitemporalSnapshot",
            IngestMode::BitemporalDelta(_) => "BitemporalDelta",
            IngestMode::BulkLoad(_) => "BulkLoad",
            IngestMode::NoOp(_) => "NoOp",
        }
    }

    pub fn deduplication_strategy(&self) -> DeduplicationStrategy {
        common_accessors!(self, mode => mode.deduplication_strategy)
    }

    pub fn versioning_strategy(&self) -> &VersioningStrategy {
        common_accessors!(self, mode => &mode.versioning_strategy)
    }

    /// Present only when the mode loads all versions
    pub fn data_split_field(&self) -> Option<&str> {
        self.versioning_strategy().data_split_field()
    }

    /// Digest column the mode reads or writes, if any
    pub fn digest_field(&self) -> Option<&str> {
        match self {
            IngestMode::AppendOnly(mode) => mode.digest_gen_strategy.digest_field(),
            IngestMode::BulkLoad(mode) => mode.digest_gen_strategy.digest_field(),
            IngestMode::NontemporalDelta(mode) => Some(mode.digest_field.as_str()),
            IngestMode::UnitemporalSnapshot(mode) => Some(mode.digest_field.as_str()),
            IngestMode::UnitemporalDelta(mode) => mode.digest_field.as_deref(),
            IngestMode::BitemporalSnapshot(mode) => mode.digest_field.as_deref(),
            IngestMode::BitemporalDelta(mode) => mode.digest_field.as_deref(),
            IngestMode::NontemporalSnapshot(_) | IngestMode::NoOp(_) => None,
        }
    }

    /// Merge strategy of delta modes
    pub fn merge_strategy(&self) -> Option<&MergeStrategy> {
        match self {
            IngestMode::NontemporalDelta(mode) => Some(&mode.merge_strategy),
            IngestMode::UnitemporalDelta(mode) => Some(&mode.merge_strategy),
            IngestMode::BitemporalDelta(mode) => Some(&mode.merge_strategy),
            _ => None,
        }
    }

    /// Partition fields of snapshot modes; empty elsewhere
    pub fn partition_fields(&self) -> &[String] {
        match self {
            IngestMode::UnitemporalSnapshot(mode) => &mode.partition_fields,
            IngestMode::BitemporalSnapshot(mode) => &mode.partition_fields,
            _ => &[],
        }
    }

    pub fn validity_milestoning(&self) -> Option<&ValidityMilestoning> {
        match self {
            IngestMode::BitemporalSnapshot(mode) => Some(&mode.validity_milestoning),
            IngestMode::BitemporalDelta(mode) => Some(&mode.validity_milestoning),
            _ => None,
        }
    }
}

macro_rules! into_ingest_mode {
    ($($variant:ident),* $(,)?) => {
        $(
            impl From<$variant> for IngestMode {
                fn from(mode: $variant) -> Self {
                    IngestMode::$variant(mode)
                }
            }
        )*
    };
}

into_ingest_mode!(
    AppendOnly,
    NontemporalSnapshot,
    NontemporalDelta,
    UnitemporalSnapshot,
    UnitemporalDelta,
    BitemporalSnapshot,
    BitemporalDelta,
    BulkLoad,
    NoOp,
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::ValidityDerivation;
    use crate::models::VersionComparator;

    fn batch_id() -> TransactionMilestoning {
        TransactionMilestoning::batch_id("batch_id_in", "batch_id_out")
    }

    #[test]
    fn missing_attributes_are_listed_together() {
        let err = BulkLoad::builder().build().unwrap_err();
        assert_eq!(err.ingest_mode, "BulkLoad");
        assert_eq!(
            err.violations,
            vec!["some of required attributes are not set [batch_id_field, digest_gen_strategy, auditing]"]
        );
    }

    #[test]
    fn nontemporal_snapshot_rejects_all_versions() {
        let err = NontemporalSnapshot::builder()
            .auditing(Auditing::NoAuditing)
            .versioning_strategy(VersioningStrategy::all_versions("version"))
            .build()
            .unwrap_err();
        assert!(err.mentions("AllVersions versioning strategy is not supported for NontemporalSnapshot"));

        let ok = NontemporalSnapshot::builder()
            .auditing(Auditing::NoAuditing)
            .versioning_strategy(VersioningStrategy::max_version("version"))
            .build();
        assert!(ok.is_ok());
    }

    #[test]
    fn delta_versioning_requires_resolver() {
        let err = NontemporalDelta::builder()
            .digest_field("digest")
            .auditing(Auditing::NoAuditing)
            .versioning_strategy(VersioningStrategy::max_version("version"))
            .build()
            .unwrap_err();
        assert!(err.mentions("merge data version resolver is mandatory for MaxVersion"));

        let ok = NontemporalDelta::builder()
            .digest_field("digest")
            .auditing(Auditing::NoAuditing)
            .versioning_strategy(
                VersioningStrategy::max_version("version")
                    .with_resolver(MergeDataVersionResolver::DigestBased),
            )
            .build();
        assert!(ok.is_ok());
    }

    #[test]
    fn unitemporal_delta_digest_rules() {
        let err = UnitemporalDelta::builder()
            .transaction_milestoning(batch_id())
            .build()
            .unwrap_err();
        assert!(err.mentions("digest field is mandatory for UnitemporalDelta with NoVersioning"));

        let err = UnitemporalDelta::builder()
            .transaction_milestoning(batch_id())
            .versioning_strategy(
                VersioningStrategy::all_versions("version")
                    .with_resolver(MergeDataVersionResolver::DigestBased),
            )
            .build()
            .unwrap_err();
        assert!(err.mentions("digest based merge data version resolver requires a digest field"));

        let ok = UnitemporalDelta::builder()
            .transaction_milestoning(batch_id())
            .versioning_strategy(
                VersioningStrategy::all_versions("version").with_resolver(
                    MergeDataVersionResolver::version_column(VersionComparator::GreaterThanActiveVersion),
                ),
            )
            .build()
            .unwrap();
        assert_eq!(ok.digest_field(), None);
    }

    #[test]
    fn partition_values_must_match_fields_in_size() {
        let err = UnitemporalSnapshot::builder()
            .digest_field("digest")
            .transaction_milestoning(batch_id())
            .partition_fields(vec!["a".to_string(), "b".to_string()])
            .partition_value("a", "1")
            .build()
            .unwrap_err();
        assert!(err.mentions("partition values by field must have the same size as partition fields"));
    }

    #[test]
    fn partition_fields_without_values_are_accepted() {
        let mode = UnitemporalSnapshot::builder()
            .digest_field("digest")
            .transaction_milestoning(batch_id())
            .partition_fields(vec!["biz_date".to_string()])
            .build()
            .unwrap();
        assert_eq!(mode.empty_dataset_handling(), EmptyDatasetHandling::DeleteTargetData);
    }

    #[test]
    fn partition_spec_list_rules() {
        let spec: PartitionSpec = [("region".to_string(), serde_json::json!("EU"))].into_iter().collect();
        let err = UnitemporalSnapshot::builder()
            .digest_field("digest")
            .transaction_milestoning(batch_id())
            .partition_fields(vec!["biz_date".to_string()])
            .partition_value("biz_date", "2024-01-01")
            .partition_spec(spec)
            .max_partition_spec_filters(0u64)
            .build()
            .unwrap_err();
        assert!(err.mentions("partition values by field and partition spec list cannot both be set"));
        assert!(err.mentions("partition spec key [region] not specified in partition fields"));
        assert!(err.mentions("max partition spec filters must be greater than 0"));

        let err = UnitemporalSnapshot::builder()
            .digest_field("digest")
            .transaction_milestoning(batch_id())
            .derive_partition_spec(true)
            .build()
            .unwrap_err();
        assert!(err.mentions("derive partition spec requires partition fields"));

        let spec: PartitionSpec = [("biz_date".to_string(), serde_json::json!("2024-01-01"))]
            .into_iter()
            .collect();
        let mode = UnitemporalSnapshot::builder()
            .digest_field("digest")
            .transaction_milestoning(batch_id())
            .partition_fields(vec!["biz_date".to_string()])
            .partition_spec(spec)
            .derive_partition_spec(true)
            .max_partition_spec_filters(100u64)
            .build()
            .unwrap();
        assert_eq!(mode.partition_spec_list().len(), 1);
        assert!(mode.derive_partition_spec());
        assert_eq!(mode.max_partition_spec_filters(), Some(100));
    }

    #[test]
    fn bitemporal_snapshot_checks_partitions() {
        let err = BitemporalSnapshot::builder()
            .transaction_milestoning(batch_id())
            .validity_milestoning(ValidityMilestoning::date_time(
                "valid_from",
                "valid_thru",
                ValidityDerivation::source_specifies_from("from_src"),
            ))
            .partition_fields(vec!["business_date".to_string()])
            .partition_value("biz_date", "2024-01-01")
            .build()
            .unwrap_err();
        assert!(err.mentions("partition key [biz_date] not specified in partition fields"));
    }

    #[test]
    fn no_op_accepts_only_defaults() {
        assert_eq!(NoOp::builder().build().unwrap(), NoOp::default());
        let err = NoOp::builder()
            .deduplication_strategy(DeduplicationStrategy::FailOnDuplicates)
            .build()
            .unwrap_err();
        assert!(err.mentions("Only AllowDuplicates deduplication strategy is supported for NoOp"));
    }

    #[test]
    fn ingest_mode_accessors() {
        let mode: IngestMode = NontemporalDelta::builder()
            .digest_field("digest")
            .auditing(Auditing::NoAuditing)
            .merge_strategy(MergeStrategy::delete_indicator("deleted", vec![serde_json::json!(true)]))
            .versioning_strategy(
                VersioningStrategy::all_versions("version")
                    .with_resolver(MergeDataVersionResolver::DigestBased),
            )
            .build()
            .unwrap()
            .into();
        assert_eq!(mode.name(), "NontemporalDelta");
        assert_eq!(mode.data_split_field(), Some("data_split"));
        assert_eq!(mode.digest_field(), Some("digest"));
        assert_eq!(mode.merge_strategy().and_then(|m| m.delete_field()), Some("deleted"));
        assert_eq!(mode.deduplication_strategy(), DeduplicationStrategy::AllowDuplicates);
    }
}
