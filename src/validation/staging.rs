//! Staging dataset validation
//!
//! Checks that every staging column an ingest mode reads is present and usable
//! before planning. All mismatches are collected rather than stopping at the first.

use crate::ingest::{DigestGenStrategy, IngestMode, SchemaMismatchError, common_primary_keys};
use crate::models::Dataset;
use serde::{Deserialize, Serialize};

/// Result of staging validation.
///
/// Contains every schema mismatch found between the ingest mode and the staging dataset.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[must_use = "validation results should be checked for schema mismatches"]
pub struct StagingValidationResult {
    pub mismatches: Vec<SchemaMismatchError>,
}

impl StagingValidationResult {
    pub fn is_valid(&self) -> bool {
        self.mismatches.is_empty()
    }

    /// Convert into a `Result`, failing with every mismatch found
    pub fn into_result(self) -> Result<(), Vec<SchemaMismatchError>> {
        if self.mismatches.is_empty() {
            Ok(())
        } else {
            Err(self.mismatches)
        }
    }
}

/// Staging validator
#[derive(Default)]
pub struct StagingValidator;

impl StagingValidator {
    /// Create a new staging validator
    ///
    /// # Example
    ///
    /// ```rust
    /// use ingest_mode_sdk::validation::staging::StagingValidator;
    ///
    /// let validator = StagingValidator::new();
    /// ```
    pub fn new() -> Self {
        Self
    }

    /// Run every staging check for `mode`
    ///
    /// # Example
    ///
    /// ```rust
    /// use ingest_mode_sdk::ingest::{
    ///     MergeDataVersionResolver, TransactionMilestoning, UnitemporalDelta, VersioningStrategy,
    /// };
    /// use ingest_mode_sdk::models::{DataType, Dataset, Field, SchemaDefinition};
    /// use ingest_mode_sdk::validation::staging::StagingValidator;
    ///
    /// let staging = Dataset::new(
    ///     "staging",
    ///     SchemaDefinition::new(vec![
    ///         Field::new("id", DataType::Int).with_primary_key(true),
    ///         Field::new("version", DataType::Varchar),
    ///     ])
    ///     .unwrap(),
    /// );
    /// let mode = UnitemporalDelta::builder()
    ///     .digest_field("digest")
    ///     .transaction_milestoning(TransactionMilestoning::batch_id("batch_id_in", "batch_id_out"))
    ///     .versioning_strategy(
    ///         VersioningStrategy::max_version("version")
    ///             .with_resolver(MergeDataVersionResolver::DigestBased),
    ///     )
    ///     .build()
    ///     .unwrap()
    ///     .into();
    ///
    /// let result = StagingValidator::new().validate(&Dataset::named("main"), &staging, &mode);
    /// assert_eq!(result.mismatches.len(), 1);
    /// ```
    pub fn validate(
        &self,
        main: &Dataset,
        staging: &Dataset,
        mode: &IngestMode,
    ) -> StagingValidationResult {
        let mut mismatches = Vec::new();
        mismatches.extend(self.validate_versioning_field(staging, mode));
        mismatches.extend(self.validate_primary_keys(main, staging, mode));
        mismatches.extend(self.validate_referenced_fields(staging, mode));
        StagingValidationResult { mismatches }
    }

    /// The versioning field must exist, be comparable and not be a primary key
    pub fn validate_versioning_field(
        &self,
        staging: &Dataset,
        mode: &IngestMode,
    ) -> Option<SchemaMismatchError> {
        let name = mode.versioning_strategy().versioning_field()?;
        let Some(field) = staging.schema.field(name) else {
            return Some(missing(name, "Versioning", staging));
        };
        if !field.data_type().is_comparable() {
            return Some(SchemaMismatchError::UnsupportedDataType {
                field: name.to_string(),
                data_type: field.field_type.to_string(),
                purpose: "Versioning".to_string(),
            });
        }
        if field.primary_key {
            return Some(SchemaMismatchError::PrimaryKeyConflict {
                field: name.to_string(),
                reason: "versioning field cannot be a primary key".to_string(),
            });
        }
        None
    }

    /// Versioned loads pick one version per key, so keys must exist.
    ///
    /// Before main has been derived the staging keys are used on their own.
    pub fn validate_primary_keys(
        &self,
        main: &Dataset,
        staging: &Dataset,
        mode: &IngestMode,
    ) -> Option<SchemaMismatchError> {
        let versioning = mode.versioning_strategy();
        if versioning.is_no_versioning() {
            return None;
        }
        let has_keys = if main.schema.is_empty() {
            staging.schema.has_primary_key()
        } else {
            !common_primary_keys(main, staging).is_empty()
        };
        if has_keys {
            None
        } else {
            Some(SchemaMismatchError::MissingPrimaryKeys(format!(
                "{} versioning strategy needs primary keys common to '{}' and '{}'",
                versioning.name(),
                main.name(),
                staging.name()
            )))
        }
    }

    /// Delete indicator, partition, validity source and user-provided digest fields must exist
    pub fn validate_referenced_fields(
        &self,
        staging: &Dataset,
        mode: &IngestMode,
    ) -> Vec<SchemaMismatchError> {
        let mut referenced: Vec<(&str, &str)> = Vec::new();
        if let Some(delete_field) = mode.merge_strategy().and_then(|m| m.delete_field()) {
            referenced.push((delete_field, "Delete indicator"));
        }
        for partition in mode.partition_fields() {
            referenced.push((partition.as_str(), "Partition"));
        }
        if let Some(validity) = mode.validity_milestoning() {
            for source in validity.validity_derivation().source_fields() {
                referenced.push((source, "Validity source"));
            }
        }
        let digest = match mode {
            IngestMode::AppendOnly(m) => Some(m.digest_gen_strategy()),
            IngestMode::BulkLoad(m) => Some(m.digest_gen_strategy()),
            _ => None,
        };
        if let Some(DigestGenStrategy::UserProvided { digest_field }) = digest {
            referenced.push((digest_field.as_str(), "Digest"));
        }

        referenced
            .into_iter()
            .filter(|(name, _)| !staging.schema.contains(name))
            .map(|(name, purpose)| missing(name, purpose, staging))
            .collect()
    }
}

fn missing(field: &str, purpose: &str, staging: &Dataset) -> SchemaMismatchError {
    SchemaMismatchError::MissingField {
        field: field.to_string(),
        purpose: purpose.to_string(),
        dataset: staging.name().to_string(),
    }
}
