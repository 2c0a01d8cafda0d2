//! Schema derivation: the columns main must carry for an ingest mode
//!
//! Derivation starts from the staging fields and adds the digest, audit,
//! batch and milestoning columns the mode writes, then removes the staging
//! columns it consumes (data split, delete indicator, validity sources).
//! Physical metadata of the staging schema is carried over unchanged.

use super::audit::Auditing;
use super::error::SchemaMismatchError;
use super::milestoning::{TransactionMilestoning, ValidityMilestoning};
use super::mode::{
    AppendOnly, BitemporalDelta, BitemporalSnapshot, BulkLoad, IngestMode, NoOp,
    NontemporalDelta, NontemporalSnapshot, UnitemporalDelta, UnitemporalSnapshot,
};
use super::visitor::IngestModeVisitor;
use crate::models::{DataType, Dataset, Field};
use tracing::{debug, warn};

/// Type of batch id columns
pub const BATCH_ID_TYPE: DataType = DataType::Int;
/// Type of audit and date-time milestoning columns
pub const DATE_TIME_TYPE: DataType = DataType::Datetime;
/// Type of digest columns
pub const DIGEST_TYPE: DataType = DataType::String;

/// Ordered field list under construction; names stay unique throughout
struct DerivedFields {
    fields: Vec<Field>,
}

impl DerivedFields {
    fn from_staging(staging: &Dataset) -> Self {
        Self {
            fields: staging.schema.fields().to_vec(),
        }
    }

    fn has_primary_key(&self) -> bool {
        self.fields.iter().any(|f| f.primary_key)
    }

    fn contains(&self, name: &str) -> bool {
        self.fields.iter().any(|f| f.name == name)
    }

    fn remove(&mut self, name: Option<&str>) {
        if let Some(name) = name {
            let before = self.fields.len();
            self.fields.retain(|f| f.name != name);
            if self.fields.len() != before {
                debug!("Removed staging field '{}' from main schema", name);
            }
        }
    }

    /// Append a derived column, replacing any field of the same name
    fn add(&mut self, field: Field) {
        if self.contains(&field.name) {
            warn!(
                "Staging field '{}' replaced by derived {} column",
                field.name, field.field_type
            );
            self.fields.retain(|f| f.name != field.name);
        }
        debug!(
            "Added field '{}' ({}, primary key: {})",
            field.name, field.field_type, field.primary_key
        );
        self.fields.push(field);
    }

    /// Append the digest column unless staging already carries it
    fn add_digest(&mut self, digest_field: Option<&str>) {
        if let Some(name) = digest_field
            && !self.contains(name)
        {
            self.add(Field::new(name, DIGEST_TYPE));
        }
    }

    fn add_batch_id(&mut self, name: &str) {
        self.add(Field::new(name, BATCH_ID_TYPE));
    }

    fn add_auditing(&mut self, auditing: &Auditing, primary_key: bool) {
        if let Some(name) = auditing.date_time_field() {
            self.add(Field::new(name, DATE_TIME_TYPE).with_primary_key(primary_key));
        }
    }

    fn add_transaction_milestoning(&mut self, milestoning: &TransactionMilestoning) {
        match milestoning {
            TransactionMilestoning::BatchId {
                batch_id_in_name,
                batch_id_out_name,
            } => {
                self.add(Field::new(batch_id_in_name, BATCH_ID_TYPE).with_primary_key(true));
                self.add(Field::new(batch_id_out_name, BATCH_ID_TYPE));
            }
            TransactionMilestoning::DateTime {
                date_time_in_name,
                date_time_out_name,
            } => {
                self.add(Field::new(date_time_in_name, DATE_TIME_TYPE).with_primary_key(true));
                self.add(Field::new(date_time_out_name, DATE_TIME_TYPE));
            }
            TransactionMilestoning::BatchIdAndDateTime {
                batch_id_in_name,
                batch_id_out_name,
                date_time_in_name,
                date_time_out_name,
            } => {
                self.add(Field::new(batch_id_in_name, BATCH_ID_TYPE).with_primary_key(true));
                self.add(Field::new(batch_id_out_name, BATCH_ID_TYPE));
                self.add(Field::new(date_time_in_name, DATE_TIME_TYPE));
                self.add(Field::new(date_time_out_name, DATE_TIME_TYPE));
            }
        }
    }

    fn remove_validity_sources(&mut self, validity: &ValidityMilestoning) {
        let derivation = validity.validity_derivation();
        if !derivation.preserve_source_fields() {
            for source in derivation.source_fields() {
                self.remove(Some(source));
            }
        }
    }

    fn add_validity_milestoning(&mut self, validity: &ValidityMilestoning) {
        self.add(Field::new(validity.date_time_from_name(), DATE_TIME_TYPE).with_primary_key(true));
        self.add(Field::new(validity.date_time_thru_name(), DATE_TIME_TYPE));
    }
}

/// Schema Deriver: staging fields plus the ingest mode give the main fields
pub struct SchemaDeriver<'a> {
    staging: &'a Dataset,
}

impl<'a> SchemaDeriver<'a> {
    pub fn new(staging: &'a Dataset) -> Self {
        Self { staging }
    }

    fn start(&self) -> DerivedFields {
        DerivedFields::from_staging(self.staging)
    }

    fn check_partitions(&self, partition_fields: &[String]) -> Result<(), SchemaMismatchError> {
        match partition_fields
            .iter()
            .find(|field| !self.staging.schema.contains(field))
        {
            Some(field) => Err(SchemaMismatchError::MissingField {
                field: field.clone(),
                purpose: "Partition".to_string(),
                dataset: self.staging.name().to_string(),
            }),
            None => Ok(()),
        }
    }
}

type Derived = Result<Vec<Field>, SchemaMismatchError>;

impl IngestModeVisitor<Derived> for SchemaDeriver<'_> {
    fn visit_append_only(&self, mode: &AppendOnly) -> Derived {
        let mut fields = self.start();
        let audit_is_key = !fields.has_primary_key();
        fields.add_auditing(&mode.auditing, audit_is_key);
        if mode.digest_gen_strategy.generates_digest() {
            fields.add_digest(mode.digest_gen_strategy.digest_field());
        }
        fields.add_batch_id(&mode.batch_id_field);
        fields.remove(mode.versioning_strategy.data_split_field());
        Ok(fields.fields)
    }

    fn visit_nontemporal_snapshot(&self, mode: &NontemporalSnapshot) -> Derived {
        let mut fields = self.start();
        fields.remove(mode.versioning_strategy.data_split_field());
        let audit_is_key = !fields.has_primary_key();
        fields.add_auditing(&mode.auditing, audit_is_key);
        fields.add_batch_id(&mode.batch_id_field);
        Ok(fields.fields)
    }

    fn visit_nontemporal_delta(&self, mode: &NontemporalDelta) -> Derived {
        let mut fields = self.start();
        fields.add_digest(Some(&mode.digest_field));
        fields.remove(mode.versioning_strategy.data_split_field());
        fields.remove(mode.merge_strategy.delete_field());
        fields.add_auditing(&mode.auditing, true);
        fields.add_batch_id(&mode.batch_id_field);
        Ok(fields.fields)
    }

    fn visit_unitemporal_snapshot(&self, mode: &UnitemporalSnapshot) -> Derived {
        self.check_partitions(&mode.partition_fields)?;
        let mut fields = self.start();
        fields.add_digest(Some(&mode.digest_field));
        fields.add_transaction_milestoning(&mode.transaction_milestoning);
        Ok(fields.fields)
    }

    fn visit_unitemporal_delta(&self, mode: &UnitemporalDelta) -> Derived {
        let mut fields = self.start();
        fields.add_digest(mode.digest_field.as_deref());
        fields.remove(mode.versioning_strategy.data_split_field());
        fields.remove(mode.merge_strategy.delete_field());
        fields.add_transaction_milestoning(&mode.transaction_milestoning);
        Ok(fields.fields)
    }

    fn visit_bitemporal_snapshot(&self, mode: &BitemporalSnapshot) -> Derived {
        self.check_partitions(&mode.partition_fields)?;
        let mut fields = self.start();
        fields.add_digest(mode.digest_field.as_deref());
        fields.add_transaction_milestoning(&mode.transaction_milestoning);
        fields.remove_validity_sources(&mode.validity_milestoning);
        fields.add_validity_milestoning(&mode.validity_milestoning);
        Ok(fields.fields)
    }

    fn visit_bitemporal_delta(&self, mode: &BitemporalDelta) -> Derived {
        let mut fields = self.start();
        fields.remove(mode.versioning_strategy.data_split_field());
        fields.remove(mode.merge_strategy.delete_field());
        fields.add_digest(mode.digest_field.as_deref());
        fields.add_transaction_milestoning(&mode.transaction_milestoning);
        fields.remove_validity_sources(&mode.validity_milestoning);
        fields.add_validity_milestoning(&mode.validity_milestoning);
        Ok(fields.fields)
    }

    fn visit_bulk_load(&self, mode: &BulkLoad) -> Derived {
        let mut fields = self.start();
        fields.add_digest(mode.digest_gen_strategy.digest_field());
        fields.add_batch_id(&mode.batch_id_field);
        fields.add_auditing(&mode.auditing, false);
        Ok(fields.fields)
    }

    fn visit_no_op(&self, _: &NoOp) -> Derived {
        Ok(self.start().fields)
    }
}

/// Derive the schema main must have to receive `staging` under `mode`.
///
/// The result keeps the identity of `main` and the physical metadata of
/// `staging`. The same inputs always produce the same schema.
///
/// # Example
///
/// ```rust
/// use ingest_mode_sdk::ingest::{derive_main_schema, TransactionMilestoning, UnitemporalDelta};
/// use ingest_mode_sdk::models::{DataType, Dataset, Field, SchemaDefinition};
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
/// let main = derive_main_schema(&Dataset::named("main"), &staging, &mode).unwrap();
/// let names: Vec<_> = main.schema.fields().iter().map(|f| f.name.as_str()).collect();
/// assert_eq!(names, vec!["id", "digest", "batch_id_in", "batch_id_out"]);
/// ```
pub fn derive_main_schema(
    main: &Dataset,
    staging: &Dataset,
    mode: &IngestMode,
) -> Result<Dataset, SchemaMismatchError> {
    let fields = mode.accept(&SchemaDeriver::new(staging))?;
    debug!(
        "Derived {} field(s) for main dataset '{}' under {}",
        fields.len(),
        main.name(),
        mode.name()
    );
    let schema = staging.schema.clone().with_fields(fields)?;
    Ok(main.clone().with_schema(schema))
}
