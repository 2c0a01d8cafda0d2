//! Dataset model for the SDK

use super::field::Field;
use crate::ingest::SchemaMismatchError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Secondary index carried through schema derivation unchanged
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Index {
    pub index_name: String,
    pub columns: Vec<String>,
    #[serde(default)]
    pub unique: bool,
}

/// Cluster key carried through schema derivation unchanged
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClusterKey {
    pub key: String,
}

/// Sharding metadata carried through schema derivation unchanged
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ShardSpecification {
    pub shard_keys: Vec<String>,
    #[serde(default = "default_true")]
    pub is_sharded: bool,
}

/// Column-store metadata carried through schema derivation unchanged
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ColumnStoreSpecification {
    pub column_store: bool,
    #[serde(default)]
    pub column_store_keys: Vec<String>,
}

fn default_true() -> bool {
    true
}

/// Ordered list of uniquely named fields plus physical metadata
///
/// The field list is private so that name uniqueness holds for every value;
/// use [`SchemaDefinition::new`] or [`SchemaDefinition::with_fields`].
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(try_from = "SchemaDefinitionSpec")]
pub struct SchemaDefinition {
    fields: Vec<Field>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub indexes: Vec<Index>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cluster_keys: Vec<ClusterKey>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shard_specification: Option<ShardSpecification>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column_store_specification: Option<ColumnStoreSpecification>,
}

#[derive(Deserialize)]
struct SchemaDefinitionSpec {
    #[serde(default)]
    fields: Vec<Field>,
    #[serde(default)]
    indexes: Vec<Index>,
    #[serde(default)]
    cluster_keys: Vec<ClusterKey>,
    #[serde(default)]
    shard_specification: Option<ShardSpecification>,
    #[serde(default)]
    column_store_specification: Option<ColumnStoreSpecification>,
}

impl TryFrom<SchemaDefinitionSpec> for SchemaDefinition {
    type Error = SchemaMismatchError;

    fn try_from(spec: SchemaDefinitionSpec) -> Result<Self, Self::Error> {
        let schema = SchemaDefinition {
            fields: Vec::new(),
            indexes: spec.indexes,
            cluster_keys: spec.cluster_keys,
            shard_specification: spec.shard_specification,
            column_store_specification: spec.column_store_specification,
        };
        schema.with_fields(spec.fields)
    }
}

impl SchemaDefinition {
    /// Create a schema from fields, rejecting duplicate names
    ///
    /// # Example
    ///
    /// ```rust
    /// use ingest_mode_sdk::models::{DataType, Field, SchemaDefinition};
    ///
    /// let schema = SchemaDefinition::new(vec![
    ///     Field::new("id", DataType::Int).with_primary_key(true),
    ///     Field::new("name", DataType::String),
    /// ])
    /// .unwrap();
    /// assert!(schema.has_primary_key());
    ///
    /// let duplicate = SchemaDefinition::new(vec![
    ///     Field::new("id", DataType::Int),
    ///     Field::new("id", DataType::String),
    /// ]);
    /// assert!(duplicate.is_err());
    /// ```
    pub fn new(fields: Vec<Field>) -> Result<Self, SchemaMismatchError> {
        SchemaDefinition::default().with_fields(fields)
    }

    /// Replace the field list, keeping every piece of physical metadata
    pub fn with_fields(mut self, fields: Vec<Field>) -> Result<Self, SchemaMismatchError> {
        let mut seen = HashSet::new();
        for field in &fields {
            if !seen.insert(field.name.as_str()) {
                return Err(SchemaMismatchError::DuplicateField(field.name.clone()));
            }
        }
        self.fields = fields;
        Ok(self)
    }

    /// Append `field` unless a field of the same name is already present
    pub fn with_field_if_absent(mut self, field: Field) -> Self {
        if !self.contains(&field.name) {
            self.fields.push(field);
        }
        self
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.field(name).is_some()
    }

    pub fn has_primary_key(&self) -> bool {
        self.fields.iter().any(|f| f.primary_key)
    }

    pub fn primary_keys(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter().filter(|f| f.primary_key)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Rename every field and every metadata key with `convert`.
    ///
    /// Fields whose converted names collide keep the first occurrence.
    pub fn apply_case<F: Fn(&str) -> String>(&self, convert: F) -> Self {
        let mut seen = HashSet::new();
        let fields = self
            .fields
            .iter()
            .map(|f| f.clone().with_name(convert(&f.name)))
            .filter(|f| seen.insert(f.name.clone()))
            .collect();
        SchemaDefinition {
            fields,
            indexes: self
                .indexes
                .iter()
                .map(|index| Index {
                    index_name: convert(&index.index_name),
                    columns: index.columns.iter().map(|c| convert(c)).collect(),
                    unique: index.unique,
                })
                .collect(),
            cluster_keys: self
                .cluster_keys
                .iter()
                .map(|k| ClusterKey { key: convert(&k.key) })
                .collect(),
            shard_specification: self.shard_specification.as_ref().map(|s| ShardSpecification {
                shard_keys: s.shard_keys.iter().map(|k| convert(k)).collect(),
                is_sharded: s.is_sharded,
            }),
            column_store_specification: self.column_store_specification.as_ref().map(|c| {
                ColumnStoreSpecification {
                    column_store: c.column_store,
                    column_store_keys: c.column_store_keys.iter().map(|k| convert(k)).collect(),
                }
            }),
        }
    }
}

/// Identifying reference of a dataset
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct DatasetReference {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
}

/// A named relation: reference plus schema
///
/// Staging and main datasets share this type; they differ only by role.
///
/// # Example
///
/// ```rust
/// use ingest_mode_sdk::models::{DataType, Dataset, Field, SchemaDefinition};
///
/// let staging = Dataset::new(
///     "staging",
///     SchemaDefinition::new(vec![Field::new("id", DataType::Int).with_primary_key(true)]).unwrap(),
/// )
/// .with_database("mydb")
/// .with_alias("stage");
/// assert_eq!(staging.reference.database.as_deref(), Some("mydb"));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Dataset {
    #[serde(flatten)]
    pub reference: DatasetReference,
    #[serde(default)]
    pub schema: SchemaDefinition,
}

impl Dataset {
    pub fn new(name: impl Into<String>, schema: SchemaDefinition) -> Self {
        Self {
            reference: DatasetReference {
                name: name.into(),
                ..Default::default()
            },
            schema,
        }
    }

    /// A dataset known only by name, with no fields yet
    pub fn named(name: impl Into<String>) -> Self {
        Dataset::new(name, SchemaDefinition::default())
    }

    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.reference.database = Some(database.into());
        self
    }

    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.reference.group = Some(group.into());
        self
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.reference.alias = Some(alias.into());
        self
    }

    pub fn with_schema(mut self, schema: SchemaDefinition) -> Self {
        self.schema = schema;
        self
    }

    pub fn name(&self) -> &str {
        &self.reference.name
    }

    /// Rename database, group, name and every field with `convert`.
    /// Aliases are query-local and keep their spelling.
    pub fn apply_case<F: Fn(&str) -> String>(&self, convert: F) -> Self {
        Dataset {
            reference: DatasetReference {
                database: self.reference.database.as_deref().map(&convert),
                group: self.reference.group.as_deref().map(&convert),
                name: convert(&self.reference.name),
                alias: self.reference.alias.clone(),
            },
            schema: self.schema.apply_case(&convert),
        }
    }
}

/// The datasets taking part in one ingest run
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Datasets {
    pub main_dataset: Dataset,
    pub staging_dataset: Dataset,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temp_dataset: Option<Dataset>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temp_dataset_with_delete_indicator: Option<Dataset>,
}

impl Datasets {
    pub fn of(main_dataset: Dataset, staging_dataset: Dataset) -> Self {
        Self {
            main_dataset,
            staging_dataset,
            temp_dataset: None,
            temp_dataset_with_delete_indicator: None,
        }
    }

    pub fn with_main_dataset(mut self, main_dataset: Dataset) -> Self {
        self.main_dataset = main_dataset;
        self
    }

    pub fn with_temp_dataset(mut self, temp_dataset: Dataset) -> Self {
        self.temp_dataset = Some(temp_dataset);
        self
    }

    pub fn with_temp_dataset_with_delete_indicator(mut self, dataset: Dataset) -> Self {
        self.temp_dataset_with_delete_indicator = Some(dataset);
        self
    }

    pub fn apply_case<F: Fn(&str) -> String>(&self, convert: F) -> Self {
        Datasets {
            main_dataset: self.main_dataset.apply_case(&convert),
            staging_dataset: self.staging_dataset.apply_case(&convert),
            temp_dataset: self.temp_dataset.as_ref().map(|d| d.apply_case(&convert)),
            temp_dataset_with_delete_indicator: self
                .temp_dataset_with_delete_indicator
                .as_ref()
                .map(|d| d.apply_case(&convert)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::enums::DataType;

    fn staging() -> Dataset {
        Dataset::new(
            "staging",
            SchemaDefinition::new(vec![
                Field::new("id", DataType::Int).with_primary_key(true),
                Field::new("name", DataType::String),
            ])
            .unwrap(),
        )
        .with_database("mydb")
        .with_alias("stage")
    }

    #[test]
    fn rejects_duplicate_field_names() {
        let err = SchemaDefinition::new(vec![
            Field::new("id", DataType::Int),
            Field::new("id", DataType::Bigint),
        ])
        .unwrap_err();
        assert_eq!(err, SchemaMismatchError::DuplicateField("id".to_string()));
    }

    #[test]
    fn with_field_if_absent_keeps_names_unique() {
        let schema = staging()
            .schema
            .with_field_if_absent(Field::new("name", DataType::Boolean))
            .with_field_if_absent(Field::new("deleted", DataType::Boolean));
        let names: Vec<_> = schema.fields().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["id", "name", "deleted"]);
        assert_eq!(schema.field("name").unwrap().data_type(), DataType::String);
    }

    #[test]
    fn deserialization_enforces_unique_names() {
        let json = r#"{"fields": [
            {"name": "id", "type": {"data_type": "INT"}},
            {"name": "id", "type": {"data_type": "INT"}}
        ]}"#;
        assert!(serde_json::from_str::<SchemaDefinition>(json).is_err());
    }

    #[test]
    fn apply_case_renames_reference_and_fields() {
        let upper = staging().apply_case(|s| s.to_uppercase());
        assert_eq!(upper.name(), "STAGING");
        assert_eq!(upper.reference.database.as_deref(), Some("MYDB"));
        assert_eq!(upper.reference.alias.as_deref(), Some("stage"));
        let names: Vec<_> = upper.schema.fields().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["ID", "NAME"]);
        assert!(upper.schema.field("ID").unwrap().primary_key);
    }

    #[test]
    fn dataset_serializes_reference_flat() {
        let value = serde_json::to_value(staging()).unwrap();
        assert_eq!(value["name"], "staging");
        assert_eq!(value["database"], "mydb");
        assert_eq!(value["schema"]["fields"][0]["name"], "id");
    }
}
