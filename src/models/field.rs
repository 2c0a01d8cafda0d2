//! Field model for the SDK

use super::enums::DataType;
use serde::{Deserialize, Serialize};

/// Physical type of a field: semantic type plus optional length and scale
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct FieldType {
    /// Semantic data type
    pub data_type: DataType,
    /// Length or precision (e.g. `VARCHAR(64)`, `DECIMAL(18, 2)`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<u32>,
    /// Scale for fixed-point types
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<u32>,
}

impl FieldType {
    pub fn of(data_type: DataType) -> Self {
        Self {
            data_type,
            length: None,
            scale: None,
        }
    }
}

impl From<DataType> for FieldType {
    fn from(data_type: DataType) -> Self {
        FieldType::of(data_type)
    }
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (self.length, self.scale) {
            (Some(length), Some(scale)) => write!(f, "{}({}, {})", self.data_type, length, scale),
            (Some(length), None) => write!(f, "{}({})", self.data_type, length),
            _ => write!(f, "{}", self.data_type),
        }
    }
}

/// Field model representing a column of a dataset
///
/// Identity is by name within a schema. Primary-key flag and position in the
/// schema are both semantically significant for ingest planning.
///
/// # Example
///
/// ```rust
/// use ingest_mode_sdk::models::{DataType, Field};
///
/// let id = Field::new("id", DataType::Int).with_primary_key(true);
/// assert!(id.primary_key);
/// assert!(!id.nullable);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(from = "FieldSpec")]
pub struct Field {
    /// Field name
    pub name: String,
    /// Field type
    #[serde(rename = "type")]
    pub field_type: FieldType,
    /// Whether the field allows NULL values (default: true)
    pub nullable: bool,
    /// Whether this field is part of the primary key (default: false)
    pub primary_key: bool,
    /// Whether the field carries a unique constraint (default: false)
    pub unique: bool,
    /// Alias used when reading the field from an external source
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_alias: Option<String>,
}

#[derive(Deserialize)]
struct FieldSpec {
    name: String,
    #[serde(rename = "type")]
    field_type: FieldType,
    #[serde(default = "default_true")]
    nullable: bool,
    #[serde(default)]
    primary_key: bool,
    #[serde(default)]
    unique: bool,
    #[serde(default)]
    field_alias: Option<String>,
}

fn default_true() -> bool {
    true
}

impl From<FieldSpec> for Field {
    fn from(spec: FieldSpec) -> Self {
        Field {
            name: spec.name,
            field_type: spec.field_type,
            nullable: spec.nullable,
            primary_key: false,
            unique: spec.unique,
            field_alias: spec.field_alias,
        }
        .with_primary_key(spec.primary_key)
    }
}

impl Field {
    /// Create a nullable, non-key field
    pub fn new(name: impl Into<String>, field_type: impl Into<FieldType>) -> Self {
        Self {
            name: name.into(),
            field_type: field_type.into(),
            nullable: true,
            primary_key: false,
            unique: false,
            field_alias: None,
        }
    }

    /// Set the primary-key flag. Primary key fields are never nullable.
    pub fn with_primary_key(mut self, primary_key: bool) -> Self {
        self.primary_key = primary_key;
        if primary_key {
            self.nullable = false;
        }
        self
    }

    pub fn with_nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn data_type(&self) -> DataType {
        self.field_type.data_type
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_field_defaults() {
        let field = Field::new("name", DataType::String);
        assert!(field.nullable);
        assert!(!field.primary_key);
        assert!(!field.unique);
        assert_eq!(field.data_type(), DataType::String);
    }

    #[test]
    fn field_type_display_includes_precision() {
        let decimal = FieldType {
            data_type: DataType::Decimal,
            length: Some(18),
            scale: Some(2),
        };
        assert_eq!(decimal.to_string(), "DECIMAL(18, 2)");
        assert_eq!(FieldType::of(DataType::Int).to_string(), "INT");
    }

    #[test]
    fn nullable_defaults_to_true_when_absent() {
        let field: Field =
            serde_json::from_str(r#"{"name": "amount", "type": {"data_type": "DOUBLE"}}"#).unwrap();
        assert!(field.nullable);
        assert!(!field.primary_key);
    }

    #[test]
    fn deserialized_primary_key_is_not_nullable() {
        let field: Field = serde_json::from_str(
            r#"{"name": "id", "type": {"data_type": "INT"}, "primary_key": true, "nullable": true}"#,
        )
        .unwrap();
        assert_eq!(field, Field::new("id", DataType::Int).with_primary_key(true));
        assert!(!field.nullable);

        let back: Field = serde_json::from_value(serde_json::to_value(&field).unwrap()).unwrap();
        assert_eq!(back, field);
    }
}
