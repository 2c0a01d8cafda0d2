//! Enums for ingest modelling
//!
//! # Serde Casing Conventions
//!
//! The enums in this module use different serde `rename_all` strategies based on their
//! semantic meaning:
//!
//! - `SCREAMING_SNAKE_CASE`: Technical/database constants (DataType)
//! - `snake_case`: Strategy keywords (DeduplicationStrategy, EmptyDatasetHandling,
//!   VersioningOrder, VersionComparator, CaseConversion)
//!
//! Strategy unions that carry a payload live in the `ingest` module and are
//! internally tagged with a `type` discriminator.

use serde::{Deserialize, Serialize};

/// Semantic column type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DataType {
    Int,
    Integer,
    Bigint,
    Tinyint,
    Smallint,
    Decimal,
    Numeric,
    Float,
    Double,
    Real,
    Char,
    Varchar,
    Longvarchar,
    String,
    Text,
    Date,
    Time,
    Datetime,
    Timestamp,
    TimestampNtz,
    TimestampTz,
    TimestampLtz,
    Boolean,
    Binary,
    Varbinary,
    Json,
    Variant,
}

impl DataType {
    /// Variable-length and fixed character types
    pub fn is_string(&self) -> bool {
        matches!(
            self,
            DataType::Char
                | DataType::Varchar
                | DataType::Longvarchar
                | DataType::String
                | DataType::Text
        )
    }

    /// Types whose values have a total order usable for version comparison
    pub fn is_comparable(&self) -> bool {
        matches!(
            self,
            DataType::Int
                | DataType::Integer
                | DataType::Bigint
                | DataType::Tinyint
                | DataType::Smallint
                | DataType::Decimal
                | DataType::Numeric
                | DataType::Float
                | DataType::Double
                | DataType::Real
                | DataType::Date
                | DataType::Time
                | DataType::Datetime
                | DataType::Timestamp
                | DataType::TimestampNtz
                | DataType::TimestampTz
                | DataType::TimestampLtz
        )
    }

    /// Types a primary key may have to get a synthesized optimization filter
    pub fn supports_optimization(&self) -> bool {
        matches!(
            self,
            DataType::Int
                | DataType::Integer
                | DataType::Bigint
                | DataType::Float
                | DataType::Double
                | DataType::Decimal
                | DataType::Date
        )
    }
}

impl std::fmt::Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            DataType::Int => "INT",
            DataType::Integer => "INTEGER",
            DataType::Bigint => "BIGINT",
            DataType::Tinyint => "TINYINT",
            DataType::Smallint => "SMALLINT",
            DataType::Decimal => "DECIMAL",
            DataType::Numeric => "NUMERIC",
            DataType::Float => "FLOAT",
            DataType::Double => "DOUBLE",
            DataType::Real => "REAL",
            DataType::Char => "CHAR",
            DataType::Varchar => "VARCHAR",
            DataType::Longvarchar => "LONGVARCHAR",
            DataType::String => "STRING",
            DataType::Text => "TEXT",
            DataType::Date => "DATE",
            DataType::Time => "TIME",
            DataType::Datetime => "DATETIME",
            DataType::Timestamp => "TIMESTAMP",
            DataType::TimestampNtz => "TIMESTAMP_NTZ",
            DataType::TimestampTz => "TIMESTAMP_TZ",
            DataType::TimestampLtz => "TIMESTAMP_LTZ",
            DataType::Boolean => "BOOLEAN",
            DataType::Binary => "BINARY",
            DataType::Varbinary => "VARBINARY",
            DataType::Json => "JSON",
            DataType::Variant => "VARIANT",
        };
        f.write_str(name)
    }
}

/// Policy for multiple staged rows sharing the same key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeduplicationStrategy {
    #[default]
    AllowDuplicates,
    FilterDuplicates,
    FailOnDuplicates,
}

/// What a snapshot load does when the staged batch is empty
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyDatasetHandling {
    /// Close out every live row in the target (default)
    #[default]
    DeleteTargetData,
    /// Leave the target untouched
    NoOp,
    /// Reject the batch
    FailEmptyBatch,
}

/// Order in which all-versions loads apply staged versions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VersioningOrder {
    #[default]
    Ascending,
    Descending,
}

/// Comparison a version-column resolver applies against the active version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VersionComparator {
    #[default]
    GreaterThanActiveVersion,
    GreaterThanEqualToActiveVersion,
}

/// Naming convention applied to identifiers for a SQL dialect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseConversion {
    #[default]
    None,
    ToUpper,
    ToLower,
}

impl CaseConversion {
    /// Apply the convention to a single identifier
    pub fn apply(&self, name: &str) -> String {
        match self {
            CaseConversion::None => name.to_string(),
            CaseConversion::ToUpper => name.to_uppercase(),
            CaseConversion::ToLower => name.to_lowercase(),
        }
    }
}

impl std::str::FromStr for CaseConversion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "none" => Ok(CaseConversion::None),
            "to_upper" | "upper" => Ok(CaseConversion::ToUpper),
            "to_lower" | "lower" => Ok(CaseConversion::ToLower),
            _ => Err(format!(
                "Unknown case conversion: {}. Use 'none', 'to_upper' or 'to_lower'.",
                s
            )),
        }
    }
}

impl std::fmt::Display for CaseConversion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CaseConversion::None => write!(f, "none"),
            CaseConversion::ToUpper => write!(f, "to_upper"),
            CaseConversion::ToLower => write!(f, "to_lower"),
        }
    }
}
