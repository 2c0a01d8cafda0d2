//! Error types for ingest mode construction and schema derivation

use serde::{Deserialize, Serialize};

/// An ingest mode (or one of its parts) could not be built.
///
/// Every violated rule is collected before the error is raised, so a single
/// error describes everything that must change in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("Cannot build {ingest_mode}, {}", violations.join("; "))]
pub struct ConstructionError {
    /// Name of the value that failed to build (e.g. `UnitemporalSnapshot`)
    pub ingest_mode: String,
    /// Human readable description of each violation
    pub violations: Vec<String>,
}

impl ConstructionError {
    pub fn new(ingest_mode: impl Into<String>, violations: Vec<String>) -> Self {
        Self {
            ingest_mode: ingest_mode.into(),
            violations,
        }
    }

    /// Whether any violation message mentions `needle`
    pub fn mentions(&self, needle: &str) -> bool {
        self.violations.iter().any(|v| v.contains(needle))
    }
}

/// Turn collected violations into a result, failing only when there are any.
pub(crate) fn ensure_valid(ingest_mode: &str, violations: Vec<String>) -> Result<(), ConstructionError> {
    if violations.is_empty() {
        Ok(())
    } else {
        Err(ConstructionError::new(ingest_mode, violations))
    }
}

/// A field referenced by the ingest mode does not fit the schema it is applied to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum SchemaMismatchError {
    /// A referenced field is absent from the schema
    #[error("{purpose} field [{field}] not found in {dataset} schema")]
    MissingField {
        field: String,
        purpose: String,
        dataset: String,
    },

    /// Two fields of one schema share a name
    #[error("Duplicate field [{0}] in schema")]
    DuplicateField(String),

    /// A referenced field has a type that cannot serve its purpose
    #[error("{purpose} field [{field}] has unsupported data type [{data_type}]")]
    UnsupportedDataType {
        field: String,
        data_type: String,
        purpose: String,
    },

    /// A field is (or is not) a primary key where the ingest mode requires otherwise
    #[error("Field [{field}]: {reason}")]
    PrimaryKeyConflict { field: String, reason: String },

    /// The ingest mode needs primary keys but the datasets have none in common
    #[error("Primary key list must not be empty: {0}")]
    MissingPrimaryKeys(String),
}

/// Umbrella error for the planner façade
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error(transparent)]
    Construction(#[from] ConstructionError),

    #[error("Schema mismatch: {}", .0.iter().map(|e| e.to_string()).collect::<Vec<_>>().join("; "))]
    SchemaMismatch(Vec<SchemaMismatchError>),

    #[cfg(feature = "config")]
    #[error(transparent)]
    Config(#[from] crate::config::ConfigError),
}

impl From<SchemaMismatchError> for IngestError {
    fn from(err: SchemaMismatchError) -> Self {
        IngestError::SchemaMismatch(vec![err])
    }
}
