//! Digest generation strategies

use crate::models::DataType;
use crate::validation::input::{check_name, validate_udf_name};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// How the per-row digest column of an append-only or bulk load is produced
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DigestGenStrategy {
    /// No digest column
    NoDigestGen,
    /// A UDF computes the digest over the staged columns
    UdfBased {
        digest_udf_name: String,
        digest_field: String,
        /// Columns left out of the digest input
        #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
        fields_to_exclude_from_digest: BTreeSet<String>,
        /// UDF used to cast a column of the given type to string before hashing
        #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
        type_conversion_udf_names: BTreeMap<DataType, String>,
        /// UDF that joins column names and values into the digest input
        #[serde(default, skip_serializing_if = "Option::is_none")]
        column_name_value_concat_udf_name: Option<String>,
    },
    /// The staged data already carries the digest column
    UserProvided { digest_field: String },
}

impl DigestGenStrategy {
    pub fn udf_based(digest_udf_name: impl Into<String>, digest_field: impl Into<String>) -> Self {
        DigestGenStrategy::UdfBased {
            digest_udf_name: digest_udf_name.into(),
            digest_field: digest_field.into(),
            fields_to_exclude_from_digest: BTreeSet::new(),
            type_conversion_udf_names: BTreeMap::new(),
            column_name_value_concat_udf_name: None,
        }
    }

    pub fn user_provided(digest_field: impl Into<String>) -> Self {
        DigestGenStrategy::UserProvided {
            digest_field: digest_field.into(),
        }
    }

    pub fn digest_field(&self) -> Option<&str> {
        match self {
            DigestGenStrategy::NoDigestGen => None,
            DigestGenStrategy::UdfBased { digest_field, .. }
            | DigestGenStrategy::UserProvided { digest_field } => Some(digest_field.as_str()),
        }
    }

    /// Whether the load computes the digest (as opposed to reading it from staging)
    pub fn generates_digest(&self) -> bool {
        matches!(self, DigestGenStrategy::UdfBased { .. })
    }

    pub(crate) fn violations(&self) -> Vec<String> {
        let mut violations = Vec::new();
        match self {
            DigestGenStrategy::NoDigestGen => {}
            DigestGenStrategy::UserProvided { digest_field } => {
                check_name(&mut violations, "digest field", digest_field);
            }
            DigestGenStrategy::UdfBased {
                digest_udf_name,
                digest_field,
                fields_to_exclude_from_digest,
                type_conversion_udf_names,
                column_name_value_concat_udf_name,
            } => {
                check_name(&mut violations, "digest field", digest_field);
                if let Err(e) = validate_udf_name("digest UDF name", digest_udf_name) {
                    violations.push(e.to_string());
                }
                for field in fields_to_exclude_from_digest {
                    check_name(&mut violations, "digest exclusion field", field);
                }
                if fields_to_exclude_from_digest.contains(digest_field) {
                    violations.push(format!(
                        "digest field [{}] cannot be excluded from its own digest",
                        digest_field
                    ));
                }
                for udf in type_conversion_udf_names.values() {
                    if let Err(e) = validate_udf_name("type conversion UDF name", udf) {
                        violations.push(e.to_string());
                    }
                }
                if let Some(udf) = column_name_value_concat_udf_name
                    && let Err(e) = validate_udf_name("column name value concat UDF name", udf)
                {
                    violations.push(e.to_string());
                }
            }
        }
        violations
    }
}
