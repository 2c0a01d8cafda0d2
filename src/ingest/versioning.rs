//! Versioning strategies and merge-data-version resolvers

use crate::models::{VersionComparator, VersioningOrder};
use crate::validation::input::check_name;
use serde::{Deserialize, Serialize};

/// Default name of the column that splits staged versions into sub-batches
pub const DEFAULT_DATA_SPLIT_FIELD: &str = "data_split";

/// How a staged version is judged newer than the version already in main
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MergeDataVersionResolver {
    /// Any digest change counts as a new version
    DigestBased,
    /// The versioning column is compared against the active version
    VersionColumnBased {
        #[serde(default)]
        version_comparator: VersionComparator,
    },
}

impl MergeDataVersionResolver {
    pub fn version_column(version_comparator: VersionComparator) -> Self {
        MergeDataVersionResolver::VersionColumnBased { version_comparator }
    }
}

/// How multiple staged versions of the same key are handled
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum VersioningStrategy {
    #[default]
    NoVersioning,
    /// Keep only the highest version per key
    MaxVersion {
        versioning_field: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        merge_data_version_resolver: Option<MergeDataVersionResolver>,
        #[serde(default = "default_true")]
        perform_stage_versioning: bool,
    },
    /// Load every version, one data split at a time
    AllVersions {
        versioning_field: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        merge_data_version_resolver: Option<MergeDataVersionResolver>,
        #[serde(default)]
        versioning_order: VersioningOrder,
        #[serde(default = "default_data_split_field")]
        data_split_field: String,
        #[serde(default = "default_true")]
        perform_stage_versioning: bool,
    },
}

fn default_true() -> bool {
    true
}

fn default_data_split_field() -> String {
    DEFAULT_DATA_SPLIT_FIELD.to_string()
}

impl VersioningStrategy {
    /// Max-version strategy with stage versioning on and no resolver
    pub fn max_version(versioning_field: impl Into<String>) -> Self {
        VersioningStrategy::MaxVersion {
            versioning_field: versioning_field.into(),
            merge_data_version_resolver: None,
            perform_stage_versioning: true,
        }
    }

    /// All-versions strategy with the default data split field and no resolver
    pub fn all_versions(versioning_field: impl Into<String>) -> Self {
        VersioningStrategy::AllVersions {
            versioning_field: versioning_field.into(),
            merge_data_version_resolver: None,
            versioning_order: VersioningOrder::default(),
            data_split_field: default_data_split_field(),
            perform_stage_versioning: true,
        }
    }

    /// Attach a resolver; no effect on `NoVersioning`
    pub fn with_resolver(mut self, resolver: MergeDataVersionResolver) -> Self {
        match &mut self {
            VersioningStrategy::NoVersioning => {}
            VersioningStrategy::MaxVersion {
                merge_data_version_resolver,
                ..
            }
            | VersioningStrategy::AllVersions {
                merge_data_version_resolver,
                ..
            } => *merge_data_version_resolver = Some(resolver),
        }
        self
    }

    pub fn name(&self) -> &'static str {
        match self {
            VersioningStrategy::NoVersioning => "NoVersioning",
            VersioningStrategy::MaxVersion { .. } => "MaxVersion",
            VersioningStrategy::AllVersions { .. } => "AllVersions",
        }
    }

    pub fn is_no_versioning(&self) -> bool {
        matches!(self, VersioningStrategy::NoVersioning)
    }

    pub fn versioning_field(&self) -> Option<&str> {
        match self {
            VersioningStrategy::NoVersioning => None,
            VersioningStrategy::MaxVersion { versioning_field, .. }
            | VersioningStrategy::AllVersions { versioning_field, .. } => Some(versioning_field.as_str()),
        }
    }

    pub fn merge_data_version_resolver(&self) -> Option<&MergeDataVersionResolver> {
        match self {
            VersioningStrategy::NoVersioning => None,
            VersioningStrategy::MaxVersion {
                merge_data_version_resolver,
                ..
            }
            | VersioningStrategy::AllVersions {
                merge_data_version_resolver,
                ..
            } => merge_data_version_resolver.as_ref(),
        }
    }

    /// Present only for `AllVersions`
    pub fn data_split_field(&self) -> Option<&str> {
        match self {
            VersioningStrategy::AllVersions { data_split_field, .. } => Some(data_split_field.as_str()),
            _ => None,
        }
    }

    pub(crate) fn violations(&self) -> Vec<String> {
        let mut violations = Vec::new();
        if let Some(field) = self.versioning_field() {
            check_name(&mut violations, "versioning field", field);
        }
        if let Some(split) = self.data_split_field() {
            check_name(&mut violations, "data split field", split);
            if Some(split) == self.versioning_field() {
                violations.push(format!(
                    "data split field [{}] must differ from the versioning field",
                    split
                ));
            }
        }
        violations
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_versions_defaults() {
        let json = r#"{"type": "all_versions", "versioning_field": "version"}"#;
        let strategy: VersioningStrategy = serde_json::from_str(json).unwrap();
        assert_eq!(strategy, VersioningStrategy::all_versions("version"));
        assert_eq!(strategy.data_split_field(), Some("data_split"));
        assert_eq!(strategy.merge_data_version_resolver(), None);
    }

    #[test]
    fn data_split_only_for_all_versions() {
        assert_eq!(VersioningStrategy::max_version("version").data_split_field(), None);
        assert_eq!(VersioningStrategy::NoVersioning.data_split_field(), None);
    }

    #[test]
    fn with_resolver_sets_resolver() {
        let strategy = VersioningStrategy::max_version("version")
            .with_resolver(MergeDataVersionResolver::DigestBased);
        assert_eq!(
            strategy.merge_data_version_resolver(),
            Some(&MergeDataVersionResolver::DigestBased)
        );
        assert_eq!(
            VersioningStrategy::NoVersioning.with_resolver(MergeDataVersionResolver::DigestBased),
            VersioningStrategy::NoVersioning
        );
    }

    #[test]
    fn data_split_must_differ_from_versioning_field() {
        let strategy = VersioningStrategy::AllVersions {
            versioning_field: "v".to_string(),
            merge_data_version_resolver: None,
            versioning_order: VersioningOrder::Ascending,
            data_split_field: "v".to_string(),
            perform_stage_versioning: true,
        };
        assert_eq!(strategy.violations().len(), 1);
    }
}
