//! Merge strategies for delta loads

use crate::validation::input::check_name;
use serde::{Deserialize, Serialize};

/// How a delta load treats staged rows that mark deletions
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MergeStrategy {
    /// Every staged row is an upsert
    #[default]
    NoDeletes,
    /// Rows whose `delete_field` holds one of `delete_values` are deletions
    DeleteIndicator {
        delete_field: String,
        delete_values: Vec<serde_json::Value>,
    },
}

impl MergeStrategy {
    pub fn delete_indicator(delete_field: impl Into<String>, delete_values: Vec<serde_json::Value>) -> Self {
        MergeStrategy::DeleteIndicator {
            delete_field: delete_field.into(),
            delete_values,
        }
    }

    pub fn delete_field(&self) -> Option<&str> {
        match self {
            MergeStrategy::NoDeletes => None,
            MergeStrategy::DeleteIndicator { delete_field, .. } => Some(delete_field.as_str()),
        }
    }

    pub(crate) fn violations(&self) -> Vec<String> {
        let mut violations = Vec::new();
        if let MergeStrategy::DeleteIndicator {
            delete_field,
            delete_values,
        } = self
        {
            check_name(&mut violations, "delete indicator field", delete_field);
            if delete_values.is_empty() {
                violations.push(format!(
                    "delete indicator field [{}] needs at least one delete value",
                    delete_field
                ));
            }
        }
        violations
    }
}
