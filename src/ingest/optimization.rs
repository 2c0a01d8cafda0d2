//! Optimization columns for delta loads
//!
//! An optimization filter narrows the rows of main scanned by a delta merge to
//! the key range present in the staged batch. The SQL generator substitutes
//! the lower and upper bound patterns with the batch's min and max values.

use super::mode::{
    AppendOnly, BitemporalDelta, BitemporalSnapshot, BulkLoad, NoOp, NontemporalDelta,
    NontemporalSnapshot, UnitemporalDelta, UnitemporalSnapshot,
};
use super::visitor::IngestModeVisitor;
use crate::models::{Dataset, Field};
use crate::validation::input::check_name;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Key-range filter applied to one primary key column
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OptimizationFilter {
    pub field_name: String,
    pub lower_bound_pattern: String,
    pub upper_bound_pattern: String,
    /// Whether rows with a NULL key also match the filter (default: false)
    #[serde(default)]
    pub includes_null_values: bool,
}

impl OptimizationFilter {
    pub fn new(
        field_name: impl Into<String>,
        lower_bound_pattern: impl Into<String>,
        upper_bound_pattern: impl Into<String>,
    ) -> Self {
        Self {
            field_name: field_name.into(),
            lower_bound_pattern: lower_bound_pattern.into(),
            upper_bound_pattern: upper_bound_pattern.into(),
            includes_null_values: false,
        }
    }

    /// Filter with the conventional `{FIELD}_LOWER` / `{FIELD}_UPPER` patterns
    ///
    /// # Example
    ///
    /// ```rust
    /// use ingest_mode_sdk::ingest::OptimizationFilter;
    ///
    /// let filter = OptimizationFilter::for_field("id");
    /// assert_eq!(filter.lower_bound_pattern, "ID_LOWER");
    /// assert_eq!(filter.upper_bound_pattern, "ID_UPPER");
    /// ```
    pub fn for_field(field_name: &str) -> Self {
        let upper = field_name.to_uppercase();
        OptimizationFilter::new(field_name, format!("{}_LOWER", upper), format!("{}_UPPER", upper))
    }

    pub fn with_includes_null_values(mut self, includes_null_values: bool) -> Self {
        self.includes_null_values = includes_null_values;
        self
    }

    pub(crate) fn violations(&self) -> Vec<String> {
        let mut violations = Vec::new();
        check_name(&mut violations, "optimization filter field", &self.field_name);
        if self.lower_bound_pattern.is_empty() || self.upper_bound_pattern.is_empty() {
            violations.push(format!(
                "optimization filter on [{}] needs both bound patterns",
                self.field_name
            ));
        }
        violations
    }
}

/// Primary keys of staging that are also primary keys of main, in staging order
pub fn common_primary_keys<'a>(main: &Dataset, staging: &'a Dataset) -> Vec<&'a Field> {
    staging
        .schema
        .primary_keys()
        .filter(|pk| {
            main.schema
                .field(&pk.name)
                .is_some_and(|main_field| main_field.primary_key)
        })
        .collect()
}

/// Optimization Column Handler: one branch per mode, only `UnitemporalDelta` yields filters
pub struct OptimizationColumnHandler<'a> {
    main: &'a Dataset,
    staging: &'a Dataset,
}

impl<'a> OptimizationColumnHandler<'a> {
    pub fn new(main: &'a Dataset, staging: &'a Dataset) -> Self {
        Self { main, staging }
    }
}

impl IngestModeVisitor<Vec<OptimizationFilter>> for OptimizationColumnHandler<'_> {
    fn visit_append_only(&self, _: &AppendOnly) -> Vec<OptimizationFilter> {
        Vec::new()
    }

    fn visit_nontemporal_snapshot(&self, _: &NontemporalSnapshot) -> Vec<OptimizationFilter> {
        Vec::new()
    }

    fn visit_nontemporal_delta(&self, _: &NontemporalDelta) -> Vec<OptimizationFilter> {
        Vec::new()
    }

    fn visit_unitemporal_snapshot(&self, _: &UnitemporalSnapshot) -> Vec<OptimizationFilter> {
        Vec::new()
    }

    fn visit_unitemporal_delta(&self, mode: &UnitemporalDelta) -> Vec<OptimizationFilter> {
        if !mode.optimization_filters.is_empty() {
            for filter in &mode.optimization_filters {
                if !self.staging.schema.contains(&filter.field_name) {
                    warn!(
                        "Optimization filter field '{}' not found in staging dataset '{}'",
                        filter.field_name,
                        self.staging.name()
                    );
                }
            }
            return mode.optimization_filters.clone();
        }

        let filters: Vec<OptimizationFilter> = common_primary_keys(self.main, self.staging)
            .into_iter()
            .filter(|pk| pk.data_type().supports_optimization())
            .map(|pk| OptimizationFilter::for_field(&pk.name))
            .collect();
        debug!(
            "Derived {} optimization filter(s) for '{}'",
            filters.len(),
            self.main.name()
        );
        filters
    }

    fn visit_bitemporal_snapshot(&self, _: &BitemporalSnapshot) -> Vec<OptimizationFilter> {
        Vec::new()
    }

    fn visit_bitemporal_delta(&self, _: &BitemporalDelta) -> Vec<OptimizationFilter> {
        Vec::new()
    }

    fn visit_bulk_load(&self, _: &BulkLoad) -> Vec<OptimizationFilter> {
        Vec::new()
    }

    fn visit_no_op(&self, _: &NoOp) -> Vec<OptimizationFilter> {
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DataType, SchemaDefinition};

    fn dataset(name: &str, fields: Vec<Field>) -> Dataset {
        Dataset::new(name, SchemaDefinition::new(fields).unwrap())
    }

    #[test]
    fn common_keys_follow_staging_order() {
        let main = dataset(
            "main",
            vec![
                Field::new("b", DataType::Int).with_primary_key(true),
                Field::new("a", DataType::Int).with_primary_key(true),
            ],
        );
        let staging = dataset(
            "staging",
            vec![
                Field::new("a", DataType::Int).with_primary_key(true),
                Field::new("c", DataType::Int).with_primary_key(true),
                Field::new("b", DataType::Int).with_primary_key(true),
            ],
        );
        let names: Vec<_> = common_primary_keys(&main, &staging)
            .iter()
            .map(|f| f.name.as_str())
            .collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn includes_null_values_defaults_to_false() {
        let filter: OptimizationFilter = serde_json::from_str(
            r#"{"field_name": "id", "lower_bound_pattern": "L", "upper_bound_pattern": "U"}"#,
        )
        .unwrap();
        assert!(!filter.includes_null_values);
    }

    #[test]
    fn empty_patterns_are_violations() {
        assert_eq!(OptimizationFilter::new("id", "", "U").violations().len(), 1);
        assert!(OptimizationFilter::for_field("id").violations().is_empty());
    }
}
