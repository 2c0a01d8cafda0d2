//! Transaction and validity milestoning

use crate::validation::input::check_name;
use serde::{Deserialize, Serialize};

/// Columns recording when a row version was live in the warehouse
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TransactionMilestoning {
    BatchId {
        batch_id_in_name: String,
        batch_id_out_name: String,
    },
    DateTime {
        date_time_in_name: String,
        date_time_out_name: String,
    },
    BatchIdAndDateTime {
        batch_id_in_name: String,
        batch_id_out_name: String,
        date_time_in_name: String,
        date_time_out_name: String,
    },
}

impl TransactionMilestoning {
    pub fn batch_id(batch_id_in_name: impl Into<String>, batch_id_out_name: impl Into<String>) -> Self {
        TransactionMilestoning::BatchId {
            batch_id_in_name: batch_id_in_name.into(),
            batch_id_out_name: batch_id_out_name.into(),
        }
    }

    pub fn date_time(date_time_in_name: impl Into<String>, date_time_out_name: impl Into<String>) -> Self {
        TransactionMilestoning::DateTime {
            date_time_in_name: date_time_in_name.into(),
            date_time_out_name: date_time_out_name.into(),
        }
    }

    pub fn batch_id_and_date_time(
        batch_id_in_name: impl Into<String>,
        batch_id_out_name: impl Into<String>,
        date_time_in_name: impl Into<String>,
        date_time_out_name: impl Into<String>,
    ) -> Self {
        TransactionMilestoning::BatchIdAndDateTime {
            batch_id_in_name: batch_id_in_name.into(),
            batch_id_out_name: batch_id_out_name.into(),
            date_time_in_name: date_time_in_name.into(),
            date_time_out_name: date_time_out_name.into(),
        }
    }

    /// Every milestoning column name, in schema order
    pub fn field_names(&self) -> Vec<&str> {
        match self {
            TransactionMilestoning::BatchId {
                batch_id_in_name,
                batch_id_out_name,
            } => vec![batch_id_in_name.as_str(), batch_id_out_name.as_str()],
            TransactionMilestoning::DateTime {
                date_time_in_name,
                date_time_out_name,
            } => vec![date_time_in_name.as_str(), date_time_out_name.as_str()],
            TransactionMilestoning::BatchIdAndDateTime {
                batch_id_in_name,
                batch_id_out_name,
                date_time_in_name,
                date_time_out_name,
            } => vec![
                batch_id_in_name.as_str(),
                batch_id_out_name.as_str(),
                date_time_in_name.as_str(),
                date_time_out_name.as_str(),
            ],
        }
    }

    pub(crate) fn violations(&self) -> Vec<String> {
        let mut violations = Vec::new();
        let names = self.field_names();
        for name in &names {
            check_name(&mut violations, "transaction milestoning field", name);
        }
        for (i, name) in names.iter().enumerate() {
            if names[..i].contains(name) {
                violations.push(format!(
                    "transaction milestoning field [{}] is used more than once",
                    name
                ));
            }
        }
        violations
    }
}

/// How validity start (and optionally end) are read from the staged data
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ValidityDerivation {
    SourceSpecifiesFromDateTime {
        source_date_time_from_field: String,
        #[serde(default)]
        preserve_source_fields: bool,
    },
    SourceSpecifiesFromAndThruDateTime {
        source_date_time_from_field: String,
        source_date_time_thru_field: String,
        #[serde(default)]
        preserve_source_fields: bool,
    },
}

impl ValidityDerivation {
    pub fn source_specifies_from(source_date_time_from_field: impl Into<String>) -> Self {
        ValidityDerivation::SourceSpecifiesFromDateTime {
            source_date_time_from_field: source_date_time_from_field.into(),
            preserve_source_fields: false,
        }
    }

    pub fn source_specifies_from_and_thru(
        source_date_time_from_field: impl Into<String>,
        source_date_time_thru_field: impl Into<String>,
    ) -> Self {
        ValidityDerivation::SourceSpecifiesFromAndThruDateTime {
            source_date_time_from_field: source_date_time_from_field.into(),
            source_date_time_thru_field: source_date_time_thru_field.into(),
            preserve_source_fields: false,
        }
    }

    pub fn with_preserve_source_fields(mut self, preserve: bool) -> Self {
        match &mut self {
            ValidityDerivation::SourceSpecifiesFromDateTime {
                preserve_source_fields,
                ..
            }
            | ValidityDerivation::SourceSpecifiesFromAndThruDateTime {
                preserve_source_fields,
                ..
            } => *preserve_source_fields = preserve,
        }
        self
    }

    pub fn source_fields(&self) -> Vec<&str> {
        match self {
            ValidityDerivation::SourceSpecifiesFromDateTime {
                source_date_time_from_field,
                ..
            } => vec![source_date_time_from_field.as_str()],
            ValidityDerivation::SourceSpecifiesFromAndThruDateTime {
                source_date_time_from_field,
                source_date_time_thru_field,
                ..
            } => vec![
                source_date_time_from_field.as_str(),
                source_date_time_thru_field.as_str(),
            ],
        }
    }

    pub fn preserve_source_fields(&self) -> bool {
        match self {
            ValidityDerivation::SourceSpecifiesFromDateTime {
                preserve_source_fields,
                ..
            }
            | ValidityDerivation::SourceSpecifiesFromAndThruDateTime {
                preserve_source_fields,
                ..
            } => *preserve_source_fields,
        }
    }

    pub fn is_source_specifies_from_only(&self) -> bool {
        matches!(self, ValidityDerivation::SourceSpecifiesFromDateTime { .. })
    }
}

/// Columns recording when a row version is valid in the business domain
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ValidityMilestoning {
    DateTime {
        date_time_from_name: String,
        date_time_thru_name: String,
        validity_derivation: ValidityDerivation,
    },
}

impl ValidityMilestoning {
    pub fn date_time(
        date_time_from_name: impl Into<String>,
        date_time_thru_name: impl Into<String>,
        validity_derivation: ValidityDerivation,
    ) -> Self {
        ValidityMilestoning::DateTime {
            date_time_from_name: date_time_from_name.into(),
            date_time_thru_name: date_time_thru_name.into(),
            validity_derivation,
        }
    }

    pub fn date_time_from_name(&self) -> &str {
        let ValidityMilestoning::DateTime { date_time_from_name, .. } = self;
        date_time_from_name
    }

    pub fn date_time_thru_name(&self) -> &str {
        let ValidityMilestoning::DateTime { date_time_thru_name, .. } = self;
        date_time_thru_name
    }

    pub fn validity_derivation(&self) -> &ValidityDerivation {
        let ValidityMilestoning::DateTime { validity_derivation, .. } = self;
        validity_derivation
    }

    pub(crate) fn violations(&self) -> Vec<String> {
        let mut violations = Vec::new();
        let (from, thru) = (self.date_time_from_name(), self.date_time_thru_name());
        check_name(&mut violations, "validity from field", from);
        check_name(&mut violations, "validity thru field", thru);
        if from == thru {
            violations.push(format!(
                "validity from and thru fields must differ, both are [{}]",
                from
            ));
        }
        let sources = self.validity_derivation().source_fields();
        for source in &sources {
            check_name(&mut violations, "validity source field", source);
        }
        if sources.len() == 2 && sources[0] == sources[1] {
            violations.push(format!(
                "validity source from and thru fields must differ, both are [{}]",
                sources[0]
            ));
        }
        violations
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batch_id_and_date_time_orders_names() {
        let milestoning =
            TransactionMilestoning::batch_id_and_date_time("batch_id_in", "batch_id_out", "in_z", "out_z");
        assert_eq!(
            milestoning.field_names(),
            vec!["batch_id_in", "batch_id_out", "in_z", "out_z"]
        );
    }

    #[test]
    fn in_and_out_names_must_differ() {
        let milestoning = TransactionMilestoning::batch_id("batch", "batch");
        assert_eq!(milestoning.violations().len(), 1);
        assert!(TransactionMilestoning::date_time("in_z", "out_z").violations().is_empty());
    }

    #[test]
    fn validity_accessors_and_checks() {
        let validity = ValidityMilestoning::date_time(
            "valid_from",
            "valid_thru",
            ValidityDerivation::source_specifies_from_and_thru("from_src", "thru_src")
                .with_preserve_source_fields(true),
        );
        assert_eq!(validity.date_time_from_name(), "valid_from");
        assert!(validity.validity_derivation().preserve_source_fields());
        assert_eq!(validity.validity_derivation().source_fields(), vec!["from_src", "thru_src"]);
        assert!(validity.violations().is_empty());

        let clash = ValidityMilestoning::date_time(
            "valid",
            "valid",
            ValidityDerivation::source_specifies_from("from_src"),
        );
        assert_eq!(clash.violations().len(), 1);
    }
}
