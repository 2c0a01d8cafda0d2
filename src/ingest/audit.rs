//! Auditing strategies

use crate::validation::input::check_name;
use serde::{Deserialize, Serialize};

/// Whether loaded rows are stamped with the batch's ingestion time
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Auditing {
    NoAuditing,
    DateTimeAuditing { date_time_field: String },
}

impl Auditing {
    pub fn date_time(date_time_field: impl Into<String>) -> Self {
        Auditing::DateTimeAuditing {
            date_time_field: date_time_field.into(),
        }
    }

    /// Name of the audit column, if any
    pub fn date_time_field(&self) -> Option<&str> {
        match self {
            Auditing::NoAuditing => None,
            Auditing::DateTimeAuditing { date_time_field } => Some(date_time_field.as_str()),
        }
    }

    pub(crate) fn violations(&self) -> Vec<String> {
        let mut violations = Vec::new();
        if let Some(field) = self.date_time_field() {
            check_name(&mut violations, "audit date time field", field);
        }
        violations
    }
}
