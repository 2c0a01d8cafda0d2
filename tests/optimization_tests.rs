//! Optimization column derivation

use ingest_mode_sdk::ingest::{
    Auditing, IngestMode, NontemporalDelta, OptimizationFilter, TransactionMilestoning,
    UnitemporalDelta, derive_optimization_filters,
};
use ingest_mode_sdk::models::{DataType, Dataset, Field, SchemaDefinition};

fn dataset(name: &str, fields: Vec<Field>) -> Dataset {
    Dataset::new(name, SchemaDefinition::new(fields).unwrap())
}

fn unitemporal_delta(filters: Vec<OptimizationFilter>) -> IngestMode {
    UnitemporalDelta::builder()
        .digest_field("digest")
        .transaction_milestoning(TransactionMilestoning::batch_id("batch_id_in", "batch_id_out"))
        .optimization_filters(filters)
        .build()
        .unwrap()
        .into()
}

mod synthesized_tests {
    use super::*;

    #[test]
    fn test_int_key_gets_filter() {
        let fields = vec![
            Field::new("id", DataType::Int).with_primary_key(true),
            Field::new("name", DataType::String),
        ];
        let main = dataset("main", fields.clone());
        let staging = dataset("staging", fields);

        let filters = derive_optimization_filters(&unitemporal_delta(vec![]), &main, &staging);
        assert_eq!(filters, vec![OptimizationFilter::new("id", "ID_LOWER", "ID_UPPER")]);
        assert!(!filters[0].includes_null_values);
    }

    #[test]
    fn test_string_key_gets_no_filter() {
        let fields = vec![Field::new("id", DataType::String).with_primary_key(true)];
        let main = dataset("main", fields.clone());
        let staging = dataset("staging", fields);

        let filters = derive_optimization_filters(&unitemporal_delta(vec![]), &main, &staging);
        assert!(filters.is_empty());
    }

    #[test]
    fn test_only_common_keys_qualify() {
        let main = dataset(
            "main",
            vec![
                Field::new("id", DataType::Int).with_primary_key(true),
                Field::new("biz_date", DataType::Date),
            ],
        );
        let staging = dataset(
            "staging",
            vec![
                Field::new("id", DataType::Int).with_primary_key(true),
                Field::new("biz_date", DataType::Date).with_primary_key(true),
            ],
        );

        let filters = derive_optimization_filters(&unitemporal_delta(vec![]), &main, &staging);
        let names: Vec<_> = filters.iter().map(|f| f.field_name.as_str()).collect();
        assert_eq!(names, vec!["id"]);
    }
}

mod pass_through_tests {
    use super::*;

    #[test]
    fn test_explicit_filters_are_kept() {
        let explicit = vec![
            OptimizationFilter::new("biz_date", "{LOW}", "{HIGH}").with_includes_null_values(true),
        ];
        let fields = vec![Field::new("id", DataType::Int).with_primary_key(true)];
        let main = dataset("main", fields.clone());
        let staging = dataset("staging", fields);

        let filters = derive_optimization_filters(&unitemporal_delta(explicit.clone()), &main, &staging);
        assert_eq!(filters, explicit);
    }

    #[test]
    fn test_other_modes_yield_nothing() {
        let fields = vec![Field::new("id", DataType::Int).with_primary_key(true)];
        let main = dataset("main", fields.clone());
        let staging = dataset("staging", fields);
        let mode: IngestMode = NontemporalDelta::builder()
            .digest_field("digest")
            .auditing(Auditing::NoAuditing)
            .build()
            .unwrap()
            .into();

        assert!(derive_optimization_filters(&mode, &main, &staging).is_empty());
    }
}
