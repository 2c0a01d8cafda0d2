//! Temp dataset enrichment

use ingest_mode_sdk::ingest::{
    BitemporalDelta, IngestMode, MergeStrategy, NoOp, TEMP_DATASET_ALIAS,
    TEMP_DATASET_WITH_DELETE_INDICATOR_ALIAS, TransactionMilestoning, ValidityDerivation,
    ValidityMilestoning, enrich_temp_datasets,
};
use ingest_mode_sdk::models::{DataType, Dataset, Datasets, Field, SchemaDefinition};

fn datasets() -> Datasets {
    let main = Dataset::new(
        "accounts",
        SchemaDefinition::new(vec![
            Field::new("id", DataType::Int).with_primary_key(true),
            Field::new("valid_from", DataType::Datetime).with_primary_key(true),
            Field::new("valid_thru", DataType::Datetime),
        ])
        .unwrap(),
    )
    .with_database("warehouse");
    Datasets::of(main, Dataset::named("accounts_staging"))
}

fn bitemporal_delta(merge: MergeStrategy) -> IngestMode {
    BitemporalDelta::builder()
        .digest_field("digest")
        .transaction_milestoning(TransactionMilestoning::batch_id("batch_id_in", "batch_id_out"))
        .validity_milestoning(ValidityMilestoning::date_time(
            "valid_from",
            "valid_thru",
            ValidityDerivation::source_specifies_from("source_from"),
        ))
        .merge_strategy(merge)
        .build()
        .unwrap()
        .into()
}

mod enrichment_tests {
    use super::*;

    #[test]
    fn test_source_from_only_adds_temp() {
        let enriched = enrich_temp_datasets(&datasets(), &bitemporal_delta(MergeStrategy::NoDeletes));

        let temp = enriched.temp_dataset.as_ref().unwrap();
        assert_eq!(temp.name(), format!("accounts_{}", TEMP_DATASET_ALIAS));
        assert_eq!(temp.reference.database.as_deref(), Some("warehouse"));
        assert_eq!(temp.schema.fields(), datasets().main_dataset.schema.fields());
        assert!(enriched.temp_dataset_with_delete_indicator.is_none());
        assert_eq!(enriched.main_dataset, datasets().main_dataset);
        assert_eq!(enriched.staging_dataset, datasets().staging_dataset);
    }

    #[test]
    fn test_delete_indicator_adds_second_temp() {
        let merge = MergeStrategy::delete_indicator("is_deleted", vec![serde_json::json!(true)]);
        let enriched = enrich_temp_datasets(&datasets(), &bitemporal_delta(merge));

        let temp = enriched.temp_dataset_with_delete_indicator.unwrap();
        assert_eq!(temp.name(), format!("accounts_{}", TEMP_DATASET_WITH_DELETE_INDICATOR_ALIAS));
        assert_eq!(temp.reference.alias.as_deref(), Some(TEMP_DATASET_WITH_DELETE_INDICATOR_ALIAS));
        let names: Vec<_> = temp.schema.fields().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["id", "valid_from", "valid_thru", "is_deleted"]);
        assert!(enriched.temp_dataset.is_some());
    }

    #[test]
    fn test_other_modes_pass_through() {
        assert_eq!(
            enrich_temp_datasets(&datasets(), &IngestMode::from(NoOp::default())),
            datasets()
        );
    }
}
