//! Construction rules of the ingest modes

use ingest_mode_sdk::ingest::{
    AppendOnly, Auditing, BitemporalDelta, BitemporalSnapshot, BulkLoad, DigestGenStrategy,
    IngestMode, IngestModeVisitor, MergeDataVersionResolver, MergeStrategy, NoOp,
    NontemporalDelta, NontemporalSnapshot, TransactionMilestoning, UnitemporalDelta,
    UnitemporalSnapshot, ValidityDerivation, ValidityMilestoning, VersioningStrategy,
};
use ingest_mode_sdk::models::DeduplicationStrategy;

fn batch_id_milestoning() -> TransactionMilestoning {
    TransactionMilestoning::batch_id("batch_id_in", "batch_id_out")
}

fn validity() -> ValidityMilestoning {
    ValidityMilestoning::date_time(
        "valid_from",
        "valid_thru",
        ValidityDerivation::source_specifies_from("source_from"),
    )
}

mod append_only_tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let mode = AppendOnly::builder()
            .digest_gen_strategy(DigestGenStrategy::NoDigestGen)
            .auditing(Auditing::NoAuditing)
            .build()
            .unwrap();
        assert_eq!(mode.batch_id_field(), "batch_id");
        assert!(!mode.filter_existing_records());
        let mode: IngestMode = mode.into();
        assert_eq!(mode.deduplication_strategy(), DeduplicationStrategy::AllowDuplicates);
        assert!(mode.versioning_strategy().is_no_versioning());
    }

    #[test]
    fn test_missing_attributes_are_listed_together() {
        let err = AppendOnly::builder().build().unwrap_err();
        assert_eq!(err.ingest_mode, "AppendOnly");
        assert!(err.mentions("some of required attributes are not set [digest_gen_strategy, auditing]"));
    }

    #[test]
    fn test_filter_existing_records_needs_digest() {
        let err = AppendOnly::builder()
            .digest_gen_strategy(DigestGenStrategy::NoDigestGen)
            .auditing(Auditing::NoAuditing)
            .filter_existing_records(true)
            .build()
            .unwrap_err();
        assert!(err.mentions("filter existing records requires a digest"));
    }
}

mod snapshot_tests {
    use super::*;

    #[test]
    fn test_nontemporal_snapshot_requires_auditing() {
        let err = NontemporalSnapshot::builder().build().unwrap_err();
        assert!(err.mentions("auditing"));
    }

    #[test]
    fn test_unitemporal_snapshot_partition_key_must_be_listed() {
        let err = UnitemporalSnapshot::builder()
            .digest_field("digest")
            .transaction_milestoning(batch_id_milestoning())
            .partition_fields(vec!["business_date".to_string()])
            .partition_value("biz_date", "2024-01-01")
            .build()
            .unwrap_err();
        assert!(err.mentions("partition key [biz_date] not specified in partition fields"));
    }

    #[test]
    fn test_unitemporal_snapshot_partition_values_accumulate() {
        let mode = UnitemporalSnapshot::builder()
            .digest_field("digest")
            .transaction_milestoning(batch_id_milestoning())
            .partition_fields(vec!["biz_date".to_string()])
            .partition_value("biz_date", "2024-01-01")
            .partition_value("biz_date", "2024-01-02")
            .build()
            .unwrap();
        assert_eq!(mode.partition_values_by_field()["biz_date"].len(), 2);
    }

    #[test]
    fn test_unitemporal_snapshot_rejects_all_versions() {
        let err = UnitemporalSnapshot::builder()
            .digest_field("digest")
            .transaction_milestoning(batch_id_milestoning())
            .versioning_strategy(VersioningStrategy::all_versions("version"))
            .build()
            .unwrap_err();
        assert!(err.mentions("AllVersions versioning strategy is not supported for UnitemporalSnapshot"));
    }

    #[test]
    fn test_bitemporal_snapshot_requires_both_milestonings() {
        let err = BitemporalSnapshot::builder().build().unwrap_err();
        assert!(err.mentions("transaction_milestoning"));
        assert!(err.mentions("validity_milestoning"));

        let mode = BitemporalSnapshot::builder()
            .transaction_milestoning(batch_id_milestoning())
            .validity_milestoning(validity())
            .build();
        assert!(mode.is_ok());
    }
}

mod delta_tests {
    use super::*;

    #[test]
    fn test_nontemporal_delta_requires_digest_and_auditing() {
        let err = NontemporalDelta::builder().build().unwrap_err();
        assert!(err.mentions("digest_field"));
        assert!(err.mentions("auditing"));
    }

    #[test]
    fn test_versioning_needs_resolver() {
        let err = NontemporalDelta::builder()
            .digest_field("digest")
            .auditing(Auditing::NoAuditing)
            .versioning_strategy(VersioningStrategy::max_version("version"))
            .build()
            .unwrap_err();
        assert!(err.mentions("merge data version resolver is mandatory for MaxVersion versioning strategy"));
    }

    #[test]
    fn test_unitemporal_delta_without_digest() {
        let err = UnitemporalDelta::builder()
            .transaction_milestoning(batch_id_milestoning())
            .build()
            .unwrap_err();
        assert!(err.mentions("digest field is mandatory for UnitemporalDelta with NoVersioning"));

        let mode = UnitemporalDelta::builder()
            .transaction_milestoning(batch_id_milestoning())
            .versioning_strategy(
                VersioningStrategy::max_version("version").with_resolver(
                    MergeDataVersionResolver::version_column(Default::default()),
                ),
            )
            .build()
            .unwrap();
        assert_eq!(mode.digest_field(), None);
    }

    #[test]
    fn test_delete_indicator_needs_values() {
        let err = UnitemporalDelta::builder()
            .digest_field("digest")
            .transaction_milestoning(batch_id_milestoning())
            .merge_strategy(MergeStrategy::delete_indicator("deleted", vec![]))
            .build()
            .unwrap_err();
        assert_eq!(err.ingest_mode, "UnitemporalDelta");
    }

    #[test]
    fn test_transaction_milestoning_names_must_differ() {
        let err = UnitemporalDelta::builder()
            .digest_field("digest")
            .transaction_milestoning(TransactionMilestoning::batch_id("batch_id", "batch_id"))
            .build();
        assert!(err.is_err());
    }

    #[test]
    fn test_bitemporal_delta_filter_existing_records_needs_digest() {
        let err = BitemporalDelta::builder()
            .transaction_milestoning(batch_id_milestoning())
            .validity_milestoning(validity())
            .filter_existing_records(true)
            .build()
            .unwrap_err();
        assert!(err.mentions("digest"));
    }
}

mod bulk_load_tests {
    use super::*;

    fn builder() -> ingest_mode_sdk::ingest::BulkLoadBuilder {
        BulkLoad::builder()
            .batch_id_field("batch_id")
            .digest_gen_strategy(DigestGenStrategy::NoDigestGen)
            .auditing(Auditing::NoAuditing)
    }

    #[test]
    fn test_bulk_load_builds() {
        let mode = builder().build().unwrap();
        assert_eq!(mode.batch_id_field(), "batch_id");
    }

    #[test]
    fn test_bulk_load_rejects_filter_duplicates_and_max_version() {
        let err = builder()
            .deduplication_strategy(DeduplicationStrategy::FilterDuplicates)
            .versioning_strategy(
                VersioningStrategy::max_version("version")
                    .with_resolver(MergeDataVersionResolver::DigestBased),
            )
            .build()
            .unwrap_err();
        assert_eq!(err.violations.len(), 2);
        assert!(err.mentions("Only AllowDuplicates deduplication strategy is supported for BulkLoad"));
        assert!(err.mentions("Only NoVersioning versioning strategy is supported for BulkLoad, got MaxVersion"));
    }

    #[test]
    fn test_bulk_load_requires_batch_id_field() {
        let err = BulkLoad::builder()
            .digest_gen_strategy(DigestGenStrategy::NoDigestGen)
            .auditing(Auditing::NoAuditing)
            .build()
            .unwrap_err();
        assert!(err.mentions("[batch_id_field]"));
    }

    #[test]
    fn test_no_op_rejects_fail_on_duplicates() {
        let err = NoOp::builder()
            .deduplication_strategy(DeduplicationStrategy::FailOnDuplicates)
            .build()
            .unwrap_err();
        assert!(err.mentions("NoOp"));
        assert!(NoOp::builder().build().is_ok());
    }
}

mod dispatch_tests {
    use super::*;

    struct IsTemporal;

    impl IngestModeVisitor<bool> for IsTemporal {
        fn visit_append_only(&self, _: &AppendOnly) -> bool {
            false
        }
        fn visit_nontemporal_snapshot(&self, _: &NontemporalSnapshot) -> bool {
            false
        }
        fn visit_nontemporal_delta(&self, _: &NontemporalDelta) -> bool {
            false
        }
        fn visit_unitemporal_snapshot(&self, _: &UnitemporalSnapshot) -> bool {
            true
        }
        fn visit_unitemporal_delta(&self, _: &UnitemporalDelta) -> bool {
            true
        }
        fn visit_bitemporal_snapshot(&self, _: &BitemporalSnapshot) -> bool {
            true
        }
        fn visit_bitemporal_delta(&self, _: &BitemporalDelta) -> bool {
            true
        }
        fn visit_bulk_load(&self, _: &BulkLoad) -> bool {
            false
        }
        fn visit_no_op(&self, _: &NoOp) -> bool {
            false
        }
    }

    #[test]
    fn test_visitor_reaches_matching_branch() {
        let delta: IngestMode = UnitemporalDelta::builder()
            .digest_field("digest")
            .transaction_milestoning(batch_id_milestoning())
            .build()
            .unwrap()
            .into();
        assert!(delta.accept(&IsTemporal));
        assert!(!IngestMode::from(NoOp::default()).accept(&IsTemporal));
    }
}
