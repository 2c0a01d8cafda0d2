//! Double dispatch over the ingest mode variants
//!
//! Every derivation over an [`IngestMode`] is written as an implementation of
//! [`IngestModeVisitor`]. The trait has no default methods, so a new variant
//! fails to compile until every visitor handles it.

use super::mode::{
    AppendOnly, BitemporalDelta, BitemporalSnapshot, BulkLoad, IngestMode, NoOp,
    NontemporalDelta, NontemporalSnapshot, UnitemporalDelta, UnitemporalSnapshot,
};

/// Handler with one branch per ingest mode, producing a caller-chosen `R`
///
/// # Example
///
/// ```rust
/// use ingest_mode_sdk::ingest::*;
///
/// struct IsTemporal;
///
/// impl IngestModeVisitor<bool> for IsTemporal {
///     fn visit_append_only(&self, _: &AppendOnly) -> bool { false }
///     fn visit_nontemporal_snapshot(&self, _: &NontemporalSnapshot) -> bool { false }
///     fn visit_nontemporal_delta(&self, _: &NontemporalDelta) -> bool { false }
///     fn visit_unitemporal_snapshot(&self, _: &UnitemporalSnapshot) -> bool { true }
///     fn visit_unitemporal_delta(&self, _: &UnitemporalDelta) -> bool { true }
///     fn visit_bitemporal_snapshot(&self, _: &BitemporalSnapshot) -> bool { true }
///     fn visit_bitemporal_delta(&self, _: &BitemporalDelta) -> bool { true }
///     fn visit_bulk_load(&self, _: &BulkLoad) -> bool { false }
///     fn visit_no_op(&self, _: &NoOp) -> bool { false }
/// }
///
/// let mode = IngestMode::from(NoOp::default());
/// assert!(!mode.accept(&IsTemporal));
/// ```
pub trait IngestModeVisitor<R> {
    fn visit_append_only(&self, mode: &AppendOnly) -> R;
    fn visit_nontemporal_snapshot(&self, mode: &NontemporalSnapshot) -> R;
    fn visit_nontemporal_delta(&self, mode: &NontemporalDelta) -> R;
    fn visit_unitemporal_snapshot(&self, mode: &UnitemporalSnapshot) -> R;
    fn visit_unitemporal_delta(&self, mode: &UnitemporalDelta) -> R;
    fn visit_bitemporal_snapshot(&self, mode: &BitemporalSnapshot) -> R;
    fn visit_bitemporal_delta(&self, mode: &BitemporalDelta) -> R;
    fn visit_bulk_load(&self, mode: &BulkLoad) -> R;
    fn visit_no_op(&self, mode: &NoOp) -> R;
}

impl IngestMode {
    /// Invoke the branch of `visitor` matching this mode
    pub fn accept<R, V>(&self, visitor: &V) -> R
    where
        V: IngestModeVisitor<R> + ?Sized,
    {
        match self {
            IngestMode::AppendOnly(mode) => visitor.visit_append_only(mode),
            IngestMode::NontemporalSnapshot(mode) => visitor.visit_nontemporal_snapshot(mode),
            IngestMode::NontemporalDelta(mode) => visitor.visit_nontemporal_delta(mode),
            IngestMode::UnitemporalSnapshot(mode) => visitor.visit_unitemporal_snapshot(mode),
            IngestMode::UnitemporalDelta(mode) => visitor.visit_unitemporal_delta(mode),
            IngestMode::BitemporalSnapshot(mode) => visitor.visit_bitemporal_snapshot(mode),
            IngestMode::BitemporalDelta(mode) => visitor.visit_bitemporal_delta(mode),
            IngestMode::BulkLoad(mode) => visitor.visit_bulk_load(mode),
            IngestMode::NoOp(mode) => visitor.visit_no_op(mode),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::{Auditing, DigestGenStrategy, TransactionMilestoning};

    struct Name;

    impl IngestModeVisitor<&'static str> for Name {
        fn visit_append_only(&self, _: &AppendOnly) -> &'static str {
            "append_only"
        }
        fn visit_nontemporal_snapshot(&self, _: &NontemporalSnapshot) -> &'static str {
            "nontemporal_snapshot"
        }
        fn visit_nontemporal_delta(&self, _: &NontemporalDelta) -> &'static str {
            "nontemporal_delta"
        }
        fn visit_unitemporal_snapshot(&self, _: &UnitemporalSnapshot) -> &'static str {
            "unitemporal_snapshot"
        }
        fn visit_unitemporal_delta(&self, _: &UnitemporalDelta) -> &'static str {
            "unitemporal_delta"
        }
        fn visit_bitemporal_snapshot(&self, _: &BitemporalSnapshot) -> &'static str {
            "bitemporal_snapshot"
        }
        fn visit_bitemporal_delta(&self, _: &BitemporalDelta) -> &'static str {
            "bitemporal_delta"
        }
        fn visit_bulk_load(&self, _: &BulkLoad) -> &'static str {
            "bulk_load"
        }
        fn visit_no_op(&self, _: &NoOp) -> &'static str {
            "no_op"
        }
    }

    #[test]
    fn dispatch_matches_serde_tag() {
        let modes: Vec<IngestMode> = vec![
            NoOp::default().into(),
            BulkLoad::builder()
                .batch_id_field("batch_id")
                .digest_gen_strategy(DigestGenStrategy::NoDigestGen)
                .auditing(Auditing::NoAuditing)
                .build()
                .unwrap()
                .into(),
            UnitemporalDelta::builder()
                .digest_field("digest")
                .transaction_milestoning(TransactionMilestoning::batch_id("in", "out"))
                .build()
                .unwrap()
                .into(),
        ];
        for mode in &modes {
            let tag = serde_json::to_value(mode).unwrap()["type"].clone();
            let name: &str = mode.accept(&Name);
            assert_eq!(tag, name);
        }
    }
}
