//! Models module for the SDK
//!
//! Defines the dataset and field structures an ingest mode is planned against,
//! plus the shared enums and merge precedence rules.

pub mod dataset;
pub mod enums;
pub mod field;
pub mod precedence;

pub use dataset::{
    ClusterKey, ColumnStoreSpecification, Dataset, DatasetReference, Datasets, Index,
    SchemaDefinition, ShardSpecification,
};
pub use enums::*;
pub use field::{Field, FieldType};
pub use precedence::{PrecedenceRule, PrecedenceRuleKind, RuleAction, RuleScope};
