//! Merge precedence rules for mastered records
//!
//! A precedence rule decides which source wins when several sources update
//! the same master record. Each rule may be restricted to a set of scopes.

use crate::ingest::ConstructionError;
use serde::{Deserialize, Serialize};

/// Restricts a precedence rule to records from particular sources
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum RuleScope {
    RecordSource(String),
    DataProvider(String),
    DataProviderType(String),
}

/// What a source precedence rule does with a lower-precedence update
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleAction {
    #[default]
    Overwrite,
    Block,
}

/// Kind of a precedence rule together with its kind-specific payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PrecedenceRuleKind {
    SourcePrecedence { precedence: u32, action: RuleAction },
    Delete,
    Create,
    Conditional { predicate: String },
}

impl PrecedenceRuleKind {
    fn name(&self) -> &'static str {
        match self {
            PrecedenceRuleKind::SourcePrecedence { .. } => "SourcePrecedenceRule",
            PrecedenceRuleKind::Delete => "DeleteRule",
            PrecedenceRuleKind::Create => "CreateRule",
            PrecedenceRuleKind::Conditional { .. } => "ConditionalRule",
        }
    }
}

/// A validated precedence rule
///
/// # Example
///
/// ```rust
/// use ingest_mode_sdk::models::{PrecedenceRule, PrecedenceRuleKind, RuleScope};
///
/// let delete = PrecedenceRule::new(
///     PrecedenceRuleKind::Delete,
///     vec![RuleScope::RecordSource("trades".to_string())],
///     vec![],
/// );
/// assert!(delete.is_ok());
///
/// let scoped_conditional = PrecedenceRule::new(
///     PrecedenceRuleKind::Conditional { predicate: "incoming.version > current.version".to_string() },
///     vec![RuleScope::DataProvider("exchange".to_string())],
///     vec![],
/// );
/// assert!(scoped_conditional.is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "PrecedenceRuleSpec")]
pub struct PrecedenceRule {
    #[serde(flatten)]
    kind: PrecedenceRuleKind,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    scopes: Vec<RuleScope>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    paths: Vec<String>,
}

#[derive(Deserialize)]
struct PrecedenceRuleSpec {
    #[serde(flatten)]
    kind: PrecedenceRuleKind,
    #[serde(default)]
    scopes: Vec<RuleScope>,
    #[serde(default)]
    paths: Vec<String>,
}

impl TryFrom<PrecedenceRuleSpec> for PrecedenceRule {
    type Error = ConstructionError;

    fn try_from(spec: PrecedenceRuleSpec) -> Result<Self, Self::Error> {
        PrecedenceRule::new(spec.kind, spec.scopes, spec.paths)
    }
}

impl PrecedenceRule {
    /// Build a rule, rejecting scope combinations the merge engine cannot honour.
    pub fn new(
        kind: PrecedenceRuleKind,
        scopes: Vec<RuleScope>,
        paths: Vec<String>,
    ) -> Result<Self, ConstructionError> {
        let mut violations = Vec::new();
        match &kind {
            PrecedenceRuleKind::Conditional { predicate } => {
                if !scopes.is_empty() {
                    violations.push("ConditionalRule with rule scope is currently unsupported".to_string());
                }
                if predicate.trim().is_empty() {
                    violations.push("ConditionalRule predicate cannot be empty".to_string());
                }
            }
            PrecedenceRuleKind::Delete => {
                if scopes
                    .iter()
                    .any(|s| matches!(s, RuleScope::DataProviderType(_)))
                {
                    violations.push("DataProviderType scope is not allowed on DeleteRule".to_string());
                }
            }
            PrecedenceRuleKind::SourcePrecedence { .. } | PrecedenceRuleKind::Create => {}
        }
        for scope in &scopes {
            let (RuleScope::RecordSource(id) | RuleScope::DataProvider(id) | RuleScope::DataProviderType(id)) = scope;
            if id.trim().is_empty() {
                violations.push("rule scope identifier cannot be empty".to_string());
            }
        }
        crate::ingest::ensure_valid(kind.name(), violations)?;
        Ok(Self { kind, scopes, paths })
    }

    pub fn kind(&self) -> &PrecedenceRuleKind {
        &self.kind
    }

    pub fn scopes(&self) -> &[RuleScope] {
        &self.scopes
    }

    pub fn paths(&self) -> &[String] {
        &self.paths
    }

    /// Whether the rule applies to a record coming from `record_source`
    /// supplied by `data_provider` of type `data_provider_type`.
    ///
    /// An unscoped rule applies everywhere; otherwise any matching scope suffices.
    pub fn applies_to(&self, record_source: &str, data_provider: &str, data_provider_type: &str) -> bool {
        self.scopes.is_empty()
            || self.scopes.iter().any(|scope| match scope {
                RuleScope::RecordSource(id) => id == record_source,
                RuleScope::DataProvider(id) => id == data_provider,
                RuleScope::DataProviderType(name) => name == data_provider_type,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delete_rule_rejects_provider_type_scope() {
        let err = PrecedenceRule::new(
            PrecedenceRuleKind::Delete,
            vec![
                RuleScope::RecordSource("trades".to_string()),
                RuleScope::DataProviderType("Exchange".to_string()),
            ],
            vec![],
        )
        .unwrap_err();
        assert_eq!(err.ingest_mode, "DeleteRule");
        assert!(err.mentions("DataProviderType scope is not allowed on DeleteRule"));
    }

    #[test]
    fn conditional_rule_rejects_any_scope() {
        let err = PrecedenceRule::new(
            PrecedenceRuleKind::Conditional {
                predicate: "true".to_string(),
            },
            vec![RuleScope::RecordSource("trades".to_string())],
            vec![],
        )
        .unwrap_err();
        assert!(err.mentions("ConditionalRule with rule scope is currently unsupported"));
    }

    #[test]
    fn source_precedence_accepts_every_scope_kind() {
        let rule = PrecedenceRule::new(
            PrecedenceRuleKind::SourcePrecedence {
                precedence: 1,
                action: RuleAction::Block,
            },
            vec![
                RuleScope::RecordSource("trades".to_string()),
                RuleScope::DataProviderType("Exchange".to_string()),
            ],
            vec!["name".to_string()],
        )
        .unwrap();
        assert!(rule.applies_to("other", "lse", "Exchange"));
        assert!(!rule.applies_to("other", "lse", "Broker"));
    }

    #[test]
    fn deserialization_runs_validation() {
        let ok: PrecedenceRule =
            serde_json::from_str(r#"{"type": "create", "scopes": [{"type": "data_provider", "value": "lse"}]}"#)
                .unwrap();
        assert_eq!(ok.kind(), &PrecedenceRuleKind::Create);

        let bad = serde_json::from_str::<PrecedenceRule>(
            r#"{"type": "delete", "scopes": [{"type": "data_provider_type", "value": "Exchange"}]}"#,
        );
        assert!(bad.is_err());
    }
}
