use serde::Serialize;

use super::entity::EntityKind;
use super::ignore_rule::RuleWarning;
use super::value::Value;

/// Classification of a single divergence relative to the baseline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DiffKind {
    /// Present only in the compared environment (entity or block).
    Added,
    /// Present only in the baseline (entity or block).
    Removed,
    /// Present in both with different values.
    Modified,
}

/// One detected divergence between the baseline and another environment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Difference {
    /// Qualified identity key, e.g. `aws_instance.web` or `module.vpc`.
    pub resource_key: String,
    pub entity_kind: EntityKind,
    /// The non-baseline environment this divergence was found in.
    pub environment: String,
    /// Path inside the entity; empty for existence and local-value divergences.
    pub path: String,
    pub kind: DiffKind,
    /// Baseline value.
    pub expected: Value,
    /// Value in `environment`.
    pub actual: Value,
    /// True when an ignore rule declares this divergence intentional.
    pub ignored: bool,
}

impl Difference {
    /// The full dotted path that ignore rules are matched against.
    pub fn qualified_path(&self) -> String {
        if self.path.is_empty() {
            self.resource_key.clone()
        } else {
            format!("{}.{}", self.resource_key, self.path)
        }
    }

    /// True when the entity exists in only one of the two environments.
    pub fn is_existence(&self) -> bool {
        self.path.is_empty() && self.kind != DiffKind::Modified
    }
}

/// Result of comparing every environment against the baseline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonReport {
    /// Lexicographically first environment, `None` when nothing was compared.
    pub baseline: Option<String>,
    /// All environment names, sorted; the baseline comes first.
    pub environments: Vec<String>,
    pub differences: Vec<Difference>,
    /// Ignore rules that reference nothing in the compared environments.
    pub warnings: Vec<RuleWarning>,
}

impl ComparisonReport {
    /// Returns true if there are no differences at all.
    pub fn is_empty(&self) -> bool {
        self.differences.is_empty()
    }

    /// Differences not covered by any ignore rule.
    pub fn drift(&self) -> impl Iterator<Item = &Difference> {
        self.differences.iter().filter(|d| !d.ignored)
    }

    /// Differences declared intentional by ignore rules.
    pub fn ignored(&self) -> impl Iterator<Item = &Difference> {
        self.differences.iter().filter(|d| d.ignored)
    }

    pub fn drift_count(&self) -> usize {
        self.drift().count()
    }

    pub fn ignored_count(&self) -> usize {
        self.ignored().count()
    }

    pub fn has_drift(&self) -> bool {
        self.drift().next().is_some()
    }
}
