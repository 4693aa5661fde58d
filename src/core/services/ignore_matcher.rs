use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::core::models::entity::{Attributes, EntityBody, EntityKind};
use crate::core::models::environment::EnvironmentConfig;
use crate::core::models::ignore_rule::{RuleWarning, is_well_formed, rule_matches};
use crate::core::models::value::Value;

/// `ingress[0]` style path segment.
static BLOCK_SEGMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([^\[\]]+)\[(\d+)\]$").expect("block segment pattern is valid")
});

/// Decides whether a difference path is covered by an ignore rule.
///
/// Matching is hierarchical: a rule covers its exact path and every path
/// beneath it. Rules are never removed, even when validation finds that
/// they reference nothing; they may apply to environments outside this run.
pub struct IgnoreMatcher {
    rules: Vec<String>,
    warnings: Vec<RuleWarning>,
}

impl IgnoreMatcher {
    pub fn new(rules: &[String]) -> Self {
        Self {
            rules: rules.to_vec(),
            warnings: Vec::new(),
        }
    }

    /// True when any rule equals `path` or is a dotted ancestor of it.
    pub fn is_ignored(&self, path: &str) -> bool {
        self.rules.iter().any(|rule| rule_matches(rule, path))
    }

    /// Check every rule against the supplied environments.
    ///
    /// A rule is valid when its entity exists in at least one environment
    /// and, if the rule goes deeper, the referenced attribute, object key,
    /// or block exists on that entity in at least one environment. Each
    /// invalid rule yields exactly one warning.
    pub fn validate_rules(
        &mut self,
        environments: &BTreeMap<String, EnvironmentConfig>,
    ) -> &[RuleWarning] {
        self.warnings = self
            .rules
            .iter()
            .filter(|rule| !is_valid_rule(rule, environments))
            .map(|rule| RuleWarning::not_found(rule))
            .collect();

        debug!(
            rules = self.rules.len(),
            unused = self.warnings.len(),
            "validated ignore rules"
        );
        &self.warnings
    }

    /// Warnings from the last validation pass.
    pub fn warnings(&self) -> &[RuleWarning] {
        &self.warnings
    }
}

/// Split a rule into entity kind, unqualified identity key, and remainder.
///
/// `data.` rules address `data.type.name`; other prefixed kinds use two
/// segments; everything else is a `type.name` resource.
fn split_rule(rule: &str) -> Option<(EntityKind, String, Option<&str>)> {
    let kind = EntityKind::from_leading_segment(rule.split('.').next()?);
    let segments = kind.key_segments();

    let mut parts = rule.splitn(segments + 1, '.');
    let key_parts: Vec<&str> = parts.by_ref().take(segments).collect();
    if key_parts.len() < segments || key_parts.iter().any(|p| p.is_empty()) {
        return None;
    }

    let identity = match kind.prefix() {
        Some(_) => key_parts[1..].join("."),
        None => key_parts.join("."),
    };
    Some((kind, identity, parts.next()))
}

fn is_valid_rule(rule: &str, environments: &BTreeMap<String, EnvironmentConfig>) -> bool {
    if !is_well_formed(rule) {
        return false;
    }
    let Some((kind, identity, remainder)) = split_rule(rule) else {
        return false;
    };

    environments.values().any(|env| match env.lookup(kind, &identity) {
        Some(body) => remainder.is_none_or(|rest| references_existing(body, rest)),
        None => false,
    })
}

/// Does `rest` (the part after the entity key) point at something real?
fn references_existing(body: EntityBody<'_>, rest: &str) -> bool {
    // Locals are compared as whole values; nothing lives beneath them.
    let EntityBody::Attributes { attrs, blocks } = body else {
        return false;
    };

    let (head, tail) = match rest.split_once('.') {
        Some((head, tail)) => (head, Some(tail)),
        None => (rest, None),
    };

    if let Some(caps) = BLOCK_SEGMENT.captures(head) {
        let kind = &caps[1];
        let Ok(index) = caps[2].parse::<usize>() else {
            return false;
        };
        let Some(block) = blocks
            .and_then(|b| b.get(kind))
            .and_then(|sequence| sequence.get(index))
        else {
            return false;
        };
        return tail.is_none_or(|path| attribute_path_exists(&block.attrs, path));
    }

    attribute_path_exists(attrs, rest)
}

/// `attr` or `attr.key`, where `key` may itself contain dots.
fn attribute_path_exists(attrs: &Attributes, path: &str) -> bool {
    match path.split_once('.') {
        None => attrs.contains_key(path),
        Some((name, key)) => attrs
            .get(name)
            .and_then(Value::as_object)
            .is_some_and(|object| object.contains_key(key)),
    }
}
