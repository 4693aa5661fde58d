use std::fmt;

use serde::Serialize;

/// A declared intentional difference: a dotted path plus an optional reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IgnoreRule {
    pub pattern: String,
    pub comment: Option<String>,
}

impl IgnoreRule {
    pub fn new(pattern: &str) -> Self {
        Self {
            pattern: pattern.to_string(),
            comment: None,
        }
    }

    pub fn with_comment(pattern: &str, comment: &str) -> Self {
        Self {
            pattern: pattern.to_string(),
            comment: Some(comment.to_string()),
        }
    }
}

/// True when the rule has at least two non-empty leading segments (`type.name`).
///
/// Anything shorter cannot address an entity and never matches.
pub fn is_well_formed(rule: &str) -> bool {
    let mut parts = rule.split('.');
    let first = parts.next().is_some_and(|s| !s.is_empty());
    let second = parts.next().is_some_and(|s| !s.is_empty());
    first && second
}

/// Hierarchical match: exact equality, or `rule` is a dotted ancestor of `path`.
///
/// `a.b.ingress[0]` matches `a.b.ingress[0].from_port` but not
/// `a.b.ingress[1].from_port` nor `a.b.ingress[0]x`.
pub fn rule_matches(rule: &str, path: &str) -> bool {
    if !is_well_formed(rule) {
        return false;
    }
    match path.strip_prefix(rule) {
        Some(rest) => rest.is_empty() || rest.starts_with('.'),
        None => false,
    }
}

/// An ordered, de-duplicated collection of ignore rules.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IgnoreRuleSet {
    rules: Vec<IgnoreRule>,
}

impl IgnoreRuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a rule. Returns false (and keeps the first) if the pattern exists.
    pub fn push(&mut self, rule: IgnoreRule) -> bool {
        if self.rules.iter().any(|r| r.pattern == rule.pattern) {
            return false;
        }
        self.rules.push(rule);
        true
    }

    pub fn iter(&self) -> impl Iterator<Item = &IgnoreRule> {
        self.rules.iter()
    }

    /// The bare rule strings, in declaration order.
    pub fn patterns(&self) -> Vec<String> {
        self.rules.iter().map(|r| r.pattern.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Comment of the most specific rule covering `path`, if it has one.
    pub fn comment_for(&self, path: &str) -> Option<&str> {
        self.rules
            .iter()
            .filter(|r| rule_matches(&r.pattern, path))
            .max_by_key(|r| r.pattern.len())
            .and_then(|r| r.comment.as_deref())
    }
}

impl FromIterator<IgnoreRule> for IgnoreRuleSet {
    fn from_iter<I: IntoIterator<Item = IgnoreRule>>(iter: I) -> Self {
        let mut set = Self::new();
        for rule in iter {
            set.push(rule);
        }
        set
    }
}

/// Diagnostic for a rule that references nothing in the compared environments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleWarning {
    pub rule: String,
    pub message: String,
}

impl RuleWarning {
    pub fn not_found(rule: &str) -> Self {
        Self {
            rule: rule.to_string(),
            message: format!("ignore rule '{rule}' not found in current resource configuration"),
        }
    }
}

impl fmt::Display for RuleWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}
