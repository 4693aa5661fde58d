use crate::core::errors::Result;
use crate::core::models::ignore_rule::IgnoreRuleSet;

/// Port for loading the declared intentional differences.
pub trait RuleSource {
    /// Load every rule with its comment. A missing source is an empty set.
    fn load(&self) -> Result<IgnoreRuleSet>;
}
