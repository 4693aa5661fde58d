use crate::core::errors::Result;
use crate::core::models::difference::ComparisonReport;
use crate::core::models::ignore_rule::IgnoreRuleSet;

/// What a reporter needs besides the report itself.
pub struct ReportContext<'a> {
    /// Rules with comments, used to explain ignored differences.
    pub rules: &'a IgnoreRuleSet,
    /// Cells longer than this many characters are truncated.
    pub max_value_length: usize,
    /// Drop the padding around table cells (`|a|b|` instead of `| a | b |`).
    pub trim_cell: bool,
}

/// Port for rendering a comparison report.
pub trait Reporter {
    fn render(&self, report: &ComparisonReport, context: &ReportContext<'_>) -> Result<String>;

    /// Conventional file extension for the rendered output.
    fn extension(&self) -> &str;
}
