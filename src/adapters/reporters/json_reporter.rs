use serde::Serialize;

use crate::core::errors::Result;
use crate::core::models::difference::{ComparisonReport, Difference};
use crate::core::models::ignore_rule::RuleWarning;
use crate::core::traits::reporter::{ReportContext, Reporter};

/// Renders a comparison report as pretty-printed JSON for tooling.
pub struct JsonReporter;

#[derive(Serialize)]
struct JsonReport<'a> {
    baseline: Option<&'a str>,
    environments: &'a [String],
    summary: Summary,
    differences: Vec<JsonDifference<'a>>,
    warnings: &'a [RuleWarning],
}

#[derive(Serialize)]
struct Summary {
    drift: usize,
    ignored: usize,
}

#[derive(Serialize)]
struct JsonDifference<'a> {
    #[serde(flatten)]
    difference: &'a Difference,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<&'a str>,
}

impl Reporter for JsonReporter {
    fn render(&self, report: &ComparisonReport, context: &ReportContext<'_>) -> Result<String> {
        let differences = report
            .differences
            .iter()
            .map(|difference| JsonDifference {
                difference,
                reason: if difference.ignored {
                    context.rules.comment_for(&difference.qualified_path())
                } else {
                    None
                },
            })
            .collect();

        let body = JsonReport {
            baseline: report.baseline.as_deref(),
            environments: &report.environments,
            summary: Summary {
                drift: report.drift_count(),
                ignored: report.ignored_count(),
            },
            differences,
            warnings: &report.warnings,
        };

        let mut rendered = serde_json::to_string_pretty(&body).map_err(std::io::Error::from)?;
        rendered.push('\n');
        Ok(rendered)
    }

    fn extension(&self) -> &str {
        "json"
    }
}
