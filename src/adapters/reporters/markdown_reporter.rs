use std::collections::BTreeMap;
use std::fmt::Write;

use crate::core::errors::Result;
use crate::core::models::difference::{ComparisonReport, Difference};
use crate::core::models::entity::EntityKind;
use crate::core::models::value::Value;
use crate::core::traits::reporter::{ReportContext, Reporter};

/// Renders a comparison report as Markdown tables.
///
/// One row per `(entity, path)`, one column per environment. Drift and
/// intentional differences get separate tables; the latter carries a
/// `Reason` column filled from ignore-rule comments.
pub struct MarkdownReporter;

/// A table row being assembled from the differences that share its path.
struct Row<'a> {
    first: &'a Difference,
    by_env: BTreeMap<&'a str, &'a Difference>,
}

impl<'a> Row<'a> {
    /// The difference whose `expected` stands in for environments that
    /// match the baseline. A modification wins over an existence change,
    /// since only it carries the baseline's real value.
    fn reference(&self) -> &'a Difference {
        self.by_env
            .values()
            .copied()
            .find(|d| !d.is_existence())
            .unwrap_or(self.first)
    }
}

type RowKey<'a> = (EntityKind, &'a str, &'a str);

fn group_rows<'a>(diffs: impl Iterator<Item = &'a Difference>) -> BTreeMap<RowKey<'a>, Row<'a>> {
    let mut rows: BTreeMap<RowKey<'a>, Row<'a>> = BTreeMap::new();
    for diff in diffs {
        let key = (diff.entity_kind, diff.resource_key.as_str(), diff.path.as_str());
        rows.entry(key)
            .or_insert_with(|| Row {
                first: diff,
                by_env: BTreeMap::new(),
            })
            .by_env
            .insert(diff.environment.as_str(), diff);
    }
    rows
}

impl MarkdownReporter {
    fn cell(value: &Value, existence: bool, max_len: usize) -> String {
        if value.is_null() {
            return "-".to_string();
        }
        match value {
            Value::Bool(true) if existence => "✅".to_string(),
            Value::Bool(false) if existence => "❌".to_string(),
            other => escape_cell(&truncate(&other.to_string(), max_len)),
        }
    }

    fn write_table(
        out: &mut String,
        rows: &BTreeMap<RowKey<'_>, Row<'_>>,
        report: &ComparisonReport,
        context: &ReportContext<'_>,
        with_reason: bool,
    ) {
        let mut header = vec!["Kind", "Entity", "Path"];
        header.extend(report.environments.iter().map(String::as_str));
        if with_reason {
            header.push("Reason");
        }

        let row_line = |cells: &[String]| {
            if context.trim_cell {
                format!("|{}|", cells.join("|"))
            } else {
                format!("| {} |", cells.join(" | "))
            }
        };

        let header: Vec<String> = header.into_iter().map(str::to_string).collect();
        let _ = writeln!(out, "{}", row_line(&header));
        let _ = writeln!(out, "|{}", "---|".repeat(header.len()));

        for row in rows.values() {
            let diff = row.first;
            let reference = row.reference();
            let path = if diff.path.is_empty() {
                "-".to_string()
            } else {
                escape_cell(&diff.path)
            };
            let mut cells = vec![
                diff.entity_kind.to_string(),
                escape_cell(&diff.resource_key),
                path,
            ];

            for env in &report.environments {
                let cell = match row.by_env.get(env.as_str()) {
                    Some(own) => Self::cell(&own.actual, own.is_existence(), context.max_value_length),
                    None => Self::cell(
                        &reference.expected,
                        reference.is_existence(),
                        context.max_value_length,
                    ),
                };
                cells.push(cell);
            }

            if with_reason {
                let reason = context
                    .rules
                    .comment_for(&diff.qualified_path())
                    .map(escape_cell)
                    .unwrap_or_else(|| "-".to_string());
                cells.push(reason);
            }

            let _ = writeln!(out, "{}", row_line(&cells));
        }
    }
}

impl Reporter for MarkdownReporter {
    fn render(&self, report: &ComparisonReport, context: &ReportContext<'_>) -> Result<String> {
        let mut out = String::from("# Drift Check Results\n\n");

        if let Some(baseline) = &report.baseline {
            let _ = writeln!(out, "Baseline: `{baseline}`\n");
        }

        out.push_str("## Drift\n\n");
        let drift = group_rows(report.drift());
        if drift.is_empty() {
            out.push_str("No drift detected.\n");
        } else {
            Self::write_table(&mut out, &drift, report, context, false);
        }

        let ignored = group_rows(report.ignored());
        if !ignored.is_empty() {
            out.push_str("\n## Ignored differences\n\n");
            Self::write_table(&mut out, &ignored, report, context, true);
        }

        Ok(out)
    }

    fn extension(&self) -> &str {
        "md"
    }
}

/// Shorten to at most `max_len` characters, ending in `...` when cut.
fn truncate(s: &str, max_len: usize) -> String {
    let char_count = s.chars().count();
    if char_count <= max_len {
        s.to_string()
    } else {
        let limit = max_len.saturating_sub(3);
        let truncated: String = s.chars().take(limit).collect();
        format!("{truncated}...")
    }
}

fn escape_cell(s: &str) -> String {
    s.replace('|', "\\|").replace("\r\n", "<br>").replace('\n', "<br>")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::difference::DiffKind;
    use crate::core::models::ignore_rule::{IgnoreRule, IgnoreRuleSet};

    fn make_diff(
        key: &str,
        env: &str,
        path: &str,
        kind: DiffKind,
        expected: Value,
        actual: Value,
        ignored: bool,
    ) -> Difference {
        Difference {
            resource_key: key.to_string(),
            entity_kind: EntityKind::Resource,
            environment: env.to_string(),
            path: path.to_string(),
            kind,
            expected,
            actual,
            ignored,
        }
    }

    fn make_report(differences: Vec<Difference>) -> ComparisonReport {
        ComparisonReport {
            baseline: Some("dev".to_string()),
            environments: vec!["dev".into(), "prod".into(), "staging".into()],
            differences,
            warnings: Vec::new(),
        }
    }

    fn render(report: &ComparisonReport, rules: &IgnoreRuleSet) -> String {
        MarkdownReporter
            .render(
                report,
                &ReportContext {
                    rules,
                    max_value_length: 200,
                    trim_cell: false,
                },
            )
            .unwrap()
    }

    #[test]
    fn no_differences_says_so() {
        let out = render(&make_report(Vec::new()), &IgnoreRuleSet::new());

        assert!(out.starts_with("# Drift Check Results"));
        assert!(out.contains("No drift detected."));
        assert!(!out.contains("## Ignored differences"));
    }

    #[test]
    fn environments_share_one_row_per_path() {
        let report = make_report(vec![make_diff(
            "aws_instance.web",
            "prod",
            "instance_type",
            DiffKind::Modified,
            Value::from("t2.micro"),
            Value::from("t2.large"),
            false,
        )]);

        let out = render(&report, &IgnoreRuleSet::new());

        assert!(out.contains("| Kind | Entity | Path | dev | prod | staging |"));
        // staging matched the baseline, so it shows the baseline value
        assert!(out.contains(
            "| resource | aws_instance.web | instance_type | t2.micro | t2.large | t2.micro |"
        ));
    }

    #[test]
    fn existence_rows_use_icons() {
        let report = make_report(vec![make_diff(
            "aws_instance.bastion",
            "prod",
            "",
            DiffKind::Removed,
            Value::Bool(true),
            Value::Bool(false),
            false,
        )]);

        let out = render(&report, &IgnoreRuleSet::new());

        assert!(out.contains("| resource | aws_instance.bastion | - | ✅ | ❌ | ✅ |"));
    }

    #[test]
    fn mixed_row_decides_icons_per_environment() {
        let mut modified = make_diff(
            "local.region",
            "prod",
            "",
            DiffKind::Modified,
            Value::from("eu"),
            Value::from("us"),
            false,
        );
        modified.entity_kind = EntityKind::Local;
        let mut removed = make_diff(
            "local.region",
            "staging",
            "",
            DiffKind::Removed,
            Value::Bool(true),
            Value::Bool(false),
            false,
        );
        removed.entity_kind = EntityKind::Local;

        for differences in [
            vec![modified.clone(), removed.clone()],
            vec![removed, modified],
        ] {
            let out = render(&make_report(differences), &IgnoreRuleSet::new());

            assert!(
                out.contains("| local | local.region | - | eu | us | ❌ |"),
                "{out}"
            );
            assert!(!out.contains("false"));
        }
    }

    #[test]
    fn ignored_rows_carry_rule_comment() {
        let report = make_report(vec![make_diff(
            "aws_instance.web",
            "prod",
            "tags.Env",
            DiffKind::Modified,
            Value::from("dev"),
            Value::from("prod"),
            true,
        )]);
        let rules: IgnoreRuleSet = [IgnoreRule::with_comment(
            "aws_instance.web.tags",
            "tags name the env\nby convention",
        )]
        .into_iter()
        .collect();

        let out = render(&report, &rules);

        assert!(out.contains("No drift detected."));
        assert!(out.contains("## Ignored differences"));
        assert!(out.contains("| dev | prod | staging | Reason |"));
        assert!(out.contains("| tags name the env<br>by convention |"));
    }

    #[test]
    fn cells_are_escaped_and_nulls_dashed() {
        let report = make_report(vec![make_diff(
            "aws_instance.web",
            "prod",
            "user_data",
            DiffKind::Modified,
            Value::from("a|b\nc"),
            Value::Null,
            false,
        )]);

        let out = render(&report, &IgnoreRuleSet::new());

        assert!(out.contains("| a\\|b<br>c | - | a\\|b<br>c |"));
    }

    #[test]
    fn long_values_are_truncated() {
        let report = make_report(vec![make_diff(
            "aws_instance.web",
            "prod",
            "ami",
            DiffKind::Modified,
            Value::from("ami-0123456789abcdef"),
            Value::from("ami-fedcba9876543210"),
            false,
        )]);
        let rules = IgnoreRuleSet::new();

        let out = MarkdownReporter
            .render(
                &report,
                &ReportContext {
                    rules: &rules,
                    max_value_length: 10,
                    trim_cell: false,
                },
            )
            .unwrap();

        assert!(out.contains("| ami-012... | ami-fed... |"));
    }

    #[test]
    fn trimmed_cells_drop_padding() {
        let report = make_report(vec![make_diff(
            "aws_instance.web",
            "prod",
            "instance_type",
            DiffKind::Modified,
            Value::from("t2.micro"),
            Value::from("t2.large"),
            false,
        )]);
        let rules = IgnoreRuleSet::new();

        let out = MarkdownReporter
            .render(
                &report,
                &ReportContext {
                    rules: &rules,
                    max_value_length: 200,
                    trim_cell: true,
                },
            )
            .unwrap();

        assert!(out.contains("|Kind|Entity|Path|dev|prod|staging|\n|---|---|---|---|---|---|\n"));
        assert!(out.contains("|resource|aws_instance.web|instance_type|t2.micro|t2.large|t2.micro|"));
        assert!(!out.contains("| t2.micro |"));
    }

    #[test]
    fn truncate_is_char_safe() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("hello", 5), "hello");
        assert_eq!(truncate("hello world!", 8), "hello...");
        assert_eq!(truncate("日本語のテキスト", 6), "日本語...");
    }
}
