use crate::core::models::ignore_rule::IgnoreRule;

/// Parse the contents of an ignore file into rules, in declaration order.
///
/// - Blank lines reset the pending comment
/// - `# text` lines accumulate into the pending comment, one line each
/// - `rule  # text` gives the rule an inline comment, which wins over
///   the pending one
///
/// The pending comment is consumed by the next rule.
pub fn parse_ignore_content(content: &str) -> Vec<IgnoreRule> {
    let mut rules = Vec::new();
    let mut pending: Vec<&str> = Vec::new();

    for raw in content.lines() {
        let line = raw.trim();

        if line.is_empty() {
            pending.clear();
            continue;
        }

        if let Some(comment) = line.strip_prefix('#') {
            pending.push(comment.trim());
            continue;
        }

        let (pattern, inline) = match line.split_once('#') {
            Some((rule, comment)) => (rule.trim(), Some(comment.trim())),
            None => (line, None),
        };
        if pattern.is_empty() {
            continue;
        }

        let comment = match inline.filter(|c| !c.is_empty()) {
            Some(inline) => inline.to_string(),
            None => pending.join("\n"),
        };
        pending.clear();

        rules.push(if comment.is_empty() {
            IgnoreRule::new(pattern)
        } else {
            IgnoreRule::with_comment(pattern, &comment)
        });
    }

    rules
}
