//! Single-document linter.
//!
//! Each rule is a plain function over a [`Document`]. Rules run in a fixed
//! order, never short-circuit one another, and append their findings in that
//! order.

use crate::document::Document;
use crate::model::{Category, Finding, Severity};
use crate::patterns::{
    TextRule, CRITICAL_OPERATIONS, DESCRIPTION_PLACEHOLDERS, IMPERATIVE_VERBS, PLACEHOLDERS,
    RE_LETTERED_STEP, RE_TARGET_ALPHABET, RE_TRACKED_ITEM, RE_TRACKING_SECTION,
    RE_VALIDATION_EVIDENCE, SANCTIONED_WILDCARD, SHELL_ANTI_PATTERNS, VAGUE_LANGUAGE,
};
use serde::Serialize;
use std::collections::HashSet;

struct Rule {
    name: &'static str,
    check: fn(&Document, &mut Vec<Finding>),
}

const RULES: &[Rule] = &[
    Rule { name: "header", check: check_header },
    Rule { name: "task-tracking", check: check_task_tracking },
    Rule { name: "clarity", check: check_clarity },
    Rule { name: "shell-portability", check: check_shell_portability },
    Rule { name: "post-op-validation", check: check_post_op_validation },
    Rule { name: "numbering", check: check_numbering },
    Rule { name: "placeholder", check: check_placeholders },
];

/// Run every rule against `doc`.
pub fn lint(doc: &Document) -> Vec<Finding> {
    let mut findings = Vec::new();
    for rule in RULES {
        let before = findings.len();
        (rule.check)(doc, &mut findings);
        tracing::trace!(rule = rule.name, found = findings.len() - before, "rule finished");
    }
    findings
}

// -- Rules --------------------------------------------------------------------

fn check_header(doc: &Document, out: &mut Vec<Finding>) {
    let Some(meta) = doc.metadata() else {
        out.push(
            Finding::new(Severity::Blocking, Category::Header, "Missing frontmatter (---...---)")
                .suggest("Add YAML frontmatter at the start of the file with description and allowed-tools"),
        );
        return;
    };

    match meta.description.as_deref() {
        None => out.push(
            Finding::new(Severity::Blocking, Category::Header, "Missing 'description' field")
                .suggest("Add description: Brief description of what command does"),
        ),
        Some(desc) if DESCRIPTION_PLACEHOLDERS.iter().any(|t| desc.contains(t)) => out.push(
            Finding::new(Severity::Advisory, Category::Header, "Description contains placeholder")
                .suggest("Replace [TODO] or TBD with actual description"),
        ),
        Some(_) => {}
    }

    match meta.allowed_capabilities.as_deref() {
        None => out.push(
            Finding::new(Severity::Blocking, Category::Header, "Missing 'allowed-tools' field")
                .suggest("Add allowed-tools list with specific tools this command uses"),
        ),
        Some(capabilities) => {
            if capabilities.iter().any(|c| is_unscoped_wildcard(c)) {
                out.push(
                    Finding::new(
                        Severity::Blocking,
                        Category::Header,
                        "Overly permissive wildcard '*' in allowed-tools",
                    )
                    .suggest(format!(
                        "List specific tools instead of '*'. Only {} is allowed as wildcard.",
                        SANCTIONED_WILDCARD
                    )),
                );
            }
        }
    }
}

fn is_unscoped_wildcard(capability: &str) -> bool {
    let capability = unquote(capability.trim());
    capability != SANCTIONED_WILDCARD && capability.starts_with('*')
}

/// Strip one layer of matching YAML quotes.
fn unquote(value: &str) -> &str {
    ['"', '\'']
        .iter()
        .find_map(|&q| value.strip_prefix(q)?.strip_suffix(q))
        .unwrap_or(value)
}

fn check_task_tracking(doc: &Document, out: &mut Vec<Finding>) {
    let step_count = doc.step_headings().len();

    if !doc.uses_tracking_marker() {
        if step_count > 1 {
            out.push(
                Finding::new(
                    Severity::Blocking,
                    Category::TaskTracking,
                    format!("Command has {} steps but no TodoWrite", step_count),
                )
                .suggest("Add TodoWrite section at step 0 with all steps listed in Russian"),
            );
        }
        return;
    }

    let Some(section) = RE_TRACKING_SECTION.find(doc.body()) else {
        return;
    };
    let section = section.as_str();

    if !RE_TARGET_ALPHABET.is_match(section) {
        out.push(
            Finding::new(
                Severity::Advisory,
                Category::TaskTracking,
                "TodoWrite appears to be in English, not Russian",
            )
            .suggest("TodoWrite is user-facing, so content and activeForm must be in Russian"),
        );
    }

    let items: HashSet<&str> = RE_TRACKED_ITEM
        .captures_iter(section)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
        .collect();
    // One heading is the step that declares the tracker itself.
    if items.len() + 1 < step_count {
        out.push(
            Finding::new(
                Severity::Advisory,
                Category::TaskTracking,
                format!(
                    "TodoWrite has {} items but command has {} steps",
                    items.len(),
                    step_count
                ),
            )
            .suggest("Ensure all major steps are represented in TodoWrite"),
        );
    }
}

fn check_clarity(doc: &Document, out: &mut Vec<Finding>) {
    push_each_match(doc, &VAGUE_LANGUAGE, Severity::Advisory, Category::Clarity, out, |rule| {
        rule.message.to_string()
    });

    let upper = doc.body().to_uppercase();
    if !IMPERATIVE_VERBS.iter().any(|verb| upper.contains(verb)) {
        out.push(
            Finding::new(
                Severity::Informational,
                Category::Clarity,
                "No imperative verbs found (EXECUTE, RUN, CREATE, etc.)",
            )
            .suggest("Consider using imperative language for clarity"),
        );
    }
}

fn check_shell_portability(doc: &Document, out: &mut Vec<Finding>) {
    push_each_match(
        doc,
        &SHELL_ANTI_PATTERNS,
        Severity::Advisory,
        Category::ShellPortability,
        out,
        |rule| rule.message.to_string(),
    );
}

fn check_post_op_validation(doc: &Document, out: &mut Vec<Finding>) {
    if has_validation_evidence(doc) {
        return;
    }
    let body = doc.body();
    let triggered: Vec<&TextRule> = CRITICAL_OPERATIONS
        .iter()
        .filter(|op| op.regex.is_match(body))
        .collect();
    if triggered.is_empty() {
        return;
    }
    let names: Vec<&str> = triggered.iter().map(|op| op.label).collect();
    let hints: Vec<&str> = triggered.iter().map(|op| op.suggestion).collect();
    out.push(
        Finding::new(
            Severity::Advisory,
            Category::PostOpValidation,
            format!(
                "Command performs operations ({}) but has no validation checks",
                names.join(", ")
            ),
        )
        .suggest(hints.join("; ")),
    );
}

fn check_numbering(doc: &Document, out: &mut Vec<Finding>) {
    for step in doc.step_headings().iter().filter(|s| s.is_decimal()) {
        out.push(
            Finding::new(
                Severity::Advisory,
                Category::Numbering,
                format!("Step {} uses decimal numbering", step.number),
            )
            .at_line(step.line)
            .suggest("Use whole numbers only: 1, 2, 3 (not 1.5, 2.5)"),
        );
    }

    if RE_LETTERED_STEP.is_match(doc.body()) {
        out.push(
            Finding::new(
                Severity::Advisory,
                Category::Numbering,
                "Found letter sub-steps (e.g., 1a, 1b)",
            )
            .suggest("Use whole numbers only: 1, 2, 3"),
        );
    }
}

fn check_placeholders(doc: &Document, out: &mut Vec<Finding>) {
    push_each_match(doc, &PLACEHOLDERS, Severity::Advisory, Category::Placeholder, out, |rule| {
        format!("Found placeholder '{}'", rule.label)
    });
}

/// One finding per occurrence of each rule, table order first, then text order.
fn push_each_match(
    doc: &Document,
    rules: &[TextRule],
    severity: Severity,
    category: Category,
    out: &mut Vec<Finding>,
    message: impl Fn(&TextRule) -> String,
) {
    let body = doc.body();
    for rule in rules {
        for m in rule.regex.find_iter(body) {
            out.push(
                Finding::new(severity, category, message(rule))
                    .at_line(doc.body_line(m.start()))
                    .suggest(rule.suggestion),
            );
        }
    }
}

/// Validation evidence anywhere in the document, header included. Shared
/// with the indexer.
pub fn has_validation_evidence(doc: &Document) -> bool {
    RE_VALIDATION_EVIDENCE.is_match(doc.raw_text())
}

// -- Report -------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeverityCounts {
    pub blocking: usize,
    pub advisory: usize,
    pub informational: usize,
}

/// Findings for one document, in rule order.
#[derive(Debug, Clone, Serialize)]
pub struct LintReport {
    pub source: String,
    pub findings: Vec<Finding>,
}

impl LintReport {
    pub fn new(source: impl Into<String>, doc: &Document) -> Self {
        LintReport {
            source: source.into(),
            findings: lint(doc),
        }
    }

    pub fn is_clean(&self) -> bool {
        self.findings.is_empty()
    }

    pub fn has_blocking(&self) -> bool {
        self.findings.iter().any(|f| f.severity == Severity::Blocking)
    }

    pub fn with_severity(&self, severity: Severity) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(move |f| f.severity == severity)
    }

    /// Findings grouped Blocking, Advisory, Informational; rule order kept
    /// within each group.
    pub fn grouped(&self) -> Vec<&Finding> {
        Severity::ALL
            .iter()
            .flat_map(|&severity| self.with_severity(severity))
            .collect()
    }

    pub fn counts(&self) -> SeverityCounts {
        let mut counts = SeverityCounts::default();
        for finding in &self.findings {
            match finding.severity {
                Severity::Blocking => counts.blocking += 1,
                Severity::Advisory => counts.advisory += 1,
                Severity::Informational => counts.informational += 1,
            }
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "---\ndescription: Ship a release\nallowed-tools:\n  - Bash(git:*)\n  - Read\n---\n";

    fn lint_text(text: &str) -> Vec<Finding> {
        lint(&Document::parse(text))
    }

    fn of(findings: &[Finding], category: Category) -> Vec<&Finding> {
        findings.iter().filter(|f| f.category == category).collect()
    }

    #[test]
    fn missing_header_is_blocking() {
        let findings = lint_text("# Title\nRUN the thing\n");
        let header = of(&findings, Category::Header);
        assert_eq!(header.len(), 1);
        assert_eq!(header[0].severity, Severity::Blocking);
    }

    #[test]
    fn clean_document_passes() {
        let text = format!("{HEADER}# Release\n\n## 1. Tag\nRUN git tag v1\n");
        assert!(lint_text(&text).is_empty());
    }

    #[test]
    fn placeholder_description_scenario() {
        let doc = Document::parse("---\ndescription: [TODO]\n---\n## 1. Step\n## 2. Step\n");
        let report = LintReport::new("scenario.md", &doc);
        let grouped = report.grouped();

        let tracking = grouped
            .iter()
            .position(|f| f.category == Category::TaskTracking && f.severity == Severity::Blocking)
            .unwrap();
        let placeholder = grouped
            .iter()
            .position(|f| f.category == Category::Header && f.severity == Severity::Advisory)
            .unwrap();
        assert!(tracking < placeholder);
        assert!(of(&report.findings, Category::PostOpValidation).is_empty());
        assert!(report.has_blocking());
    }

    #[test]
    fn sanctioned_wildcard_passes() {
        let text = "---\ndescription: x\nallowed-tools:\n  - Bash(*)\n---\nRUN it\n";
        assert!(of(&lint_text(text), Category::Header).is_empty());
    }

    fn wildcard_findings(entry: &str) -> Vec<Finding> {
        let text = format!("---\ndescription: x\nallowed-tools:\n  - {entry}\n---\nRUN it\n");
        lint_text(&text)
            .into_iter()
            .filter(|f| f.category == Category::Header)
            .collect()
    }

    #[test]
    fn bare_wildcard_is_blocking() {
        let header = wildcard_findings("*");
        assert_eq!(header.len(), 1);
        assert_eq!(header[0].severity, Severity::Blocking);
        assert!(header[0].message.contains("wildcard"));
    }

    #[test]
    fn double_quoted_wildcard_is_blocking() {
        let header = wildcard_findings("\"*\"");
        assert_eq!(header.len(), 1);
        assert_eq!(header[0].severity, Severity::Blocking);
    }

    #[test]
    fn single_quoted_wildcard_is_blocking() {
        let header = wildcard_findings("'*'");
        assert_eq!(header.len(), 1);
        assert_eq!(header[0].severity, Severity::Blocking);
    }

    #[test]
    fn quoted_sanctioned_wildcard_passes() {
        assert!(wildcard_findings("\"Bash(*)\"").is_empty());
        assert!(wildcard_findings("'Bash(*)'").is_empty());
    }

    #[test]
    fn several_wildcards_report_once() {
        let text = "---\ndescription: x\nallowed-tools:\n  - \"*\"\n  - '*'\n---\nRUN it\n";
        assert_eq!(of(&lint_text(text), Category::Header).len(), 1);
    }

    #[test]
    fn unquote_needs_matching_pair() {
        assert_eq!(unquote("\"*\""), "*");
        assert_eq!(unquote("'*'"), "*");
        assert_eq!(unquote("\"*'"), "\"*'");
        assert_eq!(unquote("\""), "\"");
    }

    #[test]
    fn multi_step_without_marker_is_blocking() {
        let text = format!("{HEADER}## 1. One\n## 2. Two\nRUN it\n");
        let findings = lint_text(&text);
        let tracking = of(&findings, Category::TaskTracking);
        assert_eq!(tracking.len(), 1);
        assert_eq!(tracking[0].severity, Severity::Blocking);
    }

    #[test]
    fn adding_marker_only_removes_tracking_finding() {
        let steps = "## 1. One\n## 2. Two\nRUN it, for example\nmkdir out\ncopy to <target>\n";
        let marker = r#"TodoWrite: [{"content": "Первый", "status": "pending", "activeForm": "Делаю"}, {"content": "Второй", "status": "pending", "activeForm": "Делаю"}]"#;
        let without = lint_text(&format!("{HEADER}## 0. Plan\n{steps}"));
        let with = lint_text(&format!("{HEADER}## 0. Plan\n{marker}\n{steps}"));
        assert_eq!(of(&without, Category::TaskTracking).len(), 1);
        assert!(of(&with, Category::TaskTracking).is_empty());

        // Line numbers shift with the inserted marker; nothing else may change.
        let shape = |findings: &[Finding]| -> Vec<(Severity, Category, Option<String>)> {
            findings
                .iter()
                .filter(|f| f.category != Category::TaskTracking)
                .map(|f| (f.severity, f.category, f.suggestion.clone()))
                .collect()
        };
        let before = shape(&without);
        assert_eq!(before.len(), 3);
        assert_eq!(before, shape(&with));
    }

    #[test]
    fn english_marker_is_advisory() {
        let marker = r#"TodoWrite: [{"content": "First", "status": "pending", "activeForm": "Doing"}]"#;
        let text = format!("{HEADER}## 0. Plan\n{marker}\n## 1. One\nRUN it\n");
        let findings = lint_text(&text);
        let tracking = of(&findings, Category::TaskTracking);
        assert_eq!(tracking.len(), 1);
        assert!(tracking[0].message.contains("English"));
    }

    #[test]
    fn too_few_tracked_items_is_advisory() {
        let marker = r#"TodoWrite: [{"content": "Один", "status": "pending", "activeForm": "Делаю"}]"#;
        let text = format!("{HEADER}## 0. Plan\n{marker}\n## 1. One\n## 2. Two\nRUN it\n");
        let findings = lint_text(&text);
        let tracking = of(&findings, Category::TaskTracking);
        assert_eq!(tracking.len(), 1);
        assert_eq!(tracking[0].message, "TodoWrite has 1 items but command has 3 steps");
    }

    #[test]
    fn every_vague_occurrence_is_reported_with_line() {
        let text = format!("{HEADER}RUN this.\nFor example, an example.\n");
        let findings = lint_text(&text);
        let clarity = of(&findings, Category::Clarity);
        assert_eq!(clarity.len(), 2);
        assert!(clarity.iter().all(|f| f.line == Some(8)));
        assert!(clarity[0].message.starts_with("Line 8: Uses 'example'"));
    }

    #[test]
    fn missing_imperatives_is_informational() {
        let text = format!("{HEADER}Tag the release.\n");
        let findings = lint_text(&text);
        let clarity = of(&findings, Category::Clarity);
        assert_eq!(clarity.len(), 1);
        assert_eq!(clarity[0].severity, Severity::Informational);
    }

    #[test]
    fn shell_anti_patterns_each_reported() {
        let text = format!("{HEADER}RUN diff <(ls a) <(ls b)\necho ${{items[@]}}\n");
        let findings = lint_text(&text);
        let shell = of(&findings, Category::ShellPortability);
        assert_eq!(shell.len(), 3);
        assert_eq!(shell[0].line, Some(7));
        assert_eq!(shell[2].line, Some(8));
        assert!(shell[2].suggestion.is_some());
    }

    #[test]
    fn critical_ops_without_evidence_report_once() {
        let text = format!("{HEADER}RUN mkdir out\nRUN cp a out/\nRUN git commit -m x\n");
        let findings = lint_text(&text);
        let validation = of(&findings, Category::PostOpValidation);
        assert_eq!(validation.len(), 1);
        assert!(validation[0].message.contains("mkdir, cp, git commit"));
    }

    #[test]
    fn evidence_suppresses_validation_finding() {
        let text = format!("{HEADER}RUN mkdir out\nif [ ! -d out ]; then exit 1; fi\n");
        assert!(of(&lint_text(&text), Category::PostOpValidation).is_empty());
    }

    #[test]
    fn decimal_steps_each_reported_letters_once() {
        let marker = r#"TodoWrite: [{"content": "Шаг", "status": "pending", "activeForm": "Шаг"}]"#;
        let text = format!("{HEADER}{marker}\n## 1.5. Half\n## 2.5. Half\n## 3a. A\n## 3b. B\nRUN it\n");
        let findings = lint_text(&text);
        let numbering = of(&findings, Category::Numbering);
        assert_eq!(numbering.len(), 3);
        assert!(numbering[0].message.contains("Step 1.5"));
        assert!(numbering[1].message.contains("Step 2.5"));
        assert!(numbering[2].message.contains("letter sub-steps"));
    }

    #[test]
    fn placeholders_reported_per_occurrence() {
        let text = format!("{HEADER}RUN deploy {{app-name}} to <target>\n[TODO] fix\nuse your-token-here\n");
        let findings = lint_text(&text);
        let placeholders = of(&findings, Category::Placeholder);
        let labels: Vec<&str> = placeholders.iter().map(|f| f.message.as_str()).collect();
        assert_eq!(
            labels,
            [
                "Line 8: Found placeholder '[TODO]'",
                "Line 7: Found placeholder '{placeholder}'",
                "Line 7: Found placeholder '<placeholder>'",
                "Line 9: Found placeholder 'your-*-here'",
            ]
        );
    }

    #[test]
    fn lint_is_deterministic() {
        let text = format!("{HEADER}## 1. A\n## 2. B\nmkdir x\nexample {{x}}\n");
        assert_eq!(lint_text(&text), lint_text(&text));
    }

    #[test]
    fn counts_by_severity() {
        let report = LintReport::new("x.md", &Document::parse("no header here\n"));
        let counts = report.counts();
        assert_eq!(counts.blocking, 1);
        assert_eq!(counts.informational, 1);
        assert!(!report.is_clean());
    }
}
