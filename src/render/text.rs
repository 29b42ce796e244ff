//! Console renderer for lint and reference reports. The index is markdown
//! either way and is delegated to [`super::markdown`].

use crate::error::Result;
use crate::index::CorpusIndex;
use crate::lint::LintReport;
use crate::model::{Finding, Reference, Role, Severity};
use crate::refs::ReferenceReport;
use crate::render::{markdown, IndexOptions, Language, Renderer};

pub struct TextRenderer;

const BANNER_WIDTH: usize = 60;

impl Renderer for TextRenderer {
    fn lint(&self, report: &LintReport, detailed: bool) -> Result<String> {
        Ok(render_lint(report, detailed))
    }

    fn references(&self, report: &ReferenceReport, language: Language) -> Result<String> {
        let strings = match language {
            Language::Russian => &RUSSIAN,
            Language::English => &ENGLISH,
        };
        Ok(render_references(report, strings))
    }

    fn index(&self, index: &CorpusIndex, options: &IndexOptions) -> Result<String> {
        Ok(markdown::render_index(index, options))
    }
}

fn banner(lines: &mut Vec<String>, title: &str) {
    let rule = "=".repeat(BANNER_WIDTH);
    lines.push(rule.clone());
    lines.push(title.to_string());
    lines.push(rule);
    lines.push(String::new());
}

// -- Lint ---------------------------------------------------------------------

fn render_lint(report: &LintReport, detailed: bool) -> String {
    let mut lines = Vec::new();
    banner(&mut lines, &format!("Command Analysis: {}", report.source));

    if report.is_clean() {
        lines.push("✅ All checks passed! Command looks good.".to_string());
        return finish(lines);
    }

    let counts = report.counts();
    lines.push("Summary:".to_string());
    lines.push(format!("  ❌ Blocking: {}", counts.blocking));
    lines.push(format!("  ⚠️  Advisory: {}", counts.advisory));
    lines.push(format!("  ℹ️  Informational: {}", counts.informational));
    lines.push(String::new());

    for severity in Severity::ALL {
        // Informational findings are only worth the space in detailed mode.
        if severity == Severity::Informational && !detailed {
            continue;
        }
        let findings: Vec<&Finding> = report.with_severity(severity).collect();
        if findings.is_empty() {
            continue;
        }
        banner(&mut lines, section_title(severity));
        for finding in findings {
            lines.push(format!("[{}] {}", finding.category, finding.message));
            if detailed {
                if let Some(ref suggestion) = finding.suggestion {
                    lines.push(format!("  → Suggestion: {}", suggestion));
                }
            }
            lines.push(String::new());
        }
    }

    if detailed {
        banner(&mut lines, "Recommendations");
        if counts.blocking > 0 {
            lines.push("1. Fix all Blocking findings before using this command".to_string());
        }
        if counts.advisory > 0 {
            lines.push("2. Address Advisory findings to improve command quality".to_string());
        }
        if counts.blocking == 0 && counts.advisory == 0 {
            lines.push(
                "Command is in good shape! Consider Informational suggestions for further improvement."
                    .to_string(),
            );
        }
    }

    finish(lines)
}

fn section_title(severity: Severity) -> &'static str {
    match severity {
        Severity::Blocking => "❌ BLOCKING (must fix)",
        Severity::Advisory => "⚠️  ADVISORY (should fix)",
        Severity::Informational => "ℹ️  INFORMATIONAL (nice to have)",
    }
}

fn finish(lines: Vec<String>) -> String {
    let mut out = lines.join("\n");
    out.push('\n');
    out
}

// -- References ---------------------------------------------------------------

/// Report wording. Per-role tables follow [`Role::ALL`] order.
struct Strings {
    heading: &'static str,
    found_in: [&'static str; 3],
    not_found_in: [&'static str; 3],
    total_warning: &'static str,
    may_break: &'static str,
    affected: [&'static str; 3],
    closing_caution: &'static str,
    unused: &'static str,
    safe: &'static str,
}

fn per_role(table: &[&'static str; 3], role: Role) -> &'static str {
    match role {
        Role::PeerDocument => table[0],
        Role::Narrative => table[1],
        Role::Configuration => table[2],
    }
}

const RUSSIAN: Strings = Strings {
    heading: "Поиск упоминаний команды",
    found_in: [
        "Найдено в командах",
        "Найдено в документации",
        "Найдено в конфиге",
    ],
    not_found_in: [
        "✓ Не найдено в других командах",
        "✓ Не найдено в документации",
        "✓ Не найдено в конфиге",
    ],
    total_warning: "⚠️  ВНИМАНИЕ: Найдено {n} упоминаний команды!",
    may_break: "Удаление этой команды может сломать:",
    affected: [
        "других команд",
        "документов",
        "конфигов",
    ],
    closing_caution: "Убедись, что обновил все зависимости перед удалением!",
    unused: "✅ Команда не используется в других местах",
    safe: "Безопасно удалять.",
};

const ENGLISH: Strings = Strings {
    heading: "Searching for references to",
    found_in: [
        "Found in commands",
        "Found in documentation",
        "Found in config",
    ],
    not_found_in: [
        "✓ Not found in other commands",
        "✓ Not found in documentation",
        "✓ Not found in config",
    ],
    total_warning: "⚠️  WARNING: Found {n} references!",
    may_break: "Deleting this command may break:",
    affected: [
        "other commands",
        "documents",
        "config files",
    ],
    closing_caution: "Update every dependency before deleting!",
    unused: "✅ Command not used elsewhere",
    safe: "Safe to delete.",
};

fn render_references(report: &ReferenceReport, s: &Strings) -> String {
    let mut lines = Vec::new();
    lines.push(format!("{} /{}:", s.heading, report.target));
    lines.push(String::new());

    for role in Role::ALL {
        let refs = report.by_role(role);
        if refs.is_empty() {
            lines.push(per_role(&s.not_found_in, role).to_string());
        } else {
            lines.push(format!("{} ({}):", per_role(&s.found_in, role), refs.len()));
            for reference in refs {
                push_reference(&mut lines, report, reference);
            }
        }
        lines.push(String::new());
    }

    if report.has_dependencies() {
        let total = report.total().to_string();
        banner(&mut lines, &s.total_warning.replace("{n}", &total));
        lines.push(s.may_break.to_string());
        for role in report.affected_roles() {
            lines.push(format!("  - {} {}", report.by_role(role).len(), per_role(&s.affected, role)));
        }
        lines.push(String::new());
        lines.push(s.closing_caution.to_string());
    } else {
        banner(&mut lines, s.unused);
        lines.push(s.safe.to_string());
    }

    finish(lines)
}

fn push_reference(lines: &mut Vec<String>, report: &ReferenceReport, reference: &Reference) {
    lines.push(format!(
        "  - {}:{}",
        report.relative(&reference.path).display(),
        reference.line
    ));
    lines.push(format!("    {}", reference.text));
}
