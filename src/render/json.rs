//! JSON renderer — structured output for tooling integration.

use crate::error::Result;
use crate::index::{CorpusIndex, CorpusStats};
use crate::lint::{LintReport, SeverityCounts};
use crate::model::{Finding, IndexEntry, ScanWarning};
use crate::refs::ReferenceReport;
use crate::render::{IndexOptions, Language, Renderer};
use serde::Serialize;

pub struct JsonRenderer;

#[derive(Serialize)]
struct LintView<'a> {
    source: &'a str,
    passed: bool,
    summary: SeverityCounts,
    findings: Vec<&'a Finding>,
}

#[derive(Serialize)]
struct ReferencesView<'a> {
    has_dependencies: bool,
    total: usize,
    #[serde(flatten)]
    report: &'a ReferenceReport,
}

#[derive(Serialize)]
struct IndexView<'a> {
    entries: &'a [IndexEntry],
    #[serde(skip_serializing_if = "Option::is_none")]
    stats: Option<CorpusStats>,
    warnings: &'a [ScanWarning],
}

impl Renderer for JsonRenderer {
    fn lint(&self, report: &LintReport, _detailed: bool) -> Result<String> {
        let view = LintView {
            source: &report.source,
            passed: !report.has_blocking(),
            summary: report.counts(),
            findings: report.grouped(),
        };
        to_json(&view)
    }

    fn references(&self, report: &ReferenceReport, _language: Language) -> Result<String> {
        let view = ReferencesView {
            has_dependencies: report.has_dependencies(),
            total: report.total(),
            report,
        };
        to_json(&view)
    }

    fn index(&self, index: &CorpusIndex, options: &IndexOptions) -> Result<String> {
        let view = IndexView {
            entries: &index.entries,
            stats: options.detailed.then(|| index.stats(options.top_capabilities)),
            warnings: &index.warnings,
        };
        to_json(&view)
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<String> {
    let mut out = serde_json::to_string_pretty(value)?;
    out.push('\n');
    Ok(out)
}
