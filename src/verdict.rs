//! Exit classification: the one place results turn into a process status.

use crate::index::CorpusIndex;
use crate::lint::LintReport;
use crate::refs::ReferenceReport;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Nothing needs attention.
    Pass,
    /// The linted document has at least one Blocking finding.
    Blocking,
    /// Other documents reference the target; deleting it needs care.
    Dependencies,
    /// The corpus held no readable command documents.
    Empty,
}

impl Verdict {
    pub fn of_lint(report: &LintReport) -> Self {
        if report.has_blocking() {
            Verdict::Blocking
        } else {
            Verdict::Pass
        }
    }

    pub fn of_references(report: &ReferenceReport) -> Self {
        if report.has_dependencies() {
            Verdict::Dependencies
        } else {
            Verdict::Pass
        }
    }

    pub fn of_index(index: &CorpusIndex) -> Self {
        if index.is_empty() {
            Verdict::Empty
        } else {
            Verdict::Pass
        }
    }

    pub fn exit_code(self) -> u8 {
        match self {
            Verdict::Pass => 0,
            Verdict::Blocking | Verdict::Dependencies | Verdict::Empty => 1,
        }
    }
}
