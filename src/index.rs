//! Corpus indexer. One [`IndexEntry`] per command plus corpus statistics.
//!
//! Signals come from the same document accessors and evidence pattern the
//! linter uses; the indexer never runs the linter's report.

use crate::corpus;
use crate::document::Document;
use crate::error::Result;
use crate::lint::has_validation_evidence;
use crate::model::{CommandCategory, Complexity, IndexEntry, ScanWarning};
use serde::Serialize;
use std::path::Path;

/// Reported for documents without a description.
pub const NO_DESCRIPTION: &str = "No description";

/// Default length of the most-used capability list.
pub const DEFAULT_TOP_CAPABILITIES: usize = 10;

// -- Complexity ---------------------------------------------------------------

const CAPABILITY_WEIGHT: u32 = 2;
const STEP_WEIGHT: u32 = 3;
const TRACKING_MARKER_WEIGHT: u32 = 5;
const VALIDATION_WEIGHT: u32 = 3;
const LINES_PER_POINT: u32 = 20;

/// Inputs of the complexity score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ComplexityInputs {
    pub capability_count: usize,
    pub step_count: usize,
    pub uses_tracking_marker: bool,
    pub has_validation_evidence: bool,
    pub line_count: usize,
}

impl ComplexityInputs {
    pub fn of(doc: &Document) -> Self {
        ComplexityInputs {
            capability_count: doc.capabilities().len(),
            step_count: doc.step_headings().len(),
            uses_tracking_marker: doc.uses_tracking_marker(),
            has_validation_evidence: has_validation_evidence(doc),
            line_count: doc.line_count(),
        }
    }

    pub fn score(&self) -> u32 {
        let count = |n: usize| u32::try_from(n).unwrap_or(u32::MAX);
        CAPABILITY_WEIGHT
            .saturating_mul(count(self.capability_count))
            .saturating_add(STEP_WEIGHT.saturating_mul(count(self.step_count)))
            .saturating_add(if self.uses_tracking_marker { TRACKING_MARKER_WEIGHT } else { 0 })
            .saturating_add(if self.has_validation_evidence { VALIDATION_WEIGHT } else { 0 })
            .saturating_add(count(self.line_count) / LINES_PER_POINT)
    }
}

// -- Categories ---------------------------------------------------------------

/// A category matches when every clause has at least one keyword present.
struct KeywordGroup {
    category: CommandCategory,
    clauses: &'static [&'static [&'static str]],
}

/// First match wins; order matters.
const KEYWORD_GROUPS: &[KeywordGroup] = &[
    KeywordGroup {
        category: CommandCategory::ProjectInitialization,
        clauses: &[&["init", "setup"], &["project", "git"]],
    },
    KeywordGroup {
        category: CommandCategory::FeatureDevelopment,
        clauses: &[&["feature", "start", "new"]],
    },
    KeywordGroup {
        category: CommandCategory::TaskManagement,
        clauses: &[&["task", "plan", "wave"]],
    },
    KeywordGroup {
        category: CommandCategory::TechnicalPlanning,
        clauses: &[&["context", "spec", "tech"]],
    },
    KeywordGroup {
        category: CommandCategory::Infrastructure,
        clauses: &[&["infrastructure", "deploy", "docker"]],
    },
    KeywordGroup {
        category: CommandCategory::CommandManagement,
        clauses: &[&["command", "slash"]],
    },
    KeywordGroup {
        category: CommandCategory::MetaSystem,
        clauses: &[&["meta", "old", "audit"]],
    },
];

/// Category for a command from its name and description.
pub fn categorize(name: &str, description: &str) -> CommandCategory {
    let haystack = format!("{} {}", name, description).to_lowercase();
    KEYWORD_GROUPS
        .iter()
        .find(|group| {
            group
                .clauses
                .iter()
                .all(|clause| clause.iter().any(|kw| haystack.contains(kw)))
        })
        .map_or(CommandCategory::Other, |group| group.category)
}

// -- Entries ------------------------------------------------------------------

pub fn index_document(name: &str, doc: &Document) -> IndexEntry {
    let inputs = ComplexityInputs::of(doc);
    let score = inputs.score();
    let description = doc.description().unwrap_or(NO_DESCRIPTION).to_string();
    IndexEntry {
        name: name.to_string(),
        category: categorize(name, &description),
        description,
        capabilities: doc.capabilities().to_vec(),
        capability_count: inputs.capability_count,
        score,
        complexity: Complexity::from_score(score),
        step_count: inputs.step_count,
        uses_tracking_marker: inputs.uses_tracking_marker,
        has_validation_evidence: inputs.has_validation_evidence,
    }
}

/// Index named documents, keeping their order.
pub fn build_index<'a, I>(documents: I) -> Vec<IndexEntry>
where
    I: IntoIterator<Item = (&'a str, &'a Document)>,
{
    documents
        .into_iter()
        .map(|(name, doc)| index_document(name, doc))
        .collect()
}

/// Index of a commands directory.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CorpusIndex {
    pub entries: Vec<IndexEntry>,
    /// Files that could not be read and were skipped.
    pub warnings: Vec<ScanWarning>,
}

impl CorpusIndex {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self, top_n: usize) -> CorpusStats {
        CorpusStats::of(&self.entries, top_n)
    }
}

/// Index every `*.md` file directly inside `dir`, in path order. Files that
/// cannot be read are skipped and recorded as warnings.
pub fn scan_corpus(dir: &Path) -> Result<CorpusIndex> {
    corpus::require(dir)?;
    let mut index = CorpusIndex::default();
    for path in corpus::list_markdown(dir)? {
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        match corpus::read_text(&path) {
            Ok(text) => {
                let entry = index_document(&name, &Document::parse(text));
                tracing::debug!(name = %entry.name, score = entry.score, "indexed");
                index.entries.push(entry);
            }
            Err(e) => {
                tracing::warn!("skipping {}", e);
                index.warnings.push(ScanWarning {
                    path,
                    message: e.to_string(),
                });
            }
        }
    }
    Ok(index)
}

// -- Statistics ---------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Share {
    pub count: usize,
    pub total: usize,
    pub percent: f64,
}

impl Share {
    fn new(count: usize, total: usize) -> Self {
        let percent = if total == 0 {
            0.0
        } else {
            count as f64 / total as f64 * 100.0
        };
        Share { count, total, percent }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComplexityShare {
    pub complexity: Complexity,
    pub share: Share,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CapabilityUsage {
    pub name: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorpusStats {
    pub total: usize,
    /// Simple, Medium, Complex, in that order.
    pub complexity: Vec<ComplexityShare>,
    pub tracking_marker: Share,
    pub validation_evidence: Share,
    pub top_capabilities: Vec<CapabilityUsage>,
}

impl CorpusStats {
    pub fn of(entries: &[IndexEntry], top_n: usize) -> Self {
        let total = entries.len();
        let complexity = Complexity::ALL
            .into_iter()
            .map(|level| ComplexityShare {
                complexity: level,
                share: Share::new(entries.iter().filter(|e| e.complexity == level).count(), total),
            })
            .collect();
        CorpusStats {
            total,
            complexity,
            tracking_marker: Share::new(entries.iter().filter(|e| e.uses_tracking_marker).count(), total),
            validation_evidence: Share::new(
                entries.iter().filter(|e| e.has_validation_evidence).count(),
                total,
            ),
            top_capabilities: top_capabilities(entries, top_n),
        }
    }
}

/// `Bash(git:*)` counts as `Bash`.
pub fn normalize_capability(capability: &str) -> &str {
    capability.split('(').next().unwrap_or(capability).trim()
}

/// Most-used capabilities by descending count; ties keep first-seen order.
fn top_capabilities(entries: &[IndexEntry], top_n: usize) -> Vec<CapabilityUsage> {
    let mut usage: Vec<CapabilityUsage> = Vec::new();
    for capability in entries.iter().flat_map(|e| &e.capabilities) {
        let name = normalize_capability(capability);
        match usage.iter_mut().find(|u| u.name == name) {
            Some(existing) => existing.count += 1,
            None => usage.push(CapabilityUsage {
                name: name.to_string(),
                count: 1,
            }),
        }
    }
    // sort_by is stable
    usage.sort_by(|a, b| b.count.cmp(&a.count));
    usage.truncate(top_n);
    usage
}
