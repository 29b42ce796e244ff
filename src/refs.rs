//! Cross-document reference correlator.
//!
//! Finds mentions of a command in the rest of a `.claude`-style tree so a
//! deletion can be vetted. Nothing is modified; the report only lists what
//! would be affected.
//!
//! Layout searched under the root:
//!
//! | Path                         | Role          |
//! |------------------------------|---------------|
//! | `commands/**/*.md`           | PeerDocument  |
//! | `skills/*/guides/**/*.md`    | Narrative     |
//! | `README.md`                  | Narrative     |
//! | `CLAUDE.md`                  | Configuration |

use crate::corpus::{self, MARKDOWN_EXT};
use crate::error::{Error, Result};
use crate::model::{Reference, Role, ScanWarning};
use crate::patterns::reference_patterns;
use regex::Regex;
use serde::Serialize;
use std::path::{Path, PathBuf};

pub const COMMANDS_DIR: &str = "commands";
pub const GUIDES_PATTERN: &str = "skills/*/guides/**/*.md";
pub const README_FILE: &str = "README.md";
pub const CONFIG_FILE: &str = "CLAUDE.md";

/// Line matcher for one target name.
pub struct ReferenceMatcher {
    patterns: [Regex; 3],
}

impl ReferenceMatcher {
    pub fn new(name: &str) -> Self {
        ReferenceMatcher {
            patterns: reference_patterns(name),
        }
    }

    pub fn is_match(&self, line: &str) -> bool {
        self.patterns.iter().any(|re| re.is_match(line))
    }

    /// References in `text`, at most one per line, in line order.
    pub fn scan(&self, path: &Path, text: &str, role: Role) -> Vec<Reference> {
        let lines: Vec<&str> = text.lines().collect();
        lines
            .iter()
            .enumerate()
            .filter(|(_, line)| self.is_match(line))
            .map(|(idx, line)| {
                let start = idx.saturating_sub(1);
                let end = (idx + 2).min(lines.len());
                Reference {
                    path: path.to_path_buf(),
                    line: idx + 1,
                    text: line.trim().to_string(),
                    context: lines[start..end].join("\n"),
                    role,
                }
            })
            .collect()
    }
}

/// References to one command, grouped by role.
#[derive(Debug, Clone, Serialize)]
pub struct ReferenceReport {
    pub target: String,
    pub root: PathBuf,
    pub peers: Vec<Reference>,
    pub narrative: Vec<Reference>,
    pub configuration: Vec<Reference>,
    /// Files that could not be read and were skipped.
    pub warnings: Vec<ScanWarning>,
}

impl ReferenceReport {
    fn empty(target: &str, root: &Path) -> Self {
        ReferenceReport {
            target: target.to_string(),
            root: root.to_path_buf(),
            peers: Vec::new(),
            narrative: Vec::new(),
            configuration: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn by_role(&self, role: Role) -> &[Reference] {
        match role {
            Role::PeerDocument => &self.peers,
            Role::Narrative => &self.narrative,
            Role::Configuration => &self.configuration,
        }
    }

    fn bucket(&mut self, role: Role) -> &mut Vec<Reference> {
        match role {
            Role::PeerDocument => &mut self.peers,
            Role::Narrative => &mut self.narrative,
            Role::Configuration => &mut self.configuration,
        }
    }

    pub fn total(&self) -> usize {
        Role::ALL.iter().map(|&role| self.by_role(role).len()).sum()
    }

    /// Any reference at all means deleting the target needs care.
    pub fn has_dependencies(&self) -> bool {
        self.total() > 0
    }

    /// Roles with at least one reference, in [`Role::ALL`] order.
    pub fn affected_roles(&self) -> Vec<Role> {
        Role::ALL
            .into_iter()
            .filter(|&role| !self.by_role(role).is_empty())
            .collect()
    }

    /// `path` relative to the searched root, for display.
    pub fn relative<'a>(&self, path: &'a Path) -> &'a Path {
        path.strip_prefix(&self.root).unwrap_or(path)
    }
}

/// Search the tree at `root` for references to `target`. A leading `/` on
/// the target is ignored.
pub fn find_references(target: &str, root: &Path) -> Result<ReferenceReport> {
    if !root.is_dir() {
        return Err(Error::NotFound {
            path: root.to_path_buf(),
        });
    }
    let target = target.trim_start_matches('/');
    let matcher = ReferenceMatcher::new(target);
    let mut report = ReferenceReport::empty(target, root);

    for (path, role) in search_plan(target, root)? {
        match corpus::read_text(&path) {
            Ok(text) => {
                let found = matcher.scan(&path, &text, role);
                tracing::debug!(path = %path.display(), found = found.len(), "scanned");
                report.bucket(role).extend(found);
            }
            Err(e) => {
                tracing::warn!("skipping {}", e);
                report.warnings.push(ScanWarning {
                    path,
                    message: e.to_string(),
                });
            }
        }
    }

    Ok(report)
}

/// Files to search, in discovery order, each tagged with its role.
fn search_plan(target: &str, root: &Path) -> Result<Vec<(PathBuf, Role)>> {
    let own_file = format!("{target}.{MARKDOWN_EXT}");
    let mut plan = Vec::new();

    let commands = root.join(COMMANDS_DIR);
    if commands.is_dir() {
        plan.extend(
            corpus::list_markdown_recursive(&commands)?
                .into_iter()
                .filter(|p| p.file_name().and_then(|n| n.to_str()) != Some(own_file.as_str()))
                .map(|p| (p, Role::PeerDocument)),
        );
    }

    plan.extend(
        corpus::glob_files(root, GUIDES_PATTERN)?
            .into_iter()
            .map(|p| (p, Role::Narrative)),
    );

    let readme = root.join(README_FILE);
    if readme.is_file() {
        plan.push((readme, Role::Narrative));
    }

    let config = root.join(CONFIG_FILE);
    if config.is_file() {
        plan.push((config, Role::Configuration));
    }

    Ok(plan)
}
