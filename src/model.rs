//! Result types produced by the analyzers, independent of output format.

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// Ordered by decreasing urgency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Severity {
    Blocking,
    Advisory,
    Informational,
}

impl Severity {
    pub const ALL: [Severity; 3] = [Severity::Blocking, Severity::Advisory, Severity::Informational];

    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Blocking => "Blocking",
            Severity::Advisory => "Advisory",
            Severity::Informational => "Informational",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rule family a finding belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Category {
    Header,
    TaskTracking,
    Clarity,
    ShellPortability,
    PostOpValidation,
    Numbering,
    Placeholder,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Header => "Header",
            Category::TaskTracking => "TaskTracking",
            Category::Clarity => "Clarity",
            Category::ShellPortability => "ShellPortability",
            Category::PostOpValidation => "PostOpValidation",
            Category::Numbering => "Numbering",
            Category::Placeholder => "Placeholder",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    pub severity: Severity,
    pub category: Category,
    pub message: String,
    /// 1-based line, for findings tied to one occurrence.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl Finding {
    pub fn new(severity: Severity, category: Category, message: impl Into<String>) -> Self {
        Finding {
            severity,
            category,
            message: message.into(),
            line: None,
            suggestion: None,
        }
    }

    /// Attach a line number and prefix the message with it.
    pub fn at_line(mut self, line: usize) -> Self {
        self.message = format!("Line {}: {}", line, self.message);
        self.line = Some(line);
        self
    }

    pub fn suggest(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

/// Where a referencing document sits relative to the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Role {
    /// Another command definition.
    PeerDocument,
    /// Guides and the top-level readme.
    Narrative,
    /// The designated configuration document.
    Configuration,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::PeerDocument, Role::Narrative, Role::Configuration];
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reference {
    pub path: PathBuf,
    pub line: usize,
    /// Matched line, trimmed.
    pub text: String,
    /// The matched line with one neighbor on each side, clipped at the
    /// document edges.
    pub context: String,
    pub role: Role,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Complexity {
    Simple,
    Medium,
    Complex,
}

impl Complexity {
    pub const ALL: [Complexity; 3] = [Complexity::Simple, Complexity::Medium, Complexity::Complex];

    pub fn from_score(score: u32) -> Self {
        match score {
            0..=9 => Complexity::Simple,
            10..=29 => Complexity::Medium,
            _ => Complexity::Complex,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Complexity::Simple => "Simple",
            Complexity::Medium => "Medium",
            Complexity::Complex => "Complex",
        }
    }
}

impl fmt::Display for Complexity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Closed set of index categories; `Other` is the explicit fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum CommandCategory {
    ProjectInitialization,
    FeatureDevelopment,
    TaskManagement,
    TechnicalPlanning,
    Infrastructure,
    CommandManagement,
    MetaSystem,
    Other,
}

impl CommandCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            CommandCategory::ProjectInitialization => "Project Initialization",
            CommandCategory::FeatureDevelopment => "Feature Development",
            CommandCategory::TaskManagement => "Task Management",
            CommandCategory::TechnicalPlanning => "Technical Planning",
            CommandCategory::Infrastructure => "Infrastructure",
            CommandCategory::CommandManagement => "Command Management",
            CommandCategory::MetaSystem => "Meta/System",
            CommandCategory::Other => "Other",
        }
    }
}

impl fmt::Display for CommandCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the corpus index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexEntry {
    pub name: String,
    pub description: String,
    pub capabilities: Vec<String>,
    pub capability_count: usize,
    pub score: u32,
    pub complexity: Complexity,
    pub category: CommandCategory,
    pub step_count: usize,
    pub uses_tracking_marker: bool,
    pub has_validation_evidence: bool,
}

/// A file a corpus scan could not read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanWarning {
    pub path: PathBuf,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_orders_by_urgency() {
        assert!(Severity::Blocking < Severity::Advisory);
        assert!(Severity::Advisory < Severity::Informational);
    }

    #[test]
    fn complexity_thresholds() {
        assert_eq!(Complexity::from_score(0), Complexity::Simple);
        assert_eq!(Complexity::from_score(9), Complexity::Simple);
        assert_eq!(Complexity::from_score(10), Complexity::Medium);
        assert_eq!(Complexity::from_score(29), Complexity::Medium);
        assert_eq!(Complexity::from_score(30), Complexity::Complex);
    }

    #[test]
    fn at_line_prefixes_message() {
        let finding = Finding::new(Severity::Advisory, Category::Clarity, "vague").at_line(4);
        assert_eq!(finding.message, "Line 4: vague");
        assert_eq!(finding.line, Some(4));
    }
}
