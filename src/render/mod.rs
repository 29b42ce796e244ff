//! Renderer module — trait-based format dispatch.

pub mod json;
pub mod markdown;
pub mod text;

use crate::error::{Error, Result};
use crate::index::CorpusIndex;
use crate::lint::LintReport;
use crate::refs::ReferenceReport;
use std::fmt;
use std::str::FromStr;

/// Language of the reference report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Language {
    #[default]
    Russian,
    English,
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "ru" => Ok(Language::Russian),
            "en" => Ok(Language::English),
            other => Err(format!("unknown language: {}. Use ru or en", other)),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Language::Russian => "ru",
            Language::English => "en",
        })
    }
}

/// Layout of the index report.
#[derive(Debug, Clone, Copy)]
pub struct IndexOptions {
    /// One table per category instead of a single flat table.
    pub group_by_category: bool,
    /// Append corpus statistics.
    pub detailed: bool,
    /// Length of the most-used capability list.
    pub top_capabilities: usize,
}

impl Default for IndexOptions {
    fn default() -> Self {
        IndexOptions {
            group_by_category: true,
            detailed: false,
            top_capabilities: crate::index::DEFAULT_TOP_CAPABILITIES,
        }
    }
}

/// Trait for rendering analysis results into a specific output format.
pub trait Renderer {
    fn lint(&self, report: &LintReport, detailed: bool) -> Result<String>;
    fn references(&self, report: &ReferenceReport, language: Language) -> Result<String>;
    fn index(&self, index: &CorpusIndex, options: &IndexOptions) -> Result<String>;
}

/// Create a renderer for the given format name.
pub fn create_renderer(format: &str) -> Result<Box<dyn Renderer>> {
    match format {
        "text" | "md" | "markdown" => Ok(Box::new(text::TextRenderer)),
        "json" => Ok(Box::new(json::JsonRenderer)),
        _ => Err(Error::UnknownFormat(format.to_string())),
    }
}
