//! Document model — a command definition split into header and body.
//!
//! Parsing is total: text without a header is still a document, with no
//! metadata and a body equal to the whole text.

use crate::patterns::{
    line_at, CAPABILITIES_KEY, DESCRIPTION_KEY, RE_BODY_HEADING, RE_HEADER, RE_LIST_ITEM,
    RE_STEP_HEADING, RE_TOP_LEVEL_KEY, TRACKING_FIELDS, TRACKING_MARKER,
};
use std::sync::OnceLock;

/// Fields read from the metadata header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata {
    /// Value of `description`, trimmed. `None` when the key is absent or blank.
    pub description: Option<String>,
    /// Entries of the `allowed-tools` list. `None` when the key is absent or
    /// carries no `- entry` lines.
    pub allowed_capabilities: Option<Vec<String>>,
}

impl Metadata {
    /// Capability list, empty when missing.
    pub fn capabilities(&self) -> &[String] {
        self.allowed_capabilities.as_deref().unwrap_or(&[])
    }
}

/// A `## N. Label` heading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepHeading {
    /// Number as written, e.g. `"2"` or `"1.5"`.
    pub number: String,
    /// Digits after the decimal point, if any.
    pub fraction: Option<String>,
    /// 1-based line in the full text.
    pub line: usize,
}

impl StepHeading {
    /// `1.5` is decimal; `2` and `2.0` are not.
    pub fn is_decimal(&self) -> bool {
        self.fraction
            .as_deref()
            .is_some_and(|digits| digits.chars().any(|c| c != '0'))
    }
}

#[derive(Debug, Clone)]
pub struct Document {
    raw: String,
    metadata: Option<Metadata>,
    body_start: usize,
    steps: OnceLock<Vec<StepHeading>>,
    tracking_marker: OnceLock<bool>,
}

impl Document {
    pub fn parse(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let header = RE_HEADER.captures(&raw).and_then(|caps| {
            let block = caps.get(1).map_or("", |m| m.as_str());
            let end = caps.get(0).map_or(0, |m| m.end());
            // An unclosed header must not swallow the body up to a later `---`.
            (!RE_BODY_HEADING.is_match(block)).then(|| (parse_metadata(block), end))
        });
        let (metadata, body_start) = match header {
            Some((metadata, end)) => (Some(metadata), end),
            None => (None, 0),
        };
        Document {
            raw,
            metadata,
            body_start,
            steps: OnceLock::new(),
            tracking_marker: OnceLock::new(),
        }
    }

    pub fn raw_text(&self) -> &str {
        &self.raw
    }

    pub fn metadata(&self) -> Option<&Metadata> {
        self.metadata.as_ref()
    }

    pub fn description(&self) -> Option<&str> {
        self.metadata.as_ref()?.description.as_deref()
    }

    pub fn capabilities(&self) -> &[String] {
        match &self.metadata {
            Some(meta) => meta.capabilities(),
            None => &[],
        }
    }

    /// Text after the header.
    pub fn body(&self) -> &str {
        &self.raw[self.body_start..]
    }

    /// 1-based line in the full text for a byte offset into [`Self::body`].
    pub fn body_line(&self, body_offset: usize) -> usize {
        line_at(&self.raw, self.body_start + body_offset)
    }

    pub fn step_headings(&self) -> &[StepHeading] {
        self.steps.get_or_init(|| {
            RE_STEP_HEADING
                .captures_iter(self.body())
                .map(|caps| {
                    let whole = caps.get(0).map_or(0, |m| m.start());
                    let fraction = caps.get(2).map(|m| m.as_str().to_string());
                    let number = match &fraction {
                        Some(digits) => format!("{}.{}", &caps[1], digits),
                        None => caps[1].to_string(),
                    };
                    StepHeading {
                        number,
                        fraction,
                        line: self.body_line(whole),
                    }
                })
                .collect()
        })
    }

    /// Marker token plus both sub-field tokens appear somewhere in the body.
    /// Order and proximity are not checked.
    pub fn uses_tracking_marker(&self) -> bool {
        *self.tracking_marker.get_or_init(|| {
            let body = self.body();
            body.contains(TRACKING_MARKER) && TRACKING_FIELDS.iter().all(|f| body.contains(f))
        })
    }

    /// Number of `\n`-separated segments, so a trailing newline counts as an
    /// extra (empty) line.
    pub fn line_count(&self) -> usize {
        self.raw.split('\n').count()
    }
}

fn parse_metadata(block: &str) -> Metadata {
    let lines: Vec<&str> = block.lines().collect();
    Metadata {
        description: scalar_value(&lines, DESCRIPTION_KEY),
        allowed_capabilities: list_value(&lines, CAPABILITIES_KEY),
    }
}

/// First value bound to `key`, continuing over lines until the next
/// top-level key.
fn scalar_value(lines: &[&str], key: &str) -> Option<String> {
    let start = lines.iter().position(|line| top_level_key(line) == Some(key))?;
    let mut value = RE_TOP_LEVEL_KEY
        .captures(lines[start])
        .map(|caps| caps[2].trim().to_string())
        .unwrap_or_default();
    for line in &lines[start + 1..] {
        if top_level_key(line).is_some() {
            break;
        }
        let line = line.trim();
        if !line.is_empty() {
            if !value.is_empty() {
                value.push('\n');
            }
            value.push_str(line);
        }
    }
    (!value.is_empty()).then_some(value)
}

/// Indented `- entry` lines directly under `key:`.
fn list_value(lines: &[&str], key: &str) -> Option<Vec<String>> {
    let start = lines.iter().position(|line| top_level_key(line) == Some(key))?;
    let items: Vec<String> = lines[start + 1..]
        .iter()
        .map_while(|line| RE_LIST_ITEM.captures(line))
        .map(|caps| caps[1].to_string())
        .collect();
    (!items.is_empty()).then_some(items)
}

fn top_level_key(line: &str) -> Option<&str> {
    RE_TOP_LEVEL_KEY
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}
