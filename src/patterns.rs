//! Pattern library — every detection rule the analyzers share.
//!
//! Patterns are compiled once and never depend on a particular document.
//! Tables are ordered: the linter walks them front to back, and that order is
//! the order findings come out in.

use regex::Regex;
use std::sync::LazyLock;

// -- Header -------------------------------------------------------------------

/// Metadata header: opening `---`, content, closing `---`, anchored at the
/// very start of the text.
pub static RE_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)\A---[ \t]*\r?\n(?:(.*?)\r?\n)?---[ \t]*(?:\r?\n|\z)").unwrap()
});

/// A level-2+ markdown heading. Never valid inside a header block, so a
/// candidate block holding one ran past a missing closing delimiter.
pub static RE_BODY_HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^#{2,6}[ \t]+\S").unwrap());

/// A top-level `key:` line inside the header.
pub static RE_TOP_LEVEL_KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Za-z_][A-Za-z0-9_-]*)[ \t]*:(.*)$").unwrap());

/// An indented `- entry` list item.
pub static RE_LIST_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[ \t]+-[ \t]+(\S.*?)[ \t]*$").unwrap());

pub const DESCRIPTION_KEY: &str = "description";
pub const CAPABILITIES_KEY: &str = "allowed-tools";

/// Tokens that mark a description as unfinished.
pub const DESCRIPTION_PLACEHOLDERS: &[&str] = &["[TODO]", "TBD"];

/// The only wildcard capability tolerated in `allowed-tools`.
pub const SANCTIONED_WILDCARD: &str = "Bash(*)";

// -- Steps --------------------------------------------------------------------

/// `## 3. Label` or `## 1.5. Label`; group 1 is the integer, group 2 the
/// optional decimal suffix.
pub static RE_STEP_HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^##[ \t]+(\d+)(?:\.(\d+))?\.[ \t]+\S").unwrap());

/// `## 1a. Label`
pub static RE_LETTERED_STEP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^##[ \t]+\d+[a-zA-Z]\.[ \t]+\S").unwrap());

// -- Task tracking ------------------------------------------------------------

pub const TRACKING_MARKER: &str = "TodoWrite";
pub const TRACKING_FIELDS: &[&str] = &["status", "activeForm"];

/// The marker token followed by its first bracketed item list.
pub static RE_TRACKING_SECTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)TodoWrite.*?\[.*?\]").unwrap());

pub static RE_TRACKED_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""content":\s*"([^"]+)""#).unwrap());

/// Tracked items are user-facing and must be written in Russian.
pub static RE_TARGET_ALPHABET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[а-яА-ЯёЁ]").unwrap());

// -- Clarity ------------------------------------------------------------------

/// A pattern paired with the message reported for each match.
pub struct TextRule {
    pub regex: LazyLock<Regex>,
    pub label: &'static str,
    pub message: &'static str,
    pub suggestion: &'static str,
}

macro_rules! text_rule {
    ($re:expr, $label:expr, $message:expr, $suggestion:expr) => {
        TextRule {
            regex: LazyLock::new(|| Regex::new($re).unwrap()),
            label: $label,
            message: $message,
            suggestion: $suggestion,
        }
    };
}

const IMPERATIVE_HINT: &str = "Use imperative verbs: EXECUTE, RUN, CREATE, VERIFY";

pub static VAGUE_LANGUAGE: [TextRule; 6] = [
    text_rule!(r"(?i)\bexample\b", "example", "Uses 'example' - be explicit instead", IMPERATIVE_HINT),
    text_rule!(r"(?i)\byou can\b", "you can", "Uses 'you can' - use imperative form instead", IMPERATIVE_HINT),
    text_rule!(r"(?i)\bconsider\b", "consider", "Uses 'consider' - be explicit instead", IMPERATIVE_HINT),
    text_rule!(r"(?i)\bmight want to\b", "might want to", "Uses 'might want to' - be explicit instead", IMPERATIVE_HINT),
    text_rule!(r"(?i)\bsimilar to\b", "similar to", "Uses 'similar to' - provide exact command instead", IMPERATIVE_HINT),
    text_rule!(r"(?i)\bsomething like\b", "something like", "Uses 'something like' - be specific instead", IMPERATIVE_HINT),
];

pub const IMPERATIVE_VERBS: &[&str] = &["EXECUTE", "RUN", "CREATE", "VERIFY", "CHECK", "ASK"];

// -- Shell portability --------------------------------------------------------

pub static SHELL_ANTI_PATTERNS: [TextRule; 3] = [
    text_rule!(
        r"\$\(.*\|.*while\s+read",
        "pipe-into-read",
        "Complex pipe in command substitution may not work in zsh",
        "Use temp files instead: cmd > /tmp/file.txt; while read line; done < /tmp/file.txt"
    ),
    text_rule!(
        r"<\([^)]+\)",
        "process-substitution",
        "Process substitution may not work consistently",
        "Use temp files instead of process substitution"
    ),
    text_rule!(
        r"\$\{.*\[@\].*\}",
        "array-expansion",
        "Bash array syntax may not work in zsh",
        "Use simple loops or temp files instead"
    ),
];

// -- Post-operation validation ------------------------------------------------

/// Operations whose success should be verified; `message` holds the
/// operation name and `suggestion` the matching verification idiom.
pub static CRITICAL_OPERATIONS: [TextRule; 6] = [
    text_rule!(r"\bmkdir\s+", "mkdir", "mkdir", "Verify directory created with: if [ ! -d dir ]; then echo ERROR; fi"),
    text_rule!(r"\bcp\s+", "cp", "cp", "Verify file copied with: if [ ! -f dest ]; then echo ERROR; fi"),
    text_rule!(r"\bmv\s+", "mv", "mv", "Verify file moved with: if [ ! -f dest ]; then echo ERROR; fi"),
    text_rule!(r"\bgit commit\s+", "git commit", "git commit", "Verify commit with: git log -1 --oneline"),
    text_rule!(r"\bgit push\s+", "git push", "git push", "Check exit code: if [ $? -ne 0 ]; then echo ERROR; fi"),
    text_rule!(r"\bnpm run build", "npm run build", "npm run build", "Verify build output exists: if [ ! -d dist ]; then echo ERROR; fi"),
];

/// Any one of these anywhere in a document counts as validation evidence.
pub static RE_VALIDATION_EVIDENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?i)",
        r#"if \[|&& echo "SUCCESS"|\|\| echo "FAILED"|exit 1|VERIFY|CHECK"#
    ))
    .unwrap()
});

// -- Placeholders -------------------------------------------------------------

pub static PLACEHOLDERS: [TextRule; 6] = [
    text_rule!(r"(?i)\[TODO\]", "[TODO]", "[TODO]", PLACEHOLDER_HINT),
    text_rule!(r"(?i)\[TBD\]", "[TBD]", "[TBD]", PLACEHOLDER_HINT),
    text_rule!(r"(?i)\[FIXME\]", "[FIXME]", "[FIXME]", PLACEHOLDER_HINT),
    text_rule!(r"\{[a-z-]+\}", "{placeholder}", "{placeholder}", PLACEHOLDER_HINT),
    text_rule!(r"<[a-z-]+>", "<placeholder>", "<placeholder>", PLACEHOLDER_HINT),
    text_rule!(r"(?i)your-.*-here", "your-*-here", "your-*-here", PLACEHOLDER_HINT),
];

const PLACEHOLDER_HINT: &str = "Replace placeholders with actual values before using command";

// -- References ---------------------------------------------------------------

/// Tool token that dispatches one command from another.
pub const DISPATCH_TOOL: &str = "SlashCommand";

/// Invocation, tool-dispatch, and bare-name patterns for `name`.
pub fn reference_patterns(name: &str) -> [Regex; 3] {
    let escaped = regex::escape(name);
    let build = |pattern: String| {
        Regex::new(&format!("(?i){pattern}")).expect("escaped name yields a valid pattern")
    };
    [
        build(format!("/{escaped}")),
        build(format!("{DISPATCH_TOOL}.*{escaped}")),
        build(escaped),
    ]
}

// -- Helpers ------------------------------------------------------------------

/// 1-based line number of a byte offset.
pub fn line_at(text: &str, offset: usize) -> usize {
    text[..offset].matches('\n').count() + 1
}
