//! cmdlint — analysis engine for markdown command definitions.
//!
//! A command definition is a markdown file opening with a `---` metadata
//! header (`description`, `allowed-tools`) followed by imperative
//! instructions. The crate offers three analyses over such files:
//!
//! - [`lint`] — check one document against a fixed rule set
//! - [`refs`] — find what else in a tree mentions a command
//! - [`index`] — score and categorize every command in a directory
//!
//! All analysis is pure over in-memory text; [`corpus`] is the only module
//! touching the filesystem, and it never writes.

pub mod corpus;
pub mod document;
pub mod error;
pub mod index;
pub mod lint;
pub mod logging;
pub mod model;
pub mod patterns;
pub mod refs;
pub mod render;
pub mod verdict;

pub use document::{Document, Metadata, StepHeading};
pub use error::{Error, Result};
pub use index::{build_index, scan_corpus, CorpusIndex, CorpusStats};
pub use lint::{lint, LintReport};
pub use model::{Category, CommandCategory, Complexity, Finding, IndexEntry, Reference, Role, Severity};
pub use refs::{find_references, ReferenceReport};
pub use verdict::Verdict;
