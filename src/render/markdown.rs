//! GitHub-flavored markdown index of a commands directory.

use crate::index::{CorpusIndex, CorpusStats};
use crate::model::{CommandCategory, IndexEntry};
use crate::render::IndexOptions;
use std::collections::BTreeMap;

pub fn render_index(index: &CorpusIndex, options: &IndexOptions) -> String {
    let mut out = String::new();
    out.push_str("# Commands Index\n\n");
    out.push_str(&format!("Total commands: {}\n\n", index.entries.len()));

    if options.group_by_category {
        let mut groups: BTreeMap<&str, Vec<&IndexEntry>> = BTreeMap::new();
        for entry in &index.entries {
            groups.entry(entry.category.as_str()).or_default().push(entry);
        }
        for (category, mut entries) in groups {
            entries.sort_by(|a, b| a.name.cmp(&b.name));
            out.push_str(&format!("## {}\n\n", category));
            out.push_str("| Command | Description | Tools | Complexity |\n");
            out.push_str("|---------|-------------|-------|------------|\n");
            for entry in entries {
                out.push_str(&row(entry, None));
            }
            out.push('\n');
        }
    } else {
        let mut entries: Vec<&IndexEntry> = index.entries.iter().collect();
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        out.push_str("| Command | Description | Tools | Complexity | Category |\n");
        out.push_str("|---------|-------------|-------|------------|----------|\n");
        for entry in entries {
            out.push_str(&row(entry, Some(entry.category)));
        }
        out.push('\n');
    }

    if options.detailed {
        out.push_str("---\n\n");
        out.push_str(&render_stats(&index.stats(options.top_capabilities)));
    }

    out
}

fn row(entry: &IndexEntry, category: Option<CommandCategory>) -> String {
    let mut cells = vec![
        format!("`/{}`", entry.name),
        cell(&entry.description),
        entry.capability_count.to_string(),
        entry.complexity.to_string(),
    ];
    if let Some(category) = category {
        cells.push(category.to_string());
    }
    format!("| {} |\n", cells.join(" | "))
}

/// Keep multi-line descriptions and pipes from breaking the table.
fn cell(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ").replace('|', "\\|")
}

pub fn render_stats(stats: &CorpusStats) -> String {
    let mut out = String::new();
    out.push_str("## Statistics\n\n");

    out.push_str("**Complexity Distribution:**\n");
    for level in &stats.complexity {
        out.push_str(&format!(
            "- {}: {} ({:.1}%)\n",
            level.complexity, level.share.count, level.share.percent
        ));
    }
    out.push('\n');

    out.push_str(&format!(
        "**TodoWrite Usage:** {}/{} commands ({:.1}%)\n\n",
        stats.tracking_marker.count, stats.total, stats.tracking_marker.percent
    ));
    out.push_str(&format!(
        "**Validation Checks:** {}/{} commands ({:.1}%)\n\n",
        stats.validation_evidence.count, stats.total, stats.validation_evidence.percent
    ));

    out.push_str("**Most Used Tools:**\n");
    for usage in &stats.top_capabilities {
        out.push_str(&format!("- {}: {} commands\n", usage.name, usage.count));
    }
    out.push('\n');
    out
}
