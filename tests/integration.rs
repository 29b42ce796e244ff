use predicates::prelude::*;
use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

fn cmd() -> assert_cmd::Command {
    let mut cmd = assert_cmd::Command::from(Command::new(env!("CARGO_BIN_EXE_cmdlint")));
    cmd.env_remove("CMDLINT_LOG");
    cmd
}

fn fixture_path(name: &str) -> String {
    format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name)
}

fn write(root: &Path, rel: &str, text: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, text).unwrap();
}

/// A `.claude` tree holding the three fixtures as commands.
fn claude_tree() -> TempDir {
    let dir = TempDir::new().unwrap();
    for name in ["clean.md", "broken.md", "advisory.md"] {
        let text = fs::read_to_string(fixture_path(name)).unwrap();
        write(dir.path(), &format!("commands/{}", name), &text);
    }
    dir
}

// -- analyze --

#[test]
fn analyze_clean_command_passes() {
    cmd()
        .args(["analyze", &fixture_path("clean.md")])
        .assert()
        .success()
        .stdout(predicate::str::contains("Command Analysis: clean.md"))
        .stdout(predicate::str::contains("All checks passed"));
}

#[test]
fn analyze_blocking_findings_fail() {
    cmd()
        .args(["analyze", &fixture_path("broken.md")])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("[Header] Missing frontmatter"))
        .stdout(predicate::str::contains(
            "[TaskTracking] Command has 2 steps but no TodoWrite",
        ))
        .stdout(predicate::str::contains("[Numbering] Line 9: Step 1.5 uses decimal numbering"))
        .stdout(predicate::str::contains("Line 15: Found placeholder '<placeholder>'"))
        .stdout(predicate::str::contains("Suggestion").not());
}

#[test]
fn analyze_detailed_shows_suggestions() {
    cmd()
        .args(["analyze", "--detailed", &fixture_path("broken.md")])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("→ Suggestion:"))
        .stdout(predicate::str::contains("Recommendations"));
}

#[test]
fn analyze_advisory_only_passes() {
    cmd()
        .args(["analyze", &fixture_path("advisory.md")])
        .assert()
        .success()
        .stdout(predicate::str::contains("Advisory: 1"))
        .stdout(predicate::str::contains("Line 7: Uses 'example'"));
}

#[test]
fn analyze_missing_file_fails() {
    cmd()
        .args(["analyze", &fixture_path("absent.md")])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn analyze_json_format() {
    let assert = cmd()
        .args(["analyze", "-f", "json", &fixture_path("broken.md")])
        .assert()
        .code(1);
    let output = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(value["passed"], false);
    assert_eq!(value["summary"]["blocking"], 2);
    assert_eq!(value["findings"][0]["category"], "Header");
}

#[test]
fn invalid_format_fails() {
    cmd()
        .args(["analyze", "-f", "xml", &fixture_path("clean.md")])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown format"));
}

// -- refs --

#[test]
fn refs_reports_dependencies() {
    let tree = claude_tree();
    write(tree.path(), "commands/ship.md", "## 1. Go\nSlashCommand: /clean\n");
    write(tree.path(), "CLAUDE.md", "Always run /clean after tagging.\n");

    cmd()
        .args(["refs", "/clean", "--language", "en", "--claude-dir"])
        .arg(tree.path())
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Searching for references to /clean:"))
        .stdout(predicate::str::contains("Found in commands (1):"))
        .stdout(predicate::str::contains("commands/ship.md:2"))
        .stdout(predicate::str::contains("Found in config (1):"))
        .stdout(predicate::str::contains("WARNING: Found 2 references!"));
}

#[test]
fn refs_unused_command_is_safe() {
    let tree = claude_tree();

    cmd()
        .args(["refs", "broken", "--claude-dir"])
        .arg(tree.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Безопасно удалять."));
}

#[test]
fn refs_json_format() {
    let tree = claude_tree();
    write(tree.path(), "README.md", "See /advisory\n");

    let assert = cmd()
        .args(["refs", "advisory", "-f", "json", "--claude-dir"])
        .arg(tree.path())
        .assert()
        .code(1);
    let output = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(value["has_dependencies"], true);
    assert_eq!(value["narrative"][0]["line"], 1);
}

#[test]
fn refs_missing_root_fails() {
    let dir = TempDir::new().unwrap();
    cmd()
        .args(["refs", "x", "--claude-dir"])
        .arg(dir.path().join("absent"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

// -- index --

#[test]
fn index_groups_by_category() {
    let tree = claude_tree();

    cmd()
        .args(["index", "--commands-dir"])
        .arg(tree.path().join("commands"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Total commands: 3"))
        .stdout(predicate::str::contains("## Other"))
        .stdout(predicate::str::contains("| `/broken` | No description | 0 |"))
        .stdout(predicate::str::contains("## Statistics").not());
}

#[test]
fn index_flat_with_statistics() {
    let tree = claude_tree();

    cmd()
        .args(["index", "--no-categories", "--detailed", "--commands-dir"])
        .arg(tree.path().join("commands"))
        .assert()
        .success()
        .stdout(predicate::str::contains("| Command | Description | Tools | Complexity | Category |"))
        .stdout(predicate::str::contains("## Statistics"))
        .stdout(predicate::str::contains("**TodoWrite Usage:** 1/3 commands (33.3%)"))
        .stdout(predicate::str::contains("- Bash: 2 commands"));
}

#[test]
fn index_empty_directory_fails() {
    let dir = TempDir::new().unwrap();

    cmd()
        .args(["index", "--commands-dir"])
        .arg(dir.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("No commands found"));
}

#[test]
fn index_json_format() {
    let tree = claude_tree();

    let assert = cmd()
        .args(["index", "-f", "json", "--detailed", "--commands-dir"])
        .arg(tree.path().join("commands"))
        .assert()
        .success();
    let output = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(value["entries"].as_array().unwrap().len(), 3);
    assert_eq!(value["stats"]["total"], 3);
}
