//! cmdlint — lint, cross-reference, and index markdown command definitions.
//!
//! - `cmdlint analyze deploy.md --detailed`
//! - `cmdlint refs deploy --claude-dir ~/.claude`
//! - `cmdlint index --commands-dir ~/.claude/commands --detailed`

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use cmdlint::render::{self, IndexOptions, Language};
use cmdlint::{corpus, logging, LintReport, Verdict};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(
    name = "cmdlint",
    about = "Lint, cross-reference, and index markdown command definitions"
)]
struct Cli {
    /// Log analysis progress to stderr
    #[arg(short = 'v', long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Check one command file against the rule set
    Analyze(AnalyzeArgs),
    /// Find references to a command before deleting it
    Refs(RefsArgs),
    /// Build an index of every command in a directory
    Index(IndexArgs),
}

#[derive(Args)]
struct AnalyzeArgs {
    /// Command file to analyze
    file: PathBuf,

    /// Show suggestions, informational findings, and recommendations
    #[arg(long)]
    detailed: bool,

    /// Output format: text (default) or json
    #[arg(short = 'f', long, default_value = "text")]
    format: String,
}

#[derive(Args)]
struct RefsArgs {
    /// Command name, with or without the leading /
    name: String,

    /// Root of the .claude tree (default: ~/.claude)
    #[arg(long)]
    claude_dir: Option<PathBuf>,

    /// Report language: ru (default) or en
    #[arg(long, default_value = "ru")]
    language: Language,

    /// Output format: text (default) or json
    #[arg(short = 'f', long, default_value = "text")]
    format: String,
}

#[derive(Args)]
struct IndexArgs {
    /// Commands directory (default: ~/.claude/commands)
    #[arg(long)]
    commands_dir: Option<PathBuf>,

    /// Append corpus statistics
    #[arg(long)]
    detailed: bool,

    /// One flat table instead of one table per category
    #[arg(long)]
    no_categories: bool,

    /// Number of most-used tools listed in the statistics
    #[arg(long, default_value_t = cmdlint::index::DEFAULT_TOP_CAPABILITIES)]
    top: usize,

    /// Output format: text (default) or json
    #[arg(short = 'f', long, default_value = "text")]
    format: String,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match run(cli.command) {
        Ok(verdict) => ExitCode::from(verdict.exit_code()),
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command) -> Result<Verdict> {
    match command {
        Command::Analyze(args) => analyze(&args),
        Command::Refs(args) => refs(&args),
        Command::Index(args) => index(&args),
    }
}

fn analyze(args: &AnalyzeArgs) -> Result<Verdict> {
    let renderer = render::create_renderer(&args.format)?;
    let doc = corpus::read_document(&args.file)
        .with_context(|| format!("cannot analyze {}", args.file.display()))?;
    let name = args
        .file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| args.file.display().to_string());

    let report = LintReport::new(name, &doc);
    print!("{}", renderer.lint(&report, args.detailed)?);
    Ok(Verdict::of_lint(&report))
}

fn refs(args: &RefsArgs) -> Result<Verdict> {
    let renderer = render::create_renderer(&args.format)?;
    let root = match &args.claude_dir {
        Some(dir) => dir.clone(),
        None => default_claude_dir()?,
    };
    let report = cmdlint::find_references(&args.name, &root)
        .with_context(|| format!("cannot search {}", root.display()))?;
    print!("{}", renderer.references(&report, args.language)?);
    Ok(Verdict::of_references(&report))
}

fn index(args: &IndexArgs) -> Result<Verdict> {
    let renderer = render::create_renderer(&args.format)?;
    let dir = match &args.commands_dir {
        Some(dir) => dir.clone(),
        None => default_claude_dir()?.join(cmdlint::refs::COMMANDS_DIR),
    };
    let index = cmdlint::scan_corpus(&dir)
        .with_context(|| format!("cannot index {}", dir.display()))?;

    let verdict = Verdict::of_index(&index);
    if verdict == Verdict::Empty {
        eprintln!("No commands found in {}", dir.display());
        return Ok(verdict);
    }

    let options = IndexOptions {
        group_by_category: !args.no_categories,
        detailed: args.detailed,
        top_capabilities: args.top,
    };
    print!("{}", renderer.index(&index, &options)?);
    Ok(verdict)
}

fn default_claude_dir() -> Result<PathBuf> {
    dirs::home_dir()
        .map(|home| home.join(".claude"))
        .context("cannot determine home directory; pass the directory explicitly")
}
