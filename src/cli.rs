//! Command-line interface for gofacts.

use std::io::Write;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use globset::GlobSet;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::aggregate::{self, LintSummary, VisibilityFilter};
use crate::config::Config;
use crate::detect::{RunResult, Runner};
use crate::parser;
use crate::report::{self, OutputFormat};
use crate::telemetry;

/// Exit codes.
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILED: i32 = 1;
pub const EXIT_ERROR: i32 = 2;

/// Structural facts and defer-in-loop detection for Go sources.
///
/// gofacts parses Go files and reports function visibility, function
/// sizes, top-level var/const counts, and `defer` statements placed
/// directly inside loop bodies.
#[derive(Parser)]
#[command(name = "gofacts")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List package-level functions with their visibility
    Funcs(FuncsArgs),
    /// Report function sizes, largest first
    Sizes(SizesArgs),
    /// Count top-level var and const names per file
    Decls(DeclsArgs),
    /// Report defer statements directly inside loop bodies
    #[command(visible_alias = "check")]
    Lint(LintArgs),
}

/// Arguments shared by every command.
#[derive(Args)]
pub struct CommonArgs {
    /// Path to analyze (file or directory)
    pub path: PathBuf,

    /// Path to config YAML file (default: auto-discover)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Output format: pretty, json, vet, or sarif (lint only)
    #[arg(short, long, default_value = "pretty")]
    pub format: OutputFormat,

    /// Include `_test.go` files
    #[arg(long)]
    pub include_test_files: bool,
}

#[derive(Args)]
pub struct FuncsArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Which functions to list: all, exported, or unexported
    #[arg(long, default_value = "all")]
    pub filter: VisibilityFilter,
}

#[derive(Args)]
pub struct SizesArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Include methods as well as package functions
    #[arg(long)]
    pub include_methods: bool,

    /// Only show the N largest functions
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,
}

#[derive(Args)]
pub struct DeclsArgs {
    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Args)]
pub struct LintArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Show suppressed diagnostics in output
    #[arg(long)]
    pub show_suppressed: bool,

    /// Ignore `gofacts:ignore` comments
    #[arg(long)]
    pub no_suppress: bool,
}

/// Run the parsed command, writing results to `out`.
pub fn run<W: Write>(cli: &Cli, out: &mut W) -> anyhow::Result<i32> {
    match &cli.command {
        Commands::Funcs(args) => run_funcs(args, out),
        Commands::Sizes(args) => run_sizes(args, out),
        Commands::Decls(args) => run_decls(args, out),
        Commands::Lint(args) => run_lint(args, out),
    }
}

/// A resolved scan: root, config and the files to analyze.
struct Scan {
    root: PathBuf,
    config: Config,
    files: Vec<PathBuf>,
}

impl Scan {
    fn prepare(common: &CommonArgs) -> anyhow::Result<Self> {
        let cwd = std::env::current_dir()?;
        let config = Config::load(common.config.as_deref(), &cwd)?;
        telemetry::initialise(&config)?;
        parser::register_parsers()?;

        let root = common
            .path
            .canonicalize()
            .map_err(|e| anyhow::anyhow!("cannot access path {:?}: {}", common.path, e))?;

        let include_tests = common.include_test_files || config.should_include_test_files();
        let files = if root.is_dir() {
            collect_files(&root, include_tests, &config.exclusions()?)?
        } else {
            vec![root.clone()]
        };

        info!(root = %root.display(), files = files.len(), "scan prepared");
        Ok(Self { root, config, files })
    }

    fn run(&self, apply_suppressions: bool) -> RunResult {
        Runner::new(&self.root)
            .apply_suppressions(apply_suppressions)
            .run(&self.files)
    }
}

/// Collect `.go` files under `root`, in path order.
///
/// Hidden directories, `vendor` and `testdata` are skipped below the
/// root. Excluded globs match paths relative to `root`.
pub fn collect_files(
    root: &Path,
    include_test_files: bool,
    excluded: &GlobSet,
) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    let walker = WalkDir::new(root)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| {
            if e.depth() == 0 || !e.file_type().is_dir() {
                return true;
            }
            let name = e.file_name().to_string_lossy();
            !(name.starts_with('.') || name == "vendor" || name == "testdata")
        });

    for entry in walker {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("go") {
            continue;
        }

        let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
        if !include_test_files && name.ends_with("_test.go") {
            continue;
        }

        let rel = path.strip_prefix(root).unwrap_or(path);
        if excluded.is_match(rel) {
            debug!(path = %rel.display(), "excluded by config");
            continue;
        }

        files.push(path.to_path_buf());
    }

    Ok(files)
}

/// Print failures to stderr. Returns true if there were any.
fn report_failures(result: &RunResult) -> bool {
    for failure in &result.failures {
        eprintln!("Error: {}", failure.error);
    }
    result.has_failures()
}

fn require_non_sarif(format: OutputFormat) -> anyhow::Result<()> {
    if format == OutputFormat::Sarif {
        anyhow::bail!("the sarif format is only available for lint");
    }
    Ok(())
}

fn finish(scan: &Scan, result: &RunResult, clean_exit: i32) -> i32 {
    if scan.files.is_empty() {
        warn!("no Go files to analyze");
    }
    if report_failures(result) {
        EXIT_ERROR
    } else {
        clean_exit
    }
}

/// Run the funcs command.
pub fn run_funcs<W: Write>(args: &FuncsArgs, out: &mut W) -> anyhow::Result<i32> {
    require_non_sarif(args.common.format)?;
    let scan = Scan::prepare(&args.common)?;
    let result = scan.run(false);

    let listing = aggregate::visibility_listing(result.facts(), args.filter);
    report::write_functions(out, &listing, args.common.format)?;

    Ok(finish(&scan, &result, EXIT_SUCCESS))
}

/// Run the sizes command.
pub fn run_sizes<W: Write>(args: &SizesArgs, out: &mut W) -> anyhow::Result<i32> {
    require_non_sarif(args.common.format)?;
    let scan = Scan::prepare(&args.common)?;
    let result = scan.run(false);

    let include_methods = args.include_methods || scan.config.should_include_methods();
    let mut records = aggregate::size_report(result.facts(), include_methods);
    if let Some(limit) = args.limit {
        records.truncate(limit);
    }
    report::write_sizes(out, &records, args.common.format)?;

    Ok(finish(&scan, &result, EXIT_SUCCESS))
}

/// Run the decls command.
pub fn run_decls<W: Write>(args: &DeclsArgs, out: &mut W) -> anyhow::Result<i32> {
    require_non_sarif(args.common.format)?;
    let scan = Scan::prepare(&args.common)?;
    let result = scan.run(false);

    let packages = aggregate::decl_summary(result.facts());
    report::write_decls(out, &packages, args.common.format)?;

    Ok(finish(&scan, &result, EXIT_SUCCESS))
}

/// Run the lint command.
pub fn run_lint<W: Write>(args: &LintArgs, out: &mut W) -> anyhow::Result<i32> {
    let scan = Scan::prepare(&args.common)?;
    let result = scan.run(!args.no_suppress);

    let summary = LintSummary::from_reports(&result.reports);
    report::write_lint(out, &summary, args.common.format, args.show_suppressed)?;

    let clean_exit = if summary.is_clean() {
        EXIT_SUCCESS
    } else {
        EXIT_FAILED
    };
    Ok(finish(&scan, &result, clean_exit))
}

#[cfg(test)]
mod tests {
    use super::*;
    use globset::GlobSetBuilder;
    use std::fs;
    use tempfile::TempDir;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "package p\n").unwrap();
    }

    fn names(root: &Path, files: &[PathBuf]) -> Vec<String> {
        files
            .iter()
            .map(|f| f.strip_prefix(root).unwrap().to_string_lossy().replace('\\', "/"))
            .collect()
    }

    #[test]
    fn test_collect_files_skips() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        touch(root, "main.go");
        touch(root, "main_test.go");
        touch(root, "notes.txt");
        touch(root, "pkg/util.go");
        touch(root, "vendor/dep/dep.go");
        touch(root, "testdata/fixture.go");
        touch(root, ".hidden/x.go");
        touch(root, "gen/api.go");

        let mut builder = GlobSetBuilder::new();
        builder.add(globset::Glob::new("gen/**").unwrap());
        let excluded = builder.build().unwrap();

        let files = collect_files(root, false, &excluded).unwrap();
        assert_eq!(names(root, &files), vec!["main.go", "pkg/util.go"]);

        let files = collect_files(root, true, &GlobSet::empty()).unwrap();
        assert_eq!(
            names(root, &files),
            vec!["gen/api.go", "main.go", "main_test.go", "pkg/util.go"]
        );
    }

    #[test]
    fn test_testdata_root_is_walked() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("testdata");
        touch(&root, "a.go");
        let files = collect_files(&root, false, &GlobSet::empty()).unwrap();
        assert_eq!(files.len(), 1);
    }

    #[test]
    fn test_cli_parses_subcommands() {
        let cli = Cli::try_parse_from(["gofacts", "check", ".", "--format", "vet"]).unwrap();
        match cli.command {
            Commands::Lint(args) => assert_eq!(args.common.format, OutputFormat::Vet),
            _ => panic!("expected lint"),
        }

        let cli = Cli::try_parse_from(["gofacts", "funcs", ".", "--filter", "unexported"]).unwrap();
        match cli.command {
            Commands::Funcs(args) => assert_eq!(args.filter, VisibilityFilter::Unexported),
            _ => panic!("expected funcs"),
        }

        assert!(Cli::try_parse_from(["gofacts", "sizes", ".", "--format", "xml"]).is_err());
    }
}
