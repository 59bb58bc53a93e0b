//! Detection runner: parse, classify and check a set of files.

use std::path::{Path, PathBuf};

use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, warn};

use super::{builtin_rules, parse_suppressions, Diagnostic, Rule, SuppressedDiagnostic, SuppressingSink};
use crate::analysis::{AnalysisContext, FileFacts, ParsedFile};
use crate::error::AnalysisError;

/// Everything learned about one file.
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub facts: FileFacts,
    /// Active diagnostics, in source order.
    pub diagnostics: Vec<Diagnostic>,
    /// Diagnostics silenced by inline comments.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suppressed: Vec<SuppressedDiagnostic>,
}

impl FileReport {
    pub fn path(&self) -> &str {
        &self.facts.path
    }
}

/// A file that could not be read or parsed.
#[derive(Debug)]
pub struct FileFailure {
    pub path: PathBuf,
    pub error: AnalysisError,
}

/// Outcome of a multi-file run.
#[derive(Debug, Default)]
pub struct RunResult {
    /// Per-file reports, sorted by path.
    pub reports: Vec<FileReport>,
    pub failures: Vec<FileFailure>,
}

impl RunResult {
    /// Number of files that were analyzed successfully.
    pub fn scanned(&self) -> usize {
        self.reports.len()
    }

    pub fn diagnostics(&self) -> impl Iterator<Item = &Diagnostic> {
        self.reports.iter().flat_map(|r| r.diagnostics.iter())
    }

    pub fn suppressed(&self) -> impl Iterator<Item = &SuppressedDiagnostic> {
        self.reports.iter().flat_map(|r| r.suppressed.iter())
    }

    pub fn facts(&self) -> impl Iterator<Item = &FileFacts> {
        self.reports.iter().map(|r| &r.facts)
    }

    pub fn has_diagnostics(&self) -> bool {
        self.diagnostics().next().is_some()
    }

    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }
}

/// Executes fact extraction and all rules against files.
///
/// Files are independent: each is parsed, classified and checked on its
/// own, so multi-file runs fan out over rayon's thread pool and join once
/// every file is done.
pub struct Runner {
    context: AnalysisContext,
    rules: Vec<Box<dyn Rule>>,
    apply_suppressions: bool,
}

impl Runner {
    /// Create a runner with the built-in rules.
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Self {
        Self {
            context: AnalysisContext::new(base_dir),
            rules: builtin_rules(),
            apply_suppressions: true,
        }
    }

    /// Set whether inline suppression comments are honoured.
    pub fn apply_suppressions(mut self, apply: bool) -> Self {
        self.apply_suppressions = apply;
        self
    }

    /// Analyze in-memory source under the display name `path`.
    pub fn analyze_source(&self, path: &str, source: &[u8]) -> Result<FileReport, AnalysisError> {
        let parsed = self.context.parse_source(path, source)?;
        Ok(self.check(&parsed))
    }

    /// Read and analyze one file.
    pub fn analyze_file<P: AsRef<Path>>(&self, path: P) -> Result<FileReport, AnalysisError> {
        let parsed = self.context.parse_file(path)?;
        Ok(self.check(&parsed))
    }

    fn check(&self, parsed: &ParsedFile) -> FileReport {
        let suppressions = if self.apply_suppressions {
            parse_suppressions(&parsed.path, &parsed.text)
        } else {
            Vec::new()
        };

        let mut sink = SuppressingSink::new(Vec::new(), suppressions);
        for rule in &self.rules {
            rule.check(&parsed.tree, &mut sink);
        }
        let (diagnostics, suppressed) = sink.into_parts();

        debug!(
            path = %parsed.path,
            diagnostics = diagnostics.len(),
            suppressed = suppressed.len(),
            "checked file"
        );

        FileReport {
            facts: self.context.facts(parsed),
            diagnostics,
            suppressed,
        }
    }

    /// Analyze every file in parallel.
    ///
    /// Failures are collected rather than aborting the run. Reports are
    /// sorted by path so output does not depend on scheduling.
    pub fn run(&self, files: &[PathBuf]) -> RunResult {
        let outcomes: Vec<_> = files
            .par_iter()
            .map(|path| (path, self.analyze_file(path)))
            .collect();

        let mut result = RunResult::default();
        for (path, outcome) in outcomes {
            match outcome {
                Ok(report) => result.reports.push(report),
                Err(error) => {
                    warn!(path = %path.display(), error = %error, "failed to analyze file");
                    result.failures.push(FileFailure {
                        path: path.clone(),
                        error,
                    });
                }
            }
        }

        result.reports.sort_by(|a, b| a.path().cmp(b.path()));
        result.failures.sort_by(|a, b| a.path.cmp(&b.path));
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const LOOPY: &str = r#"package main

func run(n int) {
    for i := 0; i < n; i++ {
        defer cleanup()
    }
}
"#;

    #[test]
    fn test_runner_basic() {
        let runner = Runner::new(".");
        let report = runner.analyze_source("main.go", LOOPY.as_bytes()).unwrap();

        assert_eq!(report.diagnostics.len(), 1);
        assert_eq!(report.diagnostics[0].line(), 5);
        assert_eq!(report.facts.functions.len(), 1);
        assert!(report.suppressed.is_empty());
    }

    #[test]
    fn test_runner_with_suppression() {
        let source = LOOPY.replace(
            "defer cleanup()",
            "defer cleanup() // gofacts:ignore loop-defer - bounded loop",
        );
        let runner = Runner::new(".");
        let report = runner.analyze_source("main.go", source.as_bytes()).unwrap();
        assert!(report.diagnostics.is_empty());
        assert_eq!(report.suppressed.len(), 1);
        assert_eq!(report.suppressed[0].suppression.reason, "bounded loop");

        let report = Runner::new(".")
            .apply_suppressions(false)
            .analyze_source("main.go", source.as_bytes())
            .unwrap();
        assert_eq!(report.diagnostics.len(), 1);
    }

    #[test]
    fn test_run_sorts_and_collects_failures() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("b.go"), LOOPY).unwrap();
        std::fs::write(temp.path().join("a.go"), "package main\n\nfunc ok() {}\n").unwrap();
        std::fs::write(temp.path().join("broken.go"), "package main\nfunc (").unwrap();

        let files = vec![
            temp.path().join("b.go"),
            temp.path().join("broken.go"),
            temp.path().join("a.go"),
        ];
        let result = Runner::new(temp.path()).run(&files);

        let paths: Vec<_> = result.reports.iter().map(|r| r.path()).collect();
        assert_eq!(paths, vec!["a.go", "b.go"]);
        assert_eq!(result.scanned(), 2);
        assert_eq!(result.diagnostics().count(), 1);
        assert!(result.has_diagnostics());
        assert_eq!(result.failures.len(), 1);
        assert!(result.failures[0].error.is_parse_failure());
    }

    #[test]
    fn test_run_survives_generated_expression_chain() {
        let temp = TempDir::new().unwrap();
        let terms = vec!["\"a\""; 20_000].join(" + ");
        std::fs::write(
            temp.path().join("gen.go"),
            format!("package main\n\nvar s = {terms}\n"),
        )
        .unwrap();
        std::fs::write(temp.path().join("loop.go"), LOOPY).unwrap();

        let files = vec![temp.path().join("gen.go"), temp.path().join("loop.go")];
        let result = Runner::new(temp.path()).run(&files);

        assert!(!result.has_failures());
        assert_eq!(result.scanned(), 2);
        assert_eq!(result.reports[0].facts.decl_counts.var_count, 1);
        assert_eq!(result.diagnostics().count(), 1);
    }

    #[test]
    fn test_repeated_runs_are_identical() {
        let runner = Runner::new(".");
        let first = runner.analyze_source("main.go", LOOPY.as_bytes()).unwrap();
        let second = runner.analyze_source("main.go", LOOPY.as_bytes()).unwrap();
        assert_eq!(first.diagnostics, second.diagnostics);
        assert_eq!(first.facts, second.facts);
    }
}
