//! Ordering and packaging of facts and diagnostics for presentation.
//!
//! Size reports are sorted by line span, largest first. Everything else
//! keeps source order: files in path order, entries in declaration order.
//! Nothing here performs I/O.

use std::collections::HashMap;
use std::str::FromStr;

use serde::Serialize;

use crate::analysis::{DeclCounts, FileFacts, FunctionFact};
use crate::detect::{Diagnostic, FileReport, SuppressedDiagnostic};

/// One row of a function size report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SizeRecord {
    pub name: String,
    pub file: String,
    pub line: usize,
    pub line_span: usize,
    pub byte_span: usize,
    pub statement_count: usize,
}

impl From<&FunctionFact> for SizeRecord {
    fn from(fact: &FunctionFact) -> Self {
        Self {
            name: fact.qualified_name(),
            file: fact.file().to_string(),
            line: fact.position.line,
            line_span: fact.line_span,
            byte_span: fact.byte_span,
            statement_count: fact.statement_count,
        }
    }
}

/// Stable sort by line span, largest first. Ties keep their input order.
pub fn sort_by_size<T, F>(items: &mut [T], line_span: F)
where
    F: Fn(&T) -> usize,
{
    items.sort_by(|a, b| line_span(b).cmp(&line_span(a)));
}

/// Size records for every function in `files`, largest first.
///
/// Methods are only included when `include_methods` is set.
pub fn size_report<'a, I>(files: I, include_methods: bool) -> Vec<SizeRecord>
where
    I: IntoIterator<Item = &'a FileFacts>,
{
    let mut records: Vec<SizeRecord> = files
        .into_iter()
        .flat_map(|facts| facts.functions.iter())
        .filter(|f| include_methods || !f.is_method)
        .map(SizeRecord::from)
        .collect();
    sort_by_size(&mut records, |r| r.line_span);
    records
}

/// Which package functions a visibility listing shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VisibilityFilter {
    #[default]
    All,
    Exported,
    Unexported,
}

impl VisibilityFilter {
    pub fn accepts(&self, fact: &FunctionFact) -> bool {
        match self {
            VisibilityFilter::All => true,
            VisibilityFilter::Exported => fact.is_exported,
            VisibilityFilter::Unexported => !fact.is_exported,
        }
    }
}

impl FromStr for VisibilityFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" => Ok(VisibilityFilter::All),
            "exported" | "public" => Ok(VisibilityFilter::Exported),
            "unexported" | "private" => Ok(VisibilityFilter::Unexported),
            _ => Err(format!("unknown visibility filter: {s}")),
        }
    }
}

/// Package functions in declaration order. Methods never appear.
pub fn visibility_listing<'a, I>(files: I, filter: VisibilityFilter) -> Vec<&'a FunctionFact>
where
    I: IntoIterator<Item = &'a FileFacts>,
{
    files
        .into_iter()
        .flat_map(|facts| facts.package_functions())
        .filter(|f| filter.accepts(f))
        .collect()
}

/// Declaration counts for one package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageDecls {
    /// `None` when a file has no package clause.
    pub package: Option<String>,
    pub var_count: usize,
    pub const_count: usize,
    pub files: Vec<DeclCounts>,
}

/// Group per-file counts by package, in first-seen order.
pub fn decl_summary<'a, I>(files: I) -> Vec<PackageDecls>
where
    I: IntoIterator<Item = &'a FileFacts>,
{
    let mut groups: Vec<PackageDecls> = Vec::new();
    let mut index: HashMap<Option<String>, usize> = HashMap::new();

    for facts in files {
        let slot = *index.entry(facts.package.clone()).or_insert_with(|| {
            groups.push(PackageDecls {
                package: facts.package.clone(),
                var_count: 0,
                const_count: 0,
                files: Vec::new(),
            });
            groups.len() - 1
        });

        let group = &mut groups[slot];
        group.var_count += facts.decl_counts.var_count;
        group.const_count += facts.decl_counts.const_count;
        group.files.push(facts.decl_counts.clone());
    }

    groups
}

/// Diagnostics from a run, flattened in file then source order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct LintSummary {
    pub scanned: usize,
    pub diagnostics: Vec<Diagnostic>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suppressed: Vec<SuppressedDiagnostic>,
}

impl LintSummary {
    pub fn from_reports<'a, I>(reports: I) -> Self
    where
        I: IntoIterator<Item = &'a FileReport>,
    {
        let mut summary = LintSummary::default();
        for report in reports {
            summary.scanned += 1;
            summary.diagnostics.extend(report.diagnostics.iter().cloned());
            summary.suppressed.extend(report.suppressed.iter().cloned());
        }
        summary
    }

    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}
