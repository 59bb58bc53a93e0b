//! Inline suppression of diagnostics via comments.
//!
//! Supports suppression comments like:
//! - `// gofacts:ignore <rule> - <reason>`
//! - `// gofacts:ignore-next-line <rule> - <reason>`
//! - `// gofacts:ignore-file <rule> - <reason>`
//!
//! `<rule>` is a rule id such as `loop-defer`, or `*` for every rule.

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{Diagnostic, DiagnosticSink, RuleId};

/// How a suppression applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SuppressionType {
    /// Applies to the same line
    Line,
    /// Applies to the next line
    NextLine,
    /// Applies to the entire file
    File,
}

/// An inline suppression directive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suppression {
    /// Rule to suppress, or "*" for all
    pub rule: String,
    pub reason: String,
    /// File containing the suppression
    pub file: String,
    /// Line number (0 for file-level)
    pub line: usize,
    pub suppression_type: SuppressionType,
}

impl Suppression {
    /// Whether this directive silences `diagnostic`.
    pub fn matches(&self, diagnostic: &Diagnostic) -> bool {
        if diagnostic.file() != self.file {
            return false;
        }

        if self.rule != "*" && RuleId::parse(&self.rule) != Some(diagnostic.rule) {
            return false;
        }

        match self.suppression_type {
            SuppressionType::File => true,
            SuppressionType::Line => diagnostic.line() == self.line,
            SuppressionType::NextLine => diagnostic.line() == self.line + 1,
        }
    }
}

/// A diagnostic that was suppressed, with the directive responsible.
#[derive(Debug, Clone, Serialize)]
pub struct SuppressedDiagnostic {
    pub diagnostic: Diagnostic,
    pub suppression: Suppression,
}

lazy_static::lazy_static! {
    static ref SUPPRESSION_PATTERNS: Vec<Regex> = vec![
        // Line comment: // gofacts:...
        Regex::new(r"//\s*gofacts:(ignore(?:-file|-next-line)?)\s+(\S+)\s*(?:-\s*(.*))?").unwrap(),
        // Block comment: /* gofacts:... */
        Regex::new(r"/\*\s*gofacts:(ignore(?:-file|-next-line)?)\s+(\S+)\s*(?:-\s*(.*?))?\s*\*/").unwrap(),
    ];
}

/// Parse suppression directives from Go source.
///
/// `ignore-file` only counts in the file header, before the first line
/// that is neither blank nor a comment.
pub fn parse_suppressions(file_path: &str, content: &str) -> Vec<Suppression> {
    let mut suppressions = Vec::new();
    let mut in_header = true;

    for (index, line) in content.lines().enumerate() {
        let line_number = index + 1;
        if in_header && !is_comment_or_empty(line.trim()) {
            in_header = false;
        }

        for pattern in SUPPRESSION_PATTERNS.iter() {
            let Some(caps) = pattern.captures(line) else {
                continue;
            };

            let directive = caps.get(1).map_or("", |m| m.as_str());
            let rule = caps.get(2).map_or("", |m| m.as_str());
            let reason = caps
                .get(3)
                .map(|m| m.as_str().trim().to_string())
                .unwrap_or_default();

            let suppression_type = match directive {
                "ignore-file" if in_header => SuppressionType::File,
                "ignore-file" => {
                    debug!(file = file_path, line = line_number, "ignore-file outside header");
                    break;
                }
                "ignore-next-line" => SuppressionType::NextLine,
                // Alone on its line it covers the next line, trailing code it
                // covers its own.
                "ignore" => {
                    let start = caps.get(0).map_or(0, |m| m.start());
                    if line[..start].trim().is_empty() {
                        SuppressionType::NextLine
                    } else {
                        SuppressionType::Line
                    }
                }
                _ => break,
            };

            suppressions.push(Suppression {
                rule: rule.to_string(),
                reason,
                file: file_path.to_string(),
                line: if suppression_type == SuppressionType::File {
                    0
                } else {
                    line_number
                },
                suppression_type,
            });
            break;
        }
    }

    suppressions
}

fn is_comment_or_empty(line: &str) -> bool {
    line.is_empty() || line.starts_with("//") || line.starts_with("/*") || line.starts_with('*')
}

/// Separate diagnostics into active and suppressed.
pub fn filter_suppressed(
    diagnostics: Vec<Diagnostic>,
    suppressions: &[Suppression],
) -> (Vec<Diagnostic>, Vec<SuppressedDiagnostic>) {
    let mut sink = SuppressingSink::new(Vec::new(), suppressions.to_vec());
    for diagnostic in diagnostics {
        sink.report(diagnostic);
    }
    sink.into_parts()
}

/// Sink that drops suppressed diagnostics before they reach `inner`.
///
/// Dropped diagnostics are kept so reports can list them.
#[derive(Debug)]
pub struct SuppressingSink<S> {
    inner: S,
    suppressions: Vec<Suppression>,
    suppressed: Vec<SuppressedDiagnostic>,
}

impl<S: DiagnosticSink> SuppressingSink<S> {
    pub fn new(inner: S, suppressions: Vec<Suppression>) -> Self {
        Self {
            inner,
            suppressions,
            suppressed: Vec::new(),
        }
    }

    /// Diagnostics suppressed so far.
    pub fn suppressed(&self) -> &[SuppressedDiagnostic] {
        &self.suppressed
    }

    pub fn into_parts(self) -> (S, Vec<SuppressedDiagnostic>) {
        (self.inner, self.suppressed)
    }
}

impl<S: DiagnosticSink> DiagnosticSink for SuppressingSink<S> {
    fn report(&mut self, diagnostic: Diagnostic) {
        match self.suppressions.iter().find(|s| s.matches(&diagnostic)) {
            Some(suppression) => {
                debug!(at = %diagnostic.position, rule = %diagnostic.rule, "diagnostic suppressed");
                self.suppressed.push(SuppressedDiagnostic {
                    suppression: suppression.clone(),
                    diagnostic,
                });
            }
            None => self.inner.report(diagnostic),
        }
    }
}
