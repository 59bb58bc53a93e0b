//! Output formatting for gofacts results.
//!
//! Supports four output formats:
//! - Pretty: colored terminal output for human readability
//! - JSON: structured output for programmatic consumption
//! - Vet: `file:line:column: message` lines, as Go analysis runners print
//! - SARIF: Static Analysis Results Interchange Format (lint only)
//!
//! Writers take any `io::Write` so callers decide where output goes.

use std::fmt;
use std::io::Write;
use std::str::FromStr;

use colored::*;
use serde::Serialize;

use crate::aggregate::{LintSummary, PackageDecls, SizeRecord};
use crate::analysis::FunctionFact;
use crate::detect::{rule_info, RuleId, SuppressionType};

/// Output format selected on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Pretty,
    Json,
    Vet,
    Sarif,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Pretty => "pretty",
            OutputFormat::Json => "json",
            OutputFormat::Vet => "vet",
            OutputFormat::Sarif => "sarif",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pretty" => Ok(OutputFormat::Pretty),
            "json" => Ok(OutputFormat::Json),
            "vet" => Ok(OutputFormat::Vet),
            "sarif" => Ok(OutputFormat::Sarif),
            _ => Err(format!(
                "invalid format {s:?}, must be 'pretty', 'json', 'vet', or 'sarif'"
            )),
        }
    }
}

// =============================================================================
// Function sizes
// =============================================================================

/// Write a size report. Records must already be sorted.
pub fn write_sizes<W: Write>(
    out: &mut W,
    records: &[SizeRecord],
    format: OutputFormat,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json | OutputFormat::Sarif => write_json(out, &records),
        OutputFormat::Vet => {
            for r in records {
                writeln!(
                    out,
                    "{}:{}: {} lines={} bytes={} stmts={}",
                    r.file, r.line, r.name, r.line_span, r.byte_span, r.statement_count
                )?;
            }
            Ok(())
        }
        OutputFormat::Pretty => {
            writeln!(out, "  {} ({}):", "Function sizes".bold(), records.len())?;
            writeln!(out)?;
            writeln!(
                out,
                "    {:>6} {:>7} {:>6}  {}",
                "LINES".dimmed(),
                "BYTES".dimmed(),
                "STMTS".dimmed(),
                "FUNCTION".dimmed()
            )?;
            for r in records {
                writeln!(
                    out,
                    "    {:>6} {:>7} {:>6}  {} {}",
                    r.line_span,
                    r.byte_span,
                    r.statement_count,
                    r.name.bold(),
                    format!("{}:{}", r.file, r.line).blue()
                )?;
            }
            Ok(())
        }
    }
}

// =============================================================================
// Visibility listing
// =============================================================================

#[derive(Serialize)]
struct JsonFunction<'a> {
    name: &'a str,
    exported: bool,
    file: &'a str,
    line: usize,
    column: usize,
}

/// Write a package-function listing in declaration order.
pub fn write_functions<W: Write>(
    out: &mut W,
    functions: &[&FunctionFact],
    format: OutputFormat,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json | OutputFormat::Sarif => {
            let rows: Vec<JsonFunction> = functions
                .iter()
                .map(|f| JsonFunction {
                    name: &f.name,
                    exported: f.is_exported,
                    file: f.file(),
                    line: f.position.line,
                    column: f.position.column,
                })
                .collect();
            write_json(out, &rows)
        }
        OutputFormat::Vet => {
            for f in functions {
                writeln!(out, "{}: {}", f.position, f.name)?;
            }
            Ok(())
        }
        OutputFormat::Pretty => {
            writeln!(out, "  {} ({}):", "Functions".bold(), functions.len())?;
            writeln!(out)?;
            for f in functions {
                let tag = if f.is_exported {
                    "exported  ".green()
                } else {
                    "unexported".yellow()
                };
                writeln!(
                    out,
                    "    {} {} {}",
                    tag,
                    f.name,
                    format!("(at {})", f.position).dimmed()
                )?;
            }
            Ok(())
        }
    }
}

// =============================================================================
// Declaration counts
// =============================================================================

/// Write var/const counts grouped by package.
pub fn write_decls<W: Write>(
    out: &mut W,
    packages: &[PackageDecls],
    format: OutputFormat,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json | OutputFormat::Sarif => write_json(out, &packages),
        OutputFormat::Vet => {
            for pkg in packages {
                for file in &pkg.files {
                    writeln!(
                        out,
                        "{}: var={} const={}",
                        file.file_name, file.var_count, file.const_count
                    )?;
                }
            }
            Ok(())
        }
        OutputFormat::Pretty => {
            for pkg in packages {
                let name = pkg.package.as_deref().unwrap_or("<no package>");
                writeln!(
                    out,
                    "  {} {}  var: {}  const: {}",
                    "package".dimmed(),
                    name.bold(),
                    pkg.var_count,
                    pkg.const_count
                )?;
                for file in &pkg.files {
                    writeln!(
                        out,
                        "    {:<40} var: {:>3}  const: {:>3}",
                        file.file_name.blue(),
                        file.var_count,
                        file.const_count
                    )?;
                }
                writeln!(out)?;
            }
            Ok(())
        }
    }
}

// =============================================================================
// Diagnostics
// =============================================================================

/// Write lint diagnostics.
pub fn write_lint<W: Write>(
    out: &mut W,
    summary: &LintSummary,
    format: OutputFormat,
    show_suppressed: bool,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => write_json(out, summary),
        OutputFormat::Sarif => write_sarif(out, summary),
        OutputFormat::Vet => {
            for d in &summary.diagnostics {
                writeln!(out, "{}", d)?;
            }
            Ok(())
        }
        OutputFormat::Pretty => write_lint_pretty(out, summary, show_suppressed),
    }
}

fn write_lint_pretty<W: Write>(
    out: &mut W,
    summary: &LintSummary,
    show_suppressed: bool,
) -> anyhow::Result<()> {
    writeln!(out)?;
    writeln!(
        out,
        "  {} v{}",
        "gofacts".cyan().bold(),
        env!("CARGO_PKG_VERSION")
    )?;
    writeln!(out, "  {}{}", "Files scanned: ".dimmed(), summary.scanned)?;
    writeln!(out)?;

    if summary.is_clean() {
        write!(out, "  {}", "✓ No diagnostics".green())?;
    } else {
        write!(
            out,
            "  {}",
            format!("✗ {} diagnostic(s)", summary.diagnostics.len()).red()
        )?;
    }
    if !summary.suppressed.is_empty() {
        write!(
            out,
            "  {}",
            format!("({} suppressed)", summary.suppressed.len()).dimmed()
        )?;
    }
    writeln!(out)?;
    writeln!(out)?;

    for d in &summary.diagnostics {
        write!(out, "    {} ", "WARN ".yellow())?;
        write!(out, "{:<12}", d.rule.as_str().dimmed())?;
        writeln!(
            out,
            "{}{}",
            d.file().blue(),
            format!(":{}:{}", d.position.line, d.position.column).dimmed()
        )?;
        writeln!(out, "            {}", d.message)?;
        writeln!(out)?;
    }

    if summary.suppressed.is_empty() {
        return Ok(());
    }

    writeln!(out, "  {} ({}):", "Suppressed".dimmed(), summary.suppressed.len())?;
    if !show_suppressed {
        writeln!(
            out,
            "    {}",
            "(use --show-suppressed to see details)".dimmed()
        )?;
        return Ok(());
    }

    writeln!(out)?;
    for sd in &summary.suppressed {
        let d = &sd.diagnostic;
        let s = &sd.suppression;
        write!(out, "    {:<12}", d.rule.as_str().dimmed())?;
        write!(out, "{}", d.file().blue())?;
        if s.suppression_type == SuppressionType::File {
            write!(out, "{}", ":* (file)".dimmed())?;
        } else {
            write!(out, "{}", format!(":{}", d.line()).dimmed())?;
        }
        writeln!(out)?;
        if !s.reason.is_empty() {
            writeln!(out, "            {}", format!("reason: {:?}", s.reason).dimmed())?;
        }
    }
    Ok(())
}

fn write_json<W: Write, T: Serialize + ?Sized>(out: &mut W, value: &T) -> anyhow::Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

// =============================================================================
// SARIF Format
// =============================================================================

const SARIF_VERSION: &str = "2.1.0";
const SARIF_SCHEMA: &str = "https://raw.githubusercontent.com/oasis-tcs/sarif-spec/master/Schemata/sarif-schema-2.1.0.json";
const TOOL_NAME: &str = "gofacts";

#[derive(Serialize)]
struct SarifReport {
    version: String,
    #[serde(rename = "$schema")]
    schema: String,
    runs: Vec<SarifRun>,
}

#[derive(Serialize)]
struct SarifRun {
    tool: SarifTool,
    results: Vec<SarifResult>,
}

#[derive(Serialize)]
struct SarifTool {
    driver: SarifDriver,
}

#[derive(Serialize)]
struct SarifDriver {
    name: String,
    version: String,
    rules: Vec<SarifRule>,
}

#[derive(Serialize)]
struct SarifRule {
    id: String,
    #[serde(rename = "shortDescription")]
    short_description: SarifMessage,
    #[serde(rename = "defaultConfiguration")]
    default_config: SarifRuleConfig,
}

#[derive(Serialize)]
struct SarifRuleConfig {
    level: String,
}

#[derive(Serialize)]
struct SarifResult {
    #[serde(rename = "ruleId")]
    rule_id: String,
    level: String,
    message: SarifMessage,
    locations: Vec<SarifLocation>,
}

#[derive(Serialize)]
struct SarifMessage {
    text: String,
}

#[derive(Serialize)]
struct SarifLocation {
    #[serde(rename = "physicalLocation")]
    physical_location: SarifPhysicalLocation,
}

#[derive(Serialize)]
struct SarifPhysicalLocation {
    #[serde(rename = "artifactLocation")]
    artifact_location: SarifArtifact,
    region: SarifRegion,
}

#[derive(Serialize)]
struct SarifArtifact {
    uri: String,
}

#[derive(Serialize)]
struct SarifRegion {
    #[serde(rename = "startLine")]
    start_line: usize,
    #[serde(rename = "startColumn")]
    start_column: usize,
}

fn write_sarif<W: Write>(out: &mut W, summary: &LintSummary) -> anyhow::Result<()> {
    // Rules in first-seen order so output is stable.
    let mut seen: Vec<RuleId> = Vec::new();
    for d in &summary.diagnostics {
        if !seen.contains(&d.rule) {
            seen.push(d.rule);
        }
    }

    let rules = seen
        .iter()
        .map(|id| SarifRule {
            id: id.as_str().to_string(),
            short_description: SarifMessage {
                text: rule_info(*id).description().to_string(),
            },
            default_config: SarifRuleConfig {
                level: id.default_level().to_string(),
            },
        })
        .collect();

    let results = summary
        .diagnostics
        .iter()
        .map(|d| SarifResult {
            rule_id: d.rule.as_str().to_string(),
            level: d.rule.default_level().to_string(),
            message: SarifMessage {
                text: d.message.clone(),
            },
            locations: vec![SarifLocation {
                physical_location: SarifPhysicalLocation {
                    artifact_location: SarifArtifact {
                        uri: d.file().to_string(),
                    },
                    region: SarifRegion {
                        start_line: d.position.line.max(1),
                        start_column: d.position.column.max(1),
                    },
                },
            }],
        })
        .collect();

    let report = SarifReport {
        version: SARIF_VERSION.to_string(),
        schema: SARIF_SCHEMA.to_string(),
        runs: vec![SarifRun {
            tool: SarifTool {
                driver: SarifDriver {
                    name: TOOL_NAME.to_string(),
                    version: env!("CARGO_PKG_VERSION").to_string(),
                    rules,
                },
            },
            results,
        }],
    };

    write_json(out, &report)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::detect::{Diagnostic, LOOP_DEFER_MESSAGE};
    use crate::tree::SourcePosition;

    fn summary() -> LintSummary {
        LintSummary {
            scanned: 1,
            diagnostics: vec![Diagnostic::new(
                SourcePosition::new(Arc::from("pkg/main.go"), 6, 9, 71),
                LOOP_DEFER_MESSAGE,
                RuleId::LoopDefer,
            )],
            suppressed: Vec::new(),
        }
    }

    fn render(format: OutputFormat) -> String {
        let mut buf = Vec::new();
        write_lint(&mut buf, &summary(), format, false).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_format_from_str() {
        assert_eq!("vet".parse::<OutputFormat>(), Ok(OutputFormat::Vet));
        assert!("xml".parse::<OutputFormat>().is_err());
        assert_eq!(OutputFormat::Sarif.to_string(), "sarif");
    }

    #[test]
    fn test_vet_lines() {
        assert_eq!(
            render(OutputFormat::Vet),
            "pkg/main.go:6:9: deferred-execution statement found inside a loop body\n"
        );
    }

    #[test]
    fn test_lint_json_fields() {
        let value: serde_json::Value = serde_json::from_str(&render(OutputFormat::Json)).unwrap();
        assert_eq!(value["scanned"], 1);
        let d = &value["diagnostics"][0];
        assert_eq!(d["rule"], "loop-defer");
        assert_eq!(d["message"], LOOP_DEFER_MESSAGE);
        assert_eq!(d["position"]["file"], "pkg/main.go");
        assert_eq!(d["position"]["offset"], 71);
        assert!(value.get("suppressed").is_none());
    }

    #[test]
    fn test_sarif_structure() {
        let value: serde_json::Value = serde_json::from_str(&render(OutputFormat::Sarif)).unwrap();
        assert_eq!(value["version"], "2.1.0");
        let run = &value["runs"][0];
        assert_eq!(run["tool"]["driver"]["name"], "gofacts");
        assert_eq!(run["tool"]["driver"]["rules"][0]["id"], "loop-defer");
        let result = &run["results"][0];
        assert_eq!(result["level"], "warning");
        let region = &result["locations"][0]["physicalLocation"]["region"];
        assert_eq!(region["startLine"], 6);
        assert_eq!(region["startColumn"], 9);
    }

    #[test]
    fn test_pretty_mentions_location() {
        let text = render(OutputFormat::Pretty);
        assert!(text.contains("pkg/main.go"));
        assert!(text.contains(LOOP_DEFER_MESSAGE));
    }

    #[test]
    fn test_sizes_json_records() {
        let records = vec![SizeRecord {
            name: "longFunc".to_string(),
            file: "sizes.go".to_string(),
            line: 12,
            line_span: 9,
            byte_span: 120,
            statement_count: 7,
        }];
        let mut buf = Vec::new();
        write_sizes(&mut buf, &records, OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value[0]["name"], "longFunc");
        assert_eq!(value[0]["line_span"], 9);
        assert_eq!(value[0]["statement_count"], 7);
    }

    #[test]
    fn test_decls_vet_lines() {
        let packages = vec![PackageDecls {
            package: Some("main".to_string()),
            var_count: 3,
            const_count: 2,
            files: vec![crate::analysis::DeclCounts {
                file_name: "a.go".to_string(),
                var_count: 3,
                const_count: 2,
            }],
        }];
        let mut buf = Vec::new();
        write_decls(&mut buf, &packages, OutputFormat::Vet).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "a.go: var=3 const=2\n");
    }
}
