//! gofacts - structural facts and rule checks for Go source files.
//!
//! gofacts parses Go sources with tree-sitter, lowers each syntax tree into
//! a small closed tree model, and derives read-only facts from it:
//! function visibility, function size metrics, top-level `var`/`const`
//! counts, and `defer` statements placed directly inside loop bodies.
//!
//! # Architecture
//!
//! - `tree`: The tree model and its walker
//! - `parser`: tree-sitter boundary that produces the tree model
//! - `analysis`: Declaration classifier and size metrics
//! - `detect`: Diagnostics, sinks, rules and the parallel runner
//! - `aggregate`: Ordering and grouping of results for presentation
//! - `report`: Output formatting (pretty, JSON, vet, SARIF)
//! - `config`: YAML configuration
//!
//! # Example
//!
//! ```no_run
//! use gofacts::detect::Runner;
//!
//! let runner = Runner::new(".");
//! let report = runner.analyze_source("main.go", b"package main\n\nfunc main() {}\n")?;
//! assert!(report.diagnostics.is_empty());
//! # Ok::<(), gofacts::AnalysisError>(())
//! ```

pub mod aggregate;
pub mod analysis;
pub mod cli;
pub mod config;
pub mod detect;
pub mod error;
pub mod parser;
pub mod report;
pub mod telemetry;
pub mod tree;

pub use analysis::{AnalysisContext, DeclCounts, DeclarationClassifier, FileFacts, FunctionFact};
pub use config::Config;
pub use detect::{Diagnostic, DiagnosticSink, RuleId, Runner};
pub use error::{AnalysisError, ParseError};
pub use tree::{SourceFile, SourcePosition};
