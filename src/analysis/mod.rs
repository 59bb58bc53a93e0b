//! Declaration facts and size metrics.
//!
//! This module turns a parsed [`crate::tree::SourceFile`] into "facts":
//! - Function and method declarations with visibility and size metrics
//! - Per-file counts of top-level `var` and `const` names
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐     ┌──────────────┐     ┌───────────────┐
//! │ Source Files    │────▶│ Parser       │────▶│ SourceFile    │
//! └─────────────────┘     │ (tree-sitter)│     │ (tree model)  │
//!                         └──────────────┘     └───────────────┘
//!                                                      │
//!                                                      ▼
//!                         ┌──────────────┐     ┌───────────────┐
//!                         │ FileFacts    │◀────│ Declaration   │
//!                         │ (functions,  │     │ Classifier +  │
//!                         │  counts)     │     │ Metrics       │
//!                         └──────────────┘     └───────────────┘
//! ```

mod classify;
mod context;
mod facts;
pub mod metrics;

pub use classify::{count_decls, DeclarationClassifier, GoExportPolicy, VisibilityPolicy};
pub use context::{AnalysisContext, ParsedFile};
pub use facts::{DeclCounts, FileFacts, FunctionFact, FunctionKind};
pub use metrics::FunctionMetrics;
