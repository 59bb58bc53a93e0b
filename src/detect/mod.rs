//! Structural rules over parsed Go files.

mod loop_defer;
mod rules;
mod runner;
mod sink;
mod suppress;
mod types;

pub use loop_defer::{LoopDeferRule, LOOP_DEFER_MESSAGE};
pub use rules::{builtin_rules, rule_info, Rule};
pub use runner::{FileFailure, FileReport, RunResult, Runner};
pub use sink::{Collector, DiagnosticSink, HostAdapter};
pub use suppress::{
    filter_suppressed, parse_suppressions, SuppressedDiagnostic, Suppression, SuppressingSink,
    SuppressionType,
};
pub use types::{Diagnostic, RuleId};
