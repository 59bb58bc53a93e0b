//! The fixed set of structural rules.

use super::{DiagnosticSink, LoopDeferRule, RuleId};
use crate::tree::SourceFile;

/// A stateless check over one parsed file.
pub trait Rule: Send + Sync {
    fn id(&self) -> RuleId;

    /// One-line summary used in reports.
    fn description(&self) -> &'static str;

    /// Report every violation in `file` to `sink`, in source order.
    fn check(&self, file: &SourceFile, sink: &mut dyn DiagnosticSink);
}

/// All built-in rules, in reporting order.
pub fn builtin_rules() -> Vec<Box<dyn Rule>> {
    vec![Box::new(LoopDeferRule)]
}

/// Look up a built-in rule by id.
pub fn rule_info(id: RuleId) -> Box<dyn Rule> {
    match id {
        RuleId::LoopDefer => Box::new(LoopDeferRule),
    }
}
