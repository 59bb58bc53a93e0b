//! Structural size metrics for function declarations.
//!
//! Three cheap proxies, all computed from positions and one level of
//! the body block:
//! - line span: `end.line - start.line + 1`
//! - byte span: `end.offset - start.offset`
//! - statement count: direct statements of the body

use serde::Serialize;

use crate::tree::{direct_children, Node, NodeKind};

/// Size metrics for one function declaration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FunctionMetrics {
    pub line_span: usize,
    pub byte_span: usize,
    pub statement_count: usize,
}

/// Measure a function declaration.
///
/// Returns `None` for nodes that are not function declarations and for
/// signature-only declarations without a body.
pub fn measure(decl: &Node) -> Option<FunctionMetrics> {
    if !matches!(decl.kind, NodeKind::FunctionDecl { .. }) {
        return None;
    }
    let body = decl.body()?;

    Some(FunctionMetrics {
        line_span: decl.end.line.saturating_sub(decl.start.line) + 1,
        byte_span: decl.end.offset.saturating_sub(decl.start.offset),
        // An `if` with a large body still counts once.
        statement_count: direct_children(body).len(),
    })
}
