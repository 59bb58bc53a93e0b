//! Declaration classification over a file's top-level declarations.
//!
//! Produces [`FunctionFact`]s for every function and method with a body,
//! and [`DeclCounts`] for the file's top-level `var` and `const` names.
//! Only the top-level declaration list is inspected; declarations inside
//! function bodies are never counted.

use tracing::trace;

use super::metrics;
use crate::analysis::{DeclCounts, FileFacts, FunctionFact};
use crate::tree::{Node, NodeKind, SourceFile};

/// Decides whether a declared name is visible outside its package.
pub trait VisibilityPolicy: Send + Sync {
    fn is_exported(&self, name: &str) -> bool;
}

/// Go's convention: a name is exported iff it starts with an upper-case
/// letter. Only ASCII upper case counts.
#[derive(Debug, Clone, Copy, Default)]
pub struct GoExportPolicy;

impl VisibilityPolicy for GoExportPolicy {
    fn is_exported(&self, name: &str) -> bool {
        name.chars().next().is_some_and(|c| c.is_ascii_uppercase())
    }
}

/// Extracts function and declaration facts from a parsed file.
#[derive(Debug, Clone, Default)]
pub struct DeclarationClassifier<P = GoExportPolicy> {
    policy: P,
}

impl DeclarationClassifier<GoExportPolicy> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<P: VisibilityPolicy> DeclarationClassifier<P> {
    /// Use a different visibility convention.
    pub fn with_policy(policy: P) -> Self {
        Self { policy }
    }

    /// Classify every top-level declaration of `file`.
    pub fn classify(&self, file: &SourceFile) -> FileFacts {
        let functions = file
            .decls()
            .iter()
            .filter_map(|decl| self.function_fact(decl))
            .collect();

        FileFacts {
            path: file.name().to_string(),
            package: file.package.clone(),
            functions,
            decl_counts: count_decls(file),
        }
    }

    /// Build the fact for one function declaration.
    ///
    /// Returns `None` for other node kinds and for declarations without a
    /// body.
    pub fn function_fact(&self, decl: &Node) -> Option<FunctionFact> {
        let NodeKind::FunctionDecl { name, receiver } = &decl.kind else {
            return None;
        };

        let Some(size) = metrics::measure(decl) else {
            trace!(name = %name, at = %decl.start, "skipping function without body");
            return None;
        };

        Some(FunctionFact {
            name: name.clone(),
            receiver: receiver.clone(),
            is_method: receiver.is_some(),
            is_exported: self.policy.is_exported(name),
            position: decl.start.clone(),
            line_span: size.line_span,
            byte_span: size.byte_span,
            statement_count: size.statement_count,
        })
    }
}

/// Count names bound by the file's top-level `var` and `const` entries.
pub fn count_decls(file: &SourceFile) -> DeclCounts {
    let mut counts = DeclCounts::new(file.name());

    for decl in file.decls() {
        let NodeKind::GenericDecl { token } = decl.kind else {
            continue;
        };

        for spec in &decl.children {
            match &spec.kind {
                NodeKind::ValueSpec { names } => counts.add(token, names.len()),
                _ => trace!(token = %token, kind = spec.label(), "skipping non-value spec"),
            }
        }
    }

    counts
}
