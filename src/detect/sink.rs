//! Where rules send their diagnostics.
//!
//! Rules never print. They call [`DiagnosticSink::report`] once per
//! violation, in source order, and the sink decides what happens next:
//! - [`Collector`] keeps everything and hands it back
//! - [`HostAdapter`] forwards `(position, message)` pairs to a host runner
//! - [`crate::detect::SuppressingSink`] drops suppressed diagnostics

use super::Diagnostic;
use crate::tree::SourcePosition;

/// Consumer of diagnostics.
pub trait DiagnosticSink {
    fn report(&mut self, diagnostic: Diagnostic);
}

impl DiagnosticSink for Vec<Diagnostic> {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

impl<S: DiagnosticSink + ?Sized> DiagnosticSink for &mut S {
    fn report(&mut self, diagnostic: Diagnostic) {
        (**self).report(diagnostic);
    }
}

/// Standalone sink that collects every diagnostic.
#[derive(Debug, Clone, Default)]
pub struct Collector {
    diagnostics: Vec<Diagnostic>,
}

impl Collector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}

impl DiagnosticSink for Collector {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }
}

/// Adapter for host runners that accept `(position, message)` pairs.
pub struct HostAdapter<F>
where
    F: FnMut(&SourcePosition, &str),
{
    report: F,
}

impl<F> HostAdapter<F>
where
    F: FnMut(&SourcePosition, &str),
{
    pub fn new(report: F) -> Self {
        Self { report }
    }
}

impl<F> DiagnosticSink for HostAdapter<F>
where
    F: FnMut(&SourcePosition, &str),
{
    fn report(&mut self, diagnostic: Diagnostic) {
        (self.report)(&diagnostic.position, &diagnostic.message);
    }
}
