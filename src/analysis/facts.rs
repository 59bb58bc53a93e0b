//! Fact structures extracted from the tree model.

use std::fmt;

use serde::Serialize;

use crate::tree::{DeclToken, SourcePosition};

/// Whether a fact describes a package-level function or a method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FunctionKind {
    Function,
    Method,
}

impl FunctionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FunctionKind::Function => "function",
            FunctionKind::Method => "method",
        }
    }
}

impl fmt::Display for FunctionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A function or method with a body, plus its size metrics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FunctionFact {
    pub name: String,
    /// Receiver type for methods (e.g., "Config" for `func (c *Config) Validate()`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receiver: Option<String>,
    pub is_method: bool,
    pub is_exported: bool,
    /// Position of the `func` keyword.
    pub position: SourcePosition,
    /// Lines covered, first and last inclusive. Always at least 1.
    pub line_span: usize,
    /// Bytes from the `func` keyword to just past the closing brace.
    pub byte_span: usize,
    /// Direct statements of the body.
    pub statement_count: usize,
}

impl FunctionFact {
    pub fn kind(&self) -> FunctionKind {
        if self.is_method {
            FunctionKind::Method
        } else {
            FunctionKind::Function
        }
    }

    /// Get the fully qualified name (receiver.name for methods).
    pub fn qualified_name(&self) -> String {
        match &self.receiver {
            Some(recv) if !recv.is_empty() => format!("{}.{}", recv, self.name),
            _ => self.name.clone(),
        }
    }

    pub fn file(&self) -> &str {
        &self.position.file
    }
}

/// Number of names bound by top-level `var` and `const` declarations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeclCounts {
    pub file_name: String,
    pub var_count: usize,
    pub const_count: usize,
}

impl DeclCounts {
    pub fn new(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            ..Self::default()
        }
    }

    /// Add `names` bindings under a declaration introduced by `token`.
    ///
    /// Tokens other than `var` and `const` are ignored.
    pub fn add(&mut self, token: DeclToken, names: usize) {
        match token {
            DeclToken::Var => self.var_count += names,
            DeclToken::Const => self.const_count += names,
            DeclToken::Type | DeclToken::Import => {}
        }
    }

    pub fn total(&self) -> usize {
        self.var_count + self.const_count
    }
}

/// All facts extracted from a single file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileFacts {
    /// File path, relative to the scan root.
    pub path: String,
    /// Package name from the package clause.
    pub package: Option<String>,
    /// Functions and methods with bodies, in source order.
    pub functions: Vec<FunctionFact>,
    pub decl_counts: DeclCounts,
}

impl FileFacts {
    /// Create empty facts for a file.
    pub fn empty(path: &str) -> Self {
        Self {
            path: path.to_string(),
            package: None,
            functions: Vec::new(),
            decl_counts: DeclCounts::new(path),
        }
    }

    /// Package-level functions (no receiver), in source order.
    pub fn package_functions(&self) -> impl Iterator<Item = &FunctionFact> {
        self.functions.iter().filter(|f| !f.is_method)
    }

    /// Methods, in source order.
    pub fn methods(&self) -> impl Iterator<Item = &FunctionFact> {
        self.functions.iter().filter(|f| f.is_method)
    }

    /// Find a function or method by name.
    pub fn find_function(&self, name: &str) -> Option<&FunctionFact> {
        self.functions.iter().find(|f| f.name == name)
    }
}
