//! Node kinds and the owning tree structure.

use std::fmt;
use std::ops::Range;
use std::sync::Arc;

use super::SourcePosition;

/// Keyword that introduces a grouped (generic) declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeclToken {
    Var,
    Const,
    Type,
    Import,
}

impl DeclToken {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeclToken::Var => "var",
            DeclToken::Const => "const",
            DeclToken::Type => "type",
            DeclToken::Import => "import",
        }
    }
}

impl fmt::Display for DeclToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Loop header shape. Both forms own a header and a body block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoopForm {
    /// `for {}`, `for cond {}` and `for init; cond; post {}`.
    Counted,
    /// `for k, v := range xs {}`.
    Range,
}

/// The closed set of node kinds the analyses understand.
///
/// Everything the analyses do not care about is lowered to
/// [`NodeKind::Other`], tagged with the grammar kind it came from, so the
/// walker still reaches loops and defers nested inside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// A function or method declaration. The body, when present, is the
    /// last child and is a [`NodeKind::Block`].
    FunctionDecl {
        name: String,
        /// Receiver type name for methods (`Config` for `func (c *Config) M()`).
        receiver: Option<String>,
    },
    /// A `var`/`const`/`type`/`import` declaration, single or grouped.
    GenericDecl { token: DeclToken },
    /// One `var` or `const` entry binding one or more names.
    ValueSpec { names: Vec<String> },
    /// A loop statement. The body is the last child.
    LoopStmt { form: LoopForm },
    /// A `defer` statement.
    DeferStmt,
    /// `{ ... }`; children are its statements in source order.
    Block,
    Other { grammar: &'static str },
}

/// A node in the syntax tree. Owns its children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub kind: NodeKind,
    pub start: SourcePosition,
    pub end: SourcePosition,
    pub children: Vec<Node>,
}

impl Node {
    pub fn new(
        kind: NodeKind,
        start: SourcePosition,
        end: SourcePosition,
        children: Vec<Node>,
    ) -> Self {
        Self {
            kind,
            start,
            end,
            children,
        }
    }

    /// Body block of a function declaration or loop.
    ///
    /// Returns `None` for every other kind and for signature-only
    /// function declarations.
    pub fn body(&self) -> Option<&Node> {
        match self.kind {
            NodeKind::FunctionDecl { .. } | NodeKind::LoopStmt { .. } => {
                self.children.last().filter(|child| child.is_block())
            }
            _ => None,
        }
    }

    pub fn is_block(&self) -> bool {
        matches!(self.kind, NodeKind::Block)
    }

    pub fn is_defer(&self) -> bool {
        matches!(self.kind, NodeKind::DeferStmt)
    }

    pub fn is_loop(&self) -> bool {
        matches!(self.kind, NodeKind::LoopStmt { .. })
    }

    /// Half-open byte range `[start, end)` covered by this node.
    pub fn byte_range(&self) -> Range<usize> {
        self.start.offset..self.end.offset
    }

    /// Whether `pos` lies inside this node's byte range.
    pub fn contains(&self, pos: &SourcePosition) -> bool {
        pos.file == self.start.file && self.byte_range().contains(&pos.offset)
    }

    /// Short label for logging.
    pub fn label(&self) -> &'static str {
        match &self.kind {
            NodeKind::FunctionDecl { .. } => "FunctionDecl",
            NodeKind::GenericDecl { .. } => "GenericDecl",
            NodeKind::ValueSpec { .. } => "ValueSpec",
            NodeKind::LoopStmt { .. } => "LoopStmt",
            NodeKind::DeferStmt => "DeferStmt",
            NodeKind::Block => "Block",
            NodeKind::Other { grammar } => grammar,
        }
    }
}

impl Drop for Node {
    // Deep expression chains would overflow the stack with the default
    // recursive drop, so descendants are detached and dropped one by one.
    fn drop(&mut self) {
        let mut stack = std::mem::take(&mut self.children);
        while let Some(mut node) = stack.pop() {
            stack.append(&mut node.children);
        }
    }
}

/// A parsed file: its name, package clause and root node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub name: Arc<str>,
    pub package: Option<String>,
    pub root: Node,
}

impl SourceFile {
    pub fn new(name: Arc<str>, package: Option<String>, root: Node) -> Self {
        Self {
            name,
            package,
            root,
        }
    }

    /// Top-level declarations in source order.
    pub fn decls(&self) -> &[Node] {
        &self.root.children
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}
