//! Go parser backed by tree-sitter.
//!
//! Lowers the concrete tree-sitter tree into [`crate::tree::Node`]:
//! - `function_declaration` / `method_declaration` -> `FunctionDecl`
//! - `var_declaration` / `const_declaration` / `type_declaration` /
//!   `import_declaration` -> `GenericDecl`
//! - `var_spec` / `const_spec` -> `ValueSpec`
//! - `for_statement` -> `LoopStmt` (counted or range)
//! - `defer_statement` -> `DeferStmt`
//! - `block` -> `Block`
//!
//! Every other named node becomes `Other`, and comments are dropped.

use std::sync::Arc;

use streaming_iterator::StreamingIterator;
use tracing::debug;
use tree_sitter::{Language, Node as TsNode, Parser, Query, QueryCursor};

use super::SourceParser;
use crate::error::ParseError;
use crate::tree::{DeclToken, LoopForm, Node, NodeKind, SourceFile, SourcePosition};

/// Tree-sitter query for the package clause.
const PACKAGE_QUERY: &str = r#"
(package_clause
  (package_identifier) @package_name
)
"#;

/// Wrapper nodes whose items belong directly to the enclosing node.
///
/// Newer grammar revisions wrap block statements and grouped `var`
/// entries in these; older ones do not.
const TRANSPARENT_KINDS: &[&str] = &["statement_list", "var_spec_list"];

/// Go source parser.
pub struct GoParser {
    language: Language,
    package_query: Query,
}

impl GoParser {
    /// Create a new Go parser.
    pub fn new() -> Result<Self, ParseError> {
        let language: Language = tree_sitter_go::LANGUAGE.into();
        let package_query = Query::new(&language, PACKAGE_QUERY)
            .map_err(|e| ParseError::Language(e.to_string()))?;

        Ok(Self {
            language,
            package_query,
        })
    }

    /// Create a parser for this call; `tree_sitter::Parser` is not `Sync`.
    fn create_parser(&self) -> Result<Parser, ParseError> {
        let mut parser = Parser::new();
        parser
            .set_language(&self.language)
            .map_err(|e| ParseError::Language(e.to_string()))?;
        Ok(parser)
    }

    /// Extract the package name from the package clause.
    fn extract_package(&self, root: TsNode, source: &[u8]) -> Option<String> {
        let mut cursor = QueryCursor::new();
        let mut matches = cursor.matches(&self.package_query, root, source);

        if let Some(m) = matches.next() {
            for capture in m.captures {
                let name = self.package_query.capture_names()[capture.index as usize];
                if name == "package_name" {
                    return capture.node.utf8_text(source).ok().map(str::to_string);
                }
            }
        }
        None
    }
}

impl SourceParser for GoParser {
    fn language(&self) -> &'static str {
        "go"
    }

    fn file_extensions(&self) -> &'static [&'static str] {
        &["go"]
    }

    fn parse(&self, source: &[u8], file_name: &str) -> Result<SourceFile, ParseError> {
        let mut parser = self.create_parser()?;
        let tree = parser.parse(source, None).ok_or_else(|| ParseError::NoTree {
            file: file_name.to_string(),
        })?;

        let root = tree.root_node();
        if root.has_error() {
            let at = first_error(root).unwrap_or(root).start_position();
            return Err(ParseError::Syntax {
                file: file_name.to_string(),
                line: at.row + 1,
                column: at.column + 1,
            });
        }

        let file: Arc<str> = Arc::from(file_name);
        let package = self.extract_package(root, source);
        let lowering = Lowering {
            source,
            file: Arc::clone(&file),
        };
        let lowered = lowering.lower(root).ok_or_else(|| ParseError::NoTree {
            file: file_name.to_string(),
        })?;

        debug!(
            file = file_name,
            decls = lowered.children.len(),
            "lowered go source"
        );

        Ok(SourceFile::new(file, package, lowered))
    }
}

/// First ERROR or MISSING node in source order.
fn first_error(root: TsNode) -> Option<TsNode> {
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if node.is_error() || node.is_missing() {
            return Some(node);
        }
        if node.has_error() {
            let mut cursor = node.walk();
            let children: Vec<_> = node.children(&mut cursor).collect();
            stack.extend(children.into_iter().rev());
        }
    }
    None
}

/// A node being lowered: children still to visit and those already built.
struct Frame<'t> {
    node: TsNode<'t>,
    pending: std::vec::IntoIter<TsNode<'t>>,
    children: Vec<Node>,
}

/// Converts one tree-sitter tree into the owned tree model.
///
/// Generated Go can nest expressions tens of thousands deep, so lowering
/// keeps its own work stack instead of recursing.
struct Lowering<'s> {
    source: &'s [u8],
    file: Arc<str>,
}

impl Lowering<'_> {
    fn lower(&self, root: TsNode) -> Option<Node> {
        let mut stack = vec![self.frame(root)];

        while let Some(mut frame) = stack.pop() {
            if let Some(child) = frame.pending.next() {
                stack.push(frame);
                stack.push(self.frame(child));
                continue;
            }

            let node = Node::new(
                self.kind_of(frame.node),
                self.start_of(frame.node),
                self.end_of(frame.node),
                frame.children,
            );
            match stack.last_mut() {
                Some(parent) => parent.children.push(node),
                None => return Some(node),
            }
        }
        None
    }

    fn frame<'t>(&self, node: TsNode<'t>) -> Frame<'t> {
        let pending = lowered_children(node);
        Frame {
            node,
            children: Vec::with_capacity(pending.len()),
            pending: pending.into_iter(),
        }
    }

    fn kind_of(&self, node: TsNode) -> NodeKind {
        match node.kind() {
            "function_declaration" => NodeKind::FunctionDecl {
                name: self.field_text(node, "name"),
                receiver: None,
            },
            "method_declaration" => NodeKind::FunctionDecl {
                name: self.field_text(node, "name"),
                receiver: Some(self.receiver_type(node).unwrap_or_default()),
            },
            "var_declaration" => NodeKind::GenericDecl {
                token: DeclToken::Var,
            },
            "const_declaration" => NodeKind::GenericDecl {
                token: DeclToken::Const,
            },
            "type_declaration" => NodeKind::GenericDecl {
                token: DeclToken::Type,
            },
            "import_declaration" => NodeKind::GenericDecl {
                token: DeclToken::Import,
            },
            "var_spec" | "const_spec" => {
                let mut cursor = node.walk();
                // A grouped `const` name field also spans the commas.
                let names = node
                    .children_by_field_name("name", &mut cursor)
                    .filter(|n| n.kind() == "identifier")
                    .map(|n| self.text(n).to_string())
                    .collect();
                NodeKind::ValueSpec { names }
            }
            "for_statement" => {
                let mut cursor = node.walk();
                let is_range = node
                    .named_children(&mut cursor)
                    .any(|n| n.kind() == "range_clause");
                NodeKind::LoopStmt {
                    form: if is_range {
                        LoopForm::Range
                    } else {
                        LoopForm::Counted
                    },
                }
            }
            "defer_statement" => NodeKind::DeferStmt,
            "block" => NodeKind::Block,
            grammar => NodeKind::Other { grammar },
        }
    }

    /// Receiver base type: `*Config` and `Box[T]` become `Config` and `Box`.
    fn receiver_type(&self, method: TsNode) -> Option<String> {
        let params = method.child_by_field_name("receiver")?;
        let mut cursor = params.walk();
        let decl = params
            .named_children(&mut cursor)
            .find(|n| n.kind() == "parameter_declaration")?;
        let ty = decl.child_by_field_name("type")?;

        let text = self.text(ty).trim_start_matches('(').trim_start_matches('*');
        let base = text.split(['[', ')']).next().unwrap_or(text).trim();
        Some(base.to_string())
    }

    fn field_text(&self, node: TsNode, field: &str) -> String {
        node.child_by_field_name(field)
            .map(|n| self.text(n).to_string())
            .unwrap_or_default()
    }

    fn text(&self, node: TsNode) -> &str {
        node.utf8_text(self.source).unwrap_or("")
    }

    fn start_of(&self, node: TsNode) -> SourcePosition {
        let point = node.start_position();
        SourcePosition::new(
            Arc::clone(&self.file),
            point.row + 1,
            point.column + 1,
            node.start_byte(),
        )
    }

    fn end_of(&self, node: TsNode) -> SourcePosition {
        let point = node.end_position();
        SourcePosition::new(
            Arc::clone(&self.file),
            point.row + 1,
            point.column + 1,
            node.end_byte(),
        )
    }
}

/// Named children that become tree nodes, in source order.
///
/// Comments are dropped and [`TRANSPARENT_KINDS`] wrappers are replaced
/// by their own children.
fn lowered_children(node: TsNode) -> Vec<TsNode> {
    let mut out = Vec::new();
    let mut stack: Vec<_> = named_children(node).into_iter().rev().collect();
    while let Some(child) = stack.pop() {
        match child.kind() {
            "comment" => {}
            kind if TRANSPARENT_KINDS.contains(&kind) => {
                stack.extend(named_children(child).into_iter().rev());
            }
            _ => out.push(child),
        }
    }
    out
}

fn named_children(node: TsNode) -> Vec<TsNode> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor).collect()
}
