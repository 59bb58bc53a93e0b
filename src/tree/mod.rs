//! Parser-independent syntax tree model.
//!
//! The tree is produced once by a [`crate::parser::SourceParser`] and is
//! read-only afterwards. Every analysis in the crate walks the same
//! [`SourceFile`] through the helpers in [`walk`].
//!
//! ```text
//! source_file (Other)
//! ├── package_clause (Other)
//! ├── GenericDecl(Var)
//! │   └── ValueSpec [a, b, c]
//! └── FunctionDecl "main"
//!     ├── parameter_list (Other)
//!     └── Block
//!         └── LoopStmt(Counted)
//!             ├── for_clause (Other)
//!             └── Block
//!                 └── DeferStmt
//! ```

mod node;
mod position;
pub mod walk;

pub use node::{DeclToken, LoopForm, Node, NodeKind, SourceFile};
pub use position::SourcePosition;
pub use walk::{direct_children, visit_all};
