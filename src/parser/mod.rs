//! Parser boundary: raw source text in, [`SourceFile`] out.
//!
//! This module provides:
//! - `SourceParser` trait: what the core needs from a parser
//! - A static registry that maps file extensions to parsers
//! - `GoParser`: tree-sitter-go lowered into the crate's tree model
//!
//! The analyses never see tree-sitter types; they only walk the
//! lowered [`crate::tree::Node`] hierarchy.

mod go;

pub use go::GoParser;

use once_cell::sync::OnceCell;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::ParseError;
use crate::tree::SourceFile;

/// A parser that produces the crate's tree model.
///
/// Implementations must report syntax errors as [`ParseError`] rather
/// than returning a partial tree.
pub trait SourceParser: Send + Sync {
    /// Language identifier (e.g. "go").
    fn language(&self) -> &'static str;

    /// File extensions this parser handles, without the dot.
    fn file_extensions(&self) -> &'static [&'static str];

    /// Parse `source` and lower it into a [`SourceFile`] named `file_name`.
    fn parse(&self, source: &[u8], file_name: &str) -> Result<SourceFile, ParseError>;

    fn handles_extension(&self, ext: &str) -> bool {
        self.file_extensions().contains(&ext)
    }
}

/// Static storage for the Go parser.
static GO_PARSER: OnceCell<GoParser> = OnceCell::new();

/// Whether parsers have been registered.
static REGISTERED: AtomicBool = AtomicBool::new(false);

/// Register all available parsers.
///
/// Idempotent. Fails only if a grammar cannot be loaded.
pub fn register_parsers() -> Result<(), ParseError> {
    if REGISTERED.load(Ordering::SeqCst) {
        return Ok(());
    }

    GO_PARSER.get_or_try_init(GoParser::new)?;
    REGISTERED.store(true, Ordering::SeqCst);
    Ok(())
}

/// Get the parser for a file extension (without the dot).
pub fn for_extension(ext: &str) -> Option<&'static dyn SourceParser> {
    if register_parsers().is_err() {
        return None;
    }

    match ext {
        "go" => GO_PARSER.get().map(|p| p as &'static dyn SourceParser),
        _ => None,
    }
}

/// All extensions with a registered parser.
pub fn supported_extensions() -> Vec<&'static str> {
    let mut exts = Vec::new();
    if let Some(go) = for_extension("go") {
        exts.extend_from_slice(go.file_extensions());
    }
    exts
}
