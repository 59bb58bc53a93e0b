//! Source positions attached to every tree node.

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use serde::{Serialize, Serializer};

/// A point in a source file.
///
/// Lines and columns are 1-indexed; columns count bytes, matching the
/// `file:line:column` convention of Go tooling. `offset` is the 0-indexed
/// byte offset from the start of the file.
///
/// Positions order and compare by `(file, offset)` only; line and column
/// are derived from the offset and carry no extra identity.
#[derive(Debug, Clone)]
pub struct SourcePosition {
    pub file: Arc<str>,
    pub line: usize,
    pub column: usize,
    pub offset: usize,
}

impl SourcePosition {
    pub fn new(file: Arc<str>, line: usize, column: usize, offset: usize) -> Self {
        Self {
            file,
            line,
            column,
            offset,
        }
    }
}

impl PartialEq for SourcePosition {
    fn eq(&self, other: &Self) -> bool {
        self.file == other.file && self.offset == other.offset
    }
}

impl Eq for SourcePosition {}

impl PartialOrd for SourcePosition {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SourcePosition {
    fn cmp(&self, other: &Self) -> Ordering {
        (&*self.file, self.offset).cmp(&(&*other.file, other.offset))
    }
}

impl fmt::Display for SourcePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}

impl Serialize for SourcePosition {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;

        let mut state = serializer.serialize_struct("SourcePosition", 4)?;
        state.serialize_field("file", &*self.file)?;
        state.serialize_field("line", &self.line)?;
        state.serialize_field("column", &self.column)?;
        state.serialize_field("offset", &self.offset)?;
        state.end()
    }
}
