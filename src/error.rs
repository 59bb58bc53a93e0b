//! Error types for parsing and analysis.

use std::path::PathBuf;

/// The external parser could not produce a tree.
///
/// No analysis runs on a file that fails to parse, and no partial facts
/// are returned for it.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("failed to load grammar: {0}")]
    Language(String),
    #[error("parser produced no tree for {file}")]
    NoTree { file: String },
    #[error("{file}:{line}:{column}: syntax error")]
    Syntax {
        file: String,
        line: usize,
        column: usize,
    },
}

/// Failure of a single file's analysis pass.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("no parser registered for {path}")]
    Unsupported { path: PathBuf },
}

impl AnalysisError {
    pub fn is_parse_failure(&self) -> bool {
        matches!(self, AnalysisError::Parse(_))
    }
}
