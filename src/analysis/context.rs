//! Per-file analysis context.
//!
//! The AnalysisContext provides:
//! - Path resolution relative to a scan root
//! - Parser lookup by file extension
//! - Reading, parsing and classifying a single file
//!
//! Nothing is cached: each call parses afresh and the resulting tree is
//! dropped once its facts have been extracted.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::analysis::{DeclarationClassifier, FileFacts};
use crate::error::AnalysisError;
use crate::parser;
use crate::tree::SourceFile;

/// A file that parsed successfully, with its source text.
#[derive(Debug, Clone)]
pub struct ParsedFile {
    /// Path relative to the scan root, `/`-separated.
    pub path: String,
    /// The original source (kept for suppression comments).
    pub text: String,
    pub tree: SourceFile,
}

/// Analysis context for files under one root.
#[derive(Debug, Clone)]
pub struct AnalysisContext {
    /// Base directory for relative path resolution.
    base_dir: PathBuf,
    classifier: DeclarationClassifier,
}

impl AnalysisContext {
    /// Create a new analysis context.
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
            classifier: DeclarationClassifier::new(),
        }
    }

    /// Resolve `path` against the base directory.
    pub fn absolute(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }

    /// Display path relative to the base directory.
    pub fn relative(&self, path: &Path) -> String {
        let abs = self.absolute(path);
        let rel = abs.strip_prefix(&self.base_dir).unwrap_or(&abs);
        if rel.as_os_str().is_empty() {
            // The base directory is the file itself.
            return abs
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| abs.to_string_lossy().to_string());
        }
        rel.to_string_lossy().replace('\\', "/")
    }

    /// Parse in-memory source under the display name `path`.
    pub fn parse_source(&self, path: &str, source: &[u8]) -> Result<ParsedFile, AnalysisError> {
        let ext = Path::new(path)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("");
        let parser = parser::for_extension(ext).ok_or_else(|| AnalysisError::Unsupported {
            path: PathBuf::from(path),
        })?;

        let tree = parser.parse(source, path)?;
        Ok(ParsedFile {
            path: path.to_string(),
            text: String::from_utf8_lossy(source).into_owned(),
            tree,
        })
    }

    /// Read and parse a file from disk.
    pub fn parse_file<P: AsRef<Path>>(&self, path: P) -> Result<ParsedFile, AnalysisError> {
        let abs_path = self.absolute(path.as_ref());
        let source = fs::read(&abs_path).map_err(|source| AnalysisError::Io {
            path: abs_path.clone(),
            source,
        })?;

        debug!(path = %abs_path.display(), bytes = source.len(), "parsing file");
        self.parse_source(&self.relative(&abs_path), &source)
    }

    /// Extract declaration facts from a parsed file.
    pub fn facts(&self, parsed: &ParsedFile) -> FileFacts {
        self.classifier.classify(&parsed.tree)
    }

    /// Parse and classify one file.
    pub fn analyze_file<P: AsRef<Path>>(&self, path: P) -> Result<FileFacts, AnalysisError> {
        let parsed = self.parse_file(path)?;
        Ok(self.facts(&parsed))
    }
}
