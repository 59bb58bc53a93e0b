//! Optional YAML configuration.
//!
//! Looked up as `gofacts.yaml` or `.gofacts.yaml` in the working
//! directory unless `--config` names a file. Every field is optional and
//! command-line flags override what the file says.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::{Deserialize, Serialize};

/// Default config file names to search for.
pub const DEFAULT_CONFIG_NAMES: &[&str] = &["gofacts.yaml", ".gofacts.yaml"];

/// Default log filter when neither `RUST_LOG` nor the config sets one.
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Whether to analyze `_test.go` files (default: false)
    #[serde(default)]
    pub include_test_files: Option<bool>,
    /// Glob patterns for paths to skip (e.g., "**/generated/**")
    #[serde(default)]
    pub excluded_paths: Vec<String>,
    /// Whether size reports list methods too (default: false)
    #[serde(default)]
    pub include_methods: Option<bool>,
    #[serde(default)]
    pub log: LogConfig,
}

/// Logging settings.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LogConfig {
    /// `tracing` filter directive, e.g. "gofacts=debug"
    #[serde(default)]
    pub filter: Option<String>,
    #[serde(default)]
    pub format: LogFormat,
}

/// Log line layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

impl Config {
    /// Parse a config from a YAML file.
    pub fn parse_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("cannot read config {}", path.display()))?;
        Self::parse_str(&content).with_context(|| format!("invalid config {}", path.display()))
    }

    pub fn parse_str(content: &str) -> anyhow::Result<Self> {
        // An empty file is a valid, empty config.
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Config = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Find a config file in `dir`.
    pub fn discover(dir: &Path) -> Option<PathBuf> {
        DEFAULT_CONFIG_NAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.is_file())
    }

    /// Load `explicit` if given, else a discovered file, else defaults.
    pub fn load(explicit: Option<&Path>, dir: &Path) -> anyhow::Result<Self> {
        match explicit.map(Path::to_path_buf).or_else(|| Self::discover(dir)) {
            Some(path) => Self::parse_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Check that every glob pattern compiles.
    pub fn validate(&self) -> anyhow::Result<()> {
        self.exclusions().map(|_| ())
    }

    /// Compile `excluded_paths` into a matcher.
    pub fn exclusions(&self) -> anyhow::Result<GlobSet> {
        let mut builder = GlobSetBuilder::new();
        for pattern in &self.excluded_paths {
            let glob = Glob::new(pattern)
                .map_err(|e| anyhow::anyhow!("invalid excluded_paths pattern {:?}: {}", pattern, e))?;
            builder.add(glob);
        }
        Ok(builder.build()?)
    }

    /// Returns whether to include test files (defaults to false).
    pub fn should_include_test_files(&self) -> bool {
        self.include_test_files.unwrap_or(false)
    }

    pub fn should_include_methods(&self) -> bool {
        self.include_methods.unwrap_or(false)
    }

    /// Configured filter, or the default.
    pub fn log_filter(&self) -> &str {
        self.log.filter.as_deref().unwrap_or(DEFAULT_LOG_FILTER)
    }

    pub fn log_format(&self) -> LogFormat {
        self.log.format
    }
}
