//! Core types for detection results.

use serde::{Deserialize, Serialize};

use crate::tree::SourcePosition;

/// Identifiers of the built-in rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RuleId {
    #[serde(rename = "loop-defer")]
    LoopDefer,
}

impl RuleId {
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleId::LoopDefer => "loop-defer",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "loop-defer" => Some(RuleId::LoopDefer),
            _ => None,
        }
    }

    /// SARIF level used when reporting this rule.
    pub fn default_level(&self) -> &'static str {
        match self {
            RuleId::LoopDefer => "warning",
        }
    }
}

impl std::fmt::Display for RuleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single rule violation. Never modified after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub position: SourcePosition,
    pub message: String,
    pub rule: RuleId,
}

impl Diagnostic {
    pub fn new(position: SourcePosition, message: impl Into<String>, rule: RuleId) -> Self {
        Self {
            position,
            message: message.into(),
            rule,
        }
    }

    pub fn file(&self) -> &str {
        &self.position.file
    }

    pub fn line(&self) -> usize {
        self.position.line
    }
}

impl std::fmt::Display for Diagnostic {
    /// `file:line:column: message`, the format Go vet-style runners print.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.position, self.message)
    }
}
