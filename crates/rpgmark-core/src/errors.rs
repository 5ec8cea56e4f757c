//! Structured error types shared across rpgmark crates.

use std::collections::BTreeMap;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured payload attached to every [`RpgError`] variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Stable machine readable error code.
    pub code: String,
    /// Human readable diagnostic message.
    pub message: String,
    /// Contextual key value pairs (vertex labels, counts, etc.).
    #[serde(default)]
    pub context: BTreeMap<String, String>,
    /// Optional hint that may help the caller resolve the issue.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ErrorInfo {
    /// Creates a new error payload with the provided code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            context: BTreeMap::new(),
            hint: None,
        }
    }

    /// Adds a context entry to the payload.
    pub fn with_context(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.context.insert(key.into(), value.to_string());
        self
    }

    /// Sets a human readable hint for remediation.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// Coarse classification of an [`RpgError`], independent of its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Malformed input to an encoding or decoding primitive.
    InvalidInput,
    /// A permutation failed the involution check.
    NotInvolution,
    /// Vertex/edge counts or the degree multiset match no known damage pattern.
    StructureMismatch,
    /// The damage pattern is known but cannot be resolved uniquely.
    Unrepairable,
    /// The repaired graph is not a reducible permutation graph.
    NotAnRpg,
    /// Misuse of the graph arena.
    Graph,
    /// Serialization and schema errors.
    Serde,
}

/// Canonical error type for the rpgmark engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "family", content = "detail")]
pub enum RpgError {
    /// Malformed bit vector, empty permutation, zero watermark and similar.
    #[error("invalid input: {0}")]
    InvalidInput(ErrorInfo),
    /// The permutation is not self-inverting.
    #[error("not an involution: {0}")]
    NotInvolution(ErrorInfo),
    /// The observed component matches no row of the damage table.
    #[error("structure mismatch: {0}")]
    StructureMismatch(ErrorInfo),
    /// Root, sink, source or target cannot be located uniquely.
    #[error("unrepairable: {0}")]
    Unrepairable(ErrorInfo),
    /// Post-repair validation failed or no fixed element exists.
    #[error("not an rpg: {0}")]
    NotAnRpg(ErrorInfo),
    /// Graph arena errors (unknown vertex, duplicate edge, degree cap).
    #[error("graph error: {0}")]
    Graph(ErrorInfo),
    /// Serialization and schema errors.
    #[error("serde error: {0}")]
    Serde(ErrorInfo),
}

impl Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code: {})", self.message, self.code)?;
        if !self.context.is_empty() {
            write!(f, " | context: [")?;
            for (idx, (key, value)) in self.context.iter().enumerate() {
                if idx > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{key}={value}")?;
            }
            write!(f, "]")?;
        }
        if let Some(hint) = &self.hint {
            write!(f, " | hint: {hint}")?;
        }
        Ok(())
    }
}

impl RpgError {
    /// Returns a reference to the payload describing the error.
    pub fn info(&self) -> &ErrorInfo {
        match self {
            RpgError::InvalidInput(info)
            | RpgError::NotInvolution(info)
            | RpgError::StructureMismatch(info)
            | RpgError::Unrepairable(info)
            | RpgError::NotAnRpg(info)
            | RpgError::Graph(info)
            | RpgError::Serde(info) => info,
        }
    }

    /// Returns the payload-free classification of the error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            RpgError::InvalidInput(_) => ErrorKind::InvalidInput,
            RpgError::NotInvolution(_) => ErrorKind::NotInvolution,
            RpgError::StructureMismatch(_) => ErrorKind::StructureMismatch,
            RpgError::Unrepairable(_) => ErrorKind::Unrepairable,
            RpgError::NotAnRpg(_) => ErrorKind::NotAnRpg,
            RpgError::Graph(_) => ErrorKind::Graph,
            RpgError::Serde(_) => ErrorKind::Serde,
        }
    }

    /// Adds a context entry to the payload, keeping the variant.
    pub fn with_context(self, key: impl Into<String>, value: impl ToString) -> Self {
        self.map_info(|info| info.with_context(key, value))
    }

    /// Sets the remediation hint, keeping the variant.
    pub fn with_hint(self, hint: impl Into<String>) -> Self {
        self.map_info(|info| info.with_hint(hint))
    }

    fn map_info(self, f: impl FnOnce(ErrorInfo) -> ErrorInfo) -> Self {
        match self {
            RpgError::InvalidInput(info) => RpgError::InvalidInput(f(info)),
            RpgError::NotInvolution(info) => RpgError::NotInvolution(f(info)),
            RpgError::StructureMismatch(info) => RpgError::StructureMismatch(f(info)),
            RpgError::Unrepairable(info) => RpgError::Unrepairable(f(info)),
            RpgError::NotAnRpg(info) => RpgError::NotAnRpg(f(info)),
            RpgError::Graph(info) => RpgError::Graph(f(info)),
            RpgError::Serde(info) => RpgError::Serde(f(info)),
        }
    }
}

/// Shorthand for [`RpgError::InvalidInput`].
pub fn invalid_input(code: impl Into<String>, message: impl Into<String>) -> RpgError {
    RpgError::InvalidInput(ErrorInfo::new(code, message))
}

/// Shorthand for [`RpgError::StructureMismatch`].
pub fn structure_mismatch(code: impl Into<String>, message: impl Into<String>) -> RpgError {
    RpgError::StructureMismatch(ErrorInfo::new(code, message))
}

/// Shorthand for [`RpgError::Unrepairable`].
pub fn unrepairable(code: impl Into<String>, message: impl Into<String>) -> RpgError {
    RpgError::Unrepairable(ErrorInfo::new(code, message))
}

/// Shorthand for [`RpgError::NotAnRpg`].
pub fn not_an_rpg(code: impl Into<String>, message: impl Into<String>) -> RpgError {
    RpgError::NotAnRpg(ErrorInfo::new(code, message))
}

/// Shorthand for [`RpgError::Graph`].
pub fn graph_error(code: impl Into<String>, message: impl Into<String>) -> RpgError {
    RpgError::Graph(ErrorInfo::new(code, message))
}
