//! Error taxonomy for migration operations.
//!
//! Per-file failures (`AnalysisError`, `TransformError`) are recovered by the
//! orchestrator: the file is recorded as failed and the batch continues.
//! `MigrateError::Fatal` aborts the batch before any file is processed.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AnalysisError {
    /// The file could not be parsed into a usable syntax tree.
    #[error("unparseable source in {path}: {message}")]
    Unparseable { path: PathBuf, message: String },

    /// No single exported function-like component was found.
    #[error("unrecognized component shape in {path}: {message}")]
    UnrecognizedShape { path: PathBuf, message: String },
}

impl AnalysisError {
    pub fn unparseable(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Unparseable {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn unrecognized(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::UnrecognizedShape {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Unparseable { .. } => "Unparseable",
            Self::UnrecognizedShape { .. } => "UnrecognizedShape",
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransformError {
    /// A relative import could not be mapped into the target project.
    #[error("unresolved import '{specifier}' in {path}")]
    UnresolvedImport { path: PathBuf, specifier: String },

    /// Two source identifiers or target paths collided in one batch.
    #[error("naming collision on '{value}' in {path} (first claimed by {first_claimed_by})")]
    NamingCollision {
        path: PathBuf,
        value: String,
        first_claimed_by: PathBuf,
    },
}

impl TransformError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UnresolvedImport { .. } => "UnresolvedImport",
            Self::NamingCollision { .. } => "NamingCollision",
        }
    }
}

/// Umbrella error for one file's pipeline plus the batch-fatal case.
#[derive(Debug, Clone, Error)]
pub enum MigrateError {
    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    #[error(transparent)]
    Transform(#[from] TransformError),

    /// Source or target root missing or unreadable; aborts the whole batch.
    #[error("fatal: {message}")]
    Fatal { message: String },

    #[error("io error on {path}: {message}")]
    Io { path: PathBuf, message: String },
}

impl MigrateError {
    pub fn fatal(message: impl Into<String>) -> Self {
        Self::Fatal {
            message: message.into(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Io {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Analysis(e) => e.kind(),
            Self::Transform(e) => e.kind(),
            Self::Fatal { .. } => "Fatal",
            Self::Io { .. } => "Io",
        }
    }

    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Fatal { .. })
    }
}
