use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading, installing or verifying a formula.
///
/// Every variant is fatal for the current install; nothing is retried and no
/// partially written artifacts are cleaned up.
#[derive(Error, Debug)]
pub enum FormulaError {
    #[error("source file '{}' not found in staging directory '{}'", .path.display(), .staging.display())]
    MissingSourceFile {
        path: PathBuf,
        staging: PathBuf,
    },

    #[error("dependency '{name}' could not be resolved: {reason}")]
    UnresolvedDependency {
        name: String,
        reason: String,
    },

    #[error("smoke test of '{}' failed: {reason}", .wrapper.display())]
    SmokeTestFailed {
        wrapper: PathBuf,
        reason: String,
        stderr: String,
    },

    #[error("I/O error at {}: {source}", .path.display())]
    InstallIo {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("path '{}' cannot be embedded in a wrapper script", .0.display())]
    UnquotablePath(PathBuf),

    #[error("invalid formula: {0}")]
    InvalidFormula(String),

    #[error("could not parse formula: {0}")]
    Parse(#[from] toml::de::Error),
}

impl FormulaError {
    /// Wraps an I/O error together with the path it happened at.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        FormulaError::InstallIo {
            path: path.into(),
            source,
        }
    }

    pub fn unresolved(name: &str, reason: impl Into<String>) -> Self {
        FormulaError::UnresolvedDependency {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}

pub type FormulaResult<T> = std::result::Result<T, FormulaError>;
