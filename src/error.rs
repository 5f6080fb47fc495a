//! Error types for the bundling phase.
//!
//! Per-item problems (a missing tag, a bad declaration) never become a
//! `BundleError`; they are reported as diagnostics. A `BundleError` means the
//! orchestrated phase itself failed and is converted to a diagnostic at the
//! orchestrator boundary.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BundleError {
    #[error("{stage} failed: {message}")]
    Collaborator { stage: Stage, message: String },

    #[error("{stage} returned {actual} outputs for {expected} bundles")]
    SlotCountMismatch {
        stage: Stage,
        expected: usize,
        actual: usize,
    },

    #[error("invalid bundling config: {0}")]
    InvalidConfig(#[from] serde_json::Error),

    #[error("{stage} panicked: {message}")]
    Panicked { stage: Stage, message: String },
}

/// The downstream step a collaborator error came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Styles,
    Modules,
    Write,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Stage::Styles => "style bundling",
            Stage::Modules => "module bundling",
            Stage::Write => "bundle generation",
        };
        f.write_str(name)
    }
}

impl BundleError {
    pub fn collaborator(stage: Stage, message: impl Into<String>) -> Self {
        BundleError::Collaborator {
            stage,
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, BundleError>;
