//! Error types for the tour core.
//!
//! Only load-time problems surface as errors. Runtime misuse (moving while
//! already moving, unknown animation names, stale action indices) is reported
//! through `bool` returns and log lines instead.

/// Errors raised while building curricula, scripts and configuration.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum TourError {
    /// Source text did not parse.
    #[error("parse error in {what}: {reason}")]
    Parse { what: &'static str, reason: String },

    /// A module was declared without any steps.
    #[error("module {index} ({title:?}) has no steps")]
    EmptyModule { index: usize, title: String },

    /// Easing name not in the supported set.
    #[error("unknown easing: {name}")]
    UnknownEasing { name: String },

    /// A scripted reaction points at a named point that was never declared.
    #[error("reaction for module {module} references unknown point {point:?}")]
    UnknownPoint { module: usize, point: String },

    /// Wander set is empty; the fallback reaction needs at least one point.
    #[error("character script declares no wander points")]
    NoWanderPoints,
}

impl TourError {
    pub(crate) fn parse(what: &'static str, err: impl std::fmt::Display) -> Self {
        TourError::Parse {
            what,
            reason: err.to_string(),
        }
    }
}

/// Failures reported by an asset loader. The character degrades instead of
/// propagating these.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum AssetError {
    #[error("asset not found: {path}")]
    NotFound { path: String },

    #[error("failed to decode {path}: {reason}")]
    Decode { path: String, reason: String },
}
