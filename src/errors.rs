//! Failure taxonomy for partitioning operations.
//!
//! Three kinds of failure are kept apart so callers can branch on them:
//! geometric rejections of a candidate cut (recoverable, try the next plane),
//! precondition violations when addressing a tree (caller logic errors), and
//! configuration errors (hard failures at construction time).

use thiserror::Error;

/// Reasons a candidate cut is rejected.
///
/// Always recoverable: the caller discards the candidate plane and tries
/// another. The core never retries a rejected cut on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SplitRejection {
    /// The plane does not pass through the part's volume; the cut would
    /// leave material on one side only.
    #[error("plane does not intersect the part")]
    MissedPart,
    /// One of the fragments has negligible volume relative to its parent.
    #[error("cut produces a near-zero-volume fragment")]
    DegenerateFragment,
    /// The cut cross-section could not be closed into boundary loops, so no
    /// watertight fragments can be produced.
    #[error("failed to cap the cut cross-section")]
    CapFailed,
}

/// Errors from expanding a tree at a node path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExpandError {
    /// No node exists at the given path.
    #[error("no node at path {0:?}")]
    InvalidPath(Vec<usize>),
    /// The addressed node is terminated and must not be split.
    #[error("node at path {0:?} is terminated")]
    NodeTerminated(Vec<usize>),
    /// The addressed node already has children.
    #[error("node at path {0:?} already has children")]
    NodeAlreadySplit(Vec<usize>),
    /// The cut itself was rejected; pick another candidate plane.
    #[error(transparent)]
    Rejected(#[from] SplitRejection),
}

/// Configuration problems detected when a tree is constructed.
///
/// A tree with no usable objective cannot be compared to others, so these
/// are hard failures rather than defaults.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("build volume extents must be positive and finite")]
    InvalidBuildVolume,
    #[error("plane spacing must be positive and finite")]
    InvalidPlaneSpacing,
    #[error("objective weight `{0}` must be finite and non-negative")]
    InvalidWeight(&'static str),
    #[error("diversity tolerances must be non-negative and finite")]
    InvalidTolerance,
}

/// Errors reading, writing, or replaying a persisted tree.
#[derive(Debug, Error)]
pub enum TreeFileError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// A recorded cut no longer applies to the freshly built tree.
    #[error("replaying recorded cut {index} failed: {source}")]
    Replay {
        index: usize,
        #[source]
        source: ExpandError,
    },
}
