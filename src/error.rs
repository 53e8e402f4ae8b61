use std::fmt;

use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LandmarkKind {
    Pose,
    Face,
}

impl fmt::Display for LandmarkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LandmarkKind::Pose => f.write_str("pose"),
            LandmarkKind::Face => f.write_str("face"),
        }
    }
}

/// A detector returned fewer landmarks than its topology defines.
///
/// Drawing tables index landmarks directly, so this is never recovered from.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind} detector returned {actual} landmarks, topology needs {expected}")]
pub struct TopologyError {
    pub kind: LandmarkKind,
    pub expected: usize,
    pub actual: usize,
}

#[derive(Error, Debug)]
pub enum DetectorError {
    #[error("landmark inference failed: {0:#}")]
    Inference(#[from] anyhow::Error),

    #[error(transparent)]
    Topology(#[from] TopologyError),
}

impl DetectorError {
    pub fn is_fatal(&self) -> bool {
        matches!(self, DetectorError::Topology(_))
    }
}
