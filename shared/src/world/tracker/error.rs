use thiserror::Error as ThisError;

use crate::{LocalId, TrackerId};

/// Usage errors raised by tracker mutations. None of them mutate state.
#[derive(Debug, Clone, ThisError, PartialEq, Eq)]
pub enum TrackerError {
    /// The shape has no tracker list
    #[error("Shape {shape} is not known to the tracker system")]
    UnknownShape {
        shape: LocalId,
    },

    /// No tracker with this id is attached to the shape
    #[error("Tracker {tracker} not found on shape {shape}")]
    TrackerNotFound {
        shape: LocalId,
        tracker: TrackerId,
    },

    /// A tracker with this id is already attached to the shape
    #[error("Tracker {tracker} already exists on shape {shape}")]
    TrackerAlreadyExists {
        shape: LocalId,
        tracker: TrackerId,
    },
}
