use thiserror::Error as ThisError;

use tabletop_shared::{AccessError, EntityError, MessageError, TrackerError};

/// Everything a [`Client`](crate::Client) operation may fail with
#[derive(Debug, Clone, ThisError, PartialEq, Eq)]
pub enum TabletopClientError {
    #[error(transparent)]
    Access(#[from] AccessError),

    #[error(transparent)]
    Tracker(#[from] TrackerError),

    #[error(transparent)]
    Message(#[from] MessageError),

    #[error(transparent)]
    Entity(#[from] EntityError),
}
