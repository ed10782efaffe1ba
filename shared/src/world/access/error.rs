use thiserror::Error as ThisError;

use crate::LocalId;

/// Usage errors raised by access mutations. None of them mutate state.
#[derive(Debug, Clone, ThisError, PartialEq, Eq)]
pub enum AccessError {
    /// The shape has no access record
    #[error("Shape {shape} is not known to the access system")]
    UnknownShape {
        shape: LocalId,
    },

    /// The user already has an override on this shape
    #[error("User {user} already has access to shape {shape}")]
    OwnerAlreadyExists {
        shape: LocalId,
        user: String,
    },

    /// The user has no override on this shape
    #[error("User {user} has no access to shape {shape}")]
    OwnerNotFound {
        shape: LocalId,
        user: String,
    },
}
