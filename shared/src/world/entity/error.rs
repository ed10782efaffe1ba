use thiserror::Error as ThisError;

use crate::{GlobalId, LocalId};

/// Errors that can occur while mapping between local and global ids
#[derive(Debug, Clone, ThisError, PartialEq, Eq)]
pub enum EntityError {
    /// No live shape is registered under this LocalId
    #[error("Unknown local id: {local_id}")]
    UnknownLocalId {
        local_id: LocalId,
    },

    /// No live shape is registered under this GlobalId
    #[error("Unknown global id: {global_id}")]
    UnknownGlobalId {
        global_id: GlobalId,
    },

    /// The GlobalId already has a reserved LocalId
    #[error("Global id {global_id} already reserved local id {local_id}")]
    AlreadyReserved {
        global_id: GlobalId,
        local_id: LocalId,
    },

    /// The GlobalId is already claimed by a live shape
    #[error("Global id {global_id} is already claimed by local id {local_id}")]
    AlreadyClaimed {
        global_id: GlobalId,
        local_id: LocalId,
    },
}
