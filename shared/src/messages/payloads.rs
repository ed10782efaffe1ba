use serde::{Deserialize, Serialize};

use crate::{Access, AccessDelta, GlobalId, Tracker, TrackerDelta, TrackerId};

// Trackers

/// Full tracker record plus the shape it is attached to
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerTracker {
    pub shape: GlobalId,
    #[serde(flatten)]
    pub tracker: Tracker,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackerUpdate {
    pub shape: GlobalId,
    pub uuid: TrackerId,
    #[serde(flatten)]
    pub delta: TrackerDelta,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackerRemove {
    pub shape: GlobalId,
    pub value: TrackerId,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackerMove {
    pub shape: GlobalId,
    pub tracker: TrackerId,
    pub new_shape: GlobalId,
}

// Access

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerShapeAccess {
    pub edit_access: bool,
    pub movement_access: bool,
    pub vision_access: bool,
}

impl From<Access> for ServerShapeAccess {
    fn from(access: Access) -> Self {
        Self {
            edit_access: access.edit,
            movement_access: access.movement,
            vision_access: access.vision,
        }
    }
}

impl From<ServerShapeAccess> for Access {
    fn from(access: ServerShapeAccess) -> Self {
        Access::new(
            access.edit_access,
            access.movement_access,
            access.vision_access,
        )
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerShapeOwner {
    pub shape: GlobalId,
    pub user: String,
    #[serde(flatten)]
    pub access: ServerShapeAccess,
}

/// Changed fields of one user's override
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnerAccessUpdate {
    pub shape: GlobalId,
    pub user: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edit_access: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub movement_access: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vision_access: Option<bool>,
}

impl OwnerAccessUpdate {
    pub fn new(shape: GlobalId, user: impl Into<String>, delta: &AccessDelta) -> Self {
        Self {
            shape,
            user: user.into(),
            edit_access: delta.edit,
            movement_access: delta.movement,
            vision_access: delta.vision,
        }
    }

    pub fn delta(&self) -> AccessDelta {
        AccessDelta {
            edit: self.edit_access,
            movement: self.movement_access,
            vision: self.vision_access,
        }
    }
}

/// Changed fields of a shape's default access
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefaultAccessUpdate {
    pub shape: GlobalId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edit_access: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub movement_access: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vision_access: Option<bool>,
}

impl DefaultAccessUpdate {
    pub fn new(shape: GlobalId, delta: &AccessDelta) -> Self {
        Self {
            shape,
            edit_access: delta.edit,
            movement_access: delta.movement,
            vision_access: delta.vision,
        }
    }

    pub fn delta(&self) -> AccessDelta {
        AccessDelta {
            edit: self.edit_access,
            movement: self.movement_access,
            vision: self.vision_access,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnerRemove {
    pub shape: GlobalId,
    pub user: String,
}

// Shapes

/// The part of a server-sent shape that this core consumes when the shape is
/// first spawned locally. Geometry and styling fields are ignored.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerShapeState {
    pub uuid: GlobalId,
    #[serde(default)]
    pub is_token: bool,
    #[serde(default)]
    pub default_edit_access: bool,
    #[serde(default)]
    pub default_movement_access: bool,
    #[serde(default)]
    pub default_vision_access: bool,
    #[serde(default)]
    pub owners: Vec<ServerShapeOwner>,
    #[serde(default)]
    pub trackers: Vec<ServerTracker>,
}

impl ServerShapeState {
    pub fn default_access(&self) -> Access {
        Access::new(
            self.default_edit_access,
            self.default_movement_access,
            self.default_vision_access,
        )
    }
}
