use crate::LocalId;

/// Capability triple attached to a shape, either as its default or as a
/// per-user override.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Access {
    pub edit: bool,
    pub movement: bool,
    pub vision: bool,
}

/// Access a shape starts out with when the server did not say otherwise.
pub const DEFAULT_ACCESS: Access = Access {
    edit: false,
    movement: false,
    vision: false,
};

impl Access {
    pub const fn new(edit: bool, movement: bool, vision: bool) -> Self {
        Self {
            edit,
            movement,
            vision,
        }
    }

    pub const fn full() -> Self {
        Self::new(true, true, true)
    }

    /// Returns true if every field requested in `requested` is set here.
    /// Fields absent from `requested` are not considered.
    pub fn grants(&self, requested: &AccessDelta) -> bool {
        requested.edit.map_or(true, |_| self.edit)
            && requested.movement.map_or(true, |_| self.movement)
            && requested.vision.map_or(true, |_| self.vision)
    }

    /// Shallow merge: every field present in `delta` overwrites the stored one.
    pub fn apply(&mut self, delta: &AccessDelta) {
        if let Some(edit) = delta.edit {
            self.edit = edit;
        }
        if let Some(movement) = delta.movement {
            self.movement = movement;
        }
        if let Some(vision) = delta.vision {
            self.vision = vision;
        }
    }
}

/// Partial access triple.
///
/// Used as an update payload and as the "requested capability set" of an
/// access check, e.g. `AccessDelta::new().with_edit(true)`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct AccessDelta {
    pub edit: Option<bool>,
    pub movement: Option<bool>,
    pub vision: Option<bool>,
}

impl AccessDelta {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_edit(mut self, edit: bool) -> Self {
        self.edit = Some(edit);
        self
    }

    pub fn with_movement(mut self, movement: bool) -> Self {
        self.movement = Some(movement);
        self
    }

    pub fn with_vision(mut self, vision: bool) -> Self {
        self.vision = Some(vision);
        self
    }

    pub fn edit() -> Self {
        Self::new().with_edit(true)
    }

    pub fn movement() -> Self {
        Self::new().with_movement(true)
    }

    pub fn vision() -> Self {
        Self::new().with_vision(true)
    }

    pub fn is_empty(&self) -> bool {
        self.edit.is_none() && self.movement.is_none() && self.vision.is_none()
    }
}

impl From<Access> for AccessDelta {
    fn from(access: Access) -> Self {
        Self {
            edit: Some(access.edit),
            movement: Some(access.movement),
            vision: Some(access.vision),
        }
    }
}

/// Addressee of an access mutation: the shape's default record, or the
/// override of one specific user.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum AccessTarget {
    Default,
    User(String),
}

impl AccessTarget {
    pub fn user(name: impl Into<String>) -> Self {
        AccessTarget::User(name.into())
    }
}

impl From<&str> for AccessTarget {
    fn from(user: &str) -> Self {
        AccessTarget::User(user.to_string())
    }
}

/// A per-user access override on a shape.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShapeOwner {
    pub user: String,
    pub shape: LocalId,
    pub access: Access,
}

impl ShapeOwner {
    pub fn new(user: impl Into<String>, shape: LocalId, access: Access) -> Self {
        Self {
            user: user.into(),
            shape,
            access,
        }
    }
}
