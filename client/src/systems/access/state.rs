use tabletop_shared::{Access, LocalId, ShapeOwner, DEFAULT_ACCESS};

/// Read-only snapshot of the focused shape's access records
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AccessState {
    pub id: Option<LocalId>,
    pub default_access: Access,
    /// Overrides in insertion order
    pub player_access: Vec<ShapeOwner>,
    /// Composite parent of the focused shape, if any
    pub parent_id: Option<LocalId>,
    pub parent_default_access: Option<Access>,
    pub parent_player_access: Vec<ShapeOwner>,
}

impl Default for AccessState {
    fn default() -> Self {
        Self {
            id: None,
            default_access: DEFAULT_ACCESS,
            player_access: Vec::new(),
            parent_id: None,
            parent_default_access: None,
            parent_player_access: Vec::new(),
        }
    }
}

impl AccessState {
    pub fn player(&self, user: &str) -> Option<&Access> {
        self.player_access
            .iter()
            .find(|owner| owner.user == user)
            .map(|owner| &owner.access)
    }

    pub fn parent_player(&self, user: &str) -> Option<&Access> {
        self.parent_player_access
            .iter()
            .find(|owner| owner.user == user)
            .map(|owner| &owner.access)
    }
}
