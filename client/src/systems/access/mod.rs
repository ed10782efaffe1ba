use std::collections::HashMap;

use log::error;

use tabletop_shared::{
    Access, AccessDelta, AccessError, AccessTarget, ClientMessage, DefaultAccessUpdate, LocalId,
    OwnerAccessUpdate, OwnerRemove, ServerShapeOwner, ShapeOwner, SyncTo, DEFAULT_ACCESS,
};

use crate::{
    events::ClientEvents,
    session::Session,
    systems::{System, SystemContext},
    world::shape_store::ShapeStore,
};

mod state;
pub use state::AccessState;

/// Initial access record of a shape, as received from the server
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AccessInform {
    pub default: Access,
    pub owners: Vec<ShapeOwner>,
}

// AccessRecord
#[derive(Clone, Debug)]
struct AccessRecord {
    default: Access,
    /// At most one entry per user, in insertion order
    owners: Vec<(String, Access)>,
}

impl AccessRecord {
    fn owner(&self, user: &str) -> Option<&Access> {
        self.owners
            .iter()
            .find(|(owner, _)| owner == user)
            .map(|(_, access)| access)
    }

    fn owner_mut(&mut self, user: &str) -> Option<&mut Access> {
        self.owners
            .iter_mut()
            .find(|(owner, _)| owner == user)
            .map(|(_, access)| access)
    }

    fn owners_full(&self, shape: LocalId) -> Vec<ShapeOwner> {
        self.owners
            .iter()
            .map(|(user, access)| ShapeOwner::new(user.clone(), shape, *access))
            .collect()
    }
}

/// Per-shape default access and per-user overrides.
///
/// Every mutation takes a [`SyncTo`]: the record is always updated, `Server`
/// additionally queues the matching `Shape.Owner.*` message, and `Server` and
/// `Ui` recompute the focused [`AccessState`] when it covers the shape.
pub struct AccessSystem {
    records: HashMap<LocalId, AccessRecord>,
    state: AccessState,
}

impl Default for AccessSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl AccessSystem {
    pub fn new() -> Self {
        Self {
            records: HashMap::new(),
            state: AccessState::default(),
        }
    }

    // Projection

    pub fn state(&self) -> &AccessState {
        &self.state
    }

    /// Focus the projection on `local`, picking up its composite parent
    pub fn load_state<W: ShapeStore + ?Sized>(
        &mut self,
        ctx: &mut SystemContext<'_, W>,
        local: LocalId,
    ) {
        self.state.id = Some(local);
        self.state.parent_id = ctx.world.composite_parent(&local);
        self.update_state(ctx);
    }

    pub fn drop_state(&mut self) {
        self.state = AccessState::default();
    }

    // Records

    /// Replace the access record of a shape
    pub fn inform<W: ?Sized>(
        &mut self,
        ctx: &mut SystemContext<'_, W>,
        local: LocalId,
        inform: AccessInform,
    ) {
        let mut owners: Vec<(String, Access)> = Vec::with_capacity(inform.owners.len());
        for owner in inform.owners {
            match owners.iter_mut().find(|(user, _)| *user == owner.user) {
                Some((_, access)) => *access = owner.access,
                None => owners.push((owner.user, owner.access)),
            }
        }
        self.records.insert(
            local,
            AccessRecord {
                default: inform.default,
                owners,
            },
        );

        if self.is_focused(&local) {
            self.update_state(ctx);
        }
    }

    pub fn is_known(&self, local: &LocalId) -> bool {
        self.records.contains_key(local)
    }

    pub fn get_default(&self, local: &LocalId) -> Option<Access> {
        match self.records.get(local) {
            Some(record) => Some(record.default),
            None => {
                error!("Attempt to get default access of unknown shape {}", local);
                None
            }
        }
    }

    pub fn get_access(&self, local: &LocalId, user: &str) -> Option<Access> {
        self.records
            .get(local)
            .and_then(|record| record.owner(user))
            .copied()
    }

    /// Names of the users with an override, in insertion order
    pub fn get_owners(&self, local: &LocalId) -> Vec<String> {
        self.records
            .get(local)
            .map(|record| record.owners.iter().map(|(user, _)| user.clone()).collect())
            .unwrap_or_default()
    }

    pub fn get_owners_full(&self, local: &LocalId) -> Vec<ShapeOwner> {
        self.records
            .get(local)
            .map(|record| record.owners_full(*local))
            .unwrap_or_default()
    }

    /// Effective permission of the session on a shape.
    ///
    /// Every field present in `requested` must be granted by the same rule.
    pub fn has_access_to<W: ShapeStore + ?Sized>(
        &self,
        session: &Session,
        world: &W,
        local: &LocalId,
        limit_to_active: bool,
        requested: &AccessDelta,
    ) -> bool {
        if session.is_dm() && !session.fake_player() {
            return true;
        }

        if !world.has_shape(local) {
            return false;
        }

        if limit_to_active && world.is_token(local) && !session.is_active_token(local) {
            return false;
        }

        if session.fake_player() {
            return true;
        }

        let Some(record) = self.records.get(local) else {
            return false;
        };

        if record.default.grants(requested) {
            return true;
        }

        record
            .owner(session.username())
            .is_some_and(|access| access.grants(requested))
    }

    // Mutations

    pub fn add_access<W: ShapeStore + ?Sized>(
        &mut self,
        ctx: &mut SystemContext<'_, W>,
        local: LocalId,
        user: &str,
        access: Access,
        sync: SyncTo,
    ) -> Result<(), AccessError> {
        let Some(record) = self.records.get_mut(&local) else {
            return usage_error(AccessError::UnknownShape { shape: local });
        };
        if record.owner(user).is_some() {
            return usage_error(AccessError::OwnerAlreadyExists {
                shape: local,
                user: user.to_string(),
            });
        }

        record.owners.push((user.to_string(), access));

        if sync.emits() {
            ctx.emit(&local, |shape| {
                ClientMessage::OwnerAdd(ServerShapeOwner {
                    shape,
                    user: user.to_string(),
                    access: access.into(),
                })
            });
        }

        if access.vision && ctx.is_session_user(user) && ctx.world.is_token(&local) {
            add_owned_token(ctx, local);
        }

        self.refresh(ctx, &local, sync);
        Ok(())
    }

    /// Merge `delta` into the default record or into one user's override
    pub fn update_access<W: ShapeStore + ?Sized>(
        &mut self,
        ctx: &mut SystemContext<'_, W>,
        local: LocalId,
        target: AccessTarget,
        delta: AccessDelta,
        sync: SyncTo,
    ) -> Result<(), AccessError> {
        let Some(record) = self.records.get_mut(&local) else {
            return usage_error(AccessError::UnknownShape { shape: local });
        };

        match target {
            AccessTarget::Default => {
                record.default.apply(&delta);

                if sync.emits() {
                    ctx.emit(&local, |shape| {
                        ClientMessage::DefaultAccessUpdate(DefaultAccessUpdate::new(shape, &delta))
                    });
                }
            }
            AccessTarget::User(user) => {
                let Some(access) = record.owner_mut(&user) else {
                    return usage_error(AccessError::OwnerNotFound { shape: local, user });
                };

                let had_vision = access.vision;
                access.apply(&delta);
                let has_vision = access.vision;

                if sync.emits() {
                    ctx.emit(&local, |shape| {
                        ClientMessage::OwnerUpdate(OwnerAccessUpdate::new(
                            shape,
                            user.as_str(),
                            &delta,
                        ))
                    });
                }

                if had_vision != has_vision
                    && ctx.is_session_user(&user)
                    && ctx.world.is_token(&local)
                {
                    if has_vision {
                        add_owned_token(ctx, local);
                    } else {
                        remove_owned_token(ctx, &local);
                    }
                }
            }
        }

        self.refresh(ctx, &local, sync);
        Ok(())
    }

    pub fn remove_access<W: ShapeStore + ?Sized>(
        &mut self,
        ctx: &mut SystemContext<'_, W>,
        local: LocalId,
        user: &str,
        sync: SyncTo,
    ) -> Result<(), AccessError> {
        let Some(record) = self.records.get_mut(&local) else {
            return usage_error(AccessError::UnknownShape { shape: local });
        };
        let Some(index) = record.owners.iter().position(|(owner, _)| owner == user) else {
            return usage_error(AccessError::OwnerNotFound {
                shape: local,
                user: user.to_string(),
            });
        };

        let (_, removed) = record.owners.remove(index);

        if sync.emits() {
            ctx.emit(&local, |shape| {
                ClientMessage::OwnerDelete(OwnerRemove {
                    shape,
                    user: user.to_string(),
                })
            });
        }

        if removed.vision && ctx.is_session_user(user) && ctx.world.is_token(&local) {
            remove_owned_token(ctx, &local);
        }

        self.refresh(ctx, &local, sync);
        Ok(())
    }

    // Private

    fn is_focused(&self, local: &LocalId) -> bool {
        self.state.id.as_ref() == Some(local) || self.state.parent_id.as_ref() == Some(local)
    }

    fn refresh<W: ?Sized>(
        &mut self,
        ctx: &mut SystemContext<'_, W>,
        local: &LocalId,
        sync: SyncTo,
    ) {
        if sync.refreshes_projection() && self.is_focused(local) {
            self.update_state(ctx);
        }
    }

    fn update_state<W: ?Sized>(&mut self, ctx: &mut SystemContext<'_, W>) {
        let Some(id) = self.state.id else {
            return;
        };

        let record = self.records.get(&id);
        self.state.default_access = record.map_or(DEFAULT_ACCESS, |record| record.default);
        self.state.player_access = record.map_or_else(Vec::new, |record| record.owners_full(id));

        let parent = self
            .state
            .parent_id
            .and_then(|parent_id| self.records.get(&parent_id).map(|record| (parent_id, record)));
        self.state.parent_default_access = parent.map(|(_, record)| record.default);
        self.state.parent_player_access = parent
            .map_or_else(Vec::new, |(parent_id, record)| record.owners_full(parent_id));

        ctx.events.push_access_state(self.state.clone());
    }
}

impl System for AccessSystem {
    fn clear(&mut self) {
        self.drop_state();
        self.records.clear();
    }

    fn drop_shape(&mut self, events: &mut ClientEvents, local: &LocalId) {
        self.records.remove(local);
        if self.state.id.as_ref() == Some(local) {
            self.drop_state();
        } else if self.state.parent_id.as_ref() == Some(local) {
            self.state.parent_id = None;
            self.state.parent_default_access = None;
            self.state.parent_player_access.clear();
            events.push_access_state(self.state.clone());
        }
    }
}

fn usage_error<T>(err: AccessError) -> Result<T, AccessError> {
    error!("{}", err);
    Err(err)
}

fn add_owned_token<W: ?Sized>(ctx: &mut SystemContext<'_, W>, local: LocalId) {
    if ctx.session.add_owned_token(local) {
        ctx.events.push_owned_token_added(local);
    }
}

fn remove_owned_token<W: ?Sized>(ctx: &mut SystemContext<'_, W>, local: &LocalId) {
    if ctx.session.remove_owned_token(local) {
        ctx.events.push_owned_token_removed(*local);
    }
}
