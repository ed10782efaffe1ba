use log::{debug, info};

use tabletop_shared::{
    Access, AccessDelta, AccessTarget, ClientMessage, ClientOptions, GlobalId, LocalId,
    MessageError, ServerMessage, ServerShapeState, ShapeOwner, SyncTo, Tracker, TrackerDelta,
    TrackerId,
};

use crate::{
    client_config::ClientConfig,
    error::TabletopClientError,
    events::ClientEvents,
    outbox::Outbox,
    session::Session,
    systems::{
        access::{AccessInform, AccessSystem},
        trackers::TrackerSystem,
        System, SystemContext,
    },
    world::{
        id_registry::IdRegistry,
        shape_store::{ShapeStore, ShapeStoreMut},
    },
};

// Systems
struct Systems<'c> {
    access: &'c mut AccessSystem,
    trackers: &'c mut TrackerSystem,
}

/// Client core of a tabletop session.
///
/// Owns the id registry, the session context and every per-shape system.
/// Local user actions go through the mutation methods (usually with
/// `SyncTo::Server`); server frames go through [`Client::receive_message`],
/// which always applies them with `SyncTo::Ui`.
pub struct Client {
    config: ClientConfig,
    ids: IdRegistry,
    session: Session,
    access: AccessSystem,
    trackers: TrackerSystem,
    outbox: Outbox,
    events: ClientEvents,
    /// Armed by `Client.Options.Set`, consumed by the next `Board.Floor.Set`
    floor_pending: bool,
    pending_layer: Option<String>,
}

impl Client {
    /// Create a new Client
    pub fn new(config: ClientConfig) -> Self {
        let trackers = TrackerSystem::new(config.empty_tracker_template);
        Self {
            config,
            ids: IdRegistry::new(),
            session: Session::default(),
            access: AccessSystem::new(),
            trackers,
            outbox: Outbox::new(),
            events: ClientEvents::new(),
            floor_pending: false,
            pending_layer: None,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn ids(&self) -> &IdRegistry {
        &self.ids
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    pub fn access(&self) -> &AccessSystem {
        &self.access
    }

    pub fn trackers(&self) -> &TrackerSystem {
        &self.trackers
    }

    // Shapes

    /// Hand out a LocalId for a shape that is still being built
    pub fn reserve_shape(&mut self, global_id: GlobalId) -> LocalId {
        self.ids.reserve(global_id)
    }

    /// Register a shape received from the server, adopting a reserved LocalId
    /// if there is one, and seed the access and tracker records from it.
    pub fn spawn_shape<W: ?Sized>(&mut self, world: &mut W, state: &ServerShapeState) -> LocalId {
        let local = self.ids.claim(Some(state.uuid.clone()));

        let mut owners = Vec::with_capacity(state.owners.len());
        for owner in &state.owners {
            let Some(shape) = self.ids.local_id(&owner.shape) else {
                debug!("dropping owner {} of unknown shape {}", owner.user, owner.shape);
                continue;
            };
            owners.push(ShapeOwner::new(owner.user.clone(), shape, owner.access.into()));
        }
        let trackers: Vec<Tracker> = state
            .trackers
            .iter()
            .map(|tracker| tracker.tracker.clone())
            .collect();

        let owned = state.is_token
            && owners
                .iter()
                .any(|owner| owner.user == self.session.username() && owner.access.vision);

        let (systems, mut ctx) = self.split(world);
        systems.access.inform(
            &mut ctx,
            local,
            AccessInform {
                default: state.default_access(),
                owners,
            },
        );
        systems.trackers.inform(&mut ctx, local, trackers);

        if owned && ctx.session.add_owned_token(local) {
            ctx.events.push_owned_token_added(local);
        }

        local
    }

    /// Tear a shape down: every system forgets it before the LocalId is
    /// recycled. Returns the GlobalId it was registered under.
    pub fn despawn_shape(&mut self, local: &LocalId) -> Option<GlobalId> {
        self.access.drop_shape(&mut self.events, local);
        self.trackers.drop_shape(&mut self.events, local);
        if self.session.owns_token(local) {
            self.events.push_owned_token_removed(*local);
        }
        self.session.forget_shape(local);
        self.ids.drop(local)
    }

    /// Forget every shape, e.g. when leaving a location
    pub fn clear(&mut self) {
        self.access.clear();
        self.trackers.clear();
        let locals: Vec<LocalId> = self
            .ids
            .debug_entries()
            .iter()
            .map(|entry| entry.local_id)
            .collect();
        for local in locals {
            if self.session.owns_token(&local) {
                self.events.push_owned_token_removed(local);
            }
            self.session.forget_shape(&local);
            self.ids.drop(&local);
        }
    }

    // Projection

    /// Focus both projections on `local`
    pub fn load_state<W: ShapeStore + ?Sized>(&mut self, world: &mut W, local: LocalId) {
        let (systems, mut ctx) = self.split(world);
        systems.access.load_state(&mut ctx, local);
        systems.trackers.load_state(&mut ctx, local);
    }

    pub fn drop_state(&mut self) {
        self.access.drop_state();
        self.trackers.drop_state();
    }

    // Access

    pub fn has_access_to<W: ShapeStore + ?Sized>(
        &self,
        world: &W,
        local: &LocalId,
        limit_to_active: bool,
        requested: &AccessDelta,
    ) -> bool {
        self.access
            .has_access_to(&self.session, world, local, limit_to_active, requested)
    }

    pub fn add_access<W: ShapeStore + ?Sized>(
        &mut self,
        world: &mut W,
        local: LocalId,
        user: &str,
        access: Access,
        sync: SyncTo,
    ) -> Result<(), TabletopClientError> {
        let (systems, mut ctx) = self.split(world);
        systems.access.add_access(&mut ctx, local, user, access, sync)?;
        Ok(())
    }

    pub fn update_access<W: ShapeStore + ?Sized>(
        &mut self,
        world: &mut W,
        local: LocalId,
        target: AccessTarget,
        delta: AccessDelta,
        sync: SyncTo,
    ) -> Result<(), TabletopClientError> {
        let (systems, mut ctx) = self.split(world);
        systems
            .access
            .update_access(&mut ctx, local, target, delta, sync)?;
        Ok(())
    }

    pub fn remove_access<W: ShapeStore + ?Sized>(
        &mut self,
        world: &mut W,
        local: LocalId,
        user: &str,
        sync: SyncTo,
    ) -> Result<(), TabletopClientError> {
        let (systems, mut ctx) = self.split(world);
        systems.access.remove_access(&mut ctx, local, user, sync)?;
        Ok(())
    }

    // Trackers

    pub fn add_tracker<W: ShapeStoreMut + ?Sized>(
        &mut self,
        world: &mut W,
        local: LocalId,
        tracker: Tracker,
        sync: SyncTo,
    ) -> Result<(), TabletopClientError> {
        let (systems, mut ctx) = self.split(world);
        systems.trackers.add(&mut ctx, local, tracker, sync)?;
        Ok(())
    }

    pub fn update_tracker<W: ShapeStoreMut + ?Sized>(
        &mut self,
        world: &mut W,
        local: LocalId,
        tracker_id: &TrackerId,
        delta: TrackerDelta,
        sync: SyncTo,
    ) -> Result<(), TabletopClientError> {
        let (systems, mut ctx) = self.split(world);
        systems
            .trackers
            .update(&mut ctx, local, tracker_id, delta, sync)?;
        Ok(())
    }

    pub fn remove_tracker<W: ShapeStoreMut + ?Sized>(
        &mut self,
        world: &mut W,
        local: LocalId,
        tracker_id: &TrackerId,
        sync: SyncTo,
    ) -> Result<Tracker, TabletopClientError> {
        let (systems, mut ctx) = self.split(world);
        let removed = systems.trackers.remove(&mut ctx, local, tracker_id, sync)?;
        Ok(removed)
    }

    pub fn move_tracker<W: ShapeStoreMut + ?Sized>(
        &mut self,
        world: &mut W,
        from: LocalId,
        tracker_id: &TrackerId,
        to: LocalId,
        sync: SyncTo,
    ) -> Result<(), TabletopClientError> {
        let (systems, mut ctx) = self.split(world);
        systems
            .trackers
            .move_tracker(&mut ctx, from, tracker_id, to, sync)?;
        Ok(())
    }

    // Incoming

    /// Decode one wire frame and apply it. Malformed frames are logged and
    /// dropped.
    pub fn receive_json<W: ShapeStoreMut + ?Sized>(
        &mut self,
        world: &mut W,
        frame: &str,
    ) -> Result<(), TabletopClientError> {
        let message = ServerMessage::from_json(frame)?;
        self.receive_message(world, message)
    }

    /// Apply a server message. Messages about shapes that are not known
    /// locally (yet) are dropped.
    pub fn receive_message<W: ShapeStoreMut + ?Sized>(
        &mut self,
        world: &mut W,
        message: ServerMessage,
    ) -> Result<(), TabletopClientError> {
        let event = message.event_name();
        match message {
            ServerMessage::TrackerCreate(data) => {
                let Some(local) = self.resolve(&data.shape, event) else {
                    return Ok(());
                };
                self.add_tracker(world, local, data.tracker, SyncTo::Ui)
            }
            ServerMessage::TrackerUpdate(data) => {
                let Some(local) = self.resolve(&data.shape, event) else {
                    return Ok(());
                };
                self.update_tracker(world, local, &data.uuid, data.delta, SyncTo::Ui)
            }
            ServerMessage::TrackerRemove(data) => {
                let Some(local) = self.resolve(&data.shape, event) else {
                    return Ok(());
                };
                self.remove_tracker(world, local, &data.value, SyncTo::Ui)
                    .map(|_| ())
            }
            ServerMessage::TrackerMove(data) => {
                let (Some(from), Some(to)) = (
                    self.resolve(&data.shape, event),
                    self.resolve(&data.new_shape, event),
                ) else {
                    return Ok(());
                };
                self.move_tracker(world, from, &data.tracker, to, SyncTo::Ui)
            }
            ServerMessage::OwnerAdd(data) => {
                let Some(local) = self.resolve(&data.shape, event) else {
                    return Ok(());
                };
                self.add_access(world, local, &data.user, data.access.into(), SyncTo::Ui)
            }
            ServerMessage::OwnerUpdate(data) => {
                let Some(local) = self.resolve(&data.shape, event) else {
                    return Ok(());
                };
                let delta = data.delta();
                self.update_access(world, local, AccessTarget::User(data.user), delta, SyncTo::Ui)
            }
            ServerMessage::OwnerDelete(data) => {
                let Some(local) = self.resolve(&data.shape, event) else {
                    return Ok(());
                };
                self.remove_access(world, local, &data.user, SyncTo::Ui)
            }
            ServerMessage::DefaultAccessUpdate(data) => {
                let Some(local) = self.resolve(&data.shape, event) else {
                    return Ok(());
                };
                self.update_access(world, local, AccessTarget::Default, data.delta(), SyncTo::Ui)
            }
            ServerMessage::ClientOptionsSet(options) => {
                self.set_client_options(options);
                Ok(())
            }
            ServerMessage::BoardFloorSet(_) => {
                if std::mem::take(&mut self.floor_pending) {
                    if let Some(layer) = self.pending_layer.take() {
                        self.events.push_select_layer(layer);
                    }
                }
                Ok(())
            }
        }
    }

    // Outgoing

    /// Drain the messages queued for the server
    pub fn take_outgoing(&mut self) -> Vec<ClientMessage> {
        self.outbox.take()
    }

    /// Drain the messages queued for the server as wire frames
    pub fn take_outgoing_frames(&mut self) -> Result<Vec<String>, MessageError> {
        self.outbox
            .take()
            .iter()
            .map(ClientMessage::to_json)
            .collect()
    }

    pub fn outbox(&self) -> &Outbox {
        &self.outbox
    }

    pub fn events(&mut self) -> &mut ClientEvents {
        &mut self.events
    }

    /// Take every event produced since the last call
    pub fn take_events(&mut self) -> ClientEvents {
        std::mem::take(&mut self.events)
    }

    // Private

    fn split<'c, W: ?Sized>(
        &'c mut self,
        world: &'c mut W,
    ) -> (Systems<'c>, SystemContext<'c, W>) {
        let Self {
            ids,
            session,
            access,
            trackers,
            outbox,
            events,
            ..
        } = self;
        (
            Systems { access, trackers },
            SystemContext::new(ids, session, outbox, events, world),
        )
    }

    fn resolve(&self, global_id: &GlobalId, event: &str) -> Option<LocalId> {
        match self.ids.local_id(global_id) {
            Some(local) if !self.ids.is_reserved(&local) => Some(local),
            _ => {
                debug!("dropping {}: shape {} is not known locally", event, global_id);
                None
            }
        }
    }

    fn set_client_options(&mut self, options: ClientOptions) {
        let is_dm = self.config.room_creator.as_deref() == Some(options.name.as_str());
        info!("session user {} (dm: {})", options.name, is_dm);

        self.session.set_username(options.name);
        self.session.set_dm(is_dm);
        self.session.set_display(options.display);

        self.floor_pending = true;
        self.pending_layer = options.active_layer;
    }
}
