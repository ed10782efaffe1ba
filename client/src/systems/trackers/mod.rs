use std::collections::HashMap;

use log::{error, warn};

use tabletop_shared::{
    ClientMessage, LocalId, ServerTracker, SyncTo, Tracker, TrackerDelta, TrackerError, TrackerId,
    TrackerMove, TrackerRemove, TrackerUpdate,
};

use crate::{
    events::ClientEvents,
    systems::{System, SystemContext},
    world::shape_store::{ShapeStore, ShapeStoreMut},
};

mod state;
pub use state::{TrackerState, UiTracker};

/// Per-shape tracker lists, read together with the composite parent's list
pub struct TrackerSystem {
    data: HashMap<LocalId, Vec<Tracker>>,
    state: TrackerState,
    empty_template: bool,
}

impl Default for TrackerSystem {
    fn default() -> Self {
        Self::new(true)
    }
}

impl TrackerSystem {
    /// `empty_template` appends a blank creation entry to the projection
    pub fn new(empty_template: bool) -> Self {
        Self {
            data: HashMap::new(),
            state: TrackerState::default(),
            empty_template,
        }
    }

    // Projection

    pub fn state(&self) -> &TrackerState {
        &self.state
    }

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
        self.state = TrackerState::default();
    }

    // Records

    /// Replace the tracker list of a shape
    pub fn inform<W: ?Sized>(
        &mut self,
        ctx: &mut SystemContext<'_, W>,
        local: LocalId,
        trackers: Vec<Tracker>,
    ) {
        self.data.insert(local, trackers);
        if self.is_focused(&local) {
            self.update_state(ctx);
        }
    }

    pub fn is_known(&self, local: &LocalId) -> bool {
        self.data.contains_key(local)
    }

    pub fn get<W: ShapeStore + ?Sized>(
        &self,
        world: &W,
        local: &LocalId,
        tracker_id: &TrackerId,
        include_parent: bool,
    ) -> Option<&Tracker> {
        self.get_all(world, local, include_parent)
            .into_iter()
            .find(|tracker| tracker.uuid == *tracker_id)
    }

    /// The composite parent's trackers (if asked for), then the shape's own.
    /// Parents are only followed one level.
    pub fn get_all<W: ShapeStore + ?Sized>(
        &self,
        world: &W,
        local: &LocalId,
        include_parent: bool,
    ) -> Vec<&Tracker> {
        let mut output = Vec::new();
        if include_parent {
            if let Some(parent) = world.composite_parent(local) {
                output.extend(self.own(&parent));
            }
        }
        output.extend(self.own(local));
        output
    }

    // Mutations

    pub fn add<W: ShapeStoreMut + ?Sized>(
        &mut self,
        ctx: &mut SystemContext<'_, W>,
        local: LocalId,
        tracker: Tracker,
        sync: SyncTo,
    ) -> Result<(), TrackerError> {
        let Some(trackers) = self.data.get_mut(&local) else {
            return usage_error(TrackerError::UnknownShape { shape: local });
        };
        if trackers.iter().any(|existing| existing.uuid == tracker.uuid) {
            return usage_error(TrackerError::TrackerAlreadyExists {
                shape: local,
                tracker: tracker.uuid,
            });
        }

        if sync.emits() {
            ctx.emit(&local, |shape| {
                ClientMessage::TrackerCreate(ServerTracker {
                    shape,
                    tracker: tracker.clone(),
                })
            });
        }

        let draw = tracker.draw;
        trackers.push(tracker);

        self.refresh(ctx, &local, sync);

        if draw {
            ctx.world.invalidate(&local, false);
        }
        Ok(())
    }

    pub fn update<W: ShapeStoreMut + ?Sized>(
        &mut self,
        ctx: &mut SystemContext<'_, W>,
        local: LocalId,
        tracker_id: &TrackerId,
        delta: TrackerDelta,
        sync: SyncTo,
    ) -> Result<(), TrackerError> {
        let Some(trackers) = self.data.get_mut(&local) else {
            return usage_error(TrackerError::UnknownShape { shape: local });
        };
        let Some(tracker) = trackers.iter_mut().find(|tracker| tracker.uuid == *tracker_id) else {
            return usage_error(TrackerError::TrackerNotFound {
                shape: local,
                tracker: tracker_id.clone(),
            });
        };

        let old_draw = tracker.draw;
        tracker.apply(&delta);
        let draw_changed = tracker.draw != old_draw;

        if sync.emits() {
            ctx.emit(&local, |shape| {
                ClientMessage::TrackerUpdate(TrackerUpdate {
                    shape,
                    uuid: tracker_id.clone(),
                    delta,
                })
            });
        }

        self.refresh(ctx, &local, sync);

        if draw_changed {
            ctx.world.invalidate(&local, false);
        }
        Ok(())
    }

    pub fn remove<W: ShapeStoreMut + ?Sized>(
        &mut self,
        ctx: &mut SystemContext<'_, W>,
        local: LocalId,
        tracker_id: &TrackerId,
        sync: SyncTo,
    ) -> Result<Tracker, TrackerError> {
        let Some(trackers) = self.data.get_mut(&local) else {
            return usage_error(TrackerError::UnknownShape { shape: local });
        };
        let Some(index) = trackers.iter().position(|tracker| tracker.uuid == *tracker_id) else {
            return usage_error(TrackerError::TrackerNotFound {
                shape: local,
                tracker: tracker_id.clone(),
            });
        };

        let removed = trackers.remove(index);

        if sync.emits() {
            ctx.emit(&local, |shape| {
                ClientMessage::TrackerRemove(TrackerRemove {
                    shape,
                    value: tracker_id.clone(),
                })
            });
        }

        self.refresh(ctx, &local, sync);

        if removed.draw {
            ctx.world.invalidate(&local, false);
        }
        Ok(removed)
    }

    /// Reassign a tracker to another shape, keeping its id and contents.
    ///
    /// The local remove and add never emit on their own; `Server` queues a
    /// single `Shape.Options.Tracker.Move` instead. Moving onto the owning
    /// shape changes nothing.
    pub fn move_tracker<W: ShapeStoreMut + ?Sized>(
        &mut self,
        ctx: &mut SystemContext<'_, W>,
        from: LocalId,
        tracker_id: &TrackerId,
        to: LocalId,
        sync: SyncTo,
    ) -> Result<(), TrackerError> {
        if from == to {
            let Some(trackers) = self.data.get(&from) else {
                return usage_error(TrackerError::UnknownShape { shape: from });
            };
            if !trackers.iter().any(|tracker| tracker.uuid == *tracker_id) {
                return usage_error(TrackerError::TrackerNotFound {
                    shape: from,
                    tracker: tracker_id.clone(),
                });
            }
            return Ok(());
        }

        let Some(target) = self.data.get(&to) else {
            return usage_error(TrackerError::UnknownShape { shape: to });
        };
        if target.iter().any(|tracker| tracker.uuid == *tracker_id) {
            return usage_error(TrackerError::TrackerAlreadyExists {
                shape: to,
                tracker: tracker_id.clone(),
            });
        }

        let local_sync = match sync {
            SyncTo::Server => SyncTo::Ui,
            other => other,
        };
        let tracker = self.remove(ctx, from, tracker_id, local_sync)?;
        self.add(ctx, to, tracker, local_sync)?;

        if sync.emits() {
            match ctx.ids.global_id(&to).cloned() {
                Some(new_shape) => ctx.emit(&from, |shape| {
                    ClientMessage::TrackerMove(TrackerMove {
                        shape,
                        tracker: tracker_id.clone(),
                        new_shape,
                    })
                }),
                None => warn!("no GlobalId for shape {}, tracker move not sent", to),
            }
        }
        Ok(())
    }

    // Private

    fn own(&self, local: &LocalId) -> impl Iterator<Item = &Tracker> {
        self.data.get(local).into_iter().flatten()
    }

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

        let mut trackers: Vec<UiTracker> = self
            .own(&id)
            .map(|tracker| UiTracker::stored(id, tracker))
            .collect();
        if self.empty_template {
            trackers.push(UiTracker::template(id));
        }
        self.state.trackers = trackers;

        self.state.parent_trackers = match self.state.parent_id {
            Some(parent_id) => self
                .own(&parent_id)
                .map(|tracker| UiTracker::stored(parent_id, tracker))
                .collect(),
            None => Vec::new(),
        };

        ctx.events.push_tracker_state(self.state.clone());
    }
}

impl System for TrackerSystem {
    fn clear(&mut self) {
        self.drop_state();
        self.data.clear();
    }

    fn drop_shape(&mut self, events: &mut ClientEvents, local: &LocalId) {
        self.data.remove(local);
        if self.state.id.as_ref() == Some(local) {
            self.drop_state();
        } else if self.state.parent_id.as_ref() == Some(local) {
            self.state.parent_id = None;
            self.state.parent_trackers.clear();
            events.push_tracker_state(self.state.clone());
        }
    }
}

fn usage_error<T>(err: TrackerError) -> Result<T, TrackerError> {
    error!("{}", err);
    Err(err)
}
