use log::warn;

use tabletop_shared::{ClientMessage, GlobalId, LocalId};

use crate::{events::ClientEvents, outbox::Outbox, session::Session, world::id_registry::IdRegistry};

pub mod access;
pub mod trackers;

/// A per-shape record store that follows the shape lifecycle
pub trait System {
    /// Forget every record and drop the focused projection
    fn clear(&mut self);

    /// Forget the records of a despawned shape. A projection that still
    /// refers to it, as focus or as composite parent, lets go of it.
    fn drop_shape(&mut self, events: &mut ClientEvents, local: &LocalId);
}

/// Everything a mutation may touch besides the system's own records.
///
/// Built fresh for each call, borrowing the pieces out of the owning client.
pub struct SystemContext<'c, W: ?Sized> {
    pub ids: &'c IdRegistry,
    pub session: &'c mut Session,
    pub outbox: &'c mut Outbox,
    pub events: &'c mut ClientEvents,
    pub world: &'c mut W,
}

impl<'c, W: ?Sized> SystemContext<'c, W> {
    pub fn new(
        ids: &'c IdRegistry,
        session: &'c mut Session,
        outbox: &'c mut Outbox,
        events: &'c mut ClientEvents,
        world: &'c mut W,
    ) -> Self {
        Self {
            ids,
            session,
            outbox,
            events,
            world,
        }
    }

    /// Queue a message about `local` for the server. Shapes without a
    /// GlobalId cannot be addressed on the wire; the message is skipped.
    pub(crate) fn emit(&mut self, local: &LocalId, build: impl FnOnce(GlobalId) -> ClientMessage) {
        match self.ids.global_id(local) {
            Some(global_id) => {
                let message = build(global_id.clone());
                self.outbox.push(message);
            }
            None => {
                warn!("no GlobalId for shape {}, message not sent", local);
            }
        }
    }

    pub(crate) fn is_session_user(&self, user: &str) -> bool {
        self.session.username() == user
    }
}
