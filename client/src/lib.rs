//! # Tabletop Client
//! Identity registry, access control and tracker synchronization for the
//! client side of a collaborative virtual tabletop.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

pub use tabletop_shared as shared;

mod client;
mod client_config;
mod error;
mod events;
mod outbox;
mod session;
mod systems;
mod world;

pub use client::Client;
pub use client_config::ClientConfig;
pub use error::TabletopClientError;
pub use events::{
    AccessStateEvent, ClientEvent, ClientEvents, OwnedTokenAddedEvent, OwnedTokenRemovedEvent,
    SelectLayerEvent, TrackerStateEvent,
};
pub use outbox::Outbox;
pub use session::Session;
pub use systems::{
    access::{AccessInform, AccessState, AccessSystem},
    trackers::{TrackerState, TrackerSystem, UiTracker},
    System, SystemContext,
};
pub use world::{
    id_registry::{IdEntry, IdRegistry},
    shape_store::{ShapeStore, ShapeStoreMut},
};
