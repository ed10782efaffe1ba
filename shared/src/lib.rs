//! # Tabletop Shared
//! Identifiers, access & tracker models, and wire messages shared by the
//! tabletop client core and its test harness.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

#[macro_use]
extern crate cfg_if;

cfg_if! {
    if #[cfg(all(target_arch = "wasm32", not(feature = "wbindgen")))]
    {
        // GlobalId generation needs an entropy source in the browser
        compile_error!("wasm target for 'tabletop_shared' crate requires the 'wbindgen' feature to be enabled.");
    }
}

mod key_generator;
mod messages;
mod types;
mod world;

pub use key_generator::KeyGenerator;
pub use messages::{
    client_options::{ClientOptions, DisplaySettings},
    error::MessageError,
    message::{ClientMessage, ServerMessage},
    payloads::{
        DefaultAccessUpdate, OwnerAccessUpdate, OwnerRemove, ServerShapeAccess, ServerShapeOwner,
        ServerShapeState, ServerTracker, TrackerMove, TrackerRemove, TrackerUpdate,
    },
};
pub use types::SyncTo;
pub use world::{
    access::{
        access::{Access, AccessDelta, AccessTarget, ShapeOwner, DEFAULT_ACCESS},
        error::AccessError,
    },
    entity::{
        error::EntityError,
        global_id::GlobalId,
        local_id::LocalId,
    },
    tracker::{
        error::TrackerError,
        tracker::{Tracker, TrackerDelta, TrackerId},
    },
};
