use std::vec::IntoIter;

use tabletop_shared::LocalId;

use crate::systems::{access::AccessState, trackers::TrackerState};

/// Notifications produced while handling local actions and inbound messages.
///
/// Consumers drain them with `read::<V>()` once per frame.
pub struct ClientEvents {
    access_states: Vec<AccessState>,
    tracker_states: Vec<TrackerState>,
    owned_tokens_added: Vec<LocalId>,
    owned_tokens_removed: Vec<LocalId>,
    select_layers: Vec<String>,
}

impl Default for ClientEvents {
    fn default() -> Self {
        Self::new()
    }
}

impl ClientEvents {
    pub fn new() -> Self {
        Self {
            access_states: Vec::new(),
            tracker_states: Vec::new(),
            owned_tokens_added: Vec::new(),
            owned_tokens_removed: Vec::new(),
            select_layers: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.access_states.is_empty()
            && self.tracker_states.is_empty()
            && self.owned_tokens_added.is_empty()
            && self.owned_tokens_removed.is_empty()
            && self.select_layers.is_empty()
    }

    pub fn read<V: ClientEvent>(&mut self) -> V::Iter {
        V::iter(self)
    }

    pub fn has<V: ClientEvent>(&self) -> bool {
        V::has(self)
    }

    pub(crate) fn push_access_state(&mut self, state: AccessState) {
        self.access_states.push(state);
    }

    pub(crate) fn push_tracker_state(&mut self, state: TrackerState) {
        self.tracker_states.push(state);
    }

    pub(crate) fn push_owned_token_added(&mut self, local: LocalId) {
        self.owned_tokens_added.push(local);
    }

    pub(crate) fn push_owned_token_removed(&mut self, local: LocalId) {
        self.owned_tokens_removed.push(local);
    }

    pub(crate) fn push_select_layer(&mut self, layer: String) {
        self.select_layers.push(layer);
    }

    pub fn clear(&mut self) {
        self.access_states.clear();
        self.tracker_states.clear();
        self.owned_tokens_added.clear();
        self.owned_tokens_removed.clear();
        self.select_layers.clear();
    }
}

// Event Trait
pub trait ClientEvent {
    type Iter;

    fn iter(events: &mut ClientEvents) -> Self::Iter;

    fn has(events: &ClientEvents) -> bool;
}

// Access State Event
/// The focused access projection was recomputed
pub struct AccessStateEvent;
impl ClientEvent for AccessStateEvent {
    type Iter = IntoIter<AccessState>;

    fn iter(events: &mut ClientEvents) -> Self::Iter {
        let list = std::mem::take(&mut events.access_states);
        IntoIterator::into_iter(list)
    }

    fn has(events: &ClientEvents) -> bool {
        !events.access_states.is_empty()
    }
}

// Tracker State Event
/// The focused tracker projection was recomputed
pub struct TrackerStateEvent;
impl ClientEvent for TrackerStateEvent {
    type Iter = IntoIter<TrackerState>;

    fn iter(events: &mut ClientEvents) -> Self::Iter {
        let list = std::mem::take(&mut events.tracker_states);
        IntoIterator::into_iter(list)
    }

    fn has(events: &ClientEvents) -> bool {
        !events.tracker_states.is_empty()
    }
}

// Owned Token Added Event
/// A token entered the session's owned-token set; vision needs recalculating
pub struct OwnedTokenAddedEvent;
impl ClientEvent for OwnedTokenAddedEvent {
    type Iter = IntoIter<LocalId>;

    fn iter(events: &mut ClientEvents) -> Self::Iter {
        let list = std::mem::take(&mut events.owned_tokens_added);
        IntoIterator::into_iter(list)
    }

    fn has(events: &ClientEvents) -> bool {
        !events.owned_tokens_added.is_empty()
    }
}

// Owned Token Removed Event
pub struct OwnedTokenRemovedEvent;
impl ClientEvent for OwnedTokenRemovedEvent {
    type Iter = IntoIter<LocalId>;

    fn iter(events: &mut ClientEvents) -> Self::Iter {
        let list = std::mem::take(&mut events.owned_tokens_removed);
        IntoIterator::into_iter(list)
    }

    fn has(events: &ClientEvents) -> bool {
        !events.owned_tokens_removed.is_empty()
    }
}

// Select Layer Event
/// Deferred layer selection, fired once the floors have arrived
pub struct SelectLayerEvent;
impl ClientEvent for SelectLayerEvent {
    type Iter = IntoIter<String>;

    fn iter(events: &mut ClientEvents) -> Self::Iter {
        let list = std::mem::take(&mut events.select_layers);
        IntoIterator::into_iter(list)
    }

    fn has(events: &ClientEvents) -> bool {
        !events.select_layers.is_empty()
    }
}
