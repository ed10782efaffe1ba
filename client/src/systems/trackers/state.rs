use tabletop_shared::{LocalId, Tracker, TrackerId};

/// A tracker as shown in the editing UI
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UiTracker {
    pub shape: LocalId,
    pub tracker: Tracker,
    /// Creation template, not backed by a stored tracker
    pub temporary: bool,
}

impl UiTracker {
    pub(crate) fn stored(shape: LocalId, tracker: &Tracker) -> Self {
        Self {
            shape,
            tracker: tracker.clone(),
            temporary: false,
        }
    }

    pub(crate) fn template(shape: LocalId) -> Self {
        Self {
            shape,
            tracker: Tracker::empty(TrackerId::generate()),
            temporary: true,
        }
    }
}

/// Read-only snapshot of the focused shape's trackers
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TrackerState {
    pub id: Option<LocalId>,
    pub trackers: Vec<UiTracker>,
    pub parent_id: Option<LocalId>,
    pub parent_trackers: Vec<UiTracker>,
}

impl TrackerState {
    /// Stored trackers of the focused shape, template excluded
    pub fn stored(&self) -> impl Iterator<Item = &UiTracker> {
        self.trackers.iter().filter(|tracker| !tracker.temporary)
    }

    pub fn template(&self) -> Option<&UiTracker> {
        self.trackers.iter().find(|tracker| tracker.temporary)
    }
}
