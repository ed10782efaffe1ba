use std::default::Default;

/// Contains Config properties which will be used by the Client
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// Name of the room's creator. A `Client.Options.Set` naming this user
    /// makes the session a DM session.
    pub room_creator: Option<String>,
    /// Whether the tracker projection carries a blank entry for creating new
    /// trackers.
    pub empty_tracker_template: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            room_creator: None,
            empty_tracker_template: true,
        }
    }
}
