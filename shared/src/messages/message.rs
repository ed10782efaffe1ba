use log::warn;
use serde::{Deserialize, Serialize};

use crate::{
    messages::{
        client_options::ClientOptions,
        error::MessageError,
        payloads::{
            DefaultAccessUpdate, OwnerAccessUpdate, OwnerRemove, ServerShapeOwner, ServerTracker,
            TrackerMove, TrackerRemove, TrackerUpdate,
        },
    },
    GlobalId,
};

// Messages emitted towards the server. Frames look like
// `{"event": "Shape.Options.Tracker.Create", "data": {...}}`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum ClientMessage {
    #[serde(rename = "Shape.Options.Tracker.Create")]
    TrackerCreate(ServerTracker),
    #[serde(rename = "Shape.Options.Tracker.Update")]
    TrackerUpdate(TrackerUpdate),
    #[serde(rename = "Shape.Options.Tracker.Remove")]
    TrackerRemove(TrackerRemove),
    #[serde(rename = "Shape.Options.Tracker.Move")]
    TrackerMove(TrackerMove),
    #[serde(rename = "Shape.Owner.Add")]
    OwnerAdd(ServerShapeOwner),
    #[serde(rename = "Shape.Owner.Update")]
    OwnerUpdate(OwnerAccessUpdate),
    #[serde(rename = "Shape.Owner.Delete")]
    OwnerDelete(OwnerRemove),
    #[serde(rename = "Shape.Owner.Default.Update")]
    DefaultAccessUpdate(DefaultAccessUpdate),
}

impl ClientMessage {
    pub fn event_name(&self) -> &'static str {
        match self {
            Self::TrackerCreate(_) => "Shape.Options.Tracker.Create",
            Self::TrackerUpdate(_) => "Shape.Options.Tracker.Update",
            Self::TrackerRemove(_) => "Shape.Options.Tracker.Remove",
            Self::TrackerMove(_) => "Shape.Options.Tracker.Move",
            Self::OwnerAdd(_) => "Shape.Owner.Add",
            Self::OwnerUpdate(_) => "Shape.Owner.Update",
            Self::OwnerDelete(_) => "Shape.Owner.Delete",
            Self::DefaultAccessUpdate(_) => "Shape.Owner.Default.Update",
        }
    }

    /// The shape this message is about
    pub fn shape(&self) -> &GlobalId {
        match self {
            Self::TrackerCreate(data) => &data.shape,
            Self::TrackerUpdate(data) => &data.shape,
            Self::TrackerRemove(data) => &data.shape,
            Self::TrackerMove(data) => &data.shape,
            Self::OwnerAdd(data) => &data.shape,
            Self::OwnerUpdate(data) => &data.shape,
            Self::OwnerDelete(data) => &data.shape,
            Self::DefaultAccessUpdate(data) => &data.shape,
        }
    }

    pub fn to_json(&self) -> Result<String, MessageError> {
        serde_json::to_string(self).map_err(|err| MessageError::Encode {
            event: self.event_name(),
            reason: err.to_string(),
        })
    }
}

// Messages received from the server
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum ServerMessage {
    #[serde(rename = "Shape.Options.Tracker.Create")]
    TrackerCreate(ServerTracker),
    #[serde(rename = "Shape.Options.Tracker.Update")]
    TrackerUpdate(TrackerUpdate),
    #[serde(rename = "Shape.Options.Tracker.Remove")]
    TrackerRemove(TrackerRemove),
    #[serde(rename = "Shape.Options.Tracker.Move")]
    TrackerMove(TrackerMove),
    #[serde(rename = "Shape.Owner.Add")]
    OwnerAdd(ServerShapeOwner),
    #[serde(rename = "Shape.Owner.Update")]
    OwnerUpdate(OwnerAccessUpdate),
    #[serde(rename = "Shape.Owner.Delete")]
    OwnerDelete(OwnerRemove),
    #[serde(rename = "Shape.Owner.Default.Update")]
    DefaultAccessUpdate(DefaultAccessUpdate),
    #[serde(rename = "Client.Options.Set")]
    ClientOptionsSet(ClientOptions),
    /// Floor data; only its arrival matters to this core
    #[serde(rename = "Board.Floor.Set")]
    BoardFloorSet(serde_json::Value),
}

impl ServerMessage {
    /// Decode one frame. Failures are logged with the frame length only.
    pub fn from_json(frame: &str) -> Result<Self, MessageError> {
        serde_json::from_str(frame).map_err(|err| {
            warn!("dropping malformed frame ({} bytes): {}", frame.len(), err);
            MessageError::Decode {
                reason: err.to_string(),
            }
        })
    }

    pub fn event_name(&self) -> &'static str {
        match self {
            Self::TrackerCreate(_) => "Shape.Options.Tracker.Create",
            Self::TrackerUpdate(_) => "Shape.Options.Tracker.Update",
            Self::TrackerRemove(_) => "Shape.Options.Tracker.Remove",
            Self::TrackerMove(_) => "Shape.Options.Tracker.Move",
            Self::OwnerAdd(_) => "Shape.Owner.Add",
            Self::OwnerUpdate(_) => "Shape.Owner.Update",
            Self::OwnerDelete(_) => "Shape.Owner.Delete",
            Self::DefaultAccessUpdate(_) => "Shape.Owner.Default.Update",
            Self::ClientOptionsSet(_) => "Client.Options.Set",
            Self::BoardFloorSet(_) => "Board.Floor.Set",
        }
    }
}
