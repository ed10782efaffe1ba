use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// TrackerId
#[derive(PartialEq, Eq, Hash, Clone, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackerId(String);

impl TrackerId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TrackerId {
    fn from(value: &str) -> Self {
        TrackerId(value.to_string())
    }
}

impl fmt::Display for TrackerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub const DEFAULT_PRIMARY_COLOR: &str = "#00FF00";
pub const DEFAULT_SECONDARY_COLOR: &str = "#888888";

/// A named, mutable value attached to a shape (hit points, spell slots, ...).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tracker {
    pub uuid: TrackerId,
    pub visible: bool,
    pub name: String,
    pub value: i32,
    pub maxvalue: i32,
    /// Whether the tracker renders an on-canvas indicator
    pub draw: bool,
    #[serde(rename = "primaryColor")]
    pub primary_color: String,
    #[serde(rename = "secondaryColor")]
    pub secondary_color: String,
}

impl Tracker {
    /// Blank tracker, used as the creation template in the projection
    pub fn empty(uuid: TrackerId) -> Self {
        Self {
            uuid,
            visible: false,
            name: String::new(),
            value: 0,
            maxvalue: 0,
            draw: false,
            primary_color: DEFAULT_PRIMARY_COLOR.to_string(),
            secondary_color: DEFAULT_SECONDARY_COLOR.to_string(),
        }
    }

    pub fn named(name: impl Into<String>, value: i32, maxvalue: i32) -> Self {
        Self {
            name: name.into(),
            value,
            maxvalue,
            ..Self::empty(TrackerId::generate())
        }
    }

    pub fn apply(&mut self, delta: &TrackerDelta) {
        if let Some(visible) = delta.visible {
            self.visible = visible;
        }
        if let Some(name) = &delta.name {
            self.name = name.clone();
        }
        if let Some(value) = delta.value {
            self.value = value;
        }
        if let Some(maxvalue) = delta.maxvalue {
            self.maxvalue = maxvalue;
        }
        if let Some(draw) = delta.draw {
            self.draw = draw;
        }
        if let Some(primary_color) = &delta.primary_color {
            self.primary_color = primary_color.clone();
        }
        if let Some(secondary_color) = &delta.secondary_color {
            self.secondary_color = secondary_color.clone();
        }
    }
}

/// Partial tracker, as carried by `Shape.Options.Tracker.Update`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackerDelta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maxvalue: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub draw: Option<bool>,
    #[serde(default, rename = "primaryColor", skip_serializing_if = "Option::is_none")]
    pub primary_color: Option<String>,
    #[serde(default, rename = "secondaryColor", skip_serializing_if = "Option::is_none")]
    pub secondary_color: Option<String>,
}

impl TrackerDelta {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(mut self, value: i32) -> Self {
        self.value = Some(value);
        self
    }

    pub fn with_maxvalue(mut self, maxvalue: i32) -> Self {
        self.maxvalue = Some(maxvalue);
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = Some(visible);
        self
    }

    pub fn with_draw(mut self, draw: bool) -> Self {
        self.draw = Some(draw);
        self
    }
}
