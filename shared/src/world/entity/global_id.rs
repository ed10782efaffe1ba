use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// GlobalId
/// Durable, network-shared identifier of a shape.
///
/// Assigned by the server, or generated locally (v4 uuid) for shapes that the
/// server has not acknowledged yet. Serialized verbatim as a string.
#[derive(PartialEq, Eq, Hash, Clone, Debug, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GlobalId(String);

impl GlobalId {
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

impl From<&str> for GlobalId {
    fn from(value: &str) -> Self {
        GlobalId(value.to_string())
    }
}

impl From<String> for GlobalId {
    fn from(value: String) -> Self {
        GlobalId(value)
    }
}

impl fmt::Display for GlobalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
