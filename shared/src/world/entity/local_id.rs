use std::fmt;

// LocalId
/// Process-local handle of a shape, valid only for the current session.
///
/// Never put a LocalId on the wire: peers only understand [`GlobalId`](crate::GlobalId).
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug, PartialOrd, Ord)]
pub struct LocalId(u32);

impl LocalId {
    pub fn new(value: u32) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u32 {
        self.0
    }
}

impl From<u32> for LocalId {
    fn from(value: u32) -> Self {
        LocalId(value)
    }
}

impl From<LocalId> for u32 {
    fn from(value: LocalId) -> Self {
        value.0
    }
}

impl fmt::Display for LocalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
