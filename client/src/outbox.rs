use std::slice::Iter;

use tabletop_shared::ClientMessage;

/// Messages queued for the server, in emission order
#[derive(Default)]
pub struct Outbox {
    messages: Vec<ClientMessage>,
}

impl Outbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, message: ClientMessage) {
        self.messages.push(message);
    }

    /// Drain every queued message
    pub fn take(&mut self) -> Vec<ClientMessage> {
        std::mem::take(&mut self.messages)
    }

    pub fn iter(&self) -> Iter<'_, ClientMessage> {
        self.messages.iter()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
