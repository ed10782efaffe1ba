use std::collections::HashSet;

use tabletop_shared::{DisplaySettings, LocalId};

/// Session-scoped context read by every access evaluation.
///
/// Mutated by the surrounding application through explicit setters, and by
/// `Client.Options.Set` on login.
#[derive(Clone, Debug, Default)]
pub struct Session {
    username: String,
    is_dm: bool,
    fake_player: bool,
    /// None means every owned token is active
    active_token_filter: Option<HashSet<LocalId>>,
    owned_tokens: HashSet<LocalId>,
    display: DisplaySettings,
}

impl Session {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            ..Self::default()
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn set_username(&mut self, username: impl Into<String>) {
        self.username = username.into();
    }

    pub fn is_dm(&self) -> bool {
        self.is_dm
    }

    pub fn set_dm(&mut self, is_dm: bool) {
        self.is_dm = is_dm;
    }

    pub fn fake_player(&self) -> bool {
        self.fake_player
    }

    pub fn set_fake_player(&mut self, fake_player: bool) {
        self.fake_player = fake_player;
    }

    pub fn display(&self) -> &DisplaySettings {
        &self.display
    }

    pub fn set_display(&mut self, display: DisplaySettings) {
        self.display = display;
    }

    // Active tokens

    /// Restrict the active set to `tokens`. An empty list leaves no token active.
    pub fn set_active_tokens(&mut self, tokens: impl IntoIterator<Item = LocalId>) {
        self.active_token_filter = Some(tokens.into_iter().collect());
    }

    /// Go back to treating every owned token as active
    pub fn clear_active_token_filter(&mut self) {
        self.active_token_filter = None;
    }

    pub fn is_active_token(&self, local: &LocalId) -> bool {
        match &self.active_token_filter {
            Some(filter) => filter.contains(local),
            None => self.owned_tokens.contains(local),
        }
    }

    pub fn active_tokens(&self) -> Vec<LocalId> {
        let mut tokens: Vec<LocalId> = match &self.active_token_filter {
            Some(filter) => filter.iter().copied().collect(),
            None => self.owned_tokens.iter().copied().collect(),
        };
        tokens.sort();
        tokens
    }

    // Owned tokens

    pub fn owned_tokens(&self) -> &HashSet<LocalId> {
        &self.owned_tokens
    }

    pub fn owns_token(&self, local: &LocalId) -> bool {
        self.owned_tokens.contains(local)
    }

    /// Returns true if the token was not owned before
    pub(crate) fn add_owned_token(&mut self, local: LocalId) -> bool {
        self.owned_tokens.insert(local)
    }

    /// Returns true if the token was owned before
    pub(crate) fn remove_owned_token(&mut self, local: &LocalId) -> bool {
        self.owned_tokens.remove(local)
    }

    /// Remove every trace of a despawned shape
    pub(crate) fn forget_shape(&mut self, local: &LocalId) {
        self.owned_tokens.remove(local);
        if let Some(filter) = &mut self.active_token_filter {
            filter.remove(local);
        }
    }
}
