use std::collections::HashMap;

use log::warn;

use tabletop_shared::{EntityError, GlobalId, KeyGenerator, LocalId};

// IdSlot
#[derive(Clone, Debug, PartialEq, Eq)]
enum IdSlot {
    /// Handed out ahead of the shape's construction
    Reserved(GlobalId),
    /// Backed by a constructed shape
    Claimed(GlobalId),
}

impl IdSlot {
    fn global_id(&self) -> &GlobalId {
        match self {
            IdSlot::Reserved(global_id) | IdSlot::Claimed(global_id) => global_id,
        }
    }
}

/// One row of [`IdRegistry::debug_entries`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IdEntry {
    pub local_id: LocalId,
    pub global_id: GlobalId,
    pub reserved: bool,
}

/// Bidirectional mapping between session-local handles and durable ids.
///
/// The forward table is indexed by `LocalId`, so `LocalId -> GlobalId` is a
/// plain vector lookup. The reverse direction scans the table, which is fine
/// at the scale of a single tabletop session.
pub struct IdRegistry {
    generator: KeyGenerator<LocalId>,
    slots: Vec<Option<IdSlot>>,
    reserved_ids: HashMap<GlobalId, LocalId>,
}

impl Default for IdRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl IdRegistry {
    pub fn new() -> Self {
        Self {
            generator: KeyGenerator::new(),
            slots: Vec::new(),
            reserved_ids: HashMap::new(),
        }
    }

    // Allocation

    /// Prepare a LocalId for a shape that is not fully constructed yet, so
    /// other systems can already refer to it.
    ///
    /// Reserving an id that is already reserved or claimed logs a warning and
    /// returns the existing handle.
    /// Consider using `try_reserve` to handle that case explicitly.
    pub fn reserve(&mut self, global_id: GlobalId) -> LocalId {
        match self.try_reserve(global_id) {
            Ok(local_id) => local_id,
            Err(EntityError::AlreadyReserved { local_id, global_id })
            | Err(EntityError::AlreadyClaimed { local_id, global_id }) => {
                warn!("IdRegistry: {} already mapped to {}, reusing it", global_id, local_id);
                local_id
            }
            Err(err) => unreachable!("try_reserve does not return {:?}", err),
        }
    }

    /// Prepare a LocalId for a shape that is not fully constructed yet.
    ///
    /// Returns an error if the GlobalId is already reserved or claimed.
    pub fn try_reserve(&mut self, global_id: GlobalId) -> Result<LocalId, EntityError> {
        if let Some(local_id) = self.reserved_ids.get(&global_id) {
            return Err(EntityError::AlreadyReserved {
                global_id,
                local_id: *local_id,
            });
        }
        if let Some(local_id) = self.local_id(&global_id) {
            return Err(EntityError::AlreadyClaimed {
                global_id,
                local_id,
            });
        }

        let local_id = self.generate();
        self.reserved_ids.insert(global_id.clone(), local_id);
        self.set_slot(local_id, IdSlot::Reserved(global_id));
        Ok(local_id)
    }

    /// Register a constructed shape.
    ///
    /// Adopts the handle reserved for `global_id` if there is one. Otherwise a
    /// fresh handle is allocated, and a missing `global_id` is replaced by a
    /// newly generated one (locally created, not yet acknowledged by the
    /// server). Claiming a GlobalId that is already claimed logs a warning and
    /// returns the existing handle.
    pub fn claim(&mut self, global_id: Option<GlobalId>) -> LocalId {
        match self.try_claim(global_id) {
            Ok(local_id) => local_id,
            Err(EntityError::AlreadyClaimed { local_id, global_id }) => {
                warn!("IdRegistry: {} is already claimed by {}", global_id, local_id);
                local_id
            }
            Err(err) => unreachable!("try_claim does not return {:?}", err),
        }
    }

    /// Register a constructed shape.
    ///
    /// Returns an error if the GlobalId is already claimed by a live shape.
    pub fn try_claim(&mut self, global_id: Option<GlobalId>) -> Result<LocalId, EntityError> {
        let global_id = match global_id {
            Some(global_id) => global_id,
            None => {
                let local_id = self.generate();
                self.set_slot(local_id, IdSlot::Claimed(GlobalId::generate()));
                return Ok(local_id);
            }
        };

        if let Some(local_id) = self.reserved_ids.remove(&global_id) {
            self.set_slot(local_id, IdSlot::Claimed(global_id));
            return Ok(local_id);
        }
        if let Some(local_id) = self.local_id(&global_id) {
            return Err(EntityError::AlreadyClaimed {
                global_id,
                local_id,
            });
        }

        let local_id = self.generate();
        self.set_slot(local_id, IdSlot::Claimed(global_id));
        Ok(local_id)
    }

    /// Forget a shape: both directions of the mapping and any reservation
    /// keyed by its GlobalId go away, and the handle is recycled.
    ///
    /// Returns the GlobalId that was mapped, or None (with a warning) when
    /// the handle was not live. The handle is never recycled twice.
    pub fn drop(&mut self, local_id: &LocalId) -> Option<GlobalId> {
        let slot = self
            .slots
            .get_mut(local_id.value() as usize)
            .and_then(|slot| slot.take());
        let Some(slot) = slot else {
            warn!("IdRegistry: attempted to drop {} which is not live", local_id);
            return None;
        };

        let global_id = match slot {
            IdSlot::Reserved(global_id) | IdSlot::Claimed(global_id) => global_id,
        };
        if self.reserved_ids.get(&global_id) == Some(local_id) {
            self.reserved_ids.remove(&global_id);
        }
        self.generator.recycle_key(local_id);
        Some(global_id)
    }

    // Resolution

    pub fn global_id(&self, local_id: &LocalId) -> Option<&GlobalId> {
        self.slots
            .get(local_id.value() as usize)
            .and_then(|slot| slot.as_ref())
            .map(IdSlot::global_id)
    }

    pub fn local_id(&self, global_id: &GlobalId) -> Option<LocalId> {
        self.slots.iter().enumerate().find_map(|(index, slot)| match slot {
            Some(slot) if slot.global_id() == global_id => Some(LocalId::new(index as u32)),
            _ => None,
        })
    }

    pub fn try_global_id(&self, local_id: &LocalId) -> Result<&GlobalId, EntityError> {
        self.global_id(local_id)
            .ok_or(EntityError::UnknownLocalId {
                local_id: *local_id,
            })
    }

    pub fn try_local_id(&self, global_id: &GlobalId) -> Result<LocalId, EntityError> {
        self.local_id(global_id)
            .ok_or_else(|| EntityError::UnknownGlobalId {
                global_id: global_id.clone(),
            })
    }

    pub fn is_reserved(&self, local_id: &LocalId) -> bool {
        matches!(
            self.slots.get(local_id.value() as usize),
            Some(Some(IdSlot::Reserved(_)))
        )
    }

    pub fn contains(&self, local_id: &LocalId) -> bool {
        self.global_id(local_id).is_some()
    }

    /// Shapes that have been claimed, in handle order
    pub fn entities(&self) -> impl Iterator<Item = LocalId> + '_ {
        self.slots.iter().enumerate().filter_map(|(index, slot)| match slot {
            Some(IdSlot::Claimed(_)) => Some(LocalId::new(index as u32)),
            _ => None,
        })
    }

    /// Number of live handles, reserved ones included
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Introspection of the whole id table, for debugging tools
    pub fn debug_entries(&self) -> Vec<IdEntry> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| {
                slot.as_ref().map(|slot| IdEntry {
                    local_id: LocalId::new(index as u32),
                    global_id: slot.global_id().clone(),
                    reserved: matches!(slot, IdSlot::Reserved(_)),
                })
            })
            .collect()
    }

    // Private

    fn generate(&mut self) -> LocalId {
        self.generator.generate()
    }

    fn set_slot(&mut self, local_id: LocalId, slot: IdSlot) {
        let index = local_id.value() as usize;
        if self.slots.len() <= index {
            self.slots.resize(index + 1, None);
        }
        self.slots[index] = Some(slot);
    }
}
