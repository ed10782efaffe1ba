use std::marker::PhantomData;

/// Generates dense, reusable keys.
///
/// Recycled keys are handed out again (most recently recycled first) before
/// the counter advances, so the key space stays bounded by the high-water
/// mark of keys that are live at the same time.
pub struct KeyGenerator<K: From<u32> + Into<u32> + Copy> {
    next_key: u32,
    recycled_keys: Vec<u32>,
    phantom_k: PhantomData<K>,
}

impl<K: From<u32> + Into<u32> + Copy> Default for KeyGenerator<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: From<u32> + Into<u32> + Copy> KeyGenerator<K> {
    pub fn new() -> Self {
        Self {
            next_key: 0,
            recycled_keys: Vec::new(),
            phantom_k: PhantomData,
        }
    }

    /// Get a new, unused key
    pub fn generate(&mut self) -> K {
        if let Some(key) = self.recycled_keys.pop() {
            return K::from(key);
        }

        let output = self.next_key;
        self.next_key = self.next_key.wrapping_add(1);
        K::from(output)
    }

    /// Return a key to the pool so it can be handed out again
    pub fn recycle_key(&mut self, key: &K) {
        let value: u32 = (*key).into();
        self.recycled_keys.push(value);
    }

    /// Number of keys ever handed out by the counter
    pub fn high_water_mark(&self) -> u32 {
        self.next_key
    }

    pub fn recycled_count(&self) -> usize {
        self.recycled_keys.len()
    }
}
