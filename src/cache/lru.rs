//! LRU Store Module
//!
//! Byte-bounded key-value store with Least Recently Used eviction.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

// == Byte Size ==
/// Values stored in an [`LruStore`] report how many bytes they occupy.
pub trait ByteSize {
    fn byte_size(&self) -> usize;
}

impl ByteSize for String {
    fn byte_size(&self) -> usize {
        self.len()
    }
}

impl ByteSize for Vec<u8> {
    fn byte_size(&self) -> usize {
        self.len()
    }
}

/// Called with the key and value of every entry removed by eviction.
pub type OnEvicted<V> = Box<dyn FnMut(&str, V) + Send>;

#[derive(Debug)]
struct Entry<V> {
    value: V,
    /// Recency stamp, also the entry's key in `LruStore::order`
    tick: u64,
}

// == LRU Store ==
/// Key-value store bounded by the total size of keys plus values.
///
/// Recency is tracked with a monotonically increasing tick per access:
/// - Lowest tick = least recently used
/// - Highest tick = most recently used
///
/// Ticks are unique, so entries that were never touched again leave in
/// insertion order.
///
/// Not synchronized; the owner serializes access.
pub struct LruStore<V> {
    /// Byte ceiling, 0 = unbounded
    max_bytes: u64,
    /// Sum of key and value sizes of live entries
    n_bytes: u64,
    entries: HashMap<String, Entry<V>>,
    /// tick -> key, ordered oldest first
    order: BTreeMap<u64, String>,
    clock: u64,
    on_evicted: Option<OnEvicted<V>>,
}

impl<V: ByteSize> LruStore<V> {
    // == Constructor ==
    /// Creates an empty store.
    ///
    /// # Arguments
    /// * `max_bytes` - Maximum bytes held, 0 for no limit
    /// * `on_evicted` - Optional callback invoked for each evicted entry
    pub fn new(max_bytes: u64, on_evicted: Option<OnEvicted<V>>) -> Self {
        Self {
            max_bytes,
            n_bytes: 0,
            entries: HashMap::new(),
            order: BTreeMap::new(),
            clock: 0,
            on_evicted,
        }
    }

    // == Get ==
    /// Looks up a key and marks it most recently used.
    pub fn get(&mut self, key: &str) -> Option<&V> {
        let tick = self.next_tick();
        let entry = self.entries.get_mut(key)?;
        if let Some(k) = self.order.remove(&entry.tick) {
            self.order.insert(tick, k);
        }
        entry.tick = tick;
        Some(&entry.value)
    }

    // == Add ==
    /// Inserts or replaces a value, then evicts until back under budget.
    ///
    /// Replacing an existing key adjusts the byte count by the size delta
    /// and marks the key most recently used.
    pub fn add(&mut self, key: String, value: V) {
        let tick = self.next_tick();
        let size = value.byte_size() as u64;

        match self.entries.get_mut(&key) {
            Some(entry) => {
                self.n_bytes = self.n_bytes + size - entry.value.byte_size() as u64;
                entry.value = value;
                if let Some(k) = self.order.remove(&entry.tick) {
                    self.order.insert(tick, k);
                }
                entry.tick = tick;
            }
            None => {
                self.n_bytes += key.len() as u64 + size;
                self.order.insert(tick, key.clone());
                self.entries.insert(key, Entry { value, tick });
            }
        }

        while self.max_bytes != 0 && self.n_bytes > self.max_bytes {
            if self.remove_oldest().is_none() {
                break;
            }
        }
    }

    // == Remove Oldest ==
    /// Evicts the least recently used entry and returns its key.
    ///
    /// Returns None if the store is empty.
    pub fn remove_oldest(&mut self) -> Option<String> {
        let (_, key) = self.order.pop_first()?;
        let entry = self.entries.remove(&key)?;
        self.n_bytes -= key.len() as u64 + entry.value.byte_size() as u64;
        if let Some(on_evicted) = self.on_evicted.as_mut() {
            on_evicted(&key, entry.value);
        }
        Some(key)
    }

    // == Oldest Key ==
    /// Returns the least recently used key without touching it.
    pub fn oldest_key(&self) -> Option<&str> {
        self.order.values().next().map(String::as_str)
    }

    // == Length ==
    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Current bytes in use.
    pub fn bytes(&self) -> u64 {
        self.n_bytes
    }

    pub fn max_bytes(&self) -> u64 {
        self.max_bytes
    }

    fn next_tick(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }
}

impl<V> fmt::Debug for LruStore<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruStore")
            .field("max_bytes", &self.max_bytes)
            .field("n_bytes", &self.n_bytes)
            .field("len", &self.entries.len())
            .finish()
    }
}
