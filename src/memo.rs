//! Bounded memo table.
//!
//! A least-recently-used map owned by a single resolver. Each access stamps
//! the entry with a fresh tick; when the table is full the entry with the
//! oldest tick is evicted.

use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;

/// Least-recently-used cache with a fixed capacity.
///
/// # Examples
///
/// ```rust
/// use mathhammer::memo::Memo;
///
/// let mut memo = Memo::new(2);
/// memo.insert("a", 1);
/// memo.insert("b", 2);
/// assert_eq!(memo.get(&"a"), Some(&1)); // "a" is now the most recent
///
/// memo.insert("c", 3); // evicts "b"
/// assert_eq!(memo.get(&"b"), None);
/// assert_eq!(memo.len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct Memo<K, V> {
    capacity: usize,
    tick: u64,
    entries: HashMap<K, (V, u64)>,
    recency: BTreeMap<u64, K>,
}

impl<K: Clone + Hash + Eq, V> Memo<K, V> {
    /// An empty table holding at most `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            tick: 0,
            entries: HashMap::new(),
            recency: BTreeMap::new(),
        }
    }

    /// Look up `key`, marking it as most recently used.
    pub fn get(&mut self, key: &K) -> Option<&V> {
        let tick = self.next_tick();
        let (_, stamp) = self.entries.get_mut(key)?;
        let previous = std::mem::replace(stamp, tick);
        if let Some(k) = self.recency.remove(&previous) {
            self.recency.insert(tick, k);
        }
        self.entries.get(key).map(|(value, _)| value)
    }

    /// Insert or replace `key`, evicting the least recently used entry when
    /// the table is full.
    pub fn insert(&mut self, key: K, value: V) {
        if self.capacity == 0 {
            return;
        }
        let tick = self.next_tick();
        if let Some((_, previous)) = self.entries.insert(key.clone(), (value, tick)) {
            self.recency.remove(&previous);
        } else if self.entries.len() > self.capacity {
            self.evict_oldest();
        }
        self.recency.insert(tick, key);
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.recency.clear();
    }

    fn next_tick(&mut self) -> u64 {
        self.tick += 1;
        self.tick
    }

    fn evict_oldest(&mut self) {
        if let Some((_, oldest)) = self.recency.pop_first() {
            self.entries.remove(&oldest);
        }
    }
}
