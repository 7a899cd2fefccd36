//! A bounded least-recently-used cache without hashing.
//!
//! Entries live in an arena of slots. Slot `0` is a sentinel that anchors a
//! doubly linked recency list (most recently used at the head); the other
//! slots hold entries. A separate array of slot indices is kept sorted by
//! key so that membership and lookup are binary searches.

use std::cmp::Ordering;
use std::{fmt, iter, mem};

use thiserror::Error;

const SENTINEL: usize = 0;
const INITIAL_CAPACITY: usize = 16;

/// Errors raised by [`BoundedLruCache`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CacheError {
    /// The requested capacity cannot hold a current and a previous entry.
    #[error("cache capacity must be at least 2, got {max_size}")]
    CapacityTooSmall { max_size: usize },

    /// The cache was structurally modified after a cursor was created.
    #[error("cache was modified during iteration")]
    ConcurrentModification,
}

struct Slot<K, V> {
    entry: Option<(K, V)>,
    prev: usize,
    next: usize,
}

/// A fixed-capacity map with least-recently-used eviction.
///
/// Lookups binary-search a key-sorted index, so keys only need an ordering
/// (natural, or supplied with [`BoundedLruCache::with_comparator`]). When the
/// cache is full, `put` of a new key recycles the slot of the least recently
/// used entry instead of allocating.
///
/// # Example
///
/// ```
/// use msgfmt::cache::BoundedLruCache;
///
/// let mut cache = BoundedLruCache::new(2).unwrap();
/// cache.put("a", 1);
/// cache.put("b", 2);
/// cache.get(&"a");
/// cache.put("c", 3);
///
/// assert!(cache.contains_key(&"a"));
/// assert!(!cache.contains_key(&"b"));
/// ```
pub struct BoundedLruCache<K, V> {
    max_size: usize,
    slots: Vec<Slot<K, V>>,
    /// Slot indices sorted by key.
    sorted: Vec<usize>,
    /// Slots released by `remove`, reused before growing the arena.
    free: Vec<usize>,
    compare: fn(&K, &K) -> Ordering,
    mod_count: u64,
}

impl<K: Ord, V> BoundedLruCache<K, V> {
    /// Create a cache ordered by the keys' natural ordering.
    pub fn new(max_size: usize) -> Result<Self, CacheError> {
        Self::with_comparator(max_size, K::cmp)
    }

    /// Create a cache, raising `max_size` to the minimum of 2.
    pub(crate) fn clamped(max_size: usize) -> Self {
        Self::create(max_size.max(2), K::cmp)
    }
}

impl<K, V> BoundedLruCache<K, V> {
    /// Create a cache ordered by `compare`.
    pub fn with_comparator(
        max_size: usize,
        compare: fn(&K, &K) -> Ordering,
    ) -> Result<Self, CacheError> {
        if max_size < 2 {
            return Err(CacheError::CapacityTooSmall { max_size });
        }
        Ok(Self::create(max_size, compare))
    }

    fn create(max_size: usize, compare: fn(&K, &K) -> Ordering) -> Self {
        let initial = INITIAL_CAPACITY.min(max_size);
        let mut slots = Vec::with_capacity(initial + 1);
        slots.push(Slot {
            entry: None,
            prev: SENTINEL,
            next: SENTINEL,
        });

        BoundedLruCache {
            max_size,
            slots,
            sorted: Vec::with_capacity(initial),
            free: Vec::new(),
            compare,
            mod_count: 0,
        }
    }

    /// Maximum number of entries.
    pub fn max_size(&self) -> usize {
        self.max_size
    }

    /// Number of resident entries.
    pub fn len(&self) -> usize {
        self.sorted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sorted.is_empty()
    }

    /// Count of structural modifications so far.
    pub fn mod_count(&self) -> u64 {
        self.mod_count
    }

    /// Whether `key` is resident. Does not touch recency.
    pub fn contains_key(&self, key: &K) -> bool {
        self.search(key).is_ok()
    }

    /// Look up `key` without marking it as recently used.
    pub fn peek(&self, key: &K) -> Option<&V> {
        let pos = self.search(key).ok()?;
        self.value_at(self.sorted[pos])
    }

    /// Look up `key` and mark it as the most recently used entry.
    pub fn get(&mut self, key: &K) -> Option<&V> {
        let pos = self.search(key).ok()?;
        let slot = self.sorted[pos];
        self.move_to_front(slot);
        self.value_at(slot)
    }

    /// Insert or replace the value for `key`, marking it most recently used.
    ///
    /// Returns the previous value when the key was already resident. When
    /// the cache is full, the least recently used entry is evicted.
    pub fn put(&mut self, key: K, value: V) -> Option<V> {
        match self.search(&key) {
            Ok(pos) => {
                let slot = self.sorted[pos];
                self.move_to_front(slot);
                self.slots[slot]
                    .entry
                    .as_mut()
                    .map(|entry| mem::replace(&mut entry.1, value))
            }
            Err(pos) if self.len() < self.max_size => {
                self.grow_if_full();
                let slot = self.allocate_slot((key, value));
                self.sorted.insert(pos, slot);
                self.link_front(slot);
                self.mod_count += 1;
                None
            }
            Err(_) => {
                self.recycle_tail((key, value));
                None
            }
        }
    }

    /// Remove `key`, returning its value if it was resident.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        let pos = self.search(key).ok()?;
        let slot = self.sorted.remove(pos);
        self.unlink(slot);
        self.free.push(slot);
        self.mod_count += 1;
        self.slots[slot].entry.take().map(|(_, value)| value)
    }

    /// Remove every entry.
    pub fn clear(&mut self) {
        self.slots.truncate(1);
        self.slots[SENTINEL].prev = SENTINEL;
        self.slots[SENTINEL].next = SENTINEL;
        self.sorted.clear();
        self.free.clear();
        self.mod_count += 1;
    }

    /// Keys in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.entries().map(|(key, _)| key)
    }

    /// Entries in key order.
    pub fn entries(&self) -> impl Iterator<Item = (&K, &V)> {
        self.sorted.iter().filter_map(|&slot| self.entry_at(slot))
    }

    /// Keys from most to least recently used.
    pub fn keys_by_recency(&self) -> impl Iterator<Item = &K> {
        let mut slot = self.slots[SENTINEL].next;
        iter::from_fn(move || {
            if slot == SENTINEL {
                return None;
            }
            let current = slot;
            slot = self.slots[current].next;
            self.entry_at(current).map(|(key, _)| key)
        })
    }

    /// Create a detached cursor over the entries in key order.
    ///
    /// Unlike [`entries`](Self::entries), a cursor does not borrow the
    /// cache. Advancing it after a structural modification (an insertion,
    /// eviction, removal or clear) fails with
    /// [`CacheError::ConcurrentModification`].
    pub fn cursor(&self) -> CacheCursor {
        CacheCursor {
            position: 0,
            expected_mod_count: self.mod_count,
        }
    }

    /// Advance `cursor`, returning the next entry in key order.
    pub fn advance(&self, cursor: &mut CacheCursor) -> Result<Option<(&K, &V)>, CacheError> {
        if cursor.expected_mod_count != self.mod_count {
            return Err(CacheError::ConcurrentModification);
        }
        let Some(&slot) = self.sorted.get(cursor.position) else {
            return Ok(None);
        };
        cursor.position += 1;
        Ok(self.entry_at(slot))
    }

    // =========================================================================
    // Sorted index
    // =========================================================================

    fn search(&self, key: &K) -> Result<usize, usize> {
        let compare = self.compare;
        self.sorted.binary_search_by(|&slot| match &self.slots[slot].entry {
            Some((resident, _)) => compare(resident, key),
            None => Ordering::Less,
        })
    }

    /// Grow the index geometrically, never beyond `max_size`.
    fn grow_if_full(&mut self) {
        let capacity = self.sorted.capacity();
        if self.sorted.len() < capacity {
            return;
        }
        let target = (capacity + (capacity >> 1)).clamp(capacity + 1, self.max_size);
        self.sorted.reserve_exact(target - self.sorted.len());
        self.slots.reserve_exact((target + 1).saturating_sub(self.slots.len()));
    }

    fn allocate_slot(&mut self, entry: (K, V)) -> usize {
        if let Some(slot) = self.free.pop() {
            self.slots[slot].entry = Some(entry);
            return slot;
        }
        self.slots.push(Slot {
            entry: Some(entry),
            prev: SENTINEL,
            next: SENTINEL,
        });
        self.slots.len() - 1
    }

    /// Evict the least recently used entry and reuse its slot for `entry`.
    fn recycle_tail(&mut self, entry: (K, V)) {
        let tail = self.slots[SENTINEL].prev;
        if tail == SENTINEL {
            return;
        }
        self.unlink(tail);

        // The tail entry is resident, so its key is found.
        let old_pos = match &self.slots[tail].entry {
            Some((old_key, _)) => self.search(old_key).ok(),
            None => None,
        };
        if let Some(old_pos) = old_pos {
            self.sorted.remove(old_pos);
        }

        let new_pos = self.search(&entry.0).unwrap_or_else(|pos| pos);
        self.slots[tail].entry = Some(entry);
        self.sorted.insert(new_pos, tail);
        self.link_front(tail);
        self.mod_count += 1;
    }

    // =========================================================================
    // Recency list
    // =========================================================================

    fn link_front(&mut self, slot: usize) {
        let head = self.slots[SENTINEL].next;
        self.slots[slot].prev = SENTINEL;
        self.slots[slot].next = head;
        self.slots[head].prev = slot;
        self.slots[SENTINEL].next = slot;
    }

    fn unlink(&mut self, slot: usize) {
        let prev = self.slots[slot].prev;
        let next = self.slots[slot].next;
        self.slots[prev].next = next;
        self.slots[next].prev = prev;
        self.slots[slot].prev = SENTINEL;
        self.slots[slot].next = SENTINEL;
    }

    fn move_to_front(&mut self, slot: usize) {
        if self.slots[SENTINEL].next != slot {
            self.unlink(slot);
            self.link_front(slot);
        }
    }

    fn entry_at(&self, slot: usize) -> Option<(&K, &V)> {
        self.slots[slot]
            .entry
            .as_ref()
            .map(|(key, value)| (key, value))
    }

    fn value_at(&self, slot: usize) -> Option<&V> {
        self.entry_at(slot).map(|(_, value)| value)
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for BoundedLruCache<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.entries()).finish()
    }
}

/// A position in a [`BoundedLruCache`] that does not borrow the cache.
#[derive(Debug, Clone)]
pub struct CacheCursor {
    position: usize,
    expected_mod_count: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_links_consistent<K, V>(cache: &BoundedLruCache<K, V>) {
        let mut seen = 0;
        let mut slot = cache.slots[SENTINEL].next;
        let mut prev = SENTINEL;
        while slot != SENTINEL {
            assert_eq!(cache.slots[slot].prev, prev);
            assert!(cache.slots[slot].entry.is_some());
            prev = slot;
            slot = cache.slots[slot].next;
            seen += 1;
        }
        assert_eq!(cache.slots[SENTINEL].prev, prev);
        assert_eq!(seen, cache.len());
    }

    fn assert_sorted<K: Ord + Clone, V>(cache: &BoundedLruCache<K, V>) {
        let keys: Vec<K> = cache.keys().cloned().collect();
        let mut expected = keys.clone();
        expected.sort();
        assert_eq!(keys.len(), cache.sorted.len());
        assert!(keys == expected);
    }

    #[test]
    fn index_stays_sorted_through_eviction() {
        let mut cache = BoundedLruCache::new(4).unwrap();
        for key in [50, 10, 40, 20, 30, 5, 45, 15] {
            cache.put(key, key * 2);
            assert_sorted(&cache);
            assert_links_consistent(&cache);
        }
        assert_eq!(cache.len(), 4);
    }

    #[test]
    fn eviction_recycles_tail_slot() {
        let mut cache = BoundedLruCache::new(2).unwrap();
        cache.put("a", 1);
        cache.put("b", 2);
        let slots_before = cache.slots.len();
        cache.put("c", 3);
        assert_eq!(cache.slots.len(), slots_before);
        assert_links_consistent(&cache);
    }

    #[test]
    fn removed_slots_are_reused() {
        let mut cache = BoundedLruCache::new(3).unwrap();
        cache.put(1, ());
        cache.put(2, ());
        cache.remove(&1);
        cache.put(3, ());
        assert_eq!(cache.slots.len(), 3);
        assert_links_consistent(&cache);
        assert_sorted(&cache);
    }

    #[test]
    fn growth_never_exceeds_max_size() {
        let mut cache = BoundedLruCache::new(20).unwrap();
        for key in 0..40 {
            cache.put(key, ());
        }
        assert_eq!(cache.len(), 20);
        assert!(cache.sorted.capacity() >= 20);
        assert!(cache.sorted.capacity() <= cache.max_size());
        assert!(cache.slots.capacity() <= cache.max_size() + 1);
    }
}
