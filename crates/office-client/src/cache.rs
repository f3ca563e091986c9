use std::collections::HashMap;
use std::hash::Hash;

/// Keys kept per cache before the least recently used idle one is dropped.
pub const DEFAULT_CAPACITY: usize = 64;

/// Proof of dispatch for one read. Completing with it applies the result
/// only if nothing dispatched later for the same key has landed first.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ticket<K> {
    key: K,
    generation: u64,
}

impl<K> Ticket<K> {
    pub fn key(&self) -> &K {
        &self.key
    }
}

struct Entry<V> {
    value: Option<V>,
    /// Generation of the value held, 0 when empty.
    applied: u64,
    /// Values dispatched at or before this generation are stale.
    stale_floor: u64,
    in_flight: u32,
    touched: u64,
}

impl<V> Entry<V> {
    fn empty() -> Self {
        Self {
            value: None,
            applied: 0,
            stale_floor: 0,
            in_flight: 0,
            touched: 0,
        }
    }
}

/// Last successful response per key, with staleness and dispatch ordering.
///
/// Holds at most `capacity` keys; past that the least recently used key
/// with no read in flight is evicted. Keys with a read in flight are kept
/// so their ordering and staleness survive until the read settles.
pub struct QueryCache<K, V> {
    entries: HashMap<K, Entry<V>>,
    dispatched: u64,
    /// Floor set by the last `invalidate_all`, shared by evicted keys too.
    invalidated_at: u64,
    capacity: usize,
    uses: u64,
}

impl<K, V> Default for QueryCache<K, V> {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

impl<K, V> QueryCache<K, V> {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            dispatched: 0,
            invalidated_at: 0,
            capacity: capacity.max(1),
            uses: 0,
        }
    }
}

impl<K: Hash + Eq + Clone, V: Clone> QueryCache<K, V> {
    pub fn new() -> Self {
        Self::default()
    }

    fn is_fresh(&self, entry: &Entry<V>) -> bool {
        entry.value.is_some()
            && entry.applied > entry.stale_floor
            && entry.applied > self.invalidated_at
    }

    fn touch(&mut self) -> u64 {
        self.uses += 1;
        self.uses
    }

    /// Cached value that has not been invalidated since it was fetched.
    pub fn fresh(&mut self, key: &K) -> Option<V> {
        let fresh = self.entries.get(key).is_some_and(|entry| self.is_fresh(entry));
        if !fresh {
            return None;
        }
        let now = self.touch();
        let entry = self.entries.get_mut(key)?;
        entry.touched = now;
        entry.value.clone()
    }

    /// Cached value regardless of staleness.
    pub fn peek(&self, key: &K) -> Option<V> {
        self.entries.get(key).and_then(|entry| entry.value.clone())
    }

    pub fn begin(&mut self, key: K) -> Ticket<K> {
        self.dispatched += 1;
        let now = self.touch();
        if !self.entries.contains_key(&key) {
            self.make_room();
        }
        let entry = self.entries.entry(key.clone()).or_insert_with(Entry::empty);
        entry.in_flight += 1;
        entry.touched = now;
        Ticket {
            key,
            generation: self.dispatched,
        }
    }

    /// Stores `value` unless a later dispatch for the key already did.
    /// A result dispatched before the latest invalidation is kept but stays
    /// stale, so the next read fetches again.
    pub fn complete(&mut self, ticket: Ticket<K>, value: V) -> bool {
        let now = self.touch();
        let entry = self.entries.entry(ticket.key).or_insert_with(Entry::empty);
        entry.in_flight = entry.in_flight.saturating_sub(1);
        if ticket.generation <= entry.applied {
            return false;
        }
        entry.applied = ticket.generation;
        entry.value = Some(value);
        entry.touched = now;
        true
    }

    /// Settles a read that produced nothing to store.
    pub fn abandon(&mut self, ticket: Ticket<K>) {
        if let Some(entry) = self.entries.get_mut(&ticket.key) {
            entry.in_flight = entry.in_flight.saturating_sub(1);
        }
    }

    pub fn invalidate(&mut self, key: &K) {
        let floor = self.dispatched;
        if let Some(entry) = self.entries.get_mut(key) {
            entry.stale_floor = floor;
        }
    }

    pub fn invalidate_all(&mut self) {
        self.invalidated_at = self.dispatched;
    }

    pub fn remove(&mut self, key: &K) {
        self.entries.remove(key);
    }

    pub fn len(&self) -> usize {
        self.entries.values().filter(|e| e.value.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn make_room(&mut self) {
        if self.entries.len() < self.capacity {
            return;
        }
        let victim = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.in_flight == 0)
            .min_by_key(|(_, entry)| entry.touched)
            .map(|(key, _)| key.clone());
        if let Some(key) = victim {
            self.entries.remove(&key);
        }
    }
}
