use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;

/// Binary min-heap addressable by key.
///
/// `positions` mirrors where each key currently sits in `entries` and is
/// updated on every swap, so removal by key is O(log n).
#[derive(Debug, Clone)]
pub struct IndexedHeap<K, P> {
    entries: Vec<(K, P)>,
    positions: HashMap<K, usize>,
}

impl<K, P> Default for IndexedHeap<K, P> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            positions: HashMap::new(),
        }
    }
}

impl<K, P> IndexedHeap<K, P>
where
    K: Eq + Hash + Clone,
    P: Ord,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.positions.contains_key(key)
    }

    /// Entry with the smallest priority.
    pub fn peek(&self) -> Option<(&K, &P)> {
        self.entries.first().map(|(k, p)| (k, p))
    }

    /// Inserts `key`. Returns false, leaving the heap untouched, when the key
    /// is already present.
    pub fn insert(&mut self, key: K, priority: P) -> bool {
        if self.positions.contains_key(&key) {
            return false;
        }
        let index = self.entries.len();
        self.positions.insert(key.clone(), index);
        self.entries.push((key, priority));
        self.sift_up(index);
        true
    }

    pub fn remove<Q>(&mut self, key: &Q) -> Option<P>
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        let index = self.positions.remove(key)?;
        let (_, priority) = self.entries.swap_remove(index);

        if index < self.entries.len() {
            self.reposition(index);
            let index = self.sift_up(index);
            self.sift_down(index);
        }
        Some(priority)
    }

    fn sift_up(&mut self, mut index: usize) -> usize {
        while index > 0 {
            let parent = (index - 1) / 2;
            if self.entries[index].1 >= self.entries[parent].1 {
                break;
            }
            self.swap(index, parent);
            index = parent;
        }
        index
    }

    fn sift_down(&mut self, mut index: usize) {
        let len = self.entries.len();
        loop {
            let left = 2 * index + 1;
            let right = left + 1;
            let mut smallest = index;

            if left < len && self.entries[left].1 < self.entries[smallest].1 {
                smallest = left;
            }
            if right < len && self.entries[right].1 < self.entries[smallest].1 {
                smallest = right;
            }
            if smallest == index {
                return;
            }
            self.swap(index, smallest);
            index = smallest;
        }
    }

    fn swap(&mut self, a: usize, b: usize) {
        self.entries.swap(a, b);
        self.reposition(a);
        self.reposition(b);
    }

    /// Points the map at where the entry at `index` now sits.
    fn reposition(&mut self, index: usize) {
        if let Some(slot) = self.positions.get_mut::<K>(&self.entries[index].0) {
            *slot = index;
        }
    }

    #[cfg(test)]
    pub(crate) fn check_invariants(&self) {
        for (i, (key, priority)) in self.entries.iter().enumerate() {
            assert_eq!(self.positions.get(key), Some(&i), "stale position");
            if i > 0 {
                assert!(self.entries[(i - 1) / 2].1 <= *priority, "heap order");
            }
        }
        assert_eq!(self.positions.len(), self.entries.len());
    }
}
