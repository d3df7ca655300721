use crate::Snapshot;

/// Occupancy of a memory window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoryState {
    Empty,
    /// Below capacity, or unbounded.
    Filling,
    /// At capacity. Every further push evicts the oldest item.
    Full,
}

/// Time-ordered ring buffer with FIFO eviction.
///
/// A capacity of 0 means unbounded. Logical index 0 is always the oldest retained item; an
/// evicted slot is overwritten in place, so nothing can read it afterwards.
#[derive(Debug, Clone)]
pub struct Memory<T> {
    slots: Vec<T>,
    /// Physical index of the oldest item once the buffer has wrapped.
    head: usize,
    capacity: usize,
}

pub type SnapshotMemory<const I: usize, const O: usize> = Memory<Snapshot<I, O>>;

/// Upper bound on the slots reserved up front. Larger windows grow as they fill.
const MAX_PREALLOCATED_SLOTS: usize = 64;

impl<T> Memory<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity.min(MAX_PREALLOCATED_SLOTS)),
            head: 0,
            capacity,
        }
    }

    /// 0 means unbounded.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_bounded(&self) -> bool {
        self.capacity != 0
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.is_bounded() && self.len() == self.capacity
    }

    pub fn state(&self) -> MemoryState {
        if self.is_empty() {
            MemoryState::Empty
        } else if self.is_full() {
            MemoryState::Full
        } else {
            MemoryState::Filling
        }
    }

    /// Appends `item` as the newest entry, returning the evicted oldest entry if the window was
    /// full.
    pub fn push(&mut self, item: T) -> Option<T> {
        self.push_and_get(item).1
    }

    /// Like `push`, also returning the item now stored as the newest entry.
    pub fn push_and_get(&mut self, item: T) -> (&T, Option<T>) {
        if !self.is_full() {
            self.slots.push(item);
            let slot = self.slots.len() - 1;
            return (&self.slots[slot], None);
        }
        let slot = self.head;
        let evicted = std::mem::replace(&mut self.slots[slot], item);
        self.head = (self.head + 1) % self.capacity;
        (&self.slots[slot], Some(evicted))
    }

    /// Logical index to physical slot. `i` must be below `len`.
    fn physical(&self, i: usize) -> usize {
        (self.head + i) % self.slots.len()
    }

    /// `i = 0` is the oldest retained item.
    pub fn get(&self, i: usize) -> Option<&T> {
        if i < self.len() {
            Some(&self.slots[self.physical(i)])
        } else {
            None
        }
    }

    pub fn oldest(&self) -> Option<&T> {
        self.get(0)
    }

    pub fn latest(&self) -> Option<&T> {
        self.len().checked_sub(1).and_then(|i| self.get(i))
    }

    /// Oldest to newest.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &T> + ExactSizeIterator {
        (0..self.len()).map(|i| &self.slots[self.physical(i)])
    }

    pub fn clear(&mut self) {
        self.slots.clear();
        self.head = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contents(memory: &Memory<u32>) -> Vec<u32> {
        memory.iter().copied().collect()
    }

    #[test]
    fn unbounded_never_evicts() {
        let mut memory = Memory::new(0);
        assert_eq!(memory.state(), MemoryState::Empty);
        for i in 0..100 {
            assert_eq!(memory.push(i), None);
        }
        assert_eq!(memory.len(), 100);
        assert_eq!(memory.state(), MemoryState::Filling);
        assert_eq!(memory.oldest(), Some(&0));
        assert_eq!(memory.latest(), Some(&99));
    }

    #[test]
    fn bounded_slides() {
        let mut memory = Memory::new(3);
        assert_eq!(memory.push(1), None);
        assert_eq!(memory.push(2), None);
        assert_eq!(memory.state(), MemoryState::Filling);
        assert_eq!(memory.push(3), None);
        assert_eq!(memory.state(), MemoryState::Full);
        assert_eq!(memory.push(4), Some(1));
        assert_eq!(memory.push(5), Some(2));
        assert_eq!(contents(&memory), [3, 4, 5]);
        assert_eq!(memory.push(6), Some(3));
        assert_eq!(memory.push(7), Some(4));
        assert_eq!(contents(&memory), [5, 6, 7]);
        assert_eq!(memory.len(), 3);
        assert_eq!(memory.get(0), Some(&5));
        assert_eq!(memory.get(2), Some(&7));
        assert_eq!(memory.get(3), None);
    }

    #[test]
    fn reverse_iteration_is_newest_first() {
        let mut memory = Memory::new(2);
        for i in 0..5 {
            memory.push(i);
        }
        let newest_first: Vec<u32> = memory.iter().rev().copied().collect();
        assert_eq!(newest_first, [4, 3]);
    }

    #[test]
    fn clear_restarts_window() {
        let mut memory = Memory::new(2);
        for i in 0..3 {
            memory.push(i);
        }
        memory.clear();
        assert_eq!(memory.state(), MemoryState::Empty);
        assert_eq!(memory.latest(), None);
        memory.push(10);
        memory.push(11);
        assert_eq!(memory.push(12), Some(10));
        assert_eq!(contents(&memory), [11, 12]);
    }

    #[test]
    fn push_and_get_returns_newest() {
        let mut memory = Memory::new(2);
        assert_eq!(memory.push_and_get(1), (&1, None));
        assert_eq!(memory.push_and_get(2), (&2, None));
        assert_eq!(memory.push_and_get(3), (&3, Some(1)));
        assert_eq!(memory.latest(), Some(&3));
    }

    #[test]
    fn huge_capacity_reserves_lazily() {
        let mut memory = Memory::<[f32; 1024]>::new(1 << 40);
        assert!(memory.slots.capacity() <= MAX_PREALLOCATED_SLOTS);
        for i in 0..100 {
            memory.push([i as f32; 1024]);
        }
        assert_eq!(memory.len(), 100);
        assert_eq!(memory.state(), MemoryState::Filling);
        assert_eq!(memory.oldest().map(|item| item[0]), Some(0.0));
        assert_eq!(memory.latest().map(|item| item[0]), Some(99.0));
    }

    #[test]
    fn capacity_one_keeps_only_latest() {
        let mut memory = Memory::new(1);
        memory.push(1);
        assert_eq!(memory.push(2), Some(1));
        assert_eq!(contents(&memory), [2]);
    }
}
