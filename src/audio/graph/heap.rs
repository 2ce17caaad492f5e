use super::NodeId;

/// Indexed binary min-heap over dense node ids.
///
/// Every id in `0..capacity` may be queued at most once. A position table maps
/// each queued id to its slot so `decrease_key` can sift in place instead of
/// pushing duplicates, keeping `len` equal to the number of distinct queued ids.
#[derive(Debug)]
pub(super) struct DecreaseKeyHeap {
    slots: Vec<(f64, NodeId)>,
    /// `positions[id]` = index into `slots`, or None when not queued
    positions: Vec<Option<usize>>,
}

impl DecreaseKeyHeap {
    pub(super) fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            positions: vec![None; capacity],
        }
    }

    pub(super) fn len(&self) -> usize {
        self.slots.len()
    }

    pub(super) fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub(super) fn contains(&self, id: NodeId) -> bool {
        self.positions.get(id.0).is_some_and(|p| p.is_some())
    }

    /// Queue `id` with `key`. Ids that are already queued or out of range are ignored.
    pub(super) fn push(&mut self, id: NodeId, key: f64) {
        if id.0 >= self.positions.len() || self.contains(id) {
            return;
        }
        let slot = self.slots.len();
        self.slots.push((key, id));
        self.positions[id.0] = Some(slot);
        self.sift_up(slot);
    }

    pub(super) fn pop(&mut self) -> Option<(NodeId, f64)> {
        if self.slots.is_empty() {
            return None;
        }
        let last = self.slots.len() - 1;
        self.swap(0, last);
        let (key, id) = self.slots.pop()?;
        self.positions[id.0] = None;
        if !self.slots.is_empty() {
            self.sift_down(0);
        }
        Some((id, key))
    }

    /// Lower the key of a queued id. Returns false if the id is not queued or
    /// `key` is not smaller than its current key.
    pub(super) fn decrease_key(&mut self, id: NodeId, key: f64) -> bool {
        let Some(Some(slot)) = self.positions.get(id.0).copied() else {
            return false;
        };
        if key.is_nan() || key >= self.slots[slot].0 {
            return false;
        }
        self.slots[slot].0 = key;
        self.sift_up(slot);
        true
    }

    fn sift_up(&mut self, mut slot: usize) {
        while slot > 0 {
            let parent = (slot - 1) / 2;
            if self.slots[slot].0 < self.slots[parent].0 {
                self.swap(slot, parent);
                slot = parent;
            } else {
                break;
            }
        }
    }

    fn sift_down(&mut self, mut slot: usize) {
        let len = self.slots.len();
        loop {
            let left = 2 * slot + 1;
            let right = left + 1;
            let mut smallest = slot;
            if left < len && self.slots[left].0 < self.slots[smallest].0 {
                smallest = left;
            }
            if right < len && self.slots[right].0 < self.slots[smallest].0 {
                smallest = right;
            }
            if smallest == slot {
                break;
            }
            self.swap(slot, smallest);
            slot = smallest;
        }
    }

    fn swap(&mut self, a: usize, b: usize) {
        self.slots.swap(a, b);
        self.positions[self.slots[a].1.0] = Some(a);
        self.positions[self.slots[b].1.0] = Some(b);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pop_returns_keys_in_ascending_order() {
        let mut heap = DecreaseKeyHeap::with_capacity(5);
        for (id, key) in [(0, 4.0), (1, 1.0), (2, f64::INFINITY), (3, 3.0), (4, 0.5)] {
            heap.push(NodeId(id), key);
        }
        assert_eq!(heap.len(), 5);

        let mut keys = Vec::new();
        while let Some((_, key)) = heap.pop() {
            keys.push(key);
        }
        assert_eq!(keys, vec![0.5, 1.0, 3.0, 4.0, f64::INFINITY]);
        assert_eq!(heap.len(), 0);
    }

    #[test]
    fn test_decrease_key_reorders_in_place() {
        let mut heap = DecreaseKeyHeap::with_capacity(3);
        heap.push(NodeId(0), 0.0);
        heap.push(NodeId(1), f64::INFINITY);
        heap.push(NodeId(2), f64::INFINITY);

        assert_eq!(heap.pop(), Some((NodeId(0), 0.0)));
        assert!(heap.decrease_key(NodeId(2), 2.0));
        assert!(heap.decrease_key(NodeId(1), 7.0));
        assert!(!heap.decrease_key(NodeId(1), 9.0), "Larger key must be rejected");
        assert_eq!(heap.len(), 2, "Decrease-key must not add duplicate entries");

        assert_eq!(heap.pop(), Some((NodeId(2), 2.0)));
        assert_eq!(heap.pop(), Some((NodeId(1), 7.0)));
        assert_eq!(heap.pop(), None);
    }

    #[test]
    fn test_decrease_key_ignores_popped_ids() {
        let mut heap = DecreaseKeyHeap::with_capacity(2);
        heap.push(NodeId(0), 1.0);
        heap.push(NodeId(1), 2.0);
        heap.pop();
        assert!(!heap.contains(NodeId(0)));
        assert!(!heap.decrease_key(NodeId(0), 0.0));
        assert!(heap.contains(NodeId(1)));
    }

    #[test]
    fn test_push_ignores_duplicates_and_out_of_range() {
        let mut heap = DecreaseKeyHeap::with_capacity(1);
        heap.push(NodeId(0), 1.0);
        heap.push(NodeId(0), 0.0);
        heap.push(NodeId(5), 0.0);
        assert_eq!(heap.len(), 1);
        assert_eq!(heap.pop(), Some((NodeId(0), 1.0)));
    }

    #[test]
    fn test_random_decreases_match_sorted_order() {
        let mut rng = fastrand::Rng::with_seed(42);
        let n = 64;
        let mut heap = DecreaseKeyHeap::with_capacity(n);
        let mut keys: Vec<f64> = (0..n).map(|_| rng.f64() * 100.0).collect();
        for (id, key) in keys.iter().enumerate() {
            heap.push(NodeId(id), *key);
        }
        for _ in 0..200 {
            let id = rng.usize(0..n);
            let lowered = keys[id] * rng.f64();
            if heap.decrease_key(NodeId(id), lowered) {
                keys[id] = lowered;
            }
        }

        let mut expected = keys.clone();
        expected.sort_by(|a, b| a.total_cmp(b));
        let mut popped = Vec::new();
        while let Some((id, key)) = heap.pop() {
            assert_eq!(keys[id.0], key);
            popped.push(key);
        }
        assert_eq!(popped, expected);
    }
}
