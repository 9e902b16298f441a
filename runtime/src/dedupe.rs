use std::collections::VecDeque;

use fnv::FnvHashSet;

use message::ReportId;

/// Bounded FIFO of recently seen report ids. Membership is exact; the oldest id
/// falls out when a new one arrives at capacity.
#[derive(Debug, Clone)]
pub struct DedupeWindow {
    capacity: usize,
    order:    VecDeque<ReportId>,
    members:  FnvHashSet<ReportId>,
}

impl DedupeWindow {
    pub const DEFAULT_CAPACITY: usize = 64;

    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);

        Self {
            capacity,
            order: VecDeque::with_capacity(capacity),
            members: FnvHashSet::default(),
        }
    }

    #[inline]
    pub fn contains(&self, id: &ReportId) -> bool {
        self.members.contains(id)
    }

    /// Returns false if `id` was already present.
    pub fn insert(&mut self, id: ReportId) -> bool {
        if self.members.contains(&id) {
            return false;
        }

        if self.order.len() == self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.members.remove(&oldest);
            }
        }

        self.order.push_back(id);
        self.members.insert(id);

        true
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for DedupeWindow {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY)
    }
}
