/// Which end of the score range a [`BoundedBest`] keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Retain {
    Lowest,
    Highest,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Scored<T> {
    pub score: f64,
    pub item: T,
}

/// Fixed-capacity collection of the best-scoring items seen so far, kept sorted from
/// best to worst.
///
/// Ties never displace an existing entry, so among equal scores the earliest offers win.
#[derive(Debug, Clone)]
pub struct BoundedBest<T> {
    capacity: usize,
    retain: Retain,
    entries: Vec<Scored<T>>,
}

impl<T> BoundedBest<T> {
    pub fn new(capacity: usize, retain: Retain) -> Self {
        Self {
            capacity,
            retain,
            entries: Vec::with_capacity(capacity + 1),
        }
    }

    pub fn lowest(capacity: usize) -> Self {
        Self::new(capacity, Retain::Lowest)
    }

    pub fn highest(capacity: usize) -> Self {
        Self::new(capacity, Retain::Highest)
    }

    #[inline]
    fn is_better(&self, candidate: f64, existing: f64) -> bool {
        match self.retain {
            Retain::Lowest => candidate < existing,
            Retain::Highest => candidate > existing,
        }
    }

    fn insertion_index(&self, score: f64) -> Option<usize> {
        if score.is_nan() || self.capacity == 0 {
            return None;
        }
        let index = self
            .entries
            .partition_point(|entry| !self.is_better(score, entry.score));
        (index < self.capacity).then_some(index)
    }

    pub fn would_accept(&self, score: f64) -> bool {
        self.insertion_index(score).is_some()
    }

    /// Inserts `item` if it ranks among the best `capacity` entries.
    pub fn offer(&mut self, score: f64, item: T) -> bool {
        self.offer_with(score, || item)
    }

    /// Like [`offer`](Self::offer), but only builds the item when it will be kept.
    pub fn offer_with(&mut self, score: f64, make: impl FnOnce() -> T) -> bool {
        match self.insertion_index(score) {
            Some(index) => {
                self.entries.insert(index, Scored { score, item: make() });
                self.entries.truncate(self.capacity);
                true
            }
            None => false,
        }
    }

    /// Offers every entry of `other`, in its order.
    pub fn merge(&mut self, other: BoundedBest<T>) {
        for entry in other.entries {
            self.offer(entry.score, entry.item);
        }
    }

    pub fn best(&self) -> Option<&Scored<T>> {
        self.entries.first()
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

    pub fn iter(&self) -> impl Iterator<Item = &Scored<T>> {
        self.entries.iter()
    }

    pub fn into_sorted_vec(self) -> Vec<Scored<T>> {
        self.entries
    }
}
