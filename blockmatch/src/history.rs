//! Fixed-capacity sample history

use num_traits::ToPrimitive;

/// A circular buffer of the most recent samples of some quantity.
///
/// Once full, every new sample overwrites the oldest one. Iteration always
/// runs oldest to newest, which is the order samples are displayed in.
#[derive(Clone, Debug)]
pub struct History<T> {
    samples: Vec<T>,
    capacity: usize,

    /// Total number of samples ever pushed; the write cursor is this modulo
    /// the capacity.
    written: u64,
}

impl<T> History<T> {
    /// Construct an empty history holding at most `capacity` samples.
    ///
    /// A zero capacity history accepts and immediately discards everything.
    pub fn new(capacity: usize) -> Self {
        Self {
            samples: Vec::with_capacity(capacity),
            capacity,
            written: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Whether the next push will evict a sample. Never true for a zero
    /// capacity history, which holds nothing to evict.
    pub fn is_full(&self) -> bool {
        self.capacity > 0 && self.samples.len() == self.capacity
    }

    /// Total number of samples pushed over the lifetime of the history.
    pub fn written(&self) -> u64 {
        self.written
    }

    fn cursor(&self) -> usize {
        if self.capacity == 0 {
            0
        } else {
            (self.written % self.capacity as u64) as usize
        }
    }

    /// Record a sample, returning the one it evicted, if any.
    pub fn push(&mut self, sample: T) -> Option<T> {
        if self.capacity == 0 {
            self.written += 1;
            return Some(sample);
        }

        let cursor = self.cursor();
        self.written += 1;

        if self.samples.len() < self.capacity {
            self.samples.push(sample);
            None
        } else {
            Some(std::mem::replace(&mut self.samples[cursor], sample))
        }
    }

    /// Iterate over the held samples, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        let split = if self.is_full() { self.cursor() } else { 0 };
        let (newer, older) = self.samples.split_at(split);

        older.iter().chain(newer.iter())
    }

    /// The most recently pushed sample still held.
    pub fn latest(&self) -> Option<&T> {
        if self.is_full() {
            let cursor = self.cursor();
            let last = if cursor == 0 { self.capacity - 1 } else { cursor - 1 };
            self.samples.get(last)
        } else {
            self.samples.last()
        }
    }

    /// Forget every held sample.
    pub fn clear(&mut self) {
        self.samples.clear();
        self.written = 0;
    }
}

impl<T: Clone> History<T> {
    /// Copy out the held samples, oldest first.
    pub fn to_vec(&self) -> Vec<T> {
        self.iter().cloned().collect()
    }
}

impl<T: ToPrimitive> History<T> {
    /// Sum of every held sample.
    ///
    /// Samples that cannot be represented as `f64` are skipped.
    pub fn sum(&self) -> f64 {
        self.samples.iter().filter_map(|s| s.to_f64()).sum()
    }

    /// Mean of the held samples, or `None` if there are none.
    pub fn mean(&self) -> Option<f64> {
        if self.samples.is_empty() {
            None
        } else {
            Some(self.sum() / self.samples.len() as f64)
        }
    }

    /// The largest held sample, ignoring NaNs.
    pub fn max(&self) -> Option<f64> {
        self.samples
            .iter()
            .filter_map(|s| s.to_f64())
            .filter(|s| !s.is_nan())
            .fold(None, |max, s| match max {
                Some(m) if m >= s => Some(m),
                _ => Some(s),
            })
    }
}
