// In-memory queue history: a bounded FIFO of samples for the chart.
// Nothing is persisted; a restart starts an empty series.

pub mod sampler;

use std::collections::VecDeque;

use crate::models::HistorySample;

pub struct HistoryRepo {
    samples: VecDeque<HistorySample>,
    capacity: usize,
}

impl HistoryRepo {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Appends a sample, evicting the oldest ones once full.
    pub fn push(&mut self, sample: HistorySample) {
        while self.samples.len() >= self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(sample);
    }

    /// Oldest first.
    pub fn series(&self) -> Vec<HistorySample> {
        self.samples.iter().cloned().collect()
    }

    pub fn latest(&self) -> Option<&HistorySample> {
        self.samples.back()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
