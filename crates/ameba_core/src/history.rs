use ameba_data::Event;
use std::collections::VecDeque;

/// Bounded, append-only log of lifecycle events.
///
/// Once `capacity` is reached the oldest event is discarded for every new
/// one; [`EventLog::dropped`] counts how many were lost. Consumers that need
/// every event should [`drain`](EventLog::drain) faster than the log fills.
#[derive(Debug, Clone)]
pub struct EventLog {
    events: VecDeque<Event>,
    capacity: usize,
    dropped: u64,
    total: u64,
}

impl Default for EventLog {
    fn default() -> Self {
        Self::with_capacity(4096)
    }
}

impl EventLog {
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            events: VecDeque::with_capacity(capacity.min(1024)),
            capacity,
            dropped: 0,
            total: 0,
        }
    }

    pub fn push(&mut self, event: Event) {
        if self.events.len() == self.capacity {
            self.events.pop_front();
            self.dropped += 1;
        }
        self.events.push_back(event);
        self.total += 1;
    }

    pub fn extend<I: IntoIterator<Item = Event>>(&mut self, events: I) {
        for event in events {
            self.push(event);
        }
    }

    /// Removes and returns every retained event, oldest first.
    pub fn drain(&mut self) -> Vec<Event> {
        self.events.drain(..).collect()
    }

    /// Copies the retained events, oldest first.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Event> {
        self.events.iter().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Event> {
        self.events.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Events discarded because the log was full.
    #[must_use]
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    /// Events ever appended.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.total
    }
}
