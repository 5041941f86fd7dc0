use std::collections::VecDeque;

/// Structured trace of what happened during a page session.
///
/// Events are plain text tagged with a static kind and a monotonically
/// increasing sequence number, which is enough to assert ordering in tests and
/// to dump a readable log when something looks wrong in the browser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub seq: u64,
    pub kind: &'static str,
    pub message: String,
}

/// Bounded event log. When full, the oldest events are dropped.
#[derive(Debug)]
pub struct EventBus {
    next_seq: u64,
    capacity: usize,
    events: VecDeque<Event>,
}

pub const DEFAULT_EVENT_CAPACITY: usize = 256;

impl Default for EventBus {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_EVENT_CAPACITY)
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            next_seq: 0,
            capacity: capacity.max(1),
            events: VecDeque::new(),
        }
    }

    pub fn emit(&mut self, kind: &'static str, message: impl Into<String>) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        if self.events.len() == self.capacity {
            self.events.pop_front();
        }
        self.events.push_back(Event {
            seq,
            kind,
            message: message.into(),
        });
        seq
    }

    pub fn events(&self) -> &VecDeque<Event> {
        &self.events
    }

    pub fn kinds(&self) -> Vec<&'static str> {
        self.events.iter().map(|e| e.kind).collect()
    }

    pub fn drain(&mut self) -> Vec<Event> {
        Vec::from(std::mem::take(&mut self.events))
    }
}

#[cfg(test)]
mod tests {
    use super::EventBus;

    #[test]
    fn records_events_in_sequence() {
        let mut bus = EventBus::new();
        assert_eq!(bus.emit("filter", "all -> berber"), 0);
        assert_eq!(bus.emit("expand", "5"), 1);
        assert_eq!(bus.kinds(), vec!["filter", "expand"]);
        assert_eq!(bus.events()[1].seq, 1);
    }

    #[test]
    fn drops_oldest_when_full() {
        let mut bus = EventBus::with_capacity(2);
        bus.emit("a", "");
        bus.emit("b", "");
        bus.emit("c", "");
        assert_eq!(bus.kinds(), vec!["b", "c"]);
        assert_eq!(bus.events()[0].seq, 1);
        for _ in 0..10 {
            bus.emit("d", "");
        }
        assert_eq!(bus.events().len(), 2);
        assert_eq!(bus.events().back().map(|e| e.seq), Some(12));
    }

    #[test]
    fn drain_clears_events() {
        let mut bus = EventBus::new();
        bus.emit("k", "m");
        let drained = bus.drain();
        assert_eq!(drained.len(), 1);
        assert!(bus.events().is_empty());
        assert_eq!(bus.emit("k", "m"), 1);
    }
}
