// Path: crates/api/src/events/mod.rs
//! The per-block event queue.

use serde::Serialize;

/// An event emitted by a module while processing a block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    /// The emitting module.
    pub module: String,
    /// The event name, e.g. `ccmProcessed`.
    pub name: String,
    /// The event payload, encoded with the event's schema.
    #[serde(with = "hex_bytes")]
    pub data: Vec<u8>,
    /// Indexed topics.
    #[serde(serialize_with = "hex_list")]
    pub topics: Vec<Vec<u8>>,
}

mod hex_bytes {
    use serde::Serializer;

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(bytes))
    }
}

fn hex_list<S: serde::Serializer>(items: &[Vec<u8>], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(items.iter().map(hex::encode))
}

/// Collects events in emission order. Snapshots are queue lengths, so rolling
/// back drops every event added after the marker.
#[derive(Debug, Clone, Default)]
pub struct EventQueue {
    events: Vec<Event>,
}

impl EventQueue {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an event.
    pub fn add(
        &mut self,
        module: &str,
        name: &str,
        data: Vec<u8>,
        topics: Vec<Vec<u8>>,
    ) {
        self.events.push(Event {
            module: module.to_string(),
            name: name.to_string(),
            data,
            topics,
        });
    }

    /// Returns a marker for the current queue.
    pub fn snapshot(&self) -> usize {
        self.events.len()
    }

    /// Drops every event added since `snapshot_id` was taken.
    pub fn restore_snapshot(&mut self, snapshot_id: usize) {
        self.events.truncate(snapshot_id);
    }

    /// All events, oldest first.
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Events with the given module and name, oldest first.
    pub fn filter<'a>(&'a self, module: &'a str, name: &'a str) -> impl Iterator<Item = &'a Event> {
        self.events
            .iter()
            .filter(move |event| event.module == module && event.name == name)
    }

    /// Number of queued events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
