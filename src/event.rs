use crate::{SequentialId, ShapeKind};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use ulid::Ulid;

/// A session event with timestamp
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphEvent {
    pub timestamp: DateTime<Utc>,
    pub event: EventType,
}

impl GraphEvent {
    /// Create a new event with the current timestamp
    pub fn new(event: EventType) -> Self {
        Self {
            timestamp: Utc::now(),
            event,
        }
    }
}

/// How an element entered the store
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Origin {
    Interactive,
    Import,
}

/// Types of events that can occur during an editing session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum EventType {
    ShapeCreated {
        handle: Ulid,
        sequential_id: SequentialId,
        kind: ShapeKind,
        origin: Origin,
    },

    ShapeMoved {
        handle: Ulid,
        x: f32,
        y: f32,
    },

    LinkCreated {
        handle: Ulid,
        source: Ulid,
        target: Ulid,
        origin: Origin,
    },

    Exported {
        path: PathBuf,
        shape_rows: usize,
        link_rows: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_creation() {
        let event = GraphEvent::new(EventType::ShapeCreated {
            handle: Ulid::new(),
            sequential_id: SequentialId::Node(1),
            kind: ShapeKind::Node,
            origin: Origin::Interactive,
        });

        assert!(event.timestamp <= Utc::now());
    }

    #[test]
    fn test_event_serialization() {
        let event = GraphEvent::new(EventType::LinkCreated {
            handle: Ulid::new(),
            source: Ulid::new(),
            target: Ulid::new(),
            origin: Origin::Import,
        });

        let json = serde_json::to_string(&event).unwrap();
        let deserialized: GraphEvent = serde_json::from_str(&json).unwrap();

        match (&event.event, &deserialized.event) {
            (
                EventType::LinkCreated {
                    source: s1,
                    target: t1,
                    origin: o1,
                    ..
                },
                EventType::LinkCreated {
                    source: s2,
                    target: t2,
                    origin: o2,
                    ..
                },
            ) => {
                assert_eq!(s1, s2);
                assert_eq!(t1, t2);
                assert_eq!(o1, o2);
            }
            _ => panic!("Event type mismatch"),
        }
    }
}
