use crate::event::Origin;
use crate::{EditorError, EventType, GraphEvent, Link, SequentialId, Shape};
use anyhow::{anyhow, Result};
use std::collections::HashMap;
use ulid::Ulid;

/// Store of all shapes and links in one editing session
///
/// Iteration always follows insertion order.
#[derive(Debug, Clone, Default)]
pub struct GraphStore {
    /// All shapes indexed by handle
    shapes: HashMap<Ulid, Shape>,

    /// Shape handles in insertion order
    shape_order: Vec<Ulid>,

    /// All links indexed by handle
    links: HashMap<Ulid, Link>,

    /// Link handles in insertion order
    link_order: Vec<Ulid>,

    /// Event log for history tracking
    events: Vec<GraphEvent>,
}

impl GraphStore {
    pub fn new() -> Self {
        Self::default()
    }

    // ========== Shapes ==========

    /// Add a shape and return its handle
    pub fn insert_shape(&mut self, shape: Shape, origin: Origin) -> Ulid {
        let handle = shape.handle;

        self.log_event(EventType::ShapeCreated {
            handle,
            sequential_id: shape.sequential_id,
            kind: shape.kind,
            origin,
        });

        self.shapes.insert(handle, shape);
        self.shape_order.push(handle);
        handle
    }

    pub fn get_shape(&self, handle: Ulid) -> Option<&Shape> {
        self.shapes.get(&handle)
    }

    /// All shapes in insertion order
    pub fn shapes(&self) -> impl Iterator<Item = &Shape> + '_ {
        self.shape_order
            .iter()
            .filter_map(move |handle| self.shapes.get(handle))
    }

    /// Find a shape by its user-facing id
    pub fn find_by_sequential_id(&self, id: SequentialId) -> Option<&Shape> {
        self.shapes().find(|shape| shape.sequential_id == id)
    }

    pub fn contains_sequential_id(&self, id: SequentialId) -> bool {
        self.find_by_sequential_id(id).is_some()
    }

    /// Move a shape (canvas drag)
    pub fn move_shape(&mut self, handle: Ulid, x: f32, y: f32) -> Result<()> {
        let shape = self
            .shapes
            .get_mut(&handle)
            .ok_or_else(|| anyhow!("Shape not found: {}", handle))?;

        shape.set_position(x, y);

        self.log_event(EventType::ShapeMoved { handle, x, y });

        Ok(())
    }

    // ========== Links ==========

    /// Add a link between two distinct existing shapes
    pub fn insert_link(&mut self, link: Link, origin: Origin) -> Result<Ulid, EditorError> {
        if link.source == link.target {
            return Err(EditorError::SameEndpoints);
        }
        if !self.shapes.contains_key(&link.source) {
            return Err(EditorError::EndpointNotFound(link.source));
        }
        if !self.shapes.contains_key(&link.target) {
            return Err(EditorError::EndpointNotFound(link.target));
        }

        let handle = link.handle;

        self.log_event(EventType::LinkCreated {
            handle,
            source: link.source,
            target: link.target,
            origin,
        });

        self.links.insert(handle, link);
        self.link_order.push(handle);
        Ok(handle)
    }

    pub fn get_link(&self, handle: Ulid) -> Option<&Link> {
        self.links.get(&handle)
    }

    /// All links in insertion order
    pub fn links(&self) -> impl Iterator<Item = &Link> + '_ {
        self.link_order
            .iter()
            .filter_map(move |handle| self.links.get(handle))
    }

    /// Bypass endpoint checks so tests can build a dangling link
    #[cfg(test)]
    pub(crate) fn insert_link_unchecked(&mut self, link: Link) {
        self.link_order.push(link.handle);
        self.links.insert(link.handle, link);
    }

    // ========== Event Logging ==========

    pub(crate) fn log_event(&mut self, event: EventType) {
        self.events.push(GraphEvent::new(event));
    }

    pub fn events(&self) -> &[GraphEvent] {
        &self.events
    }

    // ========== Utility Methods ==========

    pub fn shape_count(&self) -> usize {
        self.shapes.len()
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{LabelStyle, Rectangle, ShapeKind};
    use assert_matches::assert_matches;

    fn node(id: u64, text: &str) -> Shape {
        Shape::new(
            SequentialId::Node(id),
            ShapeKind::Node,
            text,
            Rectangle::new(0.0, 0.0, 150.0, 60.0),
            "#1a237e",
        )
    }

    fn label(id: u64, text: &str) -> Shape {
        Shape::new(
            SequentialId::Label(id),
            ShapeKind::Label {
                style: LabelStyle::Rectangle,
            },
            text,
            Rectangle::new(0.0, 0.0, 150.0, 50.0),
            "#4CAF50",
        )
    }

    #[test]
    fn test_store_creation() {
        let store = GraphStore::new();
        assert_eq!(store.shape_count(), 0);
        assert_eq!(store.link_count(), 0);
        assert!(store.is_empty());
    }

    #[test]
    fn test_insertion_order_is_preserved() {
        let mut store = GraphStore::new();
        let texts = ["c", "a", "b", "e", "d"];
        for (i, text) in texts.iter().enumerate() {
            store.insert_shape(node(i as u64 + 1, text), Origin::Interactive);
        }

        let seen: Vec<&str> = store.shapes().map(|s| s.text.as_str()).collect();
        assert_eq!(seen, texts);
    }

    #[test]
    fn test_find_by_sequential_id() {
        let mut store = GraphStore::new();
        store.insert_shape(node(1, "Start"), Origin::Interactive);
        store.insert_shape(label(1, "Note"), Origin::Interactive);

        assert_eq!(
            store.find_by_sequential_id(SequentialId::Node(1)).unwrap().text,
            "Start"
        );
        assert_eq!(
            store.find_by_sequential_id(SequentialId::Label(1)).unwrap().text,
            "Note"
        );
        assert!(!store.contains_sequential_id(SequentialId::Node(2)));
    }

    #[test]
    fn test_link_crud() {
        let mut store = GraphStore::new();
        let a = store.insert_shape(node(1, "A"), Origin::Interactive);
        let b = store.insert_shape(node(2, "B"), Origin::Interactive);

        let handle = store
            .insert_link(Link::new(a, b, "#1a237e"), Origin::Interactive)
            .unwrap();
        assert_eq!(store.link_count(), 1);

        let link = store.get_link(handle).unwrap();
        assert_eq!(link.source, a);
        assert_eq!(link.target, b);
        assert_eq!(store.links().count(), 1);
    }

    #[test]
    fn test_duplicate_links_allowed() {
        let mut store = GraphStore::new();
        let a = store.insert_shape(node(1, "A"), Origin::Interactive);
        let b = store.insert_shape(node(2, "B"), Origin::Interactive);

        store
            .insert_link(Link::new(a, b, "#000000"), Origin::Interactive)
            .unwrap();
        store
            .insert_link(Link::new(a, b, "#000000"), Origin::Interactive)
            .unwrap();
        store
            .insert_link(Link::new(b, a, "#000000"), Origin::Interactive)
            .unwrap();

        assert_eq!(store.link_count(), 3);
    }

    #[test]
    fn test_self_link_rejected() {
        let mut store = GraphStore::new();
        let a = store.insert_shape(node(1, "A"), Origin::Interactive);

        let result = store.insert_link(Link::new(a, a, "#000000"), Origin::Interactive);
        assert_matches!(result, Err(EditorError::SameEndpoints));
        assert_eq!(store.link_count(), 0);
    }

    #[test]
    fn test_missing_endpoint_rejected() {
        let mut store = GraphStore::new();
        let a = store.insert_shape(node(1, "A"), Origin::Interactive);
        let ghost = Ulid::new();

        let result = store.insert_link(Link::new(a, ghost, "#000000"), Origin::Interactive);
        assert_matches!(result, Err(EditorError::EndpointNotFound(h)) if h == ghost);
        assert_eq!(store.link_count(), 0);
    }

    #[test]
    fn test_move_shape() {
        let mut store = GraphStore::new();
        let a = store.insert_shape(node(1, "A"), Origin::Interactive);

        store.move_shape(a, 40.0, 80.0).unwrap();
        let shape = store.get_shape(a).unwrap();
        assert_eq!(shape.bounds.x, 40.0);
        assert_eq!(shape.bounds.y, 80.0);

        assert!(store.move_shape(Ulid::new(), 0.0, 0.0).is_err());
    }

    #[test]
    fn test_event_logging() {
        let mut store = GraphStore::new();
        let a = store.insert_shape(node(1, "A"), Origin::Import);

        assert_eq!(store.events().len(), 1);

        match &store.events()[0].event {
            EventType::ShapeCreated {
                handle,
                sequential_id,
                origin,
                ..
            } => {
                assert_eq!(*handle, a);
                assert_eq!(*sequential_id, SequentialId::Node(1));
                assert_eq!(*origin, Origin::Import);
            }
            _ => panic!("Expected ShapeCreated event"),
        }

        store.move_shape(a, 5.0, 5.0).unwrap();
        assert_eq!(store.events().len(), 2);
        assert!(matches!(
            store.events()[1].event,
            EventType::ShapeMoved { x, y, .. } if x == 5.0 && y == 5.0
        ));
    }
}
