use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ulid::Ulid;

/// A placeable element on the diagram: either a node or a decorative label
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Shape {
    /// Store handle (used for lookups and as link endpoint)
    pub handle: Ulid,

    /// User-facing id, assigned once and never reused
    pub sequential_id: SequentialId,

    /// Display text
    pub text: String,

    /// Hover text (empty when none)
    pub tooltip: String,

    /// Node or label, with the label's visual style
    pub kind: ShapeKind,

    /// Position and size on the canvas (pixels)
    pub bounds: Rectangle,

    /// Fill color as entered (normally `#RRGGBB`)
    pub fill_color: String,

    pub font_size: u32,
}

impl Shape {
    /// Create a new shape with a fresh handle
    pub fn new(
        sequential_id: SequentialId,
        kind: ShapeKind,
        text: impl Into<String>,
        bounds: Rectangle,
        fill_color: impl Into<String>,
    ) -> Self {
        Self {
            handle: Ulid::new(),
            sequential_id,
            text: text.into(),
            tooltip: String::new(),
            kind,
            bounds,
            fill_color: fill_color.into(),
            font_size: DEFAULT_FONT_SIZE,
        }
    }

    /// Set the hover text
    pub fn with_tooltip(mut self, tooltip: impl Into<String>) -> Self {
        self.tooltip = tooltip.into();
        self
    }

    pub fn with_font_size(mut self, font_size: u32) -> Self {
        self.font_size = font_size;
        self
    }

    pub fn is_label(&self) -> bool {
        self.kind.is_label()
    }

    /// "Node" or "Label", as written to the export's type column
    pub fn kind_name(&self) -> &'static str {
        self.kind.name()
    }

    /// Text shown in endpoint selectors, e.g. `Node 3: Start`
    pub fn display_name(&self) -> String {
        format!("{} {}: {}", self.kind_name(), self.sequential_id, self.text)
    }

    /// Move the shape's top-left corner
    pub fn set_position(&mut self, x: f32, y: f32) {
        self.bounds.x = x;
        self.bounds.y = y;
    }
}

pub const DEFAULT_FONT_SIZE: u32 = 14;

/// Whether a shape is a plain node or a label
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ShapeKind {
    Node,
    Label { style: LabelStyle },
}

impl ShapeKind {
    pub fn is_label(&self) -> bool {
        matches!(self, ShapeKind::Label { .. })
    }

    pub fn name(&self) -> &'static str {
        match self {
            ShapeKind::Node => "Node",
            ShapeKind::Label { .. } => "Label",
        }
    }
}

/// Visual variant of a label
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LabelStyle {
    #[default]
    Rectangle,
    Circle,
    Ellipse,
    Cloud,
}

impl LabelStyle {
    pub const ALL: [LabelStyle; 4] = [
        LabelStyle::Rectangle,
        LabelStyle::Circle,
        LabelStyle::Ellipse,
        LabelStyle::Cloud,
    ];

    /// Default (width, height) for a label of this style
    pub fn default_size(&self) -> (f32, f32) {
        match self {
            LabelStyle::Rectangle => (150.0, 50.0),
            LabelStyle::Circle => (120.0, 120.0),
            LabelStyle::Ellipse => (150.0, 80.0),
            LabelStyle::Cloud => (150.0, 100.0),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LabelStyle::Rectangle => "rectangle",
            LabelStyle::Circle => "circle",
            LabelStyle::Ellipse => "ellipse",
            LabelStyle::Cloud => "cloud",
        }
    }

    /// Parse a style name, falling back to rectangle for anything unknown
    pub fn parse_or_default(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "circle" => LabelStyle::Circle,
            "ellipse" => LabelStyle::Ellipse,
            "cloud" => LabelStyle::Cloud,
            _ => LabelStyle::Rectangle,
        }
    }
}

/// Rectangle representing position and size on canvas
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Rectangle {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rectangle {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Check if this rectangle contains a point
    pub fn contains_point(&self, x: f32, y: f32) -> bool {
        x >= self.x && x <= self.right() && y >= self.y && y <= self.bottom()
    }
}

/// User-facing shape id: plain integers for nodes, `L`-prefixed for labels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum SequentialId {
    Node(u64),
    Label(u64),
}

impl SequentialId {
    pub fn value(&self) -> u64 {
        match self {
            SequentialId::Node(n) | SequentialId::Label(n) => *n,
        }
    }

    pub fn is_label(&self) -> bool {
        matches!(self, SequentialId::Label(_))
    }
}

impl fmt::Display for SequentialId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SequentialId::Node(n) => write!(f, "{}", n),
            SequentialId::Label(n) => write!(f, "L{}", n),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid sequential id: {0:?}")]
pub struct ParseSequentialIdError(pub String);

impl FromStr for SequentialId {
    type Err = ParseSequentialIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let err = || ParseSequentialIdError(s.to_string());

        match trimmed.strip_prefix(['L', 'l']) {
            Some(rest) => rest.parse().map(SequentialId::Label).map_err(|_| err()),
            None => trimmed.parse().map(SequentialId::Node).map_err(|_| err()),
        }
    }
}

impl From<SequentialId> for String {
    fn from(id: SequentialId) -> Self {
        id.to_string()
    }
}

impl TryFrom<String> for SequentialId {
    type Error = ParseSequentialIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_creation() {
        let shape = Shape::new(
            SequentialId::Node(1),
            ShapeKind::Node,
            "Start",
            Rectangle::new(100.0, 100.0, 150.0, 60.0),
            "#1a237e",
        );

        assert_eq!(shape.text, "Start");
        assert_eq!(shape.tooltip, "");
        assert_eq!(shape.font_size, DEFAULT_FONT_SIZE);
        assert!(!shape.is_label());
        assert_eq!(shape.kind_name(), "Node");
        assert_eq!(shape.display_name(), "Node 1: Start");
    }

    #[test]
    fn test_label_display_name() {
        let shape = Shape::new(
            SequentialId::Label(4),
            ShapeKind::Label {
                style: LabelStyle::Cloud,
            },
            "Note",
            Rectangle::new(0.0, 0.0, 150.0, 100.0),
            "#4CAF50",
        );

        assert!(shape.is_label());
        assert_eq!(shape.display_name(), "Label L4: Note");
    }

    #[test]
    fn test_label_style_sizes() {
        assert_eq!(LabelStyle::Rectangle.default_size(), (150.0, 50.0));
        assert_eq!(LabelStyle::Circle.default_size(), (120.0, 120.0));
        assert_eq!(LabelStyle::Ellipse.default_size(), (150.0, 80.0));
        assert_eq!(LabelStyle::Cloud.default_size(), (150.0, 100.0));
    }

    #[test]
    fn test_label_style_parse() {
        assert_eq!(LabelStyle::parse_or_default("circle"), LabelStyle::Circle);
        assert_eq!(LabelStyle::parse_or_default(" Ellipse "), LabelStyle::Ellipse);
        assert_eq!(LabelStyle::parse_or_default("cloud"), LabelStyle::Cloud);
        assert_eq!(LabelStyle::parse_or_default("hexagon"), LabelStyle::Rectangle);
        assert_eq!(LabelStyle::parse_or_default(""), LabelStyle::Rectangle);
    }

    #[test]
    fn test_rectangle_operations() {
        let rect = Rectangle::new(10.0, 20.0, 100.0, 50.0);

        assert_eq!(rect.right(), 110.0);
        assert_eq!(rect.bottom(), 70.0);
        assert!(rect.contains_point(50.0, 50.0));
        assert!(rect.contains_point(110.0, 70.0));
        assert!(!rect.contains_point(150.0, 50.0));
    }

    #[test]
    fn test_sequential_id_text() {
        assert_eq!(SequentialId::Node(12).to_string(), "12");
        assert_eq!(SequentialId::Label(3).to_string(), "L3");

        assert_eq!("12".parse::<SequentialId>().unwrap(), SequentialId::Node(12));
        assert_eq!("L3".parse::<SequentialId>().unwrap(), SequentialId::Label(3));
        assert_eq!(" l7".parse::<SequentialId>().unwrap(), SequentialId::Label(7));
        assert!("abc".parse::<SequentialId>().is_err());
        assert!("L".parse::<SequentialId>().is_err());
    }

    #[test]
    fn test_shape_serialization() {
        let shape = Shape::new(
            SequentialId::Label(2),
            ShapeKind::Label {
                style: LabelStyle::Ellipse,
            },
            "Hello",
            Rectangle::new(1.0, 2.0, 3.0, 4.0),
            "#4CAF50",
        );

        let json = serde_json::to_string(&shape).unwrap();
        assert!(json.contains("\"L2\""));
        let back: Shape = serde_json::from_str(&json).unwrap();
        assert_eq!(back, shape);
    }
}
