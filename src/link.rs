use serde::{Deserialize, Serialize};
use ulid::Ulid;

/// Directed connection between two shapes
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Link {
    /// Store handle
    pub handle: Ulid,

    /// Source shape handle (the arrow starts here)
    pub source: Ulid,

    /// Target shape handle (the arrow points here)
    pub target: Ulid,

    /// Text rendered at the link's midpoint
    pub custom_label: Option<String>,

    /// "source → target" description, fixed at creation
    pub tooltip: String,

    /// Stroke color
    pub color: String,
}

impl Link {
    /// Create a new link with a fresh handle
    pub fn new(source: Ulid, target: Ulid, color: impl Into<String>) -> Self {
        Self {
            handle: Ulid::new(),
            source,
            target,
            custom_label: None,
            tooltip: String::new(),
            color: color.into(),
        }
    }

    /// Set the midpoint label; blank text means no label
    pub fn with_custom_label(mut self, label: impl Into<String>) -> Self {
        let label = label.into();
        self.custom_label = if label.trim().is_empty() {
            None
        } else {
            Some(label)
        };
        self
    }

    pub fn with_tooltip(mut self, tooltip: impl Into<String>) -> Self {
        self.tooltip = tooltip.into();
        self
    }

    /// Label text as exported (empty when none)
    pub fn custom_label_text(&self) -> &str {
        self.custom_label.as_deref().unwrap_or("")
    }
}

/// Tooltip text for a link between two shapes
pub fn link_tooltip(source_text: &str, target_text: &str) -> String {
    format!("{} → {}", source_text, target_text)
}
