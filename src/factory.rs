//! Builds shapes and links from form input or imported records
//!
//! Form fields arrive as raw strings. Numeric fields that are absent,
//! unparseable or not positive fall back to the configured default.

use crate::color::is_valid_hex_color;
use crate::config::EditorConfig;
use crate::import::{ImportedLink, ImportedShape};
use crate::link::link_tooltip;
use crate::shape::DEFAULT_FONT_SIZE;
use crate::{
    EditorError, GraphStore, IdAllocator, LabelStyle, Link, Rectangle, Shape, ShapeKind,
};
use ulid::Ulid;

/// Raw input of the "add node" form
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeForm {
    pub text: String,
    pub tooltip: String,
    pub width: String,
    pub height: String,
    pub color: String,
}

impl NodeForm {
    /// A form pre-filled with the configured defaults
    pub fn with_defaults(config: &EditorConfig) -> Self {
        Self {
            width: format!("{}", config.node.width),
            height: format!("{}", config.node.height),
            color: config.node.color.clone(),
            ..Default::default()
        }
    }

    /// Shorthand for a node with only its text filled in
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }
}

/// Raw input of the "add label" form
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LabelForm {
    pub text: String,
    pub font_size: String,
    pub color: String,
    pub style: String,
}

impl LabelForm {
    pub fn with_defaults(config: &EditorConfig) -> Self {
        Self {
            font_size: config.label.font_size.to_string(),
            color: config.label.color.clone(),
            style: LabelStyle::default().as_str().to_string(),
            ..Default::default()
        }
    }

    pub fn text(text: impl Into<String>, style: LabelStyle) -> Self {
        Self {
            text: text.into(),
            style: style.as_str().to_string(),
            ..Default::default()
        }
    }
}

/// Raw input of the "create link" form
///
/// `None` endpoints correspond to the blank selector placeholder.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinkForm {
    pub source: Option<Ulid>,
    pub target: Option<Ulid>,
    pub label: String,
    pub color: String,
}

impl LinkForm {
    pub fn with_defaults(config: &EditorConfig) -> Self {
        Self {
            color: config.link.color.clone(),
            ..Default::default()
        }
    }

    pub fn between(source: Ulid, target: Ulid) -> Self {
        Self {
            source: Some(source),
            target: Some(target),
            ..Default::default()
        }
    }

    pub fn labeled(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }
}

/// Shape and link construction with defaults taken from an [`EditorConfig`]
pub struct ShapeFactory<'a> {
    config: &'a EditorConfig,
}

impl<'a> ShapeFactory<'a> {
    pub fn new(config: &'a EditorConfig) -> Self {
        Self { config }
    }

    /// Build a node from form input
    ///
    /// `placeable_count` is the number of shapes already in the store and
    /// picks the grid cell. The id is allocated only once validation passes.
    pub fn build_node(
        &self,
        form: &NodeForm,
        ids: &mut IdAllocator,
        placeable_count: usize,
    ) -> Result<Shape, EditorError> {
        let text = form.text.trim();
        if text.is_empty() {
            return Err(EditorError::MissingText("a node label"));
        }

        let defaults = &self.config.node;
        let width = positive_or(&form.width, defaults.width);
        let height = positive_or(&form.height, defaults.height);
        let color = color_or(&form.color, &defaults.color)?;
        let (x, y) = self.tile_position(ShapeKind::Node, placeable_count);

        let id = ids.next_node_id()?;
        Ok(
            Shape::new(id, ShapeKind::Node, text, Rectangle::new(x, y, width, height), color)
                .with_tooltip(form.tooltip.trim()),
        )
    }

    /// Build a label from form input; its size comes from the style
    pub fn build_label(
        &self,
        form: &LabelForm,
        ids: &mut IdAllocator,
        placeable_count: usize,
    ) -> Result<Shape, EditorError> {
        let text = form.text.trim();
        if text.is_empty() {
            return Err(EditorError::MissingText("label text"));
        }

        let defaults = &self.config.label;
        let style = LabelStyle::parse_or_default(&form.style);
        let (width, height) = style.default_size();
        let font_size = positive_or(&form.font_size, defaults.font_size as f32) as u32;
        let color = color_or(&form.color, &defaults.color)?;
        let kind = ShapeKind::Label { style };
        let (x, y) = self.tile_position(kind, placeable_count);

        let id = ids.next_label_id()?;
        Ok(
            Shape::new(id, kind, text, Rectangle::new(x, y, width, height), color)
                .with_tooltip(text)
                .with_font_size(font_size),
        )
    }

    /// Build a link between two existing, distinct shapes
    pub fn build_link(&self, form: &LinkForm, store: &GraphStore) -> Result<Link, EditorError> {
        let (source, target) = match (form.source, form.target) {
            (Some(source), Some(target)) => (source, target),
            _ => return Err(EditorError::EndpointsNotSelected),
        };
        if source == target {
            return Err(EditorError::SameEndpoints);
        }

        let source_shape = store
            .get_shape(source)
            .ok_or(EditorError::EndpointNotFound(source))?;
        let target_shape = store
            .get_shape(target)
            .ok_or(EditorError::EndpointNotFound(target))?;

        let color = color_or(&form.color, &self.config.link.color)?;

        Ok(Link::new(source, target, color)
            .with_custom_label(form.label.trim())
            .with_tooltip(link_tooltip(&source_shape.text, &target_shape.text)))
    }

    /// Top-left corner of the next shape in the 3-column tiling grid
    pub fn tile_position(&self, kind: ShapeKind, placeable_count: usize) -> (f32, f32) {
        let layout = &self.config.layout;
        let columns = layout.columns.max(1);
        let col = (placeable_count % columns) as f32;
        let row = (placeable_count / columns) as f32;

        let (origin, step) = if kind.is_label() {
            (layout.label_origin, layout.label_step)
        } else {
            (layout.node_origin, layout.node_step)
        };

        (origin.0 + col * step.0, origin.1 + row * step.1)
    }

    /// Build an imported node or label, keeping its id, size and position
    pub fn shape_from_import(&self, record: &ImportedShape, kind: ShapeKind) -> Shape {
        Shape::new(
            record.sequential_id,
            kind,
            record.text.clone(),
            Rectangle::new(record.x, record.y, record.width, record.height),
            record.color.clone(),
        )
        .with_tooltip(record.tooltip.clone().unwrap_or_default())
        .with_font_size(DEFAULT_FONT_SIZE)
    }

    /// Build an imported link, resolving endpoints by sequential id
    ///
    /// Returns `None` when either endpoint is not in the store.
    pub fn link_from_import(&self, record: &ImportedLink, store: &GraphStore) -> Option<Link> {
        let source = store.find_by_sequential_id(record.source)?;
        let target = store.find_by_sequential_id(record.target)?;

        Some(
            Link::new(source.handle, target.handle, record.color.clone())
                .with_custom_label(record.label.clone())
                .with_tooltip(record.tooltip.clone().unwrap_or_default()),
        )
    }
}

/// Leading-integer parse: `"120px"` → 120, `"abc"` → None
pub fn parse_leading_int(value: &str) -> Option<i64> {
    let trimmed = value.trim_start();
    let (sign, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };

    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end].parse::<i64>().ok().map(|n| sign * n)
}

fn positive_or(value: &str, default: f32) -> f32 {
    match parse_leading_int(value) {
        Some(n) if n > 0 => n as f32,
        _ => default,
    }
}

fn color_or(value: &str, default: &str) -> Result<String, EditorError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(default.to_string());
    }
    if !is_valid_hex_color(value) {
        return Err(EditorError::InvalidColor(value.to_string()));
    }
    Ok(value.to_string())
}
