// Diagram Editor - Core Library

pub mod color;
pub mod config;
pub mod editor;
pub mod error;
pub mod event;
pub mod export;
pub mod factory;
pub mod graph;
pub mod id_allocator;
pub mod import;
pub mod link;
pub mod selector;
pub mod shape;
pub mod ui;
pub mod view;

// Re-export main types for convenience
pub use color::ColorField;
pub use config::EditorConfig;
pub use editor::{Command, EditorSession, StatusKind, StatusMessage};
pub use error::EditorError;
pub use event::{EventType, GraphEvent, Origin};
pub use export::{CellValue, ExportTables, Table, WorkbookWriter, XlsxWriter};
pub use factory::{LabelForm, LinkForm, NodeForm, ShapeFactory};
pub use graph::GraphStore;
pub use id_allocator::IdAllocator;
pub use import::{ImportReport, ImportedLink, ImportedShape};
pub use link::Link;
pub use selector::{EndpointSelectors, SelectorOption};
pub use shape::{LabelStyle, Rectangle, SequentialId, Shape, ShapeKind};
pub use ui::DiagramEditorApp;
pub use view::ViewController;
