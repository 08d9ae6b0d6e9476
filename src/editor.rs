use crate::event::Origin;
use crate::export::{ExportTables, WorkbookWriter, XlsxWriter};
use crate::factory::{LabelForm, LinkForm, NodeForm, ShapeFactory};
use crate::{
    EditorConfig, EditorError, EndpointSelectors, EventType, GraphStore, IdAllocator,
    ViewController,
};
use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use log::{error, info, warn};
use std::path::{Path, PathBuf};
use ulid::Ulid;

/// Severity of a status line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Success,
    Warning,
    Error,
}

/// Transient message shown after a command
#[derive(Debug, Clone, PartialEq)]
pub struct StatusMessage {
    pub text: String,
    pub kind: StatusKind,
    pub shown_at: DateTime<Utc>,
}

impl StatusMessage {
    pub fn new(kind: StatusKind, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind,
            shown_at: Utc::now(),
        }
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self::new(StatusKind::Success, text)
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self::new(StatusKind::Warning, text)
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self::new(StatusKind::Error, text)
    }

    /// Whether the message should still be on screen at `now`
    pub fn is_visible_at(&self, now: DateTime<Utc>, duration_secs: f64) -> bool {
        let duration = Duration::milliseconds((duration_secs * 1000.0) as i64);
        now >= self.shown_at && now - self.shown_at < duration
    }
}

/// A user action, as triggered by a button
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    AddNode(NodeForm),
    AddLabel(LabelForm),
    CreateLink(LinkForm),
    Export { directory: PathBuf },
    ZoomIn,
    ZoomOut,
    ResetView,
}

/// One editing session: the store plus everything that hangs off it
pub struct EditorSession {
    pub(crate) config: EditorConfig,
    pub(crate) store: GraphStore,
    pub(crate) ids: IdAllocator,
    pub(crate) view: ViewController,
    pub(crate) selectors: EndpointSelectors,
    status: Option<StatusMessage>,
    banner: Option<String>,
    writer: Box<dyn WorkbookWriter>,
}

impl EditorSession {
    pub fn new(config: EditorConfig) -> Self {
        let view = ViewController::new(&config.view);
        Self {
            config,
            store: GraphStore::new(),
            ids: IdAllocator::new(),
            view,
            selectors: EndpointSelectors::new(),
            status: None,
            banner: None,
            writer: Box::new(XlsxWriter),
        }
    }

    /// Replace the spreadsheet encoder used by exports
    pub fn with_writer(mut self, writer: Box<dyn WorkbookWriter>) -> Self {
        self.writer = writer;
        self
    }

    pub(crate) fn factory(&self) -> ShapeFactory<'_> {
        ShapeFactory::new(&self.config)
    }

    // ========== Commands ==========

    /// Add a node from form input, tiled after the existing shapes
    pub fn add_node(&mut self, form: &NodeForm) -> Result<Ulid, EditorError> {
        let count = self.store.shape_count();
        let shape = ShapeFactory::new(&self.config).build_node(form, &mut self.ids, count)?;

        info!("Adding node {} {:?}", shape.sequential_id, shape.text);
        let handle = self.store.insert_shape(shape, Origin::Interactive);
        self.selectors.refresh(&self.store);
        Ok(handle)
    }

    /// Add a label from form input
    pub fn add_label(&mut self, form: &LabelForm) -> Result<Ulid, EditorError> {
        let count = self.store.shape_count();
        let shape = ShapeFactory::new(&self.config).build_label(form, &mut self.ids, count)?;

        info!("Adding label {} {:?}", shape.sequential_id, shape.text);
        let handle = self.store.insert_shape(shape, Origin::Interactive);
        self.selectors.refresh(&self.store);
        Ok(handle)
    }

    /// Link two shapes chosen in the endpoint selectors
    pub fn create_link(&mut self, form: &LinkForm) -> Result<Ulid, EditorError> {
        let link = self.factory().build_link(form, &self.store)?;

        info!("Creating link {}", link.tooltip);
        self.store.insert_link(link, Origin::Interactive)
    }

    /// Flatten the store for export; an empty store has nothing to export
    pub fn export_tables(&self) -> Result<ExportTables, EditorError> {
        if self.store.is_empty() {
            return Err(EditorError::NothingToExport);
        }
        Ok(ExportTables::from_store(&self.store, &self.config.export))
    }

    /// Export to an explicit file path
    pub fn export_to(&mut self, path: &Path) -> Result<ExportTables, EditorError> {
        let tables = self.export_tables()?;
        self.writer
            .write(&tables, path)
            .map_err(|e| EditorError::Export(format!("{:#}", e)))?;

        info!(
            "Exported {} shapes and {} links to {}",
            tables.shape_rows(),
            tables.link_rows(),
            path.display()
        );
        self.store.log_event(EventType::Exported {
            path: path.to_path_buf(),
            shape_rows: tables.shape_rows(),
            link_rows: tables.link_rows(),
        });
        Ok(tables)
    }

    /// Export into `directory` under the configured file name
    ///
    /// A missing output directory is an environment failure and is reported
    /// before any encoding starts.
    pub fn export_to_dir(&mut self, directory: &Path) -> Result<PathBuf, EditorError> {
        if self.store.is_empty() {
            return Err(EditorError::NothingToExport);
        }
        if !directory.is_dir() {
            return Err(EditorError::Environment(format!(
                "Export directory not available: {}",
                directory.display()
            )));
        }

        let path = directory.join(&self.config.export.file_name);
        self.export_to(&path)?;
        Ok(path)
    }

    pub fn zoom_in(&mut self) {
        self.view.zoom_in();
    }

    pub fn zoom_out(&mut self) {
        self.view.zoom_out();
    }

    pub fn reset_view(&mut self) {
        self.view.reset();
    }

    /// Drag a shape to a new position
    pub fn move_shape(&mut self, handle: Ulid, x: f32, y: f32) -> Result<()> {
        self.store.move_shape(handle, x, y)
    }

    // ========== Operation boundary ==========

    /// Run a command, record the resulting status and return it
    ///
    /// Errors never escape: they become a warning or error status.
    pub fn execute(&mut self, command: Command) -> StatusMessage {
        let status = match self.run(command) {
            Ok(text) => StatusMessage::success(text),
            Err(e) if e.is_precondition() => {
                warn!("Command rejected: {}", e);
                StatusMessage::warning(e.to_string())
            }
            Err(e) if e.is_environment() => {
                error!("Environment failure: {}", e);
                self.banner = Some(e.to_string());
                StatusMessage::error(e.to_string())
            }
            Err(e) => {
                error!("Command failed: {}", e);
                StatusMessage::error(e.to_string())
            }
        };

        self.status = Some(status.clone());
        status
    }

    fn run(&mut self, command: Command) -> Result<String, EditorError> {
        match command {
            Command::AddNode(form) => {
                let handle = self.add_node(&form)?;
                Ok(format!("Node \"{}\" added successfully.", self.shape_text(handle)))
            }
            Command::AddLabel(form) => {
                let handle = self.add_label(&form)?;
                Ok(format!("Label \"{}\" added successfully.", self.shape_text(handle)))
            }
            Command::CreateLink(form) => {
                self.create_link(&form)?;
                Ok("Link created successfully.".to_string())
            }
            Command::Export { directory } => {
                let path = self.export_to_dir(&directory)?;
                self.banner = None;
                Ok(format!(
                    "Graph data exported to Excel successfully ({}).",
                    path.display()
                ))
            }
            Command::ZoomIn => {
                self.zoom_in();
                Ok(format!("Zoom: {:.0}%", self.view.scale() * 100.0))
            }
            Command::ZoomOut => {
                self.zoom_out();
                Ok(format!("Zoom: {:.0}%", self.view.scale() * 100.0))
            }
            Command::ResetView => {
                self.reset_view();
                Ok("View reset to default.".to_string())
            }
        }
    }

    fn shape_text(&self, handle: Ulid) -> &str {
        self.store
            .get_shape(handle)
            .map(|s| s.text.as_str())
            .unwrap_or_default()
    }

    /// Take down the banner once the environment was fixed, e.g. the export
    /// directory was edited
    pub fn dismiss_banner(&mut self) {
        self.banner = None;
    }

    // ========== Accessors ==========

    /// Last status, regardless of age
    pub fn status(&self) -> Option<&StatusMessage> {
        self.status.as_ref()
    }

    /// Last status if it is still within its display window
    pub fn visible_status(&self, now: DateTime<Utc>) -> Option<&StatusMessage> {
        self.status
            .as_ref()
            .filter(|s| s.is_visible_at(now, self.config.status_duration_secs))
    }

    pub fn banner(&self) -> Option<&str> {
        self.banner.as_deref()
    }

    pub fn store(&self) -> &GraphStore {
        &self.store
    }

    pub fn selectors(&self) -> &EndpointSelectors {
        &self.selectors
    }

    pub fn view(&self) -> &ViewController {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut ViewController {
        &mut self.view
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Current value of the shared id counter
    pub fn id_counter(&self) -> u64 {
        self.ids.counter()
    }
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{LabelStyle, SequentialId};
    use assert_matches::assert_matches;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Remembers what it was asked to write
    struct RecordingWriter {
        written: Rc<RefCell<Vec<(PathBuf, ExportTables)>>>,
    }

    impl WorkbookWriter for RecordingWriter {
        fn write(&self, tables: &ExportTables, path: &Path) -> Result<()> {
            self.written
                .borrow_mut()
                .push((path.to_path_buf(), tables.clone()));
            Ok(())
        }
    }

    struct FailingWriter;

    impl WorkbookWriter for FailingWriter {
        fn write(&self, _tables: &ExportTables, path: &Path) -> Result<()> {
            anyhow::bail!("disk full while writing {}", path.display())
        }
    }

    #[test]
    fn test_add_node_refreshes_selectors() {
        let mut session = EditorSession::default();
        assert_eq!(session.selectors().source_options().len(), 1);

        session.add_node(&NodeForm::text("Start")).unwrap();
        session
            .add_label(&LabelForm::text("Note", LabelStyle::Circle))
            .unwrap();

        assert_eq!(session.selectors().source_options().len(), 3);
        assert_eq!(session.selectors().target_options().len(), 3);
    }

    #[test]
    fn test_tiling_counts_labels() {
        let mut session = EditorSession::default();
        session.add_node(&NodeForm::text("A")).unwrap();
        session
            .add_label(&LabelForm::text("Note", LabelStyle::Rectangle))
            .unwrap();
        let c = session.add_node(&NodeForm::text("C")).unwrap();

        let shape = session.store().get_shape(c).unwrap();
        assert_eq!((shape.bounds.x, shape.bounds.y), (700.0, 100.0));
    }

    #[test]
    fn test_blank_node_leaves_session_unchanged() {
        let mut session = EditorSession::default();
        let status = session.execute(Command::AddNode(NodeForm::text("  ")));

        assert_eq!(status.kind, StatusKind::Warning);
        assert_eq!(status.text, "Please enter a node label");
        assert_eq!(session.store().shape_count(), 0);
        assert_eq!(session.id_counter(), 0);
        assert!(session.banner().is_none());
    }

    #[test]
    fn test_success_messages() {
        let mut session = EditorSession::default();

        let status = session.execute(Command::AddNode(NodeForm::text("Start")));
        assert_eq!(status.kind, StatusKind::Success);
        assert_eq!(status.text, "Node \"Start\" added successfully.");

        let status = session.execute(Command::AddLabel(LabelForm::text(
            "Note",
            LabelStyle::Cloud,
        )));
        assert_eq!(status.text, "Label \"Note\" added successfully.");

        let status = session.execute(Command::ResetView);
        assert_eq!(status.text, "View reset to default.");
        assert_eq!(session.status(), Some(&status));
    }

    #[test]
    fn test_create_link_rejections() {
        let mut session = EditorSession::default();
        let a = session.add_node(&NodeForm::text("A")).unwrap();

        let status = session.execute(Command::CreateLink(LinkForm::between(a, a)));
        assert_eq!(status.kind, StatusKind::Warning);
        assert_eq!(status.text, "Source and target nodes must be different");

        let status = session.execute(Command::CreateLink(LinkForm::default()));
        assert_eq!(status.text, "Please select both source and target nodes");

        let status = session.execute(Command::CreateLink(LinkForm::between(a, Ulid::new())));
        assert_eq!(status.text, "Selected nodes not found");

        assert_eq!(session.store().link_count(), 0);
    }

    #[test]
    fn test_labels_are_linkable() {
        let mut session = EditorSession::default();
        let a = session.add_node(&NodeForm::text("A")).unwrap();
        let l = session
            .add_label(&LabelForm::text("Note", LabelStyle::Ellipse))
            .unwrap();

        session.create_link(&LinkForm::between(l, a)).unwrap();
        assert_eq!(session.store().link_count(), 1);
    }

    #[test]
    fn test_export_empty_store() {
        let mut session = EditorSession::default();
        assert_matches!(session.export_tables(), Err(EditorError::NothingToExport));

        let status = session.execute(Command::Export {
            directory: PathBuf::from("."),
        });
        assert_eq!(status.kind, StatusKind::Warning);
    }

    #[test]
    fn test_export_uses_configured_file_name() {
        let written = Rc::new(RefCell::new(Vec::new()));
        let mut session = EditorSession::default().with_writer(Box::new(RecordingWriter {
            written: Rc::clone(&written),
        }));
        session.add_node(&NodeForm::text("Start")).unwrap();
        let dir = tempfile::tempdir().unwrap();

        let status = session.execute(Command::Export {
            directory: dir.path().to_path_buf(),
        });
        assert_eq!(status.kind, StatusKind::Success);

        let written = written.borrow();
        assert_eq!(written.len(), 1);
        assert_eq!(written[0].0, dir.path().join("graph_data.xlsx"));
        assert_eq!(written[0].1.shape_rows(), 1);
        assert_matches!(
            session.store().events().last().map(|e| &e.event),
            Some(EventType::Exported { shape_rows: 1, link_rows: 0, .. })
        );
    }

    #[test]
    fn test_writer_failure_becomes_error_status() {
        let mut session = EditorSession::default().with_writer(Box::new(FailingWriter));
        session.add_node(&NodeForm::text("Start")).unwrap();
        let dir = tempfile::tempdir().unwrap();

        let status = session.execute(Command::Export {
            directory: dir.path().to_path_buf(),
        });
        assert_eq!(status.kind, StatusKind::Error);
        assert!(status.text.starts_with("Failed to export to Excel"));
        assert!(session.banner().is_none());
        assert_eq!(session.store().shape_count(), 1);
    }

    #[test]
    fn test_missing_export_directory_sets_banner() {
        let written = Rc::new(RefCell::new(Vec::new()));
        let mut session = EditorSession::default().with_writer(Box::new(RecordingWriter {
            written: Rc::clone(&written),
        }));
        session.add_node(&NodeForm::text("Start")).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nowhere");

        let status = session.execute(Command::Export {
            directory: missing.clone(),
        });
        assert_eq!(status.kind, StatusKind::Error);
        assert_eq!(
            status.text,
            format!("Export directory not available: {}", missing.display())
        );
        assert_eq!(session.banner(), Some(status.text.as_str()));
        assert!(written.borrow().is_empty());
        assert_eq!(session.store().shape_count(), 1);

        // A later export that succeeds takes the banner down
        let status = session.execute(Command::Export {
            directory: dir.path().to_path_buf(),
        });
        assert_eq!(status.kind, StatusKind::Success);
        assert!(session.banner().is_none());
    }

    #[test]
    fn test_dismiss_banner() {
        let mut session = EditorSession::default();
        session.add_node(&NodeForm::text("Start")).unwrap();
        session.execute(Command::Export {
            directory: PathBuf::from("/definitely/not/here"),
        });
        assert!(session.banner().is_some());

        session.dismiss_banner();
        assert!(session.banner().is_none());
    }

    #[test]
    fn test_exhausted_ids_become_error_status() {
        let mut session = EditorSession::default();
        session.add_node_from_import(crate::ImportedShape {
            sequential_id: SequentialId::Node(u64::MAX - 1),
            text: "Near the end".into(),
            tooltip: None,
            width: 150.0,
            height: 60.0,
            color: "#1a237e".into(),
            x: 0.0,
            y: 0.0,
        });

        let status = session.execute(Command::AddNode(NodeForm::text("Last")));
        assert_eq!(status.kind, StatusKind::Success);

        let status = session.execute(Command::AddNode(NodeForm::text("One too many")));
        assert_eq!(status.kind, StatusKind::Error);
        assert_eq!(status.text, "No more shape ids available in this session");

        let status = session.execute(Command::AddLabel(LabelForm::text(
            "Also too many",
            LabelStyle::Circle,
        )));
        assert_eq!(status.kind, StatusKind::Error);
        assert_eq!(session.store().shape_count(), 2);
        assert!(session.banner().is_none());
    }

    #[test]
    fn test_status_expires() {
        let mut session = EditorSession::default();
        let status = session.execute(Command::ZoomIn);
        assert_eq!(status.text, "Zoom: 120%");

        let shown = status.shown_at;
        assert!(session.visible_status(shown).is_some());
        assert!(session
            .visible_status(shown + Duration::milliseconds(2900))
            .is_some());
        assert!(session
            .visible_status(shown + Duration::seconds(3))
            .is_none());
    }

    #[test]
    fn test_interactive_after_import_does_not_reuse_ids() {
        let mut session = EditorSession::default();
        session.add_node_from_import(crate::ImportedShape {
            sequential_id: SequentialId::Node(10),
            text: "Imported".into(),
            tooltip: None,
            width: 150.0,
            height: 60.0,
            color: "#1a237e".into(),
            x: 0.0,
            y: 0.0,
        });

        let handle = session.add_node(&NodeForm::text("Fresh")).unwrap();
        assert_eq!(
            session.store().get_shape(handle).unwrap().sequential_id,
            SequentialId::Node(11)
        );
    }
}
