//! Bulk loading of shapes and links that already carry sequential ids
//!
//! Import never fails as a whole: rows that cannot be applied are skipped
//! with a warning and the rest carry on.

use crate::event::Origin;
use crate::export::{CellValue, ExportTables};
use crate::{EditorSession, LabelStyle, SequentialId, ShapeKind};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use ulid::Ulid;

/// A node or label row as it comes out of a spreadsheet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportedShape {
    pub sequential_id: SequentialId,
    pub text: String,
    pub tooltip: Option<String>,
    pub width: f32,
    pub height: f32,
    pub color: String,
    pub x: f32,
    pub y: f32,
}

/// A link row, endpoints given by sequential id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportedLink {
    pub source: SequentialId,
    pub target: SequentialId,
    pub color: String,
    pub label: String,
    pub tooltip: Option<String>,
}

/// Counts from a table-driven import
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub shapes_imported: usize,
    pub shapes_skipped: usize,
    pub links_imported: usize,
    pub links_skipped: usize,
}

impl ImportedShape {
    /// Parse a row laid out like the export's shapes sheet
    ///
    /// Returns the record and whether the Type column (or, when it is
    /// missing or unknown, the id prefix) marks the row as a label.
    pub fn from_row(row: &[CellValue]) -> Option<(Self, bool)> {
        let text_at = |i: usize| row.get(i).map(|c| c.to_string()).unwrap_or_default();
        let number_at = |i: usize| row.get(i).and_then(CellValue::as_f64).map(|n| n as f32);

        let sequential_id = row.first()?.as_sequential_id()?;
        let tooltip = text_at(2);
        let record = Self {
            sequential_id,
            text: text_at(1),
            tooltip: (!tooltip.is_empty()).then_some(tooltip),
            width: number_at(3)?,
            height: number_at(4)?,
            color: text_at(5),
            x: number_at(6)?,
            y: number_at(7)?,
        };

        let is_label = match row.get(8).map(|c| c.to_string()) {
            Some(kind) if kind.eq_ignore_ascii_case("label") => true,
            Some(kind) if kind.eq_ignore_ascii_case("node") => false,
            _ => sequential_id.is_label(),
        };

        Some((record, is_label))
    }
}

impl ImportedLink {
    /// Parse a row laid out like the export's links sheet
    pub fn from_row(row: &[CellValue]) -> Option<Self> {
        let text_at = |i: usize| row.get(i).map(|c| c.to_string()).unwrap_or_default();
        let tooltip = text_at(4);

        Some(Self {
            source: row.first()?.as_sequential_id()?,
            target: row.get(1)?.as_sequential_id()?,
            color: text_at(2),
            label: text_at(3),
            tooltip: (!tooltip.is_empty()).then_some(tooltip),
        })
    }
}

impl EditorSession {
    /// Add a node with a pre-existing id, size and position
    pub fn add_node_from_import(&mut self, record: ImportedShape) -> Option<Ulid> {
        self.import_shape(record, ShapeKind::Node)
    }

    /// Add a label with a pre-existing id; imported labels are rectangles
    pub fn add_label_from_import(&mut self, record: ImportedShape) -> Option<Ulid> {
        self.import_shape(
            record,
            ShapeKind::Label {
                style: LabelStyle::Rectangle,
            },
        )
    }

    /// Add a link whose endpoints are looked up by sequential id
    pub fn create_link_from_import(&mut self, record: ImportedLink) -> Option<Ulid> {
        let Some(link) = self.factory().link_from_import(&record, &self.store) else {
            warn!(
                "Could not find source or target elements for link: {} -> {}",
                record.source, record.target
            );
            return None;
        };

        match self.store.insert_link(link, Origin::Import) {
            Ok(handle) => Some(handle),
            Err(e) => {
                warn!(
                    "Skipping imported link {} -> {}: {}",
                    record.source, record.target, e
                );
                None
            }
        }
    }

    /// Feed every row of previously exported tables through the import
    /// entry points: all shapes first, then links
    pub fn import_tables(&mut self, tables: &ExportTables) -> ImportReport {
        let mut report = ImportReport::default();

        for (i, row) in tables.shapes.rows.iter().enumerate() {
            let imported = match ImportedShape::from_row(row) {
                Some((record, true)) => self.add_label_from_import(record),
                Some((record, false)) => self.add_node_from_import(record),
                None => {
                    warn!("Skipping malformed shape row {}", i + 2);
                    None
                }
            };
            match imported {
                Some(_) => report.shapes_imported += 1,
                None => report.shapes_skipped += 1,
            }
        }

        for (i, row) in tables.links.rows.iter().enumerate() {
            let imported = match ImportedLink::from_row(row) {
                Some(record) => self.create_link_from_import(record),
                None => {
                    warn!("Skipping malformed link row {}", i + 2);
                    None
                }
            };
            match imported {
                Some(_) => report.links_imported += 1,
                None => report.links_skipped += 1,
            }
        }

        info!(
            "Imported {} shapes ({} skipped) and {} links ({} skipped)",
            report.shapes_imported,
            report.shapes_skipped,
            report.links_imported,
            report.links_skipped
        );
        report
    }

    fn import_shape(&mut self, record: ImportedShape, kind: ShapeKind) -> Option<Ulid> {
        if self.store.contains_sequential_id(record.sequential_id) {
            warn!(
                "Skipping imported {} {}: id already in use",
                kind.name(),
                record.sequential_id
            );
            return None;
        }

        if kind.is_label() != record.sequential_id.is_label() {
            warn!(
                "Skipping imported {} {}: id belongs to the other namespace",
                kind.name(),
                record.sequential_id
            );
            return None;
        }
        if !self.ids.observe(record.sequential_id) {
            warn!(
                "Skipping imported {} {}: id is out of range",
                kind.name(),
                record.sequential_id
            );
            return None;
        }

        let shape = self.factory().shape_from_import(&record, kind);
        let handle = self.store.insert_shape(shape, Origin::Import);
        self.selectors.refresh(&self.store);
        Some(handle)
    }
}
