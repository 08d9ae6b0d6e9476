//! Flattens the store into two tables and writes them as a workbook
//!
//! Exported rows reference shapes by sequential id only; store handles
//! never leave the session.

use crate::config::ExportConfig;
use crate::{GraphStore, SequentialId, Shape};
use anyhow::{Context, Result};
use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

pub const SHAPE_HEADER: [&str; 9] = [
    "Node ID",
    "Label",
    "Notes/Tooltip",
    "Width",
    "Height",
    "Color",
    "X Position",
    "Y Position",
    "Type",
];

pub const LINK_HEADER: [&str; 5] = [
    "Source Node ID",
    "Target Node ID",
    "Color",
    "Link Label",
    "Tooltip",
];

/// Largest id a numeric cell can hold without rounding (2^53)
const MAX_EXACT_ID: f64 = 9_007_199_254_740_992.0;

/// A single spreadsheet cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CellValue {
    Text(String),
    Number(f64),
}

impl CellValue {
    /// Numeric value, parsing text cells when possible
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            CellValue::Text(s) => s.trim().parse().ok(),
        }
    }

    pub fn as_sequential_id(&self) -> Option<SequentialId> {
        match self {
            CellValue::Number(n) if (0.0..=MAX_EXACT_ID).contains(n) && n.fract() == 0.0 => {
                Some(SequentialId::Node(*n as u64))
            }
            CellValue::Number(_) => None,
            CellValue::Text(s) => s.parse().ok(),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => write!(f, "{}", s),
            CellValue::Number(n) => write!(f, "{}", n),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<f32> for CellValue {
    fn from(value: f32) -> Self {
        CellValue::Number(value as f64)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<SequentialId> for CellValue {
    fn from(id: SequentialId) -> Self {
        match id {
            SequentialId::Node(n) => CellValue::Number(n as f64),
            SequentialId::Label(_) => CellValue::Text(id.to_string()),
        }
    }
}

/// A named sheet: header row plus data rows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub name: String,
    pub header: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl Table {
    pub fn new(name: impl Into<String>, header: &[&str]) -> Self {
        Self {
            name: name.into(),
            header: header.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Vec<CellValue>) {
        self.rows.push(row);
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// The shapes and links sheets of one export
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportTables {
    pub shapes: Table,
    pub links: Table,
}

impl ExportTables {
    /// Flatten the store: nodes first, then labels, then links in store order
    pub fn from_store(store: &GraphStore, config: &ExportConfig) -> Self {
        let mut shapes = Table::new(config.nodes_sheet.clone(), &SHAPE_HEADER);
        let nodes = store.shapes().filter(|s| !s.is_label());
        let labels = store.shapes().filter(|s| s.is_label());
        for shape in nodes.chain(labels) {
            shapes.push_row(shape_row(shape));
        }

        let mut links = Table::new(config.links_sheet.clone(), &LINK_HEADER);
        for link in store.links() {
            // Links with a dangling endpoint are left out
            let (Some(source), Some(target)) =
                (store.get_shape(link.source), store.get_shape(link.target))
            else {
                continue;
            };

            links.push_row(vec![
                source.sequential_id.into(),
                target.sequential_id.into(),
                link.color.as_str().into(),
                link.custom_label_text().into(),
                link.tooltip.as_str().into(),
            ]);
        }

        Self { shapes, links }
    }

    pub fn shape_rows(&self) -> usize {
        self.shapes.row_count()
    }

    pub fn link_rows(&self) -> usize {
        self.links.row_count()
    }
}

fn shape_row(shape: &Shape) -> Vec<CellValue> {
    vec![
        shape.sequential_id.into(),
        shape.text.as_str().into(),
        shape.tooltip.as_str().into(),
        shape.bounds.width.into(),
        shape.bounds.height.into(),
        shape.fill_color.as_str().into(),
        shape.bounds.x.into(),
        shape.bounds.y.into(),
        shape.kind_name().into(),
    ]
}

/// Spreadsheet encoder the export is handed to
pub trait WorkbookWriter {
    /// Write both tables to `path`, one sheet each, in the order shapes, links
    fn write(&self, tables: &ExportTables, path: &Path) -> Result<()>;
}

/// `.xlsx` encoder backed by rust_xlsxwriter
#[derive(Debug, Clone, Copy, Default)]
pub struct XlsxWriter;

impl XlsxWriter {
    fn build_workbook(tables: &ExportTables) -> Result<Workbook, XlsxError> {
        let mut workbook = Workbook::new();
        let header_format = Format::new().set_bold();

        for table in [&tables.shapes, &tables.links] {
            let sheet = workbook.add_worksheet();
            fill_sheet(sheet, table, &header_format)?;
        }

        Ok(workbook)
    }

    /// Encode to memory instead of a file
    pub fn to_buffer(&self, tables: &ExportTables) -> Result<Vec<u8>> {
        let mut workbook =
            Self::build_workbook(tables).context("Failed to build export workbook")?;
        workbook
            .save_to_buffer()
            .context("Failed to encode export workbook")
    }
}

impl WorkbookWriter for XlsxWriter {
    fn write(&self, tables: &ExportTables, path: &Path) -> Result<()> {
        let mut workbook =
            Self::build_workbook(tables).context("Failed to build export workbook")?;
        workbook
            .save(path)
            .with_context(|| format!("Failed to write workbook: {}", path.display()))
    }
}

fn fill_sheet(sheet: &mut Worksheet, table: &Table, header_format: &Format) -> Result<(), XlsxError> {
    sheet.set_name(table.name.as_str())?;

    for (col, title) in table.header.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, title.as_str(), header_format)?;
    }

    for (i, row) in table.rows.iter().enumerate() {
        let row_num = (i + 1) as u32;
        for (col, cell) in row.iter().enumerate() {
            match cell {
                CellValue::Text(s) => sheet.write_string(row_num, col as u16, s.as_str())?,
                CellValue::Number(n) => sheet.write_number(row_num, col as u16, *n)?,
            };
        }
    }

    Ok(())
}
