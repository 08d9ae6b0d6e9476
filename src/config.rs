use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// Editor defaults, loadable from a JSON file
///
/// Every field has a default, so a config file only needs the keys it
/// changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub node: NodeDefaults,
    pub label: LabelDefaults,
    pub link: LinkDefaults,
    pub layout: LayoutConfig,
    pub view: ViewConfig,
    pub export: ExportConfig,

    /// How long a status message stays visible
    pub status_duration_secs: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeDefaults {
    pub width: f32,
    pub height: f32,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelDefaults {
    pub color: String,
    pub font_size: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkDefaults {
    pub color: String,
}

/// Grid tiling for interactively added shapes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub columns: usize,
    pub node_origin: (f32, f32),
    pub node_step: (f32, f32),
    pub label_origin: (f32, f32),
    pub label_step: (f32, f32),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    pub zoom_in_factor: f32,
    pub zoom_out_factor: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub file_name: String,
    pub nodes_sheet: String,
    pub links_sheet: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            node: NodeDefaults::default(),
            label: LabelDefaults::default(),
            link: LinkDefaults::default(),
            layout: LayoutConfig::default(),
            view: ViewConfig::default(),
            export: ExportConfig::default(),
            status_duration_secs: 3.0,
        }
    }
}

impl Default for NodeDefaults {
    fn default() -> Self {
        Self {
            width: 150.0,
            height: 60.0,
            color: "#1a237e".to_string(),
        }
    }
}

impl Default for LabelDefaults {
    fn default() -> Self {
        Self {
            color: "#4CAF50".to_string(),
            font_size: 14,
        }
    }
}

impl Default for LinkDefaults {
    fn default() -> Self {
        Self {
            color: "#1a237e".to_string(),
        }
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            columns: 3,
            node_origin: (100.0, 100.0),
            node_step: (300.0, 150.0),
            label_origin: (200.0, 200.0),
            label_step: (250.0, 150.0),
        }
    }
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            zoom_in_factor: 1.2,
            zoom_out_factor: 0.8,
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            file_name: "graph_data.xlsx".to_string(),
            nodes_sheet: "Nodes".to_string(),
            links_sheet: "Links".to_string(),
        }
    }
}

impl EditorConfig {
    /// Load config from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open config file: {}", path.display()))?;
        let reader = BufReader::new(file);
        serde_json::from_reader(reader)
            .with_context(|| format!("Failed to parse config from: {}", path.display()))
    }

    /// Save config to a JSON file
    pub fn save(&self, path: &Path) -> Result<()> {
        let file = File::create(path)
            .with_context(|| format!("Failed to create config file: {}", path.display()))?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)
            .with_context(|| format!("Failed to write config to: {}", path.display()))?;
        Ok(())
    }

    /// Load from `path` when given, otherwise use the defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }
}
