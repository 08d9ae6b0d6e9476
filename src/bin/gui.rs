use diagram_editor::{DiagramEditorApp, EditorConfig};
use eframe::egui;
use std::path::PathBuf;

fn main() -> eframe::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config = match EditorConfig::load_or_default(config_path.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            log::warn!("Using default config: {:#}", e);
            EditorConfig::default()
        }
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_title("Diagram Editor"),
        ..Default::default()
    };

    eframe::run_native(
        "Diagram Editor",
        options,
        Box::new(|_cc| Ok(Box::new(DiagramEditorApp::new(config)))),
    )
}
