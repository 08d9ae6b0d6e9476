use anyhow::{Context, Result};
use diagram_editor::{
    Command, EditorConfig, EditorSession, LabelForm, LabelStyle, LinkForm, NodeForm, StatusKind,
};
use std::path::{Path, PathBuf};

/// Headless run: builds a small diagram and exports it.
///
/// Usage: `diagram_editor [config.json] [output_dir]`
fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let config_path = args.next().map(PathBuf::from);
    let output_dir = args.next().map(PathBuf::from).unwrap_or_else(|| PathBuf::from("."));

    let config = EditorConfig::load_or_default(config_path.as_deref())?;

    println!("Diagram Editor - headless demo");
    println!("==============================\n");

    let mut session = EditorSession::new(config);

    let start = session.add_node(&NodeForm {
        tooltip: "Where it begins".to_string(),
        ..NodeForm::text("Start")
    })?;
    let end = session.add_node(&NodeForm::text("End"))?;
    println!("✓ Added nodes");

    let note = session.add_label(&LabelForm::text("Remember this", LabelStyle::Cloud))?;
    println!("✓ Added label");

    session.create_link(&LinkForm::between(start, end).labeled("go"))?;
    session.create_link(&LinkForm::between(note, start))?;
    println!("✓ Created links");

    // Rejections surface as statuses, not errors
    let status = session.execute(Command::CreateLink(LinkForm::between(start, start)));
    println!("  Self-link attempt: {}", status.text);

    println!("\n📊 Diagram:");
    for shape in session.store().shapes() {
        println!("  └─ {}", shape.display_name());
    }
    for link in session.store().links() {
        println!("  └─ {} ({})", link.tooltip, link.custom_label_text());
    }
    println!("  Events logged: {}", session.store().events().len());

    export(&mut session, &output_dir)?;
    Ok(())
}

fn export(session: &mut EditorSession, output_dir: &Path) -> Result<()> {
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create output directory: {}", output_dir.display()))?;

    let status = session.execute(Command::Export {
        directory: output_dir.to_path_buf(),
    });
    match status.kind {
        StatusKind::Success => println!("\n✅ {}", status.text),
        _ => println!("\n❌ {}", status.text),
    }
    Ok(())
}
