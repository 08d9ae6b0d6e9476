/// Example: building a diagram, exporting it and loading it back
///
/// This example demonstrates:
/// - Adding nodes and labels through forms
/// - Linking shapes, labels included
/// - Exporting the shapes and links sheets
/// - Importing exported tables into a fresh session

use anyhow::Result;
use diagram_editor::*;

fn main() -> Result<()> {
    println!("=== Diagram Editor: Build Diagram Example ===\n");

    // Step 1: Shapes
    println!("Step 1: Adding shapes...");
    let mut session = EditorSession::default();

    let request = session.add_node(&NodeForm {
        tooltip: "Incoming HTTP request".to_string(),
        ..NodeForm::text("Request")
    })?;
    let handler = session.add_node(&NodeForm {
        width: "200".to_string(),
        color: "#00695c".to_string(),
        ..NodeForm::text("Handler")
    })?;
    let response = session.add_node(&NodeForm::text("Response"))?;
    let note = session.add_label(&LabelForm::text("Cached for 5 min", LabelStyle::Ellipse))?;

    for shape in session.store().shapes() {
        println!(
            "  ✓ {} at ({}, {})",
            shape.display_name(),
            shape.bounds.x,
            shape.bounds.y
        );
    }

    // Step 2: Links
    println!("\nStep 2: Linking...");
    session.create_link(&LinkForm::between(request, handler).labeled("route"))?;
    session.create_link(&LinkForm::between(handler, response))?;
    session.create_link(&LinkForm::between(note, response))?;
    for link in session.store().links() {
        println!("  ✓ {}", link.tooltip);
    }

    // Step 3: Export
    println!("\nStep 3: Exporting...");
    let dir = tempfile::tempdir()?;
    let path = session.export_to_dir(dir.path())?;
    println!("  ✓ Wrote {}", path.display());

    let tables = session.export_tables()?;
    println!("  Sheet '{}': {} rows", tables.shapes.name, tables.shape_rows());
    println!("  Sheet '{}': {} rows", tables.links.name, tables.link_rows());

    // Step 4: Import into a fresh session
    println!("\nStep 4: Importing into a new session...");
    let mut restored = EditorSession::default();
    let report = restored.import_tables(&tables);
    println!(
        "  ✓ {} shapes, {} links imported",
        report.shapes_imported, report.links_imported
    );

    let next = restored.add_node(&NodeForm::text("Audit log"))?;
    if let Some(shape) = restored.store().get_shape(next) {
        println!("  Next interactive id continues at {}", shape.sequential_id);
    }

    println!("\n=== Example Complete ===");
    Ok(())
}
