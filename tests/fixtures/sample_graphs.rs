// Helper functions to build sessions with various diagram configurations

use diagram_editor::{EditorSession, LabelForm, LabelStyle, LinkForm, NodeForm};
use ulid::Ulid;

/// Two nodes "Start" and "End" joined by a link labeled "go"
pub fn start_end_session() -> (EditorSession, Ulid, Ulid) {
    let mut session = EditorSession::default();

    let start = session.add_node(&NodeForm::text("Start")).unwrap();
    let end = session.add_node(&NodeForm::text("End")).unwrap();
    session
        .create_link(&LinkForm::between(start, end).labeled("go"))
        .unwrap();

    (session, start, end)
}

/// Nodes and labels interleaved, with links touching both kinds
///
/// Ids come out as 1, L1, 3, L3, 5.
pub fn mixed_session() -> EditorSession {
    let mut session = EditorSession::default();

    let a = session.add_node(&NodeForm::text("Alpha")).unwrap();
    let note = session
        .add_label(&LabelForm::text("Note", LabelStyle::Circle))
        .unwrap();
    let b = session
        .add_node(&NodeForm {
            tooltip: "second".to_string(),
            width: "220".to_string(),
            color: "#ff5722".to_string(),
            ..NodeForm::text("Beta")
        })
        .unwrap();
    session
        .add_label(&LabelForm::text("Cloudy", LabelStyle::Cloud))
        .unwrap();
    let c = session.add_node(&NodeForm::text("Gamma")).unwrap();

    session.create_link(&LinkForm::between(a, b)).unwrap();
    session
        .create_link(&LinkForm::between(b, c).labeled("next"))
        .unwrap();
    session.create_link(&LinkForm::between(note, a)).unwrap();

    session
}

/// A session holding `count` nodes named "N0", "N1", ...
pub fn chain_session(count: usize) -> (EditorSession, Vec<Ulid>) {
    let mut session = EditorSession::default();
    let handles: Vec<Ulid> = (0..count)
        .map(|i| session.add_node(&NodeForm::text(format!("N{}", i))).unwrap())
        .collect();

    for pair in handles.windows(2) {
        session
            .create_link(&LinkForm::between(pair[0], pair[1]))
            .unwrap();
    }

    (session, handles)
}
