use richdoc_core::{Alignment, Chunk, EditorSession, Line};
use std::collections::BTreeMap;

fn main() {
    let mut initial = BTreeMap::new();
    initial.insert(
        "body".to_string(),
        vec![Line::from_chunks(
            Alignment::Left,
            vec![Chunk::text("The quick brown fox")],
        )],
    );
    let mut session = EditorSession::with_slices(initial);

    // Split twice, then walk history back and forward.
    session.split_at("body", 0, 9);
    session.split_at("body", 1, 6);
    assert_eq!(session.document("body").line_count(), 3);

    let cursor = session.undo().expect("recorded cursor");
    println!("undo → cursor {:?}", cursor);
    assert_eq!(session.document("body").line_count(), 2);

    session.redo();
    assert_eq!(session.document("body").line_count(), 3);

    for key in session.changed_slices() {
        println!("changed slice: {key}");
    }
}
