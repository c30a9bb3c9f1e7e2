use richdoc_core::{Alignment, Chunk, Cursor, Document, Line, delete_at, split};

fn main() {
    let doc = Document::from_lines(vec![Line::from_chunks(
        Alignment::Left,
        vec![Chunk::text("Hello World")],
    )]);

    // Enter in the middle of the line.
    let outcome = split(&doc, 0, 5);
    assert_eq!(outcome.document.lines[0].plain_text(), "Hello");
    assert_eq!(outcome.document.lines[1].plain_text(), " World");
    assert_eq!(outcome.cursor, Cursor::new(1, 0));

    // Backspace at the start of the new line merges it back.
    let merged = delete_at(&outcome.document, 1, 0);
    assert_eq!(merged.document, doc);
    assert_eq!(merged.cursor, Cursor::new(0, 5));

    // Backspace inside the line removes one logical unit.
    let erased = delete_at(&merged.document, 0, 5);
    assert_eq!(erased.document.lines[0].plain_text(), "Hell World");

    println!("final: {:?}", erased.document.lines[0].plain_text());
}
