//! Edit Operation Engine
//!
//! Pure, total transforms over the document model: [`split`] implements the
//! Enter key (line split at a logical offset) and [`delete_at`] implements
//! the Backspace key (single-unit deletion, or line merge at offset 0).
//!
//! Both functions take the document by reference and return a fresh
//! [`EditOutcome`]; the input is never mutated. Out-of-range positions and
//! the backspace-at-document-start case degrade to no-ops that return a
//! structurally equal document; callers detect this by equality and skip
//! downstream work.

use crate::model::{Chunk, Cursor, Document, Line};

/// Result of an edit transform: the new document plus the cursor position
/// the host should restore.
#[derive(Debug, Clone, PartialEq)]
pub struct EditOutcome {
    /// The resulting document (structurally equal to the input on a no-op).
    pub document: Document,
    /// Cursor position after the edit.
    pub cursor: Cursor,
}

impl EditOutcome {
    fn unchanged(document: &Document, line: usize, offset: usize) -> Self {
        Self {
            document: document.clone(),
            cursor: Cursor::new(line, offset),
        }
    }
}

/// Split the line at `line_index` into two lines at logical `offset`.
///
/// Chunks fully before the offset stay on the first line, chunks fully after
/// move to the second; a text chunk straddling the offset is divided into two
/// text chunks sharing its style. The new line inherits the original line's
/// alignment, and either side synthesizes one empty text chunk if it would
/// otherwise be empty. The cursor lands at the start of the new line.
///
/// Splitting "inside" an opaque chunk cannot occur: an opaque chunk has
/// logical length 1, so any integer offset falls on one of its boundaries.
pub fn split(document: &Document, line_index: usize, offset: usize) -> EditOutcome {
    let Some(line) = document.line(line_index) else {
        return EditOutcome::unchanged(document, line_index, offset);
    };

    if offset > line.len() {
        return EditOutcome::unchanged(document, line_index, offset);
    }

    let mut before: Vec<Chunk> = Vec::new();
    let mut after: Vec<Chunk> = Vec::new();
    let mut consumed = 0usize;

    for chunk in &line.chunks {
        let len = chunk.len();
        if consumed + len <= offset {
            before.push(chunk.clone());
        } else if consumed >= offset {
            after.push(chunk.clone());
        } else if let Chunk::Text { text, style } = chunk {
            let byte = byte_offset(text, offset - consumed);
            before.push(Chunk::styled_text(&text[..byte], style.clone()));
            after.push(Chunk::styled_text(&text[byte..], style.clone()));
        } else {
            // Unreachable for opaque chunks (length 1); kept total.
            after.push(chunk.clone());
        }
        consumed += len;
    }

    let mut lines = Vec::with_capacity(document.lines.len() + 1);
    lines.extend_from_slice(&document.lines[..line_index]);
    lines.push(Line::from_chunks(line.align, before));
    lines.push(Line::from_chunks(line.align, after));
    lines.extend_from_slice(&document.lines[line_index + 1..]);

    EditOutcome {
        document: Document::from_lines(lines),
        cursor: Cursor::new(line_index + 1, 0),
    }
}

/// Delete one logical unit ending at `offset` on the line at `line_index`,
/// or merge the line into its predecessor when `offset` is 0.
///
/// - `offset == 0`, `line_index > 0`: the line's chunks are concatenated
///   onto the previous line (previous alignment wins) and the line is
///   removed; the cursor lands at the previous line's prior length.
/// - `offset == 0`, `line_index == 0`: no-op.
/// - otherwise: the unit ending at `offset` is removed. A text chunk loses
///   one character (and is dropped if emptied, unless it is the line's only
///   chunk); an opaque chunk is removed whole, substituting an empty text
///   chunk if it was the line's only chunk. The cursor lands at `offset - 1`.
pub fn delete_at(document: &Document, line_index: usize, offset: usize) -> EditOutcome {
    let Some(line) = document.line(line_index) else {
        return EditOutcome::unchanged(document, line_index, offset);
    };

    if offset == 0 {
        if line_index == 0 {
            return EditOutcome::unchanged(document, 0, 0);
        }
        return merge_into_previous(document, line_index);
    }

    if offset > line.len() {
        return EditOutcome::unchanged(document, line_index, offset);
    }

    // The unit being removed is the one at logical index offset - 1.
    let position = line.locate(offset - 1);
    let mut chunks = line.chunks.clone();
    match &chunks[position.chunk_index] {
        Chunk::Text { text, style } => {
            let new_text = remove_char_at(text, position.local_offset);
            if new_text.is_empty() && chunks.len() > 1 {
                chunks.remove(position.chunk_index);
            } else {
                chunks[position.chunk_index] = Chunk::styled_text(new_text, style.clone());
            }
        }
        Chunk::Opaque { .. } => {
            chunks.remove(position.chunk_index);
        }
    }

    let mut lines = document.lines.clone();
    lines[line_index] = Line::from_chunks(line.align, chunks);

    EditOutcome {
        document: Document::from_lines(lines),
        cursor: Cursor::new(line_index, offset - 1),
    }
}

/// Merge line `line_index` onto line `line_index - 1`.
fn merge_into_previous(document: &Document, line_index: usize) -> EditOutcome {
    let previous = &document.lines[line_index - 1];
    let current = &document.lines[line_index];
    let prior_length = previous.len();

    let mut merged: Vec<Chunk> = Vec::with_capacity(previous.chunks.len() + current.chunks.len());
    for chunk in previous.chunks.iter().chain(current.chunks.iter()) {
        append_coalescing(&mut merged, chunk);
    }

    let mut lines = Vec::with_capacity(document.lines.len() - 1);
    lines.extend_from_slice(&document.lines[..line_index - 1]);
    lines.push(Line::from_chunks(previous.align, merged));
    lines.extend_from_slice(&document.lines[line_index + 1..]);

    EditOutcome {
        document: Document::from_lines(lines),
        cursor: Cursor::new(line_index - 1, prior_length),
    }
}

/// Append a chunk to an accumulating list, dropping empty text runs and
/// coalescing adjacent text runs that share a style map.
///
/// Coalescing makes `delete_at(split(d, i, o), i + 1, 0)` structurally
/// invert the split: the two halves of a divided text chunk rejoin into one.
fn append_coalescing(chunks: &mut Vec<Chunk>, chunk: &Chunk) {
    match chunk {
        Chunk::Text { text, style } => {
            if text.is_empty() {
                return;
            }
            if let Some(Chunk::Text {
                text: last_text,
                style: last_style,
            }) = chunks.last_mut()
            {
                if last_style == style {
                    last_text.push_str(text);
                    return;
                }
            }
            chunks.push(chunk.clone());
        }
        Chunk::Opaque { .. } => chunks.push(chunk.clone()),
    }
}

/// Byte index of the `chars`-th character, clamped to the string's end.
fn byte_offset(text: &str, chars: usize) -> usize {
    text.char_indices()
        .nth(chars)
        .map(|(index, _)| index)
        .unwrap_or(text.len())
}

/// The string with the character at char index `index` removed.
fn remove_char_at(text: &str, index: usize) -> String {
    text.chars()
        .enumerate()
        .filter(|(i, _)| *i != index)
        .map(|(_, ch)| ch)
        .collect()
}
