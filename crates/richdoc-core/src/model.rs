//! Document Model
//!
//! Passive data shapes for the chunked document: a [`Document`] is an ordered
//! sequence of [`Line`]s, and a line is an ordered sequence of [`Chunk`]s.
//! A chunk is either a styled text run or an opaque embed (image, table, ...)
//! whose payload is owned by the model and only ever re-linked by reference.
//!
//! Positions inside a line are expressed as *logical offsets*: each text
//! character counts 1, each opaque chunk counts 1, independent of rendering.
//!
//! All types here are plain nested data (JSON-compatible via serde derives)
//! and are replaced wholesale per edit, never mutated in place.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Style property map of a text run (property name → value).
pub type StyleMap = BTreeMap<String, String>;

/// Horizontal alignment of a line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    /// Left-aligned (default).
    #[default]
    Left,
    /// Centered.
    Center,
    /// Right-aligned.
    Right,
}

/// Kind of an opaque (non-text) chunk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OpaqueKind {
    /// Inline image embed.
    Image,
    /// Nested table embed.
    Table,
    /// List embed.
    List,
    /// Any other host-defined embed kind.
    Other(String),
}

/// Payload of an opaque chunk.
///
/// The payload is owned by the model and is never reconstructed from rendered
/// output; the reconciler only re-links it by `Arc` reference. `source` is
/// the identity key used by the content-predicate fallback during
/// reconciliation (for an image this is typically its media source).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpaquePayload {
    /// Content identity key (e.g. media source) for fallback resolution.
    pub source: String,
    /// Host-defined attributes carried opaquely by the model.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attrs: BTreeMap<String, String>,
}

impl OpaquePayload {
    /// Create a payload with the given identity key and no extra attributes.
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            attrs: BTreeMap::new(),
        }
    }
}

/// Smallest addressable content unit within a line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Chunk {
    /// A run of text sharing one style map.
    Text {
        /// Text content of the run.
        text: String,
        /// Style properties applied to the whole run.
        #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
        style: StyleMap,
    },
    /// A non-text embed occupying exactly one logical unit.
    Opaque {
        /// Embed kind.
        kind: OpaqueKind,
        /// Shared payload; re-linked by reference, never rebuilt.
        payload: Arc<OpaquePayload>,
    },
}

impl Chunk {
    /// Create an unstyled text chunk.
    pub fn text(text: impl Into<String>) -> Self {
        Chunk::Text {
            text: text.into(),
            style: StyleMap::new(),
        }
    }

    /// Create a styled text chunk.
    pub fn styled_text(text: impl Into<String>, style: StyleMap) -> Self {
        Chunk::Text {
            text: text.into(),
            style,
        }
    }

    /// Create an empty text chunk (the degenerate-line representation).
    pub fn empty_text() -> Self {
        Chunk::text("")
    }

    /// Create an opaque chunk from a payload.
    pub fn opaque(kind: OpaqueKind, payload: Arc<OpaquePayload>) -> Self {
        Chunk::Opaque { kind, payload }
    }

    /// Logical length of the chunk: character count for text, 1 for opaque.
    pub fn len(&self) -> usize {
        match self {
            Chunk::Text { text, .. } => text.chars().count(),
            Chunk::Opaque { .. } => 1,
        }
    }

    /// Whether this chunk contributes zero logical units.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether this is a text chunk.
    pub fn is_text(&self) -> bool {
        matches!(self, Chunk::Text { .. })
    }
}

/// One line of the document.
///
/// Invariant: a line never has zero chunks; a degenerate (visually empty)
/// line is represented by exactly one empty [`Chunk::Text`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Line {
    /// Horizontal alignment of the line.
    #[serde(default)]
    pub align: Alignment,
    /// Ordered chunk content. Never empty.
    pub chunks: Vec<Chunk>,
}

impl Line {
    /// Create an empty left-aligned line (one empty text chunk).
    pub fn new() -> Self {
        Self::from_chunks(Alignment::Left, Vec::new())
    }

    /// Create a line from chunks, enforcing the never-empty invariant.
    pub fn from_chunks(align: Alignment, chunks: Vec<Chunk>) -> Self {
        let chunks = if chunks.is_empty() {
            vec![Chunk::empty_text()]
        } else {
            chunks
        };
        Self { align, chunks }
    }

    /// Total logical length of the line (sum of chunk lengths).
    pub fn len(&self) -> usize {
        self.chunks.iter().map(Chunk::len).sum()
    }

    /// Whether the line holds no logical content.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Concatenated text content of the line's text chunks.
    ///
    /// Opaque chunks contribute nothing; useful for tests and diagnostics,
    /// not a rendering.
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        for chunk in &self.chunks {
            if let Chunk::Text { text, .. } = chunk {
                out.push_str(text);
            }
        }
        out
    }

    /// Locate the chunk containing (or ending at) the given logical offset.
    ///
    /// Returns the chunk index and the local offset within that chunk. An
    /// offset at a chunk boundary resolves to the *start* of the following
    /// chunk, except at end of line where it resolves to the end of the last
    /// chunk. Offsets past the end clamp to the end of the last chunk.
    pub fn locate(&self, offset: usize) -> ChunkPosition {
        if self.chunks.is_empty() {
            return ChunkPosition {
                chunk_index: 0,
                local_offset: 0,
            };
        }
        let mut consumed = 0usize;
        for (index, chunk) in self.chunks.iter().enumerate() {
            let len = chunk.len();
            if offset < consumed + len {
                return ChunkPosition {
                    chunk_index: index,
                    local_offset: offset - consumed,
                };
            }
            consumed += len;
        }
        let last = self.chunks.len().saturating_sub(1);
        ChunkPosition {
            chunk_index: last,
            local_offset: self.chunks[last].len(),
        }
    }
}

impl Default for Line {
    fn default() -> Self {
        Self::new()
    }
}

/// A resolved position inside a line's chunk array.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkPosition {
    /// Index of the chunk within the line.
    pub chunk_index: usize,
    /// Logical offset within that chunk.
    pub local_offset: usize,
}

/// The document: an ordered sequence of lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Ordered lines.
    pub lines: Vec<Line>,
}

impl Document {
    /// Create an empty document with a single degenerate line.
    pub fn new() -> Self {
        Self {
            lines: vec![Line::new()],
        }
    }

    /// Create a document from lines, as given.
    pub fn from_lines(lines: Vec<Line>) -> Self {
        Self { lines }
    }

    /// Number of lines.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// The line at `index`, if present.
    pub fn line(&self, index: usize) -> Option<&Line> {
        self.lines.get(index)
    }
}

/// A logical cursor position: line index plus logical offset within the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cursor {
    /// Zero-based line index.
    pub line: usize,
    /// Logical offset within the line.
    pub offset: usize,
}

impl Cursor {
    /// Create a cursor position.
    pub fn new(line: usize, offset: usize) -> Self {
        Self { line, offset }
    }
}

impl Ord for Cursor {
    fn cmp(&self, other: &Self) -> Ordering {
        self.line
            .cmp(&other.line)
            .then_with(|| self.offset.cmp(&other.offset))
    }
}

impl PartialOrd for Cursor {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A selection within a single line, in logical offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionRange {
    /// Zero-based line index.
    pub line_index: usize,
    /// Logical offset of the selection start.
    pub start_offset: usize,
    /// Logical offset of the selection end.
    pub end_offset: usize,
}

impl SelectionRange {
    /// Create a selection range.
    pub fn new(line_index: usize, start_offset: usize, end_offset: usize) -> Self {
        Self {
            line_index,
            start_offset,
            end_offset,
        }
    }

    /// The selection with start/end ordered ascending.
    pub fn normalized(&self) -> Self {
        Self {
            line_index: self.line_index,
            start_offset: self.start_offset.min(self.end_offset),
            end_offset: self.start_offset.max(self.end_offset),
        }
    }

    /// Whether the selection covers zero logical units.
    pub fn is_collapsed(&self) -> bool {
        self.start_offset == self.end_offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_lengths() {
        assert_eq!(Chunk::text("Hello").len(), 5);
        assert_eq!(Chunk::text("你好").len(), 2);
        assert_eq!(Chunk::empty_text().len(), 0);
        let payload = Arc::new(OpaquePayload::new("img.png"));
        assert_eq!(Chunk::opaque(OpaqueKind::Image, payload).len(), 1);
    }

    #[test]
    fn test_line_never_empty() {
        let line = Line::from_chunks(Alignment::Center, Vec::new());
        assert_eq!(line.chunks.len(), 1);
        assert_eq!(line.chunks[0], Chunk::empty_text());
        assert_eq!(line.align, Alignment::Center);
        assert!(line.is_empty());
    }

    #[test]
    fn test_line_len_mixes_text_and_opaque() {
        let payload = Arc::new(OpaquePayload::new("img.png"));
        let line = Line::from_chunks(
            Alignment::Left,
            vec![
                Chunk::text("ab"),
                Chunk::opaque(OpaqueKind::Image, payload),
                Chunk::text("cd"),
            ],
        );
        assert_eq!(line.len(), 5);
        assert_eq!(line.plain_text(), "abcd");
    }

    #[test]
    fn test_locate_resolves_boundaries_to_following_chunk() {
        let line = Line::from_chunks(
            Alignment::Left,
            vec![Chunk::text("ab"), Chunk::text("cd")],
        );
        assert_eq!(
            line.locate(0),
            ChunkPosition {
                chunk_index: 0,
                local_offset: 0
            }
        );
        assert_eq!(
            line.locate(2),
            ChunkPosition {
                chunk_index: 1,
                local_offset: 0
            }
        );
        // End of line: resolves to end of last chunk.
        assert_eq!(
            line.locate(4),
            ChunkPosition {
                chunk_index: 1,
                local_offset: 2
            }
        );
        // Past the end clamps.
        assert_eq!(
            line.locate(99),
            ChunkPosition {
                chunk_index: 1,
                local_offset: 2
            }
        );
    }

    #[test]
    fn test_cursor_ordering() {
        assert!(Cursor::new(0, 5) < Cursor::new(1, 0));
        assert!(Cursor::new(1, 2) < Cursor::new(1, 3));
        assert_eq!(Cursor::new(2, 2), Cursor::new(2, 2));
    }

    #[test]
    fn test_selection_normalization() {
        let sel = SelectionRange::new(0, 7, 3);
        let norm = sel.normalized();
        assert_eq!(norm.start_offset, 3);
        assert_eq!(norm.end_offset, 7);
        assert!(!norm.is_collapsed());
        assert!(SelectionRange::new(0, 4, 4).is_collapsed());
    }

    #[test]
    fn test_interchange_shape_is_plain_nested_json() {
        let payload = Arc::new(OpaquePayload::new("img.png"));
        let doc = Document::from_lines(vec![Line::from_chunks(
            Alignment::Right,
            vec![
                Chunk::text("hi"),
                Chunk::opaque(OpaqueKind::Image, payload),
            ],
        )]);
        let value = serde_json::to_value(&doc).unwrap();
        assert_eq!(value["lines"][0]["align"], "right");
        assert_eq!(value["lines"][0]["chunks"][0]["type"], "text");
        assert_eq!(value["lines"][0]["chunks"][0]["text"], "hi");
        assert_eq!(value["lines"][0]["chunks"][1]["type"], "opaque");
        assert_eq!(
            value["lines"][0]["chunks"][1]["payload"]["source"],
            "img.png"
        );
        let back: Document = serde_json::from_value(value).unwrap();
        assert_eq!(back, doc);
    }
}
