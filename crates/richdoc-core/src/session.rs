//! Editor Session
//!
//! An explicit session/context object wiring the pure edit transforms to
//! the history stores. The session owns one [`HistoryStore`], one
//! [`CursorHistory`], and the current selection, and is itself owned by the
//! surrounding application: one session per editing surface, one control
//! thread per session. There is no global state anywhere in the engine.
//!
//! # Example
//!
//! ```rust
//! use richdoc_core::{Chunk, EditorSession, Line};
//!
//! let mut session = EditorSession::new();
//! session.load("body", vec![Line::from_chunks(
//!     Default::default(),
//!     vec![Chunk::text("Hello World")],
//! )]);
//!
//! let cursor = session.split_at("body", 0, 5);
//! assert_eq!((cursor.line, cursor.offset), (1, 0));
//! assert_eq!(session.document("body").line_count(), 2);
//!
//! session.undo();
//! assert_eq!(session.document("body").line_count(), 1);
//! ```

use crate::cursor_history::CursorHistory;
use crate::history::HistoryStore;
use crate::model::{Cursor, Document, Line, SelectionRange};
use crate::ops::{self, EditOutcome};
use std::collections::BTreeMap;

/// Session state for one editing surface: document history, cursor history,
/// and the current selection.
#[derive(Debug, Clone)]
pub struct EditorSession {
    history: HistoryStore<Line>,
    cursors: CursorHistory<Cursor>,
    selection: Option<SelectionRange>,
}

impl EditorSession {
    /// Create a session with no content slices.
    pub fn new() -> Self {
        Self::with_slices(BTreeMap::new())
    }

    /// Create a session whose history starts from the given slices.
    pub fn with_slices(initial: BTreeMap<String, Vec<Line>>) -> Self {
        Self {
            history: HistoryStore::new(initial),
            cursors: CursorHistory::new(),
            selection: None,
        }
    }

    /// Replace the slice for `key` wholesale (initial load of a content
    /// region). Recorded as a history step like any other patch.
    pub fn load(&mut self, key: &str, lines: Vec<Line>) {
        self.history.apply_patch(key, lines, |_, lines| lines);
    }

    /// The current document for `key` (empty if the key is absent).
    pub fn document(&self, key: &str) -> Document {
        Document::from_lines(self.history.get(key).as_ref().clone())
    }

    /// Split the line at `(line, offset)` of slice `key` (Enter). Records
    /// the resulting frame and cursor; a no-op split records nothing.
    pub fn split_at(&mut self, key: &str, line: usize, offset: usize) -> Cursor {
        let document = self.document(key);
        self.commit(key, ops::split(&document, line, offset))
    }

    /// Delete one unit ending at `(line, offset)` of slice `key`
    /// (Backspace). Records the resulting frame and cursor; a no-op
    /// deletion records nothing.
    pub fn backspace(&mut self, key: &str, line: usize, offset: usize) -> Cursor {
        let document = self.document(key);
        self.commit(key, ops::delete_at(&document, line, offset))
    }

    /// Replace one line of slice `key` wholesale (the reconciler path: the
    /// host edited a line's content tree and the rebuilt chunks come back
    /// through here). Out-of-range indices are a no-op. `cursor` is the
    /// recovered anchor to record with the step, when one exists.
    ///
    /// Returns whether a history frame was pushed.
    pub fn replace_line(
        &mut self,
        key: &str,
        line_index: usize,
        line: Line,
        cursor: Option<Cursor>,
    ) -> bool {
        if line_index >= self.history.get(key).len() {
            return false;
        }
        let changed = self.history.apply_patch(key, line, |lines, line| {
            let mut next = lines.to_vec();
            next[line_index] = line;
            next
        });
        if changed {
            if let Some(cursor) = cursor {
                self.cursors.push(cursor);
                self.selection =
                    Some(SelectionRange::new(cursor.line, cursor.offset, cursor.offset));
            }
        }
        changed
    }

    fn commit(&mut self, key: &str, outcome: EditOutcome) -> Cursor {
        let cursor = outcome.cursor;
        let changed = self
            .history
            .apply_patch(key, outcome.document.lines, |_, lines| lines);
        if changed {
            self.cursors.push(cursor);
            self.selection = Some(SelectionRange::new(cursor.line, cursor.offset, cursor.offset));
        }
        cursor
    }

    /// Step document history back one frame, best-effort restoring the
    /// cursor recorded with the undone step. `None` when already at the
    /// oldest frame or no cursor was recorded for it.
    pub fn undo(&mut self) -> Option<Cursor> {
        if !self.history.undo() {
            return None;
        }
        let cursor = self.cursors.undo().copied();
        self.selection =
            cursor.map(|c| SelectionRange::new(c.line, c.offset, c.offset));
        cursor
    }

    /// Step document history forward one frame, best-effort restoring the
    /// cursor recorded with the redone step.
    pub fn redo(&mut self) -> Option<Cursor> {
        if !self.history.redo() {
            return None;
        }
        let cursor = self.cursors.redo().copied();
        self.selection =
            cursor.map(|c| SelectionRange::new(c.line, c.offset, c.offset));
        cursor
    }

    /// The current selection, if any.
    pub fn selection(&self) -> Option<SelectionRange> {
        self.selection
    }

    /// Set the current selection (host pointer/keyboard driven).
    pub fn set_selection(&mut self, selection: SelectionRange) {
        self.selection = Some(selection);
    }

    /// Clear the current selection.
    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    /// Whether an undo step is available.
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    /// Whether a redo step is available.
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Keys whose slices changed in the most recent step (for incremental
    /// re-render).
    pub fn changed_slices(&self) -> Vec<String> {
        self.history.changed_slices()
    }

    /// Whether the line at `index` of slice `key` changed in the most
    /// recent step.
    pub fn is_line_changed(&self, key: &str, index: usize) -> bool {
        self.history.is_changed(key, index)
    }

    /// Direct access to the underlying history store.
    pub fn history(&self) -> &HistoryStore<Line> {
        &self.history
    }

    /// Collapse history to its initial frame and drop cursor/selection
    /// state.
    pub fn reset(&mut self) {
        self.history.reset();
        self.cursors.clear();
        self.selection = None;
    }
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new()
    }
}
