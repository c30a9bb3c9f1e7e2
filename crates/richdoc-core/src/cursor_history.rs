//! Cursor History Store
//!
//! A small bounded stack of opaque cursor-anchor values with the same
//! push/truncate-redo/cap-evict discipline as the [history
//! store](crate::HistoryStore), but unkeyed and content-unaware. It is kept
//! separate from document history because not every history step carries a
//! recorded cursor; restoration across undo/redo is best-effort.

/// Maximum number of recorded cursor anchors.
pub const CURSOR_HISTORY_CAPACITY: usize = 30;

/// Bounded undo/redo stack of cursor anchors.
#[derive(Debug, Clone)]
pub struct CursorHistory<T> {
    entries: Vec<T>,
    pointer: usize,
    capacity: usize,
}

impl<T: Clone> CursorHistory<T> {
    /// Create an empty cursor history.
    pub fn new() -> Self {
        Self::with_capacity(CURSOR_HISTORY_CAPACITY)
    }

    /// Create an empty cursor history with an explicit capacity (minimum 1).
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::new(),
            pointer: 0,
            capacity: capacity.max(1),
        }
    }

    /// Record an anchor, truncating any redo future and evicting the oldest
    /// entry at capacity (without moving the pointer off the newest entry).
    pub fn push(&mut self, value: T) {
        if self.entries.is_empty() {
            self.entries.push(value);
            self.pointer = 0;
            return;
        }
        self.entries.truncate(self.pointer + 1);
        self.entries.push(value);
        if self.entries.len() > self.capacity {
            self.entries.remove(0);
        } else {
            self.pointer += 1;
        }
    }

    /// The anchor the pointer currently denotes, if any.
    pub fn current(&self) -> Option<&T> {
        self.entries.get(self.pointer)
    }

    /// Step back one anchor. Returns the newly current anchor, or `None` at
    /// the oldest entry (pointer unchanged).
    pub fn undo(&mut self) -> Option<&T> {
        if self.pointer == 0 {
            return None;
        }
        self.pointer -= 1;
        self.entries.get(self.pointer)
    }

    /// Step forward one anchor. Returns the newly current anchor, or `None`
    /// at the newest entry (pointer unchanged).
    pub fn redo(&mut self) -> Option<&T> {
        if self.pointer + 1 >= self.entries.len() {
            return None;
        }
        self.pointer += 1;
        self.entries.get(self.pointer)
    }

    /// Number of recorded anchors.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no anchor has been recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop all recorded anchors.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.pointer = 0;
    }
}

impl<T: Clone> Default for CursorHistory<T> {
    fn default() -> Self {
        Self::new()
    }
}
