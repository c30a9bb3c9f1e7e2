//! History Store
//!
//! Keyed, frame-based undo/redo over slices of document state.
//!
//! # Overview
//!
//! A *frame* is one full snapshot of every content slice (contentKey →
//! line sequence) at a point in edit history. Frames share unchanged slices
//! by `Arc` reference, so pushing a frame that changes one slice costs one
//! map clone plus one new `Arc` (copy-on-write by construction). The store
//! keeps an ordered frame list plus a pointer: `frames[0..=pointer]` is the
//! past and present, `frames[pointer + 1..]` is the redo future.
//!
//! Every operation is total: absent keys degrade to empty slices, undo/redo
//! at a bound and patches whose reducer output equals the current slice are
//! no-ops. When the frame list would exceed [`HISTORY_CAPACITY`], the oldest
//! frame is evicted *without* moving the pointer: the eviction and the
//! withheld increment cancel, so the pointer still denotes the newest frame.
//!
//! # Example
//!
//! ```rust
//! use richdoc_core::HistoryStore;
//! use std::collections::BTreeMap;
//!
//! let mut initial = BTreeMap::new();
//! initial.insert("body".to_string(), vec![1, 2, 3]);
//! let mut store = HistoryStore::new(initial);
//!
//! store.apply_patch("body", 4, |slice, value| {
//!     let mut next = slice.to_vec();
//!     next.push(value);
//!     next
//! });
//! assert_eq!(*store.get("body"), vec![1, 2, 3, 4]);
//!
//! store.undo();
//! assert_eq!(*store.get("body"), vec![1, 2, 3]);
//! store.redo();
//! assert_eq!(*store.get("body"), vec![1, 2, 3, 4]);
//! ```

use std::collections::BTreeMap;
use std::sync::Arc;

/// Maximum number of resident frames.
pub const HISTORY_CAPACITY: usize = 50;

/// One full snapshot of all content slices: contentKey → shared sequence.
type Frame<L> = BTreeMap<String, Arc<Vec<L>>>;

/// Keyed, frame-based undo/redo store.
///
/// `L` is the element type of a slice (a [`Line`](crate::Line) in the
/// editing application). Exclusive single-thread access per instance is
/// assumed; `&mut self` receivers encode this.
#[derive(Debug, Clone)]
pub struct HistoryStore<L> {
    initial: Frame<L>,
    frames: Vec<Frame<L>>,
    pointer: usize,
    capacity: usize,
}

impl<L: Clone + PartialEq> HistoryStore<L> {
    /// Create a store whose single starting frame is a copy of
    /// `initial_slices`, with the pointer on it.
    pub fn new(initial_slices: BTreeMap<String, Vec<L>>) -> Self {
        Self::with_capacity(initial_slices, HISTORY_CAPACITY)
    }

    /// Create a store with an explicit frame capacity (minimum 1).
    pub fn with_capacity(initial_slices: BTreeMap<String, Vec<L>>, capacity: usize) -> Self {
        let initial: Frame<L> = initial_slices
            .into_iter()
            .map(|(key, slice)| (key, Arc::new(slice)))
            .collect();
        Self {
            frames: vec![initial.clone()],
            initial,
            pointer: 0,
            capacity: capacity.max(1),
        }
    }

    /// The slice for `key` in the current frame, or an empty sequence if the
    /// key is absent. Never fails. The returned slice must be treated as
    /// immutable; derive a new sequence and push it through
    /// [`apply_patch`](Self::apply_patch) instead.
    pub fn get(&self, key: &str) -> Arc<Vec<L>> {
        self.frames[self.pointer]
            .get(key)
            .cloned()
            .unwrap_or_default()
    }

    /// Reduce the current slice for `key` with `patch` and push the result
    /// as a new frame.
    ///
    /// If the reducer output is deep-equal to the current slice this is a
    /// no-op and history does not grow. Otherwise any redo future is
    /// truncated, a new frame (current frame with `key` replaced) is pushed,
    /// and the oldest frame is evicted if the capacity is exceeded.
    ///
    /// Returns whether a frame was pushed.
    pub fn apply_patch<P, F>(&mut self, key: &str, patch: P, reducer: F) -> bool
    where
        F: FnOnce(&[L], P) -> Vec<L>,
    {
        let current = self.get(key);
        let candidate = reducer(&current, patch);
        if *current == candidate {
            return false;
        }

        self.frames.truncate(self.pointer + 1);
        let mut frame = self.frames[self.pointer].clone();
        frame.insert(key.to_string(), Arc::new(candidate));
        self.frames.push(frame);

        if self.frames.len() > self.capacity {
            // Eviction cancels the pointer increment: the pointer already
            // denotes the newest frame after remove(0).
            self.frames.remove(0);
        } else {
            self.pointer += 1;
        }
        true
    }

    /// Move the pointer one frame into the past. No-op at the oldest frame.
    /// Returns whether the pointer moved.
    pub fn undo(&mut self) -> bool {
        if self.pointer == 0 {
            return false;
        }
        self.pointer -= 1;
        true
    }

    /// Move the pointer one frame into the future. No-op at the newest
    /// frame. Returns whether the pointer moved.
    pub fn redo(&mut self) -> bool {
        if self.pointer + 1 >= self.frames.len() {
            return false;
        }
        self.pointer += 1;
        true
    }

    /// Whether [`undo`](Self::undo) would move the pointer.
    pub fn can_undo(&self) -> bool {
        self.pointer > 0
    }

    /// Whether [`redo`](Self::redo) would move the pointer.
    pub fn can_redo(&self) -> bool {
        self.pointer + 1 < self.frames.len()
    }

    /// Number of resident frames.
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Index of the current frame.
    pub fn pointer(&self) -> usize {
        self.pointer
    }

    /// Whether the element at `index` of slice `key` differs between the
    /// previous frame and the current one.
    ///
    /// Used for incremental re-render decisions. With no previous frame
    /// (pointer at 0) nothing is reported changed.
    pub fn is_changed(&self, key: &str, index: usize) -> bool {
        let Some(previous) = self.pointer.checked_sub(1) else {
            return false;
        };
        let before = self.frames[previous].get(key).and_then(|s| s.get(index));
        let after = self.frames[self.pointer].get(key).and_then(|s| s.get(index));
        before != after
    }

    /// Keys whose slices differ between the previous frame and the current
    /// one, in key order. Empty when the pointer is at the oldest frame.
    pub fn changed_slices(&self) -> Vec<String> {
        let Some(previous) = self.pointer.checked_sub(1) else {
            return Vec::new();
        };
        let before = &self.frames[previous];
        let after = &self.frames[self.pointer];

        let mut keys: Vec<&String> = before.keys().chain(after.keys()).collect();
        keys.sort();
        keys.dedup();

        keys.into_iter()
            .filter(|key| {
                match (before.get(*key), after.get(*key)) {
                    // Shared reference: unchanged without a deep compare.
                    (Some(a), Some(b)) => !Arc::ptr_eq(a, b) && a != b,
                    (None, None) => false,
                    _ => true,
                }
            })
            .cloned()
            .collect()
    }

    /// Collapse history to a single frame holding a copy of the original
    /// initial slices, pointer on it.
    pub fn reset(&mut self) {
        self.frames = vec![self.initial.clone()];
        self.pointer = 0;
    }
}
