#![warn(missing_docs)]
//! Richdoc Core - Headless Rich-Document Editing Engine
//!
//! # Overview
//!
//! `richdoc-core` is the document-editing engine beneath a rich-text
//! surface. It owns the chunked line/document model, the deterministic edit
//! transforms for Enter and Backspace, the reconciliation algorithm that
//! rebuilds a line from an externally-edited content tree, a frame-based
//! multi-slice undo/redo history, and the logical-grid range-selection
//! algorithm for merged/nested tables. It does not render, transport, or
//! wire input events; hosts supply positions, content trees, and cell
//! handles through narrow interfaces and consume plain data back.
//!
//! # Core Features
//!
//! - **Chunked Model**: lines of text runs and opaque embeds, addressed by
//!   logical offsets independent of rendering
//! - **Pure Edit Transforms**: total `split`/`delete_at` functions, no-op on
//!   precondition violations, inputs never mutated
//! - **Content Reconciliation**: rebuild chunks from a host tree, re-link
//!   opaque payloads by reference, always recover a cursor anchor
//! - **Frame History**: keyed copy-on-write snapshots, bounded eviction
//!   that keeps the pointer on the newest frame
//! - **Table Selection**: 2-D grid reconstruction under row/column spans,
//!   rectangular range queries, nested-table drag resolution
//!
//! # Architecture Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  Editor Session (context object)            │  ← Public API
//! ├──────────────────────┬──────────────────────┤
//! │  History Store       │  Cursor History      │  ← Undo/Redo State
//! ├──────────────────────┴──────────────────────┤
//! │  Edit Ops │ Reconciler │ Table Grid         │  ← Algorithms
//! ├─────────────────────────────────────────────┤
//! │  Document Model (Document → Line → Chunk)   │  ← Data Shapes
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use richdoc_core::{delete_at, split, Chunk, Cursor, Document, Line};
//!
//! let doc = Document::from_lines(vec![Line::from_chunks(
//!     Default::default(),
//!     vec![Chunk::text("Hello World")],
//! )]);
//!
//! // Enter at offset 5.
//! let outcome = split(&doc, 0, 5);
//! assert_eq!(outcome.document.lines[0].plain_text(), "Hello");
//! assert_eq!(outcome.document.lines[1].plain_text(), " World");
//! assert_eq!(outcome.cursor, Cursor::new(1, 0));
//!
//! // Backspace at the start of the new line merges back.
//! let merged = delete_at(&outcome.document, 1, 0);
//! assert_eq!(merged.document, doc);
//! ```
//!
//! # Module Description
//!
//! - [`model`] - Document / Line / Chunk data shapes and logical offsets
//! - [`ops`] - pure Enter/Backspace transforms
//! - [`reconcile`] - content-tree reconciliation and anchor recovery
//! - [`history`] - keyed frame-based undo/redo store
//! - [`cursor_history`] - bounded cursor-anchor stack
//! - [`grid`] - logical table grid and drag-selection resolution
//! - [`session`] - explicit session/context object owning the stores
//!
//! # Concurrency
//!
//! Single-threaded, cooperative, synchronous throughout. Every operation is
//! a pure function or a `&mut self` state transition; one store instance
//! per editing session, no internal locking.

pub mod cursor_history;
pub mod grid;
pub mod history;
pub mod model;
pub mod ops;
pub mod reconcile;
pub mod session;

pub use cursor_history::{CURSOR_HISTORY_CAPACITY, CursorHistory};
pub use grid::{LogicalGrid, TableHost, select_table_range};
pub use history::{HISTORY_CAPACITY, HistoryStore};
pub use model::{
    Alignment, Chunk, ChunkPosition, Cursor, Document, Line, OpaqueKind, OpaquePayload,
    SelectionRange, StyleMap,
};
pub use ops::{EditOutcome, delete_at, split};
pub use reconcile::{
    CHUNK_INDEX_ATTR, ContentTree, ReconcileAnchor, ReconcileOutcome, SOURCE_ATTR, TreeAnchor,
    reconcile_line, two_stage_resolve,
};
pub use session::EditorSession;
