//! Content Reconciler
//!
//! Rebuilds one line's chunk array from a host content tree that was edited
//! in place (typing, IME composition, paste), preserving opaque chunks and
//! recovering a cursor anchor.
//!
//! The host tree is abstracted behind the [`ContentTree`] capability trait
//! (`children` / `is_text_segment` / `text` / `attribute` / `same_node`), so
//! the algorithm is tree-shape-agnostic and testable against a synthetic
//! in-memory tree.
//!
//! Opaque chunks are never rebuilt from rendered output. A marker node in
//! the tree carries the stable [`CHUNK_INDEX_ATTR`] attribute; the marker is
//! resolved against the previous chunk array by position first, then by
//! content predicate (matching the payload's `source` against
//! [`SOURCE_ATTR`]) as a fallback, and the recovered chunk is appended by
//! `Arc` reference.

use crate::model::{Chunk, StyleMap};

/// Marker attribute naming the chunk index a non-text node stands in for.
pub const CHUNK_INDEX_ATTR: &str = "data-chunk-index";

/// Marker attribute carrying the content identity key used for fallback
/// resolution when the positional match fails.
pub const SOURCE_ATTR: &str = "data-source";

/// Minimal host-tree capability surface consumed by the reconciler.
pub trait ContentTree {
    /// Opaque node handle.
    type Node: Clone;

    /// Direct children of `node`, in order.
    fn children(&self, node: &Self::Node) -> Vec<Self::Node>;

    /// Whether `node` bears text content.
    fn is_text_segment(&self, node: &Self::Node) -> bool;

    /// Text content of a text-bearing node.
    fn text(&self, node: &Self::Node) -> String;

    /// Value of attribute `key` on `node`, if present.
    fn attribute(&self, node: &Self::Node, key: &str) -> Option<String>;

    /// Whether two handles refer to the same tree node.
    fn same_node(&self, a: &Self::Node, b: &Self::Node) -> bool;
}

/// Host-reported cursor location inside the tree being reconciled.
#[derive(Debug, Clone)]
pub struct TreeAnchor<N> {
    /// The node the host reports the cursor in.
    pub node: N,
    /// Character offset local to that node.
    pub offset: usize,
}

/// Recovered cursor position expressed against the rebuilt chunk array.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconcileAnchor {
    /// Line the reconciled chunks belong to (as supplied by the caller).
    pub line_index: usize,
    /// Index of the chunk holding the cursor.
    pub chunk_index: usize,
    /// Character offset within that chunk.
    pub offset: usize,
}

/// Result of reconciling one line.
#[derive(Debug, Clone)]
pub struct ReconcileOutcome {
    /// The rebuilt chunk array (never empty).
    pub chunks: Vec<Chunk>,
    /// Recovered cursor anchor, or `None` when there is no text chunk to
    /// fall back to.
    pub anchor: Option<ReconcileAnchor>,
}

/// Rebuild the chunk array for line `line_index` from the host tree rooted
/// at `root`, using `previous` to re-link opaque chunks.
///
/// Consecutive text-bearing children accumulate into one text buffer; each
/// marker node flushes the buffer into a text chunk and appends the resolved
/// previous opaque chunk (markers that resolve to nothing are dropped). If
/// the host anchor was not seen during traversal and the final chunk is a
/// text chunk, the anchor defaults to its end so the cursor always remains
/// restorable.
pub fn reconcile_line<T: ContentTree>(
    tree: &T,
    root: &T::Node,
    line_index: usize,
    previous: &[Chunk],
    anchor: Option<&TreeAnchor<T::Node>>,
) -> ReconcileOutcome {
    let mut chunks: Vec<Chunk> = Vec::new();
    let mut buffer = String::new();
    let mut pending: Option<(usize, usize)> = None;

    for child in tree.children(root) {
        if tree.is_text_segment(&child) {
            if let Some(anchor) = anchor {
                if tree.same_node(&child, &anchor.node) {
                    pending = Some((chunks.len(), buffer.chars().count() + anchor.offset));
                }
            }
            buffer.push_str(&tree.text(&child));
            continue;
        }

        let Some(index_attr) = tree.attribute(&child, CHUNK_INDEX_ATTR) else {
            // Non-text node without a marker attribute carries no content.
            continue;
        };
        flush_buffer(&mut chunks, &mut buffer, previous);

        let index = index_attr.parse::<usize>().ok();
        let source = tree.attribute(&child, SOURCE_ATTR);
        let resolved = two_stage_resolve(
            previous,
            index,
            |chunk| !chunk.is_text(),
            |chunk| match (chunk, source.as_deref()) {
                (Chunk::Opaque { payload, .. }, Some(source)) => payload.source == source,
                _ => false,
            },
        );
        if let Some(chunk) = resolved {
            chunks.push(chunk.clone());
        }
    }
    flush_buffer(&mut chunks, &mut buffer, previous);

    if chunks.is_empty() {
        chunks.push(Chunk::empty_text());
    }

    let anchor = pending
        .map(|(chunk_index, offset)| ReconcileAnchor {
            line_index,
            chunk_index,
            offset,
        })
        .or_else(|| match chunks.last() {
            Some(last @ Chunk::Text { .. }) => Some(ReconcileAnchor {
                line_index,
                chunk_index: chunks.len() - 1,
                offset: last.len(),
            }),
            _ => None,
        });

    ReconcileOutcome { chunks, anchor }
}

/// Flush the accumulated text buffer into a text chunk.
///
/// The host tree carries no style information at this interface, so the new
/// chunk inherits the style of the positionally corresponding previous text
/// chunk when one exists.
fn flush_buffer(chunks: &mut Vec<Chunk>, buffer: &mut String, previous: &[Chunk]) {
    if buffer.is_empty() {
        return;
    }
    let style = match previous.get(chunks.len()) {
        Some(Chunk::Text { style, .. }) => style.clone(),
        _ => StyleMap::new(),
    };
    chunks.push(Chunk::styled_text(std::mem::take(buffer), style));
}

/// Two-stage item resolution: exact positional match first, then a
/// predicate-based scan as fallback.
///
/// `is_candidate` gates both stages (for chunk resolution: only opaque
/// chunks may be recovered); `predicate` is the content fallback.
pub fn two_stage_resolve<T>(
    items: &[T],
    index: Option<usize>,
    is_candidate: impl Fn(&T) -> bool,
    predicate: impl Fn(&T) -> bool,
) -> Option<&T> {
    if let Some(index) = index {
        if let Some(item) = items.get(index) {
            if is_candidate(item) {
                return Some(item);
            }
        }
    }
    items.iter().find(|item| is_candidate(item) && predicate(item))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{OpaqueKind, OpaquePayload};
    use std::sync::Arc;

    /// Synthetic one-level content tree: the root's children are the nodes,
    /// addressed by their position in `nodes`.
    struct FakeTree {
        nodes: Vec<FakeNode>,
    }

    #[derive(Clone)]
    enum FakeNode {
        Text(String),
        Marker {
            index: Option<usize>,
            source: Option<String>,
        },
        Noise,
    }

    /// Root handle for [`FakeTree`].
    const ROOT: usize = usize::MAX;

    impl ContentTree for FakeTree {
        type Node = usize;

        fn children(&self, node: &usize) -> Vec<usize> {
            if *node == ROOT {
                (0..self.nodes.len()).collect()
            } else {
                Vec::new()
            }
        }

        fn is_text_segment(&self, node: &usize) -> bool {
            matches!(self.nodes.get(*node), Some(FakeNode::Text(_)))
        }

        fn text(&self, node: &usize) -> String {
            match self.nodes.get(*node) {
                Some(FakeNode::Text(text)) => text.clone(),
                _ => String::new(),
            }
        }

        fn attribute(&self, node: &usize, key: &str) -> Option<String> {
            match self.nodes.get(*node) {
                Some(FakeNode::Marker { index, source }) => match key {
                    CHUNK_INDEX_ATTR => index.map(|i| i.to_string()),
                    SOURCE_ATTR => source.clone(),
                    _ => None,
                },
                _ => None,
            }
        }

        fn same_node(&self, a: &usize, b: &usize) -> bool {
            a == b
        }
    }

    fn opaque_chunk(source: &str) -> Chunk {
        Chunk::opaque(OpaqueKind::Image, Arc::new(OpaquePayload::new(source)))
    }

    fn payload_of(chunk: &Chunk) -> &Arc<OpaquePayload> {
        match chunk {
            Chunk::Opaque { payload, .. } => payload,
            _ => panic!("expected opaque chunk"),
        }
    }

    #[test]
    fn test_rebuilds_plain_text_with_default_end_anchor() {
        let tree = FakeTree {
            nodes: vec![
                FakeNode::Text("Hel".into()),
                FakeNode::Text("lo".into()),
            ],
        };
        let outcome = reconcile_line(&tree, &ROOT, 0, &[], None);
        assert_eq!(outcome.chunks, vec![Chunk::text("Hello")]);
        assert_eq!(
            outcome.anchor,
            Some(ReconcileAnchor {
                line_index: 0,
                chunk_index: 0,
                offset: 5
            })
        );
    }

    #[test]
    fn test_anchor_accumulates_across_merged_text_segments() {
        let tree = FakeTree {
            nodes: vec![
                FakeNode::Text("ab".into()),
                FakeNode::Text("cd".into()),
            ],
        };
        // Cursor in the second segment at local offset 1 → "ab" + 1 = 3.
        let anchor = TreeAnchor { node: 1, offset: 1 };
        let outcome = reconcile_line(&tree, &ROOT, 2, &[], Some(&anchor));
        assert_eq!(
            outcome.anchor,
            Some(ReconcileAnchor {
                line_index: 2,
                chunk_index: 0,
                offset: 3
            })
        );
    }

    #[test]
    fn test_preserves_opaque_chunk_by_reference() {
        let previous = vec![Chunk::text("ab"), opaque_chunk("img.png")];
        let tree = FakeTree {
            nodes: vec![
                FakeNode::Text("ab".into()),
                FakeNode::Marker {
                    index: Some(1),
                    source: None,
                },
            ],
        };
        let outcome = reconcile_line(&tree, &ROOT, 0, &previous, None);
        assert_eq!(outcome.chunks.len(), 2);
        assert_eq!(outcome.chunks[0], Chunk::text("ab"));
        assert!(Arc::ptr_eq(
            payload_of(&outcome.chunks[1]),
            payload_of(&previous[1])
        ));
    }

    #[test]
    fn test_falls_back_to_source_match_when_position_moved() {
        // The host edited text before the marker, shifting its position.
        let previous = vec![opaque_chunk("a.png"), opaque_chunk("b.png")];
        let tree = FakeTree {
            nodes: vec![
                FakeNode::Text("new".into()),
                FakeNode::Marker {
                    index: Some(7),
                    source: Some("b.png".into()),
                },
            ],
        };
        let outcome = reconcile_line(&tree, &ROOT, 0, &previous, None);
        assert_eq!(outcome.chunks.len(), 2);
        assert!(Arc::ptr_eq(
            payload_of(&outcome.chunks[1]),
            payload_of(&previous[1])
        ));
    }

    #[test]
    fn test_unresolvable_marker_is_dropped() {
        let previous = vec![Chunk::text("ab")];
        let tree = FakeTree {
            nodes: vec![
                FakeNode::Text("ab".into()),
                FakeNode::Marker {
                    index: Some(3),
                    source: Some("gone.png".into()),
                },
            ],
        };
        let outcome = reconcile_line(&tree, &ROOT, 0, &previous, None);
        assert_eq!(outcome.chunks, vec![Chunk::text("ab")]);
    }

    #[test]
    fn test_trailing_text_flushes_after_marker() {
        let previous = vec![opaque_chunk("img.png")];
        let tree = FakeTree {
            nodes: vec![
                FakeNode::Marker {
                    index: Some(0),
                    source: None,
                },
                FakeNode::Text("tail".into()),
            ],
        };
        let outcome = reconcile_line(&tree, &ROOT, 0, &previous, None);
        assert_eq!(outcome.chunks.len(), 2);
        assert_eq!(outcome.chunks[1], Chunk::text("tail"));
        // Default anchor lands at the end of the trailing text chunk.
        assert_eq!(
            outcome.anchor,
            Some(ReconcileAnchor {
                line_index: 0,
                chunk_index: 1,
                offset: 4
            })
        );
    }

    #[test]
    fn test_empty_tree_yields_degenerate_line() {
        let tree = FakeTree { nodes: Vec::new() };
        let outcome = reconcile_line(&tree, &ROOT, 0, &[], None);
        assert_eq!(outcome.chunks, vec![Chunk::empty_text()]);
        assert_eq!(
            outcome.anchor,
            Some(ReconcileAnchor {
                line_index: 0,
                chunk_index: 0,
                offset: 0
            })
        );
    }

    #[test]
    fn test_anchor_is_none_when_line_ends_in_opaque_and_none_reported() {
        let previous = vec![opaque_chunk("img.png")];
        let tree = FakeTree {
            nodes: vec![FakeNode::Marker {
                index: Some(0),
                source: None,
            }],
        };
        let outcome = reconcile_line(&tree, &ROOT, 0, &previous, None);
        assert!(outcome.anchor.is_none());
    }

    #[test]
    fn test_noise_nodes_are_ignored() {
        let tree = FakeTree {
            nodes: vec![
                FakeNode::Text("a".into()),
                FakeNode::Noise,
                FakeNode::Text("b".into()),
            ],
        };
        let outcome = reconcile_line(&tree, &ROOT, 0, &[], None);
        assert_eq!(outcome.chunks, vec![Chunk::text("ab")]);
    }

    #[test]
    fn test_rebuilt_text_inherits_positional_style() {
        let mut style = StyleMap::new();
        style.insert("bold".into(), "true".into());
        let previous = vec![Chunk::styled_text("old", style.clone())];
        let tree = FakeTree {
            nodes: vec![FakeNode::Text("new".into())],
        };
        let outcome = reconcile_line(&tree, &ROOT, 0, &previous, None);
        assert_eq!(outcome.chunks, vec![Chunk::styled_text("new", style)]);
    }

    #[test]
    fn test_two_stage_resolver_prefers_position() {
        let items = vec![10, 20, 30];
        assert_eq!(
            two_stage_resolve(&items, Some(1), |_| true, |v| *v == 30),
            Some(&20)
        );
        assert_eq!(
            two_stage_resolve(&items, Some(9), |_| true, |v| *v == 30),
            Some(&30)
        );
        assert_eq!(
            two_stage_resolve(&items, None, |v| *v > 15, |v| *v == 10),
            None
        );
    }
}
