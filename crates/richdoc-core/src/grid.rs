//! Table Selection Grid
//!
//! Logical-grid reconstruction of a span-annotated table plus the
//! rectangular range query behind multi-cell drag selection.
//!
//! # Overview
//!
//! A table with `rowspan`/`colspan` merges is irregular: the cell list of a
//! row does not map 1:1 onto columns. [`LogicalGrid`] rebuilds the table's
//! 2-D occupancy by scanning rows top-to-bottom and stamping each cell's
//! handle into every slot it spans, skipping slots already claimed by a
//! previous row's span. A spanning cell therefore occupies multiple slots by
//! handle duplication, and its *first occurrence* is its logical coordinate.
//!
//! [`select_table_range`] resolves a pointer drag from a fixed start cell to
//! the cell currently under the pointer into an ordered-unique set of cells
//! to highlight, degrading through well-defined cases when the drag crosses
//! nesting boundaries or leaves the table. Cell and table handles come from
//! host hit-testing through the [`TableHost`] capability trait; the grid is
//! rebuilt from scratch on every pointer move (bounded table sizes make an
//! incremental cache unnecessary).
//!
//! # Example
//!
//! ```text
//! rows [[A(colspan 2)], [B, C]] build the grid:
//!
//!     ┌───────┐
//!     │   A   │
//!     ├───┬───┤
//!     │ B │ C │
//!     └───┴───┘
//!
//! range_query(B, A) covers the bounding rectangle of (0,0) and (1,0),
//! returning {A, B}.
//! ```

/// Host capability surface supplying table structure and span metadata.
///
/// `rows` must return only the *direct-child* cells of the table's own row
/// structure, excluding cells of nested sub-tables, so spans and indices are
/// computed at a single nesting level at a time.
pub trait TableHost {
    /// Opaque cell handle.
    type Cell: Clone + PartialEq;
    /// Opaque table handle.
    type Table: Clone + PartialEq;

    /// The table `cell` is a direct child of, if any.
    fn table_of(&self, cell: &Self::Cell) -> Option<Self::Table>;

    /// The table enclosing `table` through nested content, if any.
    fn parent_table(&self, table: &Self::Table) -> Option<Self::Table>;

    /// Direct-child cells of `table`, row by row.
    fn rows(&self, table: &Self::Table) -> Vec<Vec<Self::Cell>>;

    /// Row span of `cell` (≥ 1).
    fn row_span(&self, cell: &Self::Cell) -> usize;

    /// Column span of `cell` (≥ 1).
    fn col_span(&self, cell: &Self::Cell) -> usize;

    /// Whether `inner` is nested anywhere inside `cell`'s content.
    fn cell_contains(&self, cell: &Self::Cell, inner: &Self::Cell) -> bool;
}

/// 2-D reconstruction of a table's occupancy under merged cells.
///
/// Slots hold indices into a distinct-cell list; a spanning cell appears in
/// every slot it covers.
#[derive(Debug, Clone)]
pub struct LogicalGrid<C> {
    cells: Vec<C>,
    slots: Vec<Vec<Option<usize>>>,
}

impl<C: Clone + PartialEq> LogicalGrid<C> {
    /// Build the grid from direct-child cell rows and per-cell spans.
    ///
    /// Within a row, the column cursor advances past slots already stamped
    /// by a previous row's span before placing the next cell; each placed
    /// cell is then stamped into every `(row + dr, col + dc)` slot for
    /// `dr ∈ [0, row_span)`, `dc ∈ [0, col_span)`.
    pub fn build(
        rows: &[Vec<C>],
        row_span: impl Fn(&C) -> usize,
        col_span: impl Fn(&C) -> usize,
    ) -> Self {
        let mut cells: Vec<C> = Vec::new();
        let mut slots: Vec<Vec<Option<usize>>> = Vec::new();

        for (row_index, row) in rows.iter().enumerate() {
            if slots.len() <= row_index {
                slots.resize(row_index + 1, Vec::new());
            }
            let mut col = 0usize;
            for cell in row {
                while slots[row_index].get(col).is_some_and(Option::is_some) {
                    col += 1;
                }
                let cell_index = cells.len();
                cells.push(cell.clone());

                let down = row_span(cell).max(1);
                let across = col_span(cell).max(1);
                for dr in 0..down {
                    let r = row_index + dr;
                    if slots.len() <= r {
                        slots.resize(r + 1, Vec::new());
                    }
                    for dc in 0..across {
                        let c = col + dc;
                        if slots[r].len() <= c {
                            slots[r].resize(c + 1, None);
                        }
                        slots[r][c] = Some(cell_index);
                    }
                }
                col += across;
            }
        }

        Self { cells, slots }
    }

    /// Number of grid rows.
    pub fn row_count(&self) -> usize {
        self.slots.len()
    }

    /// Number of grid columns (widest row).
    pub fn col_count(&self) -> usize {
        self.slots.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// The cell stamped at `(row, col)`, if any.
    pub fn cell_at(&self, row: usize, col: usize) -> Option<&C> {
        let index = (*self.slots.get(row)?.get(col)?)?;
        self.cells.get(index)
    }

    /// First occurrence `(row, col)` of `cell` in scan order.
    pub fn position_of(&self, cell: &C) -> Option<(usize, usize)> {
        for (row, slots) in self.slots.iter().enumerate() {
            for (col, slot) in slots.iter().enumerate() {
                if let Some(index) = slot {
                    if &self.cells[*index] == cell {
                        return Some((row, col));
                    }
                }
            }
        }
        None
    }

    /// Ordered-unique cells inside the bounding rectangle of `a` and `b`.
    ///
    /// A spanning cell is counted once however many slots of the rectangle
    /// it covers. A cell absent from the grid degrades to returning the
    /// other cell alone (or nothing when both are absent).
    pub fn rect_cells(&self, a: &C, b: &C) -> Vec<C> {
        match (self.position_of(a), self.position_of(b)) {
            (Some((ar, ac)), Some((br, bc))) => {
                let (top, bottom) = (ar.min(br), ar.max(br));
                let (left, right) = (ac.min(bc), ac.max(bc));
                let mut seen: Vec<usize> = Vec::new();
                for row in top..=bottom {
                    for col in left..=right {
                        if let Some(Some(index)) =
                            self.slots.get(row).and_then(|slots| slots.get(col))
                        {
                            if !seen.contains(index) {
                                seen.push(*index);
                            }
                        }
                    }
                }
                seen.into_iter().map(|i| self.cells[i].clone()).collect()
            }
            (Some(_), None) => vec![a.clone()],
            (None, Some(_)) => vec![b.clone()],
            (None, None) => Vec::new(),
        }
    }
}

/// Resolve a table drag from `start` (fixed at drag begin) to `pointer`
/// (re-resolved each move) into the ordered-unique set of cells to
/// highlight.
///
/// Cases, in priority order:
/// 1. both cells direct children of the same table → rectangular closure
///    over that table's [`LogicalGrid`];
/// 2. the pointer's table encloses the start's table → contiguous
///    direct-child range of the outer table between the pointer cell and
///    the outer cell containing the start ("effective start");
/// 3. the drag left the table entirely → all direct-child cells of the
///    start's table;
/// 4. no table context at all → the start cell alone.
///
/// Ambiguous geometry degrades to the next case rather than failing.
pub fn select_table_range<H: TableHost>(
    host: &H,
    start: &H::Cell,
    pointer: &H::Cell,
) -> Vec<H::Cell> {
    let Some(start_table) = host.table_of(start) else {
        return vec![start.clone()];
    };

    if let Some(pointer_table) = host.table_of(pointer) {
        if pointer_table == start_table {
            let rows = host.rows(&start_table);
            let grid = LogicalGrid::build(
                &rows,
                |cell| host.row_span(cell),
                |cell| host.col_span(cell),
            );
            let cells = grid.rect_cells(start, pointer);
            if !cells.is_empty() {
                return cells;
            }
        } else if is_ancestor_table(host, &pointer_table, &start_table) {
            let flat: Vec<H::Cell> = host.rows(&pointer_table).into_iter().flatten().collect();
            let effective_start = flat
                .iter()
                .position(|cell| cell == start || host.cell_contains(cell, start));
            let pointer_index = flat.iter().position(|cell| cell == pointer);
            if let (Some(a), Some(b)) = (effective_start, pointer_index) {
                let (low, high) = (a.min(b), a.max(b));
                return flat[low..=high].to_vec();
            }
        }
    }

    // The drag left the start cell's table (or geometry stayed ambiguous):
    // highlight that table's direct-child cells wholesale.
    host.rows(&start_table).into_iter().flatten().collect()
}

/// Whether `ancestor` encloses `table` through nested content.
fn is_ancestor_table<H: TableHost>(host: &H, ancestor: &H::Table, table: &H::Table) -> bool {
    let mut current = host.parent_table(table);
    while let Some(table) = current {
        if &table == ancestor {
            return true;
        }
        current = host.parent_table(&table);
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Span {
        id: &'static str,
        row_span: usize,
        col_span: usize,
    }

    fn cell(id: &'static str) -> Span {
        Span {
            id,
            row_span: 1,
            col_span: 1,
        }
    }

    fn spanned(id: &'static str, row_span: usize, col_span: usize) -> Span {
        Span {
            id,
            row_span,
            col_span,
        }
    }

    fn build(rows: &[Vec<Span>]) -> LogicalGrid<Span> {
        LogicalGrid::build(rows, |c| c.row_span, |c| c.col_span)
    }

    fn ids(cells: &[Span]) -> Vec<&'static str> {
        cells.iter().map(|c| c.id).collect()
    }

    #[test]
    fn test_colspan_duplicates_handle_across_columns() {
        let rows = vec![
            vec![spanned("A", 1, 2)],
            vec![cell("B"), cell("C")],
        ];
        let grid = build(&rows);
        assert_eq!(grid.row_count(), 2);
        assert_eq!(grid.col_count(), 2);
        assert_eq!(grid.cell_at(0, 0).unwrap().id, "A");
        assert_eq!(grid.cell_at(0, 1).unwrap().id, "A");
        assert_eq!(grid.cell_at(1, 0).unwrap().id, "B");
        assert_eq!(grid.cell_at(1, 1).unwrap().id, "C");
    }

    #[test]
    fn test_rowspan_shifts_next_row_past_stamped_slots() {
        // D sits under B/C because A's rowspan claims (1,0).
        let rows = vec![
            vec![spanned("A", 2, 1), cell("B"), cell("C")],
            vec![cell("D"), cell("E")],
        ];
        let grid = build(&rows);
        assert_eq!(grid.cell_at(1, 0).unwrap().id, "A");
        assert_eq!(grid.cell_at(1, 1).unwrap().id, "D");
        assert_eq!(grid.cell_at(1, 2).unwrap().id, "E");
    }

    #[test]
    fn test_rect_query_counts_spanning_cell_once() {
        let rows = vec![
            vec![spanned("A", 1, 2)],
            vec![cell("B"), cell("C")],
        ];
        let grid = build(&rows);
        assert_eq!(ids(&grid.rect_cells(&cell("B"), &spanned("A", 1, 2))), vec!["A", "B"]);
        // A's first occurrence is (0,0), so A→C covers the whole grid.
        assert_eq!(
            ids(&grid.rect_cells(&spanned("A", 1, 2), &cell("C"))),
            vec!["A", "B", "C"]
        );
    }

    #[test]
    fn test_position_of_is_first_occurrence() {
        let rows = vec![
            vec![cell("X"), spanned("Y", 2, 2)],
            vec![cell("Z")],
        ];
        let grid = build(&rows);
        assert_eq!(grid.position_of(&spanned("Y", 2, 2)), Some((0, 1)));
        assert_eq!(grid.position_of(&cell("Z")), Some((1, 0)));
        assert_eq!(grid.position_of(&cell("missing")), None);
    }

    #[test]
    fn test_rect_with_missing_cell_degrades_to_the_other() {
        let rows = vec![vec![cell("A"), cell("B")]];
        let grid = build(&rows);
        assert_eq!(ids(&grid.rect_cells(&cell("A"), &cell("missing"))), vec!["A"]);
        assert!(grid.rect_cells(&cell("nope"), &cell("missing")).is_empty());
    }
}
