//! Splitting the movement list into fixed-size table pages.

use std::num::NonZeroUsize;
use std::ops::Range;

use crate::input::MovementRecord;
use crate::model::{MovementTable, RowShading, TableRow};

/// Column labels of the movement table.
pub const COLUMN_LABELS: [&str; 3] = ["Cuenta", "Descripción", "Tipo"];

/// Relative column widths: 2 in, 6.5 in and 2.5 in.
pub const COLUMN_WEIGHTS: [usize; 3] = [20, 65, 25];

/// One report page and the slice of movements it shows.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageContext {
    /// 1-based page number.
    pub page_number: usize,
    /// Half-open range of movement indices on this page.
    pub window: Range<usize>,
}

/// Iterator over the page windows of a movement list.
///
/// Yields nothing for an empty list.
#[derive(Clone, Debug)]
pub struct PageWindows {
    total: usize,
    capacity: usize,
    offset: usize,
    page_number: usize,
}

impl Iterator for PageWindows {
    type Item = PageContext;

    fn next(&mut self) -> Option<Self::Item> {
        if self.offset >= self.total {
            return None;
        }
        let end = next_offset(self.offset, self.capacity, self.total);
        self.page_number += 1;
        let page = PageContext {
            page_number: self.page_number,
            window: self.offset..end,
        };
        self.offset = end;
        Some(page)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = pages_needed(self.total - self.offset, self.capacity);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for PageWindows {}

/// Returns the pages needed to show `total` movements, `capacity` per page.
pub fn page_windows(total: usize, capacity: NonZeroUsize) -> PageWindows {
    PageWindows {
        total,
        capacity: capacity.get(),
        offset: 0,
        page_number: 0,
    }
}

fn pages_needed(rows: usize, capacity: usize) -> usize {
    (rows + capacity - 1) / capacity
}

fn next_offset(offset: usize, capacity: usize, total: usize) -> usize {
    offset.saturating_add(capacity).min(total)
}

/// Builds the table shown on one page.
///
/// The table holds the header row followed by up to `capacity` movements
/// starting at `offset`. Returns the table and the offset of the first
/// movement not yet shown, `min(offset + capacity, len)`.
pub fn table_page(
    movements: &[MovementRecord],
    offset: usize,
    capacity: NonZeroUsize,
) -> (MovementTable, usize) {
    let start = offset.min(movements.len());
    let end = next_offset(start, capacity.get(), movements.len());

    let rows = movements[start..end]
        .iter()
        .enumerate()
        .map(|(index, movement)| TableRow::new(movement.cells(), RowShading::for_data_row(index)))
        .collect();

    let table = MovementTable::new(
        COLUMN_WEIGHTS.to_vec(),
        TableRow::new(COLUMN_LABELS, RowShading::Header),
        rows,
    );
    (table, end)
}
