//! Merge-aware, read-only view over one worksheet
//!
//! Rows are 1-based worksheet rows. Columns are stored as 0-based indices and
//! addressed from the outside by their letters (see [`address`]).

pub mod address;

pub use address::{column_to_index, index_to_column};

use crate::types::CellValue;
use std::collections::HashMap;
use std::ops::RangeInclusive;
use tracing::warn;

/// Ranges covering more cells than this are matched by scanning instead of
/// being expanded into the per-cell index.
const MAX_INDEXED_MERGE_CELLS: u64 = 1 << 16;

static MISSING: CellValue = CellValue::Missing;

/// A merged range; every covered cell resolves to the top-left cell's value
///
/// Corners are normalised on construction, so `first_* <= last_*` always holds.
#[derive(Debug, Clone, PartialEq)]
pub struct MergeRange {
    /// 1-based
    first_row: u32,
    last_row: u32,
    /// 0-based
    first_col: u32,
    last_col: u32,
    value: CellValue,
}

impl MergeRange {
    pub fn new(
        (first_row, first_col): (u32, u32),
        (last_row, last_col): (u32, u32),
        value: CellValue,
    ) -> Self {
        Self {
            first_row: first_row.min(last_row),
            last_row: first_row.max(last_row),
            first_col: first_col.min(last_col),
            last_col: first_col.max(last_col),
            value,
        }
    }

    /// Covered worksheet rows (1-based, inclusive)
    pub fn rows(&self) -> RangeInclusive<u32> {
        self.first_row..=self.last_row
    }

    /// Covered columns (0-based, inclusive)
    pub fn cols(&self) -> RangeInclusive<u32> {
        self.first_col..=self.last_col
    }

    /// Value of the top-left cell
    pub fn value(&self) -> &CellValue {
        &self.value
    }

    pub fn contains(&self, row: u32, col: u32) -> bool {
        (self.first_row..=self.last_row).contains(&row)
            && (self.first_col..=self.last_col).contains(&col)
    }

    fn cell_count(&self) -> u64 {
        let height = u64::from(self.last_row.abs_diff(self.first_row)) + 1;
        let width = u64::from(self.last_col.abs_diff(self.first_col)) + 1;
        height * width
    }
}

/// Literal cell window plus merge map for one worksheet
#[derive(Debug, Clone, Default)]
pub struct SourceGrid {
    /// Worksheet row held by `rows[0]`
    first_row: u32,
    rows: Vec<Vec<CellValue>>,
    merges: Vec<MergeRange>,
    /// (row, col) → index into `merges`
    merged_cells: HashMap<(u32, u32), usize>,
    /// Indices into `merges` too large for `merged_cells`
    large_merges: Vec<usize>,
}

impl SourceGrid {
    /// Create a grid whose literal window starts at worksheet row `first_row`
    pub fn from_rows(first_row: u32, rows: Vec<Vec<CellValue>>) -> Self {
        Self {
            first_row: first_row.max(1),
            rows,
            ..Self::default()
        }
    }

    /// Builder-style [`SourceGrid::add_merge`]
    #[must_use]
    pub fn with_merge(mut self, merge: MergeRange) -> Self {
        self.add_merge(merge);
        self
    }

    /// Register a merged range. When ranges overlap, the first registered wins.
    pub fn add_merge(&mut self, merge: MergeRange) {
        let idx = self.merges.len();
        if merge.cell_count() > MAX_INDEXED_MERGE_CELLS {
            self.large_merges.push(idx);
        } else {
            for row in merge.rows() {
                for col in merge.cols() {
                    self.merged_cells.entry((row, col)).or_insert(idx);
                }
            }
        }
        self.merges.push(merge);
    }

    pub fn merges(&self) -> &[MergeRange] {
        &self.merges
    }

    /// First worksheet row of the literal window
    pub fn first_row(&self) -> u32 {
        self.first_row
    }

    /// Number of rows in the literal window
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Widest row in the literal window
    pub fn col_count(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// The merge covering (row, col), if any
    pub fn merge_at(&self, row: u32, col: u32) -> Option<&MergeRange> {
        if let Some(&idx) = self.merged_cells.get(&(row, col)) {
            return self.merges.get(idx);
        }
        self.large_merges
            .iter()
            .filter_map(|&idx| self.merges.get(idx))
            .find(|merge| merge.contains(row, col))
    }

    /// Literal value ignoring merges; `Missing` outside the window
    pub fn literal(&self, row: u32, col: u32) -> &CellValue {
        let Some(offset) = row.checked_sub(self.first_row) else {
            return &MISSING;
        };
        self.rows
            .get(offset as usize)
            .and_then(|cells| cells.get(col as usize))
            .unwrap_or(&MISSING)
    }

    /// Unscaled value at (row, col): merge representative first, then the literal
    pub fn lookup(&self, row: u32, col: u32) -> &CellValue {
        match self.merge_at(row, col) {
            Some(merge) => merge.value(),
            None => self.literal(row, col),
        }
    }

    /// Resolve a cell by column letters and 1-based row, applying `multiplier`
    /// to numeric values.
    ///
    /// Text that parses as a number is scaled like a number; other text comes
    /// back unchanged. A coordinate that cannot be addressed is logged and
    /// resolves to `Missing`.
    pub fn resolve(&self, column: &str, row: u32, multiplier: f64) -> CellValue {
        let Some(col) = column_to_index(column) else {
            warn!(column, row, "invalid column letters, treating cell as missing");
            return CellValue::Missing;
        };
        if row == 0 {
            warn!(column, row, "row numbers start at 1, treating cell as missing");
            return CellValue::Missing;
        }
        scale(self.lookup(row, col), multiplier)
    }
}

fn scale(value: &CellValue, multiplier: f64) -> CellValue {
    match value {
        CellValue::Missing => CellValue::Missing,
        CellValue::Number(n) => CellValue::number(n * multiplier),
        CellValue::Text(s) => match s.trim().parse::<f64>() {
            Ok(n) => CellValue::number(n * multiplier),
            Err(_) => value.clone(),
        },
    }
}
