//! Final table: records joined on their block anchor
//!
//! Every record keeps its own row, but its output columns are taken from the
//! first record carrying the same anchor value.

use super::intermediate::{IntermediateColumn, IntermediateTable};
use super::layout::Field;
use crate::types::CellValue;
use std::collections::{HashMap, HashSet};

pub const SEQUENCE_HEADER: &str = "No";
pub const ANCHOR_HEADER: &str = "C";

/// Output column ← intermediate column, in output order
pub const OUTPUT_COLUMNS: [(&str, IntermediateColumn); 7] = [
    ("D", IntermediateColumn::Raw(Field::C)),
    ("E", IntermediateColumn::Raw(Field::D)),
    ("F", IntermediateColumn::Raw(Field::E)),
    ("G", IntermediateColumn::F),
    ("H", IntermediateColumn::Raw(Field::G)),
    ("I", IntermediateColumn::Raw(Field::H)),
    ("J", IntermediateColumn::I),
];

/// Hashable form of an anchor value. Missing values are not keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AnchorKey {
    Number(u64),
    Text(String),
}

impl AnchorKey {
    pub fn of(value: &CellValue) -> Option<Self> {
        match value {
            // -0.0 and 0.0 are the same anchor
            CellValue::Number(n) if *n == 0.0 => Some(AnchorKey::Number(0f64.to_bits())),
            CellValue::Number(n) => Some(AnchorKey::Number(n.to_bits())),
            CellValue::Text(s) => Some(AnchorKey::Text(s.clone())),
            CellValue::Missing => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OutputRow {
    pub no: u32,
    pub anchor: CellValue,
    /// One value per entry of [`OUTPUT_COLUMNS`]
    pub values: Vec<CellValue>,
}

impl OutputRow {
    pub fn cells(&self) -> Vec<CellValue> {
        let mut cells = Vec::with_capacity(self.values.len() + 2);
        cells.push(CellValue::Number(f64::from(self.no)));
        cells.push(self.anchor.clone());
        cells.extend(self.values.iter().cloned());
        cells
    }
}

/// The persisted table: `No`, anchor, then [`OUTPUT_COLUMNS`]
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OutputTable {
    rows: Vec<OutputRow>,
}

impl OutputTable {
    pub fn build(intermediate: &IntermediateTable) -> Self {
        let rows = intermediate.rows();

        // anchor → index of the first record carrying it
        let mut first_seen: HashMap<AnchorKey, usize> = HashMap::new();
        for (idx, row) in rows.iter().enumerate() {
            if let Some(key) = AnchorKey::of(row.anchor()) {
                first_seen.entry(key).or_insert(idx);
            }
        }

        let rows = rows
            .iter()
            .map(|row| {
                let source = AnchorKey::of(row.anchor())
                    .and_then(|key| first_seen.get(&key))
                    .and_then(|&idx| rows.get(idx));
                let values = OUTPUT_COLUMNS
                    .iter()
                    .map(|(_, column)| source.map_or(CellValue::Missing, |src| src.value(*column)))
                    .collect();
                OutputRow {
                    no: row.no,
                    anchor: row.anchor().clone(),
                    values,
                }
            })
            .collect();

        Self { rows }
    }

    pub fn headers() -> Vec<String> {
        [SEQUENCE_HEADER, ANCHOR_HEADER]
            .into_iter()
            .chain(OUTPUT_COLUMNS.iter().map(|(name, _)| *name))
            .map(str::to_string)
            .collect()
    }

    pub fn rows(&self) -> &[OutputRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of distinct non-missing anchors
    pub fn anchor_count(&self) -> usize {
        self.rows
            .iter()
            .filter_map(|r| AnchorKey::of(&r.anchor))
            .collect::<HashSet<_>>()
            .len()
    }

    /// Rows as cell values in [`OutputTable::headers`] order
    pub fn records(&self) -> Vec<Vec<CellValue>> {
        self.rows.iter().map(OutputRow::cells).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::intermediate::IntermediateRow;
    use pretty_assertions::assert_eq;

    fn row(no: u32, anchor: CellValue, c: CellValue) -> IntermediateRow {
        IntermediateRow {
            no,
            b: anchor,
            c,
            ..IntermediateRow::default()
        }
    }

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    #[test]
    fn test_headers() {
        assert_eq!(
            OutputTable::headers(),
            vec!["No", "C", "D", "E", "F", "G", "H", "I", "J"]
        );
    }

    #[test]
    fn test_first_occurrence_wins() {
        let table = IntermediateTable::from_rows(vec![
            row(1, CellValue::Number(10.0), text("A")),
            row(2, CellValue::Number(10.0), text("B")),
            row(3, CellValue::Number(20.0), text("C")),
        ]);
        let output = OutputTable::build(&table);

        let d: Vec<&CellValue> = output.rows().iter().map(|r| &r.values[0]).collect();
        assert_eq!(d, vec![&text("A"), &text("A"), &text("C")]);
        assert_eq!(output.rows()[1].anchor, CellValue::Number(10.0));
        assert_eq!(output.rows()[1].no, 2);
        assert_eq!(output.anchor_count(), 2);
    }

    #[test]
    fn test_shared_anchor_gives_identical_tuples() {
        let mut first = row(1, text("P"), CellValue::Number(1.0));
        first.d = CellValue::Number(2.0);
        first.h = CellValue::Number(3.0);
        let mut second = row(5, text("P"), CellValue::Number(9.0));
        second.d = CellValue::Number(8.0);

        let output = OutputTable::build(&IntermediateTable::from_rows(vec![first, second]));
        assert_eq!(output.rows()[0].values, output.rows()[1].values);
        assert_eq!(output.rows()[1].values[0], CellValue::Number(1.0));
        assert_eq!(output.rows()[1].values[5], CellValue::Number(3.0));
    }

    #[test]
    fn test_missing_anchor_yields_missing_columns() {
        let output = OutputTable::build(&IntermediateTable::from_rows(vec![
            row(1, CellValue::Missing, text("A")),
            row(2, CellValue::Missing, text("B")),
        ]));

        for out in output.rows() {
            assert!(out.anchor.is_missing());
            assert!(out.values.iter().all(CellValue::is_missing));
        }
        assert_eq!(output.anchor_count(), 0);
    }

    #[test]
    fn test_number_and_text_anchors_differ() {
        let output = OutputTable::build(&IntermediateTable::from_rows(vec![
            row(1, CellValue::Number(1.0), text("num")),
            row(2, text("1"), text("txt")),
        ]));
        assert_eq!(output.rows()[1].values[0], text("txt"));
    }

    #[test]
    fn test_signed_zero_anchors_match() {
        let output = OutputTable::build(&IntermediateTable::from_rows(vec![
            row(1, CellValue::Number(0.0), text("first")),
            row(2, CellValue::Number(-0.0), text("second")),
        ]));
        assert_eq!(output.rows()[1].values[0], text("first"));
    }

    #[test]
    fn test_records_layout() {
        let output = OutputTable::build(&IntermediateTable::from_rows(vec![row(
            7,
            CellValue::Number(10.0),
            text("A"),
        )]));
        let records = output.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].len(), OutputTable::headers().len());
        assert_eq!(records[0][0], CellValue::Number(7.0));
        assert_eq!(records[0][1], CellValue::Number(10.0));
        assert_eq!(records[0][2], text("A"));
    }
}
