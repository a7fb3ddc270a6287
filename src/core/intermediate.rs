//! Per-record table of raw field values and derived damping columns
//!
//! Column letters follow the working sheet the output is assembled from:
//! `B`..`L`, `U`, `V` are raw readings, `M`..`S` derive from (L, K) and
//! `W`..`AC` from (V, U). `F` and `I` repeat the two damping results.

use super::derive::Damping;
use super::layout::{Field, Scaling};
use crate::config::PipelineConfig;
use crate::grid::SourceGrid;
use crate::types::CellValue;
use tracing::warn;

/// Addressable columns of an [`IntermediateRow`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntermediateColumn {
    No,
    Raw(Field),
    /// Primary damping (same as `S`)
    F,
    /// Secondary damping (same as `AC`)
    I,
    M,
    N,
    O,
    P,
    Q,
    R,
    S,
    W,
    X,
    Y,
    Z,
    AA,
    AB,
    AC,
}

impl IntermediateColumn {
    /// Working-sheet column order
    pub const ALL: [IntermediateColumn; 27] = [
        IntermediateColumn::No,
        IntermediateColumn::Raw(Field::B),
        IntermediateColumn::Raw(Field::C),
        IntermediateColumn::Raw(Field::D),
        IntermediateColumn::Raw(Field::E),
        IntermediateColumn::F,
        IntermediateColumn::Raw(Field::G),
        IntermediateColumn::Raw(Field::H),
        IntermediateColumn::I,
        IntermediateColumn::Raw(Field::K),
        IntermediateColumn::Raw(Field::L),
        IntermediateColumn::Raw(Field::U),
        IntermediateColumn::Raw(Field::V),
        IntermediateColumn::M,
        IntermediateColumn::N,
        IntermediateColumn::O,
        IntermediateColumn::P,
        IntermediateColumn::Q,
        IntermediateColumn::R,
        IntermediateColumn::S,
        IntermediateColumn::W,
        IntermediateColumn::X,
        IntermediateColumn::Y,
        IntermediateColumn::Z,
        IntermediateColumn::AA,
        IntermediateColumn::AB,
        IntermediateColumn::AC,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            IntermediateColumn::No => "No",
            IntermediateColumn::Raw(field) => field.name(),
            IntermediateColumn::F => "F",
            IntermediateColumn::I => "I",
            IntermediateColumn::M => "M",
            IntermediateColumn::N => "N",
            IntermediateColumn::O => "O",
            IntermediateColumn::P => "P",
            IntermediateColumn::Q => "Q",
            IntermediateColumn::R => "R",
            IntermediateColumn::S => "S",
            IntermediateColumn::W => "W",
            IntermediateColumn::X => "X",
            IntermediateColumn::Y => "Y",
            IntermediateColumn::Z => "Z",
            IntermediateColumn::AA => "AA",
            IntermediateColumn::AB => "AB",
            IntermediateColumn::AC => "AC",
        }
    }
}

/// One record's raw readings and both derivations
#[derive(Debug, Clone, PartialEq, Default)]
pub struct IntermediateRow {
    pub no: u32,
    pub b: CellValue,
    pub c: CellValue,
    pub d: CellValue,
    pub e: CellValue,
    pub g: CellValue,
    pub h: CellValue,
    pub k: CellValue,
    pub l: CellValue,
    pub u: CellValue,
    pub v: CellValue,
    /// L over K
    pub primary: Damping,
    /// V over U
    pub secondary: Damping,
}

impl IntermediateRow {
    /// Block anchor used to join records into output rows
    pub fn anchor(&self) -> &CellValue {
        &self.b
    }

    pub fn raw(&self, field: Field) -> &CellValue {
        match field {
            Field::B => &self.b,
            Field::C => &self.c,
            Field::D => &self.d,
            Field::E => &self.e,
            Field::G => &self.g,
            Field::H => &self.h,
            Field::K => &self.k,
            Field::L => &self.l,
            Field::U => &self.u,
            Field::V => &self.v,
        }
    }

    pub fn value(&self, column: IntermediateColumn) -> CellValue {
        use IntermediateColumn as Col;

        let (p, s) = (&self.primary, &self.secondary);
        match column {
            Col::No => CellValue::Number(f64::from(self.no)),
            Col::Raw(field) => self.raw(field).clone(),
            Col::F | Col::S => p.damping.into(),
            Col::I | Col::AC => s.damping.into(),
            Col::M => p.ratio.into(),
            Col::N => CellValue::number(p.half_period),
            Col::O => p.log_ratio.into(),
            Col::P => p.decay_rate.into(),
            Col::Q => p.time_constant.into(),
            Col::R => p.angular_frequency.into(),
            Col::W => s.ratio.into(),
            Col::X => CellValue::number(s.half_period),
            Col::Y => s.log_ratio.into(),
            Col::Z => s.decay_rate.into(),
            Col::AA => s.time_constant.into(),
            Col::AB => s.angular_frequency.into(),
        }
    }
}

/// Exactly one row per record `1..=total_record_count`, unfiltered
#[derive(Debug, Clone, PartialEq, Default)]
pub struct IntermediateTable {
    rows: Vec<IntermediateRow>,
}

impl IntermediateTable {
    pub fn build(grid: &SourceGrid, config: &PipelineConfig) -> Self {
        let rows = (1..=config.total_record_count)
            .map(|n| build_row(grid, n, config.data_start_row))
            .collect();
        Self { rows }
    }

    pub fn from_rows(rows: Vec<IntermediateRow>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[IntermediateRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn headers(&self) -> Vec<String> {
        IntermediateColumn::ALL.iter().map(|c| c.name().to_string()).collect()
    }

    /// Rows as cell values in [`IntermediateColumn::ALL`] order
    pub fn records(&self) -> Vec<Vec<CellValue>> {
        self.rows
            .iter()
            .map(|row| IntermediateColumn::ALL.iter().map(|c| row.value(*c)).collect())
            .collect()
    }
}

fn build_row(grid: &SourceGrid, n: u32, data_start_row: u32) -> IntermediateRow {
    let read = |field: Field| resolve_field(grid, field, n, data_start_row);

    let k = read(Field::K);
    let l = read(Field::L);
    let u = read(Field::U);
    let v = read(Field::V);
    let primary = Damping::derive(l.as_number(), k.as_number());
    let secondary = Damping::derive(v.as_number(), u.as_number());

    IntermediateRow {
        no: n,
        b: read(Field::B),
        c: read(Field::C),
        d: read(Field::D),
        e: read(Field::E),
        g: read(Field::G),
        h: read(Field::H),
        k,
        l,
        u,
        v,
        primary,
        secondary,
    }
}

/// Read one field of record `n`, applying the field's scaling
pub fn resolve_field(grid: &SourceGrid, field: Field, n: u32, data_start_row: u32) -> CellValue {
    let Some(row) = field.layout().physical_row(n, data_start_row) else {
        warn!(field = field.name(), n, "record has no source row, treating as missing");
        return CellValue::Missing;
    };

    let scaling = field.scaling();
    let value = grid.resolve(field.source_column(), row, scaling.factor());
    match scaling {
        Scaling::PositiveFloor { floor, .. } => match value.as_number() {
            Some(v) if v > 0.0 => value,
            _ => CellValue::Number(floor),
        },
        Scaling::Unit | Scaling::Factor(_) => value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{column_to_index, MergeRange};

    /// Grid whose literal window starts at row 1
    fn sparse_grid(cells: &[(&str, u32, CellValue)]) -> SourceGrid {
        let max_row = cells.iter().map(|(_, row, _)| *row).max().unwrap_or(1);
        let mut rows = vec![vec![CellValue::Missing; 40]; max_row as usize];
        for (column, row, value) in cells {
            let col = column_to_index(column).unwrap() as usize;
            rows[*row as usize - 1][col] = value.clone();
        }
        SourceGrid::from_rows(1, rows)
    }

    fn config(records: u32) -> PipelineConfig {
        PipelineConfig {
            data_start_row: 1,
            total_record_count: records,
        }
    }

    #[test]
    fn test_one_row_per_record() {
        let table = IntermediateTable::build(&SourceGrid::default(), &config(25));
        assert_eq!(table.len(), 25);
        let numbers: Vec<u32> = table.rows().iter().map(|r| r.no).collect();
        assert_eq!(numbers, (1..=25).collect::<Vec<_>>());
    }

    #[test]
    fn test_fields_read_from_their_columns() {
        // data_start_row = 1: n=1 rows are B:1 C:3 D/E/L:18 G/H/V:15 K/U:10
        let grid = sparse_grid(&[
            ("H", 1, CellValue::Number(100.0)),
            ("H", 3, CellValue::Number(3.0)),
            ("F", 18, CellValue::Number(4.0)),
            ("R", 18, CellValue::Number(5.0)),
            ("AB", 15, CellValue::Number(6.0)),
            ("AH", 15, CellValue::Number(7.0)),
            ("K", 10, CellValue::Number(2.0)),
            ("K", 18, CellValue::Number(1.0)),
            ("AD", 15, CellValue::Number(0.5)),
        ]);
        let table = IntermediateTable::build(&grid, &config(1));
        let row = &table.rows()[0];

        assert_eq!(row.b, CellValue::Number(100.0));
        assert_eq!(row.c, CellValue::Number(3.0));
        assert_eq!(row.d, CellValue::Number(4.0));
        assert_eq!(row.e, CellValue::Number(5.0));
        assert_eq!(row.g, CellValue::Number(6.0));
        assert_eq!(row.h, CellValue::Number(7.0));
        assert_eq!(row.k, CellValue::Number(2000.0));
        assert_eq!(row.l, CellValue::Number(1000.0));
        assert_eq!(row.u, CellValue::Number(2000.0));
        assert_eq!(row.v, CellValue::Number(500.0));

        assert_eq!(row.primary.ratio, Some(0.5));
        assert_eq!(row.secondary.ratio, Some(0.25));
        assert_eq!(row.value(IntermediateColumn::F), row.value(IntermediateColumn::S));
        assert_eq!(row.value(IntermediateColumn::I), row.value(IntermediateColumn::AC));
        assert!(row.value(IntermediateColumn::F).as_number().is_some());
    }

    #[test]
    fn test_positive_floor_substitution() {
        let grid = sparse_grid(&[("AD", 15, CellValue::Number(0.0)), ("AD", 101, CellValue::Number(-3.0))]);
        let table = IntermediateTable::build(&grid, &config(3));

        assert_eq!(table.rows()[0].v, CellValue::Number(1e-30));
        assert_eq!(table.rows()[1].v, CellValue::Number(1e-30));
        // Nothing at all for n = 3
        assert_eq!(table.rows()[2].v, CellValue::Number(1e-30));
    }

    #[test]
    fn test_floor_applies_to_text() {
        let grid = sparse_grid(&[("AD", 15, CellValue::Text("bad".to_string()))]);
        let row = resolve_field(&grid, Field::V, 1, 1);
        assert_eq!(row, CellValue::Number(1e-30));
    }

    #[test]
    fn test_missing_propagates_through_derivations() {
        let table = IntermediateTable::build(&SourceGrid::default(), &config(2));
        let row = &table.rows()[0];

        assert!(row.b.is_missing());
        assert!(row.value(IntermediateColumn::M).is_missing());
        assert!(row.value(IntermediateColumn::S).is_missing());
        assert!(row.value(IntermediateColumn::AB).is_missing());
        // The half-period column is a constant
        assert_eq!(row.value(IntermediateColumn::N), CellValue::Number(1.0 / 120.0));
    }

    #[test]
    fn test_zero_denominator_is_missing_not_error() {
        let grid = sparse_grid(&[("K", 10, CellValue::Number(0.0)), ("K", 18, CellValue::Number(1.0))]);
        let table = IntermediateTable::build(&grid, &config(1));
        let row = &table.rows()[0];
        assert_eq!(row.k, CellValue::Number(0.0));
        assert!(row.value(IntermediateColumn::M).is_missing());
        assert!(row.value(IntermediateColumn::F).is_missing());
    }

    #[test]
    fn test_text_payload_passes_through() {
        let grid = sparse_grid(&[("F", 18, CellValue::Text("pending".to_string()))]);
        let table = IntermediateTable::build(&grid, &config(1));
        let row = &table.rows()[0];
        assert_eq!(row.d, CellValue::Text("pending".to_string()));
    }

    #[test]
    fn test_merged_anchor_shared_by_records() {
        // Anchor rows for n = 1, 2 with data_start_row = 1 are 1 and 90
        let grid = SourceGrid::default().with_merge(MergeRange::new(
            (1, 7),
            (90, 7),
            CellValue::Text("P-01".to_string()),
        ));
        let table = IntermediateTable::build(&grid, &config(3));
        assert_eq!(table.rows()[0].anchor(), &CellValue::Text("P-01".to_string()));
        assert_eq!(table.rows()[1].anchor(), &CellValue::Text("P-01".to_string()));
        assert!(table.rows()[2].anchor().is_missing());
    }

    #[test]
    fn test_column_names_are_unique() {
        let mut names: Vec<&str> = IntermediateColumn::ALL.iter().map(|c| c.name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), IntermediateColumn::ALL.len());
    }
}
