//! Record index → source row arithmetic
//!
//! Each record `n` occupies one block of source rows. The first two records
//! are bootstrap cases; from the third on every block is [`BLOCK_WIDTH`] rows.
//! All constants describe the physical sheet layout and must match it exactly.

/// Rows per regular block
pub const BLOCK_WIDTH: u32 = 85;

/// Rows spanned by the first (bootstrap) block
pub const BOOTSTRAP_BLOCK: u32 = 88;

/// Row offsets of one field within its block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldLayout {
    /// Row for `n = 1`
    pub first: u32,
    /// Offset past the bootstrap block for `n >= 2`
    pub second: u32,
}

impl FieldLayout {
    pub const fn new(first: u32, second: u32) -> Self {
        Self { first, second }
    }

    /// Row relative to the data start (row 1 = first data row). `None` for `n = 0`.
    pub fn raw_row(&self, n: u32) -> Option<u32> {
        match n {
            0 => None,
            1 => Some(self.first),
            2 => Some(BOOTSTRAP_BLOCK + self.second),
            _ => BLOCK_WIDTH
                .checked_mul(n - 2)?
                .checked_add(BOOTSTRAP_BLOCK + self.second),
        }
    }

    /// Absolute worksheet row for record `n` when data begins at `data_start_row`
    pub fn physical_row(&self, n: u32, data_start_row: u32) -> Option<u32> {
        self.raw_row(n)
            .and_then(|row| row.checked_add(data_start_row.checked_sub(1)?))
    }
}

/// How a field's resolved value is scaled
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scaling {
    Unit,
    Factor(f64),
    /// Multiply, then replace anything that is not a positive number with `floor`
    PositiveFloor { factor: f64, floor: f64 },
}

impl Scaling {
    pub fn factor(&self) -> f64 {
        match self {
            Scaling::Unit => 1.0,
            Scaling::Factor(factor) | Scaling::PositiveFloor { factor, .. } => *factor,
        }
    }
}

/// Substitute for non-positive V readings
pub const POSITIVE_FLOOR: f64 = 1e-30;

/// Raw fields read from the source sheet for every record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// Block anchor, used as the deduplication key
    B,
    C,
    D,
    E,
    G,
    H,
    K,
    L,
    U,
    V,
}

impl Field {
    pub const ALL: [Field; 10] = [
        Field::B,
        Field::C,
        Field::D,
        Field::E,
        Field::G,
        Field::H,
        Field::K,
        Field::L,
        Field::U,
        Field::V,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Field::B => "B",
            Field::C => "C",
            Field::D => "D",
            Field::E => "E",
            Field::G => "G",
            Field::H => "H",
            Field::K => "K",
            Field::L => "L",
            Field::U => "U",
            Field::V => "V",
        }
    }

    pub fn layout(&self) -> FieldLayout {
        match self {
            Field::B => FieldLayout::new(1, 2),
            Field::C => FieldLayout::new(3, 4),
            Field::D | Field::E | Field::L => FieldLayout::new(18, 19),
            Field::G | Field::H | Field::V => FieldLayout::new(15, 13),
            Field::K | Field::U => FieldLayout::new(10, 11),
        }
    }

    /// Worksheet column the field is read from
    pub fn source_column(&self) -> &'static str {
        match self {
            Field::B | Field::C => "H",
            Field::D => "F",
            Field::E => "R",
            Field::G => "AB",
            Field::H => "AH",
            Field::K | Field::L | Field::U => "K",
            Field::V => "AD",
        }
    }

    pub fn scaling(&self) -> Scaling {
        match self {
            Field::K | Field::L | Field::U => Scaling::Factor(1000.0),
            Field::V => Scaling::PositiveFloor {
                factor: 1000.0,
                floor: POSITIVE_FLOOR,
            },
            _ => Scaling::Unit,
        }
    }
}
