//! Excel importer implementation - workbook (.xls / .xlsx) → SourceGrid

use crate::config::LoadOptions;
use crate::error::{ExtractError, ExtractResult};
use crate::grid::{MergeRange, SourceGrid};
use crate::types::CellValue;
use calamine::{open_workbook, Data, Dimensions, Range, Reader, Xls, XlsError, Xlsx, XlsxError};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Container formats the importer understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkbookFormat {
    /// Legacy BIFF `.xls`
    Xls,
    /// Zipped OOXML `.xlsx` / `.xlsm`
    Xlsx,
}

impl WorkbookFormat {
    /// Pick the format from the file extension (case-insensitive)
    pub fn detect(path: &Path) -> ExtractResult<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("xlsx") | Some("xlsm") => Ok(WorkbookFormat::Xlsx),
            Some("xls") => Ok(WorkbookFormat::Xls),
            _ => Err(ExtractError::UnsupportedFormat(path.to_path_buf())),
        }
    }
}

/// Excel importer reading one worksheet into a [`SourceGrid`]
pub struct ExcelImporter {
    path: PathBuf,
}

impl ExcelImporter {
    /// Create a new Excel importer
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Read the configured worksheet and its merged ranges
    pub fn load(&self, options: &LoadOptions) -> ExtractResult<SourceGrid> {
        let format = WorkbookFormat::detect(&self.path)?;
        if !self.path.is_file() {
            return Err(ExtractError::source_unavailable(&self.path, "file not found"));
        }

        let (range, merges) = match format {
            WorkbookFormat::Xlsx => self.read_xlsx(&options.sheet_name)?,
            WorkbookFormat::Xls => self.read_xls(&options.sheet_name)?,
        };

        let grid = build_grid(&range, &merges, options.data_start_row);
        info!(
            path = %self.path.display(),
            sheet = %options.sheet_name,
            rows = grid.row_count(),
            merges = grid.merges().len(),
            "loaded source worksheet"
        );
        Ok(grid)
    }

    fn read_xlsx(&self, sheet_name: &str) -> ExtractResult<(Range<Data>, Vec<Dimensions>)> {
        let mut workbook: Xlsx<BufReader<File>> = open_workbook(&self.path)
            .map_err(|e: XlsxError| ExtractError::source_unavailable(&self.path, e))?;
        self.ensure_sheet(&workbook.sheet_names(), sheet_name)?;

        let range = workbook
            .worksheet_range(sheet_name)
            .map_err(|e| ExtractError::source_unavailable(&self.path, e))?;

        workbook
            .load_merged_regions()
            .map_err(|e| ExtractError::source_unavailable(&self.path, e))?;
        let merges = workbook
            .merged_regions_by_sheet(sheet_name)
            .into_iter()
            .map(|(_, _, dimensions)| dimensions.clone())
            .collect();

        Ok((range, merges))
    }

    fn read_xls(&self, sheet_name: &str) -> ExtractResult<(Range<Data>, Vec<Dimensions>)> {
        let mut workbook: Xls<BufReader<File>> = open_workbook(&self.path)
            .map_err(|e: XlsError| ExtractError::source_unavailable(&self.path, e))?;
        self.ensure_sheet(&workbook.sheet_names(), sheet_name)?;

        let range = workbook
            .worksheet_range(sheet_name)
            .map_err(|e| ExtractError::source_unavailable(&self.path, e))?;
        let merges = workbook.worksheet_merge_cells(sheet_name).unwrap_or_default();

        Ok((range, merges))
    }

    fn ensure_sheet(&self, sheet_names: &[String], sheet_name: &str) -> ExtractResult<()> {
        if sheet_names.iter().any(|name| name == sheet_name) {
            Ok(())
        } else {
            debug!(available = ?sheet_names, "worksheet lookup failed");
            Err(ExtractError::SheetNotFound {
                sheet: sheet_name.to_string(),
                path: self.path.clone(),
            })
        }
    }
}

/// Load one worksheet of `path` (see [`ExcelImporter::load`])
pub fn load<P: AsRef<Path>>(path: P, options: &LoadOptions) -> ExtractResult<SourceGrid> {
    ExcelImporter::new(path).load(options)
}

/// Literal window from `data_start_row` down to the last used row, plus every
/// merged range with its top-left value.
///
/// calamine coordinates are absolute and 0-based; the grid uses 1-based rows.
fn build_grid(range: &Range<Data>, merges: &[Dimensions], data_start_row: u32) -> SourceGrid {
    let first_row = data_start_row.max(1);

    let rows = match range.end() {
        Some((end_row, end_col)) => (first_row - 1..=end_row)
            .map(|row| {
                (0..=end_col)
                    .map(|col| cell_value(range.get_value((row, col))))
                    .collect()
            })
            .collect(),
        None => Vec::new(),
    };

    let mut grid = SourceGrid::from_rows(first_row, rows);
    for dimensions in merges {
        let top_left = cell_value(range.get_value(dimensions.start));
        grid.add_merge(MergeRange::new(
            (dimensions.start.0 + 1, dimensions.start.1),
            (dimensions.end.0 + 1, dimensions.end.1),
            top_left,
        ));
    }
    grid
}

/// Literal strings read as missing values, matching the NA markers
/// spreadsheet-to-dataframe readers recognise by default
const NA_MARKERS: [&str; 18] = [
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Convert calamine Data to CellValue
fn cell_value(data: Option<&Data>) -> CellValue {
    match data {
        None | Some(Data::Empty) => CellValue::Missing,
        Some(Data::Float(f)) => CellValue::number(*f),
        Some(Data::Int(i)) => CellValue::number(*i as f64),
        Some(Data::Bool(b)) => CellValue::Number(if *b { 1.0 } else { 0.0 }),
        Some(Data::String(s)) if NA_MARKERS.contains(&s.as_str()) => CellValue::Missing,
        Some(Data::String(s)) => CellValue::text(s.as_str()),
        // Excel serial date
        Some(Data::DateTime(dt)) => CellValue::number(dt.as_f64()),
        Some(Data::DateTimeIso(s)) | Some(Data::DurationIso(s)) => CellValue::text(s.as_str()),
        Some(Data::Error(_)) => CellValue::Missing,
    }
}
