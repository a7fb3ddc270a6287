//! Excel exporter implementation - OutputTable → single-sheet .xlsx

use crate::core::OutputTable;
use crate::error::{ExtractError, ExtractResult};
use crate::types::CellValue;
use rust_xlsxwriter::{Workbook, XlsxError};
use std::io::Write;
use std::path::Path;
use tracing::info;

/// Writes an [`OutputTable`] as one named worksheet with a header row
pub struct ExcelExporter<'a> {
    table: &'a OutputTable,
}

impl<'a> ExcelExporter<'a> {
    /// Create a new Excel exporter
    pub fn new(table: &'a OutputTable) -> Self {
        Self { table }
    }

    /// Save the table to `output_path`.
    ///
    /// The workbook is written to a temporary file next to the destination and
    /// renamed into place, so a failure leaves any existing file untouched.
    pub fn export(&self, output_path: &Path, sheet_name: &str) -> ExtractResult<()> {
        let buffer = self
            .to_buffer(sheet_name)
            .map_err(|e| ExtractError::persistence(output_path, e))?;

        let dir = match output_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut file = tempfile::NamedTempFile::new_in(dir)
            .map_err(|e| ExtractError::persistence(output_path, e))?;
        file.write_all(&buffer)
            .and_then(|()| file.as_file().sync_all())
            .map_err(|e| ExtractError::persistence(output_path, e))?;
        file.persist(output_path)
            .map_err(|e| ExtractError::persistence(output_path, e.error))?;

        info!(
            path = %output_path.display(),
            sheet = sheet_name,
            rows = self.table.len(),
            "saved output workbook"
        );
        Ok(())
    }

    /// Serialise the workbook in memory
    pub fn to_buffer(&self, sheet_name: &str) -> Result<Vec<u8>, XlsxError> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(sheet_name)?;

        for (col_idx, header) in OutputTable::headers().iter().enumerate() {
            worksheet.write_string(0, col_idx as u16, header)?;
        }

        for (row_idx, record) in self.table.records().iter().enumerate() {
            // +1 for the header row
            let excel_row = (row_idx + 1) as u32;
            for (col_idx, cell) in record.iter().enumerate() {
                match cell {
                    // Excel cannot store infinities, leave those blank like missing values
                    CellValue::Number(n) if n.is_finite() => {
                        worksheet.write_number(excel_row, col_idx as u16, *n)?;
                    }
                    CellValue::Text(s) => {
                        worksheet.write_string(excel_row, col_idx as u16, s)?;
                    }
                    CellValue::Number(_) | CellValue::Missing => {}
                }
            }
        }

        workbook.save_to_buffer()
    }
}
