//! Excel import/export
//!
//! - Import: one worksheet of an `.xls` / `.xlsx` workbook → [`crate::grid::SourceGrid`]
//! - Export: [`crate::core::OutputTable`] → single-sheet `.xlsx`

mod exporter;
mod importer;

pub use exporter::ExcelExporter;
pub use importer::{load, ExcelImporter, WorkbookFormat};
