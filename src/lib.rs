//! Damping Extract - block-layout measurement extraction with decay derivation
//!
//! Reads one worksheet laid out as repeating 85-row blocks, resolves a fixed
//! set of fields per record (merged cells resolve to their top-left value),
//! derives decay rate, time constant and damping from two reading pairs, and
//! produces an output table joined on each record's block anchor.
//!
//! # Example
//!
//! ```no_run
//! use damping_extract::config::Settings;
//! use damping_extract::excel::{self, ExcelExporter};
//! use std::path::Path;
//!
//! let settings = Settings::default();
//! let grid = excel::load("measurements.xlsx", &settings.load_options())?;
//! let table = damping_extract::process(&grid, &settings.pipeline())?;
//!
//! ExcelExporter::new(&table).export(Path::new("result.xlsx"), &settings.output_sheet)?;
//! # Ok::<(), damping_extract::ExtractError>(())
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod excel;
pub mod grid;
pub mod types;

// Re-export commonly used types
pub use config::{LoadOptions, PipelineConfig, Settings};
pub use core::{process, OutputTable};
pub use error::{ExtractError, ExtractResult};
pub use excel::load;
pub use grid::SourceGrid;
pub use types::CellValue;
