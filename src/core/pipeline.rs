//! The `process` entry point: intermediate table, then output table

use super::intermediate::IntermediateTable;
use super::output::OutputTable;
use crate::config::PipelineConfig;
use crate::error::ExtractResult;
use crate::grid::SourceGrid;
use tracing::{debug, info};

/// Both tables of one run
#[derive(Debug, Clone, PartialEq)]
pub struct Processed {
    pub intermediate: IntermediateTable,
    pub output: OutputTable,
}

/// Build the output table for `grid`.
///
/// Only an invalid `config` fails; unreadable cells and numeric domain
/// problems show up as missing values in the affected cells.
pub fn process(grid: &SourceGrid, config: &PipelineConfig) -> ExtractResult<OutputTable> {
    process_with_intermediate(grid, config).map(|processed| processed.output)
}

/// Like [`process`], keeping the intermediate table for inspection
pub fn process_with_intermediate(
    grid: &SourceGrid,
    config: &PipelineConfig,
) -> ExtractResult<Processed> {
    config.validate()?;

    info!(
        records = config.total_record_count,
        data_start_row = config.data_start_row,
        "building intermediate table"
    );
    let intermediate = IntermediateTable::build(grid, config);
    let output = OutputTable::build(&intermediate);
    debug!(anchors = output.anchor_count(), "output table built");

    Ok(Processed {
        intermediate,
        output,
    })
}
