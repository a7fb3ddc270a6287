use crate::config::Settings;
use crate::core::layout::Field;
use crate::core::{process, process_with_intermediate, OutputTable};
use crate::error::{ExtractError, ExtractResult};
use crate::excel::{self, ExcelExporter};
use crate::types::CellValue;
use colored::Colorize;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// File name used when no output path is given
pub const DEFAULT_OUTPUT_FILE: &str = "result.xlsx";

const CELL_WIDTH: usize = 14;

/// Headers plus rows, as printed by `preview --json`
#[derive(Debug, Serialize)]
pub struct TableView {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

/// Destination for `process`: explicit path or `result.xlsx` beside the input,
/// always ending in `.xlsx`
pub fn output_path_for(input: &Path, output: Option<PathBuf>) -> PathBuf {
    let path = output.unwrap_or_else(|| input.with_file_name(DEFAULT_OUTPUT_FILE));
    let is_xlsx = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("xlsx"));
    if is_xlsx {
        path
    } else {
        let mut name = path.into_os_string();
        name.push(".xlsx");
        PathBuf::from(name)
    }
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

/// Execute the process command: load, build the output table, save it
pub fn process_file(
    input: PathBuf,
    output: Option<PathBuf>,
    settings: &Settings,
    verbose: bool,
) -> ExtractResult<()> {
    let output = output_path_for(&input, output);
    if same_file(&input, &output) {
        return Err(ExtractError::Config(format!(
            "output {} would overwrite the source workbook",
            output.display()
        )));
    }

    println!("{}", "📐 Damping Extract - Processing workbook".bold().green());
    println!("   Input:  {}", input.display());
    println!("   Output: {}\n", output.display());

    if verbose {
        println!(
            "{}",
            format!("📖 Reading worksheet '{}'...", settings.source_sheet).cyan()
        );
    }
    let grid = excel::load(&input, &settings.load_options())?;
    if verbose {
        println!(
            "   {} data rows from row {}, {} merged ranges\n",
            grid.row_count(),
            grid.first_row(),
            grid.merges().len()
        );
        println!(
            "{}",
            format!("🧮 Deriving {} records...", settings.total_record_count).cyan()
        );
    }

    let table = process(&grid, &settings.pipeline())?;
    if verbose {
        println!("   {} distinct anchors\n", table.anchor_count());
        println!("{}", "💾 Writing workbook...".cyan());
    }

    ExcelExporter::new(&table).export(&output, &settings.output_sheet)?;

    println!("{}", "✅ Processing Complete!".bold().green());
    println!(
        "   Sheet '{}' with {} rows saved to {}",
        settings.output_sheet,
        table.len(),
        output.display()
    );
    let source_name = input
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| input.display().to_string());
    println!("   Source workbook not modified: {}\n", source_name);

    Ok(())
}

/// Execute the preview command: print the first rows without saving
pub fn preview(
    input: PathBuf,
    settings: &Settings,
    rows: usize,
    intermediate: bool,
    json: bool,
) -> ExtractResult<()> {
    let grid = excel::load(&input, &settings.load_options())?;
    let processed = process_with_intermediate(&grid, &settings.pipeline())?;

    let (headers, records) = if intermediate {
        (processed.intermediate.headers(), processed.intermediate.records())
    } else {
        (OutputTable::headers(), processed.output.records())
    };
    let view = TableView {
        headers,
        rows: records.into_iter().take(rows).collect(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&view)?);
        return Ok(());
    }

    let title = if intermediate { "Intermediate table" } else { "Output table" };
    println!("{}", format!("📊 {} (first {} rows)", title, view.rows.len()).bold().green());
    println!("   File: {}\n", input.display());
    print_table(&view);
    Ok(())
}

/// Execute the layout command: show which worksheet row each field reads
pub fn layout(settings: &Settings, start: u32, count: u32) -> ExtractResult<()> {
    settings.validate()?;

    println!("{}", "📏 Source rows per record".bold().green());
    println!("   Data starts at row {}\n", settings.data_start_row);

    let headers: Vec<String> = std::iter::once("No".to_string())
        .chain(
            Field::ALL
                .iter()
                .map(|f| format!("{}({})", f.name(), f.source_column())),
        )
        .collect();

    let rows = (start.max(1)..start.max(1).saturating_add(count))
        .map(|n| {
            std::iter::once(CellValue::Number(f64::from(n)))
                .chain(Field::ALL.iter().map(|field| {
                    field
                        .layout()
                        .physical_row(n, settings.data_start_row)
                        .map_or(CellValue::Missing, |row| CellValue::Number(f64::from(row)))
                }))
                .collect()
        })
        .collect();

    print_table(&TableView { headers, rows });
    Ok(())
}

fn print_table(view: &TableView) {
    let header_line: String = view
        .headers
        .iter()
        .map(|h| format!("{:>width$}", h, width = CELL_WIDTH))
        .collect();
    println!("{}", header_line.bold().cyan());

    for row in &view.rows {
        let line: String = row
            .iter()
            .map(|cell| format!("{:>width$}", fit(&cell.to_string()), width = CELL_WIDTH))
            .collect();
        println!("{}", line);
    }
    println!();
}

/// Truncate to the column width so columns stay aligned
fn fit(text: &str) -> String {
    if text.chars().count() < CELL_WIDTH {
        text.to_string()
    } else {
        let mut cut: String = text.chars().take(CELL_WIDTH - 2).collect();
        cut.push('…');
        cut
    }
}
