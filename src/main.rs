use clap::{Args, Parser, Subcommand};
use damping_extract::cli;
use damping_extract::config::{Settings, SettingsOverrides};
use damping_extract::error::ExtractResult;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "damping-extract")]
#[command(about = "Extract block-layout measurements and derive decay figures into a new .xlsx")]
#[command(long_about = "Damping Extract - block-layout measurement extraction
Reads one worksheet in 85-row blocks | merged cells resolve to their top-left value

FIELDS PER RECORD:
  B, C          - labels from column H (B is the record anchor, written as
                  output column C)
  D, E, G, H    - readings from columns F, R, AB, AH
  K, L, U, V    - readings from columns K and AD, scaled by 1000
  F, I          - damping derived from L/K and V/U

COMMANDS:
  process   - Build the output table and save it as .xlsx
  preview   - Print the first rows without writing anything
  layout    - Show which worksheet rows each record reads

EXAMPLES:
  damping-extract process input.xls                   # writes result.xlsx beside it
  damping-extract process input.xlsx -o out/run1.xlsx
  damping-extract preview input.xlsx --rows 5 --intermediate
  damping-extract layout --start 1 --count 4

The source workbook is never modified.")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct SettingsArgs {
    /// YAML settings file (source_sheet, output_sheet, data_start_row, total_record_count)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Worksheet to read
    #[arg(long)]
    sheet: Option<String>,

    /// Name of the worksheet written to the output file
    #[arg(long)]
    output_sheet: Option<String>,

    /// First worksheet row holding real data (1-based)
    #[arg(long)]
    data_start_row: Option<u32>,

    /// Number of records to synthesise
    #[arg(long)]
    records: Option<u32>,
}

impl SettingsArgs {
    fn resolve(self) -> ExtractResult<Settings> {
        Settings::resolve(
            self.config.as_deref(),
            SettingsOverrides {
                source_sheet: self.sheet,
                output_sheet: self.output_sheet,
                data_start_row: self.data_start_row,
                total_record_count: self.records,
            },
        )
    }
}

#[derive(Subcommand)]
enum Commands {
    #[command(long_about = "Build the output table and save it as a single-sheet .xlsx.

Reads the source worksheet, resolves every field of every record (merged
cells take their top-left value), derives damping columns F and I, then
keeps one row per record whose columns are filled from the record's anchor
group (first occurrence wins).

OUTPUT:
  Defaults to result.xlsx in the input's directory.
  '.xlsx' is appended when the given path does not end with it.
  The file is written to a temporary name first and renamed into place,
  so a failed save leaves any existing file untouched.

EXAMPLE:
  damping-extract process measurements.xls -o result.xlsx --records 500")]
    /// Build the output table and save it as .xlsx
    Process {
        /// Source workbook (.xls, .xlsx or .xlsm)
        input: PathBuf,

        /// Output workbook path
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        settings: SettingsArgs,

        /// Show verbose processing steps
        #[arg(short, long)]
        verbose: bool,
    },

    /// Print the first rows of the output (or intermediate) table
    Preview {
        /// Source workbook (.xls, .xlsx or .xlsm)
        input: PathBuf,

        #[command(flatten)]
        settings: SettingsArgs,

        /// Number of rows to print
        #[arg(short, long, default_value_t = 10)]
        rows: usize,

        /// Show all intermediate columns instead of the output table
        #[arg(long)]
        intermediate: bool,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,

        /// Show info-level logs
        #[arg(short, long)]
        verbose: bool,
    },

    /// Show which worksheet row each field of a record is read from
    Layout {
        #[command(flatten)]
        settings: SettingsArgs,

        /// First record number
        #[arg(long, default_value_t = 1)]
        start: u32,

        /// Number of records to show
        #[arg(long, default_value_t = 5)]
        count: u32,
    },
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "damping_extract=info"
    } else {
        "damping_extract=warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExtractResult<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Process {
            input,
            output,
            settings,
            verbose,
        } => {
            init_tracing(verbose);
            cli::process_file(input, output, &settings.resolve()?, verbose)
        }

        Commands::Preview {
            input,
            settings,
            rows,
            intermediate,
            json,
            verbose,
        } => {
            init_tracing(verbose);
            cli::preview(input, &settings.resolve()?, rows, intermediate, json)
        }

        Commands::Layout {
            settings,
            start,
            count,
        } => {
            init_tracing(false);
            cli::layout(&settings.resolve()?, start, count)
        }
    }
}
