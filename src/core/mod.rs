//! Extraction and derivation pipeline

pub mod derive;
pub mod intermediate;
pub mod layout;
pub mod output;
pub mod pipeline;

pub use derive::Damping;
pub use intermediate::{IntermediateColumn, IntermediateRow, IntermediateTable};
pub use layout::{Field, FieldLayout};
pub use output::{OutputRow, OutputTable, OUTPUT_COLUMNS};
pub use pipeline::{process, process_with_intermediate, Processed};
