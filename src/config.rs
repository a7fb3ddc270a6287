//! Run settings: defaults, optional YAML file, CLI overrides

use crate::error::{ExtractError, ExtractResult};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// First worksheet row holding real data
pub const DEFAULT_DATA_START_ROW: u32 = 14;

/// Records synthesised per run
pub const DEFAULT_TOTAL_RECORDS: u32 = 9999;

/// Upper bound on `total_record_count`
pub const MAX_TOTAL_RECORDS: u32 = 1_000_000;

pub const DEFAULT_SOURCE_SHEET: &str = "Sheet1";
pub const DEFAULT_OUTPUT_SHEET: &str = "Sheet3";

/// All settings of one run, as read from a YAML file
///
/// ```yaml
/// source_sheet: Sheet1
/// output_sheet: Sheet3
/// data_start_row: 14
/// total_record_count: 9999
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub source_sheet: String,
    pub output_sheet: String,
    pub data_start_row: u32,
    pub total_record_count: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            source_sheet: DEFAULT_SOURCE_SHEET.to_string(),
            output_sheet: DEFAULT_OUTPUT_SHEET.to_string(),
            data_start_row: DEFAULT_DATA_START_ROW,
            total_record_count: DEFAULT_TOTAL_RECORDS,
        }
    }
}

impl Settings {
    pub fn from_yaml_str(content: &str) -> ExtractResult<Self> {
        let settings: Settings = serde_yaml::from_str(content)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn from_yaml_file(path: &Path) -> ExtractResult<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Load `path` if given, otherwise use defaults
    pub fn load(path: Option<&Path>) -> ExtractResult<Self> {
        match path {
            Some(path) => Self::from_yaml_file(path),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> ExtractResult<()> {
        if self.source_sheet.trim().is_empty() {
            return Err(ExtractError::Config("source_sheet must not be empty".to_string()));
        }
        if self.output_sheet.trim().is_empty() {
            return Err(ExtractError::Config("output_sheet must not be empty".to_string()));
        }
        self.pipeline().validate()
    }

    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            sheet_name: self.source_sheet.clone(),
            data_start_row: self.data_start_row,
        }
    }

    pub fn pipeline(&self) -> PipelineConfig {
        PipelineConfig {
            data_start_row: self.data_start_row,
            total_record_count: self.total_record_count,
        }
    }
}

/// Command-line values that take precedence over the settings file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsOverrides {
    pub source_sheet: Option<String>,
    pub output_sheet: Option<String>,
    pub data_start_row: Option<u32>,
    pub total_record_count: Option<u32>,
}

impl Settings {
    /// Defaults, then the YAML file at `path` (if any), then `overrides`
    pub fn resolve(path: Option<&Path>, overrides: SettingsOverrides) -> ExtractResult<Self> {
        let mut settings = Self::load(path)?;
        if let Some(sheet) = overrides.source_sheet {
            settings.source_sheet = sheet;
        }
        if let Some(sheet) = overrides.output_sheet {
            settings.output_sheet = sheet;
        }
        if let Some(row) = overrides.data_start_row {
            settings.data_start_row = row;
        }
        if let Some(count) = overrides.total_record_count {
            settings.total_record_count = count;
        }
        settings.validate()?;
        Ok(settings)
    }
}

/// What to read from the source workbook
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadOptions {
    pub sheet_name: String,
    /// Rows above this are skipped for literal values (merges are still read)
    pub data_start_row: u32,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Settings::default().load_options()
    }
}

/// Parameters of [`crate::core::process`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineConfig {
    pub data_start_row: u32,
    pub total_record_count: u32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            data_start_row: DEFAULT_DATA_START_ROW,
            total_record_count: DEFAULT_TOTAL_RECORDS,
        }
    }
}

impl PipelineConfig {
    pub fn validate(&self) -> ExtractResult<()> {
        if self.data_start_row == 0 {
            return Err(ExtractError::Config(
                "data_start_row is 1-based and must be at least 1".to_string(),
            ));
        }
        if self.total_record_count == 0 {
            return Err(ExtractError::Config(
                "total_record_count must be at least 1".to_string(),
            ));
        }
        if self.total_record_count > MAX_TOTAL_RECORDS {
            return Err(ExtractError::Config(format!(
                "total_record_count {} exceeds the maximum of {}",
                self.total_record_count, MAX_TOTAL_RECORDS
            )));
        }
        Ok(())
    }
}
