//! Workbook fixtures shared by the integration tests

#![allow(dead_code)]

use rust_xlsxwriter::{Format, Workbook, XlsxError};
use std::path::Path;

// 0-based worksheet columns
pub const COL_F: u16 = 5;
pub const COL_H: u16 = 7;
pub const COL_I: u16 = 8;
pub const COL_K: u16 = 10;
pub const COL_R: u16 = 17;
pub const COL_AB: u16 = 27;
pub const COL_AD: u16 = 29;
pub const COL_AH: u16 = 33;

/// 1-based worksheet row → 0-based writer row
pub fn row(n: u32) -> u32 {
    n - 1
}

/// Three records on "Sheet1" with data starting at row 14.
///
/// - record 1: anchor 10, label "Alpha", K=1.0, L=0.5, V=0.25
/// - record 2: anchor 10 again, label "Beta"
/// - record 3: anchor 20 read through a merge (H187:H188), label "Gamma"
///   read through a merge (H190:I191)
pub fn write_block_workbook(path: &Path) -> Result<(), XlsxError> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name("Sheet1")?;
    let format = Format::new();

    sheet.write_string(0, 0, "measurement report")?;

    // record 1
    sheet.write_number(row(14), COL_H, 10.0)?;
    sheet.write_string(row(16), COL_H, "Alpha")?;
    sheet.write_number(row(23), COL_K, 1.0)?;
    sheet.write_number(row(28), COL_AB, 3.5)?;
    sheet.write_number(row(28), COL_AH, 4.5)?;
    sheet.write_number(row(28), COL_AD, 0.25)?;
    sheet.write_number(row(31), COL_F, 1.5)?;
    sheet.write_number(row(31), COL_R, 2.5)?;
    sheet.write_number(row(31), COL_K, 0.5)?;

    // record 2
    sheet.write_number(row(103), COL_H, 10.0)?;
    sheet.write_string(row(105), COL_H, "Beta")?;
    sheet.write_number(row(120), COL_F, 9.9)?;

    // record 3
    sheet.merge_range(row(187), COL_H, row(188), COL_H, "", &format)?;
    sheet.write_number_with_format(row(187), COL_H, 20.0, &format)?;
    sheet.merge_range(row(190), COL_H, row(191), COL_I, "Gamma", &format)?;

    workbook.save(path)
}
