use std::path::Path;

use rust_xlsxwriter::{Format, Workbook, Worksheet};

use crate::aggregate::{CellData, ReportBook, SheetTable};
use crate::error::Result;

/// Fill applied to unmapped detail rows so operators can triage them.
const HIGHLIGHT_COLOR: u32 = 0xFFF3B0;

const MIN_COLUMN_WIDTH: f64 = 10.0;
const MAX_COLUMN_WIDTH: f64 = 60.0;

/// Writes the report workbook to the given path.
pub fn write_workbook(path: &Path, book: &ReportBook) -> Result<()> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();
    let highlight_format = Format::new().set_background_color(HIGHLIGHT_COLOR);

    for table in &book.tables {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(&table.sheet_name)?;

        for (col_idx, header) in table.columns.iter().enumerate() {
            worksheet.write_string_with_format(0, col_idx as u16, header, &header_format)?;
        }

        for (row_idx, row) in table.rows.iter().enumerate() {
            let format = table
                .highlight_rows
                .contains(&(row_idx as u32))
                .then_some(&highlight_format);
            for (col_idx, cell) in row.iter().enumerate() {
                write_cell(worksheet, (row_idx + 1) as u32, col_idx as u16, cell, format)?;
            }
        }

        autosize_columns(worksheet, table)?;
    }

    workbook.save(path)?;
    Ok(())
}

fn write_cell(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    cell: &CellData,
    format: Option<&Format>,
) -> Result<()> {
    match (cell, format) {
        (CellData::Empty, None) => {}
        (CellData::Empty, Some(format)) => {
            worksheet.write_blank(row, col, format)?;
        }
        (CellData::Text(value), None) => {
            worksheet.write_string(row, col, value)?;
        }
        (CellData::Text(value), Some(format)) => {
            worksheet.write_string_with_format(row, col, value, format)?;
        }
        (CellData::Number(value), None) => {
            worksheet.write_number(row, col, *value)?;
        }
        (CellData::Number(value), Some(format)) => {
            worksheet.write_number_with_format(row, col, *value, format)?;
        }
    }
    Ok(())
}

fn autosize_columns(worksheet: &mut Worksheet, table: &SheetTable) -> Result<()> {
    for (col_idx, header) in table.columns.iter().enumerate() {
        let mut longest = header.chars().count();
        for row in &table.rows {
            if let Some(cell) = row.get(col_idx) {
                longest = longest.max(cell.width());
            }
        }
        let width = ((longest + 2) as f64).clamp(MIN_COLUMN_WIDTH, MAX_COLUMN_WIDTH);
        worksheet.set_column_width(col_idx as u16, width)?;
    }
    Ok(())
}
