use std::path::Path;

use rust_xlsxwriter::{Color, Format, FormatAlign, Workbook, Worksheet};

use crate::staffing::recon::error::Result;
use crate::staffing::recon::io::excel_read::date_to_serial;
use crate::staffing::recon::report::{CellValue, HEADER_FILL, ReportCell, ReportWorkbook, SheetTable};

const DATE_FORMAT: &str = "dd.mm.yyyy";

/// Writes the report workbook to the given path.
pub fn write_report(path: &Path, report: &ReportWorkbook) -> Result<()> {
    let mut workbook = build_workbook(report)?;
    workbook.save(path)?;
    Ok(())
}

/// Serialises the report workbook into `.xlsx` bytes.
pub fn report_to_bytes(report: &ReportWorkbook) -> Result<Vec<u8>> {
    let mut workbook = build_workbook(report)?;
    Ok(workbook.save_to_buffer()?)
}

fn build_workbook(report: &ReportWorkbook) -> Result<Workbook> {
    let mut workbook = Workbook::new();
    for table in &report.tables {
        let worksheet = workbook.add_worksheet();
        write_table(worksheet, table)?;
    }
    Ok(workbook)
}

fn write_table(worksheet: &mut Worksheet, table: &SheetTable) -> Result<()> {
    worksheet.set_name(&table.sheet_name)?;

    let header_format = Format::new()
        .set_bold()
        .set_background_color(Color::RGB(HEADER_FILL))
        .set_align(FormatAlign::VerticalCenter);

    for (col_idx, header) in table.columns.iter().enumerate() {
        worksheet.write_string_with_format(0, col_idx as u16, header, &header_format)?;
    }
    for (col_idx, width) in table.widths.iter().enumerate() {
        worksheet.set_column_width(col_idx as u16, *width)?;
    }

    for (row_idx, row) in table.rows.iter().enumerate() {
        for (col_idx, cell) in row.iter().enumerate() {
            write_cell(worksheet, (row_idx + 1) as u32, col_idx as u16, cell)?;
        }
    }

    let col_end = (table.columns.len() as u16).saturating_sub(1);
    let row_end = table.rows.len() as u32;
    worksheet.set_freeze_panes(1, 0)?;
    worksheet.autofilter(0, 0, row_end, col_end)?;
    Ok(())
}

fn write_cell(worksheet: &mut Worksheet, row: u32, col: u16, cell: &ReportCell) -> Result<()> {
    let mut format = Format::new();
    if let Some(fill) = cell.fill {
        format = format.set_background_color(Color::RGB(fill));
    }

    match &cell.value {
        CellValue::Blank => {
            if cell.fill.is_some() {
                worksheet.write_blank(row, col, &format)?;
            }
        }
        CellValue::Text(value) => {
            worksheet.write_string_with_format(row, col, value, &format)?;
        }
        CellValue::Number(value) => {
            worksheet.write_number_with_format(row, col, *value, &format)?;
        }
        CellValue::Date(date) => {
            let format = format.set_num_format(DATE_FORMAT);
            worksheet.write_number_with_format(row, col, date_to_serial(*date), &format)?;
        }
    }
    Ok(())
}
