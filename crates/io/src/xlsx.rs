// Excel file import (xlsx, xlsm, xls, xlsb, ods) and board export (xlsx only)
//
// Import: cell values flattened to display strings in a `Grid`.
// Export: presentation snapshot of the board, one worksheet per section.

use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader, Sheets};
use chrono::{Duration, NaiveDate};
use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, Workbook, Worksheet, XlsxError};

use dailyboard_report::config::Layout;
use dailyboard_report::order::{group_by_category, CategoryPriority};
use dailyboard_report::table::{attendance_headers, plan_table, work_table, SectionTable};
use dailyboard_report::{AttendanceRecord, Board, Grid};

use crate::error::IoError;

/// Safety caps for pathological sheets.
const MAX_ROWS: usize = 100_000;
const MAX_COLS: usize = 256;

/// Excel's 1900 date system, including its phantom 1900-02-29.
const EXCEL_EPOCH: (i32, u32, u32) = (1899, 12, 30);

fn open(path: &Path) -> Result<Sheets<std::io::BufReader<std::fs::File>>, IoError> {
    open_workbook_auto(path).map_err(|source| IoError::Workbook {
        path: path.to_path_buf(),
        source,
    })
}

pub fn sheet_names(path: &Path) -> Result<Vec<String>, IoError> {
    Ok(open(path)?.sheet_names().to_vec())
}

/// Import one sheet. `sheet` selects by name (whitespace-trimmed); the first
/// sheet is used when it is `None`.
pub fn import(path: &Path, sheet: Option<&str>) -> Result<Grid, IoError> {
    let mut workbook = open(path)?;
    let names: Vec<String> = workbook.sheet_names().to_vec();

    let name = match sheet {
        Some(wanted) => names
            .iter()
            .find(|n| n.trim() == wanted.trim())
            .cloned()
            .ok_or_else(|| IoError::SheetNotFound {
                path: path.to_path_buf(),
                sheet: wanted.to_string(),
                available: names.clone(),
            })?,
        None => names.first().cloned().ok_or_else(|| IoError::NoSheets {
            path: path.to_path_buf(),
        })?,
    };

    let range = workbook.worksheet_range(&name).map_err(|source| IoError::Workbook {
        path: path.to_path_buf(),
        source,
    })?;

    let (height, width) = range.get_size();
    if height == 0 || width == 0 {
        return Ok(Grid::default());
    }
    if height > MAX_ROWS || width > MAX_COLS {
        log::warn!(
            "sheet '{name}' truncated from {height}x{width} to {}x{}",
            height.min(MAX_ROWS),
            width.min(MAX_COLS)
        );
    }

    // Range start offset (data may not begin at A1)
    let (start_row, start_col) = range.start().unwrap_or((0, 0));
    let (start_row, start_col) = (start_row as usize, start_col as usize);

    let mut rows: Vec<Vec<String>> = vec![Vec::new(); start_row.min(MAX_ROWS)];
    for row in range.rows() {
        if rows.len() >= MAX_ROWS {
            break;
        }
        let mut cells = vec![String::new(); start_col.min(MAX_COLS)];
        for cell in row {
            if cells.len() >= MAX_COLS {
                break;
            }
            cells.push(cell_text(cell));
        }
        rows.push(cells);
    }

    log::debug!("'{}' sheet '{name}': {} rows", path.display(), rows.len());
    Ok(Grid::from_rows(rows))
}

/// Display text of one cell.
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        // Integral floats print without decimals
        Data::Float(n) => {
            if n.fract() == 0.0 && n.abs() < 1e15 {
                format!("{}", *n as i64)
            } else {
                format!("{}", n)
            }
        }
        Data::Int(n) => n.to_string(),
        Data::Bool(b) => (if *b { "TRUE" } else { "FALSE" }).to_string(),
        Data::Error(e) => e.to_string(),
        Data::DateTime(dt) => format_serial(dt.as_f64()),
        Data::DateTimeIso(s) => s.strip_suffix("T00:00:00").unwrap_or(s.as_str()).to_string(),
        Data::DurationIso(s) => s.clone(),
    }
}

/// Excel serial to text: `YYYY-MM-DD`, with ` HH:MM` when a time part is
/// present, or `HH:MM` alone for pure times.
pub fn format_serial(serial: f64) -> String {
    let days = serial.floor();
    let seconds = ((serial - days) * 86_400.0).round() as i64;

    let Some(epoch) = NaiveDate::from_ymd_opt(EXCEL_EPOCH.0, EXCEL_EPOCH.1, EXCEL_EPOCH.2) else {
        return serial.to_string();
    };
    let Some(midnight) = epoch
        .checked_add_signed(Duration::days(days as i64))
        .and_then(|d| d.and_hms_opt(0, 0, 0))
    else {
        return serial.to_string();
    };
    let stamp = midnight + Duration::seconds(seconds);

    if days == 0.0 && seconds > 0 {
        stamp.format("%H:%M").to_string()
    } else if seconds == 0 || seconds == 86_400 {
        stamp.format("%Y-%m-%d").to_string()
    } else {
        stamp.format("%Y-%m-%d %H:%M").to_string()
    }
}

// ---------------------------------------------------------------------------
// Export
// ---------------------------------------------------------------------------

struct Formats {
    header: Format,
    cell: Format,
    category: Format,
}

impl Formats {
    fn new() -> Self {
        let cell = Format::new()
            .set_border(FormatBorder::Thin)
            .set_align(FormatAlign::Center)
            .set_align(FormatAlign::VerticalCenter)
            .set_text_wrap();
        Self {
            header: cell
                .clone()
                .set_bold()
                .set_font_color(Color::White)
                .set_background_color(Color::RGB(0x003366)),
            category: cell.clone().set_bold().set_background_color(Color::RGB(0xF8F9FA)),
            cell,
        }
    }
}

/// Write the board as a workbook with one sheet per section. Attendance
/// category cells are merged per group when the layout asks for it.
pub fn export_board(board: &Board, layout: &Layout, path: &Path) -> Result<(), IoError> {
    let labels = &layout.labels;
    let formats = Formats::new();
    let mut workbook = Workbook::new();

    let work = work_table(&board.work, labels);
    write_table(workbook.add_worksheet(), &work, &formats)?;

    let attendance = workbook.add_worksheet();
    attendance.set_name(sheet_name(&labels.attendance_heading, "attendance"))?;
    write_header(attendance, &attendance_headers(labels), &formats)?;
    if layout.attendance.merge_categories {
        let priority = CategoryPriority::new(&layout.attendance.priority);
        write_attendance_merged(attendance, &board.attendance, &priority, &formats)?;
    } else {
        write_attendance_plain(attendance, &board.attendance, &formats)?;
    }
    attendance.set_column_width(2, 36)?;

    let plan = plan_table(&board.plan, labels);
    write_table(workbook.add_worksheet(), &plan, &formats)?;

    workbook.save(path).map_err(|e| match e {
        XlsxError::IoError(source) => IoError::Write {
            path: path.to_path_buf(),
            source,
        },
        other => IoError::Xlsx(other),
    })?;
    log::info!("wrote '{}'", path.display());
    Ok(())
}

/// Worksheet names: at most 31 chars, none of `[]:*?/\`.
fn sheet_name(heading: &str, fallback: &str) -> String {
    let cleaned: String = heading
        .chars()
        .filter(|c| !matches!(c, '[' | ']' | ':' | '*' | '?' | '/' | '\\'))
        .take(31)
        .collect();
    let cleaned = cleaned.trim().trim_matches('\'').to_string();
    if cleaned.is_empty() {
        fallback.to_string()
    } else {
        cleaned
    }
}

fn write_header(sheet: &mut Worksheet, headers: &[String], formats: &Formats) -> Result<(), XlsxError> {
    for (col, caption) in headers.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, caption, &formats.header)?;
        sheet.set_column_width(col as u16, 18)?;
    }
    sheet.set_freeze_panes(1, 0)?;
    Ok(())
}

fn write_table(sheet: &mut Worksheet, table: &SectionTable, formats: &Formats) -> Result<(), XlsxError> {
    let fallback = table.kind.to_string();
    sheet.set_name(sheet_name(&table.title, &fallback))?;
    write_header(sheet, &table.headers, formats)?;
    for (r, row) in table.rows.iter().enumerate() {
        for (c, value) in row.iter().enumerate() {
            sheet.write_string_with_format(r as u32 + 1, c as u16, value, &formats.cell)?;
        }
    }
    Ok(())
}

fn write_attendance_plain(
    sheet: &mut Worksheet,
    rows: &[AttendanceRecord],
    formats: &Formats,
) -> Result<(), XlsxError> {
    for (r, rec) in rows.iter().enumerate() {
        let row = r as u32 + 1;
        sheet.write_string_with_format(row, 0, &rec.category, &formats.category)?;
        sheet.write_string_with_format(row, 1, &rec.team, &formats.cell)?;
        sheet.write_string_with_format(row, 2, rec.status(), &formats.cell)?;
    }
    Ok(())
}

fn write_attendance_merged(
    sheet: &mut Worksheet,
    rows: &[AttendanceRecord],
    priority: &CategoryPriority,
    formats: &Formats,
) -> Result<(), XlsxError> {
    let mut row = 1u32;
    for group in group_by_category(rows, priority) {
        let span = group.rows.len() as u32;
        // merge_range rejects single-cell ranges
        if span > 1 {
            sheet.merge_range(row, 0, row + span - 1, 0, group.category, &formats.category)?;
        } else {
            sheet.write_string_with_format(row, 0, group.category, &formats.category)?;
        }
        for (i, rec) in group.rows.iter().enumerate() {
            let r = row + i as u32;
            sheet.write_string_with_format(r, 1, &rec.team, &formats.cell)?;
            sheet.write_string_with_format(r, 2, rec.status(), &formats.cell)?;
        }
        row += span;
    }
    Ok(())
}
