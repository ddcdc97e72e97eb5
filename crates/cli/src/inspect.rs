//! `dailyboard inspect` - show where anchors sit in a raw report sheet.

use std::path::PathBuf;

use dailyboard_config::Settings;
use dailyboard_report::grid::{col_to_letter, is_blank, letter_to_col};
use dailyboard_report::locate::locate_section;
use dailyboard_report::model::SectionKind;
use dailyboard_report::{extract_team, Grid};

use crate::exit_codes::{io_exit_code, EXIT_USAGE};
use crate::layout::{load_layout, resolve_layout_path};
use crate::util::truncate_display;
use crate::CliError;

const MAX_CELL_WIDTH: usize = 60;

pub(crate) struct InspectArgs {
    pub file: PathBuf,
    pub sheet: Option<String>,
    pub column: Option<String>,
    pub rows: Option<usize>,
    pub sheets: bool,
    pub layout: Option<PathBuf>,
    pub team: Option<String>,
}

pub(crate) fn cmd_inspect(args: InspectArgs, settings: &Settings) -> Result<(), CliError> {
    let io_err = |e: dailyboard_io::IoError| CliError {
        code: io_exit_code(&e),
        message: e.to_string(),
        hint: None,
    };

    if args.sheets {
        let names = dailyboard_io::sheet_names(&args.file).map_err(io_err)?;
        if names.is_empty() {
            println!("(delimited text: single sheet)");
        }
        for (i, name) in names.iter().enumerate() {
            println!("{:>3}  {name}", i + 1);
        }
        return Ok(());
    }

    // With --team, the layout supplies the sheet and anchor column defaults
    let team_layout = match &args.team {
        Some(id) => {
            let path = resolve_layout_path(args.layout.clone(), settings)?;
            let loaded = load_layout(&path)?;
            let team = loaded.layout.team(id).cloned().ok_or_else(|| CliError {
                code: EXIT_USAGE,
                message: format!("unknown team id '{id}'"),
                hint: Some(format!("layout '{}' has no such team", path.display())),
            })?;
            Some((loaded.layout, team))
        }
        None => None,
    };

    let sheet = args
        .sheet
        .clone()
        .or_else(|| team_layout.as_ref().and_then(|(_, t)| t.sheet.clone()));
    let column = match &args.column {
        Some(c) => parse_column(c)?,
        None => team_layout.as_ref().map_or(0, |(_, t)| t.anchor_column),
    };

    let grid = dailyboard_io::load_grid(&args.file, sheet.as_deref()).map_err(io_err)?;

    let sheet_label = sheet.map(|s| format!(" sheet '{s}'")).unwrap_or_default();
    println!(
        "{}{}: {} rows x {} cols, listing column {}",
        args.file.display(),
        sheet_label,
        grid.height(),
        grid.width(),
        col_to_letter(column)
    );
    print!("{}", anchor_listing(&grid, column, args.rows));

    if let Some((layout, team)) = team_layout {
        println!();
        println!("team '{}' ({})", team.id, team.name);
        let report = extract_team(&layout, &team, &grid);
        for kind in SectionKind::ALL {
            if team.section(kind).is_none() {
                continue;
            }
            let kept = match kind {
                SectionKind::Work => report.work.len(),
                SectionKind::Attendance => report.attendance.len(),
                SectionKind::Plan => report.plan.len(),
            };
            match locate_section(&grid, &team, kind) {
                Ok(bounds) => {
                    let anchor = bounds
                        .anchor_row
                        .map(|r| format!("anchor row {}, ", r + 1))
                        .unwrap_or_default();
                    println!(
                        "  {:<10} {anchor}rows {}-{} ({} raw, {kept} kept)",
                        kind.to_string(),
                        bounds.start + 1,
                        bounds.end,
                        bounds.len()
                    );
                }
                Err(miss) => println!("  {:<10} {miss}", kind.to_string()),
            }
        }
        for d in &report.diagnostics {
            println!("  note: {d}");
        }
    }
    Ok(())
}

/// `3` or `C`
fn parse_column(text: &str) -> Result<usize, CliError> {
    let text = text.trim();
    text.parse::<usize>()
        .ok()
        .or_else(|| letter_to_col(&text.to_ascii_uppercase()))
        .ok_or_else(|| CliError::usage(format!("invalid column '{text}'")).with_hint("use a 0-based index or a letter like C"))
}

/// Non-blank cells of `column` with 1-based row numbers.
fn anchor_listing(grid: &Grid, column: usize, limit: Option<usize>) -> String {
    let end = limit.map_or(grid.height(), |n| n.min(grid.height()));
    let width = end.to_string().len();
    let mut out = String::new();
    for row in 0..end {
        let cell = grid.cell(row, column);
        if is_blank(cell) {
            continue;
        }
        out.push_str(&format!(
            "{:>width$}  {}\n",
            row + 1,
            truncate_display(cell, MAX_CELL_WIDTH)
        ));
    }
    if out.is_empty() {
        out.push_str(&format!("(column {} is blank)\n", col_to_letter(column)));
    }
    out
}
