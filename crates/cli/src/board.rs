//! `dailyboard build` and `dailyboard validate`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use clap::Args;

use dailyboard_config::{ExportFormat, Settings};
use dailyboard_report::config::SectionLayout;
use dailyboard_report::model::{Diagnostic, DiagnosticLevel, SectionKind};
use dailyboard_report::render::render_dashboard;
use dailyboard_report::{run, Board, RunOptions, TeamInput};

use crate::exit_codes::{io_exit_code, EXIT_STRICT_WARNINGS, EXIT_USAGE};
use crate::layout::{load_layout, parse_team_arg, resolve_layout_path, LoadedLayout};
use crate::util::pad_right;
use crate::{text, CliError};

#[derive(Args)]
pub struct BuildArgs {
    /// Layout TOML describing every team's sheet
    #[arg(long, short = 'l', env = "DAILYBOARD_LAYOUT")]
    pub layout: Option<PathBuf>,

    /// Input for one team, overriding the layout's `file`. Repeatable.
    #[arg(long = "team", value_name = "ID=PATH")]
    pub teams: Vec<String>,

    /// HTML output file
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Report date shown on the board (default: today)
    #[arg(long, value_name = "YYYY-MM-DD")]
    pub date: Option<NaiveDate>,

    /// Also write the board as JSON
    #[arg(long, value_name = "FILE")]
    pub json: Option<PathBuf>,

    /// Also write work.csv, attendance.csv and plan.csv into DIR
    #[arg(long, value_name = "DIR")]
    pub csv: Option<PathBuf>,

    /// Also write the board as an Excel workbook
    #[arg(long, value_name = "FILE")]
    pub xlsx: Option<PathBuf>,

    /// Print the three tables as aligned text on stdout
    #[arg(long)]
    pub print: bool,

    /// Open the HTML board in the default browser
    #[arg(long)]
    pub open: bool,

    /// Exit with code 6 when the board has warnings
    #[arg(long)]
    pub strict: bool,

    /// Keep attendance in team order instead of category priority
    #[arg(long)]
    pub no_sort: bool,

    /// Repeat the category on every attendance row
    #[arg(long)]
    pub no_merge: bool,

    /// Suppress the "wrote ..." summary on stderr
    #[arg(long, short = 'q')]
    pub quiet: bool,
}

// ---------------------------------------------------------------------------
// build
// ---------------------------------------------------------------------------

pub(crate) fn cmd_build(args: BuildArgs, settings: &Settings) -> Result<(), CliError> {
    let layout_path = resolve_layout_path(args.layout.clone(), settings)?;
    let mut loaded = load_layout(&layout_path)?;
    if args.no_merge {
        loaded.layout.attendance.merge_categories = false;
    }

    let (inputs, absent) = load_inputs(&loaded, &args.teams)?;

    let report_date = args.date.unwrap_or_else(|| chrono::Local::now().date_naive());
    let options = RunOptions {
        report_date: Some(report_date),
        sort_attendance: if args.no_sort { Some(false) } else { None },
    };
    let mut board = run(&loaded.layout, &inputs, &options);
    note_absent_inputs(&mut board, &absent);

    let html_path = args
        .output
        .clone()
        .unwrap_or_else(|| default_output(settings, report_date, "html"));
    write_file(&html_path, &render_dashboard(&board, &loaded.layout))?;
    let mut written = vec![html_path.clone()];

    let json = args
        .json
        .clone()
        .or_else(|| settings.wants(ExportFormat::Json).then(|| html_path.with_extension("json")));
    if let Some(path) = json {
        dailyboard_io::json::export(&board, &path).map_err(io_err)?;
        written.push(path);
    }

    let csv = args
        .csv
        .clone()
        .or_else(|| settings.wants(ExportFormat::Csv).then(|| sibling_dir(&html_path, "csv")));
    if let Some(dir) = csv {
        dailyboard_io::csv::export_board(&board, &loaded.layout.labels, &dir).map_err(io_err)?;
        written.push(dir);
    }

    let xlsx = args
        .xlsx
        .clone()
        .or_else(|| settings.wants(ExportFormat::Xlsx).then(|| html_path.with_extension("xlsx")));
    if let Some(path) = xlsx {
        dailyboard_io::xlsx::export_board(&board, &loaded.layout, &path).map_err(io_err)?;
        written.push(path);
    }

    if args.print {
        print!("{}", text::render_board(&board, &loaded.layout));
    }

    if !args.quiet {
        print_summary(&board, &written);
    }

    if args.open || settings.open_browser {
        if let Err(e) = open::that(&html_path) {
            log::warn!("cannot open '{}' in a browser: {e}", html_path.display());
        }
    }

    let warnings = board.warning_count();
    if args.strict && warnings > 0 {
        return Err(CliError {
            code: EXIT_STRICT_WARNINGS,
            message: format!("board has {warnings} warning(s)"),
            hint: Some("run with -v for details, or drop --strict".into()),
        });
    }
    Ok(())
}

/// Read every team that has a file, from `--team` or the layout. A layout
/// file that does not exist yet is returned in the second list and the team
/// is skipped; a missing `--team` file is an input error.
fn load_inputs(
    loaded: &LoadedLayout,
    team_args: &[String],
) -> Result<(Vec<TeamInput>, Vec<(String, PathBuf)>), CliError> {
    let mut overrides = BTreeMap::new();
    for arg in team_args {
        let (id, path) = parse_team_arg(arg)?;
        if loaded.layout.team(&id).is_none() {
            let known: Vec<&str> = loaded.layout.teams.iter().map(|t| t.id.as_str()).collect();
            return Err(CliError {
                code: EXIT_USAGE,
                message: format!("unknown team id '{id}'"),
                hint: Some(format!("layout teams: {}", known.join(", "))),
            });
        }
        overrides.insert(id, path);
    }

    let mut inputs = Vec::new();
    let mut absent = Vec::new();
    for team in &loaded.layout.teams {
        let path = match overrides.get(&team.id) {
            Some(path) => path.clone(),
            None => match loaded.team_file(team) {
                Some(path) if !path.exists() => {
                    log::warn!("team '{}': '{}' not found, skipped", team.id, path.display());
                    absent.push((team.id.clone(), path));
                    continue;
                }
                Some(path) => path,
                None => continue,
            },
        };
        let grid = dailyboard_io::load_grid(&path, team.sheet.as_deref())
            .map_err(|e| io_err(e).with_hint(format!("input for team '{}'", team.id)))?;
        inputs.push(TeamInput {
            team_id: team.id.clone(),
            grid,
        });
    }
    Ok((inputs, absent))
}

/// Replace the engine's generic "no input" note for teams whose layout file
/// is missing with one naming the file.
fn note_absent_inputs(board: &mut Board, absent: &[(String, PathBuf)]) {
    for (team_id, path) in absent {
        let note = Diagnostic::info(
            team_id,
            None,
            format!("input file not found; team skipped ({})", path.display()),
        );
        let generic = board
            .diagnostics
            .iter_mut()
            .find(|d| d.team_id == *team_id && d.section.is_none() && d.level == DiagnosticLevel::Info);
        match generic {
            Some(d) => *d = note,
            None => board.diagnostics.push(note),
        }
    }
}

fn default_output(settings: &Settings, date: NaiveDate, ext: &str) -> PathBuf {
    let name = format!("dailyboard-{}.{ext}", date.format("%Y-%m-%d"));
    match &settings.output_dir {
        Some(dir) => dir.join(name),
        None => PathBuf::from(name),
    }
}

/// `board.html` → `board-csv/`
fn sibling_dir(html: &Path, suffix: &str) -> PathBuf {
    let stem = html.file_stem().and_then(|s| s.to_str()).unwrap_or("dailyboard");
    html.with_file_name(format!("{stem}-{suffix}"))
}

fn write_file(path: &Path, contents: &str) -> Result<(), CliError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| {
            CliError::output(format!("cannot create directory '{}': {e}", parent.display()))
        })?;
    }
    std::fs::write(path, contents).map_err(|e| CliError::output(format!("cannot write '{}': {e}", path.display())))
}

fn io_err(err: dailyboard_io::IoError) -> CliError {
    CliError {
        code: io_exit_code(&err),
        message: err.to_string(),
        hint: None,
    }
}

fn print_summary(board: &Board, written: &[PathBuf]) {
    for path in written {
        eprintln!("wrote {}", path.display());
    }
    let info = board.diagnostics.len() - board.warning_count();
    eprintln!(
        "{} teams: {} work, {} attendance, {} plan rows; {} warning(s), {} note(s)",
        board.teams.len(),
        board.work.len(),
        board.attendance.len(),
        board.plan.len(),
        board.warning_count(),
        info
    );
}

// ---------------------------------------------------------------------------
// validate
// ---------------------------------------------------------------------------

pub(crate) fn cmd_validate(layout: Option<PathBuf>, settings: &Settings) -> Result<(), CliError> {
    let path = resolve_layout_path(layout, settings)?;
    let loaded = load_layout(&path)?;
    let layout = &loaded.layout;

    println!("layout '{}' is valid: {} team(s)", layout.name, layout.teams.len());
    let id_width = layout.teams.iter().map(|t| crate::util::display_width(&t.id)).max().unwrap_or(0);
    for team in &layout.teams {
        let file = match loaded.team_file(team) {
            Some(p) if p.exists() => p.display().to_string(),
            Some(p) => format!("{} (missing)", p.display()),
            None => "(no file; pass --team)".to_string(),
        };
        println!("  {}  {}  {}", pad_right(&team.id, id_width), team.name, file);
        for kind in SectionKind::ALL {
            if let Some(section) = team.section(kind) {
                println!("      {:<10} {}", kind.to_string(), describe_section(section, kind));
            }
        }
    }
    Ok(())
}

fn describe_section(section: &SectionLayout, kind: SectionKind) -> String {
    let locator = match section.start_row {
        Some(row) => format!("row {row}"),
        None => format!("anchor {:?} +{}", section.anchors, section.offset),
    };
    let mut fields: Vec<&str> = section.columns.keys().map(String::as_str).collect();
    fields.extend(section.headcount.iter().map(|h| if h.role.is_empty() { "headcount" } else { h.role.as_str() }));
    let limit = section.max_rows.map(|n| format!(", max {n} rows")).unwrap_or_default();
    format!(
        "{locator}{limit}; key {}; columns {}",
        section.key_field(kind),
        fields.join(", ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_output_uses_settings_dir() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
        let settings = Settings {
            output_dir: Some(PathBuf::from("/srv/boards")),
            ..Default::default()
        };
        assert_eq!(
            default_output(&settings, date, "html"),
            PathBuf::from("/srv/boards/dailyboard-2026-10-16.html")
        );
        assert_eq!(
            default_output(&Settings::default(), date, "html"),
            PathBuf::from("dailyboard-2026-10-16.html")
        );
    }

    #[test]
    fn absent_input_note_replaces_generic_skip() {
        let layout = dailyboard_report::Layout::from_toml(dailyboard_report::config::STARTER_LAYOUT).unwrap();
        let mut board = run(&layout, &[], &RunOptions::default());
        let absent = vec![("dock".to_string(), PathBuf::from("in/dock.xlsx"))];
        note_absent_inputs(&mut board, &absent);

        let dock: Vec<_> = board.diagnostics.iter().filter(|d| d.team_id == "dock").collect();
        assert_eq!(dock.len(), 1);
        assert_eq!(dock[0].level, DiagnosticLevel::Info);
        assert_eq!(dock[0].message, "input file not found; team skipped (in/dock.xlsx)");
        assert_eq!(board.warning_count(), 0);
    }

    #[test]
    fn csv_dir_sits_next_to_html() {
        assert_eq!(sibling_dir(Path::new("out/board.html"), "csv"), PathBuf::from("out/board-csv"));
    }

    #[test]
    fn section_description() {
        let layout = dailyboard_report::Layout::from_toml(dailyboard_report::config::STARTER_LAYOUT).unwrap();
        let heavy = layout.team("heavy").unwrap();
        let work = heavy.section(SectionKind::Work).unwrap();
        let text = describe_section(work, SectionKind::Work);
        assert!(text.starts_with("anchor [\"[금일 작업]\"] +2; key counterparty"));
        let plan = heavy.section(SectionKind::Plan).unwrap();
        assert!(describe_section(plan, SectionKind::Plan).contains("max 20 rows"));
    }
}
