use chrono::NaiveDate;

use crate::aggregate::{concat_reports, summarize};
use crate::clean::{clean_rows, fill_down, DenyList};
use crate::config::{Layout, SectionLayout, TeamLayout};
use crate::extract::{extract_rows, resolve_columns};
use crate::grid::{is_blank, Grid};
use crate::locate::{boundary_rows, locate_with_boundaries};
use crate::model::{
    AttendanceRecord, Board, BoardMeta, Diagnostic, ExtractedRow, PlanRecord, SectionKind, TeamInput,
    TeamReport, WorkRecord,
};
use crate::order::{sort_attendance, CategoryPriority};

/// Per-run overrides of layout defaults.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub report_date: Option<NaiveDate>,
    /// Overrides `attendance.sort` from the layout.
    pub sort_attendance: Option<bool>,
}

/// Build the board: extract every team that has an input, concatenate in
/// layout order, optionally sort attendance.
pub fn run(layout: &Layout, inputs: &[TeamInput], options: &RunOptions) -> Board {
    let mut reports = Vec::new();
    let mut diagnostics = Vec::new();

    for input in inputs {
        if layout.team(&input.team_id).is_none() {
            diagnostics.push(Diagnostic::warning(
                &input.team_id,
                None,
                "input does not match any team in the layout; ignored",
            ));
        }
    }

    for team in &layout.teams {
        let Some(input) = inputs.iter().find(|i| i.team_id == team.id) else {
            log::info!("team '{}': no input, skipped", team.id);
            diagnostics.push(Diagnostic::info(&team.id, None, "no input file; team skipped"));
            continue;
        };
        let report = extract_team(layout, team, &input.grid);
        log::info!(
            "team '{}': {} work, {} attendance, {} plan rows",
            team.id,
            report.work.len(),
            report.attendance.len(),
            report.plan.len()
        );
        diagnostics.extend(report.diagnostics.iter().cloned());
        reports.push(report);
    }

    let mut sections = concat_reports(&reports);
    if options.sort_attendance.unwrap_or(layout.attendance.sort) {
        let priority = CategoryPriority::new(&layout.attendance.priority);
        sort_attendance(&mut sections.attendance, &priority);
    }

    Board {
        meta: BoardMeta {
            layout_name: layout.name.clone(),
            title: layout.title().to_string(),
            report_date: options.report_date,
            generated_at: chrono::Utc::now().to_rfc3339(),
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
        },
        work: sections.work,
        attendance: sections.attendance,
        plan: sections.plan,
        teams: summarize(&reports),
        diagnostics,
    }
}

/// Extract one team's three sections. Never fails: a missing anchor or
/// column leaves that section empty and records a warning.
pub fn extract_team(layout: &Layout, team: &TeamLayout, grid: &Grid) -> TeamReport {
    let mut report = TeamReport {
        team_id: team.id.clone(),
        team_name: team.name.clone(),
        ..Default::default()
    };

    if grid.is_empty() {
        report
            .diagnostics
            .push(Diagnostic::warning(&team.id, None, "sheet is empty"));
        return report;
    }

    let deny = DenyList::for_team(layout, team);
    let boundaries = boundary_rows(grid, team);

    for kind in SectionKind::ALL {
        let Some(section) = team.section(kind) else {
            continue;
        };
        let rows = extract_section(grid, team, kind, section, &boundaries, &deny, &mut report.diagnostics);
        match kind {
            SectionKind::Work => report.work = rows.iter().map(|r| work_record(team, r)).collect(),
            SectionKind::Attendance => {
                report.attendance = rows.iter().map(|r| attendance_record(team, r)).collect()
            }
            SectionKind::Plan => report.plan = rows.iter().map(|r| plan_record(team, r)).collect(),
        }
    }

    report
}

fn extract_section(
    grid: &Grid,
    team: &TeamLayout,
    kind: SectionKind,
    section: &SectionLayout,
    boundaries: &[usize],
    deny: &DenyList,
    diagnostics: &mut Vec<Diagnostic>,
) -> Vec<ExtractedRow> {
    let bounds = match locate_with_boundaries(grid, team, section, boundaries) {
        Ok(b) => b,
        Err(miss) => {
            log::warn!("team '{}', {kind}: {miss}", team.id);
            diagnostics.push(Diagnostic::warning(&team.id, Some(kind), miss.to_string()));
            return Vec::new();
        }
    };

    let key = section.key_field(kind);
    let resolution = match resolve_columns(grid, section, key, &bounds) {
        Ok(r) => r,
        Err(miss) => {
            log::warn!("team '{}', {kind}: {miss}", team.id);
            diagnostics.push(Diagnostic::warning(&team.id, Some(kind), miss.to_string()));
            return Vec::new();
        }
    };
    for miss in &resolution.out_of_range {
        diagnostics.push(Diagnostic::info(&team.id, Some(kind), format!("{miss}; read as blank")));
    }

    let mut rows = extract_rows(grid, &bounds, &resolution.columns);
    let raw = rows.len();
    fill_down(&mut rows, &section.fill_down, deny);
    let rows = clean_rows(rows, key, deny);

    log::debug!(
        "team '{}', {kind}: rows {}..{} -> {raw} raw, {} kept",
        team.id,
        bounds.start + 1,
        bounds.end,
        rows.len()
    );

    if rows.is_empty() {
        diagnostics.push(Diagnostic::info(&team.id, Some(kind), "no data rows"));
    }
    rows
}

fn team_value(team: &TeamLayout, row: &ExtractedRow) -> String {
    let mapped = row.get("team");
    if is_blank(mapped) {
        team.name.clone()
    } else {
        mapped.to_string()
    }
}

fn work_record(team: &TeamLayout, row: &ExtractedRow) -> WorkRecord {
    WorkRecord {
        team: team_value(team, row),
        counterparty: row.get("counterparty").to_string(),
        description: row.get("description").to_string(),
        responsible: row.get("responsible").to_string(),
        remark: row.get("remark").to_string(),
    }
}

fn attendance_record(team: &TeamLayout, row: &ExtractedRow) -> AttendanceRecord {
    AttendanceRecord {
        category: row.get("category").to_string(),
        team: team_value(team, row),
        headcount: row.headcount.clone(),
    }
}

fn plan_record(team: &TeamLayout, row: &ExtractedRow) -> PlanRecord {
    PlanRecord {
        team: team_value(team, row),
        counterparty: row.get("counterparty").to_string(),
        description: row.get("description").to_string(),
        date: row.get("date").to_string(),
        remark: row.get("remark").to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DiagnosticLevel;

    const LAYOUT: &str = r#"
name = "daily"
title = "전사 일일 현황"

[[teams]]
id = "heavy"
name = "중량물팀"
stop_anchors = ["특이사항"]

[teams.work]
anchors = ["[금일 작업]"]
offset = 2
[teams.work.columns]
counterparty = 0
description = 1
responsible = { header = ["담당자", "담당"] }
remark = 3

[teams.attendance]
anchors = ["[근태 현황]"]
offset = 2
fill_down = ["category"]
[teams.attendance.columns]
category = 0
[[teams.attendance.headcount]]
role = "반장"
column = 1
[[teams.attendance.headcount]]
role = "기사"
column = 2

[teams.plan]
anchors = ["[예정 작업]"]
offset = 2
[teams.plan.columns]
counterparty = 0
description = 1
date = 2

[[teams]]
id = "dock"
name = "하역팀"

[teams.work]
anchors = ["금일"]
match = "contains"
offset = 1
[teams.work.columns]
team = 0
counterparty = 1
description = 2

[teams.attendance]
anchors = ["근태"]
match = "contains"
offset = 1
[teams.attendance.columns]
category = 0
team = 1
[[teams.attendance.headcount]]
column = 2
"#;

    fn heavy_sheet() -> Grid {
        Grid::from_strs(&[
            &["중량물팀 일일 보고"],
            &["[금일 작업]"],
            &["거래처", "작업 내용", "담당", "비고"],
            &["A해운", "크레인 양하", "김반장", ""],
            &["", "", "", ""],
            &["거래처", "작업 내용", "담당", "비고"],
            &["B물산", "중량물 운송", "이기사", "야간"],
            &["[근태 현황]"],
            &["구분", "반장", "기사"],
            &["작업", "1", "4"],
            &["", "0", "2"],
            &["휴가", "", "1"],
            &["특이사항"],
            &["없음"],
            &["[예정 작업]"],
            &["거래처", "내용", "일자"],
            &["C상사", "설비 반입", "2026-10-17"],
            &["nan", "", ""],
        ])
    }

    fn dock_sheet() -> Grid {
        Grid::from_strs(&[
            &["1. 금일 작업 현황"],
            &["1부두", "D해운", "컨테이너 하역"],
            &["2부두", "거래처", "작업내용"],
            &["2. 근태 현황"],
            &["출장", "하역1반", "2명"],
            &["작업", "하역2반", "12명"],
        ])
    }

    fn inputs() -> Vec<TeamInput> {
        vec![
            TeamInput { team_id: "dock".into(), grid: dock_sheet() },
            TeamInput { team_id: "heavy".into(), grid: heavy_sheet() },
        ]
    }

    #[test]
    fn heavy_team_extraction() {
        let layout = Layout::from_toml(LAYOUT).unwrap();
        let report = extract_team(&layout, &layout.teams[0], &heavy_sheet());

        assert_eq!(report.work.len(), 2);
        assert_eq!(report.work[0].counterparty, "A해운");
        assert_eq!(report.work[0].responsible, "김반장");
        assert_eq!(report.work[0].team, "중량물팀");
        assert_eq!(report.work[1].remark, "야간");

        assert_eq!(report.attendance.len(), 3);
        assert_eq!(report.attendance[1].category, "작업");
        assert_eq!(report.attendance[1].status(), "반장 0, 기사 2");
        assert_eq!(report.attendance[2].category, "휴가");

        assert_eq!(report.plan.len(), 1);
        assert_eq!(report.plan[0].date, "2026-10-17");
        assert!(report
            .diagnostics
            .iter()
            .all(|d| d.level != DiagnosticLevel::Warning));
    }

    #[test]
    fn dock_team_uses_mapped_team_column() {
        let layout = Layout::from_toml(LAYOUT).unwrap();
        let report = extract_team(&layout, &layout.teams[1], &dock_sheet());
        assert_eq!(report.work.len(), 1);
        assert_eq!(report.work[0].team, "1부두");
        assert_eq!(report.attendance.len(), 2);
        assert_eq!(report.attendance[0].team, "하역1반");
        assert_eq!(report.attendance[0].status(), "2명");
    }

    #[test]
    fn board_concatenates_in_layout_order_and_sorts_attendance() {
        let layout = Layout::from_toml(LAYOUT).unwrap();
        let board = run(&layout, &inputs(), &RunOptions::default());

        let teams: Vec<_> = board.work.iter().map(|w| w.team.as_str()).collect();
        assert_eq!(teams, vec!["중량물팀", "중량물팀", "1부두"]);

        let cats: Vec<_> = board.attendance.iter().map(|a| a.category.as_str()).collect();
        assert_eq!(cats, vec!["작업", "작업", "작업", "출장", "휴가"]);
        assert_eq!(board.attendance[0].team, "중량물팀");
        assert_eq!(board.attendance[2].team, "하역2반");

        assert_eq!(board.teams.len(), 2);
        assert_eq!(board.meta.title, "전사 일일 현황");
        assert_eq!(board.warning_count(), 0);
        assert_eq!(board.headcount_by_category()[0], ("작업".to_string(), 19));
    }

    #[test]
    fn sort_can_be_disabled() {
        let layout = Layout::from_toml(LAYOUT).unwrap();
        let options = RunOptions { sort_attendance: Some(false), ..Default::default() };
        let board = run(&layout, &inputs(), &options);
        let cats: Vec<_> = board.attendance.iter().map(|a| a.category.as_str()).collect();
        assert_eq!(cats, vec!["작업", "작업", "휴가", "출장", "작업"]);
    }

    #[test]
    fn missing_anchor_degrades_to_empty_section() {
        let layout = Layout::from_toml(LAYOUT).unwrap();
        let grid = Grid::from_strs(&[&["[금일 작업]"], &["거래처"], &["A해운", "양하"]]);
        let report = extract_team(&layout, &layout.teams[0], &grid);
        assert!(report.attendance.is_empty());
        assert!(report.plan.is_empty());
        // work header lookup fails because there is no "담당" caption
        assert!(report.work.is_empty());
        let warnings: Vec<_> = report
            .diagnostics
            .iter()
            .filter(|d| d.level == DiagnosticLevel::Warning)
            .map(|d| d.section)
            .collect();
        assert_eq!(
            warnings,
            vec![Some(SectionKind::Work), Some(SectionKind::Attendance), Some(SectionKind::Plan)]
        );
    }

    #[test]
    fn missing_team_input_is_skipped() {
        let layout = Layout::from_toml(LAYOUT).unwrap();
        let only_dock = vec![TeamInput { team_id: "dock".into(), grid: dock_sheet() }];
        let board = run(&layout, &only_dock, &RunOptions::default());
        assert_eq!(board.teams.len(), 1);
        assert!(board
            .diagnostics
            .iter()
            .any(|d| d.team_id == "heavy" && d.message.contains("skipped")));
    }

    #[test]
    fn unknown_input_team_is_reported() {
        let layout = Layout::from_toml(LAYOUT).unwrap();
        let stray = vec![TeamInput { team_id: "logistics".into(), grid: dock_sheet() }];
        let board = run(&layout, &stray, &RunOptions::default());
        assert!(board.work.is_empty());
        assert_eq!(board.warning_count(), 1);
    }

    #[test]
    fn empty_sheet_is_a_warning_not_an_error() {
        let layout = Layout::from_toml(LAYOUT).unwrap();
        let report = extract_team(&layout, &layout.teams[0], &Grid::default());
        assert!(report.work.is_empty());
        assert_eq!(report.diagnostics.len(), 1);
    }
}
