// Aligned plain-text rendering of the board for `build --print`.

use dailyboard_report::config::Layout;
use dailyboard_report::order::{group_by_category, CategoryPriority};
use dailyboard_report::table::{attendance_table, plan_table, work_table, SectionTable};
use dailyboard_report::Board;

use crate::util::{display_width, pad_right};

const MAX_COL_WIDTH: usize = 40;
const GAP: &str = "  ";

pub(crate) fn render_board(board: &Board, layout: &Layout) -> String {
    let labels = &layout.labels;
    let mut out = String::new();

    out.push_str(&board.meta.title);
    if let Some(date) = board.meta.report_date {
        out.push_str(&format!(" ({})", date.format("%Y-%m-%d")));
    }
    out.push_str("\n\n");

    out.push_str(&render_section(&work_table(&board.work, labels), &labels.empty));
    out.push('\n');

    let attendance = attendance_section(board, layout);
    out.push_str(&render_section(&attendance, &labels.empty));
    let totals = board.headcount_by_category();
    if totals.iter().any(|(_, n)| *n > 0) {
        let parts: Vec<String> = totals.iter().map(|(c, n)| format!("{c} {n}")).collect();
        out.push_str(&format!("  = {}\n", parts.join(", ")));
    }
    out.push('\n');

    out.push_str(&render_section(&plan_table(&board.plan, labels), &labels.empty));
    out
}

/// Attendance rows in display order. With category merging the category is
/// printed on the first row of each group only.
fn attendance_section(board: &Board, layout: &Layout) -> SectionTable {
    let labels = &layout.labels;
    let mut table = attendance_table(&board.attendance, labels);
    if !layout.attendance.merge_categories {
        return table;
    }

    let priority = CategoryPriority::new(&layout.attendance.priority);
    table.rows = group_by_category(&board.attendance, &priority)
        .into_iter()
        .flat_map(|group| {
            let category = group.category;
            group.rows.into_iter().enumerate().map(move |(i, rec)| {
                let category = if i == 0 { category.to_string() } else { String::new() };
                vec![category, rec.team.clone(), rec.status()]
            })
        })
        .collect();
    table
}

fn render_section(table: &SectionTable, empty_label: &str) -> String {
    let mut out = format!("{}\n", table.title);
    if table.is_empty() {
        out.push_str(&format!("  ({empty_label})\n"));
        return out;
    }

    let widths: Vec<usize> = (0..table.headers.len())
        .map(|c| {
            let cells = table.rows.iter().map(|r| r.get(c).map_or(0, |s| display_width(s)));
            cells
                .chain(std::iter::once(display_width(&table.headers[c])))
                .max()
                .unwrap_or(0)
                .min(MAX_COL_WIDTH)
        })
        .collect();

    out.push_str(&render_line(&table.headers, &widths));
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    out.push_str(&render_line(&rule, &widths));
    for row in &table.rows {
        out.push_str(&render_line(row, &widths));
    }
    out
}

fn render_line(cells: &[String], widths: &[usize]) -> String {
    let padded: Vec<String> = widths
        .iter()
        .enumerate()
        .map(|(c, w)| pad_right(cells.get(c).map_or("", String::as_str), *w))
        .collect();
    format!("  {}\n", padded.join(GAP).trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;
    use dailyboard_report::model::{AttendanceRecord, BoardMeta, Headcount, WorkRecord};

    fn att(category: &str, team: &str, count: &str) -> AttendanceRecord {
        AttendanceRecord {
            category: category.into(),
            team: team.into(),
            headcount: vec![Headcount { role: "기사".into(), count: count.into() }],
        }
    }

    fn board() -> Board {
        Board {
            meta: BoardMeta {
                layout_name: "daily".into(),
                title: "전사 현황".into(),
                report_date: chrono::NaiveDate::from_ymd_opt(2026, 10, 16),
                generated_at: String::new(),
                engine_version: "0".into(),
            },
            work: vec![WorkRecord {
                team: "중량물팀".into(),
                counterparty: "CJ".into(),
                description: "양하".into(),
                responsible: "김".into(),
                remark: String::new(),
            }],
            attendance: vec![att("작업", "중량물팀", "3"), att("작업", "하역팀", "5"), att("휴가", "물류팀", "1")],
            plan: Vec::new(),
            teams: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    fn layout(merge: bool) -> Layout {
        let toml = format!(
            "name = \"daily\"\n[attendance]\nmerge_categories = {merge}\n[[teams]]\nid = \"a\"\nname = \"A\"\n\
             [teams.work]\nanchors = [\"W\"]\n[teams.work.columns]\ncounterparty = 0\n"
        );
        Layout::from_toml(&toml).unwrap()
    }

    #[test]
    fn hangul_columns_align() {
        let text = render_board(&board(), &layout(false));
        let lines: Vec<&str> = text.lines().collect();
        let header = lines.iter().position(|l| l.trim_start().starts_with("팀명")).unwrap();
        // The "거래처" caption and the "CJ" cell start at the same display column
        let col = |line: &str, needle: &str| display_width(&line[..line.find(needle).unwrap()]);
        assert_eq!(col(lines[header], "거래처"), col(lines[header + 2], "CJ"));
    }

    #[test]
    fn merged_attendance_prints_category_once() {
        let text = render_board(&board(), &layout(true));
        assert_eq!(text.matches("작업  ").count(), 1);
        assert!(text.contains("  = 작업 8, 휴가 1"));
    }

    #[test]
    fn plain_attendance_repeats_category() {
        let text = render_board(&board(), &layout(false));
        assert_eq!(text.lines().filter(|l| l.trim_start().starts_with("작업")).count(), 2);
    }

    #[test]
    fn empty_section_placeholder() {
        let text = render_board(&board(), &layout(true));
        assert!(text.contains("3. 전사 예정 작업\n  (데이터 없음)\n"));
        assert!(text.starts_with("전사 현황 (2026-10-16)\n"));
    }
}
