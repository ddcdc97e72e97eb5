// HTML board rendering: one self-contained page, no external assets.

use std::fmt::Write;

use crate::config::{Labels, Layout};
use crate::model::{AttendanceRecord, Board, DiagnosticLevel};
use crate::order::{group_by_category, CategoryPriority};
use crate::table::{attendance_headers, attendance_table, plan_table, work_table, SectionTable};

const STYLE: &str = "\
body { font-family: sans-serif; margin: 24px; }
table { width: 100%; border-collapse: collapse; margin-bottom: 8px; }
th { background-color: #003366; color: white; padding: 8px; border: 1px solid #ddd; }
td { padding: 6px 8px; border: 1px solid #ddd; text-align: center; }
td.category-cell { background-color: #f8f9fa; font-weight: bold; width: 15%; }
td.empty { color: #888; }
ul.diagnostics li.warning { color: #a40000; }
";

/// Escape text for element content and quoted attribute values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Render the full dashboard page.
pub fn render_dashboard(board: &Board, layout: &Layout) -> String {
    let labels = &layout.labels;
    let title = escape_html(&board.meta.title);
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"ko\">\n<head>\n<meta charset=\"utf-8\">\n");
    let _ = writeln!(html, "<title>{title}</title>");
    let _ = writeln!(html, "<style>\n{STYLE}</style>\n</head>\n<body>");
    let _ = writeln!(html, "<h1>{title}</h1>");
    if let Some(date) = board.meta.report_date {
        let _ = writeln!(html, "<p class=\"report-date\">{}</p>", date.format("%Y-%m-%d"));
    }

    let _ = writeln!(html, "<h2>{}</h2>", escape_html(&labels.work_heading));
    html.push_str(&render_section(&work_table(&board.work, labels), labels));

    let _ = writeln!(html, "<h2>{}</h2>", escape_html(&labels.attendance_heading));
    if layout.attendance.merge_categories {
        let priority = CategoryPriority::new(&layout.attendance.priority);
        html.push_str(&render_attendance_merged(&board.attendance, &priority, labels));
    } else {
        html.push_str(&render_attendance_plain(&board.attendance, labels));
    }

    let _ = writeln!(html, "<h2>{}</h2>", escape_html(&labels.plan_heading));
    html.push_str(&render_section(&plan_table(&board.plan, labels), labels));

    if !board.diagnostics.is_empty() {
        html.push_str("<ul class=\"diagnostics\">\n");
        for d in &board.diagnostics {
            let class = match d.level {
                DiagnosticLevel::Warning => "warning",
                DiagnosticLevel::Info => "info",
            };
            let _ = writeln!(html, "<li class=\"{class}\">{}</li>", escape_html(&d.to_string()));
        }
        html.push_str("</ul>\n");
    }

    html.push_str("</body>\n</html>\n");
    html
}

/// Plain table: header captions plus one `<tr>` per row.
pub fn render_table(headers: &[&str], rows: &[Vec<&str>], empty_label: &str) -> String {
    let mut html = String::from("<table>\n<thead>\n<tr>");
    for h in headers {
        let _ = write!(html, "<th>{}</th>", escape_html(h));
    }
    html.push_str("</tr>\n</thead>\n<tbody>\n");
    if rows.is_empty() {
        let _ = writeln!(
            html,
            "<tr><td class=\"empty\" colspan=\"{}\">{}</td></tr>",
            headers.len().max(1),
            escape_html(empty_label)
        );
    }
    for row in rows {
        html.push_str("<tr>");
        for cell in row {
            let _ = write!(html, "<td>{}</td>", escape_html(cell));
        }
        html.push_str("</tr>\n");
    }
    html.push_str("</tbody>\n</table>\n");
    html
}

fn render_section(table: &SectionTable, labels: &Labels) -> String {
    let headers: Vec<&str> = table.headers.iter().map(String::as_str).collect();
    let rows: Vec<Vec<&str>> = table
        .rows
        .iter()
        .map(|row| row.iter().map(String::as_str).collect())
        .collect();
    render_table(&headers, &rows, &labels.empty)
}

pub fn render_attendance_plain(rows: &[AttendanceRecord], labels: &Labels) -> String {
    render_section(&attendance_table(rows, labels), labels)
}

/// Attendance with one category cell per group, spanning the group's rows.
pub fn render_attendance_merged(rows: &[AttendanceRecord], priority: &CategoryPriority, labels: &Labels) -> String {
    if rows.is_empty() {
        return render_attendance_plain(rows, labels);
    }

    let mut html = String::from("<table class=\"merged-table\">\n<thead>\n<tr>");
    for h in attendance_headers(labels) {
        let _ = write!(html, "<th>{}</th>", escape_html(&h));
    }
    html.push_str("</tr>\n</thead>\n<tbody>\n");

    for group in group_by_category(rows, priority) {
        let span = group.rows.len();
        for (i, row) in group.rows.iter().enumerate() {
            html.push_str("<tr>");
            if i == 0 {
                let _ = write!(
                    html,
                    "<td class=\"category-cell\" rowspan=\"{span}\">{}</td>",
                    escape_html(group.category)
                );
            }
            let _ = write!(
                html,
                "<td>{}</td><td>{}</td>",
                escape_html(&row.team),
                escape_html(&row.status())
            );
            html.push_str("</tr>\n");
        }
    }

    html.push_str("</tbody>\n</table>\n");
    html
}
