use crate::model::{Sections, TeamReport, TeamSummary};

/// Concatenate per-team tables row-wise in input order. No dedup.
pub fn concat_reports(reports: &[TeamReport]) -> Sections {
    let mut sections = Sections::default();
    for report in reports {
        sections.work.extend(report.work.iter().cloned());
        sections.attendance.extend(report.attendance.iter().cloned());
        sections.plan.extend(report.plan.iter().cloned());
    }
    sections
}

pub fn summarize(reports: &[TeamReport]) -> Vec<TeamSummary> {
    reports
        .iter()
        .map(|r| TeamSummary {
            team_id: r.team_id.clone(),
            team_name: r.team_name.clone(),
            work_rows: r.work.len(),
            attendance_rows: r.attendance.len(),
            plan_rows: r.plan.len(),
        })
        .collect()
}
