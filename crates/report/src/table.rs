// Canonical tabular view of a board, shared by every output format.

use crate::config::Labels;
use crate::model::{AttendanceRecord, Board, PlanRecord, SectionKind, WorkRecord};

/// One output section as captions plus string rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionTable {
    pub kind: SectionKind,
    pub title: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl SectionTable {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

pub fn work_table(rows: &[WorkRecord], labels: &Labels) -> SectionTable {
    SectionTable {
        kind: SectionKind::Work,
        title: labels.work_heading.clone(),
        headers: vec![
            labels.team.clone(),
            labels.counterparty.clone(),
            labels.description.clone(),
            labels.responsible.clone(),
            labels.remark.clone(),
        ],
        rows: rows
            .iter()
            .map(|w| {
                vec![
                    w.team.clone(),
                    w.counterparty.clone(),
                    w.description.clone(),
                    w.responsible.clone(),
                    w.remark.clone(),
                ]
            })
            .collect(),
    }
}

pub fn attendance_table(rows: &[AttendanceRecord], labels: &Labels) -> SectionTable {
    SectionTable {
        kind: SectionKind::Attendance,
        title: labels.attendance_heading.clone(),
        headers: attendance_headers(labels),
        rows: rows
            .iter()
            .map(|a| vec![a.category.clone(), a.team.clone(), a.status()])
            .collect(),
    }
}

pub fn attendance_headers(labels: &Labels) -> Vec<String> {
    vec![labels.category.clone(), labels.team.clone(), labels.headcount.clone()]
}

pub fn plan_table(rows: &[PlanRecord], labels: &Labels) -> SectionTable {
    SectionTable {
        kind: SectionKind::Plan,
        title: labels.plan_heading.clone(),
        headers: vec![
            labels.team.clone(),
            labels.counterparty.clone(),
            labels.plan_description.clone(),
            labels.date.clone(),
            labels.remark.clone(),
        ],
        rows: rows
            .iter()
            .map(|p| {
                vec![
                    p.team.clone(),
                    p.counterparty.clone(),
                    p.description.clone(),
                    p.date.clone(),
                    p.remark.clone(),
                ]
            })
            .collect(),
    }
}

/// Work, attendance, plan, in display order.
pub fn section_tables(board: &Board, labels: &Labels) -> [SectionTable; 3] {
    [
        work_table(&board.work, labels),
        attendance_table(&board.attendance, labels),
        plan_table(&board.plan, labels),
    ]
}
