use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::grid::Grid;

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

/// The three logical sections of a daily report sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Work,
    Attendance,
    Plan,
}

impl SectionKind {
    pub const ALL: [SectionKind; 3] = [Self::Work, Self::Attendance, Self::Plan];

    /// Canonical fields a column mapping may target.
    pub fn fields(&self) -> &'static [&'static str] {
        match self {
            Self::Work => &["team", "counterparty", "description", "responsible", "remark"],
            Self::Attendance => &["category", "team"],
            Self::Plan => &["team", "counterparty", "description", "date", "remark"],
        }
    }

    /// Field checked against the denylist when the layout names none.
    pub fn default_key(&self) -> &'static str {
        match self {
            Self::Work | Self::Plan => "counterparty",
            Self::Attendance => "category",
        }
    }
}

impl std::fmt::Display for SectionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Work => write!(f, "work"),
            Self::Attendance => write!(f, "attendance"),
            Self::Plan => write!(f, "plan"),
        }
    }
}

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// One team's loaded sheet.
#[derive(Debug, Clone)]
pub struct TeamInput {
    pub team_id: String,
    pub grid: Grid,
}

/// A region row keyed by canonical field, before typing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedRow {
    /// 1-based sheet row the values came from.
    pub source_row: usize,
    pub fields: BTreeMap<String, String>,
    /// Attendance headcount values, in layout order.
    pub headcount: Vec<Headcount>,
}

impl ExtractedRow {
    pub fn get(&self, field: &str) -> &str {
        self.fields.get(field).map(String::as_str).unwrap_or("")
    }

    pub fn is_blank(&self) -> bool {
        self.fields.values().all(|v| crate::grid::is_blank(v))
            && self.headcount.iter().all(|h| crate::grid::is_blank(&h.count))
    }
}

// ---------------------------------------------------------------------------
// Canonical records
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkRecord {
    pub team: String,
    pub counterparty: String,
    pub description: String,
    pub responsible: String,
    pub remark: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Headcount {
    pub role: String,
    pub count: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttendanceRecord {
    pub category: String,
    pub team: String,
    pub headcount: Vec<Headcount>,
}

impl AttendanceRecord {
    /// Headcount joined for display, e.g. "반장 1, 기사 2". Blank counts are
    /// skipped; a role with an empty label shows the bare value.
    pub fn status(&self) -> String {
        self.headcount
            .iter()
            .filter(|h| !crate::grid::is_blank(&h.count))
            .map(|h| {
                if h.role.is_empty() {
                    h.count.clone()
                } else {
                    format!("{} {}", h.role, h.count)
                }
            })
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Sum of the counts that parse as numbers.
    pub fn total(&self) -> u32 {
        self.headcount
            .iter()
            .filter_map(|h| parse_count(&h.count))
            .sum()
    }
}

/// Accepts "3", "3.0" and "3명".
fn parse_count(text: &str) -> Option<u32> {
    let digits = text.trim().trim_end_matches('명').trim();
    if let Ok(n) = digits.parse::<u32>() {
        return Some(n);
    }
    digits
        .parse::<f64>()
        .ok()
        .filter(|f| *f >= 0.0 && f.fract() == 0.0)
        .map(|f| f as u32)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanRecord {
    pub team: String,
    pub counterparty: String,
    pub description: String,
    pub date: String,
    pub remark: String,
}

// ---------------------------------------------------------------------------
// Diagnostics
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticLevel {
    Info,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub level: DiagnosticLevel,
    pub team_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section: Option<SectionKind>,
    pub message: String,
}

impl Diagnostic {
    pub fn warning(team_id: &str, section: Option<SectionKind>, message: impl Into<String>) -> Self {
        Self {
            level: DiagnosticLevel::Warning,
            team_id: team_id.to_string(),
            section,
            message: message.into(),
        }
    }

    pub fn info(team_id: &str, section: Option<SectionKind>, message: impl Into<String>) -> Self {
        Self {
            level: DiagnosticLevel::Info,
            team_id: team_id.to_string(),
            section,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.section {
            Some(section) => write!(f, "[{}/{}] {}", self.team_id, section, self.message),
            None => write!(f, "[{}] {}", self.team_id, self.message),
        }
    }
}

// ---------------------------------------------------------------------------
// Per-team result + Board
// ---------------------------------------------------------------------------

/// Cleaned canonical tables of one team.
#[derive(Debug, Clone, Default)]
pub struct TeamReport {
    pub team_id: String,
    pub team_name: String,
    pub work: Vec<WorkRecord>,
    pub attendance: Vec<AttendanceRecord>,
    pub plan: Vec<PlanRecord>,
    pub diagnostics: Vec<Diagnostic>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Sections {
    pub work: Vec<WorkRecord>,
    pub attendance: Vec<AttendanceRecord>,
    pub plan: Vec<PlanRecord>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TeamSummary {
    pub team_id: String,
    pub team_name: String,
    pub work_rows: usize,
    pub attendance_rows: usize,
    pub plan_rows: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct BoardMeta {
    pub layout_name: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_date: Option<NaiveDate>,
    pub generated_at: String,
    pub engine_version: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Board {
    pub meta: BoardMeta,
    pub work: Vec<WorkRecord>,
    pub attendance: Vec<AttendanceRecord>,
    pub plan: Vec<PlanRecord>,
    pub teams: Vec<TeamSummary>,
    pub diagnostics: Vec<Diagnostic>,
}

impl Board {
    pub fn warning_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.level == DiagnosticLevel::Warning)
            .count()
    }

    /// Total headcount per attendance category, in first-appearance order.
    pub fn headcount_by_category(&self) -> Vec<(String, u32)> {
        let mut totals: Vec<(String, u32)> = Vec::new();
        for row in &self.attendance {
            match totals.iter_mut().find(|(c, _)| *c == row.category) {
                Some(entry) => entry.1 += row.total(),
                None => totals.push((row.category.clone(), row.total())),
            }
        }
        totals
    }
}
