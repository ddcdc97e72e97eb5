use std::collections::{BTreeMap, HashSet};

use serde::Deserialize;

use crate::error::LayoutError;
use crate::grid::letter_to_col;
use crate::model::SectionKind;

/// Commented three-team layout written by `dailyboard init`.
pub const STARTER_LAYOUT: &str = include_str!("../layouts/starter.toml");

// ---------------------------------------------------------------------------
// Top-level layout
// ---------------------------------------------------------------------------

/// Operator-supplied description of every team's report sheet.
#[derive(Debug, Clone, Deserialize)]
pub struct Layout {
    pub name: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub filter: FilterConfig,
    #[serde(default)]
    pub attendance: AttendanceConfig,
    #[serde(default)]
    pub labels: Labels,
    /// Concatenation order follows this list.
    pub teams: Vec<TeamLayout>,
}

// ---------------------------------------------------------------------------
// Filter
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct FilterConfig {
    /// Key cells equal to one of these (after trimming) mark a junk row.
    #[serde(default = "default_deny_exact")]
    pub deny_exact: Vec<String>,
    /// Key cells containing one of these mark a junk row.
    #[serde(default)]
    pub deny_contains: Vec<String>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            deny_exact: default_deny_exact(),
            deny_contains: Vec::new(),
        }
    }
}

fn default_deny_exact() -> Vec<String> {
    ["구분", "거래처", "팀명", "nan", "NaN", "None"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

// ---------------------------------------------------------------------------
// Attendance presentation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct AttendanceConfig {
    #[serde(default = "default_true")]
    pub sort: bool,
    #[serde(default = "default_priority")]
    pub priority: Vec<String>,
    #[serde(default = "default_true")]
    pub merge_categories: bool,
}

impl Default for AttendanceConfig {
    fn default() -> Self {
        Self {
            sort: true,
            priority: default_priority(),
            merge_categories: true,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_priority() -> Vec<String> {
    ["작업", "내무", "출장", "휴가"].iter().map(|s| s.to_string()).collect()
}

// ---------------------------------------------------------------------------
// Labels
// ---------------------------------------------------------------------------

/// Headings and column captions used by the renderers.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Labels {
    pub work_heading: String,
    pub attendance_heading: String,
    pub plan_heading: String,
    pub team: String,
    pub counterparty: String,
    pub description: String,
    pub responsible: String,
    pub remark: String,
    pub category: String,
    pub headcount: String,
    pub plan_description: String,
    pub date: String,
    pub empty: String,
}

impl Default for Labels {
    fn default() -> Self {
        Self {
            work_heading: "1. 전사 금일 작업".into(),
            attendance_heading: "2. 전사 근태 현황".into(),
            plan_heading: "3. 전사 예정 작업".into(),
            team: "팀명".into(),
            counterparty: "거래처".into(),
            description: "작업 내용".into(),
            responsible: "담당자".into(),
            remark: "비고".into(),
            category: "구분".into(),
            headcount: "인원 현황".into(),
            plan_description: "예정 작업".into(),
            date: "예정일".into(),
            empty: "데이터 없음".into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Team
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    /// Cell equals the anchor (both trimmed).
    #[default]
    Exact,
    /// Cell contains the anchor.
    Contains,
}

impl MatchMode {
    pub fn matches(&self, cell: &str, anchor: &str) -> bool {
        let cell = cell.trim();
        let anchor = anchor.trim();
        if anchor.is_empty() {
            return false;
        }
        match self {
            Self::Exact => cell == anchor,
            Self::Contains => cell.contains(anchor),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TeamLayout {
    pub id: String,
    /// Display name written into the `team` column.
    pub name: String,
    /// Input file, relative to the layout file.
    #[serde(default)]
    pub file: Option<String>,
    /// Sheet name; first sheet when absent.
    #[serde(default)]
    pub sheet: Option<String>,
    /// 0-based column scanned for anchors.
    #[serde(default)]
    pub anchor_column: usize,
    #[serde(default)]
    pub anchor_match: MatchMode,
    /// Extra labels that end the preceding section (e.g. a notes block).
    #[serde(default)]
    pub stop_anchors: Vec<String>,
    #[serde(default)]
    pub deny_exact: Vec<String>,
    #[serde(default)]
    pub deny_contains: Vec<String>,
    #[serde(default)]
    pub work: Option<SectionLayout>,
    #[serde(default)]
    pub attendance: Option<SectionLayout>,
    #[serde(default)]
    pub plan: Option<SectionLayout>,
}

impl TeamLayout {
    pub fn section(&self, kind: SectionKind) -> Option<&SectionLayout> {
        match kind {
            SectionKind::Work => self.work.as_ref(),
            SectionKind::Attendance => self.attendance.as_ref(),
            SectionKind::Plan => self.plan.as_ref(),
        }
    }

    /// Every anchor string of every configured section.
    pub fn section_anchors(&self) -> impl Iterator<Item = &str> {
        SectionKind::ALL
            .into_iter()
            .filter_map(|kind| self.section(kind))
            .flat_map(|s| s.anchors.iter().map(String::as_str))
    }
}

// ---------------------------------------------------------------------------
// Section
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct SectionLayout {
    /// Anchor strings; any of them starts the section.
    #[serde(default)]
    pub anchors: Vec<String>,
    /// Overrides the team's `anchor_match`.
    #[serde(default, rename = "match")]
    pub match_mode: Option<MatchMode>,
    /// Rows from the anchor row to the first data row.
    #[serde(default = "default_offset")]
    pub offset: usize,
    /// Fixed 1-based first data row, instead of anchors.
    #[serde(default)]
    pub start_row: Option<usize>,
    /// Region length when no later anchor ends it.
    #[serde(default)]
    pub max_rows: Option<usize>,
    /// Field checked against the denylist.
    #[serde(default)]
    pub key: Option<String>,
    /// Fields forward-filled from the row above when blank.
    #[serde(default)]
    pub fill_down: Vec<String>,
    #[serde(default)]
    pub columns: BTreeMap<String, ColumnRef>,
    /// Attendance only: one entry per headcount role.
    #[serde(default)]
    pub headcount: Vec<HeadcountColumn>,
}

fn default_offset() -> usize {
    1
}

impl SectionLayout {
    pub fn key_field(&self, kind: SectionKind) -> &str {
        self.key.as_deref().unwrap_or_else(|| kind.default_key())
    }

    pub fn match_mode(&self, team: &TeamLayout) -> MatchMode {
        self.match_mode.unwrap_or(team.anchor_match)
    }
}

/// Where a canonical field lives in the source sheet.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ColumnRef {
    /// 0-based column index.
    Index(usize),
    /// Spreadsheet column letter, e.g. "C".
    Letter(String),
    /// First of the header captions found in the sub-header row.
    Header {
        header: Vec<String>,
        #[serde(default = "default_header_offset")]
        header_offset: usize,
    },
}

fn default_header_offset() -> usize {
    1
}

impl std::fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Index(i) => write!(f, "#{i}"),
            Self::Letter(l) => write!(f, "{l}"),
            Self::Header { header, .. } => write!(f, "header {}", header.join("|")),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct HeadcountColumn {
    /// Role label shown next to the count; may be empty.
    #[serde(default)]
    pub role: String,
    pub column: ColumnRef,
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl Layout {
    pub fn from_toml(input: &str) -> Result<Self, LayoutError> {
        let layout: Layout = toml::from_str(input).map_err(|e| LayoutError::Parse(e.to_string()))?;
        layout.validate()?;
        Ok(layout)
    }

    pub fn team(&self, id: &str) -> Option<&TeamLayout> {
        self.teams.iter().find(|t| t.id == id)
    }

    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.name)
    }

    pub fn validate(&self) -> Result<(), LayoutError> {
        if self.teams.is_empty() {
            return Err(LayoutError::Validation("at least one team is required".into()));
        }

        if self.attendance.priority.iter().any(|p| p.trim().is_empty()) {
            return Err(LayoutError::Validation(
                "attendance.priority must not contain empty categories".into(),
            ));
        }

        let mut seen = HashSet::new();
        for team in &self.teams {
            if team.id.trim().is_empty() {
                return Err(LayoutError::Validation("team id must not be empty".into()));
            }
            if !seen.insert(team.id.as_str()) {
                return Err(LayoutError::DuplicateTeam(team.id.clone()));
            }
            if team.work.is_none() && team.attendance.is_none() && team.plan.is_none() {
                return Err(LayoutError::Validation(format!(
                    "team '{}': no sections configured",
                    team.id
                )));
            }
            for kind in SectionKind::ALL {
                if let Some(section) = team.section(kind) {
                    validate_section(&team.id, kind, section)?;
                }
            }
        }

        Ok(())
    }
}

fn validate_section(team: &str, kind: SectionKind, section: &SectionLayout) -> Result<(), LayoutError> {
    let invalid = |msg: &str| LayoutError::Validation(format!("team '{team}', {kind}: {msg}"));

    let has_anchors = section.anchors.iter().any(|a| !a.trim().is_empty());
    match (has_anchors, section.start_row) {
        (true, Some(_)) => return Err(invalid("use either anchors or start_row, not both")),
        (false, None) => return Err(invalid("anchors or start_row is required")),
        (false, Some(0)) => return Err(invalid("start_row is 1-based")),
        _ => {}
    }

    if section.columns.is_empty() && section.headcount.is_empty() {
        return Err(invalid("no columns mapped"));
    }

    for (field, column) in &section.columns {
        if !kind.fields().contains(&field.as_str()) {
            return Err(LayoutError::UnknownField {
                team: team.into(),
                section: kind.to_string(),
                field: field.clone(),
            });
        }
        validate_column(team, kind, column)?;
    }

    if !section.headcount.is_empty() && kind != SectionKind::Attendance {
        return Err(invalid("headcount columns are only valid for attendance"));
    }
    for hc in &section.headcount {
        validate_column(team, kind, &hc.column)?;
    }

    let key = section.key_field(kind);
    if !section.columns.contains_key(key) {
        return Err(invalid(&format!("key field '{key}' is not mapped")));
    }

    for field in &section.fill_down {
        if !kind.fields().contains(&field.as_str()) {
            return Err(LayoutError::UnknownField {
                team: team.into(),
                section: kind.to_string(),
                field: field.clone(),
            });
        }
    }

    Ok(())
}

fn validate_column(team: &str, kind: SectionKind, column: &ColumnRef) -> Result<(), LayoutError> {
    let bad = |value: String| LayoutError::BadColumn {
        team: team.into(),
        section: kind.to_string(),
        value,
    };
    match column {
        ColumnRef::Index(_) => Ok(()),
        ColumnRef::Letter(l) => letter_to_col(l).map(|_| ()).ok_or_else(|| bad(l.clone())),
        ColumnRef::Header { header, .. } => {
            if header.iter().all(|h| h.trim().is_empty()) {
                Err(bad("header = []".into()))
            } else {
                Ok(())
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
