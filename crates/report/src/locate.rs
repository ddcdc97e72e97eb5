// Section location: anchor scanning and fixed row offsets.

use crate::config::{MatchMode, SectionLayout, TeamLayout};
use crate::grid::Grid;
use crate::model::SectionKind;

/// Half-open row range `[start, end)` of a section's data region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionBounds {
    /// Row holding the anchor; `None` for fixed-row sections.
    pub anchor_row: Option<usize>,
    pub start: usize,
    pub end: usize,
}

impl SectionBounds {
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocateMiss {
    /// The team's layout has no such section.
    NotConfigured,
    /// None of the anchors occur in the anchor column.
    AnchorNotFound { anchors: Vec<String> },
}

impl std::fmt::Display for LocateMiss {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotConfigured => write!(f, "section not configured"),
            Self::AnchorNotFound { anchors } => {
                write!(f, "anchor not found: {}", anchors.join(" | "))
            }
        }
    }
}

/// Rows (ascending) whose `column` cell matches any of `anchors`.
pub fn find_anchor_rows<S: AsRef<str>>(grid: &Grid, column: usize, anchors: &[S], mode: MatchMode) -> Vec<usize> {
    (0..grid.height())
        .filter(|&row| {
            let cell = grid.cell(row, column);
            anchors.iter().any(|a| mode.matches(cell, a.as_ref()))
        })
        .collect()
}

/// Rows that end a section: any section anchor of the team, or a stop anchor.
pub fn boundary_rows(grid: &Grid, team: &TeamLayout) -> Vec<usize> {
    let mut rows = Vec::new();
    for kind in SectionKind::ALL {
        if let Some(section) = team.section(kind) {
            rows.extend(find_anchor_rows(
                grid,
                team.anchor_column,
                &section.anchors,
                section.match_mode(team),
            ));
        }
    }
    rows.extend(find_anchor_rows(grid, team.anchor_column, &team.stop_anchors, team.anchor_match));
    rows.sort_unstable();
    rows.dedup();
    rows
}

pub fn locate_section(grid: &Grid, team: &TeamLayout, kind: SectionKind) -> Result<SectionBounds, LocateMiss> {
    let section = team.section(kind).ok_or(LocateMiss::NotConfigured)?;
    let boundaries = boundary_rows(grid, team);
    locate_with_boundaries(grid, team, section, &boundaries)
}

pub(crate) fn locate_with_boundaries(
    grid: &Grid,
    team: &TeamLayout,
    section: &SectionLayout,
    boundaries: &[usize],
) -> Result<SectionBounds, LocateMiss> {
    let height = grid.height();
    let next_after = |row: usize| boundaries.iter().copied().find(|&b| b > row);

    if let Some(start_row) = section.start_row {
        let start = start_row.saturating_sub(1);
        let end = match section.max_rows {
            Some(n) => start.saturating_add(n),
            None => next_after(start).unwrap_or(height),
        };
        return Ok(clip(None, start, end, height));
    }

    let anchor_row = find_anchor_rows(grid, team.anchor_column, &section.anchors, section.match_mode(team))
        .first()
        .copied()
        .ok_or_else(|| LocateMiss::AnchorNotFound {
            anchors: section.anchors.clone(),
        })?;

    let start = anchor_row + section.offset;
    let end = match (next_after(anchor_row), section.max_rows) {
        (Some(next), _) => next,
        (None, Some(n)) => start.saturating_add(n),
        (None, None) => height,
    };

    log::debug!(
        "team '{}': anchor at row {}, region rows {}..{}",
        team.id,
        anchor_row + 1,
        start + 1,
        end
    );

    Ok(clip(Some(anchor_row), start, end, height))
}

fn clip(anchor_row: Option<usize>, start: usize, end: usize, height: usize) -> SectionBounds {
    let start = start.min(height);
    let end = end.min(height).max(start);
    SectionBounds { anchor_row, start, end }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Layout;
    use proptest::prelude::*;

    const LAYOUT: &str = r#"
name = "t"
[[teams]]
id = "heavy"
name = "중량물팀"
stop_anchors = ["특이사항"]
[teams.work]
anchors = ["[금일 작업]"]
offset = 2
[teams.work.columns]
counterparty = 0
[teams.attendance]
anchors = ["[근태 현황]"]
offset = 2
max_rows = 3
[teams.attendance.columns]
category = 0
[teams.plan]
anchors = ["예정"]
match = "contains"
offset = 1
max_rows = 2
[teams.plan.columns]
counterparty = 0
"#;

    fn sheet() -> Grid {
        Grid::from_strs(&[
            &["일일 보고"],       // 0
            &["[금일 작업]"],     // 1
            &["거래처", "내용"],  // 2
            &["A사", "양하"],     // 3
            &["B사", "적하"],     // 4
            &["[근태 현황]"],     // 5
            &["구분", "인원"],    // 6
            &["작업", "3"],       // 7
            &["특이사항"],        // 8
            &["없음"],            // 9
            &["3. 예정 작업"],    // 10
            &["C사"],             // 11
        ])
    }

    #[test]
    fn work_ends_at_next_anchor() {
        let layout = Layout::from_toml(LAYOUT).unwrap();
        let b = locate_section(&sheet(), &layout.teams[0], SectionKind::Work).unwrap();
        assert_eq!(b, SectionBounds { anchor_row: Some(1), start: 3, end: 5 });
        assert_eq!(b.len(), 2);
    }

    #[test]
    fn stop_anchor_ends_section() {
        let layout = Layout::from_toml(LAYOUT).unwrap();
        let b = locate_section(&sheet(), &layout.teams[0], SectionKind::Attendance).unwrap();
        assert_eq!((b.start, b.end), (7, 8));
    }

    #[test]
    fn last_section_uses_max_rows_and_clips_to_sheet() {
        let layout = Layout::from_toml(LAYOUT).unwrap();
        let b = locate_section(&sheet(), &layout.teams[0], SectionKind::Plan).unwrap();
        assert_eq!(b.anchor_row, Some(10));
        assert_eq!((b.start, b.end), (11, 12));
    }

    #[test]
    fn missing_anchor_is_reported() {
        let layout = Layout::from_toml(LAYOUT).unwrap();
        let grid = Grid::from_strs(&[&["nothing here"]]);
        let miss = locate_section(&grid, &layout.teams[0], SectionKind::Work).unwrap_err();
        assert_eq!(miss, LocateMiss::AnchorNotFound { anchors: vec!["[금일 작업]".into()] });
    }

    #[test]
    fn offset_past_next_anchor_is_empty() {
        let layout = Layout::from_toml(LAYOUT).unwrap();
        let grid = Grid::from_strs(&[&["[금일 작업]"], &["[근태 현황]"], &["x"], &["y"]]);
        let b = locate_section(&grid, &layout.teams[0], SectionKind::Work).unwrap();
        assert!(b.is_empty());
    }

    #[test]
    fn fixed_start_row() {
        let input = r#"
name = "t"
[[teams]]
id = "dock"
name = "하역팀"
[teams.work]
start_row = 4
max_rows = 2
[teams.work.columns]
counterparty = 0
"#;
        let layout = Layout::from_toml(input).unwrap();
        let b = locate_section(&sheet(), &layout.teams[0], SectionKind::Work).unwrap();
        assert_eq!(b, SectionBounds { anchor_row: None, start: 3, end: 5 });
    }

    #[test]
    fn first_occurrence_wins() {
        let grid = Grid::from_strs(&[&["a"], &["X"], &["b"], &["X"]]);
        assert_eq!(find_anchor_rows(&grid, 0, &["X"], MatchMode::Exact), vec![1, 3]);
    }

    proptest! {
        /// Extracted row count is next_anchor - anchor - offset, clipped at zero.
        #[test]
        fn region_length_matches_anchor_distance(
            anchor in 0usize..20,
            gap in 1usize..20,
            offset in 0usize..6,
            tail in 0usize..5,
        ) {
            let next = anchor + gap;
            let height = next + 1 + tail;
            let rows: Vec<Vec<String>> = (0..height)
                .map(|r| {
                    let text = if r == anchor {
                        "[금일 작업]".to_string()
                    } else if r == next {
                        "[근태 현황]".to_string()
                    } else {
                        format!("row {r}")
                    };
                    vec![text]
                })
                .collect();
            let layout = Layout::from_toml(&LAYOUT.replace("offset = 2\n[teams.work.columns]", &format!("offset = {offset}\n[teams.work.columns]"))).unwrap();
            let b = locate_section(&Grid::from_rows(rows), &layout.teams[0], SectionKind::Work).unwrap();
            prop_assert_eq!(b.len(), (next - anchor).saturating_sub(offset));
        }
    }
}
