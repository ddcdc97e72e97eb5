// Column resolution and region slicing.

use crate::config::{ColumnRef, SectionLayout};
use crate::grid::{col_to_letter, letter_to_col, Grid};
use crate::locate::SectionBounds;
use crate::model::{ExtractedRow, Headcount};

/// Canonical field (or headcount role) bound to a sheet column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedColumns {
    pub fields: Vec<(String, usize)>,
    pub headcount: Vec<(String, usize)>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnMiss {
    /// No header alternate found in the sub-header row.
    Header { field: String, alternates: Vec<String>, row: Option<usize> },
    /// Index past the widest row of the sheet.
    OutOfRange { field: String, col: usize, width: usize },
}

impl ColumnMiss {
    pub fn field(&self) -> &str {
        match self {
            Self::Header { field, .. } | Self::OutOfRange { field, .. } => field,
        }
    }
}

impl std::fmt::Display for ColumnMiss {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Header { field, alternates, row: Some(row) } => {
                write!(f, "column '{field}': no header {} in row {}", alternates.join(" | "), row + 1)
            }
            Self::Header { field, alternates, row: None } => {
                write!(f, "column '{field}': no header row for {}", alternates.join(" | "))
            }
            Self::OutOfRange { field, col, width } => {
                write!(
                    f,
                    "column '{field}': {} (index {col}) beyond sheet width {width}",
                    col_to_letter(*col)
                )
            }
        }
    }
}

/// Outcome of column resolution. Out-of-range columns still resolve (their
/// cells read as blank) and are listed so the caller can report them.
#[derive(Debug, Clone)]
pub struct Resolution {
    pub columns: ResolvedColumns,
    pub out_of_range: Vec<ColumnMiss>,
}

/// Row holding the sub-header for header lookups: below the anchor, or above
/// the first data row for fixed-row sections.
fn header_row(bounds: &SectionBounds, header_offset: usize) -> Option<usize> {
    match bounds.anchor_row {
        Some(anchor) => Some(anchor + header_offset),
        None => bounds.start.checked_sub(header_offset),
    }
}

pub fn resolve_column(
    grid: &Grid,
    field: &str,
    column: &ColumnRef,
    bounds: &SectionBounds,
) -> Result<usize, ColumnMiss> {
    let width = grid.width();
    let col = match column {
        ColumnRef::Index(i) => *i,
        ColumnRef::Letter(l) => letter_to_col(l).unwrap_or(usize::MAX),
        ColumnRef::Header { header, header_offset } => {
            let row = header_row(bounds, *header_offset);
            let found = row.and_then(|r| {
                let cells = grid.row(r);
                header
                    .iter()
                    .find_map(|alt| cells.iter().position(|c| c.trim() == alt.trim()))
            });
            return found.ok_or_else(|| ColumnMiss::Header {
                field: field.to_string(),
                alternates: header.clone(),
                row,
            });
        }
    };
    if col >= width {
        return Err(ColumnMiss::OutOfRange { field: field.to_string(), col, width });
    }
    Ok(col)
}

/// Resolve every mapped column. Header misses, and an out-of-range key
/// column, fail the section; other out-of-range columns read as blank.
pub fn resolve_columns(
    grid: &Grid,
    section: &SectionLayout,
    key: &str,
    bounds: &SectionBounds,
) -> Result<Resolution, ColumnMiss> {
    let mut fields = Vec::new();
    let mut headcount = Vec::new();
    let mut out_of_range = Vec::new();

    let mut resolve = |name: &str, column: &ColumnRef| -> Result<usize, ColumnMiss> {
        match resolve_column(grid, name, column, bounds) {
            Ok(col) => Ok(col),
            Err(ColumnMiss::OutOfRange { field, col, width }) if name != key => {
                out_of_range.push(ColumnMiss::OutOfRange { field, col, width });
                Ok(col)
            }
            Err(miss) => Err(miss),
        }
    };

    for (field, column) in &section.columns {
        fields.push((field.clone(), resolve(field, column)?));
    }
    for hc in &section.headcount {
        let label = format!("headcount {}", hc.role);
        headcount.push((hc.role.clone(), resolve(&label, &hc.column)?));
    }

    Ok(Resolution {
        columns: ResolvedColumns { fields, headcount },
        out_of_range,
    })
}

/// Read every row of the region through the resolved columns.
pub fn extract_rows(grid: &Grid, bounds: &SectionBounds, columns: &ResolvedColumns) -> Vec<ExtractedRow> {
    (bounds.start..bounds.end)
        .map(|row| ExtractedRow {
            source_row: row + 1,
            fields: columns
                .fields
                .iter()
                .map(|(field, col)| (field.clone(), grid.cell(row, *col).to_string()))
                .collect(),
            headcount: columns
                .headcount
                .iter()
                .map(|(role, col)| Headcount {
                    role: role.clone(),
                    count: grid.cell(row, *col).to_string(),
                })
                .collect(),
        })
        .collect()
}
