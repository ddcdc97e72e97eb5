// File I/O: report sheets in, board exports out.

pub mod csv;
pub mod error;
pub mod json;
pub mod xlsx;

use std::path::Path;

use dailyboard_report::Grid;

pub use error::IoError;

/// How a file is read, decided by its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Workbook,
    Delimited,
}

impl InputKind {
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "xlsx" | "xlsm" | "xls" | "xlsb" | "ods" => Some(Self::Workbook),
            "csv" | "tsv" | "txt" => Some(Self::Delimited),
            _ => None,
        }
    }
}

/// Load one sheet as a `Grid`. `sheet` selects a workbook sheet by name
/// (first sheet when `None`); delimited files have a single implicit sheet.
pub fn load_grid(path: &Path, sheet: Option<&str>) -> Result<Grid, IoError> {
    let kind = InputKind::from_path(path).ok_or_else(|| IoError::UnsupportedFormat {
        path: path.to_path_buf(),
    })?;
    let grid = match kind {
        InputKind::Workbook => xlsx::import(path, sheet)?,
        InputKind::Delimited => {
            if let Some(name) = sheet {
                log::warn!("'{}': sheet '{name}' ignored for delimited text", path.display());
            }
            crate::csv::import(path)?
        }
    };
    log::debug!(
        "loaded '{}': {} rows x {} cols",
        path.display(),
        grid.height(),
        grid.width()
    );
    Ok(grid)
}

/// Sheet names in workbook order. Delimited files report none.
pub fn sheet_names(path: &Path) -> Result<Vec<String>, IoError> {
    match InputKind::from_path(path) {
        Some(InputKind::Workbook) => xlsx::sheet_names(path),
        Some(InputKind::Delimited) => Ok(Vec::new()),
        None => Err(IoError::UnsupportedFormat {
            path: path.to_path_buf(),
        }),
    }
}
