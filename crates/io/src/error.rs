use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum IoError {
    #[error("cannot read '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported file type '{}' (expected xlsx, xlsm, xls, xlsb, ods, csv, tsv or txt)", path.display())]
    UnsupportedFormat { path: PathBuf },

    #[error("cannot open workbook '{}': {source}", path.display())]
    Workbook {
        path: PathBuf,
        #[source]
        source: calamine::Error,
    },

    #[error("workbook '{}' contains no sheets", path.display())]
    NoSheets { path: PathBuf },

    #[error("sheet '{sheet}' not found in '{}' (available: {})", path.display(), available.join(", "))]
    SheetNotFound {
        path: PathBuf,
        sheet: String,
        available: Vec<String>,
    },

    #[error("malformed delimited text in '{}': {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("cannot write '{}': {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot write CSV '{}': {source}", path.display())]
    CsvWrite {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("XLSX export failed: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),
}

impl IoError {
    /// True for failures reading inputs (as opposed to writing outputs).
    pub fn is_input(&self) -> bool {
        matches!(
            self,
            Self::Read { .. }
                | Self::UnsupportedFormat { .. }
                | Self::Workbook { .. }
                | Self::NoSheets { .. }
                | Self::SheetNotFound { .. }
                | Self::Csv { .. }
        )
    }
}
