// CSV/TSV import, and CSV export of the board sections.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use dailyboard_report::config::Labels;
use dailyboard_report::model::SectionKind;
use dailyboard_report::{section_tables, Board, Grid, SectionTable};

use crate::error::IoError;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

pub fn import(path: &Path) -> Result<Grid, IoError> {
    let content = read_file_as_utf8(path)?;
    let is_tsv = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("tsv"));
    let delimiter = if is_tsv { b'\t' } else { sniff_delimiter(&content) };
    import_from_string(&content, delimiter).map_err(|source| IoError::Csv {
        path: path.to_path_buf(),
        source,
    })
}

/// Detect the most likely field delimiter by checking consistency across the first few lines.
///
/// For each candidate (tab, semicolon, comma, pipe), count fields per line. The delimiter
/// that produces the most consistent field count (>1 field) wins.
pub fn sniff_delimiter(content: &str) -> u8 {
    let candidates: &[u8] = &[b'\t', b';', b',', b'|'];
    let sample_lines: Vec<&str> = content.lines().filter(|l| !l.trim().is_empty()).take(10).collect();

    if sample_lines.is_empty() {
        return b',';
    }

    let mut best = b',';
    let mut best_score = 0u64;

    for &delim in candidates {
        let counts: Vec<usize> = sample_lines
            .iter()
            .map(|line| {
                csv::ReaderBuilder::new()
                    .delimiter(delim)
                    .has_headers(false)
                    .flexible(true)
                    .from_reader(line.as_bytes())
                    .records()
                    .next()
                    .and_then(|r| r.ok())
                    .map(|r| r.len())
                    .unwrap_or(1)
            })
            .collect();

        // Must produce >1 field on the first line to be viable
        if counts.first().copied().unwrap_or(0) <= 1 {
            continue;
        }

        // Lines agreeing with line 1, weighted by field count
        let target = counts[0];
        let consistent = counts.iter().filter(|&&c| c == target).count() as u64;
        let score = consistent * target as u64;

        if score > best_score {
            best_score = score;
            best = delim;
        }
    }

    best
}

/// Read a file as text: UTF-8 (BOM stripped), else EUC-KR/CP949 as written
/// by Korean Excel's "CSV" export.
pub fn read_file_as_utf8(path: &Path) -> Result<String, IoError> {
    let bytes = std::fs::read(path).map_err(|source| IoError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(decode_text(bytes))
}

pub fn decode_text(bytes: Vec<u8>) -> String {
    let bytes = if bytes.starts_with(UTF8_BOM) {
        bytes[UTF8_BOM.len()..].to_vec()
    } else {
        bytes
    };
    match String::from_utf8(bytes) {
        Ok(s) => s,
        Err(e) => {
            let bytes = e.into_bytes();
            let (decoded, _, had_errors) = encoding_rs::EUC_KR.decode(&bytes);
            if had_errors {
                log::warn!("input is neither UTF-8 nor clean EUC-KR; some characters were replaced");
            } else {
                log::debug!("decoded input as EUC-KR");
            }
            decoded.into_owned()
        }
    }
}

fn import_from_string(content: &str, delimiter: u8) -> Result<Grid, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        rows.push(record.iter().map(str::to_string).collect());
    }
    Ok(Grid::from_rows(rows))
}

// ---------------------------------------------------------------------------
// Export
// ---------------------------------------------------------------------------

pub fn file_name(kind: SectionKind) -> &'static str {
    match kind {
        SectionKind::Work => "work.csv",
        SectionKind::Attendance => "attendance.csv",
        SectionKind::Plan => "plan.csv",
    }
}

/// Write `work.csv`, `attendance.csv` and `plan.csv` into `dir`, creating it
/// if needed. Files carry a UTF-8 BOM so Excel shows Hangul correctly.
pub fn export_board(board: &Board, labels: &Labels, dir: &Path) -> Result<Vec<PathBuf>, IoError> {
    std::fs::create_dir_all(dir).map_err(|source| IoError::Write {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut written = Vec::new();
    for table in section_tables(board, labels) {
        let path = dir.join(file_name(table.kind));
        export_table(&table, &path)?;
        written.push(path);
    }
    Ok(written)
}

fn export_table(table: &SectionTable, path: &Path) -> Result<(), IoError> {
    let write_err = |source: std::io::Error| IoError::Write {
        path: path.to_path_buf(),
        source,
    };
    let csv_err = |source: csv::Error| IoError::CsvWrite {
        path: path.to_path_buf(),
        source,
    };

    let mut file = File::create(path).map_err(write_err)?;
    file.write_all(UTF8_BOM).map_err(write_err)?;

    let mut writer = csv::WriterBuilder::new().from_writer(file);
    writer.write_record(&table.headers).map_err(csv_err)?;
    for row in &table.rows {
        writer.write_record(row).map_err(csv_err)?;
    }
    writer.flush().map_err(write_err)?;
    Ok(())
}
