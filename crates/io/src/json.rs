// JSON export

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use dailyboard_report::Board;

use crate::error::IoError;

/// Write the whole board (meta, three sections, team summaries, diagnostics)
/// as pretty-printed JSON.
pub fn export(board: &Board, path: &Path) -> Result<(), IoError> {
    let write_err = |source: std::io::Error| IoError::Write {
        path: path.to_path_buf(),
        source,
    };
    let file = File::create(path).map_err(write_err)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, board)?;
    writer.write_all(b"\n").map_err(write_err)?;
    writer.flush().map_err(write_err)?;
    Ok(())
}
