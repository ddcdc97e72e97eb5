//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract: scheduled jobs that publish
//! the board rely on them.
//!
//! | Code | Meaning                                                     |
//! |------|-------------------------------------------------------------|
//! | 0    | Success                                                     |
//! | 1    | General error (settings file unreadable, unexpected failure)|
//! | 2    | Usage error (bad args, unknown team id, missing layout)     |
//! | 3    | Layout invalid (TOML parse or validation)                   |
//! | 4    | Input unreadable (missing file, bad workbook, unknown sheet)|
//! | 5    | Output write failure                                        |
//! | 6    | `--strict` and the board carries warnings                   |
//!
//! # Adding New Exit Codes
//!
//! 1. Add the constant
//! 2. Document what triggers it
//! 3. Update the table above
//! 4. Wire it into the relevant command's error handling

use dailyboard_io::IoError;

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, missing required options or files.
pub const EXIT_USAGE: u8 = 2;

/// Layout file failed to parse or validate.
pub const EXIT_LAYOUT_INVALID: u8 = 3;

/// A team's input file could not be read.
pub const EXIT_INPUT: u8 = 4;

/// The board (or an extra export) could not be written.
pub const EXIT_OUTPUT: u8 = 5;

/// Board built and written, but `--strict` was set and warnings exist.
pub const EXIT_STRICT_WARNINGS: u8 = 6;

/// Map an I/O failure to its exit code: reading inputs vs writing outputs.
pub fn io_exit_code(err: &IoError) -> u8 {
    if err.is_input() {
        EXIT_INPUT
    } else {
        EXIT_OUTPUT
    }
}
