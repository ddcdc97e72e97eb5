//! `dailyboard init` - write a commented starter layout.

use std::path::Path;

use dailyboard_config::Settings;
use dailyboard_report::config::STARTER_LAYOUT;

use crate::exit_codes::EXIT_ERROR;
use crate::CliError;

pub(crate) fn cmd_init(path: &Path, force: bool, user_settings: bool) -> Result<(), CliError> {
    if path.exists() && !force {
        return Err(CliError::usage(format!("'{}' already exists", path.display())).with_hint("pass --force to overwrite"));
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .map_err(|e| CliError::output(format!("cannot create '{}': {e}", parent.display())))?;
    }
    std::fs::write(path, STARTER_LAYOUT)
        .map_err(|e| CliError::output(format!("cannot write '{}': {e}", path.display())))?;
    println!("wrote starter layout {}", path.display());

    if user_settings {
        let settings_path = Settings::create_default_file().map_err(|e| CliError {
            code: EXIT_ERROR,
            message: e.to_string(),
            hint: None,
        })?;
        println!("settings file {}", settings_path.display());
    }

    println!("next: edit team files and anchors, then `dailyboard validate --layout {}`", path.display());
    Ok(())
}
